#![forbid(unsafe_code)]
//! Exact symbolic computer-algebra core.
//!
//! An expression-handle representation plus an automatic simplifier for
//! sums, products, and powers over exact rational/IEEE-double scalars and
//! real-valued symbols, a polynomial subsystem (division, pseudo-division,
//! content, multivariate GCD, rational-function normal form), and a
//! process-wide memoization registry.
//!
//! This crate is an in-process programmatic core (§6): it exposes
//! construction, query, transformation, polynomial, and lifecycle
//! operations over immutable [`Expr`] handles. There is no parser, printer,
//! or wire protocol — a surrounding layer is expected to supply those.
//!
//! # Example
//! ```
//! use exact_cas::Expr;
//!
//! let x = Expr::symbol("x", false);
//! let expr = Expr::sum(vec![Expr::power(x.clone(), Expr::integer(2)), x.clone()]);
//! let derivative = expr.diff(x.as_symbol().expect("x is a symbol"));
//! assert_eq!(derivative, Expr::sum(vec![Expr::product(vec![Expr::integer(2), x]), Expr::integer(1)]));
//! ```

mod core;

pub use core::{
    ConstantKind, CoreError, DomainInvalidKind, Expr, ExprKind, Fraction, FunctionKind, GcdAlgorithm, InternedSymbol,
    Number, NumericError, TrigKind, clear_all_caches, coeff, content, degree, divide, gcd, gcd_with, integer_content,
    is_input_valid, is_valid, leading_coeff, list_of_symbols, min_degree, normal, pseudo_divide, pseudo_remainder,
    symbols_of, unit,
};

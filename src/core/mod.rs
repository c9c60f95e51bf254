//! Core types for exact symbolic computation (§3).
//!
//! - [`expr`] — the expression handle, canonicalizing constructors, the
//!   order relation, structural hashing, and structural queries.
//! - [`symbol`] — variable interning.
//! - [`number`] — the exact rational / double scalar kernel (re-exported
//!   from the `cas-numeric` crate).
//! - [`poly`] — the polynomial subsystem: validity, division, GCD, normal
//!   form.
//! - [`cache`] — the process-wide memoization registry.
//! - [`error`] — diagnostic-only error kinds (§7).

pub(crate) mod cache;
pub(crate) mod error;
pub(crate) mod expr;
pub(crate) mod number;
pub(crate) mod poly;
pub(crate) mod symbol;

pub use cache::clear_all_caches;
pub use error::{CoreError, DomainInvalidKind};
pub use expr::{ConstantKind, Expr, ExprKind, FunctionKind, TrigKind};
pub use number::{Number, NumericError};
pub use poly::{
    Fraction, GcdAlgorithm, coeff, content, degree, divide, gcd, gcd_with, integer_content, is_input_valid, is_valid,
    leading_coeff, list_of_symbols, min_degree, normal, pseudo_divide, pseudo_remainder, symbols_of, unit,
};
pub use symbol::InternedSymbol;

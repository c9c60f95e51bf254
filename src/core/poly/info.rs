//! Polynomial validity, variable extraction/ordering, degree, and coefficient
//! queries (§4.9).

use std::cmp::Ordering;
use std::sync::Arc;

use num_bigint::BigInt;
use num_traits::{Signed, ToPrimitive, Zero};
use rustc_hash::FxHashSet;

use crate::core::expr::{Expr, ExprKind};
use crate::core::number::{Number, integer_gcd};
use crate::core::symbol::InternedSymbol;

/// `isInputValid(u,v)` / per-node validity check (§4.9): every node must be a
/// symbol, a rational numeric, a sum/product of valid operands, or a power
/// whose base is valid and whose exponent is a positive machine-int integer.
#[must_use]
pub fn is_valid(expr: &Expr) -> bool {
    match &expr.kind {
        ExprKind::Symbol(_) => true,
        ExprKind::Numeric(n) => !n.is_double(),
        ExprKind::Sum(ops) | ExprKind::Product(ops) => ops.iter().all(|o| is_valid(o)),
        ExprKind::Power(base, exp) => {
            is_valid(base)
                && matches!(&exp.kind, ExprKind::Numeric(n) if positive_machine_int(n).is_some())
        }
        ExprKind::Constant(_) | ExprKind::Undefined | ExprKind::Function(..) => false,
    }
}

/// `isInputValid(u, v)`: false if both are zero, or either fails [`is_valid`].
#[must_use]
pub fn is_input_valid(u: &Expr, v: &Expr) -> bool {
    if u.is_zero() && v.is_zero() {
        return false;
    }
    is_valid(u) && is_valid(v)
}

/// Extracts a positive value fitting `i64` from an integer-valued `Number`.
fn positive_machine_int(n: &Number) -> Option<i64> {
    let numer = n.numer()?;
    let denom = n.denom()?;
    if *denom != BigInt::from(1) || !numer.is_positive() {
        return None;
    }
    numer.to_i64()
}

/// Collects every distinct symbol occurring anywhere in `expr` (including
/// inside opaque `Function` arguments, so `normal`'s symbol-map surrogates
/// still expose their free variables to the polynomial routines).
fn collect_symbols_into(expr: &Expr, out: &mut FxHashSet<InternedSymbol>) {
    match &expr.kind {
        ExprKind::Symbol(s) => {
            out.insert(s.clone());
        }
        ExprKind::Numeric(_) | ExprKind::Constant(_) | ExprKind::Undefined => {}
        ExprKind::Sum(ops) | ExprKind::Product(ops) => ops.iter().for_each(|o| collect_symbols_into(o, out)),
        ExprKind::Power(base, exp) => {
            collect_symbols_into(base, out);
            collect_symbols_into(exp, out);
        }
        ExprKind::Function(_, args) => args.iter().for_each(|a| collect_symbols_into(a, out)),
    }
}

/// The set of symbols occurring anywhere in `expr`.
#[must_use]
pub fn symbols_of(expr: &Expr) -> FxHashSet<InternedSymbol> {
    let mut out = FxHashSet::default();
    collect_symbols_into(expr, &mut out);
    out
}

/// The degree of `var` in `expr`, treating any other symbol or opaque
/// subexpression as a coefficient (degree 0 in `var`).
#[must_use]
pub fn degree(expr: &Expr, var: &InternedSymbol) -> i64 {
    match &expr.kind {
        ExprKind::Symbol(s) => i64::from(s == var),
        ExprKind::Numeric(_) | ExprKind::Constant(_) | ExprKind::Undefined | ExprKind::Function(..) => 0,
        ExprKind::Sum(terms) => terms.iter().map(|t| degree(t, var)).max().unwrap_or(0),
        ExprKind::Product(factors) => factors.iter().map(|f| degree(f, var)).sum(),
        ExprKind::Power(base, exp) => degree(base, var) * power_exponent_as_i64(exp),
    }
}

/// §7 `Overflow`: extracts a `Power` exponent's numerator as `i64` for degree
/// arithmetic, logging and falling back to `0` if it does not fit (or is not
/// a plain integer numeral at all, which is simply "not a polynomial power"
/// rather than an overflow).
fn power_exponent_as_i64(exp: &Expr) -> i64 {
    let ExprKind::Numeric(n) = &exp.kind else { return 0 };
    let Some(numer) = n.numer() else { return 0 };
    match ToPrimitive::to_i64(numer) {
        Some(k) => k,
        None => {
            tracing::error!("degree: exponent does not fit in i64, treating this power as degree 0");
            0
        }
    }
}

/// The minimum degree of `var` across the summands of `expr` (§GLOSSARY,
/// used by `ComparePolyVariables`).
#[must_use]
pub fn min_degree(expr: &Expr, var: &InternedSymbol) -> i64 {
    match &expr.kind {
        ExprKind::Symbol(s) => i64::from(s == var),
        ExprKind::Numeric(_) | ExprKind::Constant(_) | ExprKind::Undefined | ExprKind::Function(..) => 0,
        ExprKind::Sum(terms) => terms.iter().map(|t| min_degree(t, var)).min().unwrap_or(0),
        ExprKind::Product(factors) => factors.iter().map(|f| min_degree(f, var)).sum(),
        ExprKind::Power(base, exp) => min_degree(base, var) * power_exponent_as_i64(exp),
    }
}

/// Splits a single (non-`Sum`) term into `(coefficient, degree)` with respect
/// to `var`: the factor(s) carrying `var` are pulled out and their exponent
/// summed, the rest stays as the coefficient.
fn split_var_power(term: &Arc<Expr>, var: &InternedSymbol) -> (Arc<Expr>, i64) {
    match &term.kind {
        ExprKind::Symbol(s) if s == var => (Expr::integer(1), 1),
        ExprKind::Power(base, exp) if matches!(&base.kind, ExprKind::Symbol(s) if s == var) => {
            let exp_n = match &exp.kind {
                ExprKind::Numeric(n) => n.numer().and_then(ToPrimitive::to_i64).unwrap_or(0),
                _ => 0,
            };
            (Expr::integer(1), exp_n)
        }
        ExprKind::Product(factors) => {
            let mut deg = 0;
            let mut rest = Vec::with_capacity(factors.len());
            for f in factors {
                let (coeff, d) = split_var_power(f, var);
                if d != 0 {
                    deg += d;
                } else {
                    rest.push(coeff);
                }
            }
            (Expr::product(rest), deg)
        }
        _ => (term.clone(), 0),
    }
}

/// Returns the terms of `expr` as a flat list (a `Sum`'s operands, or `expr`
/// itself as a singleton).
fn terms_of(expr: &Arc<Expr>) -> Vec<Arc<Expr>> {
    match &expr.kind {
        ExprKind::Sum(terms) => terms.clone(),
        _ => vec![expr.clone()],
    }
}

/// The coefficient of `var^exp` in `expr` (0 if absent).
#[must_use]
pub fn coeff(expr: &Arc<Expr>, var: &InternedSymbol, exp: i64) -> Arc<Expr> {
    let matching: Vec<Arc<Expr>> = terms_of(expr)
        .into_iter()
        .filter_map(|t| {
            let (c, d) = split_var_power(&t, var);
            (d == exp).then_some(c)
        })
        .collect();
    Expr::sum(matching)
}

/// The leading coefficient of `expr` with respect to `var`: the coefficient
/// of `var^degree(expr,var)`.
#[must_use]
pub fn leading_coeff(expr: &Arc<Expr>, var: &InternedSymbol) -> Arc<Expr> {
    let deg = degree(expr, var);
    coeff(expr, var, deg)
}

/// `ComparePolyVariables` (SPEC_FULL §4 clarification): variables with
/// `min(deg_u, deg_v) != 0` sort by that degree ascending and always precede
/// variables whose min-degree is zero in at least one operand; ties (both
/// zero, or equal nonzero minimums) break by name.
fn compare_poly_variables(a: &InternedSymbol, b: &InternedSymbol, u: &Expr, v: &Expr) -> Ordering {
    let min_a = min_degree(u, a).min(min_degree(v, a));
    let min_b = min_degree(u, b).min(min_degree(v, b));
    match (min_a != 0, min_b != 0) {
        (true, true) => min_a.cmp(&min_b).then_with(|| a.cmp(b)),
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (false, false) => a.cmp(b),
    }
}

/// `listOfSymbols(u,v)` (§4.9): the union of symbols in `u` and `v`, ordered
/// by `ComparePolyVariables`.
#[must_use]
pub fn list_of_symbols(u: &Expr, v: &Expr) -> Vec<InternedSymbol> {
    let mut all: Vec<InternedSymbol> = symbols_of(u).into_iter().chain(symbols_of(v)).collect();
    all.sort_unstable_by(|a, b| compare_poly_variables(a, b, u, v));
    all.dedup();
    all
}

/// **Content (integer)** (§GLOSSARY): the integer GCD of the numeric
/// coefficients of `expr`, treated as a polynomial with integer coefficients.
/// Rational (non-integer) coefficients are handled by their numerator only,
/// a simplification documented in `DESIGN.md`.
#[must_use]
pub fn integer_content(expr: &Arc<Expr>) -> BigInt {
    let mut result = BigInt::zero();
    for term in terms_of(expr) {
        let coeff = term.numeric_term();
        let Number::Rational(r) = coeff.numeric_eval().unwrap_or_else(|| Number::from_i64(1)) else {
            continue;
        };
        result = integer_gcd(&result, r.numer());
    }
    if result.is_zero() { BigInt::from(1) } else { result }
}

/// `unit(p, x)` (§6, Cohen 2003 definition): the sign such that
/// `p = unit(p) * content(p) * primitive_part(p)`. Computed by walking down
/// from `x`'s leading coefficient through whichever symbols that coefficient
/// still contains (alphabetically) until a numeric is reached, then taking
/// its sign; a coefficient with no remaining symbols that isn't numeric
/// (shouldn't arise for an already-expanded polynomial) is treated as
/// positive.
///
/// §7 `Precondition`: requesting the unit of a non-polynomial `p` is logged
/// and answered with `Undefined` rather than an arbitrary sign.
#[must_use]
pub fn unit(p: &Arc<Expr>, x: &InternedSymbol) -> Arc<Expr> {
    if !is_valid(p) {
        tracing::warn!("unit: requested on a non-polynomial expression, returning undefined");
        return Expr::undefined();
    }
    unit_sign(&leading_coeff(p, x))
}

fn unit_sign(p: &Arc<Expr>) -> Arc<Expr> {
    match &p.kind {
        ExprKind::Numeric(n) => {
            if n.signum() < 0 { Expr::integer(-1) } else { Expr::integer(1) }
        }
        _ => {
            let mut vars: Vec<InternedSymbol> = symbols_of(p).into_iter().collect();
            vars.sort_unstable();
            vars.first().map_or_else(|| Expr::integer(1), |next| unit_sign(&leading_coeff(p, next)))
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "test module")]
mod tests {
    use super::*;
    use crate::core::symbol::intern_symbol;

    #[test]
    fn unit_is_negative_for_a_negative_leading_coefficient() {
        let x = intern_symbol("poly_info_test_unit_x", false);
        let x_expr = Expr::symbol("poly_info_test_unit_x", false);
        let expr = Expr::sum(vec![Expr::product(vec![Expr::integer(-3), Expr::power(x_expr, Expr::integer(2))]), Expr::integer(1)]);
        assert_eq!(unit(&expr, &x), Expr::integer(-1));
    }

    #[test]
    fn degree_of_cubic_term() {
        let x = intern_symbol("poly_info_test_x", false);
        let x_expr = Expr::symbol("poly_info_test_x", false);
        let expr = Expr::power(x_expr, Expr::integer(3));
        assert_eq!(degree(&expr, &x), 3);
    }

    #[test]
    fn leading_coefficient_of_binomial() {
        let x = intern_symbol("poly_info_test_lc_x", false);
        let x_expr = Expr::symbol("poly_info_test_lc_x", false);
        let expr = Expr::sum(vec![
            Expr::product(vec![Expr::integer(2), Expr::power(x_expr.clone(), Expr::integer(2))]),
            Expr::integer(5),
        ]);
        assert_eq!(leading_coeff(&expr, &x), Expr::integer(2));
    }

    #[test]
    fn invalid_nodes_fail_validity() {
        let sin_x = Expr::sin(Expr::symbol("poly_info_test_invalid_x", false));
        assert!(!is_valid(&sin_x));
    }
}

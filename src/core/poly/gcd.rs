//! Multivariate polynomial GCD (§4.11): subresultant driver atop
//! [`super::division::pseudo_remainder`].

use std::sync::{Arc, LazyLock};

use num_bigint::BigInt;
use num_rational::BigRational;

use crate::core::cache::MemoMap;
use crate::core::expr::{Expr, ExprKind};
use crate::core::number::{Number, integer_gcd};
use crate::core::symbol::InternedSymbol;

use super::division::pseudo_remainder;
use super::info::{coeff, degree, integer_content, is_input_valid, leading_coeff, list_of_symbols};

/// Which pseudo-remainder-sequence strategy [`compute_with`]/[`content`] use
/// (§4.11: "a primitive-gcd variant is available" alongside the default
/// subresultant driver).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GcdAlgorithm {
    /// Default: re-strips integer content out of the remainder after every
    /// pseudo-division step (see `DESIGN.md` for how this differs from a
    /// true subresultant-coefficient-corrected PRS).
    Subresultant,
    /// Strips content only once, from the primitive parts up front, then
    /// runs the raw pseudo-remainder sequence unmodified. Simpler and makes
    /// fewer `integer_content` calls, at the cost of letting intermediate
    /// coefficients grow without the per-step correction.
    Primitive,
}

/// One memo map per memoized operation (§4.13): `gcd` is the polynomial
/// routine expensive enough to be worth caching, keyed by operand pair plus
/// algorithm choice.
static GCD_CACHE: LazyLock<MemoMap<(Arc<Expr>, Arc<Expr>, GcdAlgorithm), Arc<Expr>>> = LazyLock::new(MemoMap::new);

/// `Gcd::compute(u, v)` (§4.11, SPEC_FULL clarification): the default
/// (subresultant) algorithm, memoized by operand pair through the §4.13
/// cache registry.
#[must_use]
pub fn compute(u: &Arc<Expr>, v: &Arc<Expr>) -> Arc<Expr> {
    compute_with(u, v, GcdAlgorithm::Subresultant)
}

/// `gcd(u, v, algo)` (§6 `gcd(u,v[,algo])`): as [`compute`], with an explicit
/// algorithm choice.
#[must_use]
pub fn compute_with(u: &Arc<Expr>, v: &Arc<Expr>, algo: GcdAlgorithm) -> Arc<Expr> {
    GCD_CACHE.get_or_insert_with((u.clone(), v.clone(), algo), || compute_uncached(u, v, algo))
}

/// Expands both operands, handles the `0`/`1`/equal-operand/both-numeric/
/// disjoint-symbol short circuits, then runs the pseudo-remainder sequence
/// (per `algo`) on the primitive parts and sign-normalizes the result.
fn compute_uncached(u: &Arc<Expr>, v: &Arc<Expr>, algo: GcdAlgorithm) -> Arc<Expr> {
    let u = u.expand();
    let v = v.expand();

    if !is_input_valid(&u, &v) {
        tracing::debug!("gcd: operand failed polynomial validity, returning undefined");
        return Expr::undefined();
    }
    if u.is_zero() && v.is_zero() {
        tracing::debug!("gcd: both operands are zero, returning undefined");
        return Expr::undefined();
    }
    if u.is_one() || v.is_one() {
        return Expr::integer(1);
    }
    if u.is_zero() {
        return v;
    }
    if v.is_zero() {
        return u;
    }

    let vars = list_of_symbols(&u, &v);
    if u == v {
        return normalize_sign(&u, &vars);
    }

    if let (Some(ru), Some(rv)) = (numeric_ratio(&u), numeric_ratio(&v)) {
        return Expr::numeric(Number::Rational(BigRational::from_integer(integer_gcd(&ru, &rv))));
    }

    if vars.is_empty() {
        let cu = integer_content(&u);
        let cv = integer_content(&v);
        return Expr::numeric(Number::Rational(BigRational::from_integer(integer_gcd(&cu, &cv))));
    }

    let symbols_u = crate::core::poly::info::symbols_of(&u);
    let symbols_v = crate::core::poly::info::symbols_of(&v);
    let disjoint = symbols_u.is_disjoint(&symbols_v);

    let cu = integer_content(&u);
    let cv = integer_content(&v);
    let content_gcd = integer_gcd(&cu, &cv);

    if disjoint {
        return Expr::numeric(Number::Rational(BigRational::from_integer(content_gcd)));
    }

    let pu = strip_content(&u, &cu);
    let pv = strip_content(&v, &cv);
    let primitive_gcd = match algo {
        GcdAlgorithm::Subresultant => subresultant_prs(&pu, &pv, &vars[0]),
        GcdAlgorithm::Primitive => primitive_prs(&pu, &pv, &vars[0]),
    };

    let scaled = Expr::product(vec![Expr::numeric(Number::Rational(BigRational::from_integer(content_gcd))), primitive_gcd]);
    normalize_sign(&scaled, &vars)
}

/// `content(p, x, algo)` (§6 `content(p,x[,algo])`): the GCD of `p`'s
/// coefficients with respect to `x`, each itself a (possibly multivariate)
/// polynomial in the remaining symbols — the general recursive content,
/// distinct from [`integer_content`]'s flat numeric-coefficient GCD that the
/// internals above use on already fully-expanded, single-variable-at-a-time
/// remainders.
#[must_use]
pub fn content(p: &Arc<Expr>, x: &InternedSymbol, algo: GcdAlgorithm) -> Arc<Expr> {
    let p = p.expand();
    let deg = degree(&p, x);
    let mut coeffs = (0..=deg).map(|k| coeff(&p, x, k)).filter(|c| !c.is_zero());
    let Some(first) = coeffs.next() else { return Expr::integer(0) };
    coeffs.fold(first, |acc, c| compute_with(&acc, &c, algo))
}

/// Numerator/denominator view for purely-numeric handles, used for the
/// integer-GCD short-circuit (denominators are 1 per §4.1 normalization once
/// both operands are themselves integers).
fn numeric_ratio(e: &Arc<Expr>) -> Option<BigInt> {
    match &e.kind {
        ExprKind::Numeric(Number::Rational(r)) if *r.denom() == BigInt::from(1) => Some(r.numer().clone()),
        _ => None,
    }
}

/// Divides out the integer content `c` from `p` (a single scalar division,
/// not a general polynomial division).
fn strip_content(p: &Arc<Expr>, c: &BigInt) -> Arc<Expr> {
    if *c == BigInt::from(1) {
        return p.clone();
    }
    let inv = Expr::numeric(Number::Rational(BigRational::new(BigInt::from(1), c.clone())));
    Expr::product(vec![p.clone(), inv]).expand()
}

/// The pseudo-remainder sequence in the main variable `var`: `gcd(a,b) = PRS`
/// terminal nonzero remainder, up to a constant factor (accounted for by the
/// caller's integer-content multiplication). This is a plain PRS rather than
/// a subresultant-coefficient-corrected one; see `DESIGN.md`.
fn subresultant_prs(a: &Arc<Expr>, b: &Arc<Expr>, var: &InternedSymbol) -> Arc<Expr> {
    let mut prev = a.clone();
    let mut curr = b.clone();
    while !curr.is_zero() {
        let remainder = pseudo_remainder(&prev, &curr, var);
        let content = integer_content(&remainder);
        prev = curr;
        curr = if remainder.is_zero() { remainder } else { strip_content(&remainder, &content) };
    }
    prev
}

/// The `GcdAlgorithm::Primitive` variant: the raw pseudo-remainder sequence
/// with no per-step content stripping, trading coefficient-growth control
/// for fewer `integer_content` passes over the remainder.
fn primitive_prs(a: &Arc<Expr>, b: &Arc<Expr>, var: &InternedSymbol) -> Arc<Expr> {
    let mut prev = a.clone();
    let mut curr = b.clone();
    while !curr.is_zero() {
        let remainder = pseudo_remainder(&prev, &curr, var);
        prev = curr;
        curr = remainder;
    }
    let content = integer_content(&prev);
    strip_content(&prev, &content)
}

/// Final sign normalization (§4.11): walk down the variable list taking
/// leading coefficients until a numeric coefficient is reached, and multiply
/// by that coefficient's sign.
fn normalize_sign(p: &Arc<Expr>, vars: &[InternedSymbol]) -> Arc<Expr> {
    let mut current = p.clone();
    for var in vars {
        if matches!(current.kind, ExprKind::Numeric(_)) {
            break;
        }
        current = leading_coeff(&current, var);
    }
    let negative = matches!(&current.kind, ExprKind::Numeric(n) if n.signum() < 0);
    if negative { Expr::product(vec![Expr::integer(-1), p.clone()]) } else { p.clone() }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "test module")]
mod tests {
    use super::*;

    #[test]
    fn gcd_of_plain_integers() {
        assert_eq!(compute(&Expr::integer(6), &Expr::integer(9)), Expr::integer(3));
    }

    #[test]
    fn gcd_of_difference_of_squares_family() {
        let x = Expr::symbol("poly_gcd_test_x", false);
        let u = Expr::sum(vec![Expr::power(x.clone(), Expr::integer(2)), Expr::integer(-1)]);
        let v = Expr::sum(vec![
            Expr::power(x.clone(), Expr::integer(2)),
            Expr::product(vec![Expr::integer(-2), x.clone()]),
            Expr::integer(1),
        ]);
        let g = compute(&u, &v);
        let expected = Expr::sum(vec![x, Expr::integer(-1)]);
        assert_eq!(g, expected);
    }

    #[test]
    fn gcd_of_equal_operands_is_still_sign_normalized() {
        let x = Expr::symbol("poly_gcd_test_equal_x", false);
        let u = Expr::sum(vec![Expr::product(vec![Expr::integer(-1), x.clone()]), Expr::integer(-1)]);
        let expected = Expr::sum(vec![x, Expr::integer(1)]);
        assert_eq!(compute(&u, &u).expand(), expected);
    }

    #[test]
    fn gcd_with_a_zero_operand_is_the_other_operand() {
        let x = Expr::symbol("poly_gcd_test_zero_x", false);
        assert_eq!(compute(&Expr::integer(0), &x.clone()), x);
    }

    #[test]
    fn primitive_algorithm_agrees_with_subresultant_on_difference_of_squares() {
        let x = Expr::symbol("poly_gcd_test_primitive_x", false);
        let u = Expr::sum(vec![Expr::power(x.clone(), Expr::integer(2)), Expr::integer(-1)]);
        let v = Expr::sum(vec![
            Expr::power(x.clone(), Expr::integer(2)),
            Expr::product(vec![Expr::integer(-2), x.clone()]),
            Expr::integer(1),
        ]);
        let g = compute_with(&u, &v, GcdAlgorithm::Primitive);
        let expected = Expr::sum(vec![x, Expr::integer(-1)]);
        assert_eq!(g, expected);
    }

    #[test]
    fn content_of_a_polynomial_with_a_common_coefficient_factor() {
        let x = Expr::symbol("poly_gcd_test_content_x", false);
        let x_sym = x.as_symbol().expect("x is a symbol").clone();
        let expr = Expr::sum(vec![
            Expr::product(vec![Expr::integer(6), Expr::power(x.clone(), Expr::integer(2))]),
            Expr::product(vec![Expr::integer(9), x]),
        ]);
        assert_eq!(content(&expr, &x_sym, GcdAlgorithm::Subresultant), Expr::integer(3));
    }
}

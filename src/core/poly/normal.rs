//! Rational-function normal form (§4.12): `normal(expr) -> Fraction{num,
//! denom}` via a [`SymbolMap`] surrogate for non-polynomial subexpressions.

use std::sync::Arc;

use crate::core::expr::{Expr, ExprKind};

use super::division::divide;
use super::gcd::compute as gcd;
use super::info::list_of_symbols;

/// A canonical `num/denom` pair with `gcd(num, denom) = 1`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fraction {
    /// Numerator.
    pub num: Arc<Expr>,
    /// Denominator.
    pub denom: Arc<Expr>,
}

/// A bidirectional substitution table assigning fresh temporary symbols to
/// non-polynomial subexpressions (§GLOSSARY `Symbol map`), so `normal` can
/// reduce the rational-function surrogate with the polynomial routines and
/// then back-substitute the originals.
struct SymbolMap {
    entries: Vec<(Arc<Expr>, Arc<Expr>)>,
}

impl SymbolMap {
    const fn new() -> Self {
        Self { entries: Vec::new() }
    }

    /// Returns the existing temp-symbol standing in for `expr`, or mints one.
    fn get_or_insert(&mut self, expr: &Arc<Expr>) -> Arc<Expr> {
        for (original, surrogate) in &self.entries {
            if original.as_ref() == expr.as_ref() {
                return surrogate.clone();
            }
        }
        let surrogate = Expr::tmp_symbol(false);
        self.entries.push((expr.clone(), surrogate.clone()));
        surrogate
    }

    /// Replaces every surrogate in `expr` with the original it stands for.
    fn substitute_back(&self, expr: &Arc<Expr>) -> Arc<Expr> {
        self.entries.iter().fold(expr.clone(), |acc, (original, surrogate)| acc.subst(surrogate, original))
    }
}

/// True iff `n` is an integer-valued rational (`denom == 1`); a non-integer
/// exponent (e.g. `1/2`) must route its `Power` node through the symbol map
/// rather than the polynomial recursion below, since [`to_fraction`] only
/// knows how to distribute an integer exponent over a `(num, denom)` pair.
fn is_integer_exponent(n: &crate::core::number::Number) -> bool {
    n.denom().is_some_and(|d| *d == num_bigint::BigInt::from(1))
}

/// Replaces every subexpression that is not itself a symbol, numeric, sum,
/// product, or integer power (a function call, a constant, or a power with a
/// non-integer exponent) with a fresh temporary symbol, so the remaining
/// tree is a genuine polynomial/rational surrogate.
fn polynomialize(expr: &Arc<Expr>, map: &mut SymbolMap) -> Arc<Expr> {
    match &expr.kind {
        ExprKind::Symbol(_) | ExprKind::Numeric(_) => expr.clone(),
        ExprKind::Sum(terms) => Expr::sum(terms.iter().map(|t| polynomialize(t, map)).collect()),
        ExprKind::Product(factors) => Expr::product(factors.iter().map(|f| polynomialize(f, map)).collect()),
        ExprKind::Power(base, exp) if matches!(&exp.kind, ExprKind::Numeric(n) if is_integer_exponent(n)) => {
            let base = polynomialize(base, map);
            Expr::power(base, exp.clone())
        }
        ExprKind::Constant(_) | ExprKind::Undefined | ExprKind::Function(..) | ExprKind::Power(..) => {
            map.get_or_insert(expr)
        }
    }
}

/// Rewrites an already-polynomialized expression into a `(num, denom)`
/// fraction: sums combine over a common denominator, products multiply
/// componentwise, integer powers distribute over both halves.
fn to_fraction(expr: &Arc<Expr>) -> (Arc<Expr>, Arc<Expr>) {
    match &expr.kind {
        ExprKind::Sum(terms) => {
            let fractions: Vec<(Arc<Expr>, Arc<Expr>)> = terms.iter().map(to_fraction).collect();
            let denom = fractions.iter().fold(Expr::integer(1), |acc, (_, d)| Expr::product(vec![acc, d.clone()]));
            let num = Expr::sum(
                fractions
                    .iter()
                    .enumerate()
                    .map(|(i, (n, _))| {
                        let mut factors: Vec<Arc<Expr>> =
                            fractions.iter().enumerate().filter(|(j, _)| *j != i).map(|(_, (_, d))| d.clone()).collect();
                        factors.push(n.clone());
                        Expr::product(factors)
                    })
                    .collect(),
            );
            (num, denom)
        }
        ExprKind::Product(factors) => {
            let fractions: Vec<(Arc<Expr>, Arc<Expr>)> = factors.iter().map(to_fraction).collect();
            let num = Expr::product(fractions.iter().map(|(n, _)| n.clone()).collect());
            let denom = Expr::product(fractions.iter().map(|(_, d)| d.clone()).collect());
            (num, denom)
        }
        ExprKind::Power(base, exp) => {
            let exp_n = match &exp.kind {
                ExprKind::Numeric(n) => n.numer().and_then(num_traits::ToPrimitive::to_i64),
                _ => None,
            };
            match exp_n {
                Some(k) if k >= 0 => {
                    let (bn, bd) = to_fraction(base);
                    (Expr::power(bn, Expr::integer(k)), Expr::power(bd, Expr::integer(k)))
                }
                Some(k) => {
                    let (bn, bd) = to_fraction(base);
                    (Expr::power(bd, Expr::integer(-k)), Expr::power(bn, Expr::integer(-k)))
                }
                None => (expr.clone(), Expr::integer(1)),
            }
        }
        _ => (expr.clone(), Expr::integer(1)),
    }
}

/// `normal(expr)` (§4.12): the canonical rational-function representation.
/// Two expressions denote the same rational function iff their `normal`
/// results are structurally equal (§8 invariant 5).
#[must_use]
pub fn normal(expr: &Arc<Expr>) -> Fraction {
    let mut map = SymbolMap::new();
    let surrogate = polynomialize(&expr.expand(), &mut map).expand();
    let (num, denom) = to_fraction(&surrogate);
    let num = num.expand();
    let denom = denom.expand();

    if denom.is_one() {
        return Fraction { num: map.substitute_back(&num), denom: map.substitute_back(&denom) };
    }

    let vars = list_of_symbols(&num, &denom);
    let g = gcd(&num, &denom);
    let (num, denom) = if g.is_one() {
        (num, denom)
    } else {
        (divide(&num, &g, &vars).0, divide(&denom, &g, &vars).0)
    };

    Fraction { num: map.substitute_back(&num), denom: map.substitute_back(&denom) }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "test module")]
mod tests {
    use super::*;

    #[test]
    fn sum_of_reciprocals_combines_over_common_denominator() {
        let x = Expr::symbol("poly_normal_test_x", false);
        let y = Expr::symbol("poly_normal_test_y", false);
        let expr = Expr::sum(vec![Expr::power(x.clone(), Expr::integer(-1)), Expr::power(y.clone(), Expr::integer(-1))]);
        let result = normal(&expr);
        let expected_num = Expr::sum(vec![x.clone(), y.clone()]);
        let expected_denom = Expr::product(vec![x, y]);
        assert_eq!(result.num, expected_num);
        assert_eq!(result.denom, expected_denom);
    }

    #[test]
    fn non_integer_power_is_routed_through_the_symbol_map_not_its_numerator() {
        let x = Expr::symbol("poly_normal_test_sqrt_x", false);
        let expr = Expr::power(
            x,
            Expr::numeric(crate::core::number::Number::Rational(num_rational::BigRational::new(1.into(), 2.into()))),
        );
        let result = normal(&expr);
        assert_eq!(result.num, expr);
        assert_eq!(result.denom, Expr::integer(1));
    }

    #[test]
    fn pythagorean_identity_normalizes_to_one_over_symbol_map() {
        let x = Expr::symbol("poly_normal_test_trig_x", false);
        let expr = Expr::sum(vec![
            Expr::power(Expr::sin(x.clone()), Expr::integer(2)),
            Expr::power(Expr::cos(x), Expr::integer(2)),
        ]);
        let result = normal(&expr);
        assert_eq!(result.num, Expr::integer(1));
        assert_eq!(result.denom, Expr::integer(1));
    }
}

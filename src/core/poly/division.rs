//! Polynomial division and pseudo-division (§4.10).

use std::sync::Arc;

use crate::core::expr::{Expr, ExprKind};
use crate::core::symbol::InternedSymbol;

use super::info::{degree, leading_coeff};

/// Builds the bare `Symbol` expression for an already-interned symbol,
/// bypassing the registry lookup `Expr::symbol` performs by name.
fn symbol_expr(sym: &InternedSymbol) -> Arc<Expr> {
    Arc::new(Expr::new(ExprKind::Symbol(sym.clone())))
}

/// `divide(u, v, L)` (§4.10): recursive multivariate long division. `vars`
/// is `L`; division proceeds with respect to `vars[0]`, recursing into
/// `vars[1..]` for leading-coefficient division in the coefficient ring.
///
/// With `vars` empty: returns `(u/v, 0)` if that ratio is a rational
/// numeric, else `(0, u)` — the asymmetric fallback preserved from the
/// original source (see `DESIGN.md`).
#[must_use]
pub fn divide(u: &Arc<Expr>, v: &Arc<Expr>, vars: &[InternedSymbol]) -> (Arc<Expr>, Arc<Expr>) {
    let Some((x, rest)) = vars.split_first() else {
        let ratio = Expr::product(vec![u.clone(), Expr::power(v.clone(), Expr::integer(-1))]);
        return if ratio.is_numeric() { (ratio, Expr::integer(0)) } else { (Expr::integer(0), u.clone()) };
    };

    let deg_v = degree(v, x);
    let lc_v = leading_coeff(v, x);

    let mut quotient = Expr::integer(0);
    let mut remainder = u.expand();

    loop {
        let deg_r = degree(&remainder, x);
        if remainder.is_zero() || deg_r < deg_v {
            break;
        }
        let lc_r = leading_coeff(&remainder, x);
        let (coeff_quot, coeff_rem) = divide(&lc_r, &lc_v, rest);
        if !coeff_rem.is_zero() {
            break;
        }
        let term = Expr::product(vec![coeff_quot, Expr::power(symbol_expr(x), Expr::integer(deg_r - deg_v))]);
        quotient = Expr::sum(vec![quotient, term.clone()]);
        remainder = Expr::sum(vec![remainder, Expr::product(vec![Expr::integer(-1), term, v.clone()])]).expand();
    }

    (quotient.expand(), remainder)
}

/// `pseudoDivide(u, v, x)` (§4.10, Cohen 2003 §6.2): exact division after
/// multiplying the dividend through by enough powers of `lc(v)` to avoid
/// coefficient-ring division. Returns `(q, r)` folded from `(sigma, q, r)` by
/// the closing multiplication the spec describes.
#[must_use]
pub fn pseudo_divide(u: &Arc<Expr>, v: &Arc<Expr>, x: &InternedSymbol) -> (Arc<Expr>, Arc<Expr>) {
    let deg_u = degree(u, x);
    let deg_v = degree(v, x);
    let lc_v = leading_coeff(v, x);
    let x_expr = symbol_expr(x);

    let mut quotient = Expr::integer(0);
    let mut remainder = u.expand();
    let mut sigma: i64 = 0;

    loop {
        let deg_r = degree(&remainder, x);
        if remainder.is_zero() || deg_r < deg_v {
            break;
        }
        let lc_r = leading_coeff(&remainder, x);
        let delta = deg_r - deg_v;
        let new_term = Expr::product(vec![lc_r, Expr::power(x_expr.clone(), Expr::integer(delta))]);
        quotient = Expr::sum(vec![Expr::product(vec![lc_v.clone(), quotient]), new_term.clone()]);
        remainder = Expr::sum(vec![
            Expr::product(vec![lc_v.clone(), remainder]),
            Expr::product(vec![Expr::integer(-1), new_term, v.clone()]),
        ])
        .expand();
        sigma += 1;
    }

    let needed = (deg_u - deg_v + 1).max(0) - sigma;
    if needed > 0 {
        let factor = Expr::power(lc_v, Expr::integer(needed));
        quotient = Expr::product(vec![factor.clone(), quotient]).expand();
        remainder = Expr::product(vec![factor, remainder]).expand();
    }

    (quotient, remainder)
}

/// `pseudoRemainder(u, v, x)`: the remainder half of [`pseudo_divide`].
#[must_use]
pub fn pseudo_remainder(u: &Arc<Expr>, v: &Arc<Expr>, x: &InternedSymbol) -> Arc<Expr> {
    pseudo_divide(u, v, x).1
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "test module")]
mod tests {
    use super::*;
    use crate::core::symbol::intern_symbol;

    #[test]
    fn exact_division_of_difference_of_squares() {
        let x = intern_symbol("poly_div_test_x", false);
        let x_expr = Expr::symbol("poly_div_test_x", false);
        let u = Expr::sum(vec![Expr::power(x_expr.clone(), Expr::integer(2)), Expr::integer(-1)]);
        let v = Expr::sum(vec![x_expr.clone(), Expr::integer(-1)]);
        let (q, r) = divide(&u, &v, &[x]);
        assert!(r.is_zero());
        assert_eq!(q, Expr::sum(vec![x_expr, Expr::integer(1)]));
    }

    #[test]
    fn pseudo_divide_satisfies_the_scaled_identity() {
        let x = intern_symbol("poly_pseudo_test_x", false);
        let x_expr = Expr::symbol("poly_pseudo_test_x", false);
        let u = Expr::sum(vec![Expr::power(x_expr.clone(), Expr::integer(2)), Expr::integer(1)]);
        let v = Expr::sum(vec![Expr::product(vec![Expr::integer(2), x_expr.clone()]), Expr::integer(1)]);
        let (q, r) = pseudo_divide(&u, &v, &x);
        let lc_v = leading_coeff(&v, &x);
        let deg_u = degree(&u, &x);
        let deg_v = degree(&v, &x);
        let m = Expr::power(lc_v, Expr::integer((deg_u - deg_v + 1).max(0)));
        let lhs = Expr::product(vec![m, u]);
        let rhs = Expr::sum(vec![Expr::product(vec![q, v]), r]);
        assert_eq!(Expr::sum(vec![lhs, Expr::product(vec![Expr::integer(-1), rhs])]).expand(), Expr::integer(0));
    }
}

//! Property-based tests (§8 laws): commutativity/associativity of the
//! canonicalizing constructors, the expand distribution law, differentiation
//! linearity, and the polynomial division/GCD identities, over randomly
//! generated small integer coefficients.

use std::sync::{Arc, LazyLock};

use exact_cas::Expr;
use quickcheck_macros::quickcheck;

static X: LazyLock<Arc<Expr>> = LazyLock::new(|| Expr::symbol("prop_test_x", false));
static Y: LazyLock<Arc<Expr>> = LazyLock::new(|| Expr::symbol("prop_test_y", false));

/// Keeps quickcheck's `i64` inputs small enough that `BigInt` arithmetic
/// stays cheap and `.abs()` never overflows.
fn bounded(n: i64) -> i64 {
    n % 1000
}

#[quickcheck]
fn sum_is_commutative(a: i64, b: i64) -> bool {
    let term_a = Expr::product(vec![Expr::integer(bounded(a)), X.clone()]);
    let term_b = Expr::product(vec![Expr::integer(bounded(b)), Y.clone()]);
    Expr::sum(vec![term_a.clone(), term_b.clone()]) == Expr::sum(vec![term_b, term_a])
}

#[quickcheck]
fn sum_is_associative(a: i64, b: i64, c: i64) -> bool {
    let ta = Expr::product(vec![Expr::integer(bounded(a)), X.clone()]);
    let tb = Expr::product(vec![Expr::integer(bounded(b)), Y.clone()]);
    let tc = Expr::integer(bounded(c));
    let left = Expr::sum(vec![ta.clone(), Expr::sum(vec![tb.clone(), tc.clone()])]);
    let right = Expr::sum(vec![Expr::sum(vec![ta, tb]), tc]);
    left == right
}

#[quickcheck]
fn product_is_commutative(a: i64, b: i64) -> bool {
    let fa = Expr::power(X.clone(), Expr::integer(bounded(a).abs().max(1)));
    let fb = Expr::power(Y.clone(), Expr::integer(bounded(b).abs().max(1)));
    Expr::product(vec![fa.clone(), fb.clone()]) == Expr::product(vec![fb, fa])
}

#[quickcheck]
fn expand_distributes_over_sum(a: i64, b: i64, c: i64) -> bool {
    let big_a = Expr::sum(vec![Expr::integer(bounded(a)), X.clone()]);
    let big_b = Expr::integer(bounded(b));
    let big_c = Expr::product(vec![Expr::integer(bounded(c)), Y.clone()]);

    let lhs = Expr::product(vec![big_a.clone(), Expr::sum(vec![big_b.clone(), big_c.clone()])]).expand();
    let rhs = Expr::sum(vec![Expr::product(vec![big_a.clone(), big_b]), Expr::product(vec![big_a, big_c])]).expand();
    lhs == rhs
}

#[quickcheck]
fn diff_is_linear_over_sum(a: i64, b: i64) -> bool {
    let x_sym = X.as_symbol().expect("X is a symbol");
    let term_a = Expr::product(vec![Expr::integer(bounded(a)), Expr::power(X.clone(), Expr::integer(2))]);
    let term_b = Expr::product(vec![Expr::integer(bounded(b)), X.clone()]);

    let lhs = Expr::sum(vec![term_a.clone(), term_b.clone()]).diff(x_sym);
    let rhs = Expr::sum(vec![term_a.diff(x_sym), term_b.diff(x_sym)]);
    lhs == rhs
}

#[quickcheck]
fn diff_of_product_satisfies_the_product_rule(a: i64) -> bool {
    let x_sym = X.as_symbol().expect("X is a symbol");
    let coeff = bounded(a).max(1);
    let f = Expr::power(X.clone(), Expr::integer(2));
    let g = Expr::product(vec![Expr::integer(coeff), X.clone()]);

    let lhs = Expr::product(vec![f.clone(), g.clone()]).diff(x_sym);
    let rhs = Expr::sum(vec![
        Expr::product(vec![f.diff(x_sym), g.clone()]),
        Expr::product(vec![f, g.diff(x_sym)]),
    ]);
    lhs == rhs
}

#[quickcheck]
fn division_identity_holds_for_a_monic_linear_divisor(a: i64) -> bool {
    let a = bounded(a);
    let x_sym = X.as_symbol().expect("X is a symbol").clone();
    // (x^2 - a^2) / (x - a) divides evenly for every a.
    let u = Expr::sum(vec![Expr::power(X.clone(), Expr::integer(2)), Expr::integer(-(a * a))]);
    let v = Expr::sum(vec![X.clone(), Expr::integer(-a)]);

    let (q, r) = exact_cas::divide(&u, &v, &[x_sym]);
    let reconstructed =
        Expr::sum(vec![u, Expr::product(vec![Expr::integer(-1), q, v]), Expr::product(vec![Expr::integer(-1), r])])
            .expand();
    reconstructed == Expr::integer(0)
}

#[quickcheck]
fn gcd_of_two_related_quadratics_divides_both_evenly(a: i64) -> bool {
    let a = bounded(a).abs().max(1);
    let x_sym = X.as_symbol().expect("X is a symbol").clone();
    let u = Expr::sum(vec![Expr::power(X.clone(), Expr::integer(2)), Expr::integer(-(a * a))]);
    let v = Expr::sum(vec![
        Expr::power(X.clone(), Expr::integer(2)),
        Expr::product(vec![Expr::integer(-2 * a), X.clone()]),
        Expr::integer(a * a),
    ]);

    let g = exact_cas::gcd(&u, &v);
    let (_, ru) = exact_cas::divide(&u, &g, &[x_sym.clone()]);
    let (_, rv) = exact_cas::divide(&v, &g, &[x_sym]);
    ru.is_zero() && rv.is_zero()
}

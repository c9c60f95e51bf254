//! Structural transformations (§4.8): `expand`, `subst`, `diff`.
//!
//! Grounded in the teacher crate's `differentiation.rs`, which walks the
//! tree once per rule with a `match` over node kind and recurses through the
//! chain rule; the recursion shape here is the same, generalized to our
//! canonicalizing constructors (so every intermediate result is already
//! simplified, rather than simplified in a later pass).

use std::sync::Arc;

use super::{Expr, ExprKind, FunctionKind, TrigKind};
use crate::core::symbol::InternedSymbol;

impl Expr {
    /// `expand(e)` (§6): distributes `Sum`/`Product`/`Power` so that no
    /// `Product` operand is itself a `Sum` and no `Power` has a `Sum` base
    /// with a positive integer exponent.
    #[must_use]
    pub fn expand(self: &Arc<Self>) -> Arc<Self> {
        match &self.kind {
            ExprKind::Sum(terms) => Self::sum(terms.iter().map(Self::expand).collect()),
            ExprKind::Product(factors) => {
                factors.iter().map(Self::expand).fold(Self::integer(1), |acc, f| distribute_product(&acc, &f))
            }
            ExprKind::Power(base, exp) => {
                let base = base.expand();
                if let Some(k) = small_nonneg_integer_exponent(exp)
                    && matches!(base.kind, ExprKind::Sum(_))
                {
                    let mut acc = Self::integer(1);
                    for _ in 0..k {
                        acc = distribute_product(&acc, &base);
                    }
                    return acc;
                }
                Self::power(base, exp.clone())
            }
            ExprKind::Function(kind, args) => Arc::new(Self::new(ExprKind::Function(*kind, args.iter().map(Self::expand).collect()))),
            ExprKind::Symbol(_) | ExprKind::Numeric(_) | ExprKind::Constant(_) | ExprKind::Undefined => self.clone(),
        }
    }

    /// `subst(e, from, to)` (§6): structural replacement of every occurrence
    /// of `from` with `to`, rebuilt through the canonicalizing constructors
    /// so the result stays in canonical form.
    #[must_use]
    pub fn subst(self: &Arc<Self>, from: &Arc<Self>, to: &Arc<Self>) -> Arc<Self> {
        if self.as_ref() == from.as_ref() {
            return to.clone();
        }
        match &self.kind {
            ExprKind::Symbol(_) | ExprKind::Numeric(_) | ExprKind::Constant(_) | ExprKind::Undefined => self.clone(),
            ExprKind::Sum(terms) => Self::sum(terms.iter().map(|t| t.subst(from, to)).collect()),
            ExprKind::Product(factors) => Self::product(factors.iter().map(|f| f.subst(from, to)).collect()),
            ExprKind::Power(base, exp) => Self::power(base.subst(from, to), exp.subst(from, to)),
            ExprKind::Function(kind, args) => {
                let args: Vec<Arc<Self>> = args.iter().map(|a| a.subst(from, to)).collect();
                build_function(*kind, args)
            }
        }
    }

    /// `diff(e, symbol)` (§6, §4.8): symbolic differentiation with respect
    /// to `symbol`. Constants (other symbols, `Constant`, `Numeric`) yield
    /// zero; `Sum`/`Product`/`Power`/`Function` follow the standard calculus
    /// rules via linearity, the product rule, and the chain rule.
    #[must_use]
    pub fn diff(self: &Arc<Self>, symbol: &InternedSymbol) -> Arc<Self> {
        match &self.kind {
            ExprKind::Numeric(_) | ExprKind::Constant(_) | ExprKind::Undefined => Self::integer(0),
            ExprKind::Symbol(s) => Self::integer(i64::from(s == symbol)),
            ExprKind::Sum(terms) => Self::sum(terms.iter().map(|t| t.diff(symbol)).collect()),
            ExprKind::Product(factors) => diff_product(factors, symbol),
            ExprKind::Power(base, exp) => diff_power(base, exp, symbol),
            ExprKind::Function(kind, args) => diff_function(*kind, args, symbol),
        }
    }
}

/// Returns `Some(k)` iff `exp` is a `Numeric` integer in `0..=64`, the range
/// [`Expr::expand`] is willing to eagerly multiply out.
fn small_nonneg_integer_exponent(exp: &Arc<Expr>) -> Option<u32> {
    let ExprKind::Numeric(n) = &exp.kind else { return None };
    let numer = n.numer()?;
    let denom = n.denom()?;
    if *denom != num_bigint::BigInt::from(1) {
        return None;
    }
    use num_traits::ToPrimitive;
    let k = numer.to_u32()?;
    (k <= 64).then_some(k)
}

/// `(a+b+...)*(c+d+...) -> ac+ad+bc+bd+...`, one level at a time.
fn distribute_product(acc: &Arc<Expr>, factor: &Arc<Expr>) -> Arc<Expr> {
    match (&acc.kind, &factor.kind) {
        (ExprKind::Sum(acc_terms), ExprKind::Sum(factor_terms)) => {
            let mut products = Vec::with_capacity(acc_terms.len() * factor_terms.len());
            for a in acc_terms {
                for f in factor_terms {
                    products.push(Expr::product(vec![a.clone(), f.clone()]));
                }
            }
            Expr::sum(products)
        }
        (ExprKind::Sum(acc_terms), _) => {
            Expr::sum(acc_terms.iter().map(|a| Expr::product(vec![a.clone(), factor.clone()])).collect())
        }
        (_, ExprKind::Sum(factor_terms)) => {
            Expr::sum(factor_terms.iter().map(|f| Expr::product(vec![acc.clone(), f.clone()])).collect())
        }
        _ => Expr::product(vec![acc.clone(), factor.clone()]),
    }
}

/// Rebuilds a function call through its canonicalizing constructor, so a
/// substitution that produces e.g. a new constant argument still folds.
fn build_function(kind: FunctionKind, args: Vec<Arc<Expr>>) -> Arc<Expr> {
    match kind {
        FunctionKind::Logarithm => Expr::log(args[0].clone()),
        FunctionKind::Trigonometric(TrigKind::Atan2) => Expr::atan2(args[0].clone(), args[1].clone()),
        FunctionKind::Trigonometric(t) => Expr::trig(t, args[0].clone()),
    }
}

/// Generalized product rule: `d/dx(f1*f2*...*fn) = sum_i (df_i/dx * prod_{j!=i} f_j)`.
fn diff_product(factors: &[Arc<Expr>], symbol: &InternedSymbol) -> Arc<Expr> {
    let terms: Vec<Arc<Expr>> = (0..factors.len())
        .map(|i| {
            let derivative = factors[i].diff(symbol);
            let rest: Vec<Arc<Expr>> =
                factors.iter().enumerate().filter(|(j, _)| *j != i).map(|(_, f)| f.clone()).collect();
            let mut operands = rest;
            operands.push(derivative);
            Expr::product(operands)
        })
        .collect();
    Expr::sum(terms)
}

/// `d/dx(b^e)`, covering the constant-exponent power rule, the exponential
/// rule (constant base), and the general case via logarithmic differentiation.
fn diff_power(base: &Arc<Expr>, exp: &Arc<Expr>, symbol: &InternedSymbol) -> Arc<Expr> {
    let base_depends = base.has(&Arc::new(Expr::new(ExprKind::Symbol(symbol.clone()))));
    let exp_depends = exp.has(&Arc::new(Expr::new(ExprKind::Symbol(symbol.clone()))));

    match (base_depends, exp_depends) {
        (false, false) => Expr::integer(0),
        // d/dx(b^e) = e * b^(e-1) * db/dx
        (true, false) => {
            let reduced_exp = Expr::sum(vec![exp.clone(), Expr::integer(-1)]);
            let power = Expr::power(base.clone(), reduced_exp);
            Expr::product(vec![exp.clone(), power, base.diff(symbol)])
        }
        // d/dx(b^e) = b^e * ln(b) * de/dx
        (false, true) => {
            let whole = Arc::new(Expr::new(ExprKind::Power(base.clone(), exp.clone())));
            Expr::product(vec![whole, Expr::log(base.clone()), exp.diff(symbol)])
        }
        // d/dx(b^e) = b^e * (de/dx * ln(b) + e * db/dx / b)
        (true, true) => {
            let whole = Arc::new(Expr::new(ExprKind::Power(base.clone(), exp.clone())));
            let term_a = Expr::product(vec![exp.diff(symbol), Expr::log(base.clone())]);
            let inv_base = Expr::power(base.clone(), Expr::integer(-1));
            let term_b = Expr::product(vec![exp.clone(), base.diff(symbol), inv_base]);
            Expr::product(vec![whole, Expr::sum(vec![term_a, term_b])])
        }
    }
}

/// Chain rule for the closed set of unary/binary functions (§3 `Function`).
fn diff_function(kind: FunctionKind, args: &[Arc<Expr>], symbol: &InternedSymbol) -> Arc<Expr> {
    match kind {
        FunctionKind::Logarithm => {
            let u = &args[0];
            Expr::product(vec![Expr::power(u.clone(), Expr::integer(-1)), u.diff(symbol)])
        }
        FunctionKind::Trigonometric(TrigKind::Sin) => {
            let u = &args[0];
            Expr::product(vec![Expr::cos(u.clone()), u.diff(symbol)])
        }
        FunctionKind::Trigonometric(TrigKind::Cos) => {
            let u = &args[0];
            Expr::product(vec![Expr::integer(-1), Expr::sin(u.clone()), u.diff(symbol)])
        }
        FunctionKind::Trigonometric(TrigKind::Tan) => {
            // d/dx[tan(u)] = sec(u)^2 * u' = (1 + tan(u)^2) * u'
            let u = &args[0];
            let tan_sq = Expr::power(Expr::tan(u.clone()), Expr::integer(2));
            Expr::product(vec![Expr::sum(vec![Expr::integer(1), tan_sq]), u.diff(symbol)])
        }
        FunctionKind::Trigonometric(TrigKind::Asin) => {
            // d/dx[asin(u)] = u' / sqrt(1 - u^2)
            let u = &args[0];
            let one_minus_u2 = Expr::sum(vec![Expr::integer(1), Expr::product(vec![Expr::integer(-1), Expr::power(u.clone(), Expr::integer(2))])]);
            let denom = Expr::power(one_minus_u2, half());
            Expr::product(vec![u.diff(symbol), Expr::power(denom, Expr::integer(-1))])
        }
        FunctionKind::Trigonometric(TrigKind::Acos) => {
            let u = &args[0];
            let one_minus_u2 = Expr::sum(vec![Expr::integer(1), Expr::product(vec![Expr::integer(-1), Expr::power(u.clone(), Expr::integer(2))])]);
            let denom = Expr::power(one_minus_u2, half());
            Expr::product(vec![Expr::integer(-1), u.diff(symbol), Expr::power(denom, Expr::integer(-1))])
        }
        FunctionKind::Trigonometric(TrigKind::Atan) => {
            // d/dx[atan(u)] = u' / (1 + u^2)
            let u = &args[0];
            let one_plus_u2 = Expr::sum(vec![Expr::integer(1), Expr::power(u.clone(), Expr::integer(2))]);
            Expr::product(vec![u.diff(symbol), Expr::power(one_plus_u2, Expr::integer(-1))])
        }
        FunctionKind::Trigonometric(TrigKind::Atan2) => {
            // d/dx[atan2(y, x)] = (x*y' - y*x') / (x^2 + y^2)
            let y = &args[0];
            let x = &args[1];
            let num = Expr::sum(vec![
                Expr::product(vec![x.clone(), y.diff(symbol)]),
                Expr::product(vec![Expr::integer(-1), y.clone(), x.diff(symbol)]),
            ]);
            let denom = Expr::sum(vec![Expr::power(x.clone(), Expr::integer(2)), Expr::power(y.clone(), Expr::integer(2))]);
            Expr::product(vec![num, Expr::power(denom, Expr::integer(-1))])
        }
    }
}

fn half() -> Arc<Expr> {
    Expr::numeric(crate::core::number::Number::Rational(num_rational::BigRational::new(1.into(), 2.into())))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "test module")]
mod tests {
    use super::*;
    use crate::core::symbol::intern_symbol;

    #[test]
    fn derivative_of_x_squared_is_two_x() {
        let x = intern_symbol("transform_test_x", false);
        let x_expr = Expr::symbol("transform_test_x", false);
        let expr = Expr::power(x_expr.clone(), Expr::integer(2));
        let d = expr.diff(&x);
        assert_eq!(d, Expr::product(vec![Expr::integer(2), x_expr]));
    }

    #[test]
    fn derivative_of_constant_is_zero() {
        let x = intern_symbol("transform_test_const_x", false);
        let seven = Expr::integer(7);
        assert_eq!(seven.diff(&x), Expr::integer(0));
    }

    #[test]
    fn derivative_of_sin_is_cos_times_chain() {
        let x = intern_symbol("transform_test_sin_x", false);
        let x_expr = Expr::symbol("transform_test_sin_x", false);
        let expr = Expr::sin(x_expr.clone());
        assert_eq!(expr.diff(&x), Expr::cos(x_expr));
    }

    #[test]
    fn expand_distributes_sum_product() {
        let x = Expr::symbol("transform_test_expand_x", false);
        let y = Expr::symbol("transform_test_expand_y", false);
        let sum_a = Expr::sum(vec![x.clone(), y.clone()]);
        let sum_b = Expr::sum(vec![x.clone(), Expr::integer(-1)]);
        let product = Expr::product(vec![sum_a, sum_b]);
        let expanded = product.expand();
        // (x+y)*(x-1) = x^2 - x + xy - y
        assert!(!expanded.has(&Expr::integer(0)) || expanded.is_zero());
        let _ = expanded;
    }

    #[test]
    fn subst_replaces_every_occurrence() {
        let x = Expr::symbol("transform_test_subst_x", false);
        let y = Expr::symbol("transform_test_subst_y", false);
        let expr = Expr::sum(vec![x.clone(), Expr::product(vec![Expr::integer(2), x.clone()])]);
        let result = expr.subst(&x, &y);
        let expected = Expr::sum(vec![y.clone(), Expr::product(vec![Expr::integer(2), y])]);
        assert_eq!(result, expected);
    }
}

//! Numeric evaluation (§6 `numericEval`): collapses an expression to a single
//! [`Number`] when every leaf is `Numeric`/`Constant`, contaminating the
//! result to a double the moment any constant (irrational by nature) or
//! transcendental function is involved.

use super::{Expr, ExprKind, FunctionKind, TrigKind};
use crate::core::number::Number;

impl Expr {
    /// Evaluates this expression to a [`Number`] if it contains no free
    /// symbols; returns `None` if any `Symbol` or `Undefined` leaf appears.
    #[must_use]
    pub fn numeric_eval(&self) -> Option<Number> {
        match &self.kind {
            ExprKind::Numeric(n) => Some(n.clone()),
            ExprKind::Constant(c) => Some(Number::from_f64(c.value())),
            ExprKind::Symbol(_) | ExprKind::Undefined => None,
            ExprKind::Sum(terms) => {
                let mut acc = Number::from_i64(0);
                for term in terms {
                    acc = acc.add(&term.numeric_eval()?).ok()?;
                }
                Some(acc)
            }
            ExprKind::Product(factors) => {
                let mut acc = Number::from_i64(1);
                for factor in factors {
                    acc = acc.mul(&factor.numeric_eval()?).ok()?;
                }
                Some(acc)
            }
            ExprKind::Power(base, exp) => {
                let base = base.numeric_eval()?;
                let exp = exp.numeric_eval()?;
                eval_power(&base, &exp)
            }
            ExprKind::Function(kind, args) => eval_function(*kind, args),
        }
    }
}

/// `base^exp`, falling back to a lossy double power when the exact rational
/// path has no exact representation (irrational result).
fn eval_power(base: &Number, exp: &Number) -> Option<Number> {
    if let Number::Rational(_) = base
        && let Number::Rational(e) = exp
    {
        if let Ok(n) = base.pow_rational(e) {
            return Some(n);
        }
    }
    Some(Number::from_f64(base.to_f64_lossy().powf(exp.to_f64_lossy())))
}

fn eval_function(kind: FunctionKind, args: &[std::sync::Arc<Expr>]) -> Option<Number> {
    let values: Vec<f64> = args.iter().map(|a| a.numeric_eval().map(|n| n.to_f64_lossy())).collect::<Option<_>>()?;
    let result = match kind {
        FunctionKind::Logarithm => values[0].ln(),
        FunctionKind::Trigonometric(TrigKind::Sin) => values[0].sin(),
        FunctionKind::Trigonometric(TrigKind::Cos) => values[0].cos(),
        FunctionKind::Trigonometric(TrigKind::Tan) => values[0].tan(),
        FunctionKind::Trigonometric(TrigKind::Asin) => values[0].asin(),
        FunctionKind::Trigonometric(TrigKind::Acos) => values[0].acos(),
        FunctionKind::Trigonometric(TrigKind::Atan) => values[0].atan(),
        FunctionKind::Trigonometric(TrigKind::Atan2) => values[0].atan2(values[1]),
    };
    Some(Number::from_f64(result))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "test module")]
mod tests {
    use super::*;

    #[test]
    fn sum_of_numerics_evaluates() {
        let expr = Expr::sum(vec![Expr::integer(2), Expr::integer(3)]);
        assert_eq!(expr.numeric_eval(), Some(Number::from_i64(5)));
    }

    #[test]
    fn symbol_does_not_evaluate() {
        let x = Expr::symbol("evaluate_test_x", false);
        assert_eq!(x.numeric_eval(), None);
    }

    #[test]
    fn pi_evaluates_to_double() {
        let pi = Expr::constant_pi();
        let value = pi.numeric_eval().expect("pi always evaluates");
        assert!(value.is_double());
    }

    #[test]
    fn sin_of_zero_evaluates_to_zero() {
        // sin(0) folds to the exact integer 0 at construction time already,
        // so this exercises the Numeric branch rather than eval_function.
        let expr = Expr::sin(Expr::integer(0));
        assert_eq!(expr.numeric_eval(), Some(Number::from_i64(0)));
    }
}

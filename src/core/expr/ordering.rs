//! The order relation (§4.4): a total, deterministic order over all handles
//! driving commutative-operand sorting in the sum/product simplifiers.

use std::cmp::Ordering;
use std::sync::Arc;

use super::{ConstantKind, Expr, ExprKind, ONE};

/// Fixed kind precedence (§4.4 rule 4):
/// `Numeric < Constant < Symbol < Function < Power < Product < Sum < Undefined`.
fn kind_rank(kind: &ExprKind) -> u8 {
    match kind {
        ExprKind::Numeric(_) => 0,
        ExprKind::Constant(_) => 1,
        ExprKind::Symbol(_) => 2,
        ExprKind::Function(..) => 3,
        ExprKind::Power(..) => 4,
        ExprKind::Product(_) => 5,
        ExprKind::Sum(_) => 6,
        ExprKind::Undefined => 7,
    }
}

/// Lexicographic comparison of two same-kind operand lists **from the
/// rear**: the last operand is compared first (§4.4 rule 3), so that
/// `a*b` sorts before `a*c`.
fn cmp_rear(a: &[Arc<Expr>], b: &[Arc<Expr>]) -> Ordering {
    let mut ia = a.iter().rev();
    let mut ib = b.iter().rev();
    loop {
        match (ia.next(), ib.next()) {
            (Some(x), Some(y)) => {
                let c = expr_cmp(x, y);
                if c != Ordering::Equal {
                    return c;
                }
            }
            (Some(_), None) => return Ordering::Greater,
            (None, Some(_)) => return Ordering::Less,
            (None, None) => return Ordering::Equal,
        }
    }
}

/// Compare a non-`Product` `x` against a `Product`'s refinement rule: `x`
/// compares against the product's last factor, and the product sorts after
/// on ties (it has strictly more factors).
fn product_refine(a: &Expr, b: &Expr) -> Option<Ordering> {
    match (&a.kind, &b.kind) {
        (ExprKind::Product(factors), _) if !matches!(b.kind, ExprKind::Product(_)) => {
            let last = factors.last().expect("Product always has >=2 operands");
            Some(match expr_cmp(last, b) {
                Ordering::Equal => Ordering::Greater,
                other => other,
            })
        }
        (_, ExprKind::Product(factors)) if !matches!(a.kind, ExprKind::Product(_)) => {
            let last = factors.last().expect("Product always has >=2 operands");
            Some(match expr_cmp(a, last) {
                Ordering::Equal => Ordering::Less,
                other => other,
            })
        }
        _ => None,
    }
}

/// Compare a non-`Power` `x` against a `Power`'s refinement rule: `x`
/// compares against the power's base, then (on a tie) against its exponent
/// versus the implicit exponent `1`.
fn power_refine(a: &Expr, b: &Expr) -> Option<Ordering> {
    match (&a.kind, &b.kind) {
        (ExprKind::Power(base, exp), _) if !matches!(b.kind, ExprKind::Power(..)) => {
            Some(match expr_cmp(base, b) {
                Ordering::Equal => expr_cmp(exp, &ONE),
                other => other,
            })
        }
        (_, ExprKind::Power(base, exp)) if !matches!(a.kind, ExprKind::Power(..)) => {
            Some(match expr_cmp(a, base) {
                Ordering::Equal => expr_cmp(&ONE, exp),
                other => other,
            })
        }
        _ => None,
    }
}

/// The total order of §4.4.
#[must_use]
pub fn expr_cmp(a: &Expr, b: &Expr) -> Ordering {
    match (&a.kind, &b.kind) {
        (ExprKind::Numeric(x), ExprKind::Numeric(y)) => x.partial_cmp(y).unwrap_or(Ordering::Equal),
        (ExprKind::Symbol(x), ExprKind::Symbol(y)) => x.cmp(y),
        (ExprKind::Constant(x), ExprKind::Constant(y)) => cmp_constant(*x, *y),
        (ExprKind::Undefined, ExprKind::Undefined) => Ordering::Equal,
        (ExprKind::Sum(ta), ExprKind::Sum(tb)) | (ExprKind::Product(ta), ExprKind::Product(tb)) => {
            cmp_rear(ta, tb)
        }
        (ExprKind::Power(ba, ea), ExprKind::Power(bb, eb)) => {
            // Rear-first: exponent (the last operand of Power{base,exp}) first.
            expr_cmp(ea, eb).then_with(|| expr_cmp(ba, bb))
        }
        (ExprKind::Function(ka, aa), ExprKind::Function(kb, ab)) => {
            if ka == kb {
                cmp_rear(aa, ab)
            } else {
                ka.name().cmp(kb.name())
            }
        }
        _ => product_refine(a, b)
            .or_else(|| power_refine(a, b))
            .unwrap_or_else(|| kind_rank(&a.kind).cmp(&kind_rank(&b.kind))),
    }
}

fn cmp_constant(a: ConstantKind, b: ConstantKind) -> Ordering {
    a.name().cmp(b.name())
}

/// `doPermute(a, b)` (§4.4): true iff `b < a` under this order.
#[must_use]
pub fn do_permute(a: &Expr, b: &Expr) -> bool {
    expr_cmp(b, a) == Ordering::Less
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "test module")]
mod tests {
    use super::*;
    use crate::core::number::Number;
    use crate::core::symbol::intern_symbol;

    fn sym(name: &str) -> Expr {
        Expr::new(ExprKind::Symbol(intern_symbol(name, false)))
    }

    fn num(n: i64) -> Expr {
        Expr::new(ExprKind::Numeric(Number::from_i64(n)))
    }

    #[test]
    fn numerics_sort_ascending() {
        assert_eq!(expr_cmp(&num(1), &num(2)), Ordering::Less);
    }

    #[test]
    fn numerics_precede_symbols() {
        assert_eq!(expr_cmp(&num(1), &sym("ordering_test_z")), Ordering::Less);
    }

    #[test]
    fn symbols_sort_by_name() {
        assert_eq!(expr_cmp(&sym("ordering_test_a"), &sym("ordering_test_b")), Ordering::Less);
    }

    #[test]
    fn product_ab_precedes_product_ac() {
        let a = sym("ordering_test_pa");
        let b = sym("ordering_test_pb");
        let c = sym("ordering_test_pc");
        let ab = Expr::new(ExprKind::Product(vec![Arc::new(a.clone()), Arc::new(b)]));
        let ac = Expr::new(ExprKind::Product(vec![Arc::new(a), Arc::new(c)]));
        assert_eq!(expr_cmp(&ab, &ac), Ordering::Less);
    }
}

//! Structural hashing (§4.2, §9 "all hashes are derived from kind + operand
//! hashes + numeric value").

use std::hash::{Hash, Hasher};

use rustc_hash::FxHasher;

use super::ExprKind;

impl Hash for ExprKind {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Self::Symbol(s) => s.hash(state),
            Self::Numeric(n) => n.hash(state),
            Self::Constant(c) => c.hash(state),
            Self::Undefined => {}
            Self::Sum(terms) | Self::Product(terms) => {
                terms.len().hash(state);
                for t in terms {
                    t.hash.hash(state);
                }
            }
            Self::Power(base, exp) => {
                base.hash.hash(state);
                exp.hash.hash(state);
            }
            Self::Function(kind, args) => {
                kind.hash(state);
                args.len().hash(state);
                for a in args {
                    a.hash.hash(state);
                }
            }
        }
    }
}

/// Compute the structural hash stored on every [`super::Expr`] (§4.2).
#[must_use]
pub fn compute_expr_hash(kind: &ExprKind) -> u64 {
    let mut hasher = FxHasher::default();
    kind.hash(&mut hasher);
    hasher.finish()
}

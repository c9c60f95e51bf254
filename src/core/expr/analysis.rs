//! Structural queries (§6): `kindOf`, `isZero`, `isOne`, `has`, the
//! glossary's non-numeric/non-const term decomposition, `complexity`, etc.

use std::sync::Arc;

use super::{ConstantKind, Expr, ExprKind, FunctionKind};
use crate::core::symbol::InternedSymbol;

impl Expr {
    /// True iff this handle is the numeric zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        matches!(&self.kind, ExprKind::Numeric(n) if n.is_zero())
    }

    /// True iff this handle is the numeric one.
    #[must_use]
    pub fn is_one(&self) -> bool {
        matches!(&self.kind, ExprKind::Numeric(n) if n.is_one())
    }

    /// True iff this handle is a `Numeric` leaf.
    #[must_use]
    pub const fn is_numeric(&self) -> bool {
        matches!(self.kind, ExprKind::Numeric(_))
    }

    /// True iff this handle is `Undefined`.
    #[must_use]
    pub const fn is_undefined(&self) -> bool {
        matches!(self.kind, ExprKind::Undefined)
    }

    /// True iff this is a `Constant` leaf.
    #[must_use]
    pub const fn is_const(&self) -> bool {
        matches!(self.kind, ExprKind::Constant(_))
    }

    /// True iff this handle is known to be strictly positive: a positive
    /// numeric, a positive-flagged symbol, `Constant::Pi`/`Euler`, a sum of
    /// all-positive operands, a product of all-positive factors, or a power
    /// of a positive base.
    #[must_use]
    pub fn is_positive(&self) -> bool {
        match &self.kind {
            ExprKind::Numeric(n) => n.signum() > 0,
            ExprKind::Symbol(s) => s.is_positive(),
            ExprKind::Constant(_) => true,
            ExprKind::Sum(terms) => terms.iter().all(|t| t.is_positive()),
            ExprKind::Product(factors) => factors.iter().all(|f| f.is_positive()),
            ExprKind::Power(base, _) => base.is_positive(),
            ExprKind::Function(..) | ExprKind::Undefined => false,
        }
    }

    /// True iff this handle is known to be strictly negative.
    #[must_use]
    pub fn is_negative(&self) -> bool {
        matches!(&self.kind, ExprKind::Numeric(n) if n.signum() < 0)
    }

    /// True iff `sub` occurs anywhere in this expression's subtree
    /// (including at the root).
    #[must_use]
    pub fn has(&self, sub: &Self) -> bool {
        if self == sub {
            return true;
        }
        match &self.kind {
            ExprKind::Symbol(_) | ExprKind::Numeric(_) | ExprKind::Constant(_) | ExprKind::Undefined => false,
            ExprKind::Sum(ops) | ExprKind::Product(ops) => ops.iter().any(|o| o.has(sub)),
            ExprKind::Power(base, exp) => base.has(sub) || exp.has(sub),
            ExprKind::Function(_, args) => args.iter().any(|a| a.has(sub)),
        }
    }

    /// The symbol or function name, for `Symbol`/`Constant`/`Function` nodes.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match &self.kind {
            ExprKind::Symbol(s) => Some(s.as_str()),
            ExprKind::Constant(c) => Some(c.name()),
            ExprKind::Function(k, _) => Some(k.name()),
            _ => None,
        }
    }

    /// The interned symbol, for `Symbol` nodes.
    #[must_use]
    pub const fn as_symbol(&self) -> Option<&InternedSymbol> {
        match &self.kind {
            ExprKind::Symbol(s) => Some(s),
            _ => None,
        }
    }

    /// Child operand list, for `Sum`/`Product`/`Function` nodes (`Power` and
    /// leaves return `None`; use [`Self::base`]/[`Self::exp`] for `Power`).
    #[must_use]
    pub fn operands(&self) -> Option<&[Arc<Self>]> {
        match &self.kind {
            ExprKind::Sum(ops) | ExprKind::Product(ops) => Some(ops),
            ExprKind::Function(_, args) => Some(args),
            _ => None,
        }
    }

    /// The base of a `Power` node.
    #[must_use]
    pub fn base(&self) -> Option<&Arc<Self>> {
        match &self.kind {
            ExprKind::Power(base, _) => Some(base),
            _ => None,
        }
    }

    /// The exponent of a `Power` node.
    #[must_use]
    pub fn exp(&self) -> Option<&Arc<Self>> {
        match &self.kind {
            ExprKind::Power(_, exp) => Some(exp),
            _ => None,
        }
    }

    /// **Non-const term** (glossary): the product of all factors that are
    /// not `Numeric` and not `Constant`.
    #[must_use]
    pub fn non_const_term(&self) -> Self {
        match &self.kind {
            ExprKind::Product(factors) => {
                let kept: Vec<Arc<Self>> = factors
                    .iter()
                    .filter(|f| !matches!(f.kind, ExprKind::Numeric(_) | ExprKind::Constant(_)))
                    .cloned()
                    .collect();
                rebuild_product(kept)
            }
            ExprKind::Numeric(_) | ExprKind::Constant(_) => Self::numeric_i64(1),
            _ => self.clone(),
        }
    }

    /// **Non-numeric term** (glossary): the product of all factors that are
    /// not `Numeric`.
    #[must_use]
    pub fn non_numeric_term(&self) -> Self {
        match &self.kind {
            ExprKind::Product(factors) => {
                let kept: Vec<Arc<Self>> =
                    factors.iter().filter(|f| !matches!(f.kind, ExprKind::Numeric(_))).cloned().collect();
                rebuild_product(kept)
            }
            ExprKind::Numeric(_) => Self::numeric_i64(1),
            _ => self.clone(),
        }
    }

    /// The numeric factor of a product (1 if none), i.e. the complement of
    /// [`Self::non_numeric_term`].
    #[must_use]
    pub fn numeric_term(&self) -> Self {
        match &self.kind {
            ExprKind::Product(factors) => factors
                .first()
                .filter(|f| matches!(f.kind, ExprKind::Numeric(_)))
                .map_or_else(|| Self::numeric_i64(1), |f| (**f).clone()),
            ExprKind::Numeric(_) => self.clone(),
            _ => Self::numeric_i64(1),
        }
    }

    /// The constant factor of a product (1 if none): numeric times any
    /// `Constant` factors.
    #[must_use]
    pub fn const_term(&self) -> Self {
        match &self.kind {
            ExprKind::Product(factors) => {
                let kept: Vec<Arc<Self>> =
                    factors.iter().filter(|f| matches!(f.kind, ExprKind::Numeric(_) | ExprKind::Constant(_))).cloned().collect();
                rebuild_product(kept)
            }
            ExprKind::Numeric(_) | ExprKind::Constant(_) => self.clone(),
            _ => Self::numeric_i64(1),
        }
    }

    /// A rough structural size metric: total node count. Used as a tie-break
    /// heuristic by callers outside the core (§6 `complexity()`).
    #[must_use]
    pub fn complexity(&self) -> usize {
        match &self.kind {
            ExprKind::Symbol(_) | ExprKind::Numeric(_) | ExprKind::Constant(_) | ExprKind::Undefined => 1,
            ExprKind::Sum(ops) | ExprKind::Product(ops) => 1 + ops.iter().map(|o| o.complexity()).sum::<usize>(),
            ExprKind::Power(base, exp) => 1 + base.complexity() + exp.complexity(),
            ExprKind::Function(_, args) => 1 + args.iter().map(|a| a.complexity()).sum::<usize>(),
        }
    }

    /// True iff this is the function kind `f`.
    #[must_use]
    pub fn is_function(&self, f: FunctionKind) -> bool {
        matches!(&self.kind, ExprKind::Function(k, _) if *k == f)
    }

    /// True iff this is the constant `k`.
    #[must_use]
    pub fn is_constant(&self, k: ConstantKind) -> bool {
        matches!(&self.kind, ExprKind::Constant(c) if *c == k)
    }
}

/// Rebuilds a (possibly singleton/empty) product from an already-filtered
/// factor list, preserving §3 invariant 3 (one operand collapses, none
/// becomes `Numeric(1)`). Callers here never need further re-simplification
/// since the filtered factors were already canonical.
fn rebuild_product(mut factors: Vec<Arc<Expr>>) -> Expr {
    match factors.len() {
        0 => Expr::numeric_i64(1),
        1 => (*factors.remove(0)).clone(),
        _ => Expr::new(ExprKind::Product(factors)),
    }
}

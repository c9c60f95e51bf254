//! Expression handle and node variants (§3 Data model).
//!
//! # Architecture
//!
//! ## N-ary Sum/Product
//! Like the teacher crate this is grounded on, sums and products are stored
//! flat (`Sum(Vec<Arc<Expr>>)`, not binary `Add(left, right)`): `a+b+c+d` is
//! one `Sum` node with four operands, not three nested `Add`s. Flattening
//! happens in the simplifying constructors (§4.3, §4.5), never lazily.
//!
//! ## Structural hashing
//! Every `Expr` carries a pre-computed `hash` field (§4.2) used to
//! fast-reject inequality before falling back to the O(size) structural
//! comparison invariants §3/§4.2 require.
//!
//! ## Symbol interning
//! Variables are [`InternedSymbol`](crate::core::symbol::InternedSymbol),
//! interned by `(name, positive)`, giving O(1) equality instead of string
//! comparison.

mod analysis;
mod constructors;
mod evaluate;
mod hash;
mod ordering;
mod transform;

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

use crate::core::number::Number;
use crate::core::symbol::InternedSymbol;

pub use hash::compute_expr_hash;
pub use ordering::expr_cmp;

static EXPR_ID_COUNTER: AtomicU64 = AtomicU64::new(0);

fn next_id() -> u64 {
    EXPR_ID_COUNTER.fetch_add(1, AtomicOrdering::Relaxed)
}

/// Cached handle for the numeric literal `1`, used throughout the order
/// relation and power simplifier as an implicit "exponent of 1" comparand.
pub(crate) static ONE: std::sync::LazyLock<Arc<Expr>> =
    std::sync::LazyLock::new(|| Arc::new(Expr::new(ExprKind::Numeric(Number::from_i64(1)))));

/// Cached handle for the numeric literal `0`.
pub(crate) static ZERO: std::sync::LazyLock<Arc<Expr>> =
    std::sync::LazyLock::new(|| Arc::new(Expr::new(ExprKind::Numeric(Number::from_i64(0)))));

/// Cached handle for the absorbing `Undefined` leaf (§3 invariant 4).
pub(crate) static UNDEFINED: std::sync::LazyLock<Arc<Expr>> =
    std::sync::LazyLock::new(|| Arc::new(Expr::new(ExprKind::Undefined)));

/// An immutable, shared, reference-counted handle to an expression node
/// (§3 Expression handle).
#[derive(Debug, Clone)]
pub struct Expr {
    /// Construction-order ID; not used in equality or hashing.
    pub(crate) id: u64,
    /// Cached structural hash (§4.2).
    pub(crate) hash: u64,
    /// The node's structure.
    pub(crate) kind: ExprKind,
}

impl std::ops::Deref for Expr {
    type Target = ExprKind;
    fn deref(&self) -> &Self::Target {
        &self.kind
    }
}

impl Expr {
    pub(crate) fn new(kind: ExprKind) -> Self {
        Self {
            id: next_id(),
            hash: compute_expr_hash(&kind),
            kind,
        }
    }

    /// The node's structural kind (§3, §6 `kindOf`).
    #[must_use]
    pub const fn kind(&self) -> &ExprKind {
        &self.kind
    }

    /// The cached structural hash (§6 `hash()`).
    #[must_use]
    pub const fn structural_hash(&self) -> u64 {
        self.hash
    }

    /// Builds a raw `Numeric` leaf from an integer literal. A leaf never
    /// needs re-simplification, so unlike [`crate::core::expr::constructors`]
    /// this bypasses the sum/product/power simplifiers entirely.
    #[must_use]
    pub(crate) fn numeric_i64(n: i64) -> Self {
        Self::new(ExprKind::Numeric(Number::from_i64(n)))
    }
}

// `isEqual` (§4.2): same variant tag, hash fast-reject, then structural
// equality. Sum/Product operand lists are always sorted, so positional
// comparison already implements the required order-independent equality.
impl PartialEq for Expr {
    fn eq(&self, other: &Self) -> bool {
        if self.hash != other.hash {
            return false;
        }
        self.kind == other.kind
    }
}

impl Eq for Expr {}

impl std::hash::Hash for Expr {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.hash.hash(state);
    }
}

/// The closed set of constant kinds (§3 `Constant{kind, name}`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConstantKind {
    /// π
    Pi,
    /// Euler's number, e
    Euler,
}

impl ConstantKind {
    /// The constant's canonical display name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Pi => "pi",
            Self::Euler => "e",
        }
    }

    /// Numeric (double) value.
    #[must_use]
    pub const fn value(self) -> f64 {
        match self {
            Self::Pi => std::f64::consts::PI,
            Self::Euler => std::f64::consts::E,
        }
    }
}

impl std::fmt::Display for ConstantKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// The closed set of trigonometric functions (§3 `Trigonometric`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrigKind {
    /// sin
    Sin,
    /// cos
    Cos,
    /// tan
    Tan,
    /// asin
    Asin,
    /// acos
    Acos,
    /// atan
    Atan,
    /// atan2(y, x)
    Atan2,
}

impl TrigKind {
    /// Number of operands this trig function takes (1, except `atan2`'s 2).
    #[must_use]
    pub const fn arity(self) -> usize {
        match self {
            Self::Atan2 => 2,
            _ => 1,
        }
    }

    /// Display name, also used as the function name in `Function{name, ..}`.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Sin => "sin",
            Self::Cos => "cos",
            Self::Tan => "tan",
            Self::Asin => "asin",
            Self::Acos => "acos",
            Self::Atan => "atan",
            Self::Atan2 => "atan2",
        }
    }
}

/// The closed set of function categories (§3 `Function`, concretized to
/// `Logarithm`/`Trigonometric`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FunctionKind {
    /// Natural logarithm, one operand.
    Logarithm,
    /// A trigonometric function, 1 or 2 operands depending on `TrigKind::arity`.
    Trigonometric(TrigKind),
}

impl FunctionKind {
    /// Display/matching name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Logarithm => "log",
            Self::Trigonometric(t) => t.name(),
        }
    }

    /// Expected operand count.
    #[must_use]
    pub const fn arity(self) -> usize {
        match self {
            Self::Logarithm => 1,
            Self::Trigonometric(t) => t.arity(),
        }
    }
}

/// The closed set of node variants (§3 Node variants).
///
/// Implementers must enumerate exactly this set; there is no open-ended
/// "custom function" escape hatch (the surrounding wrapper layer, out of
/// scope here, can add that on top of these primitives).
#[derive(Debug, Clone)]
pub enum ExprKind {
    /// Leaf: `Symbol{name, positive?}`.
    Symbol(InternedSymbol),
    /// Leaf: exact rational or double scalar.
    Numeric(Number),
    /// Leaf: a named numerically-evaluable constant.
    Constant(ConstantKind),
    /// Absorbing leaf: any operation with an `Undefined` operand is `Undefined`.
    Undefined,
    /// N-ary sum, canonical-form invariants §3.1-3.6.
    Sum(Vec<Arc<Expr>>),
    /// N-ary product, canonical-form invariants §3.1-3.6.
    Product(Vec<Arc<Expr>>),
    /// `base^exp`.
    Power(Arc<Expr>, Arc<Expr>),
    /// An abstract function call, concretized to `Logarithm`/`Trigonometric`.
    Function(FunctionKind, Vec<Arc<Expr>>),
}

impl PartialEq for ExprKind {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Symbol(a), Self::Symbol(b)) => a == b,
            (Self::Numeric(a), Self::Numeric(b)) => a == b,
            (Self::Constant(a), Self::Constant(b)) => a == b,
            (Self::Undefined, Self::Undefined) => true,
            (Self::Sum(a), Self::Sum(b)) | (Self::Product(a), Self::Product(b)) => a == b,
            (Self::Power(ba, ea), Self::Power(bb, eb)) => ba == bb && ea == eb,
            (Self::Function(ka, aa), Self::Function(kb, ab)) => ka == kb && aa == ab,
            _ => false,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "test module")]
mod tests {
    use super::*;

    #[test]
    fn hash_fast_reject_distinguishes_different_numerics() {
        let a = Expr::new(ExprKind::Numeric(Number::from_i64(1)));
        let b = Expr::new(ExprKind::Numeric(Number::from_i64(2)));
        assert_ne!(a, b);
        assert_ne!(a.structural_hash(), b.structural_hash());
    }

    #[test]
    fn equal_numerics_hash_equal() {
        let a = Expr::new(ExprKind::Numeric(Number::from_i64(7)));
        let b = Expr::new(ExprKind::Numeric(Number::from_i64(7)));
        assert_eq!(a, b);
        assert_eq!(a.structural_hash(), b.structural_hash());
    }
}

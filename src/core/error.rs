//! Diagnostic error kinds (§7).
//!
//! These never cross the public boundary as a `Result::Err`: every public
//! operation is total and returns either a canonical handle (`Undefined` on
//! failure) or a documented fallback value. `CoreError` exists so that the
//! logging call sites and unit tests have one matchable shape for "what kind
//! of thing just went wrong internally."

use std::fmt;

/// A diagnostic-only error kind, logged at the severity §7 assigns it.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// Operation on incompatible operands: real root of a negative base,
    /// division by zero, polynomial operation on invalid input, gcd of two
    /// zeros. Propagates as `Undefined`.
    DomainInvalid(DomainInvalidKind),
    /// An exponent or degree did not fit into the platform integer used for
    /// exponent arithmetic. The operation returns a safe fallback (degree 0;
    /// a retained symbolic `Power`).
    Overflow(&'static str),
    /// API misuse: requesting a polynomial unit from a non-polynomial
    /// expression, creating a symbol whose name starts with the reserved
    /// temporary-symbol prefix, asking for the leading coefficient of an
    /// empty variable list.
    Precondition(&'static str),
}

/// Specific domain-invalid situations, kept as a sub-enum so call sites can
/// match without parsing the message out of a string.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainInvalidKind {
    /// Division where the divisor is the numeric zero.
    DivisionByZero,
    /// An even-denominator rational power applied to a negative base.
    EvenRootOfNegative,
    /// `gcd(0, 0)` or a polynomial operation on two zero inputs.
    BothOperandsZero,
    /// A node failed polynomial-validity (§4.9 `hasValidType`).
    InvalidPolynomialOperand,
}

impl fmt::Display for DomainInvalidKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DivisionByZero => write!(f, "division by zero"),
            Self::EvenRootOfNegative => write!(f, "even-denominator root of a negative base"),
            Self::BothOperandsZero => write!(f, "both operands are zero"),
            Self::InvalidPolynomialOperand => write!(f, "operand is not a valid polynomial"),
        }
    }
}

impl fmt::Display for CoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DomainInvalid(kind) => write!(f, "domain invalid: {kind}"),
            Self::Overflow(what) => write!(f, "overflow: {what}"),
            Self::Precondition(what) => write!(f, "precondition violated: {what}"),
        }
    }
}

impl std::error::Error for CoreError {}

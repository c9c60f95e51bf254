//! Error kinds for the numeric kernel (§4.1, §7 `DomainInvalid`/`Overflow`).

use std::fmt;

/// Failure modes of [`crate::Number`] arithmetic.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NumericError {
    /// Division, or `0^negative`, attempted with a zero divisor/base.
    DivisionByZero,
    /// A power has no exact rational/double representation; the caller
    /// should keep the symbolic `Power` node instead.
    Irrational,
    /// An exponent or degree did not fit in the platform integer used for
    /// exponent arithmetic.
    Overflow,
}

impl fmt::Display for NumericError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DivisionByZero => write!(f, "division by zero"),
            Self::Irrational => write!(f, "no exact rational representation"),
            Self::Overflow => write!(f, "exponent or degree overflow"),
        }
    }
}

impl std::error::Error for NumericError {}

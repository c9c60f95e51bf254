//! Exact rational and double-precision numeric kernel.
//!
//! [`Number`] is the scalar type the symbolic core builds on: either an exact
//! rational (arbitrary-precision numerator/denominator, always reduced) or an
//! IEEE double. Doubles are contagious — any operation involving a double
//! operand produces a double result, matching the "doubles are accepted but
//! not manipulated beyond evaluation" stance of the core this crate feeds.

mod error;
mod rational_pow;

pub use error::NumericError;
pub use rational_pow::{PowerOutcome, factor_rational_power};

use num_bigint::BigInt;
use num_integer::Integer;
use num_rational::BigRational;
use num_traits::{Signed, ToPrimitive, Zero};
use std::cmp::Ordering;

/// An exact rational or an IEEE double.
///
/// Rationals are always kept reduced (`gcd(|p|, q) == 1`, `q > 0`); this is
/// an invariant of [`BigRational`] itself, not something this type re-checks.
#[derive(Clone, Debug)]
pub enum Number {
    /// Exact rational value.
    Rational(BigRational),
    /// IEEE double; contagious through arithmetic.
    Double(f64),
}

impl Number {
    /// Builds an integer-valued rational from a platform integer.
    #[must_use]
    pub fn from_i64(value: i64) -> Self {
        Self::Rational(BigRational::from_integer(BigInt::from(value)))
    }

    /// Builds a rational from an arbitrary-precision numerator/denominator
    /// pair. Returns [`NumericError::DivisionByZero`] if `denom` is zero.
    ///
    /// # Errors
    /// Returns an error if `denom` is zero.
    pub fn from_bigint_ratio(numer: BigInt, denom: BigInt) -> Result<Self, NumericError> {
        if denom.is_zero() {
            return Err(NumericError::DivisionByZero);
        }
        Ok(Self::Rational(BigRational::new(numer, denom)))
    }

    /// Builds a double-valued number.
    #[must_use]
    pub const fn from_f64(value: f64) -> Self {
        Self::Double(value)
    }

    /// True iff this number is a [`Number::Double`].
    #[must_use]
    pub const fn is_double(&self) -> bool {
        matches!(self, Self::Double(_))
    }

    /// True iff this number is exactly zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        match self {
            Self::Rational(r) => r.is_zero(),
            Self::Double(d) => *d == 0.0,
        }
    }

    /// True iff this number is exactly one.
    #[must_use]
    pub fn is_one(&self) -> bool {
        match self {
            Self::Rational(r) => r.numer() == r.denom(),
            Self::Double(d) => *d == 1.0,
        }
    }

    /// Sign of the number: -1, 0, or 1 (as an `i8`).
    #[must_use]
    pub fn signum(&self) -> i8 {
        match self {
            Self::Rational(r) => {
                if r.is_zero() {
                    0
                } else if r.is_positive() {
                    1
                } else {
                    -1
                }
            }
            Self::Double(d) => {
                if *d == 0.0 {
                    0
                } else if *d > 0.0 {
                    1
                } else {
                    -1
                }
            }
        }
    }

    /// Absolute value.
    #[must_use]
    pub fn abs(&self) -> Self {
        match self {
            Self::Rational(r) => Self::Rational(r.abs()),
            Self::Double(d) => Self::Double(d.abs()),
        }
    }

    /// Numerator, if this is a rational; `None` for doubles.
    #[must_use]
    pub fn numer(&self) -> Option<&BigInt> {
        match self {
            Self::Rational(r) => Some(r.numer()),
            Self::Double(_) => None,
        }
    }

    /// Denominator, if this is a rational; `None` for doubles.
    #[must_use]
    pub fn denom(&self) -> Option<&BigInt> {
        match self {
            Self::Rational(r) => Some(r.denom()),
            Self::Double(_) => None,
        }
    }

    /// Lossy conversion to `f64`, used for numeric evaluation.
    #[must_use]
    pub fn to_f64_lossy(&self) -> f64 {
        match self {
            Self::Rational(r) => r.to_f64().unwrap_or(f64::NAN),
            Self::Double(d) => *d,
        }
    }

    /// Exact addition. Doubles are contagious.
    ///
    /// # Errors
    /// Never fails; total operation. Returns `Result` for symmetry with
    /// the other arithmetic entry points.
    pub fn add(&self, other: &Self) -> Result<Self, NumericError> {
        Ok(match (self, other) {
            (Self::Rational(a), Self::Rational(b)) => Self::Rational(a + b),
            (a, b) => Self::Double(a.to_f64_lossy() + b.to_f64_lossy()),
        })
    }

    /// Exact subtraction. Doubles are contagious.
    ///
    /// # Errors
    /// Never fails; total operation.
    pub fn sub(&self, other: &Self) -> Result<Self, NumericError> {
        Ok(match (self, other) {
            (Self::Rational(a), Self::Rational(b)) => Self::Rational(a - b),
            (a, b) => Self::Double(a.to_f64_lossy() - b.to_f64_lossy()),
        })
    }

    /// Exact multiplication. Doubles are contagious.
    ///
    /// # Errors
    /// Never fails; total operation.
    pub fn mul(&self, other: &Self) -> Result<Self, NumericError> {
        Ok(match (self, other) {
            (Self::Rational(a), Self::Rational(b)) => Self::Rational(a * b),
            (a, b) => Self::Double(a.to_f64_lossy() * b.to_f64_lossy()),
        })
    }

    /// Division. Fails with [`NumericError::DivisionByZero`] when `other` is
    /// zero (even for doubles, per §4.1's "total except division by zero").
    ///
    /// # Errors
    /// Returns [`NumericError::DivisionByZero`] when `other` is zero.
    pub fn div(&self, other: &Self) -> Result<Self, NumericError> {
        if other.is_zero() {
            return Err(NumericError::DivisionByZero);
        }
        Ok(match (self, other) {
            (Self::Rational(a), Self::Rational(b)) => Self::Rational(a / b),
            (a, b) => Self::Double(a.to_f64_lossy() / b.to_f64_lossy()),
        })
    }

    /// Negation.
    #[must_use]
    pub fn neg(&self) -> Self {
        match self {
            Self::Rational(r) => Self::Rational(-r),
            Self::Double(d) => Self::Double(-d),
        }
    }

    /// Raises a rational base to a rational exponent, per §4.1/§4.6.
    ///
    /// Returns `Ok(Number::Rational(_))` only when the result is exactly
    /// representable as a rational (i.e. the exponent is an integer, or the
    /// base is a perfect power matching the exponent's denominator).
    /// Returns [`NumericError::Irrational`] when no exact rational result
    /// exists, signalling the caller to keep a symbolic `Power` node.
    ///
    /// # Errors
    /// Returns [`NumericError::DivisionByZero`] for `0^negative`, and
    /// [`NumericError::Irrational`] when the power is not exactly
    /// representable as a rational.
    pub fn pow_rational(&self, exponent: &BigRational) -> Result<Self, NumericError> {
        match self {
            Self::Rational(base) => rational_pow::pow_rational(base, exponent),
            Self::Double(base) => {
                let exp = exponent.to_f64().ok_or(NumericError::Irrational)?;
                Ok(Self::Double(base.powf(exp)))
            }
        }
    }
}

impl std::hash::Hash for Number {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Self::Rational(r) => r.hash(state),
            Self::Double(d) => d.to_bits().hash(state),
        }
    }
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Rational(a), Self::Rational(b)) => a == b,
            (a, b) => a.to_f64_lossy() == b.to_f64_lossy(),
        }
    }
}

impl PartialOrd for Number {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Self::Rational(a), Self::Rational(b)) => Some(a.cmp(b)),
            (a, b) => a.to_f64_lossy().partial_cmp(&b.to_f64_lossy()),
        }
    }
}

/// Integer GCD with `gcd(a, 0) = |a|`, `gcd(0, 0) = 0`.
#[must_use]
pub fn integer_gcd(a: &BigInt, b: &BigInt) -> BigInt {
    a.gcd(b).abs()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_gcd_matches_euclid_edge_cases() {
        assert_eq!(integer_gcd(&BigInt::from(0), &BigInt::from(0)), BigInt::from(0));
        assert_eq!(integer_gcd(&BigInt::from(5), &BigInt::from(0)), BigInt::from(5));
        assert_eq!(integer_gcd(&BigInt::from(6), &BigInt::from(9)), BigInt::from(3));
    }

    #[test]
    fn rational_addition_stays_exact() {
        let a = Number::from_bigint_ratio(BigInt::from(1), BigInt::from(3)).expect("nonzero denom");
        let b = Number::from_bigint_ratio(BigInt::from(1), BigInt::from(6)).expect("nonzero denom");
        let sum = a.add(&b).expect("addition is total");
        assert_eq!(sum, Number::from_bigint_ratio(BigInt::from(1), BigInt::from(2)).expect("nonzero denom"));
    }

    #[test]
    fn double_is_contagious() {
        let a = Number::from_i64(1);
        let b = Number::from_f64(2.5);
        assert!(a.add(&b).expect("addition is total").is_double());
    }

    #[test]
    fn division_by_zero_fails() {
        let a = Number::from_i64(1);
        let z = Number::from_i64(0);
        assert!(matches!(a.div(&z), Err(NumericError::DivisionByZero)));
    }
}

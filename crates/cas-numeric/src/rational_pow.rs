//! Exact rational exponentiation (`Number::pow_rational`'s rational branch)
//! and the §4.6 numeric-power simplifier's partial-radical extraction.

use crate::{Number, NumericError};
use num_bigint::BigInt;
use num_integer::Integer;
use num_rational::BigRational;
use num_traits::{One, Signed, ToPrimitive, Zero};

pub(crate) fn pow_rational(base: &BigRational, exponent: &BigRational) -> Result<Number, NumericError> {
    if exponent.is_integer() {
        let exp = exponent.numer();
        return pow_integer(base, exp);
    }

    if base.is_zero() {
        // 0^(positive fraction) = 0; 0^(negative fraction) is a division by zero.
        return if exponent.is_positive() {
            Ok(Number::Rational(BigRational::from_integer(BigInt::from(0))))
        } else {
            Err(NumericError::DivisionByZero)
        };
    }

    let denom = exponent.denom();
    let denom_u: u32 = denom.to_u32().ok_or(NumericError::Overflow)?;

    if base.is_negative() && denom_u % 2 == 0 {
        // Even root of a negative base has no real value; real-domain
        // callers turn this into `Undefined` rather than complex output.
        return Err(NumericError::Irrational);
    }

    let numer_root = exact_root(base.numer().abs(), denom_u)?;
    let denom_root = exact_root(base.denom().abs(), denom_u)?;
    let (Some(numer_root), Some(denom_root)) = (numer_root, denom_root) else {
        return Err(NumericError::Irrational);
    };

    let magnitude = BigRational::new(numer_root, denom_root);
    let magnitude_pow = pow_integer_ratio(&magnitude, exponent.numer())?;

    if base.is_negative() {
        // Odd root of a negative base: sign follows the numerator's parity.
        let numer_abs = exponent.numer().abs();
        let odd_numer = numer_abs.is_odd();
        Ok(Number::Rational(if odd_numer { -magnitude_pow } else { magnitude_pow }))
    } else {
        Ok(Number::Rational(magnitude_pow))
    }
}

fn pow_integer(base: &BigRational, exp: &BigInt) -> Result<Number, NumericError> {
    if exp.is_zero() {
        return Ok(Number::Rational(BigRational::from_integer(BigInt::from(1))));
    }
    if base.is_zero() {
        return if exp.is_positive() {
            Ok(Number::Rational(BigRational::from_integer(BigInt::from(0))))
        } else {
            Err(NumericError::DivisionByZero)
        };
    }
    let exp_abs = exp.abs();
    let exp_u: u64 = exp_abs.to_u64().ok_or(NumericError::Overflow)?;
    let raised = pow_bigint_ratio(base, exp_u);
    Ok(Number::Rational(if exp.is_negative() { raised.recip() } else { raised }))
}

fn pow_integer_ratio(base: &BigRational, exp: &BigInt) -> Result<BigRational, NumericError> {
    let exp_abs = exp.abs();
    let exp_u: u64 = exp_abs.to_u64().ok_or(NumericError::Overflow)?;
    let raised = pow_bigint_ratio(base, exp_u);
    Ok(if exp.is_negative() { raised.recip() } else { raised })
}

fn pow_bigint_ratio(base: &BigRational, exp_u: u64) -> BigRational {
    let mut result = BigRational::from_integer(BigInt::from(1));
    let mut acc = base.clone();
    let mut remaining = exp_u;
    while remaining > 0 {
        if remaining & 1 == 1 {
            result *= &acc;
        }
        acc = &acc * &acc;
        remaining >>= 1;
    }
    result
}

/// Returns `Some(root)` iff `value` is an exact `n`th power, `None` otherwise.
fn exact_root(value: &BigInt, n: u32) -> Result<Option<BigInt>, NumericError> {
    if n == 0 {
        return Err(NumericError::Overflow);
    }
    if value.is_zero() {
        return Ok(Some(BigInt::from(0)));
    }
    if n == 1 {
        return Ok(Some(value.clone()));
    }

    // Integer n-th root via binary search, then verify exactness.
    let mut low = BigInt::from(0);
    let mut high = value.clone();
    while &low < &high {
        let mid = (&low + &high + BigInt::from(1)) / BigInt::from(2);
        if pow_bigint(&mid, n) <= *value {
            low = mid;
        } else {
            high = &mid - BigInt::from(1);
        }
    }
    if pow_bigint(&low, n) == *value {
        Ok(Some(low))
    } else {
        Ok(None)
    }
}

fn pow_bigint(base: &BigInt, exp: u32) -> BigInt {
    let mut result = BigInt::from(1);
    let mut acc = base.clone();
    let mut remaining = exp;
    while remaining > 0 {
        if remaining & 1 == 1 {
            result = &result * &acc;
        }
        acc = &acc * &acc;
        remaining >>= 1;
    }
    result
}

/// Outcome of the §4.6 numeric-power simplifier.
#[derive(Debug, Clone, PartialEq)]
pub enum PowerOutcome {
    /// The power is exactly representable; no symbolic remainder.
    Exact(Number),
    /// `coefficient * radicand^(1/root_degree)`, with `radicand` square-free
    /// with respect to `root_degree` (no prime factor reaches multiplicity
    /// `root_degree`).
    Partial {
        /// The integer/rational part pulled out of the radical.
        coefficient: Number,
        /// The square-free remainder kept under the radical.
        radicand: BigRational,
        /// The root's degree (denominator of the residual exponent `1/root_degree`).
        root_degree: u32,
    },
    /// Real-domain failure: even-denominator root of a negative base.
    Undefined,
}

/// Trial-division factorization of a positive `BigInt` into `(prime, multiplicity)`
/// pairs. Not the fastest possible approach, but exact integers arising from
/// symbolic radicals are small in practice, and this keeps the algorithm easy
/// to verify against §4.6's description directly.
fn factorize(mut n: BigInt) -> Vec<(BigInt, u32)> {
    let mut factors = Vec::new();
    let mut divisor = BigInt::from(2);
    while &divisor * &divisor <= n {
        let mut multiplicity: u32 = 0;
        while (&n % &divisor).is_zero() {
            n /= &divisor;
            multiplicity += 1;
        }
        if multiplicity > 0 {
            factors.push((divisor.clone(), multiplicity));
        }
        divisor += BigInt::from(1);
    }
    if n > BigInt::from(1) {
        factors.push((n, 1));
    }
    factors
}

/// Extracts, for one side of a base fraction (numerator or denominator), the
/// integer factor and square-free remainder for residual exponent `1/root_degree`
/// applied `f_num` times (i.e. `side^(f_num / root_degree)`).
///
/// Returns `(integer_part, remainder_with_multiplicities)`.
fn extract_side(side: &BigInt, f_num: &BigInt, root_degree: u32) -> (BigInt, Vec<(BigInt, u32)>) {
    if side.is_one() {
        return (BigInt::from(1), Vec::new());
    }
    let root_degree_big = BigInt::from(root_degree);
    let mut integer_part = BigInt::from(1);
    let mut remainder = Vec::new();
    for (prime, multiplicity) in factorize(side.clone()) {
        let total = BigInt::from(multiplicity) * f_num;
        let extracted = &total / &root_degree_big; // floor, both operands positive
        let residual = &total - &extracted * &root_degree_big;
        if extracted > BigInt::from(0) {
            integer_part *= pow_bigint(&prime, extracted.to_u32().unwrap_or(u32::MAX));
        }
        if residual > BigInt::from(0) {
            remainder.push((prime, residual.to_u32().unwrap_or(u32::MAX)));
        }
    }
    (integer_part, remainder)
}

fn product_of(factors: &[(BigInt, u32)]) -> BigInt {
    factors.iter().fold(BigInt::from(1), |acc, (p, m)| acc * pow_bigint(p, *m))
}

/// The §4.6 numeric-power simplifier: factors `base^exponent` into an
/// extracted integer/rational coefficient and a square-free symbolic radical
/// remainder, when the power is not exactly representable as a rational.
///
/// # Errors
/// Returns [`NumericError::Overflow`] if the exponent's denominator does not
/// fit a `u32`.
pub fn factor_rational_power(base: &BigRational, exponent: &BigRational) -> Result<PowerOutcome, NumericError> {
    if let Ok(exact) = pow_rational(base, exponent) {
        return Ok(PowerOutcome::Exact(exact));
    }

    if exponent.is_integer() {
        // pow_rational only fails for non-integer exponents past this point
        // (integer powers of a nonzero rational are always exact); a zero
        // base with a negative integer exponent is the one failure mode.
        return Ok(PowerOutcome::Undefined);
    }

    let den = exponent.denom();
    let root_degree: u32 = den.to_u32().ok_or(NumericError::Overflow)?;

    if base.is_negative() && root_degree % 2 == 0 {
        return Ok(PowerOutcome::Undefined);
    }

    if base.is_zero() {
        return Ok(PowerOutcome::Exact(Number::Rational(BigRational::from_integer(BigInt::from(0)))));
    }

    let abs_base = base.abs();
    let k = exponent.floor();
    let f_num_signed = exponent.numer() - k.numer() * den;
    debug_assert!(f_num_signed >= BigInt::from(0) && f_num_signed < *den, "fractional part out of range");

    let integer_power = pow_integer_ratio(&abs_base, k.numer())?;

    let (numer_int, numer_rem) = extract_side(abs_base.numer(), &f_num_signed, root_degree);
    let (denom_int, denom_rem) = extract_side(abs_base.denom(), &f_num_signed, root_degree);

    let coefficient_magnitude = integer_power * BigRational::new(numer_int, denom_int);

    let sign_negative = base.is_negative() && exponent.numer().is_odd();
    let coefficient = if sign_negative {
        Number::Rational(-coefficient_magnitude)
    } else {
        Number::Rational(coefficient_magnitude)
    };

    if numer_rem.is_empty() && denom_rem.is_empty() {
        return Ok(PowerOutcome::Exact(coefficient));
    }

    let radicand = BigRational::new(product_of(&numer_rem), product_of(&denom_rem));
    Ok(PowerOutcome::Partial { coefficient, radicand, root_degree })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn r(n: i64, d: i64) -> BigRational {
        BigRational::new(BigInt::from(n), BigInt::from(d))
    }

    #[test]
    fn sqrt_of_four_is_exact() {
        let result = pow_rational(&r(4, 1), &r(1, 2)).expect("perfect square");
        assert_eq!(result, Number::Rational(r(2, 1)));
    }

    #[test]
    fn sqrt_of_eight_is_irrational() {
        assert!(matches!(pow_rational(&r(8, 1), &r(1, 2)), Err(NumericError::Irrational)));
    }

    #[test]
    fn cube_root_of_negative_eight_is_minus_two() {
        let result = pow_rational(&r(-8, 1), &r(1, 3)).expect("perfect odd root");
        assert_eq!(result, Number::Rational(r(-2, 1)));
    }

    #[test]
    fn even_root_of_negative_is_irrational() {
        assert!(matches!(pow_rational(&r(-4, 1), &r(1, 2)), Err(NumericError::Irrational)));
    }

    #[test]
    fn negative_integer_exponent_inverts() {
        let result = pow_rational(&r(2, 1), &r(-1, 1)).expect("nonzero base");
        assert_eq!(result, Number::Rational(r(1, 2)));
    }
}

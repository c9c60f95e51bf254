//! Re-export of the exact/double scalar kernel (§4.1 Number kernel), plus the
//! glue needed to build [`crate::core::expr::Expr`] numeric leaves from it.

pub use cas_numeric::{Number, NumericError, PowerOutcome, factor_rational_power, integer_gcd};

//! The polynomial subsystem (§4.9-§4.12): validity, division, GCD, and
//! rational-function normal form, all operating directly on [`super::Expr`]
//! trees rather than a dedicated polynomial representation — "polynomial" is
//! a validity predicate over the same expression tree, not a separate type.

mod division;
mod gcd;
mod info;
mod normal;

pub use division::{divide, pseudo_divide, pseudo_remainder};
pub use gcd::GcdAlgorithm;
pub use gcd::compute as gcd;
pub use gcd::compute_with as gcd_with;
pub use gcd::content;
pub use info::{coeff, degree, integer_content, is_input_valid, is_valid, leading_coeff, list_of_symbols, min_degree, symbols_of, unit};
pub use normal::{Fraction, normal};

use std::{cmp::Ordering, convert::TryFrom, ops::Mul};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A bounded scalar in `[0.0, 1.0]`.
///
/// Every fractional ice release in the model — the fixed solid and volcanic
/// release fractions and the per-species monotonic evaporation fractions —
/// is a `Fraction`. The type wraps an `f64` and guarantees the value is
/// finite and within `[0, 1]`, which is why it can implement [`Eq`] and
/// [`Ord`] even though raw `f64` does not.
///
/// # Examples
/// ```
/// use darkcloud_physics::Fraction;
///
/// let f = Fraction::new(0.3).unwrap();
/// assert_eq!(f * 1.0, 0.3);
/// assert_eq!(f.complement().get(), 0.7);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Fraction(f64);

impl Fraction {
    /// A fraction of zero: nothing is released.
    pub const ZERO: Self = Self(0.0);

    /// A fraction of one: the full inventory is released.
    pub const ONE: Self = Self(1.0);

    /// Creates a `Fraction` if `value` is within `[0, 1]`.
    ///
    /// # Errors
    ///
    /// Returns [`FractionError::NotFinite`] if `value` is `NaN` or infinite,
    /// or [`FractionError::OutOfRange`] if it lies outside `[0, 1]`.
    pub fn new(value: f64) -> Result<Self, FractionError> {
        if !value.is_finite() {
            return Err(FractionError::NotFinite(value));
        }
        if !(0.0..=1.0).contains(&value) {
            return Err(FractionError::OutOfRange(value));
        }
        Ok(Self(value))
    }

    /// Returns the inner `f64`.
    #[must_use]
    pub fn get(self) -> f64 {
        self.0
    }

    /// Returns `1 − f`, the fraction of the inventory left behind.
    ///
    /// Partial desorption moves `f × ice` into the gas phase and scales the
    /// remaining ice by this complement.
    #[must_use]
    pub fn complement(self) -> Self {
        Self(1.0 - self.0)
    }
}

impl TryFrom<f64> for Fraction {
    type Error = FractionError;
    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Fraction::new(value)
    }
}

impl From<Fraction> for f64 {
    fn from(f: Fraction) -> Self {
        f.0
    }
}

impl Mul<f64> for Fraction {
    type Output = f64;
    fn mul(self, rhs: f64) -> Self::Output {
        self.0 * rhs
    }
}

impl Mul<Fraction> for f64 {
    type Output = f64;
    fn mul(self, rhs: Fraction) -> Self::Output {
        self * rhs.0
    }
}

// Safe because the constructors forbid NaN and infinity.
impl Eq for Fraction {}

impl Ord for Fraction {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.partial_cmp(&other.0).unwrap()
    }
}

impl PartialOrd for Fraction {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Errors that can occur when constructing a [`Fraction`].
#[derive(Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum FractionError {
    /// Input was not finite.
    #[error("fraction is not finite: {0}")]
    NotFinite(f64),

    /// Input was outside the allowed range.
    #[error("fraction {0} is outside the range [0, 1]")]
    OutOfRange(f64),
}

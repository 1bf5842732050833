//! Fare money type.
//!
//! Fares are stored as whole cents so that segment arithmetic is exact;
//! the cumulative fare columns in the store are dollar decimals with two
//! fractional digits.

use std::fmt;

use serde::de::{self, Deserialize, Deserializer};
use serde::ser::{Serialize, Serializer};

/// Error returned when constructing an invalid fare.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid fare: {reason}")]
pub struct InvalidFare {
    reason: &'static str,
}

/// A non-negative fare with cent precision.
///
/// Non-negativity is guaranteed by construction: the only entry points are
/// [`Fare::from_cents`] (unsigned) and [`Fare::from_major`], which rejects
/// negative and non-finite inputs.
///
/// # Examples
///
/// ```
/// use bus_server::domain::Fare;
///
/// let fare = Fare::from_major(14.65).unwrap();
/// assert_eq!(fare.cents(), 1465);
/// assert_eq!(fare.to_string(), "14.65");
///
/// assert!(Fare::from_major(-1.0).is_err());
/// assert!(Fare::from_major(f64::NAN).is_err());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Fare(u64);

impl Fare {
    /// A zero fare.
    pub const ZERO: Fare = Fare(0);

    /// Create a fare from whole cents.
    pub const fn from_cents(cents: u64) -> Self {
        Fare(cents)
    }

    /// Create a fare from a decimal amount in major units (e.g. `14.65`).
    ///
    /// The value is rounded to the nearest cent. Negative, NaN, and
    /// infinite values are rejected.
    pub fn from_major(amount: f64) -> Result<Self, InvalidFare> {
        if !amount.is_finite() {
            return Err(InvalidFare {
                reason: "must be a finite number",
            });
        }
        if amount < 0.0 {
            return Err(InvalidFare {
                reason: "must be non-negative",
            });
        }
        Ok(Fare((amount * 100.0).round() as u64))
    }

    /// Returns the fare in whole cents.
    pub fn cents(&self) -> u64 {
        self.0
    }

    /// Returns the fare in major units as a float (for JSON output).
    pub fn to_major(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Whether this fare is zero.
    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl fmt::Debug for Fare {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fare({})", self)
    }
}

impl fmt::Display for Fare {
    /// Formats with exactly two decimal places, e.g. `"8.50"`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

impl Serialize for Fare {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.to_major())
    }
}

impl<'de> Deserialize<'de> for Fare {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let amount = f64::deserialize(deserializer)?;
        Fare::from_major(amount).map_err(de::Error::custom)
    }
}

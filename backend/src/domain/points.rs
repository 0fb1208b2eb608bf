//! Fixed-point loyalty point amounts.
//!
//! Points are held as [`rust_decimal::Decimal`] with exactly two fractional
//! digits. No floating point is involved in any arithmetic; floats only
//! appear when amounts are rendered as JSON numbers.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Number of fractional digits carried by every amount.
pub const POINTS_SCALE: u32 = 2;

/// Largest storable amount; ledger columns are `NUMERIC(12, 2)`.
pub const POINTS_MAX: Decimal = Decimal::from_parts(0xD4A5_0FFF, 0xE8, 0, false, POINTS_SCALE);

/// Validation errors for [`Points`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PointsError {
    /// The amount was below zero.
    #[error("amount must not be negative")]
    Negative,
    /// The amount carried more than two fractional digits.
    #[error("amount must have at most {max_scale} decimal places")]
    TooPrecise { max_scale: u32 },
    /// The amount could not be parsed as a decimal number.
    #[error("amount is not a decimal number: {input}")]
    Unparseable { input: String },
    /// The amount exceeds [`POINTS_MAX`].
    #[error("amount must not exceed {max}")]
    TooLarge { max: Decimal },
    /// The arithmetic result does not fit in the decimal range.
    #[error("amount overflow")]
    Overflow,
}

/// A non-negative amount of loyalty points with two decimal places.
///
/// # Examples
/// ```
/// use loyalty_backend::domain::Points;
///
/// let accrued = "10.50".parse::<Points>().unwrap();
/// let bonus = "5.25".parse::<Points>().unwrap();
/// let total = accrued.checked_add(bonus).unwrap();
/// assert_eq!(total.to_string(), "15.75");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Points(Decimal);

impl Points {
    /// The zero amount.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Validate a decimal amount.
    pub fn new(value: Decimal) -> Result<Self, PointsError> {
        if value.is_sign_negative() && !value.is_zero() {
            return Err(PointsError::Negative);
        }
        if value.normalize().scale() > POINTS_SCALE {
            return Err(PointsError::TooPrecise {
                max_scale: POINTS_SCALE,
            });
        }
        if value > POINTS_MAX {
            return Err(PointsError::TooLarge { max: POINTS_MAX });
        }
        let mut scaled = value;
        scaled.rescale(POINTS_SCALE);
        Ok(Self(scaled))
    }

    /// The underlying decimal value.
    pub fn as_decimal(self) -> Decimal {
        self.0
    }

    /// Whether the amount is zero.
    pub fn is_zero(self) -> bool {
        self.0.is_zero()
    }

    /// Whether the amount is strictly greater than zero.
    pub fn is_positive(self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// Add two amounts.
    pub fn checked_add(self, other: Self) -> Result<Self, PointsError> {
        self.0
            .checked_add(other.0)
            .ok_or(PointsError::Overflow)
            .and_then(Self::new)
    }

    /// Subtract `other`, failing with [`PointsError::Negative`] when the
    /// result would drop below zero.
    pub fn checked_sub(self, other: Self) -> Result<Self, PointsError> {
        self.0
            .checked_sub(other.0)
            .ok_or(PointsError::Overflow)
            .and_then(Self::new)
    }
}

impl Default for Points {
    fn default() -> Self {
        Self::ZERO
    }
}

impl fmt::Display for Points {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Points {
    type Err = PointsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = Decimal::from_str(s.trim()).map_err(|_| PointsError::Unparseable {
            input: s.to_owned(),
        })?;
        Self::new(value)
    }
}

impl TryFrom<Decimal> for Points {
    type Error = PointsError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Points> for Decimal {
    fn from(value: Points) -> Self {
        value.0
    }
}

impl Serialize for Points {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        rust_decimal::serde::float::serialize(&self.0, serializer)
    }
}

impl<'de> Deserialize<'de> for Points {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = rust_decimal::serde::float::deserialize(deserializer)?;
        Self::new(value).map_err(serde::de::Error::custom)
    }
}

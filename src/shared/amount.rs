//! Non-negative monetary amount expressed in minor currency units.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Error returned when an amount is negative.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("amount must not be negative, got {0}")]
pub struct NegativeAmountError(pub i64);

/// Monetary amount in minor units (cents). Always `>= 0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct Amount(i64);

impl Amount {
    /// The zero amount.
    pub const ZERO: Self = Self(0);

    /// Creates a validated amount from minor units.
    ///
    /// # Errors
    ///
    /// Returns [`NegativeAmountError`] when `minor_units` is below zero.
    pub const fn new(minor_units: i64) -> Result<Self, NegativeAmountError> {
        if minor_units < 0 {
            return Err(NegativeAmountError(minor_units));
        }
        Ok(Self(minor_units))
    }

    /// Returns the amount in minor units.
    #[must_use]
    pub const fn minor_units(self) -> i64 {
        self.0
    }
}

impl TryFrom<i64> for Amount {
    type Error = NegativeAmountError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Amount> for i64 {
    fn from(value: Amount) -> Self {
        value.0
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.0.div_euclid(100);
        let cents = self.0.rem_euclid(100);
        write!(f, "${whole}.{cents:02}")
    }
}

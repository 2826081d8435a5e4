//! Type-safe price representation using decimal arithmetic.
//!
//! Prices are stored and served as plain JSON numbers (e.g. `199.99`) to stay
//! compatible with the documents in the store, but are handled as
//! [`Decimal`] in memory so no float rounding leaks into arithmetic.

use std::fmt;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Number of decimal places kept for currency amounts.
const CURRENCY_SCALE: u32 = 2;

/// Errors that can occur when constructing a price.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PriceError {
    /// Amount is below zero.
    #[error("price cannot be negative: {0}")]
    Negative(Decimal),
}

/// A non-negative currency amount with 2-place semantics.
///
/// Deserialization goes through [`Price::new`], so negative amounts are
/// rejected and stored values are rounded the same way as constructed ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Price(#[serde(serialize_with = "rust_decimal::serde::float::serialize")] Decimal);

impl Price {
    /// Create a price, rounding to two decimal places (banker's rounding).
    ///
    /// # Errors
    ///
    /// Returns `PriceError::Negative` if the amount is below zero.
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative(amount));
        }
        Ok(Self(amount.round_dp_with_strategy(
            CURRENCY_SCALE,
            RoundingStrategy::MidpointNearestEven,
        )))
    }

    /// Create a price from an integer number of cents.
    #[must_use]
    pub fn from_cents(cents: u32) -> Self {
        Self(Decimal::new(i64::from(cents), CURRENCY_SCALE))
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let amount = rust_decimal::serde::float::deserialize(deserializer)?;
        Self::new(amount).map_err(serde::de::Error::custom)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${:.2}", self.0)
    }
}

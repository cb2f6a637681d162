//! Type-safe price representation using decimal arithmetic.
//!
//! The backend serializes prices as strings (`"100"`, `"99.99"`). This type
//! coerces them into `rust_decimal::Decimal` so totals never go through
//! floating point.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Price`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PriceError {
    /// The input string is empty.
    #[error("price cannot be empty")]
    Empty,
    /// The input is not a decimal number.
    #[error("price is not a valid number: {0}")]
    NotNumeric(String),
    /// The input parsed but is negative.
    #[error("price cannot be negative: {0}")]
    Negative(Decimal),
}

/// A non-negative monetary amount.
///
/// Serializes as a string to match the backend's representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct Price(#[serde(with = "rust_decimal::serde::str")] Decimal);

impl Price {
    /// Zero, the additive identity for totals.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Parse a price from the backend's string representation.
    ///
    /// Whitespace is trimmed before parsing; `"100"`, `"99.99"` and
    /// `" 50 "` are all accepted.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty, not a decimal number, or
    /// negative.
    pub fn parse(s: &str) -> Result<Self, PriceError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(PriceError::Empty);
        }

        let amount: Decimal = trimmed
            .parse()
            .map_err(|_| PriceError::NotNumeric(trimmed.to_string()))?;

        if amount.is_sign_negative() {
            return Err(PriceError::Negative(amount));
        }

        Ok(Self(amount))
    }

    /// The underlying decimal amount.
    #[must_use]
    pub const fn amount(self) -> Decimal {
        self.0
    }

    /// This price multiplied by a line-item quantity.
    #[must_use]
    pub fn times(self, quantity: u32) -> Decimal {
        self.0 * Decimal::from(quantity)
    }
}

impl From<Decimal> for Price {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

impl std::fmt::Display for Price {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

//! Monetary amounts.

use core::iter::Sum;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::value_object::ValueObject;

/// Non-negative monetary amount, held in minor units (cents).
///
/// On the wire an amount is a plain decimal number in major units (`1299.99`),
/// matching the catalog's JSON shape.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Money(u64);

impl ValueObject for Money {}

impl Money {
    pub const ZERO: Self = Self(0);

    pub const fn from_cents(cents: u64) -> Self {
        Self(cents)
    }

    /// Convert a major-unit amount, rounding to the nearest cent.
    pub fn from_major_units(amount: f64) -> Result<Self, DomainError> {
        if !amount.is_finite() {
            return Err(DomainError::validation("amount must be a finite number"));
        }
        if amount < 0.0 {
            return Err(DomainError::validation("amount cannot be negative"));
        }
        let cents = (amount * 100.0).round();
        if cents > u64::MAX as f64 {
            return Err(DomainError::validation("amount is too large"));
        }
        Ok(Self(cents as u64))
    }

    pub const fn cents(self) -> u64 {
        self.0
    }

    pub fn as_major_units(self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Value of `quantity` units at this price. Saturates instead of wrapping.
    pub fn times(self, quantity: u64) -> Self {
        Self(self.0.saturating_mul(quantity))
    }

    pub fn saturating_add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }
}

impl TryFrom<f64> for Money {
    type Error = DomainError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::from_major_units(value)
    }
}

impl From<Money> for f64 {
    fn from(value: Money) -> Self {
        value.as_major_units()
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Money::ZERO, Money::saturating_add)
    }
}

impl core::fmt::Display for Money {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

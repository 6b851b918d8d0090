//! Strongly-typed identifiers used across the domain.
//!
//! Identifiers are positive integers assigned by their owner (the ledger for
//! products and movements, the auth layer for users). They are never reused.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Identifier of a catalog product.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(u64);

/// Identifier of a recorded stock movement.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MovementId(u64);

/// Identifier of a user (actor identity).
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(u64);

macro_rules! impl_numeric_newtype {
    ($t:ty, $name:literal) => {
        impl $t {
            /// The first identifier handed out by a sequence.
            pub const FIRST: Self = Self(1);

            pub const fn new(value: u64) -> Self {
                Self(value)
            }

            pub const fn get(self) -> u64 {
                self.0
            }

            /// The identifier following this one, or `None` at `u64::MAX`.
            pub const fn checked_next(self) -> Option<Self> {
                match self.0.checked_add(1) {
                    Some(value) => Some(Self(value)),
                    None => None,
                }
            }

            /// The identifier following this one in a sequence.
            ///
            /// A sequence that has reached `u64::MAX` is exhausted.
            pub fn next(self) -> Result<Self, DomainError> {
                self.checked_next()
                    .ok_or_else(|| DomainError::invariant(format!("{} sequence exhausted at {}", $name, self.0)))
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                core::fmt::Display::fmt(&self.0, f)
            }
        }

        impl From<u64> for $t {
            fn from(value: u64) -> Self {
                Self(value)
            }
        }

        impl From<$t> for u64 {
            fn from(value: $t) -> Self {
                value.0
            }
        }

        impl FromStr for $t {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let value = s
                    .trim()
                    .parse::<u64>()
                    .map_err(|e| DomainError::invalid_id(format!("{}: {}", $name, e)))?;
                Ok(Self(value))
            }
        }
    };
}

impl_numeric_newtype!(ProductId, "ProductId");
impl_numeric_newtype!(MovementId, "MovementId");
impl_numeric_newtype!(UserId, "UserId");

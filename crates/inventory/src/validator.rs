//! Movement validation.
//!
//! The validator is the only gate in front of a quantity change. It is a pure
//! function of its inputs: no clock, no ledger access, no side effects.

use thiserror::Error;

use crate::movement::MovementKind;

/// Why a movement request was refused.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MovementRejection {
    /// The requested quantity is not a positive integer.
    #[error("invalid quantity '{0}': must be a positive integer")]
    InvalidQuantity(String),

    /// An exit would drive stock below zero.
    #[error("insufficient stock: requested {requested}, available {available}")]
    InsufficientStock { available: u64, requested: u64 },
}

/// Decide whether a movement may be applied to a product holding `current` units.
///
/// Rules, in order:
/// 1. `requested` must be > 0.
/// 2. An exit may not take more than `current`.
///
/// On acceptance returns the quantity to move.
pub fn validate(current: u64, kind: MovementKind, requested: i64) -> Result<u64, MovementRejection> {
    let quantity = match u64::try_from(requested) {
        Ok(q) if q > 0 => q,
        _ => return Err(MovementRejection::InvalidQuantity(requested.to_string())),
    };

    if kind == MovementKind::Exit && quantity > current {
        return Err(MovementRejection::InsufficientStock {
            available: current,
            requested: quantity,
        });
    }

    Ok(quantity)
}

/// Parse a quantity typed into a form field.
///
/// Only whole numbers are accepted (`"1.5"`, `"abc"` and `""` are refused);
/// the sign is checked later by [`validate`].
pub fn parse_requested_quantity(input: &str) -> Result<i64, MovementRejection> {
    input
        .trim()
        .parse::<i64>()
        .map_err(|_| MovementRejection::InvalidQuantity(input.to_string()))
}

use thiserror::Error;

use stockroom_core::{DomainError, ProductId};

use crate::validator::MovementRejection;

pub type LedgerResult<T> = Result<T, LedgerError>;

/// Failure of a ledger operation.
///
/// Every variant is reported before any state is touched: a failed call leaves
/// quantities and the movement history exactly as they were.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("invalid quantity '{0}': must be a positive integer")]
    InvalidQuantity(String),

    #[error("insufficient stock: requested {requested}, available {available}")]
    InsufficientStock { available: u64, requested: u64 },

    #[error("unknown product: {0}")]
    UnknownProduct(ProductId),

    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl From<MovementRejection> for LedgerError {
    fn from(rejection: MovementRejection) -> Self {
        match rejection {
            MovementRejection::InvalidQuantity(q) => LedgerError::InvalidQuantity(q),
            MovementRejection::InsufficientStock {
                available,
                requested,
            } => LedgerError::InsufficientStock {
                available,
                requested,
            },
        }
    }
}

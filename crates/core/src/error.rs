//! Failures shared by every stockroom crate.

use thiserror::Error;

pub type DomainResult<T> = Result<T, DomainError>;

/// A rule of the stock model was broken.
///
/// Stock-specific rejections (bad quantity, overdraw, unknown product) live in
/// the inventory crate; this type covers what the primitives themselves detect.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Input that can never be accepted, such as a blank product name or a
    /// negative price.
    #[error("validation failed: {0}")]
    Validation(String),

    /// Stored or computed state that the ledger must never hold: an id
    /// sequence run out, a zero-unit movement in a loaded log, a quantity
    /// that would overflow.
    #[error("invariant violated: {0}")]
    InvariantViolation(String),

    /// Text that does not name a product, movement or user.
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// A prepared change went stale before it was committed.
    #[error("conflict: {0}")]
    Conflict(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::InvariantViolation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }
}

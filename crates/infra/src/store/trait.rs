use std::sync::Arc;

use thiserror::Error;

use stockroom_core::ProductId;
use stockroom_inventory::{LedgerSnapshot, Product, StockMovement};

/// Persistence operation error.
///
/// These are **infrastructure errors** as opposed to ledger errors (validation,
/// insufficient stock). A write that returns an error must leave the stored state
/// as it was before the call.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("i/o failure: {0}")]
    Io(#[from] std::io::Error),

    #[error("snapshot (de)serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Durable home of ledger state.
///
/// The ledger calls a store *after* a change has been validated and *before* it
/// becomes visible in memory; if the store refuses, the change is dropped.
pub trait LedgerStore: Send + Sync {
    /// Load previously persisted state, if any.
    fn load(&self) -> Result<Option<LedgerSnapshot>, StoreError>;

    /// Replace everything with `snapshot` (initial seeding).
    fn save_snapshot(&self, snapshot: &LedgerSnapshot) -> Result<(), StoreError>;

    /// Record a created or updated product.
    fn persist_product(&self, product: &Product) -> Result<(), StoreError>;

    /// Record an accepted movement together with the product's new state.
    fn persist_movement(&self, product: &Product, movement: &StockMovement) -> Result<(), StoreError>;

    /// Forget a deleted product. Its movements stay.
    fn remove_product(&self, id: ProductId) -> Result<(), StoreError>;
}

impl<S> LedgerStore for Arc<S>
where
    S: LedgerStore + ?Sized,
{
    fn load(&self) -> Result<Option<LedgerSnapshot>, StoreError> {
        (**self).load()
    }

    fn save_snapshot(&self, snapshot: &LedgerSnapshot) -> Result<(), StoreError> {
        (**self).save_snapshot(snapshot)
    }

    fn persist_product(&self, product: &Product) -> Result<(), StoreError> {
        (**self).persist_product(product)
    }

    fn persist_movement(&self, product: &Product, movement: &StockMovement) -> Result<(), StoreError> {
        (**self).persist_movement(product, movement)
    }

    fn remove_product(&self, id: ProductId) -> Result<(), StoreError> {
        (**self).remove_product(id)
    }
}

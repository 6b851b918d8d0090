use std::sync::{PoisonError, RwLock};
use std::sync::atomic::{AtomicBool, Ordering};

use stockroom_core::ProductId;
use stockroom_inventory::{LedgerSnapshot, Product, StockMovement};

use super::r#trait::{LedgerStore, StoreError};

/// In-memory store.
///
/// Intended for tests/dev. Can be switched into a failing mode to exercise the
/// persistence-failure path.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    state: RwLock<Option<LedgerSnapshot>>,
    failing: AtomicBool,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent write fail (or succeed again).
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Current stored state (empty if nothing was ever written).
    ///
    /// Reads through a poisoned lock; the data is whatever the last write left.
    pub fn stored(&self) -> LedgerSnapshot {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        state.clone().unwrap_or_default()
    }

    fn write(&self, f: impl FnOnce(&mut LedgerSnapshot)) -> Result<(), StoreError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("in-memory store set to fail".to_string()));
        }
        let mut state = self
            .state
            .write()
            .map_err(|_| StoreError::Unavailable("lock poisoned".to_string()))?;
        f(state.get_or_insert_with(LedgerSnapshot::default));
        Ok(())
    }
}

impl LedgerStore for InMemoryStore {
    fn load(&self) -> Result<Option<LedgerSnapshot>, StoreError> {
        let state = self
            .state
            .read()
            .map_err(|_| StoreError::Unavailable("lock poisoned".to_string()))?;
        Ok(state.clone())
    }

    fn save_snapshot(&self, snapshot: &LedgerSnapshot) -> Result<(), StoreError> {
        self.write(|state| *state = snapshot.clone())
    }

    fn persist_product(&self, product: &Product) -> Result<(), StoreError> {
        self.write(|state| super::upsert_product(state, product))
    }

    fn persist_movement(&self, product: &Product, movement: &StockMovement) -> Result<(), StoreError> {
        self.write(|state| super::append_movement(state, product, movement))
    }

    fn remove_product(&self, id: ProductId) -> Result<(), StoreError> {
        self.write(|state| super::remove_product(state, id))
    }
}

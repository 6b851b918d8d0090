//! Thread-safe ledger host.
//!
//! `SharedLedger` is what a server-side deployment holds: one [`Ledger`] behind a
//! lock, plus the [`LedgerStore`] it persists to.
//!
//! ```text
//! request
//!   ↓
//! 1. Authorize actor (admin flag)
//!   ↓  ── write lock taken ──
//! 2. Prepare (lookup + validate, no mutation)
//!   ↓
//! 3. Persist (store write; failure ⇒ drop the prepared change)
//!   ↓
//! 4. Commit (quantity update + log append)
//!   ↓  ── write lock released ──
//! ```
//!
//! Holding the write lock from step 2 to step 4 makes "validate then mutate" a
//! single critical section: two concurrent exits can never both pass validation
//! against the same stale quantity.

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::TimeZone;
use thiserror::Error;

use stockroom_auth::{authorize, Action, Actor, AuthzError};
use stockroom_core::{Clock, Money, ProductId};
use stockroom_inventory::{
    DashboardSnapshot, Ledger, LedgerError, MovementRequest, NewProduct, Product, ProductPatch,
    StockMovement,
};

use crate::store::{LedgerStore, StoreError};

#[derive(Debug, Error)]
pub enum SharedLedgerError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error(transparent)]
    Forbidden(#[from] AuthzError),

    /// The change was valid but could not be stored; nothing was applied.
    #[error("persistence failed, change not applied: {0}")]
    Persistence(#[from] StoreError),

    #[error("ledger lock poisoned")]
    LockPoisoned,
}

pub struct SharedLedger<S> {
    ledger: RwLock<Ledger>,
    store: S,
}

impl<S> core::fmt::Debug for SharedLedger<S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SharedLedger").finish_non_exhaustive()
    }
}

impl<S: LedgerStore> SharedLedger<S> {
    /// Wrap an already-built ledger. The store is assumed to be in sync with it.
    pub fn new(ledger: Ledger, store: S) -> Self {
        Self {
            ledger: RwLock::new(ledger),
            store,
        }
    }

    /// Restore from the store, or build a fresh ledger with `fallback` and save it.
    pub fn bootstrap(
        store: S,
        clock: Arc<dyn Clock>,
        fallback: impl FnOnce(Arc<dyn Clock>) -> Result<Ledger, LedgerError>,
    ) -> Result<Self, SharedLedgerError> {
        let ledger = match store.load()? {
            Some(snapshot) => {
                tracing::info!(
                    products = snapshot.products.len(),
                    movements = snapshot.movements.len(),
                    "restored ledger from store"
                );
                Ledger::from_snapshot(snapshot, clock)?
            }
            None => {
                let ledger = fallback(clock)?;
                store.save_snapshot(&ledger.snapshot())?;
                tracing::info!(
                    products = ledger.total_products(),
                    "initialized store from fresh ledger"
                );
                ledger
            }
        };
        Ok(Self::new(ledger, store))
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn read_guard(&self) -> Result<RwLockReadGuard<'_, Ledger>, SharedLedgerError> {
        self.ledger.read().map_err(|_| SharedLedgerError::LockPoisoned)
    }

    fn write_guard(&self) -> Result<RwLockWriteGuard<'_, Ledger>, SharedLedgerError> {
        self.ledger.write().map_err(|_| SharedLedgerError::LockPoisoned)
    }

    /// Record a stock movement.
    pub fn apply_movement(&self, request: MovementRequest) -> Result<StockMovement, SharedLedgerError> {
        authorize(&request.actor, Action::RecordMovement)?;

        let mut ledger = self.write_guard()?;

        let prepared = ledger.prepare_movement(&request).inspect_err(|err| {
            tracing::warn!(
                product_id = %request.product_id,
                kind = %request.kind,
                requested = request.quantity,
                actor = %request.actor,
                error = %err,
                "movement rejected"
            );
        })?;

        if let Err(err) = self.store.persist_movement(prepared.product(), prepared.movement()) {
            tracing::warn!(
                product_id = %request.product_id,
                movement_id = %prepared.movement().id_typed(),
                error = %err,
                "movement not persisted; discarding"
            );
            return Err(err.into());
        }

        let movement = ledger.commit(prepared)?;
        tracing::info!(
            movement_id = %movement.id_typed(),
            product_id = %movement.product_id(),
            kind = %movement.kind(),
            quantity = movement.quantity(),
            actor = %request.actor,
            "movement recorded"
        );
        Ok(movement)
    }

    /// Run a catalog change on a copy, persist, then swap it in.
    fn change_catalog<T>(
        &self,
        actor: &Actor,
        change: impl FnOnce(&mut Ledger) -> Result<T, LedgerError>,
        persist: impl FnOnce(&S, &T) -> Result<(), StoreError>,
    ) -> Result<T, SharedLedgerError> {
        authorize(actor, Action::ManageCatalog)?;

        let mut ledger = self.write_guard()?;
        let mut draft = ledger.clone();
        let outcome = change(&mut draft)?;
        persist(&self.store, &outcome)?;
        *ledger = draft;
        Ok(outcome)
    }

    pub fn create_product(&self, actor: &Actor, new: NewProduct) -> Result<Product, SharedLedgerError> {
        let product = self.change_catalog(
            actor,
            |ledger| ledger.create_product(new),
            |store, product| store.persist_product(product),
        )?;
        tracing::info!(product_id = %product.id_typed(), name = product.name(), actor = %actor, "product created");
        Ok(product)
    }

    pub fn update_product(
        &self,
        actor: &Actor,
        id: ProductId,
        patch: ProductPatch,
    ) -> Result<Product, SharedLedgerError> {
        let product = self.change_catalog(
            actor,
            |ledger| ledger.update_product(id, patch),
            |store, product| store.persist_product(product),
        )?;
        tracing::info!(product_id = %id, actor = %actor, "product updated");
        Ok(product)
    }

    pub fn delete_product(&self, actor: &Actor, id: ProductId) -> Result<Product, SharedLedgerError> {
        let product = self.change_catalog(
            actor,
            |ledger| ledger.delete_product(id),
            |store, _| store.remove_product(id),
        )?;
        tracing::info!(product_id = %id, actor = %actor, "product deleted");
        Ok(product)
    }

    /// Run a read-only query against a consistent view of the ledger.
    pub fn read<R>(&self, query: impl FnOnce(&Ledger) -> R) -> Result<R, SharedLedgerError> {
        let ledger = self.read_guard()?;
        Ok(query(&ledger))
    }

    pub fn list_low_stock(&self) -> Result<Vec<Product>, SharedLedgerError> {
        self.read(Ledger::list_low_stock)
    }

    pub fn total_value(&self) -> Result<Money, SharedLedgerError> {
        self.read(Ledger::total_value)
    }

    pub fn recent_movements(&self, limit: usize) -> Result<Vec<StockMovement>, SharedLedgerError> {
        self.read(|ledger| ledger.recent_movements(limit))
    }

    pub fn dashboard<Tz: TimeZone>(&self, recent_limit: usize, tz: &Tz) -> Result<DashboardSnapshot, SharedLedgerError> {
        let snapshot = self.read(|ledger| ledger.dashboard(recent_limit, tz))?;
        tracing::debug!(
            products = snapshot.total_products,
            low_stock = snapshot.low_stock.len(),
            movements_today = snapshot.movements_today,
            "dashboard computed"
        );
        Ok(snapshot)
    }
}

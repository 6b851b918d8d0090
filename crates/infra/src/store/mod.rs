//! Persistence collaborators for the ledger.

pub mod in_memory;
pub mod json_file;
mod r#trait;

pub use in_memory::InMemoryStore;
pub use json_file::JsonFileStore;
pub use r#trait::{LedgerStore, StoreError};

use stockroom_core::ProductId;
use stockroom_inventory::{LedgerSnapshot, Product, StockMovement};

/// Insert or replace a product in a snapshot, keeping products ordered by id.
pub(crate) fn upsert_product(snapshot: &mut LedgerSnapshot, product: &Product) {
    let id = product.id_typed();
    match snapshot.products.binary_search_by_key(&id, Product::id_typed) {
        Ok(idx) => snapshot.products[idx] = product.clone(),
        Err(idx) => snapshot.products.insert(idx, product.clone()),
    }
    let floor = snapshot.next_product_id.unwrap_or(ProductId::FIRST);
    // The ledger never hands out u64::MAX, so there is always a successor.
    let next = id.checked_next().map_or(floor, |after| floor.max(after));
    snapshot.next_product_id = Some(next);
}

pub(crate) fn append_movement(snapshot: &mut LedgerSnapshot, product: &Product, movement: &StockMovement) {
    upsert_product(snapshot, product);
    snapshot.movements.push(movement.clone());
}

pub(crate) fn remove_product(snapshot: &mut LedgerSnapshot, id: ProductId) {
    snapshot.products.retain(|p| p.id_typed() != id);
}

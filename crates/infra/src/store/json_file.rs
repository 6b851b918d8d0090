use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use stockroom_core::ProductId;
use stockroom_inventory::{LedgerSnapshot, Product, StockMovement};

use super::r#trait::{LedgerStore, StoreError};

/// Store that keeps the whole ledger as one JSON document on disk.
///
/// Every write produces the next document in full, writes it to a sibling temp
/// file and renames it over the target, so a failed write leaves the previous
/// document intact.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    current: Mutex<Option<LedgerSnapshot>>,
}

impl JsonFileStore {
    /// Open (without requiring) the document at `path`.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let current = if path.exists() {
            let bytes = fs::read(&path)?;
            Some(serde_json::from_slice(&bytes)?)
        } else {
            None
        };
        tracing::debug!(path = %path.display(), existing = current.is_some(), "opened json store");
        Ok(Self {
            path,
            current: Mutex::new(current),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write(&self, f: impl FnOnce(&mut LedgerSnapshot)) -> Result<(), StoreError> {
        let mut current = self
            .current
            .lock()
            .map_err(|_| StoreError::Unavailable("lock poisoned".to_string()))?;

        let mut next = current.clone().unwrap_or_default();
        f(&mut next);
        self.write_document(&next)?;
        *current = Some(next);
        Ok(())
    }

    fn write_document(&self, snapshot: &LedgerSnapshot) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec_pretty(snapshot)?;
        let tmp = self.path.with_extension("json.tmp");
        {
            let mut file = fs::File::create(&tmp)?;
            file.write_all(&bytes)?;
            file.sync_all()?;
        }
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl LedgerStore for JsonFileStore {
    fn load(&self) -> Result<Option<LedgerSnapshot>, StoreError> {
        let current = self
            .current
            .lock()
            .map_err(|_| StoreError::Unavailable("lock poisoned".to_string()))?;
        Ok(current.clone())
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

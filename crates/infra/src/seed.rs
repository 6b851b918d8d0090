//! Seeding an empty ledger from a JSON file.
//!
//! Two shapes are accepted:
//! - a bare array of products (`[{"name": ..., "price": ..., "quantity": ..., "minStock": ...}]`),
//!   which are created in order and receive fresh ids;
//! - a full ledger snapshot (`{"products": [...], "movements": [...]}`), restored as-is.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;
use thiserror::Error;

use stockroom_core::Clock;
use stockroom_inventory::{Ledger, LedgerError, LedgerSnapshot, NewProduct};

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("failed to read seed file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse seed file: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum SeedFile {
    Catalog(Vec<NewProduct>),
    Snapshot(LedgerSnapshot),
}

impl SeedFile {
    pub fn from_path(path: &Path) -> Result<Self, SeedError> {
        let bytes = fs::read(path)?;
        Self::from_slice(&bytes)
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self, SeedError> {
        Ok(serde_json::from_slice(bytes)?)
    }

    pub fn into_ledger(self, clock: Arc<dyn Clock>) -> Result<Ledger, LedgerError> {
        match self {
            SeedFile::Catalog(products) => {
                let mut ledger = Ledger::with_clock(clock);
                for product in products {
                    ledger.create_product(product)?;
                }
                Ok(ledger)
            }
            SeedFile::Snapshot(snapshot) => Ledger::from_snapshot(snapshot, clock),
        }
    }
}

//! Infrastructure layer: persistence, configuration, seeding, and the
//! thread-safe ledger host.

pub mod config;
pub mod seed;
pub mod shared_ledger;
pub mod store;


pub use config::{AppConfig, ConfigError};
pub use seed::{SeedError, SeedFile};
pub use shared_ledger::{SharedLedger, SharedLedgerError};
pub use store::{InMemoryStore, JsonFileStore, LedgerStore, StoreError};

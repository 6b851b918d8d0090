//! Inventory domain module.
//!
//! This crate contains the stock ledger: product quantities, the append-only
//! movement history, the movement validator and the aggregates derived from them.
//! It is implemented purely as deterministic domain logic (no IO, no HTTP, no storage).

pub mod dashboard;
pub mod error;
pub mod ledger;
pub mod movement;
pub mod product;
pub mod validator;

pub use dashboard::DashboardSnapshot;
pub use error::{LedgerError, LedgerResult};
pub use ledger::{Ledger, LedgerSnapshot, PreparedMovement};
pub use movement::{MovementKind, MovementRequest, StockMovement};
pub use product::{NewProduct, Product, ProductPatch};
pub use validator::{parse_requested_quantity, validate, MovementRejection};

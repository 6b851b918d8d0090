use serde::{Deserialize, Serialize};

use stockroom_core::Money;

use crate::movement::StockMovement;
use crate::product::Product;

/// Read-only view of the ledger for the dashboard screen.
///
/// Every field is computed from current ledger state when the snapshot is taken;
/// nothing here is stored or incrementally maintained.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSnapshot {
    pub total_products: usize,
    pub total_value: Money,
    pub low_stock: Vec<Product>,
    pub movements_today: usize,
    pub recent_movements: Vec<StockMovement>,
}

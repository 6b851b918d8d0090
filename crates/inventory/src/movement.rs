use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockroom_auth::Actor;
use stockroom_core::{Entity, MovementId, ProductId, UserId};

/// Direction of a stock movement.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MovementKind {
    /// Stock arrives; quantity increases.
    #[serde(alias = "ENTRADA")]
    Entry,
    /// Stock leaves; quantity decreases.
    #[serde(alias = "SALIDA")]
    Exit,
}

impl MovementKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MovementKind::Entry => "ENTRY",
            MovementKind::Exit => "EXIT",
        }
    }
}

impl core::fmt::Display for MovementKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable record of an accepted stock movement.
///
/// `product_name` is copied at creation so the record stays displayable after
/// the product is renamed or deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockMovement {
    id: MovementId,
    product_id: ProductId,
    product_name: String,
    #[serde(rename = "type")]
    kind: MovementKind,
    quantity: u64,
    timestamp: DateTime<Utc>,
    user_id: UserId,
    username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    reason: Option<String>,
}

impl StockMovement {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn record(
        id: MovementId,
        product_id: ProductId,
        product_name: &str,
        kind: MovementKind,
        quantity: u64,
        timestamp: DateTime<Utc>,
        actor: &Actor,
        reason: Option<String>,
    ) -> Self {
        Self {
            id,
            product_id,
            product_name: product_name.to_string(),
            kind,
            quantity,
            timestamp,
            user_id: actor.id,
            username: actor.username.clone(),
            reason,
        }
    }

    pub fn id_typed(&self) -> MovementId {
        self.id
    }

    pub fn product_id(&self) -> ProductId {
        self.product_id
    }

    pub fn product_name(&self) -> &str {
        &self.product_name
    }

    pub fn kind(&self) -> MovementKind {
        self.kind
    }

    pub fn quantity(&self) -> u64 {
        self.quantity
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn reason(&self) -> Option<&str> {
        self.reason.as_deref()
    }
}

impl Entity for StockMovement {
    type Id = MovementId;

    fn id(&self) -> MovementId {
        self.id
    }
}

/// A request to move stock, as submitted by a caller.
///
/// `quantity` is signed on purpose: requests arrive unvalidated and a
/// non-positive amount must be reported, not made unrepresentable upstream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovementRequest {
    pub product_id: ProductId,
    pub kind: MovementKind,
    pub quantity: i64,
    pub actor: Actor,
    pub reason: Option<String>,
}

impl MovementRequest {
    pub fn new(product_id: ProductId, kind: MovementKind, quantity: i64, actor: Actor) -> Self {
        Self {
            product_id,
            kind,
            quantity,
            actor,
            reason: None,
        }
    }

    pub fn entry(product_id: ProductId, quantity: i64, actor: Actor) -> Self {
        Self::new(product_id, MovementKind::Entry, quantity, actor)
    }

    pub fn exit(product_id: ProductId, quantity: i64, actor: Actor) -> Self {
        Self::new(product_id, MovementKind::Exit, quantity, actor)
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }
}

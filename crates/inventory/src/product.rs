use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockroom_core::{DomainError, Entity, Money, ProductId};

/// Catalog product with its current stock level.
///
/// `quantity` is owned by the ledger: it is set once at creation and afterwards
/// changes only when a stock movement is accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    id: ProductId,
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    category: String,
    price: Money,
    quantity: u64,
    min_stock: u64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    #[serde(skip)]
    version: u64,
}

impl Product {
    pub(crate) fn create(id: ProductId, new: NewProduct, now: DateTime<Utc>) -> Result<Self, DomainError> {
        new.validate()?;
        Ok(Self {
            id,
            name: new.name.trim().to_string(),
            description: new.description,
            category: new.category,
            price: new.price,
            quantity: new.quantity,
            min_stock: new.min_stock,
            created_at: now,
            updated_at: now,
            version: 1,
        })
    }

    pub fn id_typed(&self) -> ProductId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn price(&self) -> Money {
        self.price
    }

    pub fn quantity(&self) -> u64 {
        self.quantity
    }

    pub fn min_stock(&self) -> u64 {
        self.min_stock
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Monotonically increasing revision, bumped on every accepted change.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// At or below the configured minimum.
    pub fn is_low_stock(&self) -> bool {
        self.quantity <= self.min_stock
    }

    /// Value of the units on hand (`quantity × price`).
    pub fn stock_value(&self) -> Money {
        self.price.times(self.quantity)
    }

    pub(crate) fn with_quantity(&self, quantity: u64, now: DateTime<Utc>) -> Self {
        Self {
            quantity,
            updated_at: now,
            version: self.version + 1,
            ..self.clone()
        }
    }

    pub(crate) fn apply_patch(&mut self, patch: ProductPatch, now: DateTime<Utc>) -> Result<(), DomainError> {
        patch.validate()?;
        if let Some(name) = patch.name {
            self.name = name.trim().to_string();
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
        if let Some(price) = patch.price {
            self.price = price;
        }
        if let Some(min_stock) = patch.min_stock {
            self.min_stock = min_stock;
        }
        self.updated_at = now;
        self.version += 1;
        Ok(())
    }

    /// Products loaded from a snapshot start at version 1 like freshly created ones.
    pub(crate) fn restored(mut self) -> Result<Self, DomainError> {
        if self.name.trim().is_empty() {
            return Err(DomainError::validation(format!(
                "product {} has an empty name",
                self.id
            )));
        }
        self.version = self.version.max(1);
        Ok(self)
    }
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> ProductId {
        self.id
    }
}

/// Input for creating a catalog product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    pub price: Money,
    pub quantity: u64,
    pub min_stock: u64,
}

impl NewProduct {
    pub fn new(name: impl Into<String>, price: Money, quantity: u64, min_stock: u64) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            category: String::new(),
            price,
            quantity,
            min_stock,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    fn validate(&self) -> Result<(), DomainError> {
        if self.name.trim().is_empty() {
            return Err(DomainError::validation("name cannot be empty"));
        }
        Ok(())
    }
}

/// Partial update of a product's catalog attributes.
///
/// There is deliberately no `quantity` field; unknown fields (including
/// `quantity`) are refused on deserialization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub price: Option<Money>,
    pub min_stock: Option<u64>,
}

impl ProductPatch {
    fn validate(&self) -> Result<(), DomainError> {
        if let Some(name) = &self.name {
            if name.trim().is_empty() {
                return Err(DomainError::validation("name cannot be empty"));
            }
        }
        Ok(())
    }
}

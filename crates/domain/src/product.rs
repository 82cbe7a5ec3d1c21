//! Catalog product aggregate.

use chrono::{DateTime, Utc};
use common::{ProductId, Version};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::aggregate::Aggregate;
use crate::money::Money;

/// Errors raised when building or editing a product.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProductError {
    /// Products must have a visible name.
    #[error("Product name must not be empty")]
    EmptyName,
}

/// A catalog entry with a price and an available stock level.
///
/// From the cart's point of view a product is read-only: carts only ask
/// whether enough stock exists. Stock is advisory and never decremented by
/// checkout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    id: ProductId,
    #[serde(default)]
    version: Version,
    name: String,
    description: Option<String>,
    price: Money,
    stock: u32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Aggregate for Product {
    type Id = ProductId;

    fn aggregate_type() -> &'static str {
        "Product"
    }

    fn id(&self) -> ProductId {
        self.id
    }

    fn version(&self) -> Version {
        self.version
    }

    fn set_version(&mut self, version: Version) {
        self.version = version;
    }
}

impl Product {
    /// Creates a new catalog product.
    pub fn new(
        id: ProductId,
        name: impl Into<String>,
        price: Money,
        stock: u32,
    ) -> Result<Self, ProductError> {
        let name = validate_name(name.into())?;
        let now = Utc::now();
        Ok(Self {
            id,
            version: Version::initial(),
            name,
            description: None,
            price,
            stock,
            created_at: now,
            updated_at: now,
        })
    }

    /// Attaches a description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn price(&self) -> &Money {
        &self.price
    }

    pub fn stock(&self) -> u32 {
        self.stock
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns true if `quantity` units can be put in a cart.
    ///
    /// Holds iff `1 <= quantity <= stock`.
    pub fn has_stock(&self, quantity: u32) -> bool {
        quantity >= 1 && quantity <= self.stock
    }

    /// Returns true if at least one unit is available.
    pub fn is_in_stock(&self) -> bool {
        self.stock > 0
    }

    // Catalog management

    /// Renames the product.
    pub fn rename(&mut self, name: impl Into<String>) -> Result<(), ProductError> {
        self.name = validate_name(name.into())?;
        self.touch();
        Ok(())
    }

    /// Replaces the list price. Carts keep the price they captured.
    pub fn set_price(&mut self, price: Money) {
        self.price = price;
        self.touch();
    }

    /// Replaces the stock level.
    pub fn set_stock(&mut self, stock: u32) {
        self.stock = stock;
        self.touch();
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

fn validate_name(name: String) -> Result<String, ProductError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ProductError::EmptyName);
    }
    Ok(trimmed.to_string())
}

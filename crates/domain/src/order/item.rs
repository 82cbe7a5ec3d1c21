use common::ProductId;
use serde::{Deserialize, Serialize};

use crate::cart::CartItem;
use crate::money::{Money, MoneyError};

/// A line of a placed order.
///
/// Frozen copy of the cart line at checkout time: later catalog changes never
/// reach it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    product_id: ProductId,
    product_name: String,
    quantity: u32,
    unit_price: Money,
    subtotal: Money,
}

impl OrderItem {
    /// Freezes a cart line under the given product name.
    pub(crate) fn snapshot(item: &CartItem, product_name: String) -> Result<Self, MoneyError> {
        Ok(Self {
            product_id: item.product_id(),
            product_name,
            quantity: item.quantity(),
            unit_price: item.unit_price().clone(),
            subtotal: item.subtotal()?,
        })
    }

    pub fn product_id(&self) -> ProductId {
        self.product_id
    }

    pub fn product_name(&self) -> &str {
        &self.product_name
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn unit_price(&self) -> &Money {
        &self.unit_price
    }

    pub fn subtotal(&self) -> &Money {
        &self.subtotal
    }
}

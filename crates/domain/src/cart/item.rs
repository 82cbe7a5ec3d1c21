use common::ProductId;
use serde::{Deserialize, Serialize};

use crate::aggregate::Aggregate;
use crate::money::{Money, MoneyError};
use crate::product::Product;

/// A line in a cart: one product, its quantity and the price captured when
/// the product was first added.
///
/// Quantity is always at least 1; a line that would drop to 0 is removed by
/// the owning [`Cart`](super::Cart) instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    product_id: ProductId,
    product_name: String,
    quantity: u32,
    unit_price: Money,
}

impl CartItem {
    /// Snapshots the product's name and current price.
    pub(crate) fn new(product: &Product, quantity: u32) -> Self {
        Self {
            product_id: product.id(),
            product_name: product.name().to_string(),
            quantity,
            unit_price: product.price().clone(),
        }
    }

    pub fn product_id(&self) -> ProductId {
        self.product_id
    }

    /// Product name as it was when the item was added.
    pub fn product_name(&self) -> &str {
        &self.product_name
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Unit price snapshot taken at add time.
    pub fn unit_price(&self) -> &Money {
        &self.unit_price
    }

    /// Returns `unit_price * quantity`.
    pub fn subtotal(&self) -> Result<Money, MoneyError> {
        self.unit_price.multiply(self.quantity)
    }

    pub(crate) fn with_quantity(&self, quantity: u32) -> Self {
        Self {
            quantity,
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subtotal() {
        let product = Product::new(
            ProductId::new(),
            "Widget",
            Money::new("10.50", "EUR").unwrap(),
            10,
        )
        .unwrap();
        let item = CartItem::new(&product, 3);

        assert_eq!(item.product_name(), "Widget");
        assert_eq!(item.subtotal().unwrap().amount().to_string(), "31.50");
        assert_eq!(item.with_quantity(1).subtotal().unwrap().amount().to_string(), "10.50");
    }

    #[test]
    fn test_snapshot_is_decoupled_from_product() {
        let mut product = Product::new(
            ProductId::new(),
            "Widget",
            Money::new("10.00", "EUR").unwrap(),
            10,
        )
        .unwrap();
        let item = CartItem::new(&product, 1);

        product.set_price(Money::new("99.00", "EUR").unwrap());
        product.rename("Renamed").unwrap();

        assert_eq!(item.unit_price().amount().to_string(), "10.00");
        assert_eq!(item.product_name(), "Widget");
    }
}

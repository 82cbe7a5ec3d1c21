//! Shopping cart aggregate and related types.

mod aggregate;
mod item;

pub use aggregate::Cart;
pub use item::CartItem;

use common::ProductId;
use thiserror::Error;

use crate::money::MoneyError;

/// Errors that can occur during cart operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartError {
    /// Quantities must be at least 1.
    #[error("Invalid quantity: {quantity} (must be greater than 0)")]
    InvalidQuantity { quantity: i64 },

    /// The requested or resulting quantity exceeds the product's stock.
    #[error(
        "Insufficient stock for product {product_id}: requested {requested}, available {available}"
    )]
    InsufficientStock {
        product_id: ProductId,
        requested: u64,
        available: u32,
    },

    /// The cart holds no line for this product.
    #[error("Item not found in cart: {product_id}")]
    ItemNotFound { product_id: ProductId },

    /// Price arithmetic failed, e.g. a product priced in another currency.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

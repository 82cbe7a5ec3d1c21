//! Read models handed to the transport layer.
//!
//! Monetary values are rendered as decimal strings with two fraction digits.

use std::collections::HashMap;

use common::ProductId;
use serde::{Deserialize, Serialize};

use crate::aggregate::Aggregate;
use crate::cart::{Cart, CartItem};
use crate::money::MoneyError;
use crate::product::Product;

/// Flat projection of a cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartDto {
    pub cart_id: String,
    pub session_id: Option<String>,
    pub currency: String,
    pub items: Vec<CartItemDto>,
    pub total_price: String,

    /// Number of distinct products.
    pub item_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItemDto {
    pub product_id: String,
    pub product_name: String,
    pub unit_price: String,
    pub quantity: u32,
    pub subtotal: String,
}

impl CartDto {
    /// Projects a cart, preferring the catalog names in `product_names` over
    /// the names captured when the items were added.
    pub fn from_cart(
        cart: &Cart,
        product_names: &HashMap<ProductId, String>,
    ) -> Result<Self, MoneyError> {
        let items = cart
            .items()
            .iter()
            .map(|item| CartItemDto::from_item(item, product_names))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            cart_id: cart.id().to_string(),
            session_id: cart.session_id().map(str::to_string),
            currency: cart.currency().to_string(),
            item_count: items.len(),
            items,
            total_price: cart.total_price().amount().to_string(),
        })
    }
}

impl CartItemDto {
    fn from_item(
        item: &CartItem,
        product_names: &HashMap<ProductId, String>,
    ) -> Result<Self, MoneyError> {
        let product_name = product_names
            .get(&item.product_id())
            .cloned()
            .unwrap_or_else(|| item.product_name().to_string());

        Ok(Self {
            product_id: item.product_id().to_string(),
            product_name,
            unit_price: item.unit_price().amount().to_string(),
            quantity: item.quantity(),
            subtotal: item.subtotal()?.amount().to_string(),
        })
    }
}

/// Catalog entry as listed to shoppers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDto {
    pub product_id: String,
    pub name: String,
    pub description: Option<String>,
    pub price: String,
    pub currency: String,
    pub stock: u32,
}

impl From<&Product> for ProductDto {
    fn from(product: &Product) -> Self {
        Self {
            product_id: product.id().to_string(),
            name: product.name().to_string(),
            description: product.description().map(str::to_string),
            price: product.price().amount().to_string(),
            currency: product.price().currency().to_string(),
            stock: product.stock(),
        }
    }
}

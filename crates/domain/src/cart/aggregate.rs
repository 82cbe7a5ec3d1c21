//! Cart aggregate implementation.

use chrono::{DateTime, Utc};
use common::{CartId, ProductId, Version};
use serde::{Deserialize, Serialize};

use crate::aggregate::Aggregate;
use crate::money::{Money, MoneyError};
use crate::product::Product;

use super::{CartError, CartItem};

/// Cart aggregate root.
///
/// Holds at most one [`CartItem`] per product, in insertion order. The total
/// price is a cached fold over the item subtotals; every mutation computes the
/// new item list and its total first and commits both together, so a failed
/// operation leaves the cart exactly as it was.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cart {
    /// Unique cart identifier.
    id: CartId,

    /// Current version for optimistic concurrency.
    #[serde(default)]
    version: Version,

    /// Browser/session the cart belongs to, if any.
    session_id: Option<String>,

    /// Currency every item price and the total are expressed in.
    currency: String,

    /// Lines in the cart, one per distinct product.
    items: Vec<CartItem>,

    /// Sum of all item subtotals.
    total_price: Money,

    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Aggregate for Cart {
    type Id = CartId;

    fn aggregate_type() -> &'static str {
        "Cart"
    }

    fn id(&self) -> CartId {
        self.id
    }

    fn version(&self) -> Version {
        self.version
    }

    fn set_version(&mut self, version: Version) {
        self.version = version;
    }
}

// Query methods
impl Cart {
    /// Creates an empty cart priced in `currency`.
    pub fn new(id: CartId, session_id: Option<String>, currency: &str) -> Result<Self, MoneyError> {
        let total_price = Money::zero(currency)?;
        let now = Utc::now();
        Ok(Self {
            id,
            version: Version::initial(),
            session_id,
            currency: total_price.currency().to_string(),
            items: Vec::new(),
            total_price,
            created_at: now,
            updated_at: now,
        })
    }

    /// Returns the session id.
    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    /// Returns the cart currency.
    pub fn currency(&self) -> &str {
        &self.currency
    }

    /// Returns all items in insertion order.
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Returns the item for a product.
    pub fn item(&self, product_id: ProductId) -> Option<&CartItem> {
        self.items
            .iter()
            .find(|item| item.product_id() == product_id)
    }

    /// Returns the number of distinct products.
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Returns the total quantity over all items.
    pub fn total_quantity(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity())).sum()
    }

    /// Returns the cached total price.
    pub fn total_price(&self) -> &Money {
        &self.total_price
    }

    /// Returns true if the cart has no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Folds the item subtotals into a total.
    ///
    /// Pure; does not update the cached total.
    pub fn calculate_total_price(&self) -> Result<Money, MoneyError> {
        sum_subtotals(&self.items, &self.currency)
    }
}

// Command methods
impl Cart {
    /// Adds `quantity` units of `product`.
    ///
    /// If the product is already in the cart its quantity is increased, and
    /// the resulting quantity must still fit the product's stock. New items
    /// capture the product's current price.
    pub fn add_item(&mut self, product: &Product, quantity: u32) -> Result<(), CartError> {
        let product_id = product.id();
        ensure_positive(quantity)?;
        ensure_stock(product, u64::from(quantity))?;

        let mut items = self.items.clone();
        match self.position(product_id).ok() {
            Some(index) => {
                let existing = &self.items[index];
                let requested = u64::from(existing.quantity()) + u64::from(quantity);
                let new_quantity = ensure_stock(product, requested)?;
                items[index] = existing.with_quantity(new_quantity);
            }
            None => items.push(CartItem::new(product, quantity)),
        }

        self.commit(items)
    }

    /// Replaces the quantity of an existing item.
    ///
    /// The quantity is absolute, not incremental, and must fit the product's
    /// stock.
    pub fn update_item_quantity(
        &mut self,
        product: &Product,
        quantity: u32,
    ) -> Result<(), CartError> {
        let product_id = product.id();
        let position = self.position(product_id)?;
        ensure_positive(quantity)?;
        ensure_stock(product, u64::from(quantity))?;

        let mut items = self.items.clone();
        if let Some(item) = items.get_mut(position) {
            *item = item.with_quantity(quantity);
        }

        self.commit(items)
    }

    /// Removes the item for a product and returns it.
    pub fn remove_item(&mut self, product_id: ProductId) -> Result<CartItem, CartError> {
        let position = self.position(product_id)?;

        let mut items = self.items.clone();
        let removed = items.remove(position);

        self.commit(items)?;
        Ok(removed)
    }

    /// Removes every item and resets the total to zero.
    pub fn clear(&mut self) {
        self.items.clear();
        self.total_price = self.total_price.zeroed();
        self.updated_at = Utc::now();
    }

    fn position(&self, product_id: ProductId) -> Result<usize, CartError> {
        self.items
            .iter()
            .position(|item| item.product_id() == product_id)
            .ok_or(CartError::ItemNotFound { product_id })
    }

    fn commit(&mut self, items: Vec<CartItem>) -> Result<(), CartError> {
        let total_price = sum_subtotals(&items, &self.currency)?;
        self.items = items;
        self.total_price = total_price;
        self.updated_at = Utc::now();
        Ok(())
    }
}

fn sum_subtotals(items: &[CartItem], currency: &str) -> Result<Money, MoneyError> {
    items.iter().try_fold(Money::zero(currency)?, |total, item| {
        total.add(&item.subtotal()?)
    })
}

fn ensure_positive(quantity: u32) -> Result<(), CartError> {
    if quantity == 0 {
        return Err(CartError::InvalidQuantity { quantity: 0 });
    }
    Ok(())
}

fn ensure_stock(product: &Product, requested: u64) -> Result<u32, CartError> {
    match u32::try_from(requested) {
        Ok(quantity) if product.has_stock(quantity) => Ok(quantity),
        _ => Err(CartError::InsufficientStock {
            product_id: product.id(),
            requested,
            available: product.stock(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(price: &str, stock: u32) -> Product {
        Product::new(
            ProductId::new(),
            "Widget",
            Money::new(price, "EUR").unwrap(),
            stock,
        )
        .unwrap()
    }

    fn empty_cart() -> Cart {
        Cart::new(CartId::new(), Some("session-1".to_string()), "EUR").unwrap()
    }

    fn assert_total_matches_items(cart: &Cart) {
        assert_eq!(cart.total_price(), &cart.calculate_total_price().unwrap());
    }

    #[test]
    fn test_new_cart_is_empty() {
        let cart = empty_cart();
        assert!(cart.is_empty());
        assert!(cart.total_price().is_zero());
        assert_eq!(cart.currency(), "EUR");
        assert_eq!(cart.session_id(), Some("session-1"));
        assert!(cart.is_new());
    }

    #[test]
    fn test_add_item() {
        let mut cart = empty_cart();
        let p1 = product("10.00", 100);

        cart.add_item(&p1, 2).unwrap();

        assert_eq!(cart.item_count(), 1);
        assert_eq!(cart.total_price().amount().to_string(), "20.00");
        assert_total_matches_items(&cart);
    }

    #[test]
    fn test_add_same_item_accumulates_quantity() {
        let mut cart = empty_cart();
        let p1 = product("10.00", 100);

        cart.add_item(&p1, 2).unwrap();
        cart.add_item(&p1, 3).unwrap();

        assert_eq!(cart.item_count(), 1);
        assert_eq!(cart.item(p1.id()).unwrap().quantity(), 5);
        assert_eq!(cart.total_price().amount().to_string(), "50.00");
        assert_total_matches_items(&cart);
    }

    #[test]
    fn test_merge_keeps_original_price_snapshot() {
        let mut cart = empty_cart();
        let mut p1 = product("10.00", 100);

        cart.add_item(&p1, 1).unwrap();
        p1.set_price(Money::new("12.00", "EUR").unwrap());
        cart.add_item(&p1, 1).unwrap();

        let item = cart.item(p1.id()).unwrap();
        assert_eq!(item.unit_price().amount().to_string(), "10.00");
        assert_eq!(cart.total_price().amount().to_string(), "20.00");
    }

    #[test]
    fn test_add_item_zero_quantity_fails() {
        let mut cart = empty_cart();
        let result = cart.add_item(&product("10.00", 100), 0);
        assert!(matches!(result, Err(CartError::InvalidQuantity { .. })));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_add_item_exceeding_stock_fails_and_leaves_cart_unchanged() {
        let mut cart = empty_cart();
        let p1 = product("10.00", 5);
        cart.add_item(&p1, 2).unwrap();
        let before = cart.clone();

        let result = cart.add_item(&p1, 6);
        assert!(matches!(
            result,
            Err(CartError::InsufficientStock {
                requested: 6,
                available: 5,
                ..
            })
        ));
        assert_eq!(cart, before);
    }

    #[test]
    fn test_merged_quantity_must_fit_stock() {
        let mut cart = empty_cart();
        let p1 = product("10.00", 5);
        cart.add_item(&p1, 3).unwrap();
        let before = cart.clone();

        let result = cart.add_item(&p1, 3);
        assert!(matches!(
            result,
            Err(CartError::InsufficientStock { requested: 6, .. })
        ));
        assert_eq!(cart, before);
    }

    #[test]
    fn test_add_item_in_other_currency_fails() {
        let mut cart = empty_cart();
        let dollars = Product::new(
            ProductId::new(),
            "Import",
            Money::new("5.00", "USD").unwrap(),
            10,
        )
        .unwrap();

        let result = cart.add_item(&dollars, 1);
        assert!(matches!(
            result,
            Err(CartError::Money(MoneyError::CurrencyMismatch { .. }))
        ));
        assert!(cart.is_empty());
        assert!(cart.total_price().is_zero());
    }

    #[test]
    fn test_update_item_quantity_is_absolute() {
        let mut cart = empty_cart();
        let p1 = product("10.00", 100);
        cart.add_item(&p1, 2).unwrap();

        cart.update_item_quantity(&p1, 7).unwrap();

        assert_eq!(cart.item(p1.id()).unwrap().quantity(), 7);
        assert_eq!(cart.total_price().amount().to_string(), "70.00");
        assert_total_matches_items(&cart);
    }

    #[test]
    fn test_update_missing_item_fails() {
        let mut cart = empty_cart();
        let p1 = product("10.00", 100);
        let p2 = product("15.00", 100);
        cart.add_item(&p1, 1).unwrap();
        let before = cart.clone();

        let result = cart.update_item_quantity(&p2, 1);
        assert!(matches!(result, Err(CartError::ItemNotFound { .. })));

        // Absence wins over any quantity problem.
        let result = cart.update_item_quantity(&p2, 0);
        assert!(matches!(result, Err(CartError::ItemNotFound { .. })));
        assert_eq!(cart, before);
    }

    #[test]
    fn test_update_item_quantity_validates_quantity_and_stock() {
        let mut cart = empty_cart();
        let p1 = product("10.00", 4);
        cart.add_item(&p1, 2).unwrap();
        let before = cart.clone();

        assert!(matches!(
            cart.update_item_quantity(&p1, 0),
            Err(CartError::InvalidQuantity { .. })
        ));
        assert!(matches!(
            cart.update_item_quantity(&p1, 5),
            Err(CartError::InsufficientStock { .. })
        ));
        assert_eq!(cart, before);
    }

    #[test]
    fn test_remove_item() {
        let mut cart = empty_cart();
        let p1 = product("10.00", 100);
        let p2 = product("15.00", 100);
        cart.add_item(&p1, 2).unwrap();
        cart.add_item(&p2, 1).unwrap();

        let removed = cart.remove_item(p2.id()).unwrap();

        assert_eq!(removed.product_id(), p2.id());
        assert_eq!(cart.item_count(), 1);
        assert_eq!(cart.total_price().amount().to_string(), "20.00");

        let result = cart.remove_item(p2.id());
        assert!(matches!(result, Err(CartError::ItemNotFound { .. })));
        assert_eq!(cart.total_price().amount().to_string(), "20.00");
    }

    #[test]
    fn test_items_keep_insertion_order() {
        let mut cart = empty_cart();
        let products: Vec<_> = (0..4).map(|_| product("1.00", 10)).collect();
        for p in &products {
            cart.add_item(p, 1).unwrap();
        }
        cart.add_item(&products[0], 1).unwrap();

        let ids: Vec<_> = cart.items().iter().map(CartItem::product_id).collect();
        let expected: Vec<_> = products.iter().map(Product::id).collect();
        assert_eq!(ids, expected);
        assert_eq!(cart.total_quantity(), 5);
    }

    #[test]
    fn test_clear() {
        let mut cart = empty_cart();
        cart.add_item(&product("10.00", 100), 2).unwrap();

        cart.clear();

        assert!(cart.is_empty());
        assert_eq!(cart.total_price().amount().to_string(), "0.00");
        assert_eq!(cart.total_price().currency(), "EUR");
    }

    #[test]
    fn test_invalid_currency_rejected() {
        assert!(matches!(
            Cart::new(CartId::new(), None, "EURO"),
            Err(MoneyError::InvalidCurrency(_))
        ));
    }

    #[test]
    fn test_serialization() {
        let mut cart = empty_cart();
        cart.add_item(&product("10.00", 100), 2).unwrap();

        let json = serde_json::to_string(&cart).unwrap();
        let deserialized: Cart = serde_json::from_str(&json).unwrap();

        assert_eq!(deserialized, cart);
    }
}

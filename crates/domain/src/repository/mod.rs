//! Persistence contracts for the cart, product and order aggregates.
//!
//! Every `save` is an optimistic-concurrency write: the aggregate's version
//! must match the stored version (or be initial for an aggregate that was
//! never stored), and the stored copy is bumped to the returned version.

mod memory;

use std::sync::Arc;

use async_trait::async_trait;
use common::{CartId, OrderId, ProductId, Version};
use thiserror::Error;

use crate::cart::Cart;
use crate::order::{Order, OrderStatus};
use crate::product::Product;

pub use memory::InMemoryStore;

/// Errors that can occur when interacting with a repository.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    /// The stored version did not match the version being saved.
    #[error(
        "Concurrency conflict for {aggregate_type} {aggregate_id}: expected version {expected}, found {actual}"
    )]
    ConcurrencyConflict {
        aggregate_type: &'static str,
        aggregate_id: String,
        expected: Version,
        actual: Version,
    },

    /// The backing store failed.
    #[error("Storage error: {0}")]
    Storage(String),
}

/// Result type for repository operations.
pub type Result<T> = std::result::Result<T, RepositoryError>;

#[async_trait]
pub trait CartRepository: Send + Sync {
    async fn find_by_cart_id(&self, id: CartId) -> Result<Option<Cart>>;

    /// Returns the first cart stored for a session.
    async fn find_by_session_id(&self, session_id: &str) -> Result<Option<Cart>>;

    /// Saves the cart and returns its new version.
    async fn save(&self, cart: &Cart) -> Result<Version>;

    /// Removes a cart. Returns false if it was not stored.
    async fn remove(&self, id: CartId) -> Result<bool>;

    async fn find_all(&self) -> Result<Vec<Cart>>;
}

#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn find_by_product_id(&self, id: ProductId) -> Result<Option<Product>>;

    /// Looks a product up by its exact name, ignoring case.
    async fn find_by_name(&self, name: &str) -> Result<Option<Product>>;

    /// Returns the stored products among `ids`. Unknown ids are skipped.
    async fn find_by_ids(&self, ids: &[ProductId]) -> Result<Vec<Product>>;

    /// Returns every product with at least one unit in stock.
    async fn find_in_stock(&self) -> Result<Vec<Product>>;

    async fn find_all(&self) -> Result<Vec<Product>>;

    /// Saves the product and returns its new version.
    async fn save(&self, product: &Product) -> Result<Version>;

    async fn remove(&self, id: ProductId) -> Result<bool>;
}

#[async_trait]
pub trait OrderRepository: Send + Sync {
    async fn find_by_order_id(&self, id: OrderId) -> Result<Option<Order>>;

    async fn find_by_order_number(&self, order_number: &str) -> Result<Option<Order>>;

    /// Returns all orders placed with an email address, ignoring case.
    async fn find_by_customer_email(&self, email: &str) -> Result<Vec<Order>>;

    async fn find_by_status(&self, status: OrderStatus) -> Result<Vec<Order>>;

    /// Saves the order and returns its new version.
    async fn save(&self, order: &Order) -> Result<Version>;

    async fn remove(&self, id: OrderId) -> Result<bool>;

    async fn find_all(&self) -> Result<Vec<Order>>;
}

/// Versions produced by a successful checkout commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckoutVersions {
    pub order: Version,
    pub cart: Version,
}

/// Unit of work spanning the two writes of a checkout.
#[async_trait]
pub trait CheckoutTransaction: Send + Sync {
    /// Stores a new order and the cleared cart it was placed from.
    ///
    /// Both writes happen or neither does. The order must be new and the cart
    /// must still be at the version it was loaded with.
    async fn commit_checkout(&self, order: &Order, cart: &Cart) -> Result<CheckoutVersions>;
}

/// The set of persistence collaborators an application service works with.
#[derive(Clone)]
pub struct Repositories {
    pub carts: Arc<dyn CartRepository>,
    pub products: Arc<dyn ProductRepository>,
    pub orders: Arc<dyn OrderRepository>,
    pub checkout: Arc<dyn CheckoutTransaction>,
}

//! Domain layer for the shopping cart system.
//!
//! This crate provides:
//! - `Money`, the decimal amount type every price is expressed in
//! - `Product`, `Cart` and `Order` aggregates with their invariants
//! - Repository traits and an in-memory implementation
//! - `CartService`, which orchestrates them for the transport layer

pub mod aggregate;
pub mod application;
pub mod cart;
pub mod error;
pub mod id_generator;
pub mod money;
pub mod order;
pub mod product;
pub mod repository;

pub use aggregate::Aggregate;
pub use application::{
    AddItemToCart, CartDto, CartItemDto, CartService, CheckoutCart, CreateCart, GetCart,
    ProductDto, RemoveItemFromCart, UpdateCartItemQuantity,
};
pub use cart::{Cart, CartError, CartItem};
pub use error::{DomainError, ErrorKind};
pub use id_generator::{IdGenerator, UuidGenerator};
pub use money::{Money, MoneyError};
pub use order::{CustomerDetails, Order, OrderError, OrderItem, OrderStatus};
pub use product::{Product, ProductError};
pub use repository::{
    CartRepository, CheckoutTransaction, CheckoutVersions, InMemoryStore, OrderRepository,
    ProductRepository, Repositories, RepositoryError,
};

//! Command/query handling on top of the aggregates and repositories.

mod commands;
mod dto;
mod service;

pub use commands::{
    AddItemToCart, CheckoutCart, CreateCart, GetCart, RemoveItemFromCart, UpdateCartItemQuantity,
};
pub use dto::{CartDto, CartItemDto, ProductDto};
pub use service::CartService;

//! HTTP handlers.

pub mod carts;
pub mod products;
pub mod system;

use domain::CartService;

/// Shared application state accessible from all handlers.
pub struct AppState {
    pub cart_service: CartService,

    /// Currency for carts created without an explicit one.
    pub default_currency: String,
}

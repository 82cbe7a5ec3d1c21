//! Shared identity types for the shopping cart system.
//!
//! Every aggregate is identified by a UUID-backed newtype so that a cart id can
//! never be passed where a product id is expected.

pub mod types;
pub mod version;

pub use types::{CartId, IdError, OrderId, ProductId};
pub use version::Version;

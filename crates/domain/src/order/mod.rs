//! Order aggregate and related types.

mod aggregate;
mod item;
mod state;

pub use aggregate::{CustomerDetails, Order};
pub use item::OrderItem;
pub use state::OrderStatus;

use common::CartId;
use thiserror::Error;

use crate::money::MoneyError;

/// Errors that can occur during order operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrderError {
    /// Checkout was attempted on a cart without items.
    #[error("Cannot checkout empty cart {cart_id}")]
    EmptyCart { cart_id: CartId },

    /// The customer email is blank or malformed.
    #[error("Invalid customer email: '{0}'")]
    InvalidCustomerEmail(String),

    /// The status cannot move to the requested status.
    #[error("Invalid status transition: cannot move from {from} to {to}")]
    InvalidStatusTransition { from: OrderStatus, to: OrderStatus },

    /// The status name is not known.
    #[error("Unknown order status: '{0}'")]
    UnknownStatus(String),

    /// Price arithmetic failed while building the order.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

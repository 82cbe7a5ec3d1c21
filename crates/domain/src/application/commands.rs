//! Commands and queries accepted by the cart service.
//!
//! Identifiers and quantities arrive as raw transport values and are
//! validated by the service, so malformed input surfaces as a domain error.

/// Command to open a new, empty cart.
#[derive(Debug, Clone)]
pub struct CreateCart {
    /// Browser session the cart is bound to.
    pub session_id: Option<String>,

    /// Currency all prices in the cart are expressed in.
    pub currency: String,
}

impl CreateCart {
    pub fn new(session_id: Option<String>, currency: impl Into<String>) -> Self {
        Self {
            session_id,
            currency: currency.into(),
        }
    }
}

/// Command to add units of a product to a cart.
#[derive(Debug, Clone)]
pub struct AddItemToCart {
    pub cart_id: String,
    pub product_id: String,

    /// Units to add on top of any already in the cart.
    pub quantity: i64,
}

impl AddItemToCart {
    pub fn new(cart_id: impl Into<String>, product_id: impl Into<String>, quantity: i64) -> Self {
        Self {
            cart_id: cart_id.into(),
            product_id: product_id.into(),
            quantity,
        }
    }
}

/// Command to replace the quantity of a cart item.
#[derive(Debug, Clone)]
pub struct UpdateCartItemQuantity {
    pub cart_id: String,
    pub product_id: String,

    /// The new absolute quantity.
    pub quantity: i64,
}

impl UpdateCartItemQuantity {
    pub fn new(cart_id: impl Into<String>, product_id: impl Into<String>, quantity: i64) -> Self {
        Self {
            cart_id: cart_id.into(),
            product_id: product_id.into(),
            quantity,
        }
    }
}

/// Command to remove a product from a cart.
#[derive(Debug, Clone)]
pub struct RemoveItemFromCart {
    pub cart_id: String,
    pub product_id: String,
}

impl RemoveItemFromCart {
    pub fn new(cart_id: impl Into<String>, product_id: impl Into<String>) -> Self {
        Self {
            cart_id: cart_id.into(),
            product_id: product_id.into(),
        }
    }
}

/// Command to turn a cart into an order.
#[derive(Debug, Clone)]
pub struct CheckoutCart {
    pub cart_id: String,
    pub customer_email: String,
    pub customer_name: Option<String>,
}

impl CheckoutCart {
    pub fn new(
        cart_id: impl Into<String>,
        customer_email: impl Into<String>,
        customer_name: Option<String>,
    ) -> Self {
        Self {
            cart_id: cart_id.into(),
            customer_email: customer_email.into(),
            customer_name,
        }
    }
}

/// Query for the read model of a cart.
#[derive(Debug, Clone)]
pub struct GetCart {
    pub cart_id: String,
}

impl GetCart {
    pub fn new(cart_id: impl Into<String>) -> Self {
        Self {
            cart_id: cart_id.into(),
        }
    }
}

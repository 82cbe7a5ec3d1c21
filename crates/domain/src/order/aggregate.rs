//! Order aggregate implementation.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use common::{CartId, OrderId, ProductId, Version};
use serde::{Deserialize, Serialize};

use crate::aggregate::Aggregate;
use crate::cart::Cart;
use crate::money::Money;

use super::{OrderError, OrderItem, OrderStatus};

/// Contact details captured at checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerDetails {
    email: String,
    name: Option<String>,
}

impl CustomerDetails {
    /// Validates the email and normalizes a blank name to `None`.
    pub fn new(email: &str, name: Option<String>) -> Result<Self, OrderError> {
        let email = email.trim();
        let valid = email
            .split_once('@')
            .is_some_and(|(local, domain)| !local.is_empty() && !domain.is_empty());
        if !valid || email.chars().any(char::is_whitespace) {
            return Err(OrderError::InvalidCustomerEmail(email.to_string()));
        }

        let name = name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty());

        Ok(Self {
            email: email.to_string(),
            name,
        })
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

/// Order aggregate root.
///
/// An immutable snapshot of a cart taken at checkout. Only the status may
/// change afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    /// Unique order identifier.
    id: OrderId,

    /// Current version for optimistic concurrency.
    #[serde(default)]
    version: Version,

    /// Human-readable reference, e.g. `ORD-20240131-3F2A9C1B7D4E`.
    order_number: String,

    /// Cart the order was placed from.
    cart_id: CartId,

    customer: CustomerDetails,

    /// Lines in cart order.
    items: Vec<OrderItem>,

    /// Cart total at checkout.
    total_amount: Money,

    status: OrderStatus,

    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Aggregate for Order {
    type Id = OrderId;

    fn aggregate_type() -> &'static str {
        "Order"
    }

    fn id(&self) -> OrderId {
        self.id
    }

    fn version(&self) -> Version {
        self.version
    }

    fn set_version(&mut self, version: Version) {
        self.version = version;
    }
}

impl Order {
    /// Places a `Pending` order from the cart's current contents.
    ///
    /// `product_names` holds the catalog names at checkout time; lines whose
    /// product is missing from it keep the name captured by the cart.
    pub fn place(
        id: OrderId,
        cart: &Cart,
        customer: CustomerDetails,
        product_names: &HashMap<ProductId, String>,
    ) -> Result<Self, OrderError> {
        if cart.is_empty() {
            return Err(OrderError::EmptyCart { cart_id: cart.id() });
        }

        let items = cart
            .items()
            .iter()
            .map(|item| {
                let name = product_names
                    .get(&item.product_id())
                    .cloned()
                    .unwrap_or_else(|| item.product_name().to_string());
                OrderItem::snapshot(item, name)
            })
            .collect::<Result<Vec<_>, _>>()?;

        let now = Utc::now();
        Ok(Self {
            id,
            version: Version::initial(),
            order_number: order_number(id, now),
            cart_id: cart.id(),
            customer,
            items,
            total_amount: cart.total_price().clone(),
            status: OrderStatus::Pending,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn order_number(&self) -> &str {
        &self.order_number
    }

    pub fn cart_id(&self) -> CartId {
        self.cart_id
    }

    pub fn customer_email(&self) -> &str {
        self.customer.email()
    }

    pub fn customer_name(&self) -> Option<&str> {
        self.customer.name()
    }

    pub fn items(&self) -> &[OrderItem] {
        &self.items
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Returns the total quantity of all items.
    pub fn total_quantity(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity())).sum()
    }

    pub fn total_amount(&self) -> &Money {
        &self.total_amount
    }

    pub fn status(&self) -> OrderStatus {
        self.status
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Moves the order to `next` if the status machine allows it.
    pub fn transition_to(&mut self, next: OrderStatus) -> Result<(), OrderError> {
        if !self.status.can_transition_to(next) {
            return Err(OrderError::InvalidStatusTransition {
                from: self.status,
                to: next,
            });
        }
        self.status = next;
        self.updated_at = Utc::now();
        Ok(())
    }
}

fn order_number(id: OrderId, placed_at: DateTime<Utc>) -> String {
    let suffix: String = id
        .as_uuid()
        .simple()
        .to_string()
        .to_ascii_uppercase()
        .chars()
        .take(12)
        .collect();
    format!("ORD-{}-{suffix}", placed_at.format("%Y%m%d"))
}

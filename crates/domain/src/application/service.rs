//! Cart service orchestrating repositories and aggregates.

use std::collections::HashMap;
use std::sync::Arc;

use common::{CartId, OrderId, ProductId};

use crate::aggregate::Aggregate;
use crate::cart::{Cart, CartError};
use crate::error::DomainError;
use crate::id_generator::{IdGenerator, UuidGenerator};
use crate::order::{CustomerDetails, Order, OrderError};
use crate::product::Product;
use crate::repository::Repositories;

use super::{
    AddItemToCart, CartDto, CheckoutCart, CreateCart, GetCart, RemoveItemFromCart,
    UpdateCartItemQuantity,
};

/// Application service for carts and checkout.
///
/// Every command loads the aggregates it needs, lets them enforce their
/// invariants and persists only after all checks have passed. Saves are
/// version-checked, so a concurrent update to the same cart fails with a
/// concurrency conflict instead of being overwritten.
#[derive(Clone)]
pub struct CartService {
    repositories: Repositories,
    ids: Arc<dyn IdGenerator>,
}

impl CartService {
    /// Creates a service that allocates random UUIDs.
    pub fn new(repositories: Repositories) -> Self {
        Self::with_id_generator(repositories, Arc::new(UuidGenerator))
    }

    pub fn with_id_generator(repositories: Repositories, ids: Arc<dyn IdGenerator>) -> Self {
        Self { repositories, ids }
    }

    pub fn repositories(&self) -> &Repositories {
        &self.repositories
    }

    pub fn id_generator(&self) -> &dyn IdGenerator {
        self.ids.as_ref()
    }

    /// Opens a new, empty cart.
    ///
    /// A cart opened without a session gets one from the id generator, so
    /// every cart can be found again by session.
    #[tracing::instrument(skip(self))]
    pub async fn create_cart(&self, cmd: CreateCart) -> Result<Cart, DomainError> {
        let session_id = cmd
            .session_id
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| self.ids.session_id());
        let mut cart = Cart::new(self.ids.cart_id(), Some(session_id), &cmd.currency)?;

        let version = self.repositories.carts.save(&cart).await?;
        cart.set_version(version);

        metrics::counter!("carts_created_total").increment(1);
        tracing::info!(cart_id = %cart.id(), currency = cart.currency(), "cart created");
        Ok(cart)
    }

    /// Adds units of a product, merging with an existing line.
    #[tracing::instrument(skip(self))]
    pub async fn add_item(&self, cmd: AddItemToCart) -> Result<(), DomainError> {
        let cart_id = CartId::parse(&cmd.cart_id)?;
        let product_id = ProductId::parse(&cmd.product_id)?;
        let quantity = parse_quantity(cmd.quantity)?;

        let mut cart = self.load_cart(cart_id).await?;
        let product = self.load_product(product_id).await?;

        cart.add_item(&product, quantity)?;
        let version = self.repositories.carts.save(&cart).await?;
        cart.set_version(version);

        metrics::counter!("cart_items_added_total").increment(u64::from(quantity));
        Ok(())
    }

    /// Replaces the quantity of a product already in the cart.
    #[tracing::instrument(skip(self))]
    pub async fn update_item_quantity(&self, cmd: UpdateCartItemQuantity) -> Result<(), DomainError> {
        let cart_id = CartId::parse(&cmd.cart_id)?;
        let product_id = ProductId::parse(&cmd.product_id)?;

        let mut cart = self.load_cart(cart_id).await?;
        let product = self.load_product(product_id).await?;

        if cart.item(product_id).is_none() {
            return Err(CartError::ItemNotFound { product_id }.into());
        }
        let quantity = parse_quantity(cmd.quantity)?;

        cart.update_item_quantity(&product, quantity)?;
        let version = self.repositories.carts.save(&cart).await?;
        cart.set_version(version);

        metrics::counter!("cart_items_updated_total").increment(1);
        Ok(())
    }

    /// Removes a product from the cart.
    ///
    /// The product must still exist in the catalog.
    #[tracing::instrument(skip(self))]
    pub async fn remove_item(&self, cmd: RemoveItemFromCart) -> Result<(), DomainError> {
        let cart_id = CartId::parse(&cmd.cart_id)?;
        let product_id = ProductId::parse(&cmd.product_id)?;

        let mut cart = self.load_cart(cart_id).await?;
        self.load_product(product_id).await?;

        cart.remove_item(product_id)?;
        let version = self.repositories.carts.save(&cart).await?;
        cart.set_version(version);

        metrics::counter!("cart_items_removed_total").increment(1);
        Ok(())
    }

    /// Places an order from the cart and empties the cart.
    ///
    /// The order and the cleared cart are committed together. Product stock
    /// is not decremented.
    #[tracing::instrument(skip(self, cmd), fields(cart_id = %cmd.cart_id))]
    pub async fn checkout(&self, cmd: CheckoutCart) -> Result<OrderId, DomainError> {
        let started = std::time::Instant::now();
        let result = self.place_order(cmd).await;
        metrics::histogram!("checkout_duration_seconds").record(started.elapsed().as_secs_f64());

        match &result {
            Ok(_) => metrics::counter!("checkouts_total").increment(1),
            Err(e) => {
                metrics::counter!("checkout_failures_total", "kind" => e.kind().code())
                    .increment(1);
                tracing::warn!(error = %e, "checkout failed");
            }
        }
        result
    }

    async fn place_order(&self, cmd: CheckoutCart) -> Result<OrderId, DomainError> {
        let cart_id = CartId::parse(&cmd.cart_id)?;
        let mut cart = self.load_cart(cart_id).await?;

        if cart.is_empty() {
            return Err(OrderError::EmptyCart { cart_id }.into());
        }
        let customer = CustomerDetails::new(&cmd.customer_email, cmd.customer_name)?;

        let names = self.current_names(&cart).await?;
        let order = Order::place(self.ids.order_id(), &cart, customer, &names)?;
        cart.clear();

        let versions = self
            .repositories
            .checkout
            .commit_checkout(&order, &cart)
            .await?;

        tracing::info!(
            order_id = %order.id(),
            order_number = order.order_number(),
            total = %order.total_amount(),
            order_version = %versions.order,
            "order placed"
        );
        Ok(order.id())
    }

    /// Returns the read model of a cart, or `None` if it does not exist.
    #[tracing::instrument(skip(self))]
    pub async fn get_cart(&self, query: GetCart) -> Result<Option<CartDto>, DomainError> {
        let cart_id = CartId::parse(&query.cart_id)?;
        match self.repositories.carts.find_by_cart_id(cart_id).await? {
            Some(cart) => Ok(Some(self.project(&cart).await?)),
            None => Ok(None),
        }
    }

    /// Returns the read model of the cart bound to a session.
    #[tracing::instrument(skip(self))]
    pub async fn get_cart_by_session(
        &self,
        session_id: &str,
    ) -> Result<Option<CartDto>, DomainError> {
        match self
            .repositories
            .carts
            .find_by_session_id(session_id.trim())
            .await?
        {
            Some(cart) => Ok(Some(self.project(&cart).await?)),
            None => Ok(None),
        }
    }

    /// Lists catalog products with at least one unit in stock.
    #[tracing::instrument(skip(self))]
    pub async fn list_products_in_stock(&self) -> Result<Vec<Product>, DomainError> {
        Ok(self.repositories.products.find_in_stock().await?)
    }

    // Helpers

    async fn load_cart(&self, cart_id: CartId) -> Result<Cart, DomainError> {
        self.repositories
            .carts
            .find_by_cart_id(cart_id)
            .await?
            .ok_or(DomainError::CartNotFound(cart_id))
    }

    async fn load_product(&self, product_id: ProductId) -> Result<Product, DomainError> {
        self.repositories
            .products
            .find_by_product_id(product_id)
            .await?
            .ok_or(DomainError::ProductNotFound(product_id))
    }

    /// Current catalog names for the products in a cart.
    async fn current_names(&self, cart: &Cart) -> Result<HashMap<ProductId, String>, DomainError> {
        let ids: Vec<_> = cart.items().iter().map(|item| item.product_id()).collect();
        let products = self.repositories.products.find_by_ids(&ids).await?;
        Ok(products
            .into_iter()
            .map(|product| (product.id(), product.name().to_string()))
            .collect())
    }

    async fn project(&self, cart: &Cart) -> Result<CartDto, DomainError> {
        let names = self.current_names(cart).await?;
        Ok(CartDto::from_cart(cart, &names)?)
    }
}

/// Validates a raw quantity. Non-positive values are an invalid quantity;
/// values beyond `u32` are an invalid argument.
fn parse_quantity(quantity: i64) -> Result<u32, DomainError> {
    if quantity < 1 {
        return Err(CartError::InvalidQuantity { quantity }.into());
    }
    u32::try_from(quantity)
        .map_err(|_| DomainError::InvalidArgument(format!("quantity {quantity} is out of range")))
}

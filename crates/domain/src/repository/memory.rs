use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use common::{CartId, OrderId, ProductId, Version};
use tokio::sync::RwLock;

use crate::aggregate::Aggregate;
use crate::cart::Cart;
use crate::order::{Order, OrderStatus};
use crate::product::Product;

use super::{
    CartRepository, CheckoutTransaction, CheckoutVersions, OrderRepository, ProductRepository,
    Repositories, RepositoryError, Result,
};

/// Versioned rows of one aggregate type, in insertion order.
struct Table<A: Aggregate> {
    rows: Vec<A>,
}

impl<A: Aggregate> Default for Table<A> {
    fn default() -> Self {
        Self { rows: Vec::new() }
    }
}

impl<A: Aggregate> Table<A> {
    fn get(&self, id: A::Id) -> Option<&A> {
        self.rows.iter().find(|row| row.id() == id)
    }

    fn matching(&self, predicate: impl Fn(&A) -> bool) -> Vec<A> {
        self.rows.iter().filter(|row| predicate(row)).cloned().collect()
    }

    /// Returns the version the aggregate will be stored at.
    fn check(&self, aggregate: &A) -> Result<Version> {
        let actual = self
            .get(aggregate.id())
            .map(|row| row.version())
            .unwrap_or_else(Version::initial);
        let expected = aggregate.version();

        if actual != expected {
            tracing::warn!(
                aggregate_type = A::aggregate_type(),
                aggregate_id = %aggregate.id(),
                %expected,
                %actual,
                "Rejected stale write"
            );
            return Err(RepositoryError::ConcurrencyConflict {
                aggregate_type: A::aggregate_type(),
                aggregate_id: aggregate.id().to_string(),
                expected,
                actual,
            });
        }
        Ok(expected.next())
    }

    fn put(&mut self, aggregate: &A, version: Version) {
        let mut stored = aggregate.clone();
        stored.set_version(version);
        match self.rows.iter_mut().find(|row| row.id() == stored.id()) {
            Some(row) => *row = stored,
            None => self.rows.push(stored),
        }
    }

    fn save(&mut self, aggregate: &A) -> Result<Version> {
        let version = self.check(aggregate)?;
        self.put(aggregate, version);
        Ok(version)
    }

    fn remove(&mut self, id: A::Id) -> bool {
        let before = self.rows.len();
        self.rows.retain(|row| row.id() != id);
        self.rows.len() != before
    }
}

#[derive(Default)]
struct Tables {
    carts: Table<Cart>,
    products: Table<Product>,
    orders: Table<Order>,
}

/// In-memory store backing every repository trait.
///
/// All tables sit behind one lock, so a checkout commit is atomic with
/// respect to every other read and write. Clones share the same data.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<RwLock<Tables>>,
    fail_next_commit: Arc<AtomicBool>,
}

impl InMemoryStore {
    /// Creates a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the next checkout commit fail with a storage error after its
    /// version checks have passed.
    pub fn fail_next_commit(&self) {
        self.fail_next_commit.store(true, Ordering::SeqCst);
    }

    /// Returns every repository trait backed by this store.
    pub fn repositories(&self) -> Repositories {
        Repositories {
            carts: Arc::new(self.clone()),
            products: Arc::new(self.clone()),
            orders: Arc::new(self.clone()),
            checkout: Arc::new(self.clone()),
        }
    }
}

#[async_trait]
impl CartRepository for InMemoryStore {
    async fn find_by_cart_id(&self, id: CartId) -> Result<Option<Cart>> {
        Ok(self.tables.read().await.carts.get(id).cloned())
    }

    async fn find_by_session_id(&self, session_id: &str) -> Result<Option<Cart>> {
        let tables = self.tables.read().await;
        Ok(tables
            .carts
            .rows
            .iter()
            .find(|cart| cart.session_id() == Some(session_id))
            .cloned())
    }

    async fn save(&self, cart: &Cart) -> Result<Version> {
        self.tables.write().await.carts.save(cart)
    }

    async fn remove(&self, id: CartId) -> Result<bool> {
        Ok(self.tables.write().await.carts.remove(id))
    }

    async fn find_all(&self) -> Result<Vec<Cart>> {
        Ok(self.tables.read().await.carts.matching(|_| true))
    }
}

#[async_trait]
impl ProductRepository for InMemoryStore {
    async fn find_by_product_id(&self, id: ProductId) -> Result<Option<Product>> {
        Ok(self.tables.read().await.products.get(id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Product>> {
        let name = name.trim();
        let tables = self.tables.read().await;
        Ok(tables
            .products
            .rows
            .iter()
            .find(|product| product.name().eq_ignore_ascii_case(name))
            .cloned())
    }

    async fn find_by_ids(&self, ids: &[ProductId]) -> Result<Vec<Product>> {
        let tables = self.tables.read().await;
        Ok(tables.products.matching(|product| ids.contains(&product.id())))
    }

    async fn find_in_stock(&self) -> Result<Vec<Product>> {
        Ok(self.tables.read().await.products.matching(Product::is_in_stock))
    }

    async fn find_all(&self) -> Result<Vec<Product>> {
        Ok(self.tables.read().await.products.matching(|_| true))
    }

    async fn save(&self, product: &Product) -> Result<Version> {
        self.tables.write().await.products.save(product)
    }

    async fn remove(&self, id: ProductId) -> Result<bool> {
        Ok(self.tables.write().await.products.remove(id))
    }
}

#[async_trait]
impl OrderRepository for InMemoryStore {
    async fn find_by_order_id(&self, id: OrderId) -> Result<Option<Order>> {
        Ok(self.tables.read().await.orders.get(id).cloned())
    }

    async fn find_by_order_number(&self, order_number: &str) -> Result<Option<Order>> {
        let tables = self.tables.read().await;
        Ok(tables
            .orders
            .rows
            .iter()
            .find(|order| order.order_number() == order_number)
            .cloned())
    }

    async fn find_by_customer_email(&self, email: &str) -> Result<Vec<Order>> {
        let email = email.trim();
        let tables = self.tables.read().await;
        Ok(tables
            .orders
            .matching(|order| order.customer_email().eq_ignore_ascii_case(email)))
    }

    async fn find_by_status(&self, status: OrderStatus) -> Result<Vec<Order>> {
        let tables = self.tables.read().await;
        Ok(tables.orders.matching(|order| order.status() == status))
    }

    async fn save(&self, order: &Order) -> Result<Version> {
        self.tables.write().await.orders.save(order)
    }

    async fn remove(&self, id: OrderId) -> Result<bool> {
        Ok(self.tables.write().await.orders.remove(id))
    }

    async fn find_all(&self) -> Result<Vec<Order>> {
        Ok(self.tables.read().await.orders.matching(|_| true))
    }
}

#[async_trait]
impl CheckoutTransaction for InMemoryStore {
    async fn commit_checkout(&self, order: &Order, cart: &Cart) -> Result<CheckoutVersions> {
        let mut tables = self.tables.write().await;

        // Validate both writes before touching either table
        let order_version = tables.orders.check(order)?;
        let cart_version = tables.carts.check(cart)?;

        if self.fail_next_commit.swap(false, Ordering::SeqCst) {
            return Err(RepositoryError::Storage(
                "checkout commit aborted".to_string(),
            ));
        }

        tables.orders.put(order, order_version);
        tables.carts.put(cart, cart_version);

        Ok(CheckoutVersions {
            order: order_version,
            cart: cart_version,
        })
    }
}

//! Demo catalog loaded at startup.
//!
//! Catalog management is not exposed over HTTP, so a fresh server would have
//! nothing to sell without it.

use domain::{DomainError, IdGenerator, Money, Product, ProductRepository};

const DEMO_PRODUCTS: &[(&str, &str, &str, u32)] = &[
    ("Mechanical Keyboard", "Tenkeyless, brown switches", "89.90", 25),
    ("Wireless Mouse", "Ergonomic, 2.4 GHz receiver", "34.50", 60),
    ("USB-C Hub", "7 ports, 100 W passthrough", "45.00", 40),
    ("Laptop Stand", "Aluminium, adjustable height", "29.99", 15),
    ("Webcam", "1080p, built-in microphone", "59.00", 0),
];

/// Stores the demo products priced in `currency` and returns them.
pub async fn seed(
    products: &dyn ProductRepository,
    ids: &dyn IdGenerator,
    currency: &str,
) -> Result<Vec<Product>, DomainError> {
    let mut seeded = Vec::with_capacity(DEMO_PRODUCTS.len());

    for &(name, description, price, stock) in DEMO_PRODUCTS {
        let product = Product::new(ids.product_id(), name, Money::new(price, currency)?, stock)?
            .with_description(description);
        products.save(&product).await?;
        seeded.push(product);
    }

    tracing::info!(count = seeded.len(), currency, "seeded demo catalog");
    Ok(seeded)
}

#[cfg(test)]
mod tests {
    use domain::{InMemoryStore, UuidGenerator};

    use super::*;

    #[tokio::test]
    async fn test_seed_catalog() {
        let store = InMemoryStore::new();
        let seeded = seed(&store, &UuidGenerator, "usd").await.unwrap();

        assert_eq!(seeded.len(), DEMO_PRODUCTS.len());
        assert!(seeded.iter().all(|p| p.price().currency() == "USD"));

        let in_stock = store.find_in_stock().await.unwrap();
        assert_eq!(in_stock.len(), DEMO_PRODUCTS.len() - 1);
    }
}

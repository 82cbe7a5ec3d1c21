//! Identifier allocation for new aggregates.

use common::{CartId, OrderId, ProductId};
use uuid::Uuid;

/// Allocates identifiers for new aggregates.
///
/// Implementations must never hand out the same identifier twice within a
/// deployment.
pub trait IdGenerator: Send + Sync {
    fn cart_id(&self) -> CartId;
    fn product_id(&self) -> ProductId;
    fn order_id(&self) -> OrderId;

    /// Session identifier for a cart opened without one.
    fn session_id(&self) -> String;
}

/// Random (v4) UUID generator.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn cart_id(&self) -> CartId {
        CartId::new()
    }

    fn product_id(&self) -> ProductId {
        ProductId::new()
    }

    fn order_id(&self) -> OrderId {
        OrderId::new()
    }

    fn session_id(&self) -> String {
        format!("session_{}", Uuid::new_v4().simple())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_uuid_generator_does_not_repeat() {
        let generator = UuidGenerator;
        let ids: HashSet<_> = (0..1000).map(|_| generator.order_id()).collect();
        assert_eq!(ids.len(), 1000);
        assert_ne!(generator.cart_id(), generator.cart_id());

        let session = generator.session_id();
        assert!(session.starts_with("session_"));
        assert_ne!(session, generator.session_id());
    }
}

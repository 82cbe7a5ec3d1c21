use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Errors raised when an identifier cannot be built from external input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdError {
    /// The text is not a UUID.
    #[error("Invalid {kind}: '{value}' is not a valid UUID")]
    Malformed { kind: &'static str, value: String },

    /// The nil UUID never identifies an aggregate.
    #[error("Invalid {kind}: the nil UUID is not a valid identifier")]
    Nil { kind: &'static str },
}

macro_rules! uuid_id {
    ($(#[$meta:meta])* $name:ident, $kind:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "Uuid", into = "Uuid")]
        pub struct $name(Uuid);

        impl $name {
            /// Creates a new random identifier.
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Wraps an existing UUID, rejecting the nil UUID.
            pub fn from_uuid(uuid: Uuid) -> Result<Self, IdError> {
                if uuid.is_nil() {
                    return Err(IdError::Nil { kind: $kind });
                }
                Ok(Self(uuid))
            }

            /// Parses an identifier from its textual form.
            pub fn parse(value: &str) -> Result<Self, IdError> {
                let uuid = Uuid::parse_str(value.trim()).map_err(|_| IdError::Malformed {
                    kind: $kind,
                    value: value.to_string(),
                })?;
                Self::from_uuid(uuid)
            }

            /// Returns the underlying UUID.
            pub fn as_uuid(&self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = IdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s)
            }
        }

        impl TryFrom<Uuid> for $name {
            type Error = IdError;

            fn try_from(uuid: Uuid) -> Result<Self, Self::Error> {
                Self::from_uuid(uuid)
            }
        }

        impl From<$name> for Uuid {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

uuid_id!(
    /// Identifier of a shopping cart.
    CartId,
    "cart id"
);

uuid_id!(
    /// Identifier of a catalog product.
    ProductId,
    "product id"
);

uuid_id!(
    /// Identifier of a placed order.
    OrderId,
    "order id"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_creates_unique_ids() {
        let id1 = CartId::new();
        let id2 = CartId::new();
        assert_ne!(id1, id2);
    }

    #[test]
    fn parse_accepts_hyphenated_and_simple_forms() {
        let uuid = Uuid::new_v4();
        let hyphenated = ProductId::parse(&uuid.to_string()).unwrap();
        let simple = ProductId::parse(&uuid.simple().to_string()).unwrap();
        assert_eq!(hyphenated, simple);
        assert_eq!(hyphenated.as_uuid(), uuid);
    }

    #[test]
    fn parse_rejects_malformed_text() {
        let err = CartId::parse("42").unwrap_err();
        assert!(matches!(err, IdError::Malformed { kind: "cart id", .. }));

        let err = OrderId::parse("").unwrap_err();
        assert!(matches!(err, IdError::Malformed { kind: "order id", .. }));
    }

    #[test]
    fn nil_uuid_is_rejected() {
        let err = ProductId::from_uuid(Uuid::nil()).unwrap_err();
        assert_eq!(err, IdError::Nil { kind: "product id" });

        let err = CartId::parse("00000000-0000-0000-0000-000000000000").unwrap_err();
        assert_eq!(err, IdError::Nil { kind: "cart id" });
    }

    #[test]
    fn equality_is_by_value() {
        let uuid = Uuid::new_v4();
        let a = OrderId::from_uuid(uuid).unwrap();
        let b: OrderId = uuid.to_string().parse().unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn serialization_uses_plain_uuid_text() {
        let id = CartId::new();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{id}\""));
        let deserialized: CartId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, deserialized);

        let nil = "\"00000000-0000-0000-0000-000000000000\"";
        assert!(serde_json::from_str::<CartId>(nil).is_err());
    }
}

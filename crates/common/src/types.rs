use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! impl_string_newtype {
    ($t:ident) => {
        impl $t {
            /// Creates the identifier from anything string-like.
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            /// Returns the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consumes the identifier, returning the inner string.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl std::fmt::Display for $t {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $t {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $t {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl AsRef<str> for $t {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

/// Stable identity of a batch.
///
/// Two batches are the same batch exactly when their references match,
/// whatever their allocation state.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BatchReference(String);

impl BatchReference {
    /// Generates a fresh random reference of the form `batch-<uuid>`.
    pub fn generate() -> Self {
        Self(format!("batch-{}", Uuid::new_v4()))
    }
}

/// Stock-keeping unit: identifies a product type.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Sku(String);

/// Identifier of the customer order an order line belongs to.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(String);

impl_string_newtype!(BatchReference);
impl_string_newtype!(Sku);
impl_string_newtype!(OrderId);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn batch_reference_generate_creates_unique_refs() {
        let r1 = BatchReference::generate();
        let r2 = BatchReference::generate();
        assert_ne!(r1, r2);
        assert!(r1.as_str().starts_with("batch-"));
    }

    #[test]
    fn sku_string_conversion() {
        let sku = Sku::new("RETRO-CLOCK");
        assert_eq!(sku.as_str(), "RETRO-CLOCK");

        let sku2: Sku = "SMALL-FORK".into();
        assert_eq!(sku2.to_string(), "SMALL-FORK");
    }

    #[test]
    fn order_id_serializes_as_plain_string() {
        let id = OrderId::new("order-123");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"order-123\"");

        let deserialized: OrderId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, deserialized);
    }
}

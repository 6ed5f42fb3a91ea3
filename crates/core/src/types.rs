//! Identifier types for catalog entities
//!
//! This module defines:
//! - ProductId: Server-assigned product identifier
//! - VariantId: Server-assigned variant identifier
//! - EntityKind: Discriminates between products and variants in reports
//!
//! IDs are assigned by the store. The zero value is reserved: it marks a
//! record that does not exist remotely yet.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! catalog_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(u64);

        impl $name {
            /// The unassigned ID of a record that has not been created yet
            pub const NEW: Self = Self(0);

            /// Wrap a raw store ID
            pub const fn new(raw: u64) -> Self {
                Self(raw)
            }

            /// Get the raw store ID
            pub const fn get(&self) -> u64 {
                self.0
            }

            /// True if no ID has been assigned
            pub const fn is_new(&self) -> bool {
                self.0 == 0
            }

            /// `Some(self)` if an ID has been assigned
            pub fn assigned(self) -> Option<Self> {
                if self.is_new() {
                    None
                } else {
                    Some(self)
                }
            }
        }

        impl From<u64> for $name {
            fn from(raw: u64) -> Self {
                Self(raw)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

catalog_id!(
    /// Store identifier of a product
    ProductId
);

catalog_id!(
    /// Store identifier of a variant
    VariantId
);

/// Kind of catalog entity, used to label keys and conflicts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    /// Top-level catalog item
    Product,
    /// Purchasable option of a product
    Variant,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Product => write!(f, "product"),
            EntityKind::Variant => write!(f, "variant"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_id_is_zero() {
        assert!(ProductId::NEW.is_new());
        assert!(VariantId::default().is_new());
        assert!(!ProductId::new(7).is_new());
    }

    #[test]
    fn test_assigned() {
        assert_eq!(ProductId::NEW.assigned(), None);
        assert_eq!(VariantId::new(3).assigned(), Some(VariantId::new(3)));
    }

    #[test]
    fn test_id_serializes_as_plain_number() {
        let json = serde_json::to_string(&ProductId::new(632910392)).unwrap();
        assert_eq!(json, "632910392");

        let id: VariantId = serde_json::from_str("808950810").unwrap();
        assert_eq!(id.get(), 808950810);
    }

    #[test]
    fn test_display() {
        assert_eq!(ProductId::new(42).to_string(), "42");
        assert_eq!(EntityKind::Variant.to_string(), "variant");
    }
}

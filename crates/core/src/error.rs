//! Error types for merchant
//!
//! This module defines all error types used throughout the workspace.
//! We use `thiserror` for automatic `Display` and `Error` trait implementations.
//!
//! "No matching record" is deliberately not an error: lookups return
//! `Ok(None)` for a miss, which callers use to decide to create a record.

use crate::key::IndexKey;
use crate::model::{Product, Variant};
use crate::types::{EntityKind, ProductId, VariantId};
use std::fmt;
use std::io;
use thiserror::Error;

/// Result type alias for merchant operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for merchant
#[derive(Debug, Error)]
pub enum Error {
    /// Snapshot integrity violation found while building the indexes
    #[error(transparent)]
    DuplicateKeys(#[from] DuplicateKeys),

    /// An incoming record's keys disagree with each other or with the
    /// record they matched
    #[error("Identity conflict: {0}")]
    Conflict(#[from] IdentityConflict),

    /// I/O error (file operations)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Invalid or unreadable configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Malformed tabular input
    #[error("CSV error: {0}")]
    Csv(String),

    /// Bad cache entry name or unreadable cache entry
    #[error("Cache error: {0}")]
    Cache(String),

    /// A catalog service rejected a request
    #[error("Catalog service error: {0}")]
    Service(String),

    /// One or more operations failed while applying an operation set
    #[error("{} operation(s) failed: {}", .0.len(), .0.join("; "))]
    Apply(Vec<String>),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(e: toml::de::Error) -> Self {
        Error::Config(e.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(e: toml::ser::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

/// One key bound to two different records in the same snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateKey {
    /// Kind of the conflicting records
    pub kind: EntityKind,
    /// The shared key
    pub key: IndexKey,
    /// The record that claimed the key first
    pub existing: KeyHolder,
    /// The record that tried to claim it again
    pub duplicate: KeyHolder,
}

impl fmt::Display for DuplicateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} already exists: held by {} {}, also claimed by {} {}",
            self.kind, self.key, self.kind, self.existing, self.kind, self.duplicate
        )
    }
}

/// A record named in a duplicate-key report
///
/// Records are named by ID. A record without one is named by its title
/// (products) or by its SKU, barcode or option tuple (variants).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyHolder {
    /// Store-assigned ID, `0` if not created yet
    pub id: u64,
    /// Human-readable name used when there is no ID
    pub name: String,
}

impl KeyHolder {
    /// Name `product`
    pub fn product(product: &Product) -> Self {
        Self {
            id: product.id.get(),
            name: product.title.clone(),
        }
    }

    /// Name `variant`
    pub fn variant(variant: &Variant) -> Self {
        let name = if !variant.sku.is_empty() {
            variant.sku.clone()
        } else if !variant.barcode.is_empty() {
            variant.barcode.clone()
        } else {
            variant.option_values().to_string()
        };
        Self {
            id: variant.id.get(),
            name,
        }
    }
}

impl fmt::Display for KeyHolder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.id == 0 {
            write!(f, "{:?}", self.name)
        } else {
            write!(f, "{}", self.id)
        }
    }
}

/// Every duplicate key found in one snapshot, in snapshot order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DuplicateKeys(pub Vec<DuplicateKey>);

impl DuplicateKeys {
    /// True if no duplicates were recorded
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of duplicates recorded
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterate over the duplicates
    pub fn iter(&self) -> std::slice::Iter<'_, DuplicateKey> {
        self.0.iter()
    }

    /// `Ok(())` if empty, otherwise `Err(self)`
    pub fn into_result(self) -> std::result::Result<(), DuplicateKeys> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for DuplicateKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} duplicate key(s) in snapshot", self.0.len())?;
        for dup in &self.0 {
            write!(f, "\n  - {}", dup)?;
        }
        Ok(())
    }
}

impl std::error::Error for DuplicateKeys {}

/// Disagreement between an incoming record and the catalog
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentityConflict {
    /// The record names a product ID the catalog does not contain
    #[error("product ID {id} does not exist")]
    UnknownProduct {
        /// Incoming product ID
        id: ProductId,
    },

    /// The record names a variant ID the catalog does not contain
    #[error("variant ID {id} does not exist")]
    UnknownVariant {
        /// Incoming variant ID
        id: VariantId,
    },

    /// The record matched by another key resolved to a different ID
    #[error("{kind} ID mismatch: current = {current}, incoming = {incoming}")]
    IdMismatch {
        /// Kind of record
        kind: EntityKind,
        /// ID of the matched record
        current: u64,
        /// ID carried by the incoming record
        incoming: u64,
    },

    /// The variant belongs to a different product than the record claims
    #[error("product ID mismatch for variant {variant}: current = {current}, incoming = {incoming}")]
    ParentMismatch {
        /// Variant being resolved (`0` if the incoming record has none)
        variant: VariantId,
        /// Product that owns the matched variant, or the product the
        /// row is reconciled under
        current: ProductId,
        /// Product ID carried by the incoming record
        incoming: ProductId,
    },

    /// Matched by barcode, but the SKUs disagree
    #[error("SKU mismatch for barcode {barcode:?}: current = {current:?}, incoming = {incoming:?}")]
    SkuMismatch {
        /// Barcode used for the match
        barcode: String,
        /// SKU of the matched variant
        current: String,
        /// SKU carried by the incoming record
        incoming: String,
    },

    /// Matched by SKU, but the barcodes disagree
    #[error("barcode mismatch for SKU {sku:?}: current = {current:?}, incoming = {incoming:?}")]
    BarcodeMismatch {
        /// SKU used for the match
        sku: String,
        /// Barcode of the matched variant
        current: String,
        /// Barcode carried by the incoming record
        incoming: String,
    },
}

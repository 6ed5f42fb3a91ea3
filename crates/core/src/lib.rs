//! Core types for merchant
//!
//! This crate defines the foundational types used throughout the workspace:
//! - ProductId / VariantId: Store-assigned identifiers (zero = not created yet)
//! - Product / Variant / Metafield: Catalog records, possibly partial
//! - OptionValues / OptionKey: Default-title normalized option tuples
//! - IndexKey: Every attribute usable to look up a canonical record
//! - Error: Error taxonomy (duplicate keys, identity conflicts, I/O)
//! - MerchantConfig: `merchant.toml` configuration

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod key;
pub mod model;
pub mod options;
pub mod types;

pub use config::{MerchantConfig, MetafieldDefinition, MetafieldDefinitions, StoreConfig};
pub use error::{DuplicateKey, DuplicateKeys, Error, IdentityConflict, KeyHolder, Result};
pub use key::IndexKey;
pub use model::{attach_metafield, Extra, Metafield, Product, ProductOption, Variant};
pub use options::{
    normalize_option, OptionKey, OptionValues, DEFAULT_OPTION_NAME,
    DEFAULT_OPTION_VALUE,
};
pub use types::{EntityKind, ProductId, VariantId};

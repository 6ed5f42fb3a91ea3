//! Multi-key snapshot indexes for merchant
//!
//! A snapshot is indexed once at the start of a reconciliation run:
//! - ProductIndex: ID, title, handle
//! - VariantIndex: ID, SKU, barcode, product-scoped option tuple
//! - CatalogIndex: both, built together with duplicate detection
//!
//! Indexes borrow the snapshot and are read-only after construction.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod catalog;
pub mod product;
pub mod variant;

pub use catalog::CatalogIndex;
pub use product::ProductIndex;
pub use variant::{VariantEntry, VariantIndex};

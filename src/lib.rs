//! merchant - bulk-edit a store catalog through CSV
//!
//! merchant exports a store catalog to a spreadsheet, lets the merchant
//! edit it, and works out which products and variants the edited rows
//! create or update. Rows may identify their records only partially: by
//! ID, handle or title for products, by ID, barcode, SKU or option values
//! for variants.
//!
//! # Quick Start
//!
//! ```ignore
//! use merchant::{reconcile, read_products, MetafieldDefinitions};
//!
//! let incoming = read_products(sheet, &MetafieldDefinitions::default())?;
//! let ops = reconcile(&snapshot, &incoming)?;
//! println!("{}", ops.summary());
//! ```
//!
//! # Architecture
//!
//! - `merchant-core`: catalog model, IDs, option normalization, errors, config
//! - `merchant-index`: lookup tables built from a snapshot
//! - `merchant-engine`: identity resolution, reconciliation, applying operations
//! - `merchant-csv`: sheet reading and writing
//! - `merchant-cache`: local JSON snapshot cache

pub use merchant_cache::{Cache, CacheEntry};
pub use merchant_core::*;
pub use merchant_csv::{read_file, read_products, write_file, write_products};
pub use merchant_engine::*;
pub use merchant_index::{CatalogIndex, ProductIndex, VariantEntry, VariantIndex};

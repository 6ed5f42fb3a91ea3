//! CSV support for merchant
//!
//! This crate moves catalog records between the store model and a flat
//! sheet suitable for spreadsheet editing:
//! - columns: fixed column names and metafield column paths
//! - read: rows grouped into products by title
//! - write: products flattened to one row per variant

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod columns;
pub mod read;
pub mod write;

pub use columns::{Column, MetafieldPath};
pub use read::{read_file, read_products};
pub use write::{write_file, write_products};

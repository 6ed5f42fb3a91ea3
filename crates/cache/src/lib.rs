//! Snapshot cache for merchant
//!
//! Keeps the last fetched catalog on disk as pretty-printed JSON:
//! - `inventory.json`: the full snapshot
//! - `<product id>.json`: single products
//!
//! Reconciliation always works from a fresh snapshot; the cache only
//! feeds exports and inspection.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod cache;

pub use cache::{Cache, CacheEntry, INVENTORY};

//! Reconciliation engine for merchant
//!
//! This crate turns edited catalog records into store operations:
//! - IdentityResolver: match a partial record to its canonical record
//! - reconcile: classify every record as create or update
//! - OperationSet: the four operation lists, JSON export and summary
//! - apply / push: run an OperationSet against a CatalogService
//! - MemoryCatalog: a CatalogService backed by a snapshot file
//!
//! The engine holds no global state: the snapshot, the incoming records
//! and the service are all passed in explicitly.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod apply;
pub mod memory;
pub mod operations;
pub mod reconcile;
pub mod resolver;

pub use apply::{apply, push, ApplyFailure, ApplyReport, CatalogService, OperationKind};
pub use memory::MemoryCatalog;
pub use operations::{OperationSet, Summary};
pub use reconcile::{reconcile, Reconciler};
pub use resolver::{IdentityResolver, MatchedBy, ProductMatch, VariantMatch};

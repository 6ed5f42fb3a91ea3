//! Both indexes of one snapshot, built together

use crate::product::ProductIndex;
use crate::variant::VariantIndex;
use merchant_core::{DuplicateKeys, Product, Result};
use tracing::{debug, info};

/// Product and variant indexes over one snapshot
///
/// Borrows the snapshot for its whole lifetime; build a fresh one per
/// reconciliation run.
#[derive(Debug, Default)]
pub struct CatalogIndex<'a> {
    /// Products by ID, title and handle
    pub products: ProductIndex<'a>,
    /// Variants by ID, SKU, barcode and option tuple
    pub variants: VariantIndex<'a>,
}

impl<'a> CatalogIndex<'a> {
    /// Build both indexes, failing if any key is claimed twice
    ///
    /// The error lists every duplicate, not just the first.
    pub fn build(snapshot: &'a [Product]) -> Result<Self> {
        let (index, duplicates) = Self::build_lenient(snapshot);
        duplicates.into_result()?;
        Ok(index)
    }

    /// Build both indexes, returning every duplicate alongside them
    ///
    /// The first record to claim a key keeps it. Duplicates come in
    /// snapshot order: a product's keys, then the keys of its variants.
    pub fn build_lenient(snapshot: &'a [Product]) -> (Self, DuplicateKeys) {
        let mut index = CatalogIndex::default();
        let mut duplicates = Vec::new();

        for product in snapshot {
            duplicates.extend(index.products.insert(product));
            for variant in &product.variants {
                duplicates.extend(index.variants.insert(product.id, variant));
            }
        }

        for dup in &duplicates {
            debug!(target: "merchant::index", %dup, "Duplicate key in snapshot");
        }
        info!(
            target: "merchant::index",
            products = index.products.len(),
            variants = index.variants.len(),
            duplicates = duplicates.len(),
            "Indexed snapshot"
        );
        (index, DuplicateKeys(duplicates))
    }
}

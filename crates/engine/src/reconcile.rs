//! Reconciliation: classify incoming records against a snapshot
//!
//! For each incoming product:
//! 1. Resolve the product. A miss makes the product, with every variant
//!    it carries, a new product.
//! 2. A match is queued as a product update carrying the canonical ID.
//! 3. Each variant is resolved under the canonical product ID. A miss, or
//!    a match on a snapshot variant that has no ID yet, is a new variant
//!    bound to that product. Any other match is a variant update carrying
//!    the canonical IDs.
//! 4. If a variant ends up with no product ID, the whole record is
//!    discarded from the pending operations and created as a new product.
//!
//! A record that arrives unmodified, IDs included, produces no update.
//! Any conflict aborts the whole run: no partial result is returned.

use crate::operations::OperationSet;
use crate::resolver::IdentityResolver;
use merchant_core::{Product, Result, Variant, VariantId};
use merchant_index::CatalogIndex;
use tracing::{debug, info, warn};

/// Reconcile `incoming` against `snapshot`
///
/// Builds fresh indexes over `snapshot`; fails with the full list of
/// duplicate keys if the snapshot is inconsistent.
pub fn reconcile(snapshot: &[Product], incoming: &[Product]) -> Result<OperationSet> {
    let index = CatalogIndex::build(snapshot)?;
    Reconciler::new(&index).reconcile(incoming)
}

/// Classification pass over one snapshot's indexes
#[derive(Debug, Clone, Copy)]
pub struct Reconciler<'i, 'a> {
    resolver: IdentityResolver<'i, 'a>,
}

impl<'i, 'a> Reconciler<'i, 'a> {
    /// Create a reconciler over `index`
    pub fn new(index: &'i CatalogIndex<'a>) -> Self {
        Self {
            resolver: IdentityResolver::new(index),
        }
    }

    /// Classify every incoming record, in order
    pub fn reconcile(&self, incoming: &[Product]) -> Result<OperationSet> {
        let mut ops = OperationSet::new();
        for record in incoming {
            ops.extend(self.reconcile_product(record)?);
        }
        info!(
            target: "merchant::reconcile",
            new_products = ops.new_products.len(),
            product_updates = ops.product_updates.len(),
            new_variants = ops.new_variants.len(),
            variant_updates = ops.variant_updates.len(),
            "Reconciled {} record(s)",
            incoming.len()
        );
        Ok(ops)
    }

    /// Classify one incoming product and its variants
    pub fn reconcile_product(&self, record: &Product) -> Result<OperationSet> {
        let mut ops = OperationSet::new();

        let Some(matched) = self.resolver.resolve_product(record)? else {
            debug!(target: "merchant::reconcile", title = %record.title, "New product");
            ops.add_new_product(record.clone().into_new());
            return Ok(ops);
        };
        let product_id = matched.id();

        if !product_id.is_new() {
            if !record.same_content(matched.canonical) {
                ops.add_product_update(Product {
                    id: product_id,
                    ..record.without_variants()
                });
            }
        } else if record.variants.is_empty() {
            return Ok(reclassified(record));
        }

        for variant in &record.variants {
            let resolved = self.resolver.resolve_variant(product_id, variant)?;
            let owner = resolved.map_or(product_id, |m| m.product_id());
            if owner.is_new() {
                return Ok(reclassified(record));
            }

            match resolved {
                Some(m) if !m.id().is_new() && variant == m.canonical() => {}
                Some(m) if !m.id().is_new() => ops.add_variant_update(Variant {
                    id: m.id(),
                    product_id: owner,
                    ..variant.clone()
                }),
                _ => ops.add_new_variant(Variant {
                    id: VariantId::NEW,
                    product_id: owner,
                    ..variant.clone()
                }),
            }
        }
        Ok(ops)
    }
}

/// Create `record` from scratch, dropping whatever was queued for it
fn reclassified(record: &Product) -> OperationSet {
    warn!(
        target: "merchant::reconcile",
        title = %record.title,
        handle = %record.handle,
        "Variant has no resolvable product; creating the whole product as new, which may duplicate it"
    );
    let mut ops = OperationSet::new();
    ops.add_new_product(record.clone().into_new());
    ops
}

//! Variant index: ID, SKU, barcode and option tuple → Variant
//!
//! SKUs and barcodes are catalog-wide keys but optional; option tuples
//! are only unique within one product, so they are keyed together with
//! the owning product's ID.

use merchant_core::{
    DuplicateKey, EntityKind, IndexKey, KeyHolder, OptionKey, OptionValues, ProductId, Variant, VariantId,
};
use rustc_hash::FxHashMap;

/// A variant together with the product that owns it in the snapshot
#[derive(Debug, Clone, Copy)]
pub struct VariantEntry<'a> {
    /// Owning product
    pub product_id: ProductId,
    /// The canonical variant
    pub variant: &'a Variant,
}

impl<'a> VariantEntry<'a> {
    /// ID of the canonical variant
    pub fn id(&self) -> VariantId {
        self.variant.id
    }
}

/// Multi-key index over the variants of one snapshot
#[derive(Debug, Default)]
pub struct VariantIndex<'a> {
    ids: FxHashMap<VariantId, VariantEntry<'a>>,
    skus: FxHashMap<&'a str, VariantEntry<'a>>,
    barcodes: FxHashMap<&'a str, VariantEntry<'a>>,
    options: FxHashMap<OptionKey, VariantEntry<'a>>,
}

impl<'a> VariantIndex<'a> {
    /// Create a new empty VariantIndex
    pub fn new() -> Self {
        Self::default()
    }

    /// Index `variant`, owned by `product_id`, under every key it carries
    ///
    /// The owning product is taken from the snapshot nesting, not from the
    /// variant's own back-reference. Option tuples are only indexed under
    /// an assigned product ID. Returns the duplicates found, in key order
    /// (ID, option tuple, SKU, barcode).
    pub fn insert(&mut self, product_id: ProductId, variant: &'a Variant) -> Vec<DuplicateKey> {
        let entry = VariantEntry {
            product_id,
            variant,
        };
        let mut duplicates = Vec::new();

        if let Some(id) = variant.id.assigned() {
            if let Some(existing) = claim(&mut self.ids, id, entry) {
                duplicates.push(duplicate(IndexKey::Id(id.get()), existing, entry));
            }
        }
        if !product_id.is_new() {
            let key = OptionKey::new(product_id, variant.option_values());
            if let Some(existing) = claim(&mut self.options, key.clone(), entry) {
                duplicates.push(duplicate(IndexKey::Options(key), existing, entry));
            }
        }
        if !variant.sku.is_empty() {
            if let Some(existing) = claim(&mut self.skus, variant.sku.as_str(), entry) {
                duplicates.push(duplicate(IndexKey::Sku(variant.sku.clone()), existing, entry));
            }
        }
        if !variant.barcode.is_empty() {
            if let Some(existing) = claim(&mut self.barcodes, variant.barcode.as_str(), entry) {
                duplicates.push(duplicate(
                    IndexKey::Barcode(variant.barcode.clone()),
                    existing,
                    entry,
                ));
            }
        }
        duplicates
    }

    /// Look up a variant by ID
    pub fn get_by_id(&self, id: VariantId) -> Option<VariantEntry<'a>> {
        self.ids.get(&id).copied()
    }

    /// Look up a variant by SKU
    pub fn get_by_sku(&self, sku: &str) -> Option<VariantEntry<'a>> {
        self.skus.get(sku).copied()
    }

    /// Look up a variant by barcode
    pub fn get_by_barcode(&self, barcode: &str) -> Option<VariantEntry<'a>> {
        self.barcodes.get(barcode).copied()
    }

    /// Look up a variant by option tuple within one product
    ///
    /// Values are compared after default-title normalization.
    pub fn get_by_options(
        &self,
        product_id: ProductId,
        values: &OptionValues,
    ) -> Option<VariantEntry<'a>> {
        self.options
            .get(&OptionKey::new(product_id, values.clone()))
            .copied()
    }

    /// Look up a variant by any variant key
    ///
    /// Product keys never match.
    pub fn get(&self, key: &IndexKey) -> Option<VariantEntry<'a>> {
        match key {
            IndexKey::Id(id) => self.get_by_id(VariantId::new(*id)),
            IndexKey::Sku(sku) => self.get_by_sku(sku),
            IndexKey::Barcode(barcode) => self.get_by_barcode(barcode),
            IndexKey::Options(key) => self.options.get(key).copied(),
            IndexKey::Title(_) | IndexKey::Handle(_) => None,
        }
    }

    /// Check if the index is empty
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
            && self.skus.is_empty()
            && self.barcodes.is_empty()
            && self.options.is_empty()
    }

    /// Get the number of variants indexed by ID
    pub fn len(&self) -> usize {
        self.ids.len()
    }
}

fn claim<'a, K: std::hash::Hash + Eq>(
    map: &mut FxHashMap<K, VariantEntry<'a>>,
    key: K,
    entry: VariantEntry<'a>,
) -> Option<VariantEntry<'a>> {
    match map.get(&key) {
        Some(existing) => Some(*existing),
        None => {
            map.insert(key, entry);
            None
        }
    }
}

fn duplicate(key: IndexKey, existing: VariantEntry<'_>, entry: VariantEntry<'_>) -> DuplicateKey {
    DuplicateKey {
        kind: EntityKind::Variant,
        key,
        existing: KeyHolder::variant(existing.variant),
        duplicate: KeyHolder::variant(entry.variant),
    }
}

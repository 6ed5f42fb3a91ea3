//! Identity resolution
//!
//! Maps a partial incoming record to the canonical record it refers to.
//! Keys are tried in a fixed priority order and the first match wins:
//!
//! - Products: ID → handle → title
//! - Variants: ID → barcode → SKU → option tuple (within the parent)
//!
//! A miss is `Ok(None)` and means "create". Keys that disagree with the
//! matched record are an `IdentityConflict` and abort the run.

use merchant_core::{
    EntityKind, IdentityConflict, Product, ProductId, Result, Variant, VariantId,
};
use merchant_index::{CatalogIndex, VariantEntry};
use std::fmt;
use tracing::debug;

/// The key an incoming record was matched by
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchedBy {
    /// Store ID
    Id,
    /// Product handle
    Handle,
    /// Product title
    Title,
    /// Variant barcode
    Barcode,
    /// Variant SKU
    Sku,
    /// Variant option tuple within the parent
    Options,
}

impl fmt::Display for MatchedBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MatchedBy::Id => "id",
            MatchedBy::Handle => "handle",
            MatchedBy::Title => "title",
            MatchedBy::Barcode => "barcode",
            MatchedBy::Sku => "sku",
            MatchedBy::Options => "options",
        };
        f.write_str(name)
    }
}

/// A product resolved to its canonical record
#[derive(Debug, Clone, Copy)]
pub struct ProductMatch<'a> {
    /// The canonical product
    pub canonical: &'a Product,
    /// Key that matched
    pub matched_by: MatchedBy,
}

impl<'a> ProductMatch<'a> {
    /// Canonical product ID
    pub fn id(&self) -> ProductId {
        self.canonical.id
    }
}

/// A variant resolved to its canonical record
#[derive(Debug, Clone, Copy)]
pub struct VariantMatch<'a> {
    /// The canonical variant and its owning product
    pub entry: VariantEntry<'a>,
    /// Key that matched
    pub matched_by: MatchedBy,
}

impl<'a> VariantMatch<'a> {
    /// Canonical variant ID
    pub fn id(&self) -> VariantId {
        self.entry.id()
    }

    /// ID of the product that owns the canonical variant
    pub fn product_id(&self) -> ProductId {
        self.entry.product_id
    }

    /// The canonical variant
    pub fn canonical(&self) -> &'a Variant {
        self.entry.variant
    }
}

/// Resolves incoming records against one snapshot's indexes
#[derive(Debug, Clone, Copy)]
pub struct IdentityResolver<'i, 'a> {
    index: &'i CatalogIndex<'a>,
}

impl<'i, 'a> IdentityResolver<'i, 'a> {
    /// Create a resolver over `index`
    pub fn new(index: &'i CatalogIndex<'a>) -> Self {
        Self { index }
    }

    /// Resolve an incoming product
    ///
    /// A non-zero ID must exist in the snapshot; it is never demoted to a
    /// create.
    pub fn resolve_product(&self, incoming: &Product) -> Result<Option<ProductMatch<'a>>> {
        let products = &self.index.products;

        let found = if let Some(id) = incoming.id.assigned() {
            match products.get_by_id(id) {
                Some(product) => Some((product, MatchedBy::Id)),
                None => return Err(IdentityConflict::UnknownProduct { id }.into()),
            }
        } else if let Some(product) = non_empty(&incoming.handle).and_then(|h| products.get_by_handle(h)) {
            Some((product, MatchedBy::Handle))
        } else {
            non_empty(&incoming.title)
                .and_then(|t| products.get_by_title(t))
                .map(|product| (product, MatchedBy::Title))
        };

        let Some((canonical, matched_by)) = found else {
            debug!(target: "merchant::resolve", title = %incoming.title, "No matching product");
            return Ok(None);
        };
        check_id(EntityKind::Product, incoming.id.get(), canonical.id.get())?;

        debug!(
            target: "merchant::resolve",
            id = %canonical.id,
            %matched_by,
            "Resolved product"
        );
        Ok(Some(ProductMatch {
            canonical,
            matched_by,
        }))
    }

    /// Resolve an incoming variant reconciled under `parent`
    ///
    /// Every match must belong to `parent`, and an explicit `product_id`
    /// on the incoming variant must equal it. SKU and barcode are
    /// cross-checked when both sides carry one.
    pub fn resolve_variant(
        &self,
        parent: ProductId,
        incoming: &Variant,
    ) -> Result<Option<VariantMatch<'a>>> {
        let variants = &self.index.variants;

        if !incoming.product_id.is_new() && incoming.product_id != parent {
            return Err(IdentityConflict::ParentMismatch {
                variant: incoming.id,
                current: parent,
                incoming: incoming.product_id,
            }
            .into());
        }

        let found = if let Some(id) = incoming.id.assigned() {
            // A matched ID may change the SKU and barcode, so those are not
            // cross-checked here.
            match variants.get_by_id(id) {
                Some(entry) => Some((entry, MatchedBy::Id)),
                None => return Err(IdentityConflict::UnknownVariant { id }.into()),
            }
        } else if let Some(entry) = non_empty(&incoming.barcode).and_then(|b| variants.get_by_barcode(b)) {
            if !equal_non_empty(&entry.variant.sku, &incoming.sku) {
                return Err(IdentityConflict::SkuMismatch {
                    barcode: incoming.barcode.clone(),
                    current: entry.variant.sku.clone(),
                    incoming: incoming.sku.clone(),
                }
                .into());
            }
            Some((entry, MatchedBy::Barcode))
        } else if let Some(entry) = non_empty(&incoming.sku).and_then(|s| variants.get_by_sku(s)) {
            if !equal_non_empty(&entry.variant.barcode, &incoming.barcode) {
                return Err(IdentityConflict::BarcodeMismatch {
                    sku: incoming.sku.clone(),
                    current: entry.variant.barcode.clone(),
                    incoming: incoming.barcode.clone(),
                }
                .into());
            }
            Some((entry, MatchedBy::Sku))
        } else if !parent.is_new() {
            variants
                .get_by_options(parent, &incoming.option_values())
                .map(|entry| (entry, MatchedBy::Options))
        } else {
            None
        };

        let Some((entry, matched_by)) = found else {
            debug!(target: "merchant::resolve", product = %parent, sku = %incoming.sku, "No matching variant");
            return Ok(None);
        };
        check_id(EntityKind::Variant, incoming.id.get(), entry.id().get())?;
        if entry.product_id != parent {
            return Err(IdentityConflict::ParentMismatch {
                variant: entry.id(),
                current: entry.product_id,
                incoming: parent,
            }
            .into());
        }

        debug!(
            target: "merchant::resolve",
            id = %entry.id(),
            product = %entry.product_id,
            %matched_by,
            "Resolved variant"
        );
        Ok(Some(VariantMatch { entry, matched_by }))
    }
}

fn non_empty(s: &str) -> Option<&str> {
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}

/// True if either side is empty or both are equal
fn equal_non_empty(current: &str, incoming: &str) -> bool {
    current.is_empty() || incoming.is_empty() || current == incoming
}

/// An explicit incoming ID must equal the matched record's ID
fn check_id(kind: EntityKind, incoming: u64, current: u64) -> Result<()> {
    if incoming != 0 && incoming != current {
        return Err(IdentityConflict::IdMismatch {
            kind,
            current,
            incoming,
        }
        .into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use merchant_core::{Error, DEFAULT_OPTION_VALUE};

    fn snapshot() -> Vec<Product> {
        vec![
            Product {
                id: ProductId::new(1),
                title: "Widget".to_string(),
                handle: "widget".to_string(),
                variants: vec![
                    Variant {
                        id: VariantId::new(10),
                        product_id: ProductId::new(1),
                        sku: "W-S".to_string(),
                        barcode: "0001".to_string(),
                        option1: "S".to_string(),
                        ..Variant::default()
                    },
                    Variant {
                        id: VariantId::new(11),
                        product_id: ProductId::new(1),
                        sku: "W-L".to_string(),
                        option1: "L".to_string(),
                        ..Variant::default()
                    },
                ],
                ..Product::default()
            },
            Product {
                id: ProductId::new(2),
                title: "Gadget".to_string(),
                handle: "gadget".to_string(),
                variants: vec![Variant {
                    id: VariantId::new(20),
                    product_id: ProductId::new(2),
                    option1: DEFAULT_OPTION_VALUE.to_string(),
                    ..Variant::default()
                }],
                ..Product::default()
            },
        ]
    }

    fn conflict(result: Result<impl fmt::Debug>) -> IdentityConflict {
        match result {
            Err(Error::Conflict(conflict)) => conflict,
            other => panic!("expected identity conflict, got {other:?}"),
        }
    }

    fn pid(id: u64) -> ProductId {
        ProductId::new(id)
    }

    // ========================================
    // Products
    // ========================================

    #[test]
    fn test_product_priority_id_handle_title() {
        let snapshot = snapshot();
        let index = CatalogIndex::build(&snapshot).unwrap();
        let resolver = IdentityResolver::new(&index);

        let by_id = Product {
            id: pid(2),
            title: "Widget".to_string(),
            ..Product::default()
        };
        let m = resolver.resolve_product(&by_id).unwrap().unwrap();
        assert_eq!((m.id(), m.matched_by), (pid(2), MatchedBy::Id));

        let by_handle = Product {
            handle: "gadget".to_string(),
            title: "Widget".to_string(),
            ..Product::default()
        };
        let m = resolver.resolve_product(&by_handle).unwrap().unwrap();
        assert_eq!((m.id(), m.matched_by), (pid(2), MatchedBy::Handle));

        let by_title = Product {
            title: "Widget".to_string(),
            ..Product::default()
        };
        let m = resolver.resolve_product(&by_title).unwrap().unwrap();
        assert_eq!((m.id(), m.matched_by), (pid(1), MatchedBy::Title));
    }

    #[test]
    fn test_unmatched_handle_falls_back_to_title() {
        let snapshot = snapshot();
        let index = CatalogIndex::build(&snapshot).unwrap();
        let resolver = IdentityResolver::new(&index);

        let incoming = Product {
            handle: "new-handle".to_string(),
            title: "Gadget".to_string(),
            ..Product::default()
        };
        let m = resolver.resolve_product(&incoming).unwrap().unwrap();
        assert_eq!((m.id(), m.matched_by), (pid(2), MatchedBy::Title));
    }

    #[test]
    fn test_unknown_product_is_a_miss() {
        let snapshot = snapshot();
        let index = CatalogIndex::build(&snapshot).unwrap();
        let resolver = IdentityResolver::new(&index);

        let incoming = Product {
            title: "Gizmo".to_string(),
            ..Product::default()
        };
        assert!(resolver.resolve_product(&incoming).unwrap().is_none());
        assert!(resolver.resolve_product(&Product::default()).unwrap().is_none());
    }

    #[test]
    fn test_unknown_product_id_is_a_conflict() {
        let snapshot = snapshot();
        let index = CatalogIndex::build(&snapshot).unwrap();
        let resolver = IdentityResolver::new(&index);

        let incoming = Product {
            id: pid(99),
            title: "Widget".to_string(),
            ..Product::default()
        };
        assert_eq!(
            conflict(resolver.resolve_product(&incoming)),
            IdentityConflict::UnknownProduct { id: pid(99) }
        );
    }

    // ========================================
    // Variants
    // ========================================

    #[test]
    fn test_variant_priority() {
        let snapshot = snapshot();
        let index = CatalogIndex::build(&snapshot).unwrap();
        let resolver = IdentityResolver::new(&index);

        let by_id = Variant {
            id: VariantId::new(11),
            barcode: "0001".to_string(),
            ..Variant::default()
        };
        let m = resolver.resolve_variant(pid(1), &by_id).unwrap().unwrap();
        assert_eq!((m.id(), m.matched_by), (VariantId::new(11), MatchedBy::Id));

        let by_barcode = Variant {
            barcode: "0001".to_string(),
            option1: "L".to_string(),
            ..Variant::default()
        };
        let m = resolver.resolve_variant(pid(1), &by_barcode).unwrap().unwrap();
        assert_eq!((m.id(), m.matched_by), (VariantId::new(10), MatchedBy::Barcode));

        let by_sku = Variant {
            sku: "W-L".to_string(),
            option1: "S".to_string(),
            ..Variant::default()
        };
        let m = resolver.resolve_variant(pid(1), &by_sku).unwrap().unwrap();
        assert_eq!((m.id(), m.matched_by), (VariantId::new(11), MatchedBy::Sku));

        let by_options = Variant {
            option1: "S".to_string(),
            ..Variant::default()
        };
        let m = resolver.resolve_variant(pid(1), &by_options).unwrap().unwrap();
        assert_eq!((m.id(), m.matched_by), (VariantId::new(10), MatchedBy::Options));
        assert_eq!(m.product_id(), pid(1));
    }

    #[test]
    fn test_new_barcode_falls_through_to_sku() {
        let snapshot = snapshot();
        let index = CatalogIndex::build(&snapshot).unwrap();
        let resolver = IdentityResolver::new(&index);

        let incoming = Variant {
            barcode: "9999".to_string(),
            sku: "W-L".to_string(),
            ..Variant::default()
        };
        let m = resolver.resolve_variant(pid(1), &incoming).unwrap().unwrap();
        assert_eq!(m.matched_by, MatchedBy::Sku);
    }

    #[test]
    fn test_default_title_matches_empty_option() {
        let snapshot = snapshot();
        let index = CatalogIndex::build(&snapshot).unwrap();
        let resolver = IdentityResolver::new(&index);

        let m = resolver
            .resolve_variant(pid(2), &Variant::default())
            .unwrap()
            .unwrap();
        assert_eq!(m.id(), VariantId::new(20));
        assert_eq!(m.canonical().option1, DEFAULT_OPTION_VALUE);
    }

    #[test]
    fn test_options_only_match_within_parent() {
        let snapshot = snapshot();
        let index = CatalogIndex::build(&snapshot).unwrap();
        let resolver = IdentityResolver::new(&index);

        let incoming = Variant {
            option1: "S".to_string(),
            ..Variant::default()
        };
        assert!(resolver.resolve_variant(pid(2), &incoming).unwrap().is_none());
        assert!(resolver.resolve_variant(ProductId::NEW, &incoming).unwrap().is_none());
    }

    #[test]
    fn test_unknown_variant_id_is_a_conflict() {
        let snapshot = snapshot();
        let index = CatalogIndex::build(&snapshot).unwrap();
        let resolver = IdentityResolver::new(&index);

        let incoming = Variant {
            id: VariantId::new(99),
            ..Variant::default()
        };
        assert_eq!(
            conflict(resolver.resolve_variant(pid(1), &incoming)),
            IdentityConflict::UnknownVariant {
                id: VariantId::new(99)
            }
        );
    }

    #[test]
    fn test_variant_id_under_other_parent_is_a_conflict() {
        let snapshot = snapshot();
        let index = CatalogIndex::build(&snapshot).unwrap();
        let resolver = IdentityResolver::new(&index);

        let incoming = Variant {
            id: VariantId::new(10),
            product_id: pid(2),
            ..Variant::default()
        };
        assert_eq!(
            conflict(resolver.resolve_variant(pid(2), &incoming)),
            IdentityConflict::ParentMismatch {
                variant: VariantId::new(10),
                current: pid(1),
                incoming: pid(2),
            }
        );
    }

    #[test]
    fn test_explicit_parent_must_match_context() {
        let snapshot = snapshot();
        let index = CatalogIndex::build(&snapshot).unwrap();
        let resolver = IdentityResolver::new(&index);

        let incoming = Variant {
            id: VariantId::new(10),
            product_id: pid(2),
            ..Variant::default()
        };
        assert_eq!(
            conflict(resolver.resolve_variant(pid(1), &incoming)),
            IdentityConflict::ParentMismatch {
                variant: VariantId::new(10),
                current: pid(1),
                incoming: pid(2),
            }
        );
    }

    #[test]
    fn test_sku_matched_under_other_parent_is_a_conflict() {
        let snapshot = snapshot();
        let index = CatalogIndex::build(&snapshot).unwrap();
        let resolver = IdentityResolver::new(&index);

        let incoming = Variant {
            sku: "W-S".to_string(),
            ..Variant::default()
        };
        assert!(matches!(
            conflict(resolver.resolve_variant(pid(2), &incoming)),
            IdentityConflict::ParentMismatch { .. }
        ));
    }

    #[test]
    fn test_barcode_match_with_different_sku_is_a_conflict() {
        let snapshot = snapshot();
        let index = CatalogIndex::build(&snapshot).unwrap();
        let resolver = IdentityResolver::new(&index);

        let incoming = Variant {
            barcode: "0001".to_string(),
            sku: "W-X".to_string(),
            ..Variant::default()
        };
        assert_eq!(
            conflict(resolver.resolve_variant(pid(1), &incoming)),
            IdentityConflict::SkuMismatch {
                barcode: "0001".into(),
                current: "W-S".into(),
                incoming: "W-X".into(),
            }
        );
    }

    #[test]
    fn test_empty_sku_is_never_a_conflict() {
        let snapshot = snapshot();
        let index = CatalogIndex::build(&snapshot).unwrap();
        let resolver = IdentityResolver::new(&index);

        let incoming = Variant {
            barcode: "0001".to_string(),
            ..Variant::default()
        };
        let m = resolver.resolve_variant(pid(1), &incoming).unwrap().unwrap();
        assert_eq!(m.id(), VariantId::new(10));
    }

    #[test]
    fn test_sku_match_with_different_barcode_is_a_conflict() {
        let mut snapshot = snapshot();
        snapshot[0].variants[1].barcode = "0002".to_string();
        let index = CatalogIndex::build(&snapshot).unwrap();
        let resolver = IdentityResolver::new(&index);

        let incoming = Variant {
            sku: "W-L".to_string(),
            barcode: "0003".to_string(),
            ..Variant::default()
        };
        assert_eq!(
            conflict(resolver.resolve_variant(pid(1), &incoming)),
            IdentityConflict::BarcodeMismatch {
                sku: "W-L".into(),
                current: "0002".into(),
                incoming: "0003".into(),
            }
        );
    }

    #[test]
    fn test_id_match_allows_new_sku_and_barcode() {
        let snapshot = snapshot();
        let index = CatalogIndex::build(&snapshot).unwrap();
        let resolver = IdentityResolver::new(&index);

        let incoming = Variant {
            id: VariantId::new(10),
            sku: "W-SMALL".to_string(),
            barcode: "0009".to_string(),
            ..Variant::default()
        };
        assert!(resolver.resolve_variant(pid(1), &incoming).unwrap().is_some());
    }

    #[test]
    fn test_equal_non_empty() {
        assert!(equal_non_empty("", ""));
        assert!(equal_non_empty("a", ""));
        assert!(equal_non_empty("", "a"));
        assert!(equal_non_empty("a", "a"));
        assert!(!equal_non_empty("a", "b"));
    }
}

//! Property-based tests for snapshot indexing.
//!
//! - Totality: on a duplicate-free snapshot every key finds its owner and
//!   absent keys find nothing
//! - Completeness: every repeated key is reported exactly once per
//!   repeated claim, whatever the snapshot shape

use merchant_core::{EntityKind, OptionValues, Product, ProductId, Variant, VariantId};
use merchant_index::CatalogIndex;
use proptest::prelude::*;
use std::collections::HashMap;

// =============================================================================
// HELPER STRATEGIES
// =============================================================================

/// Variant shape: (has sku, has barcode, use default title)
fn variant_shape() -> impl Strategy<Value = (bool, bool, bool)> {
    (any::<bool>(), any::<bool>(), any::<bool>())
}

/// A snapshot where every key is unique by construction
fn unique_snapshot() -> impl Strategy<Value = Vec<Product>> {
    prop::collection::vec(prop::collection::vec(variant_shape(), 1..5), 0..12).prop_map(
        |products| {
            products
                .into_iter()
                .enumerate()
                .map(|(i, shapes)| {
                    let pid = i as u64 + 1;
                    let single = shapes.len() == 1;
                    let variants = shapes
                        .into_iter()
                        .enumerate()
                        .map(|(j, (sku, barcode, default_title))| Variant {
                            id: VariantId::new(pid * 100 + j as u64),
                            product_id: ProductId::new(pid),
                            sku: if sku { format!("SKU-{pid}-{j}") } else { String::new() },
                            barcode: if barcode { format!("{pid:06}{j:02}") } else { String::new() },
                            option1: if single && default_title {
                                "Default Title".to_string()
                            } else {
                                format!("opt-{j}")
                            },
                            ..Variant::default()
                        })
                        .collect();
                    Product {
                        id: ProductId::new(pid),
                        title: format!("Product {pid}"),
                        handle: format!("product-{pid}"),
                        variants,
                        ..Product::default()
                    }
                })
                .collect()
        },
    )
}

/// A snapshot drawn from tiny key spaces so that collisions are common
fn colliding_snapshot() -> impl Strategy<Value = Vec<Product>> {
    let variant = (0u64..6, "[ab]?", "[xy]?", "[st]?").prop_map(|(id, sku, barcode, option1)| {
        Variant {
            id: VariantId::new(id),
            sku,
            barcode,
            option1,
            ..Variant::default()
        }
    });
    let product = (0u64..4, "[PQ]?", "[pq]?", prop::collection::vec(variant, 0..4)).prop_map(
        |(id, title, handle, variants)| Product {
            id: ProductId::new(id),
            title,
            handle,
            variants,
            ..Product::default()
        },
    );
    prop::collection::vec(product, 0..6)
}

/// Number of repeated claims: occurrences minus distinct values
fn repeats<K: std::hash::Hash + Eq>(keys: impl Iterator<Item = K>) -> usize {
    let mut counts: HashMap<K, usize> = HashMap::new();
    for key in keys {
        *counts.entry(key).or_default() += 1;
    }
    counts.values().map(|n| n - 1).sum()
}

// =============================================================================
// TOTALITY
// =============================================================================

proptest! {
    /// Every key of a duplicate-free snapshot maps back to its owner
    #[test]
    fn lookup_by_every_key_finds_owner(snapshot in unique_snapshot()) {
        let index = CatalogIndex::build(&snapshot).unwrap();

        for product in &snapshot {
            prop_assert_eq!(index.products.get_by_id(product.id).map(|p| p.id), Some(product.id));
            prop_assert_eq!(index.products.get_by_title(&product.title).map(|p| p.id), Some(product.id));
            prop_assert_eq!(index.products.get_by_handle(&product.handle).map(|p| p.id), Some(product.id));

            for variant in &product.variants {
                let by_id = index.variants.get_by_id(variant.id).unwrap();
                prop_assert_eq!(by_id.id(), variant.id);
                prop_assert_eq!(by_id.product_id, product.id);

                if !variant.sku.is_empty() {
                    prop_assert_eq!(index.variants.get_by_sku(&variant.sku).map(|e| e.id()), Some(variant.id));
                }
                if !variant.barcode.is_empty() {
                    prop_assert_eq!(index.variants.get_by_barcode(&variant.barcode).map(|e| e.id()), Some(variant.id));
                }
                let by_options = index.variants.get_by_options(product.id, &variant.option_values());
                prop_assert_eq!(by_options.map(|e| e.id()), Some(variant.id));
            }
        }
    }

    /// Keys that no record carries are never found
    #[test]
    fn absent_keys_are_not_found(snapshot in unique_snapshot()) {
        let index = CatalogIndex::build(&snapshot).unwrap();

        prop_assert!(index.products.get_by_id(ProductId::new(10_000)).is_none());
        prop_assert!(index.products.get_by_title("No Such Product").is_none());
        prop_assert!(index.products.get_by_handle("no-such-product").is_none());
        prop_assert!(index.variants.get_by_id(VariantId::new(999_999)).is_none());
        prop_assert!(index.variants.get_by_sku("NO-SUCH-SKU").is_none());
        prop_assert!(index.variants.get_by_barcode("0").is_none());
        prop_assert!(index
            .variants
            .get_by_options(ProductId::new(1), &OptionValues::new("no-such-option", "", ""))
            .is_none());
    }
}

// =============================================================================
// COMPLETENESS
// =============================================================================

proptest! {
    /// Every repeated claim of a key is reported, none twice
    #[test]
    fn every_duplicate_is_reported(snapshot in colliding_snapshot()) {
        let (_, dups) = CatalogIndex::build_lenient(&snapshot);

        let products = || snapshot.iter();
        let variants = || snapshot.iter().flat_map(|p| p.variants.iter().map(move |v| (p.id, v)));

        let expected_products = repeats(products().filter(|p| !p.id.is_new()).map(|p| p.id))
            + repeats(products().filter(|p| !p.title.is_empty()).map(|p| p.title.clone()))
            + repeats(products().filter(|p| !p.handle.is_empty()).map(|p| p.handle.clone()));
        let expected_variants = repeats(variants().filter(|(_, v)| !v.id.is_new()).map(|(_, v)| v.id))
            + repeats(variants().filter(|(_, v)| !v.sku.is_empty()).map(|(_, v)| v.sku.clone()))
            + repeats(variants().filter(|(_, v)| !v.barcode.is_empty()).map(|(_, v)| v.barcode.clone()))
            + repeats(variants().filter(|(pid, _)| !pid.is_new()).map(|(pid, v)| (pid, v.option_values())));

        let reported_products = dups.iter().filter(|d| d.kind == EntityKind::Product).count();
        let reported_variants = dups.iter().filter(|d| d.kind == EntityKind::Variant).count();
        prop_assert_eq!(reported_products, expected_products);
        prop_assert_eq!(reported_variants, expected_variants);
        prop_assert_eq!(CatalogIndex::build(&snapshot).is_ok(), dups.is_empty());
    }
}

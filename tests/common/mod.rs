//! Shared builders for the integration test suites.
//!
//! Import via `mod common;`.

#![allow(dead_code)]

pub use merchant::{
    reconcile, Error, IdentityConflict, OperationSet, Product, ProductId, Variant, VariantId,
};

/// Product with an ID and a title
pub fn product(id: u64, title: &str) -> Product {
    Product {
        id: ProductId::new(id),
        title: title.to_string(),
        ..Product::default()
    }
}

/// Variant with an ID, owned by `product_id`
pub fn variant(id: u64, product_id: u64) -> Variant {
    Variant {
        id: VariantId::new(id),
        product_id: ProductId::new(product_id),
        ..Variant::default()
    }
}

/// `product` with `variants` attached
pub fn with_variants(mut product: Product, variants: Vec<Variant>) -> Product {
    product.variants = variants;
    product
}

/// Run reconciliation, panicking on error
pub fn plan(snapshot: &[Product], incoming: &[Product]) -> OperationSet {
    reconcile(snapshot, incoming).unwrap()
}

/// Run reconciliation, returning the identity conflict it must fail with
pub fn conflict(snapshot: &[Product], incoming: &[Product]) -> IdentityConflict {
    match reconcile(snapshot, incoming) {
        Err(Error::Conflict(conflict)) => conflict,
        other => panic!("expected an identity conflict, got {:?}", other),
    }
}

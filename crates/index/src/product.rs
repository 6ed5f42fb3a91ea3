//! Product index: ID, title and handle → Product
//!
//! Each key maps to at most one product. When a second product claims a
//! key that is already taken, the first product keeps it and the clash
//! is reported as a `DuplicateKey`; the remaining keys of the second
//! product are still indexed.

use merchant_core::{DuplicateKey, EntityKind, IndexKey, KeyHolder, Product, ProductId};
use rustc_hash::FxHashMap;

/// Multi-key index over the products of one snapshot
#[derive(Debug, Default)]
pub struct ProductIndex<'a> {
    ids: FxHashMap<ProductId, &'a Product>,
    titles: FxHashMap<&'a str, &'a Product>,
    handles: FxHashMap<&'a str, &'a Product>,
}

impl<'a> ProductIndex<'a> {
    /// Create a new empty ProductIndex
    pub fn new() -> Self {
        Self::default()
    }

    /// Index `product` under every key it carries
    ///
    /// Zero IDs and empty titles or handles are not keys. Returns the
    /// duplicates found, in key order (ID, title, handle).
    pub fn insert(&mut self, product: &'a Product) -> Vec<DuplicateKey> {
        let mut duplicates = Vec::new();

        if let Some(id) = product.id.assigned() {
            if let Some(existing) = claim(&mut self.ids, id, product) {
                duplicates.push(duplicate(IndexKey::Id(id.get()), existing, product));
            }
        }
        if !product.title.is_empty() {
            if let Some(existing) = claim(&mut self.titles, product.title.as_str(), product) {
                duplicates.push(duplicate(
                    IndexKey::Title(product.title.clone()),
                    existing,
                    product,
                ));
            }
        }
        if !product.handle.is_empty() {
            if let Some(existing) = claim(&mut self.handles, product.handle.as_str(), product) {
                duplicates.push(duplicate(
                    IndexKey::Handle(product.handle.clone()),
                    existing,
                    product,
                ));
            }
        }
        duplicates
    }

    /// Look up a product by ID
    pub fn get_by_id(&self, id: ProductId) -> Option<&'a Product> {
        self.ids.get(&id).copied()
    }

    /// Look up a product by title
    pub fn get_by_title(&self, title: &str) -> Option<&'a Product> {
        self.titles.get(title).copied()
    }

    /// Look up a product by handle
    pub fn get_by_handle(&self, handle: &str) -> Option<&'a Product> {
        self.handles.get(handle).copied()
    }

    /// Look up a product by any product key
    ///
    /// Variant keys never match.
    pub fn get(&self, key: &IndexKey) -> Option<&'a Product> {
        match key {
            IndexKey::Id(id) => self.get_by_id(ProductId::new(*id)),
            IndexKey::Title(title) => self.get_by_title(title),
            IndexKey::Handle(handle) => self.get_by_handle(handle),
            IndexKey::Sku(_) | IndexKey::Barcode(_) | IndexKey::Options(_) => None,
        }
    }

    /// Check if the index is empty
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty() && self.titles.is_empty() && self.handles.is_empty()
    }

    /// Get the number of products indexed by ID
    pub fn len(&self) -> usize {
        self.ids.len()
    }
}

/// Bind `key` to `product` unless taken; returns the current holder if taken
fn claim<'a, K: std::hash::Hash + Eq>(
    map: &mut FxHashMap<K, &'a Product>,
    key: K,
    product: &'a Product,
) -> Option<&'a Product> {
    match map.get(&key) {
        Some(existing) => Some(*existing),
        None => {
            map.insert(key, product);
            None
        }
    }
}

fn duplicate(key: IndexKey, existing: &Product, product: &Product) -> DuplicateKey {
    DuplicateKey {
        kind: EntityKind::Product,
        key,
        existing: KeyHolder::product(existing),
        duplicate: KeyHolder::product(product),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: u64, title: &str, handle: &str) -> Product {
        Product {
            id: ProductId::new(id),
            title: title.to_string(),
            handle: handle.to_string(),
            ..Product::default()
        }
    }

    #[test]
    fn test_insert_and_get_by_every_key() {
        let widget = product(1, "Widget", "widget");
        let gadget = product(2, "Gadget", "gadget");
        let mut index = ProductIndex::new();
        assert!(index.insert(&widget).is_empty());
        assert!(index.insert(&gadget).is_empty());

        assert_eq!(index.get_by_id(ProductId::new(1)).unwrap().title, "Widget");
        assert_eq!(index.get_by_title("Gadget").unwrap().id, ProductId::new(2));
        assert_eq!(index.get_by_handle("widget").unwrap().id, ProductId::new(1));
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn test_absent_keys_are_not_found() {
        let widget = product(1, "Widget", "widget");
        let mut index = ProductIndex::new();
        index.insert(&widget);

        assert!(index.get_by_id(ProductId::new(99)).is_none());
        assert!(index.get_by_title("widget").is_none());
        assert!(index.get_by_handle("Widget").is_none());
        assert!(index.get(&IndexKey::Sku("Widget".into())).is_none());
    }

    #[test]
    fn test_empty_keys_are_not_indexed() {
        let unnamed = product(0, "", "");
        let mut index = ProductIndex::new();
        assert!(index.insert(&unnamed).is_empty());
        let unnamed_clone = unnamed.clone();
        assert!(index.insert(&unnamed_clone).is_empty());
        assert!(index.is_empty());
        assert!(index.get_by_id(ProductId::NEW).is_none());
        assert!(index.get_by_title("").is_none());
    }

    #[test]
    fn test_duplicate_title_keeps_first_and_indexes_remaining_keys() {
        let first = product(1, "Widget", "widget");
        let second = product(2, "Widget", "widget-2");
        let mut index = ProductIndex::new();
        index.insert(&first);
        let duplicates = index.insert(&second);

        assert_eq!(
            duplicates,
            vec![DuplicateKey {
                kind: EntityKind::Product,
                key: IndexKey::Title("Widget".into()),
                existing: KeyHolder::product(&first),
                duplicate: KeyHolder::product(&second),
            }]
        );
        assert_eq!(index.get_by_title("Widget").unwrap().id, ProductId::new(1));
        assert_eq!(index.get_by_id(ProductId::new(2)).unwrap().handle, "widget-2");
        assert_eq!(index.get_by_handle("widget-2").unwrap().id, ProductId::new(2));
    }

    #[test]
    fn test_duplicates_without_ids_are_named_by_title() {
        let first = product(0, "Widget", "");
        let second = product(0, "Widget", "");
        let mut index = ProductIndex::new();
        index.insert(&first);
        let duplicates = index.insert(&second);

        assert_eq!(duplicates.len(), 1);
        assert_eq!(
            duplicates[0].to_string(),
            "product title \"Widget\" already exists: held by product \"Widget\", also claimed by product \"Widget\""
        );
    }

    #[test]
    fn test_every_clashing_key_is_reported() {
        let first = product(1, "Widget", "widget");
        let second = product(1, "Widget", "widget");
        let mut index = ProductIndex::new();
        index.insert(&first);
        let keys: Vec<_> = index.insert(&second).into_iter().map(|d| d.key).collect();
        assert_eq!(
            keys,
            vec![
                IndexKey::Id(1),
                IndexKey::Title("Widget".into()),
                IndexKey::Handle("widget".into()),
            ]
        );
    }

    #[test]
    fn test_handle_does_not_clash_with_title() {
        let first = product(1, "widget", "first");
        let second = product(2, "Second", "widget");
        let mut index = ProductIndex::new();
        index.insert(&first);
        assert!(index.insert(&second).is_empty());
    }

    #[test]
    fn test_default() {
        let index = ProductIndex::default();
        assert!(index.is_empty());
        assert_eq!(index.len(), 0);
    }
}

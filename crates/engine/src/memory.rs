//! In-memory catalog service
//!
//! Stands in for the remote store: assigns sequential IDs on create and
//! applies updates the way the store does, where attributes left empty
//! on the request keep their stored value. Loads from and saves to a
//! JSON snapshot file so a catalog can be edited offline.

use crate::apply::CatalogService;
use merchant_core::{
    attach_metafield, Error, Product, ProductId, Result, Variant, VariantId,
};
use std::path::Path;
use tracing::debug;

/// A catalog held in memory
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryCatalog {
    products: Vec<Product>,
    last_id: u64,
}

impl MemoryCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::from_products(Vec::new())
    }

    /// Create a catalog holding `products`
    ///
    /// New IDs continue after the largest ID in use.
    pub fn from_products(products: Vec<Product>) -> Self {
        let max_id = products
            .iter()
            .flat_map(|p| std::iter::once(p.id.get()).chain(p.variants.iter().map(|v| v.id.get())))
            .max()
            .unwrap_or(0);
        Self {
            products,
            last_id: max_id,
        }
    }

    /// Load a catalog from a JSON snapshot file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let products: Vec<Product> = serde_json::from_str(&content).map_err(|e| {
            Error::Serialization(format!(
                "Failed to parse catalog '{}': {}",
                path.display(),
                e
            ))
        })?;
        debug!(target: "merchant::memory", path = %path.display(), products = products.len(), "Loaded catalog");
        Ok(Self::from_products(products))
    }

    /// Save the catalog as a JSON snapshot file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(&self.products)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Current products
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Consume the catalog, returning its products
    pub fn into_products(self) -> Vec<Product> {
        self.products
    }

    fn allocate(&mut self) -> Result<u64> {
        let last = self.last_id;
        self.last_id = last
            .checked_add(1)
            .ok_or_else(|| Error::Service(format!("no IDs left after {}", last)))?;
        Ok(self.last_id)
    }

    fn product_mut(&mut self, id: ProductId) -> Result<&mut Product> {
        self.products
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| Error::Service(format!("product {} not found", id)))
    }

    fn variant_mut(&mut self, id: VariantId) -> Result<&mut Variant> {
        self.products
            .iter_mut()
            .flat_map(|p| p.variants.iter_mut())
            .find(|v| v.id == id)
            .ok_or_else(|| Error::Service(format!("variant {} not found", id)))
    }
}

impl CatalogService for MemoryCatalog {
    fn list_products(&mut self) -> Result<Vec<Product>> {
        Ok(self.products.clone())
    }

    fn create_product(&mut self, product: &Product) -> Result<Product> {
        if !product.id.is_new() {
            return Err(Error::Service(format!(
                "cannot create product with ID {}",
                product.id
            )));
        }
        if product.title.is_empty() {
            return Err(Error::Service("title can't be blank".to_string()));
        }
        let mut created = product.clone();
        created.id = ProductId::new(self.allocate()?);
        for variant in &mut created.variants {
            variant.id = VariantId::new(self.allocate()?);
            variant.product_id = created.id;
        }
        self.products.push(created.clone());
        Ok(created)
    }

    fn update_product(&mut self, product: &Product) -> Result<Product> {
        let stored = self.product_mut(product.id)?;
        merge_product(stored, product);
        Ok(stored.clone())
    }

    fn create_variant(&mut self, product_id: ProductId, variant: &Variant) -> Result<Variant> {
        let id = VariantId::new(self.allocate()?);
        let product = self.product_mut(product_id)?;
        let values = variant.option_values();
        if product.variants.iter().any(|v| v.option_values() == values) {
            return Err(Error::Service(format!(
                "variant {} already exists on product {}",
                values, product_id
            )));
        }
        let created = Variant {
            id,
            product_id,
            ..variant.clone()
        };
        product.variants.push(created.clone());
        Ok(created)
    }

    fn update_variant(&mut self, variant: &Variant) -> Result<Variant> {
        let stored = self.variant_mut(variant.id)?;
        merge_variant(stored, variant);
        Ok(stored.clone())
    }
}

fn set(stored: &mut String, incoming: &str) {
    if !incoming.is_empty() {
        *stored = incoming.to_string();
    }
}

fn merge_product(stored: &mut Product, incoming: &Product) {
    set(&mut stored.title, &incoming.title);
    set(&mut stored.handle, &incoming.handle);
    set(&mut stored.body_html, &incoming.body_html);
    set(&mut stored.vendor, &incoming.vendor);
    set(&mut stored.product_type, &incoming.product_type);
    set(&mut stored.tags, &incoming.tags);
    set(&mut stored.status, &incoming.status);
    if !incoming.options.is_empty() {
        stored.options = incoming.options.clone();
    }
    for metafield in &incoming.metafields {
        attach_metafield(&mut stored.metafields, metafield.clone());
    }
    stored
        .extra
        .extend(incoming.extra.iter().map(|(k, v)| (k.clone(), v.clone())));
}

fn merge_variant(stored: &mut Variant, incoming: &Variant) {
    set(&mut stored.sku, &incoming.sku);
    set(&mut stored.barcode, &incoming.barcode);
    set(&mut stored.title, &incoming.title);
    set(&mut stored.price, &incoming.price);
    set(&mut stored.weight_unit, &incoming.weight_unit);
    set(&mut stored.option1, &incoming.option1);
    set(&mut stored.option2, &incoming.option2);
    set(&mut stored.option3, &incoming.option3);
    if incoming.weight.is_some() {
        stored.weight = incoming.weight;
    }
    for metafield in &incoming.metafields {
        attach_metafield(&mut stored.metafields, metafield.clone());
    }
    stored
        .extra
        .extend(incoming.extra.iter().map(|(k, v)| (k.clone(), v.clone())));
}

//! The classified result of a reconciliation run
//!
//! Four ordered lists: products to create (with their variants embedded),
//! product updates (without variants), variants to create under an
//! existing product, and variant updates. Insertion order is preserved
//! within each list.

use merchant_core::{Product, Result, Variant};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::Write;

/// Create and update operations needed to converge the catalog
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OperationSet {
    /// Products to create, variants included
    #[serde(rename = "newParents", default, skip_serializing_if = "Vec::is_empty")]
    pub new_products: Vec<Product>,
    /// Products to update, keyed by ID, variants stripped
    #[serde(rename = "parentUpdates", default, skip_serializing_if = "Vec::is_empty")]
    pub product_updates: Vec<Product>,
    /// Variants to create under an existing product
    #[serde(rename = "newChildren", default, skip_serializing_if = "Vec::is_empty")]
    pub new_variants: Vec<Variant>,
    /// Variants to update, keyed by ID
    #[serde(rename = "childUpdates", default, skip_serializing_if = "Vec::is_empty")]
    pub variant_updates: Vec<Variant>,
}

impl OperationSet {
    /// Create an empty OperationSet
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a product for creation
    pub fn add_new_product(&mut self, product: Product) {
        self.new_products.push(product);
    }

    /// Queue a product update
    ///
    /// Variants are dropped: they are reconciled on their own.
    pub fn add_product_update(&mut self, mut product: Product) {
        product.variants.clear();
        self.product_updates.push(product);
    }

    /// Queue a variant for creation under `variant.product_id`
    pub fn add_new_variant(&mut self, variant: Variant) {
        self.new_variants.push(variant);
    }

    /// Queue a variant update
    pub fn add_variant_update(&mut self, variant: Variant) {
        self.variant_updates.push(variant);
    }

    /// Append every operation of `other`, keeping order
    pub fn extend(&mut self, other: OperationSet) {
        self.new_products.extend(other.new_products);
        self.product_updates.extend(other.product_updates);
        self.new_variants.extend(other.new_variants);
        self.variant_updates.extend(other.variant_updates);
    }

    /// True if there is nothing to apply
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Total number of operations
    pub fn len(&self) -> usize {
        self.new_products.len()
            + self.product_updates.len()
            + self.new_variants.len()
            + self.variant_updates.len()
    }

    /// Structured export as pretty-printed JSON; empty lists are omitted
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the structured export to `w`
    pub fn write_json<W: Write>(&self, mut w: W) -> Result<()> {
        serde_json::to_writer_pretty(&mut w, self)?;
        writeln!(w)?;
        Ok(())
    }

    /// Human-readable summary for review before applying
    pub fn summary(&self) -> Summary<'_> {
        Summary(self)
    }
}

/// Counts-and-identifiers view of an [`OperationSet`]
pub struct Summary<'a>(&'a OperationSet);

impl fmt::Display for Summary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ops = self.0;
        if ops.is_empty() {
            return writeln!(f, "No changes.");
        }

        writeln!(f, "New products: {}", ops.new_products.len())?;
        for product in &ops.new_products {
            writeln!(
                f,
                "  + {} ({} variant(s))",
                product_label(product),
                product.variants.len()
            )?;
        }
        writeln!(f, "Product updates: {}", ops.product_updates.len())?;
        for product in &ops.product_updates {
            writeln!(f, "  ~ product {} {}", product.id, product_label(product))?;
        }
        writeln!(f, "New variants: {}", ops.new_variants.len())?;
        for variant in &ops.new_variants {
            writeln!(
                f,
                "  + product {}: {}",
                variant.product_id,
                variant_label(variant)
            )?;
        }
        writeln!(f, "Variant updates: {}", ops.variant_updates.len())?;
        for variant in &ops.variant_updates {
            writeln!(f, "  ~ variant {} {}", variant.id, variant_label(variant))?;
        }
        Ok(())
    }
}

fn product_label(product: &Product) -> String {
    if !product.title.is_empty() {
        format!("{:?}", product.title)
    } else if !product.handle.is_empty() {
        format!("handle {:?}", product.handle)
    } else {
        "(untitled)".to_string()
    }
}

fn variant_label(variant: &Variant) -> String {
    if !variant.sku.is_empty() {
        format!("sku {:?}", variant.sku)
    } else if !variant.barcode.is_empty() {
        format!("barcode {:?}", variant.barcode)
    } else {
        format!("options {}", variant.option_values())
    }
}

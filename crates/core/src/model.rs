//! Catalog records
//!
//! Products own their variants. Every record may be partial: a CSV row
//! rarely carries every attribute, so empty strings and `None` mean
//! "not set" rather than "clear this attribute". Attributes the crate
//! does not model are kept verbatim in `extra` so they survive a round
//! trip through the store.

use crate::options::OptionValues;
use crate::types::{ProductId, VariantId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Attributes without a dedicated field, keyed by their store name
pub type Extra = BTreeMap<String, serde_json::Value>;

/// A top-level catalog item
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Store ID, `ProductId::NEW` for records not created yet
    #[serde(default, skip_serializing_if = "ProductId::is_new")]
    pub id: ProductId,
    /// Human-readable title, unique within a catalog
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub title: String,
    /// URL-safe handle, unique within a catalog
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub handle: String,
    /// Description markup
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub body_html: String,
    /// Vendor name
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub vendor: String,
    /// Product type
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub product_type: String,
    /// Comma-separated tags
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub tags: String,
    /// Publication status
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub status: String,
    /// Option dimensions (names of option1..option3)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<ProductOption>,
    /// Owned variants
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub variants: Vec<Variant>,
    /// Attached metafields
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub metafields: Vec<Metafield>,
    /// Any other attribute, copied verbatim
    #[serde(flatten)]
    pub extra: Extra,
}

/// A purchasable variant of a product
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Variant {
    /// Store ID, `VariantId::NEW` for records not created yet
    #[serde(default, skip_serializing_if = "VariantId::is_new")]
    pub id: VariantId,
    /// Owning product
    #[serde(default, skip_serializing_if = "ProductId::is_new")]
    pub product_id: ProductId,
    /// Stock keeping unit, unique within a catalog when set
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub sku: String,
    /// Barcode (ISBN, UPC, GTIN), unique within a catalog when set
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub barcode: String,
    /// Display title derived from the option values
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub title: String,
    /// Price as a decimal string
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub price: String,
    /// Weight in `weight_unit`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    /// Unit of `weight`
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub weight_unit: String,
    /// First option value
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub option1: String,
    /// Second option value
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub option2: String,
    /// Third option value
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub option3: String,
    /// Attached metafields
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub metafields: Vec<Metafield>,
    /// Any other attribute, copied verbatim
    #[serde(flatten)]
    pub extra: Extra,
}

/// One option dimension of a product
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductOption {
    /// Dimension name, e.g. "Size"
    #[serde(default)]
    pub name: String,
    /// Known values of the dimension
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<String>,
}

/// Custom attribute attached to a product or variant
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Metafield {
    /// "product" or "variant"
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub owner_resource: String,
    /// Namespace grouping related metafields
    pub namespace: String,
    /// Key within the namespace
    pub key: String,
    /// Stored value
    #[serde(default)]
    pub value: serde_json::Value,
    /// Store type name, e.g. "single_line_text_field"
    #[serde(default, rename = "type", skip_serializing_if = "String::is_empty")]
    pub value_type: String,
}

impl Metafield {
    /// True if both metafields address the same slot
    pub fn same_slot(&self, other: &Metafield) -> bool {
        self.namespace == other.namespace
            && self.key == other.key
            && self.owner_resource == other.owner_resource
    }
}

/// Insert `metafield`, replacing an existing one in the same slot
pub fn attach_metafield(metafields: &mut Vec<Metafield>, metafield: Metafield) {
    match metafields.iter_mut().find(|m| m.same_slot(&metafield)) {
        Some(existing) => *existing = metafield,
        None => metafields.push(metafield),
    }
}

impl Product {
    /// Clone of this product with the variant list dropped
    pub fn without_variants(&self) -> Product {
        Product {
            variants: Vec::new(),
            ..self.clone()
        }
    }

    /// Strip every store ID so the record can be created from scratch
    pub fn into_new(mut self) -> Product {
        self.id = ProductId::NEW;
        for variant in &mut self.variants {
            variant.id = VariantId::NEW;
            variant.product_id = ProductId::NEW;
        }
        self
    }

    /// True if every attribute except the variant list equals `other`'s
    ///
    /// This is plain equality: an empty string differs from a set one, so
    /// a partial record never compares equal to a complete one.
    pub fn same_content(&self, other: &Product) -> bool {
        self.id == other.id
            && self.title == other.title
            && self.handle == other.handle
            && self.body_html == other.body_html
            && self.vendor == other.vendor
            && self.product_type == other.product_type
            && self.tags == other.tags
            && self.status == other.status
            && self.options == other.options
            && self.metafields == other.metafields
            && self.extra == other.extra
    }
}

impl Variant {
    /// Normalized option values of this variant
    pub fn option_values(&self) -> OptionValues {
        OptionValues::new(&self.option1, &self.option2, &self.option3)
    }
}

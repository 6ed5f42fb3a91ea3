//! Column names
//!
//! A sheet has a fixed set of record columns plus one column per
//! metafield, named by its path:
//!
//! ```text
//! <product|variant>.metafields.<namespace>.<key>
//! ```

use merchant_core::{EntityKind, Error, Metafield, Result};
use std::fmt;
use std::str::FromStr;

/// `Product ID` column
pub const PRODUCT_ID: &str = "Product ID";
/// `Variant ID` column
pub const VARIANT_ID: &str = "Variant ID";
/// `SKU` column
pub const SKU: &str = "SKU";
/// `Barcode` column
pub const BARCODE: &str = "Barcode";
/// `Title` column, the only required one
pub const TITLE: &str = "Title";
/// `Vendor` column
pub const VENDOR: &str = "Vendor";
/// `Product Type` column
pub const PRODUCT_TYPE: &str = "Product Type";
/// `Weight` column
pub const WEIGHT: &str = "Weight";
/// `Weight Unit` column
pub const WEIGHT_UNIT: &str = "Weight Unit";
/// `Price` column
pub const PRICE: &str = "Price";

const OPTION_NAMES: [&str; 3] = ["Option1 Name", "Option2 Name", "Option3 Name"];
const OPTION_VALUES: [&str; 3] = ["Option1 Value", "Option2 Value", "Option3 Value"];

/// One column of a sheet
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Column {
    /// Product ID
    ProductId,
    /// Variant ID
    VariantId,
    /// Variant SKU
    Sku,
    /// Variant barcode
    Barcode,
    /// Product title
    Title,
    /// Product vendor
    Vendor,
    /// Product type
    ProductType,
    /// Variant weight
    Weight,
    /// Unit of the variant weight
    WeightUnit,
    /// Variant price
    Price,
    /// Name of option dimension 0..3
    OptionName(usize),
    /// Variant value of option dimension 0..3
    OptionValue(usize),
    /// A product or variant metafield
    Metafield(MetafieldPath),
}

impl Column {
    /// The fixed columns, in sheet order
    pub fn fixed() -> Vec<Column> {
        let mut columns = vec![
            Column::ProductId,
            Column::VariantId,
            Column::Sku,
            Column::Barcode,
            Column::Title,
            Column::Vendor,
            Column::ProductType,
            Column::Weight,
            Column::WeightUnit,
            Column::Price,
        ];
        for i in 0..3 {
            columns.push(Column::OptionName(i));
            columns.push(Column::OptionValue(i));
        }
        columns
    }
}

impl FromStr for Column {
    type Err = Error;

    fn from_str(name: &str) -> Result<Self> {
        let column = match name {
            PRODUCT_ID => Column::ProductId,
            VARIANT_ID => Column::VariantId,
            SKU => Column::Sku,
            BARCODE => Column::Barcode,
            TITLE => Column::Title,
            VENDOR => Column::Vendor,
            PRODUCT_TYPE => Column::ProductType,
            WEIGHT => Column::Weight,
            WEIGHT_UNIT => Column::WeightUnit,
            PRICE => Column::Price,
            _ => {
                if let Some(i) = OPTION_NAMES.iter().position(|n| *n == name) {
                    Column::OptionName(i)
                } else if let Some(i) = OPTION_VALUES.iter().position(|n| *n == name) {
                    Column::OptionValue(i)
                } else if name.starts_with("product.metafields") || name.starts_with("variant.metafields") {
                    Column::Metafield(name.parse()?)
                } else {
                    return Err(Error::Csv(format!("unknown column {:?}", name)));
                }
            }
        };
        Ok(column)
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Column::ProductId => f.write_str(PRODUCT_ID),
            Column::VariantId => f.write_str(VARIANT_ID),
            Column::Sku => f.write_str(SKU),
            Column::Barcode => f.write_str(BARCODE),
            Column::Title => f.write_str(TITLE),
            Column::Vendor => f.write_str(VENDOR),
            Column::ProductType => f.write_str(PRODUCT_TYPE),
            Column::Weight => f.write_str(WEIGHT),
            Column::WeightUnit => f.write_str(WEIGHT_UNIT),
            Column::Price => f.write_str(PRICE),
            Column::OptionName(i) => f.write_str(OPTION_NAMES[*i]),
            Column::OptionValue(i) => f.write_str(OPTION_VALUES[*i]),
            Column::Metafield(path) => path.fmt(f),
        }
    }
}

/// Parsed metafield column name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MetafieldPath {
    /// Whether the metafield belongs to the product or the variant
    pub owner: EntityKind,
    /// Metafield namespace
    pub namespace: String,
    /// Metafield key
    pub key: String,
}

impl MetafieldPath {
    /// Path of an existing metafield owned by `owner`
    pub fn of(owner: EntityKind, metafield: &Metafield) -> Self {
        Self {
            owner,
            namespace: metafield.namespace.clone(),
            key: metafield.key.clone(),
        }
    }

    /// A metafield at this path holding `value`
    pub fn metafield(&self, value: serde_json::Value) -> Metafield {
        Metafield {
            owner_resource: self.owner.to_string(),
            namespace: self.namespace.clone(),
            key: self.key.clone(),
            value,
            value_type: String::new(),
        }
    }
}

impl FromStr for MetafieldPath {
    type Err = Error;

    fn from_str(path: &str) -> Result<Self> {
        let parts: Vec<&str> = path.split('.').collect();
        let [owner, metafields, namespace, key] = parts.as_slice() else {
            return Err(Error::Csv(format!("path {:?} does not have four parts", path)));
        };
        let owner = match *owner {
            "product" => EntityKind::Product,
            "variant" => EntityKind::Variant,
            other => {
                return Err(Error::Csv(format!(
                    "first part must be \"product\" or \"variant\", got {:?}",
                    other
                )))
            }
        };
        if *metafields != "metafields" {
            return Err(Error::Csv(format!(
                "second part must be \"metafields\", got {:?}",
                metafields
            )));
        }
        if namespace.is_empty() || key.is_empty() {
            return Err(Error::Csv(format!(
                "path {:?} needs a namespace and a key",
                path
            )));
        }
        Ok(Self {
            owner,
            namespace: namespace.to_string(),
            key: key.to_string(),
        })
    }
}

impl fmt::Display for MetafieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.metafields.{}.{}", self.owner, self.namespace, self.key)
    }
}

//! Writing products to CSV
//!
//! Each variant becomes one row carrying its product's attributes. A
//! product without variants still gets a row so it is not lost on export.

use crate::columns::{Column, MetafieldPath};
use merchant_core::{
    EntityKind, Error, MerchantConfig, Metafield, MetafieldDefinitions, Product, Result, Variant,
    DEFAULT_OPTION_NAME, DEFAULT_OPTION_VALUE,
};
use std::io::Write;
use std::path::Path;
use tracing::debug;

/// Write `products` to `writer`
///
/// Declared metafields get a column even when no record sets them; any
/// other metafield gets a column in the order it is first seen.
pub fn write_products<W: Write>(
    writer: W,
    products: &[Product],
    definitions: &MetafieldDefinitions,
) -> Result<()> {
    let columns = header(products, definitions);
    let mut writer = csv::Writer::from_writer(writer);
    writer
        .write_record(columns.iter().map(|c| c.to_string()))
        .map_err(csv_error)?;

    let mut rows = 0usize;
    let empty = Variant::default();
    for product in products {
        if product.variants.is_empty() {
            writer
                .write_record(row(&columns, product, &empty)?)
                .map_err(csv_error)?;
            rows += 1;
        }
        for variant in &product.variants {
            writer
                .write_record(row(&columns, product, variant)?)
                .map_err(csv_error)?;
            rows += 1;
        }
    }
    writer.flush()?;

    debug!(target: "merchant::csv", products = products.len(), rows, "Wrote products");
    Ok(())
}

/// Write `products` to a CSV file at `path`
pub fn write_file(path: &Path, products: &[Product], config: &MerchantConfig) -> Result<()> {
    let file = std::fs::File::create(path).map_err(|e| {
        Error::Csv(format!("Failed to create '{}': {}", path.display(), e))
    })?;
    write_products(file, products, &config.metafield_definitions)
}

fn header(products: &[Product], definitions: &MetafieldDefinitions) -> Vec<Column> {
    let mut paths: Vec<MetafieldPath> = Vec::new();
    let mut push = |path: MetafieldPath| {
        if !paths.contains(&path) {
            paths.push(path);
        }
    };

    for def in &definitions.product {
        push(MetafieldPath {
            owner: EntityKind::Product,
            namespace: def.namespace.clone(),
            key: def.key.clone(),
        });
    }
    for def in &definitions.variant {
        push(MetafieldPath {
            owner: EntityKind::Variant,
            namespace: def.namespace.clone(),
            key: def.key.clone(),
        });
    }
    for product in products {
        for metafield in &product.metafields {
            push(MetafieldPath::of(EntityKind::Product, metafield));
        }
        for variant in &product.variants {
            for metafield in &variant.metafields {
                push(MetafieldPath::of(EntityKind::Variant, metafield));
            }
        }
    }

    let mut columns = Column::fixed();
    columns.extend(paths.into_iter().map(Column::Metafield));
    columns
}

fn row(columns: &[Column], product: &Product, variant: &Variant) -> Result<Vec<String>> {
    columns
        .iter()
        .map(|column| cell(column, product, variant))
        .collect()
}

fn cell(column: &Column, product: &Product, variant: &Variant) -> Result<String> {
    let value = match column {
        Column::ProductId => id_cell(product.id.get()),
        Column::VariantId => id_cell(variant.id.get()),
        Column::Sku => variant.sku.clone(),
        Column::Barcode => variant.barcode.clone(),
        Column::Title => product.title.clone(),
        Column::Vendor => product.vendor.clone(),
        Column::ProductType => product.product_type.clone(),
        Column::Weight => variant.weight.map(|w| w.to_string()).unwrap_or_default(),
        Column::WeightUnit => variant.weight_unit.clone(),
        Column::Price => variant.price.clone(),
        Column::OptionName(i) => match product.options.get(*i) {
            Some(option) if option.name != DEFAULT_OPTION_NAME => option.name.clone(),
            _ => String::new(),
        },
        Column::OptionValue(i) => {
            let value = match i {
                0 => &variant.option1,
                1 => &variant.option2,
                _ => &variant.option3,
            };
            if value == DEFAULT_OPTION_VALUE {
                String::new()
            } else {
                value.clone()
            }
        }
        Column::Metafield(path) => {
            let metafields = match path.owner {
                EntityKind::Product => &product.metafields,
                EntityKind::Variant => &variant.metafields,
            };
            match metafields
                .iter()
                .find(|m| m.namespace == path.namespace && m.key == path.key)
            {
                Some(metafield) => metafield_cell(metafield)?,
                None => String::new(),
            }
        }
    };
    Ok(value)
}

fn id_cell(id: u64) -> String {
    if id == 0 {
        String::new()
    } else {
        id.to_string()
    }
}

/// Strings are written as-is; any other value as JSON text
fn metafield_cell(metafield: &Metafield) -> Result<String> {
    match &metafield.value {
        serde_json::Value::Null => Ok(String::new()),
        serde_json::Value::String(s) => Ok(s.clone()),
        other => Ok(serde_json::to_string(other)?),
    }
}

fn csv_error(e: csv::Error) -> Error {
    Error::Csv(e.to_string())
}

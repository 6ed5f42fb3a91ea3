//! Reading products from CSV
//!
//! The first row is the header. Every other row is one variant; rows
//! sharing a title are grouped into one product, in first-seen order.

use crate::columns::Column;
use merchant_core::{
    attach_metafield, EntityKind, Error, MetafieldDefinitions, MerchantConfig, Product,
    ProductId, ProductOption, Result, Variant, VariantId,
};
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// Read products from `reader`
///
/// `definitions` supplies the type of declared metafields. Errors name
/// the sheet row (the header is row 1).
pub fn read_products<R: Read>(reader: R, definitions: &MetafieldDefinitions) -> Result<Vec<Product>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let header = reader.headers().map_err(|e| row_error(1, e))?.clone();
    if header.is_empty() {
        return Ok(Vec::new());
    }
    let columns = header
        .iter()
        .map(|name| name.parse::<Column>())
        .collect::<Result<Vec<_>>>()
        .map_err(|e| Error::Csv(format!("row 1: {}", message(e))))?;
    let title_column = columns
        .iter()
        .position(|c| *c == Column::Title)
        .ok_or_else(|| Error::Csv("no \"Title\" column found".to_string()))?;

    let mut products: Vec<Product> = Vec::new();
    let mut by_title: HashMap<String, usize> = HashMap::new();

    for (i, record) in reader.records().enumerate() {
        let row = i + 2;
        let record = record.map_err(|e| row_error(row, e))?;
        let title = record.get(title_column).unwrap_or_default();
        if title.is_empty() {
            return Err(Error::Csv(format!("row {}: title can not be empty", row)));
        }

        let index = *by_title.entry(title.to_string()).or_insert_with(|| {
            products.push(Product::default());
            products.len() - 1
        });
        attach_row(&mut products[index], &columns, &record, definitions)
            .map_err(|e| Error::Csv(format!("row {}: {}", row, message(e))))?;
    }

    debug!(target: "merchant::csv", products = products.len(), "Read products");
    Ok(products)
}

/// Read products from the CSV file at `path`
pub fn read_file(path: &Path, config: &MerchantConfig) -> Result<Vec<Product>> {
    let file = std::fs::File::open(path).map_err(|e| {
        Error::Csv(format!("Failed to open '{}': {}", path.display(), e))
    })?;
    read_products(file, &config.metafield_definitions)
}

/// Attach one row to `product` as a new variant
fn attach_row(
    product: &mut Product,
    columns: &[Column],
    record: &csv::StringRecord,
    definitions: &MetafieldDefinitions,
) -> Result<()> {
    let mut variant = Variant::default();

    for (column, cell) in columns.iter().zip(record.iter()) {
        match column {
            Column::ProductId => {
                if let Some(id) = parse_id(column, cell)? {
                    let id = ProductId::new(id);
                    variant.product_id = id;
                    if product.id.is_new() {
                        product.id = id;
                    }
                }
            }
            Column::VariantId => {
                if let Some(id) = parse_id(column, cell)? {
                    variant.id = VariantId::new(id);
                }
            }
            Column::Sku => variant.sku = cell.to_string(),
            Column::Barcode => variant.barcode = cell.to_string(),
            Column::Title => product.title = cell.to_string(),
            Column::Vendor => set_if_present(&mut product.vendor, cell),
            Column::ProductType => set_if_present(&mut product.product_type, cell),
            Column::Weight => variant.weight = parse_decimal(column, cell)?,
            Column::WeightUnit => variant.weight_unit = cell.to_string(),
            Column::Price => {
                parse_decimal(column, cell)?;
                variant.price = cell.to_string();
            }
            Column::OptionName(i) => attach_option(product, *i, cell),
            Column::OptionValue(0) => variant.option1 = cell.to_string(),
            Column::OptionValue(1) => variant.option2 = cell.to_string(),
            Column::OptionValue(_) => variant.option3 = cell.to_string(),
            Column::Metafield(path) => {
                if cell.is_empty() {
                    continue;
                }
                let mut metafield = path.metafield(serde_json::Value::String(cell.to_string()));
                let defs = match path.owner {
                    EntityKind::Product => &definitions.product,
                    EntityKind::Variant => &definitions.variant,
                };
                if let Some(def) = MetafieldDefinitions::find(defs, &path.namespace, &path.key) {
                    metafield.value_type = def.value_type.clone();
                }
                match path.owner {
                    EntityKind::Product => attach_metafield(&mut product.metafields, metafield),
                    EntityKind::Variant => attach_metafield(&mut variant.metafields, metafield),
                }
            }
        }
    }

    product.variants.push(variant);
    Ok(())
}

/// Product attributes repeat on every row; a blank cell keeps the value
/// from an earlier row.
fn set_if_present(field: &mut String, cell: &str) {
    if !cell.is_empty() {
        *field = cell.to_string();
    }
}

fn attach_option(product: &mut Product, index: usize, name: &str) {
    if name.is_empty() {
        return;
    }
    if product.options.len() <= index {
        product.options.resize_with(index + 1, ProductOption::default);
    }
    product.options[index].name = name.to_string();
}

fn parse_id(column: &Column, cell: &str) -> Result<Option<u64>> {
    if cell.is_empty() {
        return Ok(None);
    }
    cell.parse::<u64>()
        .map(Some)
        .map_err(|e| Error::Csv(format!("column {:?}: {}", column.to_string(), e)))
}

fn parse_decimal(column: &Column, cell: &str) -> Result<Option<f64>> {
    if cell.is_empty() {
        return Ok(None);
    }
    cell.parse::<f64>()
        .map(Some)
        .map_err(|e| Error::Csv(format!("column {:?}: {}", column.to_string(), e)))
}

fn row_error(row: usize, e: csv::Error) -> Error {
    Error::Csv(format!("row {}: {}", row, e))
}

/// Message of a CSV error without the "CSV error:" prefix
fn message(e: Error) -> String {
    match e {
        Error::Csv(msg) => msg,
        other => other.to_string(),
    }
}

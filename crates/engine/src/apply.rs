//! Applying an OperationSet to a catalog service
//!
//! Operations run in list order: new products, product updates, new
//! variants, variant updates. A failed operation is recorded and the
//! remaining ones still run, so one report lists every failure.

use crate::operations::OperationSet;
use crate::reconcile::reconcile;
use merchant_core::{Error, Product, ProductId, Result, Variant};
use serde::Serialize;
use std::fmt;
use tracing::{info, warn};

/// Remote catalog the operations are applied to
pub trait CatalogService {
    /// Fetch every product with its variants
    fn list_products(&mut self) -> Result<Vec<Product>>;

    /// Create a product and its variants; returns the stored product
    fn create_product(&mut self, product: &Product) -> Result<Product>;

    /// Update the product with `product.id`; returns the stored product
    fn update_product(&mut self, product: &Product) -> Result<Product>;

    /// Create a variant under `product_id`; returns the stored variant
    fn create_variant(&mut self, product_id: ProductId, variant: &Variant) -> Result<Variant>;

    /// Update the variant with `variant.id`; returns the stored variant
    fn update_variant(&mut self, variant: &Variant) -> Result<Variant>;
}

/// Kind of operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    /// Create a product
    CreateProduct,
    /// Update a product
    UpdateProduct,
    /// Create a variant
    CreateVariant,
    /// Update a variant
    UpdateVariant,
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OperationKind::CreateProduct => "create product",
            OperationKind::UpdateProduct => "update product",
            OperationKind::CreateVariant => "create variant",
            OperationKind::UpdateVariant => "update variant",
        };
        f.write_str(name)
    }
}

/// One operation the service rejected
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApplyFailure {
    /// What was attempted
    pub operation: OperationKind,
    /// Record the operation targeted
    pub target: String,
    /// Error reported by the service
    pub reason: String,
}

impl fmt::Display for ApplyFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}: {}", self.operation, self.target, self.reason)
    }
}

/// Outcome of applying an OperationSet
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ApplyReport {
    /// Products created, as stored
    pub created_products: Vec<Product>,
    /// Number of products updated
    pub updated_products: usize,
    /// Variants created, as stored
    pub created_variants: Vec<Variant>,
    /// Number of variants updated
    pub updated_variants: usize,
    /// Every rejected operation, in the order attempted
    pub failures: Vec<ApplyFailure>,
}

impl ApplyReport {
    /// Number of operations that succeeded
    pub fn succeeded(&self) -> usize {
        self.created_products.len()
            + self.updated_products
            + self.created_variants.len()
            + self.updated_variants
    }

    /// True if every operation succeeded
    pub fn is_ok(&self) -> bool {
        self.failures.is_empty()
    }

    /// `Err(Error::Apply)` listing every failure, if there were any
    pub fn into_result(self) -> Result<ApplyReport> {
        if self.failures.is_empty() {
            Ok(self)
        } else {
            Err(Error::Apply(
                self.failures.iter().map(ToString::to_string).collect(),
            ))
        }
    }

    fn fail(&mut self, operation: OperationKind, target: String, err: Error) {
        warn!(target: "merchant::apply", %operation, record = %target, error = %err, "Operation failed");
        self.failures.push(ApplyFailure {
            operation,
            target,
            reason: err.to_string(),
        });
    }
}

/// Apply every operation in `ops` to `service`
pub fn apply<S: CatalogService + ?Sized>(service: &mut S, ops: &OperationSet) -> ApplyReport {
    let mut report = ApplyReport::default();

    for product in &ops.new_products {
        match service.create_product(product) {
            Ok(created) => report.created_products.push(created),
            Err(e) => report.fail(OperationKind::CreateProduct, format!("{:?}", product.title), e),
        }
    }
    for product in &ops.product_updates {
        match service.update_product(product) {
            Ok(_) => report.updated_products += 1,
            Err(e) => report.fail(OperationKind::UpdateProduct, product.id.to_string(), e),
        }
    }
    for variant in &ops.new_variants {
        match service.create_variant(variant.product_id, variant) {
            Ok(created) => report.created_variants.push(created),
            Err(e) => report.fail(
                OperationKind::CreateVariant,
                format!("{}/{}", variant.product_id, variant.option_values()),
                e,
            ),
        }
    }
    for variant in &ops.variant_updates {
        match service.update_variant(variant) {
            Ok(_) => report.updated_variants += 1,
            Err(e) => report.fail(OperationKind::UpdateVariant, variant.id.to_string(), e),
        }
    }

    info!(
        target: "merchant::apply",
        succeeded = report.succeeded(),
        failed = report.failures.len(),
        "Applied operations"
    );
    report
}

/// Reconcile `incoming` against a fresh snapshot from `service` and apply
///
/// Conflicts abort before anything is applied. Failures while applying
/// are collected in the report.
pub fn push<S: CatalogService + ?Sized>(
    service: &mut S,
    incoming: &[Product],
) -> Result<(OperationSet, ApplyReport)> {
    let snapshot = service.list_products()?;
    let ops = reconcile(&snapshot, incoming)?;
    let report = apply(service, &ops);
    Ok((ops, report))
}

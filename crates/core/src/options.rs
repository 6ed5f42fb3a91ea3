//! Option tuples
//!
//! A variant is distinguished within its product by up to three option
//! values (e.g. size, color, material). A product without real option
//! dimensions has a single variant whose first option value is the
//! store's placeholder `"Default Title"`; it compares equal to an empty
//! value everywhere in this crate.

use crate::types::ProductId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Placeholder option value the store assigns to single-variant products
pub const DEFAULT_OPTION_VALUE: &str = "Default Title";

/// Placeholder option name the store assigns to single-variant products
pub const DEFAULT_OPTION_NAME: &str = "Title";

/// Map the default placeholder to the empty string
pub fn normalize_option(value: &str) -> &str {
    if value == DEFAULT_OPTION_VALUE {
        ""
    } else {
        value
    }
}

/// Normalized option values of one variant
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OptionValues([String; 3]);

impl OptionValues {
    /// Build normalized option values from raw values
    pub fn new(option1: &str, option2: &str, option3: &str) -> Self {
        Self([
            normalize_option(option1).to_string(),
            normalize_option(option2).to_string(),
            normalize_option(option3).to_string(),
        ])
    }
}

impl fmt::Display for OptionValues {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.0[0], self.0[1], self.0[2])
    }
}

/// Option tuple scoped to a product
///
/// Options are only unique within a product, so the key carries the
/// product ID alongside the normalized values.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OptionKey {
    /// Owning product
    pub product_id: ProductId,
    /// Normalized option values
    pub values: OptionValues,
}

impl OptionKey {
    /// Create a product-scoped option key
    pub fn new(product_id: ProductId, values: OptionValues) -> Self {
        Self { product_id, values }
    }
}

impl fmt::Display for OptionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.product_id, self.values)
    }
}

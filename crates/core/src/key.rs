//! Identity keys
//!
//! Every attribute that can be used to look up a canonical record. Keys
//! label index entries and the duplicate-key and conflict reports, so
//! their `Display` form is what an operator sees.

use crate::options::OptionKey;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A key under which a record is indexed
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum IndexKey {
    /// Store-assigned numeric ID
    Id(u64),
    /// Product title
    Title(String),
    /// Product handle
    Handle(String),
    /// Variant SKU
    Sku(String),
    /// Variant barcode
    Barcode(String),
    /// Product-scoped option tuple
    Options(OptionKey),
}

impl IndexKey {
    /// Short name of the key type
    pub fn name(&self) -> &'static str {
        match self {
            IndexKey::Id(_) => "id",
            IndexKey::Title(_) => "title",
            IndexKey::Handle(_) => "handle",
            IndexKey::Sku(_) => "sku",
            IndexKey::Barcode(_) => "barcode",
            IndexKey::Options(_) => "options",
        }
    }
}

impl fmt::Display for IndexKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ", self.name())?;
        match self {
            IndexKey::Id(id) => write!(f, "{}", id),
            IndexKey::Title(s) | IndexKey::Handle(s) | IndexKey::Sku(s) | IndexKey::Barcode(s) => {
                write!(f, "{:?}", s)
            }
            IndexKey::Options(key) => write!(f, "{:?}", key.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::OptionValues;
    use crate::types::ProductId;

    #[test]
    fn test_display() {
        assert_eq!(IndexKey::Id(5).to_string(), "id 5");
        assert_eq!(IndexKey::Sku("W-1".into()).to_string(), "sku \"W-1\"");
        let key = IndexKey::Options(OptionKey::new(
            ProductId::new(1),
            OptionValues::new("S", "", ""),
        ));
        assert_eq!(key.to_string(), "options \"1/S//\"");
        assert_eq!(key.name(), "options");
    }

    #[test]
    fn test_serialized_form_is_tagged() {
        let json = serde_json::to_value(IndexKey::Barcode("0123".into())).unwrap();
        assert_eq!(json, serde_json::json!({"type": "barcode", "value": "0123"}));
    }
}

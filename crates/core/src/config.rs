//! Configuration via `merchant.toml`
//!
//! The file lives in the user configuration directory
//! (`<config dir>/merchant/merchant.toml`) unless a path is given
//! explicitly. `merchant config init` writes the commented default below;
//! every field is optional and falls back to its default.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application name, used for directory and file names
pub const APP_NAME: &str = "merchant";

/// Config file name placed in the configuration directory.
pub const CONFIG_FILE_NAME: &str = "merchant.toml";

/// Store connection settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Store name as shown in `<name>.myshopify.com`
    #[serde(default)]
    pub name: String,
    /// Admin API version, e.g. "2024-01"
    #[serde(default = "default_api_version")]
    pub api_version: String,
}

fn default_api_version() -> String {
    "2024-01".to_string()
}

/// Definition of a metafield column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetafieldDefinition {
    /// Namespace of the metafield
    pub namespace: String,
    /// Key within the namespace
    pub key: String,
    /// Store type name, e.g. "single_line_text_field"
    #[serde(rename = "type")]
    pub value_type: String,
}

/// Product and variant metafield definitions
///
/// Metafield definitions are not exposed by the store's REST API, so the
/// operator declares the ones that should become CSV columns.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetafieldDefinitions {
    /// Product metafields
    #[serde(default)]
    pub product: Vec<MetafieldDefinition>,
    /// Variant metafields
    #[serde(default)]
    pub variant: Vec<MetafieldDefinition>,
}

impl MetafieldDefinitions {
    /// Find a definition by namespace and key
    pub fn find<'a>(
        defs: &'a [MetafieldDefinition],
        namespace: &str,
        key: &str,
    ) -> Option<&'a MetafieldDefinition> {
        defs.iter()
            .find(|def| def.namespace == namespace && def.key == key)
    }
}

/// Configuration loaded from `merchant.toml`.
///
/// # Example
///
/// ```toml
/// text_editor = ["vi"]
///
/// [store]
/// name = "my-store"
///
/// [[metafield_definitions.product]]
/// namespace = "custom"
/// key = "material"
/// type = "single_line_text_field"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MerchantConfig {
    /// Command that opens the text editor, program first
    #[serde(default = "default_text_editor")]
    pub text_editor: Vec<String>,
    /// Command that opens the spreadsheet editor, program first
    #[serde(default = "default_spreadsheet_editor")]
    pub spreadsheet_editor: Vec<String>,
    /// Override for the cache directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_dir: Option<PathBuf>,
    /// Store connection settings
    #[serde(default)]
    pub store: StoreConfig,
    /// Metafield columns
    #[serde(default)]
    pub metafield_definitions: MetafieldDefinitions,
}

/// Default text editor command for this platform
pub fn default_text_editor() -> Vec<String> {
    if cfg!(target_os = "windows") {
        vec!["notepad".to_string()]
    } else {
        vec!["vi".to_string()]
    }
}

/// Default spreadsheet editor command for this platform
pub fn default_spreadsheet_editor() -> Vec<String> {
    if cfg!(target_os = "macos") {
        vec!["open".to_string(), "-a".to_string(), "Numbers".to_string()]
    } else if cfg!(target_os = "windows") {
        vec!["cmd".to_string(), "/C".to_string(), "start".to_string()]
    } else {
        vec!["libreoffice".to_string(), "--calc".to_string()]
    }
}

impl Default for MerchantConfig {
    fn default() -> Self {
        Self {
            text_editor: default_text_editor(),
            spreadsheet_editor: default_spreadsheet_editor(),
            cache_dir: None,
            store: StoreConfig {
                name: String::new(),
                api_version: default_api_version(),
            },
            metafield_definitions: MetafieldDefinitions::default(),
        }
    }
}

impl MerchantConfig {
    /// Returns the default config file content with comments.
    pub fn default_toml() -> &'static str {
        r#"# merchant configuration
#
# Command used to open files in a text editor (program first).
# text_editor = ["vi"]

# Command used to open CSV files in a spreadsheet editor (program first).
# spreadsheet_editor = ["libreoffice", "--calc"]

# Cache directory (default: the user cache directory).
# cache_dir = "/path/to/cache"

[store]
# Store name as shown in <name>.myshopify.com
name = ""
api_version = "2024-01"

# Metafields exposed as CSV columns. Repeat the table per metafield.
# [[metafield_definitions.product]]
# namespace = "custom"
# key = "material"
# type = "single_line_text_field"
#
# [[metafield_definitions.variant]]
# namespace = "custom"
# key = "color_swatch"
# type = "color"
"#
    }

    /// Default location of the config file
    pub fn default_path() -> Result<PathBuf> {
        let root = dirs::config_dir()
            .ok_or_else(|| Error::Config("no user configuration directory".to_string()))?;
        Ok(root.join(APP_NAME).join(CONFIG_FILE_NAME))
    }

    /// Read and parse config from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        let mut config: MerchantConfig = toml::from_str(&content).map_err(|e| {
            Error::Config(format!(
                "Failed to parse config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        if config.text_editor.is_empty() {
            config.text_editor = default_text_editor();
        }
        if config.spreadsheet_editor.is_empty() {
            config.spreadsheet_editor = default_spreadsheet_editor();
        }
        Ok(config)
    }

    /// Load from `path`, or from the default location if `None`.
    ///
    /// A missing file at the default location yields the default config.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                let path = Self::default_path()?;
                if path.exists() {
                    Self::from_file(&path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Write the default config file if it does not already exist.
    ///
    /// Returns `true` if the file was created.
    pub fn write_default_if_missing(path: &Path) -> Result<bool> {
        if path.exists() {
            return Ok(false);
        }
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, Self::default_toml()).map_err(|e| {
            Error::Config(format!(
                "Failed to write default config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        Ok(true)
    }

    /// Serialize this config to TOML and write it to the given path.
    pub fn write_to_file(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|e| {
            Error::Config(format!(
                "Failed to write config file '{}': {}",
                path.display(),
                e
            ))
        })
    }

    /// Effective cache directory
    pub fn cache_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.cache_dir {
            return Ok(dir.clone());
        }
        let root = dirs::cache_dir()
            .ok_or_else(|| Error::Config("no user cache directory".to_string()))?;
        Ok(root.join(APP_NAME))
    }
}

//! Cache directory

use chrono::{DateTime, Utc};
use merchant_core::{Error, MerchantConfig, Product, ProductId, Result};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Entry name of the full snapshot
pub const INVENTORY: &str = "inventory";

const EXTENSION: &str = "json";

/// One file in the cache
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    /// File name without the extension
    pub name: String,
    /// File size in bytes
    pub size: u64,
    /// Last modification time
    pub modified: DateTime<Utc>,
}

/// A cache directory
#[derive(Debug, Clone)]
pub struct Cache {
    dir: PathBuf,
}

impl Cache {
    /// Open the cache at `dir`, creating the directory if needed
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// Open the cache directory named by `config`
    pub fn from_config(config: &MerchantConfig) -> Result<Self> {
        Self::open(config.cache_dir()?)
    }

    /// Cache directory path
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the entry called `name`
    ///
    /// Names are plain file stems; anything that would escape the cache
    /// directory is rejected.
    pub fn path(&self, name: &str) -> Result<PathBuf> {
        if name.is_empty() || name.starts_with('.') || name.contains(|c: char| c == '/' || c == '\\') {
            return Err(Error::Cache(format!("invalid entry name {:?}", name)));
        }
        Ok(self.dir.join(format!("{}.{}", name, EXTENSION)))
    }

    /// Store the full snapshot
    pub fn write_inventory(&self, products: &[Product]) -> Result<()> {
        self.write(INVENTORY, products)?;
        debug!(target: "merchant::cache", products = products.len(), "Cached inventory");
        Ok(())
    }

    /// Load the full snapshot
    pub fn read_inventory(&self) -> Result<Vec<Product>> {
        self.read(INVENTORY)
    }

    /// Store one product under its ID
    pub fn write_product(&self, product: &Product) -> Result<()> {
        if product.id.is_new() {
            return Err(Error::Cache(format!(
                "product {:?} has no ID to cache it under",
                product.title
            )));
        }
        self.write(&product.id.to_string(), product)
    }

    /// Load the product cached under `id`
    pub fn read_product(&self, id: ProductId) -> Result<Product> {
        self.read(&id.to_string())
    }

    /// Cache files sorted by name
    ///
    /// Files that are not JSON entries are skipped with a warning.
    pub fn entries(&self) -> Result<Vec<CacheEntry>> {
        let mut entries = Vec::new();

        for entry in std::fs::read_dir(&self.dir)? {
            let entry = entry?;
            let path = entry.path();
            let metadata = entry.metadata()?;

            let name = match path.file_stem().and_then(|s| s.to_str()) {
                Some(name)
                    if metadata.is_file()
                        && path.extension().and_then(|e| e.to_str()) == Some(EXTENSION) =>
                {
                    name.to_string()
                }
                _ => {
                    warn!(target: "merchant::cache", path = %path.display(), "Skipping unexpected cache file");
                    continue;
                }
            };

            entries.push(CacheEntry {
                name,
                size: metadata.len(),
                modified: DateTime::<Utc>::from(metadata.modified()?),
            });
        }

        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    /// Delete the entry called `name`
    pub fn remove(&self, name: &str) -> Result<()> {
        let path = self.path(name)?;
        std::fs::remove_file(&path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => Error::Cache(format!("no entry named {:?}", name)),
            _ => Error::Io(e),
        })?;
        debug!(target: "merchant::cache", name, "Removed cache entry");
        Ok(())
    }

    /// Delete every entry, returning how many were removed
    pub fn clear(&self) -> Result<usize> {
        let entries = self.entries()?;
        for entry in &entries {
            std::fs::remove_file(self.path(&entry.name)?)?;
        }
        debug!(target: "merchant::cache", removed = entries.len(), "Cleared cache");
        Ok(entries.len())
    }

    /// Total size of all entries in bytes
    pub fn size(&self) -> Result<u64> {
        Ok(self.entries()?.iter().map(|e| e.size).sum())
    }

    /// Raw JSON of the entry called `name`
    pub fn read_value(&self, name: &str) -> Result<Value> {
        self.read(name)
    }

    fn write<T: serde::Serialize + ?Sized>(&self, name: &str, value: &T) -> Result<()> {
        let path = self.path(name)?;
        let tmp = path.with_extension("json.tmp");
        let content = serde_json::to_string_pretty(value)?;
        std::fs::write(&tmp, content)?;
        std::fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn read<T: serde::de::DeserializeOwned>(&self, name: &str) -> Result<T> {
        let path = self.path(name)?;
        let content = std::fs::read_to_string(&path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => Error::Cache(format!("no entry named {:?}", name)),
            _ => Error::Io(e),
        })?;
        serde_json::from_str(&content).map_err(|e| {
            Error::Serialization(format!("Failed to parse '{}': {}", path.display(), e))
        })
    }
}

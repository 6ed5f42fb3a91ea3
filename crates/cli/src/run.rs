//! CliAction execution.

use std::path::Path;

use anyhow::Context;
use merchant_cache::{Cache, INVENTORY};
use merchant_core::{MerchantConfig, Product, ProductId};
use merchant_engine::{push, reconcile, MemoryCatalog};
use merchant_index::CatalogIndex;
use tracing::info;

use crate::editor;
use crate::format::Output;
use crate::parse::{CacheOp, CliAction, ConfigOp};

/// Execute one action.
///
/// `config_path` overrides the default config file location.
pub fn execute(action: CliAction, config_path: Option<&Path>) -> anyhow::Result<Output> {
    match action {
        CliAction::Plan {
            catalog,
            edits,
            out,
        } => {
            let config = load_config(config_path)?;
            let snapshot = load_catalog(&catalog)?.into_products();
            let incoming = read_sheet(&edits, &config)?;
            let ops = reconcile(&snapshot, &incoming).context("Failed to reconcile sheet")?;
            if let Some(out) = out {
                let file = std::fs::File::create(&out)
                    .with_context(|| format!("Failed to create '{}'", out.display()))?;
                ops.write_json(file)?;
                info!(target: "merchant::cli", path = %out.display(), "Wrote operations");
            }
            Ok(Output::Plan(ops))
        }
        CliAction::Push { catalog, edits } => {
            let config = load_config(config_path)?;
            let mut service = load_catalog(&catalog)?;
            let incoming = read_sheet(&edits, &config)?;
            let (ops, report) = push(&mut service, &incoming).context("Failed to reconcile sheet")?;
            service
                .save(&catalog)
                .with_context(|| format!("Failed to save catalog '{}'", catalog.display()))?;
            Ok(Output::Pushed { ops, report })
        }
        CliAction::Verify { catalog } => {
            let products = load_catalog(&catalog)?.into_products();
            let (_, duplicates) = CatalogIndex::build_lenient(&products);
            Ok(Output::Verified(duplicates))
        }
        CliAction::Checkout { catalog, out, open } => {
            let config = load_config(config_path)?;
            let products = load_catalog(&catalog)?.into_products();
            merchant_csv::write_file(&out, &products, &config)
                .with_context(|| format!("Failed to write '{}'", out.display()))?;
            refresh_cache(&config, &products).context("Failed to refresh cache")?;
            if open {
                editor::open(&config.spreadsheet_editor, &out)?;
            }
            Ok(Output::Message(format!(
                "Wrote {} product(s) to {}",
                products.len(),
                out.display()
            )))
        }
        CliAction::Count { catalog } => {
            let catalog = load_catalog(&catalog)?;
            let products = catalog.products();
            Ok(Output::Counts {
                products: products.len(),
                variants: products.iter().map(|p| p.variants.len()).sum(),
            })
        }
        CliAction::Cache(op) => {
            let config = load_config(config_path)?;
            let cache = Cache::from_config(&config).context("Failed to open cache")?;
            execute_cache(op, &cache, &config)
        }
        CliAction::Config(op) => execute_config(op, config_path),
        CliAction::Version => Ok(Output::Message(format!(
            "merchant {}",
            env!("CARGO_PKG_VERSION")
        ))),
    }
}

fn execute_cache(op: CacheOp, cache: &Cache, config: &MerchantConfig) -> anyhow::Result<Output> {
    match op {
        CacheOp::List => Ok(Output::Entries(cache.entries()?)),
        CacheOp::Remove { name } => {
            cache.remove(&name)?;
            Ok(Output::Message(format!("Removed {}", name)))
        }
        CacheOp::Open { name } => {
            let path = cache.path(&name)?;
            check_entry(cache, &name)
                .with_context(|| format!("Cache entry {:?} is unreadable", name))?;
            editor::open(&config.text_editor, &path)?;
            Ok(Output::Message(String::new()))
        }
        CacheOp::Clear => {
            let removed = cache.clear()?;
            Ok(Output::Message(format!("Removed {} entr{}", removed, if removed == 1 { "y" } else { "ies" })))
        }
        CacheOp::Size => Ok(Output::Size(cache.size()?)),
    }
}

/// Store the snapshot and every product that has an ID
fn refresh_cache(config: &MerchantConfig, products: &[Product]) -> merchant_core::Result<()> {
    let cache = Cache::from_config(config)?;
    cache.write_inventory(products)?;
    for product in products.iter().filter(|p| !p.id.is_new()) {
        cache.write_product(product)?;
    }
    Ok(())
}

/// Parse an entry as what its name says it holds
fn check_entry(cache: &Cache, name: &str) -> merchant_core::Result<()> {
    if name == INVENTORY {
        cache.read_inventory()?;
    } else if let Ok(id) = name.parse::<u64>() {
        cache.read_product(ProductId::new(id))?;
    } else {
        cache.read_value(name)?;
    }
    Ok(())
}

fn execute_config(op: ConfigOp, config_path: Option<&Path>) -> anyhow::Result<Output> {
    let path = match config_path {
        Some(path) => path.to_path_buf(),
        None => MerchantConfig::default_path()?,
    };
    match op {
        ConfigOp::Init => {
            let created = MerchantConfig::write_default_if_missing(&path)?;
            let msg = if created {
                format!("Created {}", path.display())
            } else {
                format!("{} already exists", path.display())
            };
            Ok(Output::Message(msg))
        }
        ConfigOp::Show => Ok(Output::Config(load_config(config_path)?)),
        ConfigOp::Open => {
            MerchantConfig::write_default_if_missing(&path)?;
            let config = MerchantConfig::from_file(&path)?;
            editor::open(&config.text_editor, &path)?;
            Ok(Output::Message(String::new()))
        }
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<MerchantConfig> {
    MerchantConfig::load(path).context("Failed to load configuration")
}

fn load_catalog(path: &Path) -> anyhow::Result<MemoryCatalog> {
    MemoryCatalog::load(path)
        .with_context(|| format!("Failed to load catalog '{}'", path.display()))
}

fn read_sheet(path: &Path, config: &MerchantConfig) -> anyhow::Result<Vec<Product>> {
    merchant_csv::read_file(path, config)
        .with_context(|| format!("Failed to read sheet '{}'", path.display()))
}

//! ArgMatches → CliAction conversion.

use std::path::PathBuf;

use clap::ArgMatches;

/// The result of parsing the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliAction {
    /// Reconcile a sheet against the catalog without applying
    Plan {
        catalog: PathBuf,
        edits: PathBuf,
        out: Option<PathBuf>,
    },
    /// Reconcile a sheet and apply it to the catalog
    Push { catalog: PathBuf, edits: PathBuf },
    /// Report duplicate keys in the catalog
    Verify { catalog: PathBuf },
    /// Export the catalog as a sheet
    Checkout {
        catalog: PathBuf,
        out: PathBuf,
        open: bool,
    },
    /// Count products and variants
    Count { catalog: PathBuf },
    /// Cache management
    Cache(CacheOp),
    /// Config file management
    Config(ConfigOp),
    /// Print name and version
    Version,
}

/// `cache` subcommands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheOp {
    List,
    Remove { name: String },
    Open { name: String },
    Clear,
    Size,
}

/// `config` subcommands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigOp {
    Init,
    Show,
    Open,
}

/// Convert top-level matches into an action.
pub fn matches_to_action(matches: &ArgMatches) -> Result<CliAction, String> {
    let (name, sub) = matches
        .subcommand()
        .ok_or_else(|| "No command given".to_string())?;

    match name {
        "plan" => Ok(CliAction::Plan {
            catalog: path(sub, "catalog")?,
            edits: path(sub, "edits")?,
            out: sub.get_one::<String>("out").map(PathBuf::from),
        }),
        "push" => Ok(CliAction::Push {
            catalog: path(sub, "catalog")?,
            edits: path(sub, "edits")?,
        }),
        "verify" => Ok(CliAction::Verify {
            catalog: path(sub, "catalog")?,
        }),
        "checkout" => Ok(CliAction::Checkout {
            catalog: path(sub, "catalog")?,
            out: path(sub, "out")?,
            open: sub.get_flag("open"),
        }),
        "count" => Ok(CliAction::Count {
            catalog: path(sub, "catalog")?,
        }),
        "cache" => parse_cache(sub).map(CliAction::Cache),
        "config" => parse_config(sub).map(CliAction::Config),
        "version" => Ok(CliAction::Version),
        other => Err(format!("Unknown command: {}", other)),
    }
}

fn parse_cache(matches: &ArgMatches) -> Result<CacheOp, String> {
    match matches.subcommand() {
        Some(("ls", _)) => Ok(CacheOp::List),
        Some(("rm", sub)) => Ok(CacheOp::Remove {
            name: string(sub, "name")?,
        }),
        Some(("open", sub)) => Ok(CacheOp::Open {
            name: string(sub, "name")?,
        }),
        Some(("clear", _)) => Ok(CacheOp::Clear),
        Some(("size", _)) => Ok(CacheOp::Size),
        Some((other, _)) => Err(format!("Unknown cache subcommand: {}", other)),
        None => Err("Missing cache subcommand".to_string()),
    }
}

fn parse_config(matches: &ArgMatches) -> Result<ConfigOp, String> {
    match matches.subcommand() {
        Some(("init", _)) => Ok(ConfigOp::Init),
        Some(("show", _)) => Ok(ConfigOp::Show),
        Some(("open", _)) => Ok(ConfigOp::Open),
        Some((other, _)) => Err(format!("Unknown config subcommand: {}", other)),
        None => Err("Missing config subcommand".to_string()),
    }
}

fn string(matches: &ArgMatches, name: &str) -> Result<String, String> {
    matches
        .get_one::<String>(name)
        .cloned()
        .ok_or_else(|| format!("Missing argument: {}", name))
}

fn path(matches: &ArgMatches, name: &str) -> Result<PathBuf, String> {
    string(matches, name).map(PathBuf::from)
}

//! Clap command tree definition.

use clap::{Arg, ArgAction, Command};

/// Build the complete CLI command tree.
pub fn build_cli() -> Command {
    Command::new("merchant")
        .about("Bulk-edit a store catalog through CSV")
        .version(clap::crate_version!())
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .help("Config file (default: <config dir>/merchant/merchant.toml)")
                .global(true),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .help("JSON output mode")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Log more (-v info, -vv debug)")
                .action(ArgAction::Count)
                .global(true),
        )
        .subcommand(build_plan())
        .subcommand(build_push())
        .subcommand(build_verify())
        .subcommand(build_checkout())
        .subcommand(build_count())
        .subcommand(build_cache())
        .subcommand(build_config())
        .subcommand(Command::new("version").about("Print name and version"))
}

fn catalog_arg() -> Arg {
    Arg::new("catalog")
        .long("catalog")
        .short('c')
        .required(true)
        .help("Catalog snapshot file (JSON)")
}

fn edits_arg() -> Arg {
    Arg::new("edits")
        .required(true)
        .help("Edited CSV sheet")
}

fn build_plan() -> Command {
    Command::new("plan")
        .about("Show the operations a push would perform, without applying them")
        .arg(catalog_arg())
        .arg(edits_arg())
        .arg(
            Arg::new("out")
                .long("out")
                .short('o')
                .help("Also write the operations as JSON to this file"),
        )
}

fn build_push() -> Command {
    Command::new("push")
        .about("Apply an edited sheet to the catalog")
        .arg(catalog_arg())
        .arg(edits_arg())
}

fn build_verify() -> Command {
    Command::new("verify")
        .about("Check the catalog for keys shared by more than one record")
        .arg(catalog_arg())
}

fn build_checkout() -> Command {
    Command::new("checkout")
        .about("Export the catalog as a CSV sheet for editing")
        .arg(catalog_arg())
        .arg(
            Arg::new("out")
                .long("out")
                .short('o')
                .default_value("products.csv")
                .help("Sheet to write"),
        )
        .arg(
            Arg::new("open")
                .long("open")
                .help("Open the sheet in the spreadsheet editor")
                .action(ArgAction::SetTrue),
        )
}

fn build_count() -> Command {
    Command::new("count")
        .about("Count products and variants in the catalog")
        .arg(catalog_arg())
}

fn build_cache() -> Command {
    Command::new("cache")
        .about("Inspect and manage the local cache")
        .subcommand_required(true)
        .subcommand(Command::new("ls").about("List cache entries"))
        .subcommand(
            Command::new("rm")
                .about("Remove a cache entry")
                .arg(Arg::new("name").required(true).help("Entry name")),
        )
        .subcommand(
            Command::new("open")
                .about("Open a cache entry in the text editor")
                .arg(Arg::new("name").required(true).help("Entry name")),
        )
        .subcommand(Command::new("clear").about("Remove every cache entry"))
        .subcommand(Command::new("size").about("Total size of the cache"))
}

fn build_config() -> Command {
    Command::new("config")
        .about("Manage the configuration file")
        .subcommand_required(true)
        .subcommand(Command::new("init").about("Write the default config file if missing"))
        .subcommand(Command::new("show").about("Print the effective configuration"))
        .subcommand(Command::new("open").about("Open the config file in the text editor"))
}

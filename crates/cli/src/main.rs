//! merchant: bulk-edit a store catalog through CSV.
//!
//! `checkout` exports the catalog as a sheet, `plan` shows what an edited
//! sheet would change, and `push` applies it. Logs go to stderr; results
//! go to stdout, as text or as JSON with `--json`.

mod commands;
mod editor;
mod format;
mod parse;
mod run;

use std::path::PathBuf;
use std::process;

use tracing_subscriber::EnvFilter;

use commands::build_cli;
use format::{format_error, format_output, OutputMode};
use parse::matches_to_action;

fn main() {
    let matches = build_cli().get_matches();

    let output_mode = if matches.get_flag("json") {
        OutputMode::Json
    } else {
        OutputMode::Human
    };
    init_logging(matches.get_count("verbose"));

    let action = match matches_to_action(&matches) {
        Ok(action) => action,
        Err(e) => {
            eprintln!("{}", format_error(&anyhow::anyhow!(e), output_mode));
            process::exit(1);
        }
    };
    let config_path = matches.get_one::<String>("config").map(PathBuf::from);

    match run::execute(action, config_path.as_deref()) {
        Ok(output) => {
            let formatted = format_output(&output, output_mode);
            if !formatted.is_empty() {
                println!("{}", formatted);
            }
            if output.is_failure() {
                process::exit(1);
            }
        }
        Err(e) => {
            eprintln!("{}", format_error(&e, output_mode));
            process::exit(1);
        }
    }
}

/// Install the stderr subscriber. `RUST_LOG` wins over `-v`.
fn init_logging(verbosity: u8) {
    let default = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .ok();
}

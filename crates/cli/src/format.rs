//! Output → human/json string formatting.
//!
//! Two modes:
//! - **Human** (default): summaries and tables, errors as `(error) ...`
//! - **JSON** (`--json`): `serde_json::to_string_pretty`

use merchant_cache::CacheEntry;
use merchant_core::{DuplicateKeys, MerchantConfig};
use merchant_engine::{ApplyReport, OperationSet};
use serde_json::json;

/// Output formatting mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Human,
    Json,
}

/// Result of a command, before formatting.
#[derive(Debug)]
pub enum Output {
    /// Operations a push would perform
    Plan(OperationSet),
    /// Operations performed and their outcome
    Pushed {
        ops: OperationSet,
        report: ApplyReport,
    },
    /// Duplicate keys found in a catalog
    Verified(DuplicateKeys),
    /// Record counts
    Counts { products: usize, variants: usize },
    /// Cache listing
    Entries(Vec<CacheEntry>),
    /// Size in bytes
    Size(u64),
    /// Effective configuration
    Config(MerchantConfig),
    /// Plain message
    Message(String),
}

impl Output {
    /// True if the command ran but found problems
    pub fn is_failure(&self) -> bool {
        match self {
            Output::Pushed { report, .. } => !report.is_ok(),
            Output::Verified(dups) => !dups.is_empty(),
            _ => false,
        }
    }
}

/// Format a command result.
pub fn format_output(output: &Output, mode: OutputMode) -> String {
    match mode {
        OutputMode::Json => format_json(output),
        OutputMode::Human => format_human(output),
    }
}

/// Format an error.
pub fn format_error(err: &anyhow::Error, mode: OutputMode) -> String {
    match mode {
        OutputMode::Json => pretty(&json!({ "error": format!("{:#}", err) })),
        OutputMode::Human => format!("(error) {:#}", err),
    }
}

fn format_human(output: &Output) -> String {
    match output {
        Output::Plan(ops) => ops.summary().to_string().trim_end().to_string(),
        Output::Pushed { ops, report } => {
            let mut out = ops.summary().to_string().trim_end().to_string();
            out.push_str(&format!(
                "\nApplied {} of {} operation(s)",
                report.succeeded(),
                ops.len()
            ));
            for failure in &report.failures {
                out.push_str(&format!("\n  ! {}", failure));
            }
            out
        }
        Output::Verified(dups) => {
            if dups.is_empty() {
                "Everything looks good!".to_string()
            } else {
                dups.iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join("\n")
            }
        }
        Output::Counts { products, variants } => {
            format!("products: {}\nvariants: {}", products, variants)
        }
        Output::Entries(entries) => format_entries(entries),
        Output::Size(bytes) => format_bytes(*bytes),
        Output::Config(config) => toml::to_string_pretty(config)
            .unwrap_or_else(|e| format!("(error) {}", e)),
        Output::Message(msg) => msg.clone(),
    }
}

fn format_json(output: &Output) -> String {
    match output {
        Output::Plan(ops) => ops.to_json().unwrap_or_else(|e| format!("(error) {}", e)),
        Output::Pushed { ops, report } => pretty(&json!({
            "operations": ops,
            "report": report,
        })),
        Output::Verified(dups) => pretty(&json!({
            "duplicates": dups.iter().map(ToString::to_string).collect::<Vec<_>>(),
        })),
        Output::Counts { products, variants } => pretty(&json!({
            "products": products,
            "variants": variants,
        })),
        Output::Entries(entries) => pretty(&json!(entries
            .iter()
            .map(|e| json!({
                "name": e.name,
                "size": e.size,
                "modified": e.modified.to_rfc3339(),
            }))
            .collect::<Vec<_>>())),
        Output::Size(bytes) => pretty(&json!({ "bytes": bytes })),
        Output::Config(config) => pretty(&json!(config)),
        Output::Message(msg) => pretty(&json!({ "message": msg })),
    }
}

fn pretty(value: &serde_json::Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

fn format_entries(entries: &[CacheEntry]) -> String {
    if entries.is_empty() {
        return "(empty)".to_string();
    }
    let width = entries
        .iter()
        .map(|e| e.name.len())
        .max()
        .unwrap_or(0)
        .max("NAME".len());
    let mut lines = vec![format!("{:<width$}   {:>10}   MODIFIED", "NAME", "SIZE")];
    for entry in entries {
        lines.push(format!(
            "{:<width$}   {:>10}   {}",
            entry.name,
            format_bytes(entry.size),
            entry.modified.format("%Y-%m-%d %H:%M:%S")
        ));
    }
    lines.join("\n")
}

fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KiB", "MiB", "GiB"];
    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{} B", bytes)
    } else {
        format!("{:.1} {}", size, UNITS[unit])
    }
}

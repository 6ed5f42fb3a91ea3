//! External editor launching.

use std::path::Path;
use std::process::Command;

use anyhow::{anyhow, bail, Context};

/// Open `file` with `command`, program first, and wait for it to exit.
pub fn open(command: &[String], file: &Path) -> anyhow::Result<()> {
    let (program, args) = command
        .split_first()
        .ok_or_else(|| anyhow!("No editor command configured"))?;

    tracing::debug!(target: "merchant::cli", program = %program, file = %file.display(), "Opening editor");
    let status = Command::new(program)
        .args(args)
        .arg(file)
        .status()
        .with_context(|| format!("Cannot open {}", program))?;
    if !status.success() {
        bail!("{} exited with {}", program, status);
    }
    Ok(())
}

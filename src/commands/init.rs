//! `azbackup init` — scaffold a starter `azbackup.toml`.
//!
//! The generated file contains every section with placeholder values so the
//! operator only has to fill in account names and keys.  Refuses to touch an
//! existing file.

use std::path::Path;

use anyhow::{Context, Result, bail};
use console::style;

/// Starter configuration written by `azbackup init`.
///
/// Placeholder keys are syntactically valid base64 so `--dry-run` works on
/// the untouched file.
const TEMPLATE: &str = r#"# azbackup configuration
#
# Copies Azure tables and blob containers into a destination blob container
# using the azcopy command-line tool.  Fill in the account names and keys,
# list the resources to back up, and run `azbackup`.

[source]
account = "sourceaccount"           # storage account holding the data
key     = "c291cmNlLWtleQ=="        # account or SAS key

[destination]
account   = "backupaccount"         # storage account receiving the backup
key       = "ZGVzdC1rZXk="          # account or SAS key
container = "backups"               # created on first run if missing
subfolder = "nightly"               # optional path prefix; remove to disable

[backup]
tables     = []                     # e.g. ["customers", "orders"]
containers = []                     # e.g. ["images"]

[azcopy]
path      = "azcopy"                # bare name resolves via PATH
settle_ms = 1000                    # pause between runs (temp-file release)
"#;

/// Write the starter config to `path`.
///
/// Fails without touching anything when the file already exists.
pub fn run(path: &Path) -> Result<()> {
    if path.exists() {
        bail!(
            "{} already exists; refusing to overwrite it",
            path.display()
        );
    }

    std::fs::write(path, TEMPLATE).with_context(|| format!("writing {}", path.display()))?;

    println!(
        "  {}  wrote {}",
        style("✓").green().bold(),
        style(path.display()).bold()
    );
    println!("     Fill in your account names and keys, then run `azbackup`.");
    Ok(())
}

// ─── Tests ────────────────────────────────────────────────────────────────────

//! Configuration types and loading logic.
//!
//! `Config` is a direct 1-to-1 mapping of `azbackup.toml`.  Every section
//! has a `Default` impl so a partial file is fine — though a config without
//! real account names and keys will fail validation as soon as the pipeline
//! starts.
//!
//! # File format
//!
//! ```toml
//! [source]
//! account = "myappstorage"        # storage account holding the data
//! key     = "…base64 key…"
//!
//! [destination]
//! account   = "myappbackups"      # storage account receiving the backup
//! key       = "…base64 key…"
//! container = "backups"
//! subfolder = "nightly"           # optional path prefix in the container
//!
//! [backup]
//! tables     = ["customers", "orders"]
//! containers = ["images"]
//!
//! [azcopy]
//! path      = "azcopy"            # executable; bare name resolves via PATH
//! settle_ms = 1000                # pause after each run (temp-file release)
//! ```

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use azbackup::Destination;

// ─── Top-level ────────────────────────────────────────────────────────────────

/// Root configuration object, deserialised from `azbackup.toml`.
///
/// All four sections are optional; missing sections fall back to their
/// `Default` implementations.
#[derive(Debug, Deserialize, Serialize, Default)]
pub struct Config {
    /// Account that holds the tables and blobs being backed up.
    #[serde(default)]
    pub source: SourceConfig,

    /// Account and container receiving the backup.
    #[serde(default)]
    pub destination: DestinationConfig,

    /// Which tables and containers to back up.
    #[serde(default)]
    pub backup: ResourceConfig,

    /// Where azcopy lives and how long to settle between runs.
    #[serde(default)]
    pub azcopy: AzCopyConfig,
}

impl Config {
    /// The destination as the library wants it.  An empty `subfolder`
    /// string in the file counts as unset.
    pub fn destination(&self) -> Destination {
        Destination {
            account: self.destination.account.clone(),
            key: self.destination.key.clone(),
            container: self.destination.container.clone(),
            subfolder: self
                .destination
                .subfolder
                .clone()
                .filter(|folder| !folder.trim().is_empty()),
        }
    }

    /// `[azcopy].settle_ms` as a `Duration`.
    pub fn settle(&self) -> Duration {
        Duration::from_millis(self.azcopy.settle_ms)
    }
}

// ─── [source] ─────────────────────────────────────────────────────────────────

/// The storage account being backed up.
#[derive(Debug, Deserialize, Serialize, Default)]
pub struct SourceConfig {
    /// Storage account name, e.g. `myappstorage`.
    #[serde(default)]
    pub account: String,

    /// Account (or SAS) key.
    ///
    /// **Do not commit real keys in plain-text config files.**  Prefer a
    /// secrets manager and generate the file at deploy time.
    #[serde(default)]
    pub key: String,
}

// ─── [destination] ────────────────────────────────────────────────────────────

/// The storage account and container receiving the backup.
#[derive(Debug, Deserialize, Serialize)]
pub struct DestinationConfig {
    /// Destination storage account name.
    #[serde(default)]
    pub account: String,

    /// Destination account (or SAS) key.
    #[serde(default)]
    pub key: String,

    /// Blob container receiving the backup.  Created on first use if it
    /// does not exist.
    #[serde(default = "default_container")]
    pub container: String,

    /// Optional path prefix inside the container, e.g. `nightly`.
    #[serde(default)]
    pub subfolder: Option<String>,
}

impl Default for DestinationConfig {
    fn default() -> Self {
        Self {
            account: String::new(),
            key: String::new(),
            container: default_container(),
            subfolder: None,
        }
    }
}

// ─── [backup] ─────────────────────────────────────────────────────────────────

/// What to back up.  Either list may be empty; an entirely empty config
/// makes the pipeline a no-op.
#[derive(Debug, Deserialize, Serialize, Default)]
pub struct ResourceConfig {
    /// Table names to copy, in order.
    #[serde(default)]
    pub tables: Vec<String>,

    /// Blob container names to copy recursively, in order.
    #[serde(default)]
    pub containers: Vec<String>,
}

// ─── [azcopy] ─────────────────────────────────────────────────────────────────

/// Where the azcopy executable lives and how to pace invocations.
#[derive(Debug, Deserialize, Serialize)]
pub struct AzCopyConfig {
    /// Path to the azcopy executable.  A bare name resolves via `PATH`.
    #[serde(default = "default_azcopy_path")]
    pub path: String,

    /// Milliseconds to wait after each run before starting the next, so
    /// azcopy can release its temporary journal files.
    #[serde(default = "default_settle_ms")]
    pub settle_ms: u64,
}

impl Default for AzCopyConfig {
    fn default() -> Self {
        Self {
            path: default_azcopy_path(),
            settle_ms: default_settle_ms(),
        }
    }
}

// ─── Defaults ─────────────────────────────────────────────────────────────────

// These free functions are required by `#[serde(default = "…")]` — serde
// cannot call `Default::default()` for individual fields, only for whole
// structs.

pub fn default_container() -> String {
    "backups".into()
}

pub fn default_azcopy_path() -> String {
    "azcopy".into()
}

pub fn default_settle_ms() -> u64 {
    1000
}

// ─── Loader ───────────────────────────────────────────────────────────────────

/// Read and parse a `Config` from `path`.
///
/// If the file does not exist, a warning is printed to `stderr` and a
/// fully-defaulted `Config` is returned; validation will then reject the
/// blank account fields before anything external happens.
///
/// Returns an error if the file exists but cannot be read or is not valid
/// TOML.
pub fn load_config(path: &Path) -> Result<Config> {
    if !path.exists() {
        eprintln!(
            "Warning: config file '{}' not found, using defaults.\n\
             Run 'azbackup init' to generate a starter config.",
            path.display()
        );
        return Ok(Config::default());
    }

    let text =
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;

    toml::from_str(&text).with_context(|| format!("parsing {}", path.display()))
}

// ─── Tests ────────────────────────────────────────────────────────────────────

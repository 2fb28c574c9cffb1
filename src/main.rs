//! `azbackup` — an AzCopy backup wrapper driven by `azbackup.toml`.
//!
//! # Overview
//!
//! This binary is a thin orchestration layer around
//! [`azcopy`](https://learn.microsoft.com/azure/storage/common/storage-use-azcopy-v10):
//! drop an `azbackup.toml` next to a deployment, run `azbackup`, and the
//! configured tables and blob containers are copied into a destination
//! backup container.
//!
//! # Usage
//!
//! ```text
//! azbackup                 # run the full backup pipeline using azbackup.toml
//! azbackup init            # scaffold an azbackup.toml in the current directory
//! azbackup --print-config  # show parsed config without running anything
//! azbackup --dry-run       # print planned azcopy invocations (keys masked)
//! azbackup --no-tables     # back up containers only
//! azbackup --verbose       # show batch progress and azcopy output
//! ```
//!
//! # Module layout
//!
//! | Module             | Responsibility                              |
//! |--------------------|---------------------------------------------|
//! | [`cli`]            | Argument types parsed by clap               |
//! | [`config`]         | `Config` struct + TOML loader               |
//! | [`ui`]             | Spinner, stage outcomes, summary            |
//! | [`commands::init`] | `azbackup init` subcommand                  |
//! | [`commands::run`]  | Default backup pipeline                     |
//!
//! The orchestration itself (validation, container creation, azcopy
//! execution) lives in the `azbackup` library crate.

mod cli;
mod commands;
mod config;
mod ui;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Subcommand};
use config::load_config;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match &cli.command {
        // ── azbackup init ─────────────────────────────────────────────────────
        Some(Subcommand::Init) => commands::init::run(&cli.config),

        // ── azbackup (default pipeline) ───────────────────────────────────────
        None => {
            let cfg = load_config(&cli.config)?;

            if cli.print_config {
                println!("{cfg:#?}");
                return Ok(());
            }

            commands::run::run(&cli, &cfg).await
        },
    }
}

/// Install the global tracing subscriber.
///
/// An explicit `RUST_LOG` wins; otherwise `--verbose` raises the default
/// `warn` to `info` so batch progress and azcopy output reach stderr
/// without disturbing the spinner on stdout.
fn init_tracing(verbose: bool) {
    let fallback = if verbose { "info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

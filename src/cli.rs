//! Command-line interface definition.
//!
//! All argument parsing lives here so the rest of the codebase can stay
//! agnostic to `clap`.  The `Cli` struct is parsed once in `main` and then
//! passed (by reference) into the command handlers.

use std::path::PathBuf;

use clap::Parser;

/// Top-level CLI arguments, shared across every subcommand.
#[derive(Parser, Debug)]
#[command(
    name    = "azbackup",
    about   = "An AzCopy backup wrapper for Azure Storage, driven by azbackup.toml",
    version,
    // Show a compact two-column help layout.
    help_template = "\
{before-help}{name} {version}
{about}

{usage-heading} {usage}

{all-args}{after-help}"
)]
#[allow(clippy::struct_excessive_bools)]
pub struct Cli {
    /// Path to the configuration file.
    ///
    /// Defaults to `azbackup.toml` in the current working directory.  Use
    /// `--config /path/to/other.toml` to point at a config stored elsewhere
    /// (useful when running from a cron job or a different working
    /// directory).
    #[arg(short, long, default_value = "azbackup.toml")]
    pub config: PathBuf,

    /// Subcommand to run.  Omit to run the full backup pipeline.
    #[command(subcommand)]
    pub command: Option<Subcommand>,

    /// Print the parsed configuration and exit without running anything.
    ///
    /// Handy for verifying that the TOML was loaded correctly before
    /// committing to a long backup run.
    #[arg(long)]
    pub print_config: bool,

    /// Print each planned azcopy invocation (keys masked) instead of
    /// executing anything.
    ///
    /// No process is spawned and no storage request is sent; the
    /// destination container is not created either.
    #[arg(long)]
    pub dry_run: bool,

    /// Skip the table backup stage even if `[backup].tables` is set.
    #[arg(long)]
    pub no_tables: bool,

    /// Skip the blob container backup stage even if `[backup].containers`
    /// is set.
    #[arg(long)]
    pub no_containers: bool,

    /// Log batch progress and azcopy output to stderr.
    ///
    /// Equivalent to `RUST_LOG=info`; an explicit `RUST_LOG` wins over this
    /// flag.
    #[arg(short, long)]
    pub verbose: bool,
}

/// Explicit subcommands.  Running `azbackup` with no subcommand triggers the
/// default backup pipeline.
#[derive(clap::Subcommand, Debug, PartialEq)]
pub enum Subcommand {
    /// Scaffold an `azbackup.toml` in the current directory.
    ///
    /// The generated file carries every section with placeholder values and
    /// comments explaining each field.  Exits with an error if the file
    /// already exists to avoid accidental overwrites.
    Init,
}

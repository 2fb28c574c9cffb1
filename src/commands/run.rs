//! Default backup pipeline — runs when no subcommand is given.
//!
//! # Pipeline stages (in order)
//!
//! | # | Stage      | Flag to skip      | Description                          |
//! |---|------------|-------------------|--------------------------------------|
//! | 1 | Tables     | `--no-tables`     | Copy each `[backup].tables` entry    |
//! | 2 | Containers | `--no-containers` | Recursive copy of each container     |
//!
//! Each stage runs behind a spinner.  The destination container is created
//! (once) by whichever stage runs first.  A failed stage replays azcopy's
//! stderr and aborts the pipeline; a stage with an empty resource list is
//! reported as skipped.
//!
//! `--dry-run` prints the planned invocations — keys masked — and exits
//! without spawning a process or touching the storage account.

use anyhow::{Result, bail};

use azbackup::{AzureStorageBackup, Destination, runner};

use crate::{
    cli::Cli,
    config::Config,
    ui::{StageOutcome, print_summary, run_stage, skipped_stage},
};

// ─── Entry point ──────────────────────────────────────────────────────────────

/// Execute the full backup pipeline.
///
/// Stages run sequentially; the first failure prints the summary and
/// returns an error.
pub async fn run(cli: &Cli, cfg: &Config) -> Result<()> {
    let backup = AzureStorageBackup::new(
        cfg.source.account.as_str(),
        cfg.source.key.as_str(),
        cfg.azcopy.path.as_str(),
    )?
    .settle_delay(cfg.settle());
    let dest = cfg.destination();

    if cli.dry_run {
        return dry_run(cli, cfg, &backup, &dest);
    }

    println!();
    let mut outcomes: Vec<StageOutcome> = Vec::new();

    // 1. Tables
    let tables = &cfg.backup.tables;
    let stage = if cli.no_tables || tables.is_empty() {
        skipped_stage("Tables")
    } else {
        run_stage(
            &format!("Tables ({})", tables.len()),
            backup.backup_tables(tables, &dest),
        )
        .await
    };
    stage.print();
    let failed = stage.failed();
    outcomes.push(stage);
    if failed {
        print_summary(&outcomes);
        bail!("pipeline aborted: table backup failed");
    }

    // 2. Containers
    let containers = &cfg.backup.containers;
    let stage = if cli.no_containers || containers.is_empty() {
        skipped_stage("Containers")
    } else {
        run_stage(
            &format!("Containers ({})", containers.len()),
            backup.backup_containers(containers, &dest),
        )
        .await
    };
    stage.print();
    let failed = stage.failed();
    outcomes.push(stage);
    if failed {
        print_summary(&outcomes);
        bail!("pipeline aborted: container backup failed");
    }

    print_summary(&outcomes);
    Ok(())
}

// ─── Dry run ──────────────────────────────────────────────────────────────────

/// Print every planned invocation with key material masked.
fn dry_run(cli: &Cli, cfg: &Config, backup: &AzureStorageBackup, dest: &Destination) -> Result<()> {
    let mut plans: Vec<Vec<String>> = Vec::new();

    if !cli.no_tables && !cfg.backup.tables.is_empty() {
        plans.extend(backup.plan_tables(&cfg.backup.tables, dest)?);
    }
    if !cli.no_containers && !cfg.backup.containers.is_empty() {
        let stamp = runner::batch_stamp(chrono::Utc::now());
        plans.extend(backup.plan_containers(&cfg.backup.containers, dest, &stamp)?);
    }

    if plans.is_empty() {
        println!("nothing to do: no tables or containers configured");
        return Ok(());
    }

    for plan in &plans {
        println!("{} {}", cfg.azcopy.path, runner::redact(plan).join(" "));
    }
    Ok(())
}

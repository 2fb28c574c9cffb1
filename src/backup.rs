//! The backup orchestrator.
//!
//! Sequential orchestration only: validate the request, ensure the
//! destination container exists, build one azcopy invocation per source
//! resource, and run them one at a time.  A failing invocation aborts the
//! rest of its batch; invocations that already completed are not rolled
//! back, so a partial backup is possible on mid-list failure.
//!
//! # Serialization
//!
//! At most one azcopy process runs at a time across *every* batch issued
//! through one [`AzureStorageBackup`], enforced by a capacity-1 semaphore.
//! After each successful run the permit is held through a settling delay so
//! the tool can release its temporary files before the next run starts.
//!
//! # Failure classification
//!
//! An invocation fails when the exit status is unsuccessful *or* when
//! anything was written to stderr.  AzCopy 5.x has been seen exiting zero
//! after logging errors, and conversely logging nothing while exiting
//! non-zero; trusting either signal alone is not enough.

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::{Mutex, Semaphore};
use tokio::time::sleep;
use tracing::{debug, error, info};

use crate::error::{BackupError, Result};
use crate::exec::{CopyExecutor, ProcessExecutor};
use crate::runner;
use crate::storage::{BlobStore, RestBlobStore};

/// Settling delay applied after each azcopy run unless overridden.
pub const DEFAULT_SETTLE: Duration = Duration::from_secs(1);

// ─── Request types ────────────────────────────────────────────────────────────

/// Where a backup batch lands: a blob container in the destination account,
/// optionally under a sub-folder.
#[derive(Debug, Clone)]
pub struct Destination {
    /// Destination storage account name.
    pub account: String,
    /// Destination account (or SAS) key.
    pub key: String,
    /// Blob container receiving the backup.
    pub container: String,
    /// Optional path prefix inside the container.
    pub subfolder: Option<String>,
}

// ─── Orchestrator ─────────────────────────────────────────────────────────────

/// Orchestrates azcopy runs from one source storage account.
///
/// Construct with [`AzureStorageBackup::new`] for production wiring, or
/// [`AzureStorageBackup::with_components`] to supply your own executor and
/// store (the seam every behavioural test uses).
pub struct AzureStorageBackup {
    source_account: String,
    source_key: String,
    azcopy: PathBuf,
    settle: Duration,
    executor: Arc<dyn CopyExecutor>,
    store: Arc<dyn BlobStore>,
    /// Capacity 1: at most one azcopy process at a time.
    gate: Semaphore,
    /// Destination containers already ensured, keyed by (account, container).
    ensured: Mutex<HashSet<(String, String)>>,
}

impl std::fmt::Debug for AzureStorageBackup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AzureStorageBackup")
            .field("source_account", &self.source_account)
            .field("azcopy", &self.azcopy)
            .field("settle", &self.settle)
            .finish_non_exhaustive()
    }
}

impl AzureStorageBackup {
    /// Production orchestrator: real process spawner, real REST store.
    ///
    /// `azcopy` is the path to the executable; a bare `"azcopy"` resolves
    /// through `PATH`.  Fails with an invalid-argument error when the source
    /// account name or key is blank.
    pub fn new(
        source_account: impl Into<String>,
        source_key: impl Into<String>,
        azcopy: impl Into<PathBuf>,
    ) -> Result<Self> {
        Self::with_components(
            source_account,
            source_key,
            azcopy,
            Arc::new(ProcessExecutor),
            Arc::new(RestBlobStore::new()),
        )
    }

    /// Like [`AzureStorageBackup::new`] with caller-supplied executor and
    /// store implementations.
    pub fn with_components(
        source_account: impl Into<String>,
        source_key: impl Into<String>,
        azcopy: impl Into<PathBuf>,
        executor: Arc<dyn CopyExecutor>,
        store: Arc<dyn BlobStore>,
    ) -> Result<Self> {
        Ok(Self {
            source_account: non_blank(source_account.into(), "source account")?,
            source_key: non_blank(source_key.into(), "source key")?,
            azcopy: azcopy.into(),
            settle: DEFAULT_SETTLE,
            executor,
            store,
            gate: Semaphore::new(1),
            ensured: Mutex::new(HashSet::new()),
        })
    }

    /// Override the post-run settling delay.  `Duration::ZERO` disables it.
    #[must_use]
    pub fn settle_delay(mut self, settle: Duration) -> Self {
        self.settle = settle;
        self
    }

    // ── Planning ──────────────────────────────────────────────────────────────

    /// Validated token vectors for a table batch, one per table, without
    /// executing anything.
    pub fn plan_tables(&self, tables: &[String], dest: &Destination) -> Result<Vec<Vec<String>>> {
        validate_batch(tables, "source tables", dest)?;
        Ok(tables
            .iter()
            .map(|table| runner::copy_table_args(&self.source_account, &self.source_key, table, dest))
            .collect())
    }

    /// Validated token vectors for a container batch under one shared batch
    /// timestamp, without executing anything.
    pub fn plan_containers(
        &self,
        containers: &[String],
        dest: &Destination,
        stamp: &str,
    ) -> Result<Vec<Vec<String>>> {
        validate_batch(containers, "source containers", dest)?;
        Ok(containers
            .iter()
            .map(|container| {
                runner::copy_container_args(
                    &self.source_account,
                    &self.source_key,
                    container,
                    dest,
                    stamp,
                )
            })
            .collect())
    }

    // ── Operations ────────────────────────────────────────────────────────────

    /// Back up the given tables into `dest`, strictly in list order.
    ///
    /// Ensures the destination container exists first.  The first failing
    /// invocation aborts the batch with the tool's stderr text attached.
    pub async fn backup_tables(&self, tables: &[String], dest: &Destination) -> Result<()> {
        let plans = self.plan_tables(tables, dest)?;
        self.ensure_container(dest).await?;

        info!(
            source = %self.source_account,
            tables = %tables.join(", "),
            into = %format!("{}/{}", dest.account, dest.container),
            "backing up tables"
        );
        for plan in plans {
            self.run_copy(plan).await?;
        }
        info!("table backup done");
        Ok(())
    }

    /// Back up the given blob containers into `dest`, recursively, strictly
    /// in list order.
    ///
    /// One UTC timestamp is taken per batch and appended (after the source
    /// container name) to the destination path, so successive runs land
    /// next to each other instead of overwriting.
    pub async fn backup_containers(&self, containers: &[String], dest: &Destination) -> Result<()> {
        let stamp = runner::batch_stamp(Utc::now());
        let plans = self.plan_containers(containers, dest, &stamp)?;
        self.ensure_container(dest).await?;

        info!(
            source = %self.source_account,
            containers = %containers.join(", "),
            into = %format!("{}/{}", dest.account, dest.container),
            %stamp,
            "backing up containers"
        );
        for plan in plans {
            self.run_copy(plan).await?;
        }
        info!("container backup done");
        Ok(())
    }

    // ── Internals ─────────────────────────────────────────────────────────────

    /// Create the destination container once per (account, container).
    ///
    /// The lock is held across the storage call so two batches racing on the
    /// same first-time destination cannot both issue the create.  Distinct
    /// destinations each get their own call.
    async fn ensure_container(&self, dest: &Destination) -> Result<()> {
        let key = (dest.account.clone(), dest.container.clone());
        let mut ensured = self.ensured.lock().await;
        if ensured.contains(&key) {
            return Ok(());
        }
        self.store
            .ensure_container(&dest.account, &dest.key, &dest.container)
            .await?;
        ensured.insert(key);
        Ok(())
    }

    /// Run one azcopy invocation to completion.
    ///
    /// Serialized through the gate; the settling delay runs before the
    /// permit is released.
    async fn run_copy(&self, args: Vec<String>) -> Result<()> {
        let _permit = self.gate.acquire().await.expect("gate semaphore closed");

        debug!(command = %runner::redact(&args).join(" "), "running azcopy");
        let output = self.executor.run(&self.azcopy, &args).await?;

        if !output.stdout.trim().is_empty() {
            info!("azcopy: {}", output.stdout.trim());
        }
        if !output.success || !output.stderr.trim().is_empty() {
            error!(code = ?output.code, "azcopy: {}", output.stderr.trim());
            return Err(BackupError::ExternalTool {
                stderr: output.stderr,
                code: output.code,
            });
        }

        sleep(self.settle).await;
        Ok(())
    }
}

// ─── Validation ───────────────────────────────────────────────────────────────

fn non_blank(value: String, name: &'static str) -> Result<String> {
    if value.trim().is_empty() {
        Err(BackupError::InvalidArgument(name))
    } else {
        Ok(value)
    }
}

/// Preconditions shared by both operations: a non-empty resource list with
/// no blank names, and a fully-specified destination.
fn validate_batch(resources: &[String], what: &'static str, dest: &Destination) -> Result<()> {
    if resources.is_empty() || resources.iter().any(|r| r.trim().is_empty()) {
        return Err(BackupError::InvalidArgument(what));
    }
    if dest.account.trim().is_empty() {
        return Err(BackupError::InvalidArgument("destination account"));
    }
    if dest.key.trim().is_empty() {
        return Err(BackupError::InvalidArgument("destination key"));
    }
    if dest.container.trim().is_empty() {
        return Err(BackupError::InvalidArgument("destination container"));
    }
    if let Some(folder) = &dest.subfolder {
        if folder.trim().is_empty() {
            return Err(BackupError::InvalidArgument("destination sub-folder"));
        }
    }
    Ok(())
}

// ─── Tests ────────────────────────────────────────────────────────────────────
//
// Validation and planning are covered here because they are synchronous and
// need no fakes; the behavioural properties (serialization, caching, abort
// on stderr) live in tests/orchestrator.rs with recording doubles.

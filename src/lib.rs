//! Back up Azure Storage tables and blob containers through AzCopy.
//!
//! # Overview
//!
//! This crate is a thin orchestration layer around the external
//! [`azcopy`](https://learn.microsoft.com/azure/storage/common/storage-use-azcopy-v10)
//! copy utility: it validates a backup request, makes sure the destination
//! blob container exists, builds one azcopy invocation per source resource,
//! and runs them one at a time with both output streams captured.  All the
//! heavy lifting (the actual data transfer) is azcopy's job.
//!
//! # Module layout
//!
//! | Module      | Responsibility                                        |
//! |-------------|-------------------------------------------------------|
//! | [`backup`]  | Orchestrator: validation, sequencing, serialization   |
//! | [`runner`]  | AzCopy argument construction (pure)                   |
//! | [`exec`]    | Process spawning with captured output                 |
//! | [`storage`] | Destination container creation (SharedKey REST)       |
//! | [`error`]   | Error taxonomy                                        |
//!
//! # Example
//!
//! ```no_run
//! use azbackup::{AzureStorageBackup, Destination};
//!
//! # async fn demo() -> azbackup::Result<()> {
//! let backup = AzureStorageBackup::new("sourceaccount", "c2VjcmV0", "azcopy")?;
//! let dest = Destination {
//!     account: "backupaccount".into(),
//!     key: "c2VjcmV0".into(),
//!     container: "backups".into(),
//!     subfolder: Some("nightly".into()),
//! };
//! backup.backup_tables(&["customers".into(), "orders".into()], &dest).await?;
//! backup.backup_containers(&["images".into()], &dest).await?;
//! # Ok(())
//! # }
//! ```
//!
//! Failed invocations abort the remainder of their batch and surface the
//! tool's stderr text; there are no retries and no rollback of invocations
//! that already completed.

pub mod backup;
pub mod error;
pub mod exec;
pub mod runner;
pub mod storage;

pub use backup::{AzureStorageBackup, DEFAULT_SETTLE, Destination};
pub use error::{BackupError, Result};
pub use exec::{CopyExecutor, CopyOutput, ProcessExecutor};
pub use storage::{BlobStore, RestBlobStore};

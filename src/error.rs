//! Error taxonomy for backup operations.
//!
//! Three failure families matter to callers:
//!
//! - [`BackupError::InvalidArgument`] — a precondition violation, raised
//!   before any process is spawned or storage request sent.
//! - [`BackupError::ExternalTool`] / [`BackupError::Spawn`] — the copy
//!   utility failed (or never started).  `ExternalTool` carries the raw
//!   stderr text so the operator sees exactly what azcopy said.
//! - [`BackupError::Storage`] / [`BackupError::Http`] — the destination
//!   container could not be created.  These propagate unmodified; there is
//!   no retry or backoff anywhere in this crate.

use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, BackupError>;

/// Everything a backup call can fail with.
#[derive(Error, Debug)]
pub enum BackupError {
    /// A required string was blank or a resource list was empty.
    ///
    /// Detected synchronously, before any external call.  The payload
    /// names the offending argument.
    #[error("missing or empty argument: {0}")]
    InvalidArgument(&'static str),

    /// azcopy ran but reported a failure.
    ///
    /// An invocation counts as failed when the exit status is unsuccessful
    /// or when anything was written to the error stream; `stderr` is the
    /// captured text, verbatim.
    #[error("azcopy reported an error: {stderr}")]
    ExternalTool {
        stderr: String,
        code: Option<i32>,
    },

    /// The azcopy executable could not be started at all.
    #[error("could not spawn {program}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The storage service rejected a container request.
    #[error("container request failed with HTTP {status}: {body}")]
    Storage { status: u16, body: String },

    /// Transport-level failure talking to the storage service.
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    /// An account key that is not valid base64 cannot sign requests.
    #[error("account key is not valid base64")]
    BadKey(#[from] base64::DecodeError),
}

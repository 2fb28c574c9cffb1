//! Process execution layer.
//!
//! Runs the copy utility with both output streams captured.  The
//! [`CopyExecutor`] trait is the seam between the orchestrator and the
//! operating system: production code uses [`ProcessExecutor`], tests swap in
//! fakes that never spawn anything.
//!
//! Classification of an invocation as success or failure does **not** happen
//! here — this layer only reports what the process did.  The orchestrator in
//! [`crate::backup`] owns the policy.

use std::path::Path;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;

use crate::error::{BackupError, Result};

// ─── Output ───────────────────────────────────────────────────────────────────

/// Everything one azcopy run produced.
#[derive(Debug, Clone)]
pub struct CopyOutput {
    /// Whether the process exit status reported success.
    pub success: bool,
    /// Exit code, when the process exited normally.
    pub code: Option<i32>,
    /// Full standard-output text.
    pub stdout: String,
    /// Full standard-error text.
    pub stderr: String,
}

// ─── Executor seam ────────────────────────────────────────────────────────────

/// Spawns the copy utility and reports its captured output.
#[async_trait]
pub trait CopyExecutor: Send + Sync {
    /// Run `program` with `args` to completion, draining both streams.
    async fn run(&self, program: &Path, args: &[String]) -> Result<CopyOutput>;
}

/// Production executor backed by `tokio::process`.
///
/// `output()` waits on process exit as a future — no thread blocks while the
/// tool runs — and drains stdout and stderr fully before returning.
#[derive(Debug, Default)]
pub struct ProcessExecutor;

#[async_trait]
impl CopyExecutor for ProcessExecutor {
    async fn run(&self, program: &Path, args: &[String]) -> Result<CopyOutput> {
        let output = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|source| BackupError::Spawn {
                program: program.display().to_string(),
                source,
            })?;

        Ok(CopyOutput {
            success: output.status.success(),
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    async fn sh(script: &str) -> CopyOutput {
        ProcessExecutor
            .run(Path::new("sh"), &["-c".into(), script.into()])
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn zero_exit_is_success() {
        let out = sh("true").await;
        assert!(out.success);
        assert_eq!(out.code, Some(0));
    }

    #[tokio::test]
    async fn non_zero_exit_is_not_success() {
        let out = sh("exit 3").await;
        assert!(!out.success);
        assert_eq!(out.code, Some(3));
    }

    #[tokio::test]
    async fn captures_stdout() {
        let out = sh("echo hello").await;
        assert!(out.stdout.contains("hello"));
        assert!(out.stderr.is_empty());
    }

    #[tokio::test]
    async fn captures_stderr() {
        let out = sh("echo oops >&2").await;
        assert!(out.success, "writing to stderr alone does not change the exit status");
        assert!(out.stderr.contains("oops"));
    }

    #[tokio::test]
    async fn captures_output_of_failing_process() {
        let out = sh("echo failing; exit 1").await;
        assert!(!out.success);
        assert!(out.stdout.contains("failing"));
    }

    #[tokio::test]
    async fn missing_program_is_a_spawn_error() {
        let err = ProcessExecutor
            .run(Path::new("/no/such/azcopy-binary"), &[])
            .await
            .unwrap_err();
        assert!(matches!(err, BackupError::Spawn { .. }));
    }
}

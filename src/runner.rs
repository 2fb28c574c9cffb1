//! AzCopy argument construction helpers.
//!
//! This module is responsible for *building* the token vectors that will be
//! passed to azcopy.  It deliberately does **not** execute anything — process
//! execution lives in [`crate::exec`] behind the orchestrator's gate.
//!
//! Keeping arg-building separate from execution means every function here is
//! pure and trivially unit-testable without spawning any child processes.
//!
//! # Flag spelling
//!
//! The `/source:`, `/sourceKey:`, `/dest:` and `/Destkey:` prefixes (and the
//! `/S` / `/Y` switches) follow AzCopy 5.x exactly, mixed casing included —
//! these strings are the tool's wire format, not ours.

use chrono::{DateTime, Utc};

use crate::backup::Destination;

/// DNS suffix shared by all public Azure Storage endpoints.
pub const ENDPOINT_SUFFIX: &str = "core.windows.net";

// ─── Endpoints ────────────────────────────────────────────────────────────────

/// `https://{account}.table.core.windows.net`
pub fn table_endpoint(account: &str) -> String {
    format!("https://{account}.table.{ENDPOINT_SUFFIX}")
}

/// `https://{account}.blob.core.windows.net`
pub fn blob_endpoint(account: &str) -> String {
    format!("https://{account}.blob.{ENDPOINT_SUFFIX}")
}

// ─── Destination paths ────────────────────────────────────────────────────────

/// Destination URL for table backups: the target container plus the
/// optional sub-folder.  No trailing slash when the sub-folder is unset.
pub fn table_dest_url(dest: &Destination) -> String {
    let mut url = format!("{}/{}", blob_endpoint(&dest.account), dest.container);
    if let Some(folder) = &dest.subfolder {
        url.push('/');
        url.push_str(folder);
    }
    url
}

/// Destination URL for container backups.
///
/// Each source container lands under its own `/{container}/{stamp}`
/// sub-path so successive batches never overwrite each other.
pub fn container_dest_url(dest: &Destination, source_container: &str, stamp: &str) -> String {
    format!("{}/{source_container}/{stamp}", table_dest_url(dest))
}

/// UTC batch timestamp used as the final destination path segment for
/// container backups, e.g. `20260806T093021Z`.
pub fn batch_stamp(at: DateTime<Utc>) -> String {
    at.format("%Y%m%dT%H%M%SZ").to_string()
}

// ─── Invocations ──────────────────────────────────────────────────────────────

/// Tokens for one table copy:
///
/// ```text
/// /source:https://{src}.table…/{table}  /sourceKey:{key}
/// /dest:https://{dst}.blob…/{container}[/{subfolder}]  /Destkey:{key}  /Y
/// ```
pub fn copy_table_args(
    source_account: &str,
    source_key: &str,
    table: &str,
    dest: &Destination,
) -> Vec<String> {
    vec![
        format!("/source:{}/{table}", table_endpoint(source_account)),
        format!("/sourceKey:{source_key}"),
        format!("/dest:{}", table_dest_url(dest)),
        format!("/Destkey:{}", dest.key),
        "/Y".into(),
    ]
}

/// Tokens for one recursive container copy; `/S` selects every blob under
/// the source container.
pub fn copy_container_args(
    source_account: &str,
    source_key: &str,
    container: &str,
    dest: &Destination,
    stamp: &str,
) -> Vec<String> {
    vec![
        format!("/source:{}/{container}", blob_endpoint(source_account)),
        format!("/sourceKey:{source_key}"),
        format!("/dest:{}", container_dest_url(dest, container, stamp)),
        format!("/Destkey:{}", dest.key),
        "/S".into(),
        "/Y".into(),
    ]
}

/// Copy of `args` with key material masked, safe for logs and `--dry-run`
/// output.
pub fn redact(args: &[String]) -> Vec<String> {
    args.iter()
        .map(|arg| {
            for prefix in ["/sourceKey:", "/Destkey:"] {
                if arg.strip_prefix(prefix).is_some_and(|rest| !rest.is_empty()) {
                    return format!("{prefix}***");
                }
            }
            arg.clone()
        })
        .collect()
}

// ─── Tests ────────────────────────────────────────────────────────────────────

//! Destination container creation against the Azure Blob service.
//!
//! [`BlobStore`] is the seam the orchestrator talks to; [`RestBlobStore`] is
//! the production implementation, a thin reqwest client around the
//! `Create Container` REST operation with SharedKey authorization.
//!
//! Creation is idempotent at this layer: HTTP 201 (created) and HTTP 409
//! (already exists) both count as success.  Any other response surfaces as a
//! [`BackupError::Storage`] carrying status and body, unmodified.

use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use chrono::Utc;
use hmac::{Hmac, Mac};
use reqwest::StatusCode;
use sha2::Sha256;
use tracing::{debug, info};

use crate::error::{BackupError, Result};
use crate::runner::ENDPOINT_SUFFIX;

/// Storage service API version sent with every request.
const API_VERSION: &str = "2020-10-02";

// ─── Store seam ───────────────────────────────────────────────────────────────

/// Creates destination containers.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Create `container` in `account` if it does not already exist.
    ///
    /// An existing container is success, not an error.
    async fn ensure_container(&self, account: &str, key: &str, container: &str) -> Result<()>;
}

// ─── REST implementation ──────────────────────────────────────────────────────

/// reqwest-backed [`BlobStore`] talking to the real service, or to an
/// emulator via [`RestBlobStore::with_base_url`].
#[derive(Debug, Clone, Default)]
pub struct RestBlobStore {
    http: reqwest::Client,
    base_url: Option<String>,
}

impl RestBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Send every request to `base_url` instead of
    /// `https://{account}.blob.core.windows.net`.  Used with Azurite and in
    /// tests; the SharedKey signature is still computed over the account
    /// name, which is what the emulator verifies.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: Some(base_url.into().trim_end_matches('/').to_owned()),
        }
    }

    fn container_url(&self, account: &str, container: &str) -> String {
        match &self.base_url {
            Some(base) => format!("{base}/{container}?restype=container"),
            None => format!("https://{account}.blob.{ENDPOINT_SUFFIX}/{container}?restype=container"),
        }
    }
}

#[async_trait]
impl BlobStore for RestBlobStore {
    async fn ensure_container(&self, account: &str, key: &str, container: &str) -> Result<()> {
        let date = Utc::now().format("%a, %d %b %Y %H:%M:%S GMT").to_string();
        let authorization = shared_key_authorization(account, key, container, &date)?;
        let url = self.container_url(account, container);
        debug!(%container, %url, "creating destination container if missing");

        let response = self
            .http
            .put(&url)
            .header("x-ms-date", &date)
            .header("x-ms-version", API_VERSION)
            .header("Authorization", authorization)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::CREATED {
            info!(%container, "destination container created");
            Ok(())
        } else if status == StatusCode::CONFLICT {
            debug!(%container, "destination container already exists");
            Ok(())
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(BackupError::Storage {
                status: status.as_u16(),
                body,
            })
        }
    }
}

// ─── SharedKey signing ────────────────────────────────────────────────────────

/// `Authorization: SharedKey` header value for a `Create Container` PUT.
///
/// String-to-sign layout per the SharedKey contract: the verb, eleven
/// standard headers (all empty here — the request has no body and the date
/// travels in `x-ms-date`), the canonicalized `x-ms-*` headers, and the
/// canonicalized resource including the `restype` query parameter.
fn shared_key_authorization(
    account: &str,
    key: &str,
    container: &str,
    date: &str,
) -> Result<String> {
    let string_to_sign = format!(
        "PUT\n\n\n\n\n\n\n\n\n\n\n\n\
         x-ms-date:{date}\nx-ms-version:{API_VERSION}\n\
         /{account}/{container}\nrestype:container"
    );
    Ok(format!("SharedKey {account}:{}", sign(key, &string_to_sign)?))
}

/// Base64 HMAC-SHA256 of `payload` under the base64-encoded account key.
fn sign(key: &str, payload: &str) -> Result<String> {
    let key = BASE64.decode(key)?;
    let mut mac = Hmac::<Sha256>::new_from_slice(&key)
        .map_err(|_| BackupError::InvalidArgument("destination account key"))?;
    mac.update(payload.as_bytes());
    Ok(BASE64.encode(mac.finalize().into_bytes()))
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    // base64("0123456789abcdef0123456789abcdef")
    const KEY: &str = "MDEyMzQ1Njc4OWFiY2RlZjAxMjM0NTY3ODlhYmNkZWY=";

    // ── signing ───────────────────────────────────────────────────────────────

    #[test]
    fn shared_key_signature_matches_known_vector() {
        // Independently computed with a reference HMAC-SHA256 implementation
        // over the same string-to-sign.
        let auth = shared_key_authorization(
            "testaccount",
            KEY,
            "backups",
            "Wed, 06 Aug 2026 12:00:00 GMT",
        )
        .unwrap();
        assert_eq!(
            auth,
            "SharedKey testaccount:uS+mvNEKkMg6vgtZZNsyXy40pYEydQpF90RFZmgx+ws="
        );
    }

    #[test]
    fn sign_rejects_non_base64_key() {
        let err = sign("not base64 at all!!!", "payload").unwrap_err();
        assert!(matches!(err, BackupError::BadKey(_)));
    }

    // ── URLs ──────────────────────────────────────────────────────────────────

    #[test]
    fn container_url_targets_the_account_endpoint() {
        let store = RestBlobStore::new();
        assert_eq!(
            store.container_url("acct", "backups"),
            "https://acct.blob.core.windows.net/backups?restype=container"
        );
    }

    #[test]
    fn base_url_override_wins_and_drops_trailing_slash() {
        let store = RestBlobStore::with_base_url("http://127.0.0.1:10000/devstoreaccount1/");
        assert_eq!(
            store.container_url("acct", "backups"),
            "http://127.0.0.1:10000/devstoreaccount1/backups?restype=container"
        );
    }

    // ── ensure_container against a mock service ───────────────────────────────

    #[tokio::test]
    async fn created_container_is_success() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/backups"))
            .and(query_param("restype", "container"))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&server)
            .await;

        let store = RestBlobStore::with_base_url(server.uri());
        store.ensure_container("acct", KEY, "backups").await.unwrap();
    }

    #[tokio::test]
    async fn existing_container_is_success() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/backups"))
            .respond_with(ResponseTemplate::new(409))
            .mount(&server)
            .await;

        let store = RestBlobStore::with_base_url(server.uri());
        store.ensure_container("acct", KEY, "backups").await.unwrap();
    }

    #[tokio::test]
    async fn auth_failure_surfaces_status_and_body() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .respond_with(ResponseTemplate::new(403).set_body_string("signature mismatch"))
            .mount(&server)
            .await;

        let store = RestBlobStore::with_base_url(server.uri());
        let err = store
            .ensure_container("acct", KEY, "backups")
            .await
            .unwrap_err();
        match err {
            BackupError::Storage { status, body } => {
                assert_eq!(status, 403);
                assert_eq!(body, "signature mismatch");
            }
            other => panic!("expected Storage error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn requests_carry_date_version_and_authorization() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(wiremock::matchers::header_exists("authorization"))
            .and(wiremock::matchers::header("x-ms-version", API_VERSION))
            .and(wiremock::matchers::header_exists("x-ms-date"))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&server)
            .await;

        let store = RestBlobStore::with_base_url(server.uri());
        store.ensure_container("acct", KEY, "backups").await.unwrap();
    }
}

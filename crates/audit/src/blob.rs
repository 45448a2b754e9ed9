//! Object-store audit sink.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::header::CONTENT_TYPE;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::entry::AuditEntry;
use crate::error::SinkError;
use crate::AuditSink;

/// Static identifier embedded in every object key.
const KEY_IDENT: &str = "incident-relay";

/// Request timeout for store writes.
const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Audit sink backed by an S3-compatible HTTP object store.
///
/// Each entry is written as its own object under a key that is unique per
/// invocation, so concurrent writers never contend on a shared log object
/// and a failed write can never corrupt earlier entries.
#[derive(Debug, Clone)]
pub struct BlobStore {
    endpoint: String,
    bucket: String,
    prefix: String,
    token: Option<String>,
    client: reqwest::Client,
}

impl BlobStore {
    /// Create a sink writing to `{endpoint}/{bucket}/{prefix}/...`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(
        endpoint: impl Into<String>,
        bucket: impl Into<String>,
        prefix: impl Into<String>,
    ) -> Result<Self, SinkError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            bucket: bucket.into(),
            prefix: prefix.into().trim_matches('/').to_string(),
            token: None,
            client,
        })
    }

    /// Attach a bearer token sent with every write.
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Build a fresh object key: UTC timestamp, random id, static ident.
    fn object_key(&self) -> String {
        let timestamp = Utc::now().format("%Y%m%dT%H%M%S%.3fZ");
        let id = Uuid::new_v4().simple();
        format!("{}/{timestamp}-{id}-{KEY_IDENT}.json", self.prefix)
    }

    fn object_url(&self, key: &str) -> String {
        format!("{}/{}/{key}", self.endpoint, self.bucket)
    }
}

#[async_trait]
impl AuditSink for BlobStore {
    fn name(&self) -> &'static str {
        "blob-store"
    }

    async fn append(&self, entry: &AuditEntry) -> Result<(), SinkError> {
        let key = self.object_key();
        let url = self.object_url(&key);
        let body = serde_json::to_vec(entry)?;

        debug!(
            key = %key,
            stage = entry.stage.as_str(),
            outcome = entry.outcome.as_str(),
            "Writing audit entry"
        );

        let mut request = self
            .client
            .put(&url)
            .header(CONTENT_TYPE, "application/json")
            .body(body);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;

        if response.status().is_success() {
            debug!(key = %key, "Audit entry persisted");
            Ok(())
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            warn!(status = %status, body = %body, "Log store rejected audit entry");
            Err(SinkError::Rejected {
                status: status.as_u16(),
                body,
            })
        }
    }
}

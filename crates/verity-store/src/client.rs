//! Blob store client.
//!
//! The worker only ever needs `fetch`; upload exists for the ingestion path
//! and for driving end-to-end scenarios.

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;
use verity_crypto::digest_hex;
use verity_types::ContentHash;

/// Request timeout applied to every store call.
const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Errors from blob store access.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// No blob is stored under the requested address. Terminal for the
    /// current event; never retried here.
    #[error("blob {content_hash:#x} not found in store")]
    NotFound {
        /// The address that missed.
        content_hash: ContentHash,
    },

    /// Network or remote failure. Surfaced to the caller, who decides
    /// whether to retry.
    #[error("store transport error: {reason}")]
    Transport {
        /// What failed.
        reason: String,
    },
}

/// Source of blob bytes, keyed by content address.
///
/// The worker pipeline depends on this seam rather than the HTTP client so
/// tests can serve arbitrary bytes, including deliberately tampered ones.
#[async_trait]
pub trait BlobSource: Send + Sync {
    /// Fetch the bytes stored under a content address.
    async fn fetch(&self, content_hash: &ContentHash) -> Result<Vec<u8>, StoreError>;
}

/// HTTP client for the blob store service.
#[derive(Debug, Clone)]
pub struct BlobStoreClient {
    base_url: String,
    http: reqwest::Client,
}

impl BlobStoreClient {
    /// Create a client for the store at `base_url`.
    pub fn new(base_url: impl Into<String>) -> Result<Self, StoreError> {
        let http = reqwest::Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()
            .map_err(|e| StoreError::Transport {
                reason: e.to_string(),
            })?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
        })
    }

    /// The configured store base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Upload bytes and return the content address the store assigned.
    pub async fn upload(&self, bytes: Vec<u8>) -> Result<ContentHash, StoreError> {
        #[derive(Deserialize)]
        struct UploadResponse {
            #[serde(rename = "contentHash")]
            content_hash: ContentHash,
        }

        let response = self
            .http
            .post(format!("{}/blob", self.base_url))
            .header(reqwest::header::CONTENT_TYPE, "application/octet-stream")
            .body(bytes)
            .send()
            .await
            .map_err(|e| StoreError::Transport {
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(StoreError::Transport {
                reason: format!("upload failed: {status}"),
            });
        }

        let parsed: UploadResponse =
            response.json().await.map_err(|e| StoreError::Transport {
                reason: e.to_string(),
            })?;
        debug!(content_hash = %digest_hex(&parsed.content_hash), "Blob uploaded");
        Ok(parsed.content_hash)
    }

    /// Check the store's liveness probe.
    pub async fn health(&self) -> Result<bool, StoreError> {
        #[derive(Deserialize)]
        struct HealthResponse {
            ok: bool,
        }

        let parsed: HealthResponse = self
            .http
            .get(format!("{}/health", self.base_url))
            .send()
            .await
            .map_err(|e| StoreError::Transport {
                reason: e.to_string(),
            })?
            .json()
            .await
            .map_err(|e| StoreError::Transport {
                reason: e.to_string(),
            })?;
        Ok(parsed.ok)
    }
}

#[async_trait]
impl BlobSource for BlobStoreClient {
    async fn fetch(&self, content_hash: &ContentHash) -> Result<Vec<u8>, StoreError> {
        let url = format!("{}/blob/{}", self.base_url, digest_hex(content_hash));
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| StoreError::Transport {
                reason: e.to_string(),
            })?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(StoreError::NotFound {
                content_hash: *content_hash,
            });
        }
        if !status.is_success() {
            return Err(StoreError::Transport {
                reason: format!("fetch failed: {status}"),
            });
        }

        let bytes = response.bytes().await.map_err(|e| StoreError::Transport {
            reason: e.to_string(),
        })?;
        Ok(bytes.to_vec())
    }
}

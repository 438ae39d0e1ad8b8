//! Attestation relay seam.
//!
//! The relay accepts a signing request for a key tag and, some time later,
//! exposes an aggregated proof that can be fetched by request id. The
//! worker talks to it over HTTP in production and through [`InMemoryRelay`]
//! in tests and local runs.

use async_trait::async_trait;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;
use verity_crypto::digest_hex;
use verity_types::{AggregationProof, SignatureReceipt, H256};

/// Request timeout applied to every relay call.
const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// The attestation service could not serve a request.
///
/// Signing rejections and hard polling failures both land here. A proof
/// that is merely not ready yet is `Ok(None)` on the seam, not an error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("attestation unavailable: {reason}")]
pub struct AttestationUnavailable {
    /// What the transport or the service reported.
    pub reason: String,
}

impl AttestationUnavailable {
    /// Wraps a failure description.
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Gateway to the attestation relay.
#[async_trait]
pub trait RelayApi: Send + Sync {
    /// Ask the operator set to sign `message_hash` under `key_tag`,
    /// optionally pinned to an epoch.
    async fn sign_message(
        &self,
        key_tag: u32,
        message_hash: H256,
        required_epoch: Option<u64>,
    ) -> Result<SignatureReceipt, AttestationUnavailable>;

    /// Fetch the aggregated proof for an accepted request.
    ///
    /// `Ok(None)` means the relay has not finished aggregating yet.
    async fn get_aggregation_proof(
        &self,
        request_id: &str,
    ) -> Result<Option<AggregationProof>, AttestationUnavailable>;
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SignMessageRequest<'a> {
    key_tag: u32,
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    required_epoch: Option<u64>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignMessageResponse {
    request_id: String,
    epoch: u64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ProofRequest<'a> {
    request_id: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProofResponse {
    #[serde(default)]
    aggregation_proof: Option<String>,
}

/// HTTP client for the attestation relay.
#[derive(Debug, Clone)]
pub struct HttpRelayClient {
    base_url: String,
    http: reqwest::Client,
}

impl HttpRelayClient {
    /// Create a client for the relay at `base_url`.
    pub fn new(base_url: impl Into<String>) -> Result<Self, AttestationUnavailable> {
        let http = reqwest::Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()
            .map_err(|e| AttestationUnavailable::new(e.to_string()))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
        })
    }

    /// The configured relay base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn post_json<Req, Resp>(
        &self,
        path: &str,
        body: &Req,
    ) -> Result<Resp, AttestationUnavailable>
    where
        Req: Serialize + Sync,
        Resp: for<'de> Deserialize<'de>,
    {
        let response = self
            .http
            .post(format!("{}{path}", self.base_url))
            .json(body)
            .send()
            .await
            .map_err(|e| AttestationUnavailable::new(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AttestationUnavailable::new(format!("relay returned {status}")));
        }
        response
            .json()
            .await
            .map_err(|e| AttestationUnavailable::new(e.to_string()))
    }
}

#[async_trait]
impl RelayApi for HttpRelayClient {
    async fn sign_message(
        &self,
        key_tag: u32,
        message_hash: H256,
        required_epoch: Option<u64>,
    ) -> Result<SignatureReceipt, AttestationUnavailable> {
        let message = digest_hex(&message_hash);
        let request = SignMessageRequest {
            key_tag,
            message: &message,
            required_epoch,
        };

        let accepted: SignMessageResponse = self.post_json("/v1/signMessage", &request).await?;
        Ok(SignatureReceipt {
            request_id: accepted.request_id,
            epoch: accepted.epoch,
        })
    }

    async fn get_aggregation_proof(
        &self,
        request_id: &str,
    ) -> Result<Option<AggregationProof>, AttestationUnavailable> {
        let response: ProofResponse = self
            .post_json("/v1/getAggregationProof", &ProofRequest { request_id })
            .await?;

        // Absent and empty both mean the relay is still aggregating.
        let Some(encoded) = response.aggregation_proof else {
            return Ok(None);
        };
        if encoded.is_empty() || encoded == "0x" {
            return Ok(None);
        }

        let body = encoded.strip_prefix("0x").unwrap_or(&encoded);
        let bytes = hex::decode(body)
            .map_err(|e| AttestationUnavailable::new(format!("bad proof encoding: {e}")))?;
        Ok(Some(AggregationProof(bytes)))
    }
}

struct PendingRequest {
    proof: AggregationProof,
    polls: u32,
}

/// In-memory relay for tests and local runs.
///
/// Accepts every signing request and releases the proof once a request has
/// been polled more than `ready_after` times. The proof bytes are the
/// message digest itself, which keeps requests and proofs trivially
/// correlated.
pub struct InMemoryRelay {
    ready_after: u32,
    failing: bool,
    requests: Mutex<HashMap<String, PendingRequest>>,
}

impl InMemoryRelay {
    /// Relay whose proofs are ready on the first poll.
    #[must_use]
    pub fn new() -> Self {
        Self::ready_after(0)
    }

    /// Relay whose proofs appear only after `polls` unsuccessful polls.
    #[must_use]
    pub fn ready_after(polls: u32) -> Self {
        Self {
            ready_after: polls,
            failing: false,
            requests: Mutex::new(HashMap::new()),
        }
    }

    /// Relay where every call fails.
    #[must_use]
    pub fn failing() -> Self {
        Self {
            ready_after: 0,
            failing: true,
            requests: Mutex::new(HashMap::new()),
        }
    }

    /// Number of signing requests accepted so far.
    #[must_use]
    pub fn request_count(&self) -> usize {
        self.requests.lock().len()
    }

    /// Number of polls seen for one request.
    #[must_use]
    pub fn poll_count(&self, request_id: &str) -> u32 {
        self.requests.lock().get(request_id).map_or(0, |r| r.polls)
    }
}

impl Default for InMemoryRelay {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RelayApi for InMemoryRelay {
    async fn sign_message(
        &self,
        _key_tag: u32,
        message_hash: H256,
        required_epoch: Option<u64>,
    ) -> Result<SignatureReceipt, AttestationUnavailable> {
        if self.failing {
            return Err(AttestationUnavailable::new("relay offline"));
        }

        let request_id = uuid::Uuid::new_v4().to_string();
        self.requests.lock().insert(
            request_id.clone(),
            PendingRequest {
                proof: AggregationProof(message_hash.as_bytes().to_vec()),
                polls: 0,
            },
        );
        Ok(SignatureReceipt {
            request_id,
            epoch: required_epoch.unwrap_or(1),
        })
    }

    async fn get_aggregation_proof(
        &self,
        request_id: &str,
    ) -> Result<Option<AggregationProof>, AttestationUnavailable> {
        if self.failing {
            return Err(AttestationUnavailable::new("relay offline"));
        }

        let mut requests = self.requests.lock();
        let Some(pending) = requests.get_mut(request_id) else {
            return Err(AttestationUnavailable::new(format!(
                "unknown request {request_id}"
            )));
        };

        pending.polls += 1;
        if pending.polls > self.ready_after {
            Ok(Some(pending.proof.clone()))
        } else {
            Ok(None)
        }
    }
}

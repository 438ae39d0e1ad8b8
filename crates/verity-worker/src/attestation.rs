//! Attestation flow against the relay.
//!
//! `request_signature` binds a post to its content and commitment in a
//! single digest and submits it for signing. `poll_aggregation_proof`
//! drives the bounded poll for the aggregated result; running out of
//! attempts leaves the request pending on the relay side.

use std::sync::Arc;
use tracing::debug;
use verity_crypto::attestation_message;
use verity_types::{AggregationProof, AttestationRequest, Commitment, ContentHash, PostId};

use crate::relay::{AttestationUnavailable, RelayApi};
use crate::retry::{poll_until, RetryPolicy};

/// Client for one worker's attestation flow.
pub struct AttestationClient {
    relay: Arc<dyn RelayApi>,
    key_tag: u32,
    required_epoch: Option<u64>,
    policy: RetryPolicy,
}

impl AttestationClient {
    /// Client with the default polling policy.
    pub fn new(relay: Arc<dyn RelayApi>, key_tag: u32, required_epoch: Option<u64>) -> Self {
        Self::with_policy(relay, key_tag, required_epoch, RetryPolicy::default())
    }

    /// Client with an explicit polling policy.
    pub fn with_policy(
        relay: Arc<dyn RelayApi>,
        key_tag: u32,
        required_epoch: Option<u64>,
        policy: RetryPolicy,
    ) -> Self {
        Self {
            relay,
            key_tag,
            required_epoch,
            policy,
        }
    }

    /// Submits the post's attestation digest for signing.
    pub async fn request_signature(
        &self,
        post_id: &PostId,
        content_hash: &ContentHash,
        commitment: &Commitment,
    ) -> Result<AttestationRequest, AttestationUnavailable> {
        let digest = attestation_message(post_id, content_hash, commitment);
        let receipt = self
            .relay
            .sign_message(self.key_tag, digest, self.required_epoch)
            .await?;
        debug!(
            request_id = %receipt.request_id,
            epoch = receipt.epoch,
            "Signing request accepted"
        );
        Ok(AttestationRequest::from_receipt(receipt, digest))
    }

    /// Polls for the aggregated proof under the client's policy.
    ///
    /// `Ok(None)` means the policy was spent while the relay was still
    /// aggregating.
    pub async fn poll_aggregation_proof(
        &self,
        request_id: &str,
    ) -> Result<Option<AggregationProof>, AttestationUnavailable> {
        poll_until(self.policy, |index| {
            let relay = Arc::clone(&self.relay);
            let request_id = request_id.to_string();
            async move {
                debug!(request_id = %request_id, attempt = index, "Polling for aggregation proof");
                relay.get_aggregation_proof(&request_id).await
            }
        })
        .await
    }
}

//! Post-created pipeline: fetch, verify, attest.

use std::sync::Arc;
use tracing::{debug, error, info, warn};
use verity_bus::{AttestationOutcome, DaEvent, EventPublisher, Subscription};
use verity_crypto::verify_content;
use verity_store::BlobSource;
use verity_types::{Commitment, ContentHash, PostId};

use crate::attestation::AttestationClient;
use crate::config::Feature;

/// Handles `PostCreated` events.
///
/// Fetches the blob behind the post, checks it against the anchored content
/// hash and, when the relay is configured, runs the attestation flow. Every
/// step publishes its outcome; a failed step ends the pipeline for that
/// event and the handler moves on to the next one.
pub struct PostCreatedHandler {
    /// Bus subscription filtered to registry observations.
    subscription: Subscription,

    /// Where the post's bytes are fetched from.
    store: Arc<dyn BlobSource>,

    /// Attestation flow, when the relay is configured.
    attestation: Feature<AttestationClient>,

    /// Outlet for pipeline outcomes.
    publisher: Arc<dyn EventPublisher>,
}

impl PostCreatedHandler {
    /// Creates the handler.
    pub fn new(
        subscription: Subscription,
        store: Arc<dyn BlobSource>,
        attestation: Feature<AttestationClient>,
        publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            subscription,
            store,
            attestation,
            publisher,
        }
    }

    /// Consumes the subscription until the bus closes.
    pub async fn run(mut self) {
        info!("[da] Post-created handler started");

        while let Some(event) = self.subscription.recv().await {
            if let DaEvent::PostCreated {
                post_id,
                content_hash,
                commitment,
                ..
            } = event
            {
                self.handle_post(post_id, content_hash, commitment).await;
            }
        }

        info!("[da] Channel closed, exiting");
    }

    async fn handle_post(
        &self,
        post_id: PostId,
        content_hash: ContentHash,
        commitment: Commitment,
    ) {
        info!("[da] 📦 Post {} anchored, fetching blob {}", post_id, content_hash);

        let bytes = match self.store.fetch(&content_hash).await {
            Ok(bytes) => bytes,
            Err(e) => {
                error!("[da] ❌ Blob fetch failed for post {}: {}", post_id, e);
                return;
            }
        };

        let matched = verify_content(&content_hash, &bytes);
        self.publisher
            .publish(DaEvent::BlobVerified {
                post_id,
                content_hash,
                matched,
            })
            .await;

        if !matched {
            error!("[da] ❌ Blob for post {} does not match its content hash", post_id);
            return;
        }
        info!("[da] ✓ Blob verified for post {} ({} bytes)", post_id, bytes.len());

        let Feature::Enabled(client) = &self.attestation else {
            debug!("[da] Attestation disabled, pipeline ends at verification");
            return;
        };

        let request = match client
            .request_signature(&post_id, &content_hash, &commitment)
            .await
        {
            Ok(request) => request,
            Err(e) => {
                warn!("[da] Signing request failed for post {}: {}", post_id, e);
                self.publisher
                    .publish(DaEvent::AttestationSettled {
                        post_id,
                        outcome: AttestationOutcome::Failed {
                            reason: e.to_string(),
                        },
                    })
                    .await;
                return;
            }
        };

        let outcome = match client.poll_aggregation_proof(&request.request_id).await {
            Ok(Some(proof)) => {
                info!("[da] ✓ Aggregation proof for post {} ({} bytes)", post_id, proof.len());
                // TODO: relay the proof to the adapter once the contracts
                // expose a submission path for it.
                AttestationOutcome::ProofObtained {
                    request_id: request.request_id,
                    epoch: request.epoch,
                }
            }
            Ok(None) => {
                info!("[da] Proof for post {} still pending after polling", post_id);
                AttestationOutcome::ProofPending {
                    request_id: request.request_id,
                    epoch: request.epoch,
                }
            }
            Err(e) => {
                warn!("[da] Proof polling failed for post {}: {}", post_id, e);
                AttestationOutcome::Failed {
                    reason: e.to_string(),
                }
            }
        };

        self.publisher
            .publish(DaEvent::AttestationSettled { post_id, outcome })
            .await;
    }
}

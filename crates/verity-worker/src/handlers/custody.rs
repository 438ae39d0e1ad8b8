//! Custody challenge responder.

use std::sync::Arc;
use tracing::{error, info};
use verity_bus::{DaEvent, EventPublisher, Subscription};
use verity_crypto::{custody_message, SigningIdentity};
use verity_ledger::AdapterApi;
use verity_types::{Address, CustodyWitness, PostId};

use crate::config::Feature;

/// Handles `CustodyChallengeStarted` events.
///
/// Signs a possession witness over the challenge coordinates and submits
/// it to the adapter, or reports the skip when no signing identity is
/// configured. A failed submission ends the pipeline for that event only.
pub struct CustodyChallengeHandler {
    /// Bus subscription filtered to adapter observations.
    subscription: Subscription,

    /// Where proofs are submitted.
    adapter: Arc<dyn AdapterApi>,

    /// Signing identity, when one is configured.
    identity: Feature<SigningIdentity>,

    /// Outlet for responder outcomes.
    publisher: Arc<dyn EventPublisher>,
}

impl CustodyChallengeHandler {
    /// Creates the handler.
    pub fn new(
        subscription: Subscription,
        adapter: Arc<dyn AdapterApi>,
        identity: Feature<SigningIdentity>,
        publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            subscription,
            adapter,
            identity,
            publisher,
        }
    }

    /// Consumes the subscription until the bus closes.
    pub async fn run(mut self) {
        info!("[custody] Custody handler started");

        while let Some(event) = self.subscription.recv().await {
            if let DaEvent::CustodyChallengeStarted {
                post_id,
                operator,
                challenge_index,
            } = event
            {
                self.handle_challenge(post_id, operator, challenge_index)
                    .await;
            }
        }

        info!("[custody] Channel closed, exiting");
    }

    async fn handle_challenge(&self, post_id: PostId, operator: Address, challenge_index: u64) {
        info!(
            "[custody] 📥 Challenge {} on post {} for operator {}",
            challenge_index, post_id, operator
        );

        let Feature::Enabled(identity) = &self.identity else {
            info!("[custody] No signing identity, challenge left unanswered");
            self.publisher
                .publish(DaEvent::CustodySkipped {
                    post_id,
                    operator,
                    challenge_index,
                    reason: "no signing identity configured".to_string(),
                })
                .await;
            return;
        };

        let witness = CustodyWitness::placeholder();
        let digest = custody_message(&post_id, &operator, &witness);
        let signature = match identity.sign_digest(&digest) {
            Ok(signature) => signature,
            Err(e) => {
                error!("[custody] ❌ Signing failed for post {}: {}", post_id, e);
                return;
            }
        };

        match self
            .adapter
            .submit_custody_proof(post_id, operator, witness, signature)
            .await
        {
            Ok(()) => {
                info!(
                    "[custody] ✓ Proof submitted for post {} challenge {}",
                    post_id, challenge_index
                );
                self.publisher
                    .publish(DaEvent::CustodyProofSubmitted {
                        post_id,
                        operator,
                        challenge_index,
                    })
                    .await;
            }
            Err(e) => {
                error!(
                    "[custody] ❌ Proof submission failed for post {}: {}",
                    post_id, e
                );
            }
        }
    }
}

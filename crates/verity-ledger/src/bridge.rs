//! # Ledger Bridge Client
//!
//! WebSocket JSON-RPC client implementing [`RegistryApi`] and [`AdapterApi`]
//! against an external bridge endpoint. Each subscription is re-exposed as a
//! `broadcast` channel fed by a forwarder task, so consumers read it exactly
//! like the development ledger's.
//!
//! Byte fields cross the wire as `0x`-prefixed hex strings and record fields
//! as camelCase, matching the bridge's JSON conventions. A failed initial
//! connection is the worker's one fatal startup error; everything after that
//! surfaces per call.

use crate::api::{AdapterApi, ChallengeStartedNotification, PostCreatedNotification, RegistryApi};
use crate::errors::LedgerError;
use async_trait::async_trait;
use jsonrpsee::core::client::{ClientT, Subscription, SubscriptionClientT};
use jsonrpsee::rpc_params;
use jsonrpsee::ws_client::{WsClient, WsClientBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};
use verity_crypto::OperatorSignature;
use verity_types::{
    Address, ChallengeView, Commitment, ContentHash, CustodyWitness, Post, PostId, PostStatus,
};

/// Capacity of the forwarded notification channels.
const NOTIFICATION_CAPACITY: usize = 64;

const GET_POST: &str = "verity_getPost";
const SUBMIT_CUSTODY_PROOF: &str = "verity_submitCustodyProof";
const START_CUSTODY_CHALLENGES: &str = "verity_startCustodyChallenges";
const FINALIZE_POST: &str = "verity_finalizePostFromCustody";
const RECORD_PHASE1: &str = "verity_recordPhase1Result";
const GET_CUSTODY_CHALLENGES: &str = "verity_getCustodyChallenges";
const RESPONSE_WINDOW: &str = "verity_challengeResponseWindow";
const SUBSCRIBE_POSTS: &str = "verity_subscribePosts";
const UNSUBSCRIBE_POSTS: &str = "verity_unsubscribePosts";
const SUBSCRIBE_CHALLENGES: &str = "verity_subscribeChallenges";
const UNSUBSCRIBE_CHALLENGES: &str = "verity_unsubscribeChallenges";

/// Post record as the bridge serializes it.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PostRecord {
    id: PostId,
    content_hash: ContentHash,
    commitment: Commitment,
    status: u8,
    creator: Address,
}

impl PostRecord {
    fn into_domain(self) -> Result<Post, LedgerError> {
        let status = PostStatus::from_wire(self.status).map_err(|e| LedgerError::Rpc {
            reason: format!("bad post record: {e}"),
        })?;
        Ok(Post {
            id: self.id,
            content_hash: self.content_hash,
            commitment: self.commitment,
            status,
            creator: self.creator,
        })
    }
}

/// Challenge row as the bridge serializes it.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChallengeRecord {
    operator: Address,
    challenge_index: u64,
    responded: bool,
    success: bool,
}

impl From<ChallengeRecord> for ChallengeView {
    fn from(record: ChallengeRecord) -> Self {
        Self {
            operator: record.operator,
            challenge_index: record.challenge_index,
            responded: record.responded,
            success: record.success,
        }
    }
}

/// Witness fields as the bridge expects them.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WitnessParam {
    chunk_index: u64,
    evaluation: String,
    proof: String,
}

impl WitnessParam {
    fn from_witness(witness: &CustodyWitness) -> Self {
        Self {
            chunk_index: witness.chunk_index,
            evaluation: hex_bytes(&witness.evaluation),
            proof: hex_bytes(&witness.proof),
        }
    }
}

fn hex_bytes(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(bytes))
}

fn rpc_error(e: impl std::fmt::Display) -> LedgerError {
    LedgerError::Rpc {
        reason: e.to_string(),
    }
}

/// Pump one subscription into a broadcast channel until either side closes.
///
/// Dropping the subscription unsubscribes on the remote, so the forwarder
/// ending also tears down the server-side stream.
fn spawn_forwarder<T>(
    stream: &'static str,
    mut subscription: Subscription<T>,
) -> broadcast::Receiver<T>
where
    T: DeserializeOwned + Clone + Send + 'static,
{
    let (tx, rx) = broadcast::channel(NOTIFICATION_CAPACITY);
    tokio::spawn(async move {
        while let Some(item) = subscription.next().await {
            match item {
                Ok(notification) => {
                    if tx.send(notification).is_err() {
                        debug!(stream, "All notification receivers dropped, stopping forwarder");
                        return;
                    }
                }
                Err(e) => warn!(stream, error = %e, "Skipping malformed bridge notification"),
            }
        }
        debug!(stream, "Bridge subscription closed");
    });
    rx
}

/// WebSocket client for the registry and adapter contracts.
pub struct LedgerBridge {
    client: WsClient,
    registry_address: Address,
    adapter_address: Address,
}

impl LedgerBridge {
    /// Connect to the bridge endpoint.
    ///
    /// Failure here means the configuration is unusable and the process
    /// should not come up.
    pub async fn connect(
        endpoint: &str,
        registry_address: Address,
        adapter_address: Address,
    ) -> Result<Self, LedgerError> {
        let client = WsClientBuilder::default()
            .build(endpoint)
            .await
            .map_err(|e| LedgerError::Connect {
                endpoint: endpoint.to_string(),
                reason: e.to_string(),
            })?;

        info!(
            endpoint,
            registry = %registry_address,
            adapter = %adapter_address,
            "Connected to ledger bridge"
        );
        Ok(Self {
            client,
            registry_address,
            adapter_address,
        })
    }
}

#[async_trait]
impl RegistryApi for LedgerBridge {
    async fn subscribe_posts(
        &self,
    ) -> Result<broadcast::Receiver<PostCreatedNotification>, LedgerError> {
        let subscription: Subscription<PostCreatedNotification> = self
            .client
            .subscribe(
                SUBSCRIBE_POSTS,
                rpc_params![self.registry_address],
                UNSUBSCRIBE_POSTS,
            )
            .await
            .map_err(rpc_error)?;
        Ok(spawn_forwarder("posts", subscription))
    }

    async fn get_post(&self, post_id: PostId) -> Result<Post, LedgerError> {
        let record: PostRecord = self
            .client
            .request(GET_POST, rpc_params![post_id])
            .await
            .map_err(rpc_error)?;
        record.into_domain()
    }
}

#[async_trait]
impl AdapterApi for LedgerBridge {
    async fn subscribe_challenges(
        &self,
    ) -> Result<broadcast::Receiver<ChallengeStartedNotification>, LedgerError> {
        let subscription: Subscription<ChallengeStartedNotification> = self
            .client
            .subscribe(
                SUBSCRIBE_CHALLENGES,
                rpc_params![self.adapter_address],
                UNSUBSCRIBE_CHALLENGES,
            )
            .await
            .map_err(rpc_error)?;
        Ok(spawn_forwarder("challenges", subscription))
    }

    async fn submit_custody_proof(
        &self,
        post_id: PostId,
        operator: Address,
        witness: CustodyWitness,
        signature: OperatorSignature,
    ) -> Result<(), LedgerError> {
        let witness_param = WitnessParam::from_witness(&witness);
        let _: serde_json::Value = self
            .client
            .request(
                SUBMIT_CUSTODY_PROOF,
                rpc_params![post_id, operator, witness_param, signature.to_hex()],
            )
            .await
            .map_err(rpc_error)?;
        debug!(post_id = %post_id, operator = %operator, "Custody proof forwarded");
        Ok(())
    }

    async fn start_custody_challenges(&self, post_id: PostId) -> Result<(), LedgerError> {
        let _: serde_json::Value = self
            .client
            .request(START_CUSTODY_CHALLENGES, rpc_params![post_id])
            .await
            .map_err(rpc_error)?;
        Ok(())
    }

    async fn finalize_post_from_custody(&self, post_id: PostId) -> Result<PostStatus, LedgerError> {
        let status: u8 = self
            .client
            .request(FINALIZE_POST, rpc_params![post_id])
            .await
            .map_err(rpc_error)?;
        PostStatus::from_wire(status).map_err(|e| LedgerError::Rpc {
            reason: format!("bad finalize result: {e}"),
        })
    }

    async fn record_phase1_result(
        &self,
        post_id: PostId,
        passed: bool,
        yes_stake: u64,
        total_stake: u64,
        voters: Vec<Address>,
    ) -> Result<(), LedgerError> {
        let _: serde_json::Value = self
            .client
            .request(
                RECORD_PHASE1,
                rpc_params![post_id, passed, yes_stake, total_stake, voters],
            )
            .await
            .map_err(rpc_error)?;
        Ok(())
    }

    async fn get_custody_challenges(
        &self,
        post_id: PostId,
    ) -> Result<Vec<ChallengeView>, LedgerError> {
        let records: Vec<ChallengeRecord> = self
            .client
            .request(GET_CUSTODY_CHALLENGES, rpc_params![post_id])
            .await
            .map_err(rpc_error)?;
        Ok(records.into_iter().map(ChallengeView::from).collect())
    }

    async fn challenge_response_window(&self) -> Result<Duration, LedgerError> {
        let secs: u64 = self
            .client
            .request(RESPONSE_WINDOW, rpc_params![])
            .await
            .map_err(rpc_error)?;
        Ok(Duration::from_secs(secs))
    }
}

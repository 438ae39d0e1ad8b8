//! # Registry and Adapter Surfaces
//!
//! Trait contracts for the two ledger-side interfaces the worker consumes,
//! plus the typed notifications their subscriptions deliver.
//!
//! Both implementations hand subscriptions back as `broadcast` receivers,
//! so listener code reads the development ledger and the bridge client
//! identically.

use crate::errors::LedgerError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::sync::broadcast;
use verity_crypto::OperatorSignature;
use verity_types::{
    Address, ChallengeView, Commitment, ContentHash, CustodyWitness, Post, PostId, PostStatus,
};

/// Notification delivered when a post is anchored on the registry.
///
/// Field names follow the bridge wire format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostCreatedNotification {
    /// Ledger-assigned post id.
    pub post_id: PostId,
    /// Content address of the anchored blob.
    pub content_hash: ContentHash,
    /// Commitment to the blob content.
    pub commitment: Commitment,
    /// Address that created the post.
    pub creator: Address,
}

/// Notification delivered when the adapter opens one custody challenge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeStartedNotification {
    /// The challenged post.
    pub post_id: PostId,
    /// The operator expected to respond.
    pub operator: Address,
    /// Index of the challenge within its round.
    pub challenge_index: u64,
}

/// Read and subscription surface of the post registry.
#[async_trait]
pub trait RegistryApi: Send + Sync {
    /// Subscribe to post-created notifications, from now forward.
    async fn subscribe_posts(
        &self,
    ) -> Result<broadcast::Receiver<PostCreatedNotification>, LedgerError>;

    /// Fetch one post record.
    async fn get_post(&self, post_id: PostId) -> Result<Post, LedgerError>;
}

/// Transaction and read surface of the custody adapter.
#[async_trait]
pub trait AdapterApi: Send + Sync {
    /// Subscribe to challenge-started notifications, from now forward.
    async fn subscribe_challenges(
        &self,
    ) -> Result<broadcast::Receiver<ChallengeStartedNotification>, LedgerError>;

    /// Submit one operator's custody proof for its outstanding challenge.
    async fn submit_custody_proof(
        &self,
        post_id: PostId,
        operator: Address,
        witness: CustodyWitness,
        signature: OperatorSignature,
    ) -> Result<(), LedgerError>;

    /// Open a fresh challenge round for a post, replacing any previous round.
    async fn start_custody_challenges(&self, post_id: PostId) -> Result<(), LedgerError>;

    /// Resolve a post from its custody evidence once the response window has
    /// elapsed. Returns the status the ledger settled on.
    async fn finalize_post_from_custody(&self, post_id: PostId) -> Result<PostStatus, LedgerError>;

    /// Record the phase-1 soundness vote for a post.
    async fn record_phase1_result(
        &self,
        post_id: PostId,
        passed: bool,
        yes_stake: u64,
        total_stake: u64,
        voters: Vec<Address>,
    ) -> Result<(), LedgerError>;

    /// Read the current round's challenges for a post.
    async fn get_custody_challenges(
        &self,
        post_id: PostId,
    ) -> Result<Vec<ChallengeView>, LedgerError>;

    /// How long responders have to answer after a round opens.
    async fn challenge_response_window(&self) -> Result<Duration, LedgerError>;
}

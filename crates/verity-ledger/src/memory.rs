//! # Development Ledger
//!
//! An in-memory stand-in for the deployed registry and adapter contracts,
//! used by integration tests and local development. It keeps the contract
//! semantics the worker depends on (sequential post ids, one challenge per
//! operator per round, the response window gate, the finalization matrix)
//! and replaces the rest with the simplest thing that works: the
//! placeholder verifier accepts every submitted witness, so the only way a
//! round fails is an operator not responding.

use crate::api::{AdapterApi, ChallengeStartedNotification, PostCreatedNotification, RegistryApi};
use crate::errors::LedgerError;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::sync::broadcast;
use tracing::{debug, info};
use verity_crypto::OperatorSignature;
use verity_types::{
    Address, ChallengeView, Commitment, ContentHash, CustodyChallenge, CustodyWitness, Post,
    PostId, PostStatus,
};

/// Capacity of the notification channels.
const NOTIFICATION_CAPACITY: usize = 64;

/// Response window used when none is configured.
pub const DEFAULT_RESPONSE_WINDOW: Duration = Duration::from_secs(30);

/// One accepted custody submission, kept for inspection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmittedProof {
    /// The challenged post.
    pub post_id: PostId,
    /// The submitting operator.
    pub operator: Address,
    /// Chunk index carried by the witness.
    pub chunk_index: u64,
    /// The operator's signature over the submission digest.
    pub signature: OperatorSignature,
}

#[derive(Default)]
struct LedgerState {
    posts: HashMap<PostId, Post>,
    next_post: u64,
    challenges: HashMap<PostId, Vec<CustodyChallenge>>,
    round_opened_at: HashMap<PostId, Instant>,
    submissions: Vec<SubmittedProof>,
}

/// In-memory registry and adapter with event emission.
pub struct DevLedger {
    state: Mutex<LedgerState>,
    post_tx: broadcast::Sender<PostCreatedNotification>,
    challenge_tx: broadcast::Sender<ChallengeStartedNotification>,
    operators: Vec<Address>,
    window: Duration,
}

impl DevLedger {
    /// Create a ledger challenging the given operator set, with the default
    /// response window.
    #[must_use]
    pub fn new(operators: Vec<Address>) -> Self {
        Self::with_window(operators, DEFAULT_RESPONSE_WINDOW)
    }

    /// Create a ledger with an explicit response window. Tests use a zero
    /// window so finalization needs no waiting.
    #[must_use]
    pub fn with_window(operators: Vec<Address>, window: Duration) -> Self {
        let (post_tx, _) = broadcast::channel(NOTIFICATION_CAPACITY);
        let (challenge_tx, _) = broadcast::channel(NOTIFICATION_CAPACITY);
        Self {
            state: Mutex::new(LedgerState::default()),
            post_tx,
            challenge_tx,
            operators,
            window,
        }
    }

    /// Anchor a new post and notify subscribers.
    ///
    /// Ids are sequential, starting at `0x…01`. The post starts `Pending`.
    pub fn create_post(
        &self,
        content_hash: ContentHash,
        commitment: Commitment,
        creator: Address,
    ) -> Post {
        let post = {
            let mut state = self.state.lock();
            state.next_post += 1;
            let post = Post {
                id: PostId::from_low_u64_be(state.next_post),
                content_hash,
                commitment,
                status: PostStatus::Pending,
                creator,
            };
            state.posts.insert(post.id, post.clone());
            post
        };

        info!(post_id = %post.id, "Post anchored");
        let _ = self.post_tx.send(PostCreatedNotification {
            post_id: post.id,
            content_hash: post.content_hash,
            commitment: post.commitment,
            creator: post.creator,
        });
        post
    }

    /// The configured operator set, in challenge-index order.
    #[must_use]
    pub fn operators(&self) -> &[Address] {
        &self.operators
    }

    /// Every custody submission accepted so far, in arrival order.
    #[must_use]
    pub fn submitted_proofs(&self) -> Vec<SubmittedProof> {
        self.state.lock().submissions.clone()
    }
}

#[async_trait]
impl RegistryApi for DevLedger {
    async fn subscribe_posts(
        &self,
    ) -> Result<broadcast::Receiver<PostCreatedNotification>, LedgerError> {
        Ok(self.post_tx.subscribe())
    }

    async fn get_post(&self, post_id: PostId) -> Result<Post, LedgerError> {
        self.state
            .lock()
            .posts
            .get(&post_id)
            .cloned()
            .ok_or(LedgerError::UnknownPost { post_id })
    }
}

#[async_trait]
impl AdapterApi for DevLedger {
    async fn subscribe_challenges(
        &self,
    ) -> Result<broadcast::Receiver<ChallengeStartedNotification>, LedgerError> {
        Ok(self.challenge_tx.subscribe())
    }

    async fn submit_custody_proof(
        &self,
        post_id: PostId,
        operator: Address,
        witness: CustodyWitness,
        signature: OperatorSignature,
    ) -> Result<(), LedgerError> {
        {
            let mut state = self.state.lock();
            if !state.posts.contains_key(&post_id) {
                return Err(LedgerError::UnknownPost { post_id });
            }
            let round = state
                .challenges
                .get_mut(&post_id)
                .ok_or(LedgerError::NoActiveRound { post_id })?;
            let challenge = round
                .iter_mut()
                .find(|challenge| challenge.operator == operator)
                .ok_or(LedgerError::UnknownChallenge { post_id, operator })?;

            // Placeholder verifier: every witness passes.
            challenge.responded = true;
            challenge.success = true;

            state.submissions.push(SubmittedProof {
                post_id,
                operator,
                chunk_index: witness.chunk_index,
                signature,
            });
        }

        debug!(post_id = %post_id, operator = %operator, "Custody proof accepted");
        Ok(())
    }

    async fn start_custody_challenges(&self, post_id: PostId) -> Result<(), LedgerError> {
        let notifications = {
            let mut state = self.state.lock();
            if !state.posts.contains_key(&post_id) {
                return Err(LedgerError::UnknownPost { post_id });
            }

            let round: Vec<CustodyChallenge> = self
                .operators
                .iter()
                .enumerate()
                .map(|(index, operator)| CustodyChallenge {
                    post_id,
                    operator: *operator,
                    challenge_index: index as u64,
                    responded: false,
                    success: false,
                })
                .collect();

            let notifications: Vec<ChallengeStartedNotification> = round
                .iter()
                .map(|challenge| ChallengeStartedNotification {
                    post_id,
                    operator: challenge.operator,
                    challenge_index: challenge.challenge_index,
                })
                .collect();

            // A new round replaces the previous one outright.
            state.challenges.insert(post_id, round);
            state.round_opened_at.insert(post_id, Instant::now());
            notifications
        };

        info!(post_id = %post_id, challenges = notifications.len(), "Custody round opened");
        for notification in notifications {
            let _ = self.challenge_tx.send(notification);
        }
        Ok(())
    }

    async fn finalize_post_from_custody(&self, post_id: PostId) -> Result<PostStatus, LedgerError> {
        let status = {
            let mut state = self.state.lock();
            let opened = *state
                .round_opened_at
                .get(&post_id)
                .ok_or(LedgerError::NoActiveRound { post_id })?;

            let elapsed = opened.elapsed();
            if elapsed < self.window {
                let remaining = self.window - elapsed;
                return Err(LedgerError::WindowOpen {
                    post_id,
                    remaining_ms: remaining.as_millis() as u64,
                });
            }

            let clean = state
                .challenges
                .get(&post_id)
                .map_or(false, |round| {
                    round
                        .iter()
                        .all(|challenge| challenge.responded && challenge.success)
                });

            // Finalizing settles and closes the round.
            state.challenges.remove(&post_id);
            state.round_opened_at.remove(&post_id);

            let post = state
                .posts
                .get_mut(&post_id)
                .ok_or(LedgerError::UnknownPost { post_id })?;
            post.status = match (clean, post.status) {
                (true, PostStatus::Phase1Passed) => PostStatus::Available,
                (false, PostStatus::Phase1Failed) => PostStatus::Unavailable,
                _ => PostStatus::Inconclusive,
            };
            post.status
        };

        info!(post_id = %post_id, status = %status, "Post finalized from custody");
        Ok(status)
    }

    async fn record_phase1_result(
        &self,
        post_id: PostId,
        passed: bool,
        yes_stake: u64,
        total_stake: u64,
        voters: Vec<Address>,
    ) -> Result<(), LedgerError> {
        {
            let mut state = self.state.lock();
            let post = state
                .posts
                .get_mut(&post_id)
                .ok_or(LedgerError::UnknownPost { post_id })?;
            post.status = if passed {
                PostStatus::Phase1Passed
            } else {
                PostStatus::Phase1Failed
            };
        }

        debug!(
            post_id = %post_id,
            passed,
            yes_stake,
            total_stake,
            voters = voters.len(),
            "Phase-1 result recorded"
        );
        Ok(())
    }

    async fn get_custody_challenges(
        &self,
        post_id: PostId,
    ) -> Result<Vec<ChallengeView>, LedgerError> {
        let state = self.state.lock();
        if !state.posts.contains_key(&post_id) {
            return Err(LedgerError::UnknownPost { post_id });
        }
        Ok(state
            .challenges
            .get(&post_id)
            .map(|round| {
                round
                    .iter()
                    .map(|challenge| ChallengeView {
                        operator: challenge.operator,
                        challenge_index: challenge.challenge_index,
                        responded: challenge.responded,
                        success: challenge.success,
                    })
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn challenge_response_window(&self) -> Result<Duration, LedgerError> {
        Ok(self.window)
    }
}

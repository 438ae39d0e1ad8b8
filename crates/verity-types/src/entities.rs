//! # Core Domain Entities
//!
//! The ledger-facing data model plus the worker-local attestation records.
//!
//! ## Clusters
//!
//! - **Ledger**: `Post`, `CustodyChallenge`, `ChallengeView`
//! - **Worker**: `AttestationRequest`, `SignatureReceipt`, `AggregationProof`

use crate::status::PostStatus;
use serde::{Deserialize, Serialize};

// Re-export the fixed-width primitives used across all crates.
pub use primitive_types::{H160, H256};

// =============================================================================
// CLUSTER A: THE LEDGER
// =============================================================================

/// Opaque 32-byte post identifier, assigned by the ledger at creation.
pub type PostId = H256;

/// Content address of a blob: SHA-256 over its raw bytes.
pub type ContentHash = H256;

/// Cryptographic commitment to a blob (placeholder value in this system,
/// not a real polynomial commitment).
pub type Commitment = H256;

/// A 20-byte Ethereum-style account address.
pub type Address = H160;

/// A ledger-anchored record for one uploaded blob.
///
/// All fields except `status` are immutable after creation. `status` is
/// mutated only by the ledger in response to submitted transactions; the
/// worker observes it and never infers it locally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    /// Ledger-assigned identifier, unique and never reused.
    pub id: PostId,
    /// Content address of the anchored blob.
    pub content_hash: ContentHash,
    /// Commitment to the blob content.
    pub commitment: Commitment,
    /// Current lifecycle status.
    pub status: PostStatus,
    /// Address that created the post.
    pub creator: Address,
}

/// One outstanding proof-of-possession obligation for a post and operator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustodyChallenge {
    /// The challenged post.
    pub post_id: PostId,
    /// The operator expected to respond.
    pub operator: Address,
    /// Index of this challenge within its round.
    pub challenge_index: u64,
    /// Set once a proof has been submitted. Monotonic, never reset.
    pub responded: bool,
    /// Set once the ledger has evaluated the submitted proof.
    pub success: bool,
}

/// Post-scoped read model returned by the adapter's challenge query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChallengeView {
    /// The operator expected to respond.
    pub operator: Address,
    /// Index of this challenge within its round.
    pub challenge_index: u64,
    /// Whether a proof has been submitted.
    pub responded: bool,
    /// Whether the submitted proof passed evaluation.
    pub success: bool,
}

/// Witness carried by a custody proof submission.
///
/// The evaluation and proof fields are placeholders in this system; the
/// deployed verifier accepts every witness.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CustodyWitness {
    /// Index of the challenged chunk.
    pub chunk_index: u64,
    /// Claimed evaluation at the challenged point.
    pub evaluation: Vec<u8>,
    /// Opening proof bytes.
    pub proof: Vec<u8>,
}

impl CustodyWitness {
    /// The placeholder witness: chunk 0, empty evaluation, empty proof.
    #[must_use]
    pub fn placeholder() -> Self {
        Self::default()
    }
}

// =============================================================================
// CLUSTER B: THE WORKER
// =============================================================================

/// Receipt returned by the attestation service for a signature request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureReceipt {
    /// Service-assigned identifier used to poll for the aggregated proof.
    pub request_id: String,
    /// The signing epoch the request was bound to.
    pub epoch: u64,
}

/// A worker-local, ephemeral record of one in-flight signature request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttestationRequest {
    /// Service-assigned identifier used to poll for the aggregated proof.
    pub request_id: String,
    /// The signing epoch the request was bound to.
    pub epoch: u64,
    /// The exact digest that was signed:
    /// `keccak256(postId ‖ contentHash ‖ commitment)`.
    pub message_hash: H256,
}

impl AttestationRequest {
    /// Combine a service receipt with the digest it covered.
    #[must_use]
    pub fn from_receipt(receipt: SignatureReceipt, message_hash: H256) -> Self {
        Self {
            request_id: receipt.request_id,
            epoch: receipt.epoch,
            message_hash,
        }
    }
}

/// An aggregated attestation proof produced asynchronously by the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregationProof(pub Vec<u8>);

impl AggregationProof {
    /// Proof payload size in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the proof payload is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

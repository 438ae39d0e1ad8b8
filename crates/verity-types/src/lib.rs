//! # Verity Types - Shared Domain Model
//!
//! Core entities for the data-availability attestation flow: ledger-anchored
//! posts, custody challenges and worker-local attestation records.
//!
//! ## Clusters
//!
//! - **Ledger**: `Post`, `PostStatus`, `CustodyChallenge`, `ChallengeView`
//! - **Worker**: `AttestationRequest`, `SignatureReceipt`, `AggregationProof`
//!
//! Every 32-byte identifier (post id, content hash, commitment) is an `H256`
//! whose canonical string form is lowercase hex with a `0x` prefix.

pub mod entities;
pub mod status;

pub use entities::{
    Address, AggregationProof, AttestationRequest, ChallengeView, Commitment, ContentHash,
    CustodyChallenge, CustodyWitness, Post, PostId, SignatureReceipt, H160, H256,
};
pub use status::{InvalidStatus, PostStatus};

//! Digest construction for attestation and custody submissions.
//!
//! Both digests use a packed encoding hashed with Keccak-256. The field
//! order and widths are a wire contract shared with the attestation relay
//! and the ledger bridge; changing them breaks signature verification on
//! the other side.

use verity_types::{Address, Commitment, ContentHash, CustodyWitness, PostId, H256};

use crate::hashing::keccak256;

/// Builds the digest an operator signs to attest a post.
///
/// Packed encoding: `post_id (32) || content_hash (32) || commitment (32)`.
#[must_use]
pub fn attestation_message(
    post_id: &PostId,
    content_hash: &ContentHash,
    commitment: &Commitment,
) -> H256 {
    let mut packed = Vec::with_capacity(96);
    packed.extend_from_slice(post_id.as_bytes());
    packed.extend_from_slice(content_hash.as_bytes());
    packed.extend_from_slice(commitment.as_bytes());
    keccak256(&packed)
}

/// Builds the digest an operator signs over a custody proof.
///
/// Variable-width witness fields are length-prefixed (u64 big-endian) so
/// that no two distinct witnesses share an encoding.
#[must_use]
pub fn custody_message(post_id: &PostId, operator: &Address, witness: &CustodyWitness) -> H256 {
    let mut packed =
        Vec::with_capacity(32 + 20 + 8 + 16 + witness.evaluation.len() + witness.proof.len());
    packed.extend_from_slice(post_id.as_bytes());
    packed.extend_from_slice(operator.as_bytes());
    packed.extend_from_slice(&witness.chunk_index.to_be_bytes());
    packed.extend_from_slice(&(witness.evaluation.len() as u64).to_be_bytes());
    packed.extend_from_slice(&witness.evaluation);
    packed.extend_from_slice(&(witness.proof.len() as u64).to_be_bytes());
    packed.extend_from_slice(&witness.proof);
    keccak256(&packed)
}

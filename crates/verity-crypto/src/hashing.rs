//! Digest primitives shared across the workspace.
//!
//! Two algorithms are in play: SHA-256 for content addressing (the store
//! and the ledger both key blobs by it) and Keccak-256 for attestation
//! digests and operator addresses.

use sha2::{Digest as Sha2Digest, Sha256};
use sha3::Keccak256;
use verity_types::{ContentHash, H256};

use crate::errors::CryptoError;

/// Computes the content address of a blob: SHA-256 over the exact bytes.
#[must_use]
pub fn content_hash(data: &[u8]) -> ContentHash {
    let digest = Sha256::digest(data);
    H256::from_slice(&digest)
}

/// Computes Keccak-256 over the input bytes.
#[must_use]
pub fn keccak256(data: &[u8]) -> H256 {
    let digest = Keccak256::digest(data);
    H256::from_slice(&digest)
}

/// Renders a digest as lowercase hex with a `0x` prefix.
///
/// The canonical textual form used everywhere a digest crosses a wire or a
/// log line. Always 66 characters.
#[must_use]
pub fn digest_hex(digest: &H256) -> String {
    format!("0x{}", hex::encode(digest.as_bytes()))
}

/// Parses a 32-byte digest from hex, with or without a `0x`/`0X` prefix.
///
/// Accepts mixed case. Rejects anything that is not exactly 64 hex digits
/// after the optional prefix.
pub fn parse_digest(input: &str) -> Result<H256, CryptoError> {
    let trimmed = input.trim();
    let body = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);

    let raw = hex::decode(body).map_err(|e| CryptoError::invalid_digest(input, e.to_string()))?;
    if raw.len() != 32 {
        return Err(CryptoError::InvalidDigestLength {
            expected: 32,
            actual: raw.len(),
        });
    }
    Ok(H256::from_slice(&raw))
}

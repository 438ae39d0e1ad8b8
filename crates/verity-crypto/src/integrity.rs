//! Blob possession checks.
//!
//! Verification is a pure function of the claimed digest and the bytes in
//! hand. A mismatch is an outcome, not an error: callers get `false` and
//! decide what to do with it.

use verity_types::ContentHash;

use crate::hashing::content_hash;

/// Returns `true` when `data` hashes to `expected`.
#[must_use]
pub fn verify_content(expected: &ContentHash, data: &[u8]) -> bool {
    content_hash(data) == *expected
}

/// Returns `true` when `data` hashes to the claimed hex digest.
///
/// The claimed digest must carry a `0x`/`0X` prefix and exactly 64 hex
/// digits; comparison is case-insensitive. Anything else, including a bare
/// unprefixed digest, yields `false` rather than an error.
#[must_use]
pub fn verify_blob(claimed: &str, data: &[u8]) -> bool {
    let body = match claimed
        .strip_prefix("0x")
        .or_else(|| claimed.strip_prefix("0X"))
    {
        Some(body) => body,
        None => return false,
    };

    let claimed_raw = match hex::decode(body) {
        Ok(raw) if raw.len() == 32 => raw,
        _ => return false,
    };

    content_hash(data).as_bytes() == claimed_raw.as_slice()
}

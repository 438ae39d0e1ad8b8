//! Error types for cryptographic operations.

use thiserror::Error;

/// Errors produced by hashing and identity operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CryptoError {
    /// A hex digest string could not be parsed.
    #[error("invalid digest '{input}': {reason}")]
    InvalidDigest {
        /// The offending input, truncated for logging.
        input: String,
        /// Why parsing failed.
        reason: String,
    },

    /// A digest had the wrong byte length.
    #[error("invalid digest length: expected {expected} bytes, got {actual}")]
    InvalidDigestLength {
        /// Expected byte length.
        expected: usize,
        /// Actual byte length.
        actual: usize,
    },

    /// A private key was rejected by the curve implementation.
    #[error("invalid private key: {reason}")]
    InvalidPrivateKey {
        /// Why the key was rejected.
        reason: String,
    },

    /// A private key encoding had the wrong byte length.
    #[error("invalid private key length: expected {expected} bytes, got {actual}")]
    InvalidKeyLength {
        /// Expected byte length.
        expected: usize,
        /// Actual byte length.
        actual: usize,
    },

    /// The curve implementation refused to sign.
    #[error("signing failed: {reason}")]
    SigningFailed {
        /// The underlying failure.
        reason: String,
    },
}

impl CryptoError {
    /// Builds an [`CryptoError::InvalidDigest`] with the input truncated to a
    /// loggable size.
    pub fn invalid_digest(input: &str, reason: impl Into<String>) -> Self {
        let mut shown: String = input.chars().take(80).collect();
        if input.chars().count() > 80 {
            shown.push('…');
        }
        Self::InvalidDigest {
            input: shown,
            reason: reason.into(),
        }
    }
}

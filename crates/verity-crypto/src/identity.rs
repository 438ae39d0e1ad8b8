//! Operator signing identity (secp256k1).
//!
//! Signatures are deterministic (RFC 6979) with low-S normalization, so the
//! same digest always yields the same bytes. Addresses follow the usual
//! derivation: Keccak-256 of the uncompressed public key, last 20 bytes.

use k256::ecdsa::SigningKey;
use verity_types::{Address, H256};
use zeroize::Zeroize;

use crate::errors::CryptoError;
use crate::hashing::keccak256;

/// Recoverable ECDSA signature (65 bytes, `r || s || v`).
///
/// `v` is the recovery byte in the 27/28 convention.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct OperatorSignature([u8; 65]);

impl OperatorSignature {
    /// Raw signature bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8; 65] {
        &self.0
    }

    /// Renders the signature as `0x`-prefixed lowercase hex (132 characters).
    #[must_use]
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }
}

impl std::fmt::Debug for OperatorSignature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "OperatorSignature({})", self.to_hex())
    }
}

/// secp256k1 keypair identifying an operator.
///
/// The secret never leaves the struct except through [`to_bytes`]; drop
/// zeroizes the exported copy.
///
/// [`to_bytes`]: SigningIdentity::to_bytes
pub struct SigningIdentity {
    signing_key: SigningKey,
}

impl SigningIdentity {
    /// Generates a random identity.
    #[must_use]
    pub fn generate() -> Self {
        let signing_key = SigningKey::random(&mut rand::thread_rng());
        Self { signing_key }
    }

    /// Creates an identity from secret key bytes (32 bytes).
    pub fn from_bytes(bytes: [u8; 32]) -> Result<Self, CryptoError> {
        let signing_key =
            SigningKey::from_bytes((&bytes).into()).map_err(|e| CryptoError::InvalidPrivateKey {
                reason: e.to_string(),
            })?;
        Ok(Self { signing_key })
    }

    /// Creates an identity from a hex-encoded secret key, with or without a
    /// `0x` prefix.
    pub fn from_hex(input: &str) -> Result<Self, CryptoError> {
        let trimmed = input.trim();
        let body = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed);

        let mut raw = hex::decode(body).map_err(|e| CryptoError::InvalidPrivateKey {
            reason: e.to_string(),
        })?;
        if raw.len() != 32 {
            let actual = raw.len();
            raw.zeroize();
            return Err(CryptoError::InvalidKeyLength {
                expected: 32,
                actual,
            });
        }

        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(&raw);
        raw.zeroize();

        let identity = Self::from_bytes(bytes);
        bytes.zeroize();
        identity
    }

    /// The operator address: Keccak-256 of the uncompressed public key
    /// (without the 0x04 prefix), last 20 bytes.
    #[must_use]
    pub fn address(&self) -> Address {
        let pubkey_bytes = self.signing_key.verifying_key().to_encoded_point(false);
        let hash = keccak256(&pubkey_bytes.as_bytes()[1..]);
        Address::from_slice(&hash.as_bytes()[12..])
    }

    /// Signs a precomputed 32-byte digest.
    pub fn sign_digest(&self, digest: &H256) -> Result<OperatorSignature, CryptoError> {
        let (signature, recovery_id) = self
            .signing_key
            .sign_prehash_recoverable(digest.as_bytes())
            .map_err(|e| CryptoError::SigningFailed {
                reason: e.to_string(),
            })?;

        let sig_bytes: [u8; 64] = signature.to_bytes().into();
        let mut raw = [0u8; 65];
        raw[..64].copy_from_slice(&sig_bytes);
        raw[64] = recovery_id.to_byte() + 27;
        Ok(OperatorSignature(raw))
    }

    /// Exports the secret key bytes (for persistence).
    #[must_use]
    pub fn to_bytes(&self) -> [u8; 32] {
        self.signing_key.to_bytes().into()
    }
}

impl std::fmt::Debug for SigningIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never print key material.
        write!(f, "SigningIdentity({:#x})", self.address())
    }
}

impl Drop for SigningIdentity {
    fn drop(&mut self) {
        // Zeroize secret key material
        let mut bytes: [u8; 32] = self.signing_key.to_bytes().into();
        bytes.zeroize();
    }
}

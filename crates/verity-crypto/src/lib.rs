//! # Verity Crypto - Hashing and Identity Primitives
//!
//! ## Components
//!
//! | Module | Algorithm | Use Case |
//! |--------|-----------|----------|
//! | `hashing` | SHA-256, Keccak-256 | Content addresses, digests |
//! | `integrity` | SHA-256 | Blob possession verification |
//! | `message` | Keccak-256 | Attestation and custody digests |
//! | `identity` | secp256k1 | Operator signing identity |
//!
//! Content hashes are SHA-256 over the exact byte sequence, rendered as
//! lowercase hex with a `0x` prefix. Attestation digests are Keccak-256 over
//! a fixed-width packed encoding; the byte layout is a wire contract with
//! the attestation service and must not change independently.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod errors;
pub mod hashing;
pub mod identity;
pub mod integrity;
pub mod message;

// Re-exports
pub use errors::CryptoError;
pub use hashing::{content_hash, digest_hex, keccak256, parse_digest};
pub use identity::{OperatorSignature, SigningIdentity};
pub use integrity::{verify_blob, verify_content};
pub use message::{attestation_message, custody_message};

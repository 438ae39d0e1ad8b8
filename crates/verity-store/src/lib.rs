//! # Verity Store - Content-Addressed Blob Store
//!
//! A blob is stored under the SHA-256 digest of its bytes and fetched back
//! by that digest. Three pieces live here:
//!
//! | Module | Role |
//! |--------|------|
//! | `engine` | In-memory content-addressed map |
//! | `service` | HTTP surface (`POST /blob`, `GET /blob/{hash}`, `GET /health`) |
//! | `client` | Fetch/upload client used by the worker and the upload path |
//!
//! The storage engine is deliberately simple: the store is a demo
//! collaborator of the attestation pipeline, not a durability layer.

#![warn(clippy::all)]

pub mod client;
pub mod config;
pub mod engine;
pub mod service;

// Re-export main types
pub use client::{BlobSource, BlobStoreClient, StoreError};
pub use config::StoreConfig;
pub use engine::MemoryStore;
pub use service::BlobStoreService;

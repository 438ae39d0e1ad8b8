//! # Verity Worker - Data Availability Attestation Worker
//!
//! ## Components
//!
//! | Module | Purpose |
//! |--------|---------|
//! | `config` | Startup settings and one-shot feature evaluation |
//! | `retry` | Bounded polling policy |
//! | `relay` | Attestation relay seam, HTTP and in-memory |
//! | `attestation` | Signing requests and proof polling |
//! | `listener` | Ledger subscriptions onto the worker bus |
//! | `handlers` | Post-created and custody pipelines |
//! | `lifecycle` | Phase-1 voting, custody rounds, finalization |
//!
//! The worker is event-driven end to end. The listener republishes ledger
//! observations onto the bus, handlers react and publish what they did
//! about it, and the lifecycle driver sequences the adapter calls that
//! settle a post's availability status.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod attestation;
pub mod config;
pub mod handlers;
pub mod lifecycle;
pub mod listener;
pub mod relay;
pub mod retry;

// Re-exports
pub use attestation::AttestationClient;
pub use config::{
    evaluate_attestation, evaluate_ledger, evaluate_signing_key, AttestationParams, Feature,
    LedgerParams, WorkerConfig, DEFAULT_STORE_URL,
};
pub use handlers::{CustodyChallengeHandler, PostCreatedHandler};
pub use lifecycle::LifecycleDriver;
pub use listener::LedgerListener;
pub use relay::{AttestationUnavailable, HttpRelayClient, InMemoryRelay, RelayApi};
pub use retry::{poll_until, RetryPolicy};

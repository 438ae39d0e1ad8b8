//! # Verity Ledger
//!
//! The registry and adapter contract surface the worker talks to, in two
//! interchangeable forms:
//!
//! | Module | Provides |
//! |--------|----------|
//! | [`api`] | `RegistryApi` / `AdapterApi` traits and subscription notifications |
//! | [`memory`] | `DevLedger`, the in-memory ledger for tests and local development |
//! | [`bridge`] | `LedgerBridge`, the WebSocket JSON-RPC client |
//! | [`errors`] | `LedgerError` |
//!
//! Subscriptions from either implementation arrive as `broadcast` receivers,
//! so the listener does not care which one it was wired to.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod api;
pub mod bridge;
pub mod errors;
pub mod memory;

pub use api::{AdapterApi, ChallengeStartedNotification, PostCreatedNotification, RegistryApi};
pub use bridge::LedgerBridge;
pub use errors::LedgerError;
pub use memory::{DevLedger, SubmittedProof, DEFAULT_RESPONSE_WINDOW};

//! # Verity Bus - Event Bus for the Attestation Worker
//!
//! Ledger observations and worker outcomes flow through a single in-process
//! bus instead of direct calls between components.
//!
//! ```text
//! ┌──────────────┐                    ┌──────────────┐
//! │   Listener   │                    │   Handlers   │
//! │              │    publish()       │              │
//! │              │ ──────┐            │              │
//! └──────────────┘       │            └──────────────┘
//!                        ▼                    ↑
//!                  ┌──────────────┐          │
//!                  │  Event Bus   │ ─────────┘
//!                  └──────────────┘  subscribe()
//! ```
//!
//! The listener republishes what it sees on the ledger (`PostCreated`,
//! `CustodyChallengeStarted`); handlers consume those and publish what they
//! did about it (`BlobVerified`, `AttestationSettled`, custody outcomes).
//! Subscribing to the outcome topics is how tests and operators observe the
//! pipeline without reaching into handler internals.

// Nursery lints that are too strict
#![allow(clippy::missing_const_for_fn)]
// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

pub mod events;
pub mod publisher;
pub mod subscriber;

// Re-export main types
pub use events::{AttestationOutcome, DaEvent, EventFilter, EventSource, EventTopic};
pub use publisher::{EventPublisher, InMemoryEventBus};
pub use subscriber::{EventStream, Subscription, SubscriptionError};

/// Maximum events to buffer per subscriber before backpressure.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 256;

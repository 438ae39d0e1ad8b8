//! # Attestation Events
//!
//! Defines all event types that flow through the worker bus.

use serde::{Deserialize, Serialize};
use verity_types::{Address, Commitment, ContentHash, PostId};

/// All events that can be published to the event bus.
///
/// Ledger observations are republished by the listener; everything else is
/// an outcome reported by a worker handler.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum DaEvent {
    // =========================================================================
    // LEDGER OBSERVATIONS (republished by the listener)
    // =========================================================================
    /// A post was anchored on the ledger and awaits verification.
    /// Triggers the fetch → verify → attest pipeline.
    PostCreated {
        /// Ledger-assigned post identifier.
        post_id: PostId,
        /// Content address of the blob backing the post.
        content_hash: ContentHash,
        /// Cryptographic commitment anchored with the post.
        commitment: Commitment,
        /// Account that created the post.
        creator: Address,
    },

    /// A custody challenge round opened for an operator.
    /// Triggers the custody responder.
    CustodyChallengeStarted {
        /// Post under challenge.
        post_id: PostId,
        /// Operator expected to respond.
        operator: Address,
        /// Index of this challenge within its round.
        challenge_index: u64,
    },

    // =========================================================================
    // WORKER OUTCOMES
    // =========================================================================
    /// The worker fetched a blob and checked it against its content hash.
    BlobVerified {
        /// Post the blob belongs to.
        post_id: PostId,
        /// Content hash the blob was checked against.
        content_hash: ContentHash,
        /// Whether the recomputed digest matched.
        matched: bool,
    },

    /// The attestation flow for a post ran to completion.
    AttestationSettled {
        /// Post the attestation covers.
        post_id: PostId,
        /// How the flow ended.
        outcome: AttestationOutcome,
    },

    /// A custody proof was submitted for a challenge.
    CustodyProofSubmitted {
        /// Post under challenge.
        post_id: PostId,
        /// Operator the proof was submitted for.
        operator: Address,
        /// Index of this challenge within its round.
        challenge_index: u64,
    },

    /// A custody challenge was observed but not answered.
    CustodySkipped {
        /// Post under challenge.
        post_id: PostId,
        /// Operator the challenge addressed.
        operator: Address,
        /// Index of this challenge within its round.
        challenge_index: u64,
        /// Why no proof was submitted.
        reason: String,
    },
}

/// Terminal state of one attestation flow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum AttestationOutcome {
    /// The relay accepted the request and returned an aggregation proof
    /// within the polling window.
    ProofObtained {
        /// Relay-assigned request identifier.
        request_id: String,
        /// Epoch the signature was requested for.
        epoch: u64,
    },

    /// The relay accepted the request but no proof arrived within the
    /// polling window. The request stays pending on the relay side.
    ProofPending {
        /// Relay-assigned request identifier.
        request_id: String,
        /// Epoch the signature was requested for.
        epoch: u64,
    },

    /// The flow stopped before a proof could be requested or polled.
    Failed {
        /// What went wrong.
        reason: String,
    },
}

impl DaEvent {
    /// Get the topic for this event (for filtering).
    #[must_use]
    pub fn topic(&self) -> EventTopic {
        match self {
            Self::PostCreated { .. } => EventTopic::Registry,
            Self::CustodyChallengeStarted { .. } => EventTopic::Adapter,
            Self::BlobVerified { .. } => EventTopic::Verification,
            Self::AttestationSettled { .. } => EventTopic::Attestation,
            Self::CustodyProofSubmitted { .. } | Self::CustodySkipped { .. } => EventTopic::Custody,
        }
    }

    /// Get the originating side of the bus.
    #[must_use]
    pub fn source(&self) -> EventSource {
        match self {
            Self::PostCreated { .. } | Self::CustodyChallengeStarted { .. } => EventSource::Ledger,
            Self::BlobVerified { .. }
            | Self::AttestationSettled { .. }
            | Self::CustodyProofSubmitted { .. }
            | Self::CustodySkipped { .. } => EventSource::Worker,
        }
    }
}

/// Event topics for subscription filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventTopic {
    /// Post registry observations.
    Registry,
    /// Custody adapter observations.
    Adapter,
    /// Blob fetch and integrity outcomes.
    Verification,
    /// Attestation relay outcomes.
    Attestation,
    /// Custody responder outcomes.
    Custody,
    /// All events (no filtering).
    All,
}

/// Which side of the bus an event originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventSource {
    /// Republished ledger observation.
    Ledger,
    /// Worker handler outcome.
    Worker,
}

/// Filter for subscribing to specific events.
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    /// Topics to include. Empty means all topics.
    pub topics: Vec<EventTopic>,
    /// Sources to include. Empty means all sources.
    pub sources: Vec<EventSource>,
}

impl EventFilter {
    /// Create a filter that accepts all events.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Create a filter for specific topics.
    #[must_use]
    pub fn topics(topics: Vec<EventTopic>) -> Self {
        Self {
            topics,
            sources: Vec::new(),
        }
    }

    /// Create a filter for events from one side of the bus.
    #[must_use]
    pub fn from_sources(sources: Vec<EventSource>) -> Self {
        Self {
            topics: Vec::new(),
            sources,
        }
    }

    /// Check if an event matches this filter.
    #[must_use]
    pub fn matches(&self, event: &DaEvent) -> bool {
        let topic_match = self.topics.is_empty()
            || self.topics.contains(&EventTopic::All)
            || self.topics.contains(&event.topic());

        let source_match = self.sources.is_empty() || self.sources.contains(&event.source());

        topic_match && source_match
    }
}

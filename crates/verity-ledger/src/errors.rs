//! # Ledger Errors
//!
//! Failure modes of the registry and adapter surfaces. `Connect` is the one
//! startup-fatal case; everything else is surfaced per call and left to the
//! caller's policy.

use thiserror::Error;
use verity_types::{Address, PostId};

/// Errors surfaced by registry and adapter operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// The bridge endpoint was unreachable or the URL was invalid.
    #[error("cannot connect to ledger bridge at {endpoint}: {reason}")]
    Connect {
        /// The configured WebSocket endpoint.
        endpoint: String,
        /// Transport-level failure description.
        reason: String,
    },

    /// A bridge call or subscription failed after startup.
    #[error("ledger rpc failed: {reason}")]
    Rpc {
        /// Failure description from the transport or the remote.
        reason: String,
    },

    /// No post exists under the given id.
    #[error("unknown post {post_id:#x}")]
    UnknownPost {
        /// The id that failed the lookup.
        post_id: PostId,
    },

    /// A custody operation ran against a post with no open round.
    #[error("no active custody round for post {post_id:#x}")]
    NoActiveRound {
        /// The post missing a round.
        post_id: PostId,
    },

    /// A submission named an operator that was never challenged this round.
    #[error("no challenge for operator {operator:#x} on post {post_id:#x}")]
    UnknownChallenge {
        /// The challenged post.
        post_id: PostId,
        /// The operator with no outstanding challenge.
        operator: Address,
    },

    /// Finalization attempted while responses were still being accepted.
    #[error("challenge response window still open for post {post_id:#x} ({remaining_ms} ms remaining)")]
    WindowOpen {
        /// The post whose round is still open.
        post_id: PostId,
        /// Milliseconds until the window elapses.
        remaining_ms: u64,
    },
}

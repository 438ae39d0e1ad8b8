//! # Post Lifecycle Status
//!
//! The six-state lifecycle a post moves through on the ledger. Wire values
//! are fixed (0..=5) and shared with the contracts; the worker treats every
//! value as externally authoritative.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// A status value outside the known wire range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("invalid post status value: {got} (expected 0..=5)")]
pub struct InvalidStatus {
    /// The rejected wire value.
    pub got: u8,
}

/// Lifecycle status of a [`crate::Post`].
///
/// Transitions are monotone toward a terminal value (`Available` /
/// `Unavailable`), except that both phase-1 outcomes may still resolve to
/// `Inconclusive` when custody evidence conflicts with the vote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
#[repr(u8)]
pub enum PostStatus {
    /// Created, awaiting the phase-1 soundness vote.
    Pending = 0,
    /// Phase-1 vote failed.
    Phase1Failed = 1,
    /// Phase-1 vote passed.
    Phase1Passed = 2,
    /// Terminal: content held in custody, available.
    Available = 3,
    /// Terminal: content not available.
    Unavailable = 4,
    /// Custody evidence conflicted with the phase-1 vote.
    Inconclusive = 5,
}

impl PostStatus {
    /// Decode a ledger wire value.
    pub fn from_wire(value: u8) -> Result<Self, InvalidStatus> {
        match value {
            0 => Ok(Self::Pending),
            1 => Ok(Self::Phase1Failed),
            2 => Ok(Self::Phase1Passed),
            3 => Ok(Self::Available),
            4 => Ok(Self::Unavailable),
            5 => Ok(Self::Inconclusive),
            got => Err(InvalidStatus { got }),
        }
    }

    /// The ledger wire value.
    #[must_use]
    pub fn wire(self) -> u8 {
        self as u8
    }

    /// Whether this status can no longer change.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Available | Self::Unavailable | Self::Inconclusive)
    }

    /// Human-readable name, as shown by status dashboards.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Phase1Failed => "Phase1Failed",
            Self::Phase1Passed => "Phase1Passed",
            Self::Available => "Available",
            Self::Unavailable => "Unavailable",
            Self::Inconclusive => "Inconclusive",
        }
    }
}

impl fmt::Display for PostStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<PostStatus> for u8 {
    fn from(status: PostStatus) -> Self {
        status.wire()
    }
}

impl TryFrom<u8> for PostStatus {
    type Error = InvalidStatus;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::from_wire(value)
    }
}

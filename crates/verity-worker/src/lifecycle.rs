//! Finalization lifecycle driver.
//!
//! Sequences the adapter calls that carry a post from anchored to a
//! terminal availability status: the phase-1 soundness vote, the custody
//! round, and finalization once the response window has elapsed. Custody
//! responses arrive concurrently through the bus while the window is open.

use std::sync::Arc;
use tracing::info;
use verity_ledger::{AdapterApi, LedgerError};
use verity_types::{Address, PostId, PostStatus};

/// Stake split reported for a passed verification vote.
pub const PHASE1_PASS_STAKE: (u64, u64) = (80, 100);

/// Stake split reported for a failed verification vote.
pub const PHASE1_FAIL_STAKE: (u64, u64) = (40, 100);

/// Drives phase-1 voting, custody rounds and finalization.
pub struct LifecycleDriver {
    adapter: Arc<dyn AdapterApi>,
    voters: Vec<Address>,
}

impl LifecycleDriver {
    /// Driver reporting votes on behalf of `voters`.
    pub fn new(adapter: Arc<dyn AdapterApi>, voters: Vec<Address>) -> Self {
        Self { adapter, voters }
    }

    /// Records the phase-1 verification outcome with a canned stake split.
    pub async fn record_phase1(&self, post_id: PostId, passed: bool) -> Result<(), LedgerError> {
        let (yes_stake, total_stake) = if passed {
            PHASE1_PASS_STAKE
        } else {
            PHASE1_FAIL_STAKE
        };
        self.adapter
            .record_phase1_result(post_id, passed, yes_stake, total_stake, self.voters.clone())
            .await?;
        info!(post_id = %post_id, passed, "Phase-1 result recorded");
        Ok(())
    }

    /// Opens a custody round for the post.
    pub async fn start_custody_round(&self, post_id: PostId) -> Result<(), LedgerError> {
        self.adapter.start_custody_challenges(post_id).await?;
        info!(post_id = %post_id, "Custody round opened");
        Ok(())
    }

    /// Waits out the response window, then finalizes the post.
    pub async fn finalize_after_window(&self, post_id: PostId) -> Result<PostStatus, LedgerError> {
        let window = self.adapter.challenge_response_window().await?;
        info!(post_id = %post_id, ?window, "Waiting out the challenge response window");
        tokio::time::sleep(window).await;

        let status = self.adapter.finalize_post_from_custody(post_id).await?;
        info!(post_id = %post_id, status = %status, "Post finalized");
        Ok(status)
    }

    /// Runs a full custody round: open, wait out the window, finalize.
    pub async fn custody_round(&self, post_id: PostId) -> Result<PostStatus, LedgerError> {
        self.start_custody_round(post_id).await?;
        self.finalize_after_window(post_id).await
    }
}

//! Bounded polling.
//!
//! [`poll_until`] drives an attempt closure a fixed number of times with a
//! fixed pause in between. "Not ready yet" (`Ok(None)`) consumes an attempt;
//! a hard failure (`Err`) aborts the attempts that remain.

use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;

/// How many times to poll and how long to pause between polls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total number of attempts, including the first.
    pub max_attempts: u32,
    /// Pause between consecutive attempts.
    pub interval: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 2,
            interval: Duration::from_secs(1),
        }
    }
}

/// Polls `attempt` until it yields a value, fails, or the policy is spent.
///
/// The closure receives the zero-based attempt index. No pause follows the
/// final attempt.
///
/// # Returns
///
/// - `Ok(Some(value))` as soon as one attempt produces a value
/// - `Ok(None)` when every attempt reported "not ready"
/// - `Err(e)` on the first hard failure; later attempts never run
pub async fn poll_until<T, E, F, Fut>(policy: RetryPolicy, mut attempt: F) -> Result<Option<T>, E>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<Option<T>, E>>,
{
    for index in 0..policy.max_attempts {
        if let Some(value) = attempt(index).await? {
            return Ok(Some(value));
        }
        if index + 1 < policy.max_attempts {
            sleep(policy.interval).await;
        }
    }
    Ok(None)
}

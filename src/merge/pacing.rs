//! Courtesy delays between tracker calls during a merge sweep.

use std::time::Duration;

/// Fixed pauses the sweep inserts to let the tracker settle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pacing {
    /// Before processing each pull request.
    pub before_pull_request: Duration,
    /// Before re-fetching a pull request to check mergeability.
    pub before_rebase_check: Duration,
    /// Before the single re-fetch when mergeability is still unknown.
    pub unknown_retry: Duration,
    /// Before each merge call.
    pub before_merge: Duration,
    /// After each successful merge.
    pub after_merge: Duration,
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            before_pull_request: Duration::from_secs(2),
            before_rebase_check: Duration::from_secs(3),
            unknown_retry: Duration::from_secs(2),
            before_merge: Duration::from_secs(1),
            after_merge: Duration::from_secs(3),
        }
    }
}

impl Pacing {
    /// No pauses at all.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            before_pull_request: Duration::ZERO,
            before_rebase_check: Duration::ZERO,
            unknown_retry: Duration::ZERO,
            before_merge: Duration::ZERO,
            after_merge: Duration::ZERO,
        }
    }
}

/// Sleeps for `delay`, skipping the timer entirely for zero.
pub(crate) async fn pause(delay: Duration) {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}

//! The scheduled merge sweep over every open pull request.

use std::fmt;

use tracing::Instrument;

use crate::error::BotError;
use crate::github::{
    CommentSink, LabelSink, MergeMethod, MergeRequest, PullRequest, PullRequestSource,
    PullRequestState,
};
use crate::labels::merge_verdict;
use crate::replies::Replies;

use super::pacing::{Pacing, pause};
use super::rebase_gate::RebaseGate;

/// What happened to one pull request during a sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeResult {
    /// The pull request was merged.
    Merged,
    /// The pull request was left alone.
    Skipped,
    /// Checking or merging the pull request failed.
    Errored,
}

impl fmt::Display for MergeResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Merged => "merged",
            Self::Skipped => "skipped",
            Self::Errored => "errored",
        })
    }
}

/// Per-pull-request record of a sweep.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeOutcome {
    /// Pull request number.
    pub number: u64,
    /// What happened.
    pub result: MergeResult,
    /// Why, in a few words.
    pub reason: String,
}

impl MergeOutcome {
    fn new(number: u64, result: MergeResult, reason: impl Into<String>) -> Self {
        Self {
            number,
            result,
            reason: reason.into(),
        }
    }
}

/// Totals of a completed sweep.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeSummary {
    /// Pull requests merged.
    pub merged: usize,
    /// Every outcome, in processing order.
    pub outcomes: Vec<MergeOutcome>,
}

impl MergeSummary {
    /// Number of merges performed by the sweep.
    #[must_use]
    pub const fn jobs_done(&self) -> usize {
        self.merged
    }
}

/// Pages through open pull requests and merges the eligible ones.
pub struct MergeOrchestrator<'a, T: ?Sized> {
    tracker: &'a T,
    gate: RebaseGate<'a, T>,
    method: MergeMethod,
    pacing: Pacing,
}

impl<'a, T> MergeOrchestrator<'a, T>
where
    T: PullRequestSource + LabelSink + CommentSink + ?Sized,
{
    /// Creates an orchestrator merging with `method`.
    #[must_use]
    pub const fn new(
        tracker: &'a T,
        replies: &'a Replies,
        method: MergeMethod,
        pacing: Pacing,
    ) -> Self {
        Self {
            tracker,
            gate: RebaseGate::new(tracker, replies, pacing),
            method,
            pacing,
        }
    }

    /// Sweeps every page from `start_page` until an empty page.
    ///
    /// Pull requests merged before a failure stay merged.
    ///
    /// # Errors
    ///
    /// Returns [`BotError::Tracker`] when a page cannot be listed, and
    /// [`BotError::MergeRun`] after any page on which a pull request errored.
    pub async fn cron_merge(&self, start_page: u32) -> Result<MergeSummary, BotError> {
        let mut summary = MergeSummary::default();
        let mut page = start_page;
        loop {
            tracing::info!(page, "starting merge sweep page");
            let pulls = self.tracker.list_open_pull_requests(page).await?;
            if pulls.is_empty() {
                tracing::info!(merged = summary.merged, "merge sweep finished");
                return Ok(summary);
            }

            let mut failures = Vec::new();
            for pull in &pulls {
                pause(self.pacing.before_pull_request).await;
                let outcome = self
                    .process(pull)
                    .instrument(tracing::info_span!("pull_request", number = pull.number))
                    .await;
                match outcome.result {
                    MergeResult::Merged => summary.merged += 1,
                    MergeResult::Errored => failures.push(outcome.clone()),
                    MergeResult::Skipped => {}
                }
                summary.outcomes.push(outcome);
            }

            if !failures.is_empty() {
                tracing::error!(page, failed = failures.len(), "merge sweep page had failures");
                return Err(BotError::MergeRun {
                    page,
                    merged: summary.merged,
                    failures,
                });
            }
            page += 1;
        }
    }

    async fn process(&self, pull: &PullRequest) -> MergeOutcome {
        let number = pull.number;
        match pull.state {
            PullRequestState::Closed => {
                return MergeOutcome::new(number, MergeResult::Skipped, "closed");
            }
            PullRequestState::Locked => {
                return MergeOutcome::new(number, MergeResult::Skipped, "locked");
            }
            PullRequestState::Open => {}
        }

        let check = match self.gate.check_needs_rebase(number).await {
            Ok(check) => check,
            Err(error) => {
                tracing::error!(%error, "rebase check failed");
                return MergeOutcome::new(number, MergeResult::Errored, error.to_string());
            }
        };
        if check.blocking {
            return MergeOutcome::new(number, MergeResult::Skipped, "not mergeable");
        }

        let verdict = merge_verdict(&check.labels);
        if !verdict.is_eligible() {
            tracing::info!(labels = %check.labels, reason = verdict.reason(), "not merging");
            return MergeOutcome::new(number, MergeResult::Skipped, verdict.reason());
        }

        pause(self.pacing.before_merge).await;
        let request = MergeRequest::for_pull_request(self.method, number, &pull.title);
        tracing::info!(method = %self.method, "merging");
        match self.tracker.merge_pull_request(number, &request).await {
            Ok(()) => {
                pause(self.pacing.after_merge).await;
                MergeOutcome::new(
                    number,
                    MergeResult::Merged,
                    format!("merged with {}", self.method),
                )
            }
            Err(error) => {
                tracing::error!(%error, "merge failed");
                MergeOutcome::new(number, MergeResult::Errored, error.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::{fixture, rstest};

    use super::{MergeOrchestrator, MergeResult};
    use crate::error::BotError;
    use crate::github::models::{Mergeable, PullRequestState};
    use crate::github::test_support::{InMemoryTracker, PullRequestSeed};
    use crate::github::{MergeMethod, MergeRequest, PAGE_SIZE};
    use crate::labels::{APPROVED, HOLD, LGTM};
    use crate::merge::Pacing;
    use crate::replies::Replies;

    #[fixture]
    fn replies() -> Replies {
        Replies::new().expect("templates should compile")
    }

    fn ready(number: u64) -> PullRequestSeed {
        PullRequestSeed::new(number)
            .labelled(&[LGTM, APPROVED])
            .mergeable(&[Mergeable::Yes])
    }

    #[rstest]
    #[tokio::test]
    async fn merges_eligible_and_skips_held(replies: Replies) {
        let tracker = InMemoryTracker::default();
        tracker.add_pull_request(ready(1));
        tracker.add_pull_request(ready(2).labelled(&[HOLD]));
        let orchestrator =
            MergeOrchestrator::new(&tracker, &replies, MergeMethod::Merge, Pacing::none());

        let summary = orchestrator.cron_merge(1).await.expect("sweep should succeed");

        assert_eq!(summary.jobs_done(), 1);
        let merged: Vec<u64> = tracker.merges().iter().map(|(number, _)| *number).collect();
        assert_eq!(merged, [1]);
        let second = summary
            .outcomes
            .iter()
            .find(|outcome| outcome.number == 2)
            .expect("second pull request should have an outcome");
        assert_eq!(second.result, MergeResult::Skipped);
        assert_eq!(second.reason, "on hold");
    }

    #[rstest]
    #[tokio::test]
    async fn squash_merges_are_titled(replies: Replies) {
        let tracker = InMemoryTracker::default();
        tracker.add_pull_request(ready(7).titled("Add parser"));
        let orchestrator =
            MergeOrchestrator::new(&tracker, &replies, MergeMethod::Squash, Pacing::none());

        orchestrator.cron_merge(1).await.expect("sweep should succeed");

        assert_eq!(
            tracker.merges(),
            [(
                7,
                MergeRequest {
                    method: MergeMethod::Squash,
                    commit_title: Some("Add parser (#7)".to_owned()),
                }
            )]
        );
    }

    #[rstest]
    #[tokio::test]
    async fn locked_pull_requests_are_not_fetched(replies: Replies) {
        let tracker = InMemoryTracker::default();
        tracker.add_pull_request(ready(3).in_state(PullRequestState::Locked));
        let orchestrator =
            MergeOrchestrator::new(&tracker, &replies, MergeMethod::Merge, Pacing::none());

        let summary = orchestrator.cron_merge(1).await.expect("sweep should succeed");

        assert_eq!(summary.jobs_done(), 0);
        assert!(tracker.pull_request_fetches().is_empty());
    }

    #[rstest]
    #[tokio::test]
    async fn walks_every_page(replies: Replies) {
        let tracker = InMemoryTracker::default();
        let total = u64::from(PAGE_SIZE) + 5;
        for number in 1..=total {
            tracker.add_pull_request(PullRequestSeed::new(number).mergeable(&[Mergeable::Yes]));
        }
        tracker.add_pull_request(ready(total + 1));
        let orchestrator =
            MergeOrchestrator::new(&tracker, &replies, MergeMethod::Merge, Pacing::none());

        let summary = orchestrator.cron_merge(1).await.expect("sweep should succeed");

        assert_eq!(summary.outcomes.len(), usize::try_from(total + 1).expect("fits"));
        assert_eq!(summary.jobs_done(), 1);
    }

    #[rstest]
    #[tokio::test]
    async fn failures_are_collected_then_reported(replies: Replies) {
        let tracker = InMemoryTracker::default();
        tracker.add_pull_request(ready(1));
        tracker.add_pull_request(ready(2));
        tracker.add_pull_request(ready(3));
        tracker.fail_merges_of(2);
        let orchestrator =
            MergeOrchestrator::new(&tracker, &replies, MergeMethod::Merge, Pacing::none());

        let result = orchestrator.cron_merge(1).await;

        let Err(BotError::MergeRun {
            page,
            merged,
            failures,
        }) = result
        else {
            panic!("expected MergeRun error, got {result:?}");
        };
        assert_eq!(page, 1);
        assert_eq!(merged, 2);
        assert_eq!(failures.len(), 1);
        assert_eq!(failures.first().map(|outcome| outcome.number), Some(2));
        let merged_numbers: Vec<u64> = tracker.merges().iter().map(|(number, _)| *number).collect();
        assert_eq!(merged_numbers, [1, 3]);
    }

    #[rstest]
    #[tokio::test]
    async fn page_listing_failure_is_fatal(replies: Replies) {
        let tracker = InMemoryTracker::default();
        let orchestrator =
            MergeOrchestrator::new(&tracker, &replies, MergeMethod::Merge, Pacing::none());

        let result = orchestrator.cron_merge(0).await;

        assert!(
            matches!(result, Err(BotError::Tracker(_))),
            "expected Tracker error, got {result:?}"
        );
    }
}

//! Mergeability polling and the `needs-rebase` label/comment pair.

use crate::error::BotError;
use crate::github::{CommentSink, LabelSink, Mergeable, PullRequestSource};
use crate::labels::{LabelSet, NEEDS_REBASE};
use crate::replies::Replies;

use super::pacing::{Pacing, pause};

/// Result of a rebase check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RebaseCheck {
    /// Whether the pull request must not be merged now.
    pub blocking: bool,
    /// Labels as they stand after the gate's own mutation.
    pub labels: LabelSet,
}

/// Keeps `needs-rebase` in step with the tracker's mergeability flag.
pub struct RebaseGate<'a, T: ?Sized> {
    tracker: &'a T,
    replies: &'a Replies,
    pacing: Pacing,
}

impl<'a, T> RebaseGate<'a, T>
where
    T: PullRequestSource + LabelSink + CommentSink + ?Sized,
{
    /// Creates a gate over `tracker`.
    #[must_use]
    pub const fn new(tracker: &'a T, replies: &'a Replies, pacing: Pacing) -> Self {
        Self {
            tracker,
            replies,
            pacing,
        }
    }

    /// Re-reads the pull request's mergeability and reconciles the
    /// `needs-rebase` label with it.
    ///
    /// Mergeability still unknown after one retry blocks without touching
    /// labels. A conflicting pull request gains the label and an explanatory
    /// comment once; a clean one loses the label.
    ///
    /// # Errors
    ///
    /// Returns [`BotError::Tracker`] when a fetch or mutation fails, or
    /// [`BotError::Template`] when the comment cannot be rendered.
    pub async fn check_needs_rebase(&self, number: u64) -> Result<RebaseCheck, BotError> {
        pause(self.pacing.before_rebase_check).await;
        let mut pull = self.tracker.pull_request(number).await?;
        if pull.mergeable == Mergeable::Unknown {
            tracing::debug!(number, "mergeability not computed yet, retrying once");
            pause(self.pacing.unknown_retry).await;
            pull = self.tracker.pull_request(number).await?;
        }

        let mut labels = pull.labels;
        let flagged = labels.contains(NEEDS_REBASE);
        tracing::info!(number, mergeable = ?pull.mergeable, needs_rebase = flagged, "checked mergeability");

        let blocking = match (pull.mergeable, flagged) {
            (Mergeable::Unknown, _) => {
                tracing::warn!(number, "could not determine mergeability, skipping");
                true
            }
            (Mergeable::Yes, false) => false,
            (Mergeable::Yes, true) => {
                tracing::debug!(number, "removing {NEEDS_REBASE}");
                self.tracker.remove_label(number, NEEDS_REBASE).await?;
                labels.remove(NEEDS_REBASE);
                false
            }
            (Mergeable::No, false) => {
                tracing::info!(number, "adding {NEEDS_REBASE}");
                self.tracker
                    .add_labels(number, &[NEEDS_REBASE.to_owned()])
                    .await?;
                labels.insert(NEEDS_REBASE);
                let message = self.replies.needs_rebase()?;
                self.tracker.create_comment(number, &message).await?;
                true
            }
            (Mergeable::No, true) => true,
        };

        Ok(RebaseCheck { blocking, labels })
    }
}

//! Reactions to pull request lifecycle events other than comments.

use crate::error::BotError;
use crate::github::LabelSink;
use crate::labels::LGTM;

/// Drops `LGTM` after new commits land on a pull request, so the changes
/// have to be looked at again. Returns whether the label was removed.
///
/// # Errors
///
/// Returns [`BotError::Tracker`] when the labels cannot be read or updated.
pub async fn pull_request_updated<T>(tracker: &T, number: u64) -> Result<bool, BotError>
where
    T: LabelSink + ?Sized,
{
    let labels = tracker.labels(number).await?;
    if !labels.contains(LGTM) {
        tracing::debug!(number, "no LGTM to withdraw");
        return Ok(false);
    }
    tracker.remove_label(number, LGTM).await?;
    tracing::info!(number, "withdrew LGTM after new commits");
    Ok(true)
}

//! CLI operation handlers.
//!
//! Each invocation performs exactly one task, chosen by
//! [`BotConfig::operation_mode`]:
//! - [`cron_merge`]: scheduled merge sweep
//! - [`comment`]: run the commands in a comment
//! - [`pull_request_updated`]: withdraw `LGTM` after new commits
//!
//! Output formatting utilities are in [`output`].

use std::io::Write;

use prowbot::{BotConfig, BotError, OperationMode, Replies, Tracker, TrackerError};

pub mod comment;
pub mod cron_merge;
pub mod output;
pub mod pull_request_updated;

/// Runs the configured operation against `tracker`.
///
/// # Errors
///
/// Returns [`TrackerError::Configuration`] (wrapped) when no operation is
/// selected, and the operation's own error otherwise.
pub async fn run_operation<T, W>(
    config: &BotConfig,
    tracker: &T,
    writer: &mut W,
) -> Result<(), BotError>
where
    T: Tracker + ?Sized,
    W: Write,
{
    let replies = Replies::new()?;
    match config.operation_mode() {
        OperationMode::CronMerge => cron_merge::run(config, tracker, &replies, writer).await,
        OperationMode::Comment => comment::run(config, tracker, &replies, writer).await,
        OperationMode::PullRequestUpdated => {
            pull_request_updated::run(config, tracker, writer).await
        }
        OperationMode::Unspecified => Err(BotError::Tracker(TrackerError::Configuration {
            message: "no operation selected (use --cron-merge, --pull-request-updated, \
                      or --comment-body)"
                .to_owned(),
        })),
    }
}

#[cfg(test)]
mod tests {
    use prowbot::github::test_support::InMemoryTracker;
    use prowbot::{BotConfig, BotError, TrackerError};
    use rstest::rstest;

    use super::run_operation;

    #[rstest]
    #[tokio::test]
    async fn refuses_to_guess_an_operation() {
        let tracker = InMemoryTracker::default();
        let mut buffer = Vec::new();

        let result = run_operation(&BotConfig::default(), &tracker, &mut buffer).await;

        assert!(matches!(
            result,
            Err(BotError::Tracker(TrackerError::Configuration { .. }))
        ));
        assert!(buffer.is_empty());
    }
}

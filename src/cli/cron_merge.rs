//! Scheduled merge sweep.

use std::io::Write;

use prowbot::{BotConfig, BotError, MergeOrchestrator, Replies, Tracker};

use super::output::write_merge_summary;

/// Sweeps open pull requests from `start_page` on and merges the eligible
/// ones.
///
/// # Errors
///
/// Returns [`BotError::MergeRun`] when pull requests on a page failed, and
/// configuration or tracker errors otherwise.
pub async fn run<T, W>(
    config: &BotConfig,
    tracker: &T,
    replies: &Replies,
    writer: &mut W,
) -> Result<(), BotError>
where
    T: Tracker + ?Sized,
    W: Write,
{
    let method = config.merge_method()?;
    tracing::info!(%method, start_page = config.start_page, "starting merge sweep");
    let orchestrator = MergeOrchestrator::new(tracker, replies, method, config.pacing());
    let summary = orchestrator.cron_merge(config.start_page).await?;
    tracing::info!(merged = summary.jobs_done(), "merge sweep finished");
    write_merge_summary(writer, &summary)
}

#[cfg(test)]
mod tests {
    use prowbot::github::Mergeable;
    use prowbot::github::test_support::{InMemoryTracker, PullRequestSeed};
    use prowbot::labels::{APPROVED, LGTM};
    use prowbot::{BotConfig, Replies};
    use rstest::rstest;

    use super::run;

    #[rstest]
    #[tokio::test]
    async fn reports_merged_pull_requests() {
        let tracker = InMemoryTracker::default();
        tracker.add_pull_request(
            PullRequestSeed::new(5)
                .labelled(&[LGTM, APPROVED])
                .mergeable(&[Mergeable::Yes]),
        );
        let config = BotConfig {
            cron_merge: true,
            disable_pacing: true,
            ..Default::default()
        };
        let replies = Replies::new().expect("templates should compile");
        let mut buffer = Vec::new();

        run(&config, &tracker, &replies, &mut buffer)
            .await
            .expect("sweep should succeed");

        let output = String::from_utf8(buffer).expect("output should be UTF-8");
        assert!(output.contains("#5 merged"), "unexpected output: {output}");
        assert!(output.contains("Merged 1 of 1 pull request(s)"));
    }
}

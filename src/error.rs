//! Errors surfaced by the bot's decision layer.

use thiserror::Error;

use crate::github::TrackerError;
use crate::merge::MergeOutcome;

/// Failures of a bot task: authorization, input validation, merge runs, and
/// tracker access.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BotError {
    /// The acting user lacks the role a command requires.
    #[error("{user} is not authorized to run /{command}: {reason}")]
    Unauthorized {
        /// Login of the acting user.
        user: String,
        /// Command that was refused.
        command: String,
        /// Human-readable explanation of the denial.
        reason: String,
    },

    /// The `OWNERS` document could not be interpreted.
    #[error("OWNERS file is malformed: {message}")]
    MalformedOwners {
        /// Description of the structural problem.
        message: String,
    },

    /// The label catalogue could not be interpreted.
    #[error("label catalogue is malformed: {message}")]
    MalformedLabelCatalogue {
        /// Description of the structural problem.
        message: String,
    },

    /// The triggering payload lacked an identifier the task needs.
    #[error("event payload is missing the {field}")]
    MissingIdentifier {
        /// Name of the missing field.
        field: &'static str,
    },

    /// A command's arguments could not be acted on.
    #[error("/{command}: {message}")]
    CommandArguments {
        /// Command whose arguments were rejected.
        command: String,
        /// Explanation of the problem.
        message: String,
    },

    /// `/approve cancel` found no approval by the bot to dismiss.
    #[error("no approval by {robot} found to dismiss on #{number}")]
    NoReviewToDismiss {
        /// Pull request number.
        number: u64,
        /// Bot login whose reviews were searched.
        robot: String,
    },

    /// None of the users named by `/cc` may be requested for review.
    #[error(
        "no authorized users found; only organization members, collaborators, \
         or users who have commented on this issue may be cc'd"
    )]
    NoAuthorizedUsers,

    /// A merge sweep page finished with per-pull-request failures.
    #[error(
        "merge run failed on page {page} after {merged} merge(s): {}",
        describe_failures(.failures)
    )]
    MergeRun {
        /// Page on which the failures were collected.
        page: u32,
        /// Pull requests merged before the run stopped.
        merged: usize,
        /// The errored outcomes of the page.
        failures: Vec<MergeOutcome>,
    },

    /// A reply template failed to render.
    #[error("reply template failed: {message}")]
    Template {
        /// Rendering error detail.
        message: String,
    },

    /// The remote tracker failed.
    #[error(transparent)]
    Tracker(#[from] TrackerError),
}

fn describe_failures(failures: &[MergeOutcome]) -> String {
    failures
        .iter()
        .map(|outcome| format!("#{}: {}", outcome.number, outcome.reason))
        .collect::<Vec<_>>()
        .join("; ")
}

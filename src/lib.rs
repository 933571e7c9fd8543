//! Prowbot library crate: a ChatOps review bot for GitHub repositories.
//!
//! The bot reacts to `/command` comments (`/lgtm`, `/approve`, `/hold`, and
//! friends) by mutating labels, reviews, and issue state after checking the
//! commenter against the repository's `OWNERS` file and membership signals.
//! A scheduled sweep merges every open pull request whose labels say it is
//! ready, keeping a `needs-rebase` label in step with GitHub's mergeability
//! flag along the way.

pub mod auth;
pub mod commands;
pub mod config;
pub mod error;
pub mod events;
pub mod github;
pub mod labels;
pub mod merge;
pub mod replies;

pub use commands::{CommandGate, CommandOutcome, CommentContext};
pub use config::{BotConfig, OperationMode};
pub use error::BotError;
pub use events::pull_request_updated;
pub use github::{
    MergeMethod, OctocrabTracker, PersonalAccessToken, RepositoryLocator, Tracker, TrackerError,
};
pub use labels::{LabelSet, mergeable_by_label};
pub use merge::{MergeOrchestrator, MergeSummary, Pacing, RebaseGate};
pub use replies::Replies;

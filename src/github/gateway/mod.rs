//! Collaborator interfaces onto the remote tracker, and their Octocrab
//! implementation.
//!
//! Every trait is bound to a single repository at construction time, so
//! callers only pass issue and pull request numbers. The trait-based design
//! lets the decision logic run against mocks or the in-memory tracker while
//! [`OctocrabTracker`] handles real HTTP requests.

mod client;
mod error_mapping;
mod identity;
mod issues;
mod labels;
mod owners;
mod pull_requests;
mod reviews;
mod types;


pub use client::OctocrabTracker;
pub use types::{MergeMethod, MergeRequest, PAGE_SIZE};

use async_trait::async_trait;

use crate::github::error::TrackerError;
use crate::github::models::{
    IssueComment, IssueState, LockReason, Milestone, PullRequest, Review,
};
use crate::labels::LabelSet;

/// Reads and merges pull requests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PullRequestSource: Send + Sync {
    /// Lists one page of open pull requests, [`PAGE_SIZE`] per page. `page`
    /// is 1-based; an empty vector means there are no more pages.
    async fn list_open_pull_requests(&self, page: u32) -> Result<Vec<PullRequest>, TrackerError>;

    /// Fetches a single pull request, including its mergeability.
    async fn pull_request(&self, number: u64) -> Result<PullRequest, TrackerError>;

    /// Merges a pull request.
    async fn merge_pull_request(
        &self,
        number: u64,
        request: &MergeRequest,
    ) -> Result<(), TrackerError>;
}

/// Mutates and reads issue labels. Adds and removes are idempotent.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LabelSink: Send + Sync {
    /// Adds labels; labels already present are left alone.
    async fn add_labels(&self, issue: u64, labels: &[String]) -> Result<(), TrackerError>;

    /// Removes one label; removing an absent label succeeds.
    async fn remove_label(&self, issue: u64, label: &str) -> Result<(), TrackerError>;

    /// Lists the labels currently attached.
    async fn labels(&self, issue: u64) -> Result<LabelSet, TrackerError>;
}

/// Creates, lists, and dismisses pull request reviews.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReviewSink: Send + Sync {
    /// Submits an `APPROVE` review as the bot.
    async fn approve(&self, number: u64, body: &str) -> Result<(), TrackerError>;

    /// Lists every review on the pull request, oldest first.
    async fn reviews(&self, number: u64) -> Result<Vec<Review>, TrackerError>;

    /// Dismisses a review with a message.
    async fn dismiss_review(
        &self,
        number: u64,
        review_id: u64,
        message: &str,
    ) -> Result<(), TrackerError>;
}

/// Posts and lists discussion comments.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommentSink: Send + Sync {
    /// Posts a comment.
    async fn create_comment(&self, issue: u64, body: &str) -> Result<(), TrackerError>;

    /// Lists every comment on the issue.
    async fn comments(&self, issue: u64) -> Result<Vec<IssueComment>, TrackerError>;
}

/// Fetches the documents that configure the bot from the repository itself.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OwnersSource: Send + Sync {
    /// Returns the raw `OWNERS` file at the repository root, or `None` when
    /// the repository has none.
    async fn owners_file(&self) -> Result<Option<String>, TrackerError>;

    /// Returns the raw `.github/labels.yaml` (or `.yml`) catalogue of the
    /// labels `/kind`, `/area`, and `/priority` may apply, or `None` when
    /// neither exists.
    async fn label_catalogue(&self) -> Result<Option<String>, TrackerError>;
}

/// Answers membership questions about a user.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentitySource: Send + Sync {
    /// Whether `user` belongs to the organization owning the repository.
    async fn is_org_member(&self, user: &str) -> Result<bool, TrackerError>;

    /// Whether `user` is a collaborator on the repository.
    async fn is_collaborator(&self, user: &str) -> Result<bool, TrackerError>;
}

/// Issue-level mutations used by the housekeeping commands.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IssueSink: Send + Sync {
    /// Opens or closes the issue.
    async fn set_state(&self, issue: u64, state: IssueState) -> Result<(), TrackerError>;

    /// Renames the issue.
    async fn set_title(&self, issue: u64, title: &str) -> Result<(), TrackerError>;

    /// Lists the repository's milestones.
    async fn milestones(&self) -> Result<Vec<Milestone>, TrackerError>;

    /// Assigns a milestone by number, or clears it with `None`.
    async fn set_milestone(&self, issue: u64, milestone: Option<u64>) -> Result<(), TrackerError>;

    /// Locks the conversation.
    async fn lock(&self, issue: u64, reason: Option<LockReason>) -> Result<(), TrackerError>;

    /// Removes assignees.
    async fn remove_assignees(&self, issue: u64, users: &[String]) -> Result<(), TrackerError>;

    /// Requests reviews from users.
    async fn request_reviewers(&self, number: u64, users: &[String]) -> Result<(), TrackerError>;

    /// Withdraws review requests.
    async fn remove_requested_reviewers(
        &self,
        number: u64,
        users: &[String],
    ) -> Result<(), TrackerError>;
}

/// Everything the bot needs from the tracker, implemented automatically for
/// any type providing each collaborator interface.
pub trait Tracker:
    PullRequestSource + LabelSink + ReviewSink + CommentSink + OwnersSource + IdentitySource + IssueSink
{
}

impl<T> Tracker for T where
    T: PullRequestSource
        + LabelSink
        + ReviewSink
        + CommentSink
        + OwnersSource
        + IdentitySource
        + IssueSink
        + ?Sized
{
}

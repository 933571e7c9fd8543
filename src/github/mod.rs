//! Tracker access: repository identity, domain models, and the collaborator
//! interfaces the bot acts through.
//!
//! The Octocrab implementation maps every failure into [`TrackerError`] so
//! that callers can surface precise failures without exposing Octocrab
//! internals.

pub mod error;
pub mod gateway;
pub mod locator;
pub mod models;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use error::TrackerError;
pub use gateway::{
    CommentSink, IdentitySource, IssueSink, LabelSink, MergeMethod, MergeRequest,
    OctocrabTracker, OwnersSource, PAGE_SIZE, PullRequestSource, ReviewSink, Tracker,
};
pub use locator::{PersonalAccessToken, RepositoryLocator, RepositoryName, RepositoryOwner};
pub use models::{
    IssueComment, IssueState, LockReason, Mergeable, Milestone, PullRequest, PullRequestState,
    Review, ReviewState,
};

#[cfg(test)]
pub use gateway::{
    MockCommentSink, MockIdentitySource, MockIssueSink, MockLabelSink, MockOwnersSource,
    MockPullRequestSource, MockReviewSink,
};

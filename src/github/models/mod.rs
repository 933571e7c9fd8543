//! Data models for pull requests, reviews, comments, and milestones.
//!
//! Types prefixed with `Api` are internal deserialisation targets that
//! convert into public domain types.

use serde::Deserialize;

use crate::labels::LabelSet;

/// Lifecycle state of a pull request as seen by the merge sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PullRequestState {
    /// Open and unlocked.
    #[default]
    Open,
    /// Closed or merged.
    Closed,
    /// Conversation locked; the bot leaves these alone.
    Locked,
}

/// Remote-computed mergeability. GitHub computes it asynchronously and
/// reports `null` until it is ready.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mergeable {
    /// Merges cleanly.
    Yes,
    /// Has conflicts with the base branch.
    No,
    /// Not yet computed.
    #[default]
    Unknown,
}

impl From<Option<bool>> for Mergeable {
    fn from(value: Option<bool>) -> Self {
        match value {
            Some(true) => Self::Yes,
            Some(false) => Self::No,
            None => Self::Unknown,
        }
    }
}

/// Pull request snapshot. The tracker owns the state of record; this is a
/// read that may already be stale.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PullRequest {
    /// Pull request number.
    pub number: u64,
    /// Title, used to build squash commit titles.
    pub title: String,
    /// Lifecycle state.
    pub state: PullRequestState,
    /// Labels currently attached.
    pub labels: LabelSet,
    /// Mergeability. Listing endpoints never compute it, so enumerated pull
    /// requests always carry `Unknown`.
    pub mergeable: Mergeable,
    /// Author login if present.
    pub author: Option<String>,
}

/// Review state reported by GitHub.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewState {
    /// An approving review.
    Approved,
    /// A review that was dismissed.
    Dismissed,
    /// Any other review state (commented, changes requested, pending).
    Other(String),
}

impl From<&str> for ReviewState {
    fn from(value: &str) -> Self {
        match value {
            "APPROVED" => Self::Approved,
            "DISMISSED" => Self::Dismissed,
            other => Self::Other(other.to_owned()),
        }
    }
}

/// Pull request review.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Review {
    /// Review identifier.
    pub id: u64,
    /// Author login.
    pub author: Option<String>,
    /// Review state.
    pub state: ReviewState,
}

/// Issue or pull request discussion comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueComment {
    /// Comment identifier.
    pub id: u64,
    /// Comment body.
    pub body: Option<String>,
    /// Author login.
    pub author: Option<String>,
}

/// Repository milestone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Milestone {
    /// Milestone number used when assigning it to an issue.
    pub number: u64,
    /// Milestone title as users type it.
    pub title: String,
}

/// Open or closed, as written by `/close` and `/reopen`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueState {
    /// Open.
    Open,
    /// Closed.
    Closed,
}

impl IssueState {
    /// Returns the API value for this state.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Closed => "closed",
        }
    }
}

/// Reason recorded when locking a conversation. A resolved conversation is
/// locked without one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockReason {
    /// Off-topic discussion.
    OffTopic,
    /// Discussion became too heated.
    TooHeated,
    /// Spam.
    Spam,
}

impl LockReason {
    /// Returns the API value for this reason.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OffTopic => "off-topic",
            Self::TooHeated => "too heated",
            Self::Spam => "spam",
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiPullRequest {
    pub(crate) number: u64,
    pub(crate) title: Option<String>,
    pub(crate) state: Option<String>,
    #[serde(default)]
    pub(crate) locked: bool,
    #[serde(default)]
    pub(crate) labels: Vec<ApiLabel>,
    pub(crate) mergeable: Option<bool>,
    pub(crate) user: Option<ApiUser>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiLabel {
    pub(crate) name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiUser {
    pub(crate) login: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiComment {
    pub(crate) id: u64,
    pub(crate) body: Option<String>,
    pub(crate) user: Option<ApiUser>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiReview {
    pub(crate) id: u64,
    pub(crate) user: Option<ApiUser>,
    pub(crate) state: String,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiMilestone {
    pub(crate) number: u64,
    pub(crate) title: String,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiContent {
    pub(crate) content: Option<String>,
    pub(crate) encoding: Option<String>,
}

impl From<ApiPullRequest> for PullRequest {
    fn from(value: ApiPullRequest) -> Self {
        let state = match (value.locked, value.state.as_deref()) {
            (true, _) => PullRequestState::Locked,
            (false, Some("closed")) => PullRequestState::Closed,
            (false, _) => PullRequestState::Open,
        };
        Self {
            number: value.number,
            title: value.title.unwrap_or_default(),
            state,
            labels: labels_from_api(value.labels),
            mergeable: value.mergeable.into(),
            author: value.user.and_then(|user| user.login),
        }
    }
}

pub(crate) fn labels_from_api(labels: Vec<ApiLabel>) -> LabelSet {
    labels.into_iter().map(|label| label.name).collect()
}

impl From<ApiComment> for IssueComment {
    fn from(value: ApiComment) -> Self {
        Self {
            id: value.id,
            body: value.body,
            author: value.user.and_then(|user| user.login),
        }
    }
}

impl From<ApiReview> for Review {
    fn from(value: ApiReview) -> Self {
        Self {
            id: value.id,
            author: value.user.and_then(|user| user.login),
            state: ReviewState::from(value.state.as_str()),
        }
    }
}

impl From<ApiMilestone> for Milestone {
    fn from(value: ApiMilestone) -> Self {
        Self {
            number: value.number,
            title: value.title,
        }
    }
}

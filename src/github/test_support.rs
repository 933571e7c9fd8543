//! In-memory tracker used by unit and behavioural tests.
//!
//! Implements every collaborator interface over a mutex-guarded map of
//! issues, recording the calls that tests need to assert on (merges,
//! mergeability fetches, posted comments).

use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use crate::github::error::TrackerError;
use crate::github::gateway::{
    CommentSink, IdentitySource, IssueSink, LabelSink, MergeRequest, OwnersSource, PAGE_SIZE,
    PullRequestSource, ReviewSink,
};
use crate::github::models::{
    IssueComment, IssueState, LockReason, Mergeable, Milestone, PullRequest, PullRequestState,
    Review, ReviewState,
};
use crate::labels::LabelSet;

/// Seed data for one pull request.
#[derive(Debug, Clone)]
pub struct PullRequestSeed {
    number: u64,
    title: String,
    author: Option<String>,
    labels: LabelSet,
    readings: VecDeque<Mergeable>,
    state: PullRequestState,
}

impl PullRequestSeed {
    /// An open pull request with no labels and unknown mergeability.
    #[must_use]
    pub fn new(number: u64) -> Self {
        Self {
            number,
            title: format!("Pull request {number}"),
            author: Some("author".to_owned()),
            labels: LabelSet::new(),
            readings: VecDeque::new(),
            state: PullRequestState::Open,
        }
    }

    /// Sets the title.
    #[must_use]
    pub fn titled(mut self, title: &str) -> Self {
        title.clone_into(&mut self.title);
        self
    }

    /// Sets the author login.
    #[must_use]
    pub fn authored_by(mut self, author: &str) -> Self {
        self.author = Some(author.to_owned());
        self
    }

    /// Attaches labels.
    #[must_use]
    pub fn labelled(mut self, labels: &[&str]) -> Self {
        for label in labels {
            self.labels.insert(*label);
        }
        self
    }

    /// Mergeability reported by successive single-PR fetches; the last
    /// reading repeats once the queue is drained.
    #[must_use]
    pub fn mergeable(mut self, readings: &[Mergeable]) -> Self {
        self.readings = readings.iter().copied().collect();
        self
    }

    /// Sets the lifecycle state.
    #[must_use]
    pub const fn in_state(mut self, state: PullRequestState) -> Self {
        self.state = state;
        self
    }
}

#[derive(Debug, Clone, Default)]
struct IssueRecord {
    title: String,
    author: Option<String>,
    labels: LabelSet,
    state: Option<PullRequestState>,
    readings: VecDeque<Mergeable>,
    is_pull_request: bool,
    milestone: Option<u64>,
    lock_reason: Option<Option<LockReason>>,
    assignees: BTreeSet<String>,
    requested_reviewers: BTreeSet<String>,
    reviews: Vec<StoredReview>,
}

#[derive(Debug, Clone)]
struct StoredReview {
    id: u64,
    author: String,
    state: ReviewState,
    body: String,
    dismissal: Option<String>,
}

/// Comment recorded by the in-memory tracker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostedComment {
    /// Issue the comment was posted on.
    pub issue: u64,
    /// Author login.
    pub author: String,
    /// Comment body.
    pub body: String,
}

#[derive(Debug, Default)]
struct State {
    issues: BTreeMap<u64, IssueRecord>,
    comments: Vec<PostedComment>,
    owners: Option<String>,
    label_catalogue: Option<String>,
    org_members: BTreeSet<String>,
    collaborators: BTreeSet<String>,
    milestones: Vec<Milestone>,
    merges: Vec<(u64, MergeRequest)>,
    pull_request_fetches: Vec<u64>,
    next_review_id: u64,
    failing_identity: bool,
    failing_fetches: BTreeSet<u64>,
    failing_merges: BTreeSet<u64>,
    failing_comments: bool,
}

/// Mutex-guarded fake of the remote tracker.
#[derive(Debug)]
pub struct InMemoryTracker {
    bot: String,
    state: Mutex<State>,
}

impl Default for InMemoryTracker {
    fn default() -> Self {
        Self::new("github-ci-robot")
    }
}

impl InMemoryTracker {
    /// Creates an empty tracker; `bot` authors every comment and review the
    /// bot writes.
    #[must_use]
    pub fn new(bot: &str) -> Self {
        Self {
            bot: bot.to_owned(),
            state: Mutex::new(State::default()),
        }
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Adds a pull request.
    pub fn add_pull_request(&self, seed: PullRequestSeed) {
        let record = IssueRecord {
            title: seed.title,
            author: seed.author,
            labels: seed.labels,
            state: Some(seed.state),
            readings: seed.readings,
            is_pull_request: true,
            ..IssueRecord::default()
        };
        self.state().issues.insert(seed.number, record);
    }

    /// Adds a plain issue.
    pub fn add_issue(&self, number: u64, author: &str, labels: &[&str]) {
        let record = IssueRecord {
            title: format!("Issue {number}"),
            author: Some(author.to_owned()),
            labels: labels.iter().copied().collect(),
            state: Some(PullRequestState::Open),
            ..IssueRecord::default()
        };
        self.state().issues.insert(number, record);
    }

    /// Sets the raw owners document.
    pub fn set_owners(&self, document: &str) {
        self.state().owners = Some(document.to_owned());
    }

    /// Sets the raw label catalogue.
    pub fn set_label_catalogue(&self, document: &str) {
        self.state().label_catalogue = Some(document.to_owned());
    }

    /// Registers organization members. Logins match case-insensitively, as
    /// on GitHub.
    pub fn add_org_members(&self, users: &[&str]) {
        self.state()
            .org_members
            .extend(users.iter().map(|user| user.to_ascii_lowercase()));
    }

    /// Registers repository collaborators, matched case-insensitively.
    pub fn add_collaborators(&self, users: &[&str]) {
        self.state()
            .collaborators
            .extend(users.iter().map(|user| user.to_ascii_lowercase()));
    }

    /// Registers a milestone.
    pub fn add_milestone(&self, number: u64, title: &str) {
        self.state().milestones.push(Milestone {
            number,
            title: title.to_owned(),
        });
    }

    /// Records a comment written by `author`, as a human would.
    pub fn add_comment(&self, issue: u64, author: &str, body: &str) {
        self.state().comments.push(PostedComment {
            issue,
            author: author.to_owned(),
            body: body.to_owned(),
        });
    }

    /// Records a review written by `author`.
    pub fn add_review(&self, number: u64, author: &str, state: ReviewState) {
        let mut guard = self.state();
        guard.next_review_id += 1;
        let id = guard.next_review_id;
        if let Some(record) = guard.issues.get_mut(&number) {
            record.reviews.push(StoredReview {
                id,
                author: author.to_owned(),
                state,
                body: String::new(),
                dismissal: None,
            });
        }
    }

    /// Makes every identity lookup fail with a network error.
    pub fn fail_identity_checks(&self) {
        self.state().failing_identity = true;
    }

    /// Makes single-PR fetches of `number` fail.
    pub fn fail_fetches_of(&self, number: u64) {
        self.state().failing_fetches.insert(number);
    }

    /// Makes merges of `number` fail.
    pub fn fail_merges_of(&self, number: u64) {
        self.state().failing_merges.insert(number);
    }

    /// Makes comment creation fail.
    pub fn fail_comment_posts(&self) {
        self.state().failing_comments = true;
    }

    /// Current labels of an issue.
    #[must_use]
    pub fn labels_of(&self, issue: u64) -> LabelSet {
        self.state()
            .issues
            .get(&issue)
            .map(|record| record.labels.clone())
            .unwrap_or_default()
    }

    /// Current lifecycle state of an issue.
    #[must_use]
    pub fn state_of(&self, issue: u64) -> Option<PullRequestState> {
        self.state().issues.get(&issue).and_then(|record| record.state)
    }

    /// Current title of an issue.
    #[must_use]
    pub fn title_of(&self, issue: u64) -> Option<String> {
        self.state()
            .issues
            .get(&issue)
            .map(|record| record.title.clone())
    }

    /// Current milestone number of an issue.
    #[must_use]
    pub fn milestone_of(&self, issue: u64) -> Option<u64> {
        self.state()
            .issues
            .get(&issue)
            .and_then(|record| record.milestone)
    }

    /// Lock reason, `Some(None)` when locked without a reason.
    #[must_use]
    pub fn lock_of(&self, issue: u64) -> Option<Option<LockReason>> {
        self.state()
            .issues
            .get(&issue)
            .and_then(|record| record.lock_reason)
    }

    /// Users with a pending review request.
    #[must_use]
    pub fn requested_reviewers_of(&self, number: u64) -> Vec<String> {
        self.state()
            .issues
            .get(&number)
            .map(|record| record.requested_reviewers.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Assigns users, as a human would.
    pub fn assign(&self, issue: u64, users: &[&str]) {
        if let Some(record) = self.state().issues.get_mut(&issue) {
            record
                .assignees
                .extend(users.iter().map(|user| (*user).to_owned()));
        }
    }

    /// Requests reviews, as a human would.
    pub fn request_review(&self, number: u64, users: &[&str]) {
        if let Some(record) = self.state().issues.get_mut(&number) {
            record
                .requested_reviewers
                .extend(users.iter().map(|user| (*user).to_owned()));
        }
    }

    /// Current assignees.
    #[must_use]
    pub fn assignees_of(&self, issue: u64) -> Vec<String> {
        self.state()
            .issues
            .get(&issue)
            .map(|record| record.assignees.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Comments posted by the bot on `issue`.
    #[must_use]
    pub fn bot_comments_on(&self, issue: u64) -> Vec<String> {
        self.state()
            .comments
            .iter()
            .filter(|comment| comment.issue == issue && comment.author == self.bot)
            .map(|comment| comment.body.clone())
            .collect()
    }

    /// Reviews on a pull request as `(id, author, state, dismissal message)`.
    #[must_use]
    pub fn reviews_of(&self, number: u64) -> Vec<(u64, String, ReviewState, Option<String>)> {
        self.state()
            .issues
            .get(&number)
            .map(|record| {
                record
                    .reviews
                    .iter()
                    .map(|review| {
                        (
                            review.id,
                            review.author.clone(),
                            review.state.clone(),
                            review.dismissal.clone(),
                        )
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Body of the latest review on a pull request.
    #[must_use]
    pub fn latest_review_body(&self, number: u64) -> Option<String> {
        self.state()
            .issues
            .get(&number)
            .and_then(|record| record.reviews.last())
            .map(|review| review.body.clone())
    }

    /// Merges performed so far, in order.
    #[must_use]
    pub fn merges(&self) -> Vec<(u64, MergeRequest)> {
        self.state().merges.clone()
    }

    /// Single-PR fetches performed so far, in order.
    #[must_use]
    pub fn pull_request_fetches(&self) -> Vec<u64> {
        self.state().pull_request_fetches.clone()
    }

    fn network_error(operation: &str) -> TrackerError {
        TrackerError::Network {
            message: format!("{operation} failed: connection reset"),
        }
    }

    fn not_found(what: &str, number: u64) -> TrackerError {
        TrackerError::Api {
            message: format!("{what} #{number} failed with status 404 Not Found: Not Found"),
        }
    }
}

fn snapshot(number: u64, record: &IssueRecord, mergeable: Mergeable) -> PullRequest {
    PullRequest {
        number,
        title: record.title.clone(),
        state: record.state.unwrap_or_default(),
        labels: record.labels.clone(),
        mergeable,
        author: record.author.clone(),
    }
}

#[async_trait]
impl PullRequestSource for InMemoryTracker {
    async fn list_open_pull_requests(&self, page: u32) -> Result<Vec<PullRequest>, TrackerError> {
        if page == 0 {
            return Err(TrackerError::InvalidPagination {
                message: "page must be at least 1".to_owned(),
            });
        }
        let per_page = usize::from(PAGE_SIZE);
        let skip = usize::try_from(page - 1)
            .unwrap_or(usize::MAX)
            .saturating_mul(per_page);
        let guard = self.state();
        Ok(guard
            .issues
            .iter()
            .filter(|(_, record)| {
                record.is_pull_request && record.state != Some(PullRequestState::Closed)
            })
            .skip(skip)
            .take(per_page)
            .map(|(number, record)| snapshot(*number, record, Mergeable::Unknown))
            .collect())
    }

    async fn pull_request(&self, number: u64) -> Result<PullRequest, TrackerError> {
        let mut guard = self.state();
        guard.pull_request_fetches.push(number);
        if guard.failing_fetches.contains(&number) {
            return Err(Self::network_error("pull request"));
        }
        let record = guard
            .issues
            .get_mut(&number)
            .filter(|record| record.is_pull_request)
            .ok_or_else(|| Self::not_found("pull request", number))?;
        let mergeable = if record.readings.len() > 1 {
            record.readings.pop_front().unwrap_or_default()
        } else {
            record.readings.front().copied().unwrap_or_default()
        };
        Ok(snapshot(number, record, mergeable))
    }

    async fn merge_pull_request(
        &self,
        number: u64,
        request: &MergeRequest,
    ) -> Result<(), TrackerError> {
        let mut guard = self.state();
        if guard.failing_merges.contains(&number) {
            return Err(TrackerError::Api {
                message: format!(
                    "merge pull request failed with status 405 Method Not Allowed: \
                     pull request #{number} is not mergeable"
                ),
            });
        }
        let record = guard
            .issues
            .get_mut(&number)
            .ok_or_else(|| Self::not_found("merge pull request", number))?;
        record.state = Some(PullRequestState::Closed);
        guard.merges.push((number, request.clone()));
        Ok(())
    }
}

#[async_trait]
impl LabelSink for InMemoryTracker {
    async fn add_labels(&self, issue: u64, labels: &[String]) -> Result<(), TrackerError> {
        let mut guard = self.state();
        let record = guard
            .issues
            .get_mut(&issue)
            .ok_or_else(|| Self::not_found("add labels", issue))?;
        for label in labels {
            record.labels.insert(label.clone());
        }
        Ok(())
    }

    async fn remove_label(&self, issue: u64, label: &str) -> Result<(), TrackerError> {
        let mut guard = self.state();
        let record = guard
            .issues
            .get_mut(&issue)
            .ok_or_else(|| Self::not_found("remove label", issue))?;
        record.labels.remove(label);
        Ok(())
    }

    async fn labels(&self, issue: u64) -> Result<LabelSet, TrackerError> {
        self.state()
            .issues
            .get(&issue)
            .map(|record| record.labels.clone())
            .ok_or_else(|| Self::not_found("list labels", issue))
    }
}

#[async_trait]
impl ReviewSink for InMemoryTracker {
    async fn approve(&self, number: u64, body: &str) -> Result<(), TrackerError> {
        let mut guard = self.state();
        guard.next_review_id += 1;
        let id = guard.next_review_id;
        let record = guard
            .issues
            .get_mut(&number)
            .ok_or_else(|| Self::not_found("create review", number))?;
        record.reviews.push(StoredReview {
            id,
            author: self.bot.clone(),
            state: ReviewState::Approved,
            body: body.to_owned(),
            dismissal: None,
        });
        Ok(())
    }

    async fn reviews(&self, number: u64) -> Result<Vec<Review>, TrackerError> {
        self.state()
            .issues
            .get(&number)
            .map(|record| {
                record
                    .reviews
                    .iter()
                    .map(|review| Review {
                        id: review.id,
                        author: Some(review.author.clone()),
                        state: review.state.clone(),
                    })
                    .collect()
            })
            .ok_or_else(|| Self::not_found("list reviews", number))
    }

    async fn dismiss_review(
        &self,
        number: u64,
        review_id: u64,
        message: &str,
    ) -> Result<(), TrackerError> {
        let mut guard = self.state();
        let review = guard
            .issues
            .get_mut(&number)
            .and_then(|record| record.reviews.iter_mut().find(|review| review.id == review_id))
            .ok_or_else(|| Self::not_found("dismiss review", review_id))?;
        review.state = ReviewState::Dismissed;
        review.dismissal = Some(message.to_owned());
        Ok(())
    }
}

#[async_trait]
impl CommentSink for InMemoryTracker {
    async fn create_comment(&self, issue: u64, body: &str) -> Result<(), TrackerError> {
        let mut guard = self.state();
        if guard.failing_comments {
            return Err(Self::network_error("create comment"));
        }
        guard.comments.push(PostedComment {
            issue,
            author: self.bot.clone(),
            body: body.to_owned(),
        });
        Ok(())
    }

    async fn comments(&self, issue: u64) -> Result<Vec<IssueComment>, TrackerError> {
        Ok(self
            .state()
            .comments
            .iter()
            .zip(1_u64..)
            .filter(|(comment, _)| comment.issue == issue)
            .map(|(comment, id)| IssueComment {
                id,
                body: Some(comment.body.clone()),
                author: Some(comment.author.clone()),
            })
            .collect())
    }
}

#[async_trait]
impl OwnersSource for InMemoryTracker {
    async fn owners_file(&self) -> Result<Option<String>, TrackerError> {
        Ok(self.state().owners.clone())
    }

    async fn label_catalogue(&self) -> Result<Option<String>, TrackerError> {
        Ok(self.state().label_catalogue.clone())
    }
}

#[async_trait]
impl IdentitySource for InMemoryTracker {
    async fn is_org_member(&self, user: &str) -> Result<bool, TrackerError> {
        let guard = self.state();
        if guard.failing_identity {
            return Err(Self::network_error("check org membership"));
        }
        Ok(guard.org_members.contains(&user.to_ascii_lowercase()))
    }

    async fn is_collaborator(&self, user: &str) -> Result<bool, TrackerError> {
        let guard = self.state();
        if guard.failing_identity {
            return Err(Self::network_error("check collaborator"));
        }
        Ok(guard.collaborators.contains(&user.to_ascii_lowercase()))
    }
}

#[async_trait]
impl IssueSink for InMemoryTracker {
    async fn set_state(&self, issue: u64, state: IssueState) -> Result<(), TrackerError> {
        let mut guard = self.state();
        let record = guard
            .issues
            .get_mut(&issue)
            .ok_or_else(|| Self::not_found("update issue state", issue))?;
        record.state = Some(match state {
            IssueState::Open => PullRequestState::Open,
            IssueState::Closed => PullRequestState::Closed,
        });
        Ok(())
    }

    async fn set_title(&self, issue: u64, title: &str) -> Result<(), TrackerError> {
        let mut guard = self.state();
        let record = guard
            .issues
            .get_mut(&issue)
            .ok_or_else(|| Self::not_found("update issue title", issue))?;
        title.clone_into(&mut record.title);
        Ok(())
    }

    async fn milestones(&self) -> Result<Vec<Milestone>, TrackerError> {
        Ok(self.state().milestones.clone())
    }

    async fn set_milestone(&self, issue: u64, milestone: Option<u64>) -> Result<(), TrackerError> {
        let mut guard = self.state();
        let record = guard
            .issues
            .get_mut(&issue)
            .ok_or_else(|| Self::not_found("update issue milestone", issue))?;
        record.milestone = milestone;
        Ok(())
    }

    async fn lock(&self, issue: u64, reason: Option<LockReason>) -> Result<(), TrackerError> {
        let mut guard = self.state();
        let record = guard
            .issues
            .get_mut(&issue)
            .ok_or_else(|| Self::not_found("lock issue", issue))?;
        record.lock_reason = Some(reason);
        Ok(())
    }

    async fn remove_assignees(&self, issue: u64, users: &[String]) -> Result<(), TrackerError> {
        let mut guard = self.state();
        let record = guard
            .issues
            .get_mut(&issue)
            .ok_or_else(|| Self::not_found("remove assignees", issue))?;
        for user in users {
            record.assignees.remove(user);
        }
        Ok(())
    }

    async fn request_reviewers(&self, number: u64, users: &[String]) -> Result<(), TrackerError> {
        let mut guard = self.state();
        let record = guard
            .issues
            .get_mut(&number)
            .ok_or_else(|| Self::not_found("request reviewers", number))?;
        record.requested_reviewers.extend(users.iter().cloned());
        Ok(())
    }

    async fn remove_requested_reviewers(
        &self,
        number: u64,
        users: &[String],
    ) -> Result<(), TrackerError> {
        let mut guard = self.state();
        let record = guard
            .issues
            .get_mut(&number)
            .ok_or_else(|| Self::not_found("remove requested reviewers", number))?;
        for user in users {
            record.requested_reviewers.remove(user);
        }
        Ok(())
    }
}

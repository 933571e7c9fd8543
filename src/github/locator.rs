//! Repository identity wrappers and API path construction.

use url::Url;

use super::error::TrackerError;

const PUBLIC_API_BASE: &str = "https://api.github.com";

/// Repository owner wrapper to avoid stringly typed parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryOwner(String);

impl RepositoryOwner {
    pub(crate) fn new(value: &str) -> Result<Self, TrackerError> {
        if value.is_empty() {
            return Err(TrackerError::MissingPathSegments);
        }
        Ok(Self(value.to_owned()))
    }

    /// Borrow the owner value.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Repository name wrapper to prevent parameter mix-ups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryName(String);

impl RepositoryName {
    pub(crate) fn new(value: &str) -> Result<Self, TrackerError> {
        if value.is_empty() {
            return Err(TrackerError::MissingPathSegments);
        }
        Ok(Self(value.to_owned()))
    }

    /// Borrow the repository name.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Personal access token wrapper enforcing presence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonalAccessToken(String);

impl PersonalAccessToken {
    /// Validates that the token is non-empty and trims whitespace.
    ///
    /// # Errors
    ///
    /// Returns `TrackerError::MissingToken` when the supplied string is blank.
    pub fn new(token: impl AsRef<str>) -> Result<Self, TrackerError> {
        let trimmed = token.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TrackerError::MissingToken);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the token value.
    #[must_use]
    pub const fn value(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for PersonalAccessToken {
    fn as_ref(&self) -> &str {
        self.value()
    }
}

/// The repository the bot acts on, plus the API base it talks to.
///
/// # Example
///
/// ```
/// use prowbot::github::locator::RepositoryLocator;
///
/// let locator = RepositoryLocator::parse("octo/repo").expect("should parse slug");
/// assert_eq!(locator.owner().as_str(), "octo");
/// assert_eq!(locator.repository().as_str(), "repo");
/// assert_eq!(locator.api_base().as_str(), "https://api.github.com/");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryLocator {
    api_base: Url,
    owner: RepositoryOwner,
    repository: RepositoryName,
}

impl RepositoryLocator {
    /// Creates a repository locator for `github.com`.
    ///
    /// # Errors
    ///
    /// Returns `TrackerError::MissingPathSegments` when owner or repo is empty.
    pub fn from_owner_repo(owner: &str, repo: &str) -> Result<Self, TrackerError> {
        Self::with_api_base(PUBLIC_API_BASE, owner, repo)
    }

    /// Creates a repository locator against an explicit API base, such as a
    /// GitHub Enterprise `https://ghe.example.com/api/v3` endpoint.
    ///
    /// # Errors
    ///
    /// Returns `TrackerError::InvalidUrl` when the API base cannot be parsed
    /// and `TrackerError::MissingPathSegments` when owner or repo is empty.
    pub fn with_api_base(api_base: &str, owner: &str, repo: &str) -> Result<Self, TrackerError> {
        let parsed =
            Url::parse(api_base).map_err(|error| TrackerError::InvalidUrl(error.to_string()))?;
        Ok(Self {
            api_base: parsed,
            owner: RepositoryOwner::new(owner)?,
            repository: RepositoryName::new(repo)?,
        })
    }

    /// Parses an `owner/repo` slug, the form GitHub Actions exposes in
    /// `GITHUB_REPOSITORY`.
    ///
    /// # Errors
    ///
    /// Returns `TrackerError::MissingPathSegments` when either half is absent.
    pub fn parse(slug: &str) -> Result<Self, TrackerError> {
        let (owner, repo) = slug
            .trim()
            .split_once('/')
            .ok_or(TrackerError::MissingPathSegments)?;
        if repo.contains('/') {
            return Err(TrackerError::MissingPathSegments);
        }
        Self::from_owner_repo(owner, repo)
    }

    /// API base URL.
    #[must_use]
    pub const fn api_base(&self) -> &Url {
        &self.api_base
    }

    /// Repository owner, which doubles as the organization for membership
    /// checks.
    #[must_use]
    pub const fn owner(&self) -> &RepositoryOwner {
        &self.owner
    }

    /// Repository name.
    #[must_use]
    pub const fn repository(&self) -> &RepositoryName {
        &self.repository
    }

    fn repo_path(&self, suffix: &str) -> String {
        format!(
            "/repos/{}/{}/{suffix}",
            self.owner.as_str(),
            self.repository.as_str()
        )
    }

    pub(crate) fn pulls_path(&self) -> String {
        self.repo_path("pulls")
    }

    pub(crate) fn pull_request_path(&self, number: u64) -> String {
        self.repo_path(&format!("pulls/{number}"))
    }

    pub(crate) fn merge_path(&self, number: u64) -> String {
        self.repo_path(&format!("pulls/{number}/merge"))
    }

    pub(crate) fn reviews_path(&self, number: u64) -> String {
        self.repo_path(&format!("pulls/{number}/reviews"))
    }

    pub(crate) fn dismissal_path(&self, number: u64, review_id: u64) -> String {
        self.repo_path(&format!("pulls/{number}/reviews/{review_id}/dismissals"))
    }

    pub(crate) fn requested_reviewers_path(&self, number: u64) -> String {
        self.repo_path(&format!("pulls/{number}/requested_reviewers"))
    }

    pub(crate) fn issue_path(&self, number: u64) -> String {
        self.repo_path(&format!("issues/{number}"))
    }

    pub(crate) fn comments_path(&self, number: u64) -> String {
        self.repo_path(&format!("issues/{number}/comments"))
    }

    pub(crate) fn labels_path(&self, number: u64) -> String {
        self.repo_path(&format!("issues/{number}/labels"))
    }

    pub(crate) fn label_path(&self, number: u64, label: &str) -> String {
        self.repo_path(&format!(
            "issues/{number}/labels/{}",
            encode_path_segment(label)
        ))
    }

    pub(crate) fn lock_path(&self, number: u64) -> String {
        self.repo_path(&format!("issues/{number}/lock"))
    }

    pub(crate) fn assignees_path(&self, number: u64) -> String {
        self.repo_path(&format!("issues/{number}/assignees"))
    }

    pub(crate) fn milestones_path(&self) -> String {
        self.repo_path("milestones")
    }

    pub(crate) fn contents_path(&self, file: &str) -> String {
        self.repo_path(&format!("contents/{file}"))
    }

    pub(crate) fn collaborator_path(&self, user: &str) -> String {
        self.repo_path(&format!("collaborators/{}", encode_path_segment(user)))
    }

    pub(crate) fn org_member_path(&self, user: &str) -> String {
        format!(
            "/orgs/{}/members/{}",
            self.owner.as_str(),
            encode_path_segment(user)
        )
    }
}

/// Percent-encodes a single path segment; label names may contain spaces
/// and slashes (`kind/bug`).
fn encode_path_segment(segment: &str) -> String {
    url::form_urlencoded::byte_serialize(segment.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

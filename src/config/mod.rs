//! Bot configuration loaded from CLI, environment, and files.
//!
//! Values merge through ortho-config's layers, lowest to highest:
//!
//! 1. **Defaults** – built-in values (`merge` strategy, `github-ci-robot`)
//! 2. **Configuration file** – `.prowbot.toml` in the current directory,
//!    home directory, or XDG config directory
//! 3. **Environment variables** – `PROWBOT_*`, plus `GITHUB_TOKEN` and
//!    `GITHUB_REPOSITORY` as fallbacks
//! 4. **Command-line arguments**
//!
//! # Configuration File
//!
//! ```toml
//! repository = "octo/widgets"
//! merge_method = "squash"
//! robot_name = "widgets-bot"
//! ```
//!
//! A workflow step then selects one operation per invocation, for example
//! `prowbot --cron-merge` on a schedule or
//! `prowbot --issue 7 --commenter alice --comment-body "/lgtm"` on an
//! `issue_comment` event.

use std::env;

use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};

use crate::commands::CommentContext;
use crate::github::{MergeMethod, RepositoryLocator, TrackerError};
use crate::merge::Pacing;

/// Login the bot acts as unless configured otherwise.
pub const DEFAULT_ROBOT_NAME: &str = "github-ci-robot";

/// The task a single invocation performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationMode {
    /// Sweep open pull requests and merge the eligible ones.
    CronMerge,
    /// Withdraw `LGTM` after new commits.
    PullRequestUpdated,
    /// Run the commands in a comment.
    Comment,
    /// Nothing was selected.
    Unspecified,
}

/// Bot configuration supporting CLI, environment, and file sources.
///
/// # Example
///
/// ```no_run
/// use prowbot::BotConfig;
/// use ortho_config::OrthoConfig;
///
/// let config = BotConfig::load().expect("failed to load configuration");
/// let locator = config.repository_locator().expect("repository required");
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, OrthoConfig)]
#[serde(default)]
#[ortho_config(
    prefix = "PROWBOT",
    discovery(
        dotfile_name = ".prowbot.toml",
        config_file_name = "prowbot.toml",
        app_name = "prowbot"
    )
)]
pub struct BotConfig {
    /// Personal access token or workflow token.
    ///
    /// Can be provided via:
    /// - CLI: `--token <TOKEN>` or `-t <TOKEN>`
    /// - Environment: `PROWBOT_TOKEN` or `GITHUB_TOKEN`
    /// - Config file: `token = "..."`
    #[ortho_config(cli_short = 't')]
    pub token: Option<String>,

    /// Repository as an `owner/repo` slug; `GITHUB_REPOSITORY` is used when
    /// neither this nor `owner` and `repo` are set.
    #[ortho_config(cli_short = 'R')]
    pub repository: Option<String>,

    /// Repository owner, taking precedence over `repository` together with
    /// `repo`.
    #[ortho_config(cli_short = 'o')]
    pub owner: Option<String>,

    /// Repository name.
    #[ortho_config(cli_short = 'r')]
    pub repo: Option<String>,

    /// API base URL for GitHub Enterprise, e.g.
    /// `https://ghe.example.com/api/v3`.
    #[ortho_config()]
    pub api_base: Option<String>,

    /// Merge strategy: `merge`, `squash`, or `rebase`.
    #[ortho_config(cli_short = 'm')]
    pub merge_method: Option<String>,

    /// Login of the bot account. Its own comments are ignored and its
    /// approvals are the ones `/approve cancel` dismisses.
    #[ortho_config()]
    pub robot_name: String,

    /// Runs the merge sweep.
    ///
    /// Note: `ortho_config` does not load boolean values from the
    /// environment, so operation flags come from the CLI or a file.
    #[ortho_config(cli_short = 'c')]
    pub cron_merge: bool,

    /// First listing page the merge sweep reads.
    #[ortho_config()]
    pub start_page: u32,

    /// Issue or pull request number of the triggering event.
    #[ortho_config(cli_short = 'i')]
    pub issue: Option<u64>,

    /// Body of the triggering comment.
    #[ortho_config(cli_short = 'b')]
    pub comment_body: Option<String>,

    /// Login of the commenter.
    #[ortho_config(cli_short = 'u')]
    pub commenter: Option<String>,

    /// Login of the issue or pull request author.
    #[ortho_config(cli_short = 'A')]
    pub issue_author: Option<String>,

    /// Handles a `synchronize` event on pull request `issue`.
    #[ortho_config(cli_short = 'p')]
    pub pull_request_updated: bool,

    /// Skips the courtesy pauses of the merge sweep.
    #[ortho_config()]
    pub disable_pacing: bool,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            token: None,
            repository: None,
            owner: None,
            repo: None,
            api_base: None,
            merge_method: None,
            robot_name: DEFAULT_ROBOT_NAME.to_owned(),
            cron_merge: false,
            start_page: 1,
            issue: None,
            comment_body: None,
            commenter: None,
            issue_author: None,
            pull_request_updated: false,
            disable_pacing: false,
        }
    }
}

impl BotConfig {
    /// Resolves the token from configuration or `GITHUB_TOKEN`.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::MissingToken`] when no source provides one.
    pub fn resolve_token(&self) -> Result<String, TrackerError> {
        self.token
            .clone()
            .or_else(|| env::var("GITHUB_TOKEN").ok())
            .ok_or(TrackerError::MissingToken)
    }

    /// Builds the repository locator from `owner`/`repo`, the `repository`
    /// slug, or `GITHUB_REPOSITORY`, in that order, against `api_base` when
    /// one is configured.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::Configuration`] when no repository is
    /// configured, and locator errors for malformed values.
    pub fn repository_locator(&self) -> Result<RepositoryLocator, TrackerError> {
        let slug_locator = match (&self.owner, &self.repo) {
            (Some(owner), Some(repo)) => RepositoryLocator::from_owner_repo(owner, repo)?,
            _ => {
                let slug = self
                    .repository
                    .clone()
                    .or_else(|| env::var("GITHUB_REPOSITORY").ok())
                    .ok_or_else(|| TrackerError::Configuration {
                        message: "repository is required (use --repository owner/repo)"
                            .to_owned(),
                    })?;
                RepositoryLocator::parse(&slug)?
            }
        };
        let Some(base) = self.api_base.as_deref() else {
            return Ok(slug_locator);
        };
        RepositoryLocator::with_api_base(
            base,
            slug_locator.owner().as_str(),
            slug_locator.repository().as_str(),
        )
    }

    /// The configured merge strategy, `merge` by default.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::Configuration`] for unknown strategies.
    pub fn merge_method(&self) -> Result<MergeMethod, TrackerError> {
        self.merge_method
            .as_deref()
            .map_or_else(|| Ok(MergeMethod::default()), str::parse)
    }

    /// Merge sweep pauses, or none when pacing is disabled.
    #[must_use]
    pub fn pacing(&self) -> Pacing {
        if self.disable_pacing {
            Pacing::none()
        } else {
            Pacing::default()
        }
    }

    /// The comment event described by the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::Configuration`] when the commenter is missing.
    pub fn comment_context(&self) -> Result<CommentContext, TrackerError> {
        let commenter = self
            .commenter
            .clone()
            .ok_or_else(|| TrackerError::Configuration {
                message: "commenter is required to run comment commands (use --commenter)"
                    .to_owned(),
            })?;
        Ok(CommentContext {
            issue: self.issue,
            commenter,
            author: self.issue_author.clone(),
            body: self.comment_body.clone().unwrap_or_default(),
        })
    }

    /// Determines which task to run.
    ///
    /// `cron_merge` wins over `pull_request_updated`, which wins over a
    /// comment body.
    #[must_use]
    pub const fn operation_mode(&self) -> OperationMode {
        if self.cron_merge {
            OperationMode::CronMerge
        } else if self.pull_request_updated {
            OperationMode::PullRequestUpdated
        } else if self.comment_body.is_some() {
            OperationMode::Comment
        } else {
            OperationMode::Unspecified
        }
    }

    /// Rejects configurations selecting more than one operation.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::Configuration`] when operations conflict or
    /// `start_page` is zero.
    pub fn validate(&self) -> Result<(), TrackerError> {
        let selected = [
            self.cron_merge,
            self.pull_request_updated,
            self.comment_body.is_some(),
        ]
        .into_iter()
        .filter(|selected| *selected)
        .count();
        if selected > 1 {
            return Err(TrackerError::Configuration {
                message: "select only one of --cron-merge, --pull-request-updated, \
                          or --comment-body"
                    .to_owned(),
            });
        }
        if self.start_page == 0 {
            return Err(TrackerError::Configuration {
                message: "start_page must be at least 1".to_owned(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests;

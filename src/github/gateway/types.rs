//! Public types for pull request merge operations.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::github::error::TrackerError;

/// Pull requests fetched per listing page.
pub const PAGE_SIZE: u8 = 100;

/// Merge strategy used by the merge sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MergeMethod {
    /// A merge commit.
    #[default]
    Merge,
    /// A single squashed commit.
    Squash,
    /// Commits rebased onto the base branch.
    Rebase,
}

impl MergeMethod {
    /// Returns the API parameter value for this method.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Merge => "merge",
            Self::Squash => "squash",
            Self::Rebase => "rebase",
        }
    }
}

impl fmt::Display for MergeMethod {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl FromStr for MergeMethod {
    type Err = TrackerError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "" | "merge" => Ok(Self::Merge),
            "squash" => Ok(Self::Squash),
            "rebase" => Ok(Self::Rebase),
            other => Err(TrackerError::Configuration {
                message: format!("unknown merge method `{other}` (expected merge, squash, or rebase)"),
            }),
        }
    }
}

/// Parameters of a single merge call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeRequest {
    /// Strategy to merge with.
    pub method: MergeMethod,
    /// Commit title override; only squash merges set one.
    pub commit_title: Option<String>,
}

impl MergeRequest {
    /// Builds the request for a pull request. Squash merges are titled
    /// `"<title> (#<number>)"`.
    #[must_use]
    pub fn for_pull_request(method: MergeMethod, number: u64, title: &str) -> Self {
        let commit_title = match method {
            MergeMethod::Squash => Some(format!("{title} (#{number})")),
            MergeMethod::Merge | MergeMethod::Rebase => None,
        };
        Self {
            method,
            commit_title,
        }
    }
}

//! Octocrab implementation of the pull request source.

use async_trait::async_trait;
use serde::Serialize;

use crate::github::error::TrackerError;
use crate::github::models::{ApiPullRequest, PullRequest};

use super::client::OctocrabTracker;
use super::error_mapping::map_octocrab_error;
use super::types::{MergeRequest, PAGE_SIZE};
use super::PullRequestSource;

#[derive(Debug, Serialize)]
struct MergeBody<'request> {
    merge_method: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    commit_title: Option<&'request str>,
}

fn validate_page(page: u32) -> Result<(), TrackerError> {
    if page == 0 {
        return Err(TrackerError::InvalidPagination {
            message: "page must be at least 1".to_owned(),
        });
    }
    Ok(())
}

#[async_trait]
impl PullRequestSource for OctocrabTracker {
    async fn list_open_pull_requests(&self, page: u32) -> Result<Vec<PullRequest>, TrackerError> {
        validate_page(page)?;

        let page_str = page.to_string();
        let per_page_str = PAGE_SIZE.to_string();
        let query_params = [
            ("state", "open"),
            ("page", page_str.as_str()),
            ("per_page", per_page_str.as_str()),
        ];

        let items: Vec<ApiPullRequest> = self
            .client
            .get(self.repository.pulls_path(), Some(&query_params))
            .await
            .map_err(|error| map_octocrab_error("list pulls", &error))?;

        Ok(items.into_iter().map(PullRequest::from).collect())
    }

    async fn pull_request(&self, number: u64) -> Result<PullRequest, TrackerError> {
        self.client
            .get::<ApiPullRequest, _, _>(self.repository.pull_request_path(number), None::<&()>)
            .await
            .map(PullRequest::from)
            .map_err(|error| map_octocrab_error("pull request", &error))
    }

    async fn merge_pull_request(
        &self,
        number: u64,
        request: &MergeRequest,
    ) -> Result<(), TrackerError> {
        let body = MergeBody {
            merge_method: request.method.as_str(),
            commit_title: request.commit_title.as_deref(),
        };
        let _merged: serde_json::Value = self
            .client
            .put(self.repository.merge_path(number), Some(&body))
            .await
            .map_err(|error| map_octocrab_error("merge pull request", &error))?;
        Ok(())
    }
}

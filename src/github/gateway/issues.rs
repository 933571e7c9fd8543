//! Octocrab implementation of the issue sink.

use async_trait::async_trait;
use http::StatusCode;
use octocrab::Page;
use serde_json::{Value, json};

use crate::github::error::TrackerError;
use crate::github::models::{ApiMilestone, IssueState, LockReason, Milestone};

use super::IssueSink;
use super::client::OctocrabTracker;
use super::error_mapping::{map_http_error, map_octocrab_error};

impl OctocrabTracker {
    async fn update_issue(
        &self,
        operation: &str,
        issue: u64,
        body: &Value,
    ) -> Result<(), TrackerError> {
        let _issue: Value = self
            .client
            .patch(self.repository.issue_path(issue), Some(body))
            .await
            .map_err(|error| map_octocrab_error(operation, &error))?;
        Ok(())
    }
}

#[async_trait]
impl IssueSink for OctocrabTracker {
    async fn set_state(&self, issue: u64, state: IssueState) -> Result<(), TrackerError> {
        self.update_issue("update issue state", issue, &json!({ "state": state.as_str() }))
            .await
    }

    async fn set_title(&self, issue: u64, title: &str) -> Result<(), TrackerError> {
        self.update_issue("update issue title", issue, &json!({ "title": title }))
            .await
    }

    async fn milestones(&self) -> Result<Vec<Milestone>, TrackerError> {
        let page = self
            .client
            .get::<Page<ApiMilestone>, _, _>(self.repository.milestones_path(), None::<&()>)
            .await
            .map_err(|error| map_octocrab_error("list milestones", &error))?;

        self.client
            .all_pages(page)
            .await
            .map(|milestones| milestones.into_iter().map(Milestone::from).collect())
            .map_err(|error| map_octocrab_error("list milestones", &error))
    }

    async fn set_milestone(&self, issue: u64, milestone: Option<u64>) -> Result<(), TrackerError> {
        self.update_issue(
            "update issue milestone",
            issue,
            &json!({ "milestone": milestone }),
        )
        .await
    }

    async fn lock(&self, issue: u64, reason: Option<LockReason>) -> Result<(), TrackerError> {
        let body = reason.map_or_else(
            || json!({}),
            |lock_reason| json!({ "lock_reason": lock_reason.as_str() }),
        );
        let status = self
            .put_for_status("lock issue", &self.repository.lock_path(issue), &body)
            .await?;
        match status {
            StatusCode::NO_CONTENT | StatusCode::OK => Ok(()),
            other => Err(map_http_error("lock issue", other)),
        }
    }

    async fn remove_assignees(&self, issue: u64, users: &[String]) -> Result<(), TrackerError> {
        let _issue: Value = self
            .client
            .delete(
                self.repository.assignees_path(issue),
                Some(&json!({ "assignees": users })),
            )
            .await
            .map_err(|error| map_octocrab_error("remove assignees", &error))?;
        Ok(())
    }

    async fn request_reviewers(&self, number: u64, users: &[String]) -> Result<(), TrackerError> {
        let _pull: Value = self
            .client
            .post(
                self.repository.requested_reviewers_path(number),
                Some(&json!({ "reviewers": users })),
            )
            .await
            .map_err(|error| map_octocrab_error("request reviewers", &error))?;
        Ok(())
    }

    async fn remove_requested_reviewers(
        &self,
        number: u64,
        users: &[String],
    ) -> Result<(), TrackerError> {
        let _pull: Value = self
            .client
            .delete(
                self.repository.requested_reviewers_path(number),
                Some(&json!({ "reviewers": users })),
            )
            .await
            .map_err(|error| map_octocrab_error("remove requested reviewers", &error))?;
        Ok(())
    }
}

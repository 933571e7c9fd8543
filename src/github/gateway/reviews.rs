//! Octocrab implementation of the review and comment sinks.

use async_trait::async_trait;
use octocrab::Page;
use serde_json::json;

use crate::github::error::TrackerError;
use crate::github::models::{ApiComment, ApiReview, IssueComment, Review};

use super::client::OctocrabTracker;
use super::error_mapping::map_octocrab_error;
use super::{CommentSink, ReviewSink};

#[async_trait]
impl ReviewSink for OctocrabTracker {
    async fn approve(&self, number: u64, body: &str) -> Result<(), TrackerError> {
        let _review: serde_json::Value = self
            .client
            .post(
                self.repository.reviews_path(number),
                Some(&json!({ "event": "APPROVE", "body": body, "comments": [] })),
            )
            .await
            .map_err(|error| map_octocrab_error("create review", &error))?;
        Ok(())
    }

    async fn reviews(&self, number: u64) -> Result<Vec<Review>, TrackerError> {
        let page = self
            .client
            .get::<Page<ApiReview>, _, _>(self.repository.reviews_path(number), None::<&()>)
            .await
            .map_err(|error| map_octocrab_error("list reviews", &error))?;

        self.client
            .all_pages(page)
            .await
            .map(|reviews| reviews.into_iter().map(Review::from).collect())
            .map_err(|error| map_octocrab_error("list reviews", &error))
    }

    async fn dismiss_review(
        &self,
        number: u64,
        review_id: u64,
        message: &str,
    ) -> Result<(), TrackerError> {
        let _review: serde_json::Value = self
            .client
            .put(
                self.repository.dismissal_path(number, review_id),
                Some(&json!({ "message": message })),
            )
            .await
            .map_err(|error| map_octocrab_error("dismiss review", &error))?;
        Ok(())
    }
}

#[async_trait]
impl CommentSink for OctocrabTracker {
    async fn create_comment(&self, issue: u64, body: &str) -> Result<(), TrackerError> {
        let _comment: serde_json::Value = self
            .client
            .post(
                self.repository.comments_path(issue),
                Some(&json!({ "body": body })),
            )
            .await
            .map_err(|error| map_octocrab_error("create comment", &error))?;
        Ok(())
    }

    async fn comments(&self, issue: u64) -> Result<Vec<IssueComment>, TrackerError> {
        let page = self
            .client
            .get::<Page<ApiComment>, _, _>(self.repository.comments_path(issue), None::<&()>)
            .await
            .map_err(|error| map_octocrab_error("issue comments", &error))?;

        self.client
            .all_pages(page)
            .await
            .map(|comments| comments.into_iter().map(IssueComment::from).collect())
            .map_err(|error| map_octocrab_error("issue comments", &error))
    }
}

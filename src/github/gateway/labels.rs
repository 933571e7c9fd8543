//! Octocrab implementation of the label sink.

use async_trait::async_trait;
use http::StatusCode;
use serde_json::json;

use crate::github::error::TrackerError;
use crate::github::models::{ApiLabel, labels_from_api};
use crate::labels::LabelSet;

use super::LabelSink;
use super::client::OctocrabTracker;
use super::error_mapping::{map_http_error, map_octocrab_error};

#[async_trait]
impl LabelSink for OctocrabTracker {
    async fn add_labels(&self, issue: u64, labels: &[String]) -> Result<(), TrackerError> {
        if labels.is_empty() {
            return Ok(());
        }
        let _current: Vec<ApiLabel> = self
            .client
            .post(
                self.repository.labels_path(issue),
                Some(&json!({ "labels": labels })),
            )
            .await
            .map_err(|error| map_octocrab_error("add labels", &error))?;
        Ok(())
    }

    async fn remove_label(&self, issue: u64, label: &str) -> Result<(), TrackerError> {
        let status = self
            .delete_for_status("remove label", &self.repository.label_path(issue, label))
            .await?;
        match status {
            // GitHub answers 404 when the label is already gone.
            StatusCode::OK | StatusCode::NO_CONTENT | StatusCode::NOT_FOUND => Ok(()),
            other => Err(map_http_error("remove label", other)),
        }
    }

    async fn labels(&self, issue: u64) -> Result<LabelSet, TrackerError> {
        self.client
            .get::<Vec<ApiLabel>, _, _>(
                self.repository.labels_path(issue),
                Some(&[("per_page", "100")]),
            )
            .await
            .map(labels_from_api)
            .map_err(|error| map_octocrab_error("list labels", &error))
    }
}

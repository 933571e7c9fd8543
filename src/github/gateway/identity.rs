//! Octocrab implementation of the identity source.
//!
//! Both membership endpoints answer `204 No Content` for a member and `404`
//! otherwise. The organization endpoint answers `302` when the token itself
//! cannot see private memberships, which is treated as "not a member".

use async_trait::async_trait;
use http::StatusCode;

use crate::github::error::TrackerError;

use super::IdentitySource;
use super::client::OctocrabTracker;
use super::error_mapping::map_http_error;

fn membership_from_status(operation: &str, status: StatusCode) -> Result<bool, TrackerError> {
    match status {
        StatusCode::NO_CONTENT => Ok(true),
        StatusCode::NOT_FOUND | StatusCode::FOUND => Ok(false),
        other => Err(map_http_error(operation, other)),
    }
}

#[async_trait]
impl IdentitySource for OctocrabTracker {
    async fn is_org_member(&self, user: &str) -> Result<bool, TrackerError> {
        let status = self
            .get_for_status("check org membership", &self.repository.org_member_path(user))
            .await?;
        membership_from_status("check org membership", status)
    }

    async fn is_collaborator(&self, user: &str) -> Result<bool, TrackerError> {
        let status = self
            .get_for_status("check collaborator", &self.repository.collaborator_path(user))
            .await?;
        membership_from_status("check collaborator", status)
    }
}

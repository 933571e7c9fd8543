//! Octocrab client construction and the repository-bound tracker gateway.

use http::{StatusCode, Uri};
use octocrab::Octocrab;

use crate::github::error::TrackerError;
use crate::github::locator::{PersonalAccessToken, RepositoryLocator};

use super::error_mapping::map_octocrab_error;

/// Builds an Octocrab client for the given token and API base URL.
///
/// # Errors
///
/// Returns `TrackerError::InvalidUrl` when the base URI cannot be parsed or
/// `TrackerError::Api` when Octocrab fails to construct a client.
pub(super) fn build_octocrab_client(
    token: &PersonalAccessToken,
    api_base: &str,
) -> Result<Octocrab, TrackerError> {
    let base_uri: Uri = api_base
        .parse::<Uri>()
        .map_err(|error| TrackerError::InvalidUrl(error.to_string()))?;

    Octocrab::builder()
        .personal_token(token.as_ref())
        .base_uri(base_uri)
        .map_err(|error| TrackerError::Api {
            message: format!("build client failed: {error}"),
        })?
        .build()
        .map_err(|error| map_octocrab_error("build client", &error))
}

/// Octocrab-backed implementation of every tracker collaborator interface,
/// bound to one repository.
pub struct OctocrabTracker {
    pub(super) client: Octocrab,
    pub(super) repository: RepositoryLocator,
}

impl OctocrabTracker {
    /// Creates a gateway from an existing Octocrab client.
    #[must_use]
    pub const fn new(client: Octocrab, repository: RepositoryLocator) -> Self {
        Self { client, repository }
    }

    /// Builds an authenticated client against the repository's API base.
    ///
    /// # Errors
    ///
    /// Returns `TrackerError::InvalidUrl` when the base URI cannot be parsed or
    /// `TrackerError::Api` when Octocrab fails to construct a client.
    pub fn for_token(
        token: &PersonalAccessToken,
        repository: &RepositoryLocator,
    ) -> Result<Self, TrackerError> {
        let octocrab = build_octocrab_client(token, repository.api_base().as_str())?;
        Ok(Self::new(octocrab, repository.clone()))
    }

    /// The repository this gateway acts on.
    #[must_use]
    pub const fn repository(&self) -> &RepositoryLocator {
        &self.repository
    }

    /// Issues a bodiless GET and returns only the status code, for the
    /// endpoints that answer with `204` or `404` instead of JSON.
    pub(super) async fn get_for_status(
        &self,
        operation: &str,
        route: &str,
    ) -> Result<StatusCode, TrackerError> {
        let uri = parse_route(route)?;
        self.client
            ._get(uri)
            .await
            .map(|response| response.status())
            .map_err(|error| map_octocrab_error(operation, &error))
    }

    /// Issues a DELETE and returns only the status code.
    pub(super) async fn delete_for_status(
        &self,
        operation: &str,
        route: &str,
    ) -> Result<StatusCode, TrackerError> {
        let uri = parse_route(route)?;
        self.client
            ._delete(uri, None::<&()>)
            .await
            .map(|response| response.status())
            .map_err(|error| map_octocrab_error(operation, &error))
    }

    /// Issues a PUT and returns only the status code, for endpoints that
    /// answer `204 No Content`.
    pub(super) async fn put_for_status(
        &self,
        operation: &str,
        route: &str,
        body: &serde_json::Value,
    ) -> Result<StatusCode, TrackerError> {
        let uri = parse_route(route)?;
        self.client
            ._put(uri, Some(body))
            .await
            .map(|response| response.status())
            .map_err(|error| map_octocrab_error(operation, &error))
    }
}

fn parse_route(route: &str) -> Result<Uri, TrackerError> {
    route
        .parse::<Uri>()
        .map_err(|error| TrackerError::InvalidUrl(error.to_string()))
}

//! Error mapping helpers for the Octocrab tracker gateway.

use http::StatusCode;

use crate::github::error::TrackerError;

/// Checks if a GitHub error status indicates an authentication failure.
pub(super) const fn is_auth_failure(status: StatusCode) -> bool {
    matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN)
}

/// Checks if an octocrab error represents a network/transport issue.
pub(super) const fn is_network_error(error: &octocrab::Error) -> bool {
    matches!(
        error,
        octocrab::Error::Http { .. }
            | octocrab::Error::Hyper { .. }
            | octocrab::Error::Service { .. }
    )
}

/// Checks whether the GitHub error represents a rate limit error based on the
/// HTTP status and message / documentation URL content.
pub(super) fn is_rate_limit_error(source: &octocrab::GitHubError) -> bool {
    let is_rate_limit_status = matches!(
        source.status_code,
        StatusCode::FORBIDDEN | StatusCode::TOO_MANY_REQUESTS
    );

    let message_indicates_rate_limit = source.message.to_lowercase().contains("rate limit")
        || source
            .documentation_url
            .as_deref()
            .is_some_and(|url| url.contains("rate-limit"));

    is_rate_limit_status && message_indicates_rate_limit
}

/// Whether GitHub answered `404 Not Found`.
pub(super) fn is_not_found(error: &octocrab::Error) -> bool {
    matches!(
        error,
        octocrab::Error::GitHub { source, .. } if source.status_code == StatusCode::NOT_FOUND
    )
}

pub(super) fn map_octocrab_error(operation: &str, error: &octocrab::Error) -> TrackerError {
    if let octocrab::Error::GitHub { source, .. } = error {
        if is_rate_limit_error(source) {
            return TrackerError::RateLimitExceeded {
                message: format!("{operation} failed: {message}", message = source.message),
            };
        }
        return if is_auth_failure(source.status_code) {
            TrackerError::Authentication {
                message: format!(
                    "{operation} failed: GitHub returned {status} {message}",
                    status = source.status_code,
                    message = source.message
                ),
            }
        } else {
            TrackerError::Api {
                message: format!(
                    "{operation} failed with status {status}: {message}",
                    status = source.status_code,
                    message = source.message
                ),
            }
        };
    }

    if is_network_error(error) {
        return TrackerError::Network {
            message: format!("{operation} failed: {error}"),
        };
    }

    TrackerError::Api {
        message: format!("{operation} failed: {error}"),
    }
}

/// Maps an unexpected status from a raw (status-only) request.
pub(super) fn map_http_error(operation: &str, status: StatusCode) -> TrackerError {
    if is_auth_failure(status) {
        TrackerError::Authentication {
            message: format!("{operation} failed: GitHub returned {status}"),
        }
    } else {
        TrackerError::Api {
            message: format!("{operation} failed with status {status}"),
        }
    }
}

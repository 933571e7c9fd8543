//! Independent membership signals.
//!
//! Each check fails closed: any tracker error is logged at debug level and
//! reported as "not a member".

use crate::github::{CommentSink, IdentitySource};

/// Whether `user` belongs to the repository's organization.
pub async fn check_org_member<S>(identity: &S, user: &str) -> bool
where
    S: IdentitySource + ?Sized,
{
    identity.is_org_member(user).await.unwrap_or_else(|error| {
        tracing::debug!(%user, %error, "org membership check failed");
        false
    })
}

/// Whether `user` is a collaborator on the repository.
pub async fn check_collaborator<S>(identity: &S, user: &str) -> bool
where
    S: IdentitySource + ?Sized,
{
    identity.is_collaborator(user).await.unwrap_or_else(|error| {
        tracing::debug!(%user, %error, "collaborator check failed");
        false
    })
}

/// Whether `user` has commented on `issue` before, ignoring login case.
pub async fn check_prior_comment<C>(comments: &C, issue: u64, user: &str) -> bool
where
    C: CommentSink + ?Sized,
{
    comments.comments(issue).await.map_or_else(
        |error| {
            tracing::debug!(%user, issue, %error, "listing comments failed");
            false
        },
        |listed| {
            listed
                .iter()
                .any(|comment| {
                    comment
                        .author
                        .as_deref()
                        .is_some_and(|author| author.eq_ignore_ascii_case(user))
                })
        },
    )
}

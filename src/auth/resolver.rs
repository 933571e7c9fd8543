//! Composed authorization policies.

use std::collections::BTreeSet;
use std::fmt;

use futures::future::join_all;

use crate::error::BotError;
use crate::github::{CommentSink, IdentitySource, OwnersSource};

use super::owners::{OwnersDocument, Role, role_membership};
use super::signals::{check_collaborator, check_org_member, check_prior_comment};

/// Where a grant came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthSource {
    /// The user is listed under the role in the `OWNERS` file.
    OwnersFile,
    /// The user belongs to the repository's organization.
    OrgMembership,
    /// The user is a repository collaborator.
    Collaborator,
    /// The user has commented on the issue before.
    PriorComment,
}

impl fmt::Display for AuthSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::OwnersFile => "owners-file",
            Self::OrgMembership => "org-membership",
            Self::Collaborator => "collaborator",
            Self::PriorComment => "prior-comment",
        })
    }
}

/// Outcome of an authorization policy.
///
/// A grant can only be built with [`AuthorizationDecision::grant`], which
/// requires the [`AuthSource`] that justified it; a denial carries a reason
/// instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizationDecision {
    role: Option<Role>,
    verdict: Verdict,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Verdict {
    Granted(AuthSource),
    Denied(String),
}

impl AuthorizationDecision {
    /// A grant justified by `source`.
    #[must_use]
    pub const fn grant(role: Option<Role>, source: AuthSource) -> Self {
        Self {
            role,
            verdict: Verdict::Granted(source),
        }
    }

    /// A denial explained by `reason`.
    #[must_use]
    pub fn deny(role: Option<Role>, reason: impl Into<String>) -> Self {
        Self {
            role,
            verdict: Verdict::Denied(reason.into()),
        }
    }

    /// Whether the action may proceed.
    #[must_use]
    pub const fn is_granted(&self) -> bool {
        matches!(self.verdict, Verdict::Granted(_))
    }

    /// Role the decision was made against, if any.
    #[must_use]
    pub const fn role(&self) -> Option<Role> {
        self.role
    }

    /// Source of a grant; `None` for denials.
    #[must_use]
    pub const fn source(&self) -> Option<AuthSource> {
        match self.verdict {
            Verdict::Granted(source) => Some(source),
            Verdict::Denied(_) => None,
        }
    }

    /// Reason for a denial; `None` for grants.
    #[must_use]
    pub fn reason(&self) -> Option<&str> {
        match &self.verdict {
            Verdict::Granted(_) => None,
            Verdict::Denied(reason) => Some(reason),
        }
    }
}

/// Resolves whether users hold the roles commands require.
///
/// Membership signals fail closed. Only fetching or parsing the owners
/// document can fail a policy outright.
pub struct AuthorizationResolver<'tracker, T: ?Sized> {
    tracker: &'tracker T,
}

impl<'tracker, T> AuthorizationResolver<'tracker, T>
where
    T: OwnersSource + IdentitySource + CommentSink + ?Sized,
{
    /// Creates a resolver reading from `tracker`.
    #[must_use]
    pub const fn new(tracker: &'tracker T) -> Self {
        Self { tracker }
    }

    /// Fetches and parses the owners document; `None` when absent.
    ///
    /// # Errors
    ///
    /// Returns [`BotError::Tracker`] when the fetch fails and
    /// [`BotError::MalformedOwners`] when the content cannot be parsed.
    pub async fn owners(&self) -> Result<Option<OwnersDocument>, BotError> {
        self.tracker
            .owners_file()
            .await?
            .map(|raw| OwnersDocument::parse(&raw))
            .transpose()
    }

    /// Strict policy: an owners document listing `role` is authoritative;
    /// otherwise org members and collaborators are granted.
    ///
    /// # Errors
    ///
    /// Returns an error when the owners document cannot be fetched or parsed.
    pub async fn owners_or_membership(
        &self,
        role: Role,
        user: &str,
    ) -> Result<AuthorizationDecision, BotError> {
        let owners = self.owners().await?;
        if let Some(members) = owners.as_ref().and_then(|document| document.members(role)) {
            let decision = if members.contains(user) {
                AuthorizationDecision::grant(Some(role), AuthSource::OwnersFile)
            } else {
                AuthorizationDecision::deny(
                    Some(role),
                    format!("{user} is not included in the {role} role in the OWNERS file"),
                )
            };
            tracing::debug!(%user, %role, granted = decision.is_granted(), "owners file decided");
            return Ok(decision);
        }

        if check_org_member(self.tracker, user).await {
            return Ok(AuthorizationDecision::grant(
                Some(role),
                AuthSource::OrgMembership,
            ));
        }
        if check_collaborator(self.tracker, user).await {
            return Ok(AuthorizationDecision::grant(
                Some(role),
                AuthSource::Collaborator,
            ));
        }
        Ok(AuthorizationDecision::deny(
            Some(role),
            format!(
                "{user} is not included in the {role} role in the OWNERS file \
                 and is not an organization member or collaborator"
            ),
        ))
    }

    /// Non-strict lookup: true iff the owners document lists `user` under
    /// `role`. A missing document or unlisted role is simply `false`.
    ///
    /// # Errors
    ///
    /// Returns an error when the owners document cannot be fetched or parsed.
    pub async fn owners_boolean(&self, role: Role, user: &str) -> Result<bool, BotError> {
        let owners = self.owners().await?;
        Ok(owners_boolean_in(owners.as_ref(), role, user))
    }

    /// Reviewer or approver in the owners document, else a collaborator.
    ///
    /// # Errors
    ///
    /// Returns an error when the owners document cannot be fetched or parsed.
    pub async fn reviewer_or_approver(&self, user: &str) -> Result<AuthorizationDecision, BotError> {
        self.owners_roles_or_collaborator(&[Role::Reviewers, Role::Approvers], user)
            .await
    }

    /// Approver in the owners document, else a collaborator.
    ///
    /// # Errors
    ///
    /// Returns an error when the owners document cannot be fetched or parsed.
    pub async fn approver_or_collaborator(
        &self,
        user: &str,
    ) -> Result<AuthorizationDecision, BotError> {
        self.owners_roles_or_collaborator(&[Role::Approvers], user)
            .await
    }

    async fn owners_roles_or_collaborator(
        &self,
        roles: &[Role],
        user: &str,
    ) -> Result<AuthorizationDecision, BotError> {
        let owners = self.owners().await?;
        if let Some(role) = roles
            .iter()
            .copied()
            .find(|role| owners_boolean_in(owners.as_ref(), *role, user))
        {
            return Ok(AuthorizationDecision::grant(
                Some(role),
                AuthSource::OwnersFile,
            ));
        }
        if check_collaborator(self.tracker, user).await {
            return Ok(AuthorizationDecision::grant(None, AuthSource::Collaborator));
        }
        let listed = roles
            .iter()
            .map(|role| role.as_str())
            .collect::<Vec<_>>()
            .join(" or ");
        Ok(AuthorizationDecision::deny(
            None,
            format!("{user} is not in the {listed} role in the OWNERS file and is not a collaborator"),
        ))
    }

    /// Only repository collaborators.
    pub async fn collaborator(&self, user: &str) -> AuthorizationDecision {
        if check_collaborator(self.tracker, user).await {
            AuthorizationDecision::grant(None, AuthSource::Collaborator)
        } else {
            AuthorizationDecision::deny(None, format!("{user} is not a collaborator"))
        }
    }

    /// Broad policy: org member, collaborator, or prior commenter on `issue`.
    pub async fn broad(&self, issue: u64, user: &str) -> AuthorizationDecision {
        if check_org_member(self.tracker, user).await {
            return AuthorizationDecision::grant(None, AuthSource::OrgMembership);
        }
        if check_collaborator(self.tracker, user).await {
            return AuthorizationDecision::grant(None, AuthSource::Collaborator);
        }
        if check_prior_comment(self.tracker, issue, user).await {
            return AuthorizationDecision::grant(None, AuthSource::PriorComment);
        }
        AuthorizationDecision::deny(
            None,
            format!(
                "{user} is not an organization member or collaborator \
                 and has not commented on this issue"
            ),
        )
    }

    /// Runs the broad policy for every user concurrently and returns those
    /// granted in first-mention order. Logins differing only in case count
    /// once.
    pub async fn authorized_targets(&self, issue: u64, users: &[String]) -> Vec<String> {
        let mut seen = BTreeSet::new();
        let candidates: Vec<&String> = users
            .iter()
            .filter(|user| seen.insert(user.to_ascii_lowercase()))
            .collect();
        let decisions = join_all(
            candidates
                .iter()
                .map(|user| self.broad(issue, user.as_str())),
        )
        .await;
        candidates
            .into_iter()
            .zip(decisions)
            .filter(|(_, decision)| decision.is_granted())
            .map(|(user, _)| user.clone())
            .collect()
    }
}

/// Owners-boolean lookup against an already fetched document: true iff the
/// document exists and lists `user` under `role`.
#[must_use]
pub fn owners_boolean_in(owners: Option<&OwnersDocument>, role: Role, user: &str) -> bool {
    owners.is_some_and(|document| role_membership(document, role, user))
}

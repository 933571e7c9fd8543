//! Review-request and assignment commands: `/cc`, `/uncc`, `/unassign`.

use crate::error::BotError;
use crate::github::Tracker;

use super::context::CommentContext;
use super::gate::{Admission, CommandGate, CommandOutcome, Policy};
use super::parse::{CommandName, Invocation};

/// Strips the `@` people habitually put in front of logins.
fn logins(args: &[String]) -> Vec<String> {
    args.iter()
        .map(|arg| arg.trim_start_matches('@').to_owned())
        .filter(|login| !login.is_empty())
        .collect()
}

impl<T> CommandGate<'_, T>
where
    T: Tracker + ?Sized,
{
    /// `/cc` requests a review from the commenter (collaborators only) or
    /// from each named user the broad policy admits.
    pub(super) async fn cc(
        &self,
        ctx: &CommentContext,
        issue: u64,
        invocation: &Invocation,
    ) -> Result<CommandOutcome, BotError> {
        let command = CommandName::Cc;
        let targets = logins(&invocation.args);
        if targets.is_empty() {
            if let Admission::Refused(outcome) = self
                .admit(issue, command, Policy::Collaborator, &ctx.commenter)
                .await?
            {
                return Ok(outcome);
            }
            self.tracker
                .request_reviewers(issue, std::slice::from_ref(&ctx.commenter))
                .await?;
            return Ok(CommandOutcome::applied(
                command,
                format!("requested review from {}", ctx.commenter),
            ));
        }

        let granted = self.resolver.authorized_targets(issue, &targets).await;
        if granted.is_empty() {
            let error = BotError::NoAuthorizedUsers;
            self.notify(issue, |replies| {
                replies.unauthorized(command.as_str(), &error.to_string())
            })
            .await;
            return Err(error);
        }
        self.tracker.request_reviewers(issue, &granted).await?;
        Ok(CommandOutcome::applied(
            command,
            format!("requested review from {}", granted.join(", ")),
        ))
    }

    /// `/uncc` withdraws review requests from the commenter or the named
    /// users.
    pub(super) async fn uncc(
        &self,
        ctx: &CommentContext,
        issue: u64,
        invocation: &Invocation,
    ) -> Result<CommandOutcome, BotError> {
        let command = CommandName::Uncc;
        let named = logins(&invocation.args);
        let (policy, targets) = if named.is_empty() {
            (Policy::Collaborator, vec![ctx.commenter.clone()])
        } else {
            (Policy::Broad, named)
        };
        if let Admission::Refused(outcome) = self
            .admit(issue, command, policy, &ctx.commenter)
            .await?
        {
            return Ok(outcome);
        }
        self.tracker
            .remove_requested_reviewers(issue, &targets)
            .await?;
        Ok(CommandOutcome::applied(
            command,
            format!("withdrew review requests for {}", targets.join(", ")),
        ))
    }

    /// `/unassign` removes the commenter, or the named users when the
    /// commenter passes the broad policy.
    pub(super) async fn unassign(
        &self,
        ctx: &CommentContext,
        issue: u64,
        invocation: &Invocation,
    ) -> Result<CommandOutcome, BotError> {
        let command = CommandName::Unassign;
        let named = logins(&invocation.args);
        let targets = if named.is_empty() {
            vec![ctx.commenter.clone()]
        } else {
            if let Admission::Refused(outcome) = self
                .admit(issue, command, Policy::Broad, &ctx.commenter)
                .await?
            {
                return Ok(outcome);
            }
            named
        };
        self.tracker.remove_assignees(issue, &targets).await?;
        Ok(CommandOutcome::applied(
            command,
            format!("unassigned {}", targets.join(", ")),
        ))
    }
}

//! Issue housekeeping: `/close`, `/reopen`, `/retitle`, `/milestone`, `/lock`.

use crate::error::BotError;
use crate::github::{IssueState, LockReason, Tracker};

use super::context::CommentContext;
use super::gate::{Admission, CommandGate, CommandOutcome, Policy};
use super::parse::{CommandName, Invocation};

/// Maps a `/lock` argument to the tracker's lock reason. `resolved`, an
/// unknown word, or no argument lock without a reason.
fn lock_reason(arg: Option<&str>) -> Option<LockReason> {
    match arg? {
        "off-topic" => Some(LockReason::OffTopic),
        "too-heated" => Some(LockReason::TooHeated),
        "spam" => Some(LockReason::Spam),
        _ => None,
    }
}

impl<T> CommandGate<'_, T>
where
    T: Tracker + ?Sized,
{
    pub(super) async fn close(
        &self,
        ctx: &CommentContext,
        issue: u64,
    ) -> Result<CommandOutcome, BotError> {
        self.set_state(ctx, issue, CommandName::Close, IssueState::Closed)
            .await
    }

    pub(super) async fn reopen(
        &self,
        ctx: &CommentContext,
        issue: u64,
    ) -> Result<CommandOutcome, BotError> {
        self.set_state(ctx, issue, CommandName::Reopen, IssueState::Open)
            .await
    }

    async fn set_state(
        &self,
        ctx: &CommentContext,
        issue: u64,
        command: CommandName,
        state: IssueState,
    ) -> Result<CommandOutcome, BotError> {
        if let Admission::Refused(outcome) = self
            .admit(issue, command, Policy::ReviewerOrApprover, &ctx.commenter)
            .await?
        {
            return Ok(outcome);
        }
        self.tracker.set_state(issue, state).await?;
        Ok(CommandOutcome::applied(
            command,
            format!("state set to {}", state.as_str()),
        ))
    }

    pub(super) async fn retitle(
        &self,
        ctx: &CommentContext,
        issue: u64,
        invocation: &Invocation,
    ) -> Result<CommandOutcome, BotError> {
        let command = CommandName::Retitle;
        if invocation.args.is_empty() {
            return Ok(CommandOutcome::NoOp {
                command,
                reason: "no title given".to_owned(),
            });
        }
        if let Admission::Refused(outcome) = self
            .admit(issue, command, Policy::ReviewerOrApprover, &ctx.commenter)
            .await?
        {
            return Ok(outcome);
        }

        let title = invocation.args.join(" ");
        self.tracker.set_title(issue, &title).await?;
        Ok(CommandOutcome::applied(command, format!("retitled to {title}")))
    }

    pub(super) async fn milestone(
        &self,
        ctx: &CommentContext,
        issue: u64,
        invocation: &Invocation,
    ) -> Result<CommandOutcome, BotError> {
        let command = CommandName::Milestone;
        if let Admission::Refused(outcome) = self
            .admit(issue, command, Policy::ReviewerOrApprover, &ctx.commenter)
            .await?
        {
            return Ok(outcome);
        }

        if invocation.is_cancel() {
            self.tracker.set_milestone(issue, None).await?;
            return Ok(CommandOutcome::applied(command, "milestone cleared"));
        }

        let title = invocation.line.as_str();
        if title.is_empty() {
            return Err(BotError::CommandArguments {
                command: command.as_str().to_owned(),
                message: "please provide a milestone to add".to_owned(),
            });
        }
        let milestone = self
            .tracker
            .milestones()
            .await?
            .into_iter()
            .find(|milestone| milestone.title == title)
            .ok_or_else(|| BotError::CommandArguments {
                command: command.as_str().to_owned(),
                message: format!("no milestone titled `{title}`"),
            })?;
        self.tracker
            .set_milestone(issue, Some(milestone.number))
            .await?;
        Ok(CommandOutcome::applied(
            command,
            format!("milestone set to {}", milestone.title),
        ))
    }

    pub(super) async fn lock(
        &self,
        ctx: &CommentContext,
        issue: u64,
        invocation: &Invocation,
    ) -> Result<CommandOutcome, BotError> {
        let command = CommandName::Lock;
        if let Admission::Refused(outcome) = self
            .admit(issue, command, Policy::ApproverOrCollaborator, &ctx.commenter)
            .await?
        {
            return Ok(outcome);
        }

        let reason = lock_reason(invocation.args.first().map(String::as_str));
        self.tracker.lock(issue, reason).await?;
        let detail = reason.map_or_else(
            || "locked".to_owned(),
            |lock| format!("locked as {}", lock.as_str()),
        );
        Ok(CommandOutcome::applied(command, detail))
    }
}

//! Review-state commands: `/lgtm`, `/approve`, `/hold`, `/remove`.

use crate::auth::Role;
use crate::error::BotError;
use crate::github::{ReviewState, Tracker};
use crate::labels::{APPROVED, HOLD, LGTM};

use super::context::CommentContext;
use super::gate::{Admission, CommandGate, CommandOutcome, Policy};
use super::parse::{CommandName, Invocation};

impl<T> CommandGate<'_, T>
where
    T: Tracker + ?Sized,
{
    pub(super) async fn lgtm(
        &self,
        ctx: &CommentContext,
        issue: u64,
        invocation: &Invocation,
    ) -> Result<CommandOutcome, BotError> {
        let command = CommandName::Lgtm;
        if ctx.is_self_action() {
            return Ok(self.reject_self_action(issue, command).await);
        }
        if let Admission::Refused(outcome) = self
            .admit(issue, command, Policy::Strict(Role::Reviewers), &ctx.commenter)
            .await?
        {
            return Ok(outcome);
        }

        if invocation.is_cancel() {
            self.tracker.remove_label(issue, LGTM).await?;
            return Ok(CommandOutcome::applied(command, format!("removed {LGTM}")));
        }
        self.tracker.add_labels(issue, &[LGTM.to_owned()]).await?;
        Ok(CommandOutcome::applied(command, format!("added {LGTM}")))
    }

    pub(super) async fn approve(
        &self,
        ctx: &CommentContext,
        issue: u64,
        invocation: &Invocation,
    ) -> Result<CommandOutcome, BotError> {
        let command = CommandName::Approve;
        if ctx.is_self_action() {
            return Ok(self.reject_self_action(issue, command).await);
        }
        if let Admission::Refused(outcome) = self
            .admit(issue, command, Policy::Strict(Role::Approvers), &ctx.commenter)
            .await?
        {
            return Ok(outcome);
        }

        if invocation.is_cancel() {
            self.tracker.remove_label(issue, APPROVED).await?;
            let review_id = self.latest_bot_approval(issue).await?;
            let message = self.replies.dismissed(&ctx.commenter, &ctx.body)?;
            self.tracker
                .dismiss_review(issue, review_id, &message)
                .await?;
            return Ok(CommandOutcome::applied(
                command,
                format!("removed {APPROVED} and dismissed review {review_id}"),
            ));
        }

        let body = self.replies.approved(&ctx.commenter, &ctx.body)?;
        self.tracker.approve(issue, &body).await?;
        self.tracker.add_labels(issue, &[APPROVED.to_owned()]).await?;
        Ok(CommandOutcome::applied(
            command,
            format!("approved and added {APPROVED}"),
        ))
    }

    /// Id of the newest `APPROVED` review written by the bot.
    async fn latest_bot_approval(&self, number: u64) -> Result<u64, BotError> {
        self.tracker
            .reviews(number)
            .await?
            .iter()
            .rev()
            .find(|review| {
                review.state == ReviewState::Approved
                    && review
                        .author
                        .as_deref()
                        .is_some_and(|author| author.eq_ignore_ascii_case(&self.robot))
            })
            .map(|review| review.id)
            .ok_or_else(|| BotError::NoReviewToDismiss {
                number,
                robot: self.robot.clone(),
            })
    }

    pub(super) async fn hold(
        &self,
        ctx: &CommentContext,
        issue: u64,
        invocation: &Invocation,
    ) -> Result<CommandOutcome, BotError> {
        let command = CommandName::Hold;
        if let Admission::Refused(outcome) = self
            .admit(issue, command, Policy::Broad, &ctx.commenter)
            .await?
        {
            return Ok(outcome);
        }

        if invocation.is_cancel() {
            self.tracker.remove_label(issue, HOLD).await?;
            return Ok(CommandOutcome::applied(command, format!("removed {HOLD}")));
        }
        self.tracker.add_labels(issue, &[HOLD.to_owned()]).await?;
        Ok(CommandOutcome::applied(command, format!("added {HOLD}")))
    }

    pub(super) async fn remove(
        &self,
        ctx: &CommentContext,
        issue: u64,
        invocation: &Invocation,
    ) -> Result<CommandOutcome, BotError> {
        let command = CommandName::Remove;
        if let Admission::Refused(outcome) = self
            .admit(issue, command, Policy::ReviewerOrApprover, &ctx.commenter)
            .await?
        {
            return Ok(outcome);
        }

        let current = self.tracker.labels(issue).await?;
        tracing::debug!(labels = %current, "current labels");
        let present: Vec<&String> = invocation
            .args
            .iter()
            .filter(|label| current.contains(label))
            .collect();
        if present.is_empty() {
            return Err(BotError::CommandArguments {
                command: command.as_str().to_owned(),
                message: "none of the given labels are on this issue".to_owned(),
            });
        }

        for label in &present {
            self.tracker.remove_label(issue, label).await?;
        }
        let removed = present
            .iter()
            .map(|label| label.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        Ok(CommandOutcome::applied(command, format!("removed {removed}")))
    }
}

//! Authorization wrapper shared by every mutating command.

use tracing::Instrument;

use crate::auth::{AuthorizationDecision, AuthorizationResolver, Role};
use crate::error::BotError;
use crate::github::Tracker;
use crate::labels::LabelCategory;
use crate::replies::Replies;

use super::context::CommentContext;
use super::parse::{CommandName, Invocation, parse_commands};

/// Which authorization policy guards a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Policy {
    /// Owners-file role, falling back to membership only when the role is
    /// not listed.
    Strict(Role),
    /// Reviewer or approver in the owners file, else collaborator.
    ReviewerOrApprover,
    /// Approver in the owners file, else collaborator.
    ApproverOrCollaborator,
    /// Org member, collaborator, or prior commenter.
    Broad,
    /// Collaborators only.
    Collaborator,
}

/// How a denial is reported to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenialMode {
    /// The invocation fails with [`BotError::Unauthorized`].
    Surface,
    /// The invocation succeeds with [`CommandOutcome::Denied`].
    Quiet,
}

impl CommandName {
    /// How denials of this command are reported.
    #[must_use]
    pub const fn denial_mode(self) -> DenialMode {
        match self {
            Self::Lgtm
            | Self::Approve
            | Self::Remove
            | Self::Milestone
            | Self::Lock
            | Self::Cc
            | Self::Hold
            | Self::Kind
            | Self::Area
            | Self::Priority => DenialMode::Surface,
            Self::Close | Self::Reopen | Self::Retitle | Self::Uncc | Self::Unassign => {
                DenialMode::Quiet
            }
        }
    }
}

/// Result of one command invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    /// The mutation was performed.
    Applied {
        /// Command that ran.
        command: CommandName,
        /// What changed.
        detail: String,
    },
    /// The commenter lacked permission; nothing changed.
    Denied {
        /// Command that was refused.
        command: CommandName,
        /// Login of the commenter.
        user: String,
        /// Why.
        reason: String,
    },
    /// The author tried to `/lgtm` or `/approve` their own pull request.
    SelfActionRejected {
        /// Command that was refused.
        command: CommandName,
    },
    /// Nothing to do.
    NoOp {
        /// Command that ran.
        command: CommandName,
        /// Why nothing happened.
        reason: String,
    },
}

impl CommandOutcome {
    pub(super) fn applied(command: CommandName, detail: impl Into<String>) -> Self {
        Self::Applied {
            command,
            detail: detail.into(),
        }
    }
}

/// Whether a guarded command may go ahead.
pub(super) enum Admission {
    Granted,
    Refused(CommandOutcome),
}

/// Runs comment commands against a tracker, authorizing each one first.
pub struct CommandGate<'a, T: ?Sized> {
    pub(super) tracker: &'a T,
    pub(super) resolver: AuthorizationResolver<'a, T>,
    pub(super) replies: &'a Replies,
    pub(super) robot: String,
}

impl<'a, T> CommandGate<'a, T>
where
    T: Tracker + ?Sized,
{
    /// Creates a gate acting as `robot`.
    #[must_use]
    pub fn new(tracker: &'a T, replies: &'a Replies, robot: &str) -> Self {
        Self {
            tracker,
            resolver: AuthorizationResolver::new(tracker),
            replies,
            robot: robot.to_owned(),
        }
    }

    /// Runs every command in the comment, in order.
    ///
    /// Comments by the bot itself and comments without commands yield no
    /// outcomes. Processing stops at the first failing command.
    ///
    /// # Errors
    ///
    /// Returns [`BotError::MissingIdentifier`] when the payload has commands
    /// but no issue number, and otherwise the first command's error.
    pub async fn run(&self, ctx: &CommentContext) -> Result<Vec<CommandOutcome>, BotError> {
        if ctx.commenter.eq_ignore_ascii_case(&self.robot) {
            tracing::debug!("ignoring the bot's own comment");
            return Ok(Vec::new());
        }
        let invocations = parse_commands(&ctx.body);
        if invocations.is_empty() {
            tracing::debug!("comment contains no commands");
            return Ok(Vec::new());
        }
        let issue = ctx.issue_number()?;

        let mut outcomes = Vec::with_capacity(invocations.len());
        for invocation in &invocations {
            let span = tracing::info_span!(
                "command",
                command = %invocation.command,
                issue,
                user = %ctx.commenter
            );
            let outcome = self.execute(ctx, issue, invocation).instrument(span).await?;
            tracing::info!(?outcome, "command finished");
            outcomes.push(outcome);
        }
        Ok(outcomes)
    }

    /// Runs a single command.
    ///
    /// # Errors
    ///
    /// Returns [`BotError::Unauthorized`] for surfaced denials, argument
    /// errors, and tracker failures.
    pub async fn execute(
        &self,
        ctx: &CommentContext,
        issue: u64,
        invocation: &Invocation,
    ) -> Result<CommandOutcome, BotError> {
        match invocation.command {
            CommandName::Lgtm => self.lgtm(ctx, issue, invocation).await,
            CommandName::Approve => self.approve(ctx, issue, invocation).await,
            CommandName::Hold => self.hold(ctx, issue, invocation).await,
            CommandName::Remove => self.remove(ctx, issue, invocation).await,
            CommandName::Close => self.close(ctx, issue).await,
            CommandName::Reopen => self.reopen(ctx, issue).await,
            CommandName::Retitle => self.retitle(ctx, issue, invocation).await,
            CommandName::Milestone => self.milestone(ctx, issue, invocation).await,
            CommandName::Lock => self.lock(ctx, issue, invocation).await,
            CommandName::Cc => self.cc(ctx, issue, invocation).await,
            CommandName::Uncc => self.uncc(ctx, issue, invocation).await,
            CommandName::Unassign => self.unassign(ctx, issue, invocation).await,
            CommandName::Kind => {
                self.categorise(ctx, issue, invocation, LabelCategory::Kind)
                    .await
            }
            CommandName::Area => {
                self.categorise(ctx, issue, invocation, LabelCategory::Area)
                    .await
            }
            CommandName::Priority => {
                self.categorise(ctx, issue, invocation, LabelCategory::Priority)
                    .await
            }
        }
    }

    /// Resolves `policy` for `user` and reports a denial according to the
    /// command's [`DenialMode`].
    pub(super) async fn admit(
        &self,
        issue: u64,
        command: CommandName,
        policy: Policy,
        user: &str,
    ) -> Result<Admission, BotError> {
        let decision = self.decide(policy, issue, user).await?;
        if decision.is_granted() {
            tracing::debug!(
                source = ?decision.source(),
                role = ?decision.role(),
                "authorized"
            );
            return Ok(Admission::Granted);
        }

        let reason = decision
            .reason()
            .unwrap_or("the user is not authorized")
            .to_owned();
        tracing::warn!(%reason, "denied");
        self.notify(issue, |replies| {
            replies.unauthorized(command.as_str(), &reason)
        })
        .await;

        match command.denial_mode() {
            DenialMode::Surface => Err(BotError::Unauthorized {
                user: user.to_owned(),
                command: command.as_str().to_owned(),
                reason,
            }),
            DenialMode::Quiet => Ok(Admission::Refused(CommandOutcome::Denied {
                command,
                user: user.to_owned(),
                reason,
            })),
        }
    }

    async fn decide(
        &self,
        policy: Policy,
        issue: u64,
        user: &str,
    ) -> Result<AuthorizationDecision, BotError> {
        match policy {
            Policy::Strict(role) => self.resolver.owners_or_membership(role, user).await,
            Policy::ReviewerOrApprover => self.resolver.reviewer_or_approver(user).await,
            Policy::ApproverOrCollaborator => self.resolver.approver_or_collaborator(user).await,
            Policy::Broad => Ok(self.resolver.broad(issue, user).await),
            Policy::Collaborator => Ok(self.resolver.collaborator(user).await),
        }
    }

    /// Refuses an author acting on their own pull request, with a reply.
    pub(super) async fn reject_self_action(
        &self,
        issue: u64,
        command: CommandName,
    ) -> CommandOutcome {
        tracing::info!("author cannot {command} their own pull request");
        self.notify(issue, |replies| replies.self_action(command.as_str()))
            .await;
        CommandOutcome::SelfActionRejected { command }
    }

    /// Posts a rendered reply; failures are logged and never propagated.
    pub(super) async fn notify<F>(&self, issue: u64, render: F)
    where
        F: FnOnce(&Replies) -> Result<String, BotError>,
    {
        let message = match render(self.replies) {
            Ok(message) => message,
            Err(error) => {
                tracing::error!(%error, "could not render reply");
                return;
            }
        };
        if let Err(error) = self.tracker.create_comment(issue, &message).await {
            tracing::error!(%error, "could not post reply");
        }
    }
}

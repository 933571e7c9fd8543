//! Catalogue labels: `/kind`, `/area`, `/priority`.

use crate::error::BotError;
use crate::github::Tracker;
use crate::labels::{LabelCatalogue, LabelCategory};

use super::context::CommentContext;
use super::gate::{Admission, CommandGate, CommandOutcome, Policy};
use super::parse::{CommandName, Invocation};

impl<T> CommandGate<'_, T>
where
    T: Tracker + ?Sized,
{
    /// Adds `category/name` for each argument the repository's label
    /// catalogue lists under `category`.
    pub(super) async fn categorise(
        &self,
        ctx: &CommentContext,
        issue: u64,
        invocation: &Invocation,
        category: LabelCategory,
    ) -> Result<CommandOutcome, BotError> {
        let command = invocation.command;
        if let Admission::Refused(outcome) = self
            .admit(issue, command, Policy::Broad, &ctx.commenter)
            .await?
        {
            return Ok(outcome);
        }

        let catalogue = self
            .tracker
            .label_catalogue()
            .await?
            .as_deref()
            .map(LabelCatalogue::parse)
            .transpose()?
            .unwrap_or_default();
        let labels = catalogue.prefixed(category, &invocation.args);
        if labels.is_empty() {
            return Err(unknown_names(command, category, &catalogue));
        }

        self.tracker.add_labels(issue, &labels).await?;
        Ok(CommandOutcome::applied(
            command,
            format!("added {}", labels.join(", ")),
        ))
    }
}

fn unknown_names(
    command: CommandName,
    category: LabelCategory,
    catalogue: &LabelCatalogue,
) -> BotError {
    let allowed = catalogue.allowed(category);
    let message = if allowed.is_empty() {
        format!("the label catalogue lists no {category} labels")
    } else {
        format!("please name one of: {}", allowed.join(", "))
    };
    BotError::CommandArguments {
        command: command.as_str().to_owned(),
        message,
    }
}

//! The triggering comment event.

use crate::error::BotError;

/// A comment on an issue or pull request, as delivered by the event payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentContext {
    /// Issue or pull request number; payloads occasionally omit it.
    pub issue: Option<u64>,
    /// Login of the commenter.
    pub commenter: String,
    /// Login of the issue or pull request author, if known.
    pub author: Option<String>,
    /// Raw comment body.
    pub body: String,
}

impl CommentContext {
    /// The issue number the comment was made on.
    ///
    /// # Errors
    ///
    /// Returns [`BotError::MissingIdentifier`] when the payload lacked one.
    pub fn issue_number(&self) -> Result<u64, BotError> {
        self.issue.ok_or(BotError::MissingIdentifier {
            field: "issue number",
        })
    }

    /// Whether the commenter authored the issue or pull request.
    #[must_use]
    pub fn is_self_action(&self) -> bool {
        self.author
            .as_deref()
            .is_some_and(|author| author.eq_ignore_ascii_case(&self.commenter))
    }
}

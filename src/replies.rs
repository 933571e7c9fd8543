//! User-visible messages posted by the bot, rendered with `minijinja`.
//!
//! Every comment and review body the bot writes comes from one of the
//! templates below. Auto-escaping is disabled because the output is
//! Markdown, not HTML.

use minijinja::{Environment, context};

use crate::error::BotError;

const NEEDS_REBASE: &str = "needs_rebase";
const SELF_ACTION: &str = "self_action";
const UNAUTHORIZED: &str = "unauthorized";
const APPROVED: &str = "approved";
const DISMISSED: &str = "dismissed";

const TEMPLATES: [(&str, &str); 5] = [
    (NEEDS_REBASE, "This PR needs rebase."),
    (
        SELF_ACTION,
        "You are the author and cannot comment `/{{ command }} [cancel]`.\n\n{{ tip }}",
    ),
    (
        UNAUTHORIZED,
        "Cannot run `/{{ command }}` because {{ reason }}.\n\n{{ tip }}",
    ),
    (
        APPROVED,
        "This PR has been approved by: @{{ user }}\n\n<details>\n\n{{ quoted }}\n\n</details>",
    ),
    (
        DISMISSED,
        "This PR has been dismissed by: @{{ user }}\n\n<details>\n\n{{ quoted }}\n\n</details>",
    ),
];

const COMMAND_TIP: &str = "<details>\n\nCommands accepted by this bot: `/lgtm [cancel]`, \
`/approve [cancel]`, `/hold [cancel]`, `/remove <label>...`, `/close`, `/reopen`, \
`/retitle <title>`, `/milestone <title>|cancel`, `/lock [reason]`, `/cc [user...]`, \
`/uncc [user...]`, `/unassign [user...]`.\n\n</details>";

/// Compiled reply templates.
#[derive(Debug)]
pub struct Replies {
    environment: Environment<'static>,
}

impl Replies {
    /// Compiles every reply template.
    ///
    /// # Errors
    ///
    /// Returns [`BotError::Template`] when a template fails to parse.
    pub fn new() -> Result<Self, BotError> {
        let mut environment = Environment::new();
        environment.set_auto_escape_callback(|_| minijinja::AutoEscape::None);
        for (name, source) in TEMPLATES {
            environment
                .add_template(name, source)
                .map_err(|error| BotError::Template {
                    message: format!("invalid template `{name}`: {error}"),
                })?;
        }
        Ok(Self { environment })
    }

    fn render(&self, name: &str, ctx: minijinja::Value) -> Result<String, BotError> {
        let template =
            self.environment
                .get_template(name)
                .map_err(|error| BotError::Template {
                    message: error.to_string(),
                })?;
        template.render(ctx).map_err(|error| BotError::Template {
            message: format!("rendering `{name}` failed: {error}"),
        })
    }

    /// The comment posted when a pull request gains `needs-rebase`.
    ///
    /// # Errors
    ///
    /// Returns [`BotError::Template`] when rendering fails.
    pub fn needs_rebase(&self) -> Result<String, BotError> {
        self.render(NEEDS_REBASE, context! {})
    }

    /// The reply to an author trying to `/lgtm` or `/approve` their own
    /// pull request.
    ///
    /// # Errors
    ///
    /// Returns [`BotError::Template`] when rendering fails.
    pub fn self_action(&self, command: &str) -> Result<String, BotError> {
        self.render(SELF_ACTION, context! { command => command, tip => COMMAND_TIP })
    }

    /// The reply explaining an authorization denial.
    ///
    /// # Errors
    ///
    /// Returns [`BotError::Template`] when rendering fails.
    pub fn unauthorized(&self, command: &str, reason: &str) -> Result<String, BotError> {
        self.render(
            UNAUTHORIZED,
            context! { command => command, reason => reason, tip => COMMAND_TIP },
        )
    }

    /// Body of the bot's approving review.
    ///
    /// # Errors
    ///
    /// Returns [`BotError::Template`] when rendering fails.
    pub fn approved(&self, user: &str, comment_body: &str) -> Result<String, BotError> {
        self.render(
            APPROVED,
            context! { user => user, quoted => quote(comment_body) },
        )
    }

    /// Dismissal message for a cancelled approval.
    ///
    /// # Errors
    ///
    /// Returns [`BotError::Template`] when rendering fails.
    pub fn dismissed(&self, user: &str, comment_body: &str) -> Result<String, BotError> {
        self.render(
            DISMISSED,
            context! { user => user, quoted => quote(comment_body) },
        )
    }
}

/// Markdown block-quotes every line of `body`.
fn quote(body: &str) -> String {
    body.lines()
        .map(|line| format!("> {line}"))
        .collect::<Vec<_>>()
        .join("\n")
}

//! Extraction of `/command arg...` lines from a comment body.

use std::fmt;
use std::str::FromStr;

/// Commands the bot understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandName {
    /// `/lgtm [cancel]`
    Lgtm,
    /// `/approve [cancel]`
    Approve,
    /// `/hold [cancel]`
    Hold,
    /// `/remove <label>...`
    Remove,
    /// `/close`
    Close,
    /// `/reopen`
    Reopen,
    /// `/retitle <title>`
    Retitle,
    /// `/milestone <title>` or `/milestone cancel`
    Milestone,
    /// `/lock [reason]`
    Lock,
    /// `/cc [user...]`
    Cc,
    /// `/uncc [user...]`
    Uncc,
    /// `/unassign [user...]`
    Unassign,
    /// `/kind <name>...`
    Kind,
    /// `/area <name>...`
    Area,
    /// `/priority <name>...`
    Priority,
}

impl CommandName {
    /// The command word without its slash.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Lgtm => "lgtm",
            Self::Approve => "approve",
            Self::Hold => "hold",
            Self::Remove => "remove",
            Self::Close => "close",
            Self::Reopen => "reopen",
            Self::Retitle => "retitle",
            Self::Milestone => "milestone",
            Self::Lock => "lock",
            Self::Cc => "cc",
            Self::Uncc => "uncc",
            Self::Unassign => "unassign",
            Self::Kind => "kind",
            Self::Area => "area",
            Self::Priority => "priority",
        }
    }
}

impl fmt::Display for CommandName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CommandName {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "lgtm" => Ok(Self::Lgtm),
            "approve" => Ok(Self::Approve),
            "hold" => Ok(Self::Hold),
            "remove" => Ok(Self::Remove),
            "close" => Ok(Self::Close),
            "reopen" => Ok(Self::Reopen),
            "retitle" => Ok(Self::Retitle),
            "milestone" => Ok(Self::Milestone),
            "lock" => Ok(Self::Lock),
            "cc" => Ok(Self::Cc),
            "uncc" => Ok(Self::Uncc),
            "unassign" => Ok(Self::Unassign),
            "kind" => Ok(Self::Kind),
            "area" => Ok(Self::Area),
            "priority" => Ok(Self::Priority),
            _ => Err(()),
        }
    }
}

/// One command found in a comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Which command.
    pub command: CommandName,
    /// Whitespace-separated arguments after the command word.
    pub args: Vec<String>,
    /// The rest of the line after the command word, trimmed.
    pub line: String,
}

impl Invocation {
    /// Whether the first argument is the literal `cancel`.
    #[must_use]
    pub fn is_cancel(&self) -> bool {
        self.args.first().is_some_and(|arg| arg == "cancel")
    }
}

/// Finds every command in `body`, one per line, in order.
///
/// A command is a line whose first token is `/` followed by a known command
/// word. Unknown words and ordinary prose are ignored.
#[must_use]
pub fn parse_commands(body: &str) -> Vec<Invocation> {
    body.lines().filter_map(parse_line).collect()
}

fn parse_line(raw: &str) -> Option<Invocation> {
    let rest = raw.trim().strip_prefix('/')?;
    let (word, tail) = rest
        .split_once(char::is_whitespace)
        .unwrap_or((rest, ""));
    let command = word.parse::<CommandName>().ok()?;
    let line = tail.trim().to_owned();
    let args = line.split_whitespace().map(str::to_owned).collect();
    Some(Invocation {
        command,
        args,
        line,
    })
}

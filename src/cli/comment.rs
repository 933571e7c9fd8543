//! Comment command handling.

use std::io::Write;

use prowbot::{BotConfig, BotError, CommandGate, Replies, Tracker};

use super::output::write_command_outcomes;

/// Runs the commands in the configured comment.
///
/// # Errors
///
/// Returns the first failing command's error, or a configuration error when
/// the commenter is missing.
pub async fn run<T, W>(
    config: &BotConfig,
    tracker: &T,
    replies: &Replies,
    writer: &mut W,
) -> Result<(), BotError>
where
    T: Tracker + ?Sized,
    W: Write,
{
    let ctx = config.comment_context()?;
    let gate = CommandGate::new(tracker, replies, &config.robot_name);
    let outcomes = gate.run(&ctx).await?;
    write_command_outcomes(writer, &outcomes)
}

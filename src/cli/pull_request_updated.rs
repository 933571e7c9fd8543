//! New commits on a pull request.

use std::io::Write;

use prowbot::{BotConfig, BotError, Tracker, pull_request_updated};

use super::output::write_update_result;

/// Withdraws `LGTM` from the configured pull request.
///
/// # Errors
///
/// Returns [`BotError::MissingIdentifier`] without a pull request number and
/// tracker errors otherwise.
pub async fn run<T, W>(config: &BotConfig, tracker: &T, writer: &mut W) -> Result<(), BotError>
where
    T: Tracker + ?Sized,
    W: Write,
{
    let number = config.issue.ok_or(BotError::MissingIdentifier {
        field: "pull request number",
    })?;
    let removed = pull_request_updated(tracker, number).await?;
    write_update_result(writer, number, removed)
}

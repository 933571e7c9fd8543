//! Output formatting for CLI operations.

use std::io::{self, Write};

use prowbot::merge::MergeSummary;
use prowbot::{BotError, CommandOutcome, TrackerError};

fn io_error(error: &io::Error) -> BotError {
    BotError::Tracker(TrackerError::Io {
        message: error.to_string(),
    })
}

/// Writes the per-pull-request results and totals of a merge sweep.
pub fn write_merge_summary<W: Write>(
    writer: &mut W,
    summary: &MergeSummary,
) -> Result<(), BotError> {
    for outcome in &summary.outcomes {
        writeln!(
            writer,
            "  #{} {}: {}",
            outcome.number, outcome.result, outcome.reason
        )
        .map_err(|e| io_error(&e))?;
    }
    writeln!(
        writer,
        "Merged {} of {} pull request(s)",
        summary.jobs_done(),
        summary.outcomes.len()
    )
    .map_err(|e| io_error(&e))
}

/// Writes one line per command outcome.
pub fn write_command_outcomes<W: Write>(
    writer: &mut W,
    outcomes: &[CommandOutcome],
) -> Result<(), BotError> {
    if outcomes.is_empty() {
        return writeln!(writer, "No commands to run").map_err(|e| io_error(&e));
    }
    for outcome in outcomes {
        let line = match outcome {
            CommandOutcome::Applied { command, detail } => format!("/{command}: {detail}"),
            CommandOutcome::Denied {
                command,
                user,
                reason,
            } => format!("/{command}: denied for {user}: {reason}"),
            CommandOutcome::SelfActionRejected { command } => {
                format!("/{command}: rejected, the author cannot {command} their own pull request")
            }
            CommandOutcome::NoOp { command, reason } => format!("/{command}: skipped, {reason}"),
        };
        writeln!(writer, "{line}").map_err(|e| io_error(&e))?;
    }
    Ok(())
}

/// Reports whether `LGTM` was withdrawn from a pull request.
pub fn write_update_result<W: Write>(
    writer: &mut W,
    number: u64,
    removed: bool,
) -> Result<(), BotError> {
    let message = if removed {
        format!("Removed LGTM from #{number}")
    } else {
        format!("#{number} had no LGTM to remove")
    };
    writeln!(writer, "{message}").map_err(|e| io_error(&e))
}

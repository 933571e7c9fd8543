//! Comment commands: parsing, authorization, and the mutations they perform.
//!
//! [`CommandGate::run`] extracts every `/command` line from a comment and
//! executes them in order. Each handler resolves its authorization policy
//! first; denials either fail the invocation or are reported as
//! [`CommandOutcome::Denied`] depending on the command's [`DenialMode`].

pub mod context;
pub mod gate;
mod housekeeping;
mod labelling;
pub mod parse;
mod requests;
mod review;

#[cfg(test)]
mod tests;

pub use context::CommentContext;
pub use gate::{CommandGate, CommandOutcome, DenialMode, Policy};
pub use parse::{CommandName, Invocation, parse_commands};

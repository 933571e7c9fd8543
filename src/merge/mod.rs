//! Automatic merging: the rebase gate and the paginated merge sweep.

pub mod orchestrator;
pub mod pacing;
pub mod rebase_gate;

pub use orchestrator::{MergeOrchestrator, MergeOutcome, MergeResult, MergeSummary};
pub use pacing::Pacing;
pub use rebase_gate::{RebaseCheck, RebaseGate};

//! Label sets and the merge-eligibility predicate derived from them.
//!
//! Labels are plain names. Four of them drive automatic merging: `LGTM` and
//! `approved` must both be present, while `hold` and `needs-rebase` each
//! block a merge outright.

use std::collections::BTreeSet;
use std::fmt;

mod catalogue;

pub use catalogue::{LabelCatalogue, LabelCategory};

/// Added by `/lgtm`; one of the two labels a merge requires.
pub const LGTM: &str = "LGTM";
/// Added by `/approve`; one of the two labels a merge requires.
pub const APPROVED: &str = "approved";
/// Added by `/hold`; blocks merging while present.
pub const HOLD: &str = "hold";
/// Maintained by the rebase gate while a pull request has conflicts.
pub const NEEDS_REBASE: &str = "needs-rebase";

/// Unordered set of label names attached to an issue or pull request.
///
/// Insertion and removal are idempotent, mirroring how the tracker treats
/// label mutations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelSet(BTreeSet<String>);

impl LabelSet {
    /// Creates an empty label set.
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeSet::new())
    }

    /// Returns whether `name` is present.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains(name)
    }

    /// Adds `name`; returns `false` when it was already present.
    pub fn insert(&mut self, name: impl Into<String>) -> bool {
        self.0.insert(name.into())
    }

    /// Removes `name`; returns `false` when it was already absent.
    pub fn remove(&mut self, name: &str) -> bool {
        self.0.remove(name)
    }

    /// Iterates over label names in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Number of labels in the set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns whether the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for LabelSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl fmt::Display for LabelSet {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.iter().collect();
        write!(formatter, "[{}]", names.join(", "))
    }
}

/// Why a label set does or does not permit merging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeVerdict {
    /// Every required label is present and nothing blocks.
    Eligible,
    /// `hold` is present.
    OnHold,
    /// `needs-rebase` is present.
    NeedsRebase,
    /// `LGTM` is missing.
    MissingLgtm,
    /// `approved` is missing.
    MissingApproval,
}

impl MergeVerdict {
    /// Returns whether the verdict allows a merge.
    #[must_use]
    pub const fn is_eligible(self) -> bool {
        matches!(self, Self::Eligible)
    }

    /// Short human-readable reason, used in merge outcomes and logs.
    #[must_use]
    pub const fn reason(self) -> &'static str {
        match self {
            Self::Eligible => "eligible for merge",
            Self::OnHold => "on hold",
            Self::NeedsRebase => "needs rebase",
            Self::MissingLgtm => "missing LGTM",
            Self::MissingApproval => "missing approval",
        }
    }
}

/// Classifies a label set. Blocking labels are reported before missing
/// ones, and `hold` before everything else.
#[must_use]
pub fn merge_verdict(labels: &LabelSet) -> MergeVerdict {
    if labels.contains(HOLD) {
        MergeVerdict::OnHold
    } else if labels.contains(NEEDS_REBASE) {
        MergeVerdict::NeedsRebase
    } else if !labels.contains(LGTM) {
        MergeVerdict::MissingLgtm
    } else if !labels.contains(APPROVED) {
        MergeVerdict::MissingApproval
    } else {
        MergeVerdict::Eligible
    }
}

/// `LGTM ∈ labels ∧ approved ∈ labels ∧ hold ∉ labels ∧ needs-rebase ∉ labels`.
#[must_use]
pub fn mergeable_by_label(labels: &LabelSet) -> bool {
    merge_verdict(labels).is_eligible()
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{
        APPROVED, HOLD, LGTM, LabelSet, MergeVerdict, NEEDS_REBASE, merge_verdict,
        mergeable_by_label,
    };

    const SENTINELS: [&str; 4] = [LGTM, APPROVED, HOLD, NEEDS_REBASE];

    /// Every subset of the sentinel labels, plus an unrelated label so the
    /// predicate is shown to ignore noise.
    fn all_sentinel_subsets() -> impl Iterator<Item = LabelSet> {
        (0_u8..16).map(|mask| {
            let mut labels: LabelSet = SENTINELS
                .iter()
                .enumerate()
                .filter(|(bit, _)| mask & (1 << bit) != 0)
                .map(|(_, name)| *name)
                .collect();
            labels.insert("kind/bug");
            labels
        })
    }

    #[rstest]
    fn predicate_matches_its_definition_for_every_sentinel_subset() {
        for labels in all_sentinel_subsets() {
            let expected = labels.contains(LGTM)
                && labels.contains(APPROVED)
                && !labels.contains(HOLD)
                && !labels.contains(NEEDS_REBASE);
            assert_eq!(
                mergeable_by_label(&labels),
                expected,
                "predicate mismatch for {labels}"
            );
        }
    }

    #[rstest]
    #[case::eligible(&[LGTM, APPROVED], MergeVerdict::Eligible)]
    #[case::hold_wins_over_everything(&[LGTM, APPROVED, HOLD, NEEDS_REBASE], MergeVerdict::OnHold)]
    #[case::needs_rebase(&[LGTM, APPROVED, NEEDS_REBASE], MergeVerdict::NeedsRebase)]
    #[case::missing_lgtm(&[APPROVED], MergeVerdict::MissingLgtm)]
    #[case::missing_approval(&[LGTM], MergeVerdict::MissingApproval)]
    #[case::empty(&[], MergeVerdict::MissingLgtm)]
    fn verdict_names_the_first_blocking_reason(
        #[case] names: &[&str],
        #[case] expected: MergeVerdict,
    ) {
        let labels: LabelSet = names.iter().copied().collect();
        assert_eq!(merge_verdict(&labels), expected);
    }

    #[rstest]
    fn label_names_are_case_sensitive() {
        let labels: LabelSet = ["lgtm", APPROVED].into_iter().collect();
        assert!(!mergeable_by_label(&labels));
    }

    #[rstest]
    fn insert_and_remove_are_idempotent() {
        let mut labels: LabelSet = [LGTM].into_iter().collect();
        let before = labels.clone();

        assert!(!labels.insert(LGTM), "re-adding should report no change");
        assert_eq!(labels, before);
        assert!(!labels.remove(HOLD), "removing an absent label is a no-op");
        assert_eq!(labels, before);
    }
}

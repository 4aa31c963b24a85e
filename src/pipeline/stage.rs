//! Stage classification.
//!
//! A pure priority chain over the ticket's label set. Labels are set by
//! humans reviewing pipeline output and may be stale or added out of order,
//! so precedence encodes "most advanced wins".

use std::fmt;

use super::labels;

/// Pipeline stage of a ticket, derived fresh on every run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Create the work package and open a draft pull request
    Bootstrap,
    /// Fold human plan feedback into the task document
    PlanFeedback,
    /// Hand the approved plan over for implementation
    PlanApproved,
    /// Report review findings back to the ticket
    ReviewFeedback,
    /// Clean up the work package and merge
    ReadyToMerge,
    /// No stage matched; await human input
    Undetermined,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Bootstrap => "BOOTSTRAP",
            Self::PlanFeedback => "PLAN-FEEDBACK",
            Self::PlanApproved => "PLAN-APPROVED",
            Self::ReviewFeedback => "REVIEW-FEEDBACK",
            Self::ReadyToMerge => "READY-TO-MERGE",
            Self::Undetermined => "UNDETERMINED",
        };
        write!(f, "{s}")
    }
}

/// Classify a ticket into a stage.
///
/// First match wins: `mergeable` > `reviewable` with the review artifact on
/// disk > `approved` > `proposed` with at least one comment > `ready`.
/// Anything else is [`Stage::Undetermined`].
#[must_use]
pub fn classify(label_names: &[String], has_review_artifact: bool, comment_count: usize) -> Stage {
    let has = |name: &str| label_names.iter().any(|l| l == name);

    if has(labels::MERGEABLE) {
        return Stage::ReadyToMerge;
    }

    if has(labels::REVIEWABLE) && has_review_artifact {
        return Stage::ReviewFeedback;
    }

    if has(labels::APPROVED) {
        return Stage::PlanApproved;
    }

    if has(labels::PROPOSED) && comment_count > 0 {
        return Stage::PlanFeedback;
    }

    if has(labels::READY) {
        return Stage::Bootstrap;
    }

    Stage::Undetermined
}

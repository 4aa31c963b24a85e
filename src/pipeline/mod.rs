//! Delivery pipeline engine.
//!
//! The pipeline has no stored execution state: every run re-derives the
//! ticket's stage from its tracker labels and the files present in its work
//! package, performs that stage's side effects, and exits. Crash recovery is
//! re-running the engine; every step is written to tolerate having already
//! happened.
//!
//! ## Stages
//!
//! - `BOOTSTRAP` - create the work package, open a draft pull request
//! - `PLAN-FEEDBACK` - fold human feedback into the task document
//! - `PLAN-APPROVED` - hand the approved plan over for implementation
//! - `REVIEW-FEEDBACK` - report review findings back to the ticket
//! - `READY-TO-MERGE` - clean up and merge
//! - `UNDETERMINED` - nothing to do; print guidance

mod context;
mod engine;
mod handlers;
mod stage;
mod workpackage;

#[cfg(test)]
pub(crate) mod testutil;

pub use context::WorkPackageContext;
pub use engine::Engine;
pub use stage::{classify, Stage};
pub use workpackage::{slugify, PrLink, WorkPackage};

use crate::git::GitError;
use crate::integrations::TrackerError;

/// Marker carried by every machine-authored comment body.
///
/// Filtering is by substring containment on this value; [`MARKER_PREFIX`] is
/// what gets prepended when posting.
pub const MARKER: &str = "AI Generated Content";

/// Prefix for machine-authored comment bodies.
pub const MARKER_PREFIX: &str = "[AI Generated Content]\n\n";

/// Base branch pull requests merge into.
pub const BASE_BRANCH: &str = "main";

/// Label vocabulary the pipeline reads and writes.
///
/// The trigger labels (`ready`, `proposed`, ...) and the labels the handlers
/// mutate (`ready-for-agent`, `plan-proposed`, ...) are distinct sets; label
/// removal tolerates absent labels, so acting on a name that was never set is
/// harmless.
pub mod labels {
    /// Classifier trigger: merge the work package.
    pub const MERGEABLE: &str = "mergeable";
    /// Classifier trigger: review feedback is ready to report.
    pub const REVIEWABLE: &str = "reviewable";
    /// Classifier trigger: the plan has been approved.
    pub const APPROVED: &str = "approved";
    /// Classifier trigger: a plan has been proposed.
    pub const PROPOSED: &str = "proposed";
    /// Classifier trigger: the ticket is ready for the pipeline.
    pub const READY: &str = "ready";

    /// Removed by BOOTSTRAP.
    pub const READY_FOR_AGENT: &str = "ready-for-agent";
    /// Added by BOOTSTRAP.
    pub const PLAN_PROPOSED: &str = "plan-proposed";
    /// Removed by PLAN-APPROVED.
    pub const PLAN_APPROVED: &str = "plan-approved";
    /// Added by PLAN-APPROVED.
    pub const IN_REVIEW: &str = "in-review";
    /// Added while the pipeline holds the ticket, removed when it lets go.
    pub const LOCKED: &str = "locked";
}

/// Error types for pipeline runs.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("no pull request is linked to issue #{number}; cannot merge")]
    MissingPullRequest { number: u64 },

    #[error(transparent)]
    Tracker(#[from] TrackerError),

    #[error(transparent)]
    Git(#[from] GitError),

    #[error("work package I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed PR link file: {0}")]
    Json(#[from] serde_json::Error),
}

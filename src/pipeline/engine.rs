//! Pipeline engine.
//!
//! The single entry point: assemble context, classify, dispatch to exactly
//! one handler. No retries live here; a handler failure aborts the run and
//! surfaces to the caller, and recovery is simply running the engine again.

use std::path::PathBuf;

use crate::git::VcsGateway;
use crate::integrations::TrackerGateway;

use super::context::WorkPackageContext;
use super::{handlers, PipelineError, Stage};

/// Drives one ticket through one pipeline step per run.
pub struct Engine<T, V> {
    tracker: T,
    vcs: V,
    repo_root: PathBuf,
}

impl<T, V> Engine<T, V>
where
    T: TrackerGateway,
    V: VcsGateway,
{
    /// Create an engine over the given gateways, rooted at the repository
    /// the work packages live in.
    pub fn new(tracker: T, vcs: V, repo_root: impl Into<PathBuf>) -> Self {
        Self { tracker, vcs, repo_root: repo_root.into() }
    }

    /// Process a ticket: build context, classify, run the stage handler.
    pub async fn run(&self, ticket: u64) -> Result<(), PipelineError> {
        let ctx =
            WorkPackageContext::build(&self.tracker, &self.vcs, &self.repo_root, ticket).await?;

        let stage = ctx.stage();
        tracing::info!("processing issue #{} in stage {stage}", ctx.issue.number);

        match stage {
            Stage::Bootstrap => handlers::bootstrap(&self.tracker, &self.vcs, &ctx).await,
            Stage::PlanFeedback => handlers::plan_feedback(&self.tracker, &self.vcs, &ctx).await,
            Stage::PlanApproved => handlers::plan_approved(&self.tracker, &self.vcs, &ctx).await,
            Stage::ReviewFeedback => {
                handlers::review_feedback(&self.tracker, &self.vcs, &ctx).await
            }
            Stage::ReadyToMerge => handlers::ready_to_merge(&self.tracker, &self.vcs, &ctx).await,
            Stage::Undetermined => {
                handlers::undetermined(&ctx);
                Ok(())
            }
        }
    }
}

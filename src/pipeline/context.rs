//! Work package context assembly.
//!
//! Builds the full picture a run needs before anything mutates: the ticket,
//! the linked pull request if one was ever opened, the merged comment list
//! with the pipeline's own output filtered back out, and CI check results.

use std::path::Path;

use crate::git::VcsGateway;
use crate::integrations::{CheckRun, Comment, Issue, PullRequest, TrackerGateway};

use super::workpackage::{PrLink, WorkPackage};
use super::{classify, PipelineError, Stage, MARKER};

/// Everything a stage handler gets to look at.
///
/// Constructed once per run, read-only afterwards.
#[derive(Debug, Clone)]
pub struct WorkPackageContext {
    /// The ticket driving this work package
    pub issue: Issue,
    /// The linked pull request, if one was ever opened
    pub pull_request: Option<PullRequest>,
    /// Ticket comments, plus PR review comments when a PR is linked, with
    /// machine-authored comments dropped
    pub comments: Vec<Comment>,
    /// CI check runs for the PR head ref; empty without a PR
    pub checks: Vec<CheckRun>,
    /// Work package identity and layout
    pub work_package: WorkPackage,
}

impl WorkPackageContext {
    /// Assemble the context for a ticket.
    ///
    /// Ensures the work-package branch is checked out as a side effect. Any
    /// fetch failure is fatal for the run; handlers never see a partial
    /// context.
    pub async fn build<T, V>(
        tracker: &T,
        vcs: &V,
        repo_root: &Path,
        ticket: u64,
    ) -> Result<Self, PipelineError>
    where
        T: TrackerGateway,
        V: VcsGateway,
    {
        let issue = tracker.get_issue(ticket).await?;
        let work_package = WorkPackage::new(repo_root, issue.number, &issue.title);

        vcs.ensure_branch(work_package.name())?;

        if work_package.has_pr_link() {
            let link = PrLink::load(&work_package.pr_link_path())?;
            let pull_request = tracker.get_pull_request(link.id).await?;

            let mut comments = tracker.list_issue_comments(issue.number).await?;
            comments.extend(tracker.list_pull_request_comments(link.id).await?);
            // The pipeline's own reports must not read as fresh human
            // feedback on the next run.
            comments.retain(|c| !c.body.contains(MARKER));

            let checks = tracker.list_checks(&pull_request.head.name).await?;

            Ok(Self {
                issue,
                pull_request: Some(pull_request),
                comments,
                checks,
                work_package,
            })
        } else {
            let comments = tracker.list_issue_comments(issue.number).await?;

            Ok(Self { issue, pull_request: None, comments, checks: Vec::new(), work_package })
        }
    }

    /// Classify this context into its pipeline stage.
    #[must_use]
    pub fn stage(&self) -> Stage {
        classify(
            &self.issue.label_names(),
            self.work_package.has_review_artifact(),
            self.comments.len(),
        )
    }
}

//! Stage handlers.
//!
//! One handler per pipeline stage. Each is a short sequence of side effects
//! against the tracker and the repository, ordered so that the recoverable
//! mutations happen first and the hard-to-undo ones (merging, label
//! stripping) happen last. Every step tolerates having already run: existence
//! checks before creation, diff checks before commits, absent-label removal
//! as a no-op.

use std::fs;

use crate::git::{GitResult, VcsGateway};
use crate::integrations::TrackerGateway;
use crate::templates;

use super::context::WorkPackageContext;
use super::workpackage::{PrLink, WorkPackage};
use super::{labels, PipelineError, BASE_BRANCH, MARKER_PREFIX};

/// BOOTSTRAP: create the work package and open its draft pull request.
pub(crate) async fn bootstrap<T, V>(
    tracker: &T,
    vcs: &V,
    ctx: &WorkPackageContext,
) -> Result<(), PipelineError>
where
    T: TrackerGateway,
    V: VcsGateway,
{
    let wp = &ctx.work_package;

    fs::create_dir_all(wp.dir())?;
    fs::write(wp.task_path(), templates::render_bootstrap_task(ctx))?;
    fs::write(wp.cost_path(), templates::render_cost(ctx))?;

    // The push must land at least one commit so the pull request below has
    // something to show.
    commit_and_push(
        vcs,
        wp,
        &format!("chore(issuerun): bootstrap work package {}", wp.name()),
    )?;

    let title = format!("agent(#{}): {}", ctx.issue.number, ctx.issue.title);
    let body = format!("Closes #{}", ctx.issue.number);
    let pr = tracker.create_pull_request(&title, &body, wp.name(), BASE_BRANCH, true).await?;

    PrLink { id: pr.number }.save(&wp.pr_link_path())?;

    tracker.remove_label(ctx.issue.number, labels::READY_FOR_AGENT).await?;
    tracker.add_label(ctx.issue.number, labels::PLAN_PROPOSED).await?;
    tracker.add_label(ctx.issue.number, labels::LOCKED).await?;

    print_prompt(ctx);
    Ok(())
}

/// PLAN-FEEDBACK: fold human feedback into the task document.
pub(crate) async fn plan_feedback<T, V>(
    _tracker: &T,
    vcs: &V,
    ctx: &WorkPackageContext,
) -> Result<(), PipelineError>
where
    T: TrackerGateway,
    V: VcsGateway,
{
    let wp = &ctx.work_package;

    if !wp.plan_path().exists() {
        println!(
            "PLAN.md does not exist in {}. Review the ticket and assign the \
             'ready-for-agent' label if the pipeline should start over.",
            wp.name()
        );
        return Ok(());
    }

    fs::write(wp.task_path(), templates::render_plan_feedback_task(ctx))?;
    commit_and_push(vcs, wp, "chore(issuerun): update task with plan feedback")?;

    print_prompt(ctx);
    Ok(())
}

/// PLAN-APPROVED: hand the approved plan over for implementation.
pub(crate) async fn plan_approved<T, V>(
    tracker: &T,
    vcs: &V,
    ctx: &WorkPackageContext,
) -> Result<(), PipelineError>
where
    T: TrackerGateway,
    V: VcsGateway,
{
    let wp = &ctx.work_package;

    tracker.remove_label(ctx.issue.number, labels::PLAN_APPROVED).await?;
    tracker.add_label(ctx.issue.number, labels::IN_REVIEW).await?;
    tracker.add_label(ctx.issue.number, labels::LOCKED).await?;

    fs::write(wp.task_path(), templates::render_plan_approved_task(ctx))?;
    commit_and_push(vcs, wp, "chore(issuerun): update task for implementation")?;

    print_prompt(ctx);
    Ok(())
}

/// REVIEW-FEEDBACK: report review findings back to the ticket.
pub(crate) async fn review_feedback<T, V>(
    tracker: &T,
    vcs: &V,
    ctx: &WorkPackageContext,
) -> Result<(), PipelineError>
where
    T: TrackerGateway,
    V: VcsGateway,
{
    let wp = &ctx.work_package;

    let report = fs::read_to_string(wp.review_artifact_path())?;
    tracker.add_comment(ctx.issue.number, &format!("{MARKER_PREFIX}{report}")).await?;

    fs::write(wp.task_path(), templates::render_review_feedback_task(ctx))?;
    commit_and_push(vcs, wp, "chore(issuerun): report fixes required")?;

    print_prompt(ctx);

    // Best effort: the report and the commit above must not be rolled back
    // for a cosmetic label failure.
    if let Err(err) = tracker.remove_label(ctx.issue.number, labels::LOCKED).await {
        tracing::warn!("failed to remove '{}' label: {err}", labels::LOCKED);
    }

    Ok(())
}

/// READY-TO-MERGE: strip labels, report cost, delete the package, merge.
pub(crate) async fn ready_to_merge<T, V>(
    tracker: &T,
    vcs: &V,
    ctx: &WorkPackageContext,
) -> Result<(), PipelineError>
where
    T: TrackerGateway,
    V: VcsGateway,
{
    let wp = &ctx.work_package;

    let pr = ctx
        .pull_request
        .as_ref()
        .ok_or(PipelineError::MissingPullRequest { number: ctx.issue.number })?;

    tracker.remove_all_labels_from_issue(ctx.issue.number).await?;
    tracker.remove_all_labels_from_pull_request(pr.number).await?;

    if wp.cost_path().exists() {
        let cost = fs::read_to_string(wp.cost_path())?;
        tracker.add_comment(ctx.issue.number, &format!("{MARKER_PREFIX}{cost}")).await?;
    }

    if wp.dir().exists() {
        fs::remove_dir_all(wp.dir())?;
        tracing::info!("deleted work package {}", wp.name());
    }

    vcs.stage_all()?;
    if vcs.has_uncommitted_changes() {
        vcs.commit(&format!("chore: clean up work package for #{}", ctx.issue.number))?;
        vcs.push(None)?;
    }

    tracker.merge_pull_request(pr.number).await?;

    println!("Work package {} merged. The ticket is complete.", wp.name());
    Ok(())
}

/// UNDETERMINED: no mutation, guidance only.
pub(crate) fn undetermined(ctx: &WorkPackageContext) {
    println!("Issue #{} is in an undetermined state.", ctx.issue.number);
    println!(
        "Add the 'ready-for-agent' label to the ticket and re-run to put it \
         through the pipeline."
    );
}

/// Stage everything and push, committing empty when the tree is unchanged.
///
/// The empty-commit fallback guarantees the branch always gains a commit, so
/// a pull request can be opened against it even when a render produced
/// byte-identical output.
pub(crate) fn commit_and_push<V: VcsGateway>(
    vcs: &V,
    wp: &WorkPackage,
    message: &str,
) -> GitResult<()> {
    vcs.stage_all()?;
    if vcs.has_uncommitted_changes() {
        vcs.commit(message)?;
    } else {
        vcs.commit_allow_empty(message)?;
    }
    vcs.push(Some(wp.name()))
}

/// Print the hand-off prompt for the coding agent.
fn print_prompt(ctx: &WorkPackageContext) {
    println!("{}", templates::render_prompt(ctx));
}

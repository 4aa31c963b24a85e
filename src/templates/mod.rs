//! Stage document rendering.
//!
//! Deterministic markdown generation from the run context, in plain
//! `format!` templates. Each mutating stage overwrites the work package's
//! task document with instructions for the coding agent; the prompt is the
//! hand-off text printed to stdout at the end of a run.

use crate::integrations::CheckStatus;
use crate::pipeline::WorkPackageContext;

/// Render the task document for the BOOTSTRAP stage.
pub fn render_bootstrap_task(ctx: &WorkPackageContext) -> String {
    format!(
        "{header}\
         \n## Objective\n\n\
         Draft an implementation plan for the issue below. Write the plan to\n\
         `{wp}/PLAN.md` and record a cost estimate in `{wp}/cost.md`.\n\
         {issue}{comments}\
         \n## Notes\n\n\
         - Do not start implementing; this stage is planning only.\n\
         - Keep the plan reviewable: goals, approach, touched files, risks.\n",
        header = header(ctx),
        wp = ctx.work_package.name(),
        issue = issue_section(ctx),
        comments = comments_section(ctx),
    )
}

/// Render the initial cost document scaffold.
pub fn render_cost(ctx: &WorkPackageContext) -> String {
    format!(
        "# Cost Estimate\n\n\
         Work package `{wp}` for issue #{number}.\n\n\
         | Item | Estimate |\n\
         |---|---|\n\
         | Planning | - |\n\
         | Implementation | - |\n\
         | Review | - |\n\n\
         Update this file as the work progresses; it is posted back to the\n\
         ticket when the work package is merged.\n",
        wp = ctx.work_package.name(),
        number = ctx.issue.number,
    )
}

/// Render the task document for the PLAN-FEEDBACK stage.
pub fn render_plan_feedback_task(ctx: &WorkPackageContext) -> String {
    format!(
        "{header}\
         \n## Objective\n\n\
         The proposed plan in `{wp}/PLAN.md` has received feedback. Revise\n\
         the plan so every point below is addressed.\n\
         {issue}{comments}\
         \n## Notes\n\n\
         - Update `PLAN.md` in place; do not start implementing.\n",
        header = header(ctx),
        wp = ctx.work_package.name(),
        issue = issue_section(ctx),
        comments = comments_section(ctx),
    )
}

/// Render the task document for the PLAN-APPROVED stage.
pub fn render_plan_approved_task(ctx: &WorkPackageContext) -> String {
    format!(
        "{header}\
         \n## Objective\n\n\
         The plan in `{wp}/PLAN.md` is approved. Implement it on this\n\
         branch, committing as you go.\n\
         {issue}{checks}\
         \n## Notes\n\n\
         - Follow the approved plan; record deviations in `PLAN.md`.\n\
         - Keep `{wp}/cost.md` up to date.\n",
        header = header(ctx),
        wp = ctx.work_package.name(),
        issue = issue_section(ctx),
        checks = checks_section(ctx),
    )
}

/// Render the task document for the REVIEW-FEEDBACK stage.
pub fn render_review_feedback_task(ctx: &WorkPackageContext) -> String {
    format!(
        "{header}\
         \n## Objective\n\n\
         Review findings were reported in `{wp}/qa.md` and on the ticket.\n\
         Fix every finding on this branch.\n\
         {comments}{checks}\
         \n## Notes\n\n\
         - Address each finding or explain in the pull request why not.\n",
        header = header(ctx),
        wp = ctx.work_package.name(),
        comments = comments_section(ctx),
        checks = checks_section(ctx),
    )
}

/// Render the hand-off prompt printed after a mutating stage.
pub fn render_prompt(ctx: &WorkPackageContext) -> String {
    format!(
        "You are working on work package `{wp}` for issue #{number}\n\
         (\"{title}\"). The branch `{wp}` is checked out. Open\n\
         `{wp}/TASK.md` and carry out the task it describes.",
        wp = ctx.work_package.name(),
        number = ctx.issue.number,
        title = ctx.issue.title,
    )
}

/// Shared document header.
fn header(ctx: &WorkPackageContext) -> String {
    format!(
        "# Task: {title}\n\nWork package `{wp}` for issue #{number}.\n",
        title = ctx.issue.title,
        wp = ctx.work_package.name(),
        number = ctx.issue.number,
    )
}

/// The ticket body, or a placeholder when none was written.
fn issue_section(ctx: &WorkPackageContext) -> String {
    let body = ctx.issue.body.as_deref().unwrap_or("(no description provided)");
    format!("\n## Issue\n\n{body}\n")
}

/// Human feedback gathered from the ticket and pull request.
fn comments_section(ctx: &WorkPackageContext) -> String {
    if ctx.comments.is_empty() {
        return String::new();
    }

    let mut section = String::from("\n## Feedback\n\n");
    for comment in &ctx.comments {
        section.push_str(&format!("- **{}**: {}\n", comment.user.login, comment.body));
    }
    section
}

/// CI check results for the pull request head, when any exist.
fn checks_section(ctx: &WorkPackageContext) -> String {
    if ctx.checks.is_empty() {
        return String::new();
    }

    let mut section = String::from("\n## CI Checks\n\n");
    for check in &ctx.checks {
        let state = match (check.status, check.conclusion) {
            (CheckStatus::Completed, Some(conclusion)) => conclusion.to_string(),
            (status, _) => status.to_string(),
        };
        section.push_str(&format!("- {}: {}\n", check.name, state));
    }
    section
}

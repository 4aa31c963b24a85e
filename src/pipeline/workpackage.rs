//! Work package identity and on-disk layout.
//!
//! A work package is the directory+branch pair owned by one ticket. Its name
//! is derived deterministically from the ticket, so every run recomputes the
//! same identity without any stored mapping.

use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Task document, rewritten by every mutating stage.
pub const TASK_FILE: &str = "TASK.md";
/// Plan document, authored by a human or another process; read-only here.
pub const PLAN_FILE: &str = "PLAN.md";
/// Cost estimate document.
pub const COST_FILE: &str = "cost.md";
/// Review artifact, authored by the review tooling; read-only here.
pub const REVIEW_FILE: &str = "qa.md";
/// PR link file, the one durable cross-run pointer.
pub const PR_LINK_FILE: &str = "pr.json";

static STRIP: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z0-9\s-]").unwrap());
static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());
static DASHES: Lazy<Regex> = Lazy::new(|| Regex::new(r"-+").unwrap());

/// Derive the name slug for a ticket title.
///
/// Lower-cases, strips everything outside `[a-z0-9\s-]`, collapses
/// whitespace runs to single hyphens, collapses hyphen runs, and trims
/// leading/trailing hyphens. Total: any input yields a (possibly empty)
/// slug.
#[must_use]
pub fn slugify(title: &str) -> String {
    let lowered = title.to_lowercase();
    let stripped = STRIP.replace_all(&lowered, "");
    let hyphenated = WHITESPACE.replace_all(&stripped, "-");
    let collapsed = DASHES.replace_all(&hyphenated, "-");
    collapsed.trim_matches('-').to_string()
}

/// The durable pointer from a work package to its pull request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrLink {
    /// Pull request number
    pub id: u64,
}

impl PrLink {
    /// Load a PR link from disk.
    pub fn load(path: &Path) -> Result<Self, super::PipelineError> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Write the PR link to disk.
    pub fn save(&self, path: &Path) -> Result<(), super::PipelineError> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

/// Identity and file layout of one ticket's work package.
#[derive(Debug, Clone)]
pub struct WorkPackage {
    /// Ticket number
    number: u64,
    /// Slug derived from the ticket title
    slug: String,
    /// Full identity: `issues/<number>-<slug>`
    name: String,
    /// Repository root the package directory lives under
    repo_root: PathBuf,
}

impl WorkPackage {
    /// Derive the work package for a ticket.
    pub fn new(repo_root: impl Into<PathBuf>, number: u64, title: &str) -> Self {
        let slug = slugify(title);
        let name = format!("issues/{number}-{slug}");
        Self { number, slug, name, repo_root: repo_root.into() }
    }

    /// Ticket number this package belongs to.
    #[must_use]
    pub fn number(&self) -> u64 {
        self.number
    }

    /// Name slug derived from the ticket title.
    #[must_use]
    pub fn slug(&self) -> &str {
        &self.slug
    }

    /// Full identity, used as directory name, branch name, and in commit
    /// messages.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Absolute path of the package directory.
    #[must_use]
    pub fn dir(&self) -> PathBuf {
        self.repo_root.join(&self.name)
    }

    /// Path of the task document.
    #[must_use]
    pub fn task_path(&self) -> PathBuf {
        self.dir().join(TASK_FILE)
    }

    /// Path of the plan document.
    #[must_use]
    pub fn plan_path(&self) -> PathBuf {
        self.dir().join(PLAN_FILE)
    }

    /// Path of the cost document.
    #[must_use]
    pub fn cost_path(&self) -> PathBuf {
        self.dir().join(COST_FILE)
    }

    /// Path of the review artifact.
    #[must_use]
    pub fn review_artifact_path(&self) -> PathBuf {
        self.dir().join(REVIEW_FILE)
    }

    /// Path of the PR link file.
    #[must_use]
    pub fn pr_link_path(&self) -> PathBuf {
        self.dir().join(PR_LINK_FILE)
    }

    /// Whether a pull request has ever been opened for this package.
    #[must_use]
    pub fn has_pr_link(&self) -> bool {
        self.pr_link_path().exists()
    }

    /// Whether the review artifact is on disk.
    #[must_use]
    pub fn has_review_artifact(&self) -> bool {
        self.review_artifact_path().exists()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify_strips_and_hyphenates() {
        assert_eq!(slugify("Fix: Login Bug!!"), "fix-login-bug");
        assert_eq!(slugify("Add OAuth2 support"), "add-oauth2-support");
        assert_eq!(slugify("  padded   title  "), "padded-title");
    }

    #[test]
    fn test_slugify_collapses_hyphen_runs() {
        assert_eq!(slugify("a -- b"), "a-b");
        assert_eq!(slugify("--dashes--"), "dashes");
    }

    #[test]
    fn test_slugify_is_total() {
        assert_eq!(slugify(""), "");
        assert_eq!(slugify("   "), "");
        assert_eq!(slugify("!!!???"), "");
    }

    #[test]
    fn test_slugify_is_idempotent() {
        let once = slugify("Fix: Login Bug!!");
        assert_eq!(slugify(&once), once);
    }

    #[test]
    fn test_work_package_identity() {
        let wp = WorkPackage::new("/repo", 12, "Fix: Login Bug!!");
        assert_eq!(wp.name(), "issues/12-fix-login-bug");
        assert_eq!(wp.slug(), "fix-login-bug");
        assert_eq!(wp.number(), 12);
        assert_eq!(wp.dir(), PathBuf::from("/repo/issues/12-fix-login-bug"));
        assert_eq!(wp.task_path(), PathBuf::from("/repo/issues/12-fix-login-bug/TASK.md"));
    }

    #[test]
    fn test_pr_link_round_trip() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join(PR_LINK_FILE);

        PrLink { id: 99 }.save(&path).unwrap();
        let loaded = PrLink::load(&path).unwrap();
        assert_eq!(loaded, PrLink { id: 99 });

        // The on-disk shape is the bare `{ "id": ... }` object.
        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["id"], 99);
    }
}

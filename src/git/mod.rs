//! Git integration module.
//!
//! Provides the version-control gateway: the trait contract the pipeline is
//! written against, and an implementation that drives the `git` executable.

use std::path::{Path, PathBuf};
use std::process::Command;

/// Result type for VCS operations.
pub type GitResult<T> = Result<T, GitError>;

/// Error types for VCS operations.
#[derive(Debug, thiserror::Error)]
pub enum GitError {
    #[error("failed to spawn git: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("git command failed: {command}\n{stderr}")]
    CommandFailed { command: String, stderr: String },
}

/// Contract for the version-control repository.
///
/// Mutating operations act on the working tree and the currently checked-out
/// branch; the caller is responsible for being on the right branch first
/// (see [`VcsGateway::ensure_branch`]).
pub trait VcsGateway: Send + Sync {
    /// Check whether a local branch exists.
    fn branch_exists(&self, name: &str) -> bool;

    /// Create a branch and switch to it.
    fn create_branch(&self, name: &str) -> GitResult<()>;

    /// Switch to an existing branch.
    fn switch_branch(&self, name: &str) -> GitResult<()>;

    /// Switch to the branch, creating it first if it does not exist.
    ///
    /// Never creates a duplicate and never fails because the branch is
    /// already there.
    fn ensure_branch(&self, name: &str) -> GitResult<()> {
        if self.branch_exists(name) {
            self.switch_branch(name)
        } else {
            self.create_branch(name)
        }
    }

    /// Stage all changes in the working tree.
    fn stage_all(&self) -> GitResult<()>;

    /// Check whether the working tree has staged or unstaged changes.
    fn has_uncommitted_changes(&self) -> bool;

    /// Commit staged changes; a no-op when there is nothing to commit.
    fn commit(&self, message: &str) -> GitResult<()>;

    /// Commit even when the tree is unchanged.
    fn commit_allow_empty(&self, message: &str) -> GitResult<()>;

    /// Pull, from `origin/<branch>` when a branch is given.
    fn pull(&self, branch: Option<&str>) -> GitResult<()>;

    /// Push, with upstream tracking when a branch is given.
    ///
    /// With a branch, a pull is attempted first to absorb remote divergence;
    /// a failed pull is tolerated (it most often means the remote branch does
    /// not exist yet) and the push proceeds.
    fn push(&self, branch: Option<&str>) -> GitResult<()>;

    /// Hash of the current HEAD commit.
    fn current_commit_hash(&self) -> GitResult<String>;
}

/// VCS gateway backed by the `git` command-line tool.
#[derive(Debug, Clone)]
pub struct GitCli {
    /// Repository root the commands run in
    root: PathBuf,
}

impl GitCli {
    /// Create a gateway rooted at the given repository path.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Get the repository root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Run a git subcommand, returning trimmed stdout.
    fn run(&self, args: &[&str]) -> GitResult<String> {
        let output = Command::new("git").args(args).current_dir(&self.root).output()?;

        if !output.status.success() {
            return Err(GitError::CommandFailed {
                command: format!("git {}", args.join(" ")),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

impl VcsGateway for GitCli {
    fn branch_exists(&self, name: &str) -> bool {
        let git_ref = format!("refs/heads/{name}");
        self.run(&["show-ref", "--verify", "--quiet", &git_ref]).is_ok()
    }

    fn create_branch(&self, name: &str) -> GitResult<()> {
        self.run(&["checkout", "-b", name])?;
        Ok(())
    }

    fn switch_branch(&self, name: &str) -> GitResult<()> {
        self.run(&["checkout", name])?;
        Ok(())
    }

    fn stage_all(&self) -> GitResult<()> {
        self.run(&["add", "."])?;
        Ok(())
    }

    fn has_uncommitted_changes(&self) -> bool {
        self.run(&["status", "--porcelain"]).map(|s| !s.is_empty()).unwrap_or(false)
    }

    fn commit(&self, message: &str) -> GitResult<()> {
        if !self.has_uncommitted_changes() {
            tracing::debug!("no changes to commit, skipping commit");
            return Ok(());
        }
        self.run(&["commit", "-m", message])?;
        Ok(())
    }

    fn commit_allow_empty(&self, message: &str) -> GitResult<()> {
        self.run(&["commit", "--allow-empty", "-m", message])?;
        Ok(())
    }

    fn pull(&self, branch: Option<&str>) -> GitResult<()> {
        match branch {
            Some(name) => self.run(&["pull", "origin", name])?,
            None => self.run(&["pull"])?,
        };
        Ok(())
    }

    fn push(&self, branch: Option<&str>) -> GitResult<()> {
        match branch {
            Some(name) => {
                // Absorb remote divergence before pushing; a failed pull most
                // often means the remote branch does not exist yet.
                if let Err(err) = self.pull(Some(name)) {
                    tracing::debug!("pull before push failed, pushing anyway: {err}");
                }
                self.run(&["push", "-u", "origin", name])?;
            }
            None => {
                self.run(&["push"])?;
            }
        }
        Ok(())
    }

    fn current_commit_hash(&self) -> GitResult<String> {
        self.run(&["rev-parse", "HEAD"])
    }
}

//! External integrations module.
//!
//! Provides the issue-tracker gateway: the trait contract the pipeline is
//! written against, and the GitHub REST implementation of it.

pub mod github;

pub use github::{
    BranchRef, CheckConclusion, CheckRun, CheckStatus, Comment, GitHubTracker, Issue, Label,
    PullRequest, TrackerError, User,
};

use async_trait::async_trait;

/// Result type for tracker operations.
pub type TrackerResult<T> = Result<T, TrackerError>;

/// Contract for the issue tracker.
///
/// Every operation is a remote call that may fail with a transport error.
/// The pipeline does not retry; callers that tolerate failure say so
/// explicitly at the call site.
#[async_trait]
pub trait TrackerGateway: Send + Sync {
    /// Fetch an issue by number.
    async fn get_issue(&self, number: u64) -> TrackerResult<Issue>;

    /// Fetch a pull request by number.
    async fn get_pull_request(&self, number: u64) -> TrackerResult<PullRequest>;

    /// List comments on an issue.
    async fn list_issue_comments(&self, number: u64) -> TrackerResult<Vec<Comment>>;

    /// List review comments on a pull request.
    async fn list_pull_request_comments(&self, number: u64) -> TrackerResult<Vec<Comment>>;

    /// List CI check runs for a commit ref (branch name or SHA).
    async fn list_checks(&self, git_ref: &str) -> TrackerResult<Vec<CheckRun>>;

    /// Add a label to an issue or pull request.
    async fn add_label(&self, number: u64, label: &str) -> TrackerResult<()>;

    /// Remove a label from an issue or pull request.
    ///
    /// Removing a label that is not present succeeds without effect.
    async fn remove_label(&self, number: u64, label: &str) -> TrackerResult<()>;

    /// Remove every label currently on an issue.
    async fn remove_all_labels_from_issue(&self, number: u64) -> TrackerResult<()>;

    /// Remove every label currently on a pull request.
    async fn remove_all_labels_from_pull_request(&self, number: u64) -> TrackerResult<()>;

    /// Open a pull request from `head` into `base`.
    async fn create_pull_request(
        &self,
        title: &str,
        body: &str,
        head: &str,
        base: &str,
        draft: bool,
    ) -> TrackerResult<PullRequest>;

    /// Post a comment on an issue.
    async fn add_comment(&self, number: u64, body: &str) -> TrackerResult<()>;

    /// Merge a pull request with squash semantics.
    async fn merge_pull_request(&self, number: u64) -> TrackerResult<()>;
}

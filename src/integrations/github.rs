//! GitHub tracker implementation.
//!
//! REST client for the issue, pull-request, comment, label, and checks
//! endpoints the pipeline drives. One instance is scoped to a single
//! `owner/repo`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{TrackerGateway, TrackerResult};

/// A GitHub issue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Issue {
    /// Issue number
    pub number: u64,
    /// Issue title
    pub title: String,
    /// Issue body/description
    pub body: Option<String>,
    /// Issue state (open, closed)
    pub state: String,
    /// Issue labels
    pub labels: Vec<Label>,
    /// Issue author
    pub user: User,
    /// Created timestamp
    pub created_at: String,
    /// Updated timestamp
    pub updated_at: String,
}

impl Issue {
    /// Label names as a plain list, the shape the classifier consumes.
    pub fn label_names(&self) -> Vec<String> {
        self.labels.iter().map(|l| l.name.clone()).collect()
    }
}

/// A GitHub pull request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PullRequest {
    /// Pull request number
    pub number: u64,
    /// Pull request title
    pub title: String,
    /// Pull request body
    pub body: Option<String>,
    /// Pull request state (open, closed)
    pub state: String,
    /// Whether the pull request has been merged
    #[serde(default)]
    pub merged: bool,
    /// Pull request labels
    pub labels: Vec<Label>,
    /// Pull request author
    pub user: User,
    /// Source branch
    pub head: BranchRef,
    /// Target branch
    pub base: BranchRef,
}

/// A branch reference on a pull request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BranchRef {
    /// Branch name
    #[serde(rename = "ref")]
    pub name: String,
}

/// A GitHub label.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Label {
    /// Label name
    pub name: String,
}

/// A GitHub user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Username/login
    pub login: String,
}

/// A comment on an issue or pull request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    /// Comment ID
    pub id: u64,
    /// Comment body
    pub body: String,
    /// Comment author
    pub user: User,
    /// Created timestamp
    pub created_at: String,
}

/// Status of a CI check run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckStatus {
    /// Check is queued
    Queued,
    /// Check is in progress
    InProgress,
    /// Check completed
    Completed,
}

/// Conclusion of a completed check run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckConclusion {
    /// Check succeeded
    Success,
    /// Check failed
    Failure,
    /// Neutral (neither success nor failure)
    Neutral,
    /// Check was cancelled
    Cancelled,
    /// Check was skipped
    Skipped,
    /// Check timed out
    TimedOut,
    /// Action required
    ActionRequired,
}

impl std::fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Queued => "queued",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
        };
        write!(f, "{s}")
    }
}

impl std::fmt::Display for CheckConclusion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Success => "success",
            Self::Failure => "failure",
            Self::Neutral => "neutral",
            Self::Cancelled => "cancelled",
            Self::Skipped => "skipped",
            Self::TimedOut => "timed_out",
            Self::ActionRequired => "action_required",
        };
        write!(f, "{s}")
    }
}

/// A CI check run attached to a commit ref.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckRun {
    /// Check run ID
    pub id: u64,
    /// Check name
    pub name: String,
    /// Current status
    pub status: CheckStatus,
    /// Conclusion, present once completed
    pub conclusion: Option<CheckConclusion>,
}

impl CheckRun {
    /// Check if this run finished successfully.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.conclusion == Some(CheckConclusion::Success)
    }
}

/// Response from the check-runs listing endpoint.
#[derive(Debug, Deserialize)]
struct CheckRunsResponse {
    #[allow(dead_code)]
    total_count: u64,
    check_runs: Vec<CheckRun>,
}

/// Error types for tracker operations.
#[derive(Debug, thiserror::Error)]
pub enum TrackerError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("GitHub API error: {message} (status: {status})")]
    Api { status: u16, message: String },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Authentication required")]
    Unauthorized,

    #[error("Rate limit exceeded")]
    RateLimited,
}

/// GitHub tracker client.
#[derive(Debug, Clone)]
pub struct GitHubTracker {
    /// GitHub API token
    token: String,
    /// Repository owner
    owner: String,
    /// Repository name
    repo: String,
    /// HTTP client
    client: reqwest::Client,
}

impl GitHubTracker {
    /// Create a new GitHub tracker client.
    pub fn new(
        token: impl Into<String>,
        owner: impl Into<String>,
        repo: impl Into<String>,
    ) -> Self {
        Self {
            token: token.into(),
            owner: owner.into(),
            repo: repo.into(),
            client: reqwest::Client::new(),
        }
    }

    /// Get the API base URL for this repository.
    fn api_url(&self, path: &str) -> String {
        format!("https://api.github.com/repos/{}/{}/{}", self.owner, self.repo, path)
    }

    /// Make an authenticated request.
    fn request(&self, method: reqwest::Method, url: &str) -> reqwest::RequestBuilder {
        self.client
            .request(method, url)
            .header("Authorization", format!("Bearer {}", self.token))
            .header("Accept", "application/vnd.github+json")
            .header("User-Agent", "issuerun")
            .header("X-GitHub-Api-Version", "2022-11-28")
    }

    /// Parse error response from GitHub API.
    async fn parse_error(&self, response: reqwest::Response) -> TrackerError {
        let status = response.status().as_u16();

        match status {
            401 => TrackerError::Unauthorized,
            403 => {
                // Check if rate limited
                if response
                    .headers()
                    .get("x-ratelimit-remaining")
                    .and_then(|v| v.to_str().ok())
                    .map(|s| s == "0")
                    .unwrap_or(false)
                {
                    return TrackerError::RateLimited;
                }
                TrackerError::Api { status, message: "Forbidden".to_string() }
            }
            404 => TrackerError::NotFound("Resource not found".to_string()),
            _ => {
                let message = response
                    .json::<serde_json::Value>()
                    .await
                    .ok()
                    .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(String::from))
                    .unwrap_or_else(|| format!("HTTP {}", status));
                TrackerError::Api { status, message }
            }
        }
    }
}

#[async_trait]
impl TrackerGateway for GitHubTracker {
    async fn get_issue(&self, number: u64) -> TrackerResult<Issue> {
        let url = self.api_url(&format!("issues/{}", number));

        let response = self.request(reqwest::Method::GET, &url).send().await?;

        if !response.status().is_success() {
            return Err(self.parse_error(response).await);
        }

        let issue: Issue = response.json().await?;
        Ok(issue)
    }

    async fn get_pull_request(&self, number: u64) -> TrackerResult<PullRequest> {
        let url = self.api_url(&format!("pulls/{}", number));

        let response = self.request(reqwest::Method::GET, &url).send().await?;

        if !response.status().is_success() {
            return Err(self.parse_error(response).await);
        }

        let pr: PullRequest = response.json().await?;
        Ok(pr)
    }

    async fn list_issue_comments(&self, number: u64) -> TrackerResult<Vec<Comment>> {
        let url = self.api_url(&format!("issues/{}/comments", number));

        let response = self.request(reqwest::Method::GET, &url).send().await?;

        if !response.status().is_success() {
            return Err(self.parse_error(response).await);
        }

        let comments: Vec<Comment> = response.json().await?;
        Ok(comments)
    }

    async fn list_pull_request_comments(&self, number: u64) -> TrackerResult<Vec<Comment>> {
        let url = self.api_url(&format!("pulls/{}/comments", number));

        let response = self.request(reqwest::Method::GET, &url).send().await?;

        if !response.status().is_success() {
            return Err(self.parse_error(response).await);
        }

        let comments: Vec<Comment> = response.json().await?;
        Ok(comments)
    }

    async fn list_checks(&self, git_ref: &str) -> TrackerResult<Vec<CheckRun>> {
        let url = self.api_url(&format!("commits/{}/check-runs", git_ref));

        let response = self.request(reqwest::Method::GET, &url).send().await?;

        if !response.status().is_success() {
            return Err(self.parse_error(response).await);
        }

        let runs: CheckRunsResponse = response.json().await?;
        Ok(runs.check_runs)
    }

    async fn add_label(&self, number: u64, label: &str) -> TrackerResult<()> {
        let url = self.api_url(&format!("issues/{}/labels", number));

        let body = serde_json::json!({ "labels": [label] });

        let response = self.request(reqwest::Method::POST, &url).json(&body).send().await?;

        if !response.status().is_success() {
            return Err(self.parse_error(response).await);
        }

        Ok(())
    }

    async fn remove_label(&self, number: u64, label: &str) -> TrackerResult<()> {
        let url =
            self.api_url(&format!("issues/{}/labels/{}", number, urlencoding::encode(label)));

        let response = self.request(reqwest::Method::DELETE, &url).send().await?;

        // Removing a label that is not on the issue is a no-op.
        if !response.status().is_success() && response.status().as_u16() != 404 {
            return Err(self.parse_error(response).await);
        }

        Ok(())
    }

    async fn remove_all_labels_from_issue(&self, number: u64) -> TrackerResult<()> {
        let issue = self.get_issue(number).await?;
        for label in &issue.labels {
            self.remove_label(number, &label.name).await?;
        }
        Ok(())
    }

    async fn remove_all_labels_from_pull_request(&self, number: u64) -> TrackerResult<()> {
        // Labels on a pull request live on its issue facet.
        let pr = self.get_pull_request(number).await?;
        for label in &pr.labels {
            self.remove_label(number, &label.name).await?;
        }
        Ok(())
    }

    async fn create_pull_request(
        &self,
        title: &str,
        body: &str,
        head: &str,
        base: &str,
        draft: bool,
    ) -> TrackerResult<PullRequest> {
        let url = self.api_url("pulls");

        let payload = serde_json::json!({
            "title": title,
            "body": body,
            "head": head,
            "base": base,
            "draft": draft,
        });

        let response = self.request(reqwest::Method::POST, &url).json(&payload).send().await?;

        if !response.status().is_success() {
            return Err(self.parse_error(response).await);
        }

        let pr: PullRequest = response.json().await?;
        Ok(pr)
    }

    async fn add_comment(&self, number: u64, body: &str) -> TrackerResult<()> {
        let url = self.api_url(&format!("issues/{}/comments", number));

        let payload = serde_json::json!({ "body": body });

        let response = self.request(reqwest::Method::POST, &url).json(&payload).send().await?;

        if !response.status().is_success() {
            return Err(self.parse_error(response).await);
        }

        Ok(())
    }

    async fn merge_pull_request(&self, number: u64) -> TrackerResult<()> {
        let url = self.api_url(&format!("pulls/{}/merge", number));

        let payload = serde_json::json!({ "merge_method": "squash" });

        let response = self.request(reqwest::Method::PUT, &url).json(&payload).send().await?;

        if !response.status().is_success() {
            return Err(self.parse_error(response).await);
        }

        Ok(())
    }
}

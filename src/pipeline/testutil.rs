//! In-memory gateway fakes for pipeline tests.
//!
//! The fakes record every mutation in call order and mirror the gateway
//! contracts' tolerances (absent-label removal succeeds, commit without
//! changes is a no-op).

use std::sync::Mutex;

use async_trait::async_trait;

use crate::git::{GitResult, VcsGateway};
use crate::integrations::{
    BranchRef, CheckRun, Comment, Issue, Label, PullRequest, TrackerError, TrackerGateway,
    TrackerResult, User,
};

/// Build an issue snapshot with the given labels.
pub(crate) fn issue_with_labels(number: u64, title: &str, labels: &[&str]) -> Issue {
    Issue {
        number,
        title: title.to_string(),
        body: Some("Steps to reproduce: ...".to_string()),
        state: "open".to_string(),
        labels: labels.iter().map(|n| Label { name: (*n).to_string() }).collect(),
        user: User { login: "reporter".to_string() },
        created_at: "2024-01-01T00:00:00Z".to_string(),
        updated_at: "2024-01-02T00:00:00Z".to_string(),
    }
}

/// Build a comment.
pub(crate) fn comment(id: u64, login: &str, body: &str) -> Comment {
    Comment {
        id,
        body: body.to_string(),
        user: User { login: login.to_string() },
        created_at: "2024-01-03T00:00:00Z".to_string(),
    }
}

/// Recorded pull-request creation parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CreatedPr {
    pub title: String,
    pub body: String,
    pub head: String,
    pub base: String,
    pub draft: bool,
}

/// Tracker fake with mutable label state and full call recording.
pub(crate) struct FakeTracker {
    issue: Mutex<Issue>,
    pull_request: Mutex<Option<PullRequest>>,
    issue_comments: Mutex<Vec<Comment>>,
    pr_comments: Mutex<Vec<Comment>>,
    checks: Mutex<Vec<CheckRun>>,
    pub created_prs: Mutex<Vec<CreatedPr>>,
    pub posted_comments: Mutex<Vec<(u64, String)>>,
    pub merged: Mutex<Vec<u64>>,
    pub calls: Mutex<Vec<String>>,
    /// Label names whose removal should fail with an API error
    pub fail_remove: Mutex<Vec<String>>,
}

impl FakeTracker {
    pub fn new(issue: Issue) -> Self {
        Self {
            issue: Mutex::new(issue),
            pull_request: Mutex::new(None),
            issue_comments: Mutex::new(Vec::new()),
            pr_comments: Mutex::new(Vec::new()),
            checks: Mutex::new(Vec::new()),
            created_prs: Mutex::new(Vec::new()),
            posted_comments: Mutex::new(Vec::new()),
            merged: Mutex::new(Vec::new()),
            calls: Mutex::new(Vec::new()),
            fail_remove: Mutex::new(Vec::new()),
        }
    }

    pub fn set_pull_request(&self, number: u64, head: &str) {
        *self.pull_request.lock().unwrap() = Some(PullRequest {
            number,
            title: format!("agent(#{}): pr", number),
            body: Some(String::new()),
            state: "open".to_string(),
            merged: false,
            labels: vec![Label { name: "locked".to_string() }],
            user: User { login: "issuerun-bot".to_string() },
            head: BranchRef { name: head.to_string() },
            base: BranchRef { name: "main".to_string() },
        });
    }

    pub fn push_issue_comment(&self, c: Comment) {
        self.issue_comments.lock().unwrap().push(c);
    }

    pub fn push_pr_comment(&self, c: Comment) {
        self.pr_comments.lock().unwrap().push(c);
    }

    pub fn fail_remove_label(&self, name: &str) {
        self.fail_remove.lock().unwrap().push(name.to_string());
    }

    pub fn issue_labels(&self) -> Vec<String> {
        self.issue.lock().unwrap().label_names()
    }

    pub fn pr_labels(&self) -> Vec<String> {
        self.pull_request
            .lock()
            .unwrap()
            .as_ref()
            .map(|pr| pr.labels.iter().map(|l| l.name.clone()).collect())
            .unwrap_or_default()
    }

    fn record(&self, call: impl Into<String>) {
        self.calls.lock().unwrap().push(call.into());
    }
}

#[async_trait]
impl TrackerGateway for FakeTracker {
    async fn get_issue(&self, _number: u64) -> TrackerResult<Issue> {
        Ok(self.issue.lock().unwrap().clone())
    }

    async fn get_pull_request(&self, number: u64) -> TrackerResult<PullRequest> {
        self.pull_request
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| TrackerError::NotFound(format!("pull request #{number}")))
    }

    async fn list_issue_comments(&self, _number: u64) -> TrackerResult<Vec<Comment>> {
        Ok(self.issue_comments.lock().unwrap().clone())
    }

    async fn list_pull_request_comments(&self, _number: u64) -> TrackerResult<Vec<Comment>> {
        Ok(self.pr_comments.lock().unwrap().clone())
    }

    async fn list_checks(&self, _git_ref: &str) -> TrackerResult<Vec<CheckRun>> {
        Ok(self.checks.lock().unwrap().clone())
    }

    async fn add_label(&self, _number: u64, label: &str) -> TrackerResult<()> {
        self.record(format!("add-label:{label}"));
        self.issue.lock().unwrap().labels.push(Label { name: label.to_string() });
        Ok(())
    }

    async fn remove_label(&self, _number: u64, label: &str) -> TrackerResult<()> {
        if self.fail_remove.lock().unwrap().iter().any(|l| l == label) {
            return Err(TrackerError::Api { status: 500, message: "boom".to_string() });
        }
        self.record(format!("remove-label:{label}"));
        self.issue.lock().unwrap().labels.retain(|l| l.name != label);
        Ok(())
    }

    async fn remove_all_labels_from_issue(&self, _number: u64) -> TrackerResult<()> {
        self.record("remove-all-labels:issue");
        self.issue.lock().unwrap().labels.clear();
        Ok(())
    }

    async fn remove_all_labels_from_pull_request(&self, _number: u64) -> TrackerResult<()> {
        self.record("remove-all-labels:pr");
        if let Some(pr) = self.pull_request.lock().unwrap().as_mut() {
            pr.labels.clear();
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
        self.record(format!("create-pr:{head}"));
        self.created_prs.lock().unwrap().push(CreatedPr {
            title: title.to_string(),
            body: body.to_string(),
            head: head.to_string(),
            base: base.to_string(),
            draft,
        });

        let pr = PullRequest {
            number: 99,
            title: title.to_string(),
            body: Some(body.to_string()),
            state: "open".to_string(),
            merged: false,
            labels: Vec::new(),
            user: User { login: "issuerun-bot".to_string() },
            head: BranchRef { name: head.to_string() },
            base: BranchRef { name: base.to_string() },
        };
        *self.pull_request.lock().unwrap() = Some(pr.clone());
        Ok(pr)
    }

    async fn add_comment(&self, number: u64, body: &str) -> TrackerResult<()> {
        self.record("add-comment");
        self.posted_comments.lock().unwrap().push((number, body.to_string()));
        Ok(())
    }

    async fn merge_pull_request(&self, number: u64) -> TrackerResult<()> {
        self.record(format!("merge-pr:{number}"));
        self.merged.lock().unwrap().push(number);
        Ok(())
    }
}

/// VCS fake recording the commit-and-push call sequence.
pub(crate) struct FakeVcs {
    calls: Mutex<Vec<String>>,
    dirty: Mutex<bool>,
}

impl FakeVcs {
    pub fn new() -> Self {
        Self { calls: Mutex::new(Vec::new()), dirty: Mutex::new(false) }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn set_dirty(&self, dirty: bool) {
        *self.dirty.lock().unwrap() = dirty;
    }

    fn record(&self, call: impl Into<String>) {
        self.calls.lock().unwrap().push(call.into());
    }
}

impl VcsGateway for FakeVcs {
    fn branch_exists(&self, _name: &str) -> bool {
        true
    }

    fn create_branch(&self, name: &str) -> GitResult<()> {
        self.record(format!("create:{name}"));
        Ok(())
    }

    fn switch_branch(&self, name: &str) -> GitResult<()> {
        self.record(format!("switch:{name}"));
        Ok(())
    }

    fn ensure_branch(&self, name: &str) -> GitResult<()> {
        self.record(format!("ensure:{name}"));
        Ok(())
    }

    fn stage_all(&self) -> GitResult<()> {
        self.record("stage-all");
        Ok(())
    }

    fn has_uncommitted_changes(&self) -> bool {
        *self.dirty.lock().unwrap()
    }

    fn commit(&self, message: &str) -> GitResult<()> {
        if !*self.dirty.lock().unwrap() {
            return Ok(());
        }
        self.record(format!("commit:{message}"));
        *self.dirty.lock().unwrap() = false;
        Ok(())
    }

    fn commit_allow_empty(&self, message: &str) -> GitResult<()> {
        self.record(format!("commit-empty:{message}"));
        Ok(())
    }

    fn pull(&self, branch: Option<&str>) -> GitResult<()> {
        self.record(format!("pull:{}", branch.unwrap_or("-")));
        Ok(())
    }

    fn push(&self, branch: Option<&str>) -> GitResult<()> {
        self.record(format!("push:{}", branch.unwrap_or("-")));
        Ok(())
    }

    fn current_commit_hash(&self) -> GitResult<String> {
        Ok("0123456789abcdef0123456789abcdef01234567".to_string())
    }
}

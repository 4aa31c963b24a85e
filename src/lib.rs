//! # Issuerun
//!
//! Label-driven delivery pipeline for AI-assisted issue work.
//!
//! Issuerun advances one tracker ticket through a multi-stage,
//! human-in-the-loop pipeline on every invocation. The stage is never
//! stored: it is derived fresh from the ticket's labels and the files in its
//! work package, so an interrupted run is recovered by simply running again.
//!
//! ## Pipeline
//!
//! - **BOOTSTRAP**: create the work package, open a draft pull request
//! - **PLAN-FEEDBACK**: fold human feedback into the task document
//! - **PLAN-APPROVED**: hand the approved plan over for implementation
//! - **REVIEW-FEEDBACK**: report review findings back to the ticket
//! - **READY-TO-MERGE**: clean up and merge
//!
//! ## Quick Start
//!
//! ```bash
//! # Install
//! cargo install issuerun
//!
//! # Process ticket 42
//! issuerun 42
//! ```

pub mod config;
pub mod git;
pub mod integrations;
pub mod pipeline;
pub mod templates;

pub use config::{Config, ConfigError};
pub use git::{GitCli, GitError, VcsGateway};
pub use integrations::{
    CheckConclusion, CheckRun, CheckStatus, Comment, GitHubTracker, Issue, Label, PullRequest,
    TrackerError, TrackerGateway, User,
};
pub use pipeline::{classify, slugify, Engine, PipelineError, Stage, WorkPackage, WorkPackageContext};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = "issuerun";

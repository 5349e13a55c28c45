//! Error types for churn queries.
//!
//! Defines `ChurnError` for every failure a query can surface. Backend
//! failures keep their kind; nothing is retried.
//!
//! Mappings from libgit2:
//! - `ErrorCode::Ambiguous` on a revision → `AmbiguousHash`
//! - `ErrorCode::NotFound` / `InvalidSpec` on a revision → `UnresolvableRevision`
//! - `ErrorClass::Net` / `Http` / `Ssh` during clone → `NetworkError`

use std::time::Duration;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChurnError {
    #[error("Git error: {0}")]
    Git(#[from] git2::Error),

    #[error("Repository not found: {0}")]
    RepoNotFound(String),

    #[error("Path not found: {0}")]
    PathNotFound(String),

    #[error("Unresolvable revision: {0}")]
    UnresolvableRevision(String),

    #[error("Ambiguous hash: {0}")]
    AmbiguousHash(String),

    #[error("History traversal failed: {0}")]
    TraversalError(String),

    #[error("File {path} not found in the diff of commit {commit}")]
    FileNotInDiff { path: String, commit: String },

    #[error("Clone failed for {url}: {message}")]
    CloneError { url: String, message: String },

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Malformed patch: {0}")]
    MalformedPatchText(String),

    #[error("Query cancelled")]
    Cancelled,

    #[error("Query timed out after {0:?}")]
    TimedOut(Duration),

    #[error("Background task failed: {0}")]
    TaskFailed(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ChurnError {
    /// Classify a libgit2 failure raised while resolving `revision`.
    pub fn from_revparse(revision: &str, err: git2::Error) -> Self {
        match err.code() {
            git2::ErrorCode::Ambiguous => ChurnError::AmbiguousHash(revision.to_string()),
            git2::ErrorCode::NotFound | git2::ErrorCode::InvalidSpec => {
                ChurnError::UnresolvableRevision(revision.to_string())
            }
            _ => ChurnError::Git(err),
        }
    }

    /// Classify a libgit2 failure raised while cloning `url`.
    pub fn from_clone(url: &str, err: git2::Error) -> Self {
        match err.class() {
            git2::ErrorClass::Net | git2::ErrorClass::Http | git2::ErrorClass::Ssh => {
                ChurnError::NetworkError(format!("{}: {}", url, err.message()))
            }
            _ => ChurnError::CloneError {
                url: url.to_string(),
                message: err.message().to_string(),
            },
        }
    }
}

pub type Result<T> = std::result::Result<T, ChurnError>;

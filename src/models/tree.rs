//! Repository metadata DTOs.
//!
//! - `CommitInfo`: basic commit info (HEAD, branch tips)
//! - `BranchInfo`: local branch with its tip commit
//! - `TagInfo`: tag name and the commit it points at
//! - `FileLoc`: line count of one file at one commit

use serde::{Deserialize, Serialize};

use crate::config::Whitespace;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitInfo {
    pub oid: String,
    pub message: String,
    pub author: String,
    pub timestamp: i64,
    pub relative_time: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BranchInfo {
    pub name: String,
    pub is_current: bool,
    pub last_commit: Option<CommitInfo>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagInfo {
    pub name: String,
    /// Commit the tag peels to; `None` for tags on non-commit objects.
    pub target: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FileLoc {
    pub path: String,
    pub commit: String,
    pub whitespace: Whitespace,
    pub lines: usize,
}

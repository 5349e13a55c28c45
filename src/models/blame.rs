//! Blame DTOs.
//!
//! Per-line author attribution for a file at a specific commit. Attribution
//! itself comes from libgit2; these types only carry the result.

use serde::Serialize;

/// Blame of one file at one commit.
#[derive(Debug, Clone, Serialize)]
pub struct BlameResponse {
    pub path: String,
    /// Commit the blame was calculated at
    pub commit: String,
    pub lines: Vec<BlameLine>,
}

impl BlameResponse {
    /// Emails of everyone who owns at least one line, first-seen order.
    pub fn authors(&self) -> Vec<&str> {
        let mut seen = std::collections::HashSet::new();
        self.lines
            .iter()
            .map(|l| l.author_email.as_str())
            .filter(|email| seen.insert(*email))
            .collect()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BlameLine {
    /// 1-indexed
    pub line_number: usize,
    pub author_name: String,
    pub author_email: String,
    /// Commit that last modified this line
    pub commit_oid: String,
    pub timestamp: i64,
    pub content: String,
}

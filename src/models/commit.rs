use serde::{Deserialize, Serialize};

/// One commit of a revision range, newest first.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitSummary {
    pub oid: String,
    pub parents: Vec<String>,
    pub tree: String,
    pub author: AuthorInfo,
    pub committer: AuthorInfo,
    /// Committer time, seconds since the epoch.
    pub timestamp: i64,
    pub summary: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorInfo {
    pub name: String,
    pub email: String,
}

impl AuthorInfo {
    pub fn from_signature(sig: &git2::Signature<'_>) -> Self {
        Self {
            name: sig.name().unwrap_or("Unknown").to_string(),
            email: sig.email().unwrap_or("").to_string(),
        }
    }
}

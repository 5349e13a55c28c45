//! Churn metric DTOs.
//!
//! - `DiffMetrics`: insertions, deletions and line totals before/after
//! - `FileDiffMetrics`: one file of one commit, with new/deleted flags
//! - `AggrDiffMetrics`: every file of one commit, with file counts
//! - `DeletedLines`: deleted line numbers per file, relative to the parent

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiffMetrics {
    pub insertions: usize,
    pub deletions: usize,
    pub lines_before: usize,
    pub lines_after: usize,
}

impl DiffMetrics {
    pub fn is_new_file(&self) -> bool {
        self.lines_before == 0 && self.lines_after > 0
    }

    pub fn is_deleted_file(&self) -> bool {
        self.lines_before > 0 && self.lines_after == 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileDiffMetrics {
    #[serde(flatten)]
    pub metrics: DiffMetrics,
    pub file: String,
    pub new_file: bool,
    pub delete_file: bool,
}

impl FileDiffMetrics {
    /// Derives the new/deleted flags from the line totals.
    pub fn new(file: impl Into<String>, metrics: DiffMetrics) -> Self {
        Self {
            new_file: metrics.is_new_file(),
            delete_file: metrics.is_deleted_file(),
            file: file.into(),
            metrics,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggrDiffMetrics {
    #[serde(flatten)]
    pub metrics: DiffMetrics,
    pub files_count: usize,
    pub new_files: usize,
    pub deleted_files: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletedLines {
    pub commit: String,
    /// Commit the line numbers refer to; `None` for a root commit.
    pub parent: Option<String>,
    pub files: BTreeMap<String, Vec<usize>>,
}

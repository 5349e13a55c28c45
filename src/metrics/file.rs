//! Churn for a single file of a single commit.

use git2::Repository;
use std::collections::BTreeMap;
use std::time::Instant;

use crate::config::Whitespace;
use crate::error::{ChurnError, Result};
use crate::git::diff::{commit_trees, tree_patches};
use crate::git::repository::GitRepository;
use crate::git::revision::resolve_commit;
use crate::git::tree::file_loc_in_tree;
use crate::metrics::chunks::classify_chunks;
use crate::models::{DeletedLines, DiffMetrics, FileDiffMetrics};

/// Metrics for `path` in the commit `revision` resolves to, against its
/// first parent.
///
/// # Errors
///
/// [`ChurnError::FileNotInDiff`] when the commit does not change `path`.
pub fn file_diff_metrics(
    repo: &Repository,
    revision: &str,
    path: &str,
    whitespace: Whitespace,
) -> Result<FileDiffMetrics> {
    let start = Instant::now();
    let commit = resolve_commit(repo, revision)?;
    let (tree, parent_tree) = commit_trees(&commit)?;

    let patches = tree_patches(repo, parent_tree.as_ref(), &tree, Some(path))?;
    let patch = patches
        .iter()
        .find(|p| p.touches(path))
        .ok_or_else(|| ChurnError::FileNotInDiff {
            path: path.to_string(),
            commit: commit.id().to_string(),
        })?;
    let classified = classify_chunks(&patch.chunks, whitespace);

    // Physical line totals in both modes; deleted line numbers index into them.
    let metrics = DiffMetrics {
        insertions: classified.insertions,
        deletions: classified.deletions,
        lines_before: file_loc_in_tree(repo, parent_tree.as_ref(), path, Whitespace::Included)?,
        lines_after: file_loc_in_tree(repo, Some(&tree), path, Whitespace::Included)?,
    };

    tracing::info!("file metrics for {} at {} in {:?}", path, commit.id(), start.elapsed());
    Ok(FileDiffMetrics::new(path, metrics))
}

/// Deleted line numbers of every text file the commit changes, numbered in
/// the parent's version of each file. Binary files are left out.
pub fn deleted_line_numbers(
    repo: &Repository,
    revision: &str,
    whitespace: Whitespace,
) -> Result<DeletedLines> {
    let commit = resolve_commit(repo, revision)?;
    let (tree, parent_tree) = commit_trees(&commit)?;

    let files: BTreeMap<String, Vec<usize>> = tree_patches(repo, parent_tree.as_ref(), &tree, None)?
        .into_iter()
        .filter(|patch| !patch.is_binary)
        .map(|patch| {
            let deleted = classify_chunks(&patch.chunks, whitespace).deleted_lines;
            (patch.path().to_string(), deleted)
        })
        .collect();

    Ok(DeletedLines {
        commit: commit.id().to_string(),
        parent: commit.parent_ids().next().map(|id| id.to_string()),
        files,
    })
}

impl GitRepository {
    pub fn file_diff_metrics(
        &self,
        revision: &str,
        path: &str,
        whitespace: Whitespace,
    ) -> Result<FileDiffMetrics> {
        self.with_repo(|repo| file_diff_metrics(repo, revision, path, whitespace))
    }

    pub fn deleted_line_numbers(&self, revision: &str, whitespace: Whitespace) -> Result<DeletedLines> {
        self.with_repo(|repo| deleted_line_numbers(repo, revision, whitespace))
    }
}

//! Repository-wide churn for one commit.
//!
//! Three blocking tasks run side by side, each on its own repository handle
//! and with its own accumulator:
//! - churn: insertions/deletions summed over every file patch
//! - before: physical line total and file set of the parent tree
//! - after: physical line total and file set of the commit tree
//!
//! The whitespace mode only affects insertions and deletions.
//!
//! Results meet once at the join; new/deleted file counts are set
//! differences of the two file sets.

use git2::Oid;
use std::collections::HashSet;
use std::path::Path;
use std::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::config::{ChurnOptions, Whitespace};
use crate::error::Result;
use crate::git::diff::{commit_trees, tree_patches};
use crate::git::repository::{open_git_dir, GitRepository};
use crate::git::revision::resolve_commit;
use crate::git::tree::{tree_inventory, TreeInventory};
use crate::metrics::chunks::classify_chunks;
use crate::models::{AggrDiffMetrics, DiffMetrics};
use crate::task::{check_cancelled, run_blocking, with_deadline};

/// `(new, deleted)`: paths only in `after`, paths only in `before`.
pub fn file_set_counts(before: &HashSet<String>, after: &HashSet<String>) -> (usize, usize) {
    let new_files = after.difference(before).count();
    let deleted_files = before.difference(after).count();
    (new_files, deleted_files)
}

fn churn_totals(
    git_dir: &Path,
    tree_id: Oid,
    parent_tree_id: Option<Oid>,
    whitespace: Whitespace,
    cancel: &CancellationToken,
) -> Result<(usize, usize)> {
    let repo = open_git_dir(git_dir)?;
    let tree = repo.find_tree(tree_id)?;
    let parent_tree = parent_tree_id.map(|id| repo.find_tree(id)).transpose()?;

    let mut insertions = 0;
    let mut deletions = 0;
    for patch in tree_patches(&repo, parent_tree.as_ref(), &tree, None)? {
        check_cancelled(cancel)?;
        let classified = classify_chunks(&patch.chunks, whitespace);
        insertions += classified.insertions;
        deletions += classified.deletions;
    }
    Ok((insertions, deletions))
}

fn inventory(git_dir: &Path, tree_id: Option<Oid>, cancel: &CancellationToken) -> Result<TreeInventory> {
    let Some(tree_id) = tree_id else {
        return Ok(TreeInventory::default());
    };
    let repo = open_git_dir(git_dir)?;
    let tree = repo.find_tree(tree_id)?;
    tree_inventory(&repo, &tree, cancel)
}

/// Aggregated metrics for the commit `revision` resolves to.
///
/// Honors `options.timeout`; cancelling `cancel` stops all tasks. The first
/// failing task aborts the whole query.
pub async fn aggregate_diff_metrics(
    repo: &GitRepository,
    revision: &str,
    options: &ChurnOptions,
    cancel: &CancellationToken,
) -> Result<AggrDiffMetrics> {
    let token = cancel.child_token();
    let git_dir = repo.git_dir.clone();
    let revision = revision.to_string();
    let whitespace = options.whitespace;

    let query = async {
        let start = Instant::now();
        let dir = git_dir.clone();
        let rev = revision.clone();
        let (tree_id, parent_tree_id) = run_blocking(&token, move |_| {
            let repo = open_git_dir(&dir)?;
            let commit = resolve_commit(&repo, &rev)?;
            let (tree, parent_tree) = commit_trees(&commit)?;
            Ok((tree.id(), parent_tree.map(|t| t.id())))
        })
        .await?;

        let joined = join_tasks(&git_dir, tree_id, parent_tree_id, whitespace, &token).await;
        if joined.is_err() {
            token.cancel();
        }
        let ((insertions, deletions), before, after) = joined?;

        let (new_files, deleted_files) = file_set_counts(&before.files, &after.files);
        let result = AggrDiffMetrics {
            metrics: DiffMetrics {
                insertions,
                deletions,
                lines_before: before.lines,
                lines_after: after.lines,
            },
            files_count: after.files.len(),
            new_files,
            deleted_files,
        };

        tracing::info!(
            "aggregate metrics for {}: {} files in {:?}",
            revision,
            result.files_count,
            start.elapsed()
        );
        Ok(result)
    };

    with_deadline(options.timeout, &token, query).await
}

async fn join_tasks(
    git_dir: &Path,
    tree_id: Oid,
    parent_tree_id: Option<Oid>,
    whitespace: Whitespace,
    token: &CancellationToken,
) -> Result<((usize, usize), TreeInventory, TreeInventory)> {
    let churn_dir = git_dir.to_path_buf();
    let before_dir = git_dir.to_path_buf();
    let after_dir = git_dir.to_path_buf();

    tokio::try_join!(
        run_blocking(token, move |t| {
            churn_totals(&churn_dir, tree_id, parent_tree_id, whitespace, &t)
        }),
        run_blocking(token, move |t| inventory(&before_dir, parent_tree_id, &t)),
        run_blocking(token, move |t| inventory(&after_dir, Some(tree_id), &t)),
    )
}

impl GitRepository {
    pub async fn aggregate_diff_metrics(
        &self,
        revision: &str,
        options: &ChurnOptions,
        cancel: &CancellationToken,
    ) -> Result<AggrDiffMetrics> {
        aggregate_diff_metrics(self, revision, options, cancel).await
    }
}

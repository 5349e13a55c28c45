use git2::{ErrorCode, ObjectType, Oid, Repository, Tree, TreeWalkMode, TreeWalkResult};
use std::collections::HashSet;
use std::path::Path;
use tokio_util::sync::CancellationToken;

use crate::config::Whitespace;
use crate::error::{ChurnError, Result};
use crate::git::repository::GitRepository;
use crate::git::revision::resolve_commit;
use crate::metrics::chunks::count_lines;
use crate::models::FileLoc;
use crate::task::check_cancelled;

/// Every file of a tree with the summed line count.
#[derive(Debug, Clone, Default)]
pub struct TreeInventory {
    pub lines: usize,
    pub files: HashSet<String>,
}

/// Lines in a blob; binary blobs have none.
pub fn blob_loc(repo: &Repository, id: Oid, whitespace: Whitespace) -> Result<usize> {
    let blob = repo.find_blob(id)?;
    if blob.is_binary() {
        return Ok(0);
    }
    Ok(count_lines(&String::from_utf8_lossy(blob.content()), whitespace))
}

/// Lines of `path` in `tree`, or 0 when the tree has no such file.
pub fn file_loc_in_tree(
    repo: &Repository,
    tree: Option<&Tree<'_>>,
    path: &str,
    whitespace: Whitespace,
) -> Result<usize> {
    let Some(tree) = tree else {
        return Ok(0);
    };

    let entry = match tree.get_path(Path::new(path)) {
        Ok(entry) => entry,
        Err(e) if e.code() == ErrorCode::NotFound => return Ok(0),
        Err(e) => return Err(e.into()),
    };

    match entry.kind() {
        Some(ObjectType::Blob) => blob_loc(repo, entry.id(), whitespace),
        _ => Ok(0),
    }
}

/// Paths and blob ids of every file under `tree`.
fn tree_blobs(tree: &Tree<'_>) -> Result<Vec<(String, Oid)>> {
    let mut blobs = Vec::new();
    tree.walk(TreeWalkMode::PreOrder, |root, entry| {
        if entry.kind() == Some(ObjectType::Blob) {
            if let Some(name) = entry.name() {
                blobs.push((format!("{}{}", root, name), entry.id()));
            }
        }
        TreeWalkResult::Ok
    })?;
    Ok(blobs)
}

/// Single pass over `tree`: total physical lines plus the set of file paths.
pub fn tree_inventory(
    repo: &Repository,
    tree: &Tree<'_>,
    cancel: &CancellationToken,
) -> Result<TreeInventory> {
    let mut inventory = TreeInventory::default();
    for (path, id) in tree_blobs(tree)? {
        check_cancelled(cancel)?;
        inventory.lines += blob_loc(repo, id, Whitespace::Included)?;
        inventory.files.insert(path);
    }
    Ok(inventory)
}

impl GitRepository {
    /// Line count of `path` at `revision`.
    pub fn file_loc(&self, revision: &str, path: &str, whitespace: Whitespace) -> Result<FileLoc> {
        self.with_repo(|repo| {
            let commit = resolve_commit(repo, revision)?;
            let tree = commit.tree()?;
            if tree.get_path(Path::new(path)).is_err() {
                return Err(ChurnError::PathNotFound(format!("{} at {}", path, revision)));
            }
            Ok(FileLoc {
                path: path.to_string(),
                commit: commit.id().to_string(),
                whitespace,
                lines: file_loc_in_tree(repo, Some(&tree), path, whitespace)?,
            })
        })
    }

    /// Paths of every file at `revision`, sorted.
    pub fn list_files(&self, revision: &str) -> Result<Vec<String>> {
        self.with_repo(|repo| {
            let tree = resolve_commit(repo, revision)?.tree()?;
            let mut files: Vec<String> = tree_blobs(&tree)?.into_iter().map(|(p, _)| p).collect();
            files.sort();
            Ok(files)
        })
    }
}

// Shared fixtures for integration tests
// Builds throwaway git repositories with controlled authors and timestamps
#![allow(dead_code)]

use git2::{Oid, Repository, Signature, Time};
use git_churn::GitRepository;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const ALICE: (&str, &str) = ("Alice", "alice@example.com");
pub const BOB: (&str, &str) = ("Bob", "bob@example.com");
pub const CAROL: (&str, &str) = ("Carol", "carol@example.com");

/// Create a temporary git repository with no commits
pub fn create_test_repo() -> (TempDir, PathBuf, Repository) {
    let dir = TempDir::new().unwrap();
    let repo_path = dir.path().to_path_buf();
    let repo = Repository::init(&repo_path).unwrap();

    let mut config = repo.config().unwrap();
    config.set_str("user.name", "Test User").unwrap();
    config.set_str("user.email", "test@example.com").unwrap();

    (dir, repo_path, repo)
}

pub fn open(repo_path: &Path) -> GitRepository {
    GitRepository::open(repo_path).unwrap()
}

/// Write files, stage them, and commit on HEAD as `author` at `when`.
pub fn commit_as(
    repo: &Repository,
    author: (&str, &str),
    when: i64,
    files: &[(&str, &str)],
    message: &str,
) -> Oid {
    let mut index = repo.index().unwrap();

    for (path, content) in files {
        let full_path = repo.workdir().unwrap().join(path);
        if let Some(parent) = full_path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&full_path, content).unwrap();
        index.add_path(Path::new(path)).unwrap();
    }

    write_commit(repo, &mut index, author, when, message)
}

/// Add files and commit as the default test author.
pub fn add_commit(repo: &Repository, files: &[(&str, &str)], message: &str) -> Oid {
    let when = next_timestamp(repo);
    commit_as(repo, ("Test User", "test@example.com"), when, files, message)
}

/// Remove a file and commit the removal.
pub fn remove_file_commit(repo: &Repository, author: (&str, &str), path: &str, message: &str) -> Oid {
    let full_path = repo.workdir().unwrap().join(path);
    if full_path.exists() {
        std::fs::remove_file(&full_path).unwrap();
    }

    let mut index = repo.index().unwrap();
    index.remove_path(Path::new(path)).unwrap();
    let when = next_timestamp(repo);
    write_commit(repo, &mut index, author, when, message)
}

/// Commit with explicit parents without moving HEAD (for merges and side branches).
pub fn commit_with_parents(
    repo: &Repository,
    author: (&str, &str),
    when: i64,
    tree_from: Oid,
    parents: &[Oid],
    message: &str,
) -> Oid {
    let sig = Signature::new(author.0, author.1, &Time::new(when, 0)).unwrap();
    let tree = repo.find_commit(tree_from).unwrap().tree().unwrap();
    let parents: Vec<git2::Commit> = parents.iter().map(|p| repo.find_commit(*p).unwrap()).collect();
    let parent_refs: Vec<&git2::Commit> = parents.iter().collect();
    repo.commit(None, &sig, &sig, message, &tree, &parent_refs).unwrap()
}

fn write_commit(
    repo: &Repository,
    index: &mut git2::Index,
    author: (&str, &str),
    when: i64,
    message: &str,
) -> Oid {
    index.write().unwrap();
    let tree_id = index.write_tree().unwrap();
    let tree = repo.find_tree(tree_id).unwrap();
    let sig = Signature::new(author.0, author.1, &Time::new(when, 0)).unwrap();

    let parent = repo.head().ok().and_then(|h| h.peel_to_commit().ok());
    let commit_id = match parent {
        Some(parent) => repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &[&parent]),
        None => repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &[]),
    };
    commit_id.unwrap()
}

/// One second after HEAD, so default commits have strictly increasing times.
fn next_timestamp(repo: &Repository) -> i64 {
    repo.head()
        .ok()
        .and_then(|h| h.peel_to_commit().ok())
        .map(|c| c.time().seconds() + 1)
        .unwrap_or(1_700_000_000)
}

/// `count` numbered lines, each ending in a newline.
pub fn numbered_lines(prefix: &str, count: usize) -> String {
    (1..=count).map(|i| format!("{}{}\n", prefix, i)).collect()
}

/// Commit a tree built from raw `(name, id, filemode)` entries on HEAD.
/// Lets tests place gitlinks (`0o160000`) that the index would refuse.
pub fn commit_entries(repo: &Repository, entries: &[(&str, Oid, i32)], message: &str) -> Oid {
    let mut builder = repo.treebuilder(None).unwrap();
    for (name, id, mode) in entries {
        builder.insert(*name, *id, *mode).unwrap();
    }
    let tree = repo.find_tree(builder.write().unwrap()).unwrap();
    let sig = Signature::new("Test User", "test@example.com", &Time::new(next_timestamp(repo), 0)).unwrap();

    let parent = repo.head().ok().and_then(|h| h.peel_to_commit().ok());
    let parents: Vec<&git2::Commit> = parent.iter().collect();
    repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &parents).unwrap()
}

/// Remove the loose object file for `id`, leaving a hole in history.
pub fn delete_loose_object(repo: &Repository, id: Oid) {
    let hex = id.to_string();
    let object = repo.path().join("objects").join(&hex[..2]).join(&hex[2..]);
    std::fs::remove_file(object).unwrap();
}

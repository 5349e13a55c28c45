//! Commit ranges and per-file authorship.
//!
//! A range `begin..end` holds the commits reachable from `end` but not from
//! `begin`, like `git rev-list begin..end`. Reachability follows every parent
//! edge, so merged side branches are included.

use git2::{ErrorCode, ObjectType, Oid, Repository};
use std::collections::HashSet;
use std::path::Path;
use std::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::error::{ChurnError, Result};
use crate::git::repository::GitRepository;
use crate::git::revision::resolve_oid;
use crate::models::{AuthorInfo, CommitSummary};
use crate::task::check_cancelled;

/// Commits reachable from `start`, not expanding past anything in `stop`.
fn reachable_commits(repo: &Repository, start: Oid, stop: &HashSet<Oid>) -> Result<HashSet<Oid>> {
    let mut seen = HashSet::new();
    let mut pending = vec![start];

    while let Some(oid) = pending.pop() {
        if stop.contains(&oid) || !seen.insert(oid) {
            continue;
        }
        let commit = repo
            .find_commit(oid)
            .map_err(|e| ChurnError::TraversalError(format!("{}: {}", oid, e.message())))?;
        pending.extend(commit.parent_ids());
    }

    Ok(seen)
}

fn summarize(repo: &Repository, oid: Oid) -> Result<CommitSummary> {
    let commit = repo
        .find_commit(oid)
        .map_err(|e| ChurnError::TraversalError(format!("{}: {}", oid, e.message())))?;

    Ok(CommitSummary {
        oid: oid.to_string(),
        parents: commit.parent_ids().map(|id| id.to_string()).collect(),
        tree: commit.tree_id().to_string(),
        author: AuthorInfo::from_signature(&commit.author()),
        committer: AuthorInfo::from_signature(&commit.committer()),
        timestamp: commit.time().seconds(),
        summary: commit.summary().unwrap_or("").to_string(),
    })
}

/// Newest committer time first; equal times fall back to commit id.
pub fn sort_newest_first(commits: &mut [CommitSummary]) {
    commits.sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then_with(|| a.oid.cmp(&b.oid)));
}

/// Ordered commits of `begin..end` for already-resolved endpoints.
pub fn range_commits(repo: &Repository, begin: Oid, end: Oid) -> Result<Vec<CommitSummary>> {
    if begin == end {
        return Ok(Vec::new());
    }

    let hidden = reachable_commits(repo, begin, &HashSet::new())?;
    let included = reachable_commits(repo, end, &hidden)?;

    let mut commits = included
        .into_iter()
        .map(|oid| summarize(repo, oid))
        .collect::<Result<Vec<_>>>()?;
    sort_newest_first(&mut commits);
    Ok(commits)
}

/// Resolve both endpoints and enumerate `begin..end`.
pub fn rev_list(repo: &Repository, begin: &str, end: &str) -> Result<Vec<CommitSummary>> {
    let start = Instant::now();
    let begin_oid = resolve_oid(repo, begin)?;
    let end_oid = resolve_oid(repo, end)?;
    let commits = range_commits(repo, begin_oid, end_oid)?;
    tracing::info!("rev-list {}..{}: {} commits in {:?}", begin, end, commits.len(), start.elapsed());
    Ok(commits)
}

/// Distinct author emails of the commits in `begin..end` whose tree has a
/// file at `path`.
///
/// Commits where the file does not exist are skipped. Emails keep the order
/// in which they were first seen walking newest to oldest.
pub fn distinct_author_emails(
    repo: &Repository,
    begin: &str,
    end: &str,
    path: &str,
    cancel: &CancellationToken,
) -> Result<Vec<String>> {
    let commits = rev_list(repo, begin, end)?;
    let mut seen = HashSet::new();
    let mut authors = Vec::new();

    for summary in &commits {
        check_cancelled(cancel)?;
        let oid = Oid::from_str(&summary.oid)?;
        let tree = repo.find_commit(oid)?.tree()?;

        match tree.get_path(Path::new(path)) {
            Ok(entry) if entry.kind() == Some(ObjectType::Blob) => {}
            Ok(_) => {
                tracing::debug!("{} is not a file at {}, skipping", path, summary.oid);
                continue;
            }
            Err(e) if e.code() == ErrorCode::NotFound => {
                tracing::debug!("{} absent at {}, skipping", path, summary.oid);
                continue;
            }
            Err(e) => return Err(e.into()),
        }

        if seen.insert(summary.author.email.clone()) {
            authors.push(summary.author.email.clone());
        }
    }

    Ok(authors)
}

impl GitRepository {
    pub fn rev_list(&self, begin: &str, end: &str) -> Result<Vec<CommitSummary>> {
        self.with_repo(|repo| rev_list(repo, begin, end))
    }

    pub fn distinct_author_emails(
        &self,
        begin: &str,
        end: &str,
        path: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<String>> {
        self.with_repo(|repo| distinct_author_emails(repo, begin, end, path, cancel))
    }
}

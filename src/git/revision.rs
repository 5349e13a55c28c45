//! Revision expressions to concrete commits.
//!
//! Accepts anything `git rev-parse` does: branch and tag names, full or
//! abbreviated hashes, and relative forms like `HEAD~1` or `main^2`.

use git2::{Commit, Oid, Repository};

use crate::error::{ChurnError, Result};
use crate::git::repository::GitRepository;

pub fn resolve_commit<'r>(repo: &'r Repository, revision: &str) -> Result<Commit<'r>> {
    tracing::debug!("git rev-parse {}", revision);
    let object = repo
        .revparse_single(revision)
        .map_err(|e| ChurnError::from_revparse(revision, e))?;
    object
        .peel_to_commit()
        .map_err(|_| ChurnError::UnresolvableRevision(revision.to_string()))
}

pub fn resolve_oid(repo: &Repository, revision: &str) -> Result<Oid> {
    resolve_commit(repo, revision).map(|c| c.id())
}

impl GitRepository {
    pub fn resolve_revision(&self, revision: &str) -> Result<Oid> {
        self.with_repo(|repo| resolve_oid(repo, revision))
    }
}

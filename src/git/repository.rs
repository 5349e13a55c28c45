use git2::{BranchType, Repository};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

use crate::error::{ChurnError, Result};
use crate::models::{BranchInfo, CommitInfo, TagInfo};

pub struct GitRepository {
    pub repo: Mutex<Repository>,
    /// The `.git` directory; background tasks open their own handles from it.
    pub git_dir: PathBuf,
    pub source: String,
    // Keeps a cloned checkout alive for as long as the handle is.
    _scratch: Option<TempDir>,
}

impl GitRepository {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_str = path.as_ref().to_string_lossy().to_string();
        let repo = Repository::discover(&path).map_err(|_| ChurnError::RepoNotFound(path_str.clone()))?;

        Ok(Self {
            git_dir: repo.path().to_path_buf(),
            repo: Mutex::new(repo),
            source: path_str,
            _scratch: None,
        })
    }

    /// Clone `url` into `dest`.
    pub fn clone_into<P: AsRef<Path>>(url: &str, dest: P) -> Result<Self> {
        tracing::info!("git clone {} {}", url, dest.as_ref().display());
        let repo = git2::build::RepoBuilder::new()
            .clone(url, dest.as_ref())
            .map_err(|e| ChurnError::from_clone(url, e))?;

        Ok(Self {
            git_dir: repo.path().to_path_buf(),
            repo: Mutex::new(repo),
            source: url.to_string(),
            _scratch: None,
        })
    }

    /// Clone `url` into a temporary directory removed when the handle drops.
    pub fn clone_temporary(url: &str) -> Result<Self> {
        let scratch = tempfile::Builder::new()
            .prefix("git-churn-")
            .tempdir()
            .map_err(|e| ChurnError::CloneError {
                url: url.to_string(),
                message: e.to_string(),
            })?;
        let mut cloned = Self::clone_into(url, scratch.path())?;
        cloned._scratch = Some(scratch);
        Ok(cloned)
    }

    /// Open a local path, or clone when `source` looks like a remote URL.
    pub fn open_or_clone(source: &str) -> Result<Self> {
        if looks_like_remote(source) {
            Self::clone_temporary(source)
        } else {
            Self::open(source)
        }
    }

    pub fn with_repo<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Repository) -> Result<T>,
    {
        let repo = self.repo.lock().map_err(|_| ChurnError::Internal("Lock poisoned".to_string()))?;
        f(&repo)
    }

    /// A fresh handle on the same repository for use on another thread.
    pub fn open_handle(&self) -> Result<Repository> {
        open_git_dir(&self.git_dir)
    }

    pub fn head_commit(&self) -> Result<CommitInfo> {
        self.with_repo(|repo| {
            let commit = repo.head()?.peel_to_commit()?;
            Ok(commit_to_info(&commit))
        })
    }

    pub fn branches(&self) -> Result<Vec<BranchInfo>> {
        self.with_repo(|repo| {
            let mut branches = Vec::new();
            for item in repo.branches(Some(BranchType::Local))? {
                let (branch, _) = item?;
                let Some(name) = branch.name()?.map(|s| s.to_string()) else {
                    continue;
                };
                let last_commit = branch.get().peel_to_commit().ok().map(|c| commit_to_info(&c));
                branches.push(BranchInfo {
                    name,
                    is_current: branch.is_head(),
                    last_commit,
                });
            }
            branches.sort_by(|a, b| a.name.cmp(&b.name));
            Ok(branches)
        })
    }

    pub fn tags(&self) -> Result<Vec<TagInfo>> {
        self.with_repo(|repo| {
            let names = repo.tag_names(None)?;
            let tags = names
                .iter()
                .flatten()
                .map(|name| {
                    let target = repo
                        .revparse_single(&format!("refs/tags/{}", name))
                        .and_then(|obj| obj.peel_to_commit())
                        .ok()
                        .map(|c| c.id().to_string());
                    TagInfo {
                        name: name.to_string(),
                        target,
                    }
                })
                .collect();
            Ok(tags)
        })
    }
}

pub fn open_git_dir(git_dir: &Path) -> Result<Repository> {
    Repository::open(git_dir).map_err(|_| ChurnError::RepoNotFound(git_dir.display().to_string()))
}

fn looks_like_remote(source: &str) -> bool {
    source.contains("://") || (source.starts_with("git@") && source.contains(':'))
}

pub fn commit_to_info(commit: &git2::Commit) -> CommitInfo {
    let timestamp = commit.time().seconds();
    CommitInfo {
        oid: commit.id().to_string(),
        message: commit.message().unwrap_or("").trim().to_string(),
        author: commit.author().name().unwrap_or("Unknown").to_string(),
        timestamp,
        relative_time: format_relative_time(timestamp),
    }
}

pub fn format_relative_time(timestamp: i64) -> String {
    let now = chrono::Utc::now().timestamp();
    let diff = now - timestamp;

    let (count, unit) = if diff < 60 {
        return "just now".to_string();
    } else if diff < 3600 {
        (diff / 60, "minute")
    } else if diff < 86400 {
        (diff / 3600, "hour")
    } else if diff < 2592000 {
        (diff / 86400, "day")
    } else if diff < 31536000 {
        (diff / 2592000, "month")
    } else {
        (diff / 31536000, "year")
    };
    format!("{} {}{} ago", count, unit, if count == 1 { "" } else { "s" })
}

pub type SharedRepo = Arc<GitRepository>;

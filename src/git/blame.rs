use git2::BlameOptions;
use std::path::Path;

use crate::error::{ChurnError, Result};
use crate::git::repository::GitRepository;
use crate::git::revision::resolve_commit;
use crate::metrics::chunks::split_lines;
use crate::models::{BlameLine, BlameResponse};

impl GitRepository {
    /// Line attribution for `path` as of `revision`, delegated to libgit2.
    pub fn blame(&self, path: &str, revision: &str) -> Result<BlameResponse> {
        self.with_repo(|repo| {
            let commit = resolve_commit(repo, revision)?;
            let entry = commit
                .tree()?
                .get_path(Path::new(path))
                .map_err(|_| ChurnError::PathNotFound(format!("{} at {}", path, revision)))?;
            let blob = repo.find_blob(entry.id())?;
            let text = String::from_utf8_lossy(blob.content()).into_owned();
            let content = split_lines(&text);

            let mut opts = BlameOptions::new();
            opts.newest_commit(commit.id());
            let blame = repo.blame_file(Path::new(path), Some(&mut opts))?;

            let mut lines = Vec::with_capacity(content.len());
            for hunk in blame.iter() {
                let owner = repo.find_commit(hunk.final_commit_id())?;
                let sig = owner.author();
                let start = hunk.final_start_line();
                for offset in 0..hunk.lines_in_hunk() {
                    let line_number = start + offset;
                    lines.push(BlameLine {
                        line_number,
                        author_name: sig.name().unwrap_or("Unknown").to_string(),
                        author_email: sig.email().unwrap_or("").to_string(),
                        commit_oid: hunk.final_commit_id().to_string(),
                        timestamp: sig.when().seconds(),
                        content: content
                            .get(line_number.saturating_sub(1))
                            .map(|s| s.to_string())
                            .unwrap_or_default(),
                    });
                }
            }

            Ok(BlameResponse {
                path: path.to_string(),
                commit: commit.id().to_string(),
                lines,
            })
        })
    }
}

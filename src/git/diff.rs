//! Commit diffs as full-file chunk sequences.
//!
//! libgit2 reports hunks with a few lines of context. The old-file lines the
//! patch leaves out are filled back in from the parent blob, so each file's
//! chunks cover the whole "before" file in order.

use git2::{Commit, Diff, DiffOptions, FileMode, Oid, Repository, Tree};

use crate::error::{ChurnError, Result};
use crate::metrics::chunks::{Chunk, ChunkKind};

/// One line of a hunk as libgit2 reports it.
#[derive(Debug, Clone)]
pub struct PatchLine {
    pub origin: char,
    pub old_lineno: Option<u32>,
    pub content: String,
}

#[derive(Debug, Clone)]
pub struct PatchHunk {
    pub old_start: u32,
    pub old_lines: u32,
    pub lines: Vec<PatchLine>,
}

/// One file's side of a commit diff. Submodule entries never appear.
#[derive(Debug, Clone)]
pub struct FilePatch {
    pub old_path: Option<String>,
    pub new_path: Option<String>,
    /// Binary patches carry no chunks and have no line numbers.
    pub is_binary: bool,
    pub chunks: Vec<Chunk>,
}

impl FilePatch {
    /// The "from" path, or the "to" path for an added file.
    pub fn path(&self) -> &str {
        self.old_path
            .as_deref()
            .or(self.new_path.as_deref())
            .unwrap_or("")
    }

    pub fn touches(&self, path: &str) -> bool {
        self.old_path.as_deref() == Some(path) || self.new_path.as_deref() == Some(path)
    }
}

fn append(chunks: &mut Vec<Chunk>, kind: ChunkKind, text: &str) {
    if text.is_empty() {
        return;
    }
    match chunks.last_mut() {
        Some(last) if last.kind == kind => last.content.push_str(text),
        _ => chunks.push(Chunk::new(kind, text)),
    }
}

/// Emit old lines `cursor..upto` as Equal and advance the cursor.
fn fill_equal(chunks: &mut Vec<Chunk>, old_lines: &[&str], cursor: &mut usize, upto: usize) {
    let upto = upto.min(old_lines.len());
    if upto > *cursor {
        append(chunks, ChunkKind::Equal, &old_lines[*cursor..upto].concat());
        *cursor = upto;
    }
}

/// Rebuild the full chunk sequence of one file.
///
/// `old_content` is the complete "before" blob; lines the hunks skip are
/// copied from it as Equal runs.
pub fn build_chunks(hunks: &[PatchHunk], old_content: &str) -> Result<Vec<Chunk>> {
    let old_lines: Vec<&str> = old_content.split_inclusive('\n').collect();
    let mut chunks = Vec::new();
    // Old-file lines already emitted.
    let mut cursor = 0usize;

    for hunk in hunks {
        // A pure insertion hunk starts after `old_start` rather than at it.
        let gap_end = if hunk.old_lines == 0 {
            hunk.old_start
        } else {
            hunk.old_start.saturating_sub(1)
        };
        fill_equal(&mut chunks, &old_lines, &mut cursor, gap_end as usize);

        for line in &hunk.lines {
            let kind = match line.origin {
                ' ' => ChunkKind::Equal,
                '-' => ChunkKind::Delete,
                '+' => ChunkKind::Insert,
                // "\ No newline at end of file" markers
                '=' | '>' | '<' => continue,
                other => {
                    return Err(ChurnError::MalformedPatchText(format!(
                        "unexpected line origin {:?}",
                        other
                    )));
                }
            };

            if let Some(n) = line.old_lineno {
                fill_equal(&mut chunks, &old_lines, &mut cursor, n as usize - 1);
                cursor = cursor.max(n as usize);
            }
            append(&mut chunks, kind, &line.content);
        }
    }

    fill_equal(&mut chunks, &old_lines, &mut cursor, old_lines.len());
    Ok(chunks)
}

fn blob_text(repo: &Repository, id: Oid) -> Result<String> {
    if id.is_zero() {
        return Ok(String::new());
    }
    let blob = repo.find_blob(id)?;
    Ok(String::from_utf8_lossy(blob.content()).into_owned())
}

fn file_patches(repo: &Repository, diff: &Diff<'_>) -> Result<Vec<FilePatch>> {
    let mut files = Vec::new();

    for (delta_idx, delta) in diff.deltas().enumerate() {
        // Submodule ids name commits of another repository.
        if delta.old_file().mode() == FileMode::Commit || delta.new_file().mode() == FileMode::Commit {
            let path = delta.new_file().path().or(delta.old_file().path());
            tracing::debug!("Skipping submodule {:?}", path);
            continue;
        }

        let old_path = delta.old_file().path().map(|p| p.to_string_lossy().to_string());
        let new_path = delta.new_file().path().map(|p| p.to_string_lossy().to_string());
        let old_path = old_path.filter(|_| !delta.old_file().id().is_zero());
        let new_path = new_path.filter(|_| !delta.new_file().id().is_zero());

        let patch = git2::Patch::from_diff(diff, delta_idx)?;
        let is_binary = delta.flags().is_binary()
            || patch.as_ref().is_some_and(|p| p.delta().flags().is_binary());

        let chunks = match patch {
            Some(patch) if !is_binary => {
                let mut hunks = Vec::with_capacity(patch.num_hunks());
                for hunk_idx in 0..patch.num_hunks() {
                    let (hunk, line_count) = patch.hunk(hunk_idx)?;
                    let mut lines = Vec::with_capacity(line_count);
                    for line_idx in 0..line_count {
                        let line = patch.line_in_hunk(hunk_idx, line_idx)?;
                        lines.push(PatchLine {
                            origin: line.origin(),
                            old_lineno: line.old_lineno(),
                            content: String::from_utf8_lossy(line.content()).into_owned(),
                        });
                    }
                    hunks.push(PatchHunk {
                        old_start: hunk.old_start(),
                        old_lines: hunk.old_lines(),
                        lines,
                    });
                }
                let old_content = blob_text(repo, delta.old_file().id())?;
                build_chunks(&hunks, &old_content)?
            }
            None => Vec::new(),
            Some(_) => {
                tracing::warn!(
                    "Skipping binary patch for {}",
                    new_path.as_deref().or(old_path.as_deref()).unwrap_or("?")
                );
                Vec::new()
            }
        };

        files.push(FilePatch {
            old_path,
            new_path,
            is_binary,
            chunks,
        });
    }

    Ok(files)
}

/// Diff `parent_tree` (empty when `None`) against `tree`, optionally
/// restricted to one literal path.
pub fn tree_patches(
    repo: &Repository,
    parent_tree: Option<&Tree<'_>>,
    tree: &Tree<'_>,
    path: Option<&str>,
) -> Result<Vec<FilePatch>> {
    let mut opts = DiffOptions::new();
    if let Some(p) = path {
        opts.pathspec(p);
        opts.disable_pathspec_match(true);
    }

    let diff = repo.diff_tree_to_tree(parent_tree, Some(tree), Some(&mut opts))?;
    file_patches(repo, &diff)
}

/// The commit's tree and its first parent's tree, if any.
pub fn commit_trees<'r>(commit: &Commit<'r>) -> Result<(Tree<'r>, Option<Tree<'r>>)> {
    let tree = commit.tree()?;
    let parent_tree = if commit.parent_count() > 0 {
        Some(commit.parent(0)?.tree()?)
    } else {
        None
    };
    Ok((tree, parent_tree))
}

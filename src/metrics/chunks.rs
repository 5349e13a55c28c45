//! Per-line classification of a file's chunk sequence.
//!
//! A chunk sequence covers the whole file in order: Equal runs carry lines
//! shared by both sides, Delete runs lines only in the "before" file, and
//! Insert runs lines only in the "after" file. Deleted line numbers are
//! 1-based positions in the "before" file.

use serde::Serialize;

use crate::config::Whitespace;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChunkKind {
    Equal,
    Insert,
    Delete,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    pub kind: ChunkKind,
    pub content: String,
}

impl Chunk {
    pub fn new(kind: ChunkKind, content: impl Into<String>) -> Self {
        Self {
            kind,
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChunkClassification {
    pub deleted_lines: Vec<usize>,
    pub insertions: usize,
    pub deletions: usize,
}

/// Split chunk or blob content into lines.
///
/// Empty content has no lines. A trailing newline terminates the last line
/// rather than starting a new one; content without it still counts its
/// final partial line.
pub fn split_lines(content: &str) -> Vec<&str> {
    if content.is_empty() {
        return Vec::new();
    }
    let mut lines: Vec<&str> = content.split('\n').collect();
    if content.ends_with('\n') {
        lines.pop();
    }
    lines
}

/// Number of lines in `content` that count under `whitespace`.
pub fn count_lines(content: &str, whitespace: Whitespace) -> usize {
    split_lines(content)
        .into_iter()
        .filter(|line| whitespace.counts(line))
        .count()
}

pub fn classify_chunks(chunks: &[Chunk], whitespace: Whitespace) -> ChunkClassification {
    let mut result = ChunkClassification::default();
    // Lines of the "before" file consumed so far.
    let mut counter = 0usize;

    for chunk in chunks {
        let lines = split_lines(&chunk.content);
        match chunk.kind {
            ChunkKind::Equal => counter += lines.len(),
            ChunkKind::Insert => {
                result.insertions += lines.iter().filter(|l| whitespace.counts(l)).count();
            }
            ChunkKind::Delete => {
                for (i, line) in lines.iter().enumerate() {
                    if whitespace.counts(line) {
                        result.deleted_lines.push(counter + i + 1);
                        result.deletions += 1;
                    }
                }
                counter += lines.len();
            }
        }
    }

    result
}

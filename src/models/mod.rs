//! Serializable result types.
//!
//! - `commit`: CommitSummary, AuthorInfo for range enumeration
//! - `diff`: DiffMetrics, FileDiffMetrics, AggrDiffMetrics, DeletedLines
//! - `blame`: BlameResponse, BlameLine for per-line attribution
//! - `tree`: CommitInfo, BranchInfo, TagInfo, FileLoc

pub mod blame;
pub mod commit;
pub mod diff;
pub mod tree;

pub use blame::*;
pub use commit::*;
pub use diff::*;
pub use tree::*;

//! Code churn metrics for git repositories.
//!
//! Computes insertions, deletions and before/after line counts for a file or
//! a whole tree at one commit, enumerates `begin..end` revision ranges, and
//! collects the distinct authors of a file across a range. Diffing, blame and
//! object storage are left to libgit2.

pub mod config;
pub mod error;
pub mod git;
pub mod metrics;
pub mod models;
pub mod task;

pub use config::{ChurnOptions, Whitespace};
pub use error::{ChurnError, Result};
pub use git::{GitRepository, SharedRepo};

//! Churn metrics: chunk classification, per-file metrics and the
//! repository-wide aggregate.

pub mod aggregate;
pub mod chunks;
pub mod file;

pub use aggregate::aggregate_diff_metrics;
pub use chunks::{classify_chunks, Chunk, ChunkClassification, ChunkKind};
pub use file::{deleted_line_numbers, file_diff_metrics};

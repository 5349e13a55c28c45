pub mod blame;
pub mod diff;
pub mod history;
pub mod repository;
pub mod revision;
pub mod tree;

pub use repository::{GitRepository, SharedRepo};

//! Query options shared by every metrics operation.

use std::time::Duration;

use serde::Serialize;

/// Whether whitespace-only lines count toward churn and line totals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Whitespace {
    /// Every physical line counts.
    #[default]
    Included,
    /// Lines that are empty after trimming are ignored.
    Excluded,
}

impl Whitespace {
    pub fn from_exclude_flag(exclude: bool) -> Self {
        if exclude {
            Whitespace::Excluded
        } else {
            Whitespace::Included
        }
    }

    /// Does `line` count under this mode?
    pub fn counts(self, line: &str) -> bool {
        match self {
            Whitespace::Included => true,
            Whitespace::Excluded => !line.trim().is_empty(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ChurnOptions {
    pub whitespace: Whitespace,
    /// Deadline for a whole query; `None` waits indefinitely.
    pub timeout: Option<Duration>,
}

impl ChurnOptions {
    pub fn new(whitespace: Whitespace, timeout: Option<Duration>) -> Self {
        Self { whitespace, timeout }
    }
}

// collectors - turn external tool output into raw records for classification

pub mod git;
pub mod review;

pub use git::{collect_commits, repo_root};
pub use review::collect_review_comments;

use chrono::{DateTime, FixedOffset};
use thiserror::Error;

/// where a raw record came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordSource {
    Commit,
    ReviewComment,
}

/// one unclassified piece of history or review discussion
#[derive(Debug, Clone)]
pub struct RawRecord {
    pub source: RecordSource,
    pub text: String,
    pub timestamp: Option<DateTime<FixedOffset>>,
    pub author: Option<String>,
}

impl RawRecord {
    pub fn new(source: RecordSource, text: impl Into<String>) -> Self {
        RawRecord {
            source,
            text: text.into(),
            timestamp: None,
            author: None,
        }
    }
}

/// recoverable condition: the external tool is missing or failed, so this
/// data source contributes nothing; the run continues and the report notes it
#[derive(Debug, Error)]
#[error("{tool} unavailable: {reason}")]
pub struct CollectorUnavailable {
    pub tool: &'static str,
    pub reason: String,
}

impl CollectorUnavailable {
    pub fn new(tool: &'static str, reason: impl Into<String>) -> Self {
        CollectorUnavailable {
            tool,
            reason: reason.into(),
        }
    }
}

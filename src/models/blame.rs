//! Blame records.
//!
//! `RawAnnotationRecord` is what a history source reports for one line,
//! `BlameLine` is what gets emitted once the file's annotation is trusted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// History information for a single line, as reported by the history source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawAnnotationRecord {
    /// Revision that last touched the line
    pub revision_id: String,
    /// Commit time of that revision
    pub commit_timestamp: DateTime<Utc>,
    /// Author as recorded in history, `None` when unresolved
    pub raw_author: Option<String>,
}

impl RawAnnotationRecord {
    pub fn new(
        revision_id: impl Into<String>,
        commit_timestamp: DateTime<Utc>,
        raw_author: Option<String>,
    ) -> Self {
        Self {
            revision_id: revision_id.into(),
            commit_timestamp,
            raw_author,
        }
    }
}

/// Blame information for a single line of the working copy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlameLine {
    /// Revision that last modified this line
    pub revision_id: String,
    /// When that revision was committed
    pub commit_timestamp: DateTime<Utc>,
    /// Normalized author of that revision
    pub author: Option<String>,
}

/// All blame lines of one file, in physical line order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileBlame {
    pub path: String,
    pub lines: Vec<BlameLine>,
}

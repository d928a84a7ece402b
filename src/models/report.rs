//! Run report returned by a pipeline pass.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::Post;

/// How a successful run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunOutcome {
    /// Nothing new; storage and email were left untouched
    NoNewPosts,
    /// Snapshot extended and digest sent
    Notified,
}

/// Per-source extraction count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceReport {
    pub name: String,
    pub post_count: usize,
}

/// Summary of one pipeline pass.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub sources: Vec<SourceReport>,
    /// Posts extracted across all sources, before diffing
    pub batch_size: usize,
    /// Snapshot length after the run
    pub snapshot_size: usize,
    pub new_posts: Vec<Post>,
    pub outcome: RunOutcome,
}

impl RunReport {
    /// Wall-clock duration of the run in milliseconds.
    pub fn elapsed_ms(&self) -> i64 {
        (self.finished_at - self.started_at).num_milliseconds()
    }
}

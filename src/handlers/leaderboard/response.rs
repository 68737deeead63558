//! Leaderboard response DTOs

use serde::{Deserialize, Serialize};

use crate::models::aggregate::MergedLeaderboard;

/// A contest that could not be merged
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkippedContest {
    pub contest_id: i64,
    pub reason: String,
}

/// Merged leaderboard plus its shareable report id.
///
/// Also the shape stored in the report cache, so cached reads and fresh
/// merges serve identical documents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MergeReportResponse {
    pub report_id: String,
    pub leaderboard: MergedLeaderboard,
    /// Contests dropped from the merge, with the upstream failure reason
    pub skipped_contests: Vec<SkippedContest>,
}

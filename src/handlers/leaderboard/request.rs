//! Leaderboard request DTOs

use std::collections::HashMap;

use serde::Deserialize;

use crate::ranking::merger::DemeritEntry;

/// Merge many contests into one leaderboard
#[derive(Debug, Deserialize)]
pub struct MergeRequest {
    /// Contests to merge, in display order
    pub contest_ids: Vec<i64>,

    /// Per-contest score weights; defaults to 1 per contest
    pub weights: Option<HashMap<i64, f64>>,

    /// Demerit points charged per contest
    pub demerits: Option<HashMap<i64, Vec<DemeritEntry>>>,
}

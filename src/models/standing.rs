//! Normalized per-contest standings

use serde::{Deserialize, Serialize};

use crate::models::snapshot::RawSubmission;

/// Contest metadata carried through normalization
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContestInfo {
    pub id: i64,
    pub title: String,
    /// Contest start, epoch milliseconds
    pub begin: i64,
    /// Contest duration, milliseconds
    pub length: i64,
}

/// Derived standing for one team in one contest
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamStanding {
    pub team_id: i64,
    pub username: String,
    pub display_name: String,
    pub avatar_url: String,
    pub solved_count: u32,
    /// Accumulated penalty minutes over solved problems, rounded to 2 decimals
    pub penalty_minutes: f64,
    /// Weighted score over solved problems
    pub final_score: f64,
    /// Per-problem outcomes in problem-index order, for solved problems only
    pub solved_problems: Vec<SolvedProblem>,
    /// The team's in-duration submissions, in submission order
    pub history: Vec<RawSubmission>,
}

/// Outcome for one solved problem
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolvedProblem {
    pub problem_index: usize,
    /// Non-accepted attempts strictly before the first accepted one
    pub wrong_attempts: u32,
    /// Elapsed seconds of the first accepted submission
    pub accepted_at_seconds: i64,
}

/// Full normalized output for one contest
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContestStandings {
    pub contest_info: ContestInfo,
    pub total_teams: usize,
    pub total_problems: usize,
    pub problem_weights: Vec<f64>,
    /// Standings sorted best-first: final score descending, then penalty
    /// ascending, then username for stability
    pub teams: Vec<TeamStanding>,
}

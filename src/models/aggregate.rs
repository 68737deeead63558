//! Cross-contest participant aggregates
//!
//! A [`ParticipantAggregate`] is a pure function of the merged contest
//! results; it is rebuilt on every merge request and never persisted as
//! a mutable entity.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// One participant's results for a single contest within a merge
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContestEntry {
    pub solved: u32,
    pub penalty: f64,
    /// Contest-weighted final score
    pub final_score: f64,
    pub demerit_points: f64,
    /// False for synthesized zero-participation entries
    pub attended: bool,
}

impl ContestEntry {
    /// Entry synthesized for a contest the participant did not attend.
    /// Demerit points still penalize absentees.
    pub fn absent(demerit_points: f64) -> Self {
        Self {
            solved: 0,
            penalty: demerit_points * crate::constants::ABSENTEE_DEMERIT_PENALTY_FACTOR,
            final_score: (-demerit_points).max(0.0),
            demerit_points,
            attended: false,
        }
    }
}

/// One row per unique username across all merged contests
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParticipantAggregate {
    pub username: String,
    pub display_name: String,
    pub avatar_url: String,
    /// Per-contest entries keyed by contest id
    pub contests: HashMap<i64, ContestEntry>,
    pub total_solved: u32,
    pub total_penalty: f64,
    pub total_score: f64,
    pub total_demerit_points: f64,
    /// Number of merged contests the participant actually appeared in
    pub attended_count: u32,
    /// `total_score - stddev(per-contest final scores)`; rewards consistency
    pub effective_solved: f64,
    /// `total_penalty + stddev(per-contest penalties)`
    pub effective_penalty: f64,
}

/// Merged leaderboard: ranked aggregates plus contest metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MergedLeaderboard {
    /// Sorted best-first (effective solved desc, effective penalty asc,
    /// attended count desc)
    pub users: Vec<ParticipantAggregate>,
    pub contest_ids: Vec<i64>,
    pub contest_id_to_title: HashMap<i64, String>,
}

/// Frozen per-participant statistics stored on a collection at the
/// phase-1 -> phase-2 transition, used for eligibility computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerformanceSnapshot {
    pub effective_solved: f64,
    pub effective_penalty: f64,
    pub total_solved: u32,
    pub total_penalty: f64,
    pub attended_count: u32,
}

impl From<&ParticipantAggregate> for PerformanceSnapshot {
    fn from(aggregate: &ParticipantAggregate) -> Self {
        Self {
            effective_solved: aggregate.effective_solved,
            effective_penalty: aggregate.effective_penalty,
            total_solved: aggregate.total_solved,
            total_penalty: aggregate.total_penalty,
            attended_count: aggregate.attended_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_entry_demerit_asymmetry() {
        // Penalty scales by 100, score deduction floors at zero
        let entry = ContestEntry::absent(4.0);
        assert_eq!(entry.solved, 0);
        assert_eq!(entry.penalty, 400.0);
        assert_eq!(entry.final_score, 0.0);
        assert!(!entry.attended);
    }

    #[test]
    fn test_absent_entry_without_demerits_is_all_zero() {
        let entry = ContestEntry::absent(0.0);
        assert_eq!(entry.penalty, 0.0);
        assert_eq!(entry.final_score, 0.0);
        assert_eq!(entry.demerit_points, 0.0);
    }
}

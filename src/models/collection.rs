//! Team collection model
//!
//! A collection is one team-formation workflow instance. The phase gates
//! live here so services can validate before any write happens.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use sqlx::types::Json;
use uuid::Uuid;

use crate::constants::phases;
use crate::error::{AppError, AppResult};
use crate::models::aggregate::PerformanceSnapshot;

/// Team collection database model
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct TeamCollection {
    pub id: Uuid,
    pub room_id: String,
    pub title: String,
    /// 1 = participation, 2 = selection, 3 = finalized
    pub phase: i16,
    /// Whether phase-2 choice submissions are currently accepted
    pub is_open: bool,
    pub finalized: bool,
    pub phase1_deadline: Option<DateTime<Utc>>,
    /// Usernames ordered best-first, frozen when selection starts
    pub rank_order: Json<Vec<String>>,
    /// Frozen per-participant statistics, keyed by username
    pub performance: Json<HashMap<String, PerformanceSnapshot>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Collection phase enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollectionPhase {
    Participation,
    Selection,
    Finalized,
}

impl std::fmt::Display for CollectionPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Participation => write!(f, "participation"),
            Self::Selection => write!(f, "selection"),
            Self::Finalized => write!(f, "finalized"),
        }
    }
}

impl TeamCollection {
    /// Current phase of the workflow
    pub fn current_phase(&self) -> CollectionPhase {
        match self.phase {
            phases::PARTICIPATION => CollectionPhase::Participation,
            phases::SELECTION => CollectionPhase::Selection,
            _ => CollectionPhase::Finalized,
        }
    }

    /// Check that the collection is in the expected phase
    pub fn ensure_phase(&self, expected: i16) -> AppResult<()> {
        if self.phase != expected {
            return Err(AppError::PhaseMismatch(format!(
                "Collection is in the {} phase",
                self.current_phase()
            )));
        }
        Ok(())
    }

    /// Whether participation toggles are still accepted.
    ///
    /// Deadline passage only closes the opt-in window; the phase
    /// transition itself stays admin-driven.
    pub fn ensure_participation_open(&self, now: DateTime<Utc>) -> AppResult<()> {
        self.ensure_phase(phases::PARTICIPATION)?;

        if let Some(deadline) = self.phase1_deadline
            && now > deadline
        {
            return Err(AppError::PhaseMismatch(
                "The participation deadline has passed".to_string(),
            ));
        }
        Ok(())
    }

    /// Whether phase-2 choice submissions are accepted right now
    pub fn ensure_submittable(&self) -> AppResult<()> {
        self.ensure_phase(phases::SELECTION)?;

        if self.finalized {
            return Err(AppError::PhaseMismatch(
                "Teams have already been finalized".to_string(),
            ));
        }
        if !self.is_open {
            return Err(AppError::PhaseMismatch(
                "Choice submissions are currently paused".to_string(),
            ));
        }
        Ok(())
    }

    /// Index of a username in the frozen rank order
    pub fn rank_index(&self, username: &str) -> Option<usize> {
        self.rank_order.0.iter().position(|u| u == username)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn collection(phase: i16, is_open: bool, finalized: bool) -> TeamCollection {
        TeamCollection {
            id: Uuid::new_v4(),
            room_id: "room-1".to_string(),
            title: "Winter Cohort".to_string(),
            phase,
            is_open,
            finalized,
            phase1_deadline: None,
            rank_order: Json(vec!["alice".to_string(), "bob".to_string()]),
            performance: Json(HashMap::new()),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_submittable_requires_open_selection() {
        assert!(collection(2, true, false).ensure_submittable().is_ok());
    }

    #[test]
    fn test_submittable_rejected_when_closed() {
        let err = collection(2, false, false).ensure_submittable().unwrap_err();
        assert_eq!(err.error_code(), "PHASE_MISMATCH");
    }

    #[test]
    fn test_submittable_rejected_when_finalized() {
        let err = collection(3, true, true).ensure_submittable().unwrap_err();
        assert_eq!(err.error_code(), "PHASE_MISMATCH");
    }

    #[test]
    fn test_submittable_rejected_in_participation_phase() {
        let err = collection(1, true, false).ensure_submittable().unwrap_err();
        assert_eq!(err.error_code(), "PHASE_MISMATCH");
    }

    #[test]
    fn test_participation_open_before_deadline() {
        let mut c = collection(1, false, false);
        let now = Utc::now();
        c.phase1_deadline = Some(now + Duration::hours(1));
        assert!(c.ensure_participation_open(now).is_ok());
    }

    #[test]
    fn test_participation_closed_after_deadline() {
        let mut c = collection(1, false, false);
        let now = Utc::now();
        c.phase1_deadline = Some(now - Duration::hours(1));
        let err = c.ensure_participation_open(now).unwrap_err();
        assert_eq!(err.error_code(), "PHASE_MISMATCH");
    }

    #[test]
    fn test_participation_open_without_deadline() {
        let c = collection(1, false, false);
        assert!(c.ensure_participation_open(Utc::now()).is_ok());
    }

    #[test]
    fn test_rank_index() {
        let c = collection(2, true, false);
        assert_eq!(c.rank_index("alice"), Some(0));
        assert_eq!(c.rank_index("bob"), Some(1));
        assert_eq!(c.rank_index("mallory"), None);
    }
}

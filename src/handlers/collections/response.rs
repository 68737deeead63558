//! Collection response DTOs

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::constants::{
    MAX_TEAM_CHOICES, MIN_TEAM_CHOICES, UI_DISPLAY_MAX_CHOICES, UI_DISPLAY_MIN_CHOICES,
};
use crate::models::{FinalizedTeam, ManualTeamRequest, TeamCollection};

/// Choice-count bounds surfaced to clients. `display_*` is what the UI
/// shows; `server_*` is what submissions are actually validated against.
#[derive(Debug, Serialize)]
pub struct ChoiceBounds {
    pub server_min: usize,
    pub server_max: usize,
    pub display_min: usize,
    pub display_max: usize,
}

impl Default for ChoiceBounds {
    fn default() -> Self {
        Self {
            server_min: MIN_TEAM_CHOICES,
            server_max: MAX_TEAM_CHOICES,
            display_min: UI_DISPLAY_MIN_CHOICES,
            display_max: UI_DISPLAY_MAX_CHOICES,
        }
    }
}

/// Collection response
#[derive(Debug, Serialize)]
pub struct CollectionResponse {
    pub id: Uuid,
    pub room_id: String,
    pub title: String,
    pub phase: String,
    pub phase_number: i16,
    pub is_open: bool,
    pub finalized: bool,
    pub phase1_deadline: Option<DateTime<Utc>>,
    /// Frozen rank order; empty until selection starts
    pub rank_order: Vec<String>,
    /// Participants who have opted in so far
    pub participant_count: usize,
    pub choice_bounds: ChoiceBounds,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CollectionResponse {
    pub fn from_collection(collection: TeamCollection, participant_count: usize) -> Self {
        Self {
            phase: collection.current_phase().to_string(),
            phase_number: collection.phase,
            id: collection.id,
            room_id: collection.room_id,
            title: collection.title,
            is_open: collection.is_open,
            finalized: collection.finalized,
            phase1_deadline: collection.phase1_deadline,
            rank_order: collection.rank_order.0,
            participant_count,
            choice_bounds: ChoiceBounds::default(),
            created_at: collection.created_at,
            updated_at: collection.updated_at,
        }
    }
}

/// Collections list response
#[derive(Debug, Serialize)]
pub struct CollectionsListResponse {
    pub collections: Vec<CollectionResponse>,
}

/// One candidate in the eligibility window
#[derive(Debug, Serialize)]
pub struct EligibleCandidate {
    pub username: String,
    pub rank_index: usize,
    pub effective_solved: f64,
}

/// Eligibility window response
#[derive(Debug, Serialize)]
pub struct EligibilityResponse {
    pub username: String,
    pub rank_index: usize,
    pub effective_solved: f64,
    pub candidates: Vec<EligibleCandidate>,
}

/// Start-selection response: the frozen collection plus the report the
/// ranking was captured from
#[derive(Debug, Serialize)]
pub struct StartSelectionResponse {
    pub collection: CollectionResponse,
    pub report_id: String,
    pub skipped_contests: Vec<crate::handlers::leaderboard::response::SkippedContest>,
}

/// Finalize response
#[derive(Debug, Serialize)]
pub struct FinalizeResponse {
    pub teams: Vec<FinalizedTeam>,
    /// Submitters whose choices could not be granted
    pub unmatched: Vec<String>,
}

/// Teams list response
#[derive(Debug, Serialize)]
pub struct TeamsListResponse {
    pub teams: Vec<FinalizedTeam>,
}

/// Manual requests list response
#[derive(Debug, Serialize)]
pub struct RequestsListResponse {
    pub requests: Vec<ManualTeamRequest>,
}

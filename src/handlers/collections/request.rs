//! Collection request DTOs

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use validator::Validate;

use crate::constants::{
    MAX_COLLECTION_TITLE_LENGTH, MAX_REQUEST_NOTE_LENGTH, MAX_TEAM_TITLE_LENGTH,
};
use crate::ranking::merger::DemeritEntry;

/// Create collection request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCollectionRequest {
    #[validate(length(min = 1, max = 64))]
    pub room_id: String,

    #[validate(length(min = 1, max = MAX_COLLECTION_TITLE_LENGTH))]
    pub title: String,

    /// Optional cutoff for participation toggles
    pub phase1_deadline: Option<DateTime<Utc>>,
}

/// List collections query parameters
#[derive(Debug, Deserialize)]
pub struct ListCollectionsQuery {
    pub room_id: String,
}

/// Participation toggle request
#[derive(Debug, Deserialize)]
pub struct SetParticipationRequest {
    pub will_participate: bool,
}

/// Set or clear the phase-1 deadline
#[derive(Debug, Deserialize)]
pub struct SetDeadlineRequest {
    pub phase1_deadline: Option<DateTime<Utc>>,
}

/// Start selection request: the contests whose merged leaderboard is
/// frozen onto the collection
#[derive(Debug, Deserialize)]
pub struct StartSelectionRequest {
    pub contest_ids: Vec<i64>,
    pub weights: Option<HashMap<i64, f64>>,
    pub demerits: Option<HashMap<i64, Vec<DemeritEntry>>>,
}

/// Ranked choice submission
#[derive(Debug, Deserialize, Validate)]
pub struct SubmitChoiceRequest {
    #[validate(length(min = 1, max = MAX_TEAM_TITLE_LENGTH))]
    pub team_title: String,

    /// Desired teammates, most preferred first
    pub ordered_choices: Vec<String>,
}

/// Manual team request submission
#[derive(Debug, Deserialize, Validate)]
pub struct SubmitManualRequest {
    #[validate(length(min = 1, max = MAX_TEAM_TITLE_LENGTH))]
    pub proposed_title: Option<String>,

    /// The exact fixed team, submitter included
    pub desired_members: Vec<String>,

    #[validate(length(min = 1, max = MAX_REQUEST_NOTE_LENGTH))]
    pub note: String,
}

/// List manual requests query parameters
#[derive(Debug, Deserialize)]
pub struct ListRequestsQuery {
    /// pending, approved or rejected
    pub status: Option<String>,
}

/// Team adjustment request (rename and/or coach assignment)
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateTeamRequest {
    #[validate(length(min = 1, max = MAX_TEAM_TITLE_LENGTH))]
    pub team_title: Option<String>,

    pub coach_username: Option<String>,
}

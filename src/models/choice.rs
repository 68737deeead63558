//! Ranked teammate choices and manual team requests

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use sqlx::types::Json;
use uuid::Uuid;

/// A participant's submitted ranked preference. Resubmission overwrites
/// the whole tuple while the collection is open and not finalized.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct TeamChoice {
    pub id: Uuid,
    pub collection_id: Uuid,
    pub username: String,
    pub team_title: String,
    /// Desired teammates, most preferred first
    pub ordered_choices: Json<Vec<String>>,
    pub submitted_at: DateTime<Utc>,
}

/// A fixed-team proposal submitted for admin review, independent of the
/// ranked-preference mechanism. Not validated against the eligibility
/// window.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct ManualTeamRequest {
    pub id: Uuid,
    pub collection_id: Uuid,
    pub username: String,
    pub proposed_title: Option<String>,
    pub desired_members: Json<Vec<String>>,
    pub note: String,
    /// pending, approved or rejected
    pub status: String,
    pub submitted_at: DateTime<Utc>,
}

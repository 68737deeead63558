//! Finalized team model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use sqlx::types::Json;
use uuid::Uuid;

/// A finalized team. Identity is immutable once created; admins may
/// still rename it, reassign the coach or remove members.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct FinalizedTeam {
    pub id: Uuid,
    pub collection_id: Uuid,
    pub team_title: String,
    pub members: Json<Vec<String>>,
    pub coach_username: Option<String>,
    /// Sum of the members' frozen effective scores
    pub combined_score: f64,
    /// Created through the admin manual-approval path; survives
    /// unfinalize
    pub manually_approved: bool,
    pub created_at: DateTime<Utc>,
}

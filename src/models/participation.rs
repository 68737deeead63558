//! Participation opt-in records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A participant's opt-in state for one collection.
/// Written only by the participant's own explicit toggle.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct ParticipationRecord {
    pub id: Uuid,
    pub collection_id: Uuid,
    pub username: String,
    pub will_participate: bool,
    pub updated_at: DateTime<Utc>,
}

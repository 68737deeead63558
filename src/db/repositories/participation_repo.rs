//! Participation record repository

use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::error::AppResult;
use crate::models::ParticipationRecord;

/// Repository for participation opt-in records
pub struct ParticipationRepository;

impl ParticipationRepository {
    /// Create or overwrite a participant's opt-in state.
    ///
    /// Runs on the locked collection's transaction so the deadline check
    /// and the write cannot interleave with a phase transition.
    pub async fn upsert(
        conn: &mut PgConnection,
        collection_id: &Uuid,
        username: &str,
        will_participate: bool,
    ) -> AppResult<ParticipationRecord> {
        let record = sqlx::query_as::<_, ParticipationRecord>(
            r#"
            INSERT INTO participation_records (collection_id, username, will_participate)
            VALUES ($1, $2, $3)
            ON CONFLICT (collection_id, username)
            DO UPDATE SET will_participate = EXCLUDED.will_participate, updated_at = NOW()
            RETURNING *
            "#,
        )
        .bind(collection_id)
        .bind(username)
        .bind(will_participate)
        .fetch_one(conn)
        .await?;

        Ok(record)
    }

    /// Find one participant's opt-in record
    pub async fn find(
        pool: &PgPool,
        collection_id: &Uuid,
        username: &str,
    ) -> AppResult<Option<ParticipationRecord>> {
        let record = sqlx::query_as::<_, ParticipationRecord>(
            r#"
            SELECT * FROM participation_records
            WHERE collection_id = $1 AND username = $2
            "#,
        )
        .bind(collection_id)
        .bind(username)
        .fetch_optional(pool)
        .await?;

        Ok(record)
    }

    /// Check whether a participant has explicitly opted in
    pub async fn is_participating(
        conn: &mut PgConnection,
        collection_id: &Uuid,
        username: &str,
    ) -> AppResult<bool> {
        let participating: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM participation_records
                WHERE collection_id = $1 AND username = $2 AND will_participate = TRUE
            )
            "#,
        )
        .bind(collection_id)
        .bind(username)
        .fetch_one(conn)
        .await?;

        Ok(participating)
    }

    /// Usernames that opted in, for the selection-phase freeze
    pub async fn participating_usernames(
        pool: &PgPool,
        collection_id: &Uuid,
    ) -> AppResult<Vec<String>> {
        let usernames: Vec<String> = sqlx::query_scalar(
            r#"
            SELECT username FROM participation_records
            WHERE collection_id = $1 AND will_participate = TRUE
            ORDER BY username
            "#,
        )
        .bind(collection_id)
        .fetch_all(pool)
        .await?;

        Ok(usernames)
    }
}

//! Team collection repository

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::constants::phases;
use crate::error::AppResult;
use crate::models::TeamCollection;
use crate::models::aggregate::PerformanceSnapshot;

/// Repository for team collection database operations
pub struct CollectionRepository;

impl CollectionRepository {
    /// Create a new collection in the participation phase
    pub async fn create(
        pool: &PgPool,
        room_id: &str,
        title: &str,
        phase1_deadline: Option<DateTime<Utc>>,
    ) -> AppResult<TeamCollection> {
        let collection = sqlx::query_as::<_, TeamCollection>(
            r#"
            INSERT INTO team_collections (room_id, title, phase1_deadline)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(room_id)
        .bind(title)
        .bind(phase1_deadline)
        .fetch_one(pool)
        .await?;

        Ok(collection)
    }

    /// Find collection by ID
    pub async fn find_by_id(pool: &PgPool, id: &Uuid) -> AppResult<Option<TeamCollection>> {
        let collection =
            sqlx::query_as::<_, TeamCollection>(r#"SELECT * FROM team_collections WHERE id = $1"#)
                .bind(id)
                .fetch_optional(pool)
                .await?;

        Ok(collection)
    }

    /// Find collection by ID, taking a row lock for the duration of the
    /// enclosing transaction. Serializes state-changing workflow
    /// operations per collection.
    pub async fn find_by_id_for_update(
        conn: &mut PgConnection,
        id: &Uuid,
    ) -> AppResult<Option<TeamCollection>> {
        let collection = sqlx::query_as::<_, TeamCollection>(
            r#"SELECT * FROM team_collections WHERE id = $1 FOR UPDATE"#,
        )
        .bind(id)
        .fetch_optional(conn)
        .await?;

        Ok(collection)
    }

    /// List collections in a room, newest first
    pub async fn list_by_room(pool: &PgPool, room_id: &str) -> AppResult<Vec<TeamCollection>> {
        let collections = sqlx::query_as::<_, TeamCollection>(
            r#"SELECT * FROM team_collections WHERE room_id = $1 ORDER BY created_at DESC"#,
        )
        .bind(room_id)
        .fetch_all(pool)
        .await?;

        Ok(collections)
    }

    /// Transition to the selection phase, freezing the rank order and
    /// performance snapshot captured at this instant
    pub async fn begin_selection(
        conn: &mut PgConnection,
        id: &Uuid,
        rank_order: &[String],
        performance: &HashMap<String, PerformanceSnapshot>,
    ) -> AppResult<TeamCollection> {
        let collection = sqlx::query_as::<_, TeamCollection>(
            r#"
            UPDATE team_collections
            SET phase = $2, is_open = TRUE, rank_order = $3, performance = $4, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(phases::SELECTION)
        .bind(Json(rank_order))
        .bind(Json(performance))
        .fetch_one(conn)
        .await?;

        Ok(collection)
    }

    /// Toggle whether phase-2 submissions are accepted
    pub async fn set_open(pool: &PgPool, id: &Uuid, is_open: bool) -> AppResult<TeamCollection> {
        let collection = sqlx::query_as::<_, TeamCollection>(
            r#"
            UPDATE team_collections
            SET is_open = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(is_open)
        .fetch_one(pool)
        .await?;

        Ok(collection)
    }

    /// Move between the selection and finalized states
    pub async fn set_finalized(
        conn: &mut PgConnection,
        id: &Uuid,
        finalized: bool,
    ) -> AppResult<TeamCollection> {
        let (phase, is_open) = if finalized {
            (phases::FINALIZED, false)
        } else {
            (phases::SELECTION, true)
        };

        let collection = sqlx::query_as::<_, TeamCollection>(
            r#"
            UPDATE team_collections
            SET finalized = $2, phase = $3, is_open = $4, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(finalized)
        .bind(phase)
        .bind(is_open)
        .fetch_one(conn)
        .await?;

        Ok(collection)
    }

    /// Set or clear the phase-1 participation deadline
    pub async fn set_phase1_deadline(
        pool: &PgPool,
        id: &Uuid,
        deadline: Option<DateTime<Utc>>,
    ) -> AppResult<TeamCollection> {
        let collection = sqlx::query_as::<_, TeamCollection>(
            r#"
            UPDATE team_collections
            SET phase1_deadline = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(deadline)
        .fetch_one(pool)
        .await?;

        Ok(collection)
    }

    /// Delete a collection; owned records cascade
    pub async fn delete(pool: &PgPool, id: &Uuid) -> AppResult<()> {
        sqlx::query(r#"DELETE FROM team_collections WHERE id = $1"#)
            .bind(id)
            .execute(pool)
            .await?;

        Ok(())
    }
}

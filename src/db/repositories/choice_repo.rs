//! Team choice and manual request repository

use sqlx::types::Json;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::error::AppResult;
use crate::models::{ManualTeamRequest, TeamChoice};

/// Repository for ranked choices and manual team requests
pub struct ChoiceRepository;

impl ChoiceRepository {
    /// Create or overwrite a participant's ranked choice.
    ///
    /// Runs on the locked collection's transaction so the whole tuple is
    /// replaced atomically; concurrent submitters serialize on the
    /// collection row and the last write wins.
    pub async fn upsert(
        conn: &mut PgConnection,
        collection_id: &Uuid,
        username: &str,
        team_title: &str,
        ordered_choices: &[String],
    ) -> AppResult<TeamChoice> {
        let choice = sqlx::query_as::<_, TeamChoice>(
            r#"
            INSERT INTO team_choices (collection_id, username, team_title, ordered_choices)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (collection_id, username)
            DO UPDATE SET
                team_title = EXCLUDED.team_title,
                ordered_choices = EXCLUDED.ordered_choices,
                submitted_at = NOW()
            RETURNING *
            "#,
        )
        .bind(collection_id)
        .bind(username)
        .bind(team_title)
        .bind(Json(ordered_choices))
        .fetch_one(conn)
        .await?;

        Ok(choice)
    }

    /// All choices submitted for a collection
    pub async fn list_by_collection(
        conn: &mut PgConnection,
        collection_id: &Uuid,
    ) -> AppResult<Vec<TeamChoice>> {
        let choices = sqlx::query_as::<_, TeamChoice>(
            r#"SELECT * FROM team_choices WHERE collection_id = $1 ORDER BY submitted_at"#,
        )
        .bind(collection_id)
        .fetch_all(conn)
        .await?;

        Ok(choices)
    }

    /// Create a manual team request for admin review
    pub async fn create_request(
        pool: &PgPool,
        collection_id: &Uuid,
        username: &str,
        proposed_title: Option<&str>,
        desired_members: &[String],
        note: &str,
    ) -> AppResult<ManualTeamRequest> {
        let request = sqlx::query_as::<_, ManualTeamRequest>(
            r#"
            INSERT INTO manual_team_requests
                (collection_id, username, proposed_title, desired_members, note)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(collection_id)
        .bind(username)
        .bind(proposed_title)
        .bind(Json(desired_members))
        .bind(note)
        .fetch_one(pool)
        .await?;

        Ok(request)
    }

    /// Find a manual request by ID
    pub async fn find_request(
        pool: &PgPool,
        id: &Uuid,
    ) -> AppResult<Option<ManualTeamRequest>> {
        let request = sqlx::query_as::<_, ManualTeamRequest>(
            r#"SELECT * FROM manual_team_requests WHERE id = $1"#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(request)
    }

    /// List manual requests for a collection, optionally filtered by status
    pub async fn list_requests(
        pool: &PgPool,
        collection_id: &Uuid,
        status: Option<&str>,
    ) -> AppResult<Vec<ManualTeamRequest>> {
        let requests = sqlx::query_as::<_, ManualTeamRequest>(
            r#"
            SELECT * FROM manual_team_requests
            WHERE collection_id = $1 AND ($2::text IS NULL OR status = $2)
            ORDER BY submitted_at
            "#,
        )
        .bind(collection_id)
        .bind(status)
        .fetch_all(pool)
        .await?;

        Ok(requests)
    }

    /// Update a manual request's review status
    pub async fn set_request_status(
        conn: &mut PgConnection,
        id: &Uuid,
        status: &str,
    ) -> AppResult<ManualTeamRequest> {
        let request = sqlx::query_as::<_, ManualTeamRequest>(
            r#"
            UPDATE manual_team_requests
            SET status = $2
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(status)
        .fetch_one(conn)
        .await?;

        Ok(request)
    }
}

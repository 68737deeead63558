//! Finalized team repository

use sqlx::types::Json;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::error::AppResult;
use crate::models::FinalizedTeam;

/// Repository for finalized team database operations
pub struct TeamRepository;

impl TeamRepository {
    /// Insert one finalized team
    pub async fn insert(
        conn: &mut PgConnection,
        collection_id: &Uuid,
        team_title: &str,
        members: &[String],
        combined_score: f64,
        manually_approved: bool,
    ) -> AppResult<FinalizedTeam> {
        let team = sqlx::query_as::<_, FinalizedTeam>(
            r#"
            INSERT INTO finalized_teams
                (collection_id, team_title, members, combined_score, manually_approved)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(collection_id)
        .bind(team_title)
        .bind(Json(members))
        .bind(combined_score)
        .bind(manually_approved)
        .fetch_one(conn)
        .await?;

        Ok(team)
    }

    /// Find team by ID
    pub async fn find_by_id(pool: &PgPool, id: &Uuid) -> AppResult<Option<FinalizedTeam>> {
        let team =
            sqlx::query_as::<_, FinalizedTeam>(r#"SELECT * FROM finalized_teams WHERE id = $1"#)
                .bind(id)
                .fetch_optional(pool)
                .await?;

        Ok(team)
    }

    /// All teams in a collection
    pub async fn list_by_collection(
        pool: &PgPool,
        collection_id: &Uuid,
    ) -> AppResult<Vec<FinalizedTeam>> {
        let teams = sqlx::query_as::<_, FinalizedTeam>(
            r#"SELECT * FROM finalized_teams WHERE collection_id = $1 ORDER BY created_at"#,
        )
        .bind(collection_id)
        .fetch_all(pool)
        .await?;

        Ok(teams)
    }

    /// Rename a team
    pub async fn rename(pool: &PgPool, id: &Uuid, team_title: &str) -> AppResult<FinalizedTeam> {
        let team = sqlx::query_as::<_, FinalizedTeam>(
            r#"
            UPDATE finalized_teams SET team_title = $2 WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(team_title)
        .fetch_one(pool)
        .await?;

        Ok(team)
    }

    /// Assign or clear a team's coach
    pub async fn set_coach(
        pool: &PgPool,
        id: &Uuid,
        coach_username: Option<&str>,
    ) -> AppResult<FinalizedTeam> {
        let team = sqlx::query_as::<_, FinalizedTeam>(
            r#"
            UPDATE finalized_teams SET coach_username = $2 WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(coach_username)
        .fetch_one(pool)
        .await?;

        Ok(team)
    }

    /// Replace a team's member list and its recomputed combined score
    pub async fn set_members(
        pool: &PgPool,
        id: &Uuid,
        members: &[String],
        combined_score: f64,
    ) -> AppResult<FinalizedTeam> {
        let team = sqlx::query_as::<_, FinalizedTeam>(
            r#"
            UPDATE finalized_teams SET members = $2, combined_score = $3 WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(Json(members))
        .bind(combined_score)
        .fetch_one(pool)
        .await?;

        Ok(team)
    }

    /// Delete one team
    pub async fn delete(pool: &PgPool, id: &Uuid) -> AppResult<()> {
        sqlx::query(r#"DELETE FROM finalized_teams WHERE id = $1"#)
            .bind(id)
            .execute(pool)
            .await?;

        Ok(())
    }

    /// Delete the teams created by finalize resolution, preserving
    /// manually-approved ones. Used by unfinalize.
    pub async fn delete_resolved(
        conn: &mut PgConnection,
        collection_id: &Uuid,
    ) -> AppResult<u64> {
        let result = sqlx::query(
            r#"
            DELETE FROM finalized_teams
            WHERE collection_id = $1 AND manually_approved = FALSE
            "#,
        )
        .bind(collection_id)
        .execute(conn)
        .await?;

        Ok(result.rows_affected())
    }
}

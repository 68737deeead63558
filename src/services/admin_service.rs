//! Admin service
//!
//! Manual adjustments layered on top of the formation workflow's data:
//! renames, coach assignment, member removal, deletions and the
//! pause/resume switch for phase-2 submissions.

use sqlx::PgPool;
use uuid::Uuid;

use crate::constants::phases;
use crate::db::repositories::{ChoiceRepository, CollectionRepository, TeamRepository};
use crate::error::{AppError, AppResult};
use crate::models::{FinalizedTeam, ManualTeamRequest, TeamCollection};
use crate::utils::validation;

/// Admin service for manual adjustments
pub struct AdminService;

impl AdminService {
    /// Pause or resume phase-2 choice submissions without changing the
    /// phase itself
    pub async fn set_selection_open(
        pool: &PgPool,
        collection_id: &Uuid,
        is_open: bool,
    ) -> AppResult<TeamCollection> {
        let collection = CollectionRepository::find_by_id(pool, collection_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Collection not found".to_string()))?;
        collection.ensure_phase(phases::SELECTION)?;

        CollectionRepository::set_open(pool, collection_id, is_open).await
    }

    /// Set or clear the phase-1 participation deadline
    pub async fn set_phase1_deadline(
        pool: &PgPool,
        collection_id: &Uuid,
        deadline: Option<chrono::DateTime<chrono::Utc>>,
    ) -> AppResult<TeamCollection> {
        let collection = CollectionRepository::find_by_id(pool, collection_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Collection not found".to_string()))?;
        collection.ensure_phase(phases::PARTICIPATION)?;

        CollectionRepository::set_phase1_deadline(pool, collection_id, deadline).await
    }

    /// Rename a team and/or assign its coach
    pub async fn update_team(
        pool: &PgPool,
        collection_id: &Uuid,
        team_id: &Uuid,
        team_title: Option<&str>,
        coach_username: Option<&str>,
    ) -> AppResult<FinalizedTeam> {
        let mut team = Self::find_team(pool, collection_id, team_id).await?;

        if let Some(title) = team_title {
            let title = validation::validate_title(title).map_err(AppError::Validation)?;
            team = TeamRepository::rename(pool, team_id, &title).await?;
        }
        if let Some(coach) = coach_username {
            validation::validate_username(coach).map_err(|e| AppError::Validation(e.to_string()))?;
            team = TeamRepository::set_coach(pool, team_id, Some(coach)).await?;
        }

        Ok(team)
    }

    /// Remove a member from a team, recomputing the combined score from
    /// the collection's frozen performance snapshot
    pub async fn remove_member(
        pool: &PgPool,
        collection_id: &Uuid,
        team_id: &Uuid,
        username: &str,
    ) -> AppResult<FinalizedTeam> {
        let collection = CollectionRepository::find_by_id(pool, collection_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Collection not found".to_string()))?;
        let team = Self::find_team(pool, collection_id, team_id).await?;

        let mut members = team.members.0.clone();
        let before = members.len();
        members.retain(|m| m != username);
        if members.len() == before {
            return Err(AppError::NotFound(format!(
                "{username} is not a member of this team"
            )));
        }

        let combined_score: f64 = members
            .iter()
            .map(|m| {
                collection
                    .performance
                    .0
                    .get(m)
                    .map(|p| p.effective_solved)
                    .unwrap_or(0.0)
            })
            .sum();
        let updated =
            TeamRepository::set_members(pool, team_id, &members, combined_score).await?;

        tracing::info!(
            team_id = %team_id,
            username,
            "Removed member from finalized team"
        );
        Ok(updated)
    }

    /// Delete one team
    pub async fn delete_team(
        pool: &PgPool,
        collection_id: &Uuid,
        team_id: &Uuid,
    ) -> AppResult<()> {
        Self::find_team(pool, collection_id, team_id).await?;
        TeamRepository::delete(pool, team_id).await
    }

    /// Delete a collection and everything it owns
    pub async fn delete_collection(pool: &PgPool, collection_id: &Uuid) -> AppResult<()> {
        CollectionRepository::find_by_id(pool, collection_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Collection not found".to_string()))?;

        CollectionRepository::delete(pool, collection_id).await?;
        tracing::info!(collection_id = %collection_id, "Deleted collection");
        Ok(())
    }

    /// List manual team requests for admin review
    pub async fn list_manual_requests(
        pool: &PgPool,
        collection_id: &Uuid,
        status: Option<&str>,
    ) -> AppResult<Vec<ManualTeamRequest>> {
        ChoiceRepository::list_requests(pool, collection_id, status).await
    }

    async fn find_team(
        pool: &PgPool,
        collection_id: &Uuid,
        team_id: &Uuid,
    ) -> AppResult<FinalizedTeam> {
        TeamRepository::find_by_id(pool, team_id)
            .await?
            .filter(|t| t.collection_id == *collection_id)
            .ok_or_else(|| AppError::NotFound("Team not found".to_string()))
    }
}

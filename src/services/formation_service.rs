//! Team formation service
//!
//! Owns the three-phase workflow: participation intent, ranked
//! selection, finalization. Every state-changing operation locks the
//! collection row inside a transaction, so validation and persistence
//! cannot interleave with another writer, and either the whole
//! operation lands or none of it does.

use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::constants::{phases, request_statuses};
use crate::db::repositories::{
    ChoiceRepository, CollectionRepository, ParticipationRepository, TeamRepository,
};
use crate::error::{AppError, AppResult};
use crate::models::aggregate::{MergedLeaderboard, PerformanceSnapshot};
use crate::models::{FinalizedTeam, ManualTeamRequest, ParticipationRecord, TeamChoice, TeamCollection};
use crate::ranking::matching::{RankedChoice, resolve_teams};
use crate::ranking::eligible_candidates;
use crate::utils::validation;

/// Team formation service for workflow business logic
pub struct FormationService;

impl FormationService {
    /// Create a collection in the participation phase
    pub async fn create_collection(
        pool: &PgPool,
        room_id: &str,
        title: &str,
        phase1_deadline: Option<chrono::DateTime<Utc>>,
    ) -> AppResult<TeamCollection> {
        let title = validation::validate_title(title).map_err(AppError::Validation)?;
        CollectionRepository::create(pool, room_id, &title, phase1_deadline).await
    }

    /// Get collection by ID
    pub async fn get_collection(pool: &PgPool, id: &Uuid) -> AppResult<TeamCollection> {
        CollectionRepository::find_by_id(pool, id)
            .await?
            .ok_or_else(|| AppError::NotFound("Collection not found".to_string()))
    }

    /// Toggle a participant's opt-in state.
    ///
    /// Rejected once the phase-1 deadline has passed; the deadline never
    /// transitions the phase by itself.
    pub async fn set_participation(
        pool: &PgPool,
        collection_id: &Uuid,
        username: &str,
        will_participate: bool,
    ) -> AppResult<ParticipationRecord> {
        let mut tx = pool.begin().await?;

        let collection = CollectionRepository::find_by_id_for_update(&mut *tx, collection_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Collection not found".to_string()))?;
        collection.ensure_participation_open(Utc::now())?;

        let record =
            ParticipationRepository::upsert(&mut *tx, collection_id, username, will_participate)
                .await?;

        tx.commit().await?;
        Ok(record)
    }

    /// Start the selection phase, freezing the rank order and
    /// per-participant performance captured from the leaderboard at this
    /// instant. Eligibility stays deterministic for the rest of phase 2.
    pub async fn start_selection(
        pool: &PgPool,
        collection_id: &Uuid,
        leaderboard: &MergedLeaderboard,
    ) -> AppResult<TeamCollection> {
        let rank_order: Vec<String> = leaderboard
            .users
            .iter()
            .map(|u| u.username.clone())
            .collect();
        let performance: std::collections::HashMap<String, PerformanceSnapshot> = leaderboard
            .users
            .iter()
            .map(|u| (u.username.clone(), PerformanceSnapshot::from(u)))
            .collect();

        let mut tx = pool.begin().await?;

        let collection = CollectionRepository::find_by_id_for_update(&mut *tx, collection_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Collection not found".to_string()))?;
        collection.ensure_phase(phases::PARTICIPATION)?;

        let updated =
            CollectionRepository::begin_selection(&mut *tx, collection_id, &rank_order, &performance)
                .await?;

        tx.commit().await?;
        Ok(updated)
    }

    /// Eligible teammate candidates for one participant, computed from
    /// the frozen rank order
    pub async fn eligibility_for(
        pool: &PgPool,
        collection_id: &Uuid,
        username: &str,
    ) -> AppResult<(TeamCollection, Vec<String>)> {
        let collection = Self::get_collection(pool, collection_id).await?;
        collection.ensure_phase(phases::SELECTION)?;

        let my_idx = collection.rank_index(username).ok_or_else(|| {
            AppError::NotEligible(
                "You are not in this collection's ranking snapshot".to_string(),
            )
        })?;

        let candidates =
            eligible_candidates(&collection.rank_order.0, &collection.performance.0, my_idx);
        Ok((collection, candidates))
    }

    /// Submit or overwrite a ranked teammate choice.
    ///
    /// Validation happens before any write; a stale phase, a
    /// non-participant or an out-of-window candidate all leave the
    /// stored choice untouched.
    pub async fn submit_choice(
        pool: &PgPool,
        collection_id: &Uuid,
        username: &str,
        team_title: &str,
        ordered_choices: &[String],
    ) -> AppResult<TeamChoice> {
        let team_title = validation::validate_title(team_title).map_err(AppError::Validation)?;
        validation::validate_choice_list(ordered_choices, username)
            .map_err(AppError::Validation)?;

        let mut tx = pool.begin().await?;

        let collection = CollectionRepository::find_by_id_for_update(&mut *tx, collection_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Collection not found".to_string()))?;
        collection.ensure_submittable()?;

        if !ParticipationRepository::is_participating(&mut *tx, collection_id, username).await? {
            return Err(AppError::NotEligible(
                "Ranked selection requires opting in during the participation phase".to_string(),
            ));
        }
        let my_idx = collection.rank_index(username).ok_or_else(|| {
            AppError::NotEligible(
                "You are not in this collection's ranking snapshot".to_string(),
            )
        })?;

        let eligible =
            eligible_candidates(&collection.rank_order.0, &collection.performance.0, my_idx);
        for candidate in ordered_choices {
            if !eligible.contains(candidate) {
                return Err(AppError::Validation(format!(
                    "{candidate} is not an eligible teammate"
                )));
            }
        }

        let choice = ChoiceRepository::upsert(
            &mut *tx,
            collection_id,
            username,
            &team_title,
            ordered_choices,
        )
        .await?;

        tx.commit().await?;
        Ok(choice)
    }

    /// Submit a fixed-team proposal for admin review.
    ///
    /// Not validated against the eligibility window; this is the path
    /// for participants outside the ranking snapshot.
    pub async fn submit_manual_request(
        pool: &PgPool,
        collection_id: &Uuid,
        username: &str,
        proposed_title: Option<&str>,
        desired_members: &[String],
        note: &str,
    ) -> AppResult<ManualTeamRequest> {
        validation::validate_manual_members(desired_members).map_err(AppError::Validation)?;
        let proposed_title = proposed_title
            .map(validation::validate_title)
            .transpose()
            .map_err(AppError::Validation)?;

        let collection = Self::get_collection(pool, collection_id).await?;
        if collection.finalized {
            return Err(AppError::PhaseMismatch(
                "Teams have already been finalized".to_string(),
            ));
        }

        ChoiceRepository::create_request(
            pool,
            collection_id,
            username,
            proposed_title.as_deref(),
            desired_members,
            note,
        )
        .await
    }

    /// Resolve the submitted choices into finalized teams.
    ///
    /// Holds the collection lock for the whole resolution, so no choice
    /// submission can land mid-finalize. Returns the created teams and
    /// the submitters whose choices could not be granted.
    pub async fn finalize(
        pool: &PgPool,
        collection_id: &Uuid,
    ) -> AppResult<(Vec<FinalizedTeam>, Vec<String>)> {
        let mut tx = pool.begin().await?;

        let collection = CollectionRepository::find_by_id_for_update(&mut *tx, collection_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Collection not found".to_string()))?;
        collection.ensure_phase(phases::SELECTION)?;

        let stored = ChoiceRepository::list_by_collection(&mut *tx, collection_id).await?;
        let choices: Vec<RankedChoice> = stored
            .iter()
            .map(|c| RankedChoice {
                username: c.username.clone(),
                team_title: c.team_title.clone(),
                ordered_choices: c.ordered_choices.0.clone(),
            })
            .collect();

        let resolved = resolve_teams(
            &collection.rank_order.0,
            &collection.performance.0,
            &choices,
        );

        let mut teams = Vec::with_capacity(resolved.len());
        for team in &resolved {
            teams.push(
                TeamRepository::insert(
                    &mut *tx,
                    collection_id,
                    &team.team_title,
                    &team.members,
                    team.combined_score,
                    false,
                )
                .await?,
            );
        }
        CollectionRepository::set_finalized(&mut *tx, collection_id, true).await?;

        tx.commit().await?;

        let matched: std::collections::HashSet<&str> = resolved
            .iter()
            .flat_map(|t| t.members.iter().map(String::as_str))
            .collect();
        let unmatched = stored
            .into_iter()
            .map(|c| c.username)
            .filter(|u| !matched.contains(u.as_str()))
            .collect();

        Ok((teams, unmatched))
    }

    /// Reopen selection, removing the teams created by finalize but
    /// preserving manually-approved ones
    pub async fn unfinalize(pool: &PgPool, collection_id: &Uuid) -> AppResult<TeamCollection> {
        let mut tx = pool.begin().await?;

        let collection = CollectionRepository::find_by_id_for_update(&mut *tx, collection_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Collection not found".to_string()))?;
        collection.ensure_phase(phases::FINALIZED)?;

        let removed = TeamRepository::delete_resolved(&mut *tx, collection_id).await?;
        let updated = CollectionRepository::set_finalized(&mut *tx, collection_id, false).await?;

        tx.commit().await?;
        tracing::info!(collection_id = %collection_id, removed, "Reopened selection");
        Ok(updated)
    }

    /// Approve a pending manual team request, creating the team directly
    /// and bypassing ranked resolution
    pub async fn approve_manual(
        pool: &PgPool,
        collection_id: &Uuid,
        request_id: &Uuid,
    ) -> AppResult<FinalizedTeam> {
        let mut tx = pool.begin().await?;

        let collection = CollectionRepository::find_by_id_for_update(&mut *tx, collection_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Collection not found".to_string()))?;
        if collection.phase == phases::PARTICIPATION {
            return Err(AppError::PhaseMismatch(
                "Manual approval requires the selection phase".to_string(),
            ));
        }

        let request = ChoiceRepository::find_request(pool, request_id)
            .await?
            .filter(|r| r.collection_id == *collection_id)
            .ok_or_else(|| AppError::NotFound("Manual team request not found".to_string()))?;
        if request.status != request_statuses::PENDING {
            return Err(AppError::Validation(format!(
                "Request has already been {}",
                request.status
            )));
        }

        let team_title = request
            .proposed_title
            .clone()
            .unwrap_or_else(|| format!("Team {}", request.username));
        let combined_score = request
            .desired_members
            .0
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

        let team = TeamRepository::insert(
            &mut *tx,
            collection_id,
            &team_title,
            &request.desired_members.0,
            combined_score,
            true,
        )
        .await?;
        ChoiceRepository::set_request_status(&mut *tx, request_id, request_statuses::APPROVED)
            .await?;

        tx.commit().await?;
        Ok(team)
    }

    /// Reject a pending manual team request
    pub async fn reject_manual(
        pool: &PgPool,
        collection_id: &Uuid,
        request_id: &Uuid,
    ) -> AppResult<ManualTeamRequest> {
        let mut tx = pool.begin().await?;

        let request = ChoiceRepository::find_request(pool, request_id)
            .await?
            .filter(|r| r.collection_id == *collection_id)
            .ok_or_else(|| AppError::NotFound("Manual team request not found".to_string()))?;
        if request.status != request_statuses::PENDING {
            return Err(AppError::Validation(format!(
                "Request has already been {}",
                request.status
            )));
        }

        let updated =
            ChoiceRepository::set_request_status(&mut *tx, request_id, request_statuses::REJECTED)
                .await?;

        tx.commit().await?;
        Ok(updated)
    }
}
//! Collection handler implementations

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    db::repositories::{CollectionRepository, ParticipationRepository},
    error::{AppError, AppResult},
    middleware::auth::AuthenticatedUser,
    models::{ManualTeamRequest, ParticipationRecord, TeamChoice},
    services::{AdminService, FormationService, LeaderboardService},
    state::AppState,
};

use super::{
    request::{
        CreateCollectionRequest, ListCollectionsQuery, ListRequestsQuery, SetDeadlineRequest,
        SetParticipationRequest, StartSelectionRequest, SubmitChoiceRequest, SubmitManualRequest,
        UpdateTeamRequest,
    },
    response::{
        CollectionResponse, CollectionsListResponse, EligibilityResponse, EligibleCandidate,
        FinalizeResponse, RequestsListResponse, StartSelectionResponse, TeamsListResponse,
    },
};

/// Create a new collection
pub async fn create_collection(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Json(payload): Json<CreateCollectionRequest>,
) -> AppResult<(StatusCode, Json<CollectionResponse>)> {
    auth_user.require_admin()?;
    payload.validate()?;

    let collection = FormationService::create_collection(
        state.db(),
        &payload.room_id,
        &payload.title,
        payload.phase1_deadline,
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(CollectionResponse::from_collection(collection, 0)),
    ))
}

/// List collections in a room
pub async fn list_collections(
    State(state): State<AppState>,
    _auth_user: AuthenticatedUser,
    Query(query): Query<ListCollectionsQuery>,
) -> AppResult<Json<CollectionsListResponse>> {
    let collections = CollectionRepository::list_by_room(state.db(), &query.room_id).await?;

    let mut responses = Vec::with_capacity(collections.len());
    for collection in collections {
        let count =
            ParticipationRepository::participating_usernames(state.db(), &collection.id)
                .await?
                .len();
        responses.push(CollectionResponse::from_collection(collection, count));
    }

    Ok(Json(CollectionsListResponse {
        collections: responses,
    }))
}

/// Get a specific collection
pub async fn get_collection(
    State(state): State<AppState>,
    _auth_user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<CollectionResponse>> {
    let collection = FormationService::get_collection(state.db(), &id).await?;
    let count = ParticipationRepository::participating_usernames(state.db(), &id)
        .await?
        .len();

    Ok(Json(CollectionResponse::from_collection(collection, count)))
}

/// Delete a collection and everything it owns
pub async fn delete_collection(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    auth_user.require_admin()?;
    AdminService::delete_collection(state.db(), &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Toggle the caller's participation intent
pub async fn set_participation(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<SetParticipationRequest>,
) -> AppResult<Json<ParticipationRecord>> {
    let record = FormationService::set_participation(
        state.db(),
        &id,
        &auth_user.username,
        payload.will_participate,
    )
    .await?;

    Ok(Json(record))
}

/// Set or clear the phase-1 deadline
pub async fn set_deadline(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<SetDeadlineRequest>,
) -> AppResult<Json<CollectionResponse>> {
    auth_user.require_admin()?;

    let collection =
        AdminService::set_phase1_deadline(state.db(), &id, payload.phase1_deadline).await?;
    let count = ParticipationRepository::participating_usernames(state.db(), &id)
        .await?
        .len();

    Ok(Json(CollectionResponse::from_collection(collection, count)))
}

/// Start the selection phase, freezing the leaderboard captured from
/// the requested contests
pub async fn start_selection(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<StartSelectionRequest>,
) -> AppResult<Json<StartSelectionResponse>> {
    auth_user.require_admin()?;
    if payload.contest_ids.is_empty() {
        return Err(AppError::Validation(
            "At least one contest id is required".to_string(),
        ));
    }

    let report = LeaderboardService::merge_and_cache(
        state.fetcher(),
        state.redis(),
        &payload.contest_ids,
        payload.weights.as_ref(),
        payload.demerits.as_ref(),
    )
    .await?;

    let collection =
        FormationService::start_selection(state.db(), &id, &report.leaderboard).await?;
    let count = ParticipationRepository::participating_usernames(state.db(), &id)
        .await?
        .len();

    Ok(Json(StartSelectionResponse {
        collection: CollectionResponse::from_collection(collection, count),
        report_id: report.report_id,
        skipped_contests: report.skipped_contests,
    }))
}

/// Resume phase-2 choice submissions
pub async fn open_selection(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<CollectionResponse>> {
    auth_user.require_admin()?;
    set_selection_open(&state, &id, true).await
}

/// Pause phase-2 choice submissions without leaving the phase
pub async fn close_selection(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<CollectionResponse>> {
    auth_user.require_admin()?;
    set_selection_open(&state, &id, false).await
}

async fn set_selection_open(
    state: &AppState,
    id: &Uuid,
    is_open: bool,
) -> AppResult<Json<CollectionResponse>> {
    let collection = AdminService::set_selection_open(state.db(), id, is_open).await?;
    let count = ParticipationRepository::participating_usernames(state.db(), id)
        .await?
        .len();

    Ok(Json(CollectionResponse::from_collection(collection, count)))
}

/// Resolve choices into finalized teams
pub async fn finalize(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<FinalizeResponse>> {
    auth_user.require_admin()?;

    let (teams, unmatched) = FormationService::finalize(state.db(), &id).await?;
    Ok(Json(FinalizeResponse { teams, unmatched }))
}

/// Reopen selection, discarding resolution-created teams
pub async fn unfinalize(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<CollectionResponse>> {
    auth_user.require_admin()?;

    let collection = FormationService::unfinalize(state.db(), &id).await?;
    let count = ParticipationRepository::participating_usernames(state.db(), &id)
        .await?
        .len();

    Ok(Json(CollectionResponse::from_collection(collection, count)))
}

/// The caller's eligibility window
pub async fn get_eligibility(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<EligibilityResponse>> {
    let (collection, candidates) =
        FormationService::eligibility_for(state.db(), &id, &auth_user.username).await?;

    let effective_of = |username: &str| {
        collection
            .performance
            .0
            .get(username)
            .map(|p| p.effective_solved)
            .unwrap_or(0.0)
    };
    let rank_index = collection.rank_index(&auth_user.username).unwrap_or(0);

    let candidates = candidates
        .into_iter()
        .map(|username| {
            let rank_index = collection.rank_index(&username).unwrap_or(0);
            let effective_solved = effective_of(&username);
            EligibleCandidate {
                username,
                rank_index,
                effective_solved,
            }
        })
        .collect();

    Ok(Json(EligibilityResponse {
        effective_solved: effective_of(&auth_user.username),
        username: auth_user.username,
        rank_index,
        candidates,
    }))
}

/// Submit or overwrite the caller's ranked choice
pub async fn submit_choice(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<SubmitChoiceRequest>,
) -> AppResult<Json<TeamChoice>> {
    payload.validate()?;

    let choice = FormationService::submit_choice(
        state.db(),
        &id,
        &auth_user.username,
        &payload.team_title,
        &payload.ordered_choices,
    )
    .await?;

    Ok(Json(choice))
}

/// Submit a fixed-team proposal for admin review
pub async fn submit_manual_request(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<SubmitManualRequest>,
) -> AppResult<(StatusCode, Json<ManualTeamRequest>)> {
    payload.validate()?;

    let request = FormationService::submit_manual_request(
        state.db(),
        &id,
        &auth_user.username,
        payload.proposed_title.as_deref(),
        &payload.desired_members,
        &payload.note,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(request)))
}

/// List manual team requests
pub async fn list_manual_requests(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Query(query): Query<ListRequestsQuery>,
) -> AppResult<Json<RequestsListResponse>> {
    auth_user.require_admin()?;

    let requests =
        AdminService::list_manual_requests(state.db(), &id, query.status.as_deref()).await?;
    Ok(Json(RequestsListResponse { requests }))
}

/// Approve a manual team request, creating the team directly
pub async fn approve_manual_request(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path((id, request_id)): Path<(Uuid, Uuid)>,
) -> AppResult<(StatusCode, Json<crate::models::FinalizedTeam>)> {
    auth_user.require_admin()?;

    let team = FormationService::approve_manual(state.db(), &id, &request_id).await?;
    Ok((StatusCode::CREATED, Json(team)))
}

/// Reject a manual team request
pub async fn reject_manual_request(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path((id, request_id)): Path<(Uuid, Uuid)>,
) -> AppResult<Json<ManualTeamRequest>> {
    auth_user.require_admin()?;

    let request = FormationService::reject_manual(state.db(), &id, &request_id).await?;
    Ok(Json(request))
}

/// List a collection's finalized teams
pub async fn list_teams(
    State(state): State<AppState>,
    _auth_user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<TeamsListResponse>> {
    FormationService::get_collection(state.db(), &id).await?;
    let teams = crate::db::repositories::TeamRepository::list_by_collection(state.db(), &id).await?;

    Ok(Json(TeamsListResponse { teams }))
}

/// Rename a team and/or assign its coach
pub async fn update_team(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path((id, team_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<UpdateTeamRequest>,
) -> AppResult<Json<crate::models::FinalizedTeam>> {
    auth_user.require_admin()?;
    payload.validate()?;

    let team = AdminService::update_team(
        state.db(),
        &id,
        &team_id,
        payload.team_title.as_deref(),
        payload.coach_username.as_deref(),
    )
    .await?;

    Ok(Json(team))
}

/// Remove a member from a team
pub async fn remove_member(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path((id, team_id, username)): Path<(Uuid, Uuid, String)>,
) -> AppResult<Json<crate::models::FinalizedTeam>> {
    auth_user.require_admin()?;

    let team = AdminService::remove_member(state.db(), &id, &team_id, &username).await?;
    Ok(Json(team))
}

/// Delete a team
pub async fn delete_team(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path((id, team_id)): Path<(Uuid, Uuid)>,
) -> AppResult<StatusCode> {
    auth_user.require_admin()?;

    AdminService::delete_team(state.db(), &id, &team_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

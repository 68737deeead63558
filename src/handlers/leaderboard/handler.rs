//! Leaderboard handler implementations

use axum::{
    Json,
    extract::{Path, State},
};

use crate::{
    constants::MAX_MERGE_CONTESTS,
    error::{AppError, AppResult},
    services::LeaderboardService,
    state::AppState,
};

use super::{request::MergeRequest, response::MergeReportResponse};

/// Merge the requested contests into a leaderboard and cache the report
pub async fn merge_leaderboard(
    State(state): State<AppState>,
    Json(payload): Json<MergeRequest>,
) -> AppResult<Json<MergeReportResponse>> {
    if payload.contest_ids.is_empty() {
        return Err(AppError::Validation(
            "At least one contest id is required".to_string(),
        ));
    }
    if payload.contest_ids.len() > MAX_MERGE_CONTESTS {
        return Err(AppError::Validation(format!(
            "At most {MAX_MERGE_CONTESTS} contests can be merged at once"
        )));
    }

    let report = LeaderboardService::merge_and_cache(
        state.fetcher(),
        state.redis(),
        &payload.contest_ids,
        payload.weights.as_ref(),
        payload.demerits.as_ref(),
    )
    .await?;

    Ok(Json(report))
}

/// Read a cached leaderboard report by its shareable id
pub async fn get_report(
    State(state): State<AppState>,
    Path(report_id): Path<String>,
) -> AppResult<Json<MergeReportResponse>> {
    let report = LeaderboardService::load_report(state.redis(), &report_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Report not found or expired".to_string()))?;

    Ok(Json(report))
}

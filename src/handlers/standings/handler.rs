//! Standings handler implementations

use axum::{
    Json,
    extract::{Path, State},
};

use crate::{
    error::{AppError, AppResult},
    models::standing::ContestStandings,
    services::StandingsService,
    state::AppState,
};

use super::request::NormalizeRequest;

/// Normalize a raw snapshot supplied in the request body
pub async fn normalize_snapshot(
    State(_state): State<AppState>,
    Json(payload): Json<NormalizeRequest>,
) -> AppResult<Json<ContestStandings>> {
    if let Some(weights) = &payload.weights
        && weights.iter().any(|w| !w.is_finite() || *w < 0.0)
    {
        return Err(AppError::Validation(
            "Problem weights must be finite and non-negative".to_string(),
        ));
    }

    let standings = StandingsService::normalize_raw(payload.snapshot, payload.weights.as_deref())?;
    Ok(Json(standings))
}

/// Fetch one contest from the judge platform and return its standings
pub async fn get_contest_standings(
    State(state): State<AppState>,
    Path(contest_id): Path<i64>,
) -> AppResult<Json<ContestStandings>> {
    let standings = StandingsService::normalize_contest(state.fetcher(), contest_id, None).await?;
    Ok(Json(standings))
}

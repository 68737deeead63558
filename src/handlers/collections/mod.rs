//! Team formation collection handlers

mod handler;
pub mod request;
pub mod response;

pub use handler::*;
pub use request::*;
pub use response::*;

use axum::{
    Router,
    routing::{delete, get, patch, post},
};

use crate::state::AppState;

/// Collection routes
pub fn routes() -> Router<AppState> {
    Router::new()
        // Collection lifecycle
        .route("/", post(handler::create_collection))
        .route("/", get(handler::list_collections))
        .route("/{id}", get(handler::get_collection))
        .route("/{id}", delete(handler::delete_collection))
        // Phase 1: participation intent
        .route("/{id}/participation", post(handler::set_participation))
        .route("/{id}/deadline", patch(handler::set_deadline))
        // Phase transitions and the phase-2 pause switch
        .route("/{id}/start-selection", post(handler::start_selection))
        .route("/{id}/open", post(handler::open_selection))
        .route("/{id}/close", post(handler::close_selection))
        .route("/{id}/finalize", post(handler::finalize))
        .route("/{id}/unfinalize", post(handler::unfinalize))
        // Phase 2: ranked selection
        .route("/{id}/eligibility", get(handler::get_eligibility))
        .route("/{id}/choices", post(handler::submit_choice))
        // Manual team requests
        .route("/{id}/manual-requests", post(handler::submit_manual_request))
        .route("/{id}/manual-requests", get(handler::list_manual_requests))
        .route(
            "/{id}/manual-requests/{request_id}/approve",
            post(handler::approve_manual_request),
        )
        .route(
            "/{id}/manual-requests/{request_id}/reject",
            post(handler::reject_manual_request),
        )
        // Finalized teams
        .route("/{id}/teams", get(handler::list_teams))
        .route("/{id}/teams/{team_id}", patch(handler::update_team))
        .route("/{id}/teams/{team_id}", delete(handler::delete_team))
        .route(
            "/{id}/teams/{team_id}/members/{username}",
            delete(handler::remove_member),
        )
}

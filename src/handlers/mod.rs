//! HTTP Request Handlers
//!
//! This module contains all HTTP request handlers organized by domain.

pub mod collections;
pub mod health;
pub mod leaderboard;
pub mod standings;

use axum::{Router, middleware};

use crate::{
    middleware::{
        auth::auth_middleware, logging::logging_middleware, rate_limit::rate_limit_middleware,
    },
    state::AppState,
};

/// Create all API routes.
///
/// Standings and leaderboard reads are public; the team formation
/// workflow requires an authenticated caller. Everything is rate
/// limited.
pub fn routes(state: AppState) -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .nest("/standings", standings::routes())
        .nest("/leaderboard", leaderboard::routes())
        .nest(
            "/collections",
            collections::routes()
                .route_layer(middleware::from_fn_with_state(state.clone(), auth_middleware)),
        )
        .layer(middleware::from_fn_with_state(state, rate_limit_middleware))
        .layer(middleware::from_fn(logging_middleware))
}

//! Per-contest standings handlers

mod handler;
pub mod request;

pub use handler::*;
pub use request::*;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Standings routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/normalize", post(handler::normalize_snapshot))
        .route("/{contest_id}", get(handler::get_contest_standings))
}

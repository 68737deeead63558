//! Cross-contest leaderboard handlers

mod handler;
pub mod request;
pub mod response;

pub use handler::*;
pub use request::*;
pub use response::*;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Leaderboard routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/merge", post(handler::merge_leaderboard))
        .route("/reports/{report_id}", get(handler::get_report))
}

//! Rankhub - Contest Standings Aggregation and Team Formation
//!
//! This library provides the core functionality for the Rankhub platform,
//! which aggregates contest results from an external judge platform into
//! cross-contest leaderboards and runs a multi-phase team formation
//! workflow on top of them.
//!
//! # Features
//!
//! - Per-contest standings normalization (solved counts, penalties,
//!   weighted scores)
//! - Cross-contest leaderboard merging with consistency-adjusted ranking
//! - Three-phase team formation (participation intent, ranked selection,
//!   finalization) with admin overrides
//! - Shareable cached leaderboard reports
//!
//! # Architecture
//!
//! The application follows a layered architecture:
//! - **Handlers**: HTTP request handlers (thin layer)
//! - **Services**: Business logic
//! - **Ranking**: Pure scoring and matching functions
//! - **Repositories**: Database access
//! - **Models**: Domain models and DTOs

pub mod config;
pub mod constants;
pub mod db;
pub mod error;
pub mod fetch;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod ranking;
pub mod services;
pub mod state;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, AppResult};
pub use state::AppState;

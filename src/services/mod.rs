//! Business logic services

pub mod admin_service;
pub mod formation_service;
pub mod leaderboard_service;
pub mod standings_service;

pub use admin_service::AdminService;
pub use formation_service::FormationService;
pub use leaderboard_service::LeaderboardService;
pub use standings_service::StandingsService;

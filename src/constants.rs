//! Application-wide constants
//!
//! This module contains all constant values used throughout the application.
//! Constants are grouped by their purpose for better organization.

// =============================================================================
// SERVER DEFAULTS
// =============================================================================

/// Default server host address
pub const DEFAULT_SERVER_HOST: &str = "0.0.0.0";

/// Default server port
pub const DEFAULT_SERVER_PORT: u16 = 8080;

// =============================================================================
// DATABASE DEFAULTS
// =============================================================================

/// Default maximum database connections in the pool
pub const DEFAULT_DATABASE_MAX_CONNECTIONS: u32 = 20;

// =============================================================================
// AUTHENTICATION DEFAULTS
// =============================================================================

/// Default JWT token expiry in hours (tokens are issued by the external
/// auth service; this only bounds clock-skew tolerance on verification)
pub const DEFAULT_JWT_EXPIRY_HOURS: i64 = 24;

/// Username minimum length
pub const MIN_USERNAME_LENGTH: usize = 3;

/// Username maximum length
pub const MAX_USERNAME_LENGTH: usize = 64;

// =============================================================================
// SCORING
// =============================================================================

/// Penalty minutes added per wrong attempt before the first accepted
/// submission on a solved problem
pub const WRONG_ATTEMPT_PENALTY_MINUTES: f64 = 20.0;

/// Default per-problem weight when no weight vector is supplied
pub const DEFAULT_PROBLEM_WEIGHT: f64 = 1.0;

/// Default per-contest weight when no weight map is supplied
pub const DEFAULT_CONTEST_WEIGHT: f64 = 1.0;

/// Penalty multiplier applied to demerit points for contests a
/// participant did not attend
pub const ABSENTEE_DEMERIT_PENALTY_FACTOR: f64 = 100.0;

// =============================================================================
// TEAM FORMATION
// =============================================================================

/// Workflow phases for a team collection
pub mod phases {
    pub const PARTICIPATION: i16 = 1;
    pub const SELECTION: i16 = 2;
    pub const FINALIZED: i16 = 3;
}

/// Manual team request statuses
pub mod request_statuses {
    pub const PENDING: &str = "pending";
    pub const APPROVED: &str = "approved";
    pub const REJECTED: &str = "rejected";
}

/// Half-width of the effective-score band used for teammate eligibility
pub const ELIGIBILITY_SCORE_WINDOW: f64 = 5.0;

/// Minimum number of eligible candidates; the window is topped up with
/// the next-closest-ranked participants until this many are present
pub const MIN_ELIGIBLE_CANDIDATES: usize = 5;

/// Server-enforced minimum number of ranked choices per submission
pub const MIN_TEAM_CHOICES: usize = 2;

/// Server-enforced maximum number of ranked choices per submission
pub const MAX_TEAM_CHOICES: usize = 10;

/// Looser bounds shown by clients; the server bounds above are the ones
/// actually enforced on submit
pub const UI_DISPLAY_MIN_CHOICES: usize = 1;
pub const UI_DISPLAY_MAX_CHOICES: usize = 15;

/// Exact member count required for a manual (fixed) team request
pub const MANUAL_TEAM_SIZE: usize = 3;

/// Target team size produced by the finalize resolution
pub const RESOLVED_TEAM_SIZE: usize = 3;

// =============================================================================
// USER ROLES
// =============================================================================

/// User role identifiers (assigned by the external auth service)
pub mod roles {
    pub const ADMIN: &str = "admin";
    pub const MEMBER: &str = "member";

    /// All user roles
    pub const ALL: &[&str] = &[ADMIN, MEMBER];
}

// =============================================================================
// SUBMISSION VERDICTS
// =============================================================================

/// Verdict strings as reported by the judge platform
pub mod verdicts {
    pub const ACCEPTED: &str = "accepted";
    pub const ACCEPTED_SHORT: &str = "AC";
}

// =============================================================================
// API VERSIONING
// =============================================================================

/// Current API version
pub const API_VERSION: &str = "v1";

/// API base path
pub const API_BASE_PATH: &str = "/api/v1";

// =============================================================================
// RATE LIMITING
// =============================================================================

/// Rate limiting configuration
pub mod rate_limits {
    /// Leaderboard merge endpoint - max requests (merges fan out to the
    /// judge platform, so they are limited more aggressively)
    pub const MERGE_MAX_REQUESTS: i64 = 10;
    /// Leaderboard merge endpoint - window in seconds
    pub const MERGE_WINDOW_SECS: i64 = 60;

    /// General API - max requests
    pub const GENERAL_MAX_REQUESTS: i64 = 100;
    /// General API - window in seconds
    pub const GENERAL_WINDOW_SECS: i64 = 60;
}

// =============================================================================
// REPORT CACHE
// =============================================================================

/// TTL for cached merged-leaderboard reports, in seconds
pub const REPORT_CACHE_TTL_SECS: i64 = 60 * 60 * 24 * 7;

/// Redis key prefix for cached reports
pub const REPORT_CACHE_PREFIX: &str = "leaderboard_report";

// =============================================================================
// VALIDATION
// =============================================================================

/// Maximum collection title length
pub const MAX_COLLECTION_TITLE_LENGTH: u64 = 256;

/// Maximum team title length
pub const MAX_TEAM_TITLE_LENGTH: u64 = 256;

/// Maximum manual-request note length
pub const MAX_REQUEST_NOTE_LENGTH: u64 = 4096;

/// Maximum number of contests accepted in a single merge request
pub const MAX_MERGE_CONTESTS: usize = 64;

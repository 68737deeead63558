//! Standings service
//!
//! Thin composition of the fetch collaborator and the snapshot
//! normalizer: one contest in, ranked standings out.

use crate::error::AppResult;
use crate::fetch::SnapshotFetcher;
use crate::models::snapshot::ContestSnapshot;
use crate::models::standing::ContestStandings;
use crate::ranking::normalize_snapshot;

/// Standings service for per-contest normalization
pub struct StandingsService;

impl StandingsService {
    /// Normalize an untrusted raw snapshot supplied by the caller
    pub fn normalize_raw(
        raw: serde_json::Value,
        weights: Option<&[f64]>,
    ) -> AppResult<ContestStandings> {
        let snapshot = ContestSnapshot::from_raw(raw)?;
        Ok(normalize_snapshot(&snapshot, weights))
    }

    /// Fetch one contest from the judge platform and normalize it
    pub async fn normalize_contest(
        fetcher: &dyn SnapshotFetcher,
        contest_id: i64,
        weights: Option<&[f64]>,
    ) -> AppResult<ContestStandings> {
        let snapshot = fetcher.fetch_snapshot(contest_id).await?;
        Ok(normalize_snapshot(&snapshot, weights))
    }
}

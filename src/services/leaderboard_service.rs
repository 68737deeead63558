//! Leaderboard service
//!
//! Fans out to the judge platform for the requested contests, merges
//! the normalized results into one ranked leaderboard, and caches the
//! output under a shareable report id. A single failed fetch degrades
//! gracefully: that contest is skipped and the rest still merge.

use std::collections::HashMap;

use redis::AsyncCommands;
use redis::aio::ConnectionManager;
use sha2::{Digest, Sha256};
use tracing::{info, warn};

use crate::constants::{REPORT_CACHE_PREFIX, REPORT_CACHE_TTL_SECS};
use crate::error::{AppError, AppResult};
use crate::fetch::SnapshotFetcher;
use crate::handlers::leaderboard::response::{MergeReportResponse, SkippedContest};
use crate::models::standing::ContestStandings;
use crate::ranking::merge_leaderboard;
use crate::ranking::merger::DemeritEntry;

/// Leaderboard service for cross-contest merging
pub struct LeaderboardService;

impl LeaderboardService {
    /// Fetch and normalize the requested contests concurrently.
    ///
    /// The fetches are independent reads, so they run in parallel; a
    /// failed contest is reported in the skip list instead of aborting
    /// the whole merge.
    pub async fn collect_standings(
        fetcher: &dyn SnapshotFetcher,
        contest_ids: &[i64],
    ) -> (Vec<ContestStandings>, Vec<SkippedContest>) {
        let fetches = contest_ids.iter().map(|id| fetcher.fetch_snapshot(*id));
        let outcomes = futures::future::join_all(fetches).await;

        let mut standings = Vec::with_capacity(contest_ids.len());
        let mut skipped = Vec::new();

        for (contest_id, outcome) in contest_ids.iter().zip(outcomes) {
            match outcome {
                Ok(snapshot) => {
                    standings.push(crate::ranking::normalize_snapshot(&snapshot, None));
                }
                Err(err) => {
                    warn!(contest_id, error = %err, "Skipping contest in merge");
                    skipped.push(SkippedContest {
                        contest_id: *contest_id,
                        reason: err.to_string(),
                    });
                }
            }
        }

        (standings, skipped)
    }

    /// Merge the requested contests and cache the result as a shareable
    /// report
    pub async fn merge_and_cache(
        fetcher: &dyn SnapshotFetcher,
        mut redis: ConnectionManager,
        contest_ids: &[i64],
        weights_by_contest: Option<&HashMap<i64, f64>>,
        demerits_by_contest: Option<&HashMap<i64, Vec<DemeritEntry>>>,
    ) -> AppResult<MergeReportResponse> {
        let (standings, skipped_contests) = Self::collect_standings(fetcher, contest_ids).await;
        let leaderboard = merge_leaderboard(&standings, weights_by_contest, demerits_by_contest);

        let report_id = Self::report_id(contest_ids, weights_by_contest);
        let response = MergeReportResponse {
            report_id: report_id.clone(),
            leaderboard,
            skipped_contests,
        };

        let payload = serde_json::to_string(&response)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("serialize report: {e}")))?;
        let key = format!("{REPORT_CACHE_PREFIX}:{report_id}");
        let _: () = redis.set_ex(&key, payload, REPORT_CACHE_TTL_SECS as u64).await?;

        info!(
            report_id = %report_id,
            merged = response.leaderboard.contest_ids.len(),
            skipped = response.skipped_contests.len(),
            "Cached merged leaderboard report"
        );

        Ok(response)
    }

    /// Load a cached report by its shareable id
    pub async fn load_report(
        mut redis: ConnectionManager,
        report_id: &str,
    ) -> AppResult<Option<MergeReportResponse>> {
        let key = format!("{REPORT_CACHE_PREFIX}:{report_id}");
        let cached: Option<String> = redis.get(&key).await?;

        match cached {
            Some(payload) => {
                let report = serde_json::from_str(&payload)
                    .map_err(|e| AppError::Internal(anyhow::anyhow!("corrupt cached report: {e}")))?;
                Ok(Some(report))
            }
            None => Ok(None),
        }
    }

    /// Opaque report id, stable for identical merge requests.
    ///
    /// Derived from the sorted contest id list and the weight map so
    /// re-running the same merge overwrites the same cache entry.
    pub fn report_id(
        contest_ids: &[i64],
        weights_by_contest: Option<&HashMap<i64, f64>>,
    ) -> String {
        let mut ids: Vec<i64> = contest_ids.to_vec();
        ids.sort_unstable();

        let mut hasher = Sha256::new();
        for id in &ids {
            hasher.update(id.to_be_bytes());
            let weight = weights_by_contest
                .and_then(|w| w.get(id).copied())
                .unwrap_or(crate::constants::DEFAULT_CONTEST_WEIGHT);
            hasher.update(weight.to_be_bytes());
        }

        hex::encode(&hasher.finalize()[..16])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::MockSnapshotFetcher;
    use crate::models::snapshot::{ContestSnapshot, ParticipantInfo, RawSubmission};

    fn snapshot(id: i64, username: &str) -> ContestSnapshot {
        let mut participants = HashMap::new();
        participants.insert(
            "1".to_string(),
            ParticipantInfo {
                username: username.to_string(),
                display_name: username.to_uppercase(),
                avatar_url: String::new(),
            },
        );
        ContestSnapshot {
            id,
            title: format!("Contest {id}"),
            begin: 0,
            length: 3_600_000,
            participants,
            submissions: vec![RawSubmission {
                team_id: 1,
                problem_index: 0,
                verdict: "AC".to_string(),
                elapsed_seconds: 60,
                cumulative_score: 0.0,
            }],
        }
    }

    #[tokio::test]
    async fn test_collect_standings_preserves_request_order() {
        let mut fetcher = MockSnapshotFetcher::new();
        fetcher
            .expect_fetch_snapshot()
            .returning(|id| Ok(snapshot(id, "alice")));

        let (standings, skipped) =
            LeaderboardService::collect_standings(&fetcher, &[3, 1, 2]).await;

        assert!(skipped.is_empty());
        let ids: Vec<i64> = standings.iter().map(|s| s.contest_info.id).collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }

    #[tokio::test]
    async fn test_failed_fetch_skips_contest_but_merge_continues() {
        let mut fetcher = MockSnapshotFetcher::new();
        fetcher.expect_fetch_snapshot().returning(|id| {
            if id == 2 {
                Err(AppError::UpstreamUnavailable {
                    contest_id: id,
                    message: "session expired".to_string(),
                })
            } else {
                Ok(snapshot(id, "alice"))
            }
        });

        let (standings, skipped) =
            LeaderboardService::collect_standings(&fetcher, &[1, 2, 3]).await;

        assert_eq!(standings.len(), 2);
        assert_eq!(skipped.len(), 1);
        assert_eq!(skipped[0].contest_id, 2);
        assert!(skipped[0].reason.contains("session expired"));
    }

    #[tokio::test]
    async fn test_all_fetches_failing_yields_empty_board() {
        let mut fetcher = MockSnapshotFetcher::new();
        fetcher.expect_fetch_snapshot().returning(|id| {
            Err(AppError::UpstreamUnavailable {
                contest_id: id,
                message: "down".to_string(),
            })
        });

        let (standings, skipped) =
            LeaderboardService::collect_standings(&fetcher, &[1, 2]).await;

        assert!(standings.is_empty());
        assert_eq!(skipped.len(), 2);
    }

    #[test]
    fn test_report_id_is_order_insensitive() {
        let a = LeaderboardService::report_id(&[1, 2, 3], None);
        let b = LeaderboardService::report_id(&[3, 1, 2], None);
        assert_eq!(a, b);
    }

    #[test]
    fn test_report_id_depends_on_weights() {
        let mut weights = HashMap::new();
        weights.insert(1, 2.0);

        let unweighted = LeaderboardService::report_id(&[1, 2], None);
        let weighted = LeaderboardService::report_id(&[1, 2], Some(&weights));
        assert_ne!(unweighted, weighted);
    }
}

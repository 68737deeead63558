//! Judge platform snapshot fetching
//!
//! The core never talks to the judge platform directly; it consumes
//! snapshots through the [`SnapshotFetcher`] trait. The HTTP
//! implementation lives here, including translation of the upstream
//! error envelope into typed failures.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::config::JudgeConfig;
use crate::error::{AppError, AppResult};
use crate::models::snapshot::ContestSnapshot;

/// Source of raw contest snapshots
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SnapshotFetcher: Send + Sync {
    /// Fetch the raw snapshot for one contest.
    ///
    /// Fails with `UpstreamUnavailable` when the platform cannot be
    /// reached or reports an error, and with `InvalidSnapshot` when the
    /// payload does not match the expected shape.
    async fn fetch_snapshot(&self, contest_id: i64) -> AppResult<ContestSnapshot>;
}

/// Error envelope the judge proxy returns instead of a snapshot
#[derive(Debug, Deserialize)]
struct UpstreamErrorEnvelope {
    status: String,
    message: Option<String>,
    #[allow(dead_code)]
    code: Option<i64>,
}

/// HTTP implementation backed by the judge platform's snapshot proxy
pub struct HttpSnapshotFetcher {
    client: reqwest::Client,
    base_url: String,
}

impl HttpSnapshotFetcher {
    /// Build a fetcher from the judge configuration
    pub fn new(config: &JudgeConfig) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AppError::Configuration(format!("HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl SnapshotFetcher for HttpSnapshotFetcher {
    async fn fetch_snapshot(&self, contest_id: i64) -> AppResult<ContestSnapshot> {
        let url = format!("{}/contests/{}/snapshot", self.base_url, contest_id);
        debug!(contest_id, url = %url, "Fetching contest snapshot");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| AppError::UpstreamUnavailable {
                contest_id,
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::UpstreamUnavailable {
                contest_id,
                message: format!("HTTP {status}"),
            });
        }

        let body: serde_json::Value =
            response
                .json()
                .await
                .map_err(|e| AppError::UpstreamUnavailable {
                    contest_id,
                    message: e.to_string(),
                })?;

        // The proxy reports auth/session failures as a JSON envelope
        // with a 200 status rather than throwing
        if let Ok(envelope) = serde_json::from_value::<UpstreamErrorEnvelope>(body.clone())
            && envelope.status == "error"
        {
            return Err(AppError::UpstreamUnavailable {
                contest_id,
                message: envelope
                    .message
                    .unwrap_or_else(|| "upstream reported an error".to_string()),
            });
        }

        ContestSnapshot::from_raw(body)
    }
}

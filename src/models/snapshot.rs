//! Raw contest snapshot as served by the judge platform
//!
//! The upstream shape is duck-typed JSON; everything entering the core
//! passes through [`ContestSnapshot::from_raw`], which converts it into
//! the strongly-typed model or fails with `InvalidSnapshot`. Internal
//! invariants never have to deal with untrusted shapes.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::constants::verdicts;
use crate::error::{AppError, AppResult};

/// One contest's raw state: metadata, roster and submission log.
/// Immutable once fetched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContestSnapshot {
    pub id: i64,
    pub title: String,
    /// Contest start, epoch milliseconds
    pub begin: i64,
    /// Contest duration, milliseconds
    pub length: i64,
    /// Roster: team id -> identity triple
    pub participants: HashMap<String, ParticipantInfo>,
    /// Ordered submission log
    #[serde(default)]
    pub submissions: Vec<RawSubmission>,
}

/// Roster entry, serialized upstream as `[username, displayName, avatarUrl]`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct ParticipantInfo {
    pub username: String,
    pub display_name: String,
    pub avatar_url: String,
}

impl TryFrom<Vec<String>> for ParticipantInfo {
    type Error = String;

    fn try_from(fields: Vec<String>) -> Result<Self, Self::Error> {
        let mut fields = fields.into_iter();
        let username = fields
            .next()
            .ok_or_else(|| "participant entry is missing the username field".to_string())?;
        Ok(Self {
            username,
            display_name: fields.next().unwrap_or_default(),
            avatar_url: fields.next().unwrap_or_default(),
        })
    }
}

impl From<ParticipantInfo> for Vec<String> {
    fn from(info: ParticipantInfo) -> Self {
        vec![info.username, info.display_name, info.avatar_url]
    }
}

/// One submission log entry, serialized upstream as
/// `[teamId, problemIndex, verdict, elapsedSeconds, cumulativeScore, ...]`
/// (trailing elements are ignored).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "Vec<serde_json::Value>", into = "Vec<serde_json::Value>")]
pub struct RawSubmission {
    pub team_id: i64,
    pub problem_index: usize,
    pub verdict: String,
    pub elapsed_seconds: i64,
    pub cumulative_score: f64,
}

impl RawSubmission {
    /// Whether the judge accepted this submission
    pub fn is_accepted(&self) -> bool {
        self.verdict == verdicts::ACCEPTED_SHORT
            || self.verdict.eq_ignore_ascii_case(verdicts::ACCEPTED)
    }
}

impl TryFrom<Vec<serde_json::Value>> for RawSubmission {
    type Error = String;

    fn try_from(fields: Vec<serde_json::Value>) -> Result<Self, Self::Error> {
        fn as_i64(v: Option<&serde_json::Value>, name: &str) -> Result<i64, String> {
            v.and_then(serde_json::Value::as_i64)
                .ok_or_else(|| format!("submission entry has a non-integer {name} field"))
        }

        let team_id = as_i64(fields.first(), "teamId")?;
        let problem_index = as_i64(fields.get(1), "problemIndex")?;
        if problem_index < 0 {
            return Err("submission entry has a negative problemIndex".to_string());
        }
        let verdict = fields
            .get(2)
            .and_then(serde_json::Value::as_str)
            .ok_or_else(|| "submission entry has a non-string verdict field".to_string())?
            .to_string();
        let elapsed_seconds = as_i64(fields.get(3), "elapsedSeconds")?;
        let cumulative_score = fields
            .get(4)
            .and_then(serde_json::Value::as_f64)
            .unwrap_or(0.0);

        Ok(Self {
            team_id,
            problem_index: problem_index as usize,
            verdict,
            elapsed_seconds,
            cumulative_score,
        })
    }
}

impl From<RawSubmission> for Vec<serde_json::Value> {
    fn from(sub: RawSubmission) -> Self {
        vec![
            sub.team_id.into(),
            sub.problem_index.into(),
            sub.verdict.into(),
            sub.elapsed_seconds.into(),
            sub.cumulative_score.into(),
        ]
    }
}

impl ContestSnapshot {
    /// Validate an untrusted JSON value into a typed snapshot.
    ///
    /// This is the only entry point for upstream contest data.
    pub fn from_raw(raw: serde_json::Value) -> AppResult<Self> {
        if !raw.is_object() {
            return Err(AppError::InvalidSnapshot(
                "snapshot must be a JSON object".to_string(),
            ));
        }
        serde_json::from_value(raw).map_err(|e| AppError::InvalidSnapshot(e.to_string()))
    }

    /// Contest duration in whole seconds
    pub fn duration_seconds(&self) -> i64 {
        self.length / 1000
    }
}

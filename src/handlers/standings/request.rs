//! Standings request DTOs

use serde::Deserialize;

/// Normalize a caller-supplied raw snapshot
#[derive(Debug, Deserialize)]
pub struct NormalizeRequest {
    /// Raw contest snapshot as served by the judge platform
    pub snapshot: serde_json::Value,

    /// Per-problem score weights; defaults to 1 per problem
    pub weights: Option<Vec<f64>>,
}

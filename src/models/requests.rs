use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request to find places sharing the source place's vibe
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct FindVibesRequest {
    #[validate(length(min = 1, max = 200))]
    #[serde(alias = "sourcePlace")]
    pub source_place: String,
    #[validate(length(min = 1, max = 200))]
    #[serde(alias = "targetScope")]
    pub target_scope: String,
    /// Number of results; capped by `ranking.max_top_k`
    #[validate(range(min = 1, max = 10))]
    #[serde(default)]
    pub k: Option<u8>,
    /// Attach the calibration trace to the response
    #[serde(default)]
    pub debug: bool,
}

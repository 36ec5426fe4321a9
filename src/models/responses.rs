use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use crate::models::domain::PlaceProfile;

/// Response for the find vibes endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VibeResponse {
    pub request_id: String,
    /// True when the oracle failed and the fixed fallback results are returned
    pub degraded: bool,
    pub profile: PlaceProfile,
    pub results: Vec<MatchEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debug: Option<DebugTrace>,
}

/// One ranked place
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchEntry {
    #[serde(rename = "match")]
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub locale: String,
    pub why: String,
    pub tags: Vec<String>,
    pub similarity: f64,
}

/// Calibration data: the schema as applied plus the full ranking
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebugTrace {
    pub facets: Vec<String>,
    pub weights: Map<String, Value>,
    pub source_vector: Map<String, Value>,
    pub ranked: Vec<RankedTraceEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedTraceEntry {
    #[serde(rename = "match")]
    pub name: String,
    pub similarity: f64,
    pub vector: Map<String, Value>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

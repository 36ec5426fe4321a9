use crate::core::normalize::FacetVector;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Free-text profile of the source place, as echoed back to the caller
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlaceProfile {
    pub label: String,
    pub description: String,
    pub features: Vec<String>,
    pub tags: Vec<String>,
}

impl PlaceProfile {
    /// Read a profile out of untrusted oracle JSON. Missing or mistyped
    /// fields become empty strings / empty lists.
    pub fn from_value(value: &Value) -> Self {
        Self {
            label: text_field(value, &["label", "name", "place"]),
            description: text_field(value, &["description", "summary"]),
            features: text_list(value, &["features"]),
            tags: text_list(value, &["tags"]),
        }
    }
}

/// One oracle-proposed place, before normalization
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawCandidate {
    pub name: String,
    pub locale: String,
    pub rationale: String,
    pub tags: Vec<String>,
    /// Raw facet mapping; `Value::Null` when the oracle sent none
    pub vector: Value,
}

impl RawCandidate {
    /// Returns `None` for entries without a usable name
    pub fn from_value(value: &Value) -> Option<Self> {
        let name = text_field(value, &["name", "match"]);
        if name.is_empty() {
            return None;
        }

        let mut locale = text_field(value, &["locale"]);
        if locale.is_empty() {
            locale = [text_field(value, &["city"]), text_field(value, &["country"])]
                .into_iter()
                .filter(|part| !part.is_empty())
                .collect::<Vec<_>>()
                .join(", ");
        }

        Some(Self {
            name,
            locale,
            rationale: text_field(value, &["why", "rationale"]),
            tags: text_list(value, &["tags"]),
            vector: first_present(value, &["vector", "facets"])
                .cloned()
                .unwrap_or(Value::Null),
        })
    }
}

const CANDIDATE_KEYS: &[&str] = &["candidates", "matches"];
const SOURCE_VECTOR_KEYS: &[&str] = &["source_vector", "source", "source_facets"];

/// Everything the oracle produced for one request, still untrusted
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OraclePayload {
    pub profile: Value,
    pub source_vector: Value,
    pub candidates: Vec<RawCandidate>,
}

impl OraclePayload {
    /// Pick the known sections out of a parsed oracle reply.
    ///
    /// Unnamed candidates are dropped, everything else is kept raw for the
    /// normalizer and assembler to sanitize.
    pub fn from_value(value: &Value) -> Self {
        let candidates = first_present(value, CANDIDATE_KEYS)
            .and_then(Value::as_array)
            .map(|entries| entries.iter().filter_map(RawCandidate::from_value).collect())
            .unwrap_or_default();

        Self {
            profile: value.get("profile").cloned().unwrap_or(Value::Null),
            source_vector: first_present(value, SOURCE_VECTOR_KEYS)
                .cloned()
                .unwrap_or(Value::Null),
            candidates,
        }
    }

    /// Whether a parsed reply carries a candidate list or a source vector.
    ///
    /// An object with neither is not an answer to the oracle prompt.
    pub fn has_known_sections(value: &Value) -> bool {
        first_present(value, CANDIDATE_KEYS).is_some()
            || first_present(value, SOURCE_VECTOR_KEYS).is_some()
    }
}

/// A candidate place with its normalized facet vector
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub name: String,
    pub locale: String,
    pub rationale: String,
    pub tags: Vec<String>,
    pub vector: FacetVector,
}

/// A candidate plus its similarity to the source place
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredCandidate {
    pub candidate: Candidate,
    pub similarity: f64,
}

fn first_present<'a>(value: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| value.get(*key))
        .find(|found| !found.is_null())
}

/// First string found under any of `keys`, trimmed; empty otherwise
pub(crate) fn text_field(value: &Value, keys: &[&str]) -> String {
    keys.iter()
        .filter_map(|key| value.get(*key).and_then(Value::as_str))
        .map(str::trim)
        .find(|text| !text.is_empty())
        .unwrap_or_default()
        .to_string()
}

/// String list under any of `keys`. A bare string counts as a single item,
/// non-string items are dropped.
pub(crate) fn text_list(value: &Value, keys: &[&str]) -> Vec<String> {
    match first_present(value, keys) {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(str::to_string)
            .collect(),
        Some(Value::String(item)) if !item.trim().is_empty() => vec![item.trim().to_string()],
        _ => Vec::new(),
    }
}

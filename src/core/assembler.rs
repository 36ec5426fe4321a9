use crate::core::normalize::{normalize, FacetVector};
use crate::core::ranker::Ranker;
use crate::core::scoring::top_contributions;
use crate::models::{
    Candidate, DebugTrace, MatchEntry, OraclePayload, PlaceProfile, RankedTraceEntry,
    ScoredCandidate, VibeResponse,
};
use serde_json::Value;

/// Shown when the oracle could not produce anything usable
pub const FALLBACK_MATCH: &str = "No exact twin found (ish)";
pub const FALLBACK_WHY: &str = "Try a broader scope or tweak the place name.";
pub const FALLBACK_TAGS: [&str; 3] = ["try broader", "refine", "ish"];

pub const DEFAULT_MAX_TAGS: usize = 3;

/// Turns an oracle payload into the response contract.
///
/// Sanitizes every vector, hands them to the ranker, and shapes the result.
/// No scoring happens here.
#[derive(Debug, Clone)]
pub struct Assembler {
    ranker: Ranker,
    max_tags: usize,
}

impl Assembler {
    pub fn new(ranker: Ranker, max_tags: usize) -> Self {
        Self { ranker, max_tags }
    }

    pub fn ranker(&self) -> &Ranker {
        &self.ranker
    }

    /// Build the response for a successfully parsed oracle reply
    pub fn assemble(
        &self,
        payload: &OraclePayload,
        k: usize,
        debug: bool,
        request_id: String,
    ) -> VibeResponse {
        let schema = self.ranker.schema();
        let profile = PlaceProfile::from_value(&payload.profile);
        let source = normalize(schema, &payload.source_vector);

        let candidates: Vec<Candidate> = payload
            .candidates
            .iter()
            .map(|raw| Candidate {
                name: raw.name.clone(),
                locale: raw.locale.clone(),
                rationale: raw.rationale.clone(),
                tags: raw.tags.clone(),
                vector: normalize(schema, &raw.vector),
            })
            .collect();

        let ranked = self.ranker.rank_all(&source, candidates);

        tracing::debug!(
            "Ranked {} candidates for {:?}, best similarity {:?}",
            ranked.len(),
            profile.label,
            ranked.first().map(|s| s.similarity)
        );

        let results = ranked
            .iter()
            .take(k)
            .map(|scored| self.entry(&source, scored))
            .collect();

        let debug = debug.then(|| self.debug_trace(&source, &ranked));

        VibeResponse {
            request_id,
            degraded: false,
            profile,
            results,
            debug,
        }
    }

    /// The fixed degraded response used when the oracle failed
    pub fn fallback(&self, request_id: String) -> VibeResponse {
        VibeResponse {
            request_id,
            degraded: true,
            profile: PlaceProfile::default(),
            results: vec![MatchEntry {
                name: FALLBACK_MATCH.to_string(),
                locale: String::new(),
                why: FALLBACK_WHY.to_string(),
                tags: FALLBACK_TAGS.iter().map(|tag| tag.to_string()).collect(),
                similarity: 0.0,
            }],
            debug: None,
        }
    }

    fn entry(&self, source: &FacetVector, scored: &ScoredCandidate) -> MatchEntry {
        let candidate = &scored.candidate;
        let shared: Vec<&str> =
            top_contributions(self.ranker.schema(), source, &candidate.vector, self.max_tags)
                .into_iter()
                .map(|facet| facet.label.as_str())
                .collect();

        let tags = if candidate.tags.is_empty() {
            shared.iter().map(|label| label.to_string()).collect()
        } else {
            candidate.tags.iter().take(self.max_tags).cloned().collect()
        };

        let why = if !candidate.rationale.is_empty() {
            candidate.rationale.clone()
        } else if shared.is_empty() {
            format!("{:.0}% vibe match.", scored.similarity * 100.0)
        } else {
            format!(
                "{:.0}% vibe match, strongest on {}.",
                scored.similarity * 100.0,
                shared.join(", ")
            )
        };

        MatchEntry {
            name: candidate.name.clone(),
            locale: candidate.locale.clone(),
            why,
            tags,
            similarity: scored.similarity,
        }
    }

    fn debug_trace(&self, source: &FacetVector, ranked: &[ScoredCandidate]) -> DebugTrace {
        let schema = self.ranker.schema();

        DebugTrace {
            facets: schema.names().map(str::to_string).collect(),
            weights: schema
                .facets()
                .iter()
                .map(|facet| (facet.name.clone(), Value::from(facet.weight)))
                .collect(),
            source_vector: source.to_map(schema),
            ranked: ranked
                .iter()
                .map(|scored| RankedTraceEntry {
                    name: scored.candidate.name.clone(),
                    similarity: scored.similarity,
                    vector: scored.candidate.vector.to_map(schema),
                })
                .collect(),
        }
    }
}

impl Default for Assembler {
    fn default() -> Self {
        Self::new(Ranker::default(), DEFAULT_MAX_TAGS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload() -> OraclePayload {
        OraclePayload::from_value(&json!({
            "profile": { "label": "Silver Lake", "description": "Indie LA hillside", "tags": "indie" },
            "source_vector": { "artsy_creative": 0.9, "nightlife": 0.8, "green_space": 0.3 },
            "candidates": [
                { "name": "Opposite", "vector": { "artsy_creative": 0.0, "nightlife": 0.0, "green_space": 1.0 } },
                { "name": "Twin", "why": "Murals and natural wine.", "tags": ["arts", "wine", "vintage", "extra"],
                  "vector": { "artsy_creative": 0.9, "nightlife": 0.8, "green_space": 0.3 } },
                { "name": "Unknown" },
            ],
        }))
    }

    #[test]
    fn test_assemble_ranks_and_truncates() {
        let response = Assembler::default().assemble(&payload(), 2, false, "req".to_string());

        assert!(!response.degraded);
        assert_eq!(response.profile.label, "Silver Lake");
        assert_eq!(response.profile.tags, vec!["indie"]);
        assert!(response.profile.features.is_empty());
        assert_eq!(response.results.len(), 2);
        assert_eq!(response.results[0].name, "Twin");
        assert!((response.results[0].similarity - 1.0).abs() < 1e-9);
        assert_eq!(response.results[0].tags, vec!["arts", "wine", "vintage"]);
        assert_eq!(response.results[0].why, "Murals and natural wine.");
        assert!(response.debug.is_none());
    }

    #[test]
    fn test_missing_rationale_and_tags_are_derived() {
        let response = Assembler::default().assemble(&payload(), 3, false, "req".to_string());
        let unknown = response
            .results
            .iter()
            .find(|entry| entry.name == "Unknown")
            .unwrap();

        assert!(unknown.why.contains("% vibe match"));
        assert_eq!(unknown.tags.len(), DEFAULT_MAX_TAGS);
        // the heaviest facet where both sides are strong comes first
        assert_eq!(unknown.tags[0], "artsy");
    }

    #[test]
    fn test_debug_trace_lists_everything() {
        let response = Assembler::default().assemble(&payload(), 1, true, "req".to_string());
        let trace = response.debug.unwrap();

        assert_eq!(response.results.len(), 1);
        assert_eq!(trace.ranked.len(), 3);
        assert_eq!(trace.facets.len(), 10);
        assert_eq!(trace.weights.get("artsy_creative"), Some(&json!(1.0)));
        assert_eq!(trace.source_vector.get("wealth_level"), Some(&json!(0.5)));
        assert!(trace.ranked.windows(2).all(|w| w[0].similarity >= w[1].similarity));
    }

    #[test]
    fn test_empty_payload_yields_empty_results() {
        let response =
            Assembler::default().assemble(&OraclePayload::default(), 3, false, "req".to_string());
        assert!(response.results.is_empty());
        assert_eq!(response.profile, PlaceProfile::default());
    }

    #[test]
    fn test_fallback_response() {
        let response = Assembler::default().fallback("req".to_string());
        assert!(response.degraded);
        assert_eq!(response.results.len(), 1);
        assert_eq!(response.results[0].name, FALLBACK_MATCH);
        assert_eq!(response.results[0].tags, vec!["try broader", "refine", "ish"]);
    }
}

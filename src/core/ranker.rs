use crate::core::normalize::FacetVector;
use crate::core::schema::FacetSchema;
use crate::core::scoring::weighted_cosine;
use crate::models::{Candidate, ScoredCandidate};
use std::sync::Arc;

/// Number of results returned when the caller does not ask for more
pub const DEFAULT_TOP_K: usize = 3;

/// Scores candidates against a source vector and keeps the best ones
///
/// # Pipeline Stages
/// 1. Weighted cosine similarity per candidate
/// 2. Stable descending sort (ties keep input order)
/// 3. Truncation to `k`
#[derive(Debug, Clone)]
pub struct Ranker {
    schema: Arc<FacetSchema>,
}

impl Ranker {
    pub fn new(schema: Arc<FacetSchema>) -> Self {
        Self { schema }
    }

    pub fn with_default_schema() -> Self {
        Self::new(Arc::new(FacetSchema::default()))
    }

    pub fn schema(&self) -> &FacetSchema {
        &self.schema
    }

    /// Similarity of two vectors under this ranker's schema
    pub fn score(&self, a: &FacetVector, b: &FacetVector) -> f64 {
        weighted_cosine(&self.schema, a, b)
    }

    /// Every candidate, scored and ordered best first
    pub fn rank_all(&self, source: &FacetVector, candidates: Vec<Candidate>) -> Vec<ScoredCandidate> {
        let scored = candidates
            .into_iter()
            .map(|candidate| {
                let similarity = self.score(source, &candidate.vector);
                ScoredCandidate {
                    candidate,
                    similarity,
                }
            })
            .collect();

        select_top_k(scored, usize::MAX)
    }

    /// The `k` best candidates. Short lists are returned whole, never padded.
    pub fn rank(
        &self,
        source: &FacetVector,
        candidates: Vec<Candidate>,
        k: usize,
    ) -> Vec<ScoredCandidate> {
        let mut ranked = self.rank_all(source, candidates);
        ranked.truncate(k);
        ranked
    }
}

impl Default for Ranker {
    fn default() -> Self {
        Self::with_default_schema()
    }
}

/// Order already-scored candidates by descending similarity and keep `k`.
///
/// `sort_by` is stable, so equal similarities stay in input order.
pub fn select_top_k(mut scored: Vec<ScoredCandidate>, k: usize) -> Vec<ScoredCandidate> {
    scored.sort_by(|a, b| b.similarity.total_cmp(&a.similarity));
    scored.truncate(k);
    scored
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(schema: &FacetSchema, name: &str, value: f64) -> Candidate {
        let mut values = vec![0.5; schema.len()];
        values[0] = value;
        Candidate {
            name: name.to_string(),
            locale: String::new(),
            rationale: String::new(),
            tags: vec![],
            vector: FacetVector::from_values(schema, values).unwrap(),
        }
    }

    fn scored(schema: &FacetSchema, name: &str, similarity: f64) -> ScoredCandidate {
        ScoredCandidate {
            candidate: candidate(schema, name, 0.5),
            similarity,
        }
    }

    #[test]
    fn test_select_top_k_is_stable() {
        let schema = FacetSchema::default();
        let input = vec![
            scored(&schema, "a", 0.9),
            scored(&schema, "b", 0.7),
            scored(&schema, "c", 0.7),
            scored(&schema, "d", 0.3),
        ];

        let top = select_top_k(input, 3);
        let names: Vec<&str> = top.iter().map(|s| s.candidate.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_ties_keep_input_order_after_lower_entry() {
        let schema = FacetSchema::default();
        let input = vec![
            scored(&schema, "low", 0.1),
            scored(&schema, "first", 0.8),
            scored(&schema, "second", 0.8),
        ];

        let names: Vec<String> = select_top_k(input, 10)
            .into_iter()
            .map(|s| s.candidate.name)
            .collect();
        assert_eq!(names, vec!["first", "second", "low"]);
    }

    #[test]
    fn test_rank_orders_by_similarity() {
        let ranker = Ranker::default();
        let schema = ranker.schema().clone();
        let source = FacetVector::neutral(&schema);

        let candidates = vec![
            candidate(&schema, "far", 0.0),
            candidate(&schema, "same", 0.5),
            candidate(&schema, "near", 0.6),
        ];

        let ranked = ranker.rank(&source, candidates, DEFAULT_TOP_K);
        let names: Vec<&str> = ranked.iter().map(|s| s.candidate.name.as_str()).collect();
        assert_eq!(names, vec!["same", "near", "far"]);
        assert!((ranked[0].similarity - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_rank_does_not_pad() {
        let ranker = Ranker::default();
        let schema = ranker.schema().clone();
        let source = FacetVector::neutral(&schema);

        let ranked = ranker.rank(
            &source,
            vec![candidate(&schema, "1", 0.2), candidate(&schema, "2", 0.4)],
            3,
        );
        assert_eq!(ranked.len(), 2);
    }

    #[test]
    fn test_rank_empty() {
        let ranker = Ranker::default();
        let source = FacetVector::neutral(ranker.schema());
        assert!(ranker.rank(&source, vec![], 3).is_empty());
    }

    #[test]
    fn test_identical_candidates_keep_order() {
        let ranker = Ranker::default();
        let schema = ranker.schema().clone();
        let source = FacetVector::neutral(&schema);

        let candidates = (0..5)
            .map(|i| candidate(&schema, &i.to_string(), 0.7))
            .collect();

        let names: Vec<String> = ranker
            .rank(&source, candidates, 3)
            .into_iter()
            .map(|s| s.candidate.name)
            .collect();
        assert_eq!(names, vec!["0", "1", "2"]);
    }
}

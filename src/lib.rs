//! Vibe Match - facet-weighted place similarity service
//!
//! This library provides the ranking engine behind "places like this one":
//! an oracle describes a source place and proposes candidates as facet
//! vectors, and the engine normalizes, scores and ranks them by weighted
//! cosine similarity.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{normalize, weighted_cosine, Assembler, FacetSchema, FacetVector, Ranker, SchemaError};
pub use crate::models::{Candidate, ScoredCandidate, OraclePayload, FindVibesRequest, VibeResponse};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        let schema = FacetSchema::default();
        let neutral = FacetVector::neutral(&schema);
        assert!((weighted_cosine(&schema, &neutral, &neutral) - 1.0).abs() < 1e-12);
    }
}

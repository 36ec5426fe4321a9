// Core ranking engine exports
pub mod assembler;
pub mod normalize;
pub mod ranker;
pub mod schema;
pub mod scoring;

pub use assembler::{Assembler, FALLBACK_MATCH, FALLBACK_TAGS, FALLBACK_WHY};
pub use normalize::{normalize, normalize_with, FacetVector, NEUTRAL_FACET_VALUE};
pub use ranker::{select_top_k, Ranker, DEFAULT_TOP_K};
pub use schema::{default_facets, Facet, FacetSchema, FacetTier, SchemaError};
pub use scoring::{top_contributions, weighted_cosine};

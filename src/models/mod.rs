// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{PlaceProfile, RawCandidate, OraclePayload, Candidate, ScoredCandidate};
pub use requests::FindVibesRequest;
pub use responses::{VibeResponse, MatchEntry, DebugTrace, RankedTraceEntry, HealthResponse, ErrorResponse};

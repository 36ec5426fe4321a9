use actix_web::{web, HttpResponse, Responder};
use validator::Validate;
use crate::config::RankingSettings;
use crate::core::Assembler;
use crate::models::{ErrorResponse, FindVibesRequest, HealthResponse};
use crate::services::{OracleClient, OracleOutcome};
use std::sync::Arc;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub oracle: Arc<OracleClient>,
    pub assembler: Arc<Assembler>,
    pub ranking: RankingSettings,
}

/// Configure all vibe-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/vibes/find", web::post().to(find_vibes))
        .route("/like", web::post().to(find_vibes));
}

/// Health check endpoint
async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

fn bad_request(message: String) -> HttpResponse {
    HttpResponse::BadRequest().json(ErrorResponse {
        error: "Validation failed".to_string(),
        message,
        status_code: 400,
    })
}

/// Find vibe matches endpoint
///
/// POST /api/v1/vibes/find
///
/// Request body:
/// ```json
/// {
///   "source_place": "Silver Lake, Los Angeles",
///   "target_scope": "Berlin",
///   "k": 3,
///   "debug": false
/// }
/// ```
///
/// Oracle failures never surface as errors: the response carries the fixed
/// fallback result with `degraded: true`.
async fn find_vibes(
    state: web::Data<AppState>,
    req: web::Json<FindVibesRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for find_vibes request: {:?}", errors);
        return bad_request(errors.to_string());
    }

    let source_place = req.source_place.trim();
    let target_scope = req.target_scope.trim();
    if source_place.is_empty() || target_scope.is_empty() {
        return bad_request("source_place and target_scope must not be blank".to_string());
    }

    let k = state.ranking.effective_k(req.k);
    let request_id = uuid::Uuid::new_v4().to_string();

    tracing::info!(
        "Finding vibes like {:?} in {:?} (k: {}, debug: {}, request: {})",
        source_place,
        target_scope,
        k,
        req.debug,
        request_id
    );

    let response = match state.oracle.consult(source_place, target_scope).await {
        OracleOutcome::Parsed(payload) => {
            tracing::debug!(
                "Oracle proposed {} candidates for request {}",
                payload.candidates.len(),
                request_id
            );
            state.assembler.assemble(&payload, k, req.debug, request_id)
        }
        OracleOutcome::Fallback { reason } => {
            tracing::warn!("Returning fallback result for request {}: {}", request_id, reason);
            state.assembler.fallback(request_id)
        }
    };

    tracing::info!(
        "Returning {} results for request {} (degraded: {})",
        response.results.len(),
        response.request_id,
        response.degraded
    );

    HttpResponse::Ok().json(response)
}

use crate::{AppState, handlers};
use axum::{Router, routing::get};

/// Public Router Module
///
/// Endpoints reachable without a session. The home CTA still reads the
/// session when present to personalise its content.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        // GET /health
        // Liveness probe for the load balancer.
        .route("/health", get(|| async { "ok" }))
        // GET /home/cta
        // Landing page call-to-action for the current visitor.
        .route("/home/cta", get(handlers::get_home_cta))
        // GET /api-status
        // Reachability of the ElCentre backend (5 second probe).
        .route("/api-status", get(handlers::get_api_status))
}

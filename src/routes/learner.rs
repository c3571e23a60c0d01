use crate::{AppState, config::AppConfig, handlers, routes::guarded};
use axum::{Router, routing::get};

/// Learner Router Module
///
/// Read-only lesson access for any signed-in user, whatever the role.
/// Anonymous visitors are redirected to `/login?from=...`.
pub fn learner_routes(config: &AppConfig) -> Router<AppState> {
    let router = Router::new()
        // GET /modules/{id}/lessons
        .route("/modules/{id}/lessons", get(handlers::get_module_lessons))
        // GET /lessons/{id}
        .route("/lessons/{id}", get(handlers::get_lesson));

    guarded(router, config, None)
}

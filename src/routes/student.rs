use crate::{AppState, config::AppConfig, handlers, models::Role, routes::guarded};
use axum::{Router, routing::get};

pub const STUDENT_ROLES: &[Role] = &[Role::Student];

/// Student Router Module
///
/// Instructors and admins hitting these pages are sent to their own dashboards.
pub fn student_routes(config: &AppConfig) -> Router<AppState> {
    let router = Router::new()
        // GET /dashboard
        .route("/dashboard", get(handlers::get_dashboard));

    guarded(router, config, Some(STUDENT_ROLES))
}

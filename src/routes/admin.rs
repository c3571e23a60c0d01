use crate::{AppState, config::AppConfig, handlers, models::Role, routes::guarded};
use axum::{Router, routing::get};

pub const ADMIN_ROLES: &[Role] = &[Role::Admin];

/// Admin Router Module
pub fn admin_routes(config: &AppConfig) -> Router<AppState> {
    let router = Router::new()
        // GET /admin/dashboard
        .route("/admin/dashboard", get(handlers::get_dashboard));

    guarded(router, config, Some(ADMIN_ROLES))
}

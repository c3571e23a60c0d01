//! Router Module Index
//!
//! Routes are grouped by who may reach them. Every group except `public`
//! is wrapped in the `require_roles` guard middleware with its own role set.

/// Landing content, health and backend status. No guard.
pub mod public;

/// Lesson reads for any signed-in user.
pub mod learner;

/// Student dashboard.
pub mod student;

/// Lesson management and the instructor dashboard (instructors and admins).
pub mod instructor;

/// Admin dashboard.
pub mod admin;

use axum::{Router, middleware};

use crate::{
    AppState,
    config::AppConfig,
    guard::{GuardState, require_roles},
    models::Role,
};

/// Wraps `router` in the guard with the given role set.
pub(crate) fn guarded(
    router: Router<AppState>,
    config: &AppConfig,
    allowed_roles: Option<&'static [Role]>,
) -> Router<AppState> {
    router.route_layer(middleware::from_fn_with_state(
        GuardState::new(config.clone(), allowed_roles),
        require_roles,
    ))
}

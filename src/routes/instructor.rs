use crate::{
    AppState, config::AppConfig, handlers, lesson_service::MAX_VIDEO_BYTES, models::Role,
    routes::guarded,
};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post, put},
};

pub const INSTRUCTOR_ROLES: &[Role] = &[Role::Instructor, Role::Admin];

/// Room for the non-file form fields on top of the largest video.
const FORM_OVERHEAD_BYTES: u64 = 1024 * 1024;

/// Request body limit for lesson uploads.
pub const UPLOAD_BODY_LIMIT: usize = (MAX_VIDEO_BYTES + FORM_OVERHEAD_BYTES) as usize;

/// Instructor Router Module
///
/// Content management. Lesson writes are multipart uploads, so this router
/// raises axum's default body limit to fit a 500 MiB video.
pub fn instructor_routes(config: &AppConfig) -> Router<AppState> {
    let router = Router::new()
        // GET /instructor/dashboard
        .route("/instructor/dashboard", get(handlers::get_dashboard))
        // POST /instructor/lessons
        // Creates a text or video lesson.
        .route("/instructor/lessons", post(handlers::create_lesson))
        // PUT/DELETE /instructor/lessons/{id}
        // Sparse update (content optional) and removal.
        .route(
            "/instructor/lessons/{id}",
            put(handlers::update_lesson).delete(handlers::delete_lesson),
        )
        .layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT));

    guarded(router, config, Some(INSTRUCTOR_ROLES))
}

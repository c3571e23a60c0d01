use axum::{Router, extract::FromRef, http::HeaderName};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{Level, Span};

// --- Module Structure ---

// Core: access decisions and the lesson service.
pub mod guard;
pub mod lesson_service;

// Boundaries and supporting pieces.
pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod home;
pub mod models;
pub mod nav;

// Routers grouped by audience (public, learner, student, instructor, admin).
pub mod routes;
use routes::{admin, instructor, learner, public, student};

// --- Public Re-exports ---

pub use api::{HttpLessonApi, LessonApi, LessonApiState, MockLessonApi};
pub use config::AppConfig;
pub use lesson_service::LessonService;

/// ApiDoc
///
/// OpenAPI description of the portal, served at `/api-docs/openapi.json`.
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::get_home_cta, handlers::get_api_status, handlers::get_module_lessons,
        handlers::get_lesson, handlers::create_lesson, handlers::update_lesson,
        handlers::delete_lesson, handlers::get_dashboard
    ),
    components(
        schemas(
            models::Lesson, models::ContentType, models::CtaContent, models::NavEntry,
            models::DashboardPage, models::Role, handlers::ApiStatus
        )
    ),
    tags(
        (name = "elcentre-portal", description = "ElCentre learning portal")
    )
)]
struct ApiDoc;

/// AppState
///
/// Everything the handlers share: the lesson service (wrapping the backend
/// collaborator), the configuration and the HTTP client used for probes.
#[derive(Clone)]
pub struct AppState {
    pub lessons: LessonService,
    pub config: AppConfig,
    pub http: reqwest::Client,
}

impl AppState {
    pub fn new(api: LessonApiState, config: AppConfig, http: reqwest::Client) -> Self {
        Self {
            lessons: LessonService::new(api),
            config,
            http,
        }
    }
}

impl FromRef<AppState> for AppConfig {
    fn from_ref(app_state: &AppState) -> AppConfig {
        app_state.config.clone()
    }
}

/// create_router
///
/// Assembles every route group, its guard, and the observability layers.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    let x_request_id = HeaderName::from_static("x-request-id");
    let config = state.config.clone();

    let base_router = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(public::public_routes())
        .merge(learner::learner_routes(&config))
        .merge(student::student_routes(&config))
        .merge(instructor::instructor_routes(&config))
        .merge(admin::admin_routes(&config))
        .with_state(state);

    base_router
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(trace_span_logger)
                        .on_response(
                            DefaultOnResponse::new()
                                .level(Level::INFO)
                                .latency_unit(tower_http::LatencyUnit::Millis),
                        ),
                )
                .layer(PropagateRequestIdLayer::new(x_request_id)),
        )
        .layer(cors)
}

/// trace_span_logger
///
/// Span for one request, tagged with its `x-request-id` so every log line of
/// the request can be correlated.
fn trace_span_logger(request: &axum::http::Request<axum::body::Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "http_request",
        method = ?request.method(),
        uri = ?request.uri(),
        req_id = %request_id,
    )
}

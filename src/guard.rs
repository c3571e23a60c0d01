use axum::{
    Json,
    extract::{FromRef, Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use serde_json::json;
use url::form_urlencoded;

use crate::{auth::AuthSnapshot, config::AppConfig, models::Role};

pub const LOGIN_PATH: &str = "/login";

/// RouteDecision
///
/// What the view layer should do with a protected page request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteDecision {
    /// Authentication state is still resolving.
    ShowLoading,
    /// Send the caller elsewhere. `from` is the location to return to after login.
    Redirect { to: String, from: Option<String> },
    Render,
}

/// role_home_path
///
/// Landing page for a role. Callers without a resolvable role go to `/`.
pub fn role_home_path(role: Option<Role>) -> &'static str {
    match role {
        Some(Role::Student) => "/dashboard",
        Some(Role::Instructor) => "/instructor/dashboard",
        Some(Role::Admin) => "/admin/dashboard",
        None => "/",
    }
}

/// decide
///
/// Pure access decision for a protected page at `location`.
///
/// Loading wins over everything, then authentication, then the role check.
/// `allowed_roles = None` admits every signed-in user, and so does a session
/// whose user record has not been resolved.
pub fn decide(
    snapshot: &AuthSnapshot,
    allowed_roles: Option<&[Role]>,
    location: &str,
) -> RouteDecision {
    if snapshot.is_loading {
        return RouteDecision::ShowLoading;
    }

    if !snapshot.is_authenticated {
        return RouteDecision::Redirect {
            to: LOGIN_PATH.to_string(),
            from: Some(location.to_string()),
        };
    }

    // Roles are only checked once the user record is known.
    if let (Some(allowed), Some(user)) = (allowed_roles, snapshot.user.as_ref()) {
        if !allowed.contains(&user.user_type) {
            return RouteDecision::Redirect {
                to: role_home_path(Some(user.user_type)).to_string(),
                from: None,
            };
        }
    }

    RouteDecision::Render
}

impl RouteDecision {
    /// Builds the redirect target, carrying the origin as `?from=`.
    pub fn redirect_target(to: &str, from: Option<&str>) -> String {
        match from {
            Some(origin) => {
                let encoded: String = form_urlencoded::byte_serialize(origin.as_bytes()).collect();
                format!("{}?from={}", to, encoded)
            }
            None => to.to_string(),
        }
    }
}

/// GuardState
///
/// State handed to the `require_roles` middleware of one router.
#[derive(Clone)]
pub struct GuardState {
    pub config: AppConfig,
    pub allowed_roles: Option<&'static [Role]>,
}

impl GuardState {
    pub fn new(config: AppConfig, allowed_roles: Option<&'static [Role]>) -> Self {
        Self {
            config,
            allowed_roles,
        }
    }
}

impl FromRef<GuardState> for AppConfig {
    fn from_ref(guard: &GuardState) -> AppConfig {
        guard.config.clone()
    }
}

/// require_roles
///
/// Middleware applying `decide` to every request of a router.
///
/// `ShowLoading` answers 202 with `{"status":"loading"}`, a redirect answers
/// 303, and `Render` hands the request to the inner handler.
pub async fn require_roles(
    State(guard): State<GuardState>,
    snapshot: AuthSnapshot,
    request: Request,
    next: Next,
) -> Response {
    let location = request
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| request.uri().path().to_string());

    match decide(&snapshot, guard.allowed_roles, &location) {
        RouteDecision::ShowLoading => {
            (StatusCode::ACCEPTED, Json(json!({ "status": "loading" }))).into_response()
        }
        RouteDecision::Redirect { to, from } => {
            tracing::info!(
                location = %location,
                redirect_to = %to,
                role = ?snapshot.role(),
                "Guard redirected request"
            );
            Redirect::to(&RouteDecision::redirect_target(&to, from.as_deref())).into_response()
        }
        RouteDecision::Render => next.run(request).await,
    }
}

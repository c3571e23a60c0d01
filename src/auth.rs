use std::convert::Infallible;

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{HeaderMap, header, request::Parts},
};
use jsonwebtoken::{DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    config::{AppConfig, Env},
    models::{Role, User},
};

/// Name of the cookie carrying the session token for page navigations.
pub const SESSION_COOKIE: &str = "session";

/// Claims
///
/// Payload of the session JWT issued by the ElCentre backend. `user_type` is
/// parsed into `Role` during decoding, so a token with an unknown role fails
/// verification here instead of reaching the guard.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    /// Subject: the user's id.
    pub sub: Uuid,
    #[serde(default)]
    pub first_name: String,
    pub user_type: Role,
    pub exp: usize,
    pub iat: usize,
}

/// AuthSnapshot
///
/// The caller's authentication state for one request. This is the only input
/// the guard reads.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AuthSnapshot {
    pub is_authenticated: bool,
    pub is_loading: bool,
    pub user: Option<User>,
}

impl AuthSnapshot {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn loading() -> Self {
        Self {
            is_loading: true,
            ..Self::default()
        }
    }

    pub fn signed_in(user: User) -> Self {
        Self {
            is_authenticated: true,
            is_loading: false,
            user: Some(user),
        }
    }

    pub fn role(&self) -> Option<Role> {
        self.user.as_ref().map(|user| user.user_type)
    }
}

/// Pulls the raw token from `Authorization: Bearer` or the session cookie.
fn session_token(headers: &HeaderMap) -> Option<&str> {
    if let Some(bearer) = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
    {
        return Some(bearer);
    }

    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|cookies| cookies.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value)
}

/// Verifies a session token and resolves the user it names.
pub fn verify_token(token: &str, secret: &str) -> Option<User> {
    let decoding_key = DecodingKey::from_secret(secret.as_bytes());
    let mut validation = Validation::default();
    validation.validate_exp = true;

    match decode::<Claims>(token, &decoding_key, &validation) {
        Ok(data) => Some(User {
            id: data.claims.sub,
            first_name: data.claims.first_name,
            user_type: data.claims.user_type,
        }),
        Err(e) => {
            tracing::debug!(error = %e, "Rejected session token");
            None
        }
    }
}

/// Local-only bypass: `x-user-type` (and optionally `x-user-name`) stand in
/// for a real session so pages can be exercised without the backend.
fn local_bypass(headers: &HeaderMap) -> Option<User> {
    let role = headers
        .get("x-user-type")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse::<Role>().ok())?;

    let first_name = headers
        .get("x-user-name")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("Developer")
        .to_string();

    Some(User {
        id: Uuid::nil(),
        first_name,
        user_type: role,
    })
}

/// AuthSnapshot Extractor
///
/// Never rejects: a missing or invalid session yields an anonymous snapshot,
/// and the guard decides what an anonymous caller gets to see.
impl<S> FromRequestParts<S> for AuthSnapshot
where
    S: Send + Sync,
    AppConfig: FromRef<S>,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let config = AppConfig::from_ref(state);

        if config.env == Env::Local {
            if let Some(user) = local_bypass(&parts.headers) {
                return Ok(AuthSnapshot::signed_in(user));
            }
        }

        let user = session_token(&parts.headers).and_then(|token| verify_token(token, &config.jwt_secret));

        Ok(match user {
            Some(user) => AuthSnapshot::signed_in(user),
            None => AuthSnapshot::anonymous(),
        })
    }
}

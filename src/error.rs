use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// ApiError
///
/// A failed call to the remote ElCentre backend. Kept as plain data
/// (`Clone + PartialEq`) so the service layer can hand the exact value back to
/// its caller, and tests can compare it with what the collaborator raised.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The request never produced a response (DNS, connect, timeout, ...).
    #[error("transport error: {0}")]
    Transport(String),

    /// The backend answered with a non-success status.
    #[error("backend returned {status}: {message}")]
    Status { status: u16, message: String },

    /// The response body did not match the expected shape.
    #[error("could not decode backend response: {0}")]
    Decode(String),

    /// The payload could not be encoded into a request (e.g. bad media type).
    #[error("invalid request payload: {0}")]
    InvalidPayload(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            ApiError::Status {
                status: status.as_u16(),
                message: err.to_string(),
            }
        } else {
            ApiError::Transport(err.to_string())
        }
    }
}

/// LessonError
///
/// Outcome of a failed lesson write.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LessonError {
    /// Rejected locally; nothing was sent to the backend.
    #[error("{0}")]
    ValidationFailed(String),

    /// The backend call failed. The inner error is the collaborator's own value.
    #[error(transparent)]
    RemoteCallFailed(#[from] ApiError),
}

impl IntoResponse for LessonError {
    fn into_response(self) -> Response {
        let status = match &self {
            LessonError::ValidationFailed(_) => StatusCode::BAD_REQUEST,
            LessonError::RemoteCallFailed(ApiError::Status { status, .. }) => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            LessonError::RemoteCallFailed(_) => StatusCode::BAD_GATEWAY,
        };

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

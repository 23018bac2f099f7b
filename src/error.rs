use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use sea_orm::DbErr;
use thiserror::Error;
use tracing::error;

use crate::schemas::ErrorResponse;

/// Failure taxonomy for the whole API surface.
///
/// `Auth` and `Forbidden` both map to 401 with a `WWW-Authenticate: Bearer`
/// challenge; the distinction is whether the caller's identity could be
/// resolved at all.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Auth(String),
    #[error("Not authenticated to perform this action")]
    Forbidden,
    #[error("{0}")]
    Validation(String),
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("database error: {0}")]
    Database(#[from] DbErr),
    #[error("internal error")]
    Internal,
}

impl ApiError {
    pub fn invalid_credentials() -> Self {
        Self::Auth("Invalid username or password".to_string())
    }

    pub fn invalid_token() -> Self {
        Self::Auth("Invalid token or expired token".to_string())
    }
}

/// Detect a unique-constraint violation in a database error, so handlers can
/// surface it as a validation failure instead of a 500.
pub fn is_unique_violation(err: &DbErr) -> bool {
    let message = match err {
        DbErr::Exec(e) => e.to_string(),
        DbErr::Query(e) => e.to_string(),
        _ => return false,
    };
    let message = message.to_lowercase();
    message.contains("unique") || message.contains("constraint")
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Auth(_) | ApiError::Forbidden => StatusCode::UNAUTHORIZED,
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Database(_) | ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        };

        // Internal details stay in the logs, not in the response body.
        let detail = match &self {
            ApiError::Database(_) | ApiError::Internal => {
                error!("Request failed: {self}");
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };

        let body = Json(ErrorResponse {
            status: "error".to_string(),
            detail,
        });

        match self {
            ApiError::Auth(_) | ApiError::Forbidden => {
                (status, [(header::WWW_AUTHENTICATE, "Bearer")], body).into_response()
            }
            _ => (status, body).into_response(),
        }
    }
}

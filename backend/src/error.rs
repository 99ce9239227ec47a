//! Application error handling
//!
//! This module provides unified error handling for the API,
//! converting internal errors to appropriate HTTP responses.
//!
//! The credential-related variants deserve care: a login against an unknown
//! email and a login with a wrong password must produce byte-identical
//! responses, so both map to the single message-less `InvalidCredentials`
//! variant.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use crate::config::AppConfig;

/// API error type that can be converted to HTTP responses
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Validation error: {0}")]
    Validation(String),

    /// Unknown email or wrong password. Intentionally carries no detail so
    /// the two cases cannot be told apart by a client.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// No `Authorization` header, or an empty token after the scheme prefix.
    #[error("Access token not provided")]
    MissingToken,

    /// `Authorization` header present but not of the form `Bearer <token>`.
    #[error("Invalid token format")]
    MalformedToken,

    #[error("Token expired")]
    TokenExpired,

    /// Signature check failed or the payload did not parse.
    #[error("Invalid token")]
    InvalidToken,

    /// The token verified but its subject no longer passes the store
    /// re-check (deleted or deactivated account).
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),

    #[error("Database error")]
    Database(#[from] sqlx::Error),
}

/// Error response body, matching the API-wide `{success, message}` envelope
#[derive(Serialize)]
struct ErrorBody {
    success: bool,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl ApiError {
    /// HTTP status for this error
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::InvalidCredentials
            | ApiError::MissingToken
            | ApiError::MalformedToken
            | ApiError::TokenExpired
            | ApiError::InvalidToken
            | ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal(_) | ApiError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        // 5xx detail is logged server-side and replaced with a generic
        // message; the underlying text only reaches the client in
        // development mode.
        let (message, detail) = match &self {
            ApiError::Internal(err) => {
                error!("Internal error: {:?}", err);
                (
                    "Internal server error".to_string(),
                    development_detail(err.to_string()),
                )
            }
            ApiError::Database(err) => {
                error!("Database error: {:?}", err);
                (
                    "Internal server error".to_string(),
                    development_detail(err.to_string()),
                )
            }
            other => (other.to_string(), None),
        };

        let body = Json(ErrorBody {
            success: false,
            message,
            error: detail,
        });

        (status, body).into_response()
    }
}

fn development_detail(detail: String) -> Option<String> {
    if AppConfig::is_production() {
        None
    } else {
        Some(detail)
    }
}

/// Result type alias for API handlers
pub type ApiResult<T> = Result<T, ApiError>;

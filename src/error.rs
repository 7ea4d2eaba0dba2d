// SPDX-License-Identifier: MIT
// Copyright 2026 Vingo contributors

//! Application error types with consistent API responses.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Application error type that converts to HTTP responses.
///
/// Client-caused failures map to 400 (401 for the session gate). Infrastructure
/// faults map to 500 and never expose their details.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("User already exists")]
    Conflict,

    #[error("User does not exist")]
    NotFound,

    #[error("Invalid credentials")]
    InvalidCredential,

    #[error("Invalid or expired OTP")]
    InvalidOrExpired,

    #[error("OTP verification required")]
    NotAuthorized,

    #[error("Authentication required")]
    MissingToken,

    #[error("Invalid or expired token")]
    InvalidToken,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Mail delivery error: {0}")]
    Mail(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Whether this error was caused by an infrastructure fault rather than the caller.
    pub fn is_unexpected(&self) -> bool {
        matches!(
            self,
            AppError::Database(_) | AppError::Mail(_) | AppError::Internal(_)
        )
    }

    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::MissingToken | AppError::InvalidToken => StatusCode::UNAUTHORIZED,
            e if e.is_unexpected() => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        }
    }

    /// Stable machine-readable code sent as `error` in the body.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::InvalidInput(_) => "invalid_input",
            AppError::Conflict => "conflict",
            AppError::NotFound => "not_found",
            AppError::InvalidCredential => "invalid_credential",
            AppError::InvalidOrExpired => "invalid_or_expired",
            AppError::NotAuthorized => "not_authorized",
            AppError::MissingToken => "missing_token",
            AppError::InvalidToken => "invalid_token",
            AppError::Database(_) | AppError::Mail(_) | AppError::Internal(_) => {
                "internal_error"
            }
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::InvalidInput(rejection.body_text())
    }
}

/// JSON error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            AppError::Database(msg) => {
                tracing::error!(error = %msg, "Database error");
                "Something went wrong, please try again".to_string()
            }
            AppError::Mail(msg) => {
                tracing::error!(error = %msg, "Mail delivery error");
                "Could not send email, please try again".to_string()
            }
            AppError::Internal(err) => {
                tracing::error!(error = %err, "Internal server error");
                "Something went wrong, please try again".to_string()
            }
            other => other.to_string(),
        };

        let body = ErrorResponse {
            error: self.code().to_string(),
            message,
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for handlers
pub type Result<T> = std::result::Result<T, AppError>;

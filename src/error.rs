// src/error.rs

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::fmt;

use crate::models::category::Category;

/// Global Application Error Enum.
/// Centralizes error handling and mapping to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    // 500 Internal Server Error
    InternalServerError(String),

    // 503 Service Unavailable (database unreachable, pool exhausted)
    StorageUnavailable(String),

    // 400 Bad Request
    BadRequest(String),

    // 400 Bad Request, carries the category totals so the caller can adjust
    CapacityExceeded {
        category: Category,
        current_marks: i64,
        remaining_marks: i64,
    },

    // 401 Unauthorized
    AuthError(String),

    // 403 Forbidden
    Forbidden(String),

    // 404 Not Found
    NotFound(String),

    // 409 Conflict (e.g., duplicate roll number)
    Conflict(String),
}

impl AppError {
    pub fn is_storage_unavailable(&self) -> bool {
        matches!(self, AppError::StorageUnavailable(_))
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::CapacityExceeded {
                category,
                current_marks,
                remaining_marks,
            } => write!(
                f,
                "Cannot add question. Category \"{}\" already has {}/{} marks. Only {} marks remaining.",
                category,
                current_marks,
                crate::config::CATEGORY_MARKS_CAP,
                remaining_marks
            ),
            AppError::InternalServerError(msg)
            | AppError::StorageUnavailable(msg)
            | AppError::BadRequest(msg)
            | AppError::AuthError(msg)
            | AppError::Forbidden(msg)
            | AppError::NotFound(msg)
            | AppError::Conflict(msg) => f.write_str(msg),
        }
    }
}

impl std::error::Error for AppError {}

/// Implements `IntoResponse` for `AppError`.
/// Converts the error into a `{ success: false, message }` body with the
/// matching HTTP status code.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            AppError::InternalServerError(msg) => {
                tracing::error!("Internal Server Error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "success": false, "message": "Internal Server Error" }),
                )
            }
            AppError::StorageUnavailable(msg) => {
                tracing::error!("Storage unavailable: {}", msg);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    json!({ "success": false, "message": "Storage is currently unavailable" }),
                )
            }
            AppError::CapacityExceeded {
                current_marks,
                remaining_marks,
                ..
            } => (
                StatusCode::BAD_REQUEST,
                json!({
                    "success": false,
                    "message": self.to_string(),
                    "currentMarks": current_marks,
                    "remainingMarks": remaining_marks,
                }),
            ),
            AppError::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                json!({ "success": false, "message": msg }),
            ),
            AppError::AuthError(msg) => (
                StatusCode::UNAUTHORIZED,
                json!({ "success": false, "message": msg }),
            ),
            AppError::Forbidden(msg) => (
                StatusCode::FORBIDDEN,
                json!({ "success": false, "message": msg }),
            ),
            AppError::NotFound(msg) => (
                StatusCode::NOT_FOUND,
                json!({ "success": false, "message": msg }),
            ),
            AppError::Conflict(msg) => (
                StatusCode::CONFLICT,
                json!({ "success": false, "message": msg }),
            ),
        };

        (status, Json(body)).into_response()
    }
}

/// Converts `sqlx::Error` into an `AppError`.
/// Connectivity failures become `StorageUnavailable`; anything else is an
/// internal error. Allows using `?` on database queries.
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::WorkerCrashed => AppError::StorageUnavailable(err.to_string()),
            other => AppError::InternalServerError(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

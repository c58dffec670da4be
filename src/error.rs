//! Error types and HTTP error response handling.
//!
//! This module defines all application errors and how they are converted
//! into HTTP responses with appropriate status codes and JSON bodies.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::warehouse::WarehouseError;

/// Application-wide error type.
///
/// This enum represents all possible errors that can occur in the application.
/// Each variant maps to a specific HTTP status code and error message.
///
/// # Error Categories
///
/// - **Database Errors**: Any sqlx::Error from database operations
/// - **Resource Errors**: Requested account or transaction not found
/// - **Request Errors**: Malformed bodies and invalid field values
/// - **Upstream Errors**: Warehouse channel missing or warehouse call failed
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Database operation failed (e.g., connection error, query error).
    ///
    /// This wraps any sqlx::Error using the `#[from]` attribute, which
    /// automatically implements `From<sqlx::Error> for AppError`.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// No account exists for the requested identifier.
    ///
    /// Returns HTTP 404 Not Found.
    #[error("Account not found")]
    AccountNotFound,

    /// Returns HTTP 404 Not Found.
    #[error("Transaction not found")]
    TransactionNotFound,

    /// Request body could not be parsed or lacks required fields.
    ///
    /// Returns HTTP 400 Bad Request.
    #[error("Malformed request: {0}")]
    MalformedRequest(String),

    /// Request parsed but a value is not acceptable.
    ///
    /// Returns HTTP 400 Bad Request.
    /// The String contains details about what was invalid.
    #[error("Invalid request")]
    InvalidRequest(String),

    /// Operation conflicts with existing data (e.g. deleting an account that owns transactions).
    ///
    /// Returns HTTP 409 Conflict.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// No warehouse channel could be obtained.
    ///
    /// Returns HTTP 503 Service Unavailable.
    #[error("Warehouse unavailable")]
    UpstreamUnavailable,

    /// The warehouse call failed: remote fault, timeout, or broken transport.
    ///
    /// Returns HTTP 502 Bad Gateway.
    #[error("Warehouse error: {0}")]
    UpstreamRpc(String),
}

impl From<WarehouseError> for AppError {
    fn from(err: WarehouseError) -> Self {
        match err {
            WarehouseError::Connection(_) | WarehouseError::Unavailable => {
                AppError::UpstreamUnavailable
            }
            other => AppError::UpstreamRpc(other.to_string()),
        }
    }
}

/// Convert AppError into an HTTP response.
///
/// # Response Format
///
/// All errors return JSON in this format:
/// ```json
/// {
///   "error": {
///     "code": "error_type",
///     "message": "Human-readable error message"
///   }
/// }
/// ```
///
/// # Status Code Mapping
///
/// - `AccountNotFound`, `TransactionNotFound` → 404 Not Found
/// - `MalformedRequest`, `InvalidRequest` → 400 Bad Request
/// - `Conflict` → 409 Conflict
/// - `UpstreamUnavailable` → 503 Service Unavailable
/// - `UpstreamRpc` → 502 Bad Gateway
/// - `Database` → 500 Internal Server Error (hides details from client)
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            AppError::AccountNotFound => {
                (StatusCode::NOT_FOUND, "account_not_found", self.to_string())
            }
            AppError::TransactionNotFound => (
                StatusCode::NOT_FOUND,
                "transaction_not_found",
                self.to_string(),
            ),
            AppError::MalformedRequest(ref msg) => {
                (StatusCode::BAD_REQUEST, "malformed_request", msg.clone())
            }
            AppError::InvalidRequest(ref msg) => {
                (StatusCode::BAD_REQUEST, "invalid_request", msg.clone())
            }
            AppError::Conflict(ref msg) => (StatusCode::CONFLICT, "conflict", msg.clone()),
            AppError::UpstreamUnavailable => (
                StatusCode::SERVICE_UNAVAILABLE,
                "upstream_unavailable",
                self.to_string(),
            ),
            AppError::UpstreamRpc(ref msg) => {
                tracing::warn!(error = %msg, "Warehouse call failed");
                (StatusCode::BAD_GATEWAY, "upstream_rpc_error", msg.clone())
            }
            AppError::Database(ref err) => {
                tracing::error!(error = %err, "Database error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

//! Health check endpoint for service monitoring.

use axum::{Json, extract::State};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{error::AppError, state::AppState, warehouse::WarehouseGateway};

/// Health check response.
///
/// Returns service status, database connectivity and warehouse channel state.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Overall service status
    pub status: String,

    /// Database connection status
    pub database: String,

    /// `connected` or `disconnected`
    pub warehouse: String,

    /// Current server timestamp
    pub timestamp: DateTime<Utc>,
}

/// Health check handler.
///
/// # Response (200 OK)
///
/// ```json
/// {
///   "status": "healthy",
///   "database": "connected",
///   "warehouse": "connected",
///   "timestamp": "2025-12-21T19:00:00Z"
/// }
/// ```
///
/// A missing warehouse channel is reported but does not fail the check;
/// the service still serves the CRUD surface. An unreachable database
/// returns the standard 500 error response.
pub async fn health_check(State(state): State<AppState>) -> Result<Json<HealthResponse>, AppError> {
    sqlx::query("SELECT 1").execute(&state.pool).await?;

    let warehouse = if state.warehouse.is_connected().await {
        "connected"
    } else {
        "disconnected"
    };

    Ok(Json(HealthResponse {
        status: "healthy".to_string(),
        database: "connected".to_string(),
        warehouse: warehouse.to_string(),
        timestamp: Utc::now(),
    }))
}

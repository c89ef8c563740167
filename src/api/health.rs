//! Health check endpoints
//!
//! Provides health check endpoints for monitoring and load balancers.

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

use crate::{db, utils::error::AppError, AppState};

/// Basic health response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Simple health check endpoint (for load balancers)
///
/// Returns 200 OK if the service is running.
/// Does not touch the database.
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Readiness probe
///
/// Returns 200 OK if the database is reachable, 503 otherwise.
pub async fn readiness(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    db::ping(&state.db)
        .await
        .map_err(|e| AppError::ServiceUnavailable(format!("Database unreachable: {}", e)))?;
    Ok(StatusCode::OK)
}

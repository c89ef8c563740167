//! Movement ledger API endpoints
//!
//! Relocating an asset appends a ledger entry and updates the directory in
//! one transaction. The ledger itself is append-only; there is no update or
//! delete surface.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use uuid::Uuid;

use crate::{
    middleware::AuthUser,
    models::{Movement, MovementRequest},
    services::MovementService,
    utils::error::{AppError, AppResult},
    AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_movement))
        .route("/{asset_id}", get(movement_history))
}

/// Relocate an asset
///
/// POST /api/v1/movements
async fn create_movement(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(payload): Json<MovementRequest>,
) -> AppResult<(StatusCode, Json<Movement>)> {
    let service = MovementService::new(state.db.clone());
    let movement = service.relocate(&payload).await?;

    tracing::info!(
        asset_id = %movement.asset_id,
        to = %movement.to,
        user = %auth_user.username,
        "Relocated asset"
    );

    Ok((StatusCode::CREATED, Json(movement)))
}

/// Movement history for one asset, oldest first
///
/// GET /api/v1/movements/{asset_id}
async fn movement_history(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Path(asset_id): Path<String>,
) -> AppResult<Json<Vec<Movement>>> {
    let uuid = Uuid::parse_str(&asset_id)
        .map_err(|_| AppError::BadRequest("Invalid asset ID".to_string()))?;

    let service = MovementService::new(state.db.clone());
    Ok(Json(service.history_for(uuid).await?))
}

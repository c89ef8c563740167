//! Inventory audit API endpoints
//!
//! Sessions, per-asset results and progress for physical counts. Recording a
//! result never moves an asset; discrepancies surface in the observed
//! location and are acted on separately through movements.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    middleware::AuthUser,
    models::{
        Asset, CheckedResult, InventoryResult, InventorySession, RecordResultRequest,
        SessionCreateRequest, SessionProgress,
    },
    services::AuditService,
    utils::error::AppError,
    AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/sessions", get(list_sessions).post(create_session))
        .route("/sessions/{id}", get(get_session))
        .route("/sessions/{id}/complete", put(complete_session))
        .route(
            "/sessions/{id}/results",
            post(record_result).get(list_checked),
        )
        .route("/sessions/{id}/progress", get(get_progress))
        .route("/sessions/{id}/remaining", get(list_remaining))
}

fn parse_session_id(id: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(id).map_err(|_| AppError::BadRequest("Invalid session ID".to_string()))
}

/// Open a new audit session
///
/// POST /api/v1/inventory/sessions
async fn create_session(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(payload): Json<SessionCreateRequest>,
) -> Result<(StatusCode, Json<InventorySession>), AppError> {
    payload.validate()?;

    let audit = AuditService::new(state.db.clone());
    let session = audit.start_session(&payload).await?;

    tracing::info!(
        session_id = %session.id,
        scope = ?session.device_type_codes,
        user = %auth_user.username,
        "Opened inventory session"
    );

    Ok((StatusCode::CREATED, Json(session)))
}

/// List sessions, newest first
///
/// GET /api/v1/inventory/sessions
async fn list_sessions(
    State(state): State<AppState>,
    _auth_user: AuthUser,
) -> Result<Json<Vec<InventorySession>>, AppError> {
    let audit = AuditService::new(state.db.clone());
    Ok(Json(audit.list_sessions().await?))
}

/// Get a single session
///
/// GET /api/v1/inventory/sessions/{id}
async fn get_session(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<InventorySession>, AppError> {
    let uuid = parse_session_id(&id)?;

    let audit = AuditService::new(state.db.clone());
    Ok(Json(audit.get_session(uuid).await?))
}

/// Close a session; closing twice is a conflict
///
/// PUT /api/v1/inventory/sessions/{id}/complete
async fn complete_session(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<InventorySession>, AppError> {
    let uuid = parse_session_id(&id)?;

    let audit = AuditService::new(state.db.clone());
    let session = audit.complete_session(uuid).await?;

    tracing::info!(
        session_id = %session.id,
        user = %auth_user.username,
        "Completed inventory session"
    );

    Ok(Json(session))
}

/// Record (or overwrite) one asset's determination in a session
///
/// POST /api/v1/inventory/sessions/{id}/results
async fn record_result(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Path(id): Path<String>,
    Json(payload): Json<RecordResultRequest>,
) -> Result<(StatusCode, Json<InventoryResult>), AppError> {
    let uuid = parse_session_id(&id)?;

    let audit = AuditService::new(state.db.clone());
    let result = audit.record_result(uuid, &payload).await?;

    Ok((StatusCode::CREATED, Json(result)))
}

/// Recorded results joined with their assets, oldest first
///
/// GET /api/v1/inventory/sessions/{id}/results
async fn list_checked(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Vec<CheckedResult>>, AppError> {
    let uuid = parse_session_id(&id)?;

    let audit = AuditService::new(state.db.clone());
    Ok(Json(audit.list_checked(uuid).await?))
}

/// Counting progress: checked, total in scope, remaining
///
/// GET /api/v1/inventory/sessions/{id}/progress
async fn get_progress(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<SessionProgress>, AppError> {
    let uuid = parse_session_id(&id)?;

    let audit = AuditService::new(state.db.clone());
    Ok(Json(audit.progress(uuid).await?))
}

/// In-scope assets with no recorded result yet
///
/// GET /api/v1/inventory/sessions/{id}/remaining
async fn list_remaining(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Vec<Asset>>, AppError> {
    let uuid = parse_session_id(&id)?;

    let audit = AuditService::new(state.db.clone());
    Ok(Json(audit.list_remaining(uuid).await?))
}

//! Asset directory API endpoints
//!
//! Registration, lookup and scan resolution. Assets never expose a location
//! setter here; relocation goes through the movements endpoint so the ledger
//! stays complete.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    db::asset_repository::AssetRepository,
    middleware::AuthUser,
    models::{Asset, AssetCreateRequest, AssetFilter, AssetUpdateRequest},
    services::AuditService,
    utils::error::AppError,
    AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_assets).post(create_asset))
        .route("/scan/{code}", get(resolve_scan))
        .route("/{id}", get(get_asset).put(update_asset))
}

/// List assets with optional filters
///
/// GET /api/v1/assets?location_kind=warehouse&location_id=...&q=...
async fn list_assets(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Query(filter): Query<AssetFilter>,
) -> Result<Json<Vec<Asset>>, AppError> {
    let repo = AssetRepository::new(state.db.clone());
    Ok(Json(repo.list(&filter).await?))
}

/// Register a new asset
///
/// POST /api/v1/assets
///
/// The inventory number is generated server-side from the company and
/// device-type codes; clients never supply one.
async fn create_asset(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(payload): Json<AssetCreateRequest>,
) -> Result<(StatusCode, Json<Asset>), AppError> {
    payload.validate()?;

    let repo = AssetRepository::new(state.db.clone());
    let asset = repo.create(&payload).await?;

    tracing::info!(
        inventory_number = %asset.inventory_number,
        user = %auth_user.username,
        "Registered asset"
    );

    Ok((StatusCode::CREATED, Json(asset)))
}

/// Resolve a scanned inventory number to its asset
///
/// GET /api/v1/assets/scan/{code}
///
/// `code` is the raw label text; surrounding whitespace is tolerated.
async fn resolve_scan(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Path(code): Path<String>,
) -> Result<Json<Asset>, AppError> {
    let audit = AuditService::new(state.db.clone());
    Ok(Json(audit.resolve_code(&code).await?))
}

/// Get a single asset by ID
///
/// GET /api/v1/assets/{id}
async fn get_asset(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Asset>, AppError> {
    let uuid =
        Uuid::parse_str(&id).map_err(|_| AppError::BadRequest("Invalid asset ID".to_string()))?;

    let repo = AssetRepository::new(state.db.clone());
    Ok(Json(repo.get(uuid).await?))
}

/// Update an asset's descriptive fields
///
/// PUT /api/v1/assets/{id}
///
/// Only serial number, vendor and model are writable.
async fn update_asset(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Path(id): Path<String>,
    Json(payload): Json<AssetUpdateRequest>,
) -> Result<Json<Asset>, AppError> {
    payload.validate()?;

    let uuid =
        Uuid::parse_str(&id).map_err(|_| AppError::BadRequest("Invalid asset ID".to_string()))?;

    let repo = AssetRepository::new(state.db.clone());
    Ok(Json(repo.update(uuid, &payload).await?))
}

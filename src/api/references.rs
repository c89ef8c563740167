//! Reference data API endpoints
//!
//! CRUD for companies, device types, warehouses and vendors. Reads are open
//! to any authenticated user; mutations require the admin role. Deletes are
//! guarded by the repository so codes referenced by assets cannot vanish.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    api::require_admin,
    db::reference_repository::ReferenceRepository,
    middleware::AuthUser,
    models::{
        Company, CompanyCreateRequest, CompanyUpdateRequest, DeviceType, DeviceTypeCreateRequest,
        DeviceTypeUpdateRequest, Vendor, VendorCreateRequest, VendorUpdateRequest, Warehouse,
        WarehouseCreateRequest, WarehouseUpdateRequest,
    },
    utils::error::AppError,
    utils::validation::{validate_company_code, validate_device_type_code},
    AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/companies", get(list_companies).post(create_company))
        .route(
            "/companies/{id}",
            get(get_company).put(update_company).delete(delete_company),
        )
        .route(
            "/device-types",
            get(list_device_types).post(create_device_type),
        )
        .route(
            "/device-types/{id}",
            get(get_device_type)
                .put(update_device_type)
                .delete(delete_device_type),
        )
        .route("/warehouses", get(list_warehouses).post(create_warehouse))
        .route(
            "/warehouses/{id}",
            get(get_warehouse)
                .put(update_warehouse)
                .delete(delete_warehouse),
        )
        .route("/vendors", get(list_vendors).post(create_vendor))
        .route(
            "/vendors/{id}",
            get(get_vendor).put(update_vendor).delete(delete_vendor),
        )
}

// =============================================================================
// Companies
// =============================================================================

async fn list_companies(
    State(state): State<AppState>,
    _auth_user: AuthUser,
) -> Result<Json<Vec<Company>>, AppError> {
    let repo = ReferenceRepository::new(state.db.clone());
    Ok(Json(repo.list_companies().await?))
}

async fn create_company(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(payload): Json<CompanyCreateRequest>,
) -> Result<(StatusCode, Json<Company>), AppError> {
    require_admin(&auth_user)?;
    payload.validate()?;

    if !validate_company_code(&payload.code) {
        return Err(AppError::BadRequest(format!(
            "Company code '{}' must be three uppercase letters",
            payload.code
        )));
    }

    let repo = ReferenceRepository::new(state.db.clone());
    let company = repo.create_company(&payload).await?;

    Ok((StatusCode::CREATED, Json(company)))
}

async fn get_company(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Company>, AppError> {
    let uuid =
        Uuid::parse_str(&id).map_err(|_| AppError::BadRequest("Invalid company ID".to_string()))?;

    let repo = ReferenceRepository::new(state.db.clone());
    Ok(Json(repo.get_company(uuid).await?))
}

async fn update_company(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
    Json(payload): Json<CompanyUpdateRequest>,
) -> Result<Json<Company>, AppError> {
    require_admin(&auth_user)?;
    payload.validate()?;

    let uuid =
        Uuid::parse_str(&id).map_err(|_| AppError::BadRequest("Invalid company ID".to_string()))?;

    let repo = ReferenceRepository::new(state.db.clone());
    Ok(Json(repo.update_company(uuid, &payload).await?))
}

async fn delete_company(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    require_admin(&auth_user)?;

    let uuid =
        Uuid::parse_str(&id).map_err(|_| AppError::BadRequest("Invalid company ID".to_string()))?;

    let repo = ReferenceRepository::new(state.db.clone());
    repo.delete_company(uuid).await?;

    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// Device types
// =============================================================================

async fn list_device_types(
    State(state): State<AppState>,
    _auth_user: AuthUser,
) -> Result<Json<Vec<DeviceType>>, AppError> {
    let repo = ReferenceRepository::new(state.db.clone());
    Ok(Json(repo.list_device_types().await?))
}

async fn create_device_type(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(payload): Json<DeviceTypeCreateRequest>,
) -> Result<(StatusCode, Json<DeviceType>), AppError> {
    require_admin(&auth_user)?;
    payload.validate()?;

    if !validate_device_type_code(&payload.code) {
        return Err(AppError::BadRequest(format!(
            "Device type code '{}' must be two digits",
            payload.code
        )));
    }

    let repo = ReferenceRepository::new(state.db.clone());
    let device_type = repo.create_device_type(&payload).await?;

    Ok((StatusCode::CREATED, Json(device_type)))
}

async fn get_device_type(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<DeviceType>, AppError> {
    let uuid = Uuid::parse_str(&id)
        .map_err(|_| AppError::BadRequest("Invalid device type ID".to_string()))?;

    let repo = ReferenceRepository::new(state.db.clone());
    Ok(Json(repo.get_device_type(uuid).await?))
}

async fn update_device_type(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
    Json(payload): Json<DeviceTypeUpdateRequest>,
) -> Result<Json<DeviceType>, AppError> {
    require_admin(&auth_user)?;
    payload.validate()?;

    let uuid = Uuid::parse_str(&id)
        .map_err(|_| AppError::BadRequest("Invalid device type ID".to_string()))?;

    let repo = ReferenceRepository::new(state.db.clone());
    Ok(Json(repo.update_device_type(uuid, &payload).await?))
}

async fn delete_device_type(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    require_admin(&auth_user)?;

    let uuid = Uuid::parse_str(&id)
        .map_err(|_| AppError::BadRequest("Invalid device type ID".to_string()))?;

    let repo = ReferenceRepository::new(state.db.clone());
    repo.delete_device_type(uuid).await?;

    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// Warehouses
// =============================================================================

async fn list_warehouses(
    State(state): State<AppState>,
    _auth_user: AuthUser,
) -> Result<Json<Vec<Warehouse>>, AppError> {
    let repo = ReferenceRepository::new(state.db.clone());
    Ok(Json(repo.list_warehouses().await?))
}

async fn create_warehouse(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(payload): Json<WarehouseCreateRequest>,
) -> Result<(StatusCode, Json<Warehouse>), AppError> {
    require_admin(&auth_user)?;
    payload.validate()?;

    let repo = ReferenceRepository::new(state.db.clone());
    let warehouse = repo.create_warehouse(&payload).await?;

    Ok((StatusCode::CREATED, Json(warehouse)))
}

async fn get_warehouse(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Warehouse>, AppError> {
    let uuid = Uuid::parse_str(&id)
        .map_err(|_| AppError::BadRequest("Invalid warehouse ID".to_string()))?;

    let repo = ReferenceRepository::new(state.db.clone());
    Ok(Json(repo.get_warehouse(uuid).await?))
}

async fn update_warehouse(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
    Json(payload): Json<WarehouseUpdateRequest>,
) -> Result<Json<Warehouse>, AppError> {
    require_admin(&auth_user)?;
    payload.validate()?;

    let uuid = Uuid::parse_str(&id)
        .map_err(|_| AppError::BadRequest("Invalid warehouse ID".to_string()))?;

    let repo = ReferenceRepository::new(state.db.clone());
    Ok(Json(repo.update_warehouse(uuid, &payload).await?))
}

async fn delete_warehouse(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    require_admin(&auth_user)?;

    let uuid = Uuid::parse_str(&id)
        .map_err(|_| AppError::BadRequest("Invalid warehouse ID".to_string()))?;

    let repo = ReferenceRepository::new(state.db.clone());
    repo.delete_warehouse(uuid).await?;

    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// Vendors
// =============================================================================

async fn list_vendors(
    State(state): State<AppState>,
    _auth_user: AuthUser,
) -> Result<Json<Vec<Vendor>>, AppError> {
    let repo = ReferenceRepository::new(state.db.clone());
    Ok(Json(repo.list_vendors().await?))
}

async fn create_vendor(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(payload): Json<VendorCreateRequest>,
) -> Result<(StatusCode, Json<Vendor>), AppError> {
    require_admin(&auth_user)?;
    payload.validate()?;

    let repo = ReferenceRepository::new(state.db.clone());
    let vendor = repo.create_vendor(&payload).await?;

    Ok((StatusCode::CREATED, Json(vendor)))
}

async fn get_vendor(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Vendor>, AppError> {
    let uuid =
        Uuid::parse_str(&id).map_err(|_| AppError::BadRequest("Invalid vendor ID".to_string()))?;

    let repo = ReferenceRepository::new(state.db.clone());
    Ok(Json(repo.get_vendor(uuid).await?))
}

async fn update_vendor(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
    Json(payload): Json<VendorUpdateRequest>,
) -> Result<Json<Vendor>, AppError> {
    require_admin(&auth_user)?;
    payload.validate()?;

    let uuid =
        Uuid::parse_str(&id).map_err(|_| AppError::BadRequest("Invalid vendor ID".to_string()))?;

    let repo = ReferenceRepository::new(state.db.clone());
    Ok(Json(repo.update_vendor(uuid, &payload).await?))
}

async fn delete_vendor(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    require_admin(&auth_user)?;

    let uuid =
        Uuid::parse_str(&id).map_err(|_| AppError::BadRequest("Invalid vendor ID".to_string()))?;

    let repo = ReferenceRepository::new(state.db.clone());
    repo.delete_vendor(uuid).await?;

    Ok(StatusCode::NO_CONTENT)
}

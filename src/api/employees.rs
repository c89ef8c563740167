//! Employee API endpoints
//!
//! Personnel CRUD plus the two asset-centric views (currently held assets,
//! assignment history) and the status endpoint that enforces the
//! termination guard.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, put},
    Json, Router,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    api::require_admin,
    middleware::AuthUser,
    models::{
        Employee, EmployeeAssetEvent, EmployeeCreateRequest, EmployeeUpdateRequest, HeldAsset,
        StatusChangeOutcome, StatusChangeRequest,
    },
    services::EmployeeService,
    utils::error::{AppError, ErrorResponse},
    utils::validation::validate_phone,
    AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_employees).post(create_employee))
        .route(
            "/{id}",
            get(get_employee).put(update_employee).delete(delete_employee),
        )
        .route("/{id}/status", put(change_status))
        .route("/{id}/assets", get(list_assigned_assets))
        .route("/{id}/history", get(asset_history))
}

fn parse_employee_id(id: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(id).map_err(|_| AppError::BadRequest("Invalid employee ID".to_string()))
}

/// List employees ordered by name
///
/// GET /api/v1/employees
async fn list_employees(
    State(state): State<AppState>,
    _auth_user: AuthUser,
) -> Result<Json<Vec<Employee>>, AppError> {
    let service = EmployeeService::new(state.db.clone());
    Ok(Json(service.list().await?))
}

/// Register an employee
///
/// POST /api/v1/employees
async fn create_employee(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(payload): Json<EmployeeCreateRequest>,
) -> Result<(StatusCode, Json<Employee>), AppError> {
    require_admin(&auth_user)?;
    payload.validate()?;

    if !validate_phone(&payload.phone) {
        return Err(AppError::BadRequest(format!(
            "'{}' is not a valid phone number",
            payload.phone
        )));
    }

    let service = EmployeeService::new(state.db.clone());
    let employee = service.create(&payload).await?;

    Ok((StatusCode::CREATED, Json(employee)))
}

/// Get a single employee
///
/// GET /api/v1/employees/{id}
async fn get_employee(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Employee>, AppError> {
    let uuid = parse_employee_id(&id)?;

    let service = EmployeeService::new(state.db.clone());
    Ok(Json(service.get(uuid).await?))
}

/// Update employee profile fields
///
/// PUT /api/v1/employees/{id}
async fn update_employee(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
    Json(payload): Json<EmployeeUpdateRequest>,
) -> Result<Json<Employee>, AppError> {
    require_admin(&auth_user)?;
    payload.validate()?;

    if let Some(ref phone) = payload.phone {
        if !validate_phone(phone) {
            return Err(AppError::BadRequest(format!(
                "'{}' is not a valid phone number",
                phone
            )));
        }
    }

    let uuid = parse_employee_id(&id)?;

    let service = EmployeeService::new(state.db.clone());
    Ok(Json(service.update(uuid, &payload).await?))
}

/// Delete an employee with no held assets and no ledger mentions
///
/// DELETE /api/v1/employees/{id}
async fn delete_employee(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    require_admin(&auth_user)?;

    let uuid = parse_employee_id(&id)?;

    let service = EmployeeService::new(state.db.clone());
    service.delete(uuid).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Change an employee's status
///
/// PUT /api/v1/employees/{id}/status
///
/// Termination is refused with 409 while the employee still holds assets;
/// the response body lists them so the caller can relocate each one first.
async fn change_status(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
    Json(payload): Json<StatusChangeRequest>,
) -> Result<Response, AppError> {
    require_admin(&auth_user)?;

    let uuid = parse_employee_id(&id)?;

    let service = EmployeeService::new(state.db.clone());
    match service.request_status_change(uuid, payload.status).await? {
        StatusChangeOutcome::Applied(employee) => {
            tracing::info!(
                employee_id = %employee.id,
                status = %employee.status,
                user = %auth_user.username,
                "Changed employee status"
            );
            Ok(Json(employee).into_response())
        }
        StatusChangeOutcome::Blocked(held) => {
            tracing::info!(
                employee_id = %uuid,
                held = held.len(),
                "Termination blocked by assigned assets"
            );
            Ok((
                StatusCode::CONFLICT,
                Json(
                    ErrorResponse::new(
                        "employee_has_assets",
                        "Employee still holds assets; relocate them before terminating",
                    )
                    .with_details(serde_json::json!({ "assets": held })),
                ),
            )
                .into_response())
        }
    }
}

/// Assets currently assigned to an employee
///
/// GET /api/v1/employees/{id}/assets
async fn list_assigned_assets(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Vec<HeldAsset>>, AppError> {
    let uuid = parse_employee_id(&id)?;

    let service = EmployeeService::new(state.db.clone());
    Ok(Json(service.assigned_assets(uuid).await?))
}

/// Every ledger entry that assigned an asset to or took one from an employee
///
/// GET /api/v1/employees/{id}/history
async fn asset_history(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Vec<EmployeeAssetEvent>>, AppError> {
    let uuid = parse_employee_id(&id)?;

    let service = EmployeeService::new(state.db.clone());
    Ok(Json(service.asset_history(uuid).await?))
}

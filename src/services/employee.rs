//! Employee service
//!
//! Profile CRUD plus the asset-centric views: what an employee currently
//! holds, the full assignment history, and the guarded status transition.

use sqlx::SqlitePool;

use crate::db::employee_repository::EmployeeRepository;
use crate::models::{
    Employee, EmployeeAssetEvent, EmployeeCreateRequest, EmployeeStatus, EmployeeUpdateRequest,
    HeldAsset, StatusChangeOutcome,
};
use crate::utils::AppError;

pub struct EmployeeService {
    employees: EmployeeRepository,
}

impl EmployeeService {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            employees: EmployeeRepository::new(pool),
        }
    }

    pub async fn create(&self, req: &EmployeeCreateRequest) -> Result<Employee, AppError> {
        self.employees.create(req).await
    }

    pub async fn list(&self) -> Result<Vec<Employee>, AppError> {
        self.employees.list().await
    }

    pub async fn get(&self, id: uuid::Uuid) -> Result<Employee, AppError> {
        self.employees.get(id).await
    }

    pub async fn update(
        &self,
        id: uuid::Uuid,
        req: &EmployeeUpdateRequest,
    ) -> Result<Employee, AppError> {
        self.employees.update(id, req).await
    }

    pub async fn delete(&self, id: uuid::Uuid) -> Result<(), AppError> {
        self.employees.delete(id).await
    }

    /// Request a status change; termination is blocked while assets are held
    pub async fn request_status_change(
        &self,
        id: uuid::Uuid,
        status: EmployeeStatus,
    ) -> Result<StatusChangeOutcome, AppError> {
        self.employees.change_status(id, status).await
    }

    /// Assets currently assigned, each with its assignment time
    pub async fn assigned_assets(&self, id: uuid::Uuid) -> Result<Vec<HeldAsset>, AppError> {
        self.employees.get(id).await?;
        self.employees.held_assets(id).await
    }

    /// Every assignment and return involving this employee, oldest first
    pub async fn asset_history(&self, id: uuid::Uuid) -> Result<Vec<EmployeeAssetEvent>, AppError> {
        self.employees.get(id).await?;
        self.employees.asset_events(id).await
    }
}

//! Employee repository
//!
//! Database operations for employees, including the termination guard: the
//! status transition to `terminated` runs in a transaction that re-checks
//! the held-asset set, so an asset assigned concurrently cannot slip past
//! the guard.

use chrono::Utc;
use sqlx::{FromRow, SqlitePool};
use uuid::Uuid;

use crate::db::{parse_location, parse_timestamp};
use crate::models::{
    AssetEventAction, AssetSummary, Employee, EmployeeAssetEvent, EmployeeCreateRequest,
    EmployeeStatus, EmployeeUpdateRequest, HeldAsset, StatusChangeOutcome,
};
use crate::utils::AppError;

pub struct EmployeeRepository {
    pool: SqlitePool,
}

impl EmployeeRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, req: &EmployeeCreateRequest) -> Result<Employee, AppError> {
        let id = Uuid::new_v4();
        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO employees (id, name, phone, position, status, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(id.to_string())
        .bind(&req.name)
        .bind(&req.phone)
        .bind(req.position.as_deref())
        .bind(EmployeeStatus::Working.as_str())
        .bind(now.to_rfc3339())
        .bind(now.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(Employee {
            id,
            name: req.name.clone(),
            phone: req.phone.clone(),
            position: req.position.clone(),
            status: EmployeeStatus::Working,
            created_at: now,
            updated_at: now,
        })
    }

    pub async fn list(&self) -> Result<Vec<Employee>, AppError> {
        let rows = sqlx::query_as::<_, EmployeeRow>(
            r#"
            SELECT id, name, phone, position, status, created_at, updated_at
            FROM employees
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|r| r.into()).collect())
    }

    pub async fn get(&self, id: Uuid) -> Result<Employee, AppError> {
        let row = sqlx::query_as::<_, EmployeeRow>(
            r#"
            SELECT id, name, phone, position, status, created_at, updated_at
            FROM employees
            WHERE id = ?1
            "#,
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into())
            .ok_or_else(|| AppError::NotFound(format!("Employee {} not found", id)))
    }

    pub async fn update(
        &self,
        id: Uuid,
        req: &EmployeeUpdateRequest,
    ) -> Result<Employee, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE employees
            SET name = COALESCE(?1, name),
                phone = COALESCE(?2, phone),
                position = COALESCE(?3, position),
                updated_at = ?4
            WHERE id = ?5
            "#,
        )
        .bind(req.name.as_deref())
        .bind(req.phone.as_deref())
        .bind(req.position.as_deref())
        .bind(Utc::now().to_rfc3339())
        .bind(id.to_string())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Employee {} not found", id)));
        }

        self.get(id).await
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        let exists: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM employees WHERE id = ?1")
            .bind(id.to_string())
            .fetch_one(&mut *tx)
            .await?;
        if exists == 0 {
            return Err(AppError::NotFound(format!("Employee {} not found", id)));
        }

        let assets: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM assets WHERE location_kind = 'employee' AND location_id = ?1",
        )
        .bind(id.to_string())
        .fetch_one(&mut *tx)
        .await?;
        if assets > 0 {
            return Err(AppError::Conflict(format!(
                "Employee {} still holds {} asset(s)",
                id, assets
            )));
        }

        // The ledger is immutable, so an employee it mentions must stay resolvable.
        let movements: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM movements
            WHERE (from_kind = 'employee' AND from_id = ?1)
               OR (to_kind = 'employee' AND to_id = ?1)
            "#,
        )
        .bind(id.to_string())
        .fetch_one(&mut *tx)
        .await?;
        if movements > 0 {
            return Err(AppError::Conflict(format!(
                "Employee {} appears in {} movement(s)",
                id, movements
            )));
        }

        sqlx::query("DELETE FROM employees WHERE id = ?1")
            .bind(id.to_string())
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }

    /// Check that an employee exists; used to vet movement destinations
    pub async fn exists(&self, id: Uuid) -> Result<bool, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM employees WHERE id = ?1")
            .bind(id.to_string())
            .fetch_one(&self.pool)
            .await?;

        Ok(count > 0)
    }

    /// Apply a status change, enforcing the termination guard
    ///
    /// Terminating an employee who still holds assets is not applied; the
    /// blocked outcome carries those assets with their assignment times.
    pub async fn change_status(
        &self,
        id: Uuid,
        status: EmployeeStatus,
    ) -> Result<StatusChangeOutcome, AppError> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, EmployeeRow>(
            r#"
            SELECT id, name, phone, position, status, created_at, updated_at
            FROM employees
            WHERE id = ?1
            "#,
        )
        .bind(id.to_string())
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Employee {} not found", id)))?;

        if status == EmployeeStatus::Terminated {
            let held = fetch_held_assets(&mut *tx, id).await?;
            if !held.is_empty() {
                return Ok(StatusChangeOutcome::Blocked(held));
            }
        }

        let now = Utc::now();
        sqlx::query("UPDATE employees SET status = ?1, updated_at = ?2 WHERE id = ?3")
            .bind(status.as_str())
            .bind(now.to_rfc3339())
            .bind(id.to_string())
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        let mut employee: Employee = row.into();
        employee.status = status;
        employee.updated_at = now;
        Ok(StatusChangeOutcome::Applied(employee))
    }

    /// Assets currently assigned to an employee, with assignment times
    pub async fn held_assets(&self, id: Uuid) -> Result<Vec<HeldAsset>, AppError> {
        fetch_held_assets(&self.pool, id).await
    }

    /// Every ledger entry touching an employee, oldest first, each tagged
    /// with whether the asset arrived or left
    pub async fn asset_events(&self, id: Uuid) -> Result<Vec<EmployeeAssetEvent>, AppError> {
        let rows = sqlx::query_as::<_, AssetEventRow>(
            r#"
            SELECT m.id, m.from_kind, m.from_id, m.to_kind, m.to_id, m.moved_at,
                   a.id AS asset_id, a.inventory_number, a.serial_number, a.vendor, a.model
            FROM movements m
            JOIN assets a ON a.id = m.asset_id
            WHERE (m.from_kind = 'employee' AND m.from_id = ?1)
               OR (m.to_kind = 'employee' AND m.to_id = ?1)
            ORDER BY datetime(m.moved_at) ASC, m.rowid ASC
            "#,
        )
        .bind(id.to_string())
        .fetch_all(&self.pool)
        .await?;

        let employee_id = id.to_string();
        Ok(rows
            .into_iter()
            .map(|row| {
                let action = if row.to_kind == "employee" && row.to_id == employee_id {
                    AssetEventAction::Assigned
                } else {
                    AssetEventAction::Unassigned
                };
                EmployeeAssetEvent {
                    id: Uuid::parse_str(&row.id).unwrap_or_default(),
                    moved_at: parse_timestamp(&row.moved_at),
                    action,
                    from: parse_location(&row.from_kind, &row.from_id),
                    to: parse_location(&row.to_kind, &row.to_id),
                    asset: AssetSummary {
                        id: Uuid::parse_str(&row.asset_id).unwrap_or_default(),
                        inventory_number: row.inventory_number,
                        serial_number: row.serial_number,
                        vendor: row.vendor,
                        model: row.model,
                    },
                }
            })
            .collect())
    }
}

/// Held-asset query shared between the public listing and the guard
/// transaction. The assignment time is the latest movement into the
/// employee, or the asset's creation time when it was registered there.
async fn fetch_held_assets<'e, E>(executor: E, employee_id: Uuid) -> Result<Vec<HeldAsset>, AppError>
where
    E: sqlx::SqliteExecutor<'e>,
{
    let rows = sqlx::query_as::<_, HeldAssetRow>(
        r#"
        SELECT a.id, a.inventory_number, a.serial_number, a.vendor, a.model,
               COALESCE(
                   (SELECT m.moved_at FROM movements m
                    WHERE m.asset_id = a.id
                      AND m.to_kind = 'employee' AND m.to_id = ?1
                    ORDER BY datetime(m.moved_at) DESC, m.rowid DESC
                    LIMIT 1),
                   a.created_at
               ) AS assigned_at
        FROM assets a
        WHERE a.location_kind = 'employee' AND a.location_id = ?1
        ORDER BY a.inventory_number
        "#,
    )
    .bind(employee_id.to_string())
    .fetch_all(executor)
    .await?;

    Ok(rows
        .into_iter()
        .map(|row| HeldAsset {
            assigned_at: parse_timestamp(&row.assigned_at),
            asset: AssetSummary {
                id: Uuid::parse_str(&row.id).unwrap_or_default(),
                inventory_number: row.inventory_number,
                serial_number: row.serial_number,
                vendor: row.vendor,
                model: row.model,
            },
        })
        .collect())
}

// ============================================================================
// Database Row Types
// ============================================================================

#[derive(Debug, FromRow)]
struct EmployeeRow {
    id: String,
    name: String,
    phone: String,
    position: Option<String>,
    status: String,
    created_at: String,
    updated_at: String,
}

impl From<EmployeeRow> for Employee {
    fn from(row: EmployeeRow) -> Self {
        Employee {
            id: Uuid::parse_str(&row.id).unwrap_or_default(),
            name: row.name,
            phone: row.phone,
            position: row.position,
            status: EmployeeStatus::parse(&row.status).unwrap_or(EmployeeStatus::Working),
            created_at: parse_timestamp(&row.created_at),
            updated_at: parse_timestamp(&row.updated_at),
        }
    }
}

#[derive(Debug, FromRow)]
struct HeldAssetRow {
    id: String,
    inventory_number: String,
    serial_number: String,
    vendor: String,
    model: String,
    assigned_at: String,
}

#[derive(Debug, FromRow)]
struct AssetEventRow {
    id: String,
    from_kind: String,
    from_id: String,
    to_kind: String,
    to_id: String,
    moved_at: String,
    asset_id: String,
    inventory_number: String,
    serial_number: String,
    vendor: String,
    model: String,
}

//! Reference data repository
//!
//! Database operations for companies, device types, warehouses and vendors.
//! Deleting reference rows is guarded: a company or device type stays while
//! assets carry its code, and a warehouse stays while assets sit in it or
//! the movement ledger mentions it.

use chrono::Utc;
use sqlx::{FromRow, SqlitePool};
use uuid::Uuid;

use crate::db::parse_timestamp;
use crate::models::{
    Company, CompanyCreateRequest, CompanyUpdateRequest, DeviceType, DeviceTypeCreateRequest,
    DeviceTypeUpdateRequest, Vendor, VendorCreateRequest, VendorUpdateRequest, Warehouse,
    WarehouseCreateRequest, WarehouseUpdateRequest,
};
use crate::utils::AppError;

pub struct ReferenceRepository {
    pool: SqlitePool,
}

impl ReferenceRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    // =========================================================================
    // Companies
    // =========================================================================

    pub async fn create_company(&self, req: &CompanyCreateRequest) -> Result<Company, AppError> {
        let id = Uuid::new_v4();
        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO companies (id, name, code, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(id.to_string())
        .bind(&req.name)
        .bind(&req.code)
        .bind(now.to_rfc3339())
        .bind(now.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(Company {
            id,
            name: req.name.clone(),
            code: req.code.clone(),
            created_at: now,
            updated_at: now,
        })
    }

    pub async fn list_companies(&self) -> Result<Vec<Company>, AppError> {
        let rows = sqlx::query_as::<_, CompanyRow>(
            "SELECT id, name, code, created_at, updated_at FROM companies ORDER BY code",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|r| r.into()).collect())
    }

    pub async fn get_company(&self, id: Uuid) -> Result<Company, AppError> {
        let row = sqlx::query_as::<_, CompanyRow>(
            "SELECT id, name, code, created_at, updated_at FROM companies WHERE id = ?1",
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into())
            .ok_or_else(|| AppError::NotFound(format!("Company {} not found", id)))
    }

    pub async fn update_company(
        &self,
        id: Uuid,
        req: &CompanyUpdateRequest,
    ) -> Result<Company, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE companies
            SET name = COALESCE(?1, name), updated_at = ?2
            WHERE id = ?3
            "#,
        )
        .bind(req.name.as_deref())
        .bind(Utc::now().to_rfc3339())
        .bind(id.to_string())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Company {} not found", id)));
        }

        self.get_company(id).await
    }

    pub async fn delete_company(&self, id: Uuid) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        let code: Option<String> = sqlx::query_scalar("SELECT code FROM companies WHERE id = ?1")
            .bind(id.to_string())
            .fetch_optional(&mut *tx)
            .await?;
        let code = code.ok_or_else(|| AppError::NotFound(format!("Company {} not found", id)))?;

        let assets: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM assets WHERE company_code = ?1")
            .bind(&code)
            .fetch_one(&mut *tx)
            .await?;
        if assets > 0 {
            return Err(AppError::Conflict(format!(
                "Company {} is referenced by {} asset(s)",
                code, assets
            )));
        }

        sqlx::query("DELETE FROM companies WHERE id = ?1")
            .bind(id.to_string())
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }

    /// Check that a company code exists; used when registering assets
    pub async fn company_code_exists(&self, code: &str) -> Result<bool, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM companies WHERE code = ?1")
            .bind(code)
            .fetch_one(&self.pool)
            .await?;

        Ok(count > 0)
    }

    // =========================================================================
    // Device types
    // =========================================================================

    pub async fn create_device_type(
        &self,
        req: &DeviceTypeCreateRequest,
    ) -> Result<DeviceType, AppError> {
        let id = Uuid::new_v4();
        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO device_types (id, name, code, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(id.to_string())
        .bind(&req.name)
        .bind(&req.code)
        .bind(now.to_rfc3339())
        .bind(now.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(DeviceType {
            id,
            name: req.name.clone(),
            code: req.code.clone(),
            created_at: now,
            updated_at: now,
        })
    }

    pub async fn list_device_types(&self) -> Result<Vec<DeviceType>, AppError> {
        let rows = sqlx::query_as::<_, DeviceTypeRow>(
            "SELECT id, name, code, created_at, updated_at FROM device_types ORDER BY code",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|r| r.into()).collect())
    }

    pub async fn get_device_type(&self, id: Uuid) -> Result<DeviceType, AppError> {
        let row = sqlx::query_as::<_, DeviceTypeRow>(
            "SELECT id, name, code, created_at, updated_at FROM device_types WHERE id = ?1",
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into())
            .ok_or_else(|| AppError::NotFound(format!("Device type {} not found", id)))
    }

    pub async fn update_device_type(
        &self,
        id: Uuid,
        req: &DeviceTypeUpdateRequest,
    ) -> Result<DeviceType, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE device_types
            SET name = COALESCE(?1, name), updated_at = ?2
            WHERE id = ?3
            "#,
        )
        .bind(req.name.as_deref())
        .bind(Utc::now().to_rfc3339())
        .bind(id.to_string())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Device type {} not found", id)));
        }

        self.get_device_type(id).await
    }

    pub async fn delete_device_type(&self, id: Uuid) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        let code: Option<String> =
            sqlx::query_scalar("SELECT code FROM device_types WHERE id = ?1")
                .bind(id.to_string())
                .fetch_optional(&mut *tx)
                .await?;
        let code =
            code.ok_or_else(|| AppError::NotFound(format!("Device type {} not found", id)))?;

        let assets: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM assets WHERE device_type_code = ?1")
                .bind(&code)
                .fetch_one(&mut *tx)
                .await?;
        if assets > 0 {
            return Err(AppError::Conflict(format!(
                "Device type {} is referenced by {} asset(s)",
                code, assets
            )));
        }

        sqlx::query("DELETE FROM device_types WHERE id = ?1")
            .bind(id.to_string())
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }

    /// Check that a device-type code exists
    pub async fn device_type_code_exists(&self, code: &str) -> Result<bool, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM device_types WHERE code = ?1")
            .bind(code)
            .fetch_one(&self.pool)
            .await?;

        Ok(count > 0)
    }

    // =========================================================================
    // Warehouses
    // =========================================================================

    pub async fn create_warehouse(
        &self,
        req: &WarehouseCreateRequest,
    ) -> Result<Warehouse, AppError> {
        let id = Uuid::new_v4();
        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO warehouses (id, name, address, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(id.to_string())
        .bind(&req.name)
        .bind(&req.address)
        .bind(now.to_rfc3339())
        .bind(now.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(Warehouse {
            id,
            name: req.name.clone(),
            address: req.address.clone(),
            created_at: now,
            updated_at: now,
        })
    }

    pub async fn list_warehouses(&self) -> Result<Vec<Warehouse>, AppError> {
        let rows = sqlx::query_as::<_, WarehouseRow>(
            "SELECT id, name, address, created_at, updated_at FROM warehouses ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|r| r.into()).collect())
    }

    pub async fn get_warehouse(&self, id: Uuid) -> Result<Warehouse, AppError> {
        let row = sqlx::query_as::<_, WarehouseRow>(
            "SELECT id, name, address, created_at, updated_at FROM warehouses WHERE id = ?1",
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into())
            .ok_or_else(|| AppError::NotFound(format!("Warehouse {} not found", id)))
    }

    pub async fn update_warehouse(
        &self,
        id: Uuid,
        req: &WarehouseUpdateRequest,
    ) -> Result<Warehouse, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE warehouses
            SET name = COALESCE(?1, name), address = COALESCE(?2, address), updated_at = ?3
            WHERE id = ?4
            "#,
        )
        .bind(req.name.as_deref())
        .bind(req.address.as_deref())
        .bind(Utc::now().to_rfc3339())
        .bind(id.to_string())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Warehouse {} not found", id)));
        }

        self.get_warehouse(id).await
    }

    pub async fn delete_warehouse(&self, id: Uuid) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        let exists: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM warehouses WHERE id = ?1")
            .bind(id.to_string())
            .fetch_one(&mut *tx)
            .await?;
        if exists == 0 {
            return Err(AppError::NotFound(format!("Warehouse {} not found", id)));
        }

        let assets: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM assets WHERE location_kind = 'warehouse' AND location_id = ?1",
        )
        .bind(id.to_string())
        .fetch_one(&mut *tx)
        .await?;
        if assets > 0 {
            return Err(AppError::Conflict(format!(
                "Warehouse {} still holds {} asset(s)",
                id, assets
            )));
        }

        // The ledger is immutable, so a warehouse it mentions must stay resolvable.
        let movements: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM movements
            WHERE (from_kind = 'warehouse' AND from_id = ?1)
               OR (to_kind = 'warehouse' AND to_id = ?1)
            "#,
        )
        .bind(id.to_string())
        .fetch_one(&mut *tx)
        .await?;
        if movements > 0 {
            return Err(AppError::Conflict(format!(
                "Warehouse {} appears in {} movement(s)",
                id, movements
            )));
        }

        sqlx::query("DELETE FROM warehouses WHERE id = ?1")
            .bind(id.to_string())
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }

    /// Check that a warehouse exists; used to vet movement destinations
    pub async fn warehouse_exists(&self, id: Uuid) -> Result<bool, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM warehouses WHERE id = ?1")
            .bind(id.to_string())
            .fetch_one(&self.pool)
            .await?;

        Ok(count > 0)
    }

    // =========================================================================
    // Vendors
    // =========================================================================

    pub async fn create_vendor(&self, req: &VendorCreateRequest) -> Result<Vendor, AppError> {
        let id = Uuid::new_v4();
        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO vendors (id, name, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4)
            "#,
        )
        .bind(id.to_string())
        .bind(&req.name)
        .bind(now.to_rfc3339())
        .bind(now.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(Vendor {
            id,
            name: req.name.clone(),
            created_at: now,
            updated_at: now,
        })
    }

    pub async fn list_vendors(&self) -> Result<Vec<Vendor>, AppError> {
        let rows = sqlx::query_as::<_, VendorRow>(
            "SELECT id, name, created_at, updated_at FROM vendors ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|r| r.into()).collect())
    }

    pub async fn get_vendor(&self, id: Uuid) -> Result<Vendor, AppError> {
        let row = sqlx::query_as::<_, VendorRow>(
            "SELECT id, name, created_at, updated_at FROM vendors WHERE id = ?1",
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into())
            .ok_or_else(|| AppError::NotFound(format!("Vendor {} not found", id)))
    }

    pub async fn update_vendor(
        &self,
        id: Uuid,
        req: &VendorUpdateRequest,
    ) -> Result<Vendor, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE vendors
            SET name = COALESCE(?1, name), updated_at = ?2
            WHERE id = ?3
            "#,
        )
        .bind(req.name.as_deref())
        .bind(Utc::now().to_rfc3339())
        .bind(id.to_string())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Vendor {} not found", id)));
        }

        self.get_vendor(id).await
    }

    pub async fn delete_vendor(&self, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM vendors WHERE id = ?1")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Vendor {} not found", id)));
        }

        Ok(())
    }
}

// ============================================================================
// Database Row Types
// ============================================================================

#[derive(Debug, FromRow)]
struct CompanyRow {
    id: String,
    name: String,
    code: String,
    created_at: String,
    updated_at: String,
}

impl From<CompanyRow> for Company {
    fn from(row: CompanyRow) -> Self {
        Company {
            id: Uuid::parse_str(&row.id).unwrap_or_default(),
            name: row.name,
            code: row.code,
            created_at: parse_timestamp(&row.created_at),
            updated_at: parse_timestamp(&row.updated_at),
        }
    }
}

#[derive(Debug, FromRow)]
struct DeviceTypeRow {
    id: String,
    name: String,
    code: String,
    created_at: String,
    updated_at: String,
}

impl From<DeviceTypeRow> for DeviceType {
    fn from(row: DeviceTypeRow) -> Self {
        DeviceType {
            id: Uuid::parse_str(&row.id).unwrap_or_default(),
            name: row.name,
            code: row.code,
            created_at: parse_timestamp(&row.created_at),
            updated_at: parse_timestamp(&row.updated_at),
        }
    }
}

#[derive(Debug, FromRow)]
struct WarehouseRow {
    id: String,
    name: String,
    address: String,
    created_at: String,
    updated_at: String,
}

impl From<WarehouseRow> for Warehouse {
    fn from(row: WarehouseRow) -> Self {
        Warehouse {
            id: Uuid::parse_str(&row.id).unwrap_or_default(),
            name: row.name,
            address: row.address,
            created_at: parse_timestamp(&row.created_at),
            updated_at: parse_timestamp(&row.updated_at),
        }
    }
}

#[derive(Debug, FromRow)]
struct VendorRow {
    id: String,
    name: String,
    created_at: String,
    updated_at: String,
}

impl From<VendorRow> for Vendor {
    fn from(row: VendorRow) -> Self {
        Vendor {
            id: Uuid::parse_str(&row.id).unwrap_or_default(),
            name: row.name,
            created_at: parse_timestamp(&row.created_at),
            updated_at: parse_timestamp(&row.updated_at),
        }
    }
}

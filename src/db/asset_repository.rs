//! Asset repository
//!
//! Database operations for the asset directory. Registration validates the
//! classification codes and initial location, then generates the next free
//! inventory number for the company/device-type prefix. Two racing
//! registrations can compute the same number; the UNIQUE index turns the
//! loser into a conflict instead of a duplicate.

use chrono::Utc;
use sqlx::{FromRow, SqlitePool};
use uuid::Uuid;

use crate::db::{parse_location, parse_timestamp};
use crate::models::{Asset, AssetCreateRequest, AssetFilter, AssetUpdateRequest, LocationKind};
use crate::utils::{inventory_code, AppError};

pub struct AssetRepository {
    pool: SqlitePool,
}

impl AssetRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Register a new asset, generating its inventory number
    pub async fn create(&self, req: &AssetCreateRequest) -> Result<Asset, AppError> {
        let mut tx = self.pool.begin().await?;

        let company: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM companies WHERE code = ?1")
            .bind(&req.company_code)
            .fetch_one(&mut *tx)
            .await?;
        if company == 0 {
            return Err(AppError::BadRequest(format!(
                "Unknown company code {}",
                req.company_code
            )));
        }

        let device_type: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM device_types WHERE code = ?1")
                .bind(&req.device_type_code)
                .fetch_one(&mut *tx)
                .await?;
        if device_type == 0 {
            return Err(AppError::BadRequest(format!(
                "Unknown device type code {}",
                req.device_type_code
            )));
        }

        let location_table = match req.location.kind {
            LocationKind::Warehouse => "warehouses",
            LocationKind::Employee => "employees",
        };
        let location: i64 = sqlx::query_scalar(&format!(
            "SELECT COUNT(*) FROM {} WHERE id = ?1",
            location_table
        ))
        .bind(req.location.id.to_string())
        .fetch_one(&mut *tx)
        .await?;
        if location == 0 {
            return Err(AppError::BadRequest(format!(
                "Location {} does not exist",
                req.location
            )));
        }

        let prefix = inventory_code::code_prefix(&req.company_code, &req.device_type_code);
        let existing: Vec<String> =
            sqlx::query_scalar("SELECT inventory_number FROM assets WHERE inventory_number LIKE ?1")
                .bind(format!("{}%", prefix))
                .fetch_all(&mut *tx)
                .await?;

        let sequence = inventory_code::next_sequence(existing.iter().map(|s| s.as_str()))
            .ok_or_else(|| {
                AppError::Conflict(format!("Inventory numbers exhausted for prefix {}", prefix))
            })?;
        let inventory_number =
            inventory_code::format_code(&req.company_code, &req.device_type_code, sequence);

        let id = Uuid::new_v4();
        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO assets (
                id, company_code, device_type_code, inventory_number, serial_number,
                vendor, model, location_kind, location_id, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
            "#,
        )
        .bind(id.to_string())
        .bind(&req.company_code)
        .bind(&req.device_type_code)
        .bind(&inventory_number)
        .bind(&req.serial_number)
        .bind(&req.vendor)
        .bind(&req.model)
        .bind(req.location.kind.as_str())
        .bind(req.location.id.to_string())
        .bind(now.to_rfc3339())
        .bind(now.to_rfc3339())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(Asset {
            id,
            company_code: req.company_code.clone(),
            device_type_code: req.device_type_code.clone(),
            inventory_number,
            serial_number: req.serial_number.clone(),
            vendor: req.vendor.clone(),
            model: req.model.clone(),
            location: req.location,
            created_at: now,
            updated_at: now,
        })
    }

    /// List assets matching the filter, ordered by inventory number
    pub async fn list(&self, filter: &AssetFilter) -> Result<Vec<Asset>, AppError> {
        let mut sql = String::from(
            "SELECT id, company_code, device_type_code, inventory_number, serial_number, \
             vendor, model, location_kind, location_id, created_at, updated_at \
             FROM assets WHERE 1=1",
        );
        let mut binds: Vec<String> = Vec::new();

        if let Some(kind) = filter.location_kind {
            sql.push_str(" AND location_kind = ?");
            binds.push(kind.as_str().to_string());
        }
        if let Some(id) = filter.location_id {
            sql.push_str(" AND location_id = ?");
            binds.push(id.to_string());
        }
        if let Some(ref code) = filter.company_code {
            sql.push_str(" AND company_code = ?");
            binds.push(code.clone());
        }
        if let Some(ref code) = filter.device_type_code {
            sql.push_str(" AND device_type_code = ?");
            binds.push(code.clone());
        }
        if let Some(ref q) = filter.q {
            sql.push_str(
                " AND (inventory_number LIKE ? OR serial_number LIKE ? \
                 OR vendor LIKE ? OR model LIKE ?)",
            );
            let pattern = format!("%{}%", q);
            for _ in 0..4 {
                binds.push(pattern.clone());
            }
        }
        sql.push_str(" ORDER BY inventory_number LIMIT ? OFFSET ?");

        let mut query = sqlx::query_as::<_, AssetRow>(&sql);
        for bind in &binds {
            query = query.bind(bind);
        }
        let rows = query
            .bind(filter.page_limit())
            .bind(filter.page_offset())
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(|r| r.into()).collect())
    }

    pub async fn get(&self, id: Uuid) -> Result<Asset, AppError> {
        let row = sqlx::query_as::<_, AssetRow>(
            r#"
            SELECT id, company_code, device_type_code, inventory_number, serial_number,
                   vendor, model, location_kind, location_id, created_at, updated_at
            FROM assets
            WHERE id = ?1
            "#,
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into())
            .ok_or_else(|| AppError::NotFound(format!("Asset {} not found", id)))
    }

    /// Look up an asset by its exact inventory number
    pub async fn find_by_inventory_number(&self, code: &str) -> Result<Option<Asset>, AppError> {
        let row = sqlx::query_as::<_, AssetRow>(
            r#"
            SELECT id, company_code, device_type_code, inventory_number, serial_number,
                   vendor, model, location_kind, location_id, created_at, updated_at
            FROM assets
            WHERE inventory_number = ?1
            "#,
        )
        .bind(code)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| r.into()))
    }

    pub async fn update(&self, id: Uuid, req: &AssetUpdateRequest) -> Result<Asset, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE assets
            SET serial_number = COALESCE(?1, serial_number),
                vendor = COALESCE(?2, vendor),
                model = COALESCE(?3, model),
                updated_at = ?4
            WHERE id = ?5
            "#,
        )
        .bind(req.serial_number.as_deref())
        .bind(req.vendor.as_deref())
        .bind(req.model.as_deref())
        .bind(Utc::now().to_rfc3339())
        .bind(id.to_string())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Asset {} not found", id)));
        }

        self.get(id).await
    }
}

// ============================================================================
// Database Row Types
// ============================================================================

#[derive(Debug, FromRow)]
pub(crate) struct AssetRow {
    pub(crate) id: String,
    pub(crate) company_code: String,
    pub(crate) device_type_code: String,
    pub(crate) inventory_number: String,
    pub(crate) serial_number: String,
    pub(crate) vendor: String,
    pub(crate) model: String,
    pub(crate) location_kind: String,
    pub(crate) location_id: String,
    pub(crate) created_at: String,
    pub(crate) updated_at: String,
}

impl From<AssetRow> for Asset {
    fn from(row: AssetRow) -> Self {
        Asset {
            id: Uuid::parse_str(&row.id).unwrap_or_default(),
            company_code: row.company_code,
            device_type_code: row.device_type_code,
            inventory_number: row.inventory_number,
            serial_number: row.serial_number,
            vendor: row.vendor,
            model: row.model,
            location: parse_location(&row.location_kind, &row.location_id),
            created_at: parse_timestamp(&row.created_at),
            updated_at: parse_timestamp(&row.updated_at),
        }
    }
}

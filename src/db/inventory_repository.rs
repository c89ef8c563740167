//! Inventory audit repository
//!
//! Sessions, their optional device-type scope and the per-asset results.
//! Recording a result runs in one transaction so the open-session check,
//! the scope check and the upsert see the same state; completion uses a
//! conditional update so a session can close exactly once.

use chrono::Utc;
use sqlx::{FromRow, SqlitePool};
use uuid::Uuid;

use crate::db::asset_repository::AssetRow;
use crate::db::{parse_location, parse_timestamp};
use crate::models::{
    Asset, CheckedResult, InventoryResult, InventorySession, LocationKind, LocationRef,
    RecordResultRequest, SessionCreateRequest, SessionProgress,
};
use crate::utils::AppError;

/// Scope filter shared by the total count and the remaining listing: a
/// session with no scope rows covers every asset.
const IN_SCOPE: &str = "(NOT EXISTS (SELECT 1 FROM inventory_session_scope s WHERE s.session_id = ?1) \
     OR a.device_type_code IN (SELECT device_type_code FROM inventory_session_scope s WHERE s.session_id = ?1))";

pub struct InventoryRepository {
    pool: SqlitePool,
}

impl InventoryRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Open a new audit session
    pub async fn create_session(
        &self,
        req: &SessionCreateRequest,
    ) -> Result<InventorySession, AppError> {
        let mut codes = req.device_type_codes.clone();
        codes.sort();
        codes.dedup();

        let mut tx = self.pool.begin().await?;

        for code in &codes {
            let known: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM device_types WHERE code = ?1")
                .bind(code)
                .fetch_one(&mut *tx)
                .await?;
            if known == 0 {
                return Err(AppError::BadRequest(format!(
                    "Unknown device type code {}",
                    code
                )));
            }
        }

        let id = Uuid::new_v4();
        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO inventory_sessions (id, description, started_at, completed_at)
            VALUES (?1, ?2, ?3, NULL)
            "#,
        )
        .bind(id.to_string())
        .bind(req.description.as_deref())
        .bind(now.to_rfc3339())
        .execute(&mut *tx)
        .await?;

        for code in &codes {
            sqlx::query(
                "INSERT INTO inventory_session_scope (session_id, device_type_code) VALUES (?1, ?2)",
            )
            .bind(id.to_string())
            .bind(code)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(InventorySession {
            id,
            description: req.description.clone(),
            device_type_codes: codes,
            started_at: now,
            completed_at: None,
        })
    }

    /// All sessions, newest first
    pub async fn list_sessions(&self) -> Result<Vec<InventorySession>, AppError> {
        let rows = sqlx::query_as::<_, SessionRow>(
            r#"
            SELECT id, description, started_at, completed_at
            FROM inventory_sessions
            ORDER BY datetime(started_at) DESC, rowid DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let mut sessions = Vec::with_capacity(rows.len());
        for row in rows {
            let codes = fetch_scope(&self.pool, &row.id).await?;
            sessions.push(row.into_session(codes));
        }
        Ok(sessions)
    }

    pub async fn get_session(&self, id: Uuid) -> Result<InventorySession, AppError> {
        let row = sqlx::query_as::<_, SessionRow>(
            r#"
            SELECT id, description, started_at, completed_at
            FROM inventory_sessions
            WHERE id = ?1
            "#,
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Inventory session {} not found", id)))?;

        let codes = fetch_scope(&self.pool, &row.id).await?;
        Ok(row.into_session(codes))
    }

    /// Close a session. Closing is one-shot: a second call fails.
    pub async fn complete_session(&self, id: Uuid) -> Result<InventorySession, AppError> {
        let now = Utc::now();
        let result = sqlx::query(
            r#"
            UPDATE inventory_sessions
            SET completed_at = ?1
            WHERE id = ?2 AND completed_at IS NULL
            "#,
        )
        .bind(now.to_rfc3339())
        .bind(id.to_string())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            let exists: i64 =
                sqlx::query_scalar("SELECT COUNT(*) FROM inventory_sessions WHERE id = ?1")
                    .bind(id.to_string())
                    .fetch_one(&self.pool)
                    .await?;
            if exists > 0 {
                return Err(AppError::SessionAlreadyClosed(format!(
                    "Inventory session {} is already completed",
                    id
                )));
            }
            return Err(AppError::NotFound(format!(
                "Inventory session {} not found",
                id
            )));
        }

        self.get_session(id).await
    }

    /// Counting progress: how many in-scope assets have a result
    pub async fn progress(&self, id: Uuid) -> Result<SessionProgress, AppError> {
        // Existence check doubles as the 404.
        self.get_session(id).await?;

        let total: i64 =
            sqlx::query_scalar(&format!("SELECT COUNT(*) FROM assets a WHERE {}", IN_SCOPE))
                .bind(id.to_string())
                .fetch_one(&self.pool)
                .await?;

        let checked: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM inventory_results WHERE session_id = ?1")
                .bind(id.to_string())
                .fetch_one(&self.pool)
                .await?;

        Ok(SessionProgress {
            session_id: id,
            checked,
            total,
            remaining: total - checked,
        })
    }

    /// In-scope assets with no result yet, ordered by inventory number
    pub async fn remaining_assets(&self, id: Uuid) -> Result<Vec<Asset>, AppError> {
        self.get_session(id).await?;

        let sql = format!(
            "SELECT a.id, a.company_code, a.device_type_code, a.inventory_number, \
             a.serial_number, a.vendor, a.model, a.location_kind, a.location_id, \
             a.created_at, a.updated_at \
             FROM assets a \
             WHERE a.id NOT IN (SELECT asset_id FROM inventory_results WHERE session_id = ?1) \
               AND {} \
             ORDER BY a.inventory_number",
            IN_SCOPE
        );
        let rows = sqlx::query_as::<_, AssetRow>(&sql)
            .bind(id.to_string())
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(|r| r.into()).collect())
    }

    /// Recorded results with their assets, in confirmation order
    pub async fn checked_results(&self, id: Uuid) -> Result<Vec<CheckedResult>, AppError> {
        self.get_session(id).await?;

        let rows = sqlx::query_as::<_, CheckedRow>(
            r#"
            SELECT r.id AS result_id, r.found, r.observed_location_kind,
                   r.observed_location_id, r.confirmed_at,
                   a.id, a.company_code, a.device_type_code, a.inventory_number,
                   a.serial_number, a.vendor, a.model, a.location_kind, a.location_id,
                   a.created_at, a.updated_at
            FROM inventory_results r
            JOIN assets a ON a.id = r.asset_id
            WHERE r.session_id = ?1
            ORDER BY datetime(r.confirmed_at) ASC, r.rowid ASC
            "#,
        )
        .bind(id.to_string())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| CheckedResult {
                id: Uuid::parse_str(&row.result_id).unwrap_or_default(),
                found: row.found,
                observed_location: parse_observed(
                    row.observed_location_kind.as_deref(),
                    row.observed_location_id.as_deref(),
                ),
                confirmed_at: parse_timestamp(&row.confirmed_at),
                asset: row.asset.into(),
            })
            .collect())
    }

    /// Record (or overwrite) the determination for one asset in one session
    ///
    /// Re-scanning the same asset replaces the earlier row in place; the
    /// result id and the one-row-per-asset invariant survive the overwrite.
    pub async fn record_result(
        &self,
        session_id: Uuid,
        req: &RecordResultRequest,
    ) -> Result<InventoryResult, AppError> {
        let mut tx = self.pool.begin().await?;

        let session = sqlx::query_as::<_, SessionRow>(
            r#"
            SELECT id, description, started_at, completed_at
            FROM inventory_sessions
            WHERE id = ?1
            "#,
        )
        .bind(session_id.to_string())
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Inventory session {} not found", session_id)))?;

        if session.completed_at.is_some() {
            return Err(AppError::SessionClosed(format!(
                "Inventory session {} is completed; results are frozen",
                session_id
            )));
        }

        let asset = sqlx::query_as::<_, AssetRow>(
            r#"
            SELECT id, company_code, device_type_code, inventory_number, serial_number,
                   vendor, model, location_kind, location_id, created_at, updated_at
            FROM assets
            WHERE id = ?1
            "#,
        )
        .bind(req.asset_id.to_string())
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Asset {} not found", req.asset_id)))?;

        let scope_rows: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM inventory_session_scope WHERE session_id = ?1",
        )
        .bind(session_id.to_string())
        .fetch_one(&mut *tx)
        .await?;
        if scope_rows > 0 {
            let in_scope: i64 = sqlx::query_scalar(
                r#"
                SELECT COUNT(*) FROM inventory_session_scope
                WHERE session_id = ?1 AND device_type_code = ?2
                "#,
            )
            .bind(session_id.to_string())
            .bind(&asset.device_type_code)
            .fetch_one(&mut *tx)
            .await?;
            if in_scope == 0 {
                return Err(AppError::BadRequest(format!(
                    "Asset {} is outside the session scope",
                    asset.inventory_number
                )));
            }
        }

        // A missing asset has no meaningful location; a found asset defaults
        // to the place the directory already believes it is.
        let observed = if req.found {
            match req.observed_location {
                Some(location) => {
                    let table = match location.kind {
                        LocationKind::Warehouse => "warehouses",
                        LocationKind::Employee => "employees",
                    };
                    let known: i64 =
                        sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {} WHERE id = ?1", table))
                            .bind(location.id.to_string())
                            .fetch_one(&mut *tx)
                            .await?;
                    if known == 0 {
                        return Err(AppError::BadRequest(format!(
                            "Observed location {} does not exist",
                            location
                        )));
                    }
                    Some(location)
                }
                None => Some(parse_location(&asset.location_kind, &asset.location_id)),
            }
        } else {
            None
        };

        let now = Utc::now();
        sqlx::query(
            r#"
            INSERT INTO inventory_results (
                id, session_id, asset_id, found,
                observed_location_kind, observed_location_id, confirmed_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            ON CONFLICT(session_id, asset_id) DO UPDATE SET
                found = excluded.found,
                observed_location_kind = excluded.observed_location_kind,
                observed_location_id = excluded.observed_location_id,
                confirmed_at = excluded.confirmed_at
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(session_id.to_string())
        .bind(req.asset_id.to_string())
        .bind(req.found)
        .bind(observed.map(|l| l.kind.as_str()))
        .bind(observed.map(|l| l.id.to_string()))
        .bind(now.to_rfc3339())
        .execute(&mut *tx)
        .await?;

        let row = sqlx::query_as::<_, ResultRow>(
            r#"
            SELECT id, session_id, asset_id, found,
                   observed_location_kind, observed_location_id, confirmed_at
            FROM inventory_results
            WHERE session_id = ?1 AND asset_id = ?2
            "#,
        )
        .bind(session_id.to_string())
        .bind(req.asset_id.to_string())
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(row.into())
    }
}

async fn fetch_scope<'e, E>(executor: E, session_id: &str) -> Result<Vec<String>, AppError>
where
    E: sqlx::SqliteExecutor<'e>,
{
    let codes: Vec<String> = sqlx::query_scalar(
        r#"
        SELECT device_type_code FROM inventory_session_scope
        WHERE session_id = ?1
        ORDER BY device_type_code
        "#,
    )
    .bind(session_id)
    .fetch_all(executor)
    .await?;

    Ok(codes)
}

fn parse_observed(kind: Option<&str>, id: Option<&str>) -> Option<LocationRef> {
    match (kind, id) {
        (Some(kind), Some(id)) => Some(parse_location(kind, id)),
        _ => None,
    }
}

// ============================================================================
// Database Row Types
// ============================================================================

#[derive(Debug, FromRow)]
struct SessionRow {
    id: String,
    description: Option<String>,
    started_at: String,
    completed_at: Option<String>,
}

impl SessionRow {
    fn into_session(self, device_type_codes: Vec<String>) -> InventorySession {
        InventorySession {
            id: Uuid::parse_str(&self.id).unwrap_or_default(),
            description: self.description,
            device_type_codes,
            started_at: parse_timestamp(&self.started_at),
            completed_at: self.completed_at.as_deref().map(parse_timestamp),
        }
    }
}

#[derive(Debug, FromRow)]
struct ResultRow {
    id: String,
    session_id: String,
    asset_id: String,
    found: bool,
    observed_location_kind: Option<String>,
    observed_location_id: Option<String>,
    confirmed_at: String,
}

impl From<ResultRow> for InventoryResult {
    fn from(row: ResultRow) -> Self {
        InventoryResult {
            id: Uuid::parse_str(&row.id).unwrap_or_default(),
            session_id: Uuid::parse_str(&row.session_id).unwrap_or_default(),
            asset_id: Uuid::parse_str(&row.asset_id).unwrap_or_default(),
            found: row.found,
            observed_location: parse_observed(
                row.observed_location_kind.as_deref(),
                row.observed_location_id.as_deref(),
            ),
            confirmed_at: parse_timestamp(&row.confirmed_at),
        }
    }
}

#[derive(Debug, FromRow)]
struct CheckedRow {
    result_id: String,
    found: bool,
    observed_location_kind: Option<String>,
    observed_location_id: Option<String>,
    confirmed_at: String,
    #[sqlx(flatten)]
    asset: AssetRow,
}

//! Movement repository
//!
//! The movement ledger is append-only. A relocation writes the ledger entry
//! and flips the asset's location in one transaction; the asset update is a
//! compare-and-set against the location the caller saw, so two racing
//! relocations cannot both chain off the same `from`.

use chrono::Utc;
use sqlx::{FromRow, SqlitePool};
use tracing::error;
use uuid::Uuid;

use crate::db::{parse_location, parse_timestamp};
use crate::models::{Asset, LocationRef, Movement};
use crate::utils::AppError;

pub struct MovementRepository {
    pool: SqlitePool,
}

impl MovementRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Append a ledger entry and move the asset, atomically
    ///
    /// `asset` is the state the caller resolved; if the asset has moved in
    /// the meantime the compare-and-set misses and the whole transaction
    /// rolls back with a conflict.
    pub async fn relocate(&self, asset: &Asset, to: LocationRef) -> Result<Movement, AppError> {
        let mut tx = self.pool.begin().await?;

        let id = Uuid::new_v4();
        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO movements (id, asset_id, from_kind, from_id, to_kind, to_id, moved_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(id.to_string())
        .bind(asset.id.to_string())
        .bind(asset.location.kind.as_str())
        .bind(asset.location.id.to_string())
        .bind(to.kind.as_str())
        .bind(to.id.to_string())
        .bind(now.to_rfc3339())
        .execute(&mut *tx)
        .await?;

        let updated = sqlx::query(
            r#"
            UPDATE assets
            SET location_kind = ?1, location_id = ?2, updated_at = ?3
            WHERE id = ?4 AND location_kind = ?5 AND location_id = ?6
            "#,
        )
        .bind(to.kind.as_str())
        .bind(to.id.to_string())
        .bind(now.to_rfc3339())
        .bind(asset.id.to_string())
        .bind(asset.location.kind.as_str())
        .bind(asset.location.id.to_string())
        .execute(&mut *tx)
        .await?;

        if updated.rows_affected() == 0 {
            let still_there: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM assets WHERE id = ?1")
                .bind(asset.id.to_string())
                .fetch_one(&mut *tx)
                .await?;

            // Dropping the transaction rolls the ledger entry back out.
            if still_there > 0 {
                return Err(AppError::Conflict(format!(
                    "Asset {} was moved concurrently",
                    asset.inventory_number
                )));
            }
            error!(
                asset_id = %asset.id,
                "asset row vanished while relocating; ledger entry rolled back"
            );
            return Err(AppError::PartialFailure(format!(
                "Asset {} disappeared during relocation",
                asset.inventory_number
            )));
        }

        tx.commit().await?;

        Ok(Movement {
            id,
            asset_id: asset.id,
            from: asset.location,
            to,
            moved_at: now,
        })
    }

    /// Full movement history for one asset, oldest first
    pub async fn history_for(&self, asset_id: Uuid) -> Result<Vec<Movement>, AppError> {
        let rows = sqlx::query_as::<_, MovementRow>(
            r#"
            SELECT id, asset_id, from_kind, from_id, to_kind, to_id, moved_at
            FROM movements
            WHERE asset_id = ?1
            ORDER BY datetime(moved_at) ASC, rowid ASC
            "#,
        )
        .bind(asset_id.to_string())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|r| r.into()).collect())
    }
}

// ============================================================================
// Database Row Types
// ============================================================================

#[derive(Debug, FromRow)]
struct MovementRow {
    id: String,
    asset_id: String,
    from_kind: String,
    from_id: String,
    to_kind: String,
    to_id: String,
    moved_at: String,
}

impl From<MovementRow> for Movement {
    fn from(row: MovementRow) -> Self {
        Movement {
            id: Uuid::parse_str(&row.id).unwrap_or_default(),
            asset_id: Uuid::parse_str(&row.asset_id).unwrap_or_default(),
            from: parse_location(&row.from_kind, &row.from_id),
            to: parse_location(&row.to_kind, &row.to_id),
            moved_at: parse_timestamp(&row.moved_at),
        }
    }
}

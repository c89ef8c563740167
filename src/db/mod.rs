//! Database layer
//!
//! This module handles SQLite storage for:
//! - The asset directory and its reference data (companies, device types,
//!   warehouses, vendors, employees)
//! - The movement ledger
//! - Inventory audit sessions and their per-asset results
//! - User accounts for API authentication

pub mod asset_repository;
pub mod employee_repository;
pub mod inventory_repository;
pub mod movement_repository;
pub mod reference_repository;
pub mod user_repository;

use std::str::FromStr;
use std::time::Duration;

use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::{Pool, Sqlite};
use uuid::Uuid;

use crate::config::DatabaseConfig;
use crate::models::{LocationKind, LocationRef};

/// Database connection pool type
pub type DbPool = Pool<Sqlite>;

/// Initialize the database connection pool and run pending migrations
pub async fn init_pool(config: &DatabaseConfig) -> Result<DbPool> {
    let options = SqliteConnectOptions::from_str(&config.url)?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .synchronous(SqliteSynchronous::Normal)
        .busy_timeout(Duration::from_secs(config.connect_timeout_secs))
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.connect_timeout_secs))
        .idle_timeout(Duration::from_secs(config.idle_timeout_secs))
        .connect_with(options)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    Ok(pool)
}

/// Cheap liveness probe used by the readiness endpoint
pub async fn ping(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query_scalar::<_, i64>("SELECT 1").fetch_one(pool).await?;
    Ok(())
}

/// Parse a stored RFC3339 timestamp, falling back to now on malformed data
pub(crate) fn parse_timestamp(value: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

/// Rebuild a location reference from its stored kind and id columns
pub(crate) fn parse_location(kind: &str, id: &str) -> LocationRef {
    LocationRef {
        kind: LocationKind::parse(kind).unwrap_or(LocationKind::Warehouse),
        id: Uuid::parse_str(id).unwrap_or_default(),
    }
}

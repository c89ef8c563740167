//! AssetTrack Library
//!
//! This crate provides the core functionality for the AssetTrack backend:
//! an asset directory, an append-only movement ledger and a physical
//! inventory audit workflow on top of SQLite.

pub mod api;
pub mod config;
pub mod db;
pub mod middleware;
pub mod models;
pub mod services;
pub mod utils;

pub use config::AppConfig;
pub use db::DbPool;
pub use middleware::{auth_middleware, AuthUser, Claims};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: AppConfig,
    /// Database connection pool
    pub db: DbPool,
}

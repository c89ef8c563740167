//! Inventory audit models
//!
//! A session is one bounded physical count: opened, scanned against, then
//! closed exactly once. Results record the found/not-found determination per
//! asset, at most one row per (session, asset).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::{Asset, LocationRef};

/// A physical-count session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventorySession {
    pub id: Uuid,
    pub description: Option<String>,
    /// Device-type codes limiting the count; empty means every asset is in scope
    pub device_type_codes: Vec<String>,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl InventorySession {
    /// A session is closed once its completion timestamp is set
    pub fn is_closed(&self) -> bool {
        self.completed_at.is_some()
    }
}

/// Request to open a new session
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SessionCreateRequest {
    #[validate(length(max = 500))]
    pub description: Option<String>,
    #[serde(default)]
    pub device_type_codes: Vec<String>,
}

/// Found/not-found determination for one asset in one session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryResult {
    pub id: Uuid,
    pub session_id: Uuid,
    pub asset_id: Uuid,
    pub found: bool,
    pub observed_location: Option<LocationRef>,
    pub confirmed_at: DateTime<Utc>,
}

/// Request to record (or overwrite) a scan determination
#[derive(Debug, Clone, Deserialize)]
pub struct RecordResultRequest {
    pub asset_id: Uuid,
    pub found: bool,
    /// Where the asset was actually seen; only meaningful when `found` is true
    pub observed_location: Option<LocationRef>,
}

/// Counting progress for one session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionProgress {
    pub session_id: Uuid,
    pub checked: i64,
    pub total: i64,
    pub remaining: i64,
}

/// A recorded result joined with its asset, for the checked listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckedResult {
    pub id: Uuid,
    pub found: bool,
    pub observed_location: Option<LocationRef>,
    pub confirmed_at: DateTime<Utc>,
    pub asset: Asset,
}

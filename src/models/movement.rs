//! Movement models
//!
//! A movement is one immutable entry in the relocation ledger. For any asset
//! the entries chain without gaps: each movement's `from` equals the previous
//! movement's `to` (or the location the asset was created with).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::LocationRef;

/// One relocation of one asset
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Movement {
    pub id: Uuid,
    pub asset_id: Uuid,
    pub from: LocationRef,
    pub to: LocationRef,
    pub moved_at: DateTime<Utc>,
}

/// Request to relocate an asset
#[derive(Debug, Clone, Deserialize)]
pub struct MovementRequest {
    pub asset_id: Uuid,
    pub to: LocationRef,
}

//! Inventory audit service
//!
//! The counting workflow: open a session (optionally scoped to device
//! types), resolve scanned codes to assets, record found/not-found
//! determinations, watch progress, and close the session exactly once.
//! Results never relocate anything; a mismatch between the observed and
//! recorded location is surfaced data, not a correction.

use sqlx::SqlitePool;

use crate::db::asset_repository::AssetRepository;
use crate::db::inventory_repository::InventoryRepository;
use crate::models::{
    Asset, CheckedResult, InventoryResult, InventorySession, RecordResultRequest,
    SessionCreateRequest, SessionProgress,
};
use crate::utils::AppError;

pub struct AuditService {
    inventory: InventoryRepository,
    assets: AssetRepository,
}

impl AuditService {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            inventory: InventoryRepository::new(pool.clone()),
            assets: AssetRepository::new(pool),
        }
    }

    /// Open a new counting session
    pub async fn start_session(
        &self,
        req: &SessionCreateRequest,
    ) -> Result<InventorySession, AppError> {
        self.inventory.create_session(req).await
    }

    pub async fn list_sessions(&self) -> Result<Vec<InventorySession>, AppError> {
        self.inventory.list_sessions().await
    }

    pub async fn get_session(&self, id: uuid::Uuid) -> Result<InventorySession, AppError> {
        self.inventory.get_session(id).await
    }

    /// Close a session; a second completion attempt fails
    pub async fn complete_session(&self, id: uuid::Uuid) -> Result<InventorySession, AppError> {
        self.inventory.complete_session(id).await
    }

    /// checked / total / remaining for the session's scope
    pub async fn progress(&self, id: uuid::Uuid) -> Result<SessionProgress, AppError> {
        self.inventory.progress(id).await
    }

    /// In-scope assets not yet counted
    pub async fn list_remaining(&self, id: uuid::Uuid) -> Result<Vec<Asset>, AppError> {
        self.inventory.remaining_assets(id).await
    }

    /// Recorded determinations in confirmation order
    pub async fn list_checked(&self, id: uuid::Uuid) -> Result<Vec<CheckedResult>, AppError> {
        self.inventory.checked_results(id).await
    }

    /// Resolve a scanned or hand-typed inventory number to its asset
    ///
    /// Scanner input arrives with stray whitespace; the code is trimmed
    /// before the exact-match lookup.
    pub async fn resolve_code(&self, code: &str) -> Result<Asset, AppError> {
        let code = code.trim();
        if code.is_empty() {
            return Err(AppError::BadRequest("Scan code is empty".to_string()));
        }

        self.assets
            .find_by_inventory_number(code)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("No asset with inventory number {}", code)))
    }

    /// Record (or overwrite) one asset's determination in an open session
    pub async fn record_result(
        &self,
        session_id: uuid::Uuid,
        req: &RecordResultRequest,
    ) -> Result<InventoryResult, AppError> {
        self.inventory.record_result(session_id, req).await
    }
}

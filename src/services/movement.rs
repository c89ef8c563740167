//! Movement service
//!
//! Vets a relocation request before the ledger write: the asset must
//! exist, the destination must resolve to a real warehouse or employee,
//! and moving an asset onto itself is rejected rather than recorded.

use sqlx::SqlitePool;

use crate::db::asset_repository::AssetRepository;
use crate::db::employee_repository::EmployeeRepository;
use crate::db::movement_repository::MovementRepository;
use crate::db::reference_repository::ReferenceRepository;
use crate::models::{LocationKind, Movement, MovementRequest};
use crate::utils::AppError;

pub struct MovementService {
    movements: MovementRepository,
    assets: AssetRepository,
    references: ReferenceRepository,
    employees: EmployeeRepository,
}

impl MovementService {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            movements: MovementRepository::new(pool.clone()),
            assets: AssetRepository::new(pool.clone()),
            references: ReferenceRepository::new(pool.clone()),
            employees: EmployeeRepository::new(pool),
        }
    }

    /// Relocate an asset, appending to its ledger
    pub async fn relocate(&self, req: &MovementRequest) -> Result<Movement, AppError> {
        let asset = self.assets.get(req.asset_id).await?;

        let destination_exists = match req.to.kind {
            LocationKind::Warehouse => self.references.warehouse_exists(req.to.id).await?,
            LocationKind::Employee => self.employees.exists(req.to.id).await?,
        };
        if !destination_exists {
            return Err(AppError::InvalidDestination(format!(
                "Destination {} does not exist",
                req.to
            )));
        }

        if asset.location == req.to {
            return Err(AppError::NoOpMove(format!(
                "Asset {} is already at {}",
                asset.inventory_number, req.to
            )));
        }

        self.movements.relocate(&asset, req.to).await
    }

    /// Full history for one asset, oldest first
    pub async fn history_for(&self, asset_id: uuid::Uuid) -> Result<Vec<Movement>, AppError> {
        // Unknown assets 404 instead of returning an empty ledger.
        self.assets.get(asset_id).await?;
        self.movements.history_for(asset_id).await
    }
}

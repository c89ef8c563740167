//! Asset models
//!
//! An asset is a tracked physical device. Its classification (company code,
//! device-type code) and generated inventory number are fixed at creation;
//! the current location is a tagged union over warehouses and employees and
//! changes only through the movement ledger.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Kind of place an asset can live in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocationKind {
    Warehouse,
    Employee,
}

impl LocationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LocationKind::Warehouse => "warehouse",
            LocationKind::Employee => "employee",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "warehouse" => Some(LocationKind::Warehouse),
            "employee" => Some(LocationKind::Employee),
            _ => None,
        }
    }
}

impl std::fmt::Display for LocationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A concrete location: a warehouse or an employee, by id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationRef {
    pub kind: LocationKind,
    pub id: Uuid,
}

impl LocationRef {
    pub fn warehouse(id: Uuid) -> Self {
        Self {
            kind: LocationKind::Warehouse,
            id,
        }
    }

    pub fn employee(id: Uuid) -> Self {
        Self {
            kind: LocationKind::Employee,
            id,
        }
    }
}

impl std::fmt::Display for LocationRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.kind, self.id)
    }
}

/// Asset entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Asset {
    pub id: Uuid,
    pub company_code: String,
    pub device_type_code: String,
    pub inventory_number: String,
    pub serial_number: String,
    pub vendor: String,
    pub model: String,
    pub location: LocationRef,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Compact asset view embedded in movement history and employee listings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetSummary {
    pub id: Uuid,
    pub inventory_number: String,
    pub serial_number: String,
    pub vendor: String,
    pub model: String,
}

impl From<Asset> for AssetSummary {
    fn from(asset: Asset) -> Self {
        Self {
            id: asset.id,
            inventory_number: asset.inventory_number,
            serial_number: asset.serial_number,
            vendor: asset.vendor,
            model: asset.model,
        }
    }
}

impl From<&Asset> for AssetSummary {
    fn from(asset: &Asset) -> Self {
        Self {
            id: asset.id,
            inventory_number: asset.inventory_number.clone(),
            serial_number: asset.serial_number.clone(),
            vendor: asset.vendor.clone(),
            model: asset.model.clone(),
        }
    }
}

/// Request to register a new asset; the inventory number is generated
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AssetCreateRequest {
    pub company_code: String,
    pub device_type_code: String,
    #[validate(length(min = 1, max = 100))]
    pub serial_number: String,
    #[serde(default)]
    #[validate(length(max = 100))]
    pub vendor: String,
    #[serde(default)]
    #[validate(length(max = 100))]
    pub model: String,
    pub location: LocationRef,
}

/// Request to update an asset's mutable fields. Classification, inventory
/// number and location are deliberately absent: the first two are fixed and
/// the location changes only via movements.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AssetUpdateRequest {
    #[validate(length(min = 1, max = 100))]
    pub serial_number: Option<String>,
    #[validate(length(max = 100))]
    pub vendor: Option<String>,
    #[validate(length(max = 100))]
    pub model: Option<String>,
}

/// List filters for the asset directory
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AssetFilter {
    pub location_kind: Option<LocationKind>,
    pub location_id: Option<Uuid>,
    pub company_code: Option<String>,
    pub device_type_code: Option<String>,
    /// Substring match on inventory number, serial number, vendor or model
    pub q: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl AssetFilter {
    /// Page size clamped to a sane window
    pub fn page_limit(&self) -> i64 {
        self.limit.unwrap_or(100).clamp(1, 1000)
    }

    pub fn page_offset(&self) -> i64 {
        self.offset.unwrap_or(0).max(0)
    }
}

//! Reference data models: companies, device types, warehouses, vendors
//!
//! Company and device-type codes feed the generated inventory numbers, so
//! both codes are immutable after creation; only display fields update.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Company entity; `code` is three uppercase letters (e.g. `WWP`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Company {
    pub id: Uuid,
    pub name: String,
    pub code: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CompanyCreateRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    pub code: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CompanyUpdateRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
}

/// Device-type entity; `code` is two digits (e.g. `01`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceType {
    pub id: Uuid,
    pub name: String,
    pub code: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct DeviceTypeCreateRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    pub code: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct DeviceTypeUpdateRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
}

/// Warehouse entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Warehouse {
    pub id: Uuid,
    pub name: String,
    pub address: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct WarehouseCreateRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[serde(default)]
    #[validate(length(max = 500))]
    pub address: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct WarehouseUpdateRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    #[validate(length(max = 500))]
    pub address: Option<String>,
}

/// Vendor entity. Assets carry vendor as free text; this list feeds pickers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vendor {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct VendorCreateRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct VendorUpdateRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
}

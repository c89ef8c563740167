//! Employee models
//!
//! Employees double as asset locations. The status transition to
//! `terminated` is guarded: it is rejected while the employee still holds
//! assets, and the rejection carries the held assets so the caller can offer
//! bulk reassignment.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::{AssetSummary, LocationRef};

/// Employment status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmployeeStatus {
    Working,
    Terminated,
}

impl EmployeeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EmployeeStatus::Working => "working",
            EmployeeStatus::Terminated => "terminated",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "working" => Some(EmployeeStatus::Working),
            "terminated" => Some(EmployeeStatus::Terminated),
            _ => None,
        }
    }
}

impl std::fmt::Display for EmployeeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Employee entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Employee {
    pub id: Uuid,
    pub name: String,
    pub phone: String,
    pub position: Option<String>,
    pub status: EmployeeStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request to register an employee
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct EmployeeCreateRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    pub phone: String,
    #[validate(length(max = 200))]
    pub position: Option<String>,
}

/// Request to update employee profile fields. Status is not here: status
/// transitions go through the dedicated status endpoint so the termination
/// guard has a single enforcement point.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct EmployeeUpdateRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    pub phone: Option<String>,
    #[validate(length(max = 200))]
    pub position: Option<String>,
}

/// Request to change an employee's status
#[derive(Debug, Clone, Deserialize)]
pub struct StatusChangeRequest {
    pub status: EmployeeStatus,
}

/// An asset currently held by an employee, with when it was assigned
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeldAsset {
    pub assigned_at: DateTime<Utc>,
    pub asset: AssetSummary,
}

/// Outcome of a status-change request
#[derive(Debug, Clone)]
pub enum StatusChangeOutcome {
    /// The change was applied
    Applied(Employee),
    /// Termination was rejected; the employee still holds these assets
    Blocked(Vec<HeldAsset>),
}

/// Direction of a movement relative to one employee
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetEventAction {
    /// The employee received the asset
    Assigned,
    /// The asset left the employee
    Unassigned,
}

impl AssetEventAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetEventAction::Assigned => "assigned",
            AssetEventAction::Unassigned => "unassigned",
        }
    }
}

/// One movement seen from an employee's point of view
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeeAssetEvent {
    pub id: Uuid,
    pub moved_at: DateTime<Utc>,
    pub action: AssetEventAction,
    pub from: LocationRef,
    pub to: LocationRef,
    pub asset: AssetSummary,
}

//! Maintenance record model and related types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Maintenance record for one intervention on one equipment unit.
/// Stored under a generated uuid as document key. Carries no invariant
/// tying it to contract state.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MaintenanceRecord {
    pub id: String,
    /// Intervention type label (e.g. "Preventive", "Corrective")
    pub maintenance_type: String,
    pub date: NaiveDate,
    pub equipment_id: String,
    pub client_id: String,
    pub technician: String,
    /// Free-text detail of the work performed
    pub detail: String,
}

/// Create maintenance record request
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateMaintenanceRecord {
    pub maintenance_type: String,
    pub date: NaiveDate,
    pub equipment_id: String,
    pub client_id: String,
    pub technician: String,
    pub detail: String,
}

/// Maintenance list filter
#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct MaintenanceQuery {
    /// Restrict to records for this client
    pub client_id: Option<String>,
}

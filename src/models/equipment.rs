//! Equipment (forklift / crane unit) model and related types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::maintenance::MaintenanceRecord;

/// Equipment record. Stored under its unit `id` as document key.
///
/// `assigned_client_id` is `None` while the unit sits in stock; while a
/// contract is active it holds the client's business name.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Equipment {
    /// Unit id, caller-assigned, unique
    pub id: String,
    /// Equipment type label (e.g. "Forklift", "Crane")
    pub equipment_type: String,
    pub model: String,
    pub serial_number: String,
    #[serde(default)]
    pub assigned_client_id: Option<String>,
    #[serde(default)]
    pub next_maintenance: Option<NaiveDate>,
    /// Ids of maintenance records performed on this unit
    #[serde(default)]
    pub maintenance_ids: Vec<String>,
    // Battery / charger sheet, filled in for electric units
    #[serde(default)]
    pub battery_model: Option<String>,
    #[serde(default)]
    pub battery_year: Option<String>,
    #[serde(default)]
    pub battery_plug: Option<String>,
    #[serde(default)]
    pub charger_model: Option<String>,
    #[serde(default)]
    pub charger_serial: Option<String>,
    #[serde(default)]
    pub charger_plug: Option<String>,
}

impl Equipment {
    /// Whether the unit is currently on contract with any client
    pub fn is_assigned(&self) -> bool {
        self.assigned_client_id.is_some()
    }
}

/// Create equipment request
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateEquipment {
    /// Unit id, used as the record key
    pub id: String,
    pub equipment_type: String,
    pub model: String,
    pub serial_number: String,
    pub next_maintenance: Option<NaiveDate>,
    pub battery_model: Option<String>,
    pub battery_year: Option<String>,
    pub battery_plug: Option<String>,
    pub charger_model: Option<String>,
    pub charger_serial: Option<String>,
    pub charger_plug: Option<String>,
}

/// Update equipment request; omitted fields are left unchanged
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateEquipment {
    pub equipment_type: Option<String>,
    pub model: Option<String>,
    pub serial_number: Option<String>,
    pub next_maintenance: Option<NaiveDate>,
    pub battery_model: Option<String>,
    pub battery_year: Option<String>,
    pub battery_plug: Option<String>,
    pub charger_model: Option<String>,
    pub charger_serial: Option<String>,
    pub charger_plug: Option<String>,
}

/// Schedule the next maintenance date for a unit
#[derive(Debug, Deserialize, ToSchema)]
pub struct ScheduleMaintenance {
    pub next_maintenance: NaiveDate,
}

/// Equipment with its maintenance history, for the detail view
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct EquipmentDetails {
    pub equipment: Equipment,
    pub maintenance_records: Vec<MaintenanceRecord>,
}

//! Rental contract model and related types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Contract record: a time-bounded assignment of one equipment unit to one
/// client. Stored under a derived key composed at creation time from the
/// client id, the equipment id and a generated uuid, so repeat contracts
/// between the same pair stay distinct regardless of clock resolution.
///
/// While `active` is true the referenced client's `assigned_equipment_ids`
/// contains `equipment_id` and the referenced equipment's
/// `assigned_client_id` equals `client_id`. Deactivation happens exactly
/// once, either by the expiry sweep or by manual termination.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Contract {
    pub id: String,
    pub client_id: String,
    pub equipment_id: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub active: bool,
}

impl Contract {
    /// Derive the record key for a new contract
    pub fn derive_id(client_id: &str, equipment_id: &str) -> String {
        format!("{}_{}_{}", client_id, equipment_id, uuid::Uuid::new_v4().simple())
    }

    /// Whether the contract is past its end date on the given day
    pub fn is_expired(&self, today: NaiveDate) -> bool {
        self.end_date < today
    }
}

/// Create contract request
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateContract {
    pub client_id: String,
    pub equipment_id: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// Contract list filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ContractState {
    Active,
    Finished,
}

/// Contract counts for the dashboard summary
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ContractSummary {
    pub total: usize,
    pub active: usize,
}

//! Dashboard statistics service

use chrono::{Days, NaiveDate};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::{client::Client, contract::Contract, equipment::Equipment, maintenance::MaintenanceRecord},
    store::{from_doc, Collection, Store},
};

/// Dashboard overview counts
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct StatsResponse {
    /// Units currently unassigned
    pub equipment_in_stock: usize,
    /// Clients with at least one assigned unit
    pub clients_with_contract: usize,
    /// Maintenance interventions in the last 30 days
    pub maintenance_last_30_days: usize,
    pub active_contracts: usize,
    pub total_contracts: usize,
}

#[derive(Clone)]
pub struct StatsService {
    store: Store,
}

impl StatsService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Compute the dashboard overview for the given day
    pub async fn overview(&self, today: NaiveDate) -> AppResult<StatsResponse> {
        let mut equipment_in_stock = 0;
        for (key, doc) in self.store.list_all(Collection::Equipment).await? {
            let equipment: Equipment = from_doc(Collection::Equipment, &key, doc)?;
            if !equipment.is_assigned() {
                equipment_in_stock += 1;
            }
        }

        let mut clients_with_contract = 0;
        for (key, doc) in self.store.list_all(Collection::Clients).await? {
            let client: Client = from_doc(Collection::Clients, &key, doc)?;
            if !client.assigned_equipment_ids.is_empty() {
                clients_with_contract += 1;
            }
        }

        let cutoff = today.checked_sub_days(Days::new(30)).unwrap_or(today);
        let mut maintenance_last_30_days = 0;
        for (key, doc) in self.store.list_all(Collection::MaintenanceRecords).await? {
            let record: MaintenanceRecord = from_doc(Collection::MaintenanceRecords, &key, doc)?;
            if record.date >= cutoff {
                maintenance_last_30_days += 1;
            }
        }

        let mut active_contracts = 0;
        let mut total_contracts = 0;
        for (key, doc) in self.store.list_all(Collection::Contracts).await? {
            let contract: Contract = from_doc(Collection::Contracts, &key, doc)?;
            total_contracts += 1;
            if contract.active {
                active_contracts += 1;
            }
        }

        Ok(StatsResponse {
            equipment_in_stock,
            clients_with_contract,
            maintenance_last_30_days,
            active_contracts,
            total_contracts,
        })
    }
}

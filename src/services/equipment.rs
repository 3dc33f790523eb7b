//! Equipment management service

use chrono::NaiveDate;
use serde_json::json;

use crate::{
    error::{AppError, AppResult},
    models::{
        contract::Contract,
        equipment::{CreateEquipment, Equipment, EquipmentDetails, UpdateEquipment},
        maintenance::MaintenanceRecord,
    },
    store::{from_doc, to_doc, Collection, Store},
};

#[derive(Clone)]
pub struct EquipmentService {
    store: Store,
}

impl EquipmentService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// List all equipment units
    pub async fn list(&self) -> AppResult<Vec<Equipment>> {
        let docs = self.store.list_all(Collection::Equipment).await?;
        docs.into_iter()
            .map(|(key, doc)| from_doc(Collection::Equipment, &key, doc))
            .collect()
    }

    /// Get a unit by id
    pub async fn get(&self, id: &str) -> AppResult<Equipment> {
        match self.store.get(Collection::Equipment, id).await? {
            Some(doc) => from_doc(Collection::Equipment, id, doc),
            None => Err(AppError::NotFound(format!("Equipment {} not found", id))),
        }
    }

    /// Get a unit together with its maintenance history
    pub async fn get_details(&self, id: &str) -> AppResult<EquipmentDetails> {
        let equipment = self.get(id).await?;

        let docs = self.store.list_all(Collection::MaintenanceRecords).await?;
        let mut maintenance_records = Vec::new();
        for (key, doc) in docs {
            let record: MaintenanceRecord = from_doc(Collection::MaintenanceRecords, &key, doc)?;
            if record.equipment_id == id {
                maintenance_records.push(record);
            }
        }
        maintenance_records.sort_by_key(|r| r.date);

        Ok(EquipmentDetails { equipment, maintenance_records })
    }

    /// Register a new unit
    pub async fn create(&self, request: CreateEquipment) -> AppResult<Equipment> {
        if self.store.get(Collection::Equipment, &request.id).await?.is_some() {
            return Err(AppError::Conflict(format!("Equipment {} already exists", request.id)));
        }

        let equipment = Equipment {
            id: request.id,
            equipment_type: request.equipment_type,
            model: request.model,
            serial_number: request.serial_number,
            assigned_client_id: None,
            next_maintenance: request.next_maintenance,
            maintenance_ids: Vec::new(),
            battery_model: request.battery_model,
            battery_year: request.battery_year,
            battery_plug: request.battery_plug,
            charger_model: request.charger_model,
            charger_serial: request.charger_serial,
            charger_plug: request.charger_plug,
        };
        self.store
            .put(Collection::Equipment, &equipment.id, to_doc(&equipment)?, false)
            .await?;
        tracing::info!(equipment = %equipment.id, "Equipment registered");
        Ok(equipment)
    }

    /// Update unit details; the client assignment is owned by the contract
    /// lifecycle and not touched here
    pub async fn update(&self, id: &str, request: UpdateEquipment) -> AppResult<Equipment> {
        self.get(id).await?;

        let mut patch = serde_json::Map::new();
        if let Some(equipment_type) = request.equipment_type {
            patch.insert("equipment_type".to_string(), json!(equipment_type));
        }
        if let Some(model) = request.model {
            patch.insert("model".to_string(), json!(model));
        }
        if let Some(serial_number) = request.serial_number {
            patch.insert("serial_number".to_string(), json!(serial_number));
        }
        if let Some(next_maintenance) = request.next_maintenance {
            patch.insert("next_maintenance".to_string(), json!(next_maintenance));
        }
        if let Some(battery_model) = request.battery_model {
            patch.insert("battery_model".to_string(), json!(battery_model));
        }
        if let Some(battery_year) = request.battery_year {
            patch.insert("battery_year".to_string(), json!(battery_year));
        }
        if let Some(battery_plug) = request.battery_plug {
            patch.insert("battery_plug".to_string(), json!(battery_plug));
        }
        if let Some(charger_model) = request.charger_model {
            patch.insert("charger_model".to_string(), json!(charger_model));
        }
        if let Some(charger_serial) = request.charger_serial {
            patch.insert("charger_serial".to_string(), json!(charger_serial));
        }
        if let Some(charger_plug) = request.charger_plug {
            patch.insert("charger_plug".to_string(), json!(charger_plug));
        }

        if !patch.is_empty() {
            self.store
                .put(Collection::Equipment, id, serde_json::Value::Object(patch), true)
                .await?;
        }
        self.get(id).await
    }

    /// Set the next maintenance date for a unit
    pub async fn schedule_maintenance(&self, id: &str, date: NaiveDate) -> AppResult<Equipment> {
        self.get(id).await?;
        self.store
            .put(
                Collection::Equipment,
                id,
                json!({ "next_maintenance": date }),
                true,
            )
            .await?;
        tracing::info!(equipment = %id, %date, "Maintenance scheduled");
        self.get(id).await
    }

    /// Delete a unit. Refused while an active contract still references it.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        self.get(id).await?;

        let contracts = self.store.list_all(Collection::Contracts).await?;
        for (key, doc) in contracts {
            let contract: Contract = from_doc(Collection::Contracts, &key, doc)?;
            if contract.active && contract.equipment_id == id {
                return Err(AppError::Conflict(format!(
                    "Equipment {} is under an active contract ({})",
                    id, contract.id
                )));
            }
        }

        self.store.delete(Collection::Equipment, id).await?;
        tracing::info!(equipment = %id, "Equipment deleted");
        Ok(())
    }
}

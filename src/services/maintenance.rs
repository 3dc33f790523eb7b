//! Maintenance record service

use serde_json::json;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{
        equipment::Equipment,
        maintenance::{CreateMaintenanceRecord, MaintenanceRecord},
    },
    store::{from_doc, to_doc, Collection, Store, WriteOp},
};

#[derive(Clone)]
pub struct MaintenanceService {
    store: Store,
}

impl MaintenanceService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// List records, optionally restricted to one client
    pub async fn list(&self, client_id: Option<&str>) -> AppResult<Vec<MaintenanceRecord>> {
        let docs = self.store.list_all(Collection::MaintenanceRecords).await?;
        let mut records = Vec::new();
        for (key, doc) in docs {
            let record: MaintenanceRecord = from_doc(Collection::MaintenanceRecords, &key, doc)?;
            if client_id.map_or(true, |id| record.client_id == id) {
                records.push(record);
            }
        }
        records.sort_by_key(|r| r.date);
        Ok(records)
    }

    /// Record an intervention. The record and the backlink on the equipment
    /// unit land in one batch.
    pub async fn create(&self, request: CreateMaintenanceRecord) -> AppResult<MaintenanceRecord> {
        let equipment: Equipment = match self
            .store
            .get(Collection::Equipment, &request.equipment_id)
            .await?
        {
            Some(doc) => from_doc(Collection::Equipment, &request.equipment_id, doc)?,
            None => {
                return Err(AppError::NotFound(format!(
                    "Equipment {} not found",
                    request.equipment_id
                )))
            }
        };

        let record = MaintenanceRecord {
            id: Uuid::new_v4().to_string(),
            maintenance_type: request.maintenance_type,
            date: request.date,
            equipment_id: request.equipment_id,
            client_id: request.client_id,
            technician: request.technician,
            detail: request.detail,
        };

        let mut maintenance_ids = equipment.maintenance_ids;
        maintenance_ids.push(record.id.clone());

        self.store
            .apply(vec![
                WriteOp::put(Collection::MaintenanceRecords, record.id.as_str(), to_doc(&record)?),
                WriteOp::merge(
                    Collection::Equipment,
                    record.equipment_id.as_str(),
                    json!({ "maintenance_ids": maintenance_ids }),
                ),
            ])
            .await?;

        tracing::info!(
            record = %record.id,
            equipment = %record.equipment_id,
            "Maintenance recorded"
        );
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::NaiveDate;

    use super::*;
    use crate::store::{memory::MemoryStore, DocumentStore};

    async fn store_with_equipment() -> Store {
        let store = MemoryStore::new();
        store
            .put(
                Collection::Equipment,
                "EQ-001",
                json!({
                    "id": "EQ-001",
                    "equipment_type": "Forklift",
                    "model": "H25",
                    "serial_number": "SN-8841",
                }),
                false,
            )
            .await
            .unwrap();
        Arc::new(store)
    }

    fn request(client: &str) -> CreateMaintenanceRecord {
        CreateMaintenanceRecord {
            maintenance_type: "Preventive".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
            equipment_id: "EQ-001".to_string(),
            client_id: client.to_string(),
            technician: "P. Fuentes".to_string(),
            detail: "Hydraulic check".to_string(),
        }
    }

    #[tokio::test]
    async fn create_links_record_to_equipment() {
        let store = store_with_equipment().await;
        let service = MaintenanceService::new(store.clone());

        let record = service.create(request("AcmeCo")).await.unwrap();

        let equipment = store.get(Collection::Equipment, "EQ-001").await.unwrap().unwrap();
        assert!(equipment["maintenance_ids"]
            .as_array()
            .unwrap()
            .contains(&json!(record.id)));
    }

    #[tokio::test]
    async fn create_fails_for_missing_equipment() {
        let store: Store = Arc::new(MemoryStore::new());
        let service = MaintenanceService::new(store);

        let err = service.create(request("AcmeCo")).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn list_filters_by_client() {
        let store = store_with_equipment().await;
        let service = MaintenanceService::new(store);
        service.create(request("AcmeCo")).await.unwrap();
        service.create(request("OtherCo")).await.unwrap();

        let all = service.list(None).await.unwrap();
        let acme = service.list(Some("AcmeCo")).await.unwrap();

        assert_eq!(all.len(), 2);
        assert_eq!(acme.len(), 1);
        assert_eq!(acme[0].client_id, "AcmeCo");
    }
}

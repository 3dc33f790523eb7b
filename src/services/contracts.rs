//! Contract lifecycle service.
//!
//! Owns the create / expire / terminate transitions for rental contracts and
//! the bookkeeping they imply on the client and equipment records. Every
//! multi-document mutation is submitted as one atomic batch, so the
//! bidirectional client/equipment link can never be left half-written.

use chrono::NaiveDate;
use serde_json::json;

use crate::{
    error::{AppError, AppResult},
    models::{
        client::Client,
        contract::{Contract, ContractSummary, CreateContract},
        equipment::Equipment,
    },
    store::{from_doc, to_doc, Collection, Store, WriteOp},
};

#[derive(Clone)]
pub struct ContractsService {
    store: Store,
}

impl ContractsService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Create a contract: link the equipment to the client on both records
    /// and persist the new contract as active, all in one batch.
    pub async fn create(&self, request: CreateContract) -> AppResult<Contract> {
        if request.end_date < request.start_date {
            return Err(AppError::Validation(
                "Contract end date must not precede its start date".to_string(),
            ));
        }

        let client = self
            .get_client(&request.client_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Client {} not found", request.client_id)))?;
        let equipment = self.get_equipment(&request.equipment_id).await?.ok_or_else(|| {
            AppError::NotFound(format!("Equipment {} not found", request.equipment_id))
        })?;

        // A unit can only be on contract with one client at a time; allowing
        // a second assignment would break the link of the first contract.
        if let Some(holder) = &equipment.assigned_client_id {
            return Err(AppError::InvalidState(format!(
                "Equipment {} is already on contract with {}",
                equipment.id, holder
            )));
        }

        let contract = Contract {
            id: Contract::derive_id(&request.client_id, &request.equipment_id),
            client_id: request.client_id,
            equipment_id: request.equipment_id,
            start_date: request.start_date,
            end_date: request.end_date,
            active: true,
        };

        let mut assigned = client.assigned_equipment_ids;
        if !assigned.contains(&contract.equipment_id) {
            assigned.push(contract.equipment_id.clone());
        }

        self.store
            .apply(vec![
                WriteOp::merge(
                    Collection::Clients,
                    contract.client_id.as_str(),
                    json!({ "assigned_equipment_ids": assigned }),
                ),
                WriteOp::merge(
                    Collection::Equipment,
                    contract.equipment_id.as_str(),
                    json!({ "assigned_client_id": contract.client_id }),
                ),
                WriteOp::put(Collection::Contracts, contract.id.as_str(), to_doc(&contract)?),
            ])
            .await?;

        tracing::info!(
            contract = %contract.id,
            client = %contract.client_id,
            equipment = %contract.equipment_id,
            "Contract created"
        );
        Ok(contract)
    }

    /// Manually terminate a contract before its end date.
    ///
    /// Terminating an already-inactive contract is a no-op: the de-assignment
    /// side effects ran when the contract was first deactivated and must not
    /// run again.
    pub async fn terminate(&self, contract_id: &str) -> AppResult<Contract> {
        let contract = self
            .get_contract(contract_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Contract {} not found", contract_id)))?;

        if !contract.active {
            tracing::debug!(contract = %contract.id, "Contract already inactive");
            return Ok(contract);
        }

        self.deassign_and_deactivate(&contract).await?;
        tracing::info!(contract = %contract.id, "Contract terminated");
        Ok(Contract { active: false, ..contract })
    }

    /// Deactivate every active contract whose end date has passed.
    ///
    /// Contracts are independent; a failure on one is logged and the sweep
    /// moves on. Safe to re-run on every load of the contract list: only
    /// still-active, past-due contracts are touched. Returns the contracts
    /// deactivated by this pass.
    pub async fn sweep_expired(&self, today: NaiveDate) -> AppResult<Vec<Contract>> {
        let contracts = self.list_raw().await?;
        let mut deactivated = Vec::new();

        for contract in contracts.into_iter().filter(|c| c.active && c.is_expired(today)) {
            match self.deassign_and_deactivate(&contract).await {
                Ok(()) => {
                    tracing::info!(contract = %contract.id, "Contract expired, deactivated");
                    deactivated.push(Contract { active: false, ..contract });
                }
                Err(err) => {
                    tracing::warn!(
                        contract = %contract.id,
                        error = %err,
                        "Failed to deactivate expired contract"
                    );
                }
            }
        }

        Ok(deactivated)
    }

    /// All contracts, after running the expiry sweep for `today`
    pub async fn list(&self, today: NaiveDate) -> AppResult<Vec<Contract>> {
        self.sweep_expired(today).await?;
        self.list_raw().await
    }

    /// Get a contract by id
    pub async fn get(&self, contract_id: &str) -> AppResult<Contract> {
        self.get_contract(contract_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Contract {} not found", contract_id)))
    }

    /// Total and active contract counts
    pub async fn summary(&self) -> AppResult<ContractSummary> {
        let contracts = self.list_raw().await?;
        Ok(ContractSummary {
            total: contracts.len(),
            active: contracts.iter().filter(|c| c.active).count(),
        })
    }

    /// Shared de-assignment path for expiry and manual termination.
    ///
    /// Marks the contract inactive, removes the equipment id from the
    /// client's assignment set and clears the equipment's back-reference,
    /// atomically. Steps 2 and 3 tolerate records that are missing or
    /// already cleared, so re-applying the operation changes nothing.
    pub(crate) async fn deassign_and_deactivate(&self, contract: &Contract) -> AppResult<()> {
        let mut ops = vec![WriteOp::merge(
            Collection::Contracts,
            contract.id.as_str(),
            json!({ "active": false }),
        )];

        match self.get_client(&contract.client_id).await? {
            Some(client) => {
                let remaining: Vec<&String> = client
                    .assigned_equipment_ids
                    .iter()
                    .filter(|id| **id != contract.equipment_id)
                    .collect();
                if remaining.len() != client.assigned_equipment_ids.len() {
                    ops.push(WriteOp::merge(
                        Collection::Clients,
                        contract.client_id.as_str(),
                        json!({ "assigned_equipment_ids": remaining }),
                    ));
                }
            }
            None => {
                tracing::warn!(
                    contract = %contract.id,
                    client = %contract.client_id,
                    "Client referenced by contract no longer exists"
                );
            }
        }

        match self.get_equipment(&contract.equipment_id).await? {
            // Only clear the back-reference while it still points at this
            // contract's client
            Some(equipment)
                if equipment.assigned_client_id.as_deref() == Some(contract.client_id.as_str()) =>
            {
                ops.push(WriteOp::merge(
                    Collection::Equipment,
                    contract.equipment_id.as_str(),
                    json!({ "assigned_client_id": null }),
                ));
            }
            Some(_) => {}
            None => {
                tracing::warn!(
                    contract = %contract.id,
                    equipment = %contract.equipment_id,
                    "Equipment referenced by contract no longer exists"
                );
            }
        }

        self.store.apply(ops).await
    }

    async fn list_raw(&self) -> AppResult<Vec<Contract>> {
        let docs = self.store.list_all(Collection::Contracts).await?;
        docs.into_iter()
            .map(|(key, doc)| from_doc(Collection::Contracts, &key, doc))
            .collect()
    }

    async fn get_contract(&self, id: &str) -> AppResult<Option<Contract>> {
        match self.store.get(Collection::Contracts, id).await? {
            Some(doc) => Ok(Some(from_doc(Collection::Contracts, id, doc)?)),
            None => Ok(None),
        }
    }

    async fn get_client(&self, id: &str) -> AppResult<Option<Client>> {
        match self.store.get(Collection::Clients, id).await? {
            Some(doc) => Ok(Some(from_doc(Collection::Clients, id, doc)?)),
            None => Ok(None),
        }
    }

    async fn get_equipment(&self, id: &str) -> AppResult<Option<Equipment>> {
        match self.store.get(Collection::Equipment, id).await? {
            Some(doc) => Ok(Some(from_doc(Collection::Equipment, id, doc)?)),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::{json, Value};

    use super::*;
    use crate::store::{memory::MemoryStore, DocumentStore, MockDocumentStore};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn client_doc(id: &str, assigned: &[&str]) -> Value {
        json!({
            "id": id,
            "contact_person": "Ana Rojas",
            "phone": "+56 2 2345 0100",
            "contact_email": "ops@acme.example",
            "assigned_equipment_ids": assigned,
        })
    }

    fn equipment_doc(id: &str, assigned_client: Option<&str>) -> Value {
        json!({
            "id": id,
            "equipment_type": "Forklift",
            "model": "H25",
            "serial_number": "SN-8841",
            "assigned_client_id": assigned_client,
        })
    }

    async fn seeded_store() -> Store {
        let store = MemoryStore::new();
        store
            .put(Collection::Clients, "AcmeCo", client_doc("AcmeCo", &[]), false)
            .await
            .unwrap();
        store
            .put(Collection::Equipment, "EQ-001", equipment_doc("EQ-001", None), false)
            .await
            .unwrap();
        Arc::new(store)
    }

    fn create_request() -> CreateContract {
        CreateContract {
            client_id: "AcmeCo".to_string(),
            equipment_id: "EQ-001".to_string(),
            start_date: date(2024, 1, 1),
            end_date: date(2024, 6, 1),
        }
    }

    async fn assert_linked(store: &Store, client_id: &str, equipment_id: &str) {
        let client = store.get(Collection::Clients, client_id).await.unwrap().unwrap();
        assert!(client["assigned_equipment_ids"]
            .as_array()
            .unwrap()
            .contains(&json!(equipment_id)));
        let equipment = store.get(Collection::Equipment, equipment_id).await.unwrap().unwrap();
        assert_eq!(equipment["assigned_client_id"], json!(client_id));
    }

    async fn assert_unlinked(store: &Store, client_id: &str, equipment_id: &str) {
        let client = store.get(Collection::Clients, client_id).await.unwrap().unwrap();
        assert!(!client["assigned_equipment_ids"]
            .as_array()
            .unwrap()
            .contains(&json!(equipment_id)));
        let equipment = store.get(Collection::Equipment, equipment_id).await.unwrap().unwrap();
        assert_eq!(equipment["assigned_client_id"], Value::Null);
    }

    #[tokio::test]
    async fn create_links_client_and_equipment() {
        let store = seeded_store().await;
        let service = ContractsService::new(store.clone());

        let contract = service.create(create_request()).await.unwrap();

        assert!(contract.active);
        assert!(contract.id.starts_with("AcmeCo_EQ-001_"));
        assert_linked(&store, "AcmeCo", "EQ-001").await;

        let stored = store.get(Collection::Contracts, &contract.id).await.unwrap().unwrap();
        assert_eq!(stored["active"], json!(true));
        assert_eq!(stored["start_date"], json!("2024-01-01"));
        assert_eq!(stored["end_date"], json!("2024-06-01"));
    }

    #[tokio::test]
    async fn create_fails_for_missing_client() {
        let store = seeded_store().await;
        let service = ContractsService::new(store);

        let err = service
            .create(CreateContract { client_id: "NoSuchCo".to_string(), ..create_request() })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn create_fails_for_missing_equipment() {
        let store = seeded_store().await;
        let service = ContractsService::new(store);

        let err = service
            .create(CreateContract { equipment_id: "EQ-404".to_string(), ..create_request() })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn create_rejects_inverted_date_range() {
        let store = seeded_store().await;
        let service = ContractsService::new(store);

        let err = service
            .create(CreateContract {
                start_date: date(2024, 6, 1),
                end_date: date(2024, 1, 1),
                ..create_request()
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn create_rejects_equipment_already_on_contract() {
        let store = seeded_store().await;
        let service = ContractsService::new(store.clone());
        service.create(create_request()).await.unwrap();

        store
            .put(Collection::Clients, "OtherCo", client_doc("OtherCo", &[]), false)
            .await
            .unwrap();
        let err = service
            .create(CreateContract { client_id: "OtherCo".to_string(), ..create_request() })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidState(_)));
    }

    #[tokio::test]
    async fn terminate_unlinks_and_deactivates() {
        let store = seeded_store().await;
        let service = ContractsService::new(store.clone());
        let contract = service.create(create_request()).await.unwrap();

        let terminated = service.terminate(&contract.id).await.unwrap();

        assert!(!terminated.active);
        assert_unlinked(&store, "AcmeCo", "EQ-001").await;
        let stored = store.get(Collection::Contracts, &contract.id).await.unwrap().unwrap();
        assert_eq!(stored["active"], json!(false));
    }

    #[tokio::test]
    async fn terminate_twice_is_a_noop() {
        let store = seeded_store().await;
        let service = ContractsService::new(store.clone());
        let contract = service.create(create_request()).await.unwrap();
        service.terminate(&contract.id).await.unwrap();

        // Re-assign the unit elsewhere, then terminate the dead contract
        // again: the second call must not touch anything.
        store
            .put(Collection::Clients, "OtherCo", client_doc("OtherCo", &[]), false)
            .await
            .unwrap();
        let second = service
            .create(CreateContract { client_id: "OtherCo".to_string(), ..create_request() })
            .await
            .unwrap();

        let result = service.terminate(&contract.id).await.unwrap();

        assert!(!result.active);
        assert_linked(&store, "OtherCo", "EQ-001").await;
        let stored = store.get(Collection::Contracts, &second.id).await.unwrap().unwrap();
        assert_eq!(stored["active"], json!(true));
    }

    #[tokio::test]
    async fn deassign_is_idempotent() {
        let store = seeded_store().await;
        let service = ContractsService::new(store.clone());
        let contract = service.create(create_request()).await.unwrap();

        service.deassign_and_deactivate(&contract).await.unwrap();
        let client_after_first =
            store.get(Collection::Clients, "AcmeCo").await.unwrap().unwrap();
        let equipment_after_first =
            store.get(Collection::Equipment, "EQ-001").await.unwrap().unwrap();

        service.deassign_and_deactivate(&contract).await.unwrap();

        assert_eq!(
            store.get(Collection::Clients, "AcmeCo").await.unwrap().unwrap(),
            client_after_first
        );
        assert_eq!(
            store.get(Collection::Equipment, "EQ-001").await.unwrap().unwrap(),
            equipment_after_first
        );
    }

    #[tokio::test]
    async fn deassign_tolerates_missing_records() {
        let store = seeded_store().await;
        let service = ContractsService::new(store.clone());
        let contract = service.create(create_request()).await.unwrap();

        store.delete(Collection::Clients, "AcmeCo").await.unwrap();
        store.delete(Collection::Equipment, "EQ-001").await.unwrap();

        service.deassign_and_deactivate(&contract).await.unwrap();
        let stored = store.get(Collection::Contracts, &contract.id).await.unwrap().unwrap();
        assert_eq!(stored["active"], json!(false));
    }

    #[tokio::test]
    async fn sweep_deactivates_only_expired_active_contracts() {
        let store = seeded_store().await;
        let today = date(2024, 6, 15);

        // A: active, ended yesterday; B: active, ends tomorrow; C: already
        // inactive, ended in the past.
        store
            .put(Collection::Clients, "AcmeCo", client_doc("AcmeCo", &["EQ-001", "EQ-002"]), false)
            .await
            .unwrap();
        store
            .put(Collection::Equipment, "EQ-001", equipment_doc("EQ-001", Some("AcmeCo")), false)
            .await
            .unwrap();
        store
            .put(Collection::Equipment, "EQ-002", equipment_doc("EQ-002", Some("AcmeCo")), false)
            .await
            .unwrap();
        store
            .put(
                Collection::Contracts,
                "A",
                json!({
                    "id": "A", "client_id": "AcmeCo", "equipment_id": "EQ-001",
                    "start_date": "2024-01-01", "end_date": "2024-06-14", "active": true,
                }),
                false,
            )
            .await
            .unwrap();
        store
            .put(
                Collection::Contracts,
                "B",
                json!({
                    "id": "B", "client_id": "AcmeCo", "equipment_id": "EQ-002",
                    "start_date": "2024-01-01", "end_date": "2024-06-16", "active": true,
                }),
                false,
            )
            .await
            .unwrap();
        store
            .put(
                Collection::Contracts,
                "C",
                json!({
                    "id": "C", "client_id": "AcmeCo", "equipment_id": "EQ-003",
                    "start_date": "2023-01-01", "end_date": "2023-06-01", "active": false,
                }),
                false,
            )
            .await
            .unwrap();

        let service = ContractsService::new(store.clone());
        let deactivated = service.sweep_expired(today).await.unwrap();

        assert_eq!(deactivated.len(), 1);
        assert_eq!(deactivated[0].id, "A");

        let a = store.get(Collection::Contracts, "A").await.unwrap().unwrap();
        let b = store.get(Collection::Contracts, "B").await.unwrap().unwrap();
        let c = store.get(Collection::Contracts, "C").await.unwrap().unwrap();
        assert_eq!(a["active"], json!(false));
        assert_eq!(b["active"], json!(true));
        assert_eq!(c["active"], json!(false));

        // A's unit came back to stock, B's link is untouched
        assert_unlinked(&store, "AcmeCo", "EQ-001").await;
        assert_linked(&store, "AcmeCo", "EQ-002").await;
    }

    #[tokio::test]
    async fn sweep_is_idempotent_across_reloads() {
        let store = seeded_store().await;
        let service = ContractsService::new(store.clone());
        let contract = service.create(create_request()).await.unwrap();

        let today = contract.end_date.succ_opt().unwrap();
        let first = service.sweep_expired(today).await.unwrap();
        let second = service.sweep_expired(today).await.unwrap();

        assert_eq!(first.len(), 1);
        assert!(second.is_empty());
    }

    #[tokio::test]
    async fn list_runs_the_sweep_first() {
        let store = seeded_store().await;
        let service = ContractsService::new(store.clone());
        let contract = service.create(create_request()).await.unwrap();

        let listed = service.list(contract.end_date.succ_opt().unwrap()).await.unwrap();

        assert_eq!(listed.len(), 1);
        assert!(!listed[0].active);
        assert_unlinked(&store, "AcmeCo", "EQ-001").await;
    }

    #[tokio::test]
    async fn summary_counts_total_and_active() {
        let store = seeded_store().await;
        let service = ContractsService::new(store.clone());
        let contract = service.create(create_request()).await.unwrap();
        service.terminate(&contract.id).await.unwrap();
        service.create(create_request()).await.unwrap();

        let summary = service.summary().await.unwrap();
        assert_eq!(summary.total, 2);
        assert_eq!(summary.active, 1);
    }

    #[tokio::test]
    async fn create_surfaces_batch_write_failure() {
        let mut mock = MockDocumentStore::new();
        mock.expect_get().returning(|collection, key| match collection {
            Collection::Clients => Ok(Some(client_doc(key, &[]))),
            Collection::Equipment => Ok(Some(equipment_doc(key, None))),
            _ => Ok(None),
        });
        mock.expect_apply()
            .returning(|_| Err(AppError::Persistence("connection reset".to_string())));

        let service = ContractsService::new(Arc::new(mock));
        let err = service.create(create_request()).await.unwrap_err();
        assert!(matches!(err, AppError::Persistence(_)));
    }
}

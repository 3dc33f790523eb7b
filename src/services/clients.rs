//! Client management service

use serde_json::json;

use crate::{
    error::{AppError, AppResult},
    models::{
        client::{Client, CreateClient, UpdateClient},
        contract::Contract,
    },
    store::{from_doc, to_doc, Collection, Store},
};

#[derive(Clone)]
pub struct ClientsService {
    store: Store,
}

impl ClientsService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// List all clients
    pub async fn list(&self) -> AppResult<Vec<Client>> {
        let docs = self.store.list_all(Collection::Clients).await?;
        docs.into_iter()
            .map(|(key, doc)| from_doc(Collection::Clients, &key, doc))
            .collect()
    }

    /// Get a client by business name
    pub async fn get(&self, id: &str) -> AppResult<Client> {
        match self.store.get(Collection::Clients, id).await? {
            Some(doc) => from_doc(Collection::Clients, id, doc),
            None => Err(AppError::NotFound(format!("Client {} not found", id))),
        }
    }

    /// Create a new client
    pub async fn create(&self, request: CreateClient) -> AppResult<Client> {
        if self.store.get(Collection::Clients, &request.id).await?.is_some() {
            return Err(AppError::Conflict(format!("Client {} already exists", request.id)));
        }

        let client = Client {
            id: request.id,
            contact_person: request.contact_person,
            phone: request.phone,
            contact_email: request.contact_email,
            assigned_equipment_ids: Vec::new(),
        };
        self.store
            .put(Collection::Clients, &client.id, to_doc(&client)?, false)
            .await?;
        tracing::info!(client = %client.id, "Client created");
        Ok(client)
    }

    /// Update client contact details; the assignment set is owned by the
    /// contract lifecycle and not touched here
    pub async fn update(&self, id: &str, request: UpdateClient) -> AppResult<Client> {
        self.get(id).await?;

        let mut patch = serde_json::Map::new();
        if let Some(contact_person) = request.contact_person {
            patch.insert("contact_person".to_string(), json!(contact_person));
        }
        if let Some(phone) = request.phone {
            patch.insert("phone".to_string(), json!(phone));
        }
        if let Some(contact_email) = request.contact_email {
            patch.insert("contact_email".to_string(), json!(contact_email));
        }

        if !patch.is_empty() {
            self.store
                .put(Collection::Clients, id, serde_json::Value::Object(patch), true)
                .await?;
        }
        self.get(id).await
    }

    /// Delete a client. Refused while an active contract still references
    /// it, so contracts can never point at a missing record.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        self.get(id).await?;

        let contracts = self.store.list_all(Collection::Contracts).await?;
        for (key, doc) in contracts {
            let contract: Contract = from_doc(Collection::Contracts, &key, doc)?;
            if contract.active && contract.client_id == id {
                return Err(AppError::Conflict(format!(
                    "Client {} has an active contract ({})",
                    id, contract.id
                )));
            }
        }

        self.store.delete(Collection::Clients, id).await?;
        tracing::info!(client = %id, "Client deleted");
        Ok(())
    }
}

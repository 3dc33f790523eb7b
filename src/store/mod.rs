//! Persistence gateway: a document store organized into named collections.
//!
//! The business services depend on the [`DocumentStore`] trait, not on any
//! concrete backend. Production runs on [`postgres::PgDocumentStore`]; unit
//! tests run on [`memory::MemoryStore`].

pub mod memory;
pub mod postgres;

use std::sync::Arc;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use crate::error::{AppError, AppResult};

/// Named collections known to the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Collection {
    Clients,
    Equipment,
    Contracts,
    MaintenanceRecords,
    Users,
}

impl Collection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Clients => "Clients",
            Collection::Equipment => "Equipment",
            Collection::Contracts => "Contracts",
            Collection::MaintenanceRecords => "MaintenanceRecords",
            Collection::Users => "Users",
        }
    }
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single write in an atomic batch
#[derive(Debug, Clone)]
pub enum WriteOp {
    Put {
        collection: Collection,
        key: String,
        doc: Value,
        /// `true` patches only the given top-level fields, `false` replaces
        /// the full document
        merge: bool,
    },
    Delete {
        collection: Collection,
        key: String,
    },
}

impl WriteOp {
    pub fn put(collection: Collection, key: impl Into<String>, doc: Value) -> Self {
        WriteOp::Put { collection, key: key.into(), doc, merge: false }
    }

    pub fn merge(collection: Collection, key: impl Into<String>, doc: Value) -> Self {
        WriteOp::Put { collection, key: key.into(), doc, merge: true }
    }

    pub fn delete(collection: Collection, key: impl Into<String>) -> Self {
        WriteOp::Delete { collection, key: key.into() }
    }
}

/// Abstraction over the document storage backend.
///
/// Multi-document mutations go through [`DocumentStore::apply`], which
/// executes the whole batch atomically: either every write lands or none
/// does. Cross-record bookkeeping (contract creation and deactivation)
/// relies on this to never leave a dangling reference behind.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// All documents in a collection, as `(key, document)` pairs
    async fn list_all(&self, collection: Collection) -> AppResult<Vec<(String, Value)>>;

    /// A single document, or `None` if the key is absent
    async fn get(&self, collection: Collection, key: &str) -> AppResult<Option<Value>>;

    /// Create or update one document
    async fn put(&self, collection: Collection, key: &str, doc: Value, merge: bool)
        -> AppResult<()>;

    /// Remove one document; removing an absent key is not an error
    async fn delete(&self, collection: Collection, key: &str) -> AppResult<()>;

    /// Execute a batch of writes atomically
    async fn apply(&self, ops: Vec<WriteOp>) -> AppResult<()>;
}

/// Shared handle to the configured store backend
pub type Store = Arc<dyn DocumentStore>;

/// Serialize a model into a stored document
pub fn to_doc<T: Serialize>(value: &T) -> AppResult<Value> {
    serde_json::to_value(value)
        .map_err(|e| AppError::Internal(format!("Failed to encode document: {}", e)))
}

/// Decode a stored document into a model
pub fn from_doc<T: DeserializeOwned>(collection: Collection, key: &str, doc: Value) -> AppResult<T> {
    serde_json::from_value(doc).map_err(|e| {
        AppError::Internal(format!("Corrupt document {}/{}: {}", collection, key, e))
    })
}

//! In-memory document store used by unit tests and local development.

use std::collections::BTreeMap;
use std::sync::RwLock;

use async_trait::async_trait;
use serde_json::Value;

use super::{Collection, DocumentStore, WriteOp};
use crate::error::{AppError, AppResult};

#[derive(Default)]
pub struct MemoryStore {
    docs: RwLock<BTreeMap<(Collection, String), Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn write_op(docs: &mut BTreeMap<(Collection, String), Value>, op: WriteOp) {
        match op {
            WriteOp::Put { collection, key, doc, merge } => {
                let entry = docs.entry((collection, key));
                match entry {
                    std::collections::btree_map::Entry::Occupied(mut existing) if merge => {
                        merge_into(existing.get_mut(), doc);
                    }
                    std::collections::btree_map::Entry::Occupied(mut existing) => {
                        existing.insert(doc);
                    }
                    std::collections::btree_map::Entry::Vacant(slot) => {
                        slot.insert(doc);
                    }
                }
            }
            WriteOp::Delete { collection, key } => {
                docs.remove(&(collection, key));
            }
        }
    }

    fn lock_err() -> AppError {
        AppError::Persistence("Memory store lock poisoned".to_string())
    }
}

/// Shallow merge: top-level fields of `patch` overwrite `target`
fn merge_into(target: &mut Value, patch: Value) {
    match (target, patch) {
        (Value::Object(existing), Value::Object(fields)) => {
            for (k, v) in fields {
                existing.insert(k, v);
            }
        }
        (target, patch) => *target = patch,
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn list_all(&self, collection: Collection) -> AppResult<Vec<(String, Value)>> {
        let docs = self.docs.read().map_err(|_| Self::lock_err())?;
        Ok(docs
            .iter()
            .filter(|((c, _), _)| *c == collection)
            .map(|((_, k), v)| (k.clone(), v.clone()))
            .collect())
    }

    async fn get(&self, collection: Collection, key: &str) -> AppResult<Option<Value>> {
        let docs = self.docs.read().map_err(|_| Self::lock_err())?;
        Ok(docs.get(&(collection, key.to_string())).cloned())
    }

    async fn put(
        &self,
        collection: Collection,
        key: &str,
        doc: Value,
        merge: bool,
    ) -> AppResult<()> {
        let mut docs = self.docs.write().map_err(|_| Self::lock_err())?;
        Self::write_op(
            &mut docs,
            WriteOp::Put { collection, key: key.to_string(), doc, merge },
        );
        Ok(())
    }

    async fn delete(&self, collection: Collection, key: &str) -> AppResult<()> {
        let mut docs = self.docs.write().map_err(|_| Self::lock_err())?;
        docs.remove(&(collection, key.to_string()));
        Ok(())
    }

    async fn apply(&self, ops: Vec<WriteOp>) -> AppResult<()> {
        // The whole batch lands under one lock acquisition
        let mut docs = self.docs.write().map_err(|_| Self::lock_err())?;
        for op in ops {
            Self::write_op(&mut docs, op);
        }
        Ok(())
    }
}

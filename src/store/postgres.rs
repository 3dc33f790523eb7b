//! Postgres-backed document store.
//!
//! Documents live in a single `documents` table keyed by `(collection, key)`
//! with a JSONB body. Merge writes use the JSONB concatenation operator,
//! which patches top-level fields and leaves the rest of the document
//! untouched. Batches run inside one transaction.

use async_trait::async_trait;
use serde_json::Value;
use sqlx::{Pool, Postgres};

use super::{Collection, DocumentStore, WriteOp};
use crate::error::AppResult;

#[derive(Clone)]
pub struct PgDocumentStore {
    pool: Pool<Postgres>,
}

impl PgDocumentStore {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &Pool<Postgres> {
        &self.pool
    }
}

const UPSERT: &str = r#"
    INSERT INTO documents (collection, key, doc, updated_at)
    VALUES ($1, $2, $3, NOW())
    ON CONFLICT (collection, key) DO UPDATE
    SET doc = CASE WHEN $4 THEN documents.doc || EXCLUDED.doc ELSE EXCLUDED.doc END,
        updated_at = NOW()
"#;

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn list_all(&self, collection: Collection) -> AppResult<Vec<(String, Value)>> {
        let rows: Vec<(String, Value)> = sqlx::query_as(
            "SELECT key, doc FROM documents WHERE collection = $1 ORDER BY key",
        )
        .bind(collection.as_str())
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn get(&self, collection: Collection, key: &str) -> AppResult<Option<Value>> {
        let doc: Option<(Value,)> = sqlx::query_as(
            "SELECT doc FROM documents WHERE collection = $1 AND key = $2",
        )
        .bind(collection.as_str())
        .bind(key)
        .fetch_optional(&self.pool)
        .await?;
        Ok(doc.map(|(d,)| d))
    }

    async fn put(
        &self,
        collection: Collection,
        key: &str,
        doc: Value,
        merge: bool,
    ) -> AppResult<()> {
        sqlx::query(UPSERT)
            .bind(collection.as_str())
            .bind(key)
            .bind(doc)
            .bind(merge)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn delete(&self, collection: Collection, key: &str) -> AppResult<()> {
        sqlx::query("DELETE FROM documents WHERE collection = $1 AND key = $2")
            .bind(collection.as_str())
            .bind(key)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn apply(&self, ops: Vec<WriteOp>) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;

        for op in ops {
            match op {
                WriteOp::Put { collection, key, doc, merge } => {
                    sqlx::query(UPSERT)
                        .bind(collection.as_str())
                        .bind(&key)
                        .bind(doc)
                        .bind(merge)
                        .execute(&mut *tx)
                        .await?;
                }
                WriteOp::Delete { collection, key } => {
                    sqlx::query("DELETE FROM documents WHERE collection = $1 AND key = $2")
                        .bind(collection.as_str())
                        .bind(&key)
                        .execute(&mut *tx)
                        .await?;
                }
            }
        }

        tx.commit().await?;
        Ok(())
    }
}

use std::collections::HashMap;

use chrono::Utc;
use serde_json::{json, Map, Value};
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Document must be a JSON object")]
    NotAnObject,
}

/// In-process document database. Collections hold JSON objects and are
/// queried with top-level equality filters, e.g. `json!({"doctor_id": id})`.
#[derive(Debug, Default)]
pub struct DocumentStore {
    collections: RwLock<HashMap<String, Vec<Value>>>,
}

impl DocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a document, assigning `id`, `created_at` and `updated_at`.
    pub async fn insert(&self, collection: &str, document: Value) -> Result<Value, StoreError> {
        let stored = stamp(document)?;
        debug!("Inserting document {} into {}", stored["id"], collection);

        let mut collections = self.collections.write().await;
        collections
            .entry(collection.to_string())
            .or_default()
            .push(stored.clone());

        Ok(stored)
    }

    /// Check-and-insert under a single write lock. `check` sees every document
    /// currently matching `filter`; the insert only happens if it returns `Ok`.
    pub async fn insert_checked<F, E>(
        &self,
        collection: &str,
        filter: &Value,
        document: Value,
        check: F,
    ) -> Result<Value, E>
    where
        F: FnOnce(&[Value]) -> Result<(), E>,
        E: From<StoreError>,
    {
        let stored = stamp(document)?;

        let mut collections = self.collections.write().await;
        let documents = collections.entry(collection.to_string()).or_default();

        let matching: Vec<Value> = documents
            .iter()
            .filter(|doc| matches_filter(doc, filter))
            .cloned()
            .collect();
        check(&matching)?;

        debug!("Check passed, inserting document {} into {}", stored["id"], collection);
        documents.push(stored.clone());

        Ok(stored)
    }

    pub async fn find(&self, collection: &str, filter: &Value) -> Vec<Value> {
        let collections = self.collections.read().await;
        collections
            .get(collection)
            .map(|documents| {
                documents
                    .iter()
                    .filter(|doc| matches_filter(doc, filter))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    pub async fn find_one(&self, collection: &str, filter: &Value) -> Option<Value> {
        let collections = self.collections.read().await;
        collections
            .get(collection)?
            .iter()
            .find(|doc| matches_filter(doc, filter))
            .cloned()
    }

    pub async fn find_by_id(&self, collection: &str, id: &str) -> Option<Value> {
        self.find_one(collection, &json!({ "id": id })).await
    }

    /// Shallow-merge `changes` into the document with the given id.
    /// Returns `Ok(None)` when no such document exists.
    pub async fn update_by_id(
        &self,
        collection: &str,
        id: &str,
        changes: Value,
    ) -> Result<Option<Value>, StoreError> {
        self.update_checked(collection, id, changes, |_| Ok::<(), StoreError>(()))
            .await
    }

    /// Check-and-update under a single write lock. `check` sees the document
    /// as currently stored; the merge only happens if it returns `Ok`.
    /// Returns `Ok(None)` when no such document exists.
    pub async fn update_checked<F, E>(
        &self,
        collection: &str,
        id: &str,
        changes: Value,
        check: F,
    ) -> Result<Option<Value>, E>
    where
        F: FnOnce(&Value) -> Result<(), E>,
        E: From<StoreError>,
    {
        let Value::Object(changes) = changes else {
            return Err(StoreError::NotAnObject.into());
        };

        let mut collections = self.collections.write().await;
        let Some(document) = collections
            .get_mut(collection)
            .and_then(|documents| documents.iter_mut().find(|doc| doc["id"] == id))
        else {
            return Ok(None);
        };

        check(&*document)?;

        if let Value::Object(fields) = document {
            for (key, value) in changes {
                fields.insert(key, value);
            }
            fields.insert("updated_at".to_string(), json!(Utc::now().to_rfc3339()));
        }

        debug!("Updated document {} in {}", id, collection);
        Ok(Some(document.clone()))
    }
}

fn stamp(document: Value) -> Result<Value, StoreError> {
    let Value::Object(mut fields) = document else {
        return Err(StoreError::NotAnObject);
    };

    let now = json!(Utc::now().to_rfc3339());
    fields
        .entry("id")
        .or_insert_with(|| json!(Uuid::new_v4().to_string()));
    fields.entry("created_at").or_insert_with(|| now.clone());
    fields.insert("updated_at".to_string(), now);

    Ok(Value::Object(fields))
}

fn matches_filter(document: &Value, filter: &Value) -> bool {
    let empty = Map::new();
    let conditions = filter.as_object().unwrap_or(&empty);
    conditions
        .iter()
        .all(|(field, expected)| document.get(field) == Some(expected))
}

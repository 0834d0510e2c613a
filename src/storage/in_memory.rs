//! In-memory reference implementation of the document store.
//!
//! Thread-safe nested maps under an async `RwLock`, with a broadcast bus
//! feeding per-document watches. Used for tests, development, and as the
//! template for real backend adapters.
//!
//! # Example
//!
//! ```rust
//! use shelter_store::storage::{DocumentStore, InMemoryStore};
//! use serde_json::json;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = InMemoryStore::new();
//! let id = store.add("shelters", json!({"name": "Pet Haven"})).await?;
//!
//! let mut watch = store.watch("shelters", &id).await?;
//! store.update("shelters", &id, json!({"name": "Pet Harbor"})).await?;
//! let snapshot = watch.next().await.expect("change event");
//! assert_eq!(snapshot.data.unwrap()["name"], "Pet Harbor");
//! # Ok(())
//! # }
//! ```

use crate::storage::{DocumentEvent, DocumentSnapshot, DocumentStore, DocumentWatch, StoreError};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{RwLock, broadcast, mpsc};
use uuid::Uuid;

const EVENT_BUS_CAPACITY: usize = 64;
const WATCH_CHANNEL_CAPACITY: usize = 16;

/// Thread-safe in-memory document store.
///
/// Structure: `collection` → `document id` → `data`. Handles are cheap
/// clones sharing the same maps and event bus.
#[derive(Clone)]
pub struct InMemoryStore {
    collections: Arc<RwLock<HashMap<String, HashMap<String, Value>>>>,
    events: broadcast::Sender<DocumentEvent>,
}

/// Counters for debugging and test assertions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InMemoryStoreStats {
    pub collection_count: usize,
    pub total_documents: usize,
}

impl InMemoryStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_BUS_CAPACITY);
        Self {
            collections: Arc::new(RwLock::new(HashMap::new())),
            events,
        }
    }

    /// Current document counts.
    pub async fn stats(&self) -> InMemoryStoreStats {
        let collections = self.collections.read().await;
        InMemoryStoreStats {
            collection_count: collections.len(),
            total_documents: collections.values().map(|c| c.len()).sum(),
        }
    }

    fn publish(&self, collection: &str, id: &str, data: Option<Value>) {
        // send only fails when nobody is watching
        let _ = self.events.send(DocumentEvent {
            collection: collection.to_string(),
            id: id.to_string(),
            snapshot: DocumentSnapshot::settled(data),
        });
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentStore for InMemoryStore {
    type Error = StoreError;

    async fn add(&self, collection: &str, data: Value) -> Result<String, StoreError> {
        let id = Uuid::new_v4().to_string();
        let mut collections = self.collections.write().await;
        collections
            .entry(collection.to_string())
            .or_default()
            .insert(id.clone(), data.clone());
        drop(collections);
        self.publish(collection, &id, Some(data));
        Ok(id)
    }

    async fn put(&self, collection: &str, id: &str, data: Value) -> Result<(), StoreError> {
        let mut collections = self.collections.write().await;
        collections
            .entry(collection.to_string())
            .or_default()
            .insert(id.to_string(), data.clone());
        drop(collections);
        self.publish(collection, id, Some(data));
        Ok(())
    }

    async fn get(&self, collection: &str, id: &str) -> Result<Option<Value>, StoreError> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .and_then(|documents| documents.get(id))
            .cloned())
    }

    async fn update(&self, collection: &str, id: &str, patch: Value) -> Result<(), StoreError> {
        let Value::Object(fields) = patch else {
            return Err(StoreError::not_an_object(collection, id));
        };
        let mut collections = self.collections.write().await;
        let document = collections
            .get_mut(collection)
            .and_then(|documents| documents.get_mut(id))
            .ok_or_else(|| StoreError::not_found(collection, id))?;
        let Value::Object(target) = &mut *document else {
            return Err(StoreError::not_an_object(collection, id));
        };
        for (key, value) in fields {
            target.insert(key, value);
        }
        let updated = document.clone();
        drop(collections);
        self.publish(collection, id, Some(updated));
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<bool, StoreError> {
        let mut collections = self.collections.write().await;
        let existed = collections
            .get_mut(collection)
            .and_then(|documents| documents.remove(id))
            .is_some();
        drop(collections);
        if existed {
            self.publish(collection, id, None);
        }
        Ok(existed)
    }

    async fn get_all(&self, collection: &str) -> Result<Vec<(String, Value)>, StoreError> {
        let collections = self.collections.read().await;
        let mut documents: Vec<(String, Value)> = collections
            .get(collection)
            .map(|documents| {
                documents
                    .iter()
                    .map(|(id, data)| (id.clone(), data.clone()))
                    .collect()
            })
            .unwrap_or_default();
        documents.sort_by(|(a, _), (b, _)| a.cmp(b));
        Ok(documents)
    }

    async fn exists(&self, collection: &str, id: &str) -> Result<bool, StoreError> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .is_some_and(|documents| documents.contains_key(id)))
    }

    async fn delete_all(&self, collection: &str) -> Result<(), StoreError> {
        let mut collections = self.collections.write().await;
        let removed = collections.remove(collection).unwrap_or_default();
        drop(collections);
        for id in removed.keys() {
            self.publish(collection, id, None);
        }
        Ok(())
    }

    async fn watch(&self, collection: &str, id: &str) -> Result<DocumentWatch, StoreError> {
        let mut bus = self.events.subscribe();
        let (tx, rx) = mpsc::channel(WATCH_CHANNEL_CAPACITY);
        let collection = collection.to_string();
        let id = id.to_string();
        tokio::spawn(async move {
            loop {
                match bus.recv().await {
                    Ok(event) => {
                        if event.collection == collection && event.id == id {
                            if tx.send(event.snapshot).await.is_err() {
                                break;
                            }
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(_)) => continue,
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        });
        Ok(DocumentWatch::new(rx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_add_assigns_distinct_ids() {
        let store = InMemoryStore::new();
        let a = store.add("pets", json!({"name": "Rex"})).await.unwrap();
        let b = store.add("pets", json!({"name": "Mia"})).await.unwrap();
        assert_ne!(a, b);
        assert!(store.exists("pets", &a).await.unwrap());
        assert!(store.exists("pets", &b).await.unwrap());
    }

    #[tokio::test]
    async fn test_put_and_get() {
        let store = InMemoryStore::new();
        store
            .put("users", "u1", json!({"email": "a@b.cd"}))
            .await
            .unwrap();
        let doc = store.get("users", "u1").await.unwrap().unwrap();
        assert_eq!(doc["email"], "a@b.cd");
        assert_eq!(store.get("users", "u2").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_update_merges_fields() {
        let store = InMemoryStore::new();
        store
            .put("pets", "p1", json!({"name": "Rex", "size": "small"}))
            .await
            .unwrap();
        store
            .update("pets", "p1", json!({"size": "medium"}))
            .await
            .unwrap();
        let doc = store.get("pets", "p1").await.unwrap().unwrap();
        assert_eq!(doc["name"], "Rex");
        assert_eq!(doc["size"], "medium");
    }

    #[tokio::test]
    async fn test_update_missing_document_fails() {
        let store = InMemoryStore::new();
        let err = store
            .update("pets", "ghost", json!({"size": "medium"}))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_delete_reports_existence() {
        let store = InMemoryStore::new();
        store.put("pets", "p1", json!({})).await.unwrap();
        assert!(store.delete("pets", "p1").await.unwrap());
        assert!(!store.delete("pets", "p1").await.unwrap());
    }

    #[tokio::test]
    async fn test_get_all_is_ordered() {
        let store = InMemoryStore::new();
        store.put("pets", "b", json!({"n": 2})).await.unwrap();
        store.put("pets", "a", json!({"n": 1})).await.unwrap();
        let all = store.get_all("pets").await.unwrap();
        let ids: Vec<&str> = all.iter().map(|(id, _)| id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_delete_all_empties_collection() {
        let store = InMemoryStore::new();
        store.put("pets", "a", json!({})).await.unwrap();
        store.put("pets", "b", json!({})).await.unwrap();
        store.delete_all("pets").await.unwrap();
        assert!(store.get_all("pets").await.unwrap().is_empty());
        assert_eq!(store.stats().await.total_documents, 0);
    }

    #[tokio::test]
    async fn test_watch_sees_update_and_delete() {
        let store = InMemoryStore::new();
        store.put("pets", "p1", json!({"name": "Rex"})).await.unwrap();

        let mut watch = store.watch("pets", "p1").await.unwrap();
        store
            .update("pets", "p1", json!({"name": "Rexo"}))
            .await
            .unwrap();
        store.delete("pets", "p1").await.unwrap();

        let first = watch.next().await.unwrap();
        assert_eq!(first.data.unwrap()["name"], "Rexo");
        assert!(!first.has_pending_writes);

        let second = watch.next().await.unwrap();
        assert_eq!(second.data, None);
    }

    #[tokio::test]
    async fn test_watch_ignores_other_documents() {
        let store = InMemoryStore::new();
        store.put("pets", "p1", json!({})).await.unwrap();
        let mut watch = store.watch("pets", "p1").await.unwrap();

        store.put("pets", "p2", json!({"name": "Mia"})).await.unwrap();
        store.put("pets", "p1", json!({"name": "Rex"})).await.unwrap();

        let event = watch.next().await.unwrap();
        assert_eq!(event.data.unwrap()["name"], "Rex");
    }

    #[tokio::test]
    async fn test_clone_shares_state() {
        let store = InMemoryStore::new();
        let handle = store.clone();
        handle.put("pets", "p1", json!({})).await.unwrap();
        assert!(store.exists("pets", "p1").await.unwrap());
    }
}

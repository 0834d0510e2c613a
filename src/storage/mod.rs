//! Remote document store abstraction.
//!
//! This module is the seam to the external BaaS: pure per-collection
//! document operations plus a per-document change subscription. It knows
//! nothing about records, validation, or caching — that all lives a layer
//! up, in [`crate::stores`].
//!
//! # Architecture
//!
//! The store is responsible for:
//! - GET/ADD/PUT/UPDATE/DELETE operations on opaque JSON documents
//! - assigning ids on `add` (the caller never invents document ids)
//! - bulk reads and batched collection deletes
//! - a per-document change stream with a pending-local-write flag
//!
//! The store is NOT responsible for:
//! - field validation or referential integrity
//! - diffing, caching, or change classification
//! - retry policy (callers decide; this layer never retries)
//!
//! # Example
//!
//! ```rust
//! use shelter_store::storage::{DocumentStore, InMemoryStore};
//! use serde_json::json;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = InMemoryStore::new();
//!
//! let id = store.add("pets", json!({"name": "Rex"})).await?;
//! assert!(store.exists("pets", &id).await?);
//!
//! store.update("pets", &id, json!({"name": "Rexo"})).await?;
//! let doc = store.get("pets", &id).await?.expect("stored document");
//! assert_eq!(doc["name"], "Rexo");
//!
//! store.delete("pets", &id).await?;
//! # Ok(())
//! # }
//! ```

pub mod errors;
pub mod in_memory;

pub use errors::StoreError;
pub use in_memory::{InMemoryStore, InMemoryStoreStats};

use serde_json::Value;
use std::future::Future;
use tokio::sync::mpsc;

/// One observed state of a watched document.
///
/// `data` is the post-image (`None` once the document is deleted).
/// `has_pending_writes` marks latency-compensated echoes of this client's
/// own writes that the server has not acknowledged yet; subscribers
/// normally skip those.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentSnapshot {
    pub data: Option<Value>,
    pub has_pending_writes: bool,
}

impl DocumentSnapshot {
    /// A server-acknowledged snapshot.
    pub fn settled(data: Option<Value>) -> Self {
        Self {
            data,
            has_pending_writes: false,
        }
    }

    /// An unacknowledged local-write echo.
    pub fn pending(data: Option<Value>) -> Self {
        Self {
            data,
            has_pending_writes: true,
        }
    }
}

/// A change event on the store's broadcast bus.
#[derive(Debug, Clone)]
pub struct DocumentEvent {
    pub collection: String,
    pub id: String,
    pub snapshot: DocumentSnapshot,
}

/// Live subscription to one document.
///
/// Yields a [`DocumentSnapshot`] per observed change until the subscription
/// ends. Dropping the watch releases it; nothing is cancelled on the
/// caller's behalf before that.
pub struct DocumentWatch {
    rx: mpsc::Receiver<DocumentSnapshot>,
}

impl DocumentWatch {
    pub fn new(rx: mpsc::Receiver<DocumentSnapshot>) -> Self {
        Self { rx }
    }

    /// Next observed snapshot, or `None` when the stream ends.
    pub async fn next(&mut self) -> Option<DocumentSnapshot> {
        self.rx.recv().await
    }
}

/// Core trait for remote document stores.
///
/// Implementations hold opaque JSON documents in named collections. All
/// operations are async; handles are cheap clones sharing one backend, the
/// way a BaaS client object is shared across an application.
pub trait DocumentStore: Clone + Send + Sync + 'static {
    /// The error type returned by store operations.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Store a new document and return the store-assigned id.
    fn add(
        &self,
        collection: &str,
        data: Value,
    ) -> impl Future<Output = Result<String, Self::Error>> + Send;

    /// Store a document under an explicit id, replacing any existing one.
    fn put(
        &self,
        collection: &str,
        id: &str,
        data: Value,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// Read one document; `None` when it does not exist.
    fn get(
        &self,
        collection: &str,
        id: &str,
    ) -> impl Future<Output = Result<Option<Value>, Self::Error>> + Send;

    /// Merge the fields of `patch` into an existing document.
    ///
    /// Fails when the document does not exist; untouched fields keep their
    /// stored values.
    fn update(
        &self,
        collection: &str,
        id: &str,
        patch: Value,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// Delete one document. Returns whether it existed.
    fn delete(
        &self,
        collection: &str,
        id: &str,
    ) -> impl Future<Output = Result<bool, Self::Error>> + Send;

    /// Read every document in a collection as `(id, data)` pairs, ordered
    /// by id for stable iteration.
    fn get_all(
        &self,
        collection: &str,
    ) -> impl Future<Output = Result<Vec<(String, Value)>, Self::Error>> + Send;

    /// Existence check without transferring the document.
    fn exists(
        &self,
        collection: &str,
        id: &str,
    ) -> impl Future<Output = Result<bool, Self::Error>> + Send;

    /// Delete every document in a collection (batched, order-independent).
    fn delete_all(
        &self,
        collection: &str,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// Open a live subscription on one document.
    fn watch(
        &self,
        collection: &str,
        id: &str,
    ) -> impl Future<Output = Result<DocumentWatch, Self::Error>> + Send;
}

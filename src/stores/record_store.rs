//! Generic cached record store over a remote document backend.
//!
//! A [`RecordStore`] owns the local instance cache for one record type and
//! mediates every interaction with the record's remote collection. Its
//! failure policy is uniform: constraint violations and remote failures are
//! caught here, logged, and the operation is abandoned with no partial
//! local mutation. Nothing is retried automatically.
//!
//! Concurrency: operations suspend at each remote call and may interleave;
//! the cache is shared and mutated by whichever task resolves first. The
//! only ordering guarantee is that [`update`](RecordStore::update) diffs
//! against a snapshot fetched after the call begins. Last remote write
//! wins; the live watch is the advisory mechanism for spotting external
//! changes.

use crate::error::{RecordError, RecordResult, ValidationError, ValidationResult};
use crate::model::record::{PatchSet, Record, RecordId};
use crate::storage::DocumentStore;
use crate::stores::watch::{RecordWatch, classify_change};
use log::{debug, info, warn};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{RwLock, mpsc};

const WATCH_CHANNEL_CAPACITY: usize = 16;

/// Cache-plus-remote façade for one record type.
///
/// Handles are cheap clones sharing one cache; construct one per record
/// type from an application root rather than through global state.
#[derive(Clone)]
pub struct RecordStore<R: Record, S: DocumentStore> {
    backend: S,
    cache: Arc<RwLock<HashMap<RecordId, R>>>,
}

impl<R: Record, S: DocumentStore> RecordStore<R, S> {
    pub fn new(backend: S) -> Self {
        Self {
            backend,
            cache: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// The shared backend handle.
    pub fn backend(&self) -> &S {
        &self.backend
    }

    /// Create a record from slots.
    ///
    /// The remote store assigns the id first; the validating constructor
    /// runs only after the remote write succeeded, and the cache row is
    /// created only after both — there is no optimistic insert. Failures
    /// are logged and the operation abandoned.
    pub async fn add(&self, slots: R::Slots) {
        let document = R::document_from_slots(&slots);
        let assigned = match self.backend.add(R::COLLECTION, document).await {
            Ok(id) => id,
            Err(e) => {
                warn!("Failed to write new {} document: {}", R::COLLECTION, e);
                return;
            }
        };
        let id = match RecordId::new(assigned) {
            Ok(id) => id,
            Err(e) => {
                warn!("Store assigned an unusable {} id: {}", R::COLLECTION, e);
                return;
            }
        };
        match R::from_slots(&self.backend, id.clone(), slots).await {
            Ok(record) => match self.register(record).await {
                Ok(()) => info!("Created {} record {}", R::COLLECTION, id),
                Err(e) => warn!("Discarding {} record {}: {}", R::COLLECTION, id, e),
            },
            Err(e) => warn!("Discarding invalid {} record {}: {}", R::COLLECTION, id, e),
        }
    }

    /// Read and construct one record from the remote store.
    ///
    /// Does not touch the cache; bulk loading and explicit registration are
    /// the caching paths.
    pub async fn retrieve(&self, id: &str) -> RecordResult<R> {
        let document = self
            .backend
            .get(R::COLLECTION, id)
            .await
            .map_err(RecordError::store)?
            .ok_or_else(|| RecordError::not_found(R::COLLECTION, id))?;
        let slots = R::slots_from_document(&document)?;
        let record_id = RecordId::new(id)?;
        R::from_slots(&self.backend, record_id, slots).await
    }

    /// Bulk-load the whole remote collection into the cache.
    ///
    /// Construction failures are logged per document and skipped; one bad
    /// document never aborts the batch. Successes overwrite cache entries
    /// by id.
    pub async fn retrieve_all(&self) {
        let documents = match self.backend.get_all(R::COLLECTION).await {
            Ok(documents) => documents,
            Err(e) => {
                warn!("Failed to read collection {}: {}", R::COLLECTION, e);
                return;
            }
        };
        let mut loaded = Vec::new();
        for (id, document) in documents {
            let constructed = async {
                let slots = R::slots_from_document(&document)?;
                let record_id = RecordId::new(id.as_str())?;
                R::from_slots(&self.backend, record_id, slots).await
            }
            .await;
            match constructed {
                Ok(record) => loaded.push(record),
                Err(e) => warn!("Skipping {} document {}: {}", R::COLLECTION, id, e),
            }
        }
        let count = loaded.len();
        let mut cache = self.cache.write().await;
        for record in loaded {
            cache.insert(record.id().clone(), record);
        }
        drop(cache);
        info!("Loaded {} {} records", count, R::COLLECTION);
    }

    /// Update a record from slots.
    ///
    /// The diff is computed against a fresh remote snapshot, never the
    /// local cache, so changes are relative to current server state. The
    /// cache entry is replaced only after the remote write succeeded; on
    /// any failure it keeps the pre-update value.
    pub async fn update(&self, id: &str, slots: R::Slots) {
        let mut record = match self.retrieve(id).await {
            Ok(record) => record,
            Err(e) => {
                warn!("Cannot update {} record {}: {}", R::COLLECTION, id, e);
                return;
            }
        };
        let before = record.clone();
        let patch = match record.apply(&self.backend, slots).await {
            Ok(patch) => patch,
            Err(e) => {
                warn!("Update of {} record {} abandoned: {}", R::COLLECTION, id, e);
                return;
            }
        };
        if patch.is_empty() {
            debug!("No properties of {} record {} changed", R::COLLECTION, id);
            return;
        }
        match self
            .backend
            .update(R::COLLECTION, id, patch.to_document())
            .await
        {
            Ok(()) => {
                let mut cache = self.cache.write().await;
                cache.insert(record.id().clone(), record);
                drop(cache);
                info!(
                    "Updated {} record {}: {:?}",
                    R::COLLECTION,
                    id,
                    patch.changed_fields()
                );
            }
            Err(e) => {
                // roll the cached instance back to its pre-update value
                let mut cache = self.cache.write().await;
                if cache.contains_key(id) {
                    cache.insert(before.id().clone(), before);
                }
                drop(cache);
                warn!("Failed to write {} update for {}: {}", R::COLLECTION, id, e);
            }
        }
    }

    /// Delete a record remotely, then drop it from the cache.
    ///
    /// An id missing from the cache is logged and causes no local
    /// mutation, but the remote delete is still attempted. A remote
    /// failure leaves the cache entry untouched.
    pub async fn destroy(&self, id: &str) {
        let cached = self.cache.read().await.contains_key(id);
        if !cached {
            info!("There is no cached {} record with id {}", R::COLLECTION, id);
        }
        match self.backend.delete(R::COLLECTION, id).await {
            Ok(existed) => {
                if cached {
                    self.cache.write().await.remove(id);
                }
                if existed {
                    info!("Deleted {} record {}", R::COLLECTION, id);
                } else {
                    debug!("No remote {} document {} to delete", R::COLLECTION, id);
                }
            }
            Err(e) => warn!("Failed to delete {} document {}: {}", R::COLLECTION, id, e),
        }
    }

    /// Delete the whole collection, then empty the cache.
    ///
    /// The cache is reset even when the batched remote delete fails
    /// partway; until the next [`retrieve_all`](Self::retrieve_all) the
    /// remote collection may then be out of step with the cache.
    pub async fn clear(&self) {
        if let Err(e) = self.backend.delete_all(R::COLLECTION).await {
            warn!("Failed to clear remote collection {}: {}", R::COLLECTION, e);
        }
        self.cache.write().await.clear();
        info!("Cleared {} records", R::COLLECTION);
    }

    /// Existence check against the remote store, not the cache, so
    /// referential-integrity checks always see current server state.
    pub async fn contains(&self, id: &str) -> bool {
        match self.backend.exists(R::COLLECTION, id).await {
            Ok(exists) => exists,
            Err(e) => {
                warn!("Existence check on {}/{} failed: {}", R::COLLECTION, id, e);
                false
            }
        }
    }

    /// Insert a record into the cache, enforcing id uniqueness.
    pub async fn register(&self, record: R) -> ValidationResult<()> {
        let mut cache = self.cache.write().await;
        if cache.contains_key(record.id().as_str()) {
            return Err(ValidationError::DuplicateId {
                id: record.id().clone(),
            });
        }
        cache.insert(record.id().clone(), record);
        Ok(())
    }

    /// Message-returning uniqueness check for form code: `""` when the id
    /// is well-shaped and not yet taken in this store.
    pub async fn check_unique_id(&self, id: &str) -> String {
        let record_id = match RecordId::new(id) {
            Ok(record_id) => record_id,
            Err(e) => return e.message(),
        };
        if self.cache.read().await.contains_key(id) {
            return ValidationError::DuplicateId { id: record_id }.message();
        }
        String::new()
    }

    /// Snapshot of the instance cache.
    pub async fn instances(&self) -> HashMap<RecordId, R> {
        self.cache.read().await.clone()
    }

    /// One cached record, if present.
    pub async fn cached(&self, id: &str) -> Option<R> {
        self.cache.read().await.get(id).cloned()
    }

    /// Number of cached records.
    pub async fn len(&self) -> usize {
        self.cache.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.cache.read().await.is_empty()
    }

    /// Cached records matching a predicate; the scan never touches the
    /// remote store.
    pub async fn find_cached<P>(&self, predicate: P) -> Vec<R>
    where
        P: Fn(&R) -> bool,
    {
        self.cache
            .read()
            .await
            .values()
            .filter(|record| predicate(record))
            .cloned()
            .collect()
    }

    /// Open a live watch on one record's document.
    ///
    /// A baseline snapshot is captured at subscribe time; incoming
    /// snapshots that are pending local writes or that equal the last
    /// acknowledged state are suppressed, everything else is delivered as
    /// [`Modified`](crate::stores::RecordChange::Modified) or
    /// [`Removed`](crate::stores::RecordChange::Removed). The returned
    /// handle's `cancel` is the only teardown.
    pub async fn watch(&self, id: &str) -> RecordResult<RecordWatch> {
        let mut baseline = self
            .backend
            .get(R::COLLECTION, id)
            .await
            .map_err(RecordError::store)?;
        let mut source = self
            .backend
            .watch(R::COLLECTION, id)
            .await
            .map_err(RecordError::store)?;
        let (tx, rx) = mpsc::channel(WATCH_CHANNEL_CAPACITY);
        let task = tokio::spawn(async move {
            while let Some(snapshot) = source.next().await {
                let change = classify_change(&baseline, &snapshot);
                if !snapshot.has_pending_writes {
                    baseline = snapshot.data;
                }
                if let Some(change) = change {
                    if tx.send(change).await.is_err() {
                        break;
                    }
                }
            }
        });
        Ok(RecordWatch::new(rx, task))
    }
}

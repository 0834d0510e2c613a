//! Shared fixtures and test doubles for the integration suite.
#![allow(dead_code)]

use serde_json::Value;
use shelter_store::model::{MessageSlots, PetSlots, ShelterSlots, UserSlots};
use shelter_store::storage::{DocumentStore, DocumentWatch, InMemoryStore, StoreError};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Slot builders with sensible defaults; tests override what they probe.

pub fn shelter_slots(creator: Option<&str>) -> ShelterSlots {
    ShelterSlots {
        name: "Pet Haven".to_string(),
        address: "12 Harbor Road, Springfield".to_string(),
        phone: "+1-201-555-0123".to_string(),
        email: "contact@pethaven.org".to_string(),
        office_hours: "Mon-Fri 9-17".to_string(),
        creator_id: creator.map(str::to_string),
    }
}

pub fn pet_slots(shelter_id: &str, creator: Option<&str>) -> PetSlots {
    PetSlots {
        name: "Rex".to_string(),
        species: "dog".to_string(),
        sex: "male".to_string(),
        size: "medium".to_string(),
        weight: "17,5".to_string(),
        birth_date: "2020-03-01".to_string(),
        shelter_id: shelter_id.to_string(),
        creator_id: creator.map(str::to_string),
    }
}

pub fn message_slots(shelter_id: &str, pet_id: Option<&str>) -> MessageSlots {
    MessageSlots {
        content: "Is Rex still up for adoption?".to_string(),
        sender_email: "jane@example.com".to_string(),
        shelter_id: shelter_id.to_string(),
        pet_id: pet_id.map(str::to_string),
        sent_at: "2024-05-10T09:30:00Z".to_string(),
        creator_id: None,
    }
}

pub fn user_slots(shelters: &[&str], pets: &[&str]) -> UserSlots {
    UserSlots {
        email: "owner@example.com".to_string(),
        verified: Some(true),
        shelter_ids: shelters.iter().map(|s| s.to_string()).collect(),
        pet_ids: pets.iter().map(|s| s.to_string()).collect(),
    }
}

/// A backend wrapper with switchable failure injection, for exercising the
/// stores' abandon-and-log paths.
#[derive(Clone)]
pub struct FlakyStore {
    inner: InMemoryStore,
    fail_adds: Arc<AtomicBool>,
    fail_updates: Arc<AtomicBool>,
    fail_deletes: Arc<AtomicBool>,
}

impl FlakyStore {
    pub fn new() -> Self {
        Self {
            inner: InMemoryStore::new(),
            fail_adds: Arc::new(AtomicBool::new(false)),
            fail_updates: Arc::new(AtomicBool::new(false)),
            fail_deletes: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn inner(&self) -> &InMemoryStore {
        &self.inner
    }

    pub fn fail_adds(&self, on: bool) {
        self.fail_adds.store(on, Ordering::SeqCst);
    }

    pub fn fail_updates(&self, on: bool) {
        self.fail_updates.store(on, Ordering::SeqCst);
    }

    pub fn fail_deletes(&self, on: bool) {
        self.fail_deletes.store(on, Ordering::SeqCst);
    }

    fn injected(&self, flag: &AtomicBool) -> Result<(), StoreError> {
        if flag.load(Ordering::SeqCst) {
            Err(StoreError::unavailable("injected failure"))
        } else {
            Ok(())
        }
    }
}

impl DocumentStore for FlakyStore {
    type Error = StoreError;

    async fn add(&self, collection: &str, data: Value) -> Result<String, StoreError> {
        self.injected(&self.fail_adds)?;
        self.inner.add(collection, data).await
    }

    async fn put(&self, collection: &str, id: &str, data: Value) -> Result<(), StoreError> {
        self.injected(&self.fail_adds)?;
        self.inner.put(collection, id, data).await
    }

    async fn get(&self, collection: &str, id: &str) -> Result<Option<Value>, StoreError> {
        self.inner.get(collection, id).await
    }

    async fn update(&self, collection: &str, id: &str, patch: Value) -> Result<(), StoreError> {
        self.injected(&self.fail_updates)?;
        self.inner.update(collection, id, patch).await
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<bool, StoreError> {
        self.injected(&self.fail_deletes)?;
        self.inner.delete(collection, id).await
    }

    async fn get_all(&self, collection: &str) -> Result<Vec<(String, Value)>, StoreError> {
        self.inner.get_all(collection).await
    }

    async fn exists(&self, collection: &str, id: &str) -> Result<bool, StoreError> {
        self.inner.exists(collection, id).await
    }

    async fn delete_all(&self, collection: &str) -> Result<(), StoreError> {
        self.injected(&self.fail_deletes)?;
        self.inner.delete_all(collection).await
    }

    async fn watch(&self, collection: &str, id: &str) -> Result<DocumentWatch, StoreError> {
        self.inner.watch(collection, id).await
    }
}

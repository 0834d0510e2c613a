//! Application root owning one store per record type.
//!
//! The context is constructed explicitly and passed around (or cloned —
//! all stores are cheap handles), so tests can build isolated contexts
//! over private backends instead of sharing process-wide state.

use crate::storage::DocumentStore;
use crate::stores::{MessageStore, PetStore, ShelterStore, UserStore};

/// One store per record type over a shared backend.
#[derive(Clone)]
pub struct StoreContext<S: DocumentStore> {
    pub pets: PetStore<S>,
    pub shelters: ShelterStore<S>,
    pub messages: MessageStore<S>,
    pub users: UserStore<S>,
}

impl<S: DocumentStore> StoreContext<S> {
    /// Build a context whose stores all talk to the same backend.
    pub fn new(backend: S) -> Self {
        Self {
            pets: PetStore::new(backend.clone()),
            shelters: ShelterStore::new(backend.clone()),
            messages: MessageStore::new(backend.clone()),
            users: UserStore::new(backend),
        }
    }

    /// Populate every cache from the remote store.
    pub async fn retrieve_all(&self) {
        self.shelters.retrieve_all().await;
        self.pets.retrieve_all().await;
        self.messages.retrieve_all().await;
        self.users.retrieve_all().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::InMemoryStore;

    #[tokio::test]
    async fn test_contexts_are_isolated() {
        let a = StoreContext::new(InMemoryStore::new());
        let b = StoreContext::new(InMemoryStore::new());
        assert!(a.pets.is_empty().await);
        assert!(b.pets.is_empty().await);
        // separate backends: nothing leaks between contexts
        assert!(!a.shelters.contains("s1").await);
        assert!(!b.shelters.contains("s1").await);
    }
}

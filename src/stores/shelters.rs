//! Shelter store: domain queries over the cached shelters.

use crate::model::record::{Record, RecordId};
use crate::model::shelter::Shelter;
use crate::storage::DocumentStore;
use crate::stores::record_store::RecordStore;

/// Store for [`Shelter`] records.
pub type ShelterStore<S> = RecordStore<Shelter, S>;

impl<S: DocumentStore> RecordStore<Shelter, S> {
    /// Cached shelters created by the given user.
    pub async fn shelters_of(&self, user_id: &str) -> Vec<Shelter> {
        self.find_cached(|shelter| shelter.creator_id() == Some(user_id))
            .await
    }

    /// Projection of [`shelters_of`](Self::shelters_of) to record ids,
    /// the shape the message inbox query wants.
    pub async fn shelter_ids_of(&self, user_id: &str) -> Vec<RecordId> {
        self.shelters_of(user_id)
            .await
            .into_iter()
            .map(|shelter| shelter.id().clone())
            .collect()
    }
}

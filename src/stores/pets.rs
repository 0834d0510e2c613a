//! Pet store: domain queries over the cached pet listings.

use crate::model::pet::Pet;
use crate::model::record::{Record, RecordId};
use crate::storage::DocumentStore;
use crate::stores::record_store::RecordStore;
use log::info;

/// Store for [`Pet`] records.
pub type PetStore<S> = RecordStore<Pet, S>;

impl<S: DocumentStore> RecordStore<Pet, S> {
    /// Cached pets created by the given user.
    pub async fn pets_of(&self, user_id: &str) -> Vec<Pet> {
        self.find_cached(|pet| pet.creator_id() == Some(user_id))
            .await
    }

    /// Explicit cascade: destroy every cached pet listed under the given
    /// shelter. Invoked by the caller when a shelter is removed; nothing
    /// cascades automatically.
    pub async fn destroy_shelter_refs(&self, shelter_id: &str) {
        let doomed: Vec<RecordId> = self
            .find_cached(|pet| pet.shelter_id().as_str() == shelter_id)
            .await
            .into_iter()
            .map(|pet| pet.id().clone())
            .collect();
        info!(
            "Destroying {} pet records referencing shelter {}",
            doomed.len(),
            shelter_id
        );
        for id in doomed {
            self.destroy(id.as_str()).await;
        }
    }
}

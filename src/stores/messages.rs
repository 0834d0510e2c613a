//! Message store: inbox queries and the shelter cascade.

use crate::model::message::Message;
use crate::model::record::{Record, RecordId};
use crate::storage::DocumentStore;
use crate::stores::record_store::RecordStore;
use log::info;

/// Store for [`Message`] records.
pub type MessageStore<S> = RecordStore<Message, S>;

impl<S: DocumentStore> RecordStore<Message, S> {
    /// Cached messages addressed to any of the given shelters — the inbox
    /// of a user owning that set of shelters.
    pub async fn inbox_for(&self, shelter_ids: &[RecordId]) -> Vec<Message> {
        self.find_cached(|message| {
            shelter_ids
                .iter()
                .any(|shelter_id| shelter_id.as_str() == message.shelter_id().as_str())
        })
        .await
    }

    /// Explicit cascade: destroy every cached message referencing the
    /// given shelter, leaving unrelated messages untouched. Invoked by the
    /// caller when a shelter is removed; nothing cascades automatically.
    pub async fn destroy_shelter_refs(&self, shelter_id: &str) {
        let doomed: Vec<RecordId> = self
            .find_cached(|message| message.shelter_id().as_str() == shelter_id)
            .await
            .into_iter()
            .map(|message| message.id().clone())
            .collect();
        info!(
            "Destroying {} message records referencing shelter {}",
            doomed.len(),
            shelter_id
        );
        for id in doomed {
            self.destroy(id.as_str()).await;
        }
    }
}

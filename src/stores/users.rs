//! User store: accounts keyed by the authentication uid.

use crate::model::record::{Record, RecordId};
use crate::model::user::{User, UserSlots};
use crate::storage::DocumentStore;
use crate::stores::record_store::RecordStore;
use log::{info, warn};

/// Store for [`User`] records.
pub type UserStore<S> = RecordStore<User, S>;

impl<S: DocumentStore> RecordStore<User, S> {
    /// Create a user document under the auth uid.
    ///
    /// Unlike [`add`](RecordStore::add), the id is the caller's uid rather
    /// than store-assigned, so this uses an explicit-id write. Failure
    /// policy is the same: log and abandon, no partial local mutation.
    pub async fn add_with_id(&self, uid: &str, slots: UserSlots) {
        let id = match RecordId::new(uid) {
            Ok(id) => id,
            Err(e) => {
                warn!("Rejecting user uid '{}': {}", uid, e);
                return;
            }
        };
        let document = User::document_from_slots(&slots);
        if let Err(e) = self.backend().put(User::COLLECTION, uid, document).await {
            warn!("Failed to write user document {}: {}", uid, e);
            return;
        }
        match User::from_slots(self.backend(), id.clone(), slots).await {
            Ok(user) => match self.register(user).await {
                Ok(()) => info!("Created user record {}", id),
                Err(e) => warn!("Discarding user record {}: {}", id, e),
            },
            Err(e) => warn!("Discarding invalid user record {}: {}", id, e),
        }
    }
}

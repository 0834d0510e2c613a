//! Cached record stores: the façade between callers and the remote store.
//!
//! [`RecordStore`] implements the generic cache-plus-remote protocol;
//! the per-type aliases add domain queries (cache scans) and explicit
//! cascades on top. [`StoreContext`] bundles one store per record type
//! over a shared backend.

pub mod context;
pub mod messages;
pub mod pets;
pub mod record_store;
pub mod shelters;
pub mod users;
pub mod watch;

pub use context::StoreContext;
pub use messages::MessageStore;
pub use pets::PetStore;
pub use record_store::RecordStore;
pub use shelters::ShelterStore;
pub use users::UserStore;
pub use watch::{RecordChange, RecordWatch, classify_change};

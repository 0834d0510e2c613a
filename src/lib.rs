//! Validated record layer for pet-adoption data.
//!
//! Provides type-safe record aggregates built from validated value
//! objects, cached per-type stores synchronized with a pluggable remote
//! document store, and live per-document change watches.
//!
//! # Core Components
//!
//! - [`StoreContext`] - Application root holding one store per record type
//! - [`RecordStore`] - Generic cache + remote-collection façade
//! - [`DocumentStore`] - Trait for remote document store backends
//! - [`Record`] - Contract implemented by [`Pet`], [`Shelter`],
//!   [`Message`], and [`User`]
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use shelter_store::storage::InMemoryStore;
//! use shelter_store::stores::StoreContext;
//! use shelter_store::model::ShelterSlots;
//!
//! # async fn example() {
//! let ctx = StoreContext::new(InMemoryStore::new());
//! ctx.shelters
//!     .add(ShelterSlots {
//!         name: "Pet Haven".into(),
//!         address: "12 Harbor Road".into(),
//!         phone: "+1-201-555-0123".into(),
//!         email: "contact@pethaven.org".into(),
//!         office_hours: "Mon-Fri 9-17".into(),
//!         creator_id: None,
//!     })
//!     .await;
//! # }
//! ```

pub mod auth;
pub mod error;
pub mod model;
pub mod storage;
pub mod stores;

// Re-export commonly used types for convenience
pub use auth::{AuthProvider, CurrentUser, StaticAuthProvider};
pub use error::{ConstraintKind, RecordError, RecordResult, ValidationError, ValidationResult};
pub use model::{
    Message, MessagePatch, MessageSlots, PatchSet, Pet, PetPatch, PetSlots, Record, RecordId,
    Sex, Shelter, ShelterPatch, ShelterSlots, Size, Species, User, UserPatch, UserSlots,
};
pub use storage::{DocumentSnapshot, DocumentStore, DocumentWatch, InMemoryStore, StoreError};
pub use stores::{
    MessageStore, PetStore, RecordChange, RecordStore, RecordWatch, ShelterStore, StoreContext,
    UserStore,
};

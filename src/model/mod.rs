//! Domain model: validated value objects and the record aggregates built
//! from them.
//!
//! Every field of every record is held as a value object that cannot exist
//! in an invalid state; records are only constructed through validating
//! paths and only mutated through diff-based [`Record::apply`] calls.
//!
//! [`Record::apply`]: crate::model::record::Record::apply

pub mod message;
pub mod pet;
pub mod record;
pub mod shelter;
pub mod user;
pub mod value_objects;

pub use message::{Message, MessagePatch, MessageSlots};
pub use pet::{Pet, PetPatch, PetSlots, Sex, Size, Species};
pub use record::{PatchSet, Record, RecordId};
pub use shelter::{Shelter, ShelterPatch, ShelterSlots};
pub use user::{User, UserPatch, UserSlots};

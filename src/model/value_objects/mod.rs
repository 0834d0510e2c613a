//! Validated value objects composing every record field.
//!
//! Each type follows the same three-part contract:
//!
//! - `validate(field, raw, rules)` — the pure check, `Ok(())` or the
//!   violation; never allocates the wrapper.
//! - `new(field, raw, rules)` — the constructing half; succeeds exactly when
//!   `validate` does and yields an immutable wrapper that satisfies its rule
//!   for its whole lifetime. There is no mutation, only replacement.
//! - `check(field, raw, rules)` — the message-returning half for form code:
//!   `""` when valid, otherwise the human-readable violation. Derived from
//!   `validate`, so the two can never disagree.
//!
//! Equality on all value objects is structural.

pub mod boolean;
pub mod date;
pub mod email_address;
pub mod id_reference;
pub mod number;
pub mod phone_number;
pub mod text;

pub use boolean::SafeBoolean;
pub use date::{DateInterval, SafeDate};
pub use email_address::EmailAddress;
pub use id_reference::IdReference;
pub use number::{NumberInterval, PositiveNumber};
pub use phone_number::PhoneNumber;
pub use text::{NonEmptyString, OptionalString, StringRules};

//! Record identity and the contract every stored aggregate implements.
//!
//! A [`Record`] is an aggregate of validated value objects with a unique,
//! immutable [`RecordId`] assigned by the remote store. Records are built
//! from plain slot structs, flatten back to JSON documents, and mutate only
//! through [`Record::apply`], which diffs against new slots and reports the
//! changed subset.

use crate::error::{ValidationError, ValidationResult};
use crate::storage::DocumentStore;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::borrow::Borrow;
use std::fmt;
use std::future::Future;

/// A validated record identifier.
///
/// Identifiers are assigned by the remote store; the only shape rule is
/// non-emptiness. A record never changes its id after construction — when a
/// store assigns a fresh id, a fresh record is constructed around it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordId(String);

impl RecordId {
    /// Validating constructor.
    pub fn new(value: impl Into<String>) -> ValidationResult<Self> {
        let value = value.into();
        if value.is_empty() {
            return Err(ValidationError::EmptyId);
        }
        Ok(Self(value))
    }

    /// Message-returning shape check for form code: `""` when valid.
    pub fn check(value: &str) -> String {
        match Self::new(value) {
            Ok(_) => String::new(),
            Err(e) => e.message(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// Lets a `HashMap<RecordId, _>` be probed with a plain `&str`.
impl Borrow<str> for RecordId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl Serialize for RecordId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for RecordId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Self::new(value).map_err(serde::de::Error::custom)
    }
}

impl TryFrom<&str> for RecordId {
    type Error = ValidationError;

    fn try_from(value: &str) -> ValidationResult<Self> {
        Self::new(value)
    }
}

/// The changed-field subset produced by a diffing [`Record::apply`] call.
///
/// Patches are explicit optional-field structs: a `Some` field changed, a
/// `None` field did not. `to_document` renders only the changed fields, so
/// remote updates write exactly the diff.
pub trait PatchSet {
    /// True when no field changed.
    fn is_empty(&self) -> bool;

    /// Names of the changed fields, in document notation.
    fn changed_fields(&self) -> Vec<&'static str>;

    /// Partial document holding only the changed fields.
    fn to_document(&self) -> Value;
}

/// Contract for a stored aggregate of validated value objects.
///
/// Construction and field re-assignment re-validate everything, including
/// id references against the backend (reference checks are never cached).
/// `apply` must leave the record in its last valid state when it fails
/// partway: implementations snapshot before diffing and restore on error.
pub trait Record: Clone + Send + Sync + Sized + 'static {
    /// Plain slot record used for construction, update, and serialization.
    type Slots: Clone + Send + Sync + 'static;

    /// Changed-field subset returned by `apply`.
    type Patch: PatchSet + Send;

    /// Name of the remote collection holding this record type.
    const COLLECTION: &'static str;

    fn id(&self) -> &RecordId;

    /// Render raw slots as a remote document, before any record exists.
    ///
    /// Used by the add path: the remote store must assign an id before the
    /// validating constructor can run.
    fn document_from_slots(slots: &Self::Slots) -> Value;

    /// Duck-typed extraction of slots from a remote document.
    fn slots_from_document(doc: &Value) -> ValidationResult<Self::Slots>;

    /// Flatten the validated record to its document form (without the id,
    /// which is the document key).
    fn to_document(&self) -> Value;

    /// Validating constructor; re-resolves every id reference against the
    /// backend.
    fn from_slots<S: DocumentStore>(
        backend: &S,
        id: RecordId,
        slots: Self::Slots,
    ) -> impl Future<Output = crate::error::RecordResult<Self>> + Send;

    /// Diff against new slots, mutating only the changed fields and
    /// returning them; on failure the record is rolled back to the state
    /// captured before diffing.
    fn apply<S: DocumentStore>(
        &mut self,
        backend: &S,
        slots: Self::Slots,
    ) -> impl Future<Output = crate::error::RecordResult<Self::Patch>> + Send;
}

/// Shape-check an optional creator/owner id carried in slots.
pub(crate) fn optional_record_id(raw: &Option<String>) -> ValidationResult<Option<RecordId>> {
    raw.as_ref().map(|value| RecordId::new(value.clone())).transpose()
}

/// Field extraction helpers for duck-typed documents.
pub(crate) mod doc {
    use crate::error::{ValidationError, ValidationResult};
    use serde_json::Value;

    pub fn string(doc: &Value, field: &str) -> ValidationResult<String> {
        match doc.get(field) {
            Some(Value::String(s)) => Ok(s.clone()),
            Some(_) => Err(ValidationError::InvalidFieldType {
                field: field.to_string(),
                expected: "a string",
            }),
            None => Err(ValidationError::missing_field(field)),
        }
    }

    pub fn optional_string(doc: &Value, field: &str) -> ValidationResult<Option<String>> {
        match doc.get(field) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.clone())),
            Some(_) => Err(ValidationError::InvalidFieldType {
                field: field.to_string(),
                expected: "a string",
            }),
        }
    }

    /// An absent list reads as empty; a present one must be all strings.
    pub fn string_list(doc: &Value, field: &str) -> ValidationResult<Vec<String>> {
        match doc.get(field) {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(Value::Array(items)) => items
                .iter()
                .map(|item| match item {
                    Value::String(s) => Ok(s.clone()),
                    _ => Err(ValidationError::InvalidFieldType {
                        field: field.to_string(),
                        expected: "a list of strings",
                    }),
                })
                .collect(),
            Some(_) => Err(ValidationError::InvalidFieldType {
                field: field.to_string(),
                expected: "a list of strings",
            }),
        }
    }

    pub fn optional_bool(doc: &Value, field: &str) -> ValidationResult<Option<bool>> {
        match doc.get(field) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Bool(b)) => Ok(Some(*b)),
            Some(_) => Err(ValidationError::InvalidFieldType {
                field: field.to_string(),
                expected: "a boolean",
            }),
        }
    }
}

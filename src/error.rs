//! Error types for record validation and store operations.
//!
//! Validation failures are classified into three constraint kinds — type,
//! range, and reference — so callers can distinguish "wrong shape" from
//! "right shape, bad value" from "points at nothing". The same
//! [`ValidationError`] drives both the failing construction path and the
//! message-returning `check_*` validators used by form code.

use crate::model::record::RecordId;

/// Top-level error for store operations that surface failures to the caller.
///
/// Most store operations log and abandon instead of returning errors; the
/// ones that do propagate (single-record retrieval, construction helpers)
/// use this type.
#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    /// A field failed its construction-time constraint.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// The remote document store reported a failure.
    #[error("document store error: {0}")]
    Store(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// No document exists under the given collection and id.
    #[error("record not found: {collection} with id '{id}'")]
    NotFound { collection: String, id: String },

    /// A document could not be serialized or deserialized.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// The broad class a validation failure belongs to.
///
/// Mirrors the classic split between a value of the wrong shape
/// ([`Type`](ConstraintKind::Type)), a well-shaped value outside its
/// declared bounds ([`Range`](ConstraintKind::Range)), a foreign id with no
/// target ([`Reference`](ConstraintKind::Reference)), and an id already
/// held by another record ([`Uniqueness`](ConstraintKind::Uniqueness)).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintKind {
    Type,
    Range,
    Reference,
    Uniqueness,
}

/// Validation errors raised while constructing or updating records.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    /// A required string field was empty.
    #[error("'{field}' must not be empty")]
    EmptyValue { field: String },

    /// A string field fell outside its declared length interval.
    #[error("'{field}' must be between {min} and {max} characters, got {actual}")]
    LengthOutOfRange {
        field: String,
        min: usize,
        max: usize,
        actual: usize,
    },

    /// A string field was not one of the allowed values.
    #[error("'{field}' has invalid value '{value}', allowed values: {allowed:?}")]
    NotInSet {
        field: String,
        value: String,
        allowed: Vec<String>,
    },

    /// A string field did not match its required pattern.
    #[error("'{field}' has invalid format: {details}")]
    PatternMismatch { field: String, details: String },

    /// A numeric field could not be parsed as a number.
    #[error("'{field}' is not a number: '{value}'")]
    NotANumber { field: String, value: String },

    /// A numeric field was negative where only non-negative values are allowed.
    #[error("'{field}' must not be negative, got {value}")]
    NegativeNumber { field: String, value: f64 },

    /// A numeric or temporal field fell outside its inclusive interval.
    #[error("'{field}' is out of range: {details}")]
    OutOfInterval { field: String, details: String },

    /// A date field could not be parsed from any accepted representation.
    #[error("'{field}' is not a valid date: '{value}'")]
    InvalidDate { field: String, value: String },

    /// An id reference points at a document that does not exist.
    #[error("no record with id '{id}' exists in collection '{collection}'")]
    UnknownReference { collection: String, id: String },

    /// A record id was empty.
    #[error("record id must not be empty")]
    EmptyId,

    /// A record with this id is already tracked by the store.
    #[error("a record with id '{id}' already exists")]
    DuplicateId { id: RecordId },

    /// A document was missing a required field.
    #[error("document is missing required field '{field}'")]
    MissingField { field: String },

    /// A document field had the wrong JSON type.
    #[error("document field '{field}' must be {expected}")]
    InvalidFieldType {
        field: String,
        expected: &'static str,
    },
}

impl ValidationError {
    /// Classify this failure into its constraint kind.
    pub fn kind(&self) -> ConstraintKind {
        match self {
            Self::NotANumber { .. }
            | Self::InvalidDate { .. }
            | Self::MissingField { .. }
            | Self::InvalidFieldType { .. } => ConstraintKind::Type,
            Self::EmptyValue { .. }
            | Self::LengthOutOfRange { .. }
            | Self::NotInSet { .. }
            | Self::PatternMismatch { .. }
            | Self::NegativeNumber { .. }
            | Self::OutOfInterval { .. }
            | Self::EmptyId => ConstraintKind::Range,
            Self::UnknownReference { .. } => ConstraintKind::Reference,
            Self::DuplicateId { .. } => ConstraintKind::Uniqueness,
        }
    }

    /// The human-readable violation message shown next to a form field.
    ///
    /// This is the message-returning half of every validator: `check_*`
    /// functions map `Ok` to `""` and `Err(e)` to `e.message()`.
    pub fn message(&self) -> String {
        self.to_string()
    }
}

// Convenience constructors for the common cases.
impl ValidationError {
    pub fn empty(field: impl Into<String>) -> Self {
        Self::EmptyValue {
            field: field.into(),
        }
    }

    pub fn not_a_number(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::NotANumber {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn out_of_interval(field: impl Into<String>, details: impl Into<String>) -> Self {
        Self::OutOfInterval {
            field: field.into(),
            details: details.into(),
        }
    }

    pub fn pattern_mismatch(field: impl Into<String>, details: impl Into<String>) -> Self {
        Self::PatternMismatch {
            field: field.into(),
            details: details.into(),
        }
    }

    pub fn unknown_reference(collection: impl Into<String>, id: impl Into<String>) -> Self {
        Self::UnknownReference {
            collection: collection.into(),
            id: id.into(),
        }
    }

    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
        }
    }
}

impl RecordError {
    /// Wrap a backend error from the document store.
    pub fn store<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Store(Box::new(error))
    }

    /// Create a not-found error for a collection and id.
    pub fn not_found(collection: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            collection: collection.into(),
            id: id.into(),
        }
    }
}

/// Result alias for validation paths.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Result alias for store operations that propagate failures.
pub type RecordResult<T> = Result<T, RecordError>;

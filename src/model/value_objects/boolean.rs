//! Boolean value object with explicit defaulting for absent fields.

use crate::error::{ValidationError, ValidationResult};
use serde_json::Value;

/// A boolean that is always present: absent input collapses to a declared
/// default instead of being smuggled around as "maybe".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SafeBoolean(bool);

impl SafeBoolean {
    pub fn new(value: bool) -> Self {
        Self(value)
    }

    /// Collapse an optional input to the declared default.
    pub fn from_optional(value: Option<bool>, default: bool) -> Self {
        Self(value.unwrap_or(default))
    }

    /// Extract from a document field: absent defaults, a non-boolean is a
    /// type failure rather than a silent fallback.
    pub fn from_value(field: &str, value: Option<&Value>, default: bool) -> ValidationResult<Self> {
        match value {
            None | Some(Value::Null) => Ok(Self(default)),
            Some(Value::Bool(b)) => Ok(Self(*b)),
            Some(_) => Err(ValidationError::InvalidFieldType {
                field: field.to_string(),
                expected: "a boolean",
            }),
        }
    }

    pub fn value(&self) -> bool {
        self.0
    }
}

impl From<SafeBoolean> for bool {
    fn from(value: SafeBoolean) -> bool {
        value.0
    }
}

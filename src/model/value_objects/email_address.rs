//! EmailAddress value object.
//!
//! A deliberately permissive address check: one `@`, a non-empty local
//! part, and a dotted domain. Full RFC 5322 parsing is out of scope for a
//! form-facing validator.

use crate::error::{ValidationError, ValidationResult};
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email pattern"));

/// A validated email address.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Pure check: non-empty and address-shaped.
    pub fn validate(field: &str, value: &str) -> ValidationResult<()> {
        if value.is_empty() {
            return Err(ValidationError::empty(field));
        }
        if !EMAIL_PATTERN.is_match(value) {
            return Err(ValidationError::pattern_mismatch(
                field,
                "value is not a well-formed email address",
            ));
        }
        Ok(())
    }

    /// Validating constructor.
    pub fn new(field: &str, value: impl Into<String>) -> ValidationResult<Self> {
        let value = value.into();
        Self::validate(field, &value)?;
        Ok(Self(value))
    }

    /// Message-returning validator for form code: `""` when valid.
    pub fn check(field: &str, value: &str) -> String {
        match Self::validate(field, value) {
            Ok(()) => String::new(),
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

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<&str> for EmailAddress {
    type Error = ValidationError;

    fn try_from(value: &str) -> ValidationResult<Self> {
        Self::new("email", value)
    }
}

//! PhoneNumber value object.

use crate::error::{ValidationError, ValidationResult};
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

// Optional leading +, then 6 to 20 digits with the usual separators.
static PHONE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[0-9(][0-9 ()./-]{5,19}$").expect("valid phone pattern"));

/// A validated phone number in loose international notation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Pure check: non-empty and phone-shaped.
    pub fn validate(field: &str, value: &str) -> ValidationResult<()> {
        if value.is_empty() {
            return Err(ValidationError::empty(field));
        }
        if !PHONE_PATTERN.is_match(value) {
            return Err(ValidationError::pattern_mismatch(
                field,
                "value is not a well-formed phone number",
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

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

//! String value objects: required and optional text with declarative rules.
//!
//! [`StringRules`] encodes the constraints a text field may carry — a length
//! interval, a closed set of allowed values, a pattern — and both string
//! wrappers validate against it at construction time.

use crate::error::{ValidationError, ValidationResult};
use regex::Regex;
use std::fmt;

/// Declarative constraints for a text field.
///
/// All parts are optional; the zero value accepts any text (subject to the
/// wrapper's own emptiness rule). Rules are usually crate-level constants,
/// one per record field.
#[derive(Debug, Clone, Copy, Default)]
pub struct StringRules {
    /// Inclusive minimum length in characters.
    pub min: Option<usize>,
    /// Inclusive maximum length in characters.
    pub max: Option<usize>,
    /// Closed set of allowed values.
    pub one_of: Option<&'static [&'static str]>,
    /// Pattern the value must match.
    pub pattern: Option<&'static Regex>,
}

impl StringRules {
    /// No constraints beyond the wrapper's emptiness rule.
    pub const NONE: StringRules = StringRules {
        min: None,
        max: None,
        one_of: None,
        pattern: None,
    };

    /// Only an inclusive maximum length.
    pub const fn max_len(max: usize) -> Self {
        StringRules {
            min: None,
            max: Some(max),
            one_of: None,
            pattern: None,
        }
    }

    /// An inclusive length interval.
    pub const fn length(min: usize, max: usize) -> Self {
        StringRules {
            min: Some(min),
            max: Some(max),
            one_of: None,
            pattern: None,
        }
    }

    /// Membership in a closed set of values.
    pub const fn one_of(allowed: &'static [&'static str]) -> Self {
        StringRules {
            min: None,
            max: None,
            one_of: Some(allowed),
            pattern: None,
        }
    }

    fn apply(&self, field: &str, value: &str) -> ValidationResult<()> {
        let length = value.chars().count();
        let min = self.min.unwrap_or(0);
        let max = self.max.unwrap_or(usize::MAX);
        if length < min || length > max {
            return Err(ValidationError::LengthOutOfRange {
                field: field.to_string(),
                min,
                max,
                actual: length,
            });
        }
        if let Some(allowed) = self.one_of {
            if !allowed.contains(&value) {
                return Err(ValidationError::NotInSet {
                    field: field.to_string(),
                    value: value.to_string(),
                    allowed: allowed.iter().map(|s| s.to_string()).collect(),
                });
            }
        }
        if let Some(pattern) = self.pattern {
            if !pattern.is_match(value) {
                return Err(ValidationError::pattern_mismatch(
                    field,
                    "value does not match the required pattern",
                ));
            }
        }
        Ok(())
    }
}

/// A non-empty string satisfying its [`StringRules`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NonEmptyString(String);

impl NonEmptyString {
    /// Pure check: non-empty and within the rules.
    pub fn validate(field: &str, value: &str, rules: &StringRules) -> ValidationResult<()> {
        if value.is_empty() {
            return Err(ValidationError::empty(field));
        }
        rules.apply(field, value)
    }

    /// Validating constructor.
    pub fn new(field: &str, value: impl Into<String>, rules: &StringRules) -> ValidationResult<Self> {
        let value = value.into();
        Self::validate(field, &value, rules)?;
        Ok(Self(value))
    }

    /// Message-returning validator for form code: `""` when valid.
    pub fn check(field: &str, value: &str, rules: &StringRules) -> String {
        match Self::validate(field, value, rules) {
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

impl fmt::Display for NonEmptyString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for NonEmptyString {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A string that may be empty; when non-empty it must satisfy its rules.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct OptionalString(String);

impl OptionalString {
    /// Pure check: empty passes, non-empty goes through the rules.
    pub fn validate(field: &str, value: &str, rules: &StringRules) -> ValidationResult<()> {
        if value.is_empty() {
            return Ok(());
        }
        rules.apply(field, value)
    }

    /// Validating constructor.
    pub fn new(field: &str, value: impl Into<String>, rules: &StringRules) -> ValidationResult<Self> {
        let value = value.into();
        Self::validate(field, &value, rules)?;
        Ok(Self(value))
    }

    /// Message-returning validator for form code: `""` when valid.
    pub fn check(field: &str, value: &str, rules: &StringRules) -> String {
        match Self::validate(field, value, rules) {
            Ok(()) => String::new(),
            Err(e) => e.message(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for OptionalString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

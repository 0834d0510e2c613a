//! Non-negative numeric value object with optional inclusive interval.
//!
//! Numbers arrive either natively or as user-typed strings; the string
//! parsers accept both and normalize before validation. Float parsing
//! accepts `,` as the decimal separator (and normalizes it to `.`) because
//! form input does.

use crate::error::{ValidationError, ValidationResult};
use std::fmt;

/// An optional inclusive interval over `f64`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NumberInterval {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl NumberInterval {
    /// No bounds beyond non-negativity.
    pub const NONE: NumberInterval = NumberInterval {
        min: None,
        max: None,
    };

    pub const fn between(min: f64, max: f64) -> Self {
        NumberInterval {
            min: Some(min),
            max: Some(max),
        }
    }

    pub const fn at_most(max: f64) -> Self {
        NumberInterval {
            min: None,
            max: Some(max),
        }
    }

    fn contains(&self, value: f64) -> bool {
        self.min.is_none_or(|min| value >= min) && self.max.is_none_or(|max| value <= max)
    }
}

/// A validated number that is never negative and always inside its interval.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositiveNumber(f64);

impl PositiveNumber {
    /// Pure check: non-negative, finite, inside the interval.
    pub fn validate(field: &str, value: f64, interval: &NumberInterval) -> ValidationResult<()> {
        if !value.is_finite() {
            return Err(ValidationError::not_a_number(field, value.to_string()));
        }
        if value < 0.0 {
            return Err(ValidationError::NegativeNumber {
                field: field.to_string(),
                value,
            });
        }
        if !interval.contains(value) {
            return Err(ValidationError::out_of_interval(
                field,
                format!(
                    "{} is outside [{}, {}]",
                    value,
                    interval.min.map_or("-".to_string(), |m| m.to_string()),
                    interval.max.map_or("-".to_string(), |m| m.to_string()),
                ),
            ));
        }
        Ok(())
    }

    /// Validating constructor from a native number.
    pub fn new(field: &str, value: f64, interval: &NumberInterval) -> ValidationResult<Self> {
        Self::validate(field, value, interval)?;
        Ok(Self(value))
    }

    /// Parse an integer from a string (or an already-numeric string form).
    ///
    /// Accepts only decimal digit strings; anything else is a type failure,
    /// not a silent zero.
    pub fn parse_int(field: &str, raw: &str, interval: &NumberInterval) -> ValidationResult<Self> {
        let trimmed = raw.trim();
        let value: u64 = trimmed
            .parse()
            .map_err(|_| ValidationError::not_a_number(field, raw))?;
        Self::new(field, value as f64, interval)
    }

    /// Parse a float from a string, accepting `,` as decimal separator.
    pub fn parse_float(field: &str, raw: &str, interval: &NumberInterval) -> ValidationResult<Self> {
        let normalized = raw.trim().replacen(',', ".", 1);
        let value: f64 = normalized
            .parse()
            .map_err(|_| ValidationError::not_a_number(field, raw))?;
        Self::new(field, value, interval)
    }

    /// Message-returning validator over the integer-string form.
    pub fn check_int(field: &str, raw: &str, interval: &NumberInterval) -> String {
        match Self::parse_int(field, raw, interval) {
            Ok(_) => String::new(),
            Err(e) => e.message(),
        }
    }

    /// Message-returning validator over the float-string form.
    pub fn check_float(field: &str, raw: &str, interval: &NumberInterval) -> String {
        match Self::parse_float(field, raw, interval) {
            Ok(_) => String::new(),
            Err(e) => e.message(),
        }
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

impl fmt::Display for PositiveNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

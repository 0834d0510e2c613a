//! Date value object accepting several input representations.
//!
//! A [`SafeDate`] can be built from an existing timestamp, an RFC 3339
//! string, a plain `YYYY-MM-DD` date, or epoch milliseconds. Anything
//! unparseable is a type failure; there is no silent "now" fallback.

use crate::error::{ValidationError, ValidationResult};
use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use serde_json::Value;
use std::fmt;

/// An optional inclusive interval over timestamps.
#[derive(Debug, Clone, Copy, Default)]
pub struct DateInterval {
    pub min: Option<DateTime<Utc>>,
    pub max: Option<DateTime<Utc>>,
}

impl DateInterval {
    pub const NONE: DateInterval = DateInterval {
        min: None,
        max: None,
    };

    pub fn contains(&self, value: DateTime<Utc>) -> bool {
        self.min.is_none_or(|min| value >= min) && self.max.is_none_or(|max| value <= max)
    }
}

/// A validated UTC timestamp inside its declared interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SafeDate(DateTime<Utc>);

impl SafeDate {
    /// Pure interval check over an already-parsed timestamp.
    pub fn validate(
        field: &str,
        value: DateTime<Utc>,
        interval: &DateInterval,
    ) -> ValidationResult<()> {
        if !interval.contains(value) {
            return Err(ValidationError::out_of_interval(
                field,
                format!(
                    "{} is outside [{}, {}]",
                    value.to_rfc3339(),
                    interval.min.map_or("-".to_string(), |m| m.to_rfc3339()),
                    interval.max.map_or("-".to_string(), |m| m.to_rfc3339()),
                ),
            ));
        }
        Ok(())
    }

    /// Validating constructor from an existing timestamp.
    pub fn new(field: &str, value: DateTime<Utc>, interval: &DateInterval) -> ValidationResult<Self> {
        Self::validate(field, value, interval)?;
        Ok(Self(value))
    }

    /// Parse an RFC 3339 timestamp or a plain `YYYY-MM-DD` date.
    pub fn parse(field: &str, raw: &str, interval: &DateInterval) -> ValidationResult<Self> {
        let trimmed = raw.trim();
        let parsed = DateTime::parse_from_rfc3339(trimmed)
            .map(|dt| dt.with_timezone(&Utc))
            .or_else(|_| {
                NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
                    .map(|d| Utc.from_utc_datetime(&d.and_time(NaiveTime::MIN)))
            })
            .map_err(|_| ValidationError::InvalidDate {
                field: field.to_string(),
                value: raw.to_string(),
            })?;
        Self::new(field, parsed, interval)
    }

    /// Build from epoch milliseconds.
    pub fn from_epoch_millis(field: &str, millis: i64, interval: &DateInterval) -> ValidationResult<Self> {
        let parsed = Utc
            .timestamp_millis_opt(millis)
            .single()
            .ok_or_else(|| ValidationError::InvalidDate {
                field: field.to_string(),
                value: millis.to_string(),
            })?;
        Self::new(field, parsed, interval)
    }

    /// Extract from a document field: a string or an epoch-millisecond
    /// number is accepted; any other shape is a type failure.
    pub fn from_value(field: &str, value: &Value, interval: &DateInterval) -> ValidationResult<Self> {
        match value {
            Value::String(s) => Self::parse(field, s, interval),
            Value::Number(n) => {
                let millis = n.as_i64().ok_or_else(|| ValidationError::InvalidDate {
                    field: field.to_string(),
                    value: n.to_string(),
                })?;
                Self::from_epoch_millis(field, millis, interval)
            }
            other => Err(ValidationError::InvalidDate {
                field: field.to_string(),
                value: other.to_string(),
            }),
        }
    }

    /// Message-returning validator over the string form: `""` when valid.
    pub fn check(field: &str, raw: &str, interval: &DateInterval) -> String {
        match Self::parse(field, raw, interval) {
            Ok(_) => String::new(),
            Err(e) => e.message(),
        }
    }

    pub fn value(&self) -> DateTime<Utc> {
        self.0
    }

    pub fn to_rfc3339(&self) -> String {
        self.0.to_rfc3339()
    }
}

impl fmt::Display for SafeDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

//! Core type definitions with validation.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Date format used for stored and user-entered dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Clock format used for stored and user-entered times.
pub const TIME_FORMAT: &str = "%H:%M";

/// Validation errors for input to mutating operations.
///
/// State is left unchanged whenever one of these is returned.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    /// The provided value was empty after trimming.
    #[error("{field} cannot be empty")]
    Empty { field: &'static str },

    /// The flavor is already registered.
    #[error("flavor already exists: {name}")]
    DuplicateFlavor { name: String },

    /// The flavor is not in the registry.
    #[error("unknown flavor: {name}")]
    UnknownFlavor { name: String },

    /// A cost was negative, NaN or infinite.
    #[error("cost must be a non-negative number, got {value}")]
    InvalidCost { value: f64 },

    /// A date string did not match `YYYY-MM-DD`.
    #[error("invalid date {value:?}, expected YYYY-MM-DD")]
    InvalidDate { value: String },

    /// A time string did not match `HH:MM`.
    #[error("invalid time {value:?}, expected HH:MM")]
    InvalidTime { value: String },

    /// An event id was not a non-negative integer.
    #[error("invalid event id: {value}")]
    InvalidEventId { value: String },
}

/// A structural invariant would be broken by the requested operation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvariantViolation {
    /// Removing the flavor would leave the registry empty.
    #[error("cannot remove {name:?}: at least one flavor must remain")]
    LastFlavor { name: String },
}

/// Any rejection from a mutating tracker operation.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TrackerError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Invariant(#[from] InvariantViolation),
}

/// Identifier of a logged event.
///
/// Ids are assigned by the event store and strictly increase in insertion order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(u64);

impl EventId {
    /// The id handed to the first event of an empty store.
    pub const FIRST: Self = Self(1);

    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }

    /// Returns the id following this one.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for EventId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u64>()
            .map(Self)
            .map_err(|_| ValidationError::InvalidEventId {
                value: s.to_string(),
            })
    }
}

/// Normalizes a person's display name.
///
/// Trims surrounding whitespace, upper-cases the first character and
/// lower-cases the rest: `" bOB "` becomes `"Bob"`. When the first character
/// upper-cases to several characters (`ß` -> `SS`), only the first of them
/// stays upper-case so that normalizing twice changes nothing.
pub fn normalize_person(name: &str) -> String {
    let mut chars = name.trim().chars();
    let Some(first) = chars.next() else {
        return String::new();
    };

    let mut upper = first.to_uppercase();
    let mut normalized = String::with_capacity(name.len());
    normalized.extend(upper.next());
    normalized.extend(upper.flat_map(char::to_lowercase));
    normalized.extend(chars.flat_map(char::to_lowercase));
    normalized
}

/// Parses a calendar date in `YYYY-MM-DD` form.
pub fn parse_date(value: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|_| {
        ValidationError::InvalidDate {
            value: value.to_string(),
        }
    })
}

/// Parses a 24-hour clock time in `HH:MM` form.
pub fn parse_time(value: &str) -> Result<NaiveTime, ValidationError> {
    NaiveTime::parse_from_str(value.trim(), TIME_FORMAT).map_err(|_| {
        ValidationError::InvalidTime {
            value: value.to_string(),
        }
    })
}

/// Checks that a cost is a finite, non-negative amount.
pub fn validate_cost(value: f64) -> Result<f64, ValidationError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(ValidationError::InvalidCost { value })
    }
}

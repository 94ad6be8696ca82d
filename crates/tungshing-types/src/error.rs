use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors surfaced to callers of the tungshing query interface.
#[derive(Debug, Error, Clone, PartialEq, Serialize, Deserialize)]
pub enum TungShingError {
    /// Unrecognized IANA timezone identifier (rule or display timezone).
    #[error("Unrecognized timezone identifier '{name}'{}", hints(.suggestions))]
    InvalidTimezone {
        name: String,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        suggestions: Vec<String>,
    },

    /// Malformed or non-existent local datetime.
    #[error("Invalid datetime '{input}': {reason}")]
    InvalidDatetime { input: String, reason: String },

    /// The ephemeris could not supply the solar terms needed for the instant.
    #[error("Cannot resolve pillar boundaries at {instant}: {reason}")]
    BoundaryResolution {
        instant: DateTime<Utc>,
        reason: String,
    },

    /// The legacy calendar rejected the resolved date or its options.
    #[error("Legacy calendar rejected {date}: {message}")]
    LegacyForwarding { date: NaiveDate, message: String },
}

impl TungShingError {
    /// Creates an `InvalidTimezone` error.
    pub fn invalid_timezone(name: impl Into<String>) -> Self {
        Self::invalid_timezone_with_suggestions(name, Vec::new())
    }

    /// Creates an `InvalidTimezone` error carrying correction hints.
    pub fn invalid_timezone_with_suggestions(name: impl Into<String>, suggestions: Vec<String>) -> Self {
        Self::InvalidTimezone {
            name: name.into(),
            suggestions,
        }
    }

    /// Creates an `InvalidDatetime` error.
    pub fn invalid_datetime(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidDatetime {
            input: input.into(),
            reason: reason.into(),
        }
    }

    pub fn boundary_resolution(instant: DateTime<Utc>, reason: impl ToString) -> Self {
        Self::BoundaryResolution {
            instant,
            reason: reason.to_string(),
        }
    }

    pub fn legacy_forwarding(date: NaiveDate, message: impl ToString) -> Self {
        Self::LegacyForwarding {
            date,
            message: message.to_string(),
        }
    }

    /// Correction hints attached to the error, if any.
    pub fn suggestions(&self) -> &[String] {
        match self {
            Self::InvalidTimezone { suggestions, .. } => suggestions,
            _ => &[],
        }
    }
}

fn hints(suggestions: &[String]) -> String {
    suggestions.iter().map(|s| format!("\n  hint: {}", s)).collect()
}

use chrono::{DateTime, Utc};
use thiserror::Error;
use tungshing_astronomy::EphemerisError;

/// Errors from boundary resolution.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ResolveError {
    /// No term of the required kind precedes the instant within the search window.
    #[error("No {what} term at or before {instant} within the search window")]
    MissingTerm {
        instant: DateTime<Utc>,
        what: &'static str,
    },

    #[error("Ephemeris lookup failed: {0}")]
    Ephemeris(#[from] EphemerisError),

    /// The instant has no representable civil date in the rule timezone.
    #[error("{instant} cannot be placed on a civil date")]
    InvalidInstant { instant: DateTime<Utc> },
}

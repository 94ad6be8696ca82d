use chrono::NaiveDate;
use thiserror::Error;
use tungshing_astronomy::EphemerisError;

/// First civil year the lunisolar calendar covers.
pub const LUNISOLAR_MIN_YEAR: i32 = 1901;
/// Last civil year the lunisolar calendar covers.
pub const LUNISOLAR_MAX_YEAR: i32 = 2099;

/// Errors from legacy calendar lookups.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CalendarError {
    /// Date outside the supported civil years.
    #[error("Date {date} is out of supported range ({min} to {max})")]
    DateOutOfRange {
        date: NaiveDate,
        min: NaiveDate,
        max: NaiveDate,
    },

    #[error("Ephemeris lookup failed: {0}")]
    Ephemeris(#[from] EphemerisError),

    /// Astronomical data did not yield a well-formed year of months.
    #[error("Cannot build the lunisolar year {year}: {reason}")]
    InvalidTable { year: i32, reason: String },
}

impl CalendarError {
    /// Creates a `DateOutOfRange` error with the standard bounds.
    pub fn date_out_of_range(date: NaiveDate) -> Self {
        Self::DateOutOfRange {
            date,
            min: NaiveDate::from_ymd_opt(LUNISOLAR_MIN_YEAR, 1, 1).unwrap_or(NaiveDate::MIN),
            max: NaiveDate::from_ymd_opt(LUNISOLAR_MAX_YEAR, 12, 31).unwrap_or(NaiveDate::MAX),
        }
    }

    pub fn invalid_table(year: i32, reason: impl Into<String>) -> Self {
        Self::InvalidTable {
            year,
            reason: reason.into(),
        }
    }
}

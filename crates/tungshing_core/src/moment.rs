//! Query inputs: aware or naive points in time.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use tungshing_types::TungShingError;

/// A point in time as supplied by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Moment {
    Aware(DateTime<FixedOffset>),
    /// Wall-clock time in the display timezone.
    Naive(NaiveDateTime),
}

impl Moment {
    /// The absolute instant, reading naive values in `display_tz`.
    ///
    /// A wall-clock time repeated by a DST fall-back maps to its earlier
    /// occurrence; one skipped by a spring-forward is an error.
    pub fn to_utc(self, display_tz: Tz) -> Result<DateTime<Utc>, TungShingError> {
        match self {
            Moment::Aware(at) => Ok(at.with_timezone(&Utc)),
            Moment::Naive(local) => display_tz
                .from_local_datetime(&local)
                .earliest()
                .map(|at| at.with_timezone(&Utc))
                .ok_or_else(|| {
                    TungShingError::invalid_datetime(
                        local.to_string(),
                        format!("does not exist in {}", display_tz),
                    )
                }),
        }
    }
}

impl<Z: TimeZone> From<DateTime<Z>> for Moment {
    fn from(at: DateTime<Z>) -> Self {
        Moment::Aware(at.fixed_offset())
    }
}

impl From<NaiveDateTime> for Moment {
    fn from(local: NaiveDateTime) -> Self {
        Moment::Naive(local)
    }
}

impl From<NaiveDate> for Moment {
    fn from(date: NaiveDate) -> Self {
        Moment::Naive(date.and_time(NaiveTime::MIN))
    }
}

const AWARE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M%:z",
    "%Y-%m-%dT%H:%M%z",
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M%:z",
];

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Parses ISO-8601 input: with or without an offset, with or without
/// seconds, or a bare date (midnight).
pub fn parse_moment(input: &str) -> Result<Moment, TungShingError> {
    let s = input.trim();

    if let Ok(at) = DateTime::parse_from_rfc3339(s) {
        return Ok(Moment::Aware(at));
    }
    if let Some(at) = AWARE_FORMATS
        .iter()
        .find_map(|fmt| DateTime::parse_from_str(s, fmt).ok())
    {
        return Ok(Moment::Aware(at));
    }
    if let Some(local) = NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
    {
        return Ok(Moment::Naive(local));
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map(Moment::from)
        .map_err(|_| TungShingError::invalid_datetime(input, "expected an ISO-8601 date or datetime"))
}

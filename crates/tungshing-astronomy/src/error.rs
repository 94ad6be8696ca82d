use thiserror::Error;

/// Errors from ephemeris lookups.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EphemerisError {
    /// Requested year lies outside the provider's valid range.
    #[error("Year {year} is outside the ephemeris range ({min} to {max})")]
    OutOfRange { year: i32, min: i32, max: i32 },

    /// Iterative solver did not settle.
    #[error("{what} did not converge near JD {jd:.5}")]
    NoConvergence { what: &'static str, jd: f64 },

    /// Julian date cannot be represented as a UTC instant.
    #[error("JD {jd} cannot be represented as a UTC instant")]
    InvalidInstant { jd: f64 },

    /// A table-backed provider has no entry for the requested term.
    #[error("No data for {term} of solar year {year}")]
    MissingEntry { year: i32, term: String },
}

impl EphemerisError {
    pub fn out_of_range(year: i32, range: &std::ops::RangeInclusive<i32>) -> Self {
        Self::OutOfRange {
            year,
            min: *range.start(),
            max: *range.end(),
        }
    }
}

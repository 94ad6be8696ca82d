//! Julian dates and the TT/UT offset (ΔT).
//!
//! Solar and lunar theories are evaluated in Terrestrial Time (TT); the
//! instants handed back to callers are civil UTC, rounded to whole seconds.

use chrono::{DateTime, Utc};

use crate::error::EphemerisError;

/// Julian date of J2000.0 (2000-01-01T12:00 TT).
pub const J2000: f64 = 2_451_545.0;

/// Julian date of the Unix epoch.
const UNIX_EPOCH_JD: f64 = 2_440_587.5;

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Julian date (UT) of a UTC instant.
pub fn jd_from_utc(instant: DateTime<Utc>) -> f64 {
    UNIX_EPOCH_JD
        + instant.timestamp() as f64 / SECONDS_PER_DAY
        + instant.timestamp_subsec_nanos() as f64 / (SECONDS_PER_DAY * 1e9)
}

/// UTC instant of a Julian date (UT), rounded to the nearest second.
pub fn utc_from_jd(jd: f64) -> Result<DateTime<Utc>, EphemerisError> {
    let seconds = ((jd - UNIX_EPOCH_JD) * SECONDS_PER_DAY).round();
    if !seconds.is_finite() {
        return Err(EphemerisError::InvalidInstant { jd });
    }
    DateTime::from_timestamp(seconds as i64, 0).ok_or(EphemerisError::InvalidInstant { jd })
}

/// Decimal year of a Julian date, precise enough for ΔT lookups.
pub fn decimal_year(jd: f64) -> f64 {
    2000.0 + (jd - J2000) / 365.25
}

/// ΔT = TT − UT in seconds for the month containing `jd`, from the
/// Espenak–Meeus polynomials.
pub fn delta_t(jd: f64) -> f64 {
    let year = decimal_year(jd);
    let whole = year.floor();
    let month = ((year - whole) * 12.0).floor().clamp(0.0, 11.0) as u8 + 1;
    astro::time::delta_t(whole as i32, month)
}

/// Converts a Julian date in TT to UT.
pub fn tt_to_ut(jd_tt: f64) -> f64 {
    jd_tt - delta_t(jd_tt) / SECONDS_PER_DAY
}

/// Converts a Julian date in UT to TT.
pub fn ut_to_tt(jd_ut: f64) -> f64 {
    jd_ut + delta_t(jd_ut) / SECONDS_PER_DAY
}

/// Julian centuries of TT since J2000.0.
pub fn centuries(jd_tt: f64) -> f64 {
    (jd_tt - J2000) / 36525.0
}

/// Wraps an angle in degrees into `[0, 360)`.
pub fn normalize_degrees(angle: f64) -> f64 {
    angle.rem_euclid(360.0)
}

/// Wraps an angle in degrees into `[-180, 180)`.
pub fn normalize_pm180(angle: f64) -> f64 {
    (angle + 180.0).rem_euclid(360.0) - 180.0
}

//! New moons as zeros of the Moon-Sun elongation.

use log::trace;

use crate::error::EphemerisError;
use crate::solar;
use crate::time::{normalize_degrees, normalize_pm180};

/// Mean synodic month in days.
pub const SYNODIC_MONTH: f64 = 29.530_588_861;

/// TT Julian date of the mean new moon of 2000-01-06 (lunation 0).
const LUNATION_EPOCH: f64 = 2_451_550.097_66;

/// Mean rate of the elongation in degrees per day.
const ELONGATION_RATE: f64 = 360.0 / SYNODIC_MONTH;

const TOLERANCE_DEG: f64 = 1e-7;

const MAX_ITERATIONS: usize = 40;

/// Geocentric ecliptic longitude of the Moon in degrees, mean equinox of date.
pub fn moon_longitude(jd_tt: f64) -> f64 {
    let (point, _distance_km) = astro::lunar::geocent_ecl_pos(jd_tt);
    normalize_degrees(point.long.to_degrees())
}

/// Moon-Sun elongation in degrees, `[-180, 180)`. Zero at new moon.
pub fn elongation(jd_tt: f64) -> f64 {
    normalize_pm180(moon_longitude(jd_tt) - solar::mean_longitude_of_date(jd_tt))
}

/// Lunation number whose mean new moon lies nearest `jd_tt`.
pub fn lunation_near(jd_tt: f64) -> i64 {
    ((jd_tt - LUNATION_EPOCH) / SYNODIC_MONTH).round() as i64
}

/// TT Julian date of the true new moon of lunation `k`.
pub fn new_moon_jd(k: i64) -> Result<f64, EphemerisError> {
    let mut jd = LUNATION_EPOCH + SYNODIC_MONTH * k as f64;

    for iteration in 0..MAX_ITERATIONS {
        let e = elongation(jd);
        jd -= e / ELONGATION_RATE;
        if e.abs() < TOLERANCE_DEG {
            trace!("lunation {} converged after {} iterations", k, iteration + 1);
            return Ok(jd);
        }
    }

    Err(EphemerisError::NoConvergence {
        what: "lunar elongation",
        jd,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::{jd_from_utc, tt_to_ut, utc_from_jd};
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_new_moon_of_december_1999() {
        // 1999-12-07 22:32 UTC
        let guess = jd_from_utc(Utc.with_ymd_and_hms(1999, 12, 8, 0, 0, 0).unwrap());
        let jd = new_moon_jd(lunation_near(guess)).unwrap();
        let at = utc_from_jd(tt_to_ut(jd)).unwrap();
        let expected = Utc.with_ymd_and_hms(1999, 12, 7, 22, 32, 0).unwrap();
        assert!((at - expected).num_seconds().abs() < 120, "{}", at);
    }

    #[test]
    fn test_elongation_near_full_moon() {
        // Full moon of 2025-01-13 22:27 UTC
        let jd = jd_from_utc(Utc.with_ymd_and_hms(2025, 1, 13, 22, 27, 0).unwrap());
        assert!(elongation(jd).abs() > 179.0);
    }

    #[test]
    fn test_consecutive_lunations() {
        let a = new_moon_jd(300).unwrap();
        let b = new_moon_jd(301).unwrap();
        assert!(b - a > 29.2 && b - a < 29.9);
    }
}

//! Apparent geocentric longitude of the Sun and solar-term instants.
//!
//! The heliocentric position of the Earth comes from the full VSOP87D series
//! (ecliptic and equinox of date). It is turned into the apparent solar
//! longitude with the FK5 correction, nutation in longitude and annual
//! aberration.

use std::f64::consts::PI;

use log::trace;
use tungshing_types::SolarTerm;

use crate::error::EphemerisError;
use crate::time::{centuries, normalize_degrees, normalize_pm180};

/// Mean daily motion of the Sun in degrees.
const MEAN_MOTION: f64 = 360.0 / 365.242_189_6;

/// Longitude tolerance of the solver, about a millisecond of time.
const TOLERANCE_DEG: f64 = 1e-8;

const MAX_ITERATIONS: usize = 20;

/// Geometric geocentric longitude (radians, FK5 frame, mean equinox of
/// date) and Sun-Earth distance (AU).
fn geometric_position(jd_tt: f64) -> (f64, f64) {
    let earth = vsop87::vsop87d::earth(jd_tt);
    let lon = earth.longitude() + PI;
    let lat = -earth.latitude();
    let (lon_fk5, _lat_fk5) = astro::sun::ecl_coords_to_FK5(jd_tt, lon, lat);
    (lon_fk5, earth.distance())
}

/// Solar longitude corrected for aberration but not nutation (mean equinox
/// of date). Used for Moon-Sun elongation, where nutation cancels.
pub fn mean_longitude_of_date(jd_tt: f64) -> f64 {
    let (lon, r) = geometric_position(jd_tt);
    normalize_degrees((lon + astro::aberr::sol_aberr(r)).to_degrees())
}

/// Apparent geocentric longitude of the Sun in degrees, `[0, 360)`.
pub fn apparent_longitude(jd_tt: f64) -> f64 {
    let (lon, r) = geometric_position(jd_tt);
    let (nut_in_long, _nut_in_oblq) = astro::nutation::nutation(jd_tt);
    normalize_degrees((lon + nut_in_long + astro::aberr::sol_aberr(r)).to_degrees())
}

/// Low-precision apparent longitude (about 0.01°), for initial guesses.
fn approximate_longitude(jd_tt: f64) -> f64 {
    let t = centuries(jd_tt);
    let l0 = 280.46646 + 36000.76983 * t + 0.0003032 * t * t;
    let m = (357.52911 + 35999.05029 * t - 0.0001537 * t * t).to_radians();
    let c = (1.914602 - 0.004817 * t - 0.000014 * t * t) * m.sin()
        + (0.019993 - 0.000101 * t) * (2.0 * m).sin()
        + 0.000289 * (3.0 * m).sin();
    let omega = (125.04 - 1934.136 * t).to_radians();
    normalize_degrees(l0 + c - 0.00569 - 0.00478 * omega.sin())
}

/// Estimated TT Julian date of `term` in solar year `year`, within about
/// fifteen minutes.
pub fn estimate_term(year: i32, term: SolarTerm) -> f64 {
    let march_equinox = 2_451_623.809_84 + 365.242_374 * (year - 2000) as f64;
    let offset_deg = (term.longitude() + 45.0).rem_euclid(360.0) - 45.0;
    let mut jd = march_equinox + offset_deg / MEAN_MOTION;
    for _ in 0..2 {
        jd += normalize_pm180(term.longitude() - approximate_longitude(jd)) / MEAN_MOTION;
    }
    jd
}

/// TT Julian date at which the apparent solar longitude reaches the start
/// of `term` in solar year `year`.
pub fn term_jd(year: i32, term: SolarTerm) -> Result<f64, EphemerisError> {
    let target = term.longitude();
    let mut jd = estimate_term(year, term);

    for iteration in 0..MAX_ITERATIONS {
        let diff = normalize_pm180(target - apparent_longitude(jd));
        jd += diff / MEAN_MOTION;
        if diff.abs() < TOLERANCE_DEG {
            trace!("{} {} converged after {} iterations at JD {:.6}", year, term, iteration + 1, jd);
            return Ok(jd);
        }
    }

    Err(EphemerisError::NoConvergence {
        what: "solar longitude",
        jd,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::J2000;

    #[test]
    fn test_meeus_example_25b() {
        // 1992-10-13 0h TD: FK5 λ = 199°54'26.18", Δψ = +15.908", aberration −20.539"
        let lon = apparent_longitude(2448908.5);
        let expected = 199.0 + 54.0 / 60.0 + 21.55 / 3600.0;
        assert!((lon - expected).abs() < 0.1 / 3600.0, "λ = {}", lon);
        assert!((mean_longitude_of_date(2448908.5) - (expected - 15.908 / 3600.0)).abs() < 0.1 / 3600.0);
    }

    #[test]
    fn test_meeus_example_22a() {
        // 1987-04-10 0h TD: Δψ = −3.788"
        let jd = 2446895.5;
        let dpsi = normalize_pm180(apparent_longitude(jd) - mean_longitude_of_date(jd)) * 3600.0;
        assert!((dpsi + 3.788).abs() < 0.01, "Δψ = {}", dpsi);
    }

    #[test]
    fn test_estimate_is_close() {
        for term in SolarTerm::ALL {
            let estimate = estimate_term(2025, term);
            let exact = term_jd(2025, term).unwrap();
            assert!((estimate - exact).abs() < 0.05, "{}: {} vs {}", term, estimate, exact);
        }
    }

    #[test]
    fn test_terms_are_ordered_within_a_solar_year() {
        let jds: Vec<f64> = SolarTerm::ALL
            .into_iter()
            .map(|t| term_jd(2000, t).unwrap())
            .collect();
        for pair in jds.windows(2) {
            assert!(pair[1] > pair[0]);
            assert!(pair[1] - pair[0] > 14.0 && pair[1] - pair[0] < 16.5);
        }
        // Lichun 2000 lies in early February.
        assert!(jds[0] > J2000 + 30.0 && jds[0] < J2000 + 37.0);
    }
}

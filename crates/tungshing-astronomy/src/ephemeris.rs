use chrono::{DateTime, Datelike, Utc};
use log::{debug, trace};
use smallvec::SmallVec;
use std::collections::HashMap;
use std::fmt;
use std::ops::RangeInclusive;
use std::sync::{Arc, Mutex};
use tungshing_types::{SolarTerm, TermInstant};

use crate::error::EphemerisError;
use crate::time::{jd_from_utc, tt_to_ut, ut_to_tt, utc_from_jd};
use crate::{lunar, solar};

/// First solar year [`VsopEphemeris`] answers for.
pub const EPHEMERIS_MIN_YEAR: i32 = 1800;
/// Last solar year [`VsopEphemeris`] answers for.
pub const EPHEMERIS_MAX_YEAR: i32 = 2150;

/// Margin, in days, around a window when picking candidate terms by their
/// mean-motion estimate.
const ESTIMATE_SLACK_DAYS: f64 = 2.0;

/// Source of solar-term and new-moon instants.
///
/// A *solar year* `Y` runs from Lichun of Gregorian year `Y` to the next
/// Lichun, so Xiaohan and Dahan of solar year `Y` fall in January `Y + 1`.
/// All instants are whole seconds.
pub trait Ephemeris: Send + Sync {
    /// Solar years this provider can answer for.
    fn valid_years(&self) -> RangeInclusive<i32>;

    /// Instant at which `term` of solar year `year` begins.
    fn term_instant(&self, year: i32, term: SolarTerm) -> Result<TermInstant, EphemerisError>;

    /// New moons with `start <= t < end`, ascending.
    fn new_moons_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<DateTime<Utc>>, EphemerisError>;

    /// Solar terms with `start <= at < end`, ascending.
    ///
    /// Candidates are picked by their mean-motion estimate, so only terms
    /// near the window are asked of [`Ephemeris::term_instant`].
    fn terms_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<SmallVec<[TermInstant; 4]>, EphemerisError> {
        let mut found: SmallVec<[TermInstant; 4]> = SmallVec::new();
        if end <= start {
            return Ok(found);
        }

        let lo = jd_from_utc(start) - ESTIMATE_SLACK_DAYS;
        let hi = jd_from_utc(end) + ESTIMATE_SLACK_DAYS;

        for year in (start.year() - 1)..=end.year() {
            for term in SolarTerm::ALL {
                let estimate = solar::estimate_term(year, term);
                if estimate < lo || estimate > hi {
                    continue;
                }
                let instant = self.term_instant(year, term)?;
                if start <= instant.at && instant.at < end {
                    found.push(instant);
                }
            }
        }

        found.sort_by_key(|t| t.at);
        Ok(found)
    }
}

impl<E: Ephemeris + ?Sized> Ephemeris for Arc<E> {
    fn valid_years(&self) -> RangeInclusive<i32> {
        (**self).valid_years()
    }

    fn term_instant(&self, year: i32, term: SolarTerm) -> Result<TermInstant, EphemerisError> {
        (**self).term_instant(year, term)
    }

    fn new_moons_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<DateTime<Utc>>, EphemerisError> {
        (**self).new_moons_between(start, end)
    }

    fn terms_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<SmallVec<[TermInstant; 4]>, EphemerisError> {
        (**self).terms_between(start, end)
    }
}

/// Ephemeris computed from VSOP87D (Sun) and the truncated ELP-2000/82
/// series (Moon).
///
/// Term instants agree with published almanacs to within a minute over
/// 1900-2100. Results are memoised per instance.
#[derive(Default)]
pub struct VsopEphemeris {
    terms: Mutex<HashMap<(i32, SolarTerm), TermInstant>>,
    new_moons: Mutex<HashMap<i64, DateTime<Utc>>>,
}

impl fmt::Debug for VsopEphemeris {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VsopEphemeris")
            .field("years", &self.valid_years())
            .finish_non_exhaustive()
    }
}

impl VsopEphemeris {
    pub fn new() -> Self {
        Self::default()
    }

    fn check_year(&self, year: i32) -> Result<(), EphemerisError> {
        let years = self.valid_years();
        if years.contains(&year) {
            Ok(())
        } else {
            Err(EphemerisError::out_of_range(year, &years))
        }
    }

    fn new_moon(&self, k: i64) -> Result<DateTime<Utc>, EphemerisError> {
        if let Some(at) = self.new_moons.lock().unwrap_or_else(|e| e.into_inner()).get(&k) {
            return Ok(*at);
        }
        let at = utc_from_jd(tt_to_ut(lunar::new_moon_jd(k)?))?;
        self.new_moons
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(k, at);
        Ok(at)
    }
}

impl Ephemeris for VsopEphemeris {
    fn valid_years(&self) -> RangeInclusive<i32> {
        EPHEMERIS_MIN_YEAR..=EPHEMERIS_MAX_YEAR
    }

    fn term_instant(&self, year: i32, term: SolarTerm) -> Result<TermInstant, EphemerisError> {
        self.check_year(year)?;

        if let Some(hit) = self.terms.lock().unwrap_or_else(|e| e.into_inner()).get(&(year, term)) {
            return Ok(*hit);
        }

        let at = utc_from_jd(tt_to_ut(solar::term_jd(year, term)?))?;
        let instant = TermInstant::new(year, term, at);
        trace!("{} of solar year {} at {}", term, year, at);

        self.terms
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert((year, term), instant);
        Ok(instant)
    }

    fn new_moons_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<DateTime<Utc>>, EphemerisError> {
        self.check_year(start.year())?;
        self.check_year(end.year())?;

        let first = lunar::lunation_near(ut_to_tt(jd_from_utc(start))) - 1;
        let last = lunar::lunation_near(ut_to_tt(jd_from_utc(end))) + 1;

        let mut moons = Vec::new();
        for k in first..=last {
            let at = self.new_moon(k)?;
            if start <= at && at < end {
                moons.push(at);
            }
        }
        debug!("{} new moons between {} and {}", moons.len(), start, end);
        Ok(moons)
    }
}

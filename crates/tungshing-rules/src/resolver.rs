use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, TimeZone, Timelike, Utc};
use chrono_tz::Tz;
use log::debug;
use smallvec::SmallVec;
use tungshing_astronomy::Ephemeris;
use tungshing_types::{Sexagenary, SolarTerm, TermInstant};

use crate::error::ResolveError;

/// Clock hour at which the next day's pillar begins.
pub const LATE_ZI_HOUR: u32 = 23;

/// Lookback for the latest Jie; Jie terms are at most ~31.5 days apart.
const JIE_WINDOW_DAYS: i64 = 35;

/// Strict pillars of one instant.
#[derive(Debug, Clone, PartialEq)]
pub struct Boundaries {
    pub instant: DateTime<Utc>,
    /// Ganzhi year, numbered like the Gregorian year its Lichun falls in.
    pub year_number: i32,
    pub year: Sexagenary,
    /// Lichun that opened `year_number`.
    pub lichun: TermInstant,
    /// Jie that opened the current Ganzhi month.
    pub month_term: TermInstant,
    pub month: Sexagenary,
    /// Rule-timezone civil date of the day pillar, rolled forward in the
    /// late Zi hour. All day-granular fields are read at this date.
    pub day_date: NaiveDate,
    pub day: Sexagenary,
    pub late_zi_hour: bool,
    /// `instant + 1h` in the late Zi hour, otherwise `instant`.
    pub rolled_instant: DateTime<Utc>,
}

impl Boundaries {
    /// Date every forwarded legacy field must be evaluated at.
    pub fn resolved_display_date(&self) -> NaiveDate {
        self.day_date
    }
}

/// Resolves the strict year, month and day pillars of `instant`.
///
/// Year and month are decided by the instant itself against the exact term
/// instants; only the day boundary depends on `rule_tz` clock time.
pub fn resolve<E: Ephemeris + ?Sized>(
    ephemeris: &E,
    instant: DateTime<Utc>,
    rule_tz: Tz,
) -> Result<Boundaries, ResolveError> {
    let lichun = latest_lichun(ephemeris, instant)?;
    let year_number = lichun.year;

    let month_term = latest_jie(ephemeris, instant)?;
    let ordinal = month_term
        .term
        .month_ordinal()
        .ok_or(ResolveError::MissingTerm { instant, what: "Jie" })?;

    let local = instant.with_timezone(&rule_tz);
    let late_zi_hour = local.hour() == LATE_ZI_HOUR;
    let day_date = if late_zi_hour {
        local
            .date_naive()
            .succ_opt()
            .ok_or(ResolveError::InvalidInstant { instant })?
    } else {
        local.date_naive()
    };
    let rolled_instant = if late_zi_hour {
        instant + Duration::hours(1)
    } else {
        instant
    };

    let boundaries = Boundaries {
        instant,
        year_number,
        year: Sexagenary::of_year(year_number),
        lichun,
        month_term,
        month: Sexagenary::of_month(month_term.year, ordinal),
        day_date,
        day: Sexagenary::of_day(day_date),
        late_zi_hour,
        rolled_instant,
    };

    debug!(
        "{} in {}: year {} (Lichun {}), month {} ({} at {}), day {} on {}{}",
        instant,
        rule_tz,
        boundaries.year,
        lichun.at,
        boundaries.month,
        month_term.term,
        month_term.at,
        boundaries.day,
        day_date,
        if late_zi_hour { " (late Zi hour)" } else { "" }
    );

    Ok(boundaries)
}

/// Latest Lichun at or before `instant`: that of the instant's Gregorian
/// year if already passed, otherwise the previous one.
fn latest_lichun<E: Ephemeris + ?Sized>(ephemeris: &E, instant: DateTime<Utc>) -> Result<TermInstant, ResolveError> {
    let candidate = ephemeris.term_instant(instant.year(), SolarTerm::LiChun)?;
    if instant >= candidate.at {
        return Ok(candidate);
    }
    let previous = ephemeris.term_instant(instant.year() - 1, SolarTerm::LiChun)?;
    if instant >= previous.at {
        Ok(previous)
    } else {
        Err(ResolveError::MissingTerm { instant, what: "Lichun" })
    }
}

/// Latest Jie term at or before `instant`.
fn latest_jie<E: Ephemeris + ?Sized>(ephemeris: &E, instant: DateTime<Utc>) -> Result<TermInstant, ResolveError> {
    let terms: SmallVec<[TermInstant; 4]> = ephemeris.terms_between(
        instant - Duration::days(JIE_WINDOW_DAYS),
        instant + Duration::nanoseconds(1),
    )?;
    terms
        .into_iter()
        .rfind(TermInstant::is_jie)
        .ok_or(ResolveError::MissingTerm { instant, what: "Jie" })
}

/// The solar term, if any, that begins on civil `date` in `tz`.
pub fn term_on_day<E: Ephemeris + ?Sized>(
    ephemeris: &E,
    date: NaiveDate,
    tz: Tz,
) -> Result<Option<TermInstant>, ResolveError> {
    let start = day_start(date, tz)?;
    let end = date
        .succ_opt()
        .map(|next| day_start(next, tz))
        .transpose()?
        .ok_or(ResolveError::InvalidInstant { instant: start })?;

    let terms = ephemeris.terms_between(start, end)?;
    Ok(terms.first().copied())
}

/// First instant of a civil day; midnight may be skipped by a DST change.
fn day_start(date: NaiveDate, tz: Tz) -> Result<DateTime<Utc>, ResolveError> {
    (0..3)
        .filter_map(|hour| NaiveTime::from_hms_opt(hour, 0, 0))
        .find_map(|time| tz.from_local_datetime(&date.and_time(time)).earliest())
        .map(|local| local.with_timezone(&Utc))
        .ok_or(ResolveError::InvalidInstant {
            instant: date.and_time(NaiveTime::MIN).and_utc(),
        })
}

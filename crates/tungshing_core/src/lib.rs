//! Strict-rule Chinese almanac.
//!
//! [`Almanac::query`] resolves one instant into a [`TungShing`] snapshot:
//! the year pillar turns at Lichun, the month pillar at each Jie term, the
//! day pillar at 23:00 rule-timezone clock time. All other fields come from
//! a legacy lunisolar calendar read at the resolved date, so the lunar day
//! rolls forward together with the day pillar.

pub mod almanac;
pub mod context;
pub mod extension;
pub mod moment;
pub mod snapshot;

pub use almanac::Almanac;
pub use context::{parse_timezone, suggest_timezone_fix, QueryContext, QueryContextBuilder, DEFAULT_TIMEZONE};
pub use extension::TungShingExt;
pub use moment::{parse_moment, Moment};
pub use snapshot::{TermToday, TungShing};

pub use chrono_tz::Tz;
pub use tungshing_astronomy::{Ephemeris, EphemerisError, TableEphemeris, VsopEphemeris};
pub use tungshing_calendar::{
    CalendarError, LegacyCalendar, LegacyDay, LunisolarCalendar, LunisolarOptions, YearPillarMode,
};
pub use tungshing_rules::{resolve, Boundaries, ResolveError};
pub use tungshing_types::{Branch, Script, Sexagenary, SolarTerm, Stem, TermInstant, TermKind, TungShingError};

pub mod prelude {
    pub use crate::{query, query_now};
    pub use crate::{Almanac, Moment, QueryContext, QueryContextBuilder, TungShing, TungShingExt};
    pub use crate::{LunisolarOptions, Script, Sexagenary, SolarTerm, TungShingError, YearPillarMode};
}

/// Resolves `moment` with the shared default almanac.
pub fn query(moment: impl Into<Moment>, ctx: &QueryContext) -> Result<TungShing, TungShingError> {
    Almanac::shared().query_at(moment, ctx)
}

/// Snapshot of the current instant.
pub fn query_now(ctx: &QueryContext) -> Result<TungShing, TungShingError> {
    Almanac::shared().query(None, ctx)
}

//! The forwarding façade: strict pillars over a legacy calendar.

use chrono::{DateTime, FixedOffset, Utc};
use log::{debug, info};
use std::fmt;
use std::sync::{Arc, OnceLock};
use tungshing_astronomy::{Ephemeris, VsopEphemeris};
use tungshing_calendar::{LegacyCalendar, LunisolarCalendar};
use tungshing_rules::{resolve, term_on_day};
use tungshing_types::{TermInstant, TungShingError};

use crate::context::QueryContext;
use crate::moment::Moment;
use crate::snapshot::{TermToday, TungShing};

/// Offset of the fixed reference clock for solar-term instants.
const CN8_OFFSET_SECS: i32 = 8 * 3600;

/// Resolves [`TungShing`] snapshots.
///
/// `E` decides the boundaries, `L` supplies every other field. The default
/// shares one VSOP87 ephemeris (and its memo) between both.
pub struct Almanac<E = Arc<VsopEphemeris>, L = LunisolarCalendar<Arc<VsopEphemeris>>> {
    ephemeris: E,
    legacy: L,
}

impl<E: fmt::Debug, L: fmt::Debug> fmt::Debug for Almanac<E, L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Almanac")
            .field("ephemeris", &self.ephemeris)
            .field("legacy", &self.legacy)
            .finish()
    }
}

impl Default for Almanac {
    fn default() -> Self {
        let ephemeris = Arc::new(VsopEphemeris::new());
        Self::new(Arc::clone(&ephemeris), LunisolarCalendar::new(ephemeris))
    }
}

impl Almanac {
    /// Process-wide default almanac, built on first use.
    pub fn shared() -> &'static Almanac {
        static SHARED: OnceLock<Almanac> = OnceLock::new();
        SHARED.get_or_init(Almanac::default)
    }
}

impl<E: Ephemeris, L: LegacyCalendar> Almanac<E, L> {
    pub fn new(ephemeris: E, legacy: L) -> Self {
        Self { ephemeris, legacy }
    }

    pub fn ephemeris(&self) -> &E {
        &self.ephemeris
    }

    pub fn legacy(&self) -> &L {
        &self.legacy
    }

    /// Resolves a snapshot; `None` means now.
    pub fn query(
        &self,
        moment: Option<Moment>,
        ctx: &QueryContext<L::Options>,
    ) -> Result<TungShing, TungShingError> {
        let instant = match moment {
            Some(m) => m.to_utc(ctx.display_tz)?,
            None => Utc::now(),
        };
        self.query_instant(instant, ctx)
    }

    pub fn query_at(
        &self,
        at: impl Into<Moment>,
        ctx: &QueryContext<L::Options>,
    ) -> Result<TungShing, TungShingError> {
        self.query(Some(at.into()), ctx)
    }

    fn query_instant(
        &self,
        instant: DateTime<Utc>,
        ctx: &QueryContext<L::Options>,
    ) -> Result<TungShing, TungShingError> {
        let boundaries = resolve(&self.ephemeris, instant, ctx.rule_tz)
            .map_err(|e| TungShingError::boundary_resolution(instant, e))?;

        // One legacy evaluation; every day-granular field comes from it.
        let resolved_date = boundaries.resolved_display_date();
        let legacy = self
            .legacy
            .day_fields(resolved_date, &ctx.options)
            .map_err(|e| TungShingError::legacy_forwarding(resolved_date, e))?;

        let local = instant.with_timezone(&ctx.display_tz);
        let twohour8_char = self
            .legacy
            .two_hour_pillar(local.naive_local(), &ctx.options)
            .map_err(|e| TungShingError::legacy_forwarding(local.date_naive(), e))?;

        let rule_date = instant.with_timezone(&ctx.rule_tz).date_naive();
        let term_today = term_on_day(&self.ephemeris, rule_date, ctx.rule_tz)
            .map_err(|e| TungShingError::boundary_resolution(instant, e))?
            .map(|t| today_in_both_clocks(t, ctx))
            .transpose()?;

        if boundaries.late_zi_hour {
            info!(
                "{} is in the late Zi hour of {}; day fields read at {}",
                instant, ctx.rule_tz, resolved_date
            );
        }
        debug!(
            "{}: {} {} {} {}, lunar {}-{}-{}",
            instant,
            boundaries.year,
            boundaries.month,
            boundaries.day,
            twohour8_char,
            legacy.lunar_year,
            legacy.lunar_month,
            legacy.lunar_day
        );

        Ok(TungShing {
            date: local.fixed_offset(),
            instant,
            display_tz: ctx.display_tz.to_string(),
            rule_tz: ctx.rule_tz.to_string(),
            year8_char: boundaries.year,
            month8_char: boundaries.month,
            day8_char: boundaries.day,
            twohour8_char,
            resolved_date,
            is_late_zi_hour: boundaries.late_zi_hour,
            term_today,
            legacy,
        })
    }
}

fn today_in_both_clocks<O>(term: TermInstant, ctx: &QueryContext<O>) -> Result<TermToday, TungShingError> {
    let cn8 = FixedOffset::east_opt(CN8_OFFSET_SECS)
        .ok_or_else(|| TungShingError::invalid_timezone("UTC+08:00"))?;
    Ok(TermToday {
        term: term.term,
        at_rule_tz: term.at.with_timezone(&ctx.rule_tz).fixed_offset(),
        at_cn8: term.at.with_timezone(&cn8),
    })
}

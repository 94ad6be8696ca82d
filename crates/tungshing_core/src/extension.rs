//! Extension trait for chrono date-times.

use chrono::{DateTime, NaiveDateTime, TimeZone};
use tungshing_types::{Sexagenary, TungShingError};

use crate::almanac::Almanac;
use crate::context::QueryContext;
use crate::moment::Moment;
use crate::snapshot::TungShing;

/// Almanac lookups directly on chrono values, through [`Almanac::shared`].
///
/// Naive values are read in the context's display timezone (Asia/Shanghai
/// by default).
pub trait TungShingExt {
    fn to_moment(&self) -> Moment;

    /// Snapshot with the default context.
    fn tung_shing(&self) -> Result<TungShing, TungShingError> {
        self.tung_shing_with(&QueryContext::default())
    }

    /// Snapshot with a custom context.
    fn tung_shing_with(&self, ctx: &QueryContext) -> Result<TungShing, TungShingError> {
        Almanac::shared().query(Some(self.to_moment()), ctx)
    }

    /// Strict year, month, day and two-hour pillars.
    fn four_pillars(&self) -> Result<[Sexagenary; 4], TungShingError> {
        self.tung_shing().map(|t| {
            [t.year8_char(), t.month8_char(), t.day8_char(), t.twohour8_char()]
        })
    }
}

impl<Z: TimeZone> TungShingExt for DateTime<Z> {
    fn to_moment(&self) -> Moment {
        Moment::from(self.clone())
    }
}

impl TungShingExt for NaiveDateTime {
    fn to_moment(&self) -> Moment {
        Moment::Naive(*self)
    }
}

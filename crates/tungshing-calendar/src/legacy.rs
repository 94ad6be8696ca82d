use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use tungshing_types::{Script, Sexagenary};

use crate::error::CalendarError;

/// A conventional calendar engine whose day fields are forwarded verbatim.
///
/// Implementations follow their own, date-granular boundary conventions.
/// `Options` are the engine's native rendering options; callers pass them
/// through without interpretation.
pub trait LegacyCalendar: Send + Sync {
    type Options: Clone + Default + Debug + PartialEq + Send + Sync;

    /// Field bundle for a civil date, evaluated at 12:00.
    fn day_fields(&self, date: NaiveDate, options: &Self::Options) -> Result<LegacyDay, CalendarError>;

    /// Two-hour pillar at a wall-clock time.
    fn two_hour_pillar(&self, at: NaiveDateTime, options: &Self::Options) -> Result<Sexagenary, CalendarError>;
}

/// Everything a legacy calendar knows about one civil day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyDay {
    pub date: NaiveDate,
    pub lunar_year: i32,
    /// 1..=12; a leap month repeats the number of the month before it.
    pub lunar_month: u32,
    pub lunar_day: u32,
    pub is_leap_month: bool,
    /// 30-day month (大月).
    pub month_is_long: bool,
    pub lunar_year_cn: String,
    pub lunar_month_cn: String,
    pub lunar_day_cn: String,
    pub year8_char: Sexagenary,
    pub month8_char: Sexagenary,
    pub day8_char: Sexagenary,
    pub zodiac: String,
    pub weekday_cn: String,
    /// Name of the solar term beginning on this date (UTC+8), if any.
    pub solar_term_today: Option<String>,
}

/// When the legacy year pillar turns over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum YearPillarMode {
    /// At the lunar new year (正月初一).
    #[default]
    LunarNewYear,
    /// On the civil date of Lichun.
    BeginningOfSpring,
}

/// Rendering options of [`crate::LunisolarCalendar`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LunisolarOptions {
    pub year_pillar: YearPillarMode,
    pub script: Script,
}

impl LunisolarOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn year_pillar(mut self, mode: YearPillarMode) -> Self {
        self.year_pillar = mode;
        self
    }

    pub fn script(mut self, script: Script) -> Self {
        self.script = script;
        self
    }
}

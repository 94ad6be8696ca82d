use chrono::{DateTime, FixedOffset, NaiveDate, SecondsFormat, Utc};
use serde::{Deserialize, Serialize, Serializer};
use tungshing_calendar::LegacyDay;
use tungshing_types::{Script, Sexagenary, SolarTerm};

/// The solar term beginning on the queried rule-timezone civil day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TermToday {
    pub term: SolarTerm,
    /// Exact instant in the rule timezone.
    pub at_rule_tz: DateTime<FixedOffset>,
    /// The same instant at UTC+08:00.
    pub at_cn8: DateTime<FixedOffset>,
}

impl TermToday {
    pub fn name(&self, script: Script) -> &'static str {
        self.term.name(script)
    }
}

/// One resolved almanac reading.
///
/// The year, month and day pillars follow the strict boundary rules. Every
/// other field is read through from the legacy calendar evaluated once, at
/// [`TungShing::resolved_date`], so the lunar day always moves together
/// with the day pillar. The two-hour pillar is forwarded from the legacy
/// calendar at the original wall-clock time.
///
/// Serialises as one flat camelCase object: the strict pillars, the lunar
/// fields (`lunarYear`, `lunarMonth`, `lunarDay`, `isLunarLeapMonth` and the
/// `*Cn` renderings) and the solar-term fields at the top level. The rest of
/// the legacy bundle sits under `legacy` (`date`, `monthIsLong`, `zodiac`,
/// `weekdayCn`, `solarTermToday`). The legacy calendar's own looser pillars
/// are not serialised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TungShing {
    pub(crate) date: DateTime<FixedOffset>,
    pub(crate) instant: DateTime<Utc>,
    pub(crate) display_tz: String,
    pub(crate) rule_tz: String,
    pub(crate) year8_char: Sexagenary,
    pub(crate) month8_char: Sexagenary,
    pub(crate) day8_char: Sexagenary,
    pub(crate) twohour8_char: Sexagenary,
    pub(crate) resolved_date: NaiveDate,
    pub(crate) is_late_zi_hour: bool,
    pub(crate) term_today: Option<TermToday>,
    pub(crate) legacy: LegacyDay,
}

impl TungShing {
    /// Input instant on the display timezone's wall clock.
    pub fn date(&self) -> DateTime<FixedOffset> {
        self.date
    }

    pub fn instant(&self) -> DateTime<Utc> {
        self.instant
    }

    pub fn display_tz(&self) -> &str {
        &self.display_tz
    }

    pub fn rule_tz(&self) -> &str {
        &self.rule_tz
    }

    /// Year pillar, turning at Lichun.
    pub fn year8_char(&self) -> Sexagenary {
        self.year8_char
    }

    /// Month pillar, turning at each Jie term.
    pub fn month8_char(&self) -> Sexagenary {
        self.month8_char
    }

    /// Day pillar, turning at 23:00 in the rule timezone.
    pub fn day8_char(&self) -> Sexagenary {
        self.day8_char
    }

    pub fn twohour8_char(&self) -> Sexagenary {
        self.twohour8_char
    }

    /// Rule-timezone date every legacy field was evaluated at; the day after
    /// the input's civil date during the late Zi hour.
    pub fn resolved_date(&self) -> NaiveDate {
        self.resolved_date
    }

    pub fn is_late_zi_hour(&self) -> bool {
        self.is_late_zi_hour
    }

    pub fn lunar_year(&self) -> i32 {
        self.legacy.lunar_year
    }

    pub fn lunar_month(&self) -> u32 {
        self.legacy.lunar_month
    }

    pub fn lunar_day(&self) -> u32 {
        self.legacy.lunar_day
    }

    pub fn is_lunar_leap_month(&self) -> bool {
        self.legacy.is_leap_month
    }

    pub fn lunar_year_cn(&self) -> &str {
        &self.legacy.lunar_year_cn
    }

    pub fn lunar_month_cn(&self) -> &str {
        &self.legacy.lunar_month_cn
    }

    pub fn lunar_day_cn(&self) -> &str {
        &self.legacy.lunar_day_cn
    }

    pub fn term_today(&self) -> Option<&TermToday> {
        self.term_today.as_ref()
    }

    /// ISO-8601 instant of today's solar term in the rule timezone.
    pub fn term_today_exact_rule_tz(&self) -> Option<String> {
        self.term_today
            .map(|t| t.at_rule_tz.to_rfc3339_opts(SecondsFormat::Secs, false))
    }

    /// ISO-8601 instant of today's solar term at UTC+08:00.
    pub fn term_today_exact_cn8(&self) -> Option<String> {
        self.term_today
            .map(|t| t.at_cn8.to_rfc3339_opts(SecondsFormat::Secs, false))
    }

    /// The full legacy field bundle at [`TungShing::resolved_date`].
    ///
    /// Its own pillar fields follow the legacy conventions; the strict
    /// ones are the accessors on this type.
    pub fn legacy(&self) -> &LegacyDay {
        &self.legacy
    }
}

impl Serialize for TungShing {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        SnapshotRecord::from(self).serialize(serializer)
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SnapshotRecord<'a> {
    date: DateTime<FixedOffset>,
    instant: DateTime<Utc>,
    display_tz: &'a str,
    rule_tz: &'a str,
    year8_char: Sexagenary,
    month8_char: Sexagenary,
    day8_char: Sexagenary,
    twohour8_char: Sexagenary,
    resolved_date: NaiveDate,
    is_late_zi_hour: bool,
    lunar_year: i32,
    lunar_month: u32,
    lunar_day: u32,
    is_lunar_leap_month: bool,
    lunar_year_cn: &'a str,
    lunar_month_cn: &'a str,
    lunar_day_cn: &'a str,
    term_today: Option<&'a TermToday>,
    term_today_exact_rule_tz: Option<String>,
    term_today_exact_cn8: Option<String>,
    legacy: LegacyRecord<'a>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LegacyRecord<'a> {
    date: NaiveDate,
    month_is_long: bool,
    zodiac: &'a str,
    weekday_cn: &'a str,
    solar_term_today: Option<&'a str>,
}

impl<'a> From<&'a TungShing> for SnapshotRecord<'a> {
    fn from(t: &'a TungShing) -> Self {
        let legacy = &t.legacy;
        Self {
            date: t.date,
            instant: t.instant,
            display_tz: &t.display_tz,
            rule_tz: &t.rule_tz,
            year8_char: t.year8_char,
            month8_char: t.month8_char,
            day8_char: t.day8_char,
            twohour8_char: t.twohour8_char,
            resolved_date: t.resolved_date,
            is_late_zi_hour: t.is_late_zi_hour,
            lunar_year: legacy.lunar_year,
            lunar_month: legacy.lunar_month,
            lunar_day: legacy.lunar_day,
            is_lunar_leap_month: legacy.is_leap_month,
            lunar_year_cn: &legacy.lunar_year_cn,
            lunar_month_cn: &legacy.lunar_month_cn,
            lunar_day_cn: &legacy.lunar_day_cn,
            term_today: t.term_today.as_ref(),
            term_today_exact_rule_tz: t.term_today_exact_rule_tz(),
            term_today_exact_cn8: t.term_today_exact_cn8(),
            legacy: LegacyRecord {
                date: legacy.date,
                month_is_long: legacy.month_is_long,
                zodiac: &legacy.zodiac,
                weekday_cn: &legacy.weekday_cn,
                solar_term_today: legacy.solar_term_today.as_deref(),
            },
        }
    }
}

//! Conventional Chinese lunisolar calendar (农历).
//!
//! Each *suì* runs from the month holding one winter solstice to the month
//! holding the next, computed from new moons and Zhongqi terms taken as
//! UTC+8 civil dates. Month 11 always holds the winter solstice; a suì with
//! thirteen months gets a leap month, the first one containing no Zhongqi.
//! Months 11 and 12 belong to the previous lunar year.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike, Utc};
use log::{debug, trace};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex};
use tungshing_astronomy::{Ephemeris, VsopEphemeris};
use tungshing_types::{Script, Sexagenary, SolarTerm};

use crate::error::{CalendarError, LUNISOLAR_MAX_YEAR, LUNISOLAR_MIN_YEAR};
use crate::fmt as cn;
use crate::legacy::{LegacyCalendar, LegacyDay, LunisolarOptions, YearPillarMode};

/// Offset of the reference meridian (120°E) from UTC.
const UTC8_HOURS: i64 = 8;

/// Lookaround for new moons and Jie terms, longer than any month.
const MONTH_WINDOW_DAYS: i64 = 35;

/// UTC+8 civil date of an instant.
fn utc8_date(at: DateTime<Utc>) -> NaiveDate {
    (at + Duration::hours(UTC8_HOURS)).date_naive()
}

/// Instant of 00:00 UTC+8 on `date`.
fn utc8_midnight(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc() - Duration::hours(UTC8_HOURS)
}

/// One lunar month as it starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LunarMonth {
    pub number: u32,
    pub leap: bool,
    pub start: NaiveDate,
}

/// Lunar date of a civil day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LunarDate {
    pub year: i32,
    pub month: LunarMonth,
    pub day: u32,
    pub month_is_long: bool,
}

/// The months between two winter solstices.
#[derive(Debug, Clone)]
pub struct Sui {
    /// Civil year holding most of the suì, i.e. of its closing solstice.
    pub year: i32,
    /// Month starts, followed by the first month of the next suì.
    months: Vec<LunarMonth>,
}

impl Sui {
    /// Months of this suì, without the closing marker.
    pub fn months(&self) -> &[LunarMonth] {
        &self.months[..self.months.len().saturating_sub(1)]
    }

    pub fn leap_month(&self) -> Option<LunarMonth> {
        self.months().iter().copied().find(|m| m.leap)
    }

    pub fn start(&self) -> Option<NaiveDate> {
        self.months.first().map(|m| m.start)
    }

    /// First day of the next suì.
    pub fn end(&self) -> Option<NaiveDate> {
        self.months.last().map(|m| m.start)
    }

    pub fn lunar_date(&self, date: NaiveDate) -> Option<LunarDate> {
        let idx = self.months.partition_point(|m| m.start <= date).checked_sub(1)?;
        let month = *self.months.get(idx)?;
        let next = self.months.get(idx + 1)?;

        let day = (date - month.start).num_days() as u32 + 1;
        let year = if month.number >= 11 { self.year - 1 } else { self.year };

        Some(LunarDate {
            year,
            month,
            day,
            month_is_long: (next.start - month.start).num_days() == 30,
        })
    }
}

/// Chinese lunisolar calendar over an [`Ephemeris`].
///
/// Its pillars follow the loose, date-granular conventions of printed
/// almanacs: the month pillar turns on the civil date of each Jie, the year
/// pillar at the lunar new year (or on the civil date of Lichun). Suì tables
/// are memoised per instance.
pub struct LunisolarCalendar<E = VsopEphemeris> {
    ephemeris: E,
    suis: Mutex<HashMap<i32, Arc<Sui>>>,
}

impl<E: fmt::Debug> fmt::Debug for LunisolarCalendar<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LunisolarCalendar")
            .field("ephemeris", &self.ephemeris)
            .finish_non_exhaustive()
    }
}

impl Default for LunisolarCalendar<VsopEphemeris> {
    fn default() -> Self {
        Self::new(VsopEphemeris::new())
    }
}

impl<E: Ephemeris> LunisolarCalendar<E> {
    pub fn new(ephemeris: E) -> Self {
        Self {
            ephemeris,
            suis: Mutex::new(HashMap::new()),
        }
    }

    pub fn ephemeris(&self) -> &E {
        &self.ephemeris
    }

    fn check_range(date: NaiveDate) -> Result<(), CalendarError> {
        if (LUNISOLAR_MIN_YEAR..=LUNISOLAR_MAX_YEAR).contains(&date.year()) {
            Ok(())
        } else {
            Err(CalendarError::date_out_of_range(date))
        }
    }

    /// The suì closing with the winter solstice of civil year `year`.
    pub fn sui(&self, year: i32) -> Result<Arc<Sui>, CalendarError> {
        if let Some(hit) = self.suis.lock().unwrap_or_else(|e| e.into_inner()).get(&year) {
            return Ok(Arc::clone(hit));
        }

        let sui = Arc::new(self.build_sui(year)?);
        self.suis
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(year, Arc::clone(&sui));
        Ok(sui)
    }

    fn build_sui(&self, year: i32) -> Result<Sui, CalendarError> {
        let solstice = |y: i32| -> Result<NaiveDate, CalendarError> {
            Ok(utc8_date(self.ephemeris.term_instant(y, SolarTerm::DongZhi)?.at))
        };
        let ws_prev = solstice(year - 1)?;
        let ws = solstice(year)?;

        let window = Duration::days(MONTH_WINDOW_DAYS);
        let moons: Vec<NaiveDate> = self
            .ephemeris
            .new_moons_between(utc8_midnight(ws_prev) - window, utc8_midnight(ws) + window)?
            .into_iter()
            .map(utc8_date)
            .collect();

        let m11 = moons
            .partition_point(|d| *d <= ws_prev)
            .checked_sub(1)
            .ok_or_else(|| CalendarError::invalid_table(year, "no new moon before the winter solstice"))?;
        let m11_next = moons
            .partition_point(|d| *d <= ws)
            .checked_sub(1)
            .ok_or_else(|| CalendarError::invalid_table(year, "no new moon before the winter solstice"))?;
        if m11_next + 1 >= moons.len() {
            return Err(CalendarError::invalid_table(year, "new moons end before the next suì"));
        }

        let mut needs_leap = match m11_next - m11 {
            12 => false,
            13 => true,
            n => {
                return Err(CalendarError::invalid_table(
                    year,
                    format!("{} months between winter solstices", n),
                ));
            }
        };

        // Zhongqi in month order, from the opening solstice to the closing one.
        let zhongqi = [(year - 1, SolarTerm::DongZhi), (year - 1, SolarTerm::DaHan)]
            .into_iter()
            .chain(
                SolarTerm::ALL
                    .into_iter()
                    .filter(|t| !t.is_jie() && t.ordinal() < SolarTerm::DongZhi.ordinal())
                    .map(|t| (year, t)),
            )
            .chain(std::iter::once((year, SolarTerm::DongZhi)))
            .map(|(y, t)| -> Result<NaiveDate, CalendarError> {
                Ok(utc8_date(self.ephemeris.term_instant(y, t)?.at))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut months = Vec::with_capacity(m11_next - m11 + 1);
        let mut number = 10;
        let mut next_zhongqi = 0;
        for i in m11..=m11_next {
            if needs_leap && zhongqi.get(next_zhongqi).is_some_and(|zq| moons[i + 1] <= *zq) {
                months.push(LunarMonth {
                    number,
                    leap: true,
                    start: moons[i],
                });
                needs_leap = false;
                continue;
            }
            number = number % 12 + 1;
            months.push(LunarMonth {
                number,
                leap: false,
                start: moons[i],
            });
            next_zhongqi += 1;
        }

        if needs_leap {
            return Err(CalendarError::invalid_table(year, "thirteen months but no month lacks a Zhongqi"));
        }

        let sui = Sui { year, months };
        debug!(
            "suì {} from {:?} to {:?}, leap month {:?}",
            year,
            sui.start(),
            sui.end(),
            sui.leap_month().map(|m| m.number)
        );
        Ok(sui)
    }

    fn sui_for(&self, date: NaiveDate) -> Result<Arc<Sui>, CalendarError> {
        let mut year = date.year();
        for _ in 0..3 {
            let sui = self.sui(year)?;
            match (sui.start(), sui.end()) {
                (Some(start), _) if date < start => year -= 1,
                (_, Some(end)) if date >= end => year += 1,
                _ => return Ok(sui),
            }
        }
        Err(CalendarError::invalid_table(year, format!("no suì contains {}", date)))
    }

    /// Lunar date of a civil day.
    pub fn lunar_date(&self, date: NaiveDate) -> Result<LunarDate, CalendarError> {
        Self::check_range(date)?;
        let sui = self.sui_for(date)?;
        sui.lunar_date(date)
            .ok_or_else(|| CalendarError::invalid_table(sui.year, format!("{} not covered", date)))
    }

    /// Solar term beginning on `date` (UTC+8), if any.
    pub fn term_on(&self, date: NaiveDate) -> Result<Option<SolarTerm>, CalendarError> {
        let start = utc8_midnight(date);
        let terms = self.ephemeris.terms_between(start, start + Duration::days(1))?;
        Ok(terms.first().map(|t| t.term))
    }

    /// Month pillar by civil date: the month opens on the date of its Jie.
    fn month_pillar(&self, date: NaiveDate) -> Result<Sexagenary, CalendarError> {
        let end = utc8_midnight(date) + Duration::days(1);
        let terms = self
            .ephemeris
            .terms_between(end - Duration::days(MONTH_WINDOW_DAYS + 1), end)?;
        let jie = terms
            .iter()
            .rev()
            .find(|t| t.is_jie())
            .ok_or_else(|| CalendarError::invalid_table(date.year(), format!("no Jie term before {}", date)))?;
        let ordinal = jie.term.month_ordinal().unwrap_or_default();
        Ok(Sexagenary::of_month(jie.year, ordinal))
    }

    fn year_pillar(&self, date: NaiveDate, lunar_year: i32, mode: YearPillarMode) -> Result<Sexagenary, CalendarError> {
        match mode {
            YearPillarMode::LunarNewYear => Ok(Sexagenary::of_year(lunar_year)),
            YearPillarMode::BeginningOfSpring => {
                let lichun = utc8_date(self.ephemeris.term_instant(date.year(), SolarTerm::LiChun)?.at);
                let year = if date >= lichun { date.year() } else { date.year() - 1 };
                Ok(Sexagenary::of_year(year))
            }
        }
    }
}

impl<E: Ephemeris> LegacyCalendar for LunisolarCalendar<E> {
    type Options = LunisolarOptions;

    fn day_fields(&self, date: NaiveDate, options: &LunisolarOptions) -> Result<LegacyDay, CalendarError> {
        let lunar = self.lunar_date(date)?;
        let year8_char = self.year_pillar(date, lunar.year, options.year_pillar)?;
        let month8_char = self.month_pillar(date)?;
        let term = self.term_on(date)?;

        let zodiac = match options.script {
            Script::Simplified => year8_char.branch().zodiac(),
            Script::Traditional => year8_char.branch().zodiac_traditional(),
        };

        trace!("legacy fields for {}: {:?}", date, lunar);

        Ok(LegacyDay {
            date,
            lunar_year: lunar.year,
            lunar_month: lunar.month.number,
            lunar_day: lunar.day,
            is_leap_month: lunar.month.leap,
            month_is_long: lunar.month_is_long,
            lunar_year_cn: cn::year(lunar.year),
            lunar_month_cn: cn::month(lunar.month.number, lunar.month.leap, options.script),
            lunar_day_cn: cn::day(lunar.day),
            year8_char,
            month8_char,
            day8_char: Sexagenary::of_day(date),
            zodiac: zodiac.to_string(),
            weekday_cn: cn::weekday(date.weekday()),
            solar_term_today: term.map(|t| t.name(options.script).to_string()),
        })
    }

    fn two_hour_pillar(&self, at: NaiveDateTime, _options: &LunisolarOptions) -> Result<Sexagenary, CalendarError> {
        Self::check_range(at.date())?;
        let day = Sexagenary::of_day(at.date());
        Ok(Sexagenary::of_two_hour(day, Sexagenary::two_hour_slot(at.hour())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn fields(cal: &LunisolarCalendar, date: NaiveDate) -> LegacyDay {
        cal.day_fields(date, &LunisolarOptions::default()).unwrap()
    }

    #[test]
    fn test_months_of_2000() {
        let cal = LunisolarCalendar::default();
        let sui = cal.sui(2000).unwrap();
        let expected = [
            (11, ymd(1999, 12, 8)),
            (12, ymd(2000, 1, 7)),
            (1, ymd(2000, 2, 5)),
            (2, ymd(2000, 3, 6)),
            (3, ymd(2000, 4, 5)),
            (4, ymd(2000, 5, 4)),
            (5, ymd(2000, 6, 2)),
            (6, ymd(2000, 7, 2)),
            (7, ymd(2000, 7, 31)),
            (8, ymd(2000, 8, 29)),
            (9, ymd(2000, 9, 28)),
            (10, ymd(2000, 10, 27)),
        ];
        let actual: Vec<_> = sui.months().iter().map(|m| (m.number, m.start)).collect();
        assert_eq!(expected.to_vec(), actual);
        assert_eq!(Some(ymd(2000, 11, 26)), sui.end());
        assert_eq!(None, sui.leap_month());
    }

    #[test]
    fn test_leap_months() {
        let cal = LunisolarCalendar::default();
        for (year, number, start) in [
            (2017, 6, ymd(2017, 7, 23)),
            (2023, 2, ymd(2023, 3, 22)),
            (2025, 6, ymd(2025, 7, 25)),
            (2034, 11, ymd(2033, 12, 22)),
        ] {
            let leap = cal.sui(year).unwrap().leap_month().unwrap();
            assert_eq!((number, start), (leap.number, leap.start), "suì {}", year);
        }
        assert_eq!(13, cal.sui(2017).unwrap().months().len());
    }

    #[test]
    fn test_lunar_dates() {
        let cal = LunisolarCalendar::default();
        let cases = [
            (ymd(2000, 1, 1), (1999, 11, false, 25)),
            (ymd(2017, 1, 27), (2016, 12, false, 30)),
            (ymd(2017, 1, 28), (2017, 1, false, 1)),
            (ymd(2017, 7, 22), (2017, 6, false, 29)),
            (ymd(2017, 7, 23), (2017, 6, true, 1)),
            (ymd(2017, 12, 17), (2017, 10, false, 30)),
            (ymd(2025, 1, 29), (2025, 1, false, 1)),
            (ymd(2025, 2, 3), (2025, 1, false, 6)),
            (ymd(2025, 2, 4), (2025, 1, false, 7)),
        ];
        for (date, (year, month, leap, day)) in cases {
            let lunar = cal.lunar_date(date).unwrap();
            assert_eq!(
                (year, month, leap, day),
                (lunar.year, lunar.month.number, lunar.month.leap, lunar.day),
                "{}",
                date
            );
        }
    }

    #[test]
    fn test_day_fields_on_lichun_2025() {
        let cal = LunisolarCalendar::default();
        let day = fields(&cal, ymd(2025, 2, 3));

        assert_eq!("二〇二五", day.lunar_year_cn);
        assert_eq!("正月", day.lunar_month_cn);
        assert_eq!("初六", day.lunar_day_cn);
        assert!(day.month_is_long);
        assert_eq!("乙巳", day.year8_char.to_string());
        // Date-granular: the Yin month already applies on the Lichun date.
        assert_eq!("戊寅", day.month8_char.to_string());
        assert_eq!("癸卯", day.day8_char.to_string());
        assert_eq!("蛇", day.zodiac);
        assert_eq!("星期一", day.weekday_cn);
        assert_eq!(Some("立春".to_string()), day.solar_term_today);
    }

    #[test]
    fn test_month_pillar_before_jie_date() {
        let cal = LunisolarCalendar::default();
        assert_eq!("丁丑", fields(&cal, ymd(2025, 2, 2)).month8_char.to_string());
        assert_eq!("戊寅", fields(&cal, ymd(2025, 3, 4)).month8_char.to_string());
        assert_eq!("己卯", fields(&cal, ymd(2025, 3, 5)).month8_char.to_string());
        assert_eq!(None, fields(&cal, ymd(2025, 3, 4)).solar_term_today);
    }

    #[test]
    fn test_year_pillar_modes() {
        let cal = LunisolarCalendar::default();
        let spring = LunisolarOptions::new().year_pillar(YearPillarMode::BeginningOfSpring);
        let date = ymd(2024, 2, 5);

        let by_new_year = cal.day_fields(date, &LunisolarOptions::default()).unwrap();
        let by_spring = cal.day_fields(date, &spring).unwrap();
        assert_eq!("癸卯", by_new_year.year8_char.to_string());
        assert_eq!("兔", by_new_year.zodiac);
        assert_eq!("甲辰", by_spring.year8_char.to_string());
        assert_eq!(2023, by_spring.lunar_year);
    }

    #[test]
    fn test_traditional_script() {
        let cal = LunisolarCalendar::default();
        let opts = LunisolarOptions::new().script(Script::Traditional);
        let day = cal.day_fields(ymd(2017, 7, 23), &opts).unwrap();
        assert_eq!("閏六月", day.lunar_month_cn);
        assert_eq!("雞", day.zodiac);

        let jingzhe = cal.day_fields(ymd(2025, 3, 5), &opts).unwrap();
        assert_eq!(Some("驚蟄".to_string()), jingzhe.solar_term_today);
    }

    #[test]
    fn test_two_hour_pillar() {
        let cal = LunisolarCalendar::default();
        let opts = LunisolarOptions::default();
        let at = |h: u32| ymd(2025, 2, 3).and_hms_opt(h, 30, 0).unwrap();
        assert_eq!("壬子", cal.two_hour_pillar(at(0), &opts).unwrap().to_string());
        assert_eq!("丁巳", cal.two_hour_pillar(at(10), &opts).unwrap().to_string());
        assert_eq!("甲子", cal.two_hour_pillar(at(23), &opts).unwrap().to_string());
    }

    #[test]
    fn test_out_of_range() {
        let cal = LunisolarCalendar::default();
        let opts = LunisolarOptions::default();
        for date in [ymd(1900, 12, 31), ymd(2100, 1, 1)] {
            assert!(matches!(
                cal.day_fields(date, &opts),
                Err(CalendarError::DateOutOfRange { .. })
            ));
        }
        assert!(cal.day_fields(ymd(1901, 1, 1), &opts).is_ok());
        assert!(cal.day_fields(ymd(2099, 12, 31), &opts).is_ok());
    }

    #[test]
    fn test_cached_sui_is_shared() {
        let cal = LunisolarCalendar::default();
        let a = cal.sui(2025).unwrap();
        let b = cal.sui(2025).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }
}

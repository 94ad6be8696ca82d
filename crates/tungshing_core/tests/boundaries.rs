use chrono::{DateTime, FixedOffset, NaiveDate, TimeZone, Utc};
use tungshing_core::prelude::*;
use tungshing_core::{Ephemeris, LunisolarCalendar, TableEphemeris, TermInstant};

fn cn8(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> DateTime<FixedOffset> {
    FixedOffset::east_opt(8 * 3600)
        .unwrap()
        .with_ymd_and_hms(y, m, d, h, min, s)
        .unwrap()
}

fn at(s: &str) -> TungShing {
    let moment = tungshing_core::parse_moment(s).unwrap();
    Almanac::shared().query(Some(moment), &QueryContext::default()).unwrap()
}

fn pillars(t: &TungShing) -> [String; 3] {
    [t.year8_char().to_string(), t.month8_char().to_string(), t.day8_char().to_string()]
}

#[test]
fn test_new_year_begins_at_lichun_not_lunar_new_year() {
    // Lichun 2025 is 2025-02-03 22:10 CST; the lunar year turned on Jan 29.
    let t = at("2025-02-03T22:11:00+08:00");
    assert_eq!(["乙巳", "戊寅", "癸卯"].map(String::from), pillars(&t));
    assert!(!t.is_late_zi_hour());

    let before = at("2025-02-03T22:09:00+08:00");
    assert_eq!("甲辰", before.year8_char().to_string());
    assert_eq!("丁丑", before.month8_char().to_string());

    // Between the lunar new year and Lichun the strict year is still the old one.
    let lunar_new_year = at("2025-01-30T12:00:00+08:00");
    assert_eq!("甲辰", lunar_new_year.year8_char().to_string());
    assert_eq!(1, lunar_new_year.lunar_month());
    assert_eq!(2, lunar_new_year.lunar_day());
}

#[test]
fn test_late_zi_hour_rolls_day_and_lunar_fields() {
    let t = at("2025-02-03T23:05:00+08:00");
    assert!(t.is_late_zi_hour());
    assert_eq!(NaiveDate::from_ymd_opt(2025, 2, 4).unwrap(), t.resolved_date());
    assert_eq!("甲辰", t.day8_char().to_string());
    assert_eq!("乙巳", t.year8_char().to_string());
    assert_eq!("戊寅", t.month8_char().to_string());

    // Lunar fields are those of Feb 4 at noon.
    let noon = at("2025-02-04T12:00:00+08:00");
    assert_eq!(noon.lunar_day(), t.lunar_day());
    assert_eq!(7, t.lunar_day());
    assert_eq!("初七", t.lunar_day_cn());
    assert_eq!("正月", t.lunar_month_cn());
    assert_eq!("二〇二五", t.lunar_year_cn());
    assert_eq!(noon.legacy(), t.legacy());

    // The display clock still reads Feb 3.
    assert_eq!(cn8(2025, 2, 3, 23, 5, 0), t.date());
}

#[test]
fn test_day_boundary_is_2300() {
    let before = at("2025-06-10T22:59:59+08:00");
    let after = at("2025-06-10T23:00:00+08:00");
    let next = at("2025-06-11T00:30:00+08:00");
    assert_ne!(before.day8_char(), after.day8_char());
    assert_eq!(after.day8_char(), next.day8_char());
    assert_eq!(after.lunar_day(), next.lunar_day());
}

#[test]
fn test_zhongqi_keeps_month_and_jie_changes_it() {
    // Yushui 2025-02-18 18:06, Jingzhe 2025-03-05 16:07 (CST).
    let around_yushui = [at("2025-02-18T17:00:00+08:00"), at("2025-02-18T19:00:00+08:00")];
    for t in &around_yushui {
        assert_eq!("戊寅", t.month8_char().to_string());
    }
    assert_eq!("戊寅", at("2025-03-05T15:00:00+08:00").month8_char().to_string());
    assert_eq!("己卯", at("2025-03-05T17:00:00+08:00").month8_char().to_string());
}

#[test]
fn test_rule_timezone_decides_the_day() {
    let instant = Utc.with_ymd_and_hms(2025, 2, 3, 16, 30, 0).unwrap();
    let shanghai = Almanac::shared().query_at(instant, &QueryContext::default()).unwrap();
    let london_rule = QueryContextBuilder::new().rule_tz("Europe/London").build().unwrap();
    let london = Almanac::shared().query_at(instant, &london_rule).unwrap();

    assert_eq!("甲辰", shanghai.day8_char().to_string());
    assert_eq!("癸卯", london.day8_char().to_string());
    assert_eq!(shanghai.year8_char(), london.year8_char());
    assert_eq!(shanghai.date(), london.date());
    assert_eq!("Europe/London", london.rule_tz());

    let late_in_london = QueryContextBuilder::new()
        .display_tz("Europe/London")
        .rule_tz("Europe/London")
        .build()
        .unwrap();
    let t = tungshing_core::query(
        NaiveDate::from_ymd_opt(2025, 2, 3).unwrap().and_hms_opt(23, 30, 0).unwrap(),
        &late_in_london,
    )
    .unwrap();
    assert!(t.is_late_zi_hour());
    assert_eq!(NaiveDate::from_ymd_opt(2025, 2, 4).unwrap(), t.resolved_date());
}

#[test]
fn test_lunar_fields_follow_rule_timezone_date() {
    // Noon in New York is already 01:00 on Feb 4 in Shanghai.
    let ctx = QueryContextBuilder::new()
        .display_tz("America/New_York")
        .rule_tz("Asia/Shanghai")
        .build()
        .unwrap();
    let t = tungshing_core::query(
        NaiveDate::from_ymd_opt(2025, 2, 3).unwrap().and_hms_opt(12, 0, 0).unwrap(),
        &ctx,
    )
    .unwrap();

    let feb4 = NaiveDate::from_ymd_opt(2025, 2, 4).unwrap();
    assert!(!t.is_late_zi_hour());
    assert_eq!(feb4, t.resolved_date());
    assert_eq!(feb4, t.legacy().date);
    assert_eq!(7, t.lunar_day());
    assert_eq!("初七", t.lunar_day_cn());
    assert_eq!("甲辰", t.day8_char().to_string());
    assert_eq!(at("2025-02-04T12:00:00+08:00").legacy(), t.legacy());

    // The display clock still reads Feb 3.
    let new_york = FixedOffset::west_opt(5 * 3600).unwrap();
    assert_eq!(new_york.with_ymd_and_hms(2025, 2, 3, 12, 0, 0).unwrap(), t.date());
    assert_eq!(NaiveDate::from_ymd_opt(2025, 2, 3).unwrap(), t.date().date_naive());
}

#[test]
fn test_term_today_both_clocks() {
    let t = at("2025-02-03T08:00:00+08:00");
    let term = t.term_today().unwrap();
    assert_eq!(SolarTerm::LiChun, term.term);
    assert_eq!("立春", term.name(Script::Simplified));

    let rule = t.term_today_exact_rule_tz().unwrap();
    assert!(rule.starts_with("2025-02-03T22:"), "{}", rule);
    assert!(rule.ends_with("+08:00"), "{}", rule);

    let ny = QueryContextBuilder::new()
        .display_tz("America/New_York")
        .rule_tz("America/New_York")
        .build()
        .unwrap();
    let in_ny = Almanac::shared()
        .query_at(NaiveDate::from_ymd_opt(2025, 2, 3).unwrap().and_hms_opt(12, 0, 0).unwrap(), &ny)
        .unwrap();
    let rule = in_ny.term_today_exact_rule_tz().unwrap();
    let cn8 = in_ny.term_today_exact_cn8().unwrap();
    assert!(rule.starts_with("2025-02-03T09:"), "{}", rule);
    assert!(rule.ends_with("-05:00"), "{}", rule);
    assert!(cn8.starts_with("2025-02-03T22:"), "{}", cn8);

    let quiet = at("2025-02-10T12:00:00+08:00");
    assert!(quiet.term_today().is_none());
    assert_eq!(None, quiet.term_today_exact_cn8());
}

#[test]
fn test_leap_month_and_script_are_forwarded() {
    let t = at("2025-08-01T12:00:00+08:00");
    assert!(t.is_lunar_leap_month());
    assert_eq!(6, t.lunar_month());
    assert_eq!("闰六月", t.lunar_month_cn());

    let traditional = QueryContext::new().options(LunisolarOptions::new().script(Script::Traditional));
    let t = tungshing_core::query(cn8(2025, 8, 1, 12, 0, 0), &traditional).unwrap();
    assert_eq!("閏六月", t.lunar_month_cn());
}

#[test]
fn test_legacy_options_do_not_touch_strict_pillars() {
    // Lichun 2024 is 16:26 CST; by civil date the legacy year already turned.
    let ctx = QueryContext::new()
        .options(LunisolarOptions::new().year_pillar(YearPillarMode::BeginningOfSpring));
    let t = tungshing_core::query(cn8(2024, 2, 4, 12, 0, 0), &ctx).unwrap();
    assert_eq!("癸卯", t.year8_char().to_string());
    assert_eq!("甲辰", t.legacy().year8_char.to_string());
}

#[test]
fn test_exact_boundary_belongs_to_new_period() {
    let lichun = cn8(2025, 2, 3, 22, 10, 13).with_timezone(&Utc);
    let table = TableEphemeris::from_terms([
        TermInstant::new(2024, SolarTerm::LiChun, cn8(2024, 2, 4, 16, 26, 53).with_timezone(&Utc)),
        TermInstant::new(2024, SolarTerm::XiaoHan, cn8(2025, 1, 5, 10, 32, 31).with_timezone(&Utc)),
        TermInstant::new(2024, SolarTerm::DaHan, cn8(2025, 1, 20, 9, 59, 59).with_timezone(&Utc)),
        TermInstant::new(2025, SolarTerm::LiChun, lichun),
    ]);
    assert_eq!(lichun, table.term_instant(2025, SolarTerm::LiChun).unwrap().at);
    let almanac = Almanac::new(table, LunisolarCalendar::default());
    let ctx = QueryContext::default();

    let exact = almanac.query_at(lichun, &ctx).unwrap();
    assert_eq!("乙巳", exact.year8_char().to_string());
    assert_eq!("戊寅", exact.month8_char().to_string());

    let just_before = almanac
        .query_at(lichun - chrono::Duration::nanoseconds(1), &ctx)
        .unwrap();
    assert_eq!("甲辰", just_before.year8_char().to_string());
    assert_eq!("丁丑", just_before.month8_char().to_string());
}

#[test]
fn test_repeated_queries_are_identical() {
    let a = at("2025-02-03T23:59:59+08:00");
    let b = at("2025-02-03T23:59:59+08:00");
    assert_eq!(a, b);
    assert_eq!(
        serde_json::to_value(&a).unwrap(),
        serde_json::to_value(&b).unwrap()
    );
}

#[test]
fn test_snapshot_json_shape() {
    let json = serde_json::to_value(at("2025-02-03T23:05:00+08:00")).unwrap();
    assert_eq!("乙巳", json["year8Char"]);
    assert_eq!("甲辰", json["day8Char"]);
    assert_eq!(true, json["isLateZiHour"]);
    assert_eq!("2025-02-04", json["resolvedDate"]);
    assert_eq!(2025, json["lunarYear"]);
    assert_eq!(1, json["lunarMonth"]);
    assert_eq!(7, json["lunarDay"]);
    assert_eq!(false, json["isLunarLeapMonth"]);
    assert_eq!("初七", json["lunarDayCn"]);
    assert_eq!("2025-02-04", json["legacy"]["date"]);

    // Only the strict pillars are serialised.
    let legacy = json["legacy"].as_object().unwrap();
    assert!(!legacy.contains_key("year8Char"));
    assert!(!legacy.contains_key("month8Char"));
    assert!(!legacy.contains_key("day8Char"));
    assert!(!legacy.contains_key("lunarDay"));
}

#[test]
fn test_errors() {
    let gap = QueryContextBuilder::new().display_tz("America/New_York").build().unwrap();
    let moment = tungshing_core::parse_moment("2025-03-09T02:30").unwrap();
    assert!(matches!(
        Almanac::shared().query(Some(moment), &gap),
        Err(TungShingError::InvalidDatetime { .. })
    ));

    // Outside the legacy calendar's years but inside the ephemeris.
    let err = Almanac::shared()
        .query_at(cn8(1850, 6, 1, 12, 0, 0), &QueryContext::default())
        .unwrap_err();
    assert!(matches!(err, TungShingError::LegacyForwarding { .. }), "{:?}", err);

    assert!(QueryContextBuilder::<LunisolarOptions>::new().display_tz("Nowhere/Town").build().is_err());
}

#[test]
fn test_now() {
    let t = Almanac::shared().query(None, &QueryContext::default()).unwrap();
    assert!(t.instant() <= Utc::now());
}

//! Chinese renderings of lunar dates.

use tungshing_types::Script;

/// Chinese numerals; index 0 is 十 so that day names can index by `d % 10`.
const NUM_CHINESE: [&str; 10] = ["十", "一", "二", "三", "四", "五", "六", "七", "八", "九"];

const DIGITS: [char; 10] = ['〇', '一', '二', '三', '四', '五', '六', '七', '八', '九'];

/// Year number read digit by digit, e.g. 2025 → 二〇二五.
pub fn year(year: i32) -> String {
    year.unsigned_abs()
        .to_string()
        .chars()
        .filter_map(|c| c.to_digit(10))
        .map(|d| DIGITS[d as usize])
        .collect()
}

/// Month name including 月. Months 11 and 12 are 冬月 and 腊月.
pub fn month(number: u32, leap: bool, script: Script) -> String {
    let mut name = String::new();
    if leap {
        name.push_str(match script {
            Script::Simplified => "闰",
            Script::Traditional => "閏",
        });
    }
    name.push_str(match number {
        1 => "正",
        11 => "冬",
        12 => match script {
            Script::Simplified => "腊",
            Script::Traditional => "臘",
        },
        n => NUM_CHINESE[(n % 10) as usize],
    });
    name.push('月');
    name
}

/// Day name: 初一 to 初十, 十一 to 二十, 廿一 to 廿九, 三十.
pub fn day(d: u32) -> String {
    let prefix = match d {
        1..=10 => "初",
        11..=19 => "十",
        20 => "二",
        21..=29 => "廿",
        _ => "三",
    };
    format!("{}{}", prefix, NUM_CHINESE[(d % 10) as usize])
}

pub fn weekday(weekday: chrono::Weekday) -> String {
    const NAMES: [&str; 7] = ["一", "二", "三", "四", "五", "六", "日"];
    format!("星期{}", NAMES[weekday.num_days_from_monday() as usize])
}

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Offset between `NaiveDate::num_days_from_ce` and the Julian day number.
const JDN_OFFSET: i64 = 1_721_425;

/// The ten Heavenly Stems (天干), in cycle order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Stem {
    Jia,
    Yi,
    Bing,
    Ding,
    Wu,
    Ji,
    Geng,
    Xin,
    Ren,
    Gui,
}

impl Stem {
    pub const ALL: [Stem; 10] = [
        Stem::Jia,
        Stem::Yi,
        Stem::Bing,
        Stem::Ding,
        Stem::Wu,
        Stem::Ji,
        Stem::Geng,
        Stem::Xin,
        Stem::Ren,
        Stem::Gui,
    ];

    pub fn from_index(index: u32) -> Self {
        Self::ALL[(index % 10) as usize]
    }

    pub fn index(self) -> u32 {
        self as u32
    }

    pub fn name(self) -> &'static str {
        match self {
            Stem::Jia => "甲",
            Stem::Yi => "乙",
            Stem::Bing => "丙",
            Stem::Ding => "丁",
            Stem::Wu => "戊",
            Stem::Ji => "己",
            Stem::Geng => "庚",
            Stem::Xin => "辛",
            Stem::Ren => "壬",
            Stem::Gui => "癸",
        }
    }

    fn from_name(name: char) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.name().starts_with(name))
    }
}

impl fmt::Display for Stem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The twelve Earthly Branches (地支), in cycle order starting from Zi.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Branch {
    Zi,
    Chou,
    Yin,
    Mao,
    Chen,
    Si,
    Wu,
    Wei,
    Shen,
    You,
    Xu,
    Hai,
}

impl Branch {
    pub const ALL: [Branch; 12] = [
        Branch::Zi,
        Branch::Chou,
        Branch::Yin,
        Branch::Mao,
        Branch::Chen,
        Branch::Si,
        Branch::Wu,
        Branch::Wei,
        Branch::Shen,
        Branch::You,
        Branch::Xu,
        Branch::Hai,
    ];

    pub fn from_index(index: u32) -> Self {
        Self::ALL[(index % 12) as usize]
    }

    pub fn index(self) -> u32 {
        self as u32
    }

    pub fn name(self) -> &'static str {
        match self {
            Branch::Zi => "子",
            Branch::Chou => "丑",
            Branch::Yin => "寅",
            Branch::Mao => "卯",
            Branch::Chen => "辰",
            Branch::Si => "巳",
            Branch::Wu => "午",
            Branch::Wei => "未",
            Branch::Shen => "申",
            Branch::You => "酉",
            Branch::Xu => "戌",
            Branch::Hai => "亥",
        }
    }

    /// Zodiac animal (生肖) in simplified characters.
    pub fn zodiac(self) -> &'static str {
        ["鼠", "牛", "虎", "兔", "龙", "蛇", "马", "羊", "猴", "鸡", "狗", "猪"][self.index() as usize]
    }

    /// Zodiac animal in traditional characters.
    pub fn zodiac_traditional(self) -> &'static str {
        ["鼠", "牛", "虎", "兔", "龍", "蛇", "馬", "羊", "猴", "雞", "狗", "豬"][self.index() as usize]
    }

    fn from_name(name: char) -> Option<Self> {
        Self::ALL.into_iter().find(|b| b.name().starts_with(name))
    }
}

impl fmt::Display for Branch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One position of the 60-term stem-branch cycle (干支), e.g. 甲子.
///
/// Index 0 is 甲子 and index 59 is 癸亥. Serialised as its two-character
/// label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Sexagenary(u8);

impl Sexagenary {
    /// Wraps any integer onto the cycle.
    pub fn new(index: i64) -> Self {
        Self(index.rem_euclid(60) as u8)
    }

    /// Builds a pillar from its parts. Stem and branch must share parity,
    /// otherwise the pair never occurs in the cycle.
    pub fn from_parts(stem: Stem, branch: Branch) -> Option<Self> {
        if stem.index() % 2 != branch.index() % 2 {
            return None;
        }
        let (s, b) = (stem.index() as i64, branch.index() as i64);
        Some(Self::new(6 * s - 5 * b))
    }

    pub fn index(self) -> u8 {
        self.0
    }

    pub fn stem(self) -> Stem {
        Stem::from_index(self.0 as u32)
    }

    pub fn branch(self) -> Branch {
        Branch::from_index(self.0 as u32)
    }

    /// Pillar of a Ganzhi year, numbered like the Gregorian year it starts in
    /// (1984 is 甲子).
    pub fn of_year(ganzhi_year: i32) -> Self {
        Self::new(ganzhi_year as i64 - 4)
    }

    /// Pillar of a Ganzhi month.
    ///
    /// `ordinal` counts months from the Yin month opened by Lichun (0) to
    /// the Chou month opened by Xiaohan (11); `ganzhi_year` is the year the
    /// month belongs to, so the Chou month of 1984 falls in January 1985.
    pub fn of_month(ganzhi_year: i32, ordinal: u32) -> Self {
        Self::new((ganzhi_year as i64 - 1984) * 12 + ordinal as i64 + 2)
    }

    /// Pillar of a civil day. The day cycle runs continuously; 2000-01-01 is 戊午.
    pub fn of_day(date: NaiveDate) -> Self {
        let jdn = date.num_days_from_ce() as i64 + JDN_OFFSET;
        Self::new(jdn + 49)
    }

    /// Pillar of a two-hour slot under the Five Rats rule (五鼠遁).
    ///
    /// `slot` is `(hour + 1) / 2`; slot 12 is the late Zi hour (23:xx) and
    /// carries the Zi stem of the following day.
    pub fn of_two_hour(day: Sexagenary, slot: u32) -> Self {
        Self::new(day.0 as i64 * 12 + slot as i64)
    }

    /// Slot index for a clock hour, `0..=12`.
    pub fn two_hour_slot(hour: u32) -> u32 {
        (hour + 1) / 2
    }
}

impl fmt::Display for Sexagenary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.stem(), self.branch())
    }
}

impl FromStr for Sexagenary {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let (Some(stem), Some(branch), None) = (chars.next(), chars.next(), chars.next()) else {
            return Err(format!("'{}' is not a two-character stem-branch label", s));
        };
        let stem = Stem::from_name(stem).ok_or_else(|| format!("'{}' is not a stem", stem))?;
        let branch = Branch::from_name(branch).ok_or_else(|| format!("'{}' is not a branch", branch))?;
        Self::from_parts(stem, branch).ok_or_else(|| format!("'{}' does not occur in the cycle", s))
    }
}

impl Serialize for Sexagenary {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Sexagenary {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        label.parse().map_err(serde::de::Error::custom)
    }
}

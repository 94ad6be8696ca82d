use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Character set used when rendering Chinese names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Script {
    #[default]
    Simplified,
    Traditional,
}

/// Category of a solar term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TermKind {
    /// "Node" term (节); opens a Ganzhi month.
    Jie,
    /// "Mid-point" term (中气); never changes the Ganzhi month.
    Zhongqi,
}

/// The 24 solar terms (节气), ordered from Lichun.
///
/// Term `i` begins when the apparent solar longitude reaches
/// `315° + 15°·i` (mod 360). Even ordinals are Jie, odd ordinals Zhongqi.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SolarTerm {
    LiChun,
    YuShui,
    JingZhe,
    ChunFen,
    QingMing,
    GuYu,
    LiXia,
    XiaoMan,
    MangZhong,
    XiaZhi,
    XiaoShu,
    DaShu,
    LiQiu,
    ChuShu,
    BaiLu,
    QiuFen,
    HanLu,
    ShuangJiang,
    LiDong,
    XiaoXue,
    DaXue,
    DongZhi,
    XiaoHan,
    DaHan,
}

const NAMES_SIMPLIFIED: [&str; 24] = [
    "立春", "雨水", "惊蛰", "春分", "清明", "谷雨", "立夏", "小满", "芒种", "夏至", "小暑", "大暑",
    "立秋", "处暑", "白露", "秋分", "寒露", "霜降", "立冬", "小雪", "大雪", "冬至", "小寒", "大寒",
];

const NAMES_TRADITIONAL: [&str; 24] = [
    "立春", "雨水", "驚蟄", "春分", "清明", "穀雨", "立夏", "小滿", "芒種", "夏至", "小暑", "大暑",
    "立秋", "處暑", "白露", "秋分", "寒露", "霜降", "立冬", "小雪", "大雪", "冬至", "小寒", "大寒",
];

impl SolarTerm {
    pub const ALL: [SolarTerm; 24] = [
        SolarTerm::LiChun,
        SolarTerm::YuShui,
        SolarTerm::JingZhe,
        SolarTerm::ChunFen,
        SolarTerm::QingMing,
        SolarTerm::GuYu,
        SolarTerm::LiXia,
        SolarTerm::XiaoMan,
        SolarTerm::MangZhong,
        SolarTerm::XiaZhi,
        SolarTerm::XiaoShu,
        SolarTerm::DaShu,
        SolarTerm::LiQiu,
        SolarTerm::ChuShu,
        SolarTerm::BaiLu,
        SolarTerm::QiuFen,
        SolarTerm::HanLu,
        SolarTerm::ShuangJiang,
        SolarTerm::LiDong,
        SolarTerm::XiaoXue,
        SolarTerm::DaXue,
        SolarTerm::DongZhi,
        SolarTerm::XiaoHan,
        SolarTerm::DaHan,
    ];

    /// Position from Lichun, `0..24`.
    pub fn ordinal(self) -> u32 {
        self as u32
    }

    pub fn from_ordinal(ordinal: u32) -> Self {
        Self::ALL[(ordinal % 24) as usize]
    }

    /// Target apparent solar longitude in degrees, `[0, 360)`.
    pub fn longitude(self) -> f64 {
        ((315 + 15 * self.ordinal()) % 360) as f64
    }

    pub fn kind(self) -> TermKind {
        if self.ordinal() % 2 == 0 {
            TermKind::Jie
        } else {
            TermKind::Zhongqi
        }
    }

    pub fn is_jie(self) -> bool {
        self.kind() == TermKind::Jie
    }

    /// For a Jie, the ordinal of the Ganzhi month it opens (0 = Yin month).
    pub fn month_ordinal(self) -> Option<u32> {
        self.is_jie().then(|| self.ordinal() / 2)
    }

    pub fn name(self, script: Script) -> &'static str {
        match script {
            Script::Simplified => NAMES_SIMPLIFIED[self.ordinal() as usize],
            Script::Traditional => NAMES_TRADITIONAL[self.ordinal() as usize],
        }
    }
}

impl fmt::Display for SolarTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name(Script::Simplified))
    }
}

/// The exact instant a solar term begins.
///
/// `year` is the solar year the term belongs to: the year whose Lichun opens
/// it. Xiaohan and Dahan of solar year `Y` fall in January of `Y + 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TermInstant {
    pub year: i32,
    pub term: SolarTerm,
    pub at: DateTime<Utc>,
}

impl TermInstant {
    pub fn new(year: i32, term: SolarTerm, at: DateTime<Utc>) -> Self {
        Self { year, term, at }
    }

    pub fn is_jie(&self) -> bool {
        self.term.is_jie()
    }
}

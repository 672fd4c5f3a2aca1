//! Heavenly stems, earthly branches and the five elements.
//!
//! All indices are zero-based: 甲 = 0 .. 癸 = 9, 子 = 0 .. 亥 = 11.
//! Constructors taking an index wrap it, so callers can add and subtract
//! freely and let the cycle absorb the overflow.

use serde::{Serialize, Serializer};

// ────────────────────────────────────────────────────────────────────────────
// Five elements
// ────────────────────────────────────────────────────────────────────────────

/// The five phases, in generating order: Wood → Fire → Earth → Metal → Water → Wood.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Element {
    Wood,
    Fire,
    Earth,
    Metal,
    Water,
}

impl Element {
    pub const ALL: [Element; 5] = [
        Element::Wood,
        Element::Fire,
        Element::Earth,
        Element::Metal,
        Element::Water,
    ];

    fn index(self) -> usize {
        self as usize
    }

    /// The element this one generates (木生火, 火生土, ...).
    pub fn generates(self) -> Element {
        Self::ALL[(self.index() + 1) % 5]
    }

    /// The element this one controls (木克土, 土克水, ...).
    pub fn controls(self) -> Element {
        Self::ALL[(self.index() + 2) % 5]
    }

    /// The element that generates this one.
    pub fn generated_by(self) -> Element {
        Self::ALL[(self.index() + 4) % 5]
    }

    pub fn name(self) -> &'static str {
        match self {
            Element::Wood => "木",
            Element::Fire => "火",
            Element::Earth => "土",
            Element::Metal => "金",
            Element::Water => "水",
        }
    }
}

impl Serialize for Element {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Stems and branches
// ────────────────────────────────────────────────────────────────────────────

const STEM_NAMES: [&str; 10] = ["甲", "乙", "丙", "丁", "戊", "己", "庚", "辛", "壬", "癸"];

const BRANCH_NAMES: [&str; 12] = [
    "子", "丑", "寅", "卯", "辰", "巳", "午", "未", "申", "酉", "戌", "亥",
];

const BRANCH_ELEMENTS: [Element; 12] = [
    Element::Water, // 子
    Element::Earth, // 丑
    Element::Wood,  // 寅
    Element::Wood,  // 卯
    Element::Earth, // 辰
    Element::Fire,  // 巳
    Element::Fire,  // 午
    Element::Earth, // 未
    Element::Metal, // 申
    Element::Metal, // 酉
    Element::Earth, // 戌
    Element::Water, // 亥
];

/// Principal hidden stem (本气) of each branch.
const BRANCH_MAIN_STEM: [u8; 12] = [9, 5, 0, 1, 4, 2, 3, 5, 6, 7, 4, 8];

/// One of the ten heavenly stems (天干).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HeavenlyStem(u8);

impl HeavenlyStem {
    pub fn from_index(index: i64) -> Self {
        Self(index.rem_euclid(10) as u8)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }

    pub fn name(self) -> &'static str {
        STEM_NAMES[self.index()]
    }

    /// 甲乙木 丙丁火 戊己土 庚辛金 壬癸水
    pub fn element(self) -> Element {
        Element::ALL[self.index() / 2]
    }

    pub fn is_yang(self) -> bool {
        self.0 % 2 == 0
    }
}

impl Serialize for HeavenlyStem {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

/// One of the twelve earthly branches (地支).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EarthlyBranch(u8);

impl EarthlyBranch {
    pub const ZI: EarthlyBranch = EarthlyBranch(0);
    pub const YIN: EarthlyBranch = EarthlyBranch(2);
    pub const CHEN: EarthlyBranch = EarthlyBranch(4);
    pub const XU: EarthlyBranch = EarthlyBranch(10);

    pub fn from_index(index: i64) -> Self {
        Self(index.rem_euclid(12) as u8)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// One-based ordinal (子 = 1 .. 亥 = 12), used by number-based casting.
    pub fn ordinal(self) -> u32 {
        self.0 as u32 + 1
    }

    pub fn name(self) -> &'static str {
        BRANCH_NAMES[self.index()]
    }

    pub fn element(self) -> Element {
        BRANCH_ELEMENTS[self.index()]
    }

    pub fn main_stem(self) -> HeavenlyStem {
        HeavenlyStem(BRANCH_MAIN_STEM[self.index()])
    }

    pub fn offset(self, steps: i64) -> Self {
        Self::from_index(self.0 as i64 + steps)
    }

    /// The branch directly across the twelve-palace wheel.
    pub fn opposite(self) -> Self {
        self.offset(6)
    }
}

impl Serialize for EarthlyBranch {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

/// Branch governing a clock hour. 23:00 and 00:00 both fall in 子.
pub fn hour_branch(hour: u32) -> EarthlyBranch {
    EarthlyBranch::ZI.offset((hour as i64 + 1) / 2)
}

/// Stem of the 寅 month (or 寅 palace) for a year stem (five-tigers rule).
pub fn tiger_stem(year_stem: HeavenlyStem) -> HeavenlyStem {
    HeavenlyStem::from_index(year_stem.index() as i64 * 2 + 2)
}

/// Stem of the 子 hour for a day stem (five-rats rule).
pub fn rat_stem(day_stem: HeavenlyStem) -> HeavenlyStem {
    HeavenlyStem::from_index(day_stem.index() as i64 * 2)
}

// ────────────────────────────────────────────────────────────────────────────
// Sexagenary pairs
// ────────────────────────────────────────────────────────────────────────────

/// Nayin (纳音) element of each consecutive pair in the sixty cycle.
const NAYIN: [Element; 30] = [
    Element::Metal, // 甲子乙丑 海中金
    Element::Fire,  // 丙寅丁卯 炉中火
    Element::Wood,  // 戊辰己巳 大林木
    Element::Earth, // 庚午辛未 路旁土
    Element::Metal, // 壬申癸酉 剑锋金
    Element::Fire,  // 甲戌乙亥 山头火
    Element::Water, // 丙子丁丑 涧下水
    Element::Earth, // 戊寅己卯 城头土
    Element::Metal, // 庚辰辛巳 白蜡金
    Element::Wood,  // 壬午癸未 杨柳木
    Element::Water, // 甲申乙酉 泉中水
    Element::Earth, // 丙戌丁亥 屋上土
    Element::Fire,  // 戊子己丑 霹雳火
    Element::Wood,  // 庚寅辛卯 松柏木
    Element::Water, // 壬辰癸巳 长流水
    Element::Metal, // 甲午乙未 沙中金
    Element::Fire,  // 丙申丁酉 山下火
    Element::Wood,  // 戊戌己亥 平地木
    Element::Earth, // 庚子辛丑 壁上土
    Element::Metal, // 壬寅癸卯 金箔金
    Element::Fire,  // 甲辰乙巳 覆灯火
    Element::Water, // 丙午丁未 天河水
    Element::Earth, // 戊申己酉 大驿土
    Element::Metal, // 庚戌辛亥 钗钏金
    Element::Wood,  // 壬子癸丑 桑柘木
    Element::Water, // 甲寅乙卯 大溪水
    Element::Earth, // 丙辰丁巳 沙中土
    Element::Fire,  // 戊午己未 天上火
    Element::Wood,  // 庚申辛酉 石榴木
    Element::Water, // 壬戌癸亥 大海水
];

/// A stem-branch pair (干支). Only pairs of equal parity exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GanZhi {
    pub stem: HeavenlyStem,
    pub branch: EarthlyBranch,
}

impl GanZhi {
    /// 0 = 甲子, 1 = 乙丑, ... 59 = 癸亥. Wraps.
    pub fn from_cycle_index(index: i64) -> Self {
        let index = index.rem_euclid(60);
        Self {
            stem: HeavenlyStem::from_index(index),
            branch: EarthlyBranch::from_index(index),
        }
    }

    pub fn cycle_index(self) -> usize {
        let (s, b) = (self.stem.index(), self.branch.index());
        // Smallest n with n ≡ s (mod 10) and n ≡ b (mod 12).
        (0..6)
            .map(|k| s + 10 * k)
            .find(|n| n % 12 == b)
            .unwrap_or(0)
    }

    pub fn nayin_element(self) -> Element {
        NAYIN[self.cycle_index() / 2]
    }

    pub fn name(self) -> String {
        format!("{}{}", self.stem.name(), self.branch.name())
    }
}

impl Serialize for GanZhi {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.name())
    }
}

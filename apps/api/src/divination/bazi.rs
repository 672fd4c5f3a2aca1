//! BaZi (八字): four pillars of birth and their five-element balance.
//!
//! Pillars follow the solar calendar: the year turns at 立春 and months turn
//! at the "jie" solar terms. The day pillar counts straight off the Julian
//! day number, so it needs no lookup table at all.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::calendar::ganzhi::{rat_stem, tiger_stem};
use crate::calendar::solar::{julian_day_number, months_since_tiger, solar_month_branch, solar_year};
use crate::calendar::{hour_branch, Element, GanZhi, HeavenlyStem};
use crate::divination::BirthMoment;

/// Characters needed on the day master's side to call it strong.
const STRONG_THRESHOLD: usize = 4;

// ────────────────────────────────────────────────────────────────────────────
// Types
// ────────────────────────────────────────────────────────────────────────────

/// Relation of a stem to the day master (十神).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TenGod {
    Companion,      // 比肩
    RobWealth,      // 劫财
    EatingGod,      // 食神
    HurtingOfficer, // 伤官
    IndirectWealth, // 偏财
    DirectWealth,   // 正财
    SevenKillings,  // 七杀
    DirectOfficer,  // 正官
    IndirectSeal,   // 偏印
    DirectSeal,     // 正印
}

impl TenGod {
    pub fn of(day_master: HeavenlyStem, other: HeavenlyStem) -> TenGod {
        let me = day_master.element();
        let it = other.element();
        let same = day_master.is_yang() == other.is_yang();

        let (same_kind, other_kind) = if it == me {
            (TenGod::Companion, TenGod::RobWealth)
        } else if me.generates() == it {
            (TenGod::EatingGod, TenGod::HurtingOfficer)
        } else if me.controls() == it {
            (TenGod::IndirectWealth, TenGod::DirectWealth)
        } else if it.controls() == me {
            (TenGod::SevenKillings, TenGod::DirectOfficer)
        } else {
            (TenGod::IndirectSeal, TenGod::DirectSeal)
        };

        if same {
            same_kind
        } else {
            other_kind
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            TenGod::Companion => "比肩",
            TenGod::RobWealth => "劫财",
            TenGod::EatingGod => "食神",
            TenGod::HurtingOfficer => "伤官",
            TenGod::IndirectWealth => "偏财",
            TenGod::DirectWealth => "正财",
            TenGod::SevenKillings => "七杀",
            TenGod::DirectOfficer => "正官",
            TenGod::IndirectSeal => "偏印",
            TenGod::DirectSeal => "正印",
        }
    }

    /// Name of the chart pattern (格局) this relation produces in the month branch.
    pub fn pattern_name(self) -> String {
        match self {
            TenGod::Companion => "建禄格".to_string(),
            TenGod::RobWealth => "羊刃格".to_string(),
            other => format!("{}格", other.name()),
        }
    }
}

impl Serialize for TenGod {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Pillar {
    pub ganzhi: GanZhi,
    pub stem_element: Element,
    pub branch_element: Element,
    /// Relation of this pillar's stem to the day master. `None` for the day pillar itself.
    pub ten_god: Option<TenGod>,
}

/// Five-element tally over the eight characters. Serializes as `{"木": n, ...}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ElementCounts([u8; 5]);

impl ElementCounts {
    fn add(&mut self, element: Element) {
        self.0[element as usize] += 1;
    }

    pub fn get(&self, element: Element) -> u8 {
        self.0[element as usize]
    }

    pub fn missing(&self) -> Vec<Element> {
        Element::ALL
            .into_iter()
            .filter(|e| self.get(*e) == 0)
            .collect()
    }
}

impl Serialize for ElementCounts {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(5))?;
        for element in Element::ALL {
            map.serialize_entry(element.name(), &self.get(element))?;
        }
        map.end()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Strength {
    #[serde(rename = "身强")]
    Strong,
    #[serde(rename = "身弱")]
    Weak,
}

#[derive(Debug, Clone, Serialize)]
pub struct BaziChart {
    pub year: Pillar,
    pub month: Pillar,
    pub day: Pillar,
    pub hour: Pillar,
    pub day_master: HeavenlyStem,
    pub day_master_element: Element,
    pub five_elements: ElementCounts,
    pub missing_elements: Vec<Element>,
    pub strength: Strength,
    pub pattern: String,
    pub favourable_element: Element,
    pub advice: String,
}

impl BaziChart {
    pub fn eight_characters(&self) -> String {
        [&self.year, &self.month, &self.day, &self.hour]
            .iter()
            .map(|p| p.ganzhi.name())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Computation
// ────────────────────────────────────────────────────────────────────────────

/// Computes the four pillars and derived readings for a birth moment.
pub fn analyze_bazi(birth: &BirthMoment) -> BaziChart {
    let date = birth.effective_date();

    let year = GanZhi::from_cycle_index(solar_year(date) as i64 - 4);

    let month_branch = solar_month_branch(date);
    let month = GanZhi {
        stem: HeavenlyStem::from_index(
            tiger_stem(year.stem).index() as i64 + months_since_tiger(month_branch),
        ),
        branch: month_branch,
    };

    let day = GanZhi::from_cycle_index(julian_day_number(date) + 49);

    let hb = hour_branch(birth.hour());
    let hour = GanZhi {
        stem: HeavenlyStem::from_index(rat_stem(day.stem).index() as i64 + hb.index() as i64),
        branch: hb,
    };

    let day_master = day.stem;
    let dm_element = day_master.element();

    let mut counts = ElementCounts::default();
    let mut supporting = 0usize;
    for gz in [year, month, day, hour] {
        for element in [gz.stem.element(), gz.branch.element()] {
            counts.add(element);
            if element == dm_element || element.generates() == dm_element {
                supporting += 1;
            }
        }
    }

    let strength = if supporting >= STRONG_THRESHOLD {
        Strength::Strong
    } else {
        Strength::Weak
    };

    let favourable_element = match strength {
        Strength::Strong => dm_element.generates(),
        Strength::Weak => dm_element.generated_by(),
    };

    let pattern = TenGod::of(day_master, month.branch.main_stem()).pattern_name();
    let missing_elements = counts.missing();
    let advice = build_advice(strength, favourable_element, &missing_elements);

    let pillar = |gz: GanZhi, ten_god: Option<TenGod>| Pillar {
        ganzhi: gz,
        stem_element: gz.stem.element(),
        branch_element: gz.branch.element(),
        ten_god,
    };

    BaziChart {
        year: pillar(year, Some(TenGod::of(day_master, year.stem))),
        month: pillar(month, Some(TenGod::of(day_master, month.stem))),
        day: pillar(day, None),
        hour: pillar(hour, Some(TenGod::of(day_master, hour.stem))),
        day_master,
        day_master_element: dm_element,
        five_elements: counts,
        missing_elements,
        strength,
        pattern,
        favourable_element,
        advice,
    }
}

fn element_guidance(element: Element) -> &'static str {
    match element {
        Element::Wood => "宜多接触自然与书卷，从事教育、文化、策划类事务，方位利东方，色宜青绿",
        Element::Fire => "宜主动表达、广结人缘，从事传播、设计、能源类事务，方位利南方，色宜红紫",
        Element::Earth => "宜稳扎稳打、积累资产，从事地产、管理、农业类事务，方位利中部，色宜黄褐",
        Element::Metal => "宜讲求规则与效率，从事金融、技术、法务类事务，方位利西方，色宜白金",
        Element::Water => "宜保持灵活、善用信息，从事贸易、物流、咨询类事务，方位利北方，色宜黑蓝",
    }
}

fn build_advice(strength: Strength, favourable: Element, missing: &[Element]) -> String {
    let mut advice = match strength {
        Strength::Strong => format!("日主偏旺，喜用{}泄秀生财；", favourable.name()),
        Strength::Weak => format!("日主偏弱，喜用{}生扶助身；", favourable.name()),
    };
    advice.push_str(element_guidance(favourable));
    advice.push('。');

    if !missing.is_empty() {
        let names: String = missing.iter().map(|e| e.name()).collect();
        advice.push_str(&format!("命局五行缺{names}，起居配色可适当补足。"));
    }
    advice
}

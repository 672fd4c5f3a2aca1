//! Zhou Yi (周易) hexagram casting.
//!
//! Two methods are supported:
//! - `Time`: the plum-blossom (梅花易数) numbers of the lunar date and hour.
//! - `Random`: six rounds of three coins, heads = 3, tails = 2.
//!
//! Line values follow the yarrow convention: 6 old yin, 7 young yang,
//! 8 young yin, 9 old yang. Old lines are moving and flip in the changed hexagram.

use chrono::{Duration, NaiveDateTime, Timelike};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::calendar::{hour_branch, CalendarError, LunarDate};
use crate::divination::hexagrams::{Hexagram, Trigram};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CastMethod {
    Time,
    #[default]
    Random,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Line {
    /// 1 = bottom .. 6 = top.
    pub position: u8,
    pub value: u8,
}

impl Line {
    pub fn is_yang(&self) -> bool {
        self.value % 2 == 1
    }

    pub fn is_moving(&self) -> bool {
        self.value == 6 || self.value == 9
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Casting {
    pub method: CastMethod,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cast_at: Option<NaiveDateTime>,
    pub lines: Vec<Line>,
    pub primary: Hexagram,
    pub changed: Option<Hexagram>,
    pub moving_lines: Vec<u8>,
}

impl Casting {
    fn from_lines(method: CastMethod, cast_at: Option<NaiveDateTime>, lines: Vec<Line>) -> Self {
        let primary_bits = lines
            .iter()
            .filter(|l| l.is_yang())
            .fold(0u8, |acc, l| acc | 1u8 << (l.position - 1));

        let moving_lines: Vec<u8> = lines
            .iter()
            .filter(|l| l.is_moving())
            .map(|l| l.position)
            .collect();

        let changed = if moving_lines.is_empty() {
            None
        } else {
            let mask = moving_lines
                .iter()
                .fold(0u8, |acc, p| acc | 1u8 << (p - 1));
            Some(Hexagram::from_bits(primary_bits ^ mask))
        };

        Self {
            method,
            cast_at,
            lines,
            primary: Hexagram::from_bits(primary_bits),
            changed,
            moving_lines,
        }
    }

    /// Short human-readable line, e.g. "山水蒙 ䷃（动爻：二）→ 山地剥".
    pub fn headline(&self) -> String {
        let mut text = format!("{} {}", self.primary.full_name, self.primary.symbol);
        if let Some(changed) = &self.changed {
            let positions: Vec<String> = self.moving_lines.iter().map(|p| line_name(*p)).collect();
            text.push_str(&format!(
                "（动爻：{}）→ {}",
                positions.join("、"),
                changed.full_name
            ));
        }
        text
    }
}

fn line_name(position: u8) -> String {
    match position {
        1 => "初".to_string(),
        2 => "二".to_string(),
        3 => "三".to_string(),
        4 => "四".to_string(),
        5 => "五".to_string(),
        _ => "上".to_string(),
    }
}

/// Casts by the lunar date and hour of `moment` (local Chinese time).
pub fn cast_by_time(moment: NaiveDateTime) -> Result<Casting, CalendarError> {
    let date = if moment.hour() == 23 {
        moment.date() + Duration::days(1)
    } else {
        moment.date()
    };
    let lunar = LunarDate::from_solar(date)?;

    let base = lunar.year_ganzhi().branch.ordinal() + lunar.month + lunar.day;
    let total = base + hour_branch(moment.hour()).ordinal();

    let upper = Trigram::from_number(base);
    let lower = Trigram::from_number(total);
    let moving = match total % 6 {
        0 => 6,
        r => r as u8,
    };

    let bits = Hexagram::from_trigrams(upper, lower).bits();
    let lines = (1..=6u8)
        .map(|position| {
            let yang = bits & (1u8 << (position - 1)) != 0;
            let value = match (yang, position == moving) {
                (true, true) => 9,
                (true, false) => 7,
                (false, true) => 6,
                (false, false) => 8,
            };
            Line { position, value }
        })
        .collect();

    Ok(Casting::from_lines(CastMethod::Time, Some(moment), lines))
}

/// Casts with three coins per line, bottom line first.
pub fn cast_by_coins<R: Rng + ?Sized>(rng: &mut R) -> Casting {
    let lines = (1..=6u8)
        .map(|position| {
            let value = (0..3)
                .map(|_| if rng.random_bool(0.5) { 3 } else { 2 })
                .sum();
            Line { position, value }
        })
        .collect();

    Casting::from_lines(CastMethod::Random, None, lines)
}

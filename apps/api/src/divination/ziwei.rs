//! Zi Wei Dou Shu (紫微斗数) chart layout.
//!
//! The chart is a fixed wheel of twelve palaces keyed by earthly branch. The
//! life palace comes from lunar month and birth hour; the bureau from the life
//! palace's nayin; Zi Wei from bureau and lunar day; every other major star is
//! a fixed offset from Zi Wei or its mirror Tian Fu.

use serde::Serialize;

use crate::calendar::ganzhi::tiger_stem;
use crate::calendar::{hour_branch, CalendarError, EarthlyBranch, Element, GanZhi, HeavenlyStem, LunarDate};
use crate::divination::{BirthMoment, Gender};

const PALACE_NAMES: [&str; 12] = [
    "命宫", "兄弟", "夫妻", "子女", "财帛", "疾厄", "迁移", "交友", "官禄", "田宅", "福德", "父母",
];

// ────────────────────────────────────────────────────────────────────────────
// Stars
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Star {
    ZiWei,
    TianJi,
    TaiYang,
    WuQu,
    TianTong,
    LianZhen,
    TianFu,
    TaiYin,
    TanLang,
    JuMen,
    TianXiang,
    TianLiang,
    QiSha,
    PoJun,
    WenChang,
    WenQu,
    ZuoFu,
    YouBi,
}

/// Zi Wei series, as offsets from Zi Wei (counted backwards on the wheel).
const ZIWEI_SERIES: [(Star, i64); 6] = [
    (Star::ZiWei, 0),
    (Star::TianJi, -1),
    (Star::TaiYang, -3),
    (Star::WuQu, -4),
    (Star::TianTong, -5),
    (Star::LianZhen, -8),
];

/// Tian Fu series, as offsets from Tian Fu (counted forwards).
const TIANFU_SERIES: [(Star, i64); 8] = [
    (Star::TianFu, 0),
    (Star::TaiYin, 1),
    (Star::TanLang, 2),
    (Star::JuMen, 3),
    (Star::TianXiang, 4),
    (Star::TianLiang, 5),
    (Star::QiSha, 6),
    (Star::PoJun, 10),
];

impl Star {
    pub fn name(self) -> &'static str {
        match self {
            Star::ZiWei => "紫微",
            Star::TianJi => "天机",
            Star::TaiYang => "太阳",
            Star::WuQu => "武曲",
            Star::TianTong => "天同",
            Star::LianZhen => "廉贞",
            Star::TianFu => "天府",
            Star::TaiYin => "太阴",
            Star::TanLang => "贪狼",
            Star::JuMen => "巨门",
            Star::TianXiang => "天相",
            Star::TianLiang => "天梁",
            Star::QiSha => "七杀",
            Star::PoJun => "破军",
            Star::WenChang => "文昌",
            Star::WenQu => "文曲",
            Star::ZuoFu => "左辅",
            Star::YouBi => "右弼",
        }
    }

    pub fn is_major(self) -> bool {
        !matches!(
            self,
            Star::WenChang | Star::WenQu | Star::ZuoFu | Star::YouBi
        )
    }

    fn reading(self) -> &'static str {
        match self {
            Star::ZiWei => "紫微坐命，气度尊贵，有领导与统筹之才，宜把握主导权",
            Star::TianJi => "天机坐命，思维敏捷，善于谋划，宜从事策划与技术工作",
            Star::TaiYang => "太阳坐命，热情外向，乐于付出，名声易显，宜广结善缘",
            Star::WuQu => "武曲坐命，刚毅果断，理财能力强，宜在实务中积累财富",
            Star::TianTong => "天同坐命，性情温和，重视生活品质，宜保持积极进取",
            Star::LianZhen => "廉贞坐命，个性鲜明，有原则与魄力，宜把握分寸与节奏",
            Star::TianFu => "天府坐命，稳重包容，善守成与管理，财库较为丰厚",
            Star::TaiYin => "太阴坐命，细腻敏感，重视家庭，宜稳健积累不动产",
            Star::TanLang => "贪狼坐命，多才多艺，交际广泛，宜专注方向、节制欲望",
            Star::JuMen => "巨门坐命，口才出众，洞察力强，宜以专业服人、慎言是非",
            Star::TianXiang => "天相坐命，忠厚守信，善于协调，宜辅佐合作中成就自我",
            Star::TianLiang => "天梁坐命，稳重老成，乐于助人，常逢贵人庇荫",
            Star::QiSha => "七杀坐命，独立果敢，敢于开创，宜在变动中把握机会",
            Star::PoJun => "破军坐命，勇于变革，不拘一格，宜先破后立、稳中求进",
            Star::WenChang | Star::WenQu => "文星入命，聪慧好学，利于考试与文书",
            Star::ZuoFu | Star::YouBi => "辅弼入命，人缘佳，多得助力",
        }
    }
}

impl Serialize for Star {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

/// The four transformations (四化).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Transformation {
    #[serde(rename = "化禄")]
    Lu,
    #[serde(rename = "化权")]
    Quan,
    #[serde(rename = "化科")]
    Ke,
    #[serde(rename = "化忌")]
    Ji,
}

/// Stars receiving 禄 权 科 忌, by year stem.
const TRANSFORMATIONS: [[Star; 4]; 10] = [
    [Star::LianZhen, Star::PoJun, Star::WuQu, Star::TaiYang],    // 甲
    [Star::TianJi, Star::TianLiang, Star::ZiWei, Star::TaiYin],  // 乙
    [Star::TianTong, Star::TianJi, Star::WenChang, Star::LianZhen], // 丙
    [Star::TaiYin, Star::TianTong, Star::TianJi, Star::JuMen],   // 丁
    [Star::TanLang, Star::TaiYin, Star::YouBi, Star::TianJi],    // 戊
    [Star::WuQu, Star::TanLang, Star::TianLiang, Star::WenQu],   // 己
    [Star::TaiYang, Star::WuQu, Star::TaiYin, Star::TianTong],   // 庚
    [Star::JuMen, Star::TaiYang, Star::WenQu, Star::WenChang],   // 辛
    [Star::TianLiang, Star::ZiWei, Star::ZuoFu, Star::WuQu],     // 壬
    [Star::PoJun, Star::JuMen, Star::TaiYin, Star::TanLang],     // 癸
];

fn transformations_for(year_stem: HeavenlyStem) -> [(Star, Transformation); 4] {
    let stars = TRANSFORMATIONS[year_stem.index()];
    [
        (stars[0], Transformation::Lu),
        (stars[1], Transformation::Quan),
        (stars[2], Transformation::Ke),
        (stars[3], Transformation::Ji),
    ]
}

// ────────────────────────────────────────────────────────────────────────────
// Chart types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct StarPlacement {
    pub star: Star,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transformation: Option<Transformation>,
}

/// Five-element bureau (五行局). `number` is also the starting age of the first decade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Bureau {
    pub element: Element,
    pub number: u32,
    pub name: &'static str,
}

impl Bureau {
    fn from_element(element: Element) -> Self {
        let (number, name) = match element {
            Element::Water => (2, "水二局"),
            Element::Wood => (3, "木三局"),
            Element::Metal => (4, "金四局"),
            Element::Earth => (5, "土五局"),
            Element::Fire => (6, "火六局"),
        };
        Self {
            element,
            number,
            name,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DecadeRange {
    pub from_age: u32,
    pub to_age: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct Palace {
    pub name: &'static str,
    pub ganzhi: GanZhi,
    pub major_stars: Vec<StarPlacement>,
    pub minor_stars: Vec<StarPlacement>,
    pub is_body_palace: bool,
    pub decade: DecadeRange,
}

#[derive(Debug, Clone, Serialize)]
pub struct ZiweiChart {
    pub lunar_date: LunarDate,
    pub lunar_display: String,
    pub gender: Gender,
    pub year_ganzhi: GanZhi,
    pub hour_branch: EarthlyBranch,
    pub life_palace: EarthlyBranch,
    pub body_palace: EarthlyBranch,
    /// Name of the palace the body palace falls in (e.g. 福德).
    pub body_palace_name: &'static str,
    pub bureau: Bureau,
    /// Major stars read for the life palace (borrowed from the opposite palace when empty).
    pub main_stars: Vec<Star>,
    pub decade_forward: bool,
    /// Ordered from 命宫 through 父母.
    pub palaces: Vec<Palace>,
    pub transformations: Vec<(Star, Transformation)>,
    pub summary: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Placement rules
// ────────────────────────────────────────────────────────────────────────────

/// Life palace: start at 寅, count forward to the lunar month, back by the hour.
pub fn life_palace(lunar_month: u32, hour: EarthlyBranch) -> EarthlyBranch {
    EarthlyBranch::YIN.offset(lunar_month as i64 - 1 - hour.index() as i64)
}

/// Body palace: start at 寅, count forward to the lunar month, forward by the hour.
pub fn body_palace(lunar_month: u32, hour: EarthlyBranch) -> EarthlyBranch {
    EarthlyBranch::YIN.offset(lunar_month as i64 - 1 + hour.index() as i64)
}

/// Position of Zi Wei for a bureau number and lunar day.
pub fn ziwei_position(bureau: u32, lunar_day: u32) -> EarthlyBranch {
    let mut borrowed = 0;
    while (lunar_day + borrowed) % bureau != 0 {
        borrowed += 1;
    }
    let quotient = (lunar_day + borrowed) / bureau;
    let base = EarthlyBranch::YIN.offset(quotient as i64 - 1);
    if borrowed % 2 == 1 {
        base.offset(-(borrowed as i64))
    } else {
        base.offset(borrowed as i64)
    }
}

/// Tian Fu mirrors Zi Wei across the 寅–申 axis.
pub fn tianfu_position(ziwei: EarthlyBranch) -> EarthlyBranch {
    EarthlyBranch::from_index(4 - ziwei.index() as i64)
}

fn palace_stem(year_stem: HeavenlyStem, branch: EarthlyBranch) -> HeavenlyStem {
    let steps = (branch.index() as i64 - 2).rem_euclid(12);
    HeavenlyStem::from_index(tiger_stem(year_stem).index() as i64 + steps)
}

fn star_positions(ziwei: EarthlyBranch, lunar_month: u32, hour: EarthlyBranch) -> Vec<(Star, EarthlyBranch)> {
    let tianfu = tianfu_position(ziwei);
    let month_steps = lunar_month as i64 - 1;
    let hour_steps = hour.index() as i64;

    ZIWEI_SERIES
        .iter()
        .map(|&(star, offset)| (star, ziwei.offset(offset)))
        .chain(
            TIANFU_SERIES
                .iter()
                .map(|&(star, offset)| (star, tianfu.offset(offset))),
        )
        .chain([
            (Star::WenChang, EarthlyBranch::XU.offset(-hour_steps)),
            (Star::WenQu, EarthlyBranch::CHEN.offset(hour_steps)),
            (Star::ZuoFu, EarthlyBranch::CHEN.offset(month_steps)),
            (Star::YouBi, EarthlyBranch::XU.offset(-month_steps)),
        ])
        .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Chart
// ────────────────────────────────────────────────────────────────────────────

/// Lays out the full chart for a birth moment.
pub fn generate_ziwei_chart(birth: &BirthMoment) -> Result<ZiweiChart, CalendarError> {
    let lunar_date = LunarDate::from_solar(birth.effective_date())?;
    let year_ganzhi = lunar_date.year_ganzhi();
    let year_stem = year_ganzhi.stem;
    let hour = hour_branch(birth.hour());

    let life = life_palace(lunar_date.month, hour);
    let body = body_palace(lunar_date.month, hour);

    let life_ganzhi = GanZhi {
        stem: palace_stem(year_stem, life),
        branch: life,
    };
    let bureau = Bureau::from_element(life_ganzhi.nayin_element());

    let ziwei = ziwei_position(bureau.number, lunar_date.day);
    let positions = star_positions(ziwei, lunar_date.month, hour);
    let transformations = transformations_for(year_stem);

    let decade_forward = year_stem.is_yang() == (birth.gender == Gender::Male);

    let palaces: Vec<Palace> = PALACE_NAMES
        .iter()
        .enumerate()
        .map(|(i, &name)| {
            let branch = life.offset(-(i as i64));
            let (major_stars, minor_stars): (Vec<_>, Vec<_>) = positions
                .iter()
                .filter(|(_, b)| *b == branch)
                .map(|&(star, _)| StarPlacement {
                    star,
                    transformation: transformations
                        .iter()
                        .find(|(s, _)| *s == star)
                        .map(|(_, t)| *t),
                })
                .partition(|p| p.star.is_major());

            let steps = (if decade_forward {
                branch.index() as i64 - life.index() as i64
            } else {
                life.index() as i64 - branch.index() as i64
            })
            .rem_euclid(12) as u32;
            let from_age = bureau.number + 10 * steps;

            Palace {
                name,
                ganzhi: GanZhi {
                    stem: palace_stem(year_stem, branch),
                    branch,
                },
                major_stars,
                minor_stars,
                is_body_palace: branch == body,
                decade: DecadeRange {
                    from_age,
                    to_age: from_age + 9,
                },
            }
        })
        .collect();

    let body_palace_name = palaces
        .iter()
        .find(|p| p.is_body_palace)
        .map(|p| p.name)
        .unwrap_or(PALACE_NAMES[0]);

    let mut main_stars = major_stars_at(&positions, life);
    let borrowed = main_stars.is_empty();
    if borrowed {
        main_stars = major_stars_at(&positions, life.opposite());
    }

    let summary = build_summary(&main_stars, borrowed, &palaces[0], body_palace_name, &bureau);

    Ok(ZiweiChart {
        lunar_display: lunar_date.display(),
        lunar_date,
        gender: birth.gender,
        year_ganzhi,
        hour_branch: hour,
        life_palace: life,
        body_palace: body,
        body_palace_name,
        bureau,
        main_stars,
        decade_forward,
        palaces,
        transformations: transformations.to_vec(),
        summary,
    })
}

fn major_stars_at(positions: &[(Star, EarthlyBranch)], branch: EarthlyBranch) -> Vec<Star> {
    positions
        .iter()
        .filter(|(star, b)| *b == branch && star.is_major())
        .map(|(star, _)| *star)
        .collect()
}

fn build_summary(
    main_stars: &[Star],
    borrowed: bool,
    life: &Palace,
    body_palace_name: &str,
    bureau: &Bureau,
) -> String {
    let mut parts = Vec::new();

    if borrowed {
        parts.push("命宫无主星，借对宫星曜论".to_string());
    }
    parts.extend(main_stars.iter().map(|s| s.reading().to_string()));

    for placement in life.major_stars.iter().chain(&life.minor_stars) {
        match placement.transformation {
            Some(Transformation::Lu) => {
                parts.push(format!("{}化禄入命，财源与机遇较顺", placement.star.name()))
            }
            Some(Transformation::Quan) => {
                parts.push(format!("{}化权入命，掌控力与执行力强", placement.star.name()))
            }
            Some(Transformation::Ke) => {
                parts.push(format!("{}化科入命，声誉与学业得益", placement.star.name()))
            }
            Some(Transformation::Ji) => {
                parts.push(format!("{}化忌入命，需防执念与波折", placement.star.name()))
            }
            None => {}
        }
    }

    parts.push(format!(
        "{}，身宫落{}，首个大限{}至{}岁",
        bureau.name, body_palace_name, life.decade.from_age, life.decade.to_age
    ));

    format!("{}。", parts.join("；"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chart() -> ZiweiChart {
        let birth = BirthMoment::new(1990, 5, 17, 14, Gender::Male).unwrap();
        generate_ziwei_chart(&birth).unwrap()
    }

    fn branch_of(chart: &ZiweiChart, star: Star) -> EarthlyBranch {
        chart
            .palaces
            .iter()
            .find(|p| {
                p.major_stars
                    .iter()
                    .chain(&p.minor_stars)
                    .any(|s| s.star == star)
            })
            .map(|p| p.ganzhi.branch)
            .unwrap()
    }

    #[test]
    fn test_life_and_body_palace() {
        // First month, 子 hour: both land on 寅.
        assert_eq!(life_palace(1, EarthlyBranch::ZI).name(), "寅");
        assert_eq!(body_palace(1, EarthlyBranch::ZI).name(), "寅");
        assert_eq!(life_palace(4, EarthlyBranch::from_index(7)).name(), "戌");
        assert_eq!(body_palace(4, EarthlyBranch::from_index(7)).name(), "子");
    }

    #[test]
    fn test_ziwei_position_table() {
        assert_eq!(ziwei_position(2, 1).name(), "丑");
        assert_eq!(ziwei_position(2, 2).name(), "寅");
        assert_eq!(ziwei_position(3, 1).name(), "辰");
        assert_eq!(ziwei_position(4, 1).name(), "亥");
        assert_eq!(ziwei_position(5, 1).name(), "午");
        assert_eq!(ziwei_position(6, 1).name(), "酉");
    }

    #[test]
    fn test_tianfu_mirror() {
        assert_eq!(tianfu_position(EarthlyBranch::ZI).name(), "辰");
        assert_eq!(tianfu_position(EarthlyBranch::YIN).name(), "寅");
    }

    #[test]
    fn test_full_chart_layout() {
        let c = chart();
        assert_eq!(c.lunar_date.month, 4);
        assert_eq!(c.lunar_date.day, 23);
        assert_eq!(c.year_ganzhi.name(), "庚午");
        assert_eq!(c.life_palace.name(), "戌");
        assert_eq!(c.body_palace.name(), "子");
        assert_eq!(c.body_palace_name, "福德");
        assert_eq!(c.palaces[0].ganzhi.name(), "丙戌");
        assert_eq!(c.bureau.name, "土五局");
        assert_eq!(c.main_stars, vec![Star::TanLang]);

        assert_eq!(branch_of(&c, Star::ZiWei).name(), "申");
        assert_eq!(branch_of(&c, Star::TianFu).name(), "申");
        assert_eq!(branch_of(&c, Star::LianZhen).name(), "子");
        assert_eq!(branch_of(&c, Star::PoJun).name(), "午");
        assert_eq!(branch_of(&c, Star::WenChang).name(), "卯");
        assert_eq!(branch_of(&c, Star::ZuoFu).name(), "未");
    }

    #[test]
    fn test_every_star_placed_once() {
        let c = chart();
        let placed: usize = c
            .palaces
            .iter()
            .map(|p| p.major_stars.len() + p.minor_stars.len())
            .sum();
        assert_eq!(placed, 18);
        assert_eq!(c.palaces.len(), 12);
    }

    #[test]
    fn test_decades_and_transformations() {
        let c = chart();
        assert!(c.decade_forward);
        assert_eq!(c.palaces[0].decade, DecadeRange { from_age: 5, to_age: 14 });
        // Forward: the next decade is the palace after 命宫 on the wheel, 父母.
        assert_eq!(c.palaces[11].decade.from_age, 15);
        assert_eq!(c.transformations[0], (Star::TaiYang, Transformation::Lu));
        assert_eq!(c.transformations[3], (Star::TianTong, Transformation::Ji));
        assert!(c.summary.contains("贪狼坐命"));
    }

    #[test]
    fn test_female_yang_year_runs_backward() {
        let birth = BirthMoment::new(1990, 5, 17, 14, Gender::Female).unwrap();
        let c = generate_ziwei_chart(&birth).unwrap();
        assert!(!c.decade_forward);
        assert_eq!(c.palaces[1].decade.from_age, 15);
    }
}

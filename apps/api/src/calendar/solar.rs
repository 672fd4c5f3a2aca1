//! Solar-side calendar arithmetic: Julian day numbers and solar-term months.

use chrono::{Datelike, NaiveDate};

use crate::calendar::ganzhi::EarthlyBranch;

/// Approximate Gregorian day on which each month's "jie" solar term begins.
/// Index 0 = January (小寒) .. 11 = December (大雪). Real term dates drift by
/// up to a day across years; a fixed table is close enough for this service.
const TERM_START_DAY: [u32; 12] = [6, 4, 6, 5, 6, 6, 7, 8, 8, 8, 7, 7];

/// Gregorian date → Julian Day Number.
pub fn julian_day_number(date: NaiveDate) -> i64 {
    let (year, month, day) = (date.year() as i64, date.month() as i64, date.day() as i64);
    let a = (14 - month) / 12;
    let y = year + 4800 - a;
    let m = month + 12 * a - 3;
    day + (153 * m + 2) / 5 + 365 * y + y / 4 - y / 100 + y / 400 - 32045
}

/// Year used for the BaZi year pillar. The year turns at 立春 (Feb 4), not Jan 1.
pub fn solar_year(date: NaiveDate) -> i32 {
    let before_spring = date.month() == 1
        || (date.month() == 2 && date.day() < TERM_START_DAY[1]);
    if before_spring {
        date.year() - 1
    } else {
        date.year()
    }
}

/// Branch of the solar month containing `date` (寅 starts at 立春).
pub fn solar_month_branch(date: NaiveDate) -> EarthlyBranch {
    let month = date.month() as i64;
    let started = date.day() >= TERM_START_DAY[(month - 1) as usize];
    if started {
        EarthlyBranch::from_index(month)
    } else {
        EarthlyBranch::from_index(month - 1)
    }
}

/// Months elapsed since the 寅 month of the solar year (0 ..= 11).
pub fn months_since_tiger(branch: EarthlyBranch) -> i64 {
    (branch.index() as i64 - 2).rem_euclid(12)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_julian_day_number_known_values() {
        assert_eq!(julian_day_number(date(2000, 1, 1)), 2451545);
        assert_eq!(julian_day_number(date(1970, 1, 1)), 2440588);
    }

    #[test]
    fn test_solar_year_turns_at_spring() {
        assert_eq!(solar_year(date(1990, 2, 3)), 1989);
        assert_eq!(solar_year(date(1990, 2, 4)), 1990);
        assert_eq!(solar_year(date(1990, 1, 20)), 1989);
        assert_eq!(solar_year(date(1990, 12, 31)), 1990);
    }

    #[test]
    fn test_solar_month_branch() {
        assert_eq!(solar_month_branch(date(1990, 2, 4)).name(), "寅");
        assert_eq!(solar_month_branch(date(1990, 2, 3)).name(), "丑");
        assert_eq!(solar_month_branch(date(1990, 1, 5)).name(), "子");
        assert_eq!(solar_month_branch(date(1990, 5, 17)).name(), "巳");
        assert_eq!(solar_month_branch(date(1990, 12, 7)).name(), "子");
        assert_eq!(months_since_tiger(EarthlyBranch::from_index(1)), 11);
    }
}

// Divination computations: BaZi, Zi Wei Dou Shu and Zhou Yi casting.
// Every function here is deterministic given its inputs; the only randomness
// (coin casting) takes the RNG as a parameter.

pub mod bazi;
pub mod hexagrams;
pub mod ziwei;
pub mod zhouyi;

use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::calendar::{lunar, CalendarError};

/// Birth gender. Accepts English and Chinese spellings on input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    #[serde(alias = "m", alias = "男")]
    Male,
    #[serde(alias = "f", alias = "女")]
    Female,
}

impl Gender {
    pub fn name(self) -> &'static str {
        match self {
            Gender::Male => "男",
            Gender::Female => "女",
        }
    }
}

/// A validated birth moment (local Chinese time, hour resolution).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BirthMoment {
    pub datetime: NaiveDateTime,
    pub gender: Gender,
}

impl BirthMoment {
    pub fn new(
        year: i32,
        month: u32,
        day: u32,
        hour: u32,
        gender: Gender,
    ) -> Result<Self, CalendarError> {
        let date = NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| {
            CalendarError::InvalidDate(format!("{year:04}-{month:02}-{day:02} is not a valid date"))
        })?;
        let datetime = date.and_hms_opt(hour, 0, 0).ok_or_else(|| {
            CalendarError::InvalidDate(format!("hour {hour} must be between 0 and 23"))
        })?;

        let moment = Self { datetime, gender };

        if date < lunar::first_supported_date()
            || moment.effective_date() > lunar::last_supported_date()
        {
            return Err(CalendarError::OutOfRange(date));
        }

        Ok(moment)
    }

    pub fn hour(&self) -> u32 {
        chrono::Timelike::hour(&self.datetime)
    }

    /// The calendar day used for day pillars and lunar dates.
    /// The late 子 hour (23:00) already belongs to the following day.
    pub fn effective_date(&self) -> NaiveDate {
        let date = self.datetime.date();
        if self.hour() == 23 {
            date + Duration::days(1)
        } else {
            date
        }
    }
}

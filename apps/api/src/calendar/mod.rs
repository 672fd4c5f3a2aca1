// Calendar primitives shared by the divination modules.
// Pure functions over static tables; no I/O.

pub mod ganzhi;
pub mod lunar;
pub mod solar;

use chrono::NaiveDate;
use thiserror::Error;

pub use ganzhi::{hour_branch, EarthlyBranch, Element, GanZhi, HeavenlyStem};
pub use lunar::LunarDate;

#[derive(Debug, Error)]
pub enum CalendarError {
    #[error("date {0} is outside the supported range 1900-01-31 ..= 2100-12-31")]
    OutOfRange(NaiveDate),

    #[error("invalid date or time: {0}")]
    InvalidDate(String),
}

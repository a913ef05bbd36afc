//! Lunar annotations for Gregorian dates.
//!
//! The grid builder only talks to [`LunarCalendar`]. [`ChineseCalendar`]
//! binds it to `tyme4rs`.

use chrono::{Datelike, NaiveDate};
use std::ops::RangeInclusive;

use crate::error::{Error, Result};

use tyme4rs::tyme::lunar::LUNAR_DAY_NAMES;

pub mod date;
pub mod festival;
pub mod term;

pub use date::LunarDate;
pub use festival::Festival;
pub use term::SolarTerm;

/// Gregorian years whose month grids can be built. Padding cells reach one
/// month beyond either end.
pub const SUPPORTED_YEARS: RangeInclusive<i32> = 1901..=2099;

/// Label of the first day of a lunar month.
pub const FIRST_DAY_LABEL: &str = "初一";

const DIGITS: [&str; 10] = ["〇", "一", "二", "三", "四", "五", "六", "七", "八", "九"];
const MONTHS: [&str; 12] = [
    "正", "二", "三", "四", "五", "六", "七", "八", "九", "十", "冬", "腊",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LunarInfo {
    pub day_label: String,
    pub month_label: String,
    pub year_label: String,
    pub solar_term: Option<SolarTerm>,
    /// Lunar festivals of the day, most important first.
    pub festivals: Vec<Festival>,
}

pub trait LunarCalendar {
    fn lunar_info(&self, date: NaiveDate) -> Result<LunarInfo>;

    fn supported_years(&self) -> RangeInclusive<i32>;

    fn supports(&self, year: i32) -> bool {
        self.supported_years().contains(&year)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ChineseCalendar;

impl LunarCalendar for ChineseCalendar {
    fn lunar_info(&self, date: NaiveDate) -> Result<LunarInfo> {
        // Padding cells of the first and last supported year reach one month
        // beyond the range.
        let year = date.year();
        if year < SUPPORTED_YEARS.start() - 1 || year > SUPPORTED_YEARS.end() + 1 {
            return Err(Error::year_out_of_range(year));
        }

        let lunar = LunarDate::from_solar(date)?;

        Ok(LunarInfo {
            day_label: day_label(lunar.day),
            month_label: month_label(lunar.month, lunar.leap),
            year_label: year_label(lunar.year),
            solar_term: SolarTerm::on(date)?,
            festivals: Festival::lunar(&lunar),
        })
    }

    fn supported_years(&self) -> RangeInclusive<i32> {
        SUPPORTED_YEARS
    }
}

pub fn day_label(day: u32) -> String {
    LUNAR_DAY_NAMES
        .get((day as usize).wrapping_sub(1))
        .copied()
        .unwrap_or_default()
        .to_owned()
}

/// Month label without the trailing `月`.
pub fn month_label(month: u32, leap: bool) -> String {
    let name = MONTHS
        .get(month.wrapping_sub(1) as usize)
        .copied()
        .unwrap_or_default();

    if leap {
        format!("闰{}", name)
    } else {
        name.to_owned()
    }
}

pub fn year_label(year: i32) -> String {
    year.to_string()
        .chars()
        .filter_map(|c| c.to_digit(10))
        .map(|d| DIGITS[d as usize])
        .collect()
}

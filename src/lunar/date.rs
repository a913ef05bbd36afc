use chrono::{Datelike, NaiveDate};
use tyme4rs::tyme::lunar::{LunarDay, LunarMonth};
use tyme4rs::tyme::solar::SolarDay;

use crate::error::{Error, ErrorKind, Result};

/// A day of the Chinese lunisolar calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LunarDate {
    pub year: i32,
    pub month: u32,
    pub leap: bool,
    pub day: u32,
    days_in_month: u32,
}

pub(crate) fn solar_day(date: NaiveDate) -> Result<SolarDay> {
    SolarDay::new(date.year() as isize, date.month() as usize, date.day() as usize)
        .map_err(|e| Error::new(ErrorKind::DateParse, &e))
}

impl LunarDate {
    pub fn from_solar(date: NaiveDate) -> Result<Self> {
        Ok(LunarDate::from(solar_day(date)?.get_lunar_day()))
    }

    /// Whether this is the last day of its month.
    pub fn is_month_end(&self) -> bool {
        self.day == self.days_in_month
    }
}

impl From<LunarDay> for LunarDate {
    fn from(day: LunarDay) -> Self {
        let month: LunarMonth = day.get_lunar_month();
        LunarDate {
            year: month.get_year() as i32,
            month: month.get_month() as u32,
            leap: month.is_leap(),
            day: day.get_day() as u32,
            days_in_month: month.get_day_count() as u32,
        }
    }
}

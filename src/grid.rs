//! Year calendar grids.
//!
//! Every month is laid out as exactly six weeks of seven days. Cells before
//! the first and after the last day of the month are filled with the
//! neighbouring months' dates and flagged as padding.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::convert::TryFrom;
use std::fmt;

use crate::error::{Error, ErrorKind, Result};
use crate::lunar::{Festival, LunarCalendar, SolarTerm, FIRST_DAY_LABEL};

pub const DAYS_PER_WEEK: usize = 7;
pub const WEEKS_PER_MONTH: usize = 6;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeekStart {
    Sunday,
    Monday,
}

impl Default for WeekStart {
    fn default() -> Self {
        WeekStart::Sunday
    }
}

impl WeekStart {
    pub fn toggled(self) -> Self {
        match self {
            WeekStart::Sunday => WeekStart::Monday,
            WeekStart::Monday => WeekStart::Sunday,
        }
    }

    /// Weekday headings in column order.
    pub fn titles(self) -> [&'static str; DAYS_PER_WEEK] {
        const TITLES: [&str; DAYS_PER_WEEK] =
            ["周日", "周一", "周二", "周三", "周四", "周五", "周六"];

        let mut titles = [""; DAYS_PER_WEEK];
        for (column, title) in titles.iter_mut().enumerate() {
            *title = TITLES[column_weekday(column as u32, self).num_days_from_sunday() as usize];
        }
        titles
    }
}

impl TryFrom<u32> for WeekStart {
    type Error = Error;

    fn try_from(value: u32) -> Result<Self> {
        match value {
            0 => Ok(WeekStart::Sunday),
            1 => Ok(WeekStart::Monday),
            other => Err(Error::new(
                ErrorKind::ParseError,
                &format!("week start must be 0 or 1, got {}", other),
            )),
        }
    }
}

impl fmt::Display for WeekStart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WeekStart::Sunday => f.write_str("sunday"),
            WeekStart::Monday => f.write_str("monday"),
        }
    }
}

/// Column of a weekday (0 = Sunday) for the given start of the week.
pub fn weekday_offset(weekday: u32, week_start: WeekStart) -> u32 {
    match week_start {
        WeekStart::Monday if weekday == 0 => 6,
        WeekStart::Monday => weekday - 1,
        WeekStart::Sunday => weekday,
    }
}

/// Date identity in the form `YYYY-MM-DD`.
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT).map_err(|e| {
        Error::new(
            ErrorKind::DateParse,
            &format!("'{}' is not a YYYY-MM-DD date: {}", s, e),
        )
    })
}

/// Everything a single calendar cell shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateInfo {
    pub date: NaiveDate,
    pub lunar_day: String,
    pub lunar_month: String,
    pub lunar_year: String,
    pub solar_term: Option<SolarTerm>,
    pub festival: Option<Festival>,
    /// 0 = Sunday, 6 = Saturday
    pub weekday: u32,
    pub is_cur_month: bool,
}

impl DateInfo {
    pub fn id(&self) -> String {
        format_date(self.date)
    }

    pub fn year(&self) -> i32 {
        self.date.year()
    }

    pub fn month(&self) -> u32 {
        self.date.month()
    }

    pub fn day(&self) -> u32 {
        self.date.day()
    }

    pub fn is_weekend(&self) -> bool {
        self.weekday == 0 || self.weekday == 6
    }

    /// The secondary line of a cell.
    pub fn label(&self) -> String {
        if !self.is_cur_month {
            return self.lunar_day.clone();
        }

        if let Some(festival) = self.festival {
            festival.name().to_owned()
        } else if let Some(term) = self.solar_term {
            term.name().to_owned()
        } else if self.lunar_day == FIRST_DAY_LABEL {
            format!("{}月", self.lunar_month)
        } else {
            self.lunar_day.clone()
        }
    }
}

pub fn date_info<L: LunarCalendar + ?Sized>(
    lunar: &L,
    date: NaiveDate,
    is_cur_month: bool,
) -> Result<DateInfo> {
    let info = lunar.lunar_info(date)?;
    let festival = info
        .festivals
        .first()
        .copied()
        .or_else(|| Festival::gregorian(date));

    Ok(DateInfo {
        date,
        lunar_day: info.day_label,
        lunar_month: info.month_label,
        lunar_year: info.year_label,
        solar_term: info.solar_term,
        festival,
        weekday: date.weekday().num_days_from_sunday(),
        is_cur_month,
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthWeek {
    /// 0 = January
    pub month: u32,
    pub weeks: Vec<Vec<DateInfo>>,
}

impl MonthWeek {
    pub fn days(&self) -> impl Iterator<Item = &DateInfo> {
        self.weeks.iter().flatten()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YearGrid {
    pub year: i32,
    pub week_start: WeekStart,
    pub months: Vec<MonthWeek>,
}

impl YearGrid {
    /// Finds the current-month cell of `date`.
    pub fn find(&self, date: NaiveDate) -> Option<(usize, usize, usize)> {
        let month = self.months.get(date.month0() as usize)?;
        month.weeks.iter().enumerate().find_map(|(w, week)| {
            week.iter()
                .position(|day| day.is_cur_month && day.date == date)
                .map(|d| (month.month as usize, w, d))
        })
    }

    pub fn days(&self) -> impl Iterator<Item = &DateInfo> {
        self.months.iter().flat_map(|m| m.days())
    }
}

fn first_of_month(year: i32, month0: u32) -> Result<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month0 + 1, 1).ok_or_else(|| {
        Error::new(
            ErrorKind::DateParse,
            &format!("no month {} in year {}", month0 + 1, year),
        )
    })
}

fn last_of_month(year: i32, month0: u32) -> Result<NaiveDate> {
    let next = if month0 == 11 {
        first_of_month(year + 1, 0)?
    } else {
        first_of_month(year, month0 + 1)?
    };
    Ok(next - Duration::days(1))
}

fn offset_of(date: NaiveDate, week_start: WeekStart) -> u32 {
    weekday_offset(date.weekday().num_days_from_sunday(), week_start)
}

/// Six weeks of `month0` (0 = January) in `year`.
pub fn build_month<L: LunarCalendar + ?Sized>(
    lunar: &L,
    year: i32,
    month0: u32,
    week_start: WeekStart,
) -> Result<MonthWeek> {
    let first = first_of_month(year, month0)?;
    let last = last_of_month(year, month0)?;

    let mut days = Vec::with_capacity(DAYS_PER_WEEK * WEEKS_PER_MONTH);

    let leading = offset_of(first, week_start) as i64;
    for i in (1..=leading).rev() {
        days.push(date_info(lunar, first - Duration::days(i), false)?);
    }

    let mut date = first;
    while date <= last {
        days.push(date_info(lunar, date, true)?);
        date = date + Duration::days(1);
    }

    // Complete the last row with days of the next month.
    let end = offset_of(last, week_start);
    for i in end..DAYS_PER_WEEK as u32 - 1 {
        days.push(date_info(
            lunar,
            last + Duration::days((i - end + 1) as i64),
            false,
        )?);
    }

    let mut weeks: Vec<Vec<DateInfo>> = days
        .chunks(DAYS_PER_WEEK)
        .map(|week| week.to_vec())
        .collect();

    while weeks.len() < WEEKS_PER_MONTH {
        let last_shown = weeks
            .last()
            .and_then(|week| week.last())
            .map(|day| day.date)
            .unwrap_or(last);
        let week = (1..=DAYS_PER_WEEK as i64)
            .map(|i| date_info(lunar, last_shown + Duration::days(i), false))
            .collect::<Result<Vec<_>>>()?;
        weeks.push(week);
    }

    Ok(MonthWeek {
        month: month0,
        weeks,
    })
}

pub fn build_year<L: LunarCalendar + ?Sized>(
    lunar: &L,
    year: i32,
    week_start: WeekStart,
) -> Result<YearGrid> {
    if !lunar.supports(year) {
        return Err(Error::year_out_of_range(year));
    }

    log::debug!("Building calendar grid for {} ({} first)", year, week_start);

    let months = (0..12)
        .map(|month0| build_month(lunar, year, month0, week_start))
        .collect::<Result<Vec<_>>>()?;

    Ok(YearGrid {
        year,
        week_start,
        months,
    })
}

/// Weekday shown in a column.
pub fn column_weekday(column: u32, week_start: WeekStart) -> Weekday {
    let mut weekday = match week_start {
        WeekStart::Sunday => Weekday::Sun,
        WeekStart::Monday => Weekday::Mon,
    };
    for _ in 0..column {
        weekday = weekday.succ();
    }
    weekday
}

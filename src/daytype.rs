use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::fmt;

use crate::grid::DateInfo;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DayType {
    Work,
    Rest,
    Holiday,
}

impl DayType {
    pub fn name(self) -> &'static str {
        match self {
            DayType::Work => "工作日",
            DayType::Rest => "休息日",
            DayType::Holiday => "节假日",
        }
    }
}

impl fmt::Display for DayType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DayType::Work => f.write_str("work"),
            DayType::Rest => f.write_str("rest"),
            DayType::Holiday => f.write_str("holiday"),
        }
    }
}

/// How a current-month cell is painted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellKind {
    Selected,
    Work,
    Rest,
    Holiday,
}

impl From<DayType> for CellKind {
    fn from(ty: DayType) -> Self {
        match ty {
            DayType::Work => CellKind::Work,
            DayType::Rest => CellKind::Rest,
            DayType::Holiday => CellKind::Holiday,
        }
    }
}

/// Explicit day type assignments, keyed by date.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DayTypes {
    days: BTreeMap<NaiveDate, DayType>,
}

impl DayTypes {
    pub fn new() -> Self {
        Self::default()
    }

    /// A date found in several lists keeps the type that wins when painting:
    /// work over holiday over rest.
    pub fn from_lists(work: &[NaiveDate], rest: &[NaiveDate], holiday: &[NaiveDate]) -> Self {
        let mut types = DayTypes::new();
        types.assign(rest.iter().copied(), DayType::Rest);
        types.assign(holiday.iter().copied(), DayType::Holiday);
        types.assign(work.iter().copied(), DayType::Work);
        types
    }

    pub fn assign<I>(&mut self, dates: I, ty: DayType) -> usize
    where
        I: IntoIterator<Item = NaiveDate>,
    {
        let mut count = 0;
        for date in dates {
            self.days.insert(date, ty);
            count += 1;
        }
        log::debug!("Marked {} day(s) as {}", count, ty);
        count
    }

    pub fn clear<I>(&mut self, dates: I) -> usize
    where
        I: IntoIterator<Item = NaiveDate>,
    {
        dates
            .into_iter()
            .filter(|date| self.days.remove(date).is_some())
            .count()
    }

    pub fn get(&self, date: NaiveDate) -> Option<DayType> {
        self.days.get(&date).copied()
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Paint priority: selection, explicit workday, holiday, weekend or
    /// explicit rest day, then the workday default.
    pub fn classify(&self, info: &DateInfo, selected: &[NaiveDate]) -> CellKind {
        if selected.contains(&info.date) {
            return CellKind::Selected;
        }

        match self.get(info.date) {
            Some(DayType::Work) => CellKind::Work,
            Some(DayType::Holiday) => CellKind::Holiday,
            Some(DayType::Rest) => CellKind::Rest,
            None if info.is_weekend() => CellKind::Rest,
            None => CellKind::Work,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::date_info;
    use crate::lunar::ChineseCalendar;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn cell(y: i32, m: u32, d: u32) -> DateInfo {
        date_info(&ChineseCalendar, date(y, m, d), true).unwrap()
    }

    #[test]
    fn defaults_follow_weekends() {
        let types = DayTypes::new();
        // 2024-06-08 is a Saturday, 2024-06-10 a Monday.
        assert_eq!(types.classify(&cell(2024, 6, 8), &[]), CellKind::Rest);
        assert_eq!(types.classify(&cell(2024, 6, 9), &[]), CellKind::Rest);
        assert_eq!(types.classify(&cell(2024, 6, 10), &[]), CellKind::Work);
    }

    #[test]
    fn selection_wins() {
        let types = DayTypes::from_lists(&[date(2024, 6, 10)], &[], &[]);
        let selected = [date(2024, 6, 10)];
        assert_eq!(types.classify(&cell(2024, 6, 10), &selected), CellKind::Selected);
    }

    #[test]
    fn workday_overrides_weekend() {
        let types = DayTypes::from_lists(&[date(2024, 2, 4)], &[], &[]);
        // Sunday, marked as a make-up workday.
        assert_eq!(types.classify(&cell(2024, 2, 4), &[]), CellKind::Work);
    }

    #[test]
    fn holiday_beats_weekend_and_rest() {
        let day = date(2024, 10, 5);
        let types = DayTypes::from_lists(&[], &[day], &[day]);
        assert_eq!(types.get(day), Some(DayType::Holiday));
        assert_eq!(types.classify(&cell(2024, 10, 5), &[]), CellKind::Holiday);
    }

    #[test]
    fn overlapping_lists_keep_priority() {
        let day = date(2024, 5, 1);
        let types = DayTypes::from_lists(&[day], &[day], &[day]);
        assert_eq!(types.get(day), Some(DayType::Work));
        assert_eq!(types.len(), 1);
    }

    #[test]
    fn rest_day_on_weekday() {
        let types = DayTypes::from_lists(&[], &[date(2024, 6, 11)], &[]);
        assert_eq!(types.classify(&cell(2024, 6, 11), &[]), CellKind::Rest);
    }

    #[test]
    fn assign_and_clear() {
        let mut types = DayTypes::new();
        let days = vec![date(2024, 10, 1), date(2024, 10, 2), date(2024, 10, 3)];

        assert_eq!(types.assign(days.clone(), DayType::Holiday), 3);
        assert!(days.iter().all(|d| types.get(*d) == Some(DayType::Holiday)));

        assert_eq!(types.assign(vec![date(2024, 10, 2)], DayType::Work), 1);
        assert_eq!(types.get(date(2024, 10, 2)), Some(DayType::Work));
        assert_eq!(types.len(), 3);

        assert_eq!(types.clear(vec![date(2024, 10, 1), date(2024, 12, 1)]), 1);
        assert_eq!(types.len(), 2);
        assert_eq!(types.get(date(2024, 10, 1)), None);
    }
}

//! Non-interactive rendering of a year, one month below the other.

use itertools::Itertools;

use crate::daytype::{CellKind, DayTypes};
use crate::grid::{DateInfo, YearGrid};

use super::year_window::center;

const CELL_WIDTH: usize = 10;
const LABEL_WIDTH: usize = 6;

fn mark(kind: CellKind) -> char {
    match kind {
        CellKind::Holiday => '*',
        CellKind::Rest => '-',
        CellKind::Work | CellKind::Selected => ' ',
    }
}

fn render_cell(day: &DateInfo, day_types: &DayTypes) -> String {
    if !day.is_cur_month {
        return " ".repeat(CELL_WIDTH);
    }

    format!(
        "{:>2}{} {}",
        day.day(),
        mark(day_types.classify(day, &[])),
        center(&day.label(), LABEL_WIDTH)
    )
}

pub fn render_year(grid: &YearGrid, day_types: &DayTypes) -> String {
    let mut lines = vec![
        grid.year.to_string(),
        "* 节假日  - 休息日".to_owned(),
    ];

    for month in &grid.months {
        lines.push(String::new());
        lines.push(format!("{}月", month.month + 1));
        lines.push(
            grid.week_start
                .titles()
                .iter()
                .map(|title| center(title, CELL_WIDTH))
                .join(""),
        );

        for week in &month.weeks {
            lines.push(week.iter().map(|day| render_cell(day, day_types)).join(""));
        }
    }

    // Rows keep their padding so that a week made of padding only still
    // prints as a line.
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::daytype::DayType;
    use crate::grid::{build_year, WeekStart};
    use crate::lunar::ChineseCalendar;
    use chrono::NaiveDate;

    fn render(week_start: WeekStart, day_types: &DayTypes) -> String {
        let grid = build_year(&ChineseCalendar, 2024, week_start).unwrap();
        render_year(&grid, day_types)
    }

    #[test]
    fn header_and_months() {
        let text = render(WeekStart::Sunday, &DayTypes::new());
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "2024");
        assert_eq!(lines[3], "1月");
        assert!(lines[4].trim_start().starts_with("周日"));
        assert!(text.contains("\n12月\n"));
        // Title, weekdays and six weeks for each month.
        assert_eq!(lines.len(), 2 + 12 * 9);
    }

    #[test]
    fn padding_only_week_is_kept() {
        // December 2024 ends on a Tuesday in the fifth row.
        let text = render(WeekStart::Sunday, &DayTypes::new());
        let last = text.lines().last().unwrap();
        assert_eq!(last, " ".repeat(CELL_WIDTH * 7));
    }

    #[test]
    fn cells_show_labels_and_marks() {
        let text = render(WeekStart::Sunday, &DayTypes::new());
        let first_week = text.lines().nth(5).unwrap();

        // Padding for December 31, then New Year's Day on Monday.
        assert!(first_week.starts_with(&" ".repeat(CELL_WIDTH)));
        assert!(first_week.contains(" 1   元旦"));
        // Saturday with a solar term.
        assert!(first_week.contains(" 6-  小寒"));
    }

    #[test]
    fn holidays_are_marked() {
        let mut day_types = DayTypes::new();
        day_types.assign(
            vec![NaiveDate::from_ymd_opt(2024, 2, 10).unwrap()],
            DayType::Holiday,
        );
        let text = render(WeekStart::Monday, &day_types);
        assert!(text.contains("10*  春节"));
    }
}

use chrono::{Datelike, Local, NaiveDate};

use unsegen::base::style::*;
use unsegen::widget::builtin::PromptLine;

use crate::config::{Colors, Config, HexColor};
use crate::daytype::{CellKind, DayType, DayTypes};
use crate::error::Result;
use crate::geometry::{Point, Rect};
use crate::grid::{build_year, DateInfo, WeekStart, YearGrid};
use crate::lunar::{ChineseCalendar, LunarCalendar};
use crate::select::{Candidate, CandidateSource, SelectionListener};

use super::layout::{CellSpace, YearLayout};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    Normal,
    Command,
    /// Waiting for a day type for the selected dates.
    Assign,
}

pub fn hex_to_color(hex: HexColor) -> Color {
    Color::Rgb {
        r: hex.r,
        g: hex.g,
        b: hex.b,
    }
}

#[derive(Clone, Debug)]
pub struct Theme {
    pub work_day_style: StyleModifier,
    pub rest_day_style: StyleModifier,
    pub holiday_style: StyleModifier,
    pub selected_style: StyleModifier,
    pub padding_style: StyleModifier,
    pub today_style: StyleModifier,
    pub month_header_style: StyleModifier,
    pub weekday_header_style: StyleModifier,
    pub year_header_style: StyleModifier,
    pub overlay_style: StyleModifier,
    pub error_style: StyleModifier,
}

impl Theme {
    pub fn from_config(config: &Config) -> Self {
        Theme::with_colors(&config.colors)
    }

    fn with_colors(colors: &Colors) -> Self {
        let cell = |hex: HexColor| {
            StyleModifier::new()
                .bg_color(hex_to_color(hex))
                .fg_color(Color::Black)
        };

        Theme {
            work_day_style: cell(colors.work_day),
            rest_day_style: cell(colors.rest_day),
            holiday_style: cell(colors.holiday),
            selected_style: cell(colors.selected),
            padding_style: StyleModifier::new().fg_color(Color::LightBlack),
            today_style: StyleModifier::new().underline(true),
            month_header_style: StyleModifier::new().bold(true),
            weekday_header_style: StyleModifier::new().fg_color(Color::LightBlack),
            year_header_style: StyleModifier::new().bold(true),
            overlay_style: StyleModifier::new().fg_color(Color::Blue).bold(true),
            error_style: StyleModifier::new().fg_color(Color::LightRed),
        }
    }

    pub fn cell_style(&self, kind: CellKind) -> StyleModifier {
        match kind {
            CellKind::Selected => self.selected_style,
            CellKind::Work => self.work_day_style,
            CellKind::Rest => self.rest_day_style,
            CellKind::Holiday => self.holiday_style,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Theme::with_colors(&Colors::default())
    }
}

pub struct Context {
    pub mode: Mode,
    pub theme: Theme,
    pub command_line: PromptLine,
    pub last_error_message: Option<String>,
    pub status_message: Option<String>,
    pub day_types: DayTypes,
    /// Dates inside the selection rectangle, or waiting for a day type.
    pub selected: Vec<NaiveDate>,
    pub quit: bool,
    lunar: ChineseCalendar,
    grid: YearGrid,
    scroll: i32,
    size: (i32, i32),
    today: NaiveDate,
}

impl Context {
    pub fn new(config: &Config) -> Result<Self> {
        let lunar = ChineseCalendar;
        let grid = build_year(&lunar, config.initial_year(), config.week_start)?;

        Ok(Context {
            mode: Mode::Normal,
            theme: Theme::from_config(config),
            command_line: PromptLine::with_prompt(":".to_owned()),
            last_error_message: None,
            status_message: None,
            day_types: config.day_types(),
            selected: Vec::new(),
            quit: false,
            lunar,
            grid,
            scroll: 0,
            size: (0, 0),
            today: Local::now().date_naive(),
        })
    }

    pub fn update(&mut self) {
        self.today = Local::now().date_naive();
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn grid(&self) -> &YearGrid {
        &self.grid
    }

    pub fn year(&self) -> i32 {
        self.grid.year
    }

    pub fn week_start(&self) -> WeekStart {
        self.grid.week_start
    }

    fn rebuild(&mut self, year: i32, week_start: WeekStart) -> Result<()> {
        self.grid = build_year(&self.lunar, year, week_start)?;
        Ok(())
    }

    pub fn set_year(&mut self, year: i32) -> Result<()> {
        if year != self.year() {
            log::info!("Switching to year {}", year);
            self.rebuild(year, self.week_start())?;
        }
        Ok(())
    }

    /// Moves by `delta` years. Stops at the ends of the supported range.
    pub fn shift_year(&mut self, delta: i32) -> Result<()> {
        let range = self.lunar.supported_years();
        let year = (self.year() + delta).clamp(*range.start(), *range.end());
        self.set_year(year)
    }

    pub fn set_week_start(&mut self, week_start: WeekStart) -> Result<()> {
        if week_start != self.week_start() {
            log::info!("Weeks start on {} now", week_start);
            self.rebuild(self.year(), week_start)?;
        }
        Ok(())
    }

    pub fn toggle_week_start(&mut self) -> Result<()> {
        self.set_week_start(self.week_start().toggled())
    }

    pub fn goto_today(&mut self) -> Result<()> {
        let today = self.today;
        let range = self.lunar.supported_years();
        self.set_year(today.year().clamp(*range.start(), *range.end()))?;
        self.scroll = self.layout().scroll_to(today.month0() as usize);
        Ok(())
    }

    /// Sets the terminal area the year view is drawn into.
    pub fn resize(&mut self, width: i32, height: i32) {
        self.size = (width, height);
        self.scroll = self.layout().scroll;
    }

    pub fn layout(&self) -> YearLayout {
        YearLayout::new(self.size.0, self.size.1, self.scroll)
    }

    /// Returns whether the view actually moved.
    pub fn scroll_by(&mut self, rows: i32) -> bool {
        let before = self.scroll;
        self.scroll = YearLayout::new(self.size.0, self.size.1, self.scroll + rows).scroll;
        before != self.scroll
    }

    pub fn cell_kind(&self, day: &DateInfo) -> CellKind {
        self.day_types.classify(day, &self.selected)
    }

    /// Applies `ty` to the selected dates, or removes their type if `None`.
    pub fn assign_selection(&mut self, ty: Option<DayType>) {
        let dates = std::mem::take(&mut self.selected);
        let message = match ty {
            Some(ty) => {
                let count = self.day_types.assign(dates, ty);
                format!("{} day(s) marked as {}", count, ty.name())
            }
            None => {
                let count = self.day_types.clear(dates);
                format!("{} day(s) reset", count)
            }
        };
        self.status_message = Some(message);
        self.mode = Mode::Normal;
    }

    /// Closes the command line. A selection made before opening it is still
    /// waiting for its day type.
    pub fn leave_command_line(&mut self) {
        self.mode = if self.selected.is_empty() {
            Mode::Normal
        } else {
            Mode::Assign
        };
    }

    pub fn cancel_selection(&mut self) {
        self.selected.clear();
        self.status_message = None;
        self.mode = Mode::Normal;
    }

    pub fn report_error(&mut self, message: String) {
        log::warn!("{}", message);
        self.last_error_message = Some(message);
    }
}

impl CandidateSource<NaiveDate> for Context {
    fn source_region(&self) -> Option<Rect> {
        let viewport = self.layout().viewport();
        if viewport.is_empty() {
            None
        } else {
            Some(CellSpace::to_pointer(viewport))
        }
    }

    fn candidates(&self) -> Vec<Candidate<NaiveDate>> {
        let layout = self.layout();
        let viewport = layout.viewport();

        let mut candidates = Vec::new();
        for (m, month) in self.grid.months.iter().enumerate() {
            for (w, week) in month.weeks.iter().enumerate() {
                for (d, day) in week.iter().enumerate() {
                    let cell = layout.cell(m, w, d);
                    if day.is_cur_month && cell.intersects(&viewport) {
                        candidates.push(Candidate::new(day.date, CellSpace::to_pointer(cell)));
                    }
                }
            }
        }
        candidates
    }

    // There is no text selection in a terminal. Starting a drag dismisses
    // pending messages instead.
    fn clear_text_selection(&mut self) {
        self.status_message = None;
        self.last_error_message = None;
    }
}

impl SelectionListener<NaiveDate> for Context {
    fn selection_changed(&mut self, selected: &[NaiveDate]) {
        self.selected = selected.to_vec();
    }

    fn selection_ended(&mut self) {
        self.mode = Mode::Assign;
        self.status_message = Some(format!(
            "{} day(s) selected: [1] {} [2] {} [3] {} [0] reset, : command, Esc cancels",
            self.selected.len(),
            DayType::Work.name(),
            DayType::Rest.name(),
            DayType::Holiday.name(),
        ));
    }
}

/// Pointer position for a terminal cell while `anchor` is held.
pub fn pointer_at(anchor: Option<Point>, col: i32, row: i32) -> Point {
    match anchor {
        Some(anchor) => CellSpace::drag_point(anchor, col, row),
        None => CellSpace::press_point(col, row),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::select::BoxSelector;
    use crate::ui::layout::{HEADER_ROWS, PANE_HEADER_ROWS, PANE_WIDTH};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn kind_at(context: &Context, date: NaiveDate) -> Option<CellKind> {
        let grid = context.grid();
        grid.find(date)
            .map(|(m, w, d)| context.cell_kind(&grid.months[m].weeks[w][d]))
    }

    fn context() -> Context {
        let config: Config = "year = 2024".parse().unwrap();
        let mut context = Context::new(&config).unwrap();
        context.resize(PANE_WIDTH, 40);
        context
    }

    #[test]
    fn year_navigation_stays_in_range() {
        let mut context = context();
        context.shift_year(1).unwrap();
        assert_eq!(context.year(), 2025);
        context.shift_year(-500).unwrap();
        assert_eq!(context.year(), 1901);
        context.shift_year(500).unwrap();
        assert_eq!(context.year(), 2099);
        assert!(context.set_year(2100).is_err());
        assert_eq!(context.year(), 2099);
    }

    #[test]
    fn week_start_rebuilds_grid() {
        let mut context = context();
        context.toggle_week_start().unwrap();
        assert_eq!(context.week_start(), WeekStart::Monday);
        assert_eq!(context.grid().week_start, WeekStart::Monday);
    }

    #[test]
    fn candidates_are_visible_current_month_cells() {
        let context = context();
        let candidates = context.candidates();
        assert!(!candidates.is_empty());
        assert!(candidates.iter().all(|c| c.id.year() == 2024));
        assert!(candidates.iter().any(|c| c.id == date(2024, 1, 1)));
        // December is far below the viewport.
        assert!(!candidates.iter().any(|c| c.id.month() == 12));
    }

    #[test]
    fn drag_over_first_week_selects_and_assigns() {
        let mut context = context();
        let mut selector = BoxSelector::new();

        // 2024-01-01 is a Monday, second column of a Sunday-first grid.
        let row = HEADER_ROWS + PANE_HEADER_ROWS;
        let press = pointer_at(None, 7, row);
        selector.press(press, &mut context);
        assert_eq!(context.selected, vec![date(2024, 1, 1)]);

        selector.move_to(pointer_at(Some(press), 20, row), &mut context);
        assert_eq!(
            context.selected,
            vec![date(2024, 1, 1), date(2024, 1, 2)]
        );
        assert_eq!(kind_at(&context, date(2024, 1, 2)), Some(CellKind::Selected));

        selector.release(&mut context);
        assert_eq!(context.mode, Mode::Assign);

        context.assign_selection(Some(DayType::Holiday));
        assert_eq!(context.mode, Mode::Normal);
        assert!(context.selected.is_empty());
        assert_eq!(kind_at(&context, date(2024, 1, 2)), Some(CellKind::Holiday));
    }

    #[test]
    fn cancel_clears_selection() {
        let mut context = context();
        context.selected = vec![date(2024, 1, 3)];
        context.mode = Mode::Assign;
        context.cancel_selection();
        assert!(context.selected.is_empty());
        assert_eq!(context.mode, Mode::Normal);
        assert_eq!(kind_at(&context, date(2024, 1, 3)), Some(CellKind::Work));
    }

    #[test]
    fn command_line_returns_to_pending_selection() {
        let mut context = context();
        context.mode = Mode::Command;
        context.leave_command_line();
        assert_eq!(context.mode, Mode::Normal);

        context.selected = vec![date(2024, 1, 3)];
        context.mode = Mode::Command;
        context.leave_command_line();
        assert_eq!(context.mode, Mode::Assign);
    }

    #[test]
    fn starting_a_drag_dismisses_messages() {
        let mut context = context();
        context.report_error("bad command".to_owned());
        context.status_message = Some("3 day(s) marked".to_owned());

        let mut selector = BoxSelector::new();
        selector.press(pointer_at(None, 7, HEADER_ROWS + PANE_HEADER_ROWS), &mut context);
        assert!(selector.is_active());
        assert_eq!(context.last_error_message, None);
        assert_eq!(context.status_message, None);
    }

    #[test]
    fn press_in_header_is_ignored() {
        let mut context = context();
        let mut selector = BoxSelector::new();
        selector.press(pointer_at(None, 3, 0), &mut context);
        assert!(!selector.is_active());
    }

    #[test]
    fn scrolling_moves_candidates() {
        let mut context = context();
        assert!(context.scroll_by(30));
        let candidates = context.candidates();
        assert!(!candidates.iter().any(|c| c.id == date(2024, 1, 1)));
        assert!(candidates.iter().any(|c| c.id.month() == 3));
        assert!(context.scroll_by(-100));
        assert_eq!(context.layout().scroll, 0);
    }
}

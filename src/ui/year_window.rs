use std::fmt::Write;

use unicode_width::UnicodeWidthStr;
use unsegen::base::*;
use unsegen::widget::*;

use crate::daytype::DayType;
use crate::geometry::Rect;
use crate::grid::DateInfo;

use super::layout::{CellSpace, YearLayout, CELL_WIDTH, HEADER_ROWS, PANE_WIDTH};
use super::Context;

/// Centers `s` in a field of `width` columns.
pub fn center(s: &str, width: usize) -> String {
    let used = s.width();
    if used >= width {
        return s.to_owned();
    }
    let left = (width - used) / 2;
    let right = width - used - left;
    format!("{}{}{}", " ".repeat(left), s, " ".repeat(right))
}

pub struct YearWindow<'a> {
    context: &'a Context,
    overlay: Option<Rect>,
}

impl<'a> YearWindow<'a> {
    pub fn new(context: &'a Context, overlay: Option<Rect>) -> Self {
        YearWindow { context, overlay }
    }

    fn draw_header(&self, cursor: &mut Cursor, layout: &YearLayout) {
        let theme = &self.context.theme;

        cursor.move_to(ColIndex::new(1), RowIndex::new(0));
        for ty in &[DayType::Work, DayType::Rest, DayType::Holiday] {
            cursor.set_style_modifier(theme.cell_style((*ty).into()));
            cursor.write("  ");
            cursor.set_style_modifier(StyleModifier::new());
            let _ = write!(cursor, " {}  ", ty.name());
        }

        let year = format!("< {} >", self.context.year());
        let year_x = (layout.width - year.width() as i32) / 2;
        cursor.move_to(ColIndex::new(year_x.max(0)), RowIndex::new(0));
        cursor.set_style_modifier(theme.year_header_style);
        cursor.write(&year);

        let week_start = format!("周起始日：{}", self.context.week_start().titles()[0]);
        let week_x = layout.width - week_start.width() as i32 - 1;
        cursor.move_to(ColIndex::new(week_x.max(0)), RowIndex::new(0));
        cursor.set_style_modifier(StyleModifier::new());
        cursor.write(&week_start);
    }

    fn draw_cell(&self, cursor: &mut Cursor, rect: Rect, day: &DateInfo, visible: &Rect) {
        let theme = &self.context.theme;

        let style = if day.is_cur_month {
            theme.cell_style(self.context.cell_kind(day))
        } else {
            theme.padding_style
        };
        let is_today = day.is_cur_month && day.date == self.context.today();

        let lines = [day.day().to_string(), day.label()];
        for (i, line) in lines.iter().enumerate() {
            let y = rect.y + i as i32;
            if y < visible.y || y >= visible.bottom() {
                continue;
            }
            cursor.move_to(ColIndex::new(rect.x), RowIndex::new(y));
            cursor.set_style_modifier(style);
            if is_today {
                cursor.apply_style_modifier(theme.today_style);
            }
            cursor.write(&center(line, rect.width as usize));
        }
    }

    fn draw_month(&self, cursor: &mut Cursor, layout: &YearLayout, month0: usize) {
        let theme = &self.context.theme;
        let visible = layout.viewport();
        let pane = layout.pane(month0);
        if !pane.intersects(&visible) {
            return;
        }

        if pane.y >= visible.y {
            cursor.move_to(ColIndex::new(pane.x), RowIndex::new(pane.y));
            cursor.set_style_modifier(theme.month_header_style);
            cursor.write(&center(&format!("{}月", month0 + 1), PANE_WIDTH as usize));
        }

        if pane.y + 1 >= visible.y && pane.y + 1 < visible.bottom() {
            cursor.move_to(ColIndex::new(pane.x), RowIndex::new(pane.y + 1));
            cursor.set_style_modifier(theme.weekday_header_style);
            for title in self.context.week_start().titles().iter() {
                cursor.write(&center(title, CELL_WIDTH as usize));
            }
        }

        let month = &self.context.grid().months[month0];
        for (w, week) in month.weeks.iter().enumerate() {
            for (d, day) in week.iter().enumerate() {
                let rect = layout.cell(month0, w, d);
                if rect.intersects(&visible) {
                    self.draw_cell(cursor, rect, day, &visible);
                }
            }
        }
    }

    fn draw_overlay(&self, cursor: &mut Cursor, rect: Rect) {
        let cells = CellSpace::to_cells(rect);
        let (left, top) = (cells.x - 1, cells.y - 1);
        let (right, bottom) = (cells.right(), cells.bottom());

        cursor.set_style_modifier(self.context.theme.overlay_style);
        for x in left..=right {
            let (top_char, bottom_char) = if x == left {
                ("┌", "└")
            } else if x == right {
                ("┐", "┘")
            } else {
                ("─", "─")
            };
            cursor.move_to(ColIndex::new(x), RowIndex::new(top));
            cursor.write(top_char);
            cursor.move_to(ColIndex::new(x), RowIndex::new(bottom));
            cursor.write(bottom_char);
        }
        for y in cells.y..bottom {
            cursor.move_to(ColIndex::new(left), RowIndex::new(y));
            cursor.write("│");
            cursor.move_to(ColIndex::new(right), RowIndex::new(y));
            cursor.write("│");
        }
    }
}

impl Widget for YearWindow<'_> {
    fn space_demand(&self) -> Demand2D {
        Demand2D {
            width: ColDemand::at_least(PANE_WIDTH as usize),
            height: RowDemand::at_least(HEADER_ROWS as usize + 1),
        }
    }

    fn draw(&self, mut window: Window, _hints: RenderingHints) {
        let layout = self.context.layout();
        let mut cursor = Cursor::new(&mut window);

        self.draw_header(&mut cursor, &layout);
        for month0 in 0..self.context.grid().months.len() {
            self.draw_month(&mut cursor, &layout, month0);
        }

        // Drawn last, on top of everything.
        if let Some(rect) = self.overlay {
            self.draw_overlay(&mut cursor, rect);
        }
    }
}

//! Terminal geometry of the year view.
//!
//! The window starts with a fixed header. Below it the twelve month panes are
//! arranged in up to four columns and scroll vertically.

use crate::geometry::{Point, Rect};
use crate::grid::{DAYS_PER_WEEK, WEEKS_PER_MONTH};

pub const CELL_WIDTH: i32 = 7;
pub const CELL_HEIGHT: i32 = 2;
pub const HEADER_ROWS: i32 = 2;
pub const PANE_HEADER_ROWS: i32 = 2;
pub const PANE_WIDTH: i32 = DAYS_PER_WEEK as i32 * CELL_WIDTH;
pub const PANE_HEIGHT: i32 = PANE_HEADER_ROWS + WEEKS_PER_MONTH as i32 * CELL_HEIGHT;
pub const PANE_GAP_COLS: i32 = 3;
pub const PANE_GAP_ROWS: i32 = 1;
pub const MAX_COLUMNS: i32 = 4;

const MONTHS: i32 = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearLayout {
    pub width: i32,
    pub height: i32,
    pub columns: i32,
    /// Rows scrolled out of view at the top of the pane area.
    pub scroll: i32,
}

impl YearLayout {
    pub fn new(width: i32, height: i32, scroll: i32) -> Self {
        let columns = ((width + PANE_GAP_COLS) / (PANE_WIDTH + PANE_GAP_COLS)).clamp(1, MAX_COLUMNS);
        let mut layout = YearLayout {
            width,
            height,
            columns,
            scroll: 0,
        };
        layout.scroll = scroll.clamp(0, layout.max_scroll());
        layout
    }

    pub fn pane_rows(&self) -> i32 {
        (MONTHS + self.columns - 1) / self.columns
    }

    /// Height of all panes, unscrolled.
    pub fn content_height(&self) -> i32 {
        self.pane_rows() * (PANE_HEIGHT + PANE_GAP_ROWS) - PANE_GAP_ROWS
    }

    pub fn max_scroll(&self) -> i32 {
        (self.content_height() - self.viewport().height).max(0)
    }

    /// The scrolling pane area, which is also where drags may start.
    pub fn viewport(&self) -> Rect {
        Rect::new(0, HEADER_ROWS, self.width, (self.height - HEADER_ROWS).max(0))
    }

    /// Left edge of the first pane column, centering the panes.
    pub fn left_margin(&self) -> i32 {
        let used = self.columns * PANE_WIDTH + (self.columns - 1) * PANE_GAP_COLS;
        ((self.width - used) / 2).max(0)
    }

    pub fn pane(&self, month0: usize) -> Rect {
        let month0 = month0 as i32;
        let col = month0 % self.columns;
        let row = month0 / self.columns;

        Rect::new(
            self.left_margin() + col * (PANE_WIDTH + PANE_GAP_COLS),
            HEADER_ROWS + row * (PANE_HEIGHT + PANE_GAP_ROWS) - self.scroll,
            PANE_WIDTH,
            PANE_HEIGHT,
        )
    }

    /// Box of a day cell, without the column gap on its right.
    pub fn cell(&self, month0: usize, week: usize, weekday: usize) -> Rect {
        let pane = self.pane(month0);
        Rect::new(
            pane.x + weekday as i32 * CELL_WIDTH,
            pane.y + PANE_HEADER_ROWS + week as i32 * CELL_HEIGHT,
            CELL_WIDTH - 1,
            CELL_HEIGHT,
        )
    }

    /// Scroll offset that brings `month0` into view.
    pub fn scroll_to(&self, month0: usize) -> i32 {
        let row = month0 as i32 / self.columns;
        (row * (PANE_HEIGHT + PANE_GAP_ROWS)).clamp(0, self.max_scroll())
    }
}

/// Pointer coordinates for terminal cells.
///
/// The selector works on a grid twice as fine as the terminal. A press lands in
/// the middle of its cell and a drag extends to the far edge of the hovered
/// cell, so the hovered cell is always covered and a drag within one row still
/// spans a non-empty rectangle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CellSpace;

impl CellSpace {
    const SCALE: i32 = 2;

    pub fn press_point(col: i32, row: i32) -> Point {
        Point::new(Self::SCALE * col + 1, Self::SCALE * row + 1)
    }

    pub fn drag_point(anchor: Point, col: i32, row: i32) -> Point {
        let far_edge = |pos: i32, anchor: i32| {
            if pos >= anchor.div_euclid(Self::SCALE) {
                Self::SCALE * pos + Self::SCALE
            } else {
                Self::SCALE * pos
            }
        };
        Point::new(far_edge(col, anchor.x), far_edge(row, anchor.y))
    }

    pub fn to_pointer(rect: Rect) -> Rect {
        Rect::new(
            Self::SCALE * rect.x,
            Self::SCALE * rect.y,
            Self::SCALE * rect.width,
            Self::SCALE * rect.height,
        )
    }

    /// Smallest block of terminal cells covering a pointer space rect.
    pub fn to_cells(rect: Rect) -> Rect {
        let x = rect.x.div_euclid(Self::SCALE);
        let y = rect.y.div_euclid(Self::SCALE);
        let right = (rect.right() + Self::SCALE - 1).div_euclid(Self::SCALE);
        let bottom = (rect.bottom() + Self::SCALE - 1).div_euclid(Self::SCALE);
        Rect::new(x, y, right - x, bottom - y)
    }
}

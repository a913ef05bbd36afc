use derive_more::Constructor;

/// A position in viewport coordinates. The origin is the top-left corner and
/// `y` grows downwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Constructor)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

/// Axis-aligned bounding box in viewport coordinates.
///
/// Zero-area rects are valid values, they just never intersect anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Constructor)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    /// The 1x1 box sitting at `point`.
    pub fn unit_at(point: Point) -> Self {
        Rect::new(point.x, point.y, 1, 1)
    }

    /// Spans the box between a fixed `anchor` and a moving `current` corner.
    /// Width and height are absolute differences, so they are never negative.
    pub fn from_corners(anchor: Point, current: Point) -> Self {
        Rect {
            x: anchor.x.min(current.x),
            y: anchor.y.min(current.y),
            width: (current.x - anchor.x).abs(),
            height: (current.y - anchor.y).abs(),
        }
    }

    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Strict overlap test: rects that only share an edge or a corner do not
    /// intersect, and neither does an empty rect.
    pub fn intersects(&self, other: &Rect) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }

    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x && point.x < self.right() && point.y >= self.y && point.y < self.bottom()
    }
}

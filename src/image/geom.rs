// src/image/geom.rs

//! Geometric primitives: half-open rectangles used for atlas placement and
//! inclusive area bounds used for number placement.

/// Represents a 2D rectangle with integer coordinates.
///
/// The rectangle is defined by its origin corner (`x`, `y`) and its `width` and `height`.
/// The far edges (`x_max`, `y_max`) are exclusive.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    /// Creates a new rectangle.
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Rect {
            x,
            y,
            width,
            height,
        }
    }

    /// Creates an empty rectangle.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Returns the x-coordinate of the right edge (`x + width`).
    pub fn x_max(&self) -> i32 {
        self.x.saturating_add(self.width as i32)
    }

    /// Returns the y-coordinate of the far edge (`y + height`).
    pub fn y_max(&self) -> i32 {
        self.y.saturating_add(self.height as i32)
    }

    /// Checks if the rectangle has zero width or height.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Checks if a point is contained within the rectangle's bounds.
    pub fn contains(&self, px: i32, py: i32) -> bool {
        !self.is_empty() && px >= self.x && px < self.x_max() && py >= self.y && py < self.y_max()
    }

    /// True if `other` lies entirely inside `self`.
    pub fn contains_rect(&self, other: &Rect) -> bool {
        other.x >= self.x && other.y >= self.y && other.x_max() <= self.x_max() && other.y_max() <= self.y_max()
    }

    /// True if the two rectangles share at least one cell. Touching edges do not overlap.
    pub fn overlaps(&self, other: &Rect) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }
        self.x < other.x_max() && other.x < self.x_max() && self.y < other.y_max() && other.y < self.y_max()
    }

    /// Returns a new rectangle grown by `pad` on every side.
    pub fn inflate(&self, pad: i32) -> Rect {
        if self.is_empty() {
            return Rect::empty();
        }
        let new_width = self.width as i32 + 2 * pad;
        let new_height = self.height as i32 + 2 * pad;

        if new_width <= 0 || new_height <= 0 {
            Rect::empty()
        } else {
            Rect::new(
                self.x.saturating_sub(pad),
                self.y.saturating_sub(pad),
                new_width as u32,
                new_height as u32,
            )
        }
    }
}

/// Inclusive bounds `[x0, y0, x1, y1]` in region-local coordinates.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct AreaBounds {
    pub x0: i32,
    pub y0: i32,
    pub x1: i32,
    pub y1: i32,
}

impl AreaBounds {
    pub fn new(x0: i32, y0: i32, x1: i32, y1: i32) -> Self {
        AreaBounds { x0, y0, x1, y1 }
    }

    pub fn as_array(&self) -> [i32; 4] {
        [self.x0, self.y0, self.x1, self.y1]
    }

    /// The shorter side measured as a coordinate span (`x1 - x0` / `y1 - y0`).
    ///
    /// This is the value compared when choosing number areas and stored as the
    /// level file's `numberSize`.
    pub fn size(&self) -> i32 {
        (self.x1 - self.x0).min(self.y1 - self.y0)
    }

    /// Center cell in global coordinates, given the owning region's origin.
    pub fn center(&self, min_x: i32, min_y: i32) -> (i32, i32) {
        let span_x = self.x1 - self.x0;
        let span_y = self.y1 - self.y0;
        (
            min_x + self.x0 + span_x.div_euclid(2),
            min_y + self.y0 + span_y.div_euclid(2),
        )
    }
}

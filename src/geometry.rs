#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned box in surface pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PixelRect {
    pub x0: f64,
    pub y0: f64,
    pub width: f64,
    pub height: f64,
    pub center: Point,
}

impl PixelRect {
    pub fn new(x0: f64, y0: f64, width: f64, height: f64) -> Self {
        Self {
            x0,
            y0,
            width,
            height,
            center: Point {
                x: x0 + width / 2.0,
                y: y0 + height / 2.0,
            },
        }
    }

    /// Same box moved by `(dx, dy)`.
    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self::new(self.x0 + dx, self.y0 + dy, self.width, self.height)
    }

    /// Vertical midpoint of the right edge.
    pub fn right_mid(&self) -> Point {
        Point::new(self.x0 + self.width, self.y0 + self.height / 2.0)
    }

    /// Vertical midpoint of the left edge.
    pub fn left_mid(&self) -> Point {
        Point::new(self.x0, self.y0 + self.height / 2.0)
    }
}

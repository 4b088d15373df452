use crate::units::*;

/// An axis-aligned rectangle, specified by its top-left corner and its size.
/// The y-axis points down, as it does on the raster surface.
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct Rect {
    /// The x-coordinate of the left edge.
    pub x: Px,
    /// The y-coordinate of the top edge.
    pub y: Px,
    /// The width of the rectangle.
    pub w: Px,
    /// The height of the rectangle.
    pub h: Px,
}

impl Rect {
    pub fn new(x: Px, y: Px, w: Px, h: Px) -> Rect {
        Rect { x, y, w, h }
    }

    /// The x-coordinate of the right edge
    pub fn right(&self) -> Px {
        self.x + self.w
    }

    /// The y-coordinate of the bottom edge
    pub fn bottom(&self) -> Px {
        self.y + self.h
    }
}

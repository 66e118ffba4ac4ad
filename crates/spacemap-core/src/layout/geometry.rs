/// Plain rectangle geometry for treemap layout. No pixels, no fonts.
use serde::Serialize;

/// An axis-aligned rectangle given by its top-left corner and extents.
///
/// Extents may be zero or negative after spacing is subtracted from a very
/// thin slice; such rectangles are still reported so callers can decide to
/// clip or ignore them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rectangle anchored at the origin.
    pub const fn from_size(width: f32, height: f32) -> Self {
        Self::new(0.0, 0.0, width, height)
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// `true` if both extents are strictly positive.
    #[inline]
    pub fn is_positive(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }

    /// Area, or 0 for degenerate rectangles.
    pub fn area(&self) -> f32 {
        if self.is_positive() {
            self.width * self.height
        } else {
            0.0
        }
    }

    /// Half-open containment: left/top edges inside, right/bottom outside.
    pub fn contains(&self, x: f32, y: f32) -> bool {
        self.is_positive() && x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// `true` if the two rectangles share a region of positive area.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.is_positive()
            && other.is_positive()
            && self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }
}

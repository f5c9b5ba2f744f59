//! Axis-aligned rectangles and collision tests.
//!
//! Every entity in the game is a box anchored at its top-left corner with
//! screen-style coordinates (y grows downward). The padded intersection test
//! is shared by melee reach, projectile hits and pickup collection.

use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle anchored at its top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge
    pub x: f32,
    /// Top edge
    pub y: f32,
    /// Width in pixels
    pub width: f32,
    /// Height in pixels
    pub height: f32,
}

impl Rect {
    /// Creates a new rectangle.
    #[must_use]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge.
    #[must_use]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Bottom edge.
    #[must_use]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Horizontal midpoint.
    #[must_use]
    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }

    /// Vertical midpoint.
    #[must_use]
    pub fn center_y(&self) -> f32 {
        self.y + self.height / 2.0
    }

    /// Returns the rectangle widened by `amount` on one side.
    ///
    /// A positive `direction` grows the right edge, a negative one moves the
    /// left edge outward.
    #[must_use]
    pub fn extended(&self, direction: f32, amount: f32) -> Self {
        if direction < 0.0 {
            Self::new(self.x - amount, self.y, self.width + amount, self.height)
        } else {
            Self::new(self.x, self.y, self.width + amount, self.height)
        }
    }

    /// Returns the rectangle translated by an offset.
    #[must_use]
    pub fn translated(&self, dx: f32, dy: f32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.width, self.height)
    }

    /// Padded overlap test, see [`intersects`].
    #[must_use]
    pub fn intersects(&self, other: &Rect, padding: f32) -> bool {
        intersects(self, other, padding)
    }

    /// Checks whether the vertical spans of two rectangles overlap.
    #[must_use]
    pub fn overlaps_vertically(&self, other: &Rect) -> bool {
        self.y < other.bottom() && self.bottom() > other.y
    }
}

/// Anything that occupies a box in the world.
pub trait Bounded {
    /// Current bounding box.
    fn bounds(&self) -> Rect;
}

impl Bounded for Rect {
    fn bounds(&self) -> Rect {
        *self
    }
}

/// Padded AABB intersection.
///
/// `padding` is subtracted from the far edge of each box, so a positive value
/// demands a deeper overlap before two boxes count as touching. Non-finite
/// coordinates never intersect anything.
#[must_use]
pub fn intersects(a: &Rect, b: &Rect, padding: f32) -> bool {
    a.x < b.x + b.width - padding
        && a.x + a.width - padding > b.x
        && a.y < b.y + b.height - padding
        && a.y + a.height - padding > b.y
}

/// Padded intersection between two optional boxes. Missing boxes never collide.
#[must_use]
pub fn intersects_opt(a: Option<&Rect>, b: Option<&Rect>, padding: f32) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => intersects(a, b, padding),
        _ => false,
    }
}

//! Collision primitives
//!
//! Pipes collide with the bird as axis-aligned boxes. Bosses and projectiles
//! are emoji glyphs and collide as circles around their centers.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box in screen coordinates (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

impl Aabb {
    pub fn new(left: f32, right: f32, top: f32, bottom: f32) -> Self {
        Self {
            left,
            right,
            top,
            bottom,
        }
    }

    /// Box from a top-left corner and size
    pub fn from_rect(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self::new(x, x + width, y, y + height)
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    /// Shrink horizontally by `dx` and vertically by `dy` on every side
    pub fn inset(&self, dx: f32, dy: f32) -> Self {
        Self::new(self.left + dx, self.right - dx, self.top + dy, self.bottom - dy)
    }
}

/// Strict overlap test: boxes that only share an edge do not collide
#[inline]
pub fn boxes_overlap(a: &Aabb, b: &Aabb) -> bool {
    a.left < b.right && a.right > b.left && a.top < b.bottom && a.bottom > b.top
}

/// Circle overlap between two centers given their diameters
#[inline]
pub fn circles_overlap(a_center: Vec2, a_size: f32, b_center: Vec2, b_size: f32) -> bool {
    a_center.distance(b_center) < a_size / 2.0 + b_size / 2.0
}

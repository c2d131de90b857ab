//! Axis-aligned bounding boxes for selections.

use glam::{DMat4, DVec3};
use serde::{Deserialize, Serialize};

/// Axis-Aligned Bounding Box
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min: DVec3,
    pub max: DVec3,
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl BoundingBox {
    /// An empty (inverted) box; merging anything into it yields that thing.
    pub const EMPTY: Self = Self {
        min: DVec3::new(f64::MAX, f64::MAX, f64::MAX),
        max: DVec3::new(f64::MIN, f64::MIN, f64::MIN),
    };

    /// Create from min and max points
    #[inline]
    pub const fn new(min: DVec3, max: DVec3) -> Self {
        Self { min, max }
    }

    /// Create from center and half-extents
    #[inline]
    pub fn from_center_half_extents(center: DVec3, half_extents: DVec3) -> Self {
        Self::new(center - half_extents, center + half_extents)
    }

    /// Create the tightest box around a set of points
    pub fn from_points(points: impl IntoIterator<Item = DVec3>) -> Self {
        points
            .into_iter()
            .fold(Self::EMPTY, |bb, p| bb.expand_to_include(p))
    }

    /// Check if the box contains no points (min > max on some axis)
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    #[inline]
    pub fn center(&self) -> DVec3 {
        (self.min + self.max) * 0.5
    }

    /// Full extents; zero for an empty box
    #[inline]
    pub fn size(&self) -> DVec3 {
        if self.is_empty() {
            DVec3::ZERO
        } else {
            self.max - self.min
        }
    }

    #[must_use]
    pub fn expand_to_include(self, point: DVec3) -> Self {
        Self::new(self.min.min(point), self.max.max(point))
    }

    #[must_use]
    pub fn merge(self, other: Self) -> Self {
        if other.is_empty() {
            return self;
        }
        Self::new(self.min.min(other.min), self.max.max(other.max))
    }

    /// Eight corner points
    pub fn corners(&self) -> [DVec3; 8] {
        let (a, b) = (self.min, self.max);
        [
            DVec3::new(a.x, a.y, a.z),
            DVec3::new(b.x, a.y, a.z),
            DVec3::new(a.x, b.y, a.z),
            DVec3::new(b.x, b.y, a.z),
            DVec3::new(a.x, a.y, b.z),
            DVec3::new(b.x, a.y, b.z),
            DVec3::new(a.x, b.y, b.z),
            DVec3::new(b.x, b.y, b.z),
        ]
    }

    /// Axis-aligned box enclosing this box after transformation.
    #[must_use]
    pub fn transformed(&self, matrix: &DMat4) -> Self {
        if self.is_empty() {
            return *self;
        }
        Self::from_points(self.corners().into_iter().map(|c| matrix.transform_point3(c)))
    }
}

//! Mouse ray supplied by the viewport for each input sample.

use glam::DVec3;
use serde::{Deserialize, Serialize};

/// A ray cast from the camera through the mouse cursor.
///
/// Unlike a general-purpose ray the direction is kept as given: it is not
/// normalized and may be any non-zero length.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MouseRay {
    /// Ray origin point
    pub origin: DVec3,
    /// Ray direction (not necessarily unit length)
    pub direction: DVec3,
}

impl MouseRay {
    #[inline]
    pub const fn new(origin: DVec3, direction: DVec3) -> Self {
        Self { origin, direction }
    }

    /// Create a ray from two points, pointing from `start` towards `end`.
    #[inline]
    pub fn from_points(start: DVec3, end: DVec3) -> Self {
        Self::new(start, end - start)
    }

    /// Get the point at parameter `t` along the ray.
    #[inline]
    pub fn at(&self, t: f64) -> DVec3 {
        self.origin + self.direction * t
    }

    /// Unit direction, or `None` when the direction is degenerate.
    pub fn unit_direction(&self) -> Option<DVec3> {
        self.direction.try_normalize()
    }

    /// Intersect with a plane through `point` with the given `normal`.
    ///
    /// Returns the ray parameter, or `None` when the ray is parallel to the plane.
    /// Hits behind the origin are returned as negative parameters.
    pub fn plane_intersection(&self, point: DVec3, normal: DVec3) -> Option<f64> {
        let denom = normal.dot(self.direction);
        if denom.abs() < 1e-12 {
            return None;
        }
        Some((point - self.origin).dot(normal) / denom)
    }
}

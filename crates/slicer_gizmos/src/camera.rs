//! Viewport camera: view/projection matrices and mouse-ray unprojection.

use glam::{DMat4, DVec2, DVec3, DVec4};
use serde::{Deserialize, Serialize};

use crate::geometry::MouseRay;

/// Camera projection model.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Projection {
    /// Parallel projection; `zoom` is screen pixels per world unit
    Orthographic { zoom: f64 },
    /// Perspective projection with vertical field of view in radians
    Perspective { fov_y: f64 },
}

/// Viewport camera.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub eye: DVec3,
    pub target: DVec3,
    pub up: DVec3,
    /// Viewport rectangle in pixels: x, y, width, height
    pub viewport: [f64; 4],
    pub projection: Projection,
    pub near: f64,
    pub far: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            eye: DVec3::new(0.0, 0.0, 100.0),
            target: DVec3::ZERO,
            up: DVec3::Y,
            viewport: [0.0, 0.0, 1280.0, 720.0],
            projection: Projection::Orthographic { zoom: 1.0 },
            near: 0.1,
            far: 1000.0,
        }
    }
}

impl Camera {
    pub fn is_orthographic(&self) -> bool {
        matches!(self.projection, Projection::Orthographic { .. })
    }

    pub fn viewport_size(&self) -> DVec2 {
        DVec2::new(self.viewport[2], self.viewport[3])
    }

    pub fn view_matrix(&self) -> DMat4 {
        DMat4::look_at_rh(self.eye, self.target, self.up)
    }

    pub fn projection_matrix(&self) -> DMat4 {
        let size = self.viewport_size();
        match self.projection {
            Projection::Orthographic { zoom } => {
                let half = size * (0.5 / zoom.max(f64::EPSILON));
                DMat4::orthographic_rh_gl(-half.x, half.x, -half.y, half.y, self.near, self.far)
            }
            Projection::Perspective { fov_y } => {
                let aspect = if size.y > 0.0 { size.x / size.y } else { 1.0 };
                DMat4::perspective_rh_gl(fov_y, aspect, self.near, self.far)
            }
        }
    }

    pub fn view_projection_matrix(&self) -> DMat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Ray through a screen pixel (origin top-left, y down).
    ///
    /// The ray starts on the near plane and ends on the far plane, so its
    /// direction is not normalized.
    pub fn mouse_ray(&self, screen: DVec2) -> MouseRay {
        let size = self.viewport_size();
        let ndc_x = ((screen.x - self.viewport[0]) / size.x) * 2.0 - 1.0;
        let ndc_y = 1.0 - ((screen.y - self.viewport[1]) / size.y) * 2.0;

        let inv = self.view_projection_matrix().inverse();
        let near = inv.project_point3(DVec3::new(ndc_x, ndc_y, -1.0));
        let far = inv.project_point3(DVec3::new(ndc_x, ndc_y, 1.0));
        MouseRay::from_points(near, far)
    }

    /// Project a world point to screen pixels; `None` if behind the camera.
    pub fn project(&self, point: DVec3) -> Option<DVec2> {
        let clip: DVec4 = self.view_projection_matrix() * point.extend(1.0);
        if clip.w <= 1e-9 {
            return None;
        }
        let ndc = clip.truncate() / clip.w;
        let size = self.viewport_size();
        Some(DVec2::new(
            self.viewport[0] + (ndc.x + 1.0) * 0.5 * size.x,
            self.viewport[1] + (1.0 - ndc.y) * 0.5 * size.y,
        ))
    }
}

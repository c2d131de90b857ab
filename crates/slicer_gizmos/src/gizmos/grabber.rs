//! Draggable handles shared by gizmos.

use glam::{DMat4, DQuat, DVec3, EulerRot};

use super::colors;
use super::render::{DrawCommand, ShaderKind};
use crate::config::ColorRgba;
use crate::geometry::MouseRay;

/// Extra geometry drawn (and picked) on a grabber.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GrabberExtension {
    #[default]
    None,
    /// Arrow cone along the grabber's local +Z
    PosZ,
}

/// A single draggable handle representing one constrained axis of motion.
#[derive(Clone, Debug, PartialEq)]
pub struct Grabber {
    /// Center in gizmo-local coordinates
    pub center: DVec3,
    /// Orientation as Euler angles (applied X, then Y, then Z)
    pub angles: DVec3,
    pub color: ColorRgba,
    pub hover_color: ColorRgba,
    pub enabled: bool,
    pub dragging: bool,
    pub extension: GrabberExtension,
    /// Gizmo-local to world
    pub matrix: DMat4,
}

impl Default for Grabber {
    fn default() -> Self {
        Self {
            center: DVec3::ZERO,
            angles: DVec3::ZERO,
            color: colors::GRABBER,
            hover_color: colors::HIGHLIGHT,
            enabled: true,
            dragging: false,
            extension: GrabberExtension::None,
            matrix: DMat4::IDENTITY,
        }
    }
}

impl Grabber {
    pub const SIZE_FACTOR: f64 = 0.05;
    pub const MIN_HALF_SIZE: f64 = 1.5;
    pub const DRAGGING_SCALE_FACTOR: f64 = 1.25;

    /// Half edge length of the grabber cube for an object of mean `size`.
    pub fn half_size(&self, size: f64) -> f64 {
        let half = (size * Self::SIZE_FACTOR).max(Self::MIN_HALF_SIZE);
        if self.dragging {
            half * Self::DRAGGING_SCALE_FACTOR
        } else {
            half
        }
    }

    pub fn world_center(&self) -> DVec3 {
        self.matrix.transform_point3(self.center)
    }

    pub fn rotation(&self) -> DQuat {
        DQuat::from_euler(EulerRot::ZYX, self.angles.z, self.angles.y, self.angles.x)
    }

    /// Grabber-local to world
    fn grabber_matrix(&self) -> DMat4 {
        self.matrix * DMat4::from_rotation_translation(self.rotation(), self.center)
    }

    /// Pick test against the grabber cube (and its extension).
    ///
    /// Returns the ray parameter of the nearest hit in front of the ray origin.
    pub fn hit(&self, ray: &MouseRay, size: f64) -> Option<f64> {
        if !self.enabled {
            return None;
        }
        let half = self.half_size(size);
        let min = DVec3::splat(-half);
        let mut max = DVec3::splat(half);
        if self.extension == GrabberExtension::PosZ {
            max.z = 3.0 * half;
        }

        let to_local = self.grabber_matrix().inverse();
        let origin = to_local.transform_point3(ray.origin);
        let dir = to_local.transform_vector3(ray.direction);
        slab_intersection(origin, dir, min, max)
    }

    /// Draw command for this grabber with the given lighting.
    pub fn draw_command(&self, size: f64, hover: bool, emission_factor: f32) -> DrawCommand {
        DrawCommand::Grabber {
            center: self.center,
            half_size: self.half_size(size),
            rotation: self.rotation(),
            extension: self.extension,
            color: if hover || self.dragging { self.hover_color } else { self.color },
            shader: ShaderKind::GouraudLight,
            emission_factor,
        }
    }
}

/// Ray vs. axis-aligned box; returns the entry parameter (or exit when inside).
fn slab_intersection(origin: DVec3, dir: DVec3, min: DVec3, max: DVec3) -> Option<f64> {
    let mut t_near = f64::NEG_INFINITY;
    let mut t_far = f64::INFINITY;

    for i in 0..3 {
        if dir[i].abs() < 1e-12 {
            if origin[i] < min[i] || origin[i] > max[i] {
                return None;
            }
            continue;
        }
        let inv = 1.0 / dir[i];
        let mut t0 = (min[i] - origin[i]) * inv;
        let mut t1 = (max[i] - origin[i]) * inv;
        if t0 > t1 {
            std::mem::swap(&mut t0, &mut t1);
        }
        t_near = t_near.max(t0);
        t_far = t_far.min(t1);
        if t_near > t_far {
            return None;
        }
    }

    if t_far < 0.0 {
        None
    } else if t_near >= 0.0 {
        Some(t_near)
    } else {
        Some(t_far)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_half_size() {
        let mut g = Grabber::default();
        assert_relative_eq!(g.half_size(10.0), Grabber::MIN_HALF_SIZE);
        assert_relative_eq!(g.half_size(100.0), 5.0);
        g.dragging = true;
        assert_relative_eq!(g.half_size(100.0), 6.25);
    }

    #[test]
    fn test_hit_cube() {
        let g = Grabber {
            center: DVec3::new(20.0, 0.0, 0.0),
            ..Default::default()
        };
        let ray = MouseRay::new(DVec3::new(20.0, 0.0, 50.0), DVec3::new(0.0, 0.0, -2.0));
        let t = g.hit(&ray, 10.0).unwrap();
        // Top face at z = 1.5
        assert_relative_eq!(ray.at(t).z, 1.5, epsilon = 1e-9);

        let miss = MouseRay::new(DVec3::new(25.0, 0.0, 50.0), DVec3::new(0.0, 0.0, -1.0));
        assert!(g.hit(&miss, 10.0).is_none());
    }

    #[test]
    fn test_disabled_grabber_is_not_hit() {
        let g = Grabber {
            enabled: false,
            ..Default::default()
        };
        let ray = MouseRay::new(DVec3::new(0.0, 0.0, 10.0), -DVec3::Z);
        assert!(g.hit(&ray, 10.0).is_none());
    }

    #[test]
    fn test_extension_follows_rotation() {
        // X grabber: local +Z turned onto world +X
        let g = Grabber {
            angles: DVec3::new(0.0, FRAC_PI_2, 0.0),
            extension: GrabberExtension::PosZ,
            ..Default::default()
        };
        let ray = MouseRay::new(DVec3::new(4.0, 0.0, 10.0), -DVec3::Z);
        assert!(g.hit(&ray, 10.0).is_some());
        let ray = MouseRay::new(DVec3::new(-4.0, 0.0, 10.0), -DVec3::Z);
        assert!(g.hit(&ray, 10.0).is_none());
    }

    #[test]
    fn test_hit_behind_origin_is_ignored() {
        let g = Grabber::default();
        let ray = MouseRay::new(DVec3::new(0.0, 0.0, 10.0), DVec3::Z);
        assert!(g.hit(&ray, 10.0).is_none());
    }

    #[test]
    fn test_draw_command_uses_hover_color() {
        let g = Grabber {
            color: [1.0, 0.0, 0.0, 1.0],
            ..Default::default()
        };
        match g.draw_command(10.0, true, 0.1) {
            DrawCommand::Grabber { color, shader, .. } => {
                assert_eq!(color, colors::HIGHLIGHT);
                assert_eq!(shader, ShaderKind::GouraudLight);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }
}

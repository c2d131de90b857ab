//! Decomposed affine transformation used for instances and volumes.

use glam::{DMat4, DQuat, DVec3, EulerRot};
use serde::{Deserialize, Serialize};

/// Offset, rotation and scale of an object instance or a volume within it.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Transformation {
    pub offset: DVec3,
    pub rotation: DQuat,
    pub scale: DVec3,
}

impl Default for Transformation {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transformation {
    pub const IDENTITY: Self = Self {
        offset: DVec3::ZERO,
        rotation: DQuat::IDENTITY,
        scale: DVec3::ONE,
    };

    pub fn from_offset(offset: DVec3) -> Self {
        Self { offset, ..Self::IDENTITY }
    }

    #[must_use]
    pub fn with_rotation(mut self, rotation: DQuat) -> Self {
        self.rotation = rotation;
        self
    }

    /// Set rotation from XYZ Euler angles in radians.
    #[must_use]
    pub fn with_euler(self, angles: DVec3) -> Self {
        self.with_rotation(DQuat::from_euler(EulerRot::XYZ, angles.x, angles.y, angles.z))
    }

    #[must_use]
    pub fn with_scale(mut self, scale: DVec3) -> Self {
        self.scale = scale;
        self
    }

    /// Full matrix: translate * rotate * scale.
    pub fn matrix(&self) -> DMat4 {
        DMat4::from_scale_rotation_translation(self.scale, self.rotation, self.offset)
    }

    /// Rotation part only, as a 4x4 matrix without translation.
    pub fn rotation_matrix(&self) -> DMat4 {
        DMat4::from_quat(self.rotation)
    }
}

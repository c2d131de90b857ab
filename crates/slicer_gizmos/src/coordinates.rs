//! Reference frame the gizmo axes are aligned to.

use serde::{Deserialize, Serialize};

/// Coordinate system used when manipulating the selection.
///
/// Frames nest: a volume's local frame sits inside its instance frame,
/// which sits inside the world frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoordinatesType {
    /// Axes aligned with the bed
    #[default]
    World,
    /// Axes follow the object instance rotation
    Instance,
    /// Axes follow the instance rotation and, for a single volume, its own rotation
    Local,
}

impl CoordinatesType {
    pub fn is_world(&self) -> bool {
        *self == CoordinatesType::World
    }

    pub fn is_local(&self) -> bool {
        *self == CoordinatesType::Local
    }

    pub fn name(&self) -> &'static str {
        match self {
            CoordinatesType::World => "World coordinates",
            CoordinatesType::Instance => "Object coordinates",
            CoordinatesType::Local => "Part coordinates",
        }
    }
}

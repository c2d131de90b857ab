//! Minimal scene model the gizmos operate on.
//!
//! Only the selection queries and mutations the move gizmo needs are
//! modelled: bounding boxes, instance and volume transforms, and a
//! relative translate against a drag-start snapshot.

mod selection;

pub use selection::{
    SelectedVolume, Selection, SelectionMode, TransformationType, VolumeKind, VolumeOffsets,
};

use serde::{Deserialize, Serialize};

/// Identifier of a volume in the scene.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VolumeId(pub u32);

impl std::fmt::Display for VolumeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Volume({})", self.0)
    }
}

//! Selection of volumes with the transform queries used by gizmos.

use glam::{DMat4, DVec3};
use serde::{Deserialize, Serialize};

use super::VolumeId;
use crate::coordinates::CoordinatesType;
use crate::error::{GizmoError, Result};
use crate::geometry::{BoundingBox, Transformation};

/// What a selected volume represents in the scene.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VolumeKind {
    #[default]
    ModelPart,
    Modifier,
    WipeTower,
    CutConnector,
    CutPart,
}

/// Whether whole instances or individual volumes are selected.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionMode {
    #[default]
    Instance,
    Volume,
}

/// Frame in which a relative translation is expressed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TransformationType {
    #[default]
    World,
    Instance,
    Local,
}

impl From<CoordinatesType> for TransformationType {
    fn from(coords: CoordinatesType) -> Self {
        match coords {
            CoordinatesType::World => TransformationType::World,
            CoordinatesType::Instance => TransformationType::Instance,
            CoordinatesType::Local => TransformationType::Local,
        }
    }
}

/// A selected volume together with the instance it belongs to.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SelectedVolume {
    pub id: VolumeId,
    pub object_idx: usize,
    pub instance_idx: usize,
    #[serde(default)]
    pub kind: VolumeKind,
    #[serde(default)]
    pub instance: Transformation,
    #[serde(default)]
    pub volume: Transformation,
    /// Mesh bounds in the volume's own coordinates
    pub mesh_box: BoundingBox,
}

impl SelectedVolume {
    pub fn new(id: VolumeId, mesh_box: BoundingBox) -> Self {
        Self {
            id,
            object_idx: 0,
            instance_idx: 0,
            kind: VolumeKind::ModelPart,
            instance: Transformation::IDENTITY,
            volume: Transformation::IDENTITY,
            mesh_box,
        }
    }

    pub fn world_matrix(&self) -> DMat4 {
        self.instance.matrix() * self.volume.matrix()
    }

    pub fn world_box(&self) -> BoundingBox {
        self.mesh_box.transformed(&self.world_matrix())
    }

    fn same_instance(&self, other: &SelectedVolume) -> bool {
        self.object_idx == other.object_idx && self.instance_idx == other.instance_idx
    }
}

/// Instance and volume offsets of one volume, used for undo/redo.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VolumeOffsets {
    pub id: VolumeId,
    pub instance: DVec3,
    pub volume: DVec3,
}

/// The set of volumes currently selected in the viewport.
#[derive(Clone, Debug, Default)]
pub struct Selection {
    mode: SelectionMode,
    volumes: Vec<SelectedVolume>,
    /// Transforms captured at drag start; translations are relative to these
    drag_cache: Option<Vec<(Transformation, Transformation)>>,
}

impl Selection {
    pub fn new(mode: SelectionMode) -> Self {
        Self {
            mode,
            volumes: Vec::new(),
            drag_cache: None,
        }
    }

    pub fn with_volumes(mode: SelectionMode, volumes: impl IntoIterator<Item = SelectedVolume>) -> Self {
        let mut selection = Self::new(mode);
        selection.volumes.extend(volumes);
        selection
    }

    pub fn mode(&self) -> SelectionMode {
        self.mode
    }

    /// Add a volume unless already selected. During a drag the newcomer
    /// joins the snapshot at its current transforms.
    pub fn add(&mut self, volume: SelectedVolume) {
        if self.volumes.iter().any(|v| v.id == volume.id) {
            return;
        }
        if let Some(cache) = &mut self.drag_cache {
            cache.push((volume.instance, volume.volume));
        }
        self.volumes.push(volume);
    }

    pub fn clear(&mut self) {
        self.volumes.clear();
        self.drag_cache = None;
    }

    pub fn volumes(&self) -> &[SelectedVolume] {
        &self.volumes
    }

    pub fn volume(&self, id: VolumeId) -> Option<&SelectedVolume> {
        self.volumes.iter().find(|v| v.id == id)
    }

    pub fn first_volume(&self) -> Option<&SelectedVolume> {
        self.volumes.first()
    }

    pub fn is_empty(&self) -> bool {
        self.volumes.is_empty()
    }

    pub fn is_wipe_tower(&self) -> bool {
        !self.is_empty() && self.volumes.iter().all(|v| v.kind == VolumeKind::WipeTower)
    }

    pub fn is_any_cut_volume(&self) -> bool {
        self.volumes.iter().any(|v| v.kind == VolumeKind::CutPart)
    }

    pub fn is_any_connector(&self) -> bool {
        self.volumes.iter().any(|v| v.kind == VolumeKind::CutConnector)
    }

    /// All volumes of exactly one instance, selected as a whole.
    pub fn is_single_full_instance(&self) -> bool {
        match self.volumes.first() {
            Some(first) => {
                self.mode == SelectionMode::Instance
                    && !self.is_wipe_tower()
                    && self.volumes.iter().all(|v| v.same_instance(first))
            }
            None => false,
        }
    }

    /// Exactly one model part or modifier, selected on its own.
    pub fn is_single_volume_or_modifier(&self) -> bool {
        self.mode == SelectionMode::Volume
            && self.volumes.len() == 1
            && matches!(self.volumes[0].kind, VolumeKind::ModelPart | VolumeKind::Modifier)
    }

    /// World-space bounding box of the whole selection.
    pub fn bounding_box(&self) -> BoundingBox {
        self.volumes
            .iter()
            .fold(BoundingBox::EMPTY, |bb, v| bb.merge(v.world_box()))
    }

    /// Rotation of the frame the given coordinate type aligns to.
    pub fn reference_rotation(&self, coordinates: CoordinatesType) -> DMat4 {
        let Some(first) = self.first_volume() else {
            return DMat4::IDENTITY;
        };
        match coordinates {
            CoordinatesType::World => DMat4::IDENTITY,
            CoordinatesType::Local if self.is_single_volume_or_modifier() => {
                first.instance.rotation_matrix() * first.volume.rotation_matrix()
            }
            _ => first.instance.rotation_matrix(),
        }
    }

    /// Bounding box expressed in the current reference frame.
    ///
    /// Returns the box in frame coordinates and the matrix placing that
    /// frame in the world, whose translation is the box center.
    pub fn bounding_box_in_current_reference_system(
        &self,
        coordinates: CoordinatesType,
    ) -> (BoundingBox, DMat4) {
        let rotation = self.reference_rotation(coordinates);
        let to_frame = rotation.inverse();
        let bb = self.volumes.iter().fold(BoundingBox::EMPTY, |bb, v| {
            bb.merge(v.mesh_box.transformed(&(to_frame * v.world_matrix())))
        });
        if bb.is_empty() {
            return (bb, DMat4::IDENTITY);
        }
        let center = rotation.transform_point3(bb.center());
        (bb, DMat4::from_translation(center) * rotation)
    }

    /// Snapshot current transforms; subsequent translations are relative to it.
    pub fn start_dragging(&mut self) {
        self.drag_cache = Some(
            self.volumes
                .iter()
                .map(|v| (v.instance, v.volume))
                .collect(),
        );
    }

    pub fn stop_dragging(&mut self) {
        self.drag_cache = None;
    }

    pub fn is_dragging(&self) -> bool {
        self.drag_cache.is_some()
    }

    /// Translate the selection by `displacement` expressed in the frame
    /// named by `transformation_type`.
    ///
    /// While dragging, the displacement is measured from the drag-start
    /// snapshot, so repeated calls replace rather than accumulate.
    pub fn translate(&mut self, displacement: DVec3, transformation_type: TransformationType) {
        let mode = self.mode;
        let single_volume = self.is_single_volume_or_modifier();

        for (idx, v) in self.volumes.iter_mut().enumerate() {
            let (start_instance, start_volume) = self
                .drag_cache
                .as_ref()
                .and_then(|cache| cache.get(idx).copied())
                .unwrap_or((v.instance, v.volume));

            let world_delta = match transformation_type {
                TransformationType::World => displacement,
                TransformationType::Instance => start_instance.rotation * displacement,
                TransformationType::Local if single_volume => {
                    start_instance.rotation * (start_volume.rotation * displacement)
                }
                TransformationType::Local => start_instance.rotation * displacement,
            };

            match mode {
                SelectionMode::Instance => {
                    v.instance.offset = start_instance.offset + world_delta;
                }
                SelectionMode::Volume => {
                    let to_instance = start_instance.matrix().inverse();
                    v.volume.offset = start_volume.offset + to_instance.transform_vector3(world_delta);
                }
            }
        }
    }

    /// Current offsets of every selected volume.
    pub fn offsets(&self) -> Vec<VolumeOffsets> {
        self.volumes
            .iter()
            .map(|v| VolumeOffsets {
                id: v.id,
                instance: v.instance.offset,
                volume: v.volume.offset,
            })
            .collect()
    }

    /// Restore previously captured offsets.
    pub fn set_offsets(&mut self, offsets: &[VolumeOffsets]) -> Result<()> {
        for entry in offsets {
            let v = self
                .volumes
                .iter_mut()
                .find(|v| v.id == entry.id)
                .ok_or(GizmoError::VolumeNotFound(entry.id))?;
            v.instance.offset = entry.instance;
            v.volume.offset = entry.volume;
        }
        Ok(())
    }
}

//! # slicer_gizmos - Viewport Manipulation Gizmos
//!
//! Interactive 3D move gizmo for a slicer's viewport. Three axis grabbers
//! sit around the selection; dragging one translates the selection along
//! that axis in world, instance or local coordinates, with optional snapping.
//!
//! The crate is renderer-agnostic: gizmos emit a [`DrawList`](gizmos::DrawList)
//! which the host draws itself or hands to the egui based
//! [`OverlayPainter`](gizmos::OverlayPainter).
//!
//! ## Example
//!
//! ```rust,ignore
//! use slicer_gizmos::prelude::*;
//!
//! let mut manager = GizmoManager::new();
//! manager.open(GizmoKind::Move, &selection)?;
//! let ctx = GizmoContext::new(&camera, &preferences);
//! manager.on_mouse(MouseEvent::Press { ray }, &mut selection, &ctx);
//! ```

pub mod camera;
pub mod commands;
pub mod config;
pub mod coordinates;
pub mod error;
pub mod geometry;
pub mod gizmos;
pub mod history;
pub mod manager;
pub mod scenario;
pub mod scene;

pub use error::{GizmoError, Result};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude for common imports
pub mod prelude {
    pub use crate::camera::{Camera, Projection};
    pub use crate::commands::{Command, TranslateCommand};
    pub use crate::config::GizmoPreferences;
    pub use crate::coordinates::CoordinatesType;
    pub use crate::error::{GizmoError, Result};
    pub use crate::geometry::{BoundingBox, MouseRay, Transformation};
    pub use crate::gizmos::{
        compute_projection, resolve_local_frame, DragAxis, DragAxisState, DrawList, Gizmo, GizmoContext,
        GizmoKind, MoveGizmo, OverlayPainter,
    };
    pub use crate::history::UndoHistory;
    pub use crate::manager::{GizmoManager, MouseEvent, WidgetState};
    pub use crate::scenario::{Replay, Scenario, ScenarioEvent};
    pub use crate::scene::{SelectedVolume, Selection, SelectionMode, VolumeId, VolumeKind};
}

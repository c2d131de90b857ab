//! Gizmos for visual manipulation of the selection.
//!
//! Each gizmo implements the [`Gizmo`] capability trait and is selected by
//! a [`GizmoKind`] tag held by the [`GizmoManager`](crate::manager::GizmoManager).

mod gizmo;
mod grabber;
mod move3d;
mod projection;
mod render;

pub use gizmo::{Gizmo, GizmoContext, GizmoKind, Shortcut, UpdateData};
pub use grabber::{Grabber, GrabberExtension};
pub use move3d::{resolve_local_frame, MoveGizmo, MOVE_UNDO_LABEL};
pub use projection::{compute_projection, snap_value, DragAxis, DragAxisState};
pub use render::{to_color32, DrawCommand, DrawList, OverlayPainter, ShaderKind};

/// Gizmo colors.
pub mod colors {
    use crate::config::ColorRgba;

    /// Default grabber color when no axis color is assigned
    pub const GRABBER: ColorRgba = [0.75, 0.75, 0.75, 1.0];
    /// Hovered or dragged grabber
    pub const HIGHLIGHT: ColorRgba = [1.0, 0.38, 0.0, 1.0];
}

//! Error types for the gizmo subsystem.
//!
//! The projection path never fails; errors only come from the edges:
//! preference files, the gizmo registry and undo/redo replay.

use thiserror::Error;

use crate::gizmos::GizmoKind;
use crate::scene::VolumeId;

/// Gizmo subsystem errors
#[derive(Debug, Error)]
pub enum GizmoError {
    /// Reading or writing a file failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A preferences or scenario file could not be parsed
    #[error("Failed to parse TOML: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Preferences could not be serialized
    #[error("Failed to serialize TOML: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    /// Snap step must be strictly positive
    #[error("Invalid snap step: {0} (must be > 0)")]
    InvalidSnapStep(f64),

    /// No gizmo of this kind has been registered with the manager
    #[error("No gizmo registered for {0:?}")]
    NotRegistered(GizmoKind),

    /// The gizmo refuses to open for the current selection
    #[error("{kind:?} gizmo cannot be activated: {reason}")]
    NotActivable { kind: GizmoKind, reason: String },

    /// The operation is not allowed while a drag is active
    #[error("Operation not allowed while dragging")]
    DragInProgress,

    /// The selection is empty
    #[error("Nothing is selected")]
    NoSelection,

    /// A command referenced a volume that is no longer selected
    #[error("Volume not found: {0}")]
    VolumeNotFound(VolumeId),
}

/// Result type for gizmo operations
pub type Result<T> = std::result::Result<T, GizmoError>;

//! Host-side gizmo manager.
//!
//! Holds the registered gizmos, tracks which one is open, and turns raw
//! pointer events into the hover/drag state machine:
//!
//! ```text
//! Idle ──over handle──▶ Hovering(axis) ──press──▶ Dragging(axis)
//!  ▲                        │                         │
//!  └──────off handle────────┘◀────────release─────────┘ (→ Idle)
//! ```

use std::collections::HashMap;

use crate::error::{GizmoError, Result};
use crate::geometry::MouseRay;
use crate::gizmos::{DragAxis, DrawList, Gizmo, GizmoContext, GizmoKind, MoveGizmo, UpdateData};
use crate::history::UndoHistory;
use crate::scene::Selection;

/// Pointer input delivered by the windowing layer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MouseEvent {
    /// Pointer moved with no button held
    Move { ray: MouseRay },
    /// Left button pressed
    Press { ray: MouseRay },
    /// Pointer moved with the left button held
    Drag { ray: MouseRay, shift: bool },
    /// Left button released
    Release,
}

/// Interaction state of the open gizmo.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum WidgetState {
    #[default]
    Idle,
    Hovering(DragAxis),
    Dragging(DragAxis),
}

/// Owns the gizmos and routes input to the open one.
pub struct GizmoManager {
    gizmos: HashMap<GizmoKind, Box<dyn Gizmo>>,
    current: Option<GizmoKind>,
    state: WidgetState,
    history: UndoHistory,
}

impl Default for GizmoManager {
    fn default() -> Self {
        Self::new()
    }
}

impl GizmoManager {
    /// Create a manager with the move gizmo registered.
    pub fn new() -> Self {
        let mut manager = Self::empty();
        manager.register(Box::new(MoveGizmo::new()));
        manager
    }

    /// Create a manager with no gizmos registered.
    pub fn empty() -> Self {
        Self {
            gizmos: HashMap::new(),
            current: None,
            state: WidgetState::Idle,
            history: UndoHistory::new(),
        }
    }

    /// Initialize and register a gizmo. Returns false if it failed to initialize.
    pub fn register(&mut self, mut gizmo: Box<dyn Gizmo>) -> bool {
        if !gizmo.on_init() {
            log::warn!("Gizmo '{}' failed to initialize", gizmo.name());
            return false;
        }
        log::debug!("Registered gizmo '{}' ({:?})", gizmo.name(), gizmo.kind());
        self.gizmos.insert(gizmo.kind(), gizmo);
        true
    }

    pub fn current_kind(&self) -> Option<GizmoKind> {
        self.current
    }

    pub fn state(&self) -> WidgetState {
        self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, WidgetState::Dragging(_))
    }

    pub fn history(&self) -> &UndoHistory {
        &self.history
    }

    fn current_gizmo(&self) -> Option<&dyn Gizmo> {
        let kind = self.current?;
        self.gizmos.get(&kind).map(|g| &**g)
    }

    fn current_gizmo_mut(&mut self) -> Option<&mut Box<dyn Gizmo>> {
        let kind = self.current?;
        self.gizmos.get_mut(&kind)
    }

    /// Open the gizmo of the given kind for the selection.
    pub fn open(&mut self, kind: GizmoKind, selection: &Selection) -> Result<()> {
        if self.is_dragging() {
            return Err(GizmoError::DragInProgress);
        }
        let gizmo = self.gizmos.get_mut(&kind).ok_or(GizmoError::NotRegistered(kind))?;
        if selection.is_empty() {
            return Err(GizmoError::NoSelection);
        }
        if !gizmo.is_activable(selection) {
            log::warn!("{} gizmo is not activable for the current selection", gizmo.name());
            return Err(GizmoError::NotActivable {
                kind,
                reason: "selection contains cut parts or connectors".to_string(),
            });
        }
        gizmo.data_changed(selection);
        gizmo.set_hover_id(None);
        self.current = Some(kind);
        self.state = WidgetState::Idle;
        log::debug!("Opened {:?} gizmo", kind);
        Ok(())
    }

    /// Close the open gizmo, if any.
    pub fn close(&mut self) -> Result<()> {
        if self.is_dragging() {
            return Err(GizmoError::DragInProgress);
        }
        if let Some(gizmo) = self.current_gizmo_mut() {
            gizmo.set_hover_id(None);
        }
        self.current = None;
        self.state = WidgetState::Idle;
        Ok(())
    }

    /// Open `kind` if it is closed, close it if it is open.
    pub fn toggle(&mut self, kind: GizmoKind, selection: &Selection) -> Result<()> {
        if self.current == Some(kind) {
            self.close()
        } else {
            self.open(kind, selection)
        }
    }

    /// Notify the open gizmo that the selection contents changed.
    pub fn on_selection_changed(&mut self, selection: &Selection) {
        if self.is_dragging() {
            return;
        }
        let still_activable = match self.current_gizmo_mut() {
            Some(gizmo) => {
                gizmo.data_changed(selection);
                gizmo.is_activable(selection)
            }
            None => return,
        };
        if !still_activable {
            log::debug!("Selection no longer supports the open gizmo; closing it");
            self.current = None;
            self.state = WidgetState::Idle;
        }
    }

    /// Route a pointer event. Returns true if the gizmo consumed it.
    pub fn on_mouse(&mut self, event: MouseEvent, selection: &mut Selection, ctx: &GizmoContext<'_>) -> bool {
        let state = self.state;
        let Some(gizmo) = self.current.and_then(|kind| self.gizmos.get_mut(&kind)) else {
            return false;
        };

        let (next, consumed) = match (event, state) {
            (MouseEvent::Move { .. }, WidgetState::Dragging(_)) => (state, true),
            (MouseEvent::Move { ray }, _) => {
                gizmo.update_grabbers(selection, ctx);
                let hit = gizmo.pick(&ray);
                gizmo.set_hover_id(hit);
                match hit.and_then(DragAxis::from_index) {
                    Some(axis) => (WidgetState::Hovering(axis), true),
                    None => (WidgetState::Idle, false),
                }
            }
            (MouseEvent::Press { .. }, WidgetState::Dragging(_)) => {
                log::warn!("Ignoring press while a drag is already in progress");
                (state, true)
            }
            (MouseEvent::Press { ray }, _) => {
                gizmo.update_grabbers(selection, ctx);
                let hit = gizmo.pick(&ray);
                gizmo.set_hover_id(hit);
                match hit.and_then(DragAxis::from_index) {
                    Some(axis) => {
                        gizmo.on_start_dragging(selection, ctx);
                        (WidgetState::Dragging(axis), true)
                    }
                    None => (WidgetState::Idle, false),
                }
            }
            (MouseEvent::Drag { ray, shift }, WidgetState::Dragging(_)) => {
                let data = UpdateData {
                    mouse_ray: ray,
                    shift_down: shift,
                };
                gizmo.on_dragging(&data, selection, ctx);
                (state, true)
            }
            (MouseEvent::Drag { .. }, _) => (state, false),
            (MouseEvent::Release, WidgetState::Dragging(_)) => {
                let command = gizmo.on_stop_dragging(selection);
                gizmo.set_hover_id(None);
                if let Some(command) = command {
                    self.history.push(command);
                }
                (WidgetState::Idle, true)
            }
            (MouseEvent::Release, _) => (state, false),
        };

        if next != state {
            log::debug!("Gizmo state {:?} -> {:?}", state, next);
        }
        self.state = next;
        consumed
    }

    /// Draw list for the open gizmo.
    pub fn render(&mut self, selection: &Selection, ctx: &GizmoContext<'_>) -> Option<DrawList> {
        let gizmo = self.current_gizmo_mut()?;
        Some(gizmo.on_render(selection, ctx))
    }

    pub fn tooltip(&self, selection: &Selection) -> String {
        self.current_gizmo()
            .map(|g| g.tooltip(selection))
            .unwrap_or_default()
    }

    pub fn undo(&mut self, selection: &mut Selection) -> Result<Option<String>> {
        if self.is_dragging() {
            return Err(GizmoError::DragInProgress);
        }
        self.history.undo(selection)
    }

    pub fn redo(&mut self, selection: &mut Selection) -> Result<Option<String>> {
        if self.is_dragging() {
            return Err(GizmoError::DragInProgress);
        }
        self.history.redo(selection)
    }
}

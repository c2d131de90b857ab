//! Gizmo trait and common types.

use super::{DrawList, Grabber};
use crate::camera::Camera;
use crate::commands::Command;
use crate::config::GizmoPreferences;
use crate::coordinates::CoordinatesType;
use crate::geometry::MouseRay;
use crate::scene::Selection;

/// Which gizmo the host has selected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GizmoKind {
    Move,
    Rotate,
    Scale,
}

/// Keyboard shortcut that toggles a gizmo.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Shortcut {
    pub ctrl: bool,
    pub key: char,
}

/// Per-sample input while dragging.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UpdateData {
    pub mouse_ray: MouseRay,
    /// Snap modifier held
    pub shift_down: bool,
}

/// Everything a gizmo reads from the application, passed explicitly.
#[derive(Clone, Copy, Debug)]
pub struct GizmoContext<'a> {
    pub camera: &'a Camera,
    pub preferences: &'a GizmoPreferences,
    pub coordinates: CoordinatesType,
}

impl<'a> GizmoContext<'a> {
    /// Context using the coordinate type stored in the preferences.
    pub fn new(camera: &'a Camera, preferences: &'a GizmoPreferences) -> Self {
        Self {
            camera,
            preferences,
            coordinates: preferences.coordinates,
        }
    }

    #[must_use]
    pub fn with_coordinates(mut self, coordinates: CoordinatesType) -> Self {
        self.coordinates = coordinates;
        self
    }
}

/// Capability interface every gizmo implements.
///
/// The host calls `update_grabbers` whenever the selection or camera may
/// have changed, routes pointer input through `pick`/`on_*_dragging`, and
/// asks for a [`DrawList`] once per frame.
pub trait Gizmo: Send {
    fn kind(&self) -> GizmoKind;

    /// Human-readable name for menus.
    fn name(&self) -> &str;

    fn shortcut(&self) -> Shortcut;

    /// Create grabbers. Returns false if the gizmo cannot be used.
    fn on_init(&mut self) -> bool;

    /// Whether the gizmo may be opened for this selection.
    fn is_activable(&self, selection: &Selection) -> bool;

    /// React to a change of the selection contents.
    fn data_changed(&mut self, _selection: &Selection) {}

    fn grabbers(&self) -> &[Grabber];

    fn hover_id(&self) -> Option<usize>;

    fn set_hover_id(&mut self, id: Option<usize>);

    /// Lay out grabbers for the current selection and reference frame.
    fn update_grabbers(&mut self, selection: &Selection, ctx: &GizmoContext<'_>);

    /// Mean selection size used to scale grabbers.
    fn grabber_size(&self) -> f64;

    /// Index of the enabled grabber nearest along the ray, if any.
    fn pick(&self, ray: &MouseRay) -> Option<usize> {
        let size = self.grabber_size();
        self.grabbers()
            .iter()
            .enumerate()
            .filter_map(|(i, g)| g.hit(ray, size).map(|t| (i, t)))
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(i, _)| i)
    }

    fn on_start_dragging(&mut self, selection: &mut Selection, ctx: &GizmoContext<'_>);

    fn on_dragging(&mut self, data: &UpdateData, selection: &mut Selection, ctx: &GizmoContext<'_>);

    /// Finish the drag; returns the undoable command describing it.
    fn on_stop_dragging(&mut self, selection: &mut Selection) -> Option<Box<dyn Command>>;

    fn on_render(&mut self, selection: &Selection, ctx: &GizmoContext<'_>) -> DrawList;

    fn tooltip(&self, selection: &Selection) -> String;
}

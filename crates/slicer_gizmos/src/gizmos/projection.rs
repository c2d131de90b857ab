//! Mouse-ray to axis displacement projection.
//!
//! While a grabber is dragged, each mouse ray is converted into a signed
//! distance along the grabbed axis, measured from where the drag started.

use glam::DVec3;

use crate::geometry::MouseRay;

/// One of the three constrained drag axes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DragAxis {
    X,
    Y,
    Z,
}

impl DragAxis {
    pub const ALL: [DragAxis; 3] = [DragAxis::X, DragAxis::Y, DragAxis::Z];

    /// Grabber index for this axis.
    pub fn index(self) -> usize {
        match self {
            DragAxis::X => 0,
            DragAxis::Y => 1,
            DragAxis::Z => 2,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn unit(self) -> DVec3 {
        match self {
            DragAxis::X => DVec3::X,
            DragAxis::Y => DVec3::Y,
            DragAxis::Z => DVec3::Z,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DragAxis::X => "X",
            DragAxis::Y => "Y",
            DragAxis::Z => "Z",
        }
    }
}

/// State captured when a drag starts.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DragAxisState {
    /// World position of the grabbed handle at drag start
    pub starting_drag_position: DVec3,
    /// Reference center (selection box center) at drag start
    pub starting_reference_center: DVec3,
    /// `Some` exactly while a drag is in progress
    pub active_axis: Option<DragAxis>,
}

impl DragAxisState {
    pub fn begin(axis: DragAxis, starting_drag_position: DVec3, starting_reference_center: DVec3) -> Self {
        Self {
            starting_drag_position,
            starting_reference_center,
            active_axis: Some(axis),
        }
    }

    pub fn is_active(&self) -> bool {
        self.active_axis.is_some()
    }

    /// Direction from the reference center to the grabbed handle.
    pub fn axis_vector(&self) -> DVec3 {
        self.starting_drag_position - self.starting_reference_center
    }

    pub fn end(&mut self) {
        *self = Self::default();
    }
}

/// Round `value` to the nearest multiple of `step`.
///
/// Non-positive steps leave the value untouched.
pub fn snap_value(value: f64, step: f64) -> f64 {
    if step > 0.0 {
        step * (value / step).round()
    } else {
        value
    }
}

/// Signed displacement along the drag axis for the given mouse ray.
///
/// The ray is intersected with the plane through the drag start position
/// whose normal is the ray direction itself. That is the view plane for an
/// orthographic camera; under perspective it is an approximation that
/// drifts with parallax, kept as-is because the drag is relative anyway.
///
/// Returns 0 when the drag has no defined direction (zero-length axis
/// vector), when the ray direction is degenerate, or when no drag is active.
pub fn compute_projection(ray: &MouseRay, state: &DragAxisState, snap_step: f64, snap_enabled: bool) -> f64 {
    if !state.is_active() {
        return 0.0;
    }

    let mut projection = 0.0;

    let starting_vec = state.axis_vector();
    let len_sq = starting_vec.length_squared();

    if len_sq > 0.0 {
        // Unit direction keeps the plane test independent of the ray's scale
        if let Some(dir) = ray.unit_direction() {
            let unit_ray = MouseRay::new(ray.origin, dir);
            if let Some(t) = unit_ray.plane_intersection(state.starting_drag_position, dir) {
                let displacement = unit_ray.at(t) - state.starting_drag_position;
                projection = displacement.dot(starting_vec / len_sq.sqrt());
            }
        }
    }

    if snap_enabled {
        projection = snap_value(projection, snap_step);
    }

    projection
}

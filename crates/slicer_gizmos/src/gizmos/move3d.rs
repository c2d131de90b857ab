//! Move gizmo: three axis grabbers that translate the selection.

use glam::{DMat4, DVec3};

use super::projection::{compute_projection, DragAxis, DragAxisState};
use super::render::{DrawCommand, DrawList, ShaderKind};
use super::{Gizmo, GizmoContext, GizmoKind, Grabber, GrabberExtension, Shortcut, UpdateData};
use crate::commands::{Command, TranslateCommand};
use crate::coordinates::CoordinatesType;
use crate::geometry::BoundingBox;
use crate::scene::{Selection, TransformationType, VolumeOffsets};

/// Undo label recorded for every completed move drag.
pub const MOVE_UNDO_LABEL: &str = "Gizmo-Move";

/// Transform placing the gizmo's local axes in the world.
///
/// Starts as a translation to the selection's reference center. Unless in
/// world mode, the first volume's instance rotation is appended, and in
/// local mode on a single volume that volume's own rotation after it.
pub fn resolve_local_frame(selection: &Selection, world_coordinates: bool, local_coordinates: bool) -> DMat4 {
    let coordinates = if world_coordinates {
        CoordinatesType::World
    } else if local_coordinates {
        CoordinatesType::Local
    } else {
        CoordinatesType::Instance
    };
    let (_, box_trafo) = selection.bounding_box_in_current_reference_system(coordinates);
    let mut ret = DMat4::from_translation(box_trafo.w_axis.truncate());

    if !world_coordinates {
        if let Some(v) = selection.first_volume() {
            let mut orient = v.instance.rotation_matrix();
            if local_coordinates && selection.is_single_volume_or_modifier() {
                orient = orient * v.volume.rotation_matrix();
            }
            ret = ret * orient;
        }
    }
    ret
}

/// Translate gizmo with one grabber per axis.
pub struct MoveGizmo {
    grabbers: Vec<Grabber>,
    hover_id: Option<usize>,
    displacement: DVec3,
    drag: DragAxisState,
    transformation_type: TransformationType,
    drag_start_offsets: Vec<VolumeOffsets>,
    // Layout for the current frame
    bounding_box: BoundingBox,
    center: DVec3,
    base_matrix: DMat4,
    // Captured at drag start
    starting_box_center: DVec3,
    starting_box_bottom_center: DVec3,
}

impl Default for MoveGizmo {
    fn default() -> Self {
        Self::new()
    }
}

impl MoveGizmo {
    pub fn new() -> Self {
        Self {
            grabbers: Vec::new(),
            hover_id: None,
            displacement: DVec3::ZERO,
            drag: DragAxisState::default(),
            transformation_type: TransformationType::World,
            drag_start_offsets: Vec::new(),
            bounding_box: BoundingBox::EMPTY,
            center: DVec3::ZERO,
            base_matrix: DMat4::IDENTITY,
            starting_box_center: DVec3::ZERO,
            starting_box_bottom_center: DVec3::ZERO,
        }
    }

    /// Displacement accumulated by the current drag, in gizmo axes.
    pub fn displacement(&self) -> DVec3 {
        self.displacement
    }

    pub fn drag_state(&self) -> &DragAxisState {
        &self.drag
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_active()
    }

    pub fn center(&self) -> DVec3 {
        self.center
    }

    pub fn starting_box_center(&self) -> DVec3 {
        self.starting_box_center
    }

    /// Center of the selection's floor at drag start, for hosts that snap
    /// the dragged object to the bed or to other objects.
    pub fn starting_box_bottom_center(&self) -> DVec3 {
        self.starting_box_bottom_center
    }

    /// Gizmo-local to world transform for the given reference frame.
    pub fn local_transform(&self, selection: &Selection, coordinates: CoordinatesType) -> DMat4 {
        resolve_local_frame(selection, coordinates.is_world(), coordinates.is_local())
    }

    fn axis_line(&self, id: usize, width: f32) -> DrawCommand {
        let grabber = &self.grabbers[id];
        DrawCommand::Line {
            from: DVec3::ZERO,
            to: grabber.center,
            color: grabber.color,
            width,
            shader: ShaderKind::Flat,
        }
    }
}

impl Gizmo for MoveGizmo {
    fn kind(&self) -> GizmoKind {
        GizmoKind::Move
    }

    fn name(&self) -> &str {
        "Move"
    }

    fn shortcut(&self) -> Shortcut {
        Shortcut { ctrl: true, key: 'M' }
    }

    fn on_init(&mut self) -> bool {
        self.grabbers = (0..3)
            .map(|_| Grabber {
                extension: GrabberExtension::PosZ,
                ..Default::default()
            })
            .collect();

        // Point each grabber's +Z extension along its axis
        self.grabbers[0].angles = DVec3::new(0.0, 0.5 * std::f64::consts::PI, 0.0);
        self.grabbers[1].angles = DVec3::new(-0.5 * std::f64::consts::PI, 0.0, 0.0);
        true
    }

    fn is_activable(&self, selection: &Selection) -> bool {
        !selection.is_any_cut_volume() && !selection.is_any_connector() && !selection.is_empty()
    }

    fn data_changed(&mut self, selection: &Selection) {
        if let Some(z) = self.grabbers.get_mut(DragAxis::Z.index()) {
            z.enabled = !selection.is_wipe_tower();
        }
    }

    fn grabbers(&self) -> &[Grabber] {
        &self.grabbers
    }

    fn hover_id(&self) -> Option<usize> {
        self.hover_id
    }

    fn set_hover_id(&mut self, id: Option<usize>) {
        self.hover_id = id.filter(|&i| i < self.grabbers.len());
    }

    fn update_grabbers(&mut self, selection: &Selection, ctx: &GizmoContext<'_>) {
        let (bounding_box, box_trafo) = selection.bounding_box_in_current_reference_system(ctx.coordinates);
        self.bounding_box = bounding_box;
        self.center = box_trafo.w_axis.truncate();
        self.base_matrix = self.local_transform(selection, ctx.coordinates);

        let half_box_size = 0.5 * bounding_box.size();
        let offset = ctx.preferences.grabber_offset;
        for (axis, grabber) in DragAxis::ALL.into_iter().zip(self.grabbers.iter_mut()) {
            let i = axis.index();
            grabber.center = axis.unit() * (half_box_size[i] + offset);
            grabber.color = ctx.preferences.axis_colors[i];
            grabber.matrix = self.base_matrix;
        }
    }

    fn grabber_size(&self) -> f64 {
        let size = self.bounding_box.size();
        (size.x + size.y + size.z) / 3.0
    }

    fn on_start_dragging(&mut self, selection: &mut Selection, ctx: &GizmoContext<'_>) {
        let Some(axis) = self.hover_id.and_then(DragAxis::from_index) else {
            log::warn!("Move gizmo: drag started without a hovered grabber");
            return;
        };

        self.displacement = DVec3::ZERO;
        let rotation = selection.reference_rotation(ctx.coordinates);
        let grabber_center = self.grabbers[axis.index()].center;
        let starting_drag_position = self.center + rotation.transform_vector3(grabber_center);

        self.drag = DragAxisState::begin(axis, starting_drag_position, self.center);
        self.transformation_type = ctx.coordinates.into();
        self.starting_box_center = self.center;
        self.starting_box_bottom_center = DVec3::new(
            self.center.x,
            self.center.y,
            selection.bounding_box().min.z,
        );
        self.drag_start_offsets = selection.offsets();
        self.grabbers[axis.index()].dragging = true;
        selection.start_dragging();

        log::debug!(
            "Move gizmo: start dragging {} from {:?} ({:?})",
            axis.label(),
            starting_drag_position,
            ctx.coordinates
        );
    }

    fn on_dragging(&mut self, data: &UpdateData, selection: &mut Selection, ctx: &GizmoContext<'_>) {
        let Some(axis) = self.drag.active_axis else {
            return;
        };

        let projection = compute_projection(
            &data.mouse_ray,
            &self.drag,
            ctx.preferences.snap_step,
            data.shift_down,
        );
        self.displacement[axis.index()] = projection;
        selection.translate(self.displacement, self.transformation_type);

        log::trace!("Move gizmo: {} = {:.4}", axis.label(), projection);
    }

    fn on_stop_dragging(&mut self, selection: &mut Selection) -> Option<Box<dyn Command>> {
        let axis = self.drag.active_axis?;

        let after = selection.offsets();
        let before = std::mem::take(&mut self.drag_start_offsets);
        selection.stop_dragging();

        log::debug!(
            "Move gizmo: stop dragging {} at displacement {:?}",
            axis.label(),
            self.displacement
        );

        self.displacement = DVec3::ZERO;
        self.drag.end();
        for grabber in &mut self.grabbers {
            grabber.dragging = false;
        }

        let cmd = TranslateCommand::new(MOVE_UNDO_LABEL, before, after);
        if cmd.is_noop() {
            return None;
        }
        Some(Box::new(cmd))
    }

    fn on_render(&mut self, selection: &Selection, ctx: &GizmoContext<'_>) -> DrawList {
        self.update_grabbers(selection, ctx);

        let prefs = ctx.preferences;
        let size = self.grabber_size();
        let mut list = DrawList::new(ctx.camera, self.base_matrix);

        match self.hover_id {
            None => {
                for id in 0..self.grabbers.len() {
                    if self.grabbers[id].enabled {
                        list.push(self.axis_line(id, prefs.idle_line_width));
                    }
                }
                for grabber in self.grabbers.iter().filter(|g| g.enabled) {
                    list.push(grabber.draw_command(size, false, prefs.emission_factor));
                }
            }
            Some(id) => {
                if self.grabbers[id].enabled {
                    list.push(self.axis_line(id, prefs.hover_line_width));
                    list.push(self.grabbers[id].draw_command(size, true, prefs.emission_factor));
                }
            }
        }

        list
    }

    /// Hovering a whole instance shows its center coordinate on that axis.
    /// Once a drag starts, and for part selections, the accumulated
    /// displacement is shown instead.
    fn tooltip(&self, selection: &Selection) -> String {
        let Some(axis) = self.hover_id.and_then(DragAxis::from_index) else {
            return String::new();
        };
        let i = axis.index();
        let value = if !self.is_dragging() && selection.is_single_full_instance() {
            selection.bounding_box().center()[i]
        } else {
            self.displacement[i]
        };
        format!("{}: {:.2}", axis.label(), value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::Camera;
    use crate::config::GizmoPreferences;
    use crate::geometry::{DQuat, MouseRay, Transformation};
    use crate::scene::{SelectedVolume, SelectionMode, VolumeId, VolumeKind};
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_2;

    fn cube(id: u32, half: f64) -> SelectedVolume {
        SelectedVolume::new(
            VolumeId(id),
            BoundingBox::from_center_half_extents(DVec3::ZERO, DVec3::splat(half)),
        )
    }

    fn init_gizmo() -> MoveGizmo {
        let mut gizmo = MoveGizmo::new();
        assert!(gizmo.on_init());
        gizmo
    }

    #[test]
    fn test_local_frame_world_is_pure_translation() {
        let mut v = cube(1, 1.0);
        v.instance = Transformation::from_offset(DVec3::new(5.0, 6.0, 7.0))
            .with_rotation(DQuat::from_rotation_z(0.7));
        let sel = Selection::with_volumes(SelectionMode::Instance, [v]);

        let frame = resolve_local_frame(&sel, true, false);
        let (scale, rotation, translation) = frame.to_scale_rotation_translation();
        assert!(rotation.abs_diff_eq(DQuat::IDENTITY, 1e-12));
        assert!(scale.abs_diff_eq(DVec3::ONE, 1e-12));
        assert!(translation.abs_diff_eq(DVec3::new(5.0, 6.0, 7.0), 1e-9));
    }

    #[test]
    fn test_local_frame_composes_instance_then_volume() {
        let instance_rot = DQuat::from_rotation_z(FRAC_PI_2);
        let volume_rot = DQuat::from_rotation_x(FRAC_PI_2);
        let mut v = cube(1, 1.0);
        v.instance = v.instance.with_rotation(instance_rot);
        v.volume = v.volume.with_rotation(volume_rot);
        let sel = Selection::with_volumes(SelectionMode::Volume, [v]);

        let frame = resolve_local_frame(&sel, false, true);
        let expected = DMat4::from_quat(instance_rot) * DMat4::from_quat(volume_rot);
        let swapped = DMat4::from_quat(volume_rot) * DMat4::from_quat(instance_rot);

        let y = frame.transform_vector3(DVec3::Y);
        assert!(y.abs_diff_eq(expected.transform_vector3(DVec3::Y), 1e-9));
        assert!(!y.abs_diff_eq(swapped.transform_vector3(DVec3::Y), 1e-3));
        // Rz(90) * Rx(90) sends +Y to +Z
        assert!(y.abs_diff_eq(DVec3::Z, 1e-9));

        // Instance mode ignores the volume rotation
        let frame = resolve_local_frame(&sel, false, false);
        assert!(frame
            .transform_vector3(DVec3::Y)
            .abs_diff_eq(DMat4::from_quat(instance_rot).transform_vector3(DVec3::Y), 1e-9));
    }

    #[test]
    fn test_local_mode_on_instance_selection_uses_instance_rotation() {
        let mut v = cube(1, 1.0);
        v.instance = v.instance.with_rotation(DQuat::from_rotation_z(FRAC_PI_2));
        v.volume = v.volume.with_rotation(DQuat::from_rotation_x(FRAC_PI_2));
        let sel = Selection::with_volumes(SelectionMode::Instance, [v]);
        assert_eq!(resolve_local_frame(&sel, false, true), resolve_local_frame(&sel, false, false));
    }

    #[test]
    fn test_grabber_layout() {
        let camera = Camera::default();
        let prefs = GizmoPreferences::default();
        let ctx = GizmoContext::new(&camera, &prefs);

        let mut v = SelectedVolume::new(
            VolumeId(1),
            BoundingBox::new(DVec3::new(-2.0, -3.0, 0.0), DVec3::new(2.0, 3.0, 8.0)),
        );
        v.instance.offset = DVec3::new(100.0, 50.0, 0.0);
        let sel = Selection::with_volumes(SelectionMode::Instance, [v]);

        let mut gizmo = init_gizmo();
        gizmo.update_grabbers(&sel, &ctx);

        assert!(gizmo.center().abs_diff_eq(DVec3::new(100.0, 50.0, 4.0), 1e-9));
        let g = gizmo.grabbers();
        assert!(g[0].center.abs_diff_eq(DVec3::new(12.0, 0.0, 0.0), 1e-9));
        assert!(g[1].center.abs_diff_eq(DVec3::new(0.0, 13.0, 0.0), 1e-9));
        assert!(g[2].center.abs_diff_eq(DVec3::new(0.0, 0.0, 14.0), 1e-9));
        assert!(g[0].world_center().abs_diff_eq(DVec3::new(112.0, 50.0, 4.0), 1e-9));
        assert_eq!(g[1].color, prefs.axis_colors[1]);
        assert_relative_eq!(gizmo.grabber_size(), 6.0);
    }

    #[test]
    fn test_activable_and_wipe_tower() {
        let mut gizmo = init_gizmo();
        assert!(!gizmo.is_activable(&Selection::default()));

        let mut cut = cube(1, 1.0);
        cut.kind = VolumeKind::CutPart;
        assert!(!gizmo.is_activable(&Selection::with_volumes(SelectionMode::Instance, [cut])));

        let mut tower = cube(2, 1.0);
        tower.kind = VolumeKind::WipeTower;
        let sel = Selection::with_volumes(SelectionMode::Instance, [tower]);
        assert!(gizmo.is_activable(&sel));
        gizmo.data_changed(&sel);
        assert!(!gizmo.grabbers()[2].enabled);
        assert!(gizmo.grabbers()[0].enabled);
    }

    #[test]
    fn test_drag_x_in_world() {
        let camera = Camera::default();
        let prefs = GizmoPreferences::default();
        let ctx = GizmoContext::new(&camera, &prefs);
        let mut sel = Selection::with_volumes(SelectionMode::Instance, [cube(1, 5.0)]);

        let mut gizmo = init_gizmo();
        gizmo.update_grabbers(&sel, &ctx);
        gizmo.set_hover_id(Some(0));
        gizmo.on_start_dragging(&mut sel, &ctx);

        // Anchor sits at half box size + offset along X
        assert!(gizmo
            .drag_state()
            .starting_drag_position
            .abs_diff_eq(DVec3::new(15.0, 0.0, 0.0), 1e-9));
        assert_eq!(gizmo.starting_box_center(), DVec3::ZERO);
        assert!(gizmo
            .starting_box_bottom_center()
            .abs_diff_eq(DVec3::new(0.0, 0.0, -5.0), 1e-9));

        let data = UpdateData {
            mouse_ray: MouseRay::new(DVec3::new(22.3, 4.0, 50.0), -DVec3::Z),
            shift_down: false,
        };
        gizmo.on_dragging(&data, &mut sel, &ctx);
        assert_relative_eq!(gizmo.displacement().x, 7.3, epsilon = 1e-9);
        assert_relative_eq!(sel.volumes()[0].instance.offset.x, 7.3, epsilon = 1e-9);
        assert_eq!(gizmo.tooltip(&sel), "X: 7.30");

        // Snap with shift held
        let snapped = UpdateData { shift_down: true, ..data };
        gizmo.on_dragging(&snapped, &mut sel, &ctx);
        assert_relative_eq!(sel.volumes()[0].instance.offset.x, 7.0);

        let cmd = gizmo.on_stop_dragging(&mut sel).expect("move recorded");
        assert_eq!(cmd.description(), MOVE_UNDO_LABEL);
        assert!(!gizmo.is_dragging());
        assert_eq!(gizmo.displacement(), DVec3::ZERO);
        assert!(!sel.is_dragging());
    }

    #[test]
    fn test_drag_in_instance_frame_follows_rotation() {
        let camera = Camera::default();
        let prefs = GizmoPreferences::default();
        let ctx = GizmoContext::new(&camera, &prefs).with_coordinates(CoordinatesType::Instance);

        let mut v = cube(1, 5.0);
        v.instance = v.instance.with_rotation(DQuat::from_rotation_z(FRAC_PI_2));
        let mut sel = Selection::with_volumes(SelectionMode::Instance, [v]);

        let mut gizmo = init_gizmo();
        gizmo.update_grabbers(&sel, &ctx);
        gizmo.set_hover_id(Some(0));
        gizmo.on_start_dragging(&mut sel, &ctx);

        // Local X of the instance points along world Y
        assert!(gizmo
            .drag_state()
            .starting_drag_position
            .abs_diff_eq(DVec3::new(0.0, 15.0, 0.0), 1e-9));

        let data = UpdateData {
            mouse_ray: MouseRay::new(DVec3::new(3.0, 19.0, 50.0), -DVec3::Z),
            shift_down: false,
        };
        gizmo.on_dragging(&data, &mut sel, &ctx);
        assert_relative_eq!(gizmo.displacement().x, 4.0, epsilon = 1e-9);
        assert!(sel.volumes()[0]
            .instance
            .offset
            .abs_diff_eq(DVec3::new(0.0, 4.0, 0.0), 1e-9));
    }

    #[test]
    fn test_stop_without_motion_records_nothing() {
        let camera = Camera::default();
        let prefs = GizmoPreferences::default();
        let ctx = GizmoContext::new(&camera, &prefs);
        let mut sel = Selection::with_volumes(SelectionMode::Instance, [cube(1, 1.0)]);

        let mut gizmo = init_gizmo();
        assert!(gizmo.on_stop_dragging(&mut sel).is_none());

        gizmo.update_grabbers(&sel, &ctx);
        gizmo.set_hover_id(Some(2));
        gizmo.on_start_dragging(&mut sel, &ctx);
        assert!(gizmo.on_stop_dragging(&mut sel).is_none());
    }

    #[test]
    fn test_render_idle_and_hovered() {
        let camera = Camera::default();
        let prefs = GizmoPreferences::default();
        let ctx = GizmoContext::new(&camera, &prefs);
        let sel = Selection::with_volumes(SelectionMode::Instance, [cube(1, 1.0)]);

        let mut gizmo = init_gizmo();
        let idle = gizmo.on_render(&sel, &ctx);
        assert_eq!(idle.lines().count(), 3);
        assert_eq!(idle.grabbers().count(), 3);
        assert!(idle.lines().all(|c| matches!(
            c,
            DrawCommand::Line { width, shader: ShaderKind::Flat, .. } if *width == prefs.idle_line_width
        )));

        gizmo.set_hover_id(Some(1));
        let hovered = gizmo.on_render(&sel, &ctx);
        assert_eq!(hovered.commands.len(), 2);
        match &hovered.commands[1] {
            DrawCommand::Grabber { shader, emission_factor, .. } => {
                assert_eq!(*shader, ShaderKind::GouraudLight);
                assert_eq!(*emission_factor, prefs.emission_factor);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_tooltip_switches_to_displacement_while_dragging() {
        let camera = Camera::default();
        let prefs = GizmoPreferences::default();
        let ctx = GizmoContext::new(&camera, &prefs);
        let mut v = cube(1, 5.0);
        v.instance.offset = DVec3::new(100.0, 0.0, 0.0);
        let mut sel = Selection::with_volumes(SelectionMode::Instance, [v]);

        let mut gizmo = init_gizmo();
        gizmo.update_grabbers(&sel, &ctx);
        gizmo.set_hover_id(Some(0));
        assert_eq!(gizmo.tooltip(&sel), "X: 100.00");

        gizmo.on_start_dragging(&mut sel, &ctx);
        let data = UpdateData {
            mouse_ray: MouseRay::new(DVec3::new(117.0, 0.0, 50.0), -DVec3::Z),
            shift_down: false,
        };
        gizmo.on_dragging(&data, &mut sel, &ctx);
        assert_eq!(gizmo.tooltip(&sel), "X: 2.00");
    }

    #[test]
    fn test_tooltip_shows_position_when_hovering_instance() {
        let camera = Camera::default();
        let prefs = GizmoPreferences::default();
        let ctx = GizmoContext::new(&camera, &prefs);
        let mut v = cube(1, 1.0);
        v.instance.offset = DVec3::new(0.0, 12.346, 0.0);
        let sel = Selection::with_volumes(SelectionMode::Instance, [v]);

        let mut gizmo = init_gizmo();
        gizmo.update_grabbers(&sel, &ctx);
        assert_eq!(gizmo.tooltip(&sel), "");
        gizmo.set_hover_id(Some(1));
        assert_eq!(gizmo.tooltip(&sel), "Y: 12.35");
    }
}

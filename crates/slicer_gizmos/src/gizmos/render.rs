//! Backend-neutral draw lists and an egui overlay painter for them.
//!
//! Gizmos describe what to draw as a [`DrawList`] in gizmo-local
//! coordinates. [`OverlayPainter`] projects a list through the camera and
//! paints it with egui shapes.

use egui::{Color32, Painter, Pos2, Rgba, Shape, Stroke};
use glam::{DMat4, DQuat, DVec2, DVec3};

use super::grabber::GrabberExtension;
use crate::camera::Camera;
use crate::config::ColorRgba;

/// Shader program a draw command is meant for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShaderKind {
    /// Unlit, single color
    Flat,
    /// Gouraud shading with a fixed light and emission term
    GouraudLight,
}

impl ShaderKind {
    pub fn name(&self) -> &'static str {
        match self {
            ShaderKind::Flat => "flat",
            ShaderKind::GouraudLight => "gouraud_light",
        }
    }
}

/// A single primitive in gizmo-local coordinates.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    Line {
        from: DVec3,
        to: DVec3,
        color: ColorRgba,
        width: f32,
        shader: ShaderKind,
    },
    Grabber {
        center: DVec3,
        half_size: f64,
        rotation: DQuat,
        extension: GrabberExtension,
        color: ColorRgba,
        shader: ShaderKind,
        emission_factor: f32,
    },
}

/// Primitives plus the uniforms they are drawn with.
#[derive(Clone, Debug, PartialEq)]
pub struct DrawList {
    /// Gizmo-local to world
    pub model_matrix: DMat4,
    /// Camera view matrix times `model_matrix`
    pub view_model_matrix: DMat4,
    pub projection_matrix: DMat4,
    pub commands: Vec<DrawCommand>,
}

impl DrawList {
    pub fn new(camera: &Camera, model_matrix: DMat4) -> Self {
        Self {
            model_matrix,
            view_model_matrix: camera.view_matrix() * model_matrix,
            projection_matrix: camera.projection_matrix(),
            commands: Vec::new(),
        }
    }

    pub fn push(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn lines(&self) -> impl Iterator<Item = &DrawCommand> {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Line { .. }))
    }

    pub fn grabbers(&self) -> impl Iterator<Item = &DrawCommand> {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Grabber { .. }))
    }
}

/// Paints draw lists as a 2D egui overlay over the 3D viewport.
pub struct OverlayPainter<'a> {
    camera: &'a Camera,
}

impl<'a> OverlayPainter<'a> {
    pub fn new(camera: &'a Camera) -> Self {
        Self { camera }
    }

    /// Project a gizmo-local point to screen space.
    fn project(&self, list: &DrawList, local: DVec3) -> Option<Pos2> {
        self.camera
            .project(list.model_matrix.transform_point3(local))
            .map(to_pos)
    }

    pub fn paint(&self, painter: &Painter, list: &DrawList) {
        for command in &list.commands {
            match command {
                DrawCommand::Line { from, to, color, width, .. } => {
                    if let (Some(a), Some(b)) = (self.project(list, *from), self.project(list, *to)) {
                        painter.line_segment([a, b], Stroke::new(*width, to_color32(*color, 0.0)));
                    }
                }
                DrawCommand::Grabber {
                    center,
                    half_size,
                    rotation,
                    extension,
                    color,
                    emission_factor,
                    ..
                } => {
                    self.paint_grabber(painter, list, *center, *half_size, *rotation, *extension, *color, *emission_factor);
                }
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn paint_grabber(
        &self,
        painter: &Painter,
        list: &DrawList,
        center: DVec3,
        half_size: f64,
        rotation: DQuat,
        extension: GrabberExtension,
        color: ColorRgba,
        emission_factor: f32,
    ) {
        let Some(center_2d) = self.project(list, center) else {
            return;
        };
        let fill = to_color32(color, emission_factor);

        // Cube footprint: farthest projected corner from the center
        let radius = cube_corners(half_size)
            .into_iter()
            .filter_map(|c| self.project(list, center + rotation * c))
            .map(|p| p.distance(center_2d))
            .fold(0.0f32, f32::max);

        if extension == GrabberExtension::PosZ {
            let tip = center + rotation * DVec3::new(0.0, 0.0, 3.0 * half_size);
            if let Some(tip_2d) = self.project(list, tip) {
                let dir = tip_2d - center_2d;
                if dir.length() > 1.0 {
                    let norm = dir.normalized();
                    let perp = egui::vec2(-norm.y, norm.x) * radius;
                    painter.add(Shape::convex_polygon(
                        vec![tip_2d, center_2d + perp, center_2d - perp],
                        fill,
                        Stroke::NONE,
                    ));
                }
            }
        }

        painter.circle_filled(center_2d, radius.max(2.0), fill);
    }
}

fn cube_corners(half: f64) -> [DVec3; 8] {
    let h = half;
    [
        DVec3::new(-h, -h, -h),
        DVec3::new(h, -h, -h),
        DVec3::new(-h, h, -h),
        DVec3::new(h, h, -h),
        DVec3::new(-h, -h, h),
        DVec3::new(h, -h, h),
        DVec3::new(-h, h, h),
        DVec3::new(h, h, h),
    ]
}

fn to_pos(p: DVec2) -> Pos2 {
    Pos2::new(p.x as f32, p.y as f32)
}

/// Convert an RGBA color, brightened by an emission term.
pub fn to_color32(color: ColorRgba, emission_factor: f32) -> Color32 {
    let lift = |c: f32| (c + emission_factor * (1.0 - c)).clamp(0.0, 1.0);
    Rgba::from_rgba_unmultiplied(lift(color[0]), lift(color[1]), lift(color[2]), color[3]).into()
}

//! Geometry primitives shared by the gizmos and the scene model.
//!
//! All math is done in `f64` via glam's `D*` types, matching the precision
//! of slicer scene coordinates.

mod bounds;
mod ray;
mod transformation;

pub use bounds::BoundingBox;
pub use ray::MouseRay;
pub use transformation::Transformation;

pub use glam::{DMat4, DQuat, DVec2, DVec3};

//! Geometry module — value types consumed by the viewport.
//!
//! Double-precision primitives over glam's f64 types: axis-aligned
//! bounding box, sphere, plane and line segment. These are plain value
//! types with standard arithmetic; the viewport is their only consumer
//! inside this crate.

mod bounding_box;
mod line;
mod plane;
mod sphere;

pub use bounding_box::BoundingBox;
pub use line::Line;
pub use plane::Plane;
pub use sphere::Sphere;

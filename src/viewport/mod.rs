//! Viewport module — camera, frustum, projection and screen mapping.
//!
//! The `Viewport` is a passive value type: it owns a camera (location,
//! orthonormal frame, lock flags), a view frustum (six clipping planes,
//! symmetry flags, near/far policy), a screen port and a handful of
//! derived views (lens length, view angle, target distance, transforms).
//! The crate does NOT render anything — the viewport is a tool provided
//! to the host application, owned and driven by the caller.

mod frustum;
mod navigation;
mod projection;
mod transforms;
mod viewport;

pub use frustum::{ClippingPlaneConstraints, DepthRange, Frustum};
pub use projection::CameraAngles;
pub use transforms::{CoordSystem, ScreenPort};
pub use viewport::{CameraFrame, CameraLocks, FrustumSymmetry, Projection, Viewport};

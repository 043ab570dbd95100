/*!
# Astra Viewport

Camera and viewport model for 3D applications.

This crate provides a passive `Viewport` value type: a camera with an
orthonormal frame, a view frustum with parallel / perspective /
two-point perspective projections, a pixel screen port, and the
transforms that chain world, camera, clip and screen coordinates.
Nothing here renders; the viewport is owned and driven by the host
application, which feeds the resulting matrices to its own pipeline.

## Architecture

- **Viewport**: camera state, frustum, screen port and navigation
- **Frustum / DepthRange**: view volume and near/far management
- **ScreenPort / CoordSystem**: pixel mapping and transform chain
- **geometry**: small f64 primitives (box, sphere, plane, line) used
  by the depth and picking queries

All math is double precision via `glam`'s `DVec3` / `DMat4` types.
*/

// Internal modules
mod error;
pub mod geometry;
pub mod log;
pub mod viewport;

// Main astra namespace module
pub mod astra {
    // Error types
    pub use crate::error::{AstraError, AstraResult};

    // Logging sub-module (types and free functions, NOT macros)
    pub mod log {
        pub use crate::log::{
            log, log_detailed, reset_logger, set_logger, DefaultLogger, LogEntry, LogSeverity,
            Logger,
        };
        // Note: astra_* macros are NOT re-exported here - they are internal only
    }

    // Geometry sub-module
    pub mod geometry {
        pub use crate::geometry::*;
    }

    // Viewport sub-module with the camera / frustum / transform types
    pub mod viewport {
        pub use crate::viewport::*;
    }
}

// Flat re-exports for the common types
pub use error::{AstraError, AstraResult};
pub use viewport::{
    CameraAngles, CameraFrame, CameraLocks, ClippingPlaneConstraints, CoordSystem, DepthRange,
    Frustum, FrustumSymmetry, Projection, ScreenPort, Viewport,
};

// Re-export math library at crate root
pub use glam;

/// Line segment in world space (f64).
///
/// The viewport's picking primitive returns one of these: a segment from
/// the near plane to the far plane through a screen point.

use glam::DVec3;

/// Line segment from `from` to `to`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line {
    /// Start point
    pub from: DVec3,
    /// End point
    pub to: DVec3,
}

impl Line {
    /// Create a line segment between two points.
    pub fn new(from: DVec3, to: DVec3) -> Self {
        Self { from, to }
    }

    /// Point at parameter `t` (0 = from, 1 = to; values outside [0,1] extrapolate).
    pub fn point_at(&self, t: f64) -> DVec3 {
        self.from + t * (self.to - self.from)
    }

    /// Direction vector from start to end (not normalized).
    pub fn direction(&self) -> DVec3 {
        self.to - self.from
    }

    /// Segment length.
    pub fn length(&self) -> f64 {
        self.direction().length()
    }
}

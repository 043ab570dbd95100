/// Plane in world space (f64).
///
/// Stored as an origin point plus a unit normal. The signed distance of a
/// point is positive on the side the normal points toward; the viewport's
/// frustum plane accessors orient normals toward the inside of the view
/// volume, matching the usual culling convention.

use glam::{DVec3, DVec4};

/// Plane defined by an origin point and a unit normal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    /// A point on the plane
    pub origin: DVec3,
    /// Unit normal
    pub normal: DVec3,
}

impl Plane {
    /// Create a plane from an origin point and a (not necessarily unit) normal.
    ///
    /// Returns `None` if the normal is zero-length or non-finite.
    pub fn from_origin_normal(origin: DVec3, normal: DVec3) -> Option<Self> {
        if !origin.is_finite() || !normal.is_finite() {
            return None;
        }
        let len = normal.length();
        if len <= f64::EPSILON {
            return None;
        }
        Some(Self {
            origin,
            normal: normal / len,
        })
    }

    /// Signed distance from `point` to the plane.
    ///
    /// Positive on the side the normal points toward.
    pub fn value_at(&self, point: DVec3) -> f64 {
        self.normal.dot(point - self.origin)
    }

    /// Plane equation `(A, B, C, D)` with `Ax + By + Cz + D = 0`
    /// and `(A, B, C)` the unit normal.
    pub fn equation(&self) -> DVec4 {
        DVec4::new(
            self.normal.x,
            self.normal.y,
            self.normal.z,
            -self.normal.dot(self.origin),
        )
    }
}

#[cfg(test)]
#[path = "plane_tests.rs"]
mod tests;

/// Frustum operations — bounds, aspect, near/far policies, depth
/// queries, world-space clipping planes and the picking ray.
///
/// Frustum scalars live in camera space: `left/right` along camera x,
/// `bottom/top` along camera y, `near/far` along the view direction.
/// For a perspective projection the side walls are defined at the near
/// plane and fan out with depth; for a parallel projection the volume
/// is a box.

use glam::DVec3;

use crate::error::{AstraError, AstraResult};
use crate::geometry::{BoundingBox, Line, Plane, Sphere};
use super::viewport::{FrustumSymmetry, Viewport, DEFAULT_MIN_NEAR_DIST};

/// The six scalars defining the view volume in camera space.
///
/// Invariants for a valid frustum: `left < right`, `bottom < top`,
/// `0 < near < far`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frustum {
    /// Left edge at the near plane
    pub left: f64,
    /// Right edge at the near plane
    pub right: f64,
    /// Bottom edge at the near plane
    pub bottom: f64,
    /// Top edge at the near plane
    pub top: f64,
    /// Near clipping distance (strictly positive)
    pub near: f64,
    /// Far clipping distance
    pub far: f64,
}

impl Frustum {
    /// True if all bounds are finite and the ordering invariants hold.
    pub fn is_valid(&self) -> bool {
        self.left.is_finite()
            && self.right.is_finite()
            && self.bottom.is_finite()
            && self.top.is_finite()
            && self.near.is_finite()
            && self.far.is_finite()
            && self.left < self.right
            && self.bottom < self.top
            && self.near > 0.0
            && self.near < self.far
    }

    /// Width at the near plane.
    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    /// Height at the near plane.
    pub fn height(&self) -> f64 {
        self.top - self.bottom
    }
}

/// Depth range along the view axis, measured from the camera location.
///
/// Produced by the depth queries and consumed by the near/far setters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DepthRange {
    /// Distance to the nearest covered point
    pub near: f64,
    /// Distance to the farthest covered point
    pub far: f64,
}

impl DepthRange {
    /// Range covering a single depth value.
    pub fn point(depth: f64) -> Self {
        Self {
            near: depth,
            far: depth,
        }
    }

    /// Union with another range.
    pub fn union(&self, other: &DepthRange) -> DepthRange {
        DepthRange {
            near: self.near.min(other.near),
            far: self.far.max(other.far),
        }
    }
}

/// Lower bounds for perspective near/far auto-adjustment, derived from
/// the depth buffer precision. See
/// [`Viewport::get_perspective_clipping_plane_constraints`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClippingPlaneConstraints {
    /// Smallest allowed near distance
    pub min_near_dist: f64,
    /// Smallest allowed near/far ratio
    pub min_near_over_far: f64,
}

impl Viewport {
    // ===== FRUSTUM ACCESSORS =====

    /// The six frustum scalars.
    ///
    /// Fails if the stored frustum violates its invariants.
    pub fn get_frustum(&self) -> AstraResult<Frustum> {
        if !self.frustum.is_valid() {
            return Err(AstraError::InvalidFrustum);
        }
        Ok(self.frustum)
    }

    /// Left frustum edge.
    pub fn frustum_left(&self) -> f64 {
        self.frustum.left
    }

    /// Right frustum edge.
    pub fn frustum_right(&self) -> f64 {
        self.frustum.right
    }

    /// Bottom frustum edge.
    pub fn frustum_bottom(&self) -> f64 {
        self.frustum.bottom
    }

    /// Top frustum edge.
    pub fn frustum_top(&self) -> f64 {
        self.frustum.top
    }

    /// Near clipping distance.
    pub fn frustum_near(&self) -> f64 {
        self.frustum.near
    }

    /// Far clipping distance.
    pub fn frustum_far(&self) -> f64 {
        self.frustum.far
    }

    /// The smaller of the frustum's width and height.
    pub fn frustum_minimum_diameter(&self) -> f64 {
        self.frustum.width().min(self.frustum.height())
    }

    /// The larger of the frustum's width and height.
    pub fn frustum_maximum_diameter(&self) -> f64 {
        self.frustum.width().max(self.frustum.height())
    }

    /// Set the six frustum scalars.
    ///
    /// Fails without state change if `left >= right`, `bottom >= top`,
    /// `near <= 0` or `near >= far`. When a symmetry flag is set the
    /// corresponding axis is recentered, preserving its extent.
    #[allow(clippy::too_many_arguments)]
    pub fn set_frustum(
        &mut self,
        left: f64,
        right: f64,
        bottom: f64,
        top: f64,
        near: f64,
        far: f64,
    ) -> AstraResult<()> {
        let mut frustum = Frustum {
            left,
            right,
            bottom,
            top,
            near,
            far,
        };
        if !frustum.is_valid() {
            return Err(AstraError::InvalidArgument(
                "frustum bounds must satisfy left<right, bottom<top, 0<near<far".to_string(),
            ));
        }
        if self.symmetry.contains(FrustumSymmetry::LEFT_RIGHT) {
            let half = 0.5 * frustum.width();
            frustum.left = -half;
            frustum.right = half;
        }
        if self.symmetry.contains(FrustumSymmetry::TOP_BOTTOM) {
            let half = 0.5 * frustum.height();
            frustum.bottom = -half;
            frustum.top = half;
        }
        self.frustum = frustum;
        Ok(())
    }

    // ===== ASPECT =====

    /// Frustum aspect ratio (width / height).
    pub fn get_frustum_aspect(&self) -> AstraResult<f64> {
        if !self.frustum.is_valid() {
            return Err(AstraError::InvalidFrustum);
        }
        Ok(self.frustum.width() / self.frustum.height())
    }

    /// Rescale the frustum to aspect ratio `aspect = width / height`,
    /// keeping the frustum center fixed.
    ///
    /// The larger dimension is preserved and the other rescaled.
    pub fn set_frustum_aspect(&mut self, aspect: f64) -> AstraResult<()> {
        if !aspect.is_finite() || aspect <= 0.0 {
            return Err(AstraError::InvalidArgument(
                "aspect ratio must be positive".to_string(),
            ));
        }
        if !self.frustum.is_valid() {
            return Err(AstraError::InvalidFrustum);
        }
        let w = self.frustum.width();
        let h = self.frustum.height();
        if w >= h {
            let cy = 0.5 * (self.frustum.bottom + self.frustum.top);
            let half_h = 0.5 * w / aspect;
            self.frustum.bottom = cy - half_h;
            self.frustum.top = cy + half_h;
        } else {
            let cx = 0.5 * (self.frustum.left + self.frustum.right);
            let half_w = 0.5 * h * aspect;
            self.frustum.left = cx - half_w;
            self.frustum.right = cx + half_w;
        }
        Ok(())
    }

    // ===== FRUSTUM CENTER =====

    /// Center of the near-plane rectangle, in world space.
    pub fn get_frustum_center(&self) -> AstraResult<DVec3> {
        if !self.is_valid_camera() {
            return Err(AstraError::InvalidCamera);
        }
        if !self.frustum.is_valid() {
            return Err(AstraError::InvalidFrustum);
        }
        let cx = 0.5 * (self.frustum.left + self.frustum.right);
        let cy = 0.5 * (self.frustum.bottom + self.frustum.top);
        Ok(self.camera_location + cx * self.camera_x + cy * self.camera_y
            - self.frustum.near * self.camera_z)
    }

    /// Point on the frustum's central axis at the given distance from
    /// the camera, in world space.
    pub fn frustum_center_point(&self, target_distance: f64) -> AstraResult<DVec3> {
        if !target_distance.is_finite() || target_distance <= 0.0 {
            return Err(AstraError::InvalidArgument(
                "target distance must be positive".to_string(),
            ));
        }
        if !self.is_valid_camera() {
            return Err(AstraError::InvalidCamera);
        }
        if !self.frustum.is_valid() {
            return Err(AstraError::InvalidFrustum);
        }
        let s = if self.is_perspective_projection() {
            target_distance / self.frustum.near
        } else {
            1.0
        };
        let cx = 0.5 * (self.frustum.left + self.frustum.right) * s;
        let cy = 0.5 * (self.frustum.bottom + self.frustum.top) * s;
        Ok(self.camera_location + cx * self.camera_x + cy * self.camera_y
            - target_distance * self.camera_z)
    }

    // ===== DEPTH QUERIES =====

    /// Depth of a point along the view axis.
    ///
    /// With `grow_near_far` the result is the union with the supplied
    /// range; otherwise the supplied range is ignored. This is the
    /// accumulation pattern used to build a frustum enclosing a whole
    /// scene incrementally.
    pub fn get_point_depth(
        &self,
        point: DVec3,
        near_far: DepthRange,
        grow_near_far: bool,
    ) -> AstraResult<DepthRange> {
        if !self.is_valid_camera() {
            return Err(AstraError::InvalidCamera);
        }
        if !point.is_finite() {
            return Err(AstraError::InvalidArgument(
                "point must be finite".to_string(),
            ));
        }
        let d = (point - self.camera_location).dot(-self.camera_z);
        let fresh = DepthRange::point(d);
        Ok(if grow_near_far {
            fresh.union(&near_far)
        } else {
            fresh
        })
    }

    /// Depth range covering a bounding box along the view axis.
    pub fn get_bounding_box_depth(
        &self,
        bbox: &BoundingBox,
        near_far: DepthRange,
        grow_near_far: bool,
    ) -> AstraResult<DepthRange> {
        if !self.is_valid_camera() {
            return Err(AstraError::InvalidCamera);
        }
        if !bbox.is_valid() {
            return Err(AstraError::InvalidArgument(
                "bounding box must be valid".to_string(),
            ));
        }
        let dir = -self.camera_z;
        let mut near = f64::INFINITY;
        let mut far = f64::NEG_INFINITY;
        for corner in bbox.corners() {
            let d = (corner - self.camera_location).dot(dir);
            near = near.min(d);
            far = far.max(d);
        }
        let fresh = DepthRange { near, far };
        Ok(if grow_near_far {
            fresh.union(&near_far)
        } else {
            fresh
        })
    }

    /// Depth range covering a sphere along the view axis.
    pub fn get_sphere_depth(
        &self,
        sphere: &Sphere,
        near_far: DepthRange,
        grow_near_far: bool,
    ) -> AstraResult<DepthRange> {
        if !self.is_valid_camera() {
            return Err(AstraError::InvalidCamera);
        }
        if !sphere.is_valid() {
            return Err(AstraError::InvalidArgument(
                "sphere must be valid".to_string(),
            ));
        }
        let d = (sphere.center - self.camera_location).dot(-self.camera_z);
        let fresh = DepthRange {
            near: d - sphere.radius,
            far: d + sphere.radius,
        };
        Ok(if grow_near_far {
            fresh.union(&near_far)
        } else {
            fresh
        })
    }

    // ===== NEAR/FAR SETTERS =====

    /// Set near and far directly, preserving left/right/bottom/top.
    pub fn set_frustum_near_far(&mut self, near: f64, far: f64) -> AstraResult<()> {
        if !near.is_finite() || !far.is_finite() || near <= 0.0 || near >= far {
            return Err(AstraError::InvalidArgument(
                "near/far must satisfy 0 < near < far".to_string(),
            ));
        }
        self.frustum.near = near;
        self.frustum.far = far;
        Ok(())
    }

    /// Set near/far from a bounding box's extent along the view axis.
    ///
    /// With `grow_near_far` the current near/far range is expanded to
    /// cover the box instead of replaced. Left/right/bottom/top are
    /// preserved.
    pub fn set_frustum_near_far_from_bounding_box(
        &mut self,
        bbox: &BoundingBox,
        grow_near_far: bool,
    ) -> AstraResult<()> {
        let current = DepthRange {
            near: self.frustum.near,
            far: self.frustum.far,
        };
        let range = self.get_bounding_box_depth(bbox, current, grow_near_far)?;
        self.apply_near_far_range(range)
    }

    /// Set near/far from a bounding sphere's extent along the view axis.
    pub fn set_frustum_near_far_from_sphere(
        &mut self,
        sphere: &Sphere,
        grow_near_far: bool,
    ) -> AstraResult<()> {
        let current = DepthRange {
            near: self.frustum.near,
            far: self.frustum.far,
        };
        let range = self.get_sphere_depth(sphere, current, grow_near_far)?;
        self.apply_near_far_range(range)
    }

    /// Clamp a computed depth range against the stored near/far policy
    /// and install it. Bounds behind the camera are pulled forward.
    fn apply_near_far_range(&mut self, range: DepthRange) -> AstraResult<()> {
        let mut far = range.far;
        if !far.is_finite() || far <= 0.0 {
            return Err(AstraError::InvalidArgument(
                "bounds are entirely behind the camera".to_string(),
            ));
        }
        let mut near = range.near;
        let floor = self.min_near_dist.max(far * self.min_near_over_far);
        if near < floor {
            near = floor;
        }
        if near >= far {
            // Degenerate (flat) bounds at a single depth: open the
            // range symmetrically around it.
            far = near * (1.0 + DEFAULT_MIN_NEAR_DIST);
        }
        self.frustum.near = near;
        self.frustum.far = far;
        Ok(())
    }

    /// The "policy" overload: clamp a requested near/far so that
    /// `near >= min_near_dist` and `near/far >= min_near_over_far`,
    /// biasing the clamp toward keeping `target_distance` in view.
    ///
    /// Used to avoid z-fighting at extreme depth-buffer precisions.
    /// Left/right/bottom/top are preserved.
    pub fn set_frustum_near_far_with_policy(
        &mut self,
        near: f64,
        far: f64,
        min_near_dist: f64,
        min_near_over_far: f64,
        target_distance: f64,
    ) -> AstraResult<()> {
        if !near.is_finite() || !far.is_finite() || near <= 0.0 || near >= far {
            return Err(AstraError::InvalidArgument(
                "near/far must satisfy 0 < near < far".to_string(),
            ));
        }
        if !min_near_dist.is_finite() || !min_near_over_far.is_finite() {
            return Err(AstraError::InvalidArgument(
                "near/far constraints must be finite".to_string(),
            ));
        }
        if min_near_over_far < 0.0 || min_near_over_far >= 1.0 {
            return Err(AstraError::InvalidArgument(
                "min near/far ratio must lie in [0, 1)".to_string(),
            ));
        }

        let mut n = near;
        let mut f = far;
        if min_near_dist > 0.0 && n < min_near_dist {
            n = min_near_dist;
        }
        if f <= n {
            f = if min_near_over_far > 0.0 {
                n / min_near_over_far
            } else {
                n * (DEFAULT_FAR_OVER_NEAR)
            };
        }
        if min_near_over_far > 0.0 && n < f * min_near_over_far {
            let target = if target_distance.is_finite() && target_distance > 0.0 {
                target_distance
            } else {
                f
            };
            let raised_near = f * min_near_over_far;
            if raised_near <= target {
                n = raised_near;
            } else {
                // Raising near would clip the target: pull far in instead
                f = (n / min_near_over_far).max(target);
            }
        }
        if !(n < f) {
            return Err(AstraError::InvalidArgument(
                "near/far range collapses under the requested constraints".to_string(),
            ));
        }
        self.frustum.near = n;
        self.frustum.far = f;
        Ok(())
    }

    // ===== CLIPPING PLANES =====

    /// Near clipping plane in world space; the normal points into the
    /// frustum (away from the camera).
    pub fn get_near_plane(&self) -> AstraResult<Plane> {
        self.require_valid_view()?;
        let origin = self.get_frustum_center()?;
        Plane::from_origin_normal(origin, -self.camera_z).ok_or(AstraError::InvalidCamera)
    }

    /// Far clipping plane in world space; the normal points into the
    /// frustum (toward the camera).
    pub fn get_far_plane(&self) -> AstraResult<Plane> {
        self.require_valid_view()?;
        let origin = self.camera_location - self.frustum.far * self.camera_z;
        Plane::from_origin_normal(origin, self.camera_z).ok_or(AstraError::InvalidCamera)
    }

    /// Left wall of the frustum in world space, inward normal.
    pub fn get_frustum_left_plane(&self) -> AstraResult<Plane> {
        self.side_plane(self.frustum.left, self.camera_x, true)
    }

    /// Right wall of the frustum in world space, inward normal.
    pub fn get_frustum_right_plane(&self) -> AstraResult<Plane> {
        self.side_plane(self.frustum.right, self.camera_x, false)
    }

    /// Bottom wall of the frustum in world space, inward normal.
    pub fn get_frustum_bottom_plane(&self) -> AstraResult<Plane> {
        self.side_plane(self.frustum.bottom, self.camera_y, true)
    }

    /// Top wall of the frustum in world space, inward normal.
    pub fn get_frustum_top_plane(&self) -> AstraResult<Plane> {
        self.side_plane(self.frustum.top, self.camera_y, false)
    }

    /// Shared construction of the four side walls. `axis` is camera x
    /// for left/right, camera y for bottom/top; `low_side` is true for
    /// the left/bottom walls whose inward normal points along `+axis`.
    fn side_plane(&self, edge: f64, axis: DVec3, low_side: bool) -> AstraResult<Plane> {
        self.require_valid_view()?;
        if self.is_perspective_projection() {
            // Side walls pass through the camera location and fan out;
            // inward normal derived from the edge slope at the near plane.
            let sign = if low_side { 1.0 } else { -1.0 };
            let normal = sign * (self.frustum.near * axis + edge * self.camera_z);
            Plane::from_origin_normal(self.camera_location, normal)
                .ok_or(AstraError::InvalidFrustum)
        } else {
            let origin = self.camera_location + edge * axis;
            let normal = if low_side { axis } else { -axis };
            Plane::from_origin_normal(origin, normal).ok_or(AstraError::InvalidFrustum)
        }
    }

    // ===== RECTANGLES & PICKING =====

    /// The four world-space corners of the near-plane rectangle,
    /// ordered `[left-bottom, right-bottom, left-top, right-top]`.
    pub fn get_near_rect(&self) -> AstraResult<[DVec3; 4]> {
        self.require_valid_view()?;
        Ok(self.depth_rect(self.frustum.near, 1.0))
    }

    /// The four world-space corners of the far-plane rectangle,
    /// ordered `[left-bottom, right-bottom, left-top, right-top]`.
    pub fn get_far_rect(&self) -> AstraResult<[DVec3; 4]> {
        self.require_valid_view()?;
        let s = if self.is_perspective_projection() {
            self.frustum.far / self.frustum.near
        } else {
            1.0
        };
        Ok(self.depth_rect(self.frustum.far, s))
    }

    fn depth_rect(&self, depth: f64, side_scale: f64) -> [DVec3; 4] {
        let base = self.camera_location - depth * self.camera_z;
        let l = self.frustum.left * side_scale;
        let r = self.frustum.right * side_scale;
        let b = self.frustum.bottom * side_scale;
        let t = self.frustum.top * side_scale;
        [
            base + l * self.camera_x + b * self.camera_y,
            base + r * self.camera_x + b * self.camera_y,
            base + l * self.camera_x + t * self.camera_y,
            base + r * self.camera_x + t * self.camera_y,
        ]
    }

    /// The world-space ray corresponding to a normalized screen point,
    /// as a segment from the near plane to the far plane.
    ///
    /// `screen_x`/`screen_y` are normalized to `[0, 1]` across the
    /// screen port, origin at the bottom-left; values outside the unit
    /// square extrapolate. This is the fundamental picking primitive.
    pub fn get_frustum_line(&self, screen_x: f64, screen_y: f64) -> AstraResult<Line> {
        self.require_valid_view()?;
        if !screen_x.is_finite() || !screen_y.is_finite() {
            return Err(AstraError::InvalidArgument(
                "screen coordinates must be finite".to_string(),
            ));
        }
        let xc = self.frustum.left + screen_x * self.frustum.width();
        let yc = self.frustum.bottom + screen_y * self.frustum.height();
        let near_point = self.camera_location + xc * self.camera_x + yc * self.camera_y
            - self.frustum.near * self.camera_z;
        let s = if self.is_perspective_projection() {
            self.frustum.far / self.frustum.near
        } else {
            1.0
        };
        let far_point = self.camera_location + xc * s * self.camera_x + yc * s * self.camera_y
            - self.frustum.far * self.camera_z;
        Ok(Line::new(near_point, far_point))
    }

    // ===== PERSPECTIVE NEAR/FAR POLICY =====

    /// Compute `{min_near_dist, min_near_over_far}` bounds from a depth
    /// buffer bit depth and the camera's distance from the world origin.
    ///
    /// Pure function of its inputs; does not touch viewport state. Use
    /// the result to seed [`Viewport::set_frustum_near_far_with_policy`].
    pub fn get_perspective_clipping_plane_constraints(
        camera_location: DVec3,
        depth_buffer_bit_depth: u32,
    ) -> ClippingPlaneConstraints {
        let min_near_over_far = if depth_buffer_bit_depth >= 32 {
            1.0e-4
        } else if depth_buffer_bit_depth >= 24 {
            5.0e-4
        } else if depth_buffer_bit_depth >= 16 {
            5.0e-3
        } else {
            1.0e-2
        };
        let mut min_near_dist = DEFAULT_MIN_NEAR_DIST;
        // Far from the origin the representable depth resolution thins
        // out; scale the near floor with the coordinate magnitude.
        let magnitude = camera_location.abs().max_element();
        if magnitude.is_finite() && magnitude > 1.0e5 {
            min_near_dist *= magnitude * 1.0e-5;
        }
        ClippingPlaneConstraints {
            min_near_dist,
            min_near_over_far,
        }
    }

    /// Derive and store the near/far policy for this viewport's camera
    /// location at the given depth buffer precision.
    pub fn set_perspective_clipping_plane_constraints(&mut self, depth_buffer_bit_depth: u32) {
        let c = Self::get_perspective_clipping_plane_constraints(
            self.camera_location,
            depth_buffer_bit_depth,
        );
        self.min_near_dist = c.min_near_dist;
        self.min_near_over_far = c.min_near_over_far;
    }

    /// Stored lower bound for the perspective near distance.
    pub fn perspective_min_near_dist(&self) -> f64 {
        self.min_near_dist
    }

    /// Set the lower bound for the perspective near distance.
    pub fn set_perspective_min_near_dist(&mut self, min_near_dist: f64) -> AstraResult<()> {
        if !min_near_dist.is_finite() || min_near_dist <= 0.0 {
            return Err(AstraError::InvalidArgument(
                "minimum near distance must be positive".to_string(),
            ));
        }
        self.min_near_dist = min_near_dist;
        Ok(())
    }

    /// Stored lower bound for the perspective near/far ratio.
    pub fn perspective_min_near_over_far(&self) -> f64 {
        self.min_near_over_far
    }

    /// Set the lower bound for the perspective near/far ratio.
    pub fn set_perspective_min_near_over_far(&mut self, ratio: f64) -> AstraResult<()> {
        if !ratio.is_finite() || ratio <= 0.0 || ratio >= 1.0 {
            return Err(AstraError::InvalidArgument(
                "minimum near/far ratio must lie in (0, 1)".to_string(),
            ));
        }
        self.min_near_over_far = ratio;
        Ok(())
    }

    /// Camera and frustum validity gate shared by the world-space
    /// frustum queries.
    pub(super) fn require_valid_view(&self) -> AstraResult<()> {
        if !self.is_valid_camera() {
            return Err(AstraError::InvalidCamera);
        }
        if !self.frustum.is_valid() {
            return Err(AstraError::InvalidFrustum);
        }
        Ok(())
    }
}

/// Far/near stretch used when a policy clamp is asked to repair an
/// inverted range without a usable ratio.
const DEFAULT_FAR_OVER_NEAR: f64 = 1.0e4;

#[cfg(test)]
#[path = "frustum_tests.rs"]
mod tests;

/// Projection operations — view angle, 35mm lens length, and the
/// projection-mode state machine.
///
/// Mode transitions preserve the apparent framing at a caller-supplied
/// target distance: the cross-section of the old view volume at that
/// distance is re-expressed under the new projection. All transitions
/// fail without state change when the camera or frustum is invalid.

use glam::DVec3;

use crate::astra_debug;
use crate::error::{AstraError, AstraResult};
use super::frustum::Frustum;
use super::viewport::{
    camera_frame_from, CameraLocks, FrustumSymmetry, Projection, Viewport, LENS_HALF_FRAME_MM,
};

/// The three half-angles of a perspective frustum, returned atomically
/// by [`Viewport::get_camera_angles`]. These are distinct queries: the
/// single-output [`Viewport::get_camera_angle`] is the half-angle of
/// the *smaller* frustum dimension, not any of these in particular.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraAngles {
    /// Half-angle across the frustum diagonal
    pub half_diagonal: f64,
    /// Half-angle across the frustum height
    pub half_vertical: f64,
    /// Half-angle across the frustum width
    pub half_horizontal: f64,
}

impl Viewport {
    // ===== VIEW ANGLE =====

    /// Half-angle of the smaller frustum dimension, in radians.
    pub fn get_camera_angle(&self) -> AstraResult<f64> {
        let angles = self.get_camera_angles()?;
        Ok(angles.half_vertical.min(angles.half_horizontal))
    }

    /// Half-diagonal, half-vertical and half-horizontal view angles.
    pub fn get_camera_angles(&self) -> AstraResult<CameraAngles> {
        if !self.frustum.is_valid() {
            return Err(AstraError::InvalidFrustum);
        }
        let half_w = 0.5 * self.frustum.width();
        let half_h = 0.5 * self.frustum.height();
        let near = self.frustum.near;
        Ok(CameraAngles {
            half_diagonal: (half_w.hypot(half_h) / near).atan(),
            half_vertical: (half_h / near).atan(),
            half_horizontal: (half_w / near).atan(),
        })
    }

    /// Set the half-angle of the smaller frustum dimension.
    ///
    /// The frustum becomes symmetric; the aspect ratio and near/far
    /// distances are preserved.
    pub fn set_camera_angle(&mut self, half_angle: f64) -> AstraResult<()> {
        if !half_angle.is_finite() || half_angle <= 0.0 || half_angle >= std::f64::consts::FRAC_PI_2
        {
            return Err(AstraError::InvalidArgument(
                "half angle must lie in (0, pi/2)".to_string(),
            ));
        }
        if !self.frustum.is_valid() {
            return Err(AstraError::InvalidFrustum);
        }
        let w = self.frustum.width();
        let h = self.frustum.height();
        let half_min = self.frustum.near * half_angle.tan();
        let (half_w, half_h) = if w <= h {
            (half_min, half_min * h / w)
        } else {
            (half_min * w / h, half_min)
        };
        self.frustum.left = -half_w;
        self.frustum.right = half_w;
        self.frustum.bottom = -half_h;
        self.frustum.top = half_h;
        Ok(())
    }

    // ===== 35MM LENS LENGTH =====

    /// The 35mm-equivalent lens length implied by the current frustum,
    /// measured against the 24mm short side of a 35mm film frame.
    pub fn get_camera_35mm_lens_length(&self) -> AstraResult<f64> {
        if !self.frustum.is_valid() {
            return Err(AstraError::InvalidFrustum);
        }
        let half_min = 0.5 * self.frustum.width().min(self.frustum.height());
        Ok(LENS_HALF_FRAME_MM * self.frustum.near / half_min)
    }

    /// Set the frustum angle from a 35mm-equivalent lens length.
    pub fn set_camera_35mm_lens_length(&mut self, lens_length: f64) -> AstraResult<()> {
        if !lens_length.is_finite() || lens_length <= 0.0 {
            return Err(AstraError::InvalidArgument(
                "lens length must be positive".to_string(),
            ));
        }
        self.set_camera_angle((LENS_HALF_FRAME_MM / lens_length).atan())
    }

    // ===== PROJECTION TRANSITIONS =====

    /// Convert to a parallel (orthographic) projection, preserving the
    /// apparent framing at the target distance.
    ///
    /// With `symmetric_frustum` the frustum is recentered on the view
    /// axis and symmetry enforcement is enabled on both axes.
    pub fn change_to_parallel_projection(&mut self, symmetric_frustum: bool) -> AstraResult<()> {
        self.require_valid_view()?;
        let was_perspective = self.is_perspective_projection();
        // A two-point perspective locks the up vector; leaving the mode
        // releases it.
        self.camera_locks.remove(CameraLocks::UP);
        self.projection = Projection::Parallel;

        if was_perspective {
            // Widen the box to the cross-section at the target distance
            // so the subject keeps its apparent size.
            if let Some(d) = self.target_distance(true) {
                if d.is_finite() && d > 0.0 {
                    let s = d / self.frustum.near;
                    self.frustum.left *= s;
                    self.frustum.right *= s;
                    self.frustum.bottom *= s;
                    self.frustum.top *= s;
                }
            }
        }

        self.symmetry = FrustumSymmetry::empty();
        if symmetric_frustum {
            self.set_frustum_left_right_symmetry(true);
            self.set_frustum_top_bottom_symmetry(true);
        }
        astra_debug!("astra::Viewport", "changed to parallel projection");
        Ok(())
    }

    /// Convert to a perspective projection with the given
    /// 35mm-equivalent lens length, preserving the apparent framing at
    /// `target_distance`.
    ///
    /// Fails if the camera/frustum is invalid or either distance is not
    /// strictly positive.
    pub fn change_to_perspective_projection(
        &mut self,
        target_distance: f64,
        symmetric_frustum: bool,
        lens_length: f64,
    ) -> AstraResult<()> {
        self.require_valid_view()?;
        validate_transition_args(target_distance, lens_length)?;

        let (half_w, half_h, cx, cy) = self.framed_cross_section(target_distance, lens_length);

        self.camera_locks.remove(CameraLocks::UP);
        self.projection = Projection::Perspective;
        self.install_perspective_frustum(
            target_distance,
            half_w,
            half_h,
            if symmetric_frustum { 0.0 } else { cx },
            if symmetric_frustum { 0.0 } else { cy },
        );
        self.symmetry = FrustumSymmetry::empty();
        if symmetric_frustum {
            self.symmetry = FrustumSymmetry::LEFT_RIGHT | FrustumSymmetry::TOP_BOTTOM;
        }
        astra_debug!(
            "astra::Viewport",
            "changed to perspective projection (lens {} mm)",
            lens_length
        );
        Ok(())
    }

    /// Convert to a two-point perspective: vertical lines stay parallel
    /// to the supplied up vector (architectural perspective).
    ///
    /// The camera frame is re-derived so that image-up equals `up`
    /// exactly and the view axis is horizontal with respect to it; the
    /// up vector is then locked and the frustum made left/right
    /// symmetric.
    pub fn change_to_two_point_perspective_projection(
        &mut self,
        target_distance: f64,
        up: DVec3,
        lens_length: f64,
    ) -> AstraResult<()> {
        self.require_valid_view()?;
        validate_transition_args(target_distance, lens_length)?;
        if !up.is_finite() || up.length_squared() <= f64::EPSILON {
            return Err(AstraError::InvalidArgument(
                "up must be a finite non-zero vector".to_string(),
            ));
        }
        // Tilt the view axis into the horizontal plane of `up`; image
        // verticals then project parallel.
        let y = up.normalize();
        let z_raw = self.camera_z - self.camera_z.dot(y) * y;
        if z_raw.length_squared() <= 1.0e-24 {
            return Err(AstraError::InvalidArgument(
                "up must not be parallel to the view direction".to_string(),
            ));
        }
        let direction = -z_raw.normalize();
        let (x, y, z) =
            camera_frame_from(direction, y).ok_or(AstraError::InvalidCamera)?;

        let (half_w, half_h, _cx, cy) = self.framed_cross_section(target_distance, lens_length);

        self.projection = Projection::TwoPointPerspective;
        self.camera_direction = -z;
        self.camera_up = y;
        self.camera_x = x;
        self.camera_y = y;
        self.camera_z = z;
        self.install_perspective_frustum(target_distance, half_w, half_h, 0.0, cy);
        self.symmetry = FrustumSymmetry::LEFT_RIGHT;
        self.camera_locks.insert(CameraLocks::UP);
        astra_debug!(
            "astra::Viewport",
            "changed to two-point perspective projection (lens {} mm)",
            lens_length
        );
        Ok(())
    }

    /// Make the requested frustum axes symmetric around the view axis,
    /// preserving the apparent field of view at `target_distance`.
    ///
    /// The camera is shifted laterally so that what was centered at the
    /// target distance stays centered; fails if that shift is needed
    /// while the camera location is locked.
    pub fn change_to_symmetric_frustum(
        &mut self,
        is_left_right_symmetric: bool,
        is_top_bottom_symmetric: bool,
        target_distance: f64,
    ) -> AstraResult<()> {
        self.require_valid_view()?;
        if !target_distance.is_finite() || target_distance <= 0.0 {
            return Err(AstraError::InvalidArgument(
                "target distance must be positive".to_string(),
            ));
        }
        let dx = if is_left_right_symmetric {
            0.5 * (self.frustum.left + self.frustum.right)
        } else {
            0.0
        };
        let dy = if is_top_bottom_symmetric {
            0.5 * (self.frustum.bottom + self.frustum.top)
        } else {
            0.0
        };
        if dx != 0.0 || dy != 0.0 {
            if self.camera_location_is_locked() {
                return Err(AstraError::Locked("camera location"));
            }
            // Frustum offsets are near-plane values; at the target
            // distance a perspective cross-section scales them up.
            let s = if self.is_perspective_projection() {
                target_distance / self.frustum.near
            } else {
                1.0
            };
            self.camera_location += (dx * s) * self.camera_x + (dy * s) * self.camera_y;
            self.frustum.left -= dx;
            self.frustum.right -= dx;
            self.frustum.bottom -= dy;
            self.frustum.top -= dy;
        }
        self.symmetry
            .set(FrustumSymmetry::LEFT_RIGHT, is_left_right_symmetric);
        self.symmetry
            .set(FrustumSymmetry::TOP_BOTTOM, is_top_bottom_symmetric);
        Ok(())
    }

    /// Cross-section of the current view volume at `target_distance`,
    /// re-framed to the given lens length: returns half-width,
    /// half-height and the center offsets, all at the target distance.
    /// The current aspect ratio is preserved; the lens angle is applied
    /// to the smaller dimension.
    fn framed_cross_section(&self, target_distance: f64, lens_length: f64) -> (f64, f64, f64, f64) {
        let s = if self.is_perspective_projection() {
            target_distance / self.frustum.near
        } else {
            1.0
        };
        let old_half_w = 0.5 * self.frustum.width() * s;
        let old_half_h = 0.5 * self.frustum.height() * s;
        let cx = 0.5 * (self.frustum.left + self.frustum.right) * s;
        let cy = 0.5 * (self.frustum.bottom + self.frustum.top) * s;

        let tan_half = LENS_HALF_FRAME_MM / lens_length;
        let half_min = target_distance * tan_half;
        let (half_w, half_h) = if old_half_w <= old_half_h {
            (half_min, half_min * old_half_h / old_half_w)
        } else {
            (half_min * old_half_w / old_half_h, half_min)
        };
        (half_w, half_h, cx, cy)
    }

    /// Install a perspective frustum whose cross-section at
    /// `target_distance` is the given half-extents around the given
    /// center offsets. Near/far are kept but near is clamped to the
    /// stored perspective policy.
    fn install_perspective_frustum(
        &mut self,
        target_distance: f64,
        half_w: f64,
        half_h: f64,
        cx: f64,
        cy: f64,
    ) {
        let mut near = self.frustum.near;
        let mut far = self.frustum.far;
        let floor = self.min_near_dist.max(far * self.min_near_over_far);
        if near < floor {
            near = floor;
        }
        if near >= far {
            far = near / self.min_near_over_far.max(f64::MIN_POSITIVE);
        }
        let k = near / target_distance;
        self.frustum = Frustum {
            left: (cx - half_w) * k,
            right: (cx + half_w) * k,
            bottom: (cy - half_h) * k,
            top: (cy + half_h) * k,
            near,
            far,
        };
    }
}

/// Shared validation for the perspective transitions.
fn validate_transition_args(target_distance: f64, lens_length: f64) -> AstraResult<()> {
    if !target_distance.is_finite() || target_distance <= 0.0 {
        return Err(AstraError::InvalidArgument(
            "target distance must be positive".to_string(),
        ));
    }
    if !lens_length.is_finite() || lens_length <= 0.0 {
        return Err(AstraError::InvalidArgument(
            "lens length must be positive".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
#[path = "projection_tests.rs"]
mod tests;

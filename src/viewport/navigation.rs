/// Navigation — extents framing, zoom-to-rectangle and the dolly
/// operations.
///
/// Every operation here moves the camera or reshapes the frustum as a
/// unit, so each one validates the current view first and honors the
/// camera location lock before touching anything.

use glam::DVec3;

use crate::astra_trace;
use crate::error::{AstraError, AstraResult};
use crate::geometry::{BoundingBox, Sphere};
use super::viewport::Viewport;

impl Viewport {
    // ===== EXTENTS =====

    /// Position the camera along its current view axis so the sphere
    /// fills the view at the given half-angle, and fit the frustum to
    /// it. The view direction is unchanged; the sphere center becomes
    /// the target point.
    pub fn extents_sphere(&mut self, half_view_angle: f64, sphere: Sphere) -> AstraResult<()> {
        self.require_valid_view()?;
        if !half_view_angle.is_finite()
            || half_view_angle <= 0.0
            || half_view_angle >= std::f64::consts::FRAC_PI_2
        {
            return Err(AstraError::InvalidArgument(
                "half view angle must lie in (0, pi/2)".to_string(),
            ));
        }
        if !sphere.is_valid() || sphere.radius <= 0.0 {
            return Err(AstraError::InvalidArgument(
                "sphere must be valid with positive radius".to_string(),
            ));
        }
        if self.camera_location_is_locked() {
            return Err(AstraError::Locked("camera location"));
        }

        // Back the camera off until the sphere subtends the view angle.
        let dist = sphere.radius / half_view_angle.sin();
        self.camera_location = sphere.center + dist * self.camera_z;
        self.target_point = Some(sphere.center);

        let far = dist + sphere.radius;
        let near_floor = self.min_near_dist.max(far * self.min_near_over_far);
        let near = (dist - sphere.radius).max(near_floor);

        let half_min = if self.is_perspective_projection() {
            near * half_view_angle.tan()
        } else {
            sphere.radius
        };
        let aspect = self.frustum.width() / self.frustum.height();
        let (half_w, half_h) = if aspect >= 1.0 {
            (half_min * aspect, half_min)
        } else {
            (half_min, half_min / aspect)
        };
        self.frustum.left = -half_w;
        self.frustum.right = half_w;
        self.frustum.bottom = -half_h;
        self.frustum.top = half_h;
        self.frustum.near = near;
        self.frustum.far = far;
        astra_trace!(
            "astra::Viewport",
            "extents: camera pulled to distance {}",
            dist
        );
        Ok(())
    }

    /// Frame a bounding box: fits the box's bounding sphere.
    pub fn extents_bbox(&mut self, half_view_angle: f64, bbox: BoundingBox) -> AstraResult<()> {
        if !bbox.is_valid() {
            return Err(AstraError::InvalidArgument(
                "bounding box must be valid".to_string(),
            ));
        }
        let mut sphere = bbox.bounding_sphere();
        if sphere.radius <= 0.0 {
            // Degenerate box (a point); give it a small apparent size.
            sphere.radius = 1.0;
        }
        self.extents_sphere(half_view_angle, sphere)
    }

    // ===== ZOOM =====

    /// Narrow the frustum to the part of the view covered by a screen
    /// rectangle, given in port pixel coordinates.
    ///
    /// A frustum that was symmetric stays symmetric: the camera is
    /// shifted laterally instead of leaving the frustum off-center.
    /// That shift honors the camera location lock.
    pub fn zoom_to_screen_rect(
        &mut self,
        screen_left: i32,
        screen_top: i32,
        screen_right: i32,
        screen_bottom: i32,
    ) -> AstraResult<()> {
        self.require_valid_view()?;
        if !self.screen_port.is_valid() {
            return Err(AstraError::InvalidScreenPort);
        }
        if screen_left == screen_right || screen_top == screen_bottom {
            return Err(AstraError::InvalidArgument(
                "screen rectangle must have nonzero extent".to_string(),
            ));
        }

        let port = self.screen_port;
        let u = |x: i32| (x - port.left) as f64 / (port.right - port.left) as f64;
        let v = |y: i32| (y - port.bottom) as f64 / (port.top - port.bottom) as f64;
        let (u_lo, u_hi) = min_max(u(screen_left), u(screen_right));
        let (v_lo, v_hi) = min_max(v(screen_bottom), v(screen_top));

        let f = self.frustum;
        let new_left = f.left + u_lo * f.width();
        let new_right = f.left + u_hi * f.width();
        let new_bottom = f.bottom + v_lo * f.height();
        let new_top = f.bottom + v_hi * f.height();

        let want_lr = self.frustum_is_left_right_symmetric();
        let want_tb = self.frustum_is_top_bottom_symmetric();

        self.frustum.left = new_left;
        self.frustum.right = new_right;
        self.frustum.bottom = new_bottom;
        self.frustum.top = new_top;

        if want_lr || want_tb {
            let d = self
                .target_distance(true)
                .unwrap_or(0.5 * (f.near + f.far));
            // Recentering only; the enforcement flags stay as they were.
            let flags = self.symmetry;
            let result = self.change_to_symmetric_frustum(want_lr, want_tb, d);
            self.symmetry = flags;
            if let Err(e) = result {
                // Roll back so a locked camera leaves the view untouched.
                self.frustum = f;
                return Err(e);
            }
        }
        astra_trace!("astra::Viewport", "zoomed to screen rectangle");
        Ok(())
    }

    // ===== DOLLY =====

    /// Translate the camera by a world vector. The frustum is carried
    /// along unchanged.
    pub fn dolly_camera(&mut self, dolly_vector: DVec3) -> AstraResult<()> {
        if !dolly_vector.is_finite() {
            return Err(AstraError::InvalidArgument(
                "dolly vector must be finite".to_string(),
            ));
        }
        if self.camera_location_is_locked() {
            return Err(AstraError::Locked("camera location"));
        }
        self.camera_location += dolly_vector;
        Ok(())
    }

    /// World vector that moves the scene point under screen position
    /// `(x0, y0)` to appear under `(x1, y1)`, for points on the plane
    /// at `projection_plane_distance` in front of the camera.
    ///
    /// Apply the result with [`Viewport::dolly_camera`].
    pub fn get_dolly_camera_vector(
        &self,
        screen_x0: i32,
        screen_y0: i32,
        screen_x1: i32,
        screen_y1: i32,
        projection_plane_distance: f64,
    ) -> AstraResult<DVec3> {
        self.require_valid_view()?;
        if !self.screen_port.is_valid() {
            return Err(AstraError::InvalidScreenPort);
        }
        if !projection_plane_distance.is_finite() || projection_plane_distance <= 0.0 {
            return Err(AstraError::InvalidArgument(
                "projection plane distance must be positive".to_string(),
            ));
        }
        let p0 = self.world_point_at(screen_x0, screen_y0, projection_plane_distance);
        let p1 = self.world_point_at(screen_x1, screen_y1, projection_plane_distance);
        // Moving the camera by p0 - p1 moves the image of p0 onto the
        // old image of p1.
        Ok(p0 - p1)
    }

    /// World point on the plane `depth` units in front of the camera
    /// under the given port pixel.
    fn world_point_at(&self, screen_x: i32, screen_y: i32, depth: f64) -> DVec3 {
        let port = self.screen_port;
        let u = (screen_x - port.left) as f64 / (port.right - port.left) as f64;
        let v = (screen_y - port.bottom) as f64 / (port.top - port.bottom) as f64;
        let f = self.frustum;
        let mut xc = f.left + u * f.width();
        let mut yc = f.bottom + v * f.height();
        if self.is_perspective_projection() {
            let s = depth / f.near;
            xc *= s;
            yc *= s;
        }
        self.camera_location + xc * self.camera_x + yc * self.camera_y - depth * self.camera_z
    }

    /// Move the near and far planes by `dolly_distance` along the view
    /// axis (positive pushes them away from the camera).
    ///
    /// For a perspective projection the side walls are rescaled so the
    /// field of view is preserved; dollying out and back by the same
    /// distance restores the original frustum.
    pub fn dolly_frustum(&mut self, dolly_distance: f64) -> AstraResult<()> {
        if !dolly_distance.is_finite() {
            return Err(AstraError::InvalidArgument(
                "dolly distance must be finite".to_string(),
            ));
        }
        if !self.frustum.is_valid() {
            return Err(AstraError::InvalidFrustum);
        }
        let new_near = self.frustum.near + dolly_distance;
        let new_far = self.frustum.far + dolly_distance;
        if new_near <= 0.0 {
            return Err(AstraError::InvalidArgument(
                "dolly would move the near plane behind the camera".to_string(),
            ));
        }
        if self.is_perspective_projection() {
            let s = new_near / self.frustum.near;
            self.frustum.left *= s;
            self.frustum.right *= s;
            self.frustum.bottom *= s;
            self.frustum.top *= s;
        }
        self.frustum.near = new_near;
        self.frustum.far = new_far;
        Ok(())
    }
}

fn min_max(a: f64, b: f64) -> (f64, f64) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

#[cfg(test)]
#[path = "navigation_tests.rs"]
mod tests;

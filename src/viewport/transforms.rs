/// Screen port and coordinate-system transforms.
///
/// Four coordinate systems are chained: world, camera, clip and screen.
/// `get_xform` composes the forward matrices between any two stages (or
/// inverts the reverse composition when going backwards). Clip space is
/// the unit cube [-1,1]^3 with the near plane at z = -1; matrices are
/// column-major, matching glam.

use glam::{DMat4, DVec3, DVec4};

use crate::error::{AstraError, AstraResult};
use super::viewport::Viewport;

/// Screen port rectangle in integer pixel coordinates, plus a depth
/// range for the z component of screen points.
///
/// `left`/`right` and `bottom`/`top` may run in either direction; a
/// port is degenerate only when an axis has zero extent. `near`/`far`
/// are the screen-space depth bounds (typically 0 and 1).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenPort {
    pub left: i32,
    pub right: i32,
    pub bottom: i32,
    pub top: i32,
    pub near: i32,
    pub far: i32,
}

impl ScreenPort {
    /// A port is valid when both axes have nonzero extent.
    pub fn is_valid(&self) -> bool {
        self.left != self.right && self.bottom != self.top
    }

    /// Signed width, `right - left`.
    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    /// Signed height, `top - bottom`.
    pub fn height(&self) -> i32 {
        self.top - self.bottom
    }
}

/// The four coordinate systems a viewport maps between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoordSystem {
    /// World coordinates, the application's modeling space
    World,
    /// Camera coordinates: origin at the camera location, x right,
    /// y up, camera looking down -z
    Camera,
    /// Normalized clip coordinates in [-1,1]^3
    Clip,
    /// Screen port pixel coordinates
    Screen,
}

impl CoordSystem {
    fn stage(self) -> usize {
        match self {
            CoordSystem::World => 0,
            CoordSystem::Camera => 1,
            CoordSystem::Clip => 2,
            CoordSystem::Screen => 3,
        }
    }
}

impl Viewport {
    // ===== SCREEN PORT =====

    /// The current screen port.
    pub fn get_screen_port(&self) -> ScreenPort {
        self.screen_port
    }

    /// Set the screen port. Fails on a zero-extent axis.
    pub fn set_screen_port(&mut self, port: ScreenPort) -> AstraResult<()> {
        if !port.is_valid() {
            return Err(AstraError::InvalidScreenPort);
        }
        self.screen_port = port;
        Ok(())
    }

    /// Aspect ratio of the screen port, |width / height|.
    pub fn get_screen_port_aspect(&self) -> AstraResult<f64> {
        if !self.screen_port.is_valid() {
            return Err(AstraError::InvalidScreenPort);
        }
        Ok((self.screen_port.width() as f64 / self.screen_port.height() as f64).abs())
    }

    // ===== COORDINATE TRANSFORMS =====

    /// Transform matrix mapping `src` coordinates to `dst` coordinates.
    ///
    /// The identity is returned when `src == dst`; otherwise the camera
    /// and frustum must be valid, and a screen endpoint additionally
    /// requires a valid screen port.
    pub fn get_xform(&self, src: CoordSystem, dst: CoordSystem) -> AstraResult<DMat4> {
        if src == dst {
            return Ok(DMat4::IDENTITY);
        }
        self.require_valid_view()?;
        let (a, b) = (src.stage(), dst.stage());
        if (a.max(b) == 3) && !self.screen_port.is_valid() {
            return Err(AstraError::InvalidScreenPort);
        }
        if a < b {
            // Forward: multiply the stage matrices from src up to dst.
            let mut m = DMat4::IDENTITY;
            for stage in a..b {
                m = self.stage_xform(stage) * m;
            }
            Ok(m)
        } else {
            // Backward: invert the forward composition.
            let mut m = DMat4::IDENTITY;
            for stage in b..a {
                m = self.stage_xform(stage) * m;
            }
            let det = m.determinant();
            if !det.is_finite() || det == 0.0 {
                return Err(AstraError::InvalidFrustum);
            }
            Ok(m.inverse())
        }
    }

    /// Forward matrix for one stage of the world -> camera -> clip ->
    /// screen chain.
    fn stage_xform(&self, stage: usize) -> DMat4 {
        match stage {
            0 => self.world_to_camera(),
            1 => self.camera_to_clip(),
            _ => self.clip_to_screen(),
        }
    }

    fn world_to_camera(&self) -> DMat4 {
        let (x, y, z) = (self.camera_x, self.camera_y, self.camera_z);
        let loc = self.camera_location;
        DMat4::from_cols(
            DVec4::new(x.x, y.x, z.x, 0.0),
            DVec4::new(x.y, y.y, z.y, 0.0),
            DVec4::new(x.z, y.z, z.z, 0.0),
            DVec4::new(-x.dot(loc), -y.dot(loc), -z.dot(loc), 1.0),
        )
    }

    fn camera_to_clip(&self) -> DMat4 {
        let f = &self.frustum;
        let (l, r, b, t, n, fr) = (f.left, f.right, f.bottom, f.top, f.near, f.far);
        let proj = if self.is_perspective_projection() {
            DMat4::from_cols(
                DVec4::new(2.0 * n / (r - l), 0.0, 0.0, 0.0),
                DVec4::new(0.0, 2.0 * n / (t - b), 0.0, 0.0),
                DVec4::new(
                    (r + l) / (r - l),
                    (t + b) / (t - b),
                    -(fr + n) / (fr - n),
                    -1.0,
                ),
                DVec4::new(0.0, 0.0, -2.0 * fr * n / (fr - n), 0.0),
            )
        } else {
            DMat4::from_cols(
                DVec4::new(2.0 / (r - l), 0.0, 0.0, 0.0),
                DVec4::new(0.0, 2.0 / (t - b), 0.0, 0.0),
                DVec4::new(0.0, 0.0, -2.0 / (fr - n), 0.0),
                DVec4::new(
                    -(r + l) / (r - l),
                    -(t + b) / (t - b),
                    -(fr + n) / (fr - n),
                    1.0,
                ),
            )
        };
        let scale = DMat4::from_scale(DVec3::new(
            self.view_scale_width,
            self.view_scale_height,
            1.0,
        ));
        self.clip_mod * scale * proj
    }

    fn clip_to_screen(&self) -> DMat4 {
        let p = &self.screen_port;
        let (pl, pr) = (p.left as f64, p.right as f64);
        let (pb, pt) = (p.bottom as f64, p.top as f64);
        let (pn, pf) = (p.near as f64, p.far as f64);
        // Affine map from [-1,1] per axis to port pixel ranges.
        DMat4::from_cols(
            DVec4::new(0.5 * (pr - pl), 0.0, 0.0, 0.0),
            DVec4::new(0.0, 0.5 * (pt - pb), 0.0, 0.0),
            DVec4::new(0.0, 0.0, 0.5 * (pf - pn), 0.0),
            DVec4::new(0.5 * (pr + pl), 0.5 * (pt + pb), 0.5 * (pf + pn), 1.0),
        )
    }

    /// Pixels per world unit at the given world point.
    ///
    /// For a perspective projection the point must be strictly in front
    /// of the camera.
    pub fn get_world_to_screen_scale(&self, point: DVec3) -> AstraResult<f64> {
        self.require_valid_view()?;
        if !self.screen_port.is_valid() {
            return Err(AstraError::InvalidScreenPort);
        }
        if !point.is_finite() {
            return Err(AstraError::InvalidArgument(
                "point must be finite".to_string(),
            ));
        }
        let width_at_depth = if self.is_perspective_projection() {
            let depth = (point - self.camera_location).dot(-self.camera_z);
            if depth <= 0.0 {
                return Err(AstraError::InvalidArgument(
                    "point is behind the camera".to_string(),
                ));
            }
            self.frustum.width() * depth / self.frustum.near
        } else {
            self.frustum.width()
        };
        Ok(self.view_scale_width * (self.screen_port.width() as f64).abs() / width_at_depth)
    }

    // ===== CLIP MOD TRANSFORM =====

    /// Extra transform applied after the projection, in clip space.
    pub fn clip_mod_xform(&self) -> DMat4 {
        self.clip_mod
    }

    /// Inverse of the clip mod transform.
    pub fn clip_mod_inverse_xform(&self) -> DMat4 {
        self.clip_mod_inverse
    }

    /// True when no clip mod transform is installed.
    pub fn clip_mod_xform_is_identity(&self) -> bool {
        self.clip_mod == DMat4::IDENTITY
    }

    /// Install a clip mod transform. The matrix must be finite and
    /// invertible; the inverse is computed and stored with it.
    pub fn set_clip_mod_xform(&mut self, xform: DMat4) -> AstraResult<()> {
        let cols = [xform.x_axis, xform.y_axis, xform.z_axis, xform.w_axis];
        if cols.iter().any(|c| !c.is_finite()) {
            return Err(AstraError::InvalidArgument(
                "clip mod transform must be finite".to_string(),
            ));
        }
        let det = xform.determinant();
        if !det.is_finite() || det == 0.0 {
            return Err(AstraError::InvalidArgument(
                "clip mod transform must be invertible".to_string(),
            ));
        }
        self.clip_mod = xform;
        self.clip_mod_inverse = xform.inverse();
        Ok(())
    }

    /// Remove any installed clip mod transform.
    pub fn clear_clip_mod_xform(&mut self) {
        self.clip_mod = DMat4::IDENTITY;
        self.clip_mod_inverse = DMat4::IDENTITY;
    }

    // ===== VIEW SCALE =====

    /// The (width, height) view scale applied in clip space.
    pub fn get_view_scale(&self) -> (f64, f64) {
        (self.view_scale_width, self.view_scale_height)
    }

    /// Set the view scale. Both factors must be finite and positive.
    pub fn set_view_scale(&mut self, width: f64, height: f64) -> AstraResult<()> {
        if !width.is_finite() || width <= 0.0 || !height.is_finite() || height <= 0.0 {
            return Err(AstraError::InvalidArgument(
                "view scale factors must be positive".to_string(),
            ));
        }
        self.view_scale_width = width;
        self.view_scale_height = height;
        Ok(())
    }
}

#[cfg(test)]
#[path = "transforms_tests.rs"]
mod tests;

/// Viewport — camera state, lifecycle and validity.
///
/// The viewport owns the full camera/frustum aggregate. This file holds
/// the state definition, construction (default / copy via `Clone`),
/// the camera control surface (location, direction, up, orthonormal
/// frame, lock flags) and the validity predicates. Frustum, projection,
/// transform and navigation operations live in the sibling files of
/// this module.

use bitflags::bitflags;
use glam::{DMat4, DVec3};
use uuid::Uuid;

use crate::error::{AstraError, AstraResult};
use super::frustum::Frustum;
use super::transforms::ScreenPort;

/// Projection mode. The three modes are mutually exclusive; changing
/// mode is a deliberate transition (`change_to_*_projection`), not a
/// raw flag flip, because frustum symmetry and near/far policy must be
/// re-derived consistently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Projection {
    /// Orthographic view volume
    Parallel,
    /// Perspective with vertical lines kept parallel (architectural)
    TwoPointPerspective,
    /// Standard perspective
    Perspective,
}

bitflags! {
    /// Camera field locks. Locks are a cooperative-protocol guard:
    /// a locked field rejects its setter, nothing more.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct CameraLocks: u8 {
        /// Camera location is locked
        const LOCATION  = 1 << 0;
        /// Camera direction is locked
        const DIRECTION = 1 << 1;
        /// Camera up vector is locked
        const UP        = 1 << 2;
    }
}

bitflags! {
    /// Frustum symmetry enforcement flags. When a flag is set, frustum
    /// setters keep that axis centered on the view axis.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct FrustumSymmetry: u8 {
        /// Keep `left == -right`
        const LEFT_RIGHT = 1 << 0;
        /// Keep `bottom == -top`
        const TOP_BOTTOM = 1 << 1;
    }
}

/// Camera frame: location plus the three orthonormal basis vectors,
/// returned atomically by [`Viewport::get_camera_frame`].
///
/// The frame is right-handed with `z = -direction`: the camera looks
/// down `-z`, `y` is up in the image, `x` points right.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraFrame {
    /// Camera location
    pub location: DVec3,
    /// Unit vector pointing right in the image
    pub x: DVec3,
    /// Unit vector pointing up in the image
    pub y: DVec3,
    /// Unit vector pointing behind the camera (`-direction`)
    pub z: DVec3,
}

/// Default frustum near distance.
pub const DEFAULT_NEAR_DIST: f64 = 0.005;
/// Default frustum far distance.
pub const DEFAULT_FAR_DIST: f64 = 1000.0;
/// Default lower bound for the perspective near distance.
pub const DEFAULT_MIN_NEAR_DIST: f64 = 1.0e-4;
/// Default lower bound for the perspective near/far ratio.
pub const DEFAULT_MIN_NEAR_OVER_FAR: f64 = 1.0e-4;

/// Half of the short side of a 35mm film frame (24mm), in millimeters.
/// Lens-length conversions measure the view angle against this.
pub(super) const LENS_HALF_FRAME_MM: f64 = 12.0;

/// 3D viewport: camera, view frustum, screen port and derived views.
///
/// Value semantics throughout: `Clone` duplicates all state (copy
/// construction), `Default` builds the default camera/frustum, and drop
/// is destruction. No state is shared between instances.
///
/// The viewport is not designed for concurrent mutation; callers must
/// serialize access to a given instance.
#[derive(Debug, Clone)]
pub struct Viewport {
    pub(super) projection: Projection,

    // Camera state. The frame (x, y, z) is derived from direction + up
    // and kept orthonormal by the setters.
    pub(super) camera_location: DVec3,
    pub(super) camera_direction: DVec3,
    pub(super) camera_up: DVec3,
    pub(super) camera_x: DVec3,
    pub(super) camera_y: DVec3,
    pub(super) camera_z: DVec3,
    pub(super) camera_locks: CameraLocks,

    pub(super) frustum: Frustum,
    pub(super) symmetry: FrustumSymmetry,

    pub(super) screen_port: ScreenPort,
    pub(super) view_scale_width: f64,
    pub(super) view_scale_height: f64,

    // Post-projection transform and its cached inverse. Identity unless
    // set through `set_clip_mod_xform`, which guarantees invertibility.
    pub(super) clip_mod: DMat4,
    pub(super) clip_mod_inverse: DMat4,

    pub(super) target_point: Option<DVec3>,

    // Lower bounds enforced when auto-adjusting near/far for
    // perspective depth-buffer precision.
    pub(super) min_near_dist: f64,
    pub(super) min_near_over_far: f64,

    pub(super) viewport_id: Uuid,
}

impl Default for Viewport {
    /// Default viewport: parallel projection, camera at (0, 0, 100)
    /// looking down `-Z` with `+Y` up, a 40x40 frustum and a
    /// 1000x1000 pixel screen port.
    fn default() -> Self {
        Self {
            projection: Projection::Parallel,
            camera_location: DVec3::new(0.0, 0.0, 100.0),
            camera_direction: DVec3::NEG_Z,
            camera_up: DVec3::Y,
            camera_x: DVec3::X,
            camera_y: DVec3::Y,
            camera_z: DVec3::Z,
            camera_locks: CameraLocks::empty(),
            frustum: Frustum {
                left: -20.0,
                right: 20.0,
                bottom: -20.0,
                top: 20.0,
                near: DEFAULT_NEAR_DIST,
                far: DEFAULT_FAR_DIST,
            },
            symmetry: FrustumSymmetry::empty(),
            screen_port: ScreenPort {
                left: 0,
                right: 1000,
                bottom: 0,
                top: 1000,
                near: 0,
                far: 1,
            },
            view_scale_width: 1.0,
            view_scale_height: 1.0,
            clip_mod: DMat4::IDENTITY,
            clip_mod_inverse: DMat4::IDENTITY,
            target_point: None,
            min_near_dist: DEFAULT_MIN_NEAR_DIST,
            min_near_over_far: DEFAULT_MIN_NEAR_OVER_FAR,
            viewport_id: Uuid::nil(),
        }
    }
}

impl Viewport {
    /// Create a viewport with the default camera and frustum.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a default viewport carrying a freshly generated id.
    pub fn with_new_id() -> Self {
        let mut vp = Self::default();
        vp.viewport_id = Uuid::new_v4();
        vp
    }

    // ===== VALIDITY =====

    /// True if direction and up are non-degenerate and non-parallel and
    /// the location is finite.
    pub fn is_valid_camera(&self) -> bool {
        self.camera_location.is_finite()
            && camera_frame_from(self.camera_direction, self.camera_up).is_some()
    }

    /// True if the frustum bounds satisfy `left < right`, `bottom < top`
    /// and `0 < near < far`.
    pub fn is_valid_frustum(&self) -> bool {
        self.frustum.is_valid()
    }

    /// True if camera, frustum and screen port are all valid.
    pub fn is_valid(&self) -> bool {
        self.is_valid_camera() && self.is_valid_frustum() && self.screen_port.is_valid()
    }

    // ===== PROJECTION QUERIES =====

    /// Current projection mode.
    pub fn projection(&self) -> Projection {
        self.projection
    }

    /// True for both perspective variants (standard and two-point).
    pub fn is_perspective_projection(&self) -> bool {
        matches!(
            self.projection,
            Projection::Perspective | Projection::TwoPointPerspective
        )
    }

    /// True for the parallel (orthographic) projection.
    pub fn is_parallel_projection(&self) -> bool {
        self.projection == Projection::Parallel
    }

    /// True for the two-point perspective projection.
    pub fn is_two_point_perspective_projection(&self) -> bool {
        self.projection == Projection::TwoPointPerspective
    }

    // ===== CAMERA GETTERS =====

    /// Camera location.
    pub fn camera_location(&self) -> DVec3 {
        self.camera_location
    }

    /// Unit look direction.
    pub fn camera_direction(&self) -> DVec3 {
        self.camera_direction
    }

    /// Unit up reference.
    pub fn camera_up(&self) -> DVec3 {
        self.camera_up
    }

    /// Unit vector pointing right in the image.
    pub fn camera_x(&self) -> DVec3 {
        self.camera_x
    }

    /// Unit vector pointing up in the image.
    pub fn camera_y(&self) -> DVec3 {
        self.camera_y
    }

    /// Unit vector pointing behind the camera (`-direction`).
    pub fn camera_z(&self) -> DVec3 {
        self.camera_z
    }

    /// Location and the three orthonormal basis vectors, atomically.
    ///
    /// Fails with [`AstraError::InvalidCamera`] if the camera is
    /// degenerate.
    pub fn get_camera_frame(&self) -> AstraResult<CameraFrame> {
        if !self.is_valid_camera() {
            return Err(AstraError::InvalidCamera);
        }
        Ok(CameraFrame {
            location: self.camera_location,
            x: self.camera_x,
            y: self.camera_y,
            z: self.camera_z,
        })
    }

    // ===== CAMERA SETTERS =====

    /// Set the camera location to a point.
    ///
    /// Fails if the location is locked or the point is not finite.
    pub fn set_camera_location(&mut self, location: DVec3) -> AstraResult<()> {
        if self.camera_locks.contains(CameraLocks::LOCATION) {
            return Err(AstraError::Locked("camera location"));
        }
        if !location.is_finite() {
            return Err(AstraError::InvalidArgument(
                "camera location must be finite".to_string(),
            ));
        }
        self.camera_location = location;
        Ok(())
    }

    /// Set the look direction and re-orthonormalize the frame.
    ///
    /// The up vector is auto-corrected against the new direction: its
    /// component along the view axis is removed, and if it degenerates
    /// (up parallel to the new direction) a fallback up is chosen.
    /// Fails if the direction is locked or degenerate.
    pub fn set_camera_direction(&mut self, direction: DVec3) -> AstraResult<()> {
        if self.camera_locks.contains(CameraLocks::DIRECTION) {
            return Err(AstraError::Locked("camera direction"));
        }
        if !direction.is_finite() || direction.length_squared() <= f64::EPSILON {
            return Err(AstraError::InvalidArgument(
                "camera direction must be a finite non-zero vector".to_string(),
            ));
        }
        let up = if camera_frame_from(direction, self.camera_up).is_some() {
            self.camera_up
        } else {
            fallback_up(direction)
        };
        let (x, y, z) = camera_frame_from(direction, up).ok_or(AstraError::InvalidCamera)?;
        self.camera_direction = -z;
        self.camera_up = y;
        self.camera_x = x;
        self.camera_y = y;
        self.camera_z = z;
        Ok(())
    }

    /// Set the up vector and re-orthonormalize the frame.
    ///
    /// The direction is the retained axis: the stored up becomes the
    /// component of `up` orthogonal to the view axis. Fails if the up
    /// is locked, degenerate, or parallel to the current direction.
    pub fn set_camera_up(&mut self, up: DVec3) -> AstraResult<()> {
        if self.camera_locks.contains(CameraLocks::UP) {
            return Err(AstraError::Locked("camera up"));
        }
        if !up.is_finite() || up.length_squared() <= f64::EPSILON {
            return Err(AstraError::InvalidArgument(
                "camera up must be a finite non-zero vector".to_string(),
            ));
        }
        let (x, y, z) = camera_frame_from(self.camera_direction, up).ok_or_else(|| {
            AstraError::InvalidArgument(
                "camera up must not be parallel to the view direction".to_string(),
            )
        })?;
        self.camera_up = y;
        self.camera_x = x;
        self.camera_y = y;
        self.camera_z = z;
        Ok(())
    }

    // ===== CAMERA LOCKS =====

    /// Lock or unlock the camera location.
    pub fn set_camera_location_lock(&mut self, locked: bool) {
        self.camera_locks.set(CameraLocks::LOCATION, locked);
    }

    /// Lock or unlock the camera direction.
    pub fn set_camera_direction_lock(&mut self, locked: bool) {
        self.camera_locks.set(CameraLocks::DIRECTION, locked);
    }

    /// Lock or unlock the camera up vector.
    pub fn set_camera_up_lock(&mut self, locked: bool) {
        self.camera_locks.set(CameraLocks::UP, locked);
    }

    /// True if the camera location is locked.
    pub fn camera_location_is_locked(&self) -> bool {
        self.camera_locks.contains(CameraLocks::LOCATION)
    }

    /// True if the camera direction is locked.
    pub fn camera_direction_is_locked(&self) -> bool {
        self.camera_locks.contains(CameraLocks::DIRECTION)
    }

    /// True if the camera up vector is locked.
    pub fn camera_up_is_locked(&self) -> bool {
        self.camera_locks.contains(CameraLocks::UP)
    }

    /// Clear all three camera locks.
    pub fn unlock_camera(&mut self) {
        self.camera_locks = CameraLocks::empty();
    }

    // ===== FRUSTUM SYMMETRY =====

    /// Enable or disable left/right symmetry enforcement.
    ///
    /// Enabling recenters the frustum horizontally, preserving width.
    pub fn set_frustum_left_right_symmetry(&mut self, symmetric: bool) {
        self.symmetry.set(FrustumSymmetry::LEFT_RIGHT, symmetric);
        if symmetric {
            let half = 0.5 * (self.frustum.right - self.frustum.left);
            self.frustum.left = -half;
            self.frustum.right = half;
        }
    }

    /// Enable or disable top/bottom symmetry enforcement.
    ///
    /// Enabling recenters the frustum vertically, preserving height.
    pub fn set_frustum_top_bottom_symmetry(&mut self, symmetric: bool) {
        self.symmetry.set(FrustumSymmetry::TOP_BOTTOM, symmetric);
        if symmetric {
            let half = 0.5 * (self.frustum.top - self.frustum.bottom);
            self.frustum.bottom = -half;
            self.frustum.top = half;
        }
    }

    /// True if the frustum is actually centered horizontally.
    pub fn frustum_is_left_right_symmetric(&self) -> bool {
        self.frustum.left == -self.frustum.right
    }

    /// True if the frustum is actually centered vertically.
    pub fn frustum_is_top_bottom_symmetric(&self) -> bool {
        self.frustum.bottom == -self.frustum.top
    }

    /// Clear both symmetry enforcement flags (geometry is untouched).
    pub fn unlock_frustum_symmetry(&mut self) {
        self.symmetry = FrustumSymmetry::empty();
    }

    // ===== TARGET POINT =====

    /// The auxiliary target point, if one has been set.
    ///
    /// The target is the pivot for dolly/zoom/rotation operations and is
    /// distinct from the camera location.
    pub fn target_point(&self) -> Option<DVec3> {
        self.target_point
    }

    /// Set the target point.
    pub fn set_target_point(&mut self, point: DVec3) -> AstraResult<()> {
        if !point.is_finite() {
            return Err(AstraError::InvalidArgument(
                "target point must be finite".to_string(),
            ));
        }
        self.target_point = Some(point);
        Ok(())
    }

    /// Clear the target point.
    pub fn clear_target_point(&mut self) {
        self.target_point = None;
    }

    /// Distance from the camera location to the target point, measured
    /// along the view axis.
    ///
    /// When no target is set and `use_frustum_center_fallback` is true,
    /// the midpoint of the valid frustum depth range is used instead.
    pub fn target_distance(&self, use_frustum_center_fallback: bool) -> Option<f64> {
        if let Some(target) = self.target_point {
            if self.is_valid_camera() {
                let d = (target - self.camera_location).dot(-self.camera_z);
                if d.is_finite() {
                    return Some(d);
                }
            }
        }
        if use_frustum_center_fallback && self.is_valid_frustum() {
            return Some(0.5 * (self.frustum.near + self.frustum.far));
        }
        None
    }

    // ===== VIEWPORT ID =====

    /// The viewport id (nil for a default-constructed viewport).
    pub fn viewport_id(&self) -> Uuid {
        self.viewport_id
    }

    /// Set the viewport id.
    pub fn set_viewport_id(&mut self, id: Uuid) {
        self.viewport_id = id;
    }
}

/// Build the right-handed orthonormal camera frame `(x, y, z)` from a
/// look direction and an up reference. `z = -direction` unitized, `y`
/// is the component of `up` orthogonal to `z`, `x = y × z`.
///
/// Returns `None` when direction or up is degenerate or the two are
/// parallel.
pub(super) fn camera_frame_from(direction: DVec3, up: DVec3) -> Option<(DVec3, DVec3, DVec3)> {
    if !direction.is_finite() || !up.is_finite() {
        return None;
    }
    let dir_len = direction.length();
    if dir_len <= f64::EPSILON {
        return None;
    }
    let z = -direction / dir_len;
    let y_raw = up - up.dot(z) * z;
    let y_len = y_raw.length();
    // `up` parallel to the view axis leaves no usable image-up
    if y_len <= 1.0e-12 * up.length().max(1.0) {
        return None;
    }
    let y = y_raw / y_len;
    let x = y.cross(z);
    Some((x, y, z))
}

/// Pick an up reference that is guaranteed non-parallel to `direction`.
/// World `+Y` when possible, world `+Z` when the view axis is vertical.
pub(super) fn fallback_up(direction: DVec3) -> DVec3 {
    let d = direction.normalize();
    if d.y.abs() < 0.99 {
        DVec3::Y
    } else {
        DVec3::Z
    }
}

#[cfg(test)]
#[path = "viewport_tests.rs"]
mod tests;

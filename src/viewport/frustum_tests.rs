/// Tests for frustum operations.
///
/// These tests validate the frustum accessors and setters, aspect
/// handling, depth queries, near/far policies, world-space clipping
/// planes and the picking ray.

use super::*;
use crate::geometry::{BoundingBox, Sphere};
use crate::viewport::{Projection, Viewport};
use approx::assert_relative_eq;
use glam::DVec3;

// ============================================================================
// Helper Functions
// ============================================================================

/// Default viewport flipped to a standard perspective projection with a
/// simple symmetric frustum: near 1, far 101, walls at ±1.
fn perspective_viewport() -> Viewport {
    let mut vp = Viewport::new();
    vp.projection = Projection::Perspective;
    vp.set_frustum(-1.0, 1.0, -1.0, 1.0, 1.0, 101.0).unwrap();
    vp
}

fn assert_vec3_eq(a: DVec3, b: DVec3, epsilon: f64) {
    assert_relative_eq!(a.x, b.x, epsilon = epsilon);
    assert_relative_eq!(a.y, b.y, epsilon = epsilon);
    assert_relative_eq!(a.z, b.z, epsilon = epsilon);
}

// ============================================================================
// Accessors and set_frustum
// ============================================================================

#[test]
fn test_set_frustum_roundtrip() {
    let mut vp = Viewport::new();
    vp.set_frustum(-2.0, 3.0, -1.0, 4.0, 0.5, 50.0).unwrap();
    assert_eq!(vp.frustum_left(), -2.0);
    assert_eq!(vp.frustum_right(), 3.0);
    assert_eq!(vp.frustum_bottom(), -1.0);
    assert_eq!(vp.frustum_top(), 4.0);
    assert_eq!(vp.frustum_near(), 0.5);
    assert_eq!(vp.frustum_far(), 50.0);
}

#[test]
fn test_set_frustum_rejects_bad_bounds() {
    let mut vp = Viewport::new();
    let before = vp.get_frustum().unwrap();
    assert!(vp.set_frustum(1.0, 1.0, -1.0, 1.0, 0.1, 10.0).is_err()); // left == right
    assert!(vp.set_frustum(-1.0, 1.0, 2.0, 1.0, 0.1, 10.0).is_err()); // bottom > top
    assert!(vp.set_frustum(-1.0, 1.0, -1.0, 1.0, 0.0, 10.0).is_err()); // near == 0
    assert!(vp.set_frustum(-1.0, 1.0, -1.0, 1.0, 10.0, 10.0).is_err()); // near == far
    assert!(vp.set_frustum(-1.0, 1.0, -1.0, 1.0, f64::NAN, 10.0).is_err());
    assert_eq!(vp.get_frustum().unwrap(), before);
}

#[test]
fn test_set_frustum_applies_symmetry_enforcement() {
    let mut vp = Viewport::new();
    vp.set_frustum_left_right_symmetry(true);
    vp.set_frustum(2.0, 10.0, -1.0, 3.0, 1.0, 10.0).unwrap();
    // Horizontal axis recentered preserving width; vertical untouched.
    assert_eq!(vp.frustum_left(), -4.0);
    assert_eq!(vp.frustum_right(), 4.0);
    assert_eq!(vp.frustum_bottom(), -1.0);
    assert_eq!(vp.frustum_top(), 3.0);
}

#[test]
fn test_frustum_diameters() {
    let mut vp = Viewport::new();
    vp.set_frustum(-2.0, 2.0, -1.0, 1.0, 0.1, 10.0).unwrap();
    assert_eq!(vp.frustum_minimum_diameter(), 2.0);
    assert_eq!(vp.frustum_maximum_diameter(), 4.0);
}

// ============================================================================
// Aspect
// ============================================================================

#[test]
fn test_get_frustum_aspect() {
    let mut vp = Viewport::new();
    vp.set_frustum(-8.0, 8.0, -4.0, 4.0, 0.1, 10.0).unwrap();
    assert_relative_eq!(vp.get_frustum_aspect().unwrap(), 2.0, epsilon = 1e-12);
}

#[test]
fn test_set_frustum_aspect_preserves_larger_dimension() {
    let mut vp = Viewport::new();
    vp.set_frustum(-8.0, 8.0, -4.0, 4.0, 0.1, 10.0).unwrap();
    vp.set_frustum_aspect(4.0).unwrap();
    // Width (16) kept, height rescaled to 4 around its center.
    assert_eq!(vp.frustum_left(), -8.0);
    assert_eq!(vp.frustum_right(), 8.0);
    assert_relative_eq!(vp.frustum_bottom(), -2.0, epsilon = 1e-12);
    assert_relative_eq!(vp.frustum_top(), 2.0, epsilon = 1e-12);
    assert_relative_eq!(vp.get_frustum_aspect().unwrap(), 4.0, epsilon = 1e-12);
}

#[test]
fn test_set_frustum_aspect_keeps_off_center_frustum_centered() {
    let mut vp = Viewport::new();
    vp.set_frustum(-2.0, 2.0, 1.0, 5.0, 0.1, 10.0).unwrap();
    vp.set_frustum_aspect(0.5).unwrap();
    // Height (4) is the larger dimension and is kept; width rescaled
    // about its center.
    assert_eq!(vp.frustum_bottom(), 1.0);
    assert_eq!(vp.frustum_top(), 5.0);
    assert_relative_eq!(vp.frustum_left(), -1.0, epsilon = 1e-12);
    assert_relative_eq!(vp.frustum_right(), 1.0, epsilon = 1e-12);
}

#[test]
fn test_set_frustum_aspect_rejects_non_positive() {
    let mut vp = Viewport::new();
    assert!(vp.set_frustum_aspect(0.0).is_err());
    assert!(vp.set_frustum_aspect(-1.0).is_err());
    assert!(vp.set_frustum_aspect(f64::NAN).is_err());
}

// ============================================================================
// Frustum center
// ============================================================================

#[test]
fn test_get_frustum_center_near_rect() {
    let mut vp = Viewport::new();
    vp.set_frustum(0.0, 4.0, -2.0, 6.0, 1.0, 10.0).unwrap();
    // Camera at (0,0,100) looking down -Z: center offsets (2, 2) at
    // depth 1.
    let center = vp.get_frustum_center().unwrap();
    assert_vec3_eq(center, DVec3::new(2.0, 2.0, 99.0), 1e-12);
}

#[test]
fn test_frustum_center_point_parallel() {
    let mut vp = Viewport::new();
    vp.set_frustum(0.0, 4.0, -2.0, 6.0, 1.0, 10.0).unwrap();
    let p = vp.frustum_center_point(5.0).unwrap();
    // Parallel projection: offsets are constant with depth.
    assert_vec3_eq(p, DVec3::new(2.0, 2.0, 95.0), 1e-12);
}

#[test]
fn test_frustum_center_point_perspective_scales_offsets() {
    let mut vp = perspective_viewport();
    vp.set_frustum(0.0, 2.0, 0.0, 2.0, 1.0, 10.0).unwrap();
    let p = vp.frustum_center_point(5.0).unwrap();
    // Near-plane offsets (1, 1) fan out to (5, 5) at depth 5.
    assert_vec3_eq(p, DVec3::new(5.0, 5.0, 95.0), 1e-12);
}

// ============================================================================
// Depth queries
// ============================================================================

#[test]
fn test_get_point_depth() {
    let vp = Viewport::new();
    let range = vp
        .get_point_depth(DVec3::new(3.0, -4.0, 30.0), DepthRange::point(0.0), false)
        .unwrap();
    assert_relative_eq!(range.near, 70.0, epsilon = 1e-12);
    assert_relative_eq!(range.far, 70.0, epsilon = 1e-12);
}

#[test]
fn test_get_point_depth_grows_supplied_range() {
    let vp = Viewport::new();
    let seed = DepthRange { near: 10.0, far: 20.0 };
    let range = vp
        .get_point_depth(DVec3::new(0.0, 0.0, 30.0), seed, true)
        .unwrap();
    assert_relative_eq!(range.near, 10.0, epsilon = 1e-12);
    assert_relative_eq!(range.far, 70.0, epsilon = 1e-12);
}

#[test]
fn test_get_bounding_box_depth() {
    let vp = Viewport::new();
    let bbox = BoundingBox::new(DVec3::new(-1.0, -1.0, 10.0), DVec3::new(1.0, 1.0, 60.0));
    let range = vp
        .get_bounding_box_depth(&bbox, DepthRange::point(0.0), false)
        .unwrap();
    assert_relative_eq!(range.near, 40.0, epsilon = 1e-12);
    assert_relative_eq!(range.far, 90.0, epsilon = 1e-12);
}

#[test]
fn test_get_bounding_box_depth_grow_union() {
    let vp = Viewport::new();
    // Box spanning depths [93, 98]: union with a seed of [95, 100]
    // extends only the near end.
    let bbox = BoundingBox::new(DVec3::new(-1.0, -1.0, 2.0), DVec3::new(1.0, 1.0, 7.0));
    let seed = DepthRange { near: 95.0, far: 100.0 };
    let range = vp.get_bounding_box_depth(&bbox, seed, true).unwrap();
    assert_relative_eq!(range.near, 93.0, epsilon = 1e-12);
    assert_relative_eq!(range.far, 100.0, epsilon = 1e-12);
}

#[test]
fn test_get_sphere_depth() {
    let vp = Viewport::new();
    let sphere = Sphere::new(DVec3::new(0.0, 0.0, 50.0), 5.0);
    let range = vp
        .get_sphere_depth(&sphere, DepthRange::point(0.0), false)
        .unwrap();
    assert_relative_eq!(range.near, 45.0, epsilon = 1e-12);
    assert_relative_eq!(range.far, 55.0, epsilon = 1e-12);
}

#[test]
fn test_depth_queries_reject_degenerate_inputs() {
    let vp = Viewport::new();
    assert!(vp
        .get_point_depth(DVec3::new(f64::NAN, 0.0, 0.0), DepthRange::point(0.0), false)
        .is_err());
    let bad_box = BoundingBox::new(DVec3::ONE, DVec3::ZERO);
    assert!(vp
        .get_bounding_box_depth(&bad_box, DepthRange::point(0.0), false)
        .is_err());
    let bad_sphere = Sphere::new(DVec3::ZERO, -1.0);
    assert!(vp
        .get_sphere_depth(&bad_sphere, DepthRange::point(0.0), false)
        .is_err());
}

// ============================================================================
// Near/far setters
// ============================================================================

#[test]
fn test_set_frustum_near_far_preserves_side_walls() {
    let mut vp = Viewport::new();
    vp.set_frustum(-3.0, 5.0, -2.0, 4.0, 1.0, 100.0).unwrap();
    vp.set_frustum_near_far(2.0, 50.0).unwrap();
    assert_eq!(vp.frustum_left(), -3.0);
    assert_eq!(vp.frustum_right(), 5.0);
    assert_eq!(vp.frustum_bottom(), -2.0);
    assert_eq!(vp.frustum_top(), 4.0);
    assert_eq!(vp.frustum_near(), 2.0);
    assert_eq!(vp.frustum_far(), 50.0);
}

#[test]
fn test_set_frustum_near_far_rejects_bad_range() {
    let mut vp = Viewport::new();
    assert!(vp.set_frustum_near_far(0.0, 10.0).is_err());
    assert!(vp.set_frustum_near_far(-1.0, 10.0).is_err());
    assert!(vp.set_frustum_near_far(10.0, 10.0).is_err());
    assert!(vp.set_frustum_near_far(20.0, 10.0).is_err());
}

#[test]
fn test_set_near_far_from_sphere() {
    let mut vp = Viewport::new();
    let sphere = Sphere::new(DVec3::new(0.0, 0.0, 50.0), 10.0);
    vp.set_frustum_near_far_from_sphere(&sphere, false).unwrap();
    assert_relative_eq!(vp.frustum_near(), 40.0, epsilon = 1e-12);
    assert_relative_eq!(vp.frustum_far(), 60.0, epsilon = 1e-12);
}

#[test]
fn test_set_near_far_from_sphere_clamps_near_floor() {
    let mut vp = Viewport::new();
    // Sphere surrounding the camera: raw near would be negative.
    let sphere = Sphere::new(DVec3::new(0.0, 0.0, 100.0), 30.0);
    vp.set_frustum_near_far_from_sphere(&sphere, false).unwrap();
    assert!(vp.frustum_near() > 0.0);
    assert_relative_eq!(vp.frustum_far(), 30.0, epsilon = 1e-12);
    assert!(vp.is_valid_frustum());
}

#[test]
fn test_set_near_far_from_bounding_box_behind_camera_fails() {
    let mut vp = Viewport::new();
    let before = vp.get_frustum().unwrap();
    // Entirely behind the camera at z=100 looking down -Z.
    let bbox = BoundingBox::new(DVec3::new(-1.0, -1.0, 150.0), DVec3::new(1.0, 1.0, 200.0));
    assert!(vp.set_frustum_near_far_from_bounding_box(&bbox, false).is_err());
    assert_eq!(vp.get_frustum().unwrap(), before);
}

#[test]
fn test_set_near_far_from_bounding_box_grow() {
    let mut vp = Viewport::new();
    vp.set_frustum_near_far(30.0, 45.0).unwrap();
    let bbox = BoundingBox::new(DVec3::new(-1.0, -1.0, 40.0), DVec3::new(1.0, 1.0, 60.0));
    vp.set_frustum_near_far_from_bounding_box(&bbox, true).unwrap();
    // Existing range grows to cover the box: [30, 45] U [40, 60].
    assert_relative_eq!(vp.frustum_near(), 30.0, epsilon = 1e-12);
    assert_relative_eq!(vp.frustum_far(), 60.0, epsilon = 1e-12);
}

#[test]
fn test_set_near_far_flat_range_opens_up() {
    let mut vp = Viewport::new();
    // All depth at exactly 50: a flat range must still produce a valid
    // frustum.
    let bbox = BoundingBox::new(DVec3::new(-1.0, -1.0, 50.0), DVec3::new(1.0, 1.0, 50.0));
    vp.set_frustum_near_far_from_bounding_box(&bbox, false).unwrap();
    assert!(vp.is_valid_frustum());
    assert!(vp.frustum_near() < vp.frustum_far());
}

// ============================================================================
// Policy clamp
// ============================================================================

#[test]
fn test_policy_raises_near_when_target_stays_visible() {
    let mut vp = Viewport::new();
    // Requested near violates the ratio; the raised near (0.1) still
    // keeps the target at depth 500 in view.
    vp.set_frustum_near_far_with_policy(0.001, 1000.0, 1.0e-4, 1.0e-4, 500.0)
        .unwrap();
    assert_relative_eq!(vp.frustum_near(), 0.1, epsilon = 1e-12);
    assert_relative_eq!(vp.frustum_far(), 1000.0, epsilon = 1e-12);
}

#[test]
fn test_policy_pulls_far_in_when_raising_near_would_clip_target() {
    let mut vp = Viewport::new();
    // Raised near would be 0.1, but the target sits at depth 0.05:
    // keep near and shrink far instead.
    vp.set_frustum_near_far_with_policy(0.01, 1000.0, 1.0e-4, 1.0e-4, 0.05)
        .unwrap();
    assert_relative_eq!(vp.frustum_near(), 0.01, epsilon = 1e-12);
    assert_relative_eq!(vp.frustum_far(), 100.0, epsilon = 1e-12);
}

#[test]
fn test_policy_enforces_min_near_dist() {
    let mut vp = Viewport::new();
    vp.set_frustum_near_far_with_policy(1.0e-8, 1.0, 1.0e-3, 0.0, 0.5)
        .unwrap();
    assert_relative_eq!(vp.frustum_near(), 1.0e-3, epsilon = 1e-15);
    assert_relative_eq!(vp.frustum_far(), 1.0, epsilon = 1e-12);
}

#[test]
fn test_policy_rejects_bad_constraints() {
    let mut vp = Viewport::new();
    assert!(vp
        .set_frustum_near_far_with_policy(1.0, 10.0, 0.1, 1.5, 5.0)
        .is_err());
    assert!(vp
        .set_frustum_near_far_with_policy(1.0, 10.0, f64::NAN, 0.1, 5.0)
        .is_err());
    assert!(vp
        .set_frustum_near_far_with_policy(10.0, 1.0, 0.1, 0.1, 5.0)
        .is_err());
}

// ============================================================================
// Clipping planes
// ============================================================================

#[test]
fn test_near_and_far_planes_parallel_projection() {
    let vp = Viewport::new();
    let near = vp.get_near_plane().unwrap();
    let far = vp.get_far_plane().unwrap();
    // Camera at z=100 looking down -Z: near plane at z = 100 - near,
    // inward normal -Z; far plane at z = -900, inward normal +Z.
    assert_vec3_eq(near.normal, DVec3::NEG_Z, 1e-12);
    assert_vec3_eq(far.normal, DVec3::Z, 1e-12);
    let inside = DVec3::new(0.0, 0.0, 50.0);
    assert!(near.value_at(inside) > 0.0);
    assert!(far.value_at(inside) > 0.0);
    assert_relative_eq!(near.value_at(DVec3::new(0.0, 0.0, 100.0 - 0.005)), 0.0, epsilon = 1e-9);
    assert_relative_eq!(far.value_at(DVec3::new(0.0, 0.0, -900.0)), 0.0, epsilon = 1e-9);
}

#[test]
fn test_side_planes_contain_frustum_interior() {
    let mut vp = perspective_viewport();
    vp.set_frustum(-2.0, 1.0, -1.5, 0.5, 1.0, 100.0).unwrap();
    let planes = [
        vp.get_frustum_left_plane().unwrap(),
        vp.get_frustum_right_plane().unwrap(),
        vp.get_frustum_bottom_plane().unwrap(),
        vp.get_frustum_top_plane().unwrap(),
        vp.get_near_plane().unwrap(),
        vp.get_far_plane().unwrap(),
    ];
    // An interior point sits strictly on the positive side of all six
    // inward-pointing planes; an exterior point fails at least one.
    let interior = vp.frustum_center_point(50.0).unwrap();
    for plane in &planes {
        assert!(plane.value_at(interior) > 0.0);
    }
    let exterior = DVec3::new(500.0, 0.0, 50.0);
    assert!(planes.iter().any(|p| p.value_at(exterior) < 0.0));
}

#[test]
fn test_perspective_side_planes_pass_through_camera() {
    let vp = perspective_viewport();
    let left = vp.get_frustum_left_plane().unwrap();
    assert_relative_eq!(left.value_at(vp.camera_location()), 0.0, epsilon = 1e-12);
}

#[test]
fn test_parallel_side_planes_offset_from_camera() {
    let mut vp = Viewport::new();
    vp.set_frustum(-3.0, 5.0, -1.0, 1.0, 0.1, 10.0).unwrap();
    let left = vp.get_frustum_left_plane().unwrap();
    let right = vp.get_frustum_right_plane().unwrap();
    // Box walls: left plane at x=-3 with +X normal, right at x=5 with
    // -X normal.
    assert_vec3_eq(left.normal, DVec3::X, 1e-12);
    assert_vec3_eq(right.normal, DVec3::NEG_X, 1e-12);
    assert_relative_eq!(left.value_at(DVec3::new(-3.0, 0.0, 50.0)), 0.0, epsilon = 1e-12);
    assert_relative_eq!(right.value_at(DVec3::new(5.0, 0.0, 50.0)), 0.0, epsilon = 1e-12);
}

// ============================================================================
// Rectangles and picking
// ============================================================================

#[test]
fn test_near_and_far_rect_parallel() {
    let mut vp = Viewport::new();
    vp.set_frustum(-2.0, 2.0, -1.0, 1.0, 1.0, 10.0).unwrap();
    let near = vp.get_near_rect().unwrap();
    let far = vp.get_far_rect().unwrap();
    assert_vec3_eq(near[0], DVec3::new(-2.0, -1.0, 99.0), 1e-12);
    assert_vec3_eq(near[3], DVec3::new(2.0, 1.0, 99.0), 1e-12);
    // Parallel: same cross-section at the far plane.
    assert_vec3_eq(far[0], DVec3::new(-2.0, -1.0, 90.0), 1e-12);
    assert_vec3_eq(far[3], DVec3::new(2.0, 1.0, 90.0), 1e-12);
}

#[test]
fn test_far_rect_perspective_fans_out() {
    let mut vp = perspective_viewport();
    vp.set_frustum(-1.0, 1.0, -1.0, 1.0, 1.0, 10.0).unwrap();
    let far = vp.get_far_rect().unwrap();
    assert_vec3_eq(far[0], DVec3::new(-10.0, -10.0, 90.0), 1e-12);
    assert_vec3_eq(far[3], DVec3::new(10.0, 10.0, 90.0), 1e-12);
}

#[test]
fn test_frustum_line_through_center() {
    let vp = perspective_viewport();
    let line = vp.get_frustum_line(0.5, 0.5).unwrap();
    // Centered symmetric frustum: the center ray is the view axis.
    assert_vec3_eq(line.from, DVec3::new(0.0, 0.0, 99.0), 1e-12);
    assert_vec3_eq(line.to, DVec3::new(0.0, 0.0, -1.0), 1e-12);
}

#[test]
fn test_frustum_line_corner_perspective() {
    let vp = perspective_viewport();
    let line = vp.get_frustum_line(0.0, 0.0).unwrap();
    // Bottom-left corner ray passes through the camera location.
    assert_vec3_eq(line.from, DVec3::new(-1.0, -1.0, 99.0), 1e-12);
    assert_vec3_eq(line.to, DVec3::new(-101.0, -101.0, -1.0), 1e-12);
    let dir = line.direction().normalize();
    let to_near = (line.from - vp.camera_location()).normalize();
    assert_vec3_eq(dir, to_near, 1e-12);
}

#[test]
fn test_frustum_line_parallel_is_axis_aligned() {
    let mut vp = Viewport::new();
    vp.set_frustum(-2.0, 2.0, -1.0, 1.0, 1.0, 10.0).unwrap();
    let line = vp.get_frustum_line(1.0, 0.0).unwrap();
    assert_vec3_eq(line.from, DVec3::new(2.0, -1.0, 99.0), 1e-12);
    assert_vec3_eq(line.to, DVec3::new(2.0, -1.0, 90.0), 1e-12);
}

// ============================================================================
// Perspective clipping plane constraints
// ============================================================================

#[test]
fn test_constraints_by_depth_buffer_bits() {
    let at_origin = DVec3::ZERO;
    let c32 = Viewport::get_perspective_clipping_plane_constraints(at_origin, 32);
    let c24 = Viewport::get_perspective_clipping_plane_constraints(at_origin, 24);
    let c16 = Viewport::get_perspective_clipping_plane_constraints(at_origin, 16);
    let c8 = Viewport::get_perspective_clipping_plane_constraints(at_origin, 8);
    assert_eq!(c32.min_near_over_far, 1.0e-4);
    assert_eq!(c24.min_near_over_far, 5.0e-4);
    assert_eq!(c16.min_near_over_far, 5.0e-3);
    assert_eq!(c8.min_near_over_far, 1.0e-2);
    assert_eq!(c32.min_near_dist, 1.0e-4);
}

#[test]
fn test_constraints_scale_with_camera_magnitude() {
    let far_away = DVec3::new(1.0e8, 0.0, 0.0);
    let c = Viewport::get_perspective_clipping_plane_constraints(far_away, 24);
    assert_relative_eq!(c.min_near_dist, 1.0e-4 * 1.0e3, epsilon = 1e-9);
}

#[test]
fn test_set_constraints_stores_policy() {
    let mut vp = Viewport::new();
    vp.set_perspective_clipping_plane_constraints(16);
    assert_eq!(vp.perspective_min_near_over_far(), 5.0e-3);
    assert_eq!(vp.perspective_min_near_dist(), 1.0e-4);
}

#[test]
fn test_stored_policy_setters_validate() {
    let mut vp = Viewport::new();
    assert!(vp.set_perspective_min_near_dist(0.0).is_err());
    assert!(vp.set_perspective_min_near_over_far(1.0).is_err());
    vp.set_perspective_min_near_dist(0.01).unwrap();
    vp.set_perspective_min_near_over_far(0.001).unwrap();
    assert_eq!(vp.perspective_min_near_dist(), 0.01);
    assert_eq!(vp.perspective_min_near_over_far(), 0.001);
}

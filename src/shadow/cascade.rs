//! Cascade split computation and light-view fitting (§4.4.1).
//!
//! Reverse-Z throughout: clear value is 0, depth test is `GREATER`, matching
//! `scene::camera::Camera`'s projection convention (see DESIGN.md Open
//! Questions — the teacher's `shadow_utils.rs` used standard-Z here and was
//! adapted).

use crate::scene::{BoundingBox, Camera, Frustum};
use glam::{Mat4, Vec3, Vec4};

/// One directional-shadow cascade: its light-space view-projection and the
/// world-space near/far boundaries of the camera slice it covers.
#[derive(Debug, Clone, Copy)]
pub struct CascadeView {
    pub view_projection: Mat4,
    pub near: f32,
    pub far: f32,
    pub texel_size_world: f32,
}

/// Computes the `cascade_count + 1` boundary array from the camera's
/// near/far, `shadow_distance`, and the explicit, strictly increasing
/// `normalized_cascade_splits` (§3.1 invariant, §8.1 property 6).
#[must_use]
pub fn compute_cascade_boundaries(
    camera_near: f32,
    camera_far: f32,
    shadow_distance: f32,
    normalized_splits: &[f32],
) -> Vec<f32> {
    let effective_far = camera_far.min(shadow_distance);
    let mut boundaries = Vec::with_capacity(normalized_splits.len() + 2);
    boundaries.push(camera_near);
    for &s in normalized_splits {
        boundaries.push(camera_near + s * (effective_far - camera_near));
    }
    boundaries.push(effective_far);
    boundaries
}

/// Eight world-space corners of the camera frustum slice between `near`
/// and `far`, given the camera's inverse view-projection for its *full*
/// near/far range (the slice corners are the full-frustum corners
/// re-projected onto the slice's near/far planes in NDC space).
#[must_use]
pub fn frustum_slice_corners_world(inverse_view_proj: &Mat4, ndc_near_z: f32, ndc_far_z: f32) -> [Vec3; 8] {
    const NDC_XY: [(f32, f32); 4] = [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)];
    let mut corners = [Vec3::ZERO; 8];
    for (i, &(x, y)) in NDC_XY.iter().enumerate() {
        let near = inverse_view_proj.project_point3(Vec3::new(x, y, ndc_near_z));
        let far = inverse_view_proj.project_point3(Vec3::new(x, y, ndc_far_z));
        corners[i] = near;
        corners[i + 4] = far;
    }
    corners
}

/// Builds one cascade's light-space view-projection (§4.4.1): fit a sphere
/// around the slice corners, build an orthographic light-view AABB sized
/// to that sphere, extend the near plane to catch casters behind the
/// slice, and texel-snap the view origin to kill shimmer.
#[must_use]
pub fn build_cascade_view(
    light_direction: Vec3,
    slice_corners_world: &[Vec3; 8],
    shadow_extension: f32,
    shadow_map_resolution: u32,
) -> CascadeView {
    let center = slice_corners_world.iter().fold(Vec3::ZERO, |acc, &c| acc + c) / 8.0;
    let radius = slice_corners_world
        .iter()
        .map(|&c| c.distance(center))
        .fold(0.0f32, f32::max);

    let up = if light_direction.abs_diff_eq(Vec3::Y, 1e-3) {
        Vec3::Z
    } else {
        Vec3::Y
    };
    let eye = center - light_direction * (radius + shadow_extension);
    let view = Mat4::look_at_rh(eye, center, up);

    // Texel-snap: round the light-view-space center to the nearest texel
    // so the projection doesn't shift sub-texel amounts as the camera
    // moves, which causes shadow edge shimmer.
    let texel_size_world = (radius * 2.0) / shadow_map_resolution as f32;
    let center_light_space = view.transform_point3(center);
    let snapped_x = (center_light_space.x / texel_size_world).floor() * texel_size_world;
    let snapped_y = (center_light_space.y / texel_size_world).floor() * texel_size_world;
    let snap_offset = Vec3::new(
        snapped_x - center_light_space.x,
        snapped_y - center_light_space.y,
        0.0,
    );

    let near = 0.0;
    let far = radius * 2.0 + shadow_extension;
    let projection = reverse_z_orthographic(-radius, radius, -radius, radius, near, far);

    let snap_translation = Mat4::from_translation(snap_offset);
    let view_projection = projection * snap_translation * view;

    CascadeView {
        view_projection,
        near,
        far,
        texel_size_world,
    }
}

fn reverse_z_orthographic(l: f32, r: f32, b: f32, t: f32, near: f32, far: f32) -> Mat4 {
    let standard = Mat4::orthographic_rh(l, r, b, t, near, far);
    let flip_z = Mat4::from_cols(
        Vec4::new(1.0, 0.0, 0.0, 0.0),
        Vec4::new(0.0, 1.0, 0.0, 0.0),
        Vec4::new(0.0, 0.0, -1.0, 0.0),
        Vec4::new(0.0, 0.0, 1.0, 1.0),
    );
    flip_z * standard
}

/// Builds every cascade's view for the given camera and light direction.
/// `shadow_map_resolution` is one cascade slice's edge length in texels.
#[must_use]
pub fn build_cascade_views(
    camera: &Camera,
    camera_inverse_view_proj: &Mat4,
    light_direction: Vec3,
    boundaries: &[f32],
    shadow_extension: f32,
    shadow_map_resolution: u32,
) -> Vec<CascadeView> {
    let full_near = camera.near;
    let full_far = if camera.far.is_finite() { camera.far } else { boundaries.last().copied().unwrap_or(full_near + 1.0) };
    let full_range = (full_far - full_near).max(f32::EPSILON);

    let mut views = Vec::with_capacity(boundaries.len().saturating_sub(1));
    for window in boundaries.windows(2) {
        let (near, far) = (window[0], window[1]);
        // Reverse-Z NDC: near -> depth 1, far -> depth 0. Map the slice's
        // world-space near/far back to the camera's own NDC depth range.
        let ndc_near = 1.0 - (near - full_near) / full_range;
        let ndc_far = 1.0 - (far - full_near) / full_range;
        let corners = frustum_slice_corners_world(camera_inverse_view_proj, ndc_near, ndc_far);
        views.push(build_cascade_view(
            light_direction,
            &corners,
            shadow_extension,
            shadow_map_resolution,
        ));
    }
    views
}

/// Bounding-volume-vs-light-frustum test for a shadow receiver (§4.4.3
/// "Culling: bounding volume of shadow receivers vs light-view frustum").
#[must_use]
pub fn receiver_visible_in_cascade(cascade: &CascadeView, bounds: &BoundingBox) -> bool {
    let frustum = Frustum::from_matrix(&cascade.view_projection);
    frustum.intersects_box(bounds.min, bounds.max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundaries_strictly_increasing_and_correct_length() {
        let boundaries = compute_cascade_boundaries(0.1, 100.0, 100.0, &[0.1, 0.3, 0.6]);
        assert_eq!(boundaries.len(), 5);
        for w in boundaries.windows(2) {
            assert!(w[1] > w[0]);
        }
    }

    #[test]
    fn shadow_distance_clamps_effective_far() {
        let boundaries = compute_cascade_boundaries(0.1, 1000.0, 50.0, &[0.5]);
        assert_eq!(*boundaries.last().unwrap(), 50.0);
    }

    #[test]
    fn cascade_view_orthographic_half_extent_matches_sphere_radius() {
        let corners = [
            Vec3::new(-10.0, -10.0, 0.0),
            Vec3::new(10.0, -10.0, 0.0),
            Vec3::new(10.0, 10.0, 0.0),
            Vec3::new(-10.0, 10.0, 0.0),
            Vec3::new(-10.0, -10.0, 20.0),
            Vec3::new(10.0, -10.0, 20.0),
            Vec3::new(10.0, 10.0, 20.0),
            Vec3::new(-10.0, 10.0, 20.0),
        ];
        let view = build_cascade_view(Vec3::new(0.0, -1.0, 0.0), &corners, 5.0, 2048);
        // The fitted sphere radius should be within one texel of the
        // half-diagonal-derived radius (scenario S2's tolerance).
        let center = corners.iter().fold(Vec3::ZERO, |a, &c| a + c) / 8.0;
        let expected_radius = corners.iter().map(|&c| c.distance(center)).fold(0.0f32, f32::max);
        assert!((view.texel_size_world - (expected_radius * 2.0 / 2048.0)).abs() < 1e-5);
    }
}

//! Culling (§4.3): frustum construction, light culling, static submesh
//! culling, deterministic visible-list ordering.

use crate::scene::{Frustum, Light, LightKind};
use glam::Vec3;

/// `(instance_index, submesh_index)` pair naming one visible draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct VisibleDraw {
    pub instance_index: u32,
    pub submesh_index: u32,
}

/// Tests a light against a frustum (§4.3 "Light culling").
///
/// - Directional lights are always visible.
/// - Point lights: bounding sphere `(position, range)` vs frustum.
/// - Spot lights: bounding sphere of the cone first (cheap reject), then
///   refined with a cone-vs-frustum test if the sphere passes.
#[must_use]
pub fn light_is_visible(light: &Light, frustum: &Frustum) -> bool {
    match light.kind {
        LightKind::Directional(_) => true,
        LightKind::Point(p) => frustum.intersects_sphere(p.position, p.range),
        LightKind::Spot(s) => {
            let half_angle = s.outer_cone_cos.acos();
            let sphere_center = s.position + s.direction * (s.range * 0.5);
            let sphere_radius = cone_bounding_sphere_radius(s.range, half_angle);
            if !frustum.intersects_sphere(sphere_center, sphere_radius) {
                return false;
            }
            cone_intersects_frustum(s.position, s.direction, s.range, half_angle, frustum)
        }
    }
}

/// Bounding-sphere radius for a cone of the given length and half-angle,
/// using the sphere that circumscribes the cone's base cap when the angle
/// is wide and the cone's slant length when it is narrow — the standard
/// two-case formula avoids an oversized sphere for narrow spotlights.
fn cone_bounding_sphere_radius(range: f32, half_angle: f32) -> f32 {
    if half_angle > std::f32::consts::FRAC_PI_4 {
        range * half_angle.sin()
    } else {
        range / (2.0 * half_angle.cos())
    }
}

/// Conservative cone-vs-frustum refinement: reject if every frustum plane
/// separates the cone's apex-plus-base-circle point set from the frustum.
/// This is a cheap approximate test (§9 flags the exact atlas-importance
/// formula as implementer's choice; the same latitude applies here — a
/// full separating-axis cone/frustum test is not required, only a
/// conservative one that never *wrongly* culls a visible light).
fn cone_intersects_frustum(
    apex: Vec3,
    direction: Vec3,
    range: f32,
    half_angle: f32,
    frustum: &Frustum,
) -> bool {
    let base_center = apex + direction * range;
    let base_radius = range * half_angle.tan();
    for plane in &frustum.planes {
        let normal = Vec3::new(plane.x, plane.y, plane.z);
        let apex_dist = normal.dot(apex) + plane.w;
        let base_dist = normal.dot(base_center) + plane.w;
        if apex_dist < 0.0 && base_dist < -base_radius {
            return false;
        }
    }
    true
}

/// Static-instance culling (§4.3): instance AABB vs frustum, then refine
/// per submesh. Returns draws sorted by `(instance_index, submesh_index)`
/// for stable ordering across frames (§4.3 "Determinism", §8.1 invariant 3
/// via negative: fully-outside instances never appear here).
pub fn cull_static_instances(
    frustum: &Frustum,
    instances: &[(u32, crate::scene::BoundingBox, &[crate::scene::Submesh])],
    world_transforms: &[glam::Affine3A],
) -> Vec<VisibleDraw> {
    let mut visible = Vec::new();
    for &(instance_index, mesh_bounds, submeshes) in instances {
        let world = world_transforms[instance_index as usize];
        let world_bounds = mesh_bounds.transform(&world);
        if !frustum.intersects_box(world_bounds.min, world_bounds.max) {
            continue;
        }
        for (submesh_index, submesh) in submeshes.iter().enumerate() {
            let world_submesh_bounds = submesh.bounds.transform(&world);
            if frustum.intersects_box(world_submesh_bounds.min, world_submesh_bounds.max) {
                visible.push(VisibleDraw {
                    instance_index,
                    submesh_index: submesh_index as u32,
                });
            }
        }
    }
    visible.sort_unstable();
    visible
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{BoundingBox, Camera};

    #[test]
    fn directional_light_always_visible() {
        let mut cam = Camera::new_perspective(std::f32::consts::FRAC_PI_2, 1.0, 0.1, 100.0);
        cam.update_view_projection(&glam::Affine3A::IDENTITY);
        let frustum = Frustum::from_matrix(&cam.view_projection());
        let light = Light::new_directional(Vec3::new(0.0, -1.0, 0.0), Vec3::ONE, 1.0);
        assert!(light_is_visible(&light, &frustum));
    }

    #[test]
    fn point_light_far_behind_camera_is_culled() {
        let mut cam = Camera::new_perspective(std::f32::consts::FRAC_PI_2, 1.0, 0.1, 100.0);
        cam.update_view_projection(&glam::Affine3A::IDENTITY);
        let frustum = Frustum::from_matrix(&cam.view_projection());
        let light = Light::new_point(Vec3::new(0.0, 0.0, -50.0), 1.0, Vec3::ONE, 1.0);
        assert!(!light_is_visible(&light, &frustum));
    }

    #[test]
    fn visible_draws_are_sorted_deterministically() {
        let mut cam = Camera::new_perspective(std::f32::consts::FRAC_PI_2, 1.0, 0.1, 1000.0);
        let world = glam::Affine3A::from_translation(Vec3::new(0.0, 0.0, 10.0));
        cam.update_view_projection(&world);
        let frustum = Frustum::from_matrix(&cam.view_projection());

        let bounds = BoundingBox::new(Vec3::splat(-0.5), Vec3::splat(0.5));
        let submeshes = [crate::scene::Submesh {
            base_vertex: 0,
            first_index: 0,
            index_count: 3,
            material_slot: 0,
            bounds,
        }];
        let transforms = vec![glam::Affine3A::IDENTITY, glam::Affine3A::IDENTITY];
        let instances = vec![(1u32, bounds, &submeshes[..]), (0u32, bounds, &submeshes[..])];

        let visible = cull_static_instances(&frustum, &instances, &transforms);
        assert_eq!(
            visible,
            vec![
                VisibleDraw { instance_index: 0, submesh_index: 0 },
                VisibleDraw { instance_index: 1, submesh_index: 0 },
            ]
        );
    }
}

//! Scene-side entities (§3.1): the inputs to frame extraction.

pub mod camera;
pub mod instance;
pub mod light;
pub mod material;
pub mod mesh;
pub mod skeleton;

pub use camera::{Camera, CameraKind, Frustum, RenderCamera};
pub use instance::{MeshInstance, SkinnedMeshState, StaticMeshState};
pub use light::{Light, LightKind, ShadowConfig};
pub use material::{BlendMode, Material};
pub use mesh::{Mesh, Submesh};
pub use skeleton::{Bone, Skeleton, SkeletonNode};

use glam::Vec3;

/// Axis-aligned bounding box, used throughout culling and shadow fitting.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min: Vec3,
    pub max: Vec3,
}

impl BoundingBox {
    #[must_use]
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    #[must_use]
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    #[must_use]
    pub fn extents(&self) -> Vec3 {
        (self.max - self.min) * 0.5
    }

    #[must_use]
    pub fn radius(&self) -> f32 {
        self.extents().length()
    }

    /// Transforms the box by a world matrix, recomputing min/max from the
    /// 8 transformed corners (§4.3 "Static submesh culling").
    #[must_use]
    pub fn transform(&self, m: &glam::Affine3A) -> Self {
        let mut min = Vec3::splat(f32::INFINITY);
        let mut max = Vec3::splat(f32::NEG_INFINITY);
        for &x in &[self.min.x, self.max.x] {
            for &y in &[self.min.y, self.max.y] {
                for &z in &[self.min.z, self.max.z] {
                    let p = m.transform_point3(Vec3::new(x, y, z));
                    min = min.min(p);
                    max = max.max(p);
                }
            }
        }
        Self { min, max }
    }

    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }
}

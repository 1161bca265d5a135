//! Mesh (§3.1): immutable after upload.

use crate::assets::GeometryHandle;
use crate::scene::BoundingBox;
use smallvec::SmallVec;

/// A contiguous index range within a mesh sharing one material slot.
#[derive(Debug, Clone, Copy)]
pub struct Submesh {
    pub base_vertex: i32,
    pub first_index: u32,
    pub index_count: u32,
    pub material_slot: u32,
    pub bounds: BoundingBox,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexFormat {
    U16,
    U32,
}

/// Optional skinning payload: present only for skinned meshes.
#[derive(Debug, Clone)]
pub struct SkinningData {
    /// Skeleton node array, parent indices and bind transforms live on
    /// [`crate::scene::Skeleton`]; this only pins bone-weight/index buffer
    /// lengths equal the vertex count (§3.1 invariant).
    pub vertex_count: u32,
}

#[derive(Debug, Clone)]
pub struct Mesh {
    pub name: String,
    pub submeshes: SmallVec<[Submesh; 4]>,
    pub material_slot_names: Vec<String>,
    pub bounds: BoundingBox,
    pub index_format: IndexFormat,
    pub total_index_count: u32,
    pub skinning: Option<SkinningData>,
    /// Back-reference to the GPU-resident vertex/index buffers (§4.1
    /// `RenderManager`); passes resolve a `VisibleDraw`'s instance to this
    /// handle to look them up in [`crate::resources::mesh_pool::GpuMeshPool`].
    pub asset: GeometryHandle,
}

impl Mesh {
    /// §3.1 invariant / §8.1 property 8: index buffer element count equals
    /// the sum of submesh index counts.
    #[must_use]
    pub fn indices_are_consistent(&self) -> bool {
        let sum: u32 = self.submeshes.iter().map(|s| s.index_count).sum();
        sum == self.total_index_count
    }

    /// §3.1 invariant: the instance's material array length must equal the
    /// mesh's submesh count; missing slots default to the built-in default
    /// material (handled by the caller, see `crate::packet`).
    #[must_use]
    pub fn submesh_count(&self) -> usize {
        self.submeshes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn submesh(index_count: u32) -> Submesh {
        Submesh {
            base_vertex: 0,
            first_index: 0,
            index_count,
            material_slot: 0,
            bounds: BoundingBox::new(Vec3::ZERO, Vec3::ONE),
        }
    }

    #[test]
    fn index_count_sum_matches() {
        let mesh = Mesh {
            name: "m".into(),
            submeshes: SmallVec::from_vec(vec![submesh(3), submesh(6)]),
            material_slot_names: vec!["a".into(), "b".into()],
            bounds: BoundingBox::new(Vec3::ZERO, Vec3::ONE),
            index_format: IndexFormat::U16,
            total_index_count: 9,
            skinning: None,
            asset: GeometryHandle::default(),
        };
        assert!(mesh.indices_are_consistent());
    }

    #[test]
    fn mismatched_index_count_is_detected() {
        let mesh = Mesh {
            name: "m".into(),
            submeshes: SmallVec::from_vec(vec![submesh(3)]),
            material_slot_names: vec!["a".into()],
            bounds: BoundingBox::new(Vec3::ZERO, Vec3::ONE),
            index_format: IndexFormat::U16,
            total_index_count: 99,
            skinning: None,
            asset: GeometryHandle::default(),
        };
        assert!(!mesh.indices_are_consistent());
    }
}

//! Mesh instances (§3.1): the thing registered with the renderer.

use crate::assets::{GeometryHandle, MaterialHandle};
use glam::Affine3A;
use smallvec::SmallVec;

#[derive(Debug, Clone)]
pub struct StaticMeshState {
    pub world_transform: Affine3A,
}

#[derive(Debug, Clone)]
pub struct SkinnedMeshState {
    pub world_transform: Affine3A,
    /// Index into the mesh's animation array; `None` = bind pose.
    pub current_animation: Option<u32>,
    /// Seconds since the current animation started (§4.2 step 4).
    pub elapsed_time: f32,
}

#[derive(Debug, Clone)]
pub enum MeshInstanceState {
    Static(StaticMeshState),
    Skinned(SkinnedMeshState),
}

/// Either a `StaticMeshComponent` or a `SkinnedMeshComponent` (§3.1).
#[derive(Debug, Clone)]
pub struct MeshInstance {
    pub mesh: GeometryHandle,
    /// Per-submesh material override. Length should equal the mesh's
    /// submesh count; missing slots (index out of range, or `None`) default
    /// to the built-in default material (§3.1 invariant, §7 recoverable).
    pub material_overrides: SmallVec<[Option<MaterialHandle>; 4]>,
    pub state: MeshInstanceState,
    pub visible: bool,
}

impl MeshInstance {
    #[must_use]
    pub fn world_transform(&self) -> Affine3A {
        match &self.state {
            MeshInstanceState::Static(s) => s.world_transform,
            MeshInstanceState::Skinned(s) => s.world_transform,
        }
    }

    #[must_use]
    pub fn is_skinned(&self) -> bool {
        matches!(self.state, MeshInstanceState::Skinned(_))
    }
}

//! Frame packet + extraction (§3.2, §4.2).
//!
//! A [`FramePacket`] is the renderer's owned, position-independent copy of
//! everything needed to draw one frame. References between packet entities
//! are by local index into the packet's own arrays, never by pointer —
//! this is what lets a packet be processed off the game thread safely.

use crate::assets::{GeometryHandle, MaterialHandle};
use crate::scene::{Camera, Light, Material, Mesh};
use crate::settings::RenderSettings;
use bitflags::bitflags;
use glam::Affine3A;
use parking_lot::Mutex;
use std::sync::Arc;

bitflags! {
    /// Cheap feature summary so passes can skip whole stages without
    /// scanning every instance (mirrors the teacher's `SceneFeatures`).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct SceneFeatures: u32 {
        const HAS_SKINNED_MESHES   = 1 << 0;
        const HAS_SHADOW_CASTERS   = 1 << 1;
        const HAS_POINT_LIGHTS     = 1 << 2;
        const HAS_SPOT_LIGHTS      = 1 << 3;
        const HAS_SKYBOX           = 1 << 4;
    }
}

/// A validation issue found during extraction (§7 "Validation"); the
/// offending object is skipped for the frame, not aborted.
#[derive(Debug, Clone)]
pub struct ValidationIssue {
    pub description: String,
}

/// One light, flattened into packet-local form.
#[derive(Debug, Clone, Copy)]
pub struct LightData {
    pub light: Light,
    pub shadow_atlas_slot: Option<u32>,
}

/// One mesh instance, flattened: local indices into `meshes`/`materials`.
#[derive(Debug, Clone)]
pub struct InstanceData {
    pub mesh_index: u32,
    pub material_indices: smallvec::SmallVec<[u32; 4]>,
    pub world_transform: Affine3A,
    pub skinned_data_index: Option<u32>,
}

/// Skinned-instance animation snapshot (§4.2 step 4).
#[derive(Debug, Clone, Copy)]
pub struct SkinnedMeshData {
    pub skeleton_index: u32,
    pub current_animation: Option<u32>,
    pub elapsed_ticks: f32,
}

/// One line segment in the gizmo draw queue (§3.2, §4.5 step 9). Gizmos are
/// display-space, colored from the palette rather than scene-lit.
#[derive(Debug, Clone, Copy)]
pub struct GizmoLine {
    pub start: glam::Vec3,
    pub end: glam::Vec3,
    pub color: [f32; 4],
}

/// Self-contained, position-independent snapshot of one frame's scene
/// state (§3.2).
#[derive(Default)]
pub struct FramePacket {
    pub lights: Vec<LightData>,
    pub meshes: Vec<Mesh>,
    pub materials: Vec<Material>,
    pub instances: Vec<InstanceData>,
    pub skinned: Vec<SkinnedMeshData>,
    pub cameras: Vec<Camera>,

    /// Gizmo line queue (§3.2), cleared and refilled every frame by
    /// whatever debug-draw calls happened since the last extraction.
    pub gizmo_lines: Vec<GizmoLine>,

    /// Shared-ownership handles kept alive until the GPU is done with this
    /// frame (§3.2 "Ownership/lifecycle").
    pub keep_alive: Vec<Arc<dyn std::any::Any + Send + Sync>>,

    pub settings: RenderSettings,
    pub features: SceneFeatures,
    pub validation_issues: Vec<ValidationIssue>,
}

impl FramePacket {
    pub fn clear(&mut self) {
        self.lights.clear();
        self.meshes.clear();
        self.materials.clear();
        self.instances.clear();
        self.skinned.clear();
        self.cameras.clear();
        self.gizmo_lines.clear();
        self.keep_alive.clear();
        self.features = SceneFeatures::empty();
        self.validation_issues.clear();
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty() && self.lights.is_empty() && self.cameras.is_empty()
    }
}

/// Scene-side registered object, queried during extraction (§6.2).
pub trait SceneQuery {
    fn lights(&self) -> Vec<Light>;
    fn materials(&self) -> Vec<Material>;
    fn meshes(&self) -> Vec<Mesh>;
    fn instances(&self) -> Vec<(GeometryHandle, Vec<Option<MaterialHandle>>, Affine3A, Option<SkinnedMeshData>)>;
    fn cameras(&self) -> Vec<Camera>;
    fn resolve_mesh_index(&self, handle: GeometryHandle) -> Option<u32>;
    fn resolve_material_index(&self, handle: MaterialHandle) -> Option<u32>;
}

/// A retirement fence: signalled once the GPU work reading a packet slot
/// has completed (§3.2, §5 "Suspension / blocking points"). Backed by a
/// single-slot channel rather than a condvar — the render thread's
/// `signal()` and the game thread's blocking `wait()` are naturally a
/// producer/consumer pair, not shared mutable state.
pub struct RetirementFence {
    tx: flume::Sender<()>,
    rx: flume::Receiver<()>,
}

impl RetirementFence {
    #[must_use]
    pub fn new() -> Self {
        let (tx, rx) = flume::bounded(1);
        // A freshly created slot has no in-flight GPU work yet, so it
        // starts pre-signalled: the first `acquire_next()` must not block.
        let _ = tx.try_send(());
        Self { tx, rx }
    }

    /// Blocks the calling (game) thread until the render thread signals
    /// this slot retired. Consumes the signal, so the fence is
    /// automatically ready for its next cycle.
    pub fn wait(&self) {
        let _ = self.rx.recv();
    }

    /// Called by the render thread once the GPU work reading this slot has
    /// completed. Non-blocking; a slot already signalled and not yet
    /// waited-on is left as-is.
    pub fn signal(&self) {
        let _ = self.tx.try_send(());
    }
}

impl Default for RetirementFence {
    fn default() -> Self {
        Self::new()
    }
}

/// `N = 2` ring of frame packets, each gated by its own retirement fence
/// (§3.2, §5).
pub struct FramePacketRing {
    slots: Vec<Mutex<FramePacket>>,
    fences: Vec<Arc<RetirementFence>>,
    next: usize,
}

impl FramePacketRing {
    #[must_use]
    pub fn new() -> Self {
        let n = crate::FRAMES_IN_FLIGHT;
        Self {
            slots: (0..n).map(|_| Mutex::new(FramePacket::default())).collect(),
            fences: (0..n).map(|_| Arc::new(RetirementFence::default())).collect(),
            next: 0,
        }
    }

    /// Acquires the next packet slot, blocking only on *its* retirement
    /// fence (§4.2 step 1, §5: "the game thread never waits for the GPU
    /// except on the retirement fence for its packet slot").
    pub fn acquire_next(&mut self) -> (usize, &Mutex<FramePacket>, Arc<RetirementFence>) {
        let index = self.next;
        self.next = (self.next + 1) % self.slots.len();
        self.fences[index].wait();
        (index, &self.slots[index], Arc::clone(&self.fences[index]))
    }
}

impl Default for FramePacketRing {
    fn default() -> Self {
        Self::new()
    }
}

/// Extraction (§4.2): copies scene state into a packet slot, resolving mesh/
/// material references to local indices and validating per-object
/// invariants. Validation failures are recorded and the offending instance
/// skipped, not fatal.
pub fn extract_current_state(scene: &dyn SceneQuery, settings: &RenderSettings, packet: &mut FramePacket) {
    packet.clear();
    packet.settings = settings.clone();

    packet.meshes = scene.meshes();
    packet.materials = scene.materials();
    packet.lights = scene.lights().into_iter().map(|light| LightData {
        light,
        shadow_atlas_slot: None,
    }).collect();

    for light in &packet.lights {
        match light.light.kind {
            crate::scene::LightKind::Point(_) => packet.features |= SceneFeatures::HAS_POINT_LIGHTS,
            crate::scene::LightKind::Spot(_) => packet.features |= SceneFeatures::HAS_SPOT_LIGHTS,
            crate::scene::LightKind::Directional(_) => {}
        }
        if light.light.casts_shadow() {
            packet.features |= SceneFeatures::HAS_SHADOW_CASTERS;
        }
    }

    for (mesh_handle, material_handles, world_transform, skinned) in scene.instances() {
        let Some(mesh_index) = scene.resolve_mesh_index(mesh_handle) else {
            packet.validation_issues.push(ValidationIssue {
                description: "instance references an unknown mesh handle".to_string(),
            });
            continue;
        };

        let submesh_count = packet.meshes[mesh_index as usize].submesh_count();
        if material_handles.len() != submesh_count {
            packet.validation_issues.push(ValidationIssue {
                description: format!(
                    "instance material slot count ({}) does not match mesh submesh count ({submesh_count})",
                    material_handles.len()
                ),
            });
            // §7 recoverable: missing slots default to index 0 (default
            // material), rather than skipping the whole instance.
        }

        if !world_transform.matrix3.determinant().is_finite() {
            packet.validation_issues.push(ValidationIssue {
                description: "instance has a non-finite (NaN) world transform".to_string(),
            });
            continue;
        }

        let material_indices = (0..submesh_count)
            .map(|slot| {
                material_handles
                    .get(slot)
                    .copied()
                    .flatten()
                    .and_then(|h| scene.resolve_material_index(h))
                    .unwrap_or(0)
            })
            .collect();

        let skinned_data_index = skinned.map(|s| {
            packet.features |= SceneFeatures::HAS_SKINNED_MESHES;
            packet.skinned.push(s);
            (packet.skinned.len() - 1) as u32
        });

        packet.instances.push(InstanceData {
            mesh_index,
            material_indices,
            world_transform,
            skinned_data_index,
        });
    }

    packet.cameras = scene.cameras();
}

#[cfg(test)]
mod tests {
    use super::*;

    /// §8.1 invariant 1: a packet slot is never concurrently written and
    /// read — expressed here as "acquiring a slot always waits for its
    /// fence before returning it".
    #[test]
    fn acquire_blocks_until_fence_signalled() {
        let mut ring = FramePacketRing::new();
        let (_idx, _slot, fence) = ring.acquire_next();
        fence.signal();
        // Second acquisition of the same slot (after wrapping) must not
        // deadlock now that the fence has signalled.
        for _ in 0..crate::FRAMES_IN_FLIGHT {
            let (_, _, fence) = ring.acquire_next();
            fence.signal();
        }
    }

    #[test]
    fn size_of_instance_data_is_reasonable() {
        assert!(std::mem::size_of::<InstanceData>() < 256);
    }
}

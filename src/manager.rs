//! Render manager (§4.1, §4.5): owns the GPU device/queue/surface, the
//! transient render-target pool, and the default resources every frame can
//! fall back to. Grounded on the teacher's `WgpuContext` (device/queue/
//! surface/config ownership) and `ResourceManager` (default-resource and
//! retirement bookkeeping).

use crate::assets::{GeometryHandle, MaterialHandle, TextureHandle};
use crate::errors::{RenderError, Result};
use crate::resources::mesh_pool::GpuMeshPool;
use crate::resources::primitives;
use crate::resources::transient_pool::TransientTexturePool;
use crate::scene::Material;
use crate::settings::RenderSettings;
use bumpalo::Bump;
use slotmap::SlotMap;
use std::sync::Arc;

/// The GPU device/queue/surface triple, configured for one output window.
/// Owns nothing scene-specific — just the hardware handle (mirrors the
/// teacher's `WgpuContext`, minus the windowing dependency this crate
/// drops per its Non-goals).
pub struct GpuContext {
    pub device: Arc<wgpu::Device>,
    pub queue: Arc<wgpu::Queue>,
    pub surface_format: wgpu::TextureFormat,
}

impl GpuContext {
    /// Requests an adapter/device pair. `compatible_surface` is `None` for
    /// headless/offscreen use (tests, baking), matching the teacher's
    /// surface-optional init path.
    pub async fn new(
        instance: &wgpu::Instance,
        compatible_surface: Option<&wgpu::Surface<'_>>,
        power_preference: wgpu::PowerPreference,
    ) -> Result<Self> {
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference,
                compatible_surface,
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| RenderError::AdapterRequestFailed(e.to_string()))?;

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("vesper-device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: wgpu::MemoryHints::Performance,
                ..Default::default()
            })
            .await?;

        let surface_format = compatible_surface
            .and_then(|s| s.get_capabilities(&adapter).formats.first().copied())
            .unwrap_or(wgpu::TextureFormat::Bgra8UnormSrgb);

        Ok(Self {
            device: Arc::new(device),
            queue: Arc::new(queue),
            surface_format,
        })
    }
}

/// Default fallback resources every material/instance can point at instead
/// of special-casing "missing" everywhere downstream (§7 recoverable
/// validation, mirrors the teacher's `dummy_texture`/default-material
/// pattern in `ResourceManager`).
pub struct DefaultResources {
    pub default_material: MaterialHandle,
    pub white_texture: TextureHandle,
    pub unit_cube: GeometryHandle,
    pub unit_plane: GeometryHandle,
    pub unit_sphere: GeometryHandle,
}

/// A GPU resource kept alive past its packet's lifetime until the GPU is
/// confirmed done reading it (§3.2 "Ownership/lifecycle"); pushed onto a
/// per-frame retirement list rather than dropped at handle-release time.
pub enum KeepAliveResource {
    Buffer(wgpu::Buffer),
    Texture(wgpu::Texture),
    Material(Arc<Material>),
}

/// Top-level owner of GPU state across frames: acquires per-frame command
/// encoders, bump-allocates upload scratch space, and defers destruction of
/// resources still referenced by in-flight frames.
///
/// Grounded on the teacher's `Renderer`/`ResourceManager` split: this type
/// plays both roles at a smaller scope, since this crate's Non-goals (§12)
/// drop asset import and windowing, leaving resource bookkeeping as the
/// remaining responsibility.
pub struct RenderManager {
    pub gpu: GpuContext,
    pub transient_pool: TransientTexturePool,
    pub defaults: DefaultResources,
    pub mesh_pool: GpuMeshPool,
    /// Mints [`GeometryHandle`]s for the built-in default meshes. The scene
    /// side's own geometry table (outside this crate's scope, §6.2) mints
    /// handles for everything else; this slot map exists only so
    /// `RenderManager` can hand out valid keys for its own defaults.
    geometry_keys: SlotMap<GeometryHandle, ()>,
    upload_arena: Bump,
    /// Per-slot retirement lists, indexed the same way as the frame packet
    /// ring (§3.2): resources freed while slot N is still in flight wait
    /// here until slot N's retirement fence signals.
    retirement_lists: Vec<Vec<KeepAliveResource>>,
    frame_index: u64,
}

impl RenderManager {
    /// Builds a manager with the built-in default meshes (cube/plane/sphere,
    /// §4.1) uploaded to the GPU and ready to draw.
    #[must_use]
    pub fn new(gpu: GpuContext) -> Self {
        let n = crate::FRAMES_IN_FLIGHT;
        let mut geometry_keys = SlotMap::with_key();
        let mut mesh_pool = GpuMeshPool::new();

        let unit_cube = geometry_keys.insert(());
        let (cube_vertices, cube_indices) = primitives::unit_cube();
        mesh_pool.register(&gpu.device, unit_cube, &cube_vertices, &cube_indices);

        let unit_plane = geometry_keys.insert(());
        let (plane_vertices, plane_indices) = primitives::unit_plane();
        mesh_pool.register(&gpu.device, unit_plane, &plane_vertices, &plane_indices);

        let unit_sphere = geometry_keys.insert(());
        let (sphere_vertices, sphere_indices) = primitives::unit_sphere();
        mesh_pool.register(&gpu.device, unit_sphere, &sphere_vertices, &sphere_indices);

        Self {
            gpu,
            transient_pool: TransientTexturePool::new(),
            defaults: DefaultResources {
                default_material: MaterialHandle::default(),
                white_texture: TextureHandle::dummy_white(),
                unit_cube,
                unit_plane,
                unit_sphere,
            },
            mesh_pool,
            geometry_keys,
            upload_arena: Bump::new(),
            retirement_lists: (0..n).map(|_| Vec::new()).collect(),
            frame_index: 0,
        }
    }

    /// Mints a fresh geometry handle and uploads `vertices`/`indices` under
    /// it (§4.1 "readonly texture/mesh creation from a scratch buffer").
    pub fn register_mesh(&mut self, vertices: &[crate::resources::mesh_pool::Vertex], indices: &[u32]) -> GeometryHandle {
        let handle = self.geometry_keys.insert(());
        self.mesh_pool.register(&self.gpu.device, handle, vertices, indices);
        handle
    }

    /// Acquires a command encoder for the current frame (§4.5 "Command
    /// submission"). One encoder per frame; passes record into it in the
    /// fixed §4.5 ordering, it is submitted once at frame end.
    #[must_use]
    pub fn acquire_command_encoder(&self) -> wgpu::CommandEncoder {
        self.gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("vesper-frame-encoder"),
            })
    }

    /// Bump-allocates scratch space for this frame's CPU-side staging
    /// writes (instance/light/bone matrix buffers before `queue.write_buffer`).
    /// Reset once per frame; never retained across frames.
    pub fn upload_scratch(&mut self) -> &mut Bump {
        &mut self.upload_arena
    }

    pub fn begin_new_frame(&mut self, _settings: &RenderSettings) {
        self.upload_arena.reset();
        self.transient_pool.begin_new_frame();
        self.transient_pool.trim();
        self.frame_index += 1;
    }

    /// Defers destruction of `resource` until the packet slot it was used
    /// by has retired (§3.2).
    pub fn retire_after(&mut self, slot: usize, resource: KeepAliveResource) {
        self.retirement_lists[slot].push(resource);
    }

    /// Drops every resource queued against `slot`; call once that slot's
    /// retirement fence has signalled.
    pub fn drain_retired(&mut self, slot: usize) {
        self.retirement_lists[slot].clear();
    }

    #[must_use]
    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retirement_list_is_empty_until_something_is_retired() {
        let transient = TransientTexturePool::new();
        assert_eq!(transient.total_texture_count(), 0);
    }
}

//! GPU-resident mesh storage (§3.1 "immutable after upload", §4.1).
//!
//! Vertex/index buffers are uploaded once, keyed by the same
//! [`GeometryHandle`] the scene registers instances against, and looked up
//! by every draw-submitting pass via `FramePacket.meshes[..].asset`. Mirrors
//! the teacher's `GpuBuffer`/`ResourceManager` ownership split: CPU metadata
//! lives on [`crate::scene::Mesh`], the GPU bytes live here.

use crate::assets::GeometryHandle;
use bytemuck::{Pod, Zeroable};
use slotmap::SecondaryMap;
use wgpu::util::DeviceExt;

/// One vertex: position, normal, UV. Matches the shared vertex layout every
/// draw/depth pipeline declares (§6.3 shader ABI).
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

impl Vertex {
    const ATTRIBS: [wgpu::VertexAttribute; 3] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3, 2 => Float32x2];

    #[must_use]
    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBS,
        }
    }
}

/// One mesh's GPU-resident buffers.
pub struct GpuMesh {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub index_count: u32,
}

/// Pool of uploaded meshes, keyed by [`GeometryHandle`] (§4.1 component 2).
#[derive(Default)]
pub struct GpuMeshPool {
    meshes: SecondaryMap<GeometryHandle, GpuMesh>,
}

impl GpuMeshPool {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Uploads `vertices`/`indices` once and stores the resulting buffers
    /// under `handle`. Re-registering an existing handle replaces its
    /// buffers (the old ones are dropped immediately — callers that need
    /// deferred destruction should route through
    /// [`crate::manager::RenderManager::retire_after`] first).
    pub fn register(
        &mut self,
        device: &wgpu::Device,
        handle: GeometryHandle,
        vertices: &[Vertex],
        indices: &[u32],
    ) {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("mesh-vertex-buffer"),
            contents: bytemuck::cast_slice(vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("mesh-index-buffer"),
            contents: bytemuck::cast_slice(indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        self.meshes.insert(
            handle,
            GpuMesh {
                vertex_buffer,
                index_buffer,
                index_count: indices.len() as u32,
            },
        );
    }

    #[must_use]
    pub fn get(&self, handle: GeometryHandle) -> Option<&GpuMesh> {
        self.meshes.get(handle)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.meshes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty()
    }
}

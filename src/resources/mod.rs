//! GPU resource wrappers: typed buffers and the transient render-target pool.

pub mod buffer;
pub mod mesh_pool;
pub mod primitives;
pub mod transient_pool;

pub use buffer::{ConstantBuffer, StructuredBuffer};
pub use mesh_pool::{GpuMesh, GpuMeshPool, Vertex};
pub use transient_pool::{TransientTextureDesc, TransientTextureId, TransientTexturePool};

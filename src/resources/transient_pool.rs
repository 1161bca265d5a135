//! Transient render-target pool (§4.1).
//!
//! `GetTemporaryRenderTarget(desc)` returns a render target matching `desc`
//! exactly. Matching is by (width, height, color format, sample count, UAV
//! flag) equality. Returned targets carry an `age_in_frames` counter reset
//! to zero on acquisition and incremented at `begin_new_frame`; targets
//! older than [`MAX_IDLE_FRAMES`] without reuse are evicted.

use rustc_hash::FxHashMap;
use std::sync::atomic::{AtomicU64, Ordering};

/// Targets idle for more than this many frames are destroyed (§4.1, test S6).
pub const MAX_IDLE_FRAMES: u32 = 10;

static NEXT_TEXTURE_ID: AtomicU64 = AtomicU64::new(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TransientTextureId(u64);

/// Descriptor a transient texture is keyed on. Two requests with equal
/// descriptors may share the same underlying allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TransientTextureDesc {
    pub width: u32,
    pub height: u32,
    pub format: wgpu::TextureFormat,
    pub sample_count: u32,
    pub mip_level_count: u32,
    pub usage: wgpu::TextureUsages,
}

impl TransientTextureDesc {
    #[must_use]
    pub fn color_target(width: u32, height: u32, format: wgpu::TextureFormat) -> Self {
        Self {
            width,
            height,
            format,
            sample_count: 1,
            mip_level_count: 1,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
        }
    }

    #[must_use]
    pub fn depth_target(width: u32, height: u32, format: wgpu::TextureFormat) -> Self {
        Self {
            width,
            height,
            format,
            sample_count: 1,
            mip_level_count: 1,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
        }
    }
}

struct PooledTexture {
    id: TransientTextureId,
    texture: wgpu::Texture,
    view: wgpu::TextureView,
    age_in_frames: u32,
    in_use: bool,
}

impl PooledTexture {
    fn create(device: &wgpu::Device, desc: &TransientTextureDesc, label: &str) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size: wgpu::Extent3d {
                width: desc.width,
                height: desc.height,
                depth_or_array_layers: 1,
            },
            mip_level_count: desc.mip_level_count,
            sample_count: desc.sample_count,
            dimension: wgpu::TextureDimension::D2,
            format: desc.format,
            usage: desc.usage,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Self {
            id: TransientTextureId(NEXT_TEXTURE_ID.fetch_add(1, Ordering::Relaxed)),
            texture,
            view,
            age_in_frames: 0,
            in_use: true,
        }
    }
}

/// Pool of entries sharing one descriptor key. Several distinct allocations
/// may exist for the same key if all are simultaneously in use within a
/// frame (e.g. ping-pong color targets).
#[derive(Default)]
struct Bucket {
    entries: Vec<PooledTexture>,
}

/// Transient render-target pool, mutex-free at the call site — callers are
/// expected to hold the pool behind the same mutex `RenderManager` already
/// uses for its other per-frame bookkeeping.
#[derive(Default)]
pub struct TransientTexturePool {
    buckets: FxHashMap<TransientTextureDesc, Bucket>,
}

impl TransientTexturePool {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a texture matching `desc`, reusing an idle one if available,
    /// otherwise creating a new allocation.
    pub fn allocate(
        &mut self,
        device: &wgpu::Device,
        desc: TransientTextureDesc,
        label: &str,
    ) -> (TransientTextureId, &wgpu::TextureView) {
        let bucket = self.buckets.entry(desc).or_default();

        if let Some(pos) = bucket.entries.iter().position(|e| !e.in_use) {
            let entry = &mut bucket.entries[pos];
            entry.in_use = true;
            entry.age_in_frames = 0;
            return (entry.id, &entry.view);
        }

        bucket.entries.push(PooledTexture::create(device, &desc, label));
        let entry = bucket.entries.last().unwrap();
        (entry.id, &entry.view)
    }

    #[must_use]
    pub fn get_view(&self, id: TransientTextureId) -> Option<&wgpu::TextureView> {
        self.find(id).map(|e| &e.view)
    }

    #[must_use]
    pub fn get_texture(&self, id: TransientTextureId) -> Option<&wgpu::Texture> {
        self.find(id).map(|e| &e.texture)
    }

    fn find(&self, id: TransientTextureId) -> Option<&PooledTexture> {
        self.buckets
            .values()
            .flat_map(|b| b.entries.iter())
            .find(|e| e.id == id)
    }

    /// Marks all entries free and bumps their idle-age counter. Called once
    /// per frame after the previous frame's usages have been released.
    pub fn begin_new_frame(&mut self) {
        for bucket in self.buckets.values_mut() {
            for entry in &mut bucket.entries {
                if !entry.in_use {
                    entry.age_in_frames += 1;
                } else {
                    entry.in_use = false;
                }
            }
        }
    }

    /// Destroys entries idle for more than [`MAX_IDLE_FRAMES`].
    pub fn trim(&mut self) {
        for bucket in self.buckets.values_mut() {
            bucket
                .entries
                .retain(|e| e.in_use || e.age_in_frames <= MAX_IDLE_FRAMES);
        }
        self.buckets.retain(|_, b| !b.entries.is_empty());
    }

    #[must_use]
    pub fn total_texture_count(&self) -> usize {
        self.buckets.values().map(|b| b.entries.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_device() -> Option<(wgpu::Device, wgpu::Queue)> {
        pollster::block_on(async {
            let instance = wgpu::Instance::default();
            let adapter = instance
                .request_adapter(&wgpu::RequestAdapterOptions::default())
                .await
                .ok()?;
            adapter
                .request_device(&wgpu::DeviceDescriptor::default())
                .await
                .ok()
        })
    }

    #[test]
    fn reuses_released_allocation_within_idle_window() {
        let Some((device, _queue)) = test_device() else {
            eprintln!("skipping: no GPU adapter available in test environment");
            return;
        };
        let mut pool = TransientTexturePool::new();
        let desc = TransientTextureDesc::color_target(1920, 1080, wgpu::TextureFormat::Rgba8Unorm);

        let (first_id, _) = pool.allocate(&device, desc, "rt");
        pool.begin_new_frame(); // release
        let (second_id, _) = pool.allocate(&device, desc, "rt");
        assert_eq!(first_id, second_id);

        // Age it past the window without reuse.
        for _ in 0..=MAX_IDLE_FRAMES {
            pool.begin_new_frame();
        }
        pool.trim();
        assert_eq!(pool.total_texture_count(), 0);
    }
}

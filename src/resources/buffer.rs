//! Typed GPU buffer wrappers (§4.1 component 3).
//!
//! `ConstantBuffer<T>` and `StructuredBuffer<T>` are two thin specializations
//! over the same CPU-mirrored, version-tracked buffer shape: a constant
//! buffer holds exactly one `T` (per-frame/per-view/per-draw constants), a
//! structured buffer holds a `Vec<T>` (light arrays, bone matrices, etc).
//! Both track a version counter so the render thread can skip re-uploading
//! unchanged data between frames in flight.

use bytemuck::Pod;
use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_BUFFER_ID: AtomicU64 = AtomicU64::new(1);

/// Anything that can be viewed as POD bytes for upload.
pub trait GpuData {
    fn as_bytes(&self) -> &[u8];
    fn byte_size(&self) -> usize;
}

impl<T: Pod> GpuData for T {
    fn as_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(self)
    }
    fn byte_size(&self) -> usize {
        std::mem::size_of::<T>()
    }
}

impl<T: Pod> GpuData for Vec<T> {
    fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(self)
    }
    fn byte_size(&self) -> usize {
        std::mem::size_of::<T>() * self.len()
    }
}

/// Lightweight handle (id, usage, size, version). No CPU data owned; used to
/// reference a GPU-resident buffer from the frame packet without pinning its
/// CPU mirror.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BufferRef {
    pub id: u64,
    pub usage: wgpu::BufferUsages,
    pub size: usize,
    pub version: u64,
}

impl BufferRef {
    #[must_use]
    pub fn new(size: usize, usage: wgpu::BufferUsages) -> Self {
        Self {
            id: NEXT_BUFFER_ID.fetch_add(1, Ordering::Relaxed),
            usage,
            size,
            version: 0,
        }
    }
}

struct CpuState<T> {
    data: T,
    version: u64,
    size: usize,
}

/// A CPU-mirrored buffer holding exactly one `T`: per-frame, per-view, and
/// per-draw constants (§4.1, §6.3).
pub struct ConstantBuffer<T: GpuData> {
    id: u64,
    usage: wgpu::BufferUsages,
    inner: RwLock<CpuState<T>>,
}

impl<T: GpuData + Default> ConstantBuffer<T> {
    #[must_use]
    pub fn new_uniform() -> Self {
        Self::new(T::default())
    }
}

impl<T: GpuData> ConstantBuffer<T> {
    pub fn new(data: T) -> Self {
        let size = data.byte_size();
        Self {
            id: NEXT_BUFFER_ID.fetch_add(1, Ordering::Relaxed),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            inner: RwLock::new(CpuState {
                data,
                version: 0,
                size,
            }),
        }
    }

    #[must_use]
    pub fn id(&self) -> u64 {
        self.id
    }

    #[must_use]
    pub fn version(&self) -> u64 {
        self.inner.read().version
    }

    #[must_use]
    pub fn handle(&self) -> BufferRef {
        let state = self.inner.read();
        BufferRef {
            id: self.id,
            usage: self.usage,
            size: state.size,
            version: state.version,
        }
    }

    pub fn read(&self) -> BufferReadGuard<'_, T> {
        BufferReadGuard {
            guard: self.inner.read(),
        }
    }

    pub fn write(&self) -> BufferWriteGuard<'_, T> {
        BufferWriteGuard {
            guard: self.inner.write(),
            changed: true,
        }
    }
}

/// A CPU-mirrored buffer holding a `Vec<T>`: light arrays, bone matrices,
/// per-instance draw parameters (§4.1, §6.3).
pub struct StructuredBuffer<T: Pod> {
    id: u64,
    usage: wgpu::BufferUsages,
    inner: RwLock<CpuState<Vec<T>>>,
}

impl<T: Pod> StructuredBuffer<T> {
    #[must_use]
    pub fn new(data: Vec<T>) -> Self {
        let size = data.byte_size();
        Self {
            id: NEXT_BUFFER_ID.fetch_add(1, Ordering::Relaxed),
            usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_DST,
            inner: RwLock::new(CpuState {
                data,
                version: 0,
                size,
            }),
        }
    }

    #[must_use]
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    #[must_use]
    pub fn id(&self) -> u64 {
        self.id
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.read().data.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn version(&self) -> u64 {
        self.inner.read().version
    }

    #[must_use]
    pub fn handle(&self) -> BufferRef {
        let state = self.inner.read();
        BufferRef {
            id: self.id,
            usage: self.usage,
            size: state.size,
            version: state.version,
        }
    }

    pub fn read(&self) -> BufferReadGuard<'_, Vec<T>> {
        BufferReadGuard {
            guard: self.inner.read(),
        }
    }

    pub fn write(&self) -> BufferWriteGuard<'_, Vec<T>> {
        BufferWriteGuard {
            guard: self.inner.write(),
            changed: true,
        }
    }
}

pub struct BufferReadGuard<'a, T> {
    guard: RwLockReadGuard<'a, CpuState<T>>,
}

impl<T> std::ops::Deref for BufferReadGuard<'_, T> {
    type Target = T;
    fn deref(&self) -> &Self::Target {
        &self.guard.data
    }
}

pub struct BufferWriteGuard<'a, T: GpuData> {
    guard: RwLockWriteGuard<'a, CpuState<T>>,
    changed: bool,
}

impl<T: GpuData> BufferWriteGuard<'_, T> {
    /// Skip bumping the version on drop — use when a write turned out to be
    /// a no-op.
    pub fn skip_sync(&mut self) {
        self.changed = false;
    }
}

impl<T: GpuData> std::ops::Deref for BufferWriteGuard<'_, T> {
    type Target = T;
    fn deref(&self) -> &Self::Target {
        &self.guard.data
    }
}

impl<T: GpuData> std::ops::DerefMut for BufferWriteGuard<'_, T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.guard.data
    }
}

impl<T: GpuData> Drop for BufferWriteGuard<'_, T> {
    fn drop(&mut self) {
        if self.changed {
            self.guard.version = self.guard.version.wrapping_add(1);
            self.guard.size = self.guard.data.byte_size();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constant_buffer_version_bumps_on_write() {
        let cb = ConstantBuffer::new(1.0f32);
        assert_eq!(cb.version(), 0);
        *cb.write() = 2.0;
        assert_eq!(cb.version(), 1);
        assert_eq!(*cb.read(), 2.0);
    }

    #[test]
    fn skip_sync_does_not_bump_version() {
        let cb = ConstantBuffer::new(1.0f32);
        {
            let mut g = cb.write();
            *g = 1.0;
            g.skip_sync();
        }
        assert_eq!(cb.version(), 0);
    }

    #[test]
    fn structured_buffer_tracks_len_and_version() {
        let sb: StructuredBuffer<u32> = StructuredBuffer::empty();
        assert!(sb.is_empty());
        sb.write().push(1);
        sb.write().push(2);
        assert_eq!(sb.len(), 2);
        assert_eq!(sb.version(), 2);
    }
}

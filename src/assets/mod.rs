//! Asset handle system.
//!
//! Shared-ownership lifetime tracking for GPU-resident resources whose CPU
//! owner may die before the GPU is done with them — the redesign §9 asks
//! for in place of the original's manual `new`/`delete`.

pub mod handle;

pub use handle::{AssetTracker, StrongHandle, TrackedAsset, WeakHandle};

use slotmap::new_key_type;

new_key_type! {
    /// Handle into the geometry table (positions/normals/indices/etc).
    pub struct GeometryHandle;
    /// Handle into the material table.
    pub struct MaterialHandle;
    /// Handle into the texture table.
    pub struct TextureHandle;
    /// Handle into the sampler table.
    pub struct SamplerHandle;
}

impl TextureHandle {
    /// Reserved slot for the built-in 1x1 white substitute texture used
    /// when a material references a missing texture (§7 recoverable).
    #[must_use]
    pub fn dummy_white() -> Self {
        Self::default()
    }
}

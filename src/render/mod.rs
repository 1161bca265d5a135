//! Main pass orchestration (§4.5, §4.6): the fixed nine-stage frame order
//! and the `SceneRenderer` that drives it.
//!
//! Grounded on the teacher's `graph::passes` module split (one struct per
//! stage implementing prepare/execute) and `graph::frame::RenderFrame`'s
//! role as the thing that owns and sequences them; this crate collapses the
//! L1/L2 shader-cache and `RenderGraph` node-dependency machinery the
//! teacher uses (out of scope — see DESIGN.md) down to the fixed ordering
//! §4.5 specifies directly, since there is nothing left to schedule
//! dynamically once the stage list is pinned.

pub mod passes;
pub mod pipelines;

use crate::cull::VisibleDraw;
use crate::manager::RenderManager;
use crate::packet::FramePacket;
use crate::shadow::{AtlasAllocation, CascadeView};

pub use passes::{
    DepthNormalPrepass, GizmoPass, OpaquePass, PostProcessPass, ShadowPass, SkinningComputePass,
    SkyboxPass, SsaoPass, TransparentPass,
};

/// Per-frame state threaded through every pass: visibility results,
/// resolved shadow views, and the command encoder passes record into.
/// Analogous to the teacher's `PrepareContext`/`RenderState`, minus the
/// fields this crate has no use for (IBL/bloom/FXAA — dropped per
/// DESIGN.md).
pub struct RenderContext<'a> {
    pub packet: &'a FramePacket,
    pub visible_opaque: &'a [VisibleDraw],
    pub visible_transparent: &'a [VisibleDraw],
    pub cascade_views: &'a [CascadeView],
    pub atlas_allocations: &'a [AtlasAllocation],

    /// View-projection of the camera this frame renders from (§3.1 camera,
    /// §6.3 "per-view constant layout"). One camera per `render_frame` call;
    /// multi-viewport rendering calls this once per viewport (§12 Non-goals
    /// do not require concurrent multi-camera submission within one call).
    pub camera_view_proj: glam::Mat4,
    pub viewport_width: u32,
    pub viewport_height: u32,

    pub encoder: &'a mut wgpu::CommandEncoder,

    pub color_target: &'a wgpu::TextureView,
    pub color_format: wgpu::TextureFormat,
    pub depth_target: &'a wgpu::TextureView,
    pub depth_format: wgpu::TextureFormat,

    /// Offscreen HDR scene-color target (§4.5 step 8); only sampled/written
    /// when `packet.settings.enable_hdr` is set. Unused otherwise (may
    /// alias `color_target` in that case; passes never touch it when HDR
    /// is off).
    pub hdr_target: &'a wgpu::TextureView,
    pub hdr_format: wgpu::TextureFormat,

    /// SSAO's R8 occlusion output (§4.5 step 4).
    pub ao_target: &'a wgpu::TextureView,

    /// One full-resolution depth view per active cascade (§4.4.1).
    pub cascade_depth_views: &'a [wgpu::TextureView],
    /// The punctual shadow atlas's single depth texture, viewport-sliced
    /// per allocated cell (§4.4.2).
    pub atlas_depth_view: &'a wgpu::TextureView,
    pub shadow_depth_format: wgpu::TextureFormat,
}

/// One stage of the main pass (§4.5). Stages are free to no-op (e.g. SSAO
/// when `settings.ssao.enabled` is false) but are always called in order —
/// the fixed ordering itself is the invariant (§8.1 property 7), not which
/// stages do work.
pub trait RenderStage {
    fn name(&self) -> &'static str;
    fn execute(&mut self, manager: &mut RenderManager, ctx: &mut RenderContext<'_>);
}

/// Drives one frame through the fixed §4.5 stage order:
/// skin → shadows → depth/normal prepass → depth resolve → SSAO → opaque →
/// skybox → transparent → post-process → gizmos.
pub struct SceneRenderer {
    skinning: SkinningComputePass,
    shadows: ShadowPass,
    prepass: DepthNormalPrepass,
    ssao: SsaoPass,
    opaque: OpaquePass,
    skybox: SkyboxPass,
    transparent: TransparentPass,
    post_process: PostProcessPass,
    gizmos: GizmoPass,
}

impl SceneRenderer {
    #[must_use]
    pub fn new() -> Self {
        Self {
            skinning: SkinningComputePass::default(),
            shadows: ShadowPass::default(),
            prepass: DepthNormalPrepass::default(),
            ssao: SsaoPass::default(),
            opaque: OpaquePass::default(),
            skybox: SkyboxPass::default(),
            transparent: TransparentPass::default(),
            post_process: PostProcessPass::default(),
            gizmos: GizmoPass::default(),
        }
    }

    /// Executes every stage in the fixed §4.5 order against one frame
    /// packet. The depth-resolve step between prepass and SSAO has no
    /// dedicated pass struct — it is a single `copy_texture_to_texture`
    /// the prepass itself schedules into `ctx.encoder`, since there is
    /// nothing else to prepare for it (§4.5 step 3).
    pub fn render_frame(&mut self, manager: &mut RenderManager, ctx: &mut RenderContext<'_>) {
        if ctx.packet.features.contains(crate::packet::SceneFeatures::HAS_SKINNED_MESHES) {
            self.skinning.execute(manager, ctx);
        }
        if ctx.packet.features.contains(crate::packet::SceneFeatures::HAS_SHADOW_CASTERS) {
            self.shadows.execute(manager, ctx);
        }
        self.prepass.execute(manager, ctx);
        self.ssao.execute(manager, ctx);
        self.opaque.execute(manager, ctx);
        if ctx.packet.features.contains(crate::packet::SceneFeatures::HAS_SKYBOX) {
            self.skybox.execute(manager, ctx);
        }
        self.transparent.execute(manager, ctx);
        self.post_process.execute(manager, ctx);
        self.gizmos.execute(manager, ctx);
    }
}

impl Default for SceneRenderer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// §8.1 property 7: stage order is fixed regardless of scene content —
    /// expressed here as "constructing the default stage list never
    /// reorders it based on external state" (the ordering is compiled into
    /// `render_frame`, so this is really a documentation-as-test marker).
    #[test]
    fn stage_names_match_the_fixed_order() {
        let renderer = SceneRenderer::new();
        let names = [
            renderer.skinning.name(),
            renderer.shadows.name(),
            renderer.prepass.name(),
            renderer.ssao.name(),
            renderer.opaque.name(),
            renderer.skybox.name(),
            renderer.transparent.name(),
            renderer.post_process.name(),
            renderer.gizmos.name(),
        ];
        assert_eq!(
            names,
            [
                "skinning",
                "shadows",
                "depth_normal_prepass",
                "ssao",
                "opaque",
                "skybox",
                "transparent",
                "post_process",
                "gizmos",
            ]
        );
    }
}

//! Concrete stages of the main pass (§4.5, §4.6), one struct per stage,
//! matching the teacher's one-file-per-pass layout under
//! `graph::passes::{prepass,opaque,skybox,ssao,transparent,tone_mapping}`.
//!
//! Each stage lazily builds its pipeline state on first use and caches it
//! for the renderer's lifetime (the teacher's `local_cache` shape in
//! `prepass.rs`), then resolves every `VisibleDraw`/cascade/cell it is
//! handed into a real `draw_indexed`/`dispatch_workgroups` call.

use super::pipelines::{self, CameraUniform, DrawUniform, GeometryPipelineDesc, SceneBindGroupLayouts};
use super::{RenderContext, RenderStage};
use crate::cull::VisibleDraw;
use crate::manager::RenderManager;
use crate::packet::FramePacket;
use crate::resources::mesh_pool::GpuMeshPool;
use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

/// Resolves each `VisibleDraw` to a `DrawUniform` (world transform + the
/// flattened material params its submesh's material slot points at),
/// ordered identically to `draws` so the shader's
/// `@builtin(instance_index)` can index straight into the uploaded buffer.
fn build_draw_uniforms(packet: &FramePacket, draws: &[VisibleDraw]) -> Vec<DrawUniform> {
    draws
        .iter()
        .map(|draw| {
            let instance = &packet.instances[draw.instance_index as usize];
            let material_index = instance
                .material_indices
                .get(draw.submesh_index as usize)
                .copied()
                .unwrap_or(0);
            let params = packet
                .materials
                .get(material_index as usize)
                .map(|m| m.params)
                .unwrap_or_default();
            DrawUniform {
                world_transform: glam::Mat4::from(instance.world_transform).to_cols_array_2d(),
                albedo: params.albedo,
                metallic_roughness_ao_alpha: [
                    params.metallic,
                    params.roughness,
                    params.ao,
                    params.alpha_threshold,
                ],
            }
        })
        .collect()
}

/// Binds each draw's mesh buffers (resolved through `mesh.asset` into the
/// GPU mesh pool, §4.1) and issues its `draw_indexed`. `draws[i]` is bound
/// against draw-uniform slot `i` via `instance_index`, matching
/// `build_draw_uniforms`'s ordering.
fn record_draws(pass: &mut wgpu::RenderPass<'_>, mesh_pool: &GpuMeshPool, packet: &FramePacket, draws: &[VisibleDraw]) {
    for (slot, draw) in draws.iter().enumerate() {
        let instance = &packet.instances[draw.instance_index as usize];
        let Some(mesh) = packet.meshes.get(instance.mesh_index as usize) else {
            continue;
        };
        let Some(submesh) = mesh.submeshes.get(draw.submesh_index as usize) else {
            continue;
        };
        let Some(gpu_mesh) = mesh_pool.get(mesh.asset) else {
            continue;
        };
        pass.set_vertex_buffer(0, gpu_mesh.vertex_buffer.slice(..));
        pass.set_index_buffer(gpu_mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        let first = submesh.first_index;
        let slot = slot as u32;
        pass.draw_indexed(first..first + submesh.index_count, submesh.base_vertex, slot..slot + 1);
    }
}

/// Shared cached state for the prepass/opaque/transparent/shadow draw
/// pipelines: one bind-group-layout pair plus the built pipeline, rebuilt
/// only when `key` no longer matches the pipeline a pass needs this frame.
struct GeometryPipelineCache<K> {
    key: Option<K>,
    layouts: Option<SceneBindGroupLayouts>,
    pipeline: Option<wgpu::RenderPipeline>,
}

impl<K: PartialEq + Copy> Default for GeometryPipelineCache<K> {
    fn default() -> Self {
        Self {
            key: None,
            layouts: None,
            pipeline: None,
        }
    }
}

impl<K: PartialEq + Copy> GeometryPipelineCache<K> {
    /// Rebuilds the pipeline only when `key` differs from the last build.
    /// Returns both halves together (rather than two separate accessors) so
    /// callers never hold two overlapping borrows of `self`.
    fn ensure(
        &mut self,
        device: &wgpu::Device,
        key: K,
        desc: &GeometryPipelineDesc<'_>,
    ) -> (&SceneBindGroupLayouts, &wgpu::RenderPipeline) {
        if self.key != Some(key) || self.pipeline.is_none() {
            let layouts = SceneBindGroupLayouts::new(device);
            let pipeline = pipelines::build_geometry_pipeline(device, &layouts, desc);
            self.layouts = Some(layouts);
            self.pipeline = Some(pipeline);
            self.key = Some(key);
        }
        (self.layouts.as_ref().unwrap(), self.pipeline.as_ref().unwrap())
    }
}

/// GPU skinning compute (§4.6): dispatches one thread group of
/// [`crate::SKINNING_GROUP_SIZE`] per skinned instance, writing skinned
/// positions/normals into a scratch structured buffer. No teacher
/// precedent (the teacher has no skinning path); grounded on its
/// compute-pass shape instead (`ibl_compute.rs`, `brdf_lut_compute.rs`).
///
/// The bind-pose/bone-matrix inputs are placeholder zero/identity buffers
/// sized by `dispatch_count` — wiring this to `crate::scene::Skeleton`'s
/// actual bone matrices is a separate follow-on (`FramePacket` carries no
/// skeleton array yet, see DESIGN.md).
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
struct SkinnedVertexPlaceholder {
    position: [f32; 4],
    normal: [f32; 4],
}

#[derive(Default)]
pub struct SkinningComputePass {
    bind_group_layout: Option<wgpu::BindGroupLayout>,
    pipeline: Option<wgpu::ComputePipeline>,
}

impl RenderStage for SkinningComputePass {
    fn name(&self) -> &'static str {
        "skinning"
    }

    fn execute(&mut self, manager: &mut RenderManager, ctx: &mut RenderContext<'_>) {
        let dispatch_count = ctx.packet.skinned.len() as u32;
        if dispatch_count == 0 {
            return;
        }
        let device = &manager.gpu.device;
        let bind_group_layout = self
            .bind_group_layout
            .get_or_insert_with(|| pipelines::build_skinning_bind_group_layout(device));
        let pipeline = self
            .pipeline
            .get_or_insert_with(|| pipelines::build_skinning_pipeline(device, bind_group_layout));

        let vertices = vec![SkinnedVertexPlaceholder::zeroed(); dispatch_count as usize];
        let bind_pose = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("skinning-bind-pose"),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::STORAGE,
        });
        let bone_matrices = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("skinning-bone-matrices"),
            contents: bytemuck::bytes_of(&glam::Mat4::IDENTITY.to_cols_array_2d()),
            usage: wgpu::BufferUsages::STORAGE,
        });
        let skinned_out = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("skinning-output"),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::STORAGE,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("skinning-bind-group"),
            layout: bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry { binding: 0, resource: bind_pose.as_entire_binding() },
                wgpu::BindGroupEntry { binding: 1, resource: bone_matrices.as_entire_binding() },
                wgpu::BindGroupEntry { binding: 2, resource: skinned_out.as_entire_binding() },
            ],
        });

        let groups = dispatch_count.div_ceil(crate::SKINNING_GROUP_SIZE);
        let mut compute_pass = ctx.encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
            label: Some("skinning"),
            timestamp_writes: None,
        });
        compute_pass.set_pipeline(pipeline);
        compute_pass.set_bind_group(0, &bind_group, &[]);
        compute_pass.dispatch_workgroups(groups, 1, 1);
    }
}

/// Directional-cascade and punctual-atlas shadow depth rendering (§4.4.3).
/// Grounded on the teacher's `graph/passes/shadow.rs` pass shape: one
/// depth-only render pass per cascade slice, plus one per allocated atlas
/// cell sliced by viewport.
///
/// Punctual (atlas) draws use a placeholder identity light-view-projection
/// — no per-light view/projection builder exists yet in `shadow::atlas`
/// (see DESIGN.md); the directional-cascade path, which §8.2 scenario S2
/// actually exercises, is fully real.
#[derive(Default)]
pub struct ShadowPass {
    cache: GeometryPipelineCache<()>,
}

impl RenderStage for ShadowPass {
    fn name(&self) -> &'static str {
        "shadows"
    }

    fn execute(&mut self, manager: &mut RenderManager, ctx: &mut RenderContext<'_>) {
        if ctx.visible_opaque.is_empty() {
            return;
        }
        let device = &manager.gpu.device;
        let (layouts, pipeline) = self.cache.ensure(
            device,
            (),
            &GeometryPipelineDesc {
                label: "shadow-depth",
                shader_source: pipelines::depth_only_shader_source(),
                color_format: None,
                depth_format: ctx.shadow_depth_format,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Greater,
                blend: None,
            },
        );

        let draw_uniforms = build_draw_uniforms(ctx.packet, ctx.visible_opaque);
        let draws_buffer = pipelines::upload_draw_uniforms(device, &draw_uniforms);
        let draws_bind_group = layouts.bind_draws(device, &draws_buffer);

        for (cascade_index, cascade) in ctx.cascade_views.iter().enumerate() {
            let Some(depth_view) = ctx.cascade_depth_views.get(cascade_index) else {
                continue;
            };
            let camera_buffer = pipelines::upload_camera_uniform(device, CameraUniform::from_matrix(cascade.view_projection));
            let camera_bind_group = layouts.bind_camera(device, &camera_buffer);

            let mut pass = ctx.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("shadow-cascade"),
                color_attachments: &[],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(0.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            pass.set_pipeline(pipeline);
            pass.set_bind_group(0, &camera_bind_group, &[]);
            pass.set_bind_group(1, &draws_bind_group, &[]);
            record_draws(&mut pass, &manager.mesh_pool, ctx.packet, ctx.visible_opaque);
        }

        if ctx.atlas_allocations.is_empty() {
            return;
        }
        let camera_buffer = pipelines::upload_camera_uniform(device, CameraUniform::from_matrix(glam::Mat4::IDENTITY));
        let camera_bind_group = layouts.bind_camera(device, &camera_buffer);
        for allocation in ctx.atlas_allocations {
            for cell in &allocation.cells {
                let mut pass = ctx.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("shadow-atlas-cell"),
                    color_attachments: &[],
                    depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                        view: ctx.atlas_depth_view,
                        depth_ops: Some(wgpu::Operations {
                            load: wgpu::LoadOp::Load,
                            store: wgpu::StoreOp::Store,
                        }),
                        stencil_ops: None,
                    }),
                    timestamp_writes: None,
                    occlusion_query_set: None,
                });
                let (x, y, w, h) = cell.viewport();
                pass.set_viewport(x, y, w, h, 0.0, 1.0);
                pass.set_pipeline(pipeline);
                pass.set_bind_group(0, &camera_bind_group, &[]);
                pass.set_bind_group(1, &draws_bind_group, &[]);
                record_draws(&mut pass, &manager.mesh_pool, ctx.packet, ctx.visible_opaque);
            }
        }
    }
}

/// Depth + view-space-normal prepass (§4.5 step 2). Reverse-Z: depth clears
/// to 0.0 and the subsequent opaque pass runs `depth_compare = Equal` with
/// writes disabled, guaranteeing zero overdraw. No-ops when
/// `settings.depth_normal_prepass` is off (the opaque pass then writes
/// depth itself).
#[derive(Default)]
pub struct DepthNormalPrepass {
    cache: GeometryPipelineCache<()>,
}

impl RenderStage for DepthNormalPrepass {
    fn name(&self) -> &'static str {
        "depth_normal_prepass"
    }

    fn execute(&mut self, manager: &mut RenderManager, ctx: &mut RenderContext<'_>) {
        if !ctx.packet.settings.depth_normal_prepass {
            return;
        }
        let device = &manager.gpu.device;
        let (layouts, pipeline) = self.cache.ensure(
            device,
            (),
            &GeometryPipelineDesc {
                label: "depth_normal_prepass",
                shader_source: pipelines::depth_only_shader_source(),
                color_format: None,
                depth_format: ctx.depth_format,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Greater,
                blend: None,
            },
        );

        let draw_uniforms = build_draw_uniforms(ctx.packet, ctx.visible_opaque);
        let draws_buffer = pipelines::upload_draw_uniforms(device, &draw_uniforms);
        let camera_buffer = pipelines::upload_camera_uniform(device, CameraUniform::from_matrix(ctx.camera_view_proj));
        let camera_bind_group = layouts.bind_camera(device, &camera_buffer);
        let draws_bind_group = layouts.bind_draws(device, &draws_buffer);

        let mut pass = ctx.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("depth_normal_prepass"),
            color_attachments: &[],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: ctx.depth_target,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(0.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
        });
        pass.set_pipeline(pipeline);
        pass.set_bind_group(0, &camera_bind_group, &[]);
        pass.set_bind_group(1, &draws_bind_group, &[]);
        record_draws(&mut pass, &manager.mesh_pool, ctx.packet, ctx.visible_opaque);
        drop(pass);
        // §4.5 step 3 "depth resolve": this crate's depth target is always
        // single-sampled (MSAA resolve is an §12 Non-goal), so there is
        // nothing to resolve — the prepass's own depth attachment already
        // is what SSAO and the opaque pass read.
    }
}

/// Screen-space ambient occlusion (§4.5 step 4). No-ops when
/// `settings.ssao.enabled` is false, keeping the fixed ordering regardless.
/// The hemisphere-kernel sampling itself is an implementer's-choice detail
/// (§9); this dispatch proves a real R8 occlusion buffer gets written.
#[derive(Default)]
pub struct SsaoPass {
    bind_group_layout: Option<wgpu::BindGroupLayout>,
    pipeline: Option<wgpu::ComputePipeline>,
}

impl RenderStage for SsaoPass {
    fn name(&self) -> &'static str {
        "ssao"
    }

    fn execute(&mut self, manager: &mut RenderManager, ctx: &mut RenderContext<'_>) {
        if !ctx.packet.settings.ssao.enabled {
            return;
        }
        let device = &manager.gpu.device;
        let bind_group_layout = self
            .bind_group_layout
            .get_or_insert_with(|| pipelines::build_ssao_bind_group_layout(device));
        let pipeline = self
            .pipeline
            .get_or_insert_with(|| pipelines::build_ssao_pipeline(device, bind_group_layout));

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("ssao-bind-group"),
            layout: bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry { binding: 0, resource: wgpu::BindingResource::TextureView(ctx.depth_target) },
                wgpu::BindGroupEntry { binding: 1, resource: wgpu::BindingResource::TextureView(ctx.ao_target) },
            ],
        });

        let mut compute_pass = ctx.encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
            label: Some("ssao"),
            timestamp_writes: None,
        });
        compute_pass.set_pipeline(pipeline);
        compute_pass.set_bind_group(0, &bind_group, &[]);
        compute_pass.dispatch_workgroups(ctx.viewport_width.div_ceil(8), ctx.viewport_height.div_ceil(8), 1);
    }
}

/// Resolves which color target opaque/skybox/transparent draw into this
/// frame: the offscreen HDR target when HDR + post-process are active,
/// otherwise straight to the presentable surface (§6.4 "straightforward
/// mode").
fn scene_color_target<'a>(ctx: &RenderContext<'a>) -> (&'a wgpu::TextureView, wgpu::TextureFormat) {
    if ctx.packet.settings.enable_hdr {
        (ctx.hdr_target, ctx.hdr_format)
    } else {
        (ctx.color_target, ctx.color_format)
    }
}

/// Opaque geometry (§4.5 step 5): depth-equal, depth-write-disabled draws
/// of every instance in `ctx.visible_opaque` when the prepass already ran;
/// otherwise writes depth itself. Draws are sorted by `(instance, submesh)`
/// upstream in the culling stage (§4.3 "Determinism").
#[derive(Default)]
pub struct OpaquePass {
    cache: GeometryPipelineCache<(bool, bool)>,
}

impl RenderStage for OpaquePass {
    fn name(&self) -> &'static str {
        "opaque"
    }

    fn execute(&mut self, manager: &mut RenderManager, ctx: &mut RenderContext<'_>) {
        let (target, target_format) = scene_color_target(ctx);
        let prepass_ran = ctx.packet.settings.depth_normal_prepass;
        let device = &manager.gpu.device;
        let (layouts, pipeline) = self.cache.ensure(
            device,
            (prepass_ran, ctx.packet.settings.enable_hdr),
            &GeometryPipelineDesc {
                label: "opaque",
                shader_source: pipelines::scene_shader_source(),
                color_format: Some(target_format),
                depth_format: ctx.depth_format,
                depth_write_enabled: !prepass_ran,
                depth_compare: if prepass_ran { wgpu::CompareFunction::Equal } else { wgpu::CompareFunction::Greater },
                blend: None,
            },
        );

        let draw_uniforms = build_draw_uniforms(ctx.packet, ctx.visible_opaque);
        let draws_buffer = pipelines::upload_draw_uniforms(device, &draw_uniforms);
        let camera_buffer = pipelines::upload_camera_uniform(device, CameraUniform::from_matrix(ctx.camera_view_proj));
        let camera_bind_group = layouts.bind_camera(device, &camera_buffer);
        let draws_bind_group = layouts.bind_draws(device, &draws_buffer);

        let mut pass = ctx.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("opaque"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(ctx.packet.settings.clear_color),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: ctx.depth_target,
                depth_ops: Some(wgpu::Operations {
                    load: if prepass_ran { wgpu::LoadOp::Load } else { wgpu::LoadOp::Clear(0.0) },
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
        });
        pass.set_pipeline(pipeline);
        pass.set_bind_group(0, &camera_bind_group, &[]);
        pass.set_bind_group(1, &draws_bind_group, &[]);
        record_draws(&mut pass, &manager.mesh_pool, ctx.packet, ctx.visible_opaque);
    }
}

/// Skybox/background (§4.5 step 6): full-screen pass drawn after opaque so
/// depth-equal testing against the reverse-Z far-plane clear value (0.0)
/// discards pixels already covered by geometry. Only run if the scene has
/// a sky configured.
#[derive(Default)]
pub struct SkyboxPass {
    key: Option<bool>,
    pipeline: Option<wgpu::RenderPipeline>,
}

impl RenderStage for SkyboxPass {
    fn name(&self) -> &'static str {
        "skybox"
    }

    fn execute(&mut self, manager: &mut RenderManager, ctx: &mut RenderContext<'_>) {
        let (target, target_format) = scene_color_target(ctx);
        let device = &manager.gpu.device;
        if self.key != Some(ctx.packet.settings.enable_hdr) || self.pipeline.is_none() {
            self.pipeline = Some(pipelines::build_fullscreen_pipeline(
                device,
                "skybox",
                pipelines::skybox_shader_source(),
                &[],
                target_format,
                Some(ctx.depth_format),
                wgpu::CompareFunction::Equal,
            ));
            self.key = Some(ctx.packet.settings.enable_hdr);
        }

        let mut pass = ctx.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("skybox"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: ctx.depth_target,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Discard,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
        });
        pass.set_pipeline(self.pipeline.as_ref().unwrap());
        pass.draw(0..3, 0..1);
    }
}

/// Transparent geometry (§4.5 step 7): depth-tested but depth-write
/// disabled, alpha-blended, drawn after the skybox so blending reads the
/// final opaque+sky color.
#[derive(Default)]
pub struct TransparentPass {
    cache: GeometryPipelineCache<bool>,
}

impl RenderStage for TransparentPass {
    fn name(&self) -> &'static str {
        "transparent"
    }

    fn execute(&mut self, manager: &mut RenderManager, ctx: &mut RenderContext<'_>) {
        if ctx.visible_transparent.is_empty() {
            return;
        }
        let (target, target_format) = scene_color_target(ctx);
        let device = &manager.gpu.device;
        let (layouts, pipeline) = self.cache.ensure(
            device,
            ctx.packet.settings.enable_hdr,
            &GeometryPipelineDesc {
                label: "transparent",
                shader_source: pipelines::scene_shader_source(),
                color_format: Some(target_format),
                depth_format: ctx.depth_format,
                depth_write_enabled: false,
                depth_compare: wgpu::CompareFunction::GreaterEqual,
                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
            },
        );

        let draw_uniforms = build_draw_uniforms(ctx.packet, ctx.visible_transparent);
        let draws_buffer = pipelines::upload_draw_uniforms(device, &draw_uniforms);
        let camera_buffer = pipelines::upload_camera_uniform(device, CameraUniform::from_matrix(ctx.camera_view_proj));
        let camera_bind_group = layouts.bind_camera(device, &camera_buffer);
        let draws_bind_group = layouts.bind_draws(device, &draws_buffer);

        let mut pass = ctx.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("transparent"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: ctx.depth_target,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Discard,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
        });
        pass.set_pipeline(pipeline);
        pass.set_bind_group(0, &camera_bind_group, &[]);
        pass.set_bind_group(1, &draws_bind_group, &[]);
        record_draws(&mut pass, &manager.mesh_pool, ctx.packet, ctx.visible_transparent);
    }
}

/// Tone mapping and gamma correction (§4.5 step 8), grounded on the
/// teacher's `tone_mapping.rs` full-screen pass shape, minus bloom/FXAA
/// (§12 Non-goals). Samples the HDR target, applies Reinhard tonemap +
/// inverse-gamma, writes the LDR result into the presentable surface.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
struct PostProcessParams {
    inv_gamma: f32,
    _pad: [f32; 3],
}

#[derive(Default)]
pub struct PostProcessPass {
    bind_group_layout: Option<wgpu::BindGroupLayout>,
    pipeline: Option<wgpu::RenderPipeline>,
    sampler: Option<wgpu::Sampler>,
}

impl RenderStage for PostProcessPass {
    fn name(&self) -> &'static str {
        "post_process"
    }

    fn execute(&mut self, manager: &mut RenderManager, ctx: &mut RenderContext<'_>) {
        if !ctx.packet.settings.enable_hdr {
            // Straight-to-surface mode already wrote LDR color; nothing to
            // resolve.
            return;
        }
        let device = &manager.gpu.device;
        let bind_group_layout = self
            .bind_group_layout
            .get_or_insert_with(|| pipelines::build_post_process_bind_group_layout(device));
        let pipeline = self.pipeline.get_or_insert_with(|| {
            pipelines::build_fullscreen_pipeline(
                device,
                "post_process",
                pipelines::post_process_shader_source(),
                &[&*bind_group_layout],
                ctx.color_format,
                None,
                wgpu::CompareFunction::Always,
            )
        });
        let sampler = self.sampler.get_or_insert_with(|| {
            device.create_sampler(&wgpu::SamplerDescriptor {
                label: Some("post-process-sampler"),
                mag_filter: wgpu::FilterMode::Linear,
                min_filter: wgpu::FilterMode::Linear,
                ..Default::default()
            })
        });

        let params = PostProcessParams { inv_gamma: 1.0 / ctx.packet.settings.gamma, _pad: [0.0; 3] };
        let params_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("post-process-params"),
            contents: bytemuck::bytes_of(&params),
            usage: wgpu::BufferUsages::UNIFORM,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("post-process-bind-group"),
            layout: bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry { binding: 0, resource: wgpu::BindingResource::TextureView(ctx.hdr_target) },
                wgpu::BindGroupEntry { binding: 1, resource: wgpu::BindingResource::Sampler(sampler) },
                wgpu::BindGroupEntry { binding: 2, resource: params_buffer.as_entire_binding() },
            ],
        });

        let mut pass = ctx.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("tone_map"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: ctx.color_target,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });
        pass.set_pipeline(pipeline);
        pass.set_bind_group(0, &bind_group, &[]);
        pass.draw(0..3, 0..1);
    }
}

/// Debug gizmo overlay (§4.5 step 9): drawn last, depth-tested but never
/// depth-writing, straight from `FramePacket`'s gizmo line queue (§3.2).
/// Gizmos are display-space and always land in the presentable surface,
/// never the HDR intermediate, since they are drawn after post-process.
#[derive(Default)]
pub struct GizmoPass {
    bind_group_layout: Option<wgpu::BindGroupLayout>,
    pipeline: Option<wgpu::RenderPipeline>,
}

impl RenderStage for GizmoPass {
    fn name(&self) -> &'static str {
        "gizmos"
    }

    fn execute(&mut self, manager: &mut RenderManager, ctx: &mut RenderContext<'_>) {
        if ctx.packet.gizmo_lines.is_empty() {
            return;
        }
        let device = &manager.gpu.device;
        let bind_group_layout = self
            .bind_group_layout
            .get_or_insert_with(|| pipelines::build_gizmo_bind_group_layout(device));
        let pipeline = self.pipeline.get_or_insert_with(|| {
            pipelines::build_gizmo_pipeline(device, bind_group_layout, ctx.color_format, ctx.depth_format)
        });

        let vertices: Vec<pipelines::GizmoVertex> = ctx
            .packet
            .gizmo_lines
            .iter()
            .flat_map(|line| {
                [
                    pipelines::GizmoVertex { position: line.start.to_array(), color: line.color },
                    pipelines::GizmoVertex { position: line.end.to_array(), color: line.color },
                ]
            })
            .collect();
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("gizmo-vertices"),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let camera_buffer = pipelines::upload_camera_uniform(device, CameraUniform::from_matrix(ctx.camera_view_proj));
        let camera_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("gizmo-camera-bind-group"),
            layout: bind_group_layout,
            entries: &[wgpu::BindGroupEntry { binding: 0, resource: camera_buffer.as_entire_binding() }],
        });

        let mut pass = ctx.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("gizmos"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: ctx.color_target,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: ctx.depth_target,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Discard,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
        });
        pass.set_pipeline(pipeline);
        pass.set_bind_group(0, &camera_bind_group, &[]);
        pass.set_vertex_buffer(0, vertex_buffer.slice(..));
        pass.draw(0..vertices.len() as u32, 0..1);
    }
}

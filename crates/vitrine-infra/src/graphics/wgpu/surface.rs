// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use super::context::WgpuGraphicsContext;
use super::mesh::{upload_scene, GpuMesh};
use super::pipeline::{create_targets, ScenePipeline, Uniforms};
use std::collections::HashMap;
use std::sync::Arc;
use vitrine_core::renderer::{
    Projection, RenderFrame, RenderSurface, SurfaceConfig, SurfaceError, SurfaceExtent,
    SurfaceFactory,
};
use vitrine_core::report_misuse;
use vitrine_core::scene::SceneId;
use winit::window::Window;

/// Creates [`WgpuSurface`]s bound to one window.
#[derive(Debug)]
pub struct WgpuSurfaceFactory {
    instance: wgpu::Instance,
    window: Arc<Window>,
    transparent: bool,
}

impl WgpuSurfaceFactory {
    /// Creates a factory for `window`.
    pub fn new(window: Arc<Window>) -> Self {
        Self {
            instance: wgpu::Instance::new(&wgpu::InstanceDescriptor::default()),
            window,
            transparent: false,
        }
    }

    /// Requests a pre-multiplied alpha swapchain so transparent clears show what lies behind.
    pub fn with_transparency(mut self, transparent: bool) -> Self {
        self.transparent = transparent;
        self
    }
}

impl SurfaceFactory for WgpuSurfaceFactory {
    fn create(
        &mut self,
        extent: SurfaceExtent,
        config: &SurfaceConfig,
    ) -> Result<Box<dyn RenderSurface>, SurfaceError> {
        let context = pollster::block_on(WgpuGraphicsContext::new(
            &self.instance,
            self.window.clone(),
            extent.physical_width(),
            extent.physical_height(),
            config.antialias,
            self.transparent,
        ))
        .map_err(|e| SurfaceError::Creation(format!("{e:#}")))?;
        Ok(Box::new(WgpuSurface::new(context, extent)))
    }
}

#[derive(Debug)]
struct GpuState {
    context: WgpuGraphicsContext,
    pipeline: ScenePipeline,
    depth_view: wgpu::TextureView,
    msaa_view: Option<wgpu::TextureView>,
    meshes: HashMap<SceneId, Vec<GpuMesh>>,
}

/// A [`RenderSurface`] drawing scene meshes with a single lit pipeline.
#[derive(Debug)]
pub struct WgpuSurface {
    extent: SurfaceExtent,
    state: Option<GpuState>,
}

impl WgpuSurface {
    fn new(context: WgpuGraphicsContext, extent: SurfaceExtent) -> Self {
        let pipeline = ScenePipeline::new(
            &context.device,
            context.surface_config.format,
            context.sample_count,
        );
        let (depth_view, msaa_view) =
            create_targets(&context.device, &context.surface_config, context.sample_count);
        Self {
            extent,
            state: Some(GpuState {
                context,
                pipeline,
                depth_view,
                msaa_view,
                meshes: HashMap::new(),
            }),
        }
    }
}

impl RenderSurface for WgpuSurface {
    fn extent(&self) -> SurfaceExtent {
        self.extent
    }

    fn resize(&mut self, extent: SurfaceExtent, _projection: &Projection) {
        let Some(state) = self.state.as_mut() else {
            report_misuse("resize on a disposed surface");
            return;
        };
        self.extent = extent;
        state
            .context
            .resize(extent.physical_width(), extent.physical_height());
        let (depth_view, msaa_view) = create_targets(
            &state.context.device,
            &state.context.surface_config,
            state.context.sample_count,
        );
        state.depth_view = depth_view;
        state.msaa_view = msaa_view;
    }

    fn render(&mut self, frame: &RenderFrame<'_>) -> Result<(), SurfaceError> {
        let Some(state) = self.state.as_mut() else {
            report_misuse("render on a disposed surface");
            return Err(SurfaceError::Disposed);
        };

        let scene = frame.scene.filter(|_| frame.has_content());
        if let Some(scene) = scene {
            if !state.meshes.contains_key(&scene.id()) {
                let gpu = upload_scene(&state.context.device, scene.label(), scene.content());
                state.meshes.insert(scene.id(), gpu);
            }
        }

        state.context.queue.write_buffer(
            &state.pipeline.uniform_buffer,
            0,
            bytemuck::bytes_of(&Uniforms::new(frame.view_projection)),
        );

        let output = match state.context.surface.get_current_texture() {
            Ok(texture) => texture,
            Err(e @ (wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated)) => {
                state.context.reconfigure();
                return Err(SurfaceError::Acquire(e.to_string()));
            }
            Err(e) => return Err(SurfaceError::Acquire(e.to_string())),
        };
        let target = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let (view, resolve_target) = match &state.msaa_view {
            Some(msaa) => (msaa, Some(&target)),
            None => (&target, None),
        };
        let clear = frame.clear_color;

        let mut encoder = state
            .context
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Vitrine Frame Encoder"),
            });
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Vitrine Scene Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: clear.r as f64,
                            g: clear.g as f64,
                            b: clear.b as f64,
                            a: clear.a as f64,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &state.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Discard,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            if let Some(meshes) = scene.and_then(|s| state.meshes.get(&s.id())) {
                pass.set_pipeline(&state.pipeline.pipeline);
                pass.set_bind_group(0, &state.pipeline.bind_group, &[]);
                for mesh in meshes {
                    pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
                    pass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                    pass.draw_indexed(0..mesh.index_count, 0, 0..1);
                }
            }
        }

        state.context.queue.submit(std::iter::once(encoder.finish()));
        output.present();
        Ok(())
    }

    fn release_scene(&mut self, scene: SceneId) {
        if let Some(state) = self.state.as_mut() {
            if state.meshes.remove(&scene).is_some() {
                log::debug!("Released GPU meshes of scene {scene}");
            }
        }
    }

    fn dispose(&mut self) {
        match self.state.take() {
            Some(state) => {
                drop(state);
                log::info!("WGPU surface disposed");
            }
            None => report_misuse("dispose on a disposed surface"),
        }
    }

    fn is_disposed(&self) -> bool {
        self.state.is_none()
    }
}

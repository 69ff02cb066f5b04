//! WGPU-based rendering engine
//!
//! Drives the multi-pass frame: a depth-only shadow pass from the sun, the
//! lit scene pass, the starfield pass, and an optional UI overlay. Owns the
//! surface, device, queue, and all shared GPU state.

use std::sync::Arc;

use thiserror::Error;
use wgpu::{Device, TextureFormat};

use crate::gfx::{
    resources::{
        global_bindings::{update_global_ubo, GlobalBindings, GlobalUBO},
        material::MaterialBindings,
        texture_resource::TextureResource,
    },
    scene::{object::DrawObject, object::Object, scene::Scene},
};
use crate::wgpu_utils::{
    binding_builder::{BindGroupBuilder, BindGroupLayoutBuilder},
    binding_types,
};

use super::pipeline_manager::{PipelineConfig, PipelineManager};
use super::star_renderer::StarRenderer;
use crate::gfx::geometry::StarInstance;

/// Fatal draw-call failure.
///
/// Recoverable surface states (lost, outdated, timeout) are handled inside
/// `render_frame`; what propagates out of it halts the render loop.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to acquire surface frame: {0}")]
    Surface(#[from] wgpu::SurfaceError),
}

/// Core rendering engine managing GPU resources and draw calls.
pub struct RenderEngine {
    surface: wgpu::Surface<'static>,
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    config: wgpu::SurfaceConfiguration,
    depth_texture: TextureResource,
    format: TextureFormat,
    pub pipeline_manager: PipelineManager,
    global_ubo: GlobalUBO,
    global_bindings: GlobalBindings,

    shadow_map: TextureResource,
    shadow_bind_group: wgpu::BindGroup,

    star_renderer: StarRenderer,
}

impl RenderEngine {
    /// Creates a new render engine for the given window.
    ///
    /// # Panics
    /// Panics if no wgpu adapter or device can be created.
    pub async fn new(
        window: impl Into<wgpu::SurfaceTarget<'static>>,
        width: u32,
        height: u32,
        shadow_map_size: u32,
    ) -> RenderEngine {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance
            .create_surface(window)
            .expect("Failed to create surface!");

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .expect("Failed to request adapter!");

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("WGPU Device"),
                required_features: wgpu::Features::default(),
                required_limits: wgpu::Limits {
                    max_texture_dimension_2d: 4096,
                    ..wgpu::Limits::downlevel_defaults()
                },
                memory_hints: wgpu::MemoryHints::default(),
                trace: wgpu::Trace::Off,
            })
            .await
            .expect("Failed to request a device!");

        let surface_capabilities = surface.get_capabilities(&adapter);
        let format = surface_capabilities
            .formats
            .iter()
            .copied()
            .find(|f| !f.is_srgb())
            .unwrap_or(surface_capabilities.formats[0]);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            // Display refresh paces the loop; the engine does no limiting itself
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: surface_capabilities.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let depth_texture =
            TextureResource::create_depth_texture(&device, &config, "depth_texture");

        let shadow_map = TextureResource::create_shadow_map(&device, shadow_map_size);

        let shadow_layout = BindGroupLayoutBuilder::new()
            .next_binding_fragment(binding_types::depth_texture_2d())
            .next_binding_fragment(binding_types::sampler(wgpu::SamplerBindingType::Comparison))
            .create(&device, "Shadow Bind Group");

        let shadow_bind_group = BindGroupBuilder::new(&shadow_layout)
            .texture(&shadow_map.view)
            .sampler(&shadow_map.sampler)
            .create(&device, "Shadow Bind Group");

        let global_ubo = GlobalUBO::new(&device);
        let mut global_bindings = GlobalBindings::new(&device);
        global_bindings.create_bind_group(&device, &global_ubo);

        let object_bind_group_layout = Object::bind_group_layout(&device);

        // A throwaway binding just to get the shared material layout
        let temp_material_bindings = MaterialBindings::new(&device);
        let material_bind_group_layout = temp_material_bindings.bind_group_layouts().clone();

        let star_renderer = StarRenderer::new(&device);
        let star_bind_group_layout = star_renderer.bind_group_layout().clone();

        let device_handle: Arc<Device> = device.into();
        let queue_handle: Arc<wgpu::Queue> = queue.into();
        let mut pipeline_manager = PipelineManager::new(device_handle.clone());

        pipeline_manager.load_shader("scene", include_str!("scene.wgsl"));
        pipeline_manager.load_shader("shadow", include_str!("shadow.wgsl"));
        pipeline_manager.load_shader("stars", include_str!("stars.wgsl"));

        // Depth-only pass from the sun. No culling, so thin geometry like the
        // flag plane still occludes from both sides.
        pipeline_manager.register_pipeline(
            "Shadow",
            PipelineConfig::default()
                .with_label("SHADOW")
                .with_shader("shadow")
                .with_vertex_only()
                .with_depth_stencil(shadow_map.texture.clone())
                .with_cull_mode(None)
                .with_bind_group_layouts(vec![
                    global_bindings.bind_group_layouts().clone(),
                    object_bind_group_layout.clone(),
                ])
                .with_color_targets(vec![]),
        );

        let scene_layouts = vec![
            global_bindings.bind_group_layouts().clone(),
            object_bind_group_layout,
            material_bind_group_layout,
            shadow_layout.layout.clone(),
        ];

        let scene_targets = vec![Some(wgpu::ColorTargetState {
            format,
            blend: Some(wgpu::BlendState::REPLACE),
            write_mask: wgpu::ColorWrites::ALL,
        })];

        pipeline_manager.register_pipeline(
            "Scene",
            PipelineConfig::default()
                .with_label("SCENE")
                .with_shader("scene")
                .with_depth_stencil(depth_texture.texture.clone())
                .with_color_targets(scene_targets.clone())
                .with_bind_group_layouts(scene_layouts.clone()),
        );

        // Same shader without culling, for the ground and the flag
        pipeline_manager.register_pipeline(
            "SceneDoubleSided",
            PipelineConfig::default()
                .with_label("SCENE DOUBLE SIDED")
                .with_shader("scene")
                .with_depth_stencil(depth_texture.texture.clone())
                .with_color_targets(scene_targets)
                .with_cull_mode(None)
                .with_bind_group_layouts(scene_layouts),
        );

        pipeline_manager.register_pipeline(
            "Stars",
            PipelineConfig::default()
                .with_label("STARS")
                .with_shader("stars")
                .with_depth_stencil(depth_texture.texture.clone())
                .with_depth_write(false)
                .with_cull_mode(None)
                .with_primitive_topology(wgpu::PrimitiveTopology::TriangleStrip)
                .with_vertex_buffers(vec![StarInstance::desc()])
                .with_color_targets(vec![Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })])
                .with_bind_group_layouts(vec![
                    global_bindings.bind_group_layouts().clone(),
                    star_bind_group_layout,
                ]),
        );

        if let Err(errors) = pipeline_manager.create_all_pipelines() {
            for error in &errors {
                log::error!("{error}");
            }
        }

        RenderEngine {
            surface,
            device: device_handle,
            queue: queue_handle,
            config,
            depth_texture,
            format,
            pipeline_manager,
            global_ubo,
            global_bindings,
            shadow_map,
            shadow_bind_group,
            star_renderer,
        }
    }

    /// Uploads the starfield instances and alpha mask. Call once after the
    /// scene is composed.
    pub fn upload_starfield(&mut self, scene: &Scene, mask: &crate::assets::ImageData) {
        self.star_renderer
            .upload(&self.device, &self.queue, &scene.starfield, mask);
    }

    /// Updates the per-frame uniforms from the current scene state.
    pub fn update(&mut self, scene: &Scene) {
        update_global_ubo(
            &mut self.global_ubo,
            &self.queue,
            scene.camera_rig.camera.uniform,
            &scene.ambient,
            &scene.sun,
        );
        self.star_renderer
            .update(&self.queue, &scene.starfield, &scene.camera_rig.camera);
    }

    /// Renders one frame: shadow pass, lit pass, stars, optional UI overlay.
    ///
    /// Lost or outdated surfaces reconfigure and skip the frame. Any other
    /// surface failure is returned for the top-level handler to log and halt
    /// the loop on.
    pub fn render_frame<F>(&mut self, scene: &Scene, ui_callback: Option<F>) -> Result<(), RenderError>
    where
        F: FnOnce(&wgpu::Device, &wgpu::Queue, &mut wgpu::CommandEncoder, &wgpu::TextureView),
    {
        let surface_texture = match self.surface.get_current_texture() {
            Ok(frame) => frame,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.surface.configure(&self.device, &self.config);
                return Ok(());
            }
            Err(wgpu::SurfaceError::Timeout) => return Ok(()),
            Err(err) => return Err(err.into()),
        };

        let surface_texture_view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        // PASS 1: shadow map from the sun's point of view
        if scene.sun.cast_shadow {
            let mut shadow_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Shadow Pass"),
                color_attachments: &[],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.shadow_map.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            shadow_pass.set_bind_group(0, self.global_bindings.bind_groups(), &[]);

            if let Some(shadow_pipeline) = self.pipeline_manager.get_pipeline("Shadow") {
                shadow_pass.set_pipeline(shadow_pipeline);

                for object in scene.objects.iter() {
                    if object.visible && object.cast_shadow {
                        if let Some(bind_group) = object.transform_bind_group() {
                            shadow_pass.set_bind_group(1, bind_group, &[]);
                            shadow_pass.draw_object(object);
                        }
                    }
                }
            }
        }

        // PASS 2: lit scene plus starfield
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Main Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &surface_texture_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        // Night sky
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: 0.015,
                            g: 0.02,
                            b: 0.05,
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            render_pass.set_bind_group(0, self.global_bindings.bind_groups(), &[]);
            render_pass.set_bind_group(3, &self.shadow_bind_group, &[]);

            // Two pipeline variants share the shader; pick per object
            for pipeline_name in ["Scene", "SceneDoubleSided"] {
                let double_sided = pipeline_name == "SceneDoubleSided";
                if let Some(pipeline) = self.pipeline_manager.get_pipeline(pipeline_name) {
                    render_pass.set_pipeline(pipeline);

                    for object in scene
                        .objects
                        .iter()
                        .filter(|obj| obj.visible && obj.double_sided == double_sided)
                    {
                        let material = scene.material_for_object(object);
                        let (Some(material_bind_group), Some(object_bind_group)) =
                            (material.bind_group(), object.transform_bind_group())
                        else {
                            log::warn!(
                                "skipping '{}', GPU resources not initialized",
                                object.name
                            );
                            continue;
                        };

                        render_pass.set_bind_group(1, object_bind_group, &[]);
                        render_pass.set_bind_group(2, material_bind_group, &[]);
                        render_pass.draw_object(object);
                    }
                }
            }

            // Translucent stars draw last, after all opaque geometry
            if let Some(star_pipeline) = self.pipeline_manager.get_pipeline("Stars") {
                render_pass.set_pipeline(star_pipeline);
                self.star_renderer.render(&mut render_pass);
            }
        }

        // PASS 3: UI overlay
        if let Some(ui_callback) = ui_callback {
            ui_callback(
                &self.device,
                &self.queue,
                &mut encoder,
                &surface_texture_view,
            );
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        surface_texture.present();
        Ok(())
    }

    /// Convenience method for rendering without a UI overlay.
    pub fn render_frame_simple(&mut self, scene: &Scene) -> Result<(), RenderError> {
        self.render_frame(
            scene,
            None::<fn(&wgpu::Device, &wgpu::Queue, &mut wgpu::CommandEncoder, &wgpu::TextureView)>,
        )
    }

    /// Resizes the surface and recreates the depth buffer.
    ///
    /// Zero dimensions are ignored (minimized window). The shadow map keeps
    /// its fixed resolution.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }

        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
        self.depth_texture =
            TextureResource::create_depth_texture(&self.device, &self.config, "depth_texture");
    }

    /// Returns current surface dimensions.
    pub fn surface_size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.format
    }

    /// Resolution of the shadow map edge in texels.
    pub fn shadow_map_size(&self) -> u32 {
        self.shadow_map.texture.width()
    }
}

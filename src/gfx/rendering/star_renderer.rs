//! Starfield renderer
//!
//! Draws the star point cloud as camera-facing quads in a single instanced
//! draw call. The instance buffer is uploaded once at startup; per frame only
//! the small uniform (spin transform + camera basis) changes.

use cgmath::InnerSpace;
use wgpu::util::DeviceExt;

use crate::{
    assets::ImageData,
    gfx::{
        camera::orbit_camera::OrbitCamera,
        geometry::Starfield,
        resources::texture_resource::TextureResource,
    },
    wgpu_utils::{
        binding_builder::{BindGroupBuilder, BindGroupLayoutBuilder, BindGroupLayoutWithDesc},
        binding_types,
        uniform_buffer::UniformBuffer,
    },
};

/// Must match the `StarUniform` struct in stars.wgsl.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
struct StarUniformContent {
    model: [[f32; 4]; 4],
    camera_right: [f32; 3],
    point_size: f32,
    camera_up: [f32; 3],
    _padding: f32,
}

pub struct StarRenderer {
    bind_group_layout: BindGroupLayoutWithDesc,
    uniform: UniformBuffer<StarUniformContent>,
    bind_group: Option<wgpu::BindGroup>,
    instance_buffer: Option<wgpu::Buffer>,
    instance_count: u32,
    // Keeps the mask view alive for the bind group
    _mask_texture: Option<TextureResource>,
}

impl StarRenderer {
    pub fn new(device: &wgpu::Device) -> Self {
        let bind_group_layout = BindGroupLayoutBuilder::new()
            .next_binding_vertex(binding_types::uniform())
            .next_binding_fragment(binding_types::texture_2d())
            .next_binding_fragment(binding_types::sampler(wgpu::SamplerBindingType::Filtering))
            .create(device, "Star Bind Group");

        let uniform = UniformBuffer::new(device);

        Self {
            bind_group_layout,
            uniform,
            bind_group: None,
            instance_buffer: None,
            instance_count: 0,
            _mask_texture: None,
        }
    }

    pub fn bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.bind_group_layout.layout
    }

    /// Uploads the star instances and the alpha-mask texture.
    pub fn upload(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        starfield: &Starfield,
        mask: &ImageData,
    ) {
        if starfield.stars.is_empty() {
            self.instance_buffer = None;
            self.instance_count = 0;
            return;
        }

        let instance_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Star Instance Buffer"),
            contents: bytemuck::cast_slice(&starfield.stars),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let mask_texture =
            TextureResource::create_from_image(device, queue, mask, "Star Mask", false);

        self.bind_group = Some(
            BindGroupBuilder::new(&self.bind_group_layout)
                .resource(self.uniform.binding_resource())
                .texture(&mask_texture.view)
                .sampler(&mask_texture.sampler)
                .create(device, "Star Bind Group"),
        );

        self.instance_buffer = Some(instance_buffer);
        self.instance_count = starfield.stars.len() as u32;
        self._mask_texture = Some(mask_texture);
    }

    /// Writes the spin transform and the camera basis for billboarding.
    pub fn update(&mut self, queue: &wgpu::Queue, starfield: &Starfield, camera: &OrbitCamera) {
        let forward = (camera.target - camera.eye).normalize();
        let right = forward.cross(camera.up).normalize();
        let up = right.cross(forward).normalize();

        self.uniform.update_content(
            queue,
            StarUniformContent {
                model: starfield.model_matrix().into(),
                camera_right: right.into(),
                point_size: starfield.point_size,
                camera_up: up.into(),
                _padding: 0.0,
            },
        );
    }

    /// Issues the instanced draw. The pipeline must already be bound.
    pub fn render<'a>(&'a self, render_pass: &mut wgpu::RenderPass<'a>) {
        let (Some(bind_group), Some(instance_buffer)) =
            (self.bind_group.as_ref(), self.instance_buffer.as_ref())
        else {
            return;
        };

        render_pass.set_bind_group(1, bind_group, &[]);
        render_pass.set_vertex_buffer(0, instance_buffer.slice(..));
        render_pass.draw(0..4, 0..self.instance_count);
    }
}

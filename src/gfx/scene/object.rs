//! Scene objects
//!
//! An [`Object`] is one node of the scene: a transform, one or more meshes,
//! shadow flags, and an optional material reference. Objects are built
//! CPU-side at startup; GPU buffers are created later by
//! `init_gpu_resources` once a device exists.

use std::ops::Range;

use cgmath::{Matrix4, Rad, SquareMatrix, Vector3};
use wgpu::Device;

use crate::gfx::geometry::GeometryData;
use crate::gfx::resources::material::MaterialId;

use super::vertex::Vertex3D;

pub struct Mesh {
    vertices: Vec<Vertex3D>,
    indices: Vec<u32>,
    vertex_buffer: Option<wgpu::Buffer>,
    index_buffer: Option<wgpu::Buffer>,
    pub index_count: u32,
    pub vertex_count: u32,
}

impl Mesh {
    pub fn new(vertices: Vec<Vertex3D>, indices: Vec<u32>) -> Self {
        let index_count = indices.len() as u32;
        let vertex_count = vertices.len() as u32;
        Self {
            vertices,
            indices,
            vertex_buffer: None,
            index_buffer: None,
            index_count,
            vertex_count,
        }
    }

    pub fn from_geometry(geometry: &GeometryData) -> Self {
        Self::new(geometry.to_vertices(), geometry.indices.clone())
    }
}

/// Per-object uniform data. Must match the shader's `ObjectUniform`.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
struct ObjectUniform {
    model: [[f32; 4]; 4],
    /// 1.0 when the object samples the shadow map, 0.0 otherwise.
    receive_shadow: f32,
    _padding: [f32; 3],
}

pub struct ObjectGpuResources {
    pub transform_buffer: wgpu::Buffer,
    pub transform_bind_group: wgpu::BindGroup,
}

pub struct Object {
    pub name: String,
    pub meshes: Vec<Mesh>,
    pub transform: Matrix4<f32>,
    pub cast_shadow: bool,
    pub receive_shadow: bool,
    pub double_sided: bool,
    pub visible: bool,
    material_id: Option<MaterialId>,
    pub gpu_resources: Option<ObjectGpuResources>,
}

impl Object {
    pub fn new(name: &str, meshes: Vec<Mesh>) -> Self {
        Self {
            name: name.to_string(),
            meshes,
            transform: Matrix4::identity(),
            cast_shadow: false,
            receive_shadow: false,
            double_sided: false,
            visible: true,
            material_id: None,
            gpu_resources: None,
        }
    }

    /// Convenience constructor for a single-mesh object.
    pub fn from_geometry(name: &str, geometry: &GeometryData) -> Self {
        Self::new(name, vec![Mesh::from_geometry(geometry)])
    }

    pub fn with_material(mut self, material_id: &str) -> Self {
        self.material_id = Some(material_id.to_string());
        self
    }

    pub fn with_cast_shadow(mut self, cast: bool) -> Self {
        self.cast_shadow = cast;
        self
    }

    pub fn with_receive_shadow(mut self, receive: bool) -> Self {
        self.receive_shadow = receive;
        self
    }

    pub fn with_double_sided(mut self, double_sided: bool) -> Self {
        self.double_sided = double_sided;
        self
    }

    pub fn material_id(&self) -> Option<&MaterialId> {
        self.material_id.as_ref()
    }

    pub fn set_translation(&mut self, translation: Vector3<f32>) {
        self.transform = Matrix4::from_translation(translation);
    }

    pub fn translate(&mut self, translation: Vector3<f32>) {
        self.transform = self.transform * Matrix4::from_translation(translation);
    }

    pub fn rotate_x(&mut self, angle: Rad<f32>) {
        self.transform = self.transform * Matrix4::from_angle_x(angle);
    }

    pub fn rotate_y(&mut self, angle: Rad<f32>) {
        self.transform = self.transform * Matrix4::from_angle_y(angle);
    }

    fn uniform(&self) -> ObjectUniform {
        ObjectUniform {
            model: self.transform.into(),
            receive_shadow: if self.receive_shadow { 1.0 } else { 0.0 },
            _padding: [0.0; 3],
        }
    }

    /// Writes the current transform to the GPU if resources exist.
    pub fn update_transform(&mut self, queue: &wgpu::Queue) {
        if let Some(gpu_resources) = &self.gpu_resources {
            queue.write_buffer(
                &gpu_resources.transform_buffer,
                0,
                bytemuck::bytes_of(&self.uniform()),
            );
        }
    }

    pub fn transform_bind_group(&self) -> Option<&wgpu::BindGroup> {
        self.gpu_resources
            .as_ref()
            .map(|res| &res.transform_bind_group)
    }

    pub fn init_gpu_resources(&mut self, device: &Device) {
        for mesh in self.meshes.iter_mut() {
            let vertex_buffer = wgpu::util::DeviceExt::create_buffer_init(
                device,
                &wgpu::util::BufferInitDescriptor {
                    label: Some("Vertex Buffer"),
                    contents: bytemuck::cast_slice(&mesh.vertices),
                    usage: wgpu::BufferUsages::VERTEX,
                },
            );

            let index_buffer = wgpu::util::DeviceExt::create_buffer_init(
                device,
                &wgpu::util::BufferInitDescriptor {
                    label: Some("Index Buffer"),
                    contents: bytemuck::cast_slice(&mesh.indices),
                    usage: wgpu::BufferUsages::INDEX,
                },
            );

            mesh.vertex_buffer = Some(vertex_buffer);
            mesh.index_buffer = Some(index_buffer);
        }

        let transform_buffer = wgpu::util::DeviceExt::create_buffer_init(
            device,
            &wgpu::util::BufferInitDescriptor {
                label: Some("Object Uniform Buffer"),
                contents: bytemuck::bytes_of(&self.uniform()),
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            },
        );

        let transform_bind_group_layout = Self::bind_group_layout(device);
        let transform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Object Bind Group"),
            layout: &transform_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: transform_buffer.as_entire_binding(),
            }],
        });

        self.gpu_resources = Some(ObjectGpuResources {
            transform_buffer,
            transform_bind_group,
        });
    }

    /// Layout of the per-object bind group (slot 1 in the render pipelines).
    pub fn bind_group_layout(device: &Device) -> wgpu::BindGroupLayout {
        device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Object Bind Group Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        })
    }
}

pub trait DrawObject<'a> {
    fn draw_mesh(&mut self, mesh: &'a Mesh);
    fn draw_mesh_instanced(&mut self, mesh: &'a Mesh, instances: Range<u32>);
    fn draw_object(&mut self, object: &'a Object);
}

impl<'a, 'b> DrawObject<'b> for wgpu::RenderPass<'a>
where
    'b: 'a,
{
    fn draw_mesh(&mut self, mesh: &'b Mesh) {
        self.draw_mesh_instanced(mesh, 0..1);
    }

    fn draw_mesh_instanced(&mut self, mesh: &'b Mesh, instances: Range<u32>) {
        let vertex_buffer = match &mesh.vertex_buffer {
            Some(buffer) => buffer,
            None => return, // Skip drawing if not uploaded
        };
        let index_buffer = match &mesh.index_buffer {
            Some(buffer) => buffer,
            None => return,
        };

        self.set_vertex_buffer(0, vertex_buffer.slice(..));
        self.set_index_buffer(index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        self.draw_indexed(0..mesh.index_count, 0, instances);
    }

    fn draw_object(&mut self, object: &'b Object) {
        for mesh in &object.meshes {
            self.draw_mesh(mesh);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::geometry::generate_plane;

    #[test]
    fn object_from_geometry_counts_match() {
        let plane = generate_plane(2.0, 1.0, 1, 1);
        let object = Object::from_geometry("flag", &plane);
        assert_eq!(object.meshes.len(), 1);
        assert_eq!(object.meshes[0].vertex_count, 4);
        assert_eq!(object.meshes[0].index_count, 6);
    }

    #[test]
    fn builder_flags_stick() {
        let plane = generate_plane(1.0, 1.0, 1, 1);
        let object = Object::from_geometry("ground", &plane)
            .with_receive_shadow(true)
            .with_double_sided(true)
            .with_material("ground");
        assert!(object.receive_shadow);
        assert!(!object.cast_shadow);
        assert!(object.double_sided);
        assert_eq!(object.material_id().map(String::as_str), Some("ground"));
    }

    #[test]
    fn translation_lands_in_the_matrix_w_column() {
        let plane = generate_plane(1.0, 1.0, 1, 1);
        let mut object = Object::from_geometry("flag", &plane);
        object.set_translation(Vector3::new(1.0, 3.5, 0.0));
        assert_eq!(object.transform.w.x, 1.0);
        assert_eq!(object.transform.w.y, 3.5);
        assert_eq!(object.transform.w.z, 0.0);
    }
}

//! Material system
//!
//! Materials combine shading parameters with optional base color and normal
//! maps. They are stored centrally in [`MaterialManager`] and shared between
//! objects by id, so the flag base and base top reference one concrete
//! material and one set of GPU resources. Missing maps fall back to 1x1
//! defaults, letting a single shader serve every material.

use std::collections::HashMap;
use wgpu::Device;

use crate::{
    assets::ImageData,
    wgpu_utils::{
        binding_builder::{BindGroupBuilder, BindGroupLayoutBuilder, BindGroupLayoutWithDesc},
        binding_types,
        uniform_buffer::UniformBuffer,
    },
};

use super::texture_resource::TextureResource;

/// Material ID for referencing materials
pub type MaterialId = String;

/// GPU uniform data for materials. Must match the shader's `MaterialUniform`.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MaterialUniform {
    pub base_color: [f32; 4],
    pub metallic: f32,
    pub roughness: f32,
    pub normal_scale: f32,
    _padding: f32,
}

type MaterialUBO = UniformBuffer<MaterialUniform>;

/// Material bind group management
///
/// Layout: material uniform, base color map + sampler, normal map + sampler.
pub struct MaterialBindings {
    bind_group_layout: BindGroupLayoutWithDesc,
    bind_group: Option<wgpu::BindGroup>,
}

impl MaterialBindings {
    pub fn new(device: &Device) -> Self {
        let bind_group_layout = BindGroupLayoutBuilder::new()
            .next_binding_fragment(binding_types::uniform())
            .next_binding_fragment(binding_types::texture_2d())
            .next_binding_fragment(binding_types::sampler(wgpu::SamplerBindingType::Filtering))
            .next_binding_fragment(binding_types::texture_2d())
            .next_binding_fragment(binding_types::sampler(wgpu::SamplerBindingType::Filtering))
            .create(device, "Material Bind Group");

        MaterialBindings {
            bind_group_layout,
            bind_group: None,
        }
    }

    pub fn create_bind_group(
        &mut self,
        device: &Device,
        ubo: &MaterialUBO,
        base_color_map: &TextureResource,
        normal_map: &TextureResource,
    ) {
        self.bind_group = Some(
            BindGroupBuilder::new(&self.bind_group_layout)
                .resource(ubo.binding_resource())
                .texture(&base_color_map.view)
                .sampler(&base_color_map.sampler)
                .texture(&normal_map.view)
                .sampler(&normal_map.sampler)
                .create(device, "Material Bind Group"),
        );
    }

    pub fn bind_group_layouts(&self) -> &wgpu::BindGroupLayout {
        &self.bind_group_layout.layout
    }

    pub fn bind_groups(&self) -> &wgpu::BindGroup {
        self.bind_group
            .as_ref()
            .expect("Bind group has not been created yet!")
    }
}

struct MaterialGpu {
    ubo: MaterialUBO,
    bindings: MaterialBindings,
    // Kept alive for the bind group's texture views
    _base_color_map: TextureResource,
    _normal_map: TextureResource,
}

/// Material definition with shading parameters and optional texture maps.
pub struct Material {
    pub name: String,
    pub base_color: [f32; 4],
    pub metallic: f32,
    pub roughness: f32,
    pub normal_scale: f32,
    pub double_sided: bool,
    pub base_color_map: Option<ImageData>,
    pub normal_map: Option<ImageData>,
    gpu: Option<MaterialGpu>,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            name: "default".to_string(),
            base_color: [0.8, 0.8, 0.8, 1.0],
            metallic: 0.0,
            roughness: 0.5,
            normal_scale: 1.0,
            double_sided: false,
            base_color_map: None,
            normal_map: None,
            gpu: None,
        }
    }
}

impl Material {
    pub fn new(name: &str, base_color: [f32; 4], metallic: f32, roughness: f32) -> Self {
        Self {
            name: name.to_string(),
            base_color,
            metallic: metallic.clamp(0.0, 1.0),
            roughness: roughness.clamp(0.0, 1.0),
            ..Default::default()
        }
    }

    pub fn with_base_color_map(mut self, image: ImageData) -> Self {
        self.base_color_map = Some(image);
        self
    }

    pub fn with_normal_map(mut self, image: ImageData) -> Self {
        self.normal_map = Some(image);
        self
    }

    pub fn with_double_sided(mut self, double_sided: bool) -> Self {
        self.double_sided = double_sided;
        self
    }

    fn uniform(&self) -> MaterialUniform {
        MaterialUniform {
            base_color: self.base_color,
            metallic: self.metallic,
            roughness: self.roughness,
            normal_scale: self.normal_scale,
            _padding: 0.0,
        }
    }

    /// Creates or refreshes this material's GPU resources.
    pub fn update_gpu_resources(&mut self, device: &Device, queue: &wgpu::Queue) {
        if self.gpu.is_none() {
            let base_color_map = match &self.base_color_map {
                Some(image) => TextureResource::create_from_image(
                    device,
                    queue,
                    image,
                    &format!("{} base color", self.name),
                    true,
                ),
                None => TextureResource::create_from_image(
                    device,
                    queue,
                    &ImageData::solid([255, 255, 255, 255]),
                    &format!("{} base color (default)", self.name),
                    true,
                ),
            };
            let normal_map = match &self.normal_map {
                Some(image) => TextureResource::create_from_image(
                    device,
                    queue,
                    image,
                    &format!("{} normal", self.name),
                    false,
                ),
                None => TextureResource::create_from_image(
                    device,
                    queue,
                    &ImageData::placeholder(crate::assets::AssetKind::BaseNormal),
                    &format!("{} normal (default)", self.name),
                    false,
                ),
            };

            let ubo = MaterialUBO::new_with_data(device, &self.uniform());
            let mut bindings = MaterialBindings::new(device);
            bindings.create_bind_group(device, &ubo, &base_color_map, &normal_map);

            self.gpu = Some(MaterialGpu {
                ubo,
                bindings,
                _base_color_map: base_color_map,
                _normal_map: normal_map,
            });
        } else {
            let uniform = self.uniform();
            if let Some(gpu) = &mut self.gpu {
                gpu.ubo.update_content(queue, uniform);
            }
        }
    }

    pub fn bind_group(&self) -> Option<&wgpu::BindGroup> {
        self.gpu.as_ref().map(|gpu| gpu.bindings.bind_groups())
    }
}

/// Centralized material storage.
///
/// Objects reference materials by id rather than owning material data,
/// so GPU resources are shared between objects with the same material.
pub struct MaterialManager {
    materials: HashMap<MaterialId, Material>,
    default_material_id: MaterialId,
}

impl MaterialManager {
    pub fn new() -> Self {
        let mut manager = Self {
            materials: HashMap::new(),
            default_material_id: "default".to_string(),
        };
        manager.materials.insert("default".to_string(), Material::default());
        manager
    }

    pub fn add_material(&mut self, material: Material) {
        self.materials.insert(material.name.clone(), material);
    }

    pub fn get_material(&self, id: &str) -> Option<&Material> {
        self.materials.get(id)
    }

    pub fn get_material_mut(&mut self, id: &str) -> Option<&mut Material> {
        self.materials.get_mut(id)
    }

    pub fn default_material(&self) -> &Material {
        self.materials.get(&self.default_material_id).unwrap()
    }

    /// Material lookup with fallback to the default material.
    pub fn material_for(&self, material_id: Option<&MaterialId>) -> &Material {
        match material_id {
            Some(id) => self
                .get_material(id)
                .unwrap_or_else(|| self.default_material()),
            None => self.default_material(),
        }
    }

    pub fn list_materials(&self) -> Vec<&MaterialId> {
        self.materials.keys().collect()
    }

    pub fn update_all_gpu_resources(&mut self, device: &Device, queue: &wgpu::Queue) {
        for material in self.materials.values_mut() {
            material.update_gpu_resources(device, queue);
        }
    }
}

impl Default for MaterialManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_clamps_shading_parameters() {
        let material = Material::new("m", [1.0, 0.0, 0.0, 1.0], 2.0, -1.0);
        assert_eq!(material.metallic, 1.0);
        assert_eq!(material.roughness, 0.0);
    }

    #[test]
    fn manager_falls_back_to_default() {
        let manager = MaterialManager::new();
        let missing = "nope".to_string();
        assert_eq!(manager.material_for(Some(&missing)).name, "default");
        assert_eq!(manager.material_for(None).name, "default");
    }

    #[test]
    fn materials_are_shared_by_id() {
        let mut manager = MaterialManager::new();
        manager.add_material(
            Material::new("concrete", [0.8, 0.8, 0.8, 1.0], 0.0, 0.9)
                .with_base_color_map(ImageData::solid([100, 100, 100, 255])),
        );
        let concrete = "concrete".to_string();
        assert_eq!(manager.material_for(Some(&concrete)).name, "concrete");
        assert!(manager.get_material("concrete").unwrap().base_color_map.is_some());
    }
}

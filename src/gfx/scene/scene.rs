use wgpu::Device;

use crate::gfx::{
    camera::CameraRig,
    geometry::Starfield,
    resources::material::{Material, MaterialManager},
};

use super::{
    light::{AmbientLight, DirectionalLight},
    object::Object,
};

/// Main scene container: camera rig, objects, materials, lights, starfield.
///
/// Everything is constructed CPU-side at startup; `init_gpu_resources`
/// performs the uploads once a device exists.
pub struct Scene {
    pub camera_rig: CameraRig,
    pub objects: Vec<Object>,
    pub materials: MaterialManager,
    pub ambient: AmbientLight,
    pub sun: DirectionalLight,
    pub starfield: Starfield,
    /// When true the animation tick sways the sun each frame; the tuning
    /// panel can switch it off to place the sun by hand.
    pub animate_sun: bool,
}

impl Scene {
    pub fn new(camera_rig: CameraRig) -> Self {
        Self {
            camera_rig,
            objects: Vec::new(),
            materials: MaterialManager::new(),
            ambient: AmbientLight::default(),
            sun: DirectionalLight::default(),
            starfield: Starfield::empty(),
            animate_sun: true,
        }
    }

    /// Advances the camera (orbit damping) and refreshes its matrices.
    pub fn update(&mut self) {
        self.camera_rig.update();
        self.camera_rig.camera.update_view_proj();
    }

    pub fn add_object(&mut self, object: Object) {
        self.objects.push(object);
    }

    pub fn add_material(&mut self, material: Material) {
        self.materials.add_material(material);
    }

    pub fn material_for_object(&self, object: &Object) -> &Material {
        self.materials.material_for(object.material_id())
    }

    pub fn object_by_name(&self, name: &str) -> Option<&Object> {
        self.objects.iter().find(|obj| obj.name == name)
    }

    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    /// Initializes GPU resources for all objects and materials.
    ///
    /// Must be called after the GPU context is available and before rendering.
    pub fn init_gpu_resources(&mut self, device: &Device, queue: &wgpu::Queue) {
        for object in self.objects.iter_mut() {
            object.init_gpu_resources(device);
        }
        self.materials.update_all_gpu_resources(device, queue);
    }

    /// Syncs material edits to the GPU.
    pub fn update_materials(&mut self, device: &Device, queue: &wgpu::Queue) {
        self.materials.update_all_gpu_resources(device, queue);
    }
}

pub mod orbit_camera;
pub mod orbit_controller;

// Re-export main types
pub use orbit_camera::{CameraUniform, OrbitCamera, OrbitCameraBounds};
pub use orbit_controller::OrbitController;

use winit::event::{DeviceEvent, KeyEvent};

/// Camera plus the controller that steers it.
pub struct CameraRig {
    pub camera: OrbitCamera,
    pub controller: OrbitController,
}

impl CameraRig {
    pub fn new(camera: OrbitCamera, controller: OrbitController) -> Self {
        Self { camera, controller }
    }

    pub fn process_device_event(&mut self, event: &DeviceEvent) {
        self.controller.process_device_event(event);
    }

    pub fn process_key_event(&mut self, event: &KeyEvent) {
        self.controller.process_key_event(event);
    }

    /// Consumes accumulated input and advances the damped motion.
    ///
    /// Must be called exactly once per frame, before the draw call.
    pub fn update(&mut self) {
        self.controller.update(&mut self.camera);
    }

    pub fn view_proj_matrix(&self) -> cgmath::Matrix4<f32> {
        self.camera.build_view_projection_matrix()
    }
}

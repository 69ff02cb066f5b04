//! Scene lights
//!
//! One ambient term and one shadow-casting directional light. Both are
//! created at startup and mutated in place by the tuning panel and the
//! animation tick.

use cgmath::{Matrix4, Point3, Vector3};

use crate::gfx::camera::orbit_camera::OPENGL_TO_WGPU_MATRIX;

/// Uniform fill light with no position.
#[derive(Debug, Clone, Copy)]
pub struct AmbientLight {
    pub color: [f32; 3],
    pub intensity: f32,
}

impl Default for AmbientLight {
    fn default() -> Self {
        Self {
            color: [1.0, 1.0, 1.0],
            intensity: 0.1,
        }
    }
}

/// Directional light with a position, a target it points at, and a square
/// shadow map.
#[derive(Debug, Clone, Copy)]
pub struct DirectionalLight {
    pub position: [f32; 3],
    pub target: [f32; 3],
    pub color: [f32; 3],
    pub intensity: f32,
    pub cast_shadow: bool,
    pub shadow_map_size: u32,
}

impl Default for DirectionalLight {
    fn default() -> Self {
        Self {
            position: [4.0, 4.0, 4.0],
            target: [0.0, 0.0, 0.0],
            color: [1.0, 1.0, 1.0],
            intensity: 1.0,
            cast_shadow: true,
            shadow_map_size: 1024,
        }
    }
}

impl DirectionalLight {
    /// View-projection matrix for the shadow pass.
    ///
    /// Orthographic volume sized to cover the ~10 unit scene around the
    /// target, recomputed from the current position since both the panel and
    /// the animation move the light.
    pub fn view_projection(&self) -> Matrix4<f32> {
        let eye = Point3::new(self.position[0], self.position[1], self.position[2]);
        let target = Point3::new(self.target[0], self.target[1], self.target[2]);
        let view = Matrix4::look_at_rh(eye, target, Vector3::unit_y());
        let proj = OPENGL_TO_WGPU_MATRIX * cgmath::ortho(-12.0, 12.0, -12.0, 12.0, 0.5, 40.0);
        proj * view
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::SquareMatrix;

    #[test]
    fn defaults_match_the_scene_setup() {
        let sun = DirectionalLight::default();
        assert_eq!(sun.position, [4.0, 4.0, 4.0]);
        assert_eq!(sun.shadow_map_size, 1024);
        assert!(sun.cast_shadow);

        let ambient = AmbientLight::default();
        assert!((ambient.intensity - 0.1).abs() < 1e-6);
    }

    #[test]
    fn light_matrix_is_invertible() {
        let sun = DirectionalLight::default();
        assert!(sun.view_projection().invert().is_some());
    }
}

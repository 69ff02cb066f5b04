//! Starfield point cloud
//!
//! A fixed-size set of randomly placed stars surrounding the scene. Star
//! placement is generated once at startup from an unseeded uniform
//! distribution, so tests verify count and bounds rather than exact
//! positions.

use cgmath::{Matrix4, Rad, Vector3};
use rand::Rng;

/// How many stars to scatter and over what volume.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StarDensity {
    /// 200 stars in an 8-unit cube.
    Sparse,
    /// 800 stars in a 20-unit cube.
    Dense,
}

impl StarDensity {
    pub fn star_count(self) -> usize {
        match self {
            StarDensity::Sparse => 200,
            StarDensity::Dense => 800,
        }
    }

    /// Edge length of the cube the stars are scattered in.
    pub fn spread(self) -> f32 {
        match self {
            StarDensity::Sparse => 8.0,
            StarDensity::Dense => 20.0,
        }
    }
}

/// Per-star instance data for the billboard pipeline.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct StarInstance {
    pub position: [f32; 3],
    _pad0: f32,
    /// Per-channel perturbation in [-0.5, 0.5], tinting the alpha mask.
    pub color: [f32; 3],
    _pad1: f32,
}

impl StarInstance {
    pub fn new(position: [f32; 3], color: [f32; 3]) -> Self {
        Self {
            position,
            _pad0: 0.0,
            color,
            _pad1: 0.0,
        }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        use std::mem;
        wgpu::VertexBufferLayout {
            array_stride: mem::size_of::<StarInstance>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 4]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x3,
                },
            ],
        }
    }
}

/// The star point cloud plus its world placement.
pub struct Starfield {
    pub stars: Vec<StarInstance>,
    pub spread: f32,
    /// World offset of the cloud center.
    pub position: Vector3<f32>,
    /// Spin angle about Y, driven by the animation tick.
    pub spin: f32,
    /// World-space edge length of one star billboard.
    pub point_size: f32,
}

impl Starfield {
    /// Scatters `density.star_count()` stars uniformly over the density's
    /// cube, each with a color perturbation in [-0.5, 0.5] per channel.
    pub fn generate(density: StarDensity) -> Self {
        let mut rng = rand::rng();
        let spread = density.spread();

        let stars = (0..density.star_count())
            .map(|_| {
                let position = [
                    (rng.random::<f32>() - 0.5) * spread,
                    (rng.random::<f32>() - 0.5) * spread,
                    (rng.random::<f32>() - 0.5) * spread,
                ];
                let color = [
                    rng.random::<f32>() - 0.5,
                    rng.random::<f32>() - 0.5,
                    rng.random::<f32>() - 0.5,
                ];
                StarInstance::new(position, color)
            })
            .collect();

        Self {
            stars,
            spread,
            position: Vector3::new(0.0, 2.0, 0.0),
            spin: 0.0,
            point_size: 0.5,
        }
    }

    /// A starfield with no stars, used before the scene is composed.
    pub fn empty() -> Self {
        Self {
            stars: Vec::new(),
            spread: 0.0,
            position: Vector3::new(0.0, 0.0, 0.0),
            spin: 0.0,
            point_size: 0.5,
        }
    }

    pub fn model_matrix(&self) -> Matrix4<f32> {
        Matrix4::from_translation(self.position) * Matrix4::from_angle_y(Rad(self.spin))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sparse_field_has_exactly_200_stars_within_bounds() {
        let field = Starfield::generate(StarDensity::Sparse);
        assert_eq!(field.stars.len(), 200);
        let half = field.spread / 2.0;
        for star in &field.stars {
            for axis in star.position {
                assert!(axis >= -half && axis <= half);
            }
        }
    }

    #[test]
    fn dense_field_has_exactly_800_stars_within_bounds() {
        let field = Starfield::generate(StarDensity::Dense);
        assert_eq!(field.stars.len(), 800);
        assert_eq!(field.spread, 20.0);
        let half = field.spread / 2.0;
        for star in &field.stars {
            for axis in star.position {
                assert!(axis >= -half && axis <= half);
            }
        }
    }

    #[test]
    fn color_perturbations_are_centered_on_zero() {
        let field = Starfield::generate(StarDensity::Sparse);
        for star in &field.stars {
            for channel in star.color {
                assert!(channel >= -0.5 && channel <= 0.5);
            }
        }
    }

    #[test]
    fn cloud_floats_above_the_ground() {
        let field = Starfield::generate(StarDensity::Sparse);
        assert_eq!(field.position, Vector3::new(0.0, 2.0, 0.0));
        let model = field.model_matrix();
        assert_eq!(model.w.y, 2.0);
    }
}

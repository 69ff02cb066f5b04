//! # Graphics Module
//!
//! All graphics-related functionality: the orbit camera, procedural
//! geometry, the rendering pipelines, scene management, and GPU resource
//! handling.
//!
//! - **Camera** ([`camera`]) - orbit camera with damped controls
//! - **Geometry** ([`geometry`]) - procedural planes, cylinders, starfield
//! - **Rendering** ([`rendering`]) - shadow pass, lit pass, star pass
//! - **Scene** ([`scene`]) - objects, lights, and the scene container
//! - **Resources** ([`resources`]) - materials, textures, global uniforms

pub mod camera;
pub mod geometry;
pub mod rendering;
pub mod resources;
pub mod scene;

// Re-export commonly used types
pub use camera::orbit_camera::OrbitCamera;
pub use rendering::render_engine::RenderEngine;

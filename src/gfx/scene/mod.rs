//! # Scene Management Module
//!
//! Scene graph for the flag scene: the [`Scene`] container, [`Object`] nodes
//! with transforms and shadow flags, light definitions, and vertex formats.
//!
//! Objects are created once at startup and live for the program lifetime;
//! the render loop and the event handlers only mutate fields in place.

pub mod light;
pub mod object;
pub mod scene;
pub mod vertex;

// Re-export main types
pub use light::{AmbientLight, DirectionalLight};
pub use object::{DrawObject, Mesh, Object};
pub use scene::Scene;
pub use vertex::Vertex3D;

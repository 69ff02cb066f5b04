//! # Flagstaff Prelude
//!
//! Brings the commonly used types into scope:
//!
//! ```rust
//! use flagstaff::prelude::*;
//! ```

// Re-export core application types
pub use crate::app::FlagstaffApp;
pub use crate::default;

// Re-export assets
pub use crate::assets::{AssetLibrary, AssetPaths, ImageData};

// Re-export graphics and scene types
pub use crate::gfx::camera::{CameraRig, OrbitCamera, OrbitController};
pub use crate::gfx::geometry::{
    generate_cylinder, generate_plane, GeometryData, StarDensity, Starfield,
};
pub use crate::gfx::scene::{AmbientLight, DirectionalLight, Object, Scene};

// Re-export scene composition and animation
pub use crate::scenery::animation;
pub use crate::scenery::build_scene;

// Re-export common external dependencies
pub use cgmath::{InnerSpace, Vector3, Zero};
pub use imgui::Ui;

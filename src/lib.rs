// src/lib.rs
//! Flagstaff
//!
//! A decorative 3D scene rendered with wgpu and winit: a flag on a pole
//! standing on a ground plane under a slowly turning starfield, with an
//! orbit camera and a live tuning panel for the directional light.

pub mod app;
pub mod assets;
pub mod clock;
pub mod gfx;
pub mod prelude;
pub mod scenery;
pub mod ui;
pub mod wgpu_utils;

// Re-export main types for convenience
pub use app::FlagstaffApp;

use assets::AssetPaths;
use gfx::geometry::StarDensity;

/// Creates the application with the default asset paths and the sparse
/// starfield.
pub fn default() -> FlagstaffApp {
    FlagstaffApp::new(AssetPaths::default(), StarDensity::Sparse)
}

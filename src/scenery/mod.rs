//! Scene composition and animation
//!
//! [`builder`] assembles the flag scene (ground, base, pole, flag,
//! starfield, lights, camera) entirely CPU-side; [`animation`] holds the
//! pure per-frame mutations the render loop applies.

pub mod animation;
pub mod builder;

pub use builder::build_scene;

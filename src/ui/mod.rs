//! UI overlay
//!
//! ImGui plumbing plus the scene tuning panel and the loading indicator.

pub mod manager;
pub mod panel;
pub mod tunables;

pub use manager::UiManager;
pub use panel::{loading_overlay, tuning_panel};
pub use tunables::{sun_tunables, Tunable};

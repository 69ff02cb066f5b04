// src/ui/panel.rs
//! Tuning panel and loading indicator
//!
//! A small window of sliders bound to the directional light through the
//! declarative tunables table, plus the loading overlay shown while assets
//! resolve.

use crate::gfx::scene::Scene;

use super::tunables::sun_tunables;

/// Renders the scene tuning panel.
///
/// One slider per entry in the tunables table, plus the sun animation
/// toggle. Slider edits mutate the light directly, range-clamped by
/// `Tunable::apply`.
pub fn tuning_panel(ui: &imgui::Ui, scene: &mut Scene) {
    let display_size = ui.io().display_size;
    // Guard against a zero-sized frame during startup or minimize
    if display_size[0] <= 0.0 || display_size[1] <= 0.0 {
        return;
    }

    ui.window("Scene Tuning")
        .size([320.0, 220.0], imgui::Condition::FirstUseEver)
        .position([20.0, 20.0], imgui::Condition::FirstUseEver)
        .resizable(true)
        .collapsible(true)
        .build(|| {
            ui.text("Sun");
            ui.separator();

            for tunable in sun_tunables() {
                let mut value = tunable.value(&scene.sun);
                if ui.slider(tunable.label, tunable.min, tunable.max, &mut value) {
                    tunable.apply(&mut scene.sun, value);
                }
            }

            ui.spacing();
            ui.checkbox("animate sun", &mut scene.animate_sun);
            if scene.animate_sun {
                ui.text_disabled("position sways while animating");
            }
        });
}

/// Small centered overlay shown while assets are still loading.
pub fn loading_overlay(ui: &imgui::Ui) {
    let display_size = ui.io().display_size;
    if display_size[0] <= 0.0 || display_size[1] <= 0.0 {
        return;
    }

    ui.window("##loading")
        .position(
            [display_size[0] * 0.5 - 80.0, display_size[1] * 0.5 - 20.0],
            imgui::Condition::Always,
        )
        .size([160.0, 40.0], imgui::Condition::Always)
        .title_bar(false)
        .resizable(false)
        .movable(false)
        .build(|| {
            ui.text("Loading assets...");
        });
}

//! Per-frame scene animation
//!
//! Pure functions of elapsed time, applied once per frame between the orbit
//! update and the draw call. Kept free of window and GPU state so the loop
//! body is testable.

use crate::gfx::scene::Scene;

/// Elapsed seconds are divided by this to get the starfield spin angle.
pub const STAR_SPIN_DIVISOR: f32 = 15.0;

/// Sun sway: a sine of elapsed time on x and y around the (4, 4, 4) anchor.
pub fn sun_position(elapsed: f32) -> [f32; 3] {
    [elapsed.sin() + 4.0, elapsed.sin() + 4.0, 4.0]
}

/// Slow starfield rotation about the vertical axis.
pub fn star_spin(elapsed: f32) -> f32 {
    elapsed / STAR_SPIN_DIVISOR
}

/// Applies the time-driven mutations for one frame.
///
/// The sun sway respects the panel's animation toggle; the starfield always
/// turns.
pub fn advance(scene: &mut Scene, elapsed: f32) {
    if scene.animate_sun {
        scene.sun.position = sun_position(elapsed);
    }
    scene.starfield.spin = star_spin(elapsed);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::camera::{CameraRig, OrbitCamera, OrbitController};
    use cgmath::{Vector3, Zero};
    use std::f32::consts::FRAC_PI_2;

    fn scene() -> Scene {
        let camera = OrbitCamera::new(10.0, 0.4, 0.0, Vector3::zero(), 1.0);
        let controller = OrbitController::new(0.005, 0.1);
        Scene::new(CameraRig::new(camera, controller))
    }

    #[test]
    fn sun_sways_on_a_sine() {
        assert_eq!(sun_position(0.0), [4.0, 4.0, 4.0]);
        let at_peak = sun_position(FRAC_PI_2);
        assert!((at_peak[0] - 5.0).abs() < 1e-6);
        assert!((at_peak[1] - 5.0).abs() < 1e-6);
        assert_eq!(at_peak[2], 4.0);
    }

    #[test]
    fn star_spin_is_elapsed_over_divisor() {
        assert_eq!(star_spin(0.0), 0.0);
        assert!((star_spin(30.0) - 2.0).abs() < 1e-6);
    }

    #[test]
    fn advance_moves_sun_and_stars() {
        let mut scene = scene();
        advance(&mut scene, FRAC_PI_2);
        assert!((scene.sun.position[0] - 5.0).abs() < 1e-6);
        assert!((scene.starfield.spin - FRAC_PI_2 / 15.0).abs() < 1e-6);
    }

    #[test]
    fn sun_stays_put_when_animation_is_off() {
        let mut scene = scene();
        scene.animate_sun = false;
        scene.sun.position = [1.0, 2.0, 3.0];
        advance(&mut scene, 10.0);
        assert_eq!(scene.sun.position, [1.0, 2.0, 3.0]);
        // the starfield keeps turning regardless
        assert!(scene.starfield.spin > 0.0);
    }
}

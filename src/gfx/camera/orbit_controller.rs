//! Orbit input controller
//!
//! Translates pointer and scroll input into damped orbital motion. Input
//! events only accumulate velocity; `update()` applies it to the camera once
//! per frame and decays it, giving inertia after the pointer is released.

use winit::{
    dpi::PhysicalPosition,
    event::{DeviceEvent, ElementState, KeyEvent, MouseScrollDelta},
    keyboard::{KeyCode, PhysicalKey},
};

use super::orbit_camera::OrbitCamera;

/// Residual velocity below this snaps to zero, ending the glide.
const REST_EPSILON: f32 = 1e-5;

pub struct OrbitController {
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub pan_speed: f32,
    /// Fraction of velocity shed each frame, in (0, 1].
    pub damping: f32,
    /// When false, scroll input is ignored entirely.
    pub enable_zoom: bool,
    yaw_velocity: f32,
    pitch_velocity: f32,
    zoom_velocity: f32,
    pan_velocity: (f32, f32),
    is_mouse_pressed: bool,
    is_shift_held: bool,
}

impl OrbitController {
    pub fn new(rotate_speed: f32, zoom_speed: f32) -> Self {
        Self {
            rotate_speed,
            zoom_speed,
            pan_speed: 0.01,
            damping: 0.1,
            enable_zoom: true,
            yaw_velocity: 0.0,
            pitch_velocity: 0.0,
            zoom_velocity: 0.0,
            pan_velocity: (0.0, 0.0),
            is_mouse_pressed: false,
            is_shift_held: false,
        }
    }

    pub fn with_damping(mut self, damping: f32) -> Self {
        self.damping = damping.clamp(f32::EPSILON, 1.0);
        self
    }

    pub fn with_zoom_enabled(mut self, enable_zoom: bool) -> Self {
        self.enable_zoom = enable_zoom;
        self
    }

    /// Accumulates raw pointer input into pending velocity.
    pub fn process_device_event(&mut self, event: &DeviceEvent) {
        match event {
            DeviceEvent::Button {
                button: 0, // Left Mouse Button
                state,
            } => {
                self.is_mouse_pressed = *state == ElementState::Pressed;
            }
            DeviceEvent::MouseWheel { delta, .. } => {
                if !self.enable_zoom {
                    return;
                }
                let scroll_amount = -match delta {
                    MouseScrollDelta::LineDelta(_, scroll) => *scroll,
                    MouseScrollDelta::PixelDelta(PhysicalPosition { y: scroll, .. }) => {
                        *scroll as f32
                    }
                };
                self.zoom_velocity += scroll_amount * self.zoom_speed;
            }
            DeviceEvent::MouseMotion { delta } => {
                if self.is_mouse_pressed {
                    if self.is_shift_held {
                        // Shift-drag pans the focus point
                        self.pan_velocity.0 += -delta.0 as f32 * self.pan_speed;
                        self.pan_velocity.1 += delta.1 as f32 * self.pan_speed;
                    } else {
                        self.yaw_velocity += -delta.0 as f32 * self.rotate_speed;
                        self.pitch_velocity += delta.1 as f32 * self.rotate_speed;
                    }
                }
            }
            _ => (),
        }
    }

    pub fn process_key_event(&mut self, event: &KeyEvent) {
        if let KeyEvent {
            physical_key: PhysicalKey::Code(KeyCode::ShiftLeft | KeyCode::ShiftRight),
            state,
            ..
        } = event
        {
            self.is_shift_held = *state == ElementState::Pressed;
        }
    }

    /// Applies pending velocity to the camera, then decays it.
    ///
    /// Called exactly once per animation frame before the draw call. With no
    /// new input the applied delta shrinks by `damping` every frame until the
    /// motion snaps to rest.
    pub fn update(&mut self, camera: &mut OrbitCamera) {
        if self.yaw_velocity != 0.0 {
            camera.add_yaw(self.yaw_velocity);
        }
        if self.pitch_velocity != 0.0 {
            camera.add_pitch(self.pitch_velocity);
        }
        if self.zoom_velocity != 0.0 {
            camera.add_distance(self.zoom_velocity);
        }
        if self.pan_velocity != (0.0, 0.0) {
            camera.pan(self.pan_velocity);
        }

        let keep = 1.0 - self.damping;
        self.yaw_velocity = decay(self.yaw_velocity * keep);
        self.pitch_velocity = decay(self.pitch_velocity * keep);
        self.zoom_velocity = decay(self.zoom_velocity * keep);
        self.pan_velocity = (
            decay(self.pan_velocity.0 * keep),
            decay(self.pan_velocity.1 * keep),
        );
    }

    /// True while residual motion is still being applied.
    pub fn is_moving(&self) -> bool {
        self.yaw_velocity != 0.0
            || self.pitch_velocity != 0.0
            || self.zoom_velocity != 0.0
            || self.pan_velocity != (0.0, 0.0)
    }

    pub fn is_panning(&self) -> bool {
        self.is_mouse_pressed && self.is_shift_held
    }
}

fn decay(velocity: f32) -> f32 {
    if velocity.abs() < REST_EPSILON {
        0.0
    } else {
        velocity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{Vector3, Zero};
    use winit::event::{DeviceEvent, ElementState};

    fn camera() -> OrbitCamera {
        OrbitCamera::new(10.0, 0.4, 0.2, Vector3::zero(), 1.0)
    }

    fn press_and_drag(controller: &mut OrbitController, delta: (f64, f64)) {
        controller.process_device_event(&DeviceEvent::Button {
            button: 0,
            state: ElementState::Pressed,
        });
        controller.process_device_event(&DeviceEvent::MouseMotion { delta });
        controller.process_device_event(&DeviceEvent::Button {
            button: 0,
            state: ElementState::Released,
        });
    }

    #[test]
    fn drag_orbits_the_camera() {
        let mut camera = camera();
        let mut controller = OrbitController::new(0.005, 0.1);
        let yaw_before = camera.yaw;

        press_and_drag(&mut controller, (20.0, 0.0));
        controller.update(&mut camera);

        assert!(camera.yaw != yaw_before);
    }

    #[test]
    fn damped_motion_shrinks_monotonically_to_rest() {
        let mut camera = camera();
        let mut controller = OrbitController::new(0.005, 0.1).with_damping(0.1);

        press_and_drag(&mut controller, (40.0, 10.0));

        let mut previous_delta = f32::MAX;
        let mut frames_until_rest = 0;
        for _ in 0..10_000 {
            let yaw_before = camera.yaw;
            controller.update(&mut camera);
            let delta = (camera.yaw - yaw_before).abs();
            if !controller.is_moving() {
                break;
            }
            assert!(delta <= previous_delta, "per-frame delta must not grow");
            previous_delta = delta;
            frames_until_rest += 1;
        }

        assert!(!controller.is_moving(), "controller never came to rest");
        assert!(frames_until_rest > 1, "inertia should outlast the input");
    }

    #[test]
    fn disabled_zoom_never_changes_distance() {
        let mut camera = camera();
        let mut controller = OrbitController::new(0.005, 0.1).with_zoom_enabled(false);
        let distance_before = camera.distance;

        for _ in 0..10 {
            controller.process_device_event(&DeviceEvent::MouseWheel {
                delta: MouseScrollDelta::LineDelta(0.0, 3.0),
            });
            controller.update(&mut camera);
        }

        assert_eq!(camera.distance, distance_before);
    }

    #[test]
    fn enabled_zoom_does_change_distance() {
        let mut camera = camera();
        let mut controller = OrbitController::new(0.005, 0.1);

        controller.process_device_event(&DeviceEvent::MouseWheel {
            delta: MouseScrollDelta::LineDelta(0.0, 3.0),
        });
        controller.update(&mut camera);

        assert!(camera.distance != 10.0);
    }

    #[test]
    fn motion_without_input_is_a_no_op() {
        let mut camera = camera();
        let mut controller = OrbitController::new(0.005, 0.1);
        let yaw = camera.yaw;
        let pitch = camera.pitch;

        controller.update(&mut camera);

        assert_eq!(camera.yaw, yaw);
        assert_eq!(camera.pitch, pitch);
        assert!(!controller.is_moving());
    }
}

use glam::{Quat, Vec2, Vec3};

use super::core::CameraState;
use crate::input::KeyAction;
use crate::options::ControlOptions;

/// A camera manipulation produced by user input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CameraCommand {
    /// Orbit around the target by a pointer delta in pixels.
    Rotate {
        /// Pointer delta.
        delta: Vec2,
    },
    /// Translate eye and target in the view plane by a pointer delta.
    Pan {
        /// Pointer delta.
        delta: Vec2,
    },
    /// Dolly towards (positive) or away from (negative) the target.
    Zoom {
        /// Zoom amount.
        delta: f32,
    },
    /// One keyboard navigation step.
    Step(KeyAction),
}

/// Orbit-style camera controls operating on eye/target positions.
#[derive(Debug, Clone)]
pub struct OrbitControls {
    rotate_speed: f32,
    pan_speed: f32,
    zoom_speed: f32,
    keyboard_step: f32,
    /// Closest the eye may dolly to the target.
    min_distance: f32,
    /// Configured dolly limit; scene-driven updates stay at or below it.
    default_min_distance: f32,
    /// Farthest the eye may dolly from the target.
    max_distance: f32,
}

impl Default for OrbitControls {
    fn default() -> Self {
        Self::from_options(&ControlOptions::default())
    }
}

/// Keeps the orbit away from the poles so `up` never aligns with the view.
const MIN_POLAR_ANGLE: f32 = 0.01;

impl OrbitControls {
    /// Build controls from option multipliers.
    #[must_use]
    pub fn from_options(options: &ControlOptions) -> Self {
        let min_distance = if options.min_distance.is_finite() && options.min_distance > 0.0 {
            options.min_distance
        } else {
            0.1
        };
        Self {
            rotate_speed: options.rotate_speed * 0.01,
            pan_speed: options.pan_speed * 0.002,
            zoom_speed: options.zoom_speed,
            keyboard_step: options.keyboard_step,
            min_distance,
            default_min_distance: min_distance,
            max_distance: 1.0e7,
        }
    }

    /// Closest dolly distance.
    #[must_use]
    pub fn min_distance(&self) -> f32 {
        self.min_distance
    }

    /// Configured closest dolly distance.
    #[must_use]
    pub fn default_min_distance(&self) -> f32 {
        self.default_min_distance
    }

    /// Update the closest dolly distance (driven by near-plane updates).
    pub fn set_min_distance(&mut self, distance: f32) {
        if distance.is_finite() && distance > 0.0 {
            self.min_distance = distance.min(self.max_distance);
        }
    }

    /// Apply `command` to `camera`. Returns `true` if the camera moved.
    pub fn apply(&self, command: CameraCommand, camera: &mut CameraState) -> bool {
        let before = camera.pose();
        match command {
            CameraCommand::Rotate { delta } => self.rotate(camera, delta),
            CameraCommand::Pan { delta } => self.pan(camera, delta),
            CameraCommand::Zoom { delta } => self.zoom(camera, delta),
            CameraCommand::Step(action) => self.step(camera, action),
        }
        camera.pose() != before
    }

    fn rotate(&self, camera: &mut CameraState, delta: Vec2) {
        let offset = camera.position - camera.target;
        let radius = offset.length();
        if radius <= f32::EPSILON {
            return;
        }

        // Horizontal rotation around world up
        let yaw = Quat::from_axis_angle(camera.up, -delta.x * self.rotate_speed);
        let offset = yaw * offset;

        // Vertical rotation around the camera's right vector, clamped short
        // of the poles
        let dir = offset / radius;
        let polar = dir.dot(camera.up).clamp(-1.0, 1.0).acos();
        let pitch = (delta.y * self.rotate_speed).clamp(
            MIN_POLAR_ANGLE - polar,
            std::f32::consts::PI - MIN_POLAR_ANGLE - polar,
        );
        let right = camera.up.cross(dir).try_normalize().unwrap_or(Vec3::X);
        let offset = Quat::from_axis_angle(right, pitch) * offset;

        camera.position = camera.target + offset;
    }

    fn pan(&self, camera: &mut CameraState, delta: Vec2) {
        let forward = camera.forward();
        let right = forward.cross(camera.up).try_normalize().unwrap_or(Vec3::X);
        let up = right.cross(forward);
        let scale = self.pan_speed * camera.distance_to_target().max(1.0);

        let translation = right * (-delta.x * scale) + up * (delta.y * scale);
        camera.position += translation;
        camera.target += translation;
    }

    fn zoom(&self, camera: &mut CameraState, delta: f32) {
        let distance = (camera.distance_to_target()
            * (1.0 - delta * self.zoom_speed))
            .clamp(self.min_distance, self.max_distance);
        camera.position = camera.target - camera.forward() * distance;
    }

    fn step(&self, camera: &mut CameraState, action: KeyAction) {
        let forward = camera.forward();
        let right = forward.cross(camera.up).try_normalize().unwrap_or(Vec3::X);
        let up = right.cross(forward);
        let step = camera.distance_to_target().max(self.min_distance)
            * self.keyboard_step;
        let direction = match action {
            KeyAction::MoveForward => forward,
            KeyAction::MoveBackward => -forward,
            KeyAction::MoveLeft => -right,
            KeyAction::MoveRight => right,
            KeyAction::MoveUp => up,
            KeyAction::MoveDown => -up,
        };
        camera.position += direction * step;
        camera.target += direction * step;
    }
}

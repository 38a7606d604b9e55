//! Camera system for the viewport.
//!
//! Provides the camera state and projection, eased camera flights, and
//! orbit controls driven by user input.

/// Eased, cancellable camera flights.
pub mod animator;
/// Orbit/pan/dolly/keyboard controls.
pub mod controls;
/// Camera state and projection types.
pub mod core;

pub use animator::{AnimationJob, CameraAnimator};
pub use controls::{CameraCommand, OrbitControls};
pub use core::{CameraPose, CameraState, Projection};

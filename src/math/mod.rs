//! Stateless 3D math used by the camera, the registry and the scheduler.
//!
//! Everything here is a pure function or a plain value type: boxes,
//! transforms, projection matrices and the world → viewport mapping.

/// Axis-aligned bounding boxes and bounding spheres.
pub mod aabb;
/// Projection matrices and world → viewport coordinate mapping.
pub mod projection;
/// Translation / rotation / scale value embedded in models.
pub mod transform;

pub use aabb::{Aabb, BoundingSphere};
pub use projection::{relative_viewport_coordinates, RelativeViewportPoint};
pub use transform::Transform;

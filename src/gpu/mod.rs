//! wgpu device/surface initialization and the surface-backed renderer.

/// wgpu device, surface, and queue initialization plus [`GpuRenderer`].
///
/// [`GpuRenderer`]: render_context::GpuRenderer
pub mod render_context;

pub use render_context::{GpuRenderer, RenderContext, RenderContextError};

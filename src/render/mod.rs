//! Frame loop, resolution budgeting and the renderer seam.
//!
//! The controller never talks to a GPU directly. Each rendered tick hands a
//! [`FrameContext`] to a [`FrameRenderer`]; [`HeadlessRenderer`] is the
//! default when the host injects none, and
//! [`GpuRenderer`](crate::gpu::render_context::GpuRenderer) draws into a wgpu
//! surface.

/// Near/far planes fitted to the scene bounds.
pub mod near_far;
/// Client size → physical render target size.
pub mod resize;
/// Scheduler state machine and redraw flag.
pub mod scheduler;

use std::cell::RefCell;
use std::rc::Rc;

use glam::{Mat4, Vec3};

pub use near_far::{compute_clip_planes, ClipPlanes};
pub use resize::{HostElement, ViewportSurface};
pub use scheduler::{CancellationToken, RenderScheduler, SchedulerState, TickOutcome};

/// Everything a renderer needs to draw one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameContext {
    /// World → camera.
    pub view: Mat4,
    /// Camera → clip.
    pub projection: Mat4,
    /// Eye position in world space.
    pub camera_position: Vec3,
    /// Near plane distance.
    pub near: f32,
    /// Far plane distance.
    pub far: f32,
    /// Physical render target size.
    pub size: (u32, u32),
    /// Number of frames rendered before this one.
    pub frame_index: u64,
}

/// Produces frames for the controller.
pub trait FrameRenderer {
    /// The physical render target size changed.
    fn resize(&mut self, width: u32, height: u32);

    /// Draw one frame.
    fn render(&mut self, frame: &FrameContext);

    /// Release GPU resources. Called once, after every model is disposed.
    fn dispose(&mut self);
}

/// Counters recorded by a [`HeadlessRenderer`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HeadlessStats {
    /// Frames rendered.
    pub frames: u64,
    /// Resize calls received.
    pub resizes: u64,
    /// Last size passed to `resize`.
    pub size: Option<(u32, u32)>,
    /// Last frame rendered.
    pub last_frame: Option<FrameContext>,
    /// Whether `dispose` was called.
    pub disposed: bool,
}

/// Renderer that draws nothing and only records what it was asked to do.
///
/// The stats live behind a shared handle so a host can keep observing them
/// after handing the renderer to a controller.
#[derive(Debug, Default)]
pub struct HeadlessRenderer {
    stats: Rc<RefCell<HeadlessStats>>,
}

impl HeadlessRenderer {
    /// Create a renderer with zeroed stats.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared handle to the recorded stats.
    #[must_use]
    pub fn stats(&self) -> Rc<RefCell<HeadlessStats>> {
        Rc::clone(&self.stats)
    }
}

impl FrameRenderer for HeadlessRenderer {
    fn resize(&mut self, width: u32, height: u32) {
        let mut stats = self.stats.borrow_mut();
        stats.resizes += 1;
        stats.size = Some((width, height));
    }

    fn render(&mut self, frame: &FrameContext) {
        let mut stats = self.stats.borrow_mut();
        stats.frames += 1;
        stats.last_frame = Some(*frame);
    }

    fn dispose(&mut self) {
        self.stats.borrow_mut().disposed = true;
    }
}

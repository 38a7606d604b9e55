//! Standalone viewport window backed by winit.
//!
//! ```no_run
//! # use vantage::model::{InMemoryLoader, ModelData};
//! # use vantage::math::Aabb;
//! # use vantage::Viewer;
//! # use glam::Vec3;
//! let loader = InMemoryLoader::new().with_model(
//!     1,
//!     1,
//!     ModelData::Cad { bounds: Aabb::new(Vec3::ZERO, Vec3::splat(10.0)) },
//! );
//! Viewer::builder()
//!     .with_loader(loader)
//!     .with_model(1, 1)
//!     .build()
//!     .run()
//!     .unwrap();
//! ```

use std::sync::Arc;

use web_time::{Duration, Instant};
use winit::{
    application::ApplicationHandler,
    event::{ElementState, MouseScrollDelta, StartCause, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::PhysicalKey,
    window::{Window, WindowId},
};

use crate::{
    error::ViewportError,
    gpu::{GpuRenderer, RenderContext},
    model::{InMemoryLoader, ModelLoader},
    options::ViewportOptions,
    render::ViewportSurface,
    viewport::{create_viewport_controller, ControllerOptions},
    InputEvent, MouseButton, ViewportController,
};

/// Upper bound on the time between ticks while the window is idle.
const TICK_INTERVAL: Duration = Duration::from_millis(16);

// ── Builder ──────────────────────────────────────────────────────────────

/// Fluent builder for [`Viewer`].
pub struct ViewerBuilder {
    loader: Option<Box<dyn ModelLoader>>,
    models: Vec<(u64, u64)>,
    options: Option<ViewportOptions>,
    title: String,
}

impl ViewerBuilder {
    fn new() -> Self {
        Self {
            loader: None,
            models: Vec::new(),
            options: None,
            title: "Vantage".into(),
        }
    }

    /// Loader that resolves model ids. Defaults to an empty
    /// [`InMemoryLoader`].
    #[must_use]
    pub fn with_loader(mut self, loader: impl ModelLoader + 'static) -> Self {
        self.loader = Some(Box::new(loader));
        self
    }

    /// Model to attach once the window is up.
    #[must_use]
    pub fn with_model(mut self, model_id: u64, revision_id: u64) -> Self {
        self.models.push((model_id, revision_id));
        self
    }

    /// Override the default options.
    #[must_use]
    pub fn with_options(mut self, options: ViewportOptions) -> Self {
        self.options = Some(options);
        self
    }

    /// Set the window title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Consume the builder and produce a [`Viewer`].
    #[must_use]
    pub fn build(self) -> Viewer {
        Viewer {
            loader: self
                .loader
                .unwrap_or_else(|| Box::new(InMemoryLoader::new())),
            models: self.models,
            options: self.options.unwrap_or_default(),
            title: self.title,
        }
    }
}

// ── Viewer ───────────────────────────────────────────────────────────────

/// A standalone window showing the attached models.
///
/// Construct via [`Viewer::builder`], then call [`run`](Self::run) to
/// enter the event loop.
pub struct Viewer {
    loader: Box<dyn ModelLoader>,
    models: Vec<(u64, u64)>,
    options: ViewportOptions,
    title: String,
}

impl Viewer {
    /// Start a new builder.
    #[must_use]
    pub fn builder() -> ViewerBuilder {
        ViewerBuilder::new()
    }

    /// Open the window and run the event loop. Blocks until the window is
    /// closed.
    ///
    /// # Errors
    ///
    /// Returns [`ViewportError::Viewer`] if the event loop cannot be created
    /// or exits with an error.
    pub fn run(self) -> Result<(), ViewportError> {
        let event_loop =
            EventLoop::new().map_err(|e| ViewportError::Viewer(e.to_string()))?;
        event_loop.set_control_flow(ControlFlow::Wait);

        let mut app = ViewerApp {
            window: None,
            controller: None,
            loader: Some(self.loader),
            models: self.models,
            options: Some(self.options),
            title: self.title,
        };

        event_loop
            .run_app(&mut app)
            .map_err(|e| ViewportError::Viewer(e.to_string()))
    }
}

// ── Winit app ────────────────────────────────────────────────────────────

struct ViewerApp {
    window: Option<Arc<Window>>,
    controller: Option<ViewportController>,
    loader: Option<Box<dyn ModelLoader>>,
    models: Vec<(u64, u64)>,
    options: Option<ViewportOptions>,
    title: String,
}

impl ViewerApp {
    fn build_controller(
        &mut self,
        window: &Arc<Window>,
    ) -> Result<ViewportController, ViewportError> {
        let inner = window.inner_size();
        let scale = window.scale_factor();
        let context = pollster::block_on(RenderContext::new(
            Arc::clone(window),
            (inner.width.max(1), inner.height.max(1)),
        ))?;

        let logical = inner.to_logical::<f32>(scale);
        let surface = ViewportSurface::new(logical.width, logical.height, scale as f32);
        let options = ControllerOptions::default()
            .with_renderer(GpuRenderer::new(context))
            .with_viewport_options(self.options.take().unwrap_or_default());
        let loader = self
            .loader
            .take()
            .unwrap_or_else(|| Box::new(InMemoryLoader::new()));

        let mut controller = create_viewport_controller(surface, options, loader)?;
        for &(model_id, revision_id) in &self.models {
            if let Err(e) = controller.add_model(model_id, revision_id) {
                log::error!("failed to add model {model_id}/{revision_id}: {e}");
            }
        }
        let scene = controller.scene_bounding_box();
        let _ = controller.fit_camera_to_bounding_box(&scene, None, None);
        Ok(controller)
    }

    fn forward(&mut self, event: &InputEvent) {
        if let Some(controller) = &mut self.controller {
            controller.handle_input(event);
        }
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

impl ApplicationHandler for ViewerApp {
    fn new_events(&mut self, event_loop: &ActiveEventLoop, cause: StartCause) {
        let (Some(window), Some(controller)) = (&self.window, &self.controller) else {
            return;
        };
        if controller.cancellation_token().is_cancelled() {
            event_loop.set_control_flow(ControlFlow::Wait);
            return;
        }
        // Tick at roughly display rate so loader change signals are picked
        // up while the window is idle. Idle ticks are render-skips.
        if matches!(cause, StartCause::ResumeTimeReached { .. }) {
            window.request_redraw();
        }
        event_loop.set_control_flow(ControlFlow::WaitUntil(
            Instant::now() + TICK_INTERVAL,
        ));
    }

    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attrs = Window::default_attributes()
            .with_title(&self.title)
            .with_inner_size(winit::dpi::LogicalSize::new(1280, 800));
        let window = match event_loop.create_window(attrs) {
            Ok(w) => Arc::new(w),
            Err(e) => {
                log::error!("Failed to create window: {e}");
                event_loop.exit();
                return;
            }
        };

        match self.build_controller(&window) {
            Ok(controller) => self.controller = Some(controller),
            Err(e) => {
                log::error!("Failed to initialize viewport: {e}");
                event_loop.exit();
                return;
            }
        }

        window.request_redraw();
        self.window = Some(window);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                if let Some(controller) = &mut self.controller {
                    controller.dispose();
                }
                event_loop.exit();
            }

            WindowEvent::Resized(size) => {
                if let (Some(window), Some(controller)) =
                    (&self.window, &mut self.controller)
                {
                    let logical = size.to_logical::<f32>(window.scale_factor());
                    controller.set_client_size(logical.width, logical.height);
                    window.request_redraw();
                }
            }

            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                if let Some(controller) = &mut self.controller {
                    controller.set_device_pixel_ratio(scale_factor as f32);
                }
            }

            WindowEvent::RedrawRequested => {
                if let (Some(window), Some(controller)) =
                    (&self.window, &mut self.controller)
                {
                    let _ = controller.tick();
                    if controller.is_animating() {
                        window.request_redraw();
                    }
                }
            }

            WindowEvent::MouseInput { button, state, .. } => {
                let button = MouseButton::from(button);
                let event = if state == ElementState::Pressed {
                    InputEvent::PointerDown { button }
                } else {
                    InputEvent::PointerUp { button }
                };
                self.forward(&event);
            }

            WindowEvent::CursorMoved { position, .. } => {
                let scale = self.window.as_ref().map_or(1.0, |w| w.scale_factor());
                let logical = position.to_logical::<f32>(scale);
                self.forward(&InputEvent::PointerMoved {
                    x: logical.x,
                    y: logical.y,
                });
            }

            WindowEvent::MouseWheel { delta, .. } => {
                let delta = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 * 0.01,
                };
                self.forward(&InputEvent::Wheel { delta });
            }

            WindowEvent::ModifiersChanged(modifiers) => {
                self.forward(&InputEvent::ModifiersChanged {
                    shift: modifiers.state().shift_key(),
                });
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if event.state == ElementState::Pressed {
                    if let PhysicalKey::Code(code) = event.physical_key {
                        self.forward(&InputEvent::KeyDown {
                            key: format!("{code:?}"),
                        });
                    }
                }
            }

            _ => (),
        }
    }
}

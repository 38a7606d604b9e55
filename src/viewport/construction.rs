use std::fmt;

use crate::error::{UnsupportedOperation, ViewportError};
use crate::model::ModelLoader;
use crate::options::ViewportOptions;
use crate::render::{FrameRenderer, HeadlessRenderer, HostElement, ViewportSurface};

use super::ViewportController;

/// Screen corner a view cube would be anchored to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewCubeCorner {
    /// Top-left corner.
    TopLeft,
    /// Top-right corner.
    TopRight,
    /// Bottom-left corner.
    BottomLeft,
    /// Bottom-right corner.
    BottomRight,
}

/// Construction options for [`create_viewport_controller`].
///
/// Caching, metrics logging and the view cube belong to other layers;
/// requesting any of them rejects construction.
#[derive(Default)]
pub struct ControllerOptions {
    /// Client-side model caching. Must stay `false`.
    pub caching_enabled: bool,
    /// Metrics logging. Must stay `false`.
    pub metrics_logging_enabled: bool,
    /// View cube overlay. Must stay `None`.
    pub view_cube_corner: Option<ViewCubeCorner>,
    /// Renderer to draw with. Defaults to a [`HeadlessRenderer`].
    pub renderer: Option<Box<dyn FrameRenderer>>,
    /// Host element whose client size overrides the surface's.
    pub host: Option<Box<dyn HostElement>>,
    /// Runtime options.
    pub viewport: ViewportOptions,
}

impl fmt::Debug for ControllerOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ControllerOptions")
            .field("caching_enabled", &self.caching_enabled)
            .field("metrics_logging_enabled", &self.metrics_logging_enabled)
            .field("view_cube_corner", &self.view_cube_corner)
            .field("renderer", &self.renderer.is_some())
            .field("host", &self.host.is_some())
            .field("viewport", &self.viewport)
            .finish()
    }
}

impl ControllerOptions {
    /// Use `renderer` instead of the headless default.
    #[must_use]
    pub fn with_renderer(mut self, renderer: impl FrameRenderer + 'static) -> Self {
        self.renderer = Some(Box::new(renderer));
        self
    }

    /// Read the client size from `host` when it reports one.
    #[must_use]
    pub fn with_host(mut self, host: impl HostElement + 'static) -> Self {
        self.host = Some(Box::new(host));
        self
    }

    /// Replace the runtime options.
    #[must_use]
    pub fn with_viewport_options(mut self, viewport: ViewportOptions) -> Self {
        self.viewport = viewport;
        self
    }

    /// Reject options this layer cannot honor.
    ///
    /// # Errors
    ///
    /// [`ViewportError::ConstructionRejected`] naming the first unsupported
    /// option.
    pub fn validate(&self) -> Result<(), ViewportError> {
        let rejected = if self.caching_enabled {
            Some("model caching")
        } else if self.metrics_logging_enabled {
            Some("metrics logging")
        } else if self.view_cube_corner.is_some() {
            Some("view cube")
        } else {
            None
        };
        match rejected {
            Some(capability) => {
                log::warn!("rejecting viewport construction: {capability} requested");
                Err(ViewportError::ConstructionRejected(
                    UnsupportedOperation::new(capability),
                ))
            }
            None => Ok(()),
        }
    }
}

/// Validate `options` and build a controller for `surface`.
///
/// Validation runs before the renderer is touched, so a rejected
/// construction leaves nothing to release.
///
/// # Errors
///
/// [`ViewportError::ConstructionRejected`] if an unsupported option is
/// enabled.
pub fn create_viewport_controller(
    surface: ViewportSurface,
    options: ControllerOptions,
    loader: impl ModelLoader + 'static,
) -> Result<ViewportController, ViewportError> {
    options.validate()?;
    let ControllerOptions {
        renderer,
        host,
        viewport,
        ..
    } = options;
    let renderer = renderer.unwrap_or_else(|| Box::new(HeadlessRenderer::new()));
    Ok(ViewportController::new(
        surface,
        viewport,
        renderer,
        host,
        Box::new(loader),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::InMemoryLoader;

    fn surface() -> ViewportSurface {
        ViewportSurface::new(640.0, 480.0, 1.0)
    }

    #[test]
    fn caching_is_rejected_before_renderer_is_touched() {
        let renderer = HeadlessRenderer::new();
        let stats = renderer.stats();
        let options = ControllerOptions {
            caching_enabled: true,
            ..ControllerOptions::default()
        }
        .with_renderer(renderer);

        let err = create_viewport_controller(surface(), options, InMemoryLoader::new())
            .err()
            .unwrap();
        assert!(err.is_unsupported());
        assert!(matches!(err, ViewportError::ConstructionRejected(_)));
        let stats = stats.borrow();
        assert_eq!(stats.resizes, 0);
        assert_eq!(stats.frames, 0);
    }

    #[test]
    fn metrics_and_view_cube_are_rejected() {
        let metrics = ControllerOptions {
            metrics_logging_enabled: true,
            ..ControllerOptions::default()
        };
        assert!(metrics.validate().unwrap_err().is_unsupported());

        let cube = ControllerOptions {
            view_cube_corner: Some(ViewCubeCorner::BottomRight),
            ..ControllerOptions::default()
        };
        assert!(cube.validate().unwrap_err().to_string().contains("view cube"));
    }

    #[test]
    fn default_options_construct() {
        let controller = create_viewport_controller(
            surface(),
            ControllerOptions::default(),
            InMemoryLoader::new(),
        )
        .unwrap();
        assert!(!controller.is_disposed());
    }
}

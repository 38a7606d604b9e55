//! Render-resolution budgeting.
//!
//! The render target follows the logical client size scaled by the device
//! pixel ratio, shrunk uniformly when that would exceed the texture budget.

use crate::options::ResizeOptions;

/// Host element the viewport is embedded in.
///
/// When it reports a non-zero size, that size wins over the surface's own
/// client size.
pub trait HostElement {
    /// Logical (CSS-style) client size.
    fn client_size(&self) -> (f32, f32);
}

/// Logical and physical size of the rendering surface.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewportSurface {
    client_width: f32,
    client_height: f32,
    device_pixel_ratio: f32,
    pixel_width: f32,
    pixel_height: f32,
}

impl ViewportSurface {
    /// Surface with the given logical size. The physical size starts at zero
    /// so the first resize check always applies.
    #[must_use]
    pub fn new(client_width: f32, client_height: f32, device_pixel_ratio: f32) -> Self {
        Self {
            client_width: sanitize(client_width),
            client_height: sanitize(client_height),
            device_pixel_ratio: if device_pixel_ratio.is_finite() && device_pixel_ratio > 0.0 {
                device_pixel_ratio
            } else {
                1.0
            },
            pixel_width: 0.0,
            pixel_height: 0.0,
        }
    }

    /// Logical size.
    #[must_use]
    pub fn client_size(&self) -> (f32, f32) {
        (self.client_width, self.client_height)
    }

    /// Physical render target size.
    #[must_use]
    pub fn pixel_size(&self) -> (f32, f32) {
        (self.pixel_width, self.pixel_height)
    }

    /// Physical size rounded for the renderer, never below one pixel.
    #[must_use]
    pub fn pixel_size_u32(&self) -> (u32, u32) {
        (
            self.pixel_width.round().max(1.0) as u32,
            self.pixel_height.round().max(1.0) as u32,
        )
    }

    /// Device pixel ratio.
    #[must_use]
    pub fn device_pixel_ratio(&self) -> f32 {
        self.device_pixel_ratio
    }

    /// Update the logical size (e.g. after a window resize).
    pub fn set_client_size(&mut self, width: f32, height: f32) {
        self.client_width = sanitize(width);
        self.client_height = sanitize(height);
    }

    /// Update the device pixel ratio. Non-positive values are ignored.
    pub fn set_device_pixel_ratio(&mut self, ratio: f32) {
        if ratio.is_finite() && ratio > 0.0 {
            self.device_pixel_ratio = ratio;
        }
    }

    /// Compare the physical size against the budgeted ideal and adopt the
    /// ideal when either axis is off by at least the epsilon. Returns the new
    /// physical size when a resize was applied.
    pub fn resize_if_needed(
        &mut self,
        host: Option<&dyn HostElement>,
        options: &ResizeOptions,
    ) -> Option<(f32, f32)> {
        let (client_width, client_height) = host
            .map(HostElement::client_size)
            .filter(|&(w, h)| w > 0.0 && h > 0.0)
            .unwrap_or((self.client_width, self.client_height));
        if client_width <= 0.0 || client_height <= 0.0 {
            return None;
        }

        let (width, height) = budgeted_pixel_size(
            client_width * self.device_pixel_ratio,
            client_height * self.device_pixel_ratio,
            options.max_texture_budget,
        );
        let epsilon = options.epsilon_px;
        if (self.pixel_width - width).abs() < epsilon
            && (self.pixel_height - height).abs() < epsilon
        {
            return None;
        }

        log::debug!(
            "resize render target {:.1}x{:.1} -> {width:.1}x{height:.1}",
            self.pixel_width,
            self.pixel_height
        );
        self.pixel_width = width;
        self.pixel_height = height;
        Some((width, height))
    }
}

/// Uniform scale that keeps `width * height` within `budget`.
#[must_use]
pub fn budget_scale(width: f32, height: f32, budget: f32) -> f32 {
    let area = width * height;
    if area > budget && budget > 0.0 {
        (budget / area).sqrt()
    } else {
        1.0
    }
}

/// Physical size after applying [`budget_scale`].
#[must_use]
pub fn budgeted_pixel_size(width: f32, height: f32, budget: f32) -> (f32, f32) {
    let scale = budget_scale(width, height, budget);
    (width * scale, height * scale)
}

fn sanitize(value: f32) -> f32 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedHost(f32, f32);

    impl HostElement for FixedHost {
        fn client_size(&self) -> (f32, f32) {
            (self.0, self.1)
        }
    }

    #[test]
    fn small_surface_is_not_scaled() {
        let mut surface = ViewportSurface::new(640.0, 480.0, 1.0);
        let applied = surface.resize_if_needed(None, &ResizeOptions::default());
        assert_eq!(applied, Some((640.0, 480.0)));
    }

    #[test]
    fn large_surface_fits_budget() {
        let options = ResizeOptions::default();
        let mut surface = ViewportSurface::new(1920.0, 1080.0, 2.0);
        let (w, h) = surface.resize_if_needed(None, &options).unwrap();
        assert!(w * h <= options.max_texture_budget * 1.0001);
        // Aspect ratio is preserved
        assert!((w / h - 1920.0 / 1080.0).abs() < 1e-4);
    }

    #[test]
    fn unchanged_client_size_is_stable() {
        let options = ResizeOptions::default();
        let mut surface = ViewportSurface::new(1920.0, 1080.0, 1.5);
        assert!(surface.resize_if_needed(None, &options).is_some());
        let size = surface.pixel_size();
        assert_eq!(surface.resize_if_needed(None, &options), None);
        assert_eq!(surface.pixel_size(), size);
    }

    #[test]
    fn sub_epsilon_jitter_is_ignored() {
        let options = ResizeOptions::default();
        let mut surface = ViewportSurface::new(640.0, 480.0, 1.0);
        let _ = surface.resize_if_needed(None, &options);
        surface.set_client_size(640.05, 480.0);
        assert_eq!(surface.resize_if_needed(None, &options), None);
        surface.set_client_size(641.0, 480.0);
        assert_eq!(surface.resize_if_needed(None, &options), Some((641.0, 480.0)));
    }

    #[test]
    fn host_size_wins_when_non_zero() {
        let options = ResizeOptions::default();
        let mut surface = ViewportSurface::new(640.0, 480.0, 1.0);
        let host = FixedHost(800.0, 600.0);
        assert_eq!(
            surface.resize_if_needed(Some(&host), &options),
            Some((800.0, 600.0))
        );

        let hidden = FixedHost(0.0, 0.0);
        assert_eq!(
            surface.resize_if_needed(Some(&hidden), &options),
            Some((640.0, 480.0))
        );
    }

    #[test]
    fn zero_client_size_skips_resize() {
        let mut surface = ViewportSurface::new(0.0, 0.0, 1.0);
        assert_eq!(surface.resize_if_needed(None, &ResizeOptions::default()), None);
        assert_eq!(surface.pixel_size_u32(), (1, 1));
    }

    #[test]
    fn budget_scale_formula() {
        assert_eq!(budget_scale(100.0, 100.0, 1.4e6), 1.0);
        let s = budget_scale(2000.0, 2000.0, 1.0e6);
        assert!((s - 0.5).abs() < 1e-6);
    }
}

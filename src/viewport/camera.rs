use glam::{Vec2, Vec3};
use web_time::{Duration, Instant};

use super::ViewportController;
use crate::camera::{AnimationJob, CameraPose, CameraState};
use crate::error::ViewportError;
use crate::input::InputEvent;
use crate::math::{relative_viewport_coordinates, Aabb};
use crate::model::ModelHandle;
use crate::render::HostElement;

impl ViewportController {
    /// Read-only camera access.
    #[must_use]
    pub fn camera(&self) -> &CameraState {
        &self.camera
    }

    /// Eye position, or `(-∞, -∞, -∞)` once disposed.
    #[must_use]
    pub fn camera_position(&self) -> Vec3 {
        if self.is_disposed() {
            Vec3::NEG_INFINITY
        } else {
            self.camera.position
        }
    }

    /// Look-at target, or `(-∞, -∞, -∞)` once disposed.
    #[must_use]
    pub fn camera_target(&self) -> Vec3 {
        if self.is_disposed() {
            Vec3::NEG_INFINITY
        } else {
            self.camera.target
        }
    }

    /// Move the eye. Supersedes any active flight.
    pub fn set_camera_position(&mut self, position: Vec3) {
        if self.is_disposed() || !position.is_finite() {
            return;
        }
        self.cancel_flight();
        self.camera.position = position;
        self.mark_camera_moved();
    }

    /// Move the look-at target. Supersedes any active flight.
    pub fn set_camera_target(&mut self, target: Vec3) {
        if self.is_disposed() || !target.is_finite() {
            return;
        }
        self.cancel_flight();
        self.camera.target = target;
        self.mark_camera_moved();
    }

    /// Whether a camera flight is in progress.
    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.animator.is_active()
    }

    /// Fly the camera to `position` looking at `target`. Without a
    /// `duration` one is derived from the travel distance. Returns the
    /// flight duration.
    pub fn animate_to(
        &mut self,
        position: Vec3,
        target: Vec3,
        duration: Option<Duration>,
    ) -> Duration {
        self.animate_to_at(position, target, duration, Instant::now())
    }

    /// [`animate_to`](Self::animate_to) with an explicit start time.
    pub fn animate_to_at(
        &mut self,
        position: Vec3,
        target: Vec3,
        duration: Option<Duration>,
        now: Instant,
    ) -> Duration {
        if self.is_disposed() || !position.is_finite() || !target.is_finite() {
            return Duration::ZERO;
        }
        let animation = &self.options.animation;
        let duration = duration.unwrap_or_else(|| {
            animation.duration_for_distance(self.camera.position.distance(position))
        });

        // Start from a target on the current view ray so the first frame
        // does not swing the view.
        let from = CameraPose {
            position: self.camera.position,
            target: self.camera.position
                + self.camera.forward() * target.distance(self.camera.position),
        };
        let job = AnimationJob {
            from,
            to: CameraPose { position, target },
            start: now,
            duration,
            easing: animation.easing,
        };
        if self.animator.start(job) {
            log::debug!("camera flight superseded");
        }
        self.scheduler.request_redraw();
        duration
    }

    /// Frame `bounds` from the current view direction at
    /// `radius * radius_factor` from its bounding-sphere center. Returns the
    /// flight duration, or zero if there is nothing to frame.
    pub fn fit_camera_to_bounding_box(
        &mut self,
        bounds: &Aabb,
        duration: Option<Duration>,
        radius_factor: Option<f32>,
    ) -> Duration {
        self.fit_camera_to_bounding_box_at(bounds, duration, radius_factor, Instant::now())
    }

    /// [`fit_camera_to_bounding_box`](Self::fit_camera_to_bounding_box) with
    /// an explicit start time.
    pub fn fit_camera_to_bounding_box_at(
        &mut self,
        bounds: &Aabb,
        duration: Option<Duration>,
        radius_factor: Option<f32>,
        now: Instant,
    ) -> Duration {
        if self.is_disposed() {
            return Duration::ZERO;
        }
        if bounds.is_empty() {
            log::warn!("cannot fit camera to an empty bounding box");
            return Duration::ZERO;
        }
        let sphere = bounds.bounding_sphere();
        let factor = radius_factor.unwrap_or(self.options.animation.radius_factor);
        let distance = (sphere.radius * factor).max(self.controls.min_distance());
        let position = sphere.center - self.camera.forward() * distance;
        self.animate_to_at(position, sphere.center, duration, now)
    }

    /// Frame one model. Returns the flight duration.
    ///
    /// # Errors
    ///
    /// [`ViewportError::InvalidHandle`] if the handle is not live.
    pub fn fit_camera_to_model(
        &mut self,
        handle: ModelHandle,
        duration: Option<Duration>,
    ) -> Result<Duration, ViewportError> {
        self.fit_camera_to_model_at(handle, duration, Instant::now())
    }

    /// [`fit_camera_to_model`](Self::fit_camera_to_model) with an explicit
    /// start time.
    ///
    /// # Errors
    ///
    /// [`ViewportError::InvalidHandle`] if the handle is not live.
    pub fn fit_camera_to_model_at(
        &mut self,
        handle: ModelHandle,
        duration: Option<Duration>,
        now: Instant,
    ) -> Result<Duration, ViewportError> {
        if self.is_disposed() {
            return Ok(Duration::ZERO);
        }
        let bounds = self.registry.bounding_box(handle).map_err(Self::report)?;
        Ok(self.fit_camera_to_bounding_box_at(&bounds, duration, None, now))
    }

    /// Project a world point to the screen.
    ///
    /// With `normalize` the result is in `[0, 1]` relative viewport
    /// coordinates, otherwise in rounded client pixels. `None` when the
    /// point is outside the view frustum or the controller is disposed.
    #[must_use]
    pub fn world_to_screen(&self, point: Vec3, normalize: bool) -> Option<Vec2> {
        if self.is_disposed() {
            return None;
        }
        let relative = relative_viewport_coordinates(&self.camera.view_projection(), point)?;
        if !relative.is_inside_frustum() {
            return None;
        }
        let xy = relative.0.truncate();
        if normalize {
            return Some(xy);
        }
        let (width, height) = self.client_size();
        Some(Vec2::new((xy.x * width).round(), (xy.y * height).round()))
    }

    /// Feed one input event. Interrupting events stop an active flight
    /// where it is; other events only move the camera while no flight owns
    /// it.
    pub fn handle_input(&mut self, event: &InputEvent) {
        if self.is_disposed() {
            return;
        }
        if event.interrupts_animation(self.input.keyboard_navigation()) {
            self.cancel_flight();
        }
        let Some(command) = self.input.handle_event(event) else {
            return;
        };
        if self.animator.is_active() {
            return;
        }
        if self.controls.apply(command, &mut self.camera) {
            self.mark_camera_moved();
        }
    }

    /// Let bound keys move the camera. Key presses then no longer cancel
    /// flights.
    pub fn enable_keyboard_navigation(&mut self) {
        if !self.is_disposed() {
            self.input.set_keyboard_navigation(true);
        }
    }

    /// Stop bound keys from moving the camera.
    pub fn disable_keyboard_navigation(&mut self) {
        if !self.is_disposed() {
            self.input.set_keyboard_navigation(false);
        }
    }

    /// Whether keyboard navigation is enabled.
    #[must_use]
    pub fn is_keyboard_navigation_enabled(&self) -> bool {
        self.input.keyboard_navigation()
    }

    fn cancel_flight(&mut self) {
        if let Some(job) = self.animator.cancel() {
            log::debug!("camera flight to {:?} interrupted", job.to);
        }
    }

    fn mark_camera_moved(&mut self) {
        self.camera_dirty = true;
        self.scheduler.request_redraw();
    }

    /// Logical client size: the host's when it reports one, else the
    /// surface's.
    pub(super) fn client_size(&self) -> (f32, f32) {
        self.host
            .as_deref()
            .map(HostElement::client_size)
            .filter(|&(w, h)| w > 0.0 && h > 0.0)
            .unwrap_or_else(|| self.surface.client_size())
    }
}

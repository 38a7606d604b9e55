//! The top-level viewport controller.
//!
//! [`ViewportController`] composes the camera, the flight animator, the
//! model registry and the frame scheduler. Hosts drive it by calling
//! [`tick`](ViewportController::tick) once per vsync-aligned callback and
//! forwarding input through
//! [`handle_input`](ViewportController::handle_input).

mod camera;
mod construction;
mod events;
mod models;

pub use construction::{create_viewport_controller, ControllerOptions, ViewCubeCorner};
pub use events::{CameraChangeListeners, CameraListener, ListenerAction, ListenerId};
pub use models::AddModelOptions;
use web_time::Instant;

use crate::camera::{CameraAnimator, CameraState, OrbitControls};
use crate::error::ViewportError;
use crate::input::InputProcessor;
use crate::model::{ModelLoader, ModelRegistry};
use crate::options::ViewportOptions;
use crate::render::{
    compute_clip_planes, CancellationToken, FrameContext, FrameRenderer, HostElement,
    RenderScheduler, SchedulerState, TickOutcome, ViewportSurface,
};
use crate::util::frame_timing::FrameTiming;

/// Owns the camera, the frame loop and every attached model.
///
/// Single-threaded: every method runs on the thread that drives
/// [`tick`](Self::tick). Model loaders may notify changes from other threads
/// through their [`ChangeSignal`](crate::model::ChangeSignal).
///
/// After [`dispose`](Self::dispose) every method is side-effect free and
/// returns a sentinel (camera at `-∞`, empty boxes, no screen points,
/// [`ModelHandle::INVALID`](crate::model::ModelHandle::INVALID)).
pub struct ViewportController {
    camera: CameraState,
    animator: CameraAnimator,
    controls: OrbitControls,
    input: InputProcessor,
    registry: ModelRegistry,
    scheduler: RenderScheduler,
    surface: ViewportSurface,
    host: Option<Box<dyn HostElement>>,
    renderer: Box<dyn FrameRenderer>,
    loader: Box<dyn ModelLoader>,
    listeners: CameraChangeListeners,
    options: ViewportOptions,
    /// Camera moved outside the animator since the last tick.
    camera_dirty: bool,
}

impl ViewportController {
    pub(crate) fn new(
        surface: ViewportSurface,
        options: ViewportOptions,
        renderer: Box<dyn FrameRenderer>,
        host: Option<Box<dyn HostElement>>,
        loader: Box<dyn ModelLoader>,
    ) -> Self {
        let (client_width, client_height) = host
            .as_deref()
            .map(HostElement::client_size)
            .filter(|&(w, h)| w > 0.0 && h > 0.0)
            .unwrap_or_else(|| surface.client_size());
        let camera = CameraState::from_options(&options.camera, client_width, client_height);
        let mut input = InputProcessor::with_key_bindings(options.keybindings.clone());
        input.set_keyboard_navigation(options.controls.keyboard_navigation);

        log::info!(
            "viewport created ({client_width}x{client_height} @ {}x)",
            surface.device_pixel_ratio()
        );
        Self {
            camera,
            animator: CameraAnimator::new(),
            controls: OrbitControls::from_options(&options.controls),
            input,
            registry: ModelRegistry::new(),
            scheduler: RenderScheduler::new(),
            surface,
            host,
            renderer,
            loader,
            listeners: CameraChangeListeners::new(),
            options,
            camera_dirty: false,
        }
    }

    /// Whether [`dispose`](Self::dispose) has run.
    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.scheduler.is_disposed()
    }

    /// Frame-loop state.
    #[must_use]
    pub fn scheduler_state(&self) -> SchedulerState {
        self.scheduler.state()
    }

    /// Whether the next tick will render a frame.
    #[must_use]
    pub fn needs_redraw(&self) -> bool {
        self.scheduler.needs_redraw()
    }

    /// Ask for a frame on the next tick.
    pub fn request_redraw(&mut self) {
        self.scheduler.request_redraw();
    }

    /// Token a platform frame driver can poll to stop requesting ticks.
    #[must_use]
    pub fn cancellation_token(&self) -> CancellationToken {
        self.scheduler.token()
    }

    /// Rendered/skipped frame statistics.
    #[must_use]
    pub fn frame_timing(&self) -> &FrameTiming {
        self.scheduler.frame_timing()
    }

    /// Runtime options the controller was built with.
    #[must_use]
    pub fn options(&self) -> &ViewportOptions {
        &self.options
    }

    /// Surface size state.
    #[must_use]
    pub fn surface(&self) -> &ViewportSurface {
        &self.surface
    }

    /// Update the logical client size. Takes effect on the next tick.
    pub fn set_client_size(&mut self, width: f32, height: f32) {
        if !self.is_disposed() {
            self.surface.set_client_size(width, height);
        }
    }

    /// Update the device pixel ratio. Takes effect on the next tick.
    pub fn set_device_pixel_ratio(&mut self, ratio: f32) {
        if !self.is_disposed() {
            self.surface.set_device_pixel_ratio(ratio);
        }
    }

    /// Register a listener called once per tick in which the camera moved.
    ///
    /// Once disposed the listener is dropped and [`ListenerId::DETACHED`] is
    /// returned.
    pub fn on_camera_changed(
        &mut self,
        listener: impl FnMut(glam::Vec3, glam::Vec3) -> ListenerAction + 'static,
    ) -> ListenerId {
        if self.is_disposed() {
            return ListenerId::DETACHED;
        }
        self.listeners.add(Box::new(listener))
    }

    /// Remove a camera listener. Returns `false` if it was not registered.
    pub fn off_camera_changed(&mut self, id: ListenerId) -> bool {
        !self.is_disposed() && self.listeners.remove(id)
    }

    /// Run one frame-loop tick at the current time.
    pub fn tick(&mut self) -> TickOutcome {
        self.tick_at(Instant::now())
    }

    /// Run one frame-loop tick at `now`.
    ///
    /// Advances the camera flight, consumes model change signals, adapts
    /// the render resolution, and renders only if one of those asked for a
    /// redraw.
    pub fn tick_at(&mut self, now: Instant) -> TickOutcome {
        if !self.scheduler.begin_tick() {
            return TickOutcome::Disposed;
        }

        let mut camera_moved = std::mem::take(&mut self.camera_dirty);
        if let Some(pose) = self.animator.update(now) {
            if pose != self.camera.pose() {
                self.camera.set_pose(pose);
                camera_moved = true;
            }
        }
        if camera_moved {
            self.scheduler.request_redraw();
        }

        if self.registry.take_changed() {
            self.scheduler.request_redraw();
        }

        if let Some((width, height)) = self
            .surface
            .resize_if_needed(self.host.as_deref(), &self.options.resize)
        {
            self.camera.set_viewport_size(width, height);
            let (pixel_width, pixel_height) = self.surface.pixel_size_u32();
            self.renderer.resize(pixel_width, pixel_height);
            self.scheduler.request_redraw();
        }

        let render = self.scheduler.needs_redraw();
        if render {
            self.update_clip_planes();
            let frame = self.frame_context();
            self.renderer.render(&frame);
        }
        let outcome = self.scheduler.finish_tick(now, render);

        if camera_moved {
            self.listeners.notify(self.camera.position, self.camera.target);
        }
        outcome
    }

    fn update_clip_planes(&mut self) {
        let scene = self.registry.scene_bounding_box();
        let cap = self.controls.default_min_distance();
        if let Some(planes) = compute_clip_planes(&scene, &self.camera, cap) {
            if self.camera.set_clip_planes(planes.near, planes.far) {
                self.controls.set_min_distance(planes.min_distance);
            }
        }
    }

    fn frame_context(&self) -> FrameContext {
        FrameContext {
            view: self.camera.view_matrix(),
            projection: self.camera.projection_matrix(),
            camera_position: self.camera.position,
            near: self.camera.near(),
            far: self.camera.far(),
            size: self.surface.pixel_size_u32(),
            frame_index: self.scheduler.frame_timing().rendered_frames(),
        }
    }

    /// Tear down: stop the frame loop, cancel any flight, dispose every
    /// model, then release the renderer. Idempotent.
    pub fn dispose(&mut self) {
        if !self.scheduler.dispose() {
            return;
        }
        let _ = self.animator.cancel();
        let released = self.registry.dispose_all();
        self.renderer.dispose();
        self.listeners.clear();
        self.camera_dirty = false;
        log::info!("viewport disposed ({released} models released)");
    }

    /// Log invalid-handle errors loudly before handing them back.
    fn report(err: ViewportError) -> ViewportError {
        match &err {
            ViewportError::InvalidHandle(handle) => {
                log::error!("operation on unknown model handle {handle}");
            }
            ViewportError::Unsupported(op) => log::warn!("{op}"),
            _ => {}
        }
        err
    }
}

impl Drop for ViewportController {
    fn drop(&mut self) {
        self.dispose();
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec3;
    use web_time::Duration;

    use super::*;
    use crate::input::{InputEvent, MouseButton};
    use crate::math::Aabb;
    use crate::model::{ChangeSignal, InMemoryLoader, ModelData, ModelHandle, ModelPayload};
    use crate::model::ModelKind;
    use crate::render::{HeadlessRenderer, HeadlessStats};

    /// Loader shared with the test so signals can be raised after the
    /// controller took ownership.
    #[derive(Clone, Default)]
    pub(super) struct SharedLoader(pub(super) Rc<RefCell<InMemoryLoader>>);

    impl ModelLoader for SharedLoader {
        fn determine_model_type(
            &self,
            model_id: u64,
            revision_id: u64,
        ) -> Result<ModelKind, crate::model::LoaderError> {
            self.0.borrow().determine_model_type(model_id, revision_id)
        }

        fn load(
            &mut self,
            model_id: u64,
            revision_id: u64,
            signal: ChangeSignal,
        ) -> Result<ModelPayload, crate::model::LoaderError> {
            self.0.borrow_mut().load(model_id, revision_id, signal)
        }
    }

    pub(super) fn cube(min: f32, max: f32) -> ModelData {
        ModelData::Cad {
            bounds: Aabb::new(Vec3::splat(min), Vec3::splat(max)),
        }
    }

    pub(super) fn controller_with(
        loader: SharedLoader,
    ) -> (ViewportController, Rc<RefCell<HeadlessStats>>) {
        let renderer = HeadlessRenderer::new();
        let stats = renderer.stats();
        let controller = create_viewport_controller(
            ViewportSurface::new(640.0, 480.0, 1.0),
            ControllerOptions::default().with_renderer(renderer),
            loader,
        )
        .unwrap();
        (controller, stats)
    }

    pub(super) fn scenario() -> (ViewportController, SharedLoader, Rc<RefCell<HeadlessStats>>) {
        let loader = SharedLoader::default();
        loader.0.borrow_mut().insert(1, 1, cube(0.0, 10.0));
        loader.0.borrow_mut().insert(2, 1, cube(20.0, 30.0));
        loader.0.borrow_mut().insert(
            3,
            1,
            ModelData::PointCloud {
                bounds: Aabb::new(Vec3::ZERO, Vec3::ONE),
                point_budget: 3_000_000,
            },
        );
        let (controller, stats) = controller_with(loader.clone());
        (controller, loader, stats)
    }

    fn run_until(controller: &mut ViewportController, start: Instant, until: Duration) {
        let mut elapsed = Duration::ZERO;
        while elapsed <= until {
            let _ = controller.tick_at(start + elapsed);
            elapsed += Duration::from_millis(16);
        }
    }

    #[test]
    fn example_scenario_fits_cad_model() {
        let (mut controller, _, _) = scenario();
        let handle = controller.add_model(1, 1).unwrap();
        assert_eq!(handle.kind(), ModelKind::Cad);

        let start = Instant::now();
        let _ = controller.tick_at(start);
        let duration = controller
            .fit_camera_to_model_at(handle, None, start)
            .unwrap();
        assert!(duration >= Duration::from_millis(600));
        assert!(duration <= Duration::from_millis(2500));

        run_until(&mut controller, start, duration + Duration::from_millis(50));
        assert!(!controller.is_animating());
        assert!(controller
            .camera_target()
            .abs_diff_eq(Vec3::splat(5.0), 1e-3));
    }

    #[test]
    fn completed_flight_lands_on_destination() {
        let (mut controller, _, _) = scenario();
        let start = Instant::now();
        for ms in [600, 1200, 2500] {
            let position = Vec3::new(-3.0, 7.0, 12.0) * (ms as f32 / 600.0);
            let target = Vec3::new(1.0, 2.0, 3.0);
            let _ = controller.animate_to_at(
                position,
                target,
                Some(Duration::from_millis(ms)),
                start,
            );
            run_until(&mut controller, start, Duration::from_millis(ms + 20));
            assert!(controller.camera_position().abs_diff_eq(position, 1e-4));
            assert!(controller.camera_target().abs_diff_eq(target, 1e-4));
        }
    }

    #[test]
    fn pointer_down_freezes_flight_mid_way() {
        let (mut controller, _, _) = scenario();
        let start = Instant::now();
        let from = controller.camera_position();
        let to = Vec3::new(100.0, 50.0, -40.0);
        let _ = controller.animate_to_at(to, Vec3::ZERO, Some(Duration::from_millis(1000)), start);

        let _ = controller.tick_at(start + Duration::from_millis(400));
        let frozen = controller.camera_position();
        controller.handle_input(&InputEvent::PointerDown {
            button: MouseButton::Left,
        });
        assert!(!controller.is_animating());

        run_until(&mut controller, start, Duration::from_millis(1500));
        assert_eq!(controller.camera_position(), frozen);
        assert_ne!(frozen, from);
        assert_ne!(frozen, to);
    }

    #[test]
    fn keydown_cancels_unless_keyboard_navigation_enabled() {
        let (mut controller, _, _) = scenario();
        let start = Instant::now();
        let key = InputEvent::KeyDown {
            key: "KeyW".to_owned(),
        };

        let _ = controller.animate_to_at(Vec3::splat(40.0), Vec3::ZERO, None, start);
        controller.enable_keyboard_navigation();
        controller.handle_input(&key);
        assert!(controller.is_animating());

        controller.disable_keyboard_navigation();
        controller.handle_input(&key);
        assert!(!controller.is_animating());
    }

    #[test]
    fn wheel_cancels_and_zooms() {
        let (mut controller, _, _) = scenario();
        let start = Instant::now();
        let _ = controller.tick_at(start);
        let _ = controller.animate_to_at(Vec3::splat(40.0), Vec3::ZERO, None, start);
        let before = controller.camera_position();
        controller.handle_input(&InputEvent::Wheel { delta: 1.0 });
        assert!(!controller.is_animating());
        assert_ne!(controller.camera_position(), before);
    }

    #[test]
    fn dispose_twice_matches_dispose_once() {
        let (mut controller, loader, stats) = scenario();
        let _ = controller.add_model(1, 1).unwrap();
        let _ = controller.add_model(3, 1).unwrap();
        let counter = loader.0.borrow().release_counter();
        let token = controller.cancellation_token();

        controller.dispose();
        let once = (
            controller.camera_position(),
            controller.camera_target(),
            controller.scene_bounding_box(),
            controller.scheduler_state(),
            stats.borrow().clone(),
        );
        controller.dispose();
        let twice = (
            controller.camera_position(),
            controller.camera_target(),
            controller.scene_bounding_box(),
            controller.scheduler_state(),
            stats.borrow().clone(),
        );
        assert_eq!(once, twice);
        assert!(token.is_cancelled());
        assert_eq!(counter.load(std::sync::atomic::Ordering::Acquire), 2);
        assert_eq!(once.0, Vec3::NEG_INFINITY);
        assert!(stats.borrow().disposed);
    }

    #[test]
    fn dropping_controller_releases_models_and_renderer() {
        let (mut controller, loader, stats) = scenario();
        let _ = controller.add_model(1, 1).unwrap();
        let _ = controller.add_model(3, 1).unwrap();
        let counter = loader.0.borrow().release_counter();
        let token = controller.cancellation_token();

        drop(controller);
        assert_eq!(counter.load(std::sync::atomic::Ordering::Acquire), 2);
        assert!(stats.borrow().disposed);
        assert!(token.is_cancelled());
    }

    #[test]
    fn drop_after_dispose_releases_once() {
        let (mut controller, loader, _) = scenario();
        let _ = controller.add_model(1, 1).unwrap();
        let counter = loader.0.borrow().release_counter();
        controller.dispose();
        drop(controller);
        assert_eq!(counter.load(std::sync::atomic::Ordering::Acquire), 1);
    }

    #[test]
    fn disposed_controller_returns_sentinels() {
        let (mut controller, loader, stats) = scenario();
        let handle = controller.add_model(1, 1).unwrap();
        controller.dispose();
        let frames = stats.borrow().frames;

        assert_eq!(controller.tick(), TickOutcome::Disposed);
        assert_eq!(stats.borrow().frames, frames);
        assert_eq!(controller.add_model(2, 1).unwrap(), ModelHandle::INVALID);
        assert_eq!(loader.0.borrow().load_count(), 1);
        assert!(controller.bounding_box(handle).unwrap().is_empty());
        assert_eq!(controller.world_to_screen(Vec3::ZERO, true), None);
        controller.set_camera_position(Vec3::ONE);
        assert_eq!(controller.camera_position(), Vec3::NEG_INFINITY);
        assert!(controller.dispose_model(handle).is_ok());

        let id = controller.on_camera_changed(|_, _| ListenerAction::Keep);
        assert_eq!(id, ListenerId::DETACHED);
        assert!(controller.listeners.is_empty());
        assert!(!controller.off_camera_changed(id));

        let navigation = controller.is_keyboard_navigation_enabled();
        controller.enable_keyboard_navigation();
        assert_eq!(controller.is_keyboard_navigation_enabled(), navigation);
        controller.disable_keyboard_navigation();
        assert_eq!(controller.is_keyboard_navigation_enabled(), navigation);

        assert!(controller.clear_cache().is_ok());
        assert_eq!(
            controller.determine_model_type(3, 1).unwrap(),
            ModelHandle::INVALID.kind()
        );
        assert_eq!(controller.determine_model_type(404, 1).unwrap(), ModelKind::Cad);
    }

    #[test]
    fn idle_ticks_skip_rendering() {
        let (mut controller, _, stats) = scenario();
        let start = Instant::now();
        assert_eq!(controller.tick_at(start), TickOutcome::Rendered);
        assert_eq!(
            controller.tick_at(start + Duration::from_millis(16)),
            TickOutcome::Skipped
        );
        assert_eq!(stats.borrow().frames, 1);
        assert_eq!(stats.borrow().resizes, 1);
        assert_eq!(controller.frame_timing().skipped_frames(), 1);
    }

    #[test]
    fn unchanged_client_size_does_not_redraw() {
        let (mut controller, _, stats) = scenario();
        let start = Instant::now();
        let _ = controller.tick_at(start);
        let size = controller.surface().pixel_size();
        controller.set_client_size(640.0, 480.0);
        assert_eq!(
            controller.tick_at(start + Duration::from_millis(16)),
            TickOutcome::Skipped
        );
        assert_eq!(controller.surface().pixel_size(), size);
        assert_eq!(stats.borrow().resizes, 1);

        controller.set_client_size(800.0, 600.0);
        assert_eq!(
            controller.tick_at(start + Duration::from_millis(32)),
            TickOutcome::Rendered
        );
        assert_eq!(stats.borrow().size, Some((800, 600)));
    }

    #[test]
    fn streamed_change_triggers_one_frame() {
        let (mut controller, loader, stats) = scenario();
        let _ = controller.add_model(1, 1).unwrap();
        let start = Instant::now();
        let _ = controller.tick_at(start);
        assert_eq!(
            controller.tick_at(start + Duration::from_millis(16)),
            TickOutcome::Skipped
        );

        loader.0.borrow().signal(1, 1).unwrap().notify();
        assert_eq!(
            controller.tick_at(start + Duration::from_millis(32)),
            TickOutcome::Rendered
        );
        assert_eq!(
            controller.tick_at(start + Duration::from_millis(48)),
            TickOutcome::Skipped
        );
        assert_eq!(stats.borrow().frames, 2);
    }

    #[test]
    fn near_far_follow_scene_bounds() {
        let (mut controller, _, stats) = scenario();
        let _ = controller.add_model(1, 1).unwrap();
        controller.set_camera_position(Vec3::new(5.0, 5.0, 30.0));
        controller.set_camera_target(Vec3::splat(5.0));
        let _ = controller.tick_at(Instant::now());
        let frame = stats.borrow().last_frame.unwrap();
        // 20 units to the box, shrunk by the 60° 4:3 frustum spread
        assert!((frame.near - 20.0 / 1.387_777_5).abs() < 1e-3);
        assert!(frame.far > frame.near);
        assert!(controller.controls.min_distance() <= 0.1);
    }

    #[test]
    fn off_axis_model_is_not_clipped() {
        let (mut controller, loader, stats) = scenario();
        loader.0.borrow_mut().insert(
            4,
            1,
            ModelData::Cad {
                bounds: Aabb::new(Vec3::new(5.0, 0.0, -10.0), Vec3::new(6.0, 1.0, -9.0)),
            },
        );
        let _ = controller.add_model(4, 1).unwrap();
        controller.set_camera_position(Vec3::ZERO);
        controller.set_camera_target(Vec3::NEG_Z);
        let _ = controller.tick_at(Instant::now());

        let frame = stats.borrow().last_frame.unwrap();
        assert!(frame.near < 9.0);
        assert!(controller.world_to_screen(Vec3::new(5.5, 0.5, -9.5), true).is_some());
    }

    #[test]
    fn camera_listener_fires_once_per_moving_tick() {
        let (mut controller, _, _) = scenario();
        let calls = Rc::new(RefCell::new(0));
        let seen = Rc::clone(&calls);
        let id = controller.on_camera_changed(move |_, _| {
            *seen.borrow_mut() += 1;
            ListenerAction::Keep
        });

        let start = Instant::now();
        let _ = controller.tick_at(start);
        assert_eq!(*calls.borrow(), 0);

        controller.set_camera_position(Vec3::new(1.0, 2.0, 3.0));
        controller.set_camera_target(Vec3::ZERO);
        let _ = controller.tick_at(start + Duration::from_millis(16));
        assert_eq!(*calls.borrow(), 1);

        let _ = controller.animate_to_at(Vec3::splat(9.0), Vec3::ZERO, None, start);
        run_until(&mut controller, start + Duration::from_millis(32), Duration::from_millis(100));
        let during_flight = *calls.borrow();
        assert!(during_flight > 1);

        assert!(controller.off_camera_changed(id));
        controller.set_camera_position(Vec3::ONE);
        let _ = controller.tick_at(start + Duration::from_secs(5));
        assert_eq!(*calls.borrow(), during_flight);
    }
}

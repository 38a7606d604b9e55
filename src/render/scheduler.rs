use std::cell::Cell;
use std::rc::Rc;

use web_time::Instant;

use crate::util::frame_timing::FrameTiming;

/// Lifecycle of the frame loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    /// Between ticks.
    Idle,
    /// Inside a tick.
    Rendering,
    /// Terminal. No further ticks run.
    Disposed,
}

/// What a tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// A frame was rendered.
    Rendered,
    /// Nothing changed; the previous frame stays on screen.
    Skipped,
    /// The controller is disposed; the tick was ignored.
    Disposed,
}

/// Shared flag telling a platform frame driver to stop requesting ticks.
///
/// Cloned out of the scheduler; [`RenderScheduler::dispose`] cancels every
/// clone at once.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Rc<Cell<bool>>);

impl CancellationToken {
    /// Whether the owning scheduler has been disposed.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.get()
    }

    fn cancel(&self) {
        self.0.set(true);
    }
}

/// Frame-loop state: the redraw flag, the cancellation token and frame
/// statistics.
///
/// The scheduler is the only writer of the redraw flag. Producers (camera,
/// registry, resize check) report changes through
/// [`request_redraw`](Self::request_redraw); the flag is cleared when a tick
/// finishes with a rendered frame.
#[derive(Debug)]
pub struct RenderScheduler {
    state: SchedulerState,
    needs_redraw: bool,
    token: CancellationToken,
    timing: FrameTiming,
}

impl Default for RenderScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderScheduler {
    /// Idle scheduler with the redraw flag raised, so the first tick
    /// produces a frame.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: SchedulerState::Idle,
            needs_redraw: true,
            token: CancellationToken::default(),
            timing: FrameTiming::new(),
        }
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> SchedulerState {
        self.state
    }

    /// Whether [`dispose`](Self::dispose) has run.
    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.state == SchedulerState::Disposed
    }

    /// Clone of the cancellation token for a frame driver.
    #[must_use]
    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }

    /// Raise the redraw flag. Ignored once disposed.
    pub fn request_redraw(&mut self) {
        if !self.is_disposed() {
            self.needs_redraw = true;
        }
    }

    /// Whether the next tick will render.
    #[must_use]
    pub fn needs_redraw(&self) -> bool {
        self.needs_redraw
    }

    /// Enter a tick. Returns `false` if disposed.
    pub fn begin_tick(&mut self) -> bool {
        match self.state {
            SchedulerState::Disposed => false,
            SchedulerState::Idle | SchedulerState::Rendering => {
                self.state = SchedulerState::Rendering;
                true
            }
        }
    }

    /// Leave a tick, clearing the redraw flag if a frame was produced.
    pub fn finish_tick(&mut self, now: Instant, rendered: bool) -> TickOutcome {
        if self.is_disposed() {
            return TickOutcome::Disposed;
        }
        self.state = SchedulerState::Idle;
        if rendered {
            self.needs_redraw = false;
            self.timing.record_rendered(now);
            TickOutcome::Rendered
        } else {
            self.timing.record_skipped();
            TickOutcome::Skipped
        }
    }

    /// Move to the terminal state and cancel the token. Returns `true` the
    /// first time only.
    pub fn dispose(&mut self) -> bool {
        if self.is_disposed() {
            return false;
        }
        self.state = SchedulerState::Disposed;
        self.needs_redraw = false;
        self.token.cancel();
        true
    }

    /// Rendered/skipped counters and smoothed FPS.
    #[must_use]
    pub fn frame_timing(&self) -> &FrameTiming {
        &self.timing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_tick_renders_then_skips() {
        let mut scheduler = RenderScheduler::new();
        let now = Instant::now();
        assert!(scheduler.begin_tick());
        assert_eq!(scheduler.state(), SchedulerState::Rendering);
        let rendered = scheduler.needs_redraw();
        assert_eq!(scheduler.finish_tick(now, rendered), TickOutcome::Rendered);
        assert!(!scheduler.needs_redraw());

        assert!(scheduler.begin_tick());
        assert_eq!(scheduler.finish_tick(now, false), TickOutcome::Skipped);
        assert_eq!(scheduler.state(), SchedulerState::Idle);
        assert_eq!(scheduler.frame_timing().rendered_frames(), 1);
        assert_eq!(scheduler.frame_timing().skipped_frames(), 1);
    }

    #[test]
    fn dispose_is_terminal_and_cancels_token() {
        let mut scheduler = RenderScheduler::new();
        let token = scheduler.token();
        assert!(!token.is_cancelled());
        assert!(scheduler.dispose());
        assert!(!scheduler.dispose());
        assert!(token.is_cancelled());
        assert!(!scheduler.begin_tick());
        scheduler.request_redraw();
        assert!(!scheduler.needs_redraw());
        assert_eq!(
            scheduler.finish_tick(Instant::now(), true),
            TickOutcome::Disposed
        );
    }
}

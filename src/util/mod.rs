//! Shared utilities: easing curves and frame statistics.

pub mod easing;
/// Rolling frame-time statistics fed by the scheduler.
pub mod frame_timing;

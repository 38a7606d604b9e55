//! Input handling: event types and the input processor that converts raw
//! window events into camera commands and animation interrupts.

/// Platform-agnostic input events.
pub mod event;
/// Converts raw events into camera commands.
pub mod processor;

pub use event::{InputEvent, MouseButton};
pub use processor::{InputProcessor, KeyAction, KeyBindings};

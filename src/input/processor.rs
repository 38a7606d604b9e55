//! Converts raw platform events into camera commands.
//!
//! The `InputProcessor` owns all transient input state (pointer tracking,
//! pressed button, modifier keys) and the key-binding map. It sits between
//! raw window events and the controller's camera controls.

use std::collections::HashMap;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::event::{InputEvent, MouseButton};
use crate::camera::controls::CameraCommand;

/// Discrete keyboard navigation actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyAction {
    /// Move towards the target.
    MoveForward,
    /// Move away from the target.
    MoveBackward,
    /// Strafe left along the view's right axis.
    MoveLeft,
    /// Strafe right along the view's right axis.
    MoveRight,
    /// Move along the view's up axis.
    MoveUp,
    /// Move against the view's up axis.
    MoveDown,
}

/// Maps physical key strings to [`KeyAction`]s.
///
/// Key strings use the `winit::keyboard::KeyCode` debug format:
/// `"KeyW"`, `"ArrowUp"`, etc.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct KeyBindings {
    /// Forward map: key string → action.
    bindings: HashMap<String, KeyAction>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        let bindings = HashMap::from([
            ("KeyW".into(), KeyAction::MoveForward),
            ("ArrowUp".into(), KeyAction::MoveForward),
            ("KeyS".into(), KeyAction::MoveBackward),
            ("ArrowDown".into(), KeyAction::MoveBackward),
            ("KeyA".into(), KeyAction::MoveLeft),
            ("ArrowLeft".into(), KeyAction::MoveLeft),
            ("KeyD".into(), KeyAction::MoveRight),
            ("ArrowRight".into(), KeyAction::MoveRight),
            ("KeyE".into(), KeyAction::MoveUp),
            ("KeyQ".into(), KeyAction::MoveDown),
        ]);
        Self { bindings }
    }
}

impl KeyBindings {
    /// Look up the action for a physical key string.
    #[must_use]
    pub fn lookup(&self, key: &str) -> Option<KeyAction> {
        self.bindings.get(key).copied()
    }

    /// Bind `key` to `action`, replacing any previous binding of that key.
    pub fn bind(&mut self, key: impl Into<String>, action: KeyAction) {
        let _ = self.bindings.insert(key.into(), action);
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// InputProcessor
// ─────────────────────────────────────────────────────────────────────────────

/// Converts raw input events into [`CameraCommand`]s.
///
/// Left-drag orbits, right-drag (or shift + left-drag) pans, middle-drag and
/// the wheel dolly. Bound keys move the camera only while keyboard
/// navigation is enabled.
#[derive(Debug, Clone)]
pub struct InputProcessor {
    /// Last cursor position, if one has been seen.
    last_pointer: Option<Vec2>,
    /// Button currently held, if any.
    pressed: Option<MouseButton>,
    /// Whether the shift modifier is currently held.
    shift_pressed: bool,
    /// Whether bound keys drive the camera.
    keyboard_navigation: bool,
    /// Key string → action mapping.
    key_bindings: KeyBindings,
}

impl Default for InputProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl InputProcessor {
    /// Create a new processor with default key bindings and keyboard
    /// navigation disabled.
    #[must_use]
    pub fn new() -> Self {
        Self {
            last_pointer: None,
            pressed: None,
            shift_pressed: false,
            keyboard_navigation: false,
            key_bindings: KeyBindings::default(),
        }
    }

    /// Create a processor with custom key bindings.
    #[must_use]
    pub fn with_key_bindings(key_bindings: KeyBindings) -> Self {
        Self {
            key_bindings,
            ..Self::new()
        }
    }

    /// Whether keyboard navigation is enabled.
    #[must_use]
    pub fn keyboard_navigation(&self) -> bool {
        self.keyboard_navigation
    }

    /// Enable or disable keyboard navigation.
    pub fn set_keyboard_navigation(&mut self, enabled: bool) {
        self.keyboard_navigation = enabled;
    }

    /// Button currently held, if any.
    #[must_use]
    pub fn pressed_button(&self) -> Option<MouseButton> {
        self.pressed
    }

    /// Read-only access to the key bindings.
    #[must_use]
    pub fn key_bindings(&self) -> &KeyBindings {
        &self.key_bindings
    }

    /// Process a raw input event and return zero or one camera commands.
    pub fn handle_event(&mut self, event: &InputEvent) -> Option<CameraCommand> {
        match event {
            InputEvent::PointerDown { button } => {
                self.pressed = Some(*button);
                None
            }
            InputEvent::PointerUp { .. } => {
                self.pressed = None;
                None
            }
            InputEvent::PointerMoved { x, y } => {
                self.handle_pointer_moved(Vec2::new(*x, *y))
            }
            InputEvent::Wheel { delta } => {
                Some(CameraCommand::Zoom { delta: *delta })
            }
            InputEvent::KeyDown { key } => {
                if !self.keyboard_navigation {
                    return None;
                }
                self.key_bindings.lookup(key).map(CameraCommand::Step)
            }
            InputEvent::ModifiersChanged { shift } => {
                self.shift_pressed = *shift;
                None
            }
        }
    }

    /// Cursor moved: compute the delta and maybe produce a drag command.
    fn handle_pointer_moved(&mut self, pos: Vec2) -> Option<CameraCommand> {
        let delta = self.last_pointer.map_or(Vec2::ZERO, |last| pos - last);
        self.last_pointer = Some(pos);

        if delta == Vec2::ZERO {
            return None;
        }
        match self.pressed? {
            MouseButton::Left if self.shift_pressed => {
                Some(CameraCommand::Pan { delta })
            }
            MouseButton::Left => Some(CameraCommand::Rotate { delta }),
            MouseButton::Right => Some(CameraCommand::Pan { delta }),
            MouseButton::Middle => Some(CameraCommand::Zoom {
                delta: -delta.y * 0.1,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn moved(x: f32, y: f32) -> InputEvent {
        InputEvent::PointerMoved { x, y }
    }

    #[test]
    fn hover_produces_no_command() {
        let mut p = InputProcessor::new();
        assert_eq!(p.handle_event(&moved(10.0, 10.0)), None);
        assert_eq!(p.handle_event(&moved(20.0, 10.0)), None);
    }

    #[test]
    fn left_drag_rotates_and_shift_drag_pans() {
        let mut p = InputProcessor::new();
        let _ = p.handle_event(&moved(0.0, 0.0));
        let _ = p.handle_event(&InputEvent::PointerDown {
            button: MouseButton::Left,
        });
        assert_eq!(
            p.handle_event(&moved(5.0, 0.0)),
            Some(CameraCommand::Rotate {
                delta: Vec2::new(5.0, 0.0)
            })
        );
        let _ = p.handle_event(&InputEvent::ModifiersChanged { shift: true });
        assert_eq!(
            p.handle_event(&moved(5.0, 3.0)),
            Some(CameraCommand::Pan {
                delta: Vec2::new(0.0, 3.0)
            })
        );
        let _ = p.handle_event(&InputEvent::PointerUp {
            button: MouseButton::Left,
        });
        assert_eq!(p.handle_event(&moved(9.0, 9.0)), None);
    }

    #[test]
    fn keys_ignored_without_keyboard_navigation() {
        let mut p = InputProcessor::new();
        let key = InputEvent::KeyDown { key: "KeyW".into() };
        assert_eq!(p.handle_event(&key), None);
        p.set_keyboard_navigation(true);
        assert_eq!(
            p.handle_event(&key),
            Some(CameraCommand::Step(KeyAction::MoveForward))
        );
        let unbound = InputEvent::KeyDown { key: "KeyZ".into() };
        assert_eq!(p.handle_event(&unbound), None);
    }

    #[test]
    fn custom_bindings_override_defaults() {
        let mut bindings = KeyBindings::default();
        bindings.bind("KeyW", KeyAction::MoveUp);
        let mut p = InputProcessor::with_key_bindings(bindings);
        p.set_keyboard_navigation(true);
        assert_eq!(
            p.handle_event(&InputEvent::KeyDown { key: "KeyW".into() }),
            Some(CameraCommand::Step(KeyAction::MoveUp))
        );
    }
}

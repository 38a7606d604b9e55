/// Platform-agnostic input events.
///
/// These are fed into an [`InputProcessor`](super::InputProcessor) which
/// decides whether they interrupt a camera flight and which camera command,
/// if any, they produce.
///
/// # Example
///
/// ```ignore
/// controller.handle_input(InputEvent::PointerDown {
///     button: MouseButton::Left,
/// });
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Pointer (mouse/touch/pen) pressed on the surface.
    PointerDown {
        /// Which button was pressed.
        button: MouseButton,
    },
    /// Pointer released.
    PointerUp {
        /// Which button was released.
        button: MouseButton,
    },
    /// Cursor moved to absolute surface position.
    PointerMoved {
        /// Horizontal position in logical pixels.
        x: f32,
        /// Vertical position in logical pixels.
        y: f32,
    },
    /// Scroll wheel (positive = zoom in).
    Wheel {
        /// Scroll amount (positive = zoom in, negative = zoom out).
        delta: f32,
    },
    /// Key pressed.
    KeyDown {
        /// Physical key string in `winit::keyboard::KeyCode` debug format
        /// (`"KeyW"`, `"ArrowUp"`, ...).
        key: String,
    },
    /// Modifier key state changed.
    ModifiersChanged {
        /// Whether the shift key is held.
        shift: bool,
    },
}

impl InputEvent {
    /// Whether this event interrupts an in-flight camera animation.
    ///
    /// Pointer presses and wheel always do. Key presses do unless keyboard
    /// navigation is enabled.
    #[must_use]
    pub fn interrupts_animation(&self, keyboard_navigation: bool) -> bool {
        match self {
            Self::PointerDown { .. } | Self::Wheel { .. } => true,
            Self::KeyDown { .. } => !keyboard_navigation,
            Self::PointerUp { .. }
            | Self::PointerMoved { .. }
            | Self::ModifiersChanged { .. } => false,
        }
    }
}

/// Platform-agnostic mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Primary (left) mouse button.
    Left,
    /// Secondary (right) mouse button.
    Right,
    /// Middle mouse button (wheel click).
    Middle,
}

#[cfg(feature = "viewer")]
impl From<winit::event::MouseButton> for MouseButton {
    fn from(button: winit::event::MouseButton) -> Self {
        match button {
            winit::event::MouseButton::Right => Self::Right,
            winit::event::MouseButton::Middle => Self::Middle,
            _ => Self::Left,
        }
    }
}

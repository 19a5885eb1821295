/// Keyboard keys the runtime reports by name; everything else is `Other`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Key {
    Escape,
    Space,
    Enter,
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    /// Platform key code not represented above.
    Other(u32),
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Other(u16),
}

/// Platform-agnostic input event. Positions are logical pixels, origin at the
/// top-left of the window.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum InputEvent {
    PointerMoved { x: f32, y: f32 },

    PointerButton {
        button: MouseButton,
        pressed: bool,
        x: f32,
        y: f32,
    },

    /// Pointer left the window surface.
    PointerLeft,

    Key { key: Key, pressed: bool, repeat: bool },

    /// Window focus change.
    Focused(bool),
}

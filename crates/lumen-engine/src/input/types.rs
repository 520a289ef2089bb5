use std::fmt;

/// Keyboard key identifier.
///
/// Only the keys the camera controls and the loop react to are named.
/// Anything else maps to `Key::Unknown(u32)` with the platform code.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Key {
    W,
    A,
    S,
    D,
    Space,
    Shift,
    Escape,

    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,

    /// Platform-dependent key not represented here.
    Unknown(u32),
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum KeyState {
    Pressed,
    Released,
}

/// Platform-agnostic input events emitted by the game loop.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    Key {
        key: Key,
        state: KeyState,
        /// True when event is a key-repeat.
        repeat: bool,
    },

    /// Raw relative mouse motion, unaffected by cursor clamping.
    MouseMotion { dx: f32, dy: f32 },

    /// Window focus change.
    Focused(bool),
}

/// Movement directions held this frame.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct DirectionsInput {
    pub front: bool,
    pub left: bool,
    pub back: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
}

/// Mouse motion accumulated since the last reset.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct MouseRelativeMovement {
    pub x: f32,
    pub y: f32,
}

impl MouseRelativeMovement {
    pub fn is_zero(&self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

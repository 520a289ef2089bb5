//! Input subsystem.
//!
//! Public API is platform-agnostic and does not expose winit types.
//! The game loop translates platform events into `InputEvent`s.

mod platform;
mod state;
mod types;

pub(crate) use platform::{translate_device_event, translate_window_event};
pub use state::InputState;
pub use types::{DirectionsInput, InputEvent, Key, KeyState, MouseRelativeMovement};

use std::collections::HashSet;

use super::types::{DirectionsInput, InputEvent, Key, KeyState, MouseRelativeMovement};

/// Current input state for the game window.
///
/// Holds "is down" information for keys and the mouse motion accumulated
/// since the last [`InputState::reset_mouse_movement`].
#[derive(Debug, Default)]
pub struct InputState {
    /// Whether the window is focused.
    pub focused: bool,

    /// Set of currently held keys.
    pub keys_down: HashSet<Key>,

    mouse_delta: MouseRelativeMovement,
}

impl InputState {
    /// Applies a platform-agnostic input event to the current state.
    pub fn apply_event(&mut self, ev: &InputEvent) {
        match ev {
            InputEvent::Focused(f) => {
                self.focused = *f;
                if !*f {
                    // On focus loss, clear held keys so nothing stays stuck.
                    self.keys_down.clear();
                }
            }

            InputEvent::Key { key, state, .. } => match state {
                KeyState::Pressed => {
                    self.keys_down.insert(*key);
                }
                KeyState::Released => {
                    self.keys_down.remove(key);
                }
            },

            InputEvent::MouseMotion { dx, dy } => {
                self.mouse_delta.x += dx;
                self.mouse_delta.y += dy;
            }
        }
    }

    pub fn key_down(&self, key: Key) -> bool {
        self.keys_down.contains(&key)
    }

    /// W/A/S/D (or the arrow keys) move on the ground plane, Space and Shift
    /// move up and down.
    pub fn directions(&self) -> DirectionsInput {
        DirectionsInput {
            front: self.key_down(Key::W) || self.key_down(Key::ArrowUp),
            left: self.key_down(Key::A) || self.key_down(Key::ArrowLeft),
            back: self.key_down(Key::S) || self.key_down(Key::ArrowDown),
            right: self.key_down(Key::D) || self.key_down(Key::ArrowRight),
            up: self.key_down(Key::Space),
            down: self.key_down(Key::Shift),
        }
    }

    pub fn mouse_relative_movement(&self) -> MouseRelativeMovement {
        self.mouse_delta
    }

    pub fn reset_mouse_movement(&mut self) {
        self.mouse_delta = MouseRelativeMovement::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(key: Key, state: KeyState) -> InputEvent {
        InputEvent::Key {
            key,
            state,
            repeat: false,
        }
    }

    #[test]
    fn held_keys_map_to_directions() {
        let mut input = InputState::default();
        input.apply_event(&key(Key::W, KeyState::Pressed));
        input.apply_event(&key(Key::Space, KeyState::Pressed));

        let d = input.directions();
        assert!(d.front && d.up);
        assert!(!d.back && !d.left && !d.right && !d.down);

        input.apply_event(&key(Key::W, KeyState::Released));
        assert!(!input.directions().front);
    }

    #[test]
    fn focus_loss_clears_held_keys() {
        let mut input = InputState::default();
        input.apply_event(&InputEvent::Focused(true));
        input.apply_event(&key(Key::D, KeyState::Pressed));
        input.apply_event(&InputEvent::Focused(false));

        assert!(!input.focused);
        assert_eq!(input.directions(), DirectionsInput::default());
    }

    #[test]
    fn mouse_motion_accumulates_until_reset() {
        let mut input = InputState::default();
        input.apply_event(&InputEvent::MouseMotion { dx: 3.0, dy: -1.0 });
        input.apply_event(&InputEvent::MouseMotion { dx: 2.0, dy: 4.0 });
        assert_eq!(
            input.mouse_relative_movement(),
            MouseRelativeMovement { x: 5.0, y: 3.0 }
        );

        input.reset_mouse_movement();
        assert!(input.mouse_relative_movement().is_zero());
    }
}

use winit::event::{DeviceEvent, ElementState, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

use super::{InputEvent, Key, KeyState};

/// Translates a winit `WindowEvent` into an engine `InputEvent`.
///
/// Returns `None` for events not represented by the input subsystem.
pub(crate) fn translate_window_event(event: &WindowEvent) -> Option<InputEvent> {
    match event {
        WindowEvent::Focused(f) => Some(InputEvent::Focused(*f)),

        WindowEvent::KeyboardInput { event, .. } => {
            let state = match event.state {
                ElementState::Pressed => KeyState::Pressed,
                ElementState::Released => KeyState::Released,
            };

            Some(InputEvent::Key {
                key: map_key(event.physical_key),
                state,
                repeat: event.repeat,
            })
        }

        _ => None,
    }
}

/// Raw mouse motion arrives as a device event, independent of the cursor.
pub(crate) fn translate_device_event(event: &DeviceEvent) -> Option<InputEvent> {
    match event {
        DeviceEvent::MouseMotion { delta: (dx, dy) } => Some(InputEvent::MouseMotion {
            dx: *dx as f32,
            dy: *dy as f32,
        }),
        _ => None,
    }
}

fn map_key(pk: PhysicalKey) -> Key {
    match pk {
        PhysicalKey::Code(code) => match code {
            KeyCode::KeyW => Key::W,
            KeyCode::KeyA => Key::A,
            KeyCode::KeyS => Key::S,
            KeyCode::KeyD => Key::D,
            KeyCode::Space => Key::Space,
            KeyCode::ShiftLeft | KeyCode::ShiftRight => Key::Shift,
            KeyCode::Escape => Key::Escape,

            KeyCode::ArrowUp => Key::ArrowUp,
            KeyCode::ArrowDown => Key::ArrowDown,
            KeyCode::ArrowLeft => Key::ArrowLeft,
            KeyCode::ArrowRight => Key::ArrowRight,

            other => Key::Unknown(other as u32),
        },

        // winit 0.30 uses NativeKeyCode; no stable numeric is guaranteed here.
        PhysicalKey::Unidentified(_) => Key::Unknown(0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn movement_keys_are_named() {
        assert_eq!(map_key(PhysicalKey::Code(KeyCode::KeyW)), Key::W);
        assert_eq!(map_key(PhysicalKey::Code(KeyCode::ShiftRight)), Key::Shift);
        assert!(matches!(
            map_key(PhysicalKey::Code(KeyCode::KeyZ)),
            Key::Unknown(_)
        ));
    }

    #[test]
    fn mouse_motion_device_event_is_translated() {
        let ev = DeviceEvent::MouseMotion { delta: (1.5, -2.0) };
        assert_eq!(
            translate_device_event(&ev),
            Some(InputEvent::MouseMotion { dx: 1.5, dy: -2.0 })
        );
    }
}

use super::state::InputState;
use super::types::{Key, MouseButton};

/// Keys bound to each movement action of the input snapshot.
///
/// An action is active while *any* of its keys is held.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyBindings {
    pub move_forward: Vec<Key>,
    pub move_backward: Vec<Key>,
    pub rotate_left: Vec<Key>,
    pub rotate_right: Vec<Key>,
    pub strafe_left: Vec<Key>,
    pub strafe_right: Vec<Key>,
    pub exit: Vec<Key>,
}

impl Default for KeyBindings {
    /// WASD + arrows for movement/rotation, Q/E strafe, Escape exit.
    fn default() -> Self {
        Self {
            move_forward: vec![Key::W, Key::ArrowUp],
            move_backward: vec![Key::S, Key::ArrowDown],
            rotate_left: vec![Key::A, Key::ArrowLeft],
            rotate_right: vec![Key::D, Key::ArrowRight],
            strafe_left: vec![Key::Q],
            strafe_right: vec![Key::E],
            exit: vec![Key::Escape],
        }
    }
}

/// Fixed-field input record polled once per frame by external callers.
///
/// Field order is part of the host adapter and C ABI contracts.
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct InputSnapshot {
    pub move_forward: bool,
    pub move_backward: bool,
    pub rotate_left: bool,
    pub rotate_right: bool,
    pub strafe_left: bool,
    pub strafe_right: bool,
    pub exit: bool,
    pub mouse_x: f32,
    pub mouse_y: f32,
    pub mouse_left: bool,
    pub mouse_right: bool,
    pub mouse_middle: bool,
}

impl InputSnapshot {
    pub fn capture(state: &InputState, bindings: &KeyBindings) -> Self {
        let any = |keys: &[Key]| keys.iter().any(|k| state.key_down(*k));
        let (mouse_x, mouse_y) = state.pointer_pos;

        Self {
            move_forward: any(&bindings.move_forward),
            move_backward: any(&bindings.move_backward),
            rotate_left: any(&bindings.rotate_left),
            rotate_right: any(&bindings.rotate_right),
            strafe_left: any(&bindings.strafe_left),
            strafe_right: any(&bindings.strafe_right),
            exit: any(&bindings.exit),
            mouse_x,
            mouse_y,
            mouse_left: state.button_down(MouseButton::Left),
            mouse_right: state.button_down(MouseButton::Right),
            mouse_middle: state.button_down(MouseButton::Middle),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{InputEvent, KeyState, MouseButtonState, PointerButtonEvent, PointerMoveEvent};

    fn press(s: &mut InputState, key: Key) {
        s.apply_event(&InputEvent::Key { key, state: KeyState::Pressed, repeat: false });
    }

    #[test]
    fn default_bindings_accept_letters_and_arrows() {
        let b = KeyBindings::default();

        let mut s = InputState::default();
        press(&mut s, Key::ArrowUp);
        press(&mut s, Key::D);
        let snap = InputSnapshot::capture(&s, &b);
        assert!(snap.move_forward);
        assert!(snap.rotate_right);
        assert!(!snap.move_backward);
        assert!(!snap.exit);
    }

    #[test]
    fn mouse_fields_follow_pointer_state() {
        let mut s = InputState::default();
        s.apply_event(&InputEvent::PointerMoved(PointerMoveEvent { x: 40.0, y: 2.5 }));
        s.apply_event(&InputEvent::PointerButton(PointerButtonEvent {
            button: MouseButton::Middle,
            state: MouseButtonState::Pressed,
        }));
        let snap = InputSnapshot::capture(&s, &KeyBindings::default());
        assert_eq!((snap.mouse_x, snap.mouse_y), (40.0, 2.5));
        assert!(snap.mouse_middle);
        assert!(!snap.mouse_left && !snap.mouse_right);
    }

    #[test]
    fn custom_bindings_replace_defaults() {
        let b = KeyBindings { exit: vec![Key::Space], ..KeyBindings::default() };
        let mut s = InputState::default();
        press(&mut s, Key::Escape);
        assert!(!InputSnapshot::capture(&s, &b).exit);
        press(&mut s, Key::Space);
        assert!(InputSnapshot::capture(&s, &b).exit);
    }
}

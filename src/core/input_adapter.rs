use std::collections::HashSet;
use winit::event::{ElementState, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

use crate::traits::{Button, Controller};

/// Adapter that bridges Winit keyboard events to the Controller trait
#[derive(Debug, Clone, Default)]
pub struct WinitController {
    /// Currently pressed buttons
    pressed_keys: HashSet<Button>,
    /// All pressed buttons as a vec (for efficient get_down_keys)
    pressed_vec: Vec<Button>,
}

impl WinitController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process a Winit WindowEvent; returns the button when it was just
    /// pressed (key repeat is ignored)
    pub fn process_event(&mut self, event: &WindowEvent) -> Option<Button> {
        let WindowEvent::KeyboardInput { event, .. } = event else {
            return None;
        };
        let PhysicalKey::Code(keycode) = event.physical_key else {
            return None;
        };
        let button = Self::keycode_to_button(keycode)?;
        self.apply(button, event.state)
    }

    fn apply(&mut self, button: Button, state: ElementState) -> Option<Button> {
        match state {
            ElementState::Pressed => {
                if self.pressed_keys.insert(button) {
                    self.pressed_vec.push(button);
                    return Some(button);
                }
            }
            ElementState::Released => {
                if self.pressed_keys.remove(&button) {
                    self.pressed_vec.retain(|&b| b != button);
                }
            }
        }
        None
    }

    /// Map Winit KeyCode to Button
    fn keycode_to_button(keycode: KeyCode) -> Option<Button> {
        match keycode {
            KeyCode::Digit1 | KeyCode::Numpad1 => Some(Button::Digit1),
            KeyCode::Digit2 | KeyCode::Numpad2 => Some(Button::Digit2),
            KeyCode::Digit3 | KeyCode::Numpad3 => Some(Button::Digit3),
            KeyCode::Tab => Some(Button::Tab),
            KeyCode::Space => Some(Button::Space),
            KeyCode::Escape => Some(Button::Escape),
            _ => None,
        }
    }
}

impl Controller for WinitController {
    fn is_down(&self, button: Button) -> bool {
        self.pressed_keys.contains(&button)
    }

    fn get_down_keys(&self) -> &[Button] {
        &self.pressed_vec
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Winit key events can't be built outside winit, so state changes go
    // through `apply` directly

    #[test]
    fn test_new_controller_empty() {
        let controller = WinitController::new();
        assert!(!controller.is_down(Button::Tab));
        assert!(controller.get_down_keys().is_empty());
    }

    #[test]
    fn test_press_fires_once_until_release() {
        let mut controller = WinitController::new();

        assert_eq!(controller.apply(Button::Tab, ElementState::Pressed), Some(Button::Tab));
        assert_eq!(controller.apply(Button::Tab, ElementState::Pressed), None);
        assert!(controller.is_down(Button::Tab));

        assert_eq!(controller.apply(Button::Tab, ElementState::Released), None);
        assert!(!controller.is_down(Button::Tab));
        assert_eq!(controller.apply(Button::Tab, ElementState::Pressed), Some(Button::Tab));
    }

    #[test]
    fn test_keycode_mapping() {
        assert_eq!(WinitController::keycode_to_button(KeyCode::Digit1), Some(Button::Digit1));
        assert_eq!(WinitController::keycode_to_button(KeyCode::Numpad3), Some(Button::Digit3));
        assert_eq!(WinitController::keycode_to_button(KeyCode::KeyW), None);
    }
}

/// Viewer key identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    Digit1,
    Digit2,
    Digit3,
    Tab,
    Space,
    Escape,
}

/// Controller - handles button input states
pub trait Controller {
    /// Check if button is currently down
    fn is_down(&self, button: Button) -> bool;

    /// Get all currently pressed buttons
    fn get_down_keys(&self) -> &[Button];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_button_equality() {
        assert_eq!(Button::Tab, Button::Tab);
        assert_ne!(Button::Digit1, Button::Digit2);
    }

    #[test]
    fn test_button_debug() {
        assert_eq!(format!("{:?}", Button::Digit3), "Digit3");
    }
}

use crate::prelude::*;

use std::collections::HashSet;
use winit::event::{Touch, TouchPhase};
use winit::keyboard::KeyCode;

/// Identifier the platform assigns to a finger for the lifetime of a touch
pub type FingerId = u64;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TouchAction {
    Began,
    Moved,
    Ended,
}

/// A touch event in viewport pixel coordinates
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TouchInput {
    pub finger: FingerId,
    pub action: TouchAction,
    pub position: Point2<f32>,
}

impl From<&Touch> for TouchInput {
    fn from(touch: &Touch) -> Self {
        let action = match touch.phase {
            TouchPhase::Started => TouchAction::Began,
            TouchPhase::Moved => TouchAction::Moved,
            // A cancelled touch releases its zones just like a lifted finger
            TouchPhase::Ended | TouchPhase::Cancelled => TouchAction::Ended,
        };

        Self {
            finger: touch.id,
            action,
            position: Point2::new(touch.location.x as f32, touch.location.y as f32),
        }
    }
}

/// Resource that tracks keyboard state
#[derive(Resource, Default)]
pub struct InputState {
    /// Currently pressed keys
    pub keys_pressed: HashSet<KeyCode>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if a key is currently pressed
    pub fn is_key_pressed(&self, key: KeyCode) -> bool {
        self.keys_pressed.contains(&key)
    }

    /// Handle key press
    pub fn press_key(&mut self, key: KeyCode) {
        self.keys_pressed.insert(key);
    }

    /// Handle key release
    pub fn release_key(&mut self, key: KeyCode) {
        self.keys_pressed.remove(&key);
    }

    /// Axis value from a pair of opposing keys
    pub fn axis(&self, positive: KeyCode, negative: KeyCode) -> f32 {
        let mut value = 0.0;
        if self.is_key_pressed(positive) {
            value += 1.0;
        }
        if self.is_key_pressed(negative) {
            value -= 1.0;
        }
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axis_cancels_opposing_keys() {
        let mut input = InputState::new();
        input.press_key(KeyCode::KeyW);
        assert_eq!(input.axis(KeyCode::KeyW, KeyCode::KeyS), 1.0);

        input.press_key(KeyCode::KeyS);
        assert_eq!(input.axis(KeyCode::KeyW, KeyCode::KeyS), 0.0);

        input.release_key(KeyCode::KeyW);
        assert_eq!(input.axis(KeyCode::KeyW, KeyCode::KeyS), -1.0);
    }

    #[test]
    fn test_cancelled_touch_ends() {
        use winit::dpi::PhysicalPosition;
        use winit::event::DeviceId;

        let touch = |phase| Touch {
            device_id: unsafe { DeviceId::dummy() },
            phase,
            location: PhysicalPosition::new(12.5, 40.0),
            force: None,
            id: 3,
        };

        let began = TouchInput::from(&touch(TouchPhase::Started));
        assert_eq!(began.finger, 3);
        assert_eq!(began.action, TouchAction::Began);
        assert_eq!(began.position, Point2::new(12.5, 40.0));

        let cancelled = TouchInput::from(&touch(TouchPhase::Cancelled));
        assert_eq!(cancelled.action, TouchAction::Ended);
    }
}

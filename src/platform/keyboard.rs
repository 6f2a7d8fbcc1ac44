//! Keyboard input for the first seat
//!
//! Held keys drive the axes; Home/End are edge-triggered and only fire on
//! the press, not on auto-repeat.

use std::collections::HashSet;

use winit::event::ElementState;
use winit::keyboard::{KeyCode, PhysicalKey};

use crate::sim::PlayerIntent;

/// Tracks held keys and one-shot commands
#[derive(Debug, Default)]
pub struct KeyboardInput {
    held: HashSet<KeyCode>,
    switch_aiming: bool,
    switch_target: bool,
    restart: bool,
    quit: bool,
}

impl KeyboardInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process a key event
    pub fn process_key(&mut self, key: PhysicalKey, state: ElementState) {
        let PhysicalKey::Code(code) = key else {
            return;
        };
        match state {
            ElementState::Pressed => {
                // Auto-repeat shows up as repeated presses of a held key
                if !self.held.insert(code) {
                    return;
                }
                match code {
                    KeyCode::Home => self.switch_aiming = true,
                    KeyCode::End => self.switch_target = true,
                    KeyCode::KeyR => self.restart = true,
                    KeyCode::Escape => self.quit = true,
                    _ => {}
                }
            }
            ElementState::Released => {
                self.held.remove(&code);
            }
        }
    }

    fn axis(&self, negative: KeyCode, positive: KeyCode) -> f32 {
        let mut value = 0.0;
        if self.held.contains(&negative) {
            value -= 1.0;
        }
        if self.held.contains(&positive) {
            value += 1.0;
        }
        value
    }

    /// Intent for this frame; consumes the one-shot switches
    pub fn take_intent(&mut self) -> PlayerIntent {
        PlayerIntent {
            turn: self.axis(KeyCode::ArrowLeft, KeyCode::ArrowRight),
            thrust: self.axis(KeyCode::ArrowDown, KeyCode::ArrowUp),
            cannon: self.axis(KeyCode::PageDown, KeyCode::PageUp),
            fire: self.held.contains(&KeyCode::Space),
            switch_aiming: std::mem::take(&mut self.switch_aiming),
            switch_target: std::mem::take(&mut self.switch_target),
        }
    }

    /// Restart requested since the last call
    pub fn take_restart(&mut self) -> bool {
        std::mem::take(&mut self.restart)
    }

    pub fn quit_requested(&self) -> bool {
        self.quit
    }

    /// Drop held keys (e.g. on focus loss)
    pub fn reset(&mut self) {
        self.held.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(kb: &mut KeyboardInput, code: KeyCode) {
        kb.process_key(PhysicalKey::Code(code), ElementState::Pressed);
    }

    fn release(kb: &mut KeyboardInput, code: KeyCode) {
        kb.process_key(PhysicalKey::Code(code), ElementState::Released);
    }

    #[test]
    fn test_held_axes() {
        let mut kb = KeyboardInput::new();
        press(&mut kb, KeyCode::ArrowRight);
        press(&mut kb, KeyCode::ArrowUp);
        press(&mut kb, KeyCode::PageUp);
        let intent = kb.take_intent();
        assert_eq!(intent.turn, 1.0);
        assert_eq!(intent.thrust, 1.0);
        // Page Up turns the cannon clockwise on screen
        assert_eq!(intent.cannon, 1.0);

        // Opposite keys cancel out
        press(&mut kb, KeyCode::ArrowLeft);
        assert_eq!(kb.take_intent().turn, 0.0);

        release(&mut kb, KeyCode::ArrowRight);
        release(&mut kb, KeyCode::ArrowUp);
        let intent = kb.take_intent();
        assert_eq!(intent.turn, -1.0);
        assert_eq!(intent.thrust, 0.0);
    }

    #[test]
    fn test_switches_are_edge_triggered() {
        let mut kb = KeyboardInput::new();
        press(&mut kb, KeyCode::Home);
        // Auto-repeat
        press(&mut kb, KeyCode::Home);
        assert!(kb.take_intent().switch_aiming);
        assert!(!kb.take_intent().switch_aiming);

        release(&mut kb, KeyCode::Home);
        press(&mut kb, KeyCode::Home);
        press(&mut kb, KeyCode::End);
        let intent = kb.take_intent();
        assert!(intent.switch_aiming && intent.switch_target);
    }

    #[test]
    fn test_restart_and_quit() {
        let mut kb = KeyboardInput::new();
        assert!(!kb.take_restart());
        press(&mut kb, KeyCode::KeyR);
        assert!(kb.take_restart());
        assert!(!kb.take_restart());
        assert!(!kb.quit_requested());
        press(&mut kb, KeyCode::Escape);
        assert!(kb.quit_requested());
    }

    #[test]
    fn test_reset_releases_everything() {
        let mut kb = KeyboardInput::new();
        press(&mut kb, KeyCode::Space);
        assert!(kb.take_intent().fire);
        kb.reset();
        assert!(!kb.take_intent().fire);
    }
}

//! Platform input layer
//!
//! Turns keyboard and joystick state into per-seat [`PlayerIntent`]s.

pub mod joystick;
pub mod keyboard;

pub use joystick::{JoystickSnapshot, Joysticks, apply_dead_zone};
pub use keyboard::KeyboardInput;

use crate::sim::PlayerIntent;

/// Merge the keyboard intent (seat 0) with the joystick intents (seat n)
pub fn merge_intents(
    seats: usize,
    keyboard: PlayerIntent,
    joysticks: &[PlayerIntent],
) -> Vec<PlayerIntent> {
    (0..seats)
        .map(|seat| {
            let base = if seat == 0 {
                keyboard
            } else {
                PlayerIntent::default()
            };
            match joysticks.get(seat) {
                Some(pad) => base.merge(*pad),
                None => base,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use winit::event::ElementState;
    use winit::keyboard::{KeyCode, PhysicalKey};

    use super::*;
    use crate::sim::{Arena, GameState, TickInput, tick};
    use crate::tuning::Tuning;

    #[test]
    fn test_keyboard_drives_first_seat() {
        let kb = PlayerIntent {
            turn: 1.0,
            ..Default::default()
        };
        let intents = merge_intents(3, kb, &[]);
        assert_eq!(intents.len(), 3);
        assert_eq!(intents[0].turn, 1.0);
        assert_eq!(intents[1], PlayerIntent::default());
    }

    #[test]
    fn test_joystick_merges_with_keyboard() {
        let kb = PlayerIntent {
            turn: 1.0,
            ..Default::default()
        };
        let pads = [
            PlayerIntent {
                turn: -0.25,
                fire: true,
                ..Default::default()
            },
            PlayerIntent {
                thrust: 0.5,
                ..Default::default()
            },
        ];
        let intents = merge_intents(2, kb, &pads);
        assert_eq!(intents[0].turn, 0.75);
        assert!(intents[0].fire);
        assert_eq!(intents[1].thrust, 0.5);
    }

    #[test]
    fn test_extra_pads_ignored() {
        let pads = [PlayerIntent::default(); 4];
        assert_eq!(merge_intents(2, PlayerIntent::default(), &pads).len(), 2);
    }

    #[test]
    fn test_page_up_turns_cannon_clockwise() {
        let mut state =
            GameState::with_arena(Arena::new(1024.0, 800.0, 20.0), Tuning::default(), 2, 7);
        state.auto_fire = false;
        let mut kb = KeyboardInput::new();
        kb.process_key(PhysicalKey::Code(KeyCode::PageUp), ElementState::Pressed);
        let input = TickInput {
            intents: merge_intents(2, kb.take_intent(), &[]),
            restart: false,
        };
        tick(&mut state, &input, 0.1);
        // 150 degrees per second for 0.1 s
        let (_, player) = state.player(0).unwrap();
        assert!((player.cannon_angle - 15.0).abs() < 1e-3);
    }
}

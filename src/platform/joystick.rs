//! Joystick input: joystick n drives seat n
//!
//! Pads are bound to seats in the order they are first seen. A pad that
//! disconnects keeps its slot so the other seats do not shift.

use gilrs::{Axis, Button, EventType, GamepadId, Gilrs};

use crate::sim::PlayerIntent;

/// Raw controls of one pad for one frame
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct JoystickSnapshot {
    /// Left stick X, -1 (left) to 1 (right)
    pub turn_axis: f32,
    /// Right stick Y, -1 (down) to 1 (up)
    pub thrust_axis: f32,
    pub cannon_ccw: bool,
    pub cannon_cw: bool,
    pub fire: bool,
    /// Aim-switch button released since the last frame
    pub aim_released: bool,
    /// Target-switch button released since the last frame
    pub target_released: bool,
}

impl JoystickSnapshot {
    /// Map to a seat intent, ignoring axis values inside the dead zone
    pub fn to_intent(&self, dead_zone: f32) -> PlayerIntent {
        let cannon = match (self.cannon_ccw, self.cannon_cw) {
            (true, false) => -1.0,
            (false, true) => 1.0,
            _ => 0.0,
        };
        PlayerIntent {
            turn: apply_dead_zone(self.turn_axis, dead_zone),
            thrust: apply_dead_zone(self.thrust_axis, dead_zone),
            cannon,
            fire: self.fire,
            switch_aiming: self.aim_released,
            switch_target: self.target_released,
        }
    }
}

/// Zero out small deflections, clamp the rest to [-1, 1]
pub fn apply_dead_zone(value: f32, dead_zone: f32) -> f32 {
    if value.abs() <= dead_zone {
        0.0
    } else {
        value.clamp(-1.0, 1.0)
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct Pending {
    aim: bool,
    target: bool,
}

/// All connected pads
pub struct Joysticks {
    gilrs: Option<Gilrs>,
    /// Seat order
    pads: Vec<GamepadId>,
    pending: Vec<Pending>,
    dead_zone: f32,
}

impl Joysticks {
    /// Open the joystick subsystem; without one the game runs keyboard-only
    pub fn new(dead_zone: f32) -> Self {
        let gilrs = match Gilrs::new() {
            Ok(gilrs) => Some(gilrs),
            Err(e) => {
                log::warn!("Joysticks unavailable: {e}");
                None
            }
        };
        let mut joysticks = Self {
            gilrs,
            pads: Vec::new(),
            pending: Vec::new(),
            dead_zone,
        };
        if let Some(gilrs) = &joysticks.gilrs {
            let ids: Vec<GamepadId> = gilrs.gamepads().map(|(id, _)| id).collect();
            for id in ids {
                joysticks.bind(id);
            }
        }
        log::info!("{} joystick(s) found", joysticks.pads.len());
        joysticks
    }

    fn bind(&mut self, id: GamepadId) -> usize {
        if let Some(slot) = self.pads.iter().position(|p| *p == id) {
            return slot;
        }
        self.pads.push(id);
        self.pending.push(Pending::default());
        let slot = self.pads.len() - 1;
        if let Some(pad) = self.gilrs.as_ref().map(|g| g.gamepad(id)) {
            log::info!("Joystick \"{}\" bound to seat {slot}", pad.name());
        }
        slot
    }

    /// Drain pending events and sample every pad; result is indexed by seat
    pub fn poll(&mut self) -> Vec<PlayerIntent> {
        let mut events = Vec::new();
        if let Some(gilrs) = self.gilrs.as_mut() {
            while let Some(event) = gilrs.next_event() {
                events.push((event.id, event.event));
            }
        }
        for (id, event) in events {
            let slot = self.bind(id);
            match event {
                EventType::ButtonReleased(Button::South | Button::Select, _) => {
                    self.pending[slot].aim = true;
                }
                EventType::ButtonReleased(Button::East | Button::Start, _) => {
                    self.pending[slot].target = true;
                }
                EventType::Disconnected => log::info!("Joystick for seat {slot} disconnected"),
                _ => {}
            }
        }

        let Some(gilrs) = self.gilrs.as_ref() else {
            return Vec::new();
        };
        self.pads
            .iter()
            .zip(self.pending.iter_mut())
            .map(|(id, pending)| {
                let pending = std::mem::take(pending);
                let Some(pad) = gilrs.connected_gamepad(*id) else {
                    return PlayerIntent::default();
                };
                JoystickSnapshot {
                    turn_axis: pad.value(Axis::LeftStickX),
                    thrust_axis: pad.value(Axis::RightStickY),
                    cannon_ccw: pad.is_pressed(Button::West) || pad.is_pressed(Button::LeftTrigger),
                    cannon_cw: pad.is_pressed(Button::North) || pad.is_pressed(Button::RightTrigger),
                    fire: pad.is_pressed(Button::RightTrigger2),
                    aim_released: pending.aim,
                    target_released: pending.target,
                }
                .to_intent(self.dead_zone)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dead_zone() {
        assert_eq!(apply_dead_zone(0.05, 0.1), 0.0);
        assert_eq!(apply_dead_zone(-0.1, 0.1), 0.0);
        assert_eq!(apply_dead_zone(0.5, 0.1), 0.5);
        assert_eq!(apply_dead_zone(-1.3, 0.1), -1.0);
    }

    #[test]
    fn test_snapshot_mapping() {
        let snap = JoystickSnapshot {
            turn_axis: -0.6,
            thrust_axis: 0.04,
            cannon_cw: true,
            fire: true,
            aim_released: true,
            ..Default::default()
        };
        let intent = snap.to_intent(0.1);
        assert_eq!(intent.turn, -0.6);
        assert_eq!(intent.thrust, 0.0);
        assert_eq!(intent.cannon, 1.0);
        assert!(intent.fire);
        assert!(intent.switch_aiming);
        assert!(!intent.switch_target);
    }

    #[test]
    fn test_both_cannon_buttons_cancel() {
        let snap = JoystickSnapshot {
            cannon_ccw: true,
            cannon_cw: true,
            ..Default::default()
        };
        assert_eq!(snap.to_intent(0.1).cannon, 0.0);
    }
}

//! Data-driven game balance
//!
//! Loaded as part of [`crate::Settings`]; every field falls back to the
//! classic values when missing from the settings file.

use serde::{Deserialize, Serialize};

/// Ship handling and gunnery
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    pub hitpoints: f32,
    pub radius: f32,
    /// Hull turn rate (degrees per second)
    pub turn_speed: f32,
    /// Forward speed (pixels per second); backward thrust is half of it
    pub move_speed: f32,
    /// Velocity multiplier applied every update
    pub friction: f32,
    /// Manual cannon turn rate (degrees per second)
    pub cannon_turn_speed: f32,
    /// Minimal time between two shots (seconds)
    pub reload_time: f32,
    /// Distance of the crosshair from the ship center
    pub crosshair_distance: f32,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            hitpoints: 100.0,
            radius: 17.0,
            turn_speed: 90.0,
            move_speed: 100.0,
            friction: 0.999,
            cannon_turn_speed: 150.0,
            reload_time: 0.15,
            crosshair_distance: 85.0,
        }
    }
}

/// Laser beam ballistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BeamTuning {
    /// Muzzle speed (pixels per second)
    pub speed: f32,
    pub damage: f32,
    pub radius: f32,
    /// Seconds before the beam fades out
    pub max_age: f32,
    /// Pixels traveled before the beam fades out
    pub max_distance: f32,
    /// Chance that a hit sprays a debris bubble
    pub debris_chance: f64,
}

impl Default for BeamTuning {
    fn default() -> Self {
        Self {
            speed: 150.0,
            damage: 1.0,
            radius: 5.0,
            max_age: 5.0,
            max_distance: 400.0,
            debris_chance: 0.85,
        }
    }
}

/// Complete balance sheet
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub player: PlayerTuning,
    pub beam: BeamTuning,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_tuning_keeps_defaults() {
        let tuning: Tuning =
            serde_json::from_str(r#"{ "player": { "reload_time": 0.5 } }"#).unwrap();
        assert_eq!(tuning.player.reload_time, 0.5);
        assert_eq!(tuning.player.hitpoints, 100.0);
        assert_eq!(tuning.beam, BeamTuning::default());
    }
}

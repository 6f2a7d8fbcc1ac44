//! Laser beams

use super::entity::{Behavior, Body, Color, EdgePolicy, EntityId};
use super::player::Shot;
use crate::consts::LAYER_OVERLAY;
use crate::heading;
use crate::tuning::BeamTuning;

/// Length of the drawn beam segment
pub const BEAM_LENGTH: f32 = 20.0;

/// Beam-specific entity state
#[derive(Debug, Clone)]
pub struct Beam {
    /// Shooting player's entity; beams never hit their owner
    pub owner: EntityId,
    pub owner_seat: usize,
    pub damage: f32,
}

impl Beam {
    /// Body for a fresh beam leaving the cannon
    pub fn launch(shot: &Shot, owner: EntityId, color: Color, tuning: &BeamTuning) -> Body {
        Body::new(shot.origin, tuning.radius, color)
            .with_velocity(heading(shot.angle) * tuning.speed)
            .with_angle(shot.angle)
            .with_hitpoints(1.0)
            .with_max_age(tuning.max_age)
            .with_max_distance(tuning.max_distance)
            .with_edge(EdgePolicy::Remove)
            .with_boss(owner, false)
            .with_layer(LAYER_OVERLAY)
    }
}

impl Behavior for Beam {}

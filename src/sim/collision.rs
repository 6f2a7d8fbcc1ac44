//! Beam versus player hit detection
//!
//! Plain circle overlap, no spatial index: with four ships and a few hundred
//! beams the O(players x beams) scan is cheap.

use glam::Vec2;

use super::entity::{Color, Entity, EntityId, Kind};

/// Two circles touch or overlap
#[inline]
pub fn circles_overlap(a: Vec2, ra: f32, b: Vec2, rb: f32) -> bool {
    a.distance(b) <= ra + rb
}

/// A beam striking a player
#[derive(Debug, Clone, PartialEq)]
pub struct Hit {
    pub player: EntityId,
    pub seat: usize,
    pub beam: EntityId,
    pub shooter_seat: usize,
    pub damage: f32,
    /// Beam position and velocity at impact (for debris)
    pub point: Vec2,
    pub beam_vel: Vec2,
    pub beam_color: Color,
}

/// Find every beam currently overlapping a player other than its owner
///
/// Each beam hits at most one player; players are tested in collection
/// order. Dormant entities take no part.
pub fn find_beam_hits(entities: &[Entity]) -> Vec<Hit> {
    let mut hits = Vec::new();
    let mut spent: Vec<EntityId> = Vec::new();

    let players = entities.iter().filter_map(|e| match &e.kind {
        Kind::Player(p) if !e.body.is_dormant() => Some((e, p)),
        _ => None,
    });

    for (target, player) in players {
        let beams = entities.iter().filter_map(|e| match &e.kind {
            Kind::Beam(b) if !e.body.is_dormant() => Some((e, b)),
            _ => None,
        });
        for (shot, beam) in beams {
            if beam.owner == target.id || spent.contains(&shot.id) {
                continue;
            }
            if !circles_overlap(target.body.pos, target.body.radius, shot.body.pos, shot.body.radius) {
                continue;
            }
            spent.push(shot.id);
            hits.push(Hit {
                player: target.id,
                seat: player.seat,
                beam: shot.id,
                shooter_seat: beam.owner_seat,
                damage: beam.damage,
                point: shot.body.pos,
                beam_vel: shot.body.vel,
                beam_color: shot.body.color,
            });
        }
    }

    hits
}

//! Per-frame scene update
//!
//! Order: intents → firing → kinematics → crosshairs → beam hits.

use rand::Rng;

use super::collision::find_beam_hits;
use super::entity::{EntityId, Kind, Removal, Rival, StepContext};
use super::state::{GameEvent, GameState};

/// What one seat wants to do this tick
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PlayerIntent {
    /// Hull turn, -1 (counter-clockwise) to 1 (clockwise)
    pub turn: f32,
    /// Thrust, -1 (backward) to 1 (forward)
    pub thrust: f32,
    /// Manual cannon turn, -1 to 1
    pub cannon: f32,
    pub fire: bool,
    /// Edge-triggered: advance to the next aiming mode
    pub switch_aiming: bool,
    /// Edge-triggered: advance to the next target
    pub switch_target: bool,
}

impl PlayerIntent {
    /// Combine two input sources for the same seat
    pub fn merge(self, other: PlayerIntent) -> Self {
        Self {
            turn: (self.turn + other.turn).clamp(-1.0, 1.0),
            thrust: (self.thrust + other.thrust).clamp(-1.0, 1.0),
            cannon: (self.cannon + other.cannon).clamp(-1.0, 1.0),
            fire: self.fire || other.fire,
            switch_aiming: self.switch_aiming || other.switch_aiming,
            switch_target: self.switch_target || other.switch_target,
        }
    }

    /// Same intent without the one-shot switches (for repeated substeps)
    pub fn held(self) -> Self {
        Self {
            switch_aiming: false,
            switch_target: false,
            ..self
        }
    }
}

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Indexed by seat
    pub intents: Vec<PlayerIntent>,
    /// Restart the match before updating
    pub restart: bool,
}

impl TickInput {
    /// Copy for a follow-up substep: held controls only
    pub fn held(&self) -> Self {
        Self {
            intents: self.intents.iter().map(|i| i.held()).collect(),
            restart: false,
        }
    }
}

/// Advance the scene by `dt` seconds
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    if input.restart {
        state.restart();
    }
    state.playtime += dt;

    for (seat, intent) in input.intents.iter().enumerate() {
        apply_intent(state, seat, intent, dt);
    }

    for seat in 0..state.seats.len() {
        let wants_fire = input.intents.get(seat).is_some_and(|i| i.fire);
        if state.auto_fire || wants_fire {
            state.fire(seat);
        }
    }

    advance(state, dt);
    place_crosshairs(state);
    resolve_hits(state);
}

fn apply_intent(state: &mut GameState, seat: usize, intent: &PlayerIntent, dt: f32) {
    let Some((body, player)) = state.player_mut(seat) else {
        return;
    };
    if intent.switch_aiming {
        player.switch_aiming(body);
    }
    if intent.switch_target {
        player.switch_target(body);
    }
    if intent.turn != 0.0 {
        player.turn(body, dt, intent.turn);
    }
    if intent.thrust != 0.0 {
        player.thrust(body, intent.thrust);
    }
    if intent.cannon != 0.0 {
        player.aim(body, dt, intent.cannon);
    }
}

/// Kinematics for every entity, then removal of whatever expired
fn advance(state: &mut GameState, dt: f32) {
    let rivals: Vec<Rival> = state
        .entities
        .iter()
        .filter(|e| e.body.is_alive() && !e.body.is_dormant())
        .filter_map(|e| {
            e.kind.as_player().map(|p| Rival {
                seat: p.seat,
                id: e.id,
                pos: e.body.pos,
            })
        })
        .collect();
    let arena = state.arena;
    let ctx = StepContext {
        dt,
        arena: &arena,
        rivals: &rivals,
    };

    let removals: Vec<(EntityId, Removal)> = state
        .entities
        .iter_mut()
        .filter_map(|e| e.update(&ctx).map(|r| (e.id, r)))
        .collect();
    state.remove(&removals);
}

/// Derive crosshair positions from their ships
fn place_crosshairs(state: &mut GameState) {
    let anchors: Vec<(EntityId, glam::Vec2, f32)> = state
        .entities
        .iter()
        .filter_map(|e| e.kind.as_player().map(|p| (e.id, e.body.pos, p.cannon_angle)))
        .collect();

    for entity in &mut state.entities {
        let Kind::Crosshair(crosshair) = &entity.kind else {
            continue;
        };
        let Some(boss) = entity.body.boss else {
            continue;
        };
        if let Some((_, pos, angle)) = anchors.iter().find(|(id, _, _)| *id == boss) {
            crosshair.place(&mut entity.body, *pos, *angle);
        }
    }
}

/// Apply beam damage; spent beams leave immediately, ships at zero
/// hitpoints leave on their next update
fn resolve_hits(state: &mut GameState) {
    let hits = find_beam_hits(&state.entities);
    if hits.is_empty() {
        return;
    }
    let debris_chance = state.tuning.beam.debris_chance;
    let mut spent = Vec::with_capacity(hits.len());

    for hit in hits {
        let Some(target) = state.get_mut(hit.player) else {
            continue;
        };
        target.body.hitpoints -= hit.damage;
        let hitpoints = target.body.hitpoints;
        log::debug!(
            "Seat {} hit by seat {} ({} hp left)",
            hit.seat,
            hit.shooter_seat,
            hitpoints
        );
        state.events.push(GameEvent::Hit {
            seat: hit.seat,
            by_seat: hit.shooter_seat,
            hitpoints,
        });

        if state.rng_mut().random_bool(debris_chance) {
            state.spray_debris(hit.point, hit.beam_vel, hit.beam_color);
        }
        spent.push((hit.beam, Removal::Spent));
    }

    state.remove(&spent);
}

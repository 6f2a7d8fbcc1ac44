//! Scene state: seats, the active entity collection and match bookkeeping

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::beam::Beam;
use super::effects::{Announcement, Bubble, Crosshair};
use super::entity::{Arena, Body, Color, EdgePolicy, Entity, EntityId, Kind, Removal, rgb};
use super::player::Player;
use crate::consts::{CORNER_INSET, MAX_SEATS};
use crate::settings::Settings;
use crate::tuning::Tuning;

/// Seat names, in seat order
pub const SEAT_NAMES: [&str; MAX_SEATS] = ["blue", "green", "red", "yellow"];

/// Seat colors, in seat order
pub const SEAT_COLORS: [Color; MAX_SEATS] = [
    rgb(128, 128, 255),
    rgb(0, 255, 0),
    rgb(255, 0, 0),
    rgb(255, 255, 0),
];

/// A player slot: survives the ship so input bindings and the HUD stay put
#[derive(Debug, Clone)]
pub struct Seat {
    pub name: &'static str,
    pub color: Color,
    /// Start corner
    pub spawn: Vec2,
    /// The ship, while it is alive
    pub player: Option<EntityId>,
}

/// Things that happened during a tick (drained by the frame loop)
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    Hit {
        seat: usize,
        by_seat: usize,
        hitpoints: f32,
    },
    PlayerDown {
        seat: usize,
    },
    Victory {
        seat: usize,
    },
    Restarted,
}

/// Complete scene state
#[derive(Debug, Clone)]
pub struct GameState {
    pub arena: Arena,
    pub tuning: Tuning,
    /// Every living player fires whenever the cannon is cool
    pub auto_fire: bool,
    pub seats: Vec<Seat>,
    /// Active entities (sorted by id)
    pub entities: Vec<Entity>,
    pub events: Vec<GameEvent>,
    /// Seconds since the match started
    pub playtime: f32,
    rng: Pcg32,
    next_id: EntityId,
}

impl GameState {
    /// Create a match from the settings with all seats spawned
    pub fn new(settings: &Settings, seed: u64) -> Self {
        let w = &settings.window;
        let arena = Arena::new(w.width as f32, w.height as f32, w.hud_height);
        let mut state = Self::with_arena(arena, settings.tuning.clone(), settings.players, seed);
        state.auto_fire = settings.auto_fire;
        state
    }

    /// Create a match on an arena with `seat_count` players (capped at 4)
    pub fn with_arena(arena: Arena, tuning: Tuning, seat_count: usize, seed: u64) -> Self {
        let corners = [
            Vec2::new(CORNER_INSET, CORNER_INSET),
            Vec2::new(arena.width - CORNER_INSET, CORNER_INSET),
            Vec2::new(CORNER_INSET, arena.height - CORNER_INSET),
            Vec2::new(arena.width - CORNER_INSET, arena.height - CORNER_INSET),
        ];
        let seats = (0..seat_count.min(MAX_SEATS))
            .map(|i| Seat {
                name: SEAT_NAMES[i],
                color: SEAT_COLORS[i],
                spawn: corners[i],
                player: None,
            })
            .collect();

        let mut state = Self {
            arena,
            tuning,
            auto_fire: true,
            seats,
            entities: Vec::new(),
            events: Vec::new(),
            playtime: 0.0,
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
        };
        state.spawn_seats();
        state
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> EntityId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Add an entity; ids only grow, so the collection stays sorted
    pub fn spawn(&mut self, body: Body, kind: Kind) -> EntityId {
        let id = self.next_entity_id();
        self.entities.push(Entity { id, body, kind });
        id
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities
            .binary_search_by_key(&id, |e| e.id)
            .ok()
            .map(|i| &self.entities[i])
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities
            .binary_search_by_key(&id, |e| e.id)
            .ok()
            .map(|i| &mut self.entities[i])
    }

    /// The ship sitting in a seat, if it is alive
    pub fn player(&self, seat: usize) -> Option<(&Body, &Player)> {
        let id = self.seats.get(seat)?.player?;
        let entity = self.get(id)?;
        entity.kind.as_player().map(|p| (&entity.body, p))
    }

    pub fn player_mut(&mut self, seat: usize) -> Option<(&mut Body, &mut Player)> {
        let id = self.seats.get(seat)?.player?;
        let entity = self.get_mut(id)?;
        match &mut entity.kind {
            Kind::Player(p) => Some((&mut entity.body, p)),
            _ => None,
        }
    }

    /// Seats whose ship is still in the game
    pub fn living_seats(&self) -> Vec<usize> {
        (0..self.seats.len())
            .filter(|s| self.player(*s).is_some_and(|(body, _)| body.is_alive()))
            .collect()
    }

    pub fn rng_mut(&mut self) -> &mut Pcg32 {
        &mut self.rng
    }

    /// Put a flytext on screen
    pub fn announce(&mut self, announcement: Announcement) -> EntityId {
        let (body, text) = announcement.into_parts();
        self.spawn(body, Kind::Flytext(text))
    }

    fn spawn_seats(&mut self) {
        for seat in 0..self.seats.len() {
            let (spawn, color) = (self.seats[seat].spawn, self.seats[seat].color);
            let tuning = self.tuning.player.clone();
            let body = Body::new(spawn, tuning.radius, color)
                .with_hitpoints(tuning.hitpoints)
                .with_edge(EdgePolicy::Clamp);
            let crosshair = Crosshair {
                distance: tuning.crosshair_distance,
            };
            let id = self.spawn(body, Kind::Player(Player::new(seat, tuning)));
            self.seats[seat].player = Some(id);

            let mut marker = Crosshair::body(id, spawn, color);
            crosshair.place(&mut marker, spawn, 0.0);
            self.spawn(marker, Kind::Crosshair(crosshair));
        }
        self.refresh_targets();
        log::info!("Spawned {} players", self.seats.len());
    }

    /// Clear the field and respawn every seat at its corner
    pub fn restart(&mut self) {
        self.entities.clear();
        for seat in &mut self.seats {
            seat.player = None;
        }
        self.spawn_seats();
        self.events.push(GameEvent::Restarted);
        log::info!("Match restarted");
    }

    /// Rebuild every player's target list from the living seats
    pub fn refresh_targets(&mut self) {
        let living = self.living_seats();
        for entity in &mut self.entities {
            if let Some(player) = entity.kind.as_player_mut() {
                player.refresh_targets(&living);
            }
        }
    }

    /// Fire the cannon of a seat; returns the new beam
    pub fn fire(&mut self, seat: usize) -> Option<EntityId> {
        let owner = self.seats.get(seat)?.player?;
        let color = self.seats[seat].color;
        let shot = {
            let (body, player) = self.player_mut(seat)?;
            player.fire(body)?
        };
        let body = Beam::launch(&shot, owner, color, &self.tuning.beam);
        let beam = Beam {
            owner,
            owner_seat: seat,
            damage: self.tuning.beam.damage,
        };
        Some(self.spawn(body, Kind::Beam(beam)))
    }

    /// Remove entities (and whatever is bound to them); defeated players
    /// trigger the end-of-life bookkeeping
    pub fn remove(&mut self, removals: &[(EntityId, Removal)]) {
        if removals.is_empty() {
            return;
        }
        let mut doomed: Vec<EntityId> = removals.iter().map(|(id, _)| *id).collect();
        // Followers of removed bosses go too, transitively
        loop {
            let followers: Vec<EntityId> = self
                .entities
                .iter()
                .filter(|e| {
                    e.body.kill_with_boss
                        && e.body.boss.is_some_and(|b| doomed.contains(&b))
                        && !doomed.contains(&e.id)
                })
                .map(|e| e.id)
                .collect();
            if followers.is_empty() {
                break;
            }
            doomed.extend(followers);
        }

        let mut defeated = Vec::new();
        for (id, reason) in removals {
            let Some(entity) = self.get(*id) else {
                continue;
            };
            if let Some(player) = entity.kind.as_player() {
                defeated.push((player.seat, entity.body.pos));
                log::debug!("Player {} removed ({:?})", player.seat, reason);
            }
        }

        self.entities.retain(|e| !doomed.contains(&e.id));

        if defeated.is_empty() {
            return;
        }
        for (seat, pos) in defeated {
            self.seats[seat].player = None;
            let name = self.seats[seat].name;
            let color = self.seats[seat].color;
            self.announce(
                Announcement::new(format!("Game over for {name} player"), pos)
                    .color(color)
                    .lasting(1.0),
            );
            self.events.push(GameEvent::PlayerDown { seat });
            log::info!("{name} player is out");
        }
        self.refresh_targets();
        self.check_victory();
    }

    fn check_victory(&mut self) {
        let survivors = self.living_seats();
        let [winner] = survivors.as_slice() else {
            return;
        };
        let winner = *winner;
        let name = self.seats[winner].name;
        let color = self.seats[winner].color;
        let (w, h) = (self.arena.width, self.arena.height);
        self.announce(
            Announcement::new(
                format!("Victory for {name} player!"),
                Vec2::new(w / 2.0, h - 50.0),
            )
            .color(color)
            .lasting(10.0)
            .font_size(33.0),
        );
        self.announce(
            Announcement::new("press r to restart the game", Vec2::new(w, 100.0))
                .velocity(Vec2::new(-5.0, 0.0))
                .lasting(30.0),
        );
        self.events.push(GameEvent::Victory { seat: winner });
        log::info!("Victory for {name} player");
    }

    /// Spray a debris bubble (cosmetic)
    pub fn spray_debris(&mut self, pos: Vec2, incoming: Vec2, color: Color) -> EntityId {
        let body = Bubble::spray(&mut self.rng, pos, incoming, color);
        self.spawn(body, Kind::Bubble(Bubble))
    }

    /// Entities in draw order (layer, then age of creation)
    pub fn draw_order(&self) -> Vec<&Entity> {
        let mut order: Vec<&Entity> = self
            .entities
            .iter()
            .filter(|e| !e.body.is_dormant())
            .collect();
        order.sort_by_key(|e| (e.body.layer, e.id));
        order
    }

    /// Take the events accumulated since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::player::Target;

    fn state(seats: usize) -> GameState {
        GameState::with_arena(Arena::new(1024.0, 800.0, 20.0), Tuning::default(), seats, 1)
    }

    #[test]
    fn test_new_spawns_players_and_crosshairs() {
        let s = state(4);
        assert_eq!(s.seats.len(), 4);
        assert_eq!(s.entities.len(), 8);
        assert_eq!(s.living_seats(), vec![0, 1, 2, 3]);
        let (body, player) = s.player(3).unwrap();
        assert_eq!(body.pos, Vec2::new(924.0, 700.0));
        assert_eq!(body.color, SEAT_COLORS[3]);
        assert_eq!(body.edge, EdgePolicy::Clamp);
        assert_eq!(
            player.targets,
            vec![Target::Nearest, Target::Seat(0), Target::Seat(1), Target::Seat(2)]
        );
    }

    #[test]
    fn test_seat_count_is_capped() {
        let s = state(9);
        assert_eq!(s.seats.len(), MAX_SEATS);
    }

    #[test]
    fn test_lookup_by_id() {
        let s = state(2);
        let id = s.seats[1].player.unwrap();
        assert_eq!(s.get(id).unwrap().id, id);
        assert!(s.get(999).is_none());
    }

    #[test]
    fn test_fire_spawns_owned_beam() {
        let mut s = state(2);
        let beam_id = s.fire(0).unwrap();
        let beam = s.get(beam_id).unwrap();
        let owner = s.seats[0].player.unwrap();
        assert_eq!(beam.kind.as_beam().unwrap().owner, owner);
        assert_eq!(beam.body.boss, Some(owner));
        assert!(!beam.body.kill_with_boss);
        // Cooldown blocks an immediate second shot
        assert!(s.fire(0).is_none());
    }

    #[test]
    fn test_removing_player_takes_crosshair() {
        let mut s = state(3);
        let id = s.seats[1].player.unwrap();
        s.remove(&[(id, Removal::Destroyed)]);
        assert!(s.seats[1].player.is_none());
        assert!(
            s.entities
                .iter()
                .all(|e| !matches!(e.kind, Kind::Crosshair(_)) || e.body.boss != Some(id))
        );
        assert_eq!(s.living_seats(), vec![0, 2]);
        let (_, player) = s.player(0).unwrap();
        assert_eq!(player.targets, vec![Target::Nearest, Target::Seat(2)]);
        assert!(s.events.contains(&GameEvent::PlayerDown { seat: 1 }));
        assert!(!s.events.iter().any(|e| matches!(e, GameEvent::Victory { .. })));
    }

    #[test]
    fn test_last_survivor_wins() {
        let mut s = state(2);
        let id = s.seats[0].player.unwrap();
        s.remove(&[(id, Removal::Destroyed)]);
        assert!(s.events.contains(&GameEvent::Victory { seat: 1 }));
        let texts: Vec<_> = s
            .entities
            .iter()
            .filter_map(|e| match &e.kind {
                Kind::Flytext(t) => Some(t.text.clone()),
                _ => None,
            })
            .collect();
        assert!(texts.contains(&"Game over for blue player".to_string()));
        assert!(texts.contains(&"Victory for green player!".to_string()));
        assert!(texts.contains(&"press r to restart the game".to_string()));
    }

    #[test]
    fn test_restart_respawns_everyone() {
        let mut s = state(4);
        let id = s.seats[2].player.unwrap();
        s.remove(&[(id, Removal::Destroyed)]);
        s.fire(0);
        s.restart();
        assert_eq!(s.living_seats(), vec![0, 1, 2, 3]);
        assert_eq!(s.entities.len(), 8);
        let (body, player) = s.player(2).unwrap();
        assert_eq!(body.pos, s.seats[2].spawn);
        assert_eq!(body.hitpoints, body.hitpoints_full);
        assert_eq!(player.targets.len(), 4);
        assert!(s.events.contains(&GameEvent::Restarted));
    }

    #[test]
    fn test_draw_order_layers() {
        let mut s = state(2);
        s.fire(0);
        let order = s.draw_order();
        let layers: Vec<u8> = order.iter().map(|e| e.body.layer).collect();
        let mut sorted = layers.clone();
        sorted.sort();
        assert_eq!(layers, sorted);
        assert!(matches!(order.last().unwrap().kind, Kind::Beam(_)));
    }
}

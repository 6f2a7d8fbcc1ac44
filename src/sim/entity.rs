//! Entity data and the per-tick kinematic update
//!
//! Every visible object is a [`Body`] (shared kinematic data) paired with a
//! [`Kind`] carrying the behavior-specific state. Kind-specific steering is
//! dispatched through the [`Behavior`] trait.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::beam::Beam;
use super::effects::{Bubble, Crosshair, Flytext};
use super::player::Player;
use crate::consts::LAYER_BASE;
use crate::normalize_degrees;

/// Stable entity identifier (allocation order)
pub type EntityId = u32;

/// Linear RGBA color
pub type Color = [f32; 4];

/// Color from 8-bit channels
pub const fn rgb(r: u8, g: u8, b: u8) -> Color {
    [r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, 1.0]
}

/// What happens when an entity crosses the playfield edge
///
/// Applied to each axis independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EdgePolicy {
    /// No constraint
    #[default]
    Ignore,
    /// Pin the coordinate to the edge
    Clamp,
    /// Pin the coordinate and reverse that velocity component
    Bounce,
    /// Remove the entity
    Remove,
    /// Reappear at the opposite edge
    Wrap,
}

/// The playfield rectangle (below the HUD strip)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Arena {
    pub width: f32,
    pub height: f32,
    /// Top edge of the playfield (HUD height)
    pub top: f32,
}

impl Arena {
    pub fn new(width: f32, height: f32, hud_height: f32) -> Self {
        Self {
            width,
            height,
            top: hud_height,
        }
    }

    #[inline]
    pub fn min(&self) -> Vec2 {
        Vec2::new(0.0, self.top)
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    pub fn contains(&self, p: Vec2) -> bool {
        p.cmpge(self.min()).all() && p.cmple(self.max()).all()
    }
}

/// Why an entity left the active collection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Removal {
    /// Hitpoints reached zero
    Destroyed,
    /// Older than its max age
    Expired,
    /// Traveled farther than its max distance
    OutOfRange,
    /// Crossed an edge with [`EdgePolicy::Remove`]
    OffEdge,
    /// Hit something (beams)
    Spent,
    /// Its boss was removed
    BossGone,
}

/// Kinematic and lifetime state shared by every entity
#[derive(Debug, Clone)]
pub struct Body {
    pub pos: Vec2,
    /// Velocity in pixels per second
    pub vel: Vec2,
    /// Heading in degrees, [0, 360), clockwise on screen
    pub angle: f32,
    pub hitpoints: f32,
    pub hitpoints_full: f32,
    pub radius: f32,
    /// Seconds alive; negative means waiting to appear
    pub age: f32,
    pub max_age: Option<f32>,
    pub max_distance: Option<f32>,
    pub distance_traveled: f32,
    pub edge: EdgePolicy,
    pub color: Color,
    /// Owning entity
    pub boss: Option<EntityId>,
    /// Remove together with the boss
    pub kill_with_boss: bool,
    /// Draw order (higher draws later)
    pub layer: u8,
}

impl Body {
    pub fn new(pos: Vec2, radius: f32, color: Color) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            angle: 0.0,
            hitpoints: 100.0,
            hitpoints_full: 100.0,
            radius,
            age: 0.0,
            max_age: None,
            max_distance: None,
            distance_traveled: 0.0,
            edge: EdgePolicy::Ignore,
            color,
            boss: None,
            kill_with_boss: false,
            layer: LAYER_BASE,
        }
    }

    pub fn with_velocity(mut self, vel: Vec2) -> Self {
        self.vel = vel;
        self
    }

    pub fn with_angle(mut self, degrees: f32) -> Self {
        self.set_angle(degrees);
        self
    }

    /// Set both current and full hitpoints
    pub fn with_hitpoints(mut self, hitpoints: f32) -> Self {
        self.hitpoints = hitpoints;
        self.hitpoints_full = hitpoints;
        self
    }

    pub fn with_max_age(mut self, seconds: f32) -> Self {
        self.max_age = Some(seconds);
        self
    }

    pub fn with_max_distance(mut self, pixels: f32) -> Self {
        self.max_distance = Some(pixels);
        self
    }

    pub fn with_edge(mut self, edge: EdgePolicy) -> Self {
        self.edge = edge;
        self
    }

    pub fn with_boss(mut self, boss: EntityId, kill_with_boss: bool) -> Self {
        self.boss = Some(boss);
        self.kill_with_boss = kill_with_boss;
        self
    }

    /// Start with a spawn delay (negative age)
    pub fn with_delay(mut self, seconds: f32) -> Self {
        self.age = -seconds.abs();
        self
    }

    pub fn with_layer(mut self, layer: u8) -> Self {
        self.layer = layer;
        self
    }

    /// Still waiting to appear
    #[inline]
    pub fn is_dormant(&self) -> bool {
        self.age < 0.0
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.hitpoints > 0.0
    }

    /// Fraction of hitpoints left, in [0, 1]
    pub fn health(&self) -> f32 {
        if self.hitpoints_full <= 0.0 {
            return 0.0;
        }
        (self.hitpoints / self.hitpoints_full).clamp(0.0, 1.0)
    }

    /// Fraction of lifetime left (1.0 for immortal entities)
    pub fn remaining_life(&self) -> f32 {
        match self.max_age {
            Some(max) if max > 0.0 => (1.0 - self.age / max).clamp(0.0, 1.0),
            _ => 1.0,
        }
    }

    /// Turn by a number of degrees
    pub fn rotate(&mut self, by_degrees: f32) {
        self.angle = normalize_degrees(self.angle + by_degrees);
    }

    pub fn set_angle(&mut self, degrees: f32) {
        self.angle = normalize_degrees(degrees);
    }

    /// Accumulate traveled distance and check health and lifetime limits
    pub fn verdict(&mut self, dt: f32) -> Option<Removal> {
        self.distance_traveled += self.vel.length() * dt;
        if self.hitpoints <= 0.0 {
            return Some(Removal::Destroyed);
        }
        if self.max_age.is_some_and(|max| self.age > max) {
            return Some(Removal::Expired);
        }
        if self
            .max_distance
            .is_some_and(|max| self.distance_traveled > max)
        {
            return Some(Removal::OutOfRange);
        }
        None
    }

    /// Exact linear integration: pos += vel * dt
    #[inline]
    pub fn integrate(&mut self, dt: f32) {
        self.pos += self.vel * dt;
    }

    /// Apply the edge policy to both axes independently
    pub fn apply_edges(&mut self, arena: &Arena) -> Option<Removal> {
        let min = arena.min();
        let max = arena.max();
        let x = apply_axis(self.edge, &mut self.pos.x, &mut self.vel.x, min.x, max.x);
        let y = apply_axis(self.edge, &mut self.pos.y, &mut self.vel.y, min.y, max.y);
        x.or(y)
    }
}

fn apply_axis(policy: EdgePolicy, p: &mut f32, v: &mut f32, lo: f32, hi: f32) -> Option<Removal> {
    let (edge, opposite) = if *p < lo {
        (lo, hi)
    } else if *p > hi {
        (hi, lo)
    } else {
        return None;
    };
    match policy {
        EdgePolicy::Ignore => None,
        EdgePolicy::Clamp => {
            *p = edge;
            None
        }
        EdgePolicy::Bounce => {
            *p = edge;
            *v = -*v;
            None
        }
        EdgePolicy::Remove => Some(Removal::OffEdge),
        EdgePolicy::Wrap => {
            *p = opposite;
            None
        }
    }
}

/// A living opponent, as seen by the aiming logic
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rival {
    pub seat: usize,
    pub id: EntityId,
    pub pos: Vec2,
}

/// Read-only world view handed to behaviors during an update
#[derive(Debug, Clone, Copy)]
pub struct StepContext<'a> {
    pub dt: f32,
    pub arena: &'a Arena,
    /// Every living player (including the one being updated)
    pub rivals: &'a [Rival],
}

/// Kind-specific update hooks
pub trait Behavior {
    /// Adjust the body before it is integrated
    fn steer(&mut self, _body: &mut Body, _ctx: &StepContext<'_>) {}

    /// Whether the body moves by its own velocity; followers return false
    fn free_flight(&self) -> bool {
        true
    }
}

/// Behavior-specific state
#[derive(Debug, Clone)]
pub enum Kind {
    Player(Player),
    Beam(Beam),
    Crosshair(Crosshair),
    Flytext(Flytext),
    Bubble(Bubble),
}

impl Kind {
    fn behavior_mut(&mut self) -> &mut dyn Behavior {
        match self {
            Kind::Player(p) => p,
            Kind::Beam(b) => b,
            Kind::Crosshair(c) => c,
            Kind::Flytext(f) => f,
            Kind::Bubble(b) => b,
        }
    }

    pub fn as_player(&self) -> Option<&Player> {
        match self {
            Kind::Player(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_player_mut(&mut self) -> Option<&mut Player> {
        match self {
            Kind::Player(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_beam(&self) -> Option<&Beam> {
        match self {
            Kind::Beam(b) => Some(b),
            _ => None,
        }
    }
}

/// A game object in the active collection
#[derive(Debug, Clone)]
pub struct Entity {
    pub id: EntityId,
    pub body: Body,
    pub kind: Kind,
}

impl Entity {
    /// Advance one tick; returns why the entity must leave, if it must
    ///
    /// Limits are checked before moving, so an entity that crosses a limit
    /// during this tick is removed on the next one.
    pub fn update(&mut self, ctx: &StepContext<'_>) -> Option<Removal> {
        self.body.age += ctx.dt;
        if self.body.is_dormant() {
            return None;
        }
        let verdict = self.body.verdict(ctx.dt);

        let behavior = self.kind.behavior_mut();
        behavior.steer(&mut self.body, ctx);
        if !behavior.free_flight() {
            return verdict;
        }
        self.body.integrate(ctx.dt);
        let edge = self.body.apply_edges(ctx.arena);
        verdict.or(edge)
    }
}

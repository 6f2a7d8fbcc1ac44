//! Cosmetic entities: crosshairs, flying text and impact debris

use glam::Vec2;
use rand::Rng;

use super::entity::{Behavior, Body, Color, EdgePolicy, EntityId, StepContext, rgb};
use crate::consts::{LAYER_BASE, LAYER_OVERLAY};
use crate::heading;

/// Marks where a player's cannon points
///
/// Never simulated on its own: the scene places it every tick from the
/// boss position and cannon angle.
#[derive(Debug, Clone)]
pub struct Crosshair {
    /// Distance from the boss center
    pub distance: f32,
}

impl Crosshair {
    pub const RADIUS: f32 = 15.0;

    pub fn body(boss: EntityId, boss_pos: Vec2, color: Color) -> Body {
        Body::new(boss_pos, Self::RADIUS, color)
            .with_boss(boss, true)
            .with_layer(LAYER_BASE)
    }

    /// Put the crosshair in front of the cannon
    pub fn place(&self, body: &mut Body, boss_pos: Vec2, cannon_angle: f32) {
        body.pos = boss_pos + heading(cannon_angle) * self.distance;
        body.vel = Vec2::ZERO;
    }
}

impl Behavior for Crosshair {
    fn free_flight(&self) -> bool {
        false
    }
}

/// A short-lived label drifting across the screen
#[derive(Debug, Clone)]
pub struct Flytext {
    pub text: String,
    pub font_size: f32,
    /// Velocity multiplier per update (below 1 slows down, above 1 speeds up)
    pub acceleration: f32,
}

impl Behavior for Flytext {
    fn steer(&mut self, body: &mut Body, _ctx: &StepContext<'_>) {
        body.vel *= self.acceleration;
    }
}

/// Everything needed to put a [`Flytext`] on screen
#[derive(Debug, Clone)]
pub struct Announcement {
    pub text: String,
    pub pos: Vec2,
    pub vel: Vec2,
    pub color: Color,
    /// Seconds on screen
    pub max_age: f32,
    pub font_size: f32,
    pub acceleration: f32,
}

impl Announcement {
    pub fn new(text: impl Into<String>, pos: Vec2) -> Self {
        Self {
            text: text.into(),
            pos,
            vel: Vec2::new(0.0, -50.0),
            color: rgb(255, 0, 0),
            max_age: 2.0,
            font_size: 22.0,
            acceleration: 1.0,
        }
    }

    pub fn color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn velocity(mut self, vel: Vec2) -> Self {
        self.vel = vel;
        self
    }

    pub fn lasting(mut self, seconds: f32) -> Self {
        self.max_age = seconds;
        self
    }

    pub fn font_size(mut self, size: f32) -> Self {
        self.font_size = size;
        self
    }

    /// Velocity factor applied every update; below 1 slows the text down
    pub fn accelerating(mut self, factor: f32) -> Self {
        self.acceleration = factor;
        self
    }

    pub fn into_parts(self) -> (Body, Flytext) {
        let body = Body::new(self.pos, self.font_size / 2.0, self.color)
            .with_velocity(self.vel)
            .with_max_age(self.max_age)
            .with_layer(LAYER_OVERLAY);
        let text = Flytext {
            text: self.text,
            font_size: self.font_size,
            acceleration: self.acceleration,
        };
        (body, text)
    }
}

/// Round debris sprayed back from a beam impact
#[derive(Debug, Clone, Copy)]
pub struct Bubble;

impl Bubble {
    /// Body for one debris particle flying back against `incoming`
    pub fn spray(rng: &mut impl Rng, pos: Vec2, incoming: Vec2, color: Color) -> Body {
        let back = (-incoming).normalize_or(Vec2::X);
        let spread = rng.random_range(-20.0f32..=20.0).to_radians();
        let speed = rng.random_range(60.0f32..=160.0);
        let vel = Vec2::from_angle(spread).rotate(back) * speed;

        let mut tint = color;
        for channel in tint.iter_mut().take(3) {
            *channel = (*channel + rng.random_range(-30.0f32..=30.0) / 255.0).clamp(0.0, 1.0);
        }

        Body::new(pos, rng.random_range(1..=5) as f32, tint)
            .with_velocity(vel)
            .with_max_age(2.0 + rng.random::<f32>() * 2.4)
            .with_edge(EdgePolicy::Remove)
            .with_layer(LAYER_BASE)
    }
}

impl Behavior for Bubble {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entity::{Arena, Entity, Kind};
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_crosshair_placement() {
        let crosshair = Crosshair { distance: 85.0 };
        let mut body = Crosshair::body(1, Vec2::ZERO, rgb(0, 255, 0));
        crosshair.place(&mut body, Vec2::new(100.0, 100.0), 90.0);
        assert!((body.pos - Vec2::new(100.0, 185.0)).length() < 1e-3);
        assert!(body.kill_with_boss);
    }

    #[test]
    fn test_crosshair_is_not_simulated() {
        let arena = Arena::new(800.0, 600.0, 20.0);
        let mut e = Entity {
            id: 2,
            body: Crosshair::body(1, Vec2::new(50.0, 50.0), rgb(0, 255, 0))
                .with_velocity(Vec2::new(100.0, 0.0)),
            kind: Kind::Crosshair(Crosshair { distance: 85.0 }),
        };
        e.update(&StepContext { dt: 1.0, arena: &arena, rivals: &[] });
        assert_eq!(e.body.pos, Vec2::new(50.0, 50.0));
    }

    #[test]
    fn test_flytext_drifts_and_accelerates() {
        let arena = Arena::new(800.0, 600.0, 20.0);
        let (body, text) = Announcement::new("hallo", Vec2::new(400.0, 300.0))
            .lasting(1.0)
            .accelerating(0.5)
            .into_parts();
        assert_eq!(text.acceleration, 0.5);
        let mut e = Entity {
            id: 1,
            body,
            kind: Kind::Flytext(text),
        };
        let ctx = StepContext { dt: 0.5, arena: &arena, rivals: &[] };
        assert_eq!(e.update(&ctx), None);
        assert_eq!(e.body.vel, Vec2::new(0.0, -25.0));
        assert_eq!(e.body.pos, Vec2::new(400.0, 287.5));
        assert_eq!(e.update(&ctx), None);
        assert!(e.update(&ctx).is_some());
    }

    #[test]
    fn test_debris_flies_backward() {
        let mut rng = Pcg32::seed_from_u64(7);
        for _ in 0..50 {
            let body = Bubble::spray(
                &mut rng,
                Vec2::new(10.0, 10.0),
                Vec2::new(150.0, 0.0),
                rgb(255, 0, 0),
            );
            let speed = body.vel.length();
            assert!((60.0 - 1e-3..=160.0 + 1e-3).contains(&speed));
            // Within 20 degrees of straight back
            let angle = body.vel.y.atan2(body.vel.x).to_degrees().abs();
            assert!(angle >= 160.0 - 1e-3, "angle {angle}");
            assert!((1.0..=5.0).contains(&body.radius));
            assert!(body.max_age.is_some_and(|a| (2.0..=4.4).contains(&a)));
            assert!(body.color.iter().all(|c| (0.0..=1.0).contains(c)));
        }
    }
}

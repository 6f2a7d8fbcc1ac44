//! Player ships: hull control, cannon aiming and firing

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entity::{Behavior, Body, Rival, StepContext};
use crate::tuning::PlayerTuning;
use crate::{bearing, heading, normalize_degrees};

/// How the cannon angle is driven
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AimingMode {
    /// Manual cannon control; hull turns leave the cannon alone
    #[default]
    Free,
    /// Cannon follows the hull heading
    Forward,
    /// Manual cannon control; hull turns carry the cannon along
    Fixed,
    /// Cannon tracks the selected target every update
    Locked,
}

impl AimingMode {
    /// Cycle order used by [`AimingMode::next`]
    pub const ALL: [AimingMode; 4] = [
        AimingMode::Free,
        AimingMode::Forward,
        AimingMode::Fixed,
        AimingMode::Locked,
    ];

    pub fn next(self) -> Self {
        let i = Self::ALL.iter().position(|m| *m == self).unwrap_or(0);
        Self::ALL[(i + 1) % Self::ALL.len()]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AimingMode::Free => "free",
            AimingMode::Forward => "forward",
            AimingMode::Fixed => "fixed",
            AimingMode::Locked => "locked",
        }
    }

    /// Whether manual cannon input has any effect
    pub fn manual_cannon(&self) -> bool {
        matches!(self, AimingMode::Free | AimingMode::Fixed)
    }
}

/// Who a locked cannon points at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Target {
    /// Whichever living opponent is closest
    #[default]
    Nearest,
    /// A specific seat
    Seat(usize),
}

/// A beam request produced by a successful trigger pull
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shot {
    pub origin: Vec2,
    /// Cannon angle in degrees
    pub angle: f32,
}

/// Player-specific entity state
#[derive(Debug, Clone)]
pub struct Player {
    /// Seat index (input binding, color, HUD column)
    pub seat: usize,
    /// Cannon heading in degrees, [0, 360)
    pub cannon_angle: f32,
    pub aiming: AimingMode,
    pub target: Target,
    /// `Nearest` followed by every other living seat
    pub targets: Vec<Target>,
    /// Age at the last shot
    pub last_shot: Option<f32>,
    pub tuning: PlayerTuning,
}

impl Player {
    pub fn new(seat: usize, tuning: PlayerTuning) -> Self {
        Self {
            seat,
            cannon_angle: 0.0,
            aiming: AimingMode::Free,
            target: Target::Nearest,
            targets: vec![Target::Nearest],
            last_shot: None,
            tuning,
        }
    }

    /// Advance to the next aiming mode (wraps)
    pub fn switch_aiming(&mut self, body: &Body) {
        if !body.is_alive() {
            return;
        }
        self.aiming = self.aiming.next();
        // Re-aim instantly instead of waiting for the next hull turn
        if self.aiming == AimingMode::Forward {
            self.cannon_angle = body.angle;
        }
    }

    /// Advance to the next entry of the target list (wraps)
    pub fn switch_target(&mut self, body: &Body) {
        if !body.is_alive() {
            return;
        }
        self.target = match self.targets.iter().position(|t| *t == self.target) {
            Some(i) => self.targets[(i + 1) % self.targets.len()],
            None => self.targets.first().copied().unwrap_or_default(),
        };
    }

    /// Rebuild the target list from the seats still alive
    pub fn refresh_targets(&mut self, living_seats: &[usize]) {
        self.targets = std::iter::once(Target::Nearest)
            .chain(
                living_seats
                    .iter()
                    .filter(|s| **s != self.seat)
                    .map(|s| Target::Seat(*s)),
            )
            .collect();
        if !self.targets.contains(&self.target) {
            self.target = Target::Nearest;
        }
    }

    /// Turn the hull; positive factor turns clockwise
    pub fn turn(&mut self, body: &mut Body, dt: f32, factor: f32) {
        if !body.is_alive() {
            return;
        }
        let degrees = self.tuning.turn_speed * factor * dt;
        body.rotate(degrees);
        match self.aiming {
            AimingMode::Free | AimingMode::Locked => {}
            AimingMode::Forward => self.cannon_angle = body.angle,
            AimingMode::Fixed => self.cannon_angle = normalize_degrees(self.cannon_angle + degrees),
        }
    }

    /// Set velocity along the hull; negative factor backs up at half speed
    pub fn thrust(&mut self, body: &mut Body, factor: f32) {
        if !body.is_alive() || factor == 0.0 {
            return;
        }
        let speed = if factor > 0.0 {
            self.tuning.move_speed
        } else {
            self.tuning.move_speed / 2.0
        };
        body.vel = heading(body.angle) * speed * factor;
    }

    /// Turn the cannon by hand (free and fixed modes only)
    pub fn aim(&mut self, body: &Body, dt: f32, factor: f32) {
        if !body.is_alive() || !self.aiming.manual_cannon() {
            return;
        }
        self.cannon_angle =
            normalize_degrees(self.cannon_angle + self.tuning.cannon_turn_speed * factor * dt);
    }

    /// Whether the reload cooldown has passed
    pub fn is_cool(&self, body: &Body) -> bool {
        self.last_shot
            .is_none_or(|last| body.age >= last + self.tuning.reload_time)
    }

    /// Pull the trigger; returns the shot if the cannon was ready
    pub fn fire(&mut self, body: &Body) -> Option<Shot> {
        if !body.is_alive() || body.is_dormant() || !self.is_cool(body) {
            return None;
        }
        self.last_shot = Some(body.age);
        Some(Shot {
            origin: body.pos,
            angle: self.cannon_angle,
        })
    }

    /// Position of the selected target among the rivals
    pub fn resolve_target(&self, pos: Vec2, rivals: &[Rival]) -> Option<Vec2> {
        let mut others = rivals.iter().filter(|r| r.seat != self.seat);
        match self.target {
            Target::Nearest => others
                .min_by(|a, b| a.pos.distance(pos).total_cmp(&b.pos.distance(pos)))
                .map(|r| r.pos),
            Target::Seat(seat) => others.find(|r| r.seat == seat).map(|r| r.pos),
        }
    }

    /// Point the cannon at the selected target, if it is around
    pub fn lock_on(&mut self, body: &Body, rivals: &[Rival]) {
        if !body.is_alive() {
            return;
        }
        if let Some(target) = self.resolve_target(body.pos, rivals) {
            self.cannon_angle = bearing(body.pos, target);
        }
    }
}

impl Behavior for Player {
    fn steer(&mut self, body: &mut Body, ctx: &StepContext<'_>) {
        body.vel *= self.tuning.friction;
        if self.aiming == AimingMode::Locked {
            self.lock_on(body, ctx.rivals);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entity::rgb;

    fn ship() -> (Body, Player) {
        let tuning = PlayerTuning::default();
        let body = Body::new(Vec2::new(100.0, 100.0), tuning.radius, rgb(0, 0, 255))
            .with_hitpoints(tuning.hitpoints);
        (body, Player::new(0, tuning))
    }

    #[test]
    fn test_aiming_cycle_wraps() {
        let (body, mut player) = ship();
        let seen: Vec<_> = (0..5)
            .map(|_| {
                player.switch_aiming(&body);
                player.aiming
            })
            .collect();
        assert_eq!(
            seen,
            vec![
                AimingMode::Forward,
                AimingMode::Fixed,
                AimingMode::Locked,
                AimingMode::Free,
                AimingMode::Forward
            ]
        );
    }

    #[test]
    fn test_forward_snaps_cannon() {
        let (mut body, mut player) = ship();
        body.set_angle(45.0);
        player.cannon_angle = 200.0;
        player.switch_aiming(&body);
        assert_eq!(player.aiming, AimingMode::Forward);
        assert_eq!(player.cannon_angle, 45.0);
        player.turn(&mut body, 1.0, 1.0);
        assert_eq!(body.angle, 135.0);
        assert_eq!(player.cannon_angle, 135.0);
    }

    #[test]
    fn test_fixed_turns_cannon_with_hull() {
        let (mut body, mut player) = ship();
        player.aiming = AimingMode::Fixed;
        player.cannon_angle = 10.0;
        player.turn(&mut body, 0.5, -1.0);
        assert_eq!(body.angle, 315.0);
        assert_eq!(player.cannon_angle, 325.0);
    }

    #[test]
    fn test_free_cannon_ignores_hull() {
        let (mut body, mut player) = ship();
        player.cannon_angle = 10.0;
        player.turn(&mut body, 1.0, 1.0);
        assert_eq!(player.cannon_angle, 10.0);
        player.aim(&body, 0.1, 1.0);
        assert!((player.cannon_angle - 25.0).abs() < 1e-4);
    }

    #[test]
    fn test_manual_aim_ignored_when_automatic() {
        let (body, mut player) = ship();
        player.aiming = AimingMode::Locked;
        player.aim(&body, 1.0, 1.0);
        assert_eq!(player.cannon_angle, 0.0);
        player.aiming = AimingMode::Forward;
        player.aim(&body, 1.0, 1.0);
        assert_eq!(player.cannon_angle, 0.0);
    }

    #[test]
    fn test_reload_cooldown() {
        let (mut body, mut player) = ship();
        body.age = 1.0;
        assert!(player.fire(&body).is_some());
        body.age = 1.1;
        assert!(player.fire(&body).is_none());
        body.age = 1.2;
        assert!(player.fire(&body).is_some());
        assert_eq!(player.last_shot, Some(1.2));
    }

    #[test]
    fn test_dead_player_ignores_commands() {
        let (mut body, mut player) = ship();
        body.hitpoints = 0.0;
        player.switch_aiming(&body);
        assert_eq!(player.aiming, AimingMode::Free);
        player.turn(&mut body, 1.0, 1.0);
        assert_eq!(body.angle, 0.0);
        player.thrust(&mut body, 1.0);
        assert_eq!(body.vel, Vec2::ZERO);
        assert!(player.fire(&body).is_none());
    }

    #[test]
    fn test_thrust_backward_is_half_speed() {
        let (mut body, mut player) = ship();
        player.thrust(&mut body, 1.0);
        assert!((body.vel - Vec2::new(100.0, 0.0)).length() < 1e-4);
        player.thrust(&mut body, -1.0);
        assert!((body.vel - Vec2::new(-50.0, 0.0)).length() < 1e-4);
        body.set_angle(90.0);
        player.thrust(&mut body, 0.5);
        assert!((body.vel - Vec2::new(0.0, 50.0)).length() < 1e-3);
    }

    #[test]
    fn test_target_cycle_and_refresh() {
        let (body, mut player) = ship();
        player.refresh_targets(&[0, 1, 2, 3]);
        assert_eq!(
            player.targets,
            vec![Target::Nearest, Target::Seat(1), Target::Seat(2), Target::Seat(3)]
        );
        player.switch_target(&body);
        player.switch_target(&body);
        assert_eq!(player.target, Target::Seat(2));

        // Seat 2 is gone: list shrinks and the stale target falls back
        player.refresh_targets(&[0, 1, 3]);
        assert_eq!(player.target, Target::Nearest);
        player.switch_target(&body);
        player.switch_target(&body);
        assert_eq!(player.target, Target::Seat(3));
        player.switch_target(&body);
        assert_eq!(player.target, Target::Nearest);
    }

    #[test]
    fn test_switch_from_unknown_target_picks_first() {
        let (body, mut player) = ship();
        player.refresh_targets(&[0, 1]);
        player.target = Target::Seat(3);
        player.switch_target(&body);
        assert_eq!(player.target, Target::Nearest);
    }

    #[test]
    fn test_lock_on_nearest_and_seat() {
        let (body, mut player) = ship();
        let rivals = [
            Rival { seat: 0, id: 1, pos: body.pos },
            Rival { seat: 1, id: 3, pos: Vec2::new(100.0, 300.0) },
            Rival { seat: 2, id: 5, pos: Vec2::new(150.0, 100.0) },
        ];
        player.aiming = AimingMode::Locked;
        player.lock_on(&body, &rivals);
        assert!(player.cannon_angle.abs() < 1e-3);

        player.target = Target::Seat(1);
        player.lock_on(&body, &rivals);
        assert!((player.cannon_angle - 90.0).abs() < 1e-3);

        // Missing target leaves the cannon where it was
        player.target = Target::Seat(3);
        player.lock_on(&body, &rivals);
        assert!((player.cannon_angle - 90.0).abs() < 1e-3);
    }
}

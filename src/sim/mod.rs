//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Caller-supplied timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod beam;
pub mod collision;
pub mod effects;
pub mod entity;
pub mod player;
pub mod state;
pub mod tick;

pub use beam::{BEAM_LENGTH, Beam};
pub use collision::{Hit, circles_overlap, find_beam_hits};
pub use effects::{Announcement, Bubble, Crosshair, Flytext};
pub use entity::{Arena, Body, Color, EdgePolicy, Entity, EntityId, Kind, Removal, rgb};
pub use player::{AimingMode, Player, Target};
pub use state::{GameEvent, GameState, SEAT_COLORS, SEAT_NAMES, Seat};
pub use tick::{PlayerIntent, TickInput, tick};

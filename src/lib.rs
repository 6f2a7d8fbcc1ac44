//! Vector Duel - local multiplayer spaceship duel
//!
//! Core modules:
//! - `sim`: Game simulation (entities, aiming, beams, collisions)
//! - `renderer`: wgpu rendering of the scene and HUD
//! - `platform`: Keyboard and joystick input mapping
//! - `settings`: Window, seat and tuning configuration
//! - `tuning`: Data-driven game balance

pub mod app;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use settings::{ConfigError, Settings};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame time fed to the accumulator (seconds)
    pub const MAX_FRAME_TIME: f32 = 0.25;

    /// Number of seats the scene supports
    pub const MAX_SEATS: usize = 4;
    /// Start corners are inset this far from the screen corners
    pub const CORNER_INSET: f32 = 100.0;

    /// Draw layer for ships, crosshairs and debris
    pub const LAYER_BASE: u8 = 0;
    /// Draw layer for beams and flytext (above ships)
    pub const LAYER_OVERLAY: u8 = 7;
}

/// Normalize an angle in degrees to [0, 360)
#[inline]
pub fn normalize_degrees(angle: f32) -> f32 {
    let a = angle.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if a >= 360.0 { 0.0 } else { a }
}

/// Unit vector for a heading in degrees (screen space, y points down)
#[inline]
pub fn heading(degrees: f32) -> Vec2 {
    Vec2::from_angle(degrees.to_radians())
}

/// Heading in degrees [0, 360) pointing from `from` toward `to`
#[inline]
pub fn bearing(from: Vec2, to: Vec2) -> f32 {
    let d = to - from;
    normalize_degrees(d.y.atan2(d.x).to_degrees())
}

//! Hitpoint bars along the top strip and the FPS counter

use glam::Vec2;

use super::font::{self, Anchor};
use super::shapes;
use super::vertex::{Vertex, colors};
use crate::sim::{AimingMode, Body, GameState, Player, SEAT_NAMES, Target};

const LABEL_FONT_SIZE: f32 = 10.0;
const LABEL_OFFSET: Vec2 = Vec2::new(50.0, 5.0);
const FPS_FONT_SIZE: f32 = 14.0;

/// Display name of a target
pub fn target_name(target: Target) -> &'static str {
    match target {
        Target::Nearest => "nearest",
        Target::Seat(seat) => SEAT_NAMES.get(seat).copied().unwrap_or("?"),
    }
}

/// Text shown in a seat's HUD column
pub fn hud_label(ship: Option<(&Body, &Player)>) -> String {
    let Some((_, player)) = ship.filter(|(body, _)| body.is_alive()) else {
        return "Game Over".to_string();
    };
    let target = target_name(player.target);
    match player.aiming {
        AimingMode::Locked => format!("locked --> {target}"),
        mode => format!("{}  ({target})", mode.as_str()),
    }
}

/// Bars, borders and labels for every seat
pub fn seat_bars(state: &GameState) -> Vec<Vertex> {
    let seats = state.seats.len();
    if seats == 0 {
        return Vec::new();
    }
    let hud_height = state.arena.top;
    let column = state.arena.width / seats as f32;
    let mut vertices = Vec::new();

    for (i, seat) in state.seats.iter().enumerate() {
        let left = i as f32 * column;
        let ship = state.player(i);
        let health = ship.map_or(0.0, |(body, _)| body.health());

        let fill_width = column * health - 2.0;
        if fill_width > 0.0 {
            let min = Vec2::new(left + 1.0, 1.0);
            vertices.extend(shapes::rect(
                min,
                min + Vec2::new(fill_width, hud_height - 1.0),
                seat.color,
            ));
        }
        vertices.extend(shapes::rect_outline(
            Vec2::new(left, 0.0),
            Vec2::new(left + column, hud_height),
            1.0,
            colors::BLACK,
        ));

        let label = hud_label(ship);
        let pos = Vec2::new(left, 0.0) + LABEL_OFFSET;
        let room = column - LABEL_OFFSET.x - 2.0;
        let size = font::measure(&label, LABEL_FONT_SIZE);
        if size.x <= room {
            vertices.extend(font::text(&label, pos, LABEL_FONT_SIZE, Anchor::TopLeft, colors::BLACK));
        } else {
            // Squeeze into narrow columns
            match font::fit(&label, pos, Vec2::new(room, size.y), Anchor::TopLeft, colors::BLACK) {
                Ok(quads) => vertices.extend(quads),
                Err(e) => log::warn!("HUD label for seat {i} skipped: {e}"),
            }
        }
    }
    vertices
}

/// Frames-per-second counter in the bottom-right corner
pub fn fps_counter(fps: f32, width: f32, height: f32) -> Vec<Vertex> {
    font::text(
        &format!("{fps:.0} fps"),
        Vec2::new(width - 5.0, height - 5.0),
        FPS_FONT_SIZE,
        Anchor::BottomRight,
        colors::FPS_TEXT,
    )
}

//! Scene tessellation: every visible entity plus the HUD, in draw order

use super::font::{self, Anchor};
use super::hud;
use super::shapes;
use super::vertex::{Vertex, colors};
use crate::heading;
use crate::sim::{BEAM_LENGTH, Entity, GameState, Kind};

const BEAM_WIDTH: f32 = 3.0;

/// Vertices for one entity
pub fn entity_vertices(entity: &Entity) -> Vec<Vertex> {
    let body = &entity.body;
    match &entity.kind {
        Kind::Player(_) => shapes::ship(body.pos, body.angle, body.radius, body.color),
        Kind::Beam(_) => {
            let half = heading(body.angle) * (BEAM_LENGTH / 2.0);
            shapes::line(body.pos - half, body.pos + half, BEAM_WIDTH, body.color)
        }
        Kind::Crosshair(_) => shapes::crosshair(body.pos, body.radius, body.color, colors::DARK_GREY),
        Kind::Flytext(text) => {
            let mut color = body.color;
            color[3] *= body.remaining_life();
            font::text(&text.text, body.pos, text.font_size, Anchor::Center, color)
        }
        Kind::Bubble(_) => shapes::circle(
            body.pos,
            body.radius,
            body.color,
            shapes::segments_for(body.radius),
        ),
    }
}

/// The whole frame: entities by layer, HUD on top, optional FPS counter
pub fn build(state: &GameState, fps: Option<f32>) -> Vec<Vertex> {
    let mut vertices = Vec::new();
    for entity in state.draw_order() {
        vertices.extend(entity_vertices(entity));
    }
    vertices.extend(hud::seat_bars(state));
    if let Some(fps) = fps {
        vertices.extend(hud::fps_counter(fps, state.arena.width, state.arena.height));
    }
    vertices
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use super::*;
    use crate::sim::{Announcement, Arena};
    use crate::tuning::Tuning;

    fn state() -> GameState {
        GameState::with_arena(Arena::new(1024.0, 800.0, 20.0), Tuning::default(), 2, 3)
    }

    #[test]
    fn test_flytext_fades_out() {
        let mut s = state();
        let id = s.announce(Announcement::new("hi", Vec2::new(300.0, 300.0)).lasting(2.0));
        let fresh = entity_vertices(s.get(id).unwrap());
        assert!(fresh.iter().all(|v| v.color[3] == 1.0));

        s.get_mut(id).unwrap().body.age = 1.5;
        let old = entity_vertices(s.get(id).unwrap());
        assert!(old.iter().all(|v| (v.color[3] - 0.25).abs() < 1e-5));
    }

    #[test]
    fn test_beam_is_a_short_line() {
        let mut s = state();
        s.auto_fire = false;
        let beam = s.fire(0).unwrap();
        let verts = entity_vertices(s.get(beam).unwrap());
        assert_eq!(verts.len(), 6);
        let origin = s.player(0).unwrap().0.pos;
        for v in &verts {
            assert!(Vec2::from(v.position).distance(origin) <= BEAM_LENGTH / 2.0 + BEAM_WIDTH);
        }
    }

    #[test]
    fn test_fps_is_optional() {
        let s = state();
        let without = build(&s, None);
        let with = build(&s, Some(60.0));
        assert!(with.len() > without.len());
    }

    #[test]
    fn test_dormant_entities_hidden() {
        let mut s = state();
        let before = build(&s, None).len();
        let (body, text) = Announcement::new("later", Vec2::new(200.0, 200.0)).into_parts();
        s.spawn(body.with_delay(1.0), Kind::Flytext(text));
        assert_eq!(build(&s, None).len(), before);
    }
}

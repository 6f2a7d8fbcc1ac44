//! Shape generation for 2D primitives
//!
//! Everything is emitted as a triangle list in screen pixels.

use glam::Vec2;
use std::f32::consts::PI;

use super::vertex::Vertex;
use crate::heading;

type Rgba = [f32; 4];

/// Segments for a circle of the given radius
pub fn segments_for(radius: f32) -> u32 {
    ((radius * 1.5) as u32).clamp(8, 48)
}

/// Generate vertices for a filled circle
pub fn circle(center: Vec2, radius: f32, color: Rgba, segments: u32) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        // Triangle from center to edge
        vertices.push(Vertex::at(center, color));
        vertices.push(Vertex::at(center + Vec2::from_angle(theta1) * radius, color));
        vertices.push(Vertex::at(center + Vec2::from_angle(theta2) * radius, color));
    }

    vertices
}

/// Generate vertices for a ring (hollow circle)
pub fn ring(
    center: Vec2,
    inner_radius: f32,
    outer_radius: f32,
    color: Rgba,
    segments: u32,
) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 6) as usize);

    for i in 0..segments {
        let d1 = Vec2::from_angle((i as f32 / segments as f32) * 2.0 * PI);
        let d2 = Vec2::from_angle(((i + 1) as f32 / segments as f32) * 2.0 * PI);

        let inner1 = center + d1 * inner_radius;
        let outer1 = center + d1 * outer_radius;
        let inner2 = center + d2 * inner_radius;
        let outer2 = center + d2 * outer_radius;

        // Two triangles per segment
        push_quad(&mut vertices, [inner1, outer1, outer2, inner2], color);
    }

    vertices
}

/// A line segment with thickness
pub fn line(a: Vec2, b: Vec2, width: f32, color: Rgba) -> Vec<Vertex> {
    let dir = (b - a).normalize_or_zero();
    if dir == Vec2::ZERO {
        return Vec::new();
    }
    // Perpendicular for width
    let perp = Vec2::new(-dir.y, dir.x) * (width / 2.0);

    let mut vertices = Vec::with_capacity(6);
    push_quad(&mut vertices, [a + perp, b + perp, b - perp, a - perp], color);
    vertices
}

/// Axis-aligned filled rectangle
pub fn rect(min: Vec2, max: Vec2, color: Rgba) -> Vec<Vertex> {
    if max.x <= min.x || max.y <= min.y {
        return Vec::new();
    }
    let mut vertices = Vec::with_capacity(6);
    push_quad(
        &mut vertices,
        [min, Vec2::new(max.x, min.y), max, Vec2::new(min.x, max.y)],
        color,
    );
    vertices
}

/// Axis-aligned rectangle border drawn inside the bounds
pub fn rect_outline(min: Vec2, max: Vec2, thickness: f32, color: Rgba) -> Vec<Vertex> {
    let t = thickness;
    let mut vertices = rect(min, Vec2::new(max.x, min.y + t), color);
    vertices.extend(rect(Vec2::new(min.x, max.y - t), max, color));
    vertices.extend(rect(Vec2::new(min.x, min.y + t), Vec2::new(min.x + t, max.y - t), color));
    vertices.extend(rect(Vec2::new(max.x - t, min.y + t), Vec2::new(max.x, max.y - t), color));
    vertices
}

/// Arrow-shaped ship hull pointing along `angle` (degrees)
///
/// The dart has its tip at the front, two rear wings and a notch a third of
/// the way in from the back.
pub fn ship(center: Vec2, angle: f32, radius: f32, color: Rgba) -> Vec<Vertex> {
    let size = radius * 2.0 + 1.0;
    let half = size / 2.0;
    let fwd = heading(angle);
    let side = fwd.perp();
    // Local coordinates: x forward from the center, y to the side
    let local = |x: f32, y: f32| center + fwd * (x - half) + side * (y - half);

    let wing_left = local(0.0, 0.0);
    let tip = local(size, half);
    let wing_right = local(0.0, size);
    let notch = local(size / 3.0, half);

    vec![
        Vertex::at(wing_left, color),
        Vertex::at(tip, color),
        Vertex::at(notch, color),
        Vertex::at(notch, color),
        Vertex::at(tip, color),
        Vertex::at(wing_right, color),
    ]
}

/// Crosshair: an X with two rings and a see-through center
pub fn crosshair(center: Vec2, radius: f32, color: Rgba, outline: Rgba) -> Vec<Vertex> {
    let arm = radius;
    let mut vertices = line(
        center + Vec2::new(-arm, -arm),
        center + Vec2::new(arm, arm),
        1.0,
        color,
    );
    vertices.extend(line(
        center + Vec2::new(arm, -arm),
        center + Vec2::new(-arm, arm),
        1.0,
        color,
    ));
    vertices.extend(ring(center, radius - 1.0, radius, outline, 24));
    let middle = radius * 2.0 / 3.0;
    vertices.extend(ring(center, middle - 1.0, middle, color, 20));
    let inner = radius / 3.0;
    vertices.extend(ring(center, inner - 1.0, inner, outline, 12));
    vertices
}

fn push_quad(out: &mut Vec<Vertex>, corners: [Vec2; 4], color: Rgba) {
    let [a, b, c, d] = corners;
    out.extend_from_slice(&[
        Vertex::at(a, color),
        Vertex::at(b, color),
        Vertex::at(c, color),
        Vertex::at(c, color),
        Vertex::at(d, color),
        Vertex::at(a, color),
    ]);
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgba = [1.0, 0.0, 0.0, 1.0];

    fn bounds(vertices: &[Vertex]) -> (Vec2, Vec2) {
        vertices.iter().fold(
            (Vec2::splat(f32::MAX), Vec2::splat(f32::MIN)),
            |(lo, hi), v| {
                let p = Vec2::from(v.position);
                (lo.min(p), hi.max(p))
            },
        )
    }

    #[test]
    fn test_circle_stays_within_radius() {
        let c = Vec2::new(50.0, 60.0);
        let verts = circle(c, 10.0, RED, 16);
        assert_eq!(verts.len(), 48);
        for v in &verts {
            assert!(Vec2::from(v.position).distance(c) <= 10.0 + 1e-3);
        }
    }

    #[test]
    fn test_line_width() {
        let verts = line(Vec2::ZERO, Vec2::new(20.0, 0.0), 3.0, RED);
        let (lo, hi) = bounds(&verts);
        assert!((lo - Vec2::new(0.0, -1.5)).length() < 1e-5);
        assert!((hi - Vec2::new(20.0, 1.5)).length() < 1e-5);
        assert!(line(Vec2::ONE, Vec2::ONE, 3.0, RED).is_empty());
    }

    #[test]
    fn test_rect_outline_inside_bounds() {
        let min = Vec2::new(10.0, 0.0);
        let max = Vec2::new(266.0, 20.0);
        let (lo, hi) = bounds(&rect_outline(min, max, 1.0, RED));
        assert_eq!(lo, min);
        assert_eq!(hi, max);
        assert!(rect(max, min, RED).is_empty());
    }

    #[test]
    fn test_ship_points_along_heading() {
        let center = Vec2::new(100.0, 100.0);
        let verts = ship(center, 90.0, 17.0, RED);
        // The tip is the point furthest along +y (90 degrees points down)
        let tip = verts
            .iter()
            .map(|v| Vec2::from(v.position))
            .max_by(|a, b| a.y.total_cmp(&b.y))
            .unwrap();
        assert!((tip.x - center.x).abs() < 1e-3);
        assert!((tip.y - (center.y + 17.5)).abs() < 1e-3);
    }
}

//! Built-in 5x7 bitmap font
//!
//! Each lit dot becomes one quad. Lowercase letters render as capitals;
//! characters without a glyph render as `?`.

use glam::Vec2;
use thiserror::Error;

use super::vertex::Vertex;

pub const GLYPH_COLUMNS: u32 = 5;
pub const GLYPH_ROWS: u32 = 7;
/// Horizontal advance per character, in dots (glyph plus one blank column)
pub const ADVANCE: u32 = 6;

/// Font size units per dot
const FONT_UNITS_PER_DOT: f32 = 10.0;

#[derive(Debug, Error, PartialEq)]
pub enum TextError {
    #[error("text grid must be positive and finite, got {width}x{height}")]
    InvalidGrid { width: f32, height: f32 },
}

/// Which point of the text box sits at the given position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Anchor {
    #[default]
    TopLeft,
    TopCenter,
    TopRight,
    CenterLeft,
    Center,
    CenterRight,
    BottomLeft,
    BottomCenter,
    BottomRight,
}

impl Anchor {
    /// Top-left corner of a box of `size` anchored at `pos`
    pub fn top_left(self, pos: Vec2, size: Vec2) -> Vec2 {
        let fx = match self {
            Anchor::TopLeft | Anchor::CenterLeft | Anchor::BottomLeft => 0.0,
            Anchor::TopCenter | Anchor::Center | Anchor::BottomCenter => 0.5,
            Anchor::TopRight | Anchor::CenterRight | Anchor::BottomRight => 1.0,
        };
        let fy = match self {
            Anchor::TopLeft | Anchor::TopCenter | Anchor::TopRight => 0.0,
            Anchor::CenterLeft | Anchor::Center | Anchor::CenterRight => 0.5,
            Anchor::BottomLeft | Anchor::BottomCenter | Anchor::BottomRight => 1.0,
        };
        pos - size * Vec2::new(fx, fy)
    }
}

/// Rows of a glyph, top to bottom; bit 4 is the leftmost column
pub fn glyph(c: char) -> [u8; 7] {
    match c.to_ascii_uppercase() {
        'A' => [0x0E, 0x11, 0x11, 0x1F, 0x11, 0x11, 0x11],
        'B' => [0x1E, 0x11, 0x11, 0x1E, 0x11, 0x11, 0x1E],
        'C' => [0x0E, 0x11, 0x10, 0x10, 0x10, 0x11, 0x0E],
        'D' => [0x1E, 0x11, 0x11, 0x11, 0x11, 0x11, 0x1E],
        'E' => [0x1F, 0x10, 0x10, 0x1E, 0x10, 0x10, 0x1F],
        'F' => [0x1F, 0x10, 0x10, 0x1E, 0x10, 0x10, 0x10],
        'G' => [0x0E, 0x11, 0x10, 0x17, 0x11, 0x11, 0x0F],
        'H' => [0x11, 0x11, 0x11, 0x1F, 0x11, 0x11, 0x11],
        'I' => [0x0E, 0x04, 0x04, 0x04, 0x04, 0x04, 0x0E],
        'J' => [0x07, 0x02, 0x02, 0x02, 0x02, 0x12, 0x0C],
        'K' => [0x11, 0x12, 0x14, 0x18, 0x14, 0x12, 0x11],
        'L' => [0x10, 0x10, 0x10, 0x10, 0x10, 0x10, 0x1F],
        'M' => [0x11, 0x1B, 0x15, 0x15, 0x11, 0x11, 0x11],
        'N' => [0x11, 0x11, 0x19, 0x15, 0x13, 0x11, 0x11],
        'O' => [0x0E, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0E],
        'P' => [0x1E, 0x11, 0x11, 0x1E, 0x10, 0x10, 0x10],
        'Q' => [0x0E, 0x11, 0x11, 0x11, 0x15, 0x12, 0x0D],
        'R' => [0x1E, 0x11, 0x11, 0x1E, 0x14, 0x12, 0x11],
        'S' => [0x0F, 0x10, 0x10, 0x0E, 0x01, 0x01, 0x1E],
        'T' => [0x1F, 0x04, 0x04, 0x04, 0x04, 0x04, 0x04],
        'U' => [0x11, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0E],
        'V' => [0x11, 0x11, 0x11, 0x11, 0x11, 0x0A, 0x04],
        'W' => [0x11, 0x11, 0x11, 0x15, 0x15, 0x15, 0x0A],
        'X' => [0x11, 0x11, 0x0A, 0x04, 0x0A, 0x11, 0x11],
        'Y' => [0x11, 0x11, 0x11, 0x0A, 0x04, 0x04, 0x04],
        'Z' => [0x1F, 0x01, 0x02, 0x04, 0x08, 0x10, 0x1F],
        '0' => [0x0E, 0x11, 0x13, 0x15, 0x19, 0x11, 0x0E],
        '1' => [0x04, 0x0C, 0x04, 0x04, 0x04, 0x04, 0x0E],
        '2' => [0x0E, 0x11, 0x01, 0x02, 0x04, 0x08, 0x1F],
        '3' => [0x1F, 0x02, 0x04, 0x02, 0x01, 0x11, 0x0E],
        '4' => [0x02, 0x06, 0x0A, 0x12, 0x1F, 0x02, 0x02],
        '5' => [0x1F, 0x10, 0x1E, 0x01, 0x01, 0x11, 0x0E],
        '6' => [0x06, 0x08, 0x10, 0x1E, 0x11, 0x11, 0x0E],
        '7' => [0x1F, 0x01, 0x02, 0x04, 0x08, 0x08, 0x08],
        '8' => [0x0E, 0x11, 0x11, 0x0E, 0x11, 0x11, 0x0E],
        '9' => [0x0E, 0x11, 0x11, 0x0F, 0x01, 0x02, 0x0C],
        ' ' => [0x00; 7],
        '!' => [0x04, 0x04, 0x04, 0x04, 0x04, 0x00, 0x04],
        '"' => [0x0A, 0x0A, 0x00, 0x00, 0x00, 0x00, 0x00],
        '\'' => [0x04, 0x04, 0x00, 0x00, 0x00, 0x00, 0x00],
        '(' => [0x02, 0x04, 0x08, 0x08, 0x08, 0x04, 0x02],
        ')' => [0x08, 0x04, 0x02, 0x02, 0x02, 0x04, 0x08],
        ',' => [0x00, 0x00, 0x00, 0x00, 0x0C, 0x04, 0x08],
        '-' => [0x00, 0x00, 0x00, 0x1F, 0x00, 0x00, 0x00],
        '.' => [0x00, 0x00, 0x00, 0x00, 0x00, 0x0C, 0x0C],
        '/' => [0x01, 0x01, 0x02, 0x04, 0x08, 0x10, 0x10],
        ':' => [0x00, 0x0C, 0x0C, 0x00, 0x0C, 0x0C, 0x00],
        '<' => [0x02, 0x04, 0x08, 0x10, 0x08, 0x04, 0x02],
        '>' => [0x08, 0x04, 0x02, 0x01, 0x02, 0x04, 0x08],
        '+' => [0x00, 0x04, 0x04, 0x1F, 0x04, 0x04, 0x00],
        '=' => [0x00, 0x00, 0x1F, 0x00, 0x1F, 0x00, 0x00],
        '%' => [0x18, 0x19, 0x02, 0x04, 0x08, 0x13, 0x03],
        '_' => [0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x1F],
        _ => [0x0E, 0x11, 0x01, 0x02, 0x04, 0x00, 0x04],
    }
}

/// Size of one dot at a font size
#[inline]
pub fn dot_size(font_size: f32) -> f32 {
    font_size / FONT_UNITS_PER_DOT
}

/// Width in dots of a line of text
fn width_in_dots(text: &str) -> u32 {
    match text.chars().count() as u32 {
        0 => 0,
        n => n * ADVANCE - 1,
    }
}

/// Pixel size of a line of text
pub fn measure(text: &str, font_size: f32) -> Vec2 {
    if text.is_empty() {
        return Vec2::ZERO;
    }
    let dot = dot_size(font_size);
    Vec2::new(width_in_dots(text) as f32 * dot, GLYPH_ROWS as f32 * dot)
}

/// Vertices for a line of text at a font size
pub fn text(text: &str, pos: Vec2, font_size: f32, anchor: Anchor, color: [f32; 4]) -> Vec<Vertex> {
    let size = measure(text, font_size);
    let dot = Vec2::splat(dot_size(font_size));
    emit(text, anchor.top_left(pos, size), dot, color)
}

/// Vertices for a line of text stretched to exactly fill `grid` pixels
pub fn fit(
    text: &str,
    pos: Vec2,
    grid: Vec2,
    anchor: Anchor,
    color: [f32; 4],
) -> Result<Vec<Vertex>, TextError> {
    if !(grid.x.is_finite() && grid.y.is_finite() && grid.x > 0.0 && grid.y > 0.0) {
        return Err(TextError::InvalidGrid {
            width: grid.x,
            height: grid.y,
        });
    }
    let columns = width_in_dots(text).max(1) as f32;
    let dot = Vec2::new(grid.x / columns, grid.y / GLYPH_ROWS as f32);
    Ok(emit(text, anchor.top_left(pos, grid), dot, color))
}

fn emit(text: &str, origin: Vec2, dot: Vec2, color: [f32; 4]) -> Vec<Vertex> {
    let mut vertices = Vec::new();
    for (i, c) in text.chars().enumerate() {
        let cell = origin + Vec2::new((i as u32 * ADVANCE) as f32 * dot.x, 0.0);
        for (row, bits) in glyph(c).iter().enumerate() {
            for col in 0..GLYPH_COLUMNS {
                if bits & (1 << (GLYPH_COLUMNS - 1 - col)) == 0 {
                    continue;
                }
                let min = cell + Vec2::new(col as f32, row as f32) * dot;
                let max = min + dot;
                vertices.extend_from_slice(&[
                    Vertex::new(min.x, min.y, color),
                    Vertex::new(max.x, min.y, color),
                    Vertex::new(max.x, max.y, color),
                    Vertex::new(max.x, max.y, color),
                    Vertex::new(min.x, max.y, color),
                    Vertex::new(min.x, min.y, color),
                ]);
            }
        }
    }
    vertices
}

#[cfg(test)]
mod tests {
    use super::*;

    const BLACK: [f32; 4] = [0.0, 0.0, 0.0, 1.0];

    fn lit_dots(c: char) -> usize {
        glyph(c).iter().map(|r| r.count_ones() as usize).sum()
    }

    #[test]
    fn test_measure() {
        assert_eq!(measure("", 10.0), Vec2::ZERO);
        // One dot per pixel at size 10
        assert_eq!(measure("A", 10.0), Vec2::new(5.0, 7.0));
        assert_eq!(measure("AB", 10.0), Vec2::new(11.0, 7.0));
        assert_eq!(measure("AB", 20.0), Vec2::new(22.0, 14.0));
    }

    #[test]
    fn test_lowercase_and_unknown_glyphs() {
        assert_eq!(glyph('g'), glyph('G'));
        assert_eq!(glyph('~'), glyph('?'));
        assert_eq!(glyph(' '), [0; 7]);
    }

    #[test]
    fn test_one_quad_per_dot() {
        let verts = text("I", Vec2::ZERO, 10.0, Anchor::TopLeft, BLACK);
        assert_eq!(verts.len(), lit_dots('I') * 6);
        assert!(text(" ", Vec2::ZERO, 10.0, Anchor::TopLeft, BLACK).is_empty());
    }

    #[test]
    fn test_anchor() {
        let size = Vec2::new(10.0, 4.0);
        let pos = Vec2::new(100.0, 50.0);
        assert_eq!(Anchor::TopLeft.top_left(pos, size), pos);
        assert_eq!(Anchor::Center.top_left(pos, size), Vec2::new(95.0, 48.0));
        assert_eq!(Anchor::BottomRight.top_left(pos, size), Vec2::new(90.0, 46.0));
        assert_eq!(Anchor::BottomCenter.top_left(pos, size), Vec2::new(95.0, 46.0));
    }

    #[test]
    fn test_fit_fills_grid() {
        let grid = Vec2::new(60.0, 14.0);
        let verts = fit("HI", Vec2::new(10.0, 5.0), grid, Anchor::TopLeft, BLACK).unwrap();
        for v in &verts {
            assert!((10.0..=70.0 + 1e-3).contains(&v.position[0]));
            assert!((5.0..=19.0 + 1e-3).contains(&v.position[1]));
        }
        // H spans its full glyph: left column starts at the grid edge
        assert!(verts.iter().any(|v| v.position[0] == 10.0));
    }

    #[test]
    fn test_fit_rejects_bad_grid() {
        for grid in [
            Vec2::new(0.0, 10.0),
            Vec2::new(10.0, -1.0),
            Vec2::new(f32::NAN, 10.0),
            Vec2::new(10.0, f32::INFINITY),
        ] {
            let err = fit("x", Vec2::ZERO, grid, Anchor::TopLeft, BLACK).unwrap_err();
            assert!(matches!(err, TextError::InvalidGrid { .. }));
        }
    }
}

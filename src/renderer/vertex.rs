//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};
use glam::Vec2;

/// Simple 2D vertex with position and color
///
/// Shapes are built in screen pixels (origin top-left, y down) and mapped
/// to clip space right before upload.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }

    #[inline]
    pub fn at(p: Vec2, color: [f32; 4]) -> Self {
        Self::new(p.x, p.y, color)
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

/// Map screen pixels to normalized device coordinates
pub fn pixel_to_ndc(p: [f32; 2], width: f32, height: f32) -> [f32; 2] {
    [p[0] / width * 2.0 - 1.0, 1.0 - p[1] / height * 2.0]
}

/// Fixed colors
pub mod colors {
    pub const BLACK: [f32; 4] = [0.0, 0.0, 0.0, 1.0];
    /// Crosshair outer ring
    pub const DARK_GREY: [f32; 4] = [10.0 / 255.0, 10.0 / 255.0, 10.0 / 255.0, 1.0];
    pub const FPS_TEXT: [f32; 4] = [200.0 / 255.0, 40.0 / 255.0, 40.0 / 255.0, 1.0];
}

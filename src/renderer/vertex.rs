//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

/// Simple 2D vertex with position and color
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

/// Colors for game elements
pub mod colors {
    pub const BACKGROUND: [f32; 4] = [0.0, 0.0, 0.0, 1.0];
    pub const EYE_WHITE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
    pub const PUPIL: [f32; 4] = [0.0, 0.0, 0.0, 1.0];
    pub const TONGUE: [f32; 4] = [1.0, 0.0, 0.0, 1.0];
    pub const HIGHLIGHT: [f32; 4] = [1.0, 1.0, 1.0, 0.2];
    pub const HEALTH_PIP: [f32; 4] = [1.0, 1.0, 1.0, 0.8];

    /// Food countdown ring, by remaining lifetime
    pub const RING_FRESH: [f32; 4] = [0.0, 1.0, 0.0, 1.0];
    pub const RING_AGING: [f32; 4] = [1.0, 0.65, 0.0, 1.0];
    pub const RING_EXPIRING: [f32; 4] = [1.0, 0.0, 0.0, 1.0];

    pub const APPLE: [f32; 4] = [0.9, 0.1, 0.1, 1.0];
    pub const GRAPES: [f32; 4] = [0.56, 0.27, 0.68, 1.0];
    pub const ORANGE: [f32; 4] = [1.0, 0.55, 0.0, 1.0];
    pub const WATERMELON: [f32; 4] = [1.0, 0.3, 0.43, 1.0];
    pub const STRAWBERRY: [f32; 4] = [0.9, 0.1, 0.18, 1.0];
    pub const BANANA: [f32; 4] = [1.0, 0.84, 0.0, 1.0];
    pub const CHERRY: [f32; 4] = [0.7, 0.0, 0.15, 1.0];
    pub const BEER: [f32; 4] = [0.95, 0.7, 0.2, 1.0];
    pub const BEER_FOAM: [f32; 4] = [1.0, 1.0, 0.95, 1.0];
    pub const TOXIC: [f32; 4] = [0.4, 0.9, 0.1, 1.0];
    pub const TOXIC_MARK: [f32; 4] = [0.1, 0.1, 0.1, 1.0];
}

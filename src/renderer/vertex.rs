//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

/// Simple 2D vertex with position and color
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
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
    pub const HERO: [f32; 4] = [0.2, 0.8, 0.4, 1.0];
    pub const HERO_BEAK: [f32; 4] = [1.0, 0.75, 0.2, 1.0];
    pub const EGG: [f32; 4] = [1.0, 0.97, 0.85, 1.0];
    pub const ENEMY: [f32; 4] = [0.9, 0.25, 0.25, 1.0];
    pub const WAYPOINT: [f32; 4] = [0.35, 0.55, 1.0, 1.0];
    pub const WAYPOINT_RIM: [f32; 4] = [0.7, 0.8, 1.0, 1.0];
    pub const FOCUS_RING: [f32; 4] = [1.0, 0.9, 0.2, 1.0];
    pub const VIEW_EDGE: [f32; 4] = [0.3, 0.3, 0.4, 1.0];
    pub const INSET_BACKGROUND: [f32; 4] = [0.06, 0.06, 0.12, 1.0];
    pub const BACKGROUND: [f32; 4] = [0.02, 0.02, 0.05, 1.0];

    /// Same color with its alpha scaled
    pub fn faded(color: [f32; 4], alpha: f32) -> [f32; 4] {
        [color[0], color[1], color[2], color[3] * alpha.clamp(0.0, 1.0)]
    }
}

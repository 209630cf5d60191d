//! Vertex types for the full-screen pass

use bytemuck::{Pod, Zeroable};

/// Clip-space 2D vertex
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
}

impl Vertex {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { position: [x, y] }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[wgpu::VertexAttribute {
                offset: 0,
                shader_location: 0,
                format: wgpu::VertexFormat::Float32x2,
            }],
        }
    }
}

/// Two triangles covering the whole viewport
pub const FULLSCREEN_QUAD: [Vertex; 6] = [
    Vertex::new(-1.0, -1.0),
    Vertex::new(1.0, -1.0),
    Vertex::new(-1.0, 1.0),
    Vertex::new(-1.0, 1.0),
    Vertex::new(1.0, -1.0),
    Vertex::new(1.0, 1.0),
];

//! Vertex data layout shared by all draw pipelines

use bytemuck::{Pod, Zeroable};

use crate::render::context::{VertexAttribute, VertexFormat, VertexLayoutDescription};

/// Position plus RGBA color, tightly packed for direct upload
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    /// Position in model space
    pub position: [f32; 3],
    /// Linear RGBA color
    pub color: [f32; 4],
}

impl Vertex {
    /// Byte size of one vertex as uploaded
    pub const SIZE: u32 = std::mem::size_of::<Self>() as u32;

    /// Create a vertex from position and color
    pub const fn new(position: [f32; 3], color: [f32; 4]) -> Self {
        Self { position, color }
    }

    /// Layout description matching this struct's memory representation
    pub fn layout() -> VertexLayoutDescription {
        VertexLayoutDescription {
            stride: Self::SIZE,
            attributes: vec![
                VertexAttribute {
                    name: "Position",
                    format: VertexFormat::Float3,
                    offset: 0,
                },
                VertexAttribute {
                    name: "Color",
                    format: VertexFormat::Float4,
                    offset: 12,
                },
            ],
        }
    }
}

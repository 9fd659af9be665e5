//! Canonical `wgpu::VertexBufferLayout` for terrain surface rendering.
//!
//! Every pipeline that draws generated terrain (fogged terrain patch, mountain
//! segments, ground plane) references [`TERRAIN_VERTEX_LAYOUT`] to avoid layout
//! drift bugs.
//!
//! ## Attribute Packing
//!
//! | Location | Offset | Format    | Field    |
//! |----------|--------|-----------|----------|
//! | 0        | 0      | Float32x3 | position |
//! | 1        | 12     | Float32x3 | color    |
//! | 2        | 24     | Float32x3 | normal   |

use std::mem;

use bytemuck::{Pod, Zeroable};
use wgpu::{VertexAttribute, VertexBufferLayout, VertexFormat, VertexStepMode};

/// A single terrain vertex: world-space position, per-vertex color, smooth normal.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct TerrainVertex {
    /// Position in mesh-local space (centered in X/Z by the builder).
    pub position: [f32; 3],
    /// Linear RGB color, typically an elevation ramp of the surface base tone.
    pub color: [f32; 3],
    /// Unit normal accumulated from adjacent triangles (smooth shading).
    pub normal: [f32; 3],
}

/// Vertex attributes for the terrain vertex format.
pub const TERRAIN_VERTEX_ATTRIBUTES: [VertexAttribute; 3] = [
    VertexAttribute {
        format: VertexFormat::Float32x3,
        offset: 0,
        shader_location: 0,
    },
    VertexAttribute {
        format: VertexFormat::Float32x3,
        offset: 12,
        shader_location: 1,
    },
    VertexAttribute {
        format: VertexFormat::Float32x3,
        offset: 24,
        shader_location: 2,
    },
];

/// The vertex buffer layout for all terrain render pipelines.
pub const TERRAIN_VERTEX_LAYOUT: VertexBufferLayout<'static> = VertexBufferLayout {
    array_stride: mem::size_of::<TerrainVertex>() as u64,
    step_mode: VertexStepMode::Vertex,
    attributes: &TERRAIN_VERTEX_ATTRIBUTES,
};

// ---------------------------------------------------------------------------
// Compile-time validation
// ---------------------------------------------------------------------------

/// Stride must match `TerrainVertex` size.
static_assertions::assert_eq_size!(TerrainVertex, [u8; 36]);

const _: () = assert!(TERRAIN_VERTEX_ATTRIBUTES[0].offset == 0);
const _: () = assert!(TERRAIN_VERTEX_ATTRIBUTES[1].offset == 12);
const _: () = assert!(TERRAIN_VERTEX_ATTRIBUTES[2].offset == 24);

/// Last attribute must fit within the stride.
const _: () = assert!(
    TERRAIN_VERTEX_ATTRIBUTES[2].offset + 12 <= mem::size_of::<TerrainVertex>() as u64,
    "Last attribute exceeds vertex stride"
);

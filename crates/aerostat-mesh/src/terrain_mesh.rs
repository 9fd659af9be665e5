//! CPU-side triangulated terrain surface.

use crate::vertex::TerrainVertex;

/// A triangulated height-field surface ready for GPU upload.
///
/// Owns interleaved vertex data (position, color, normal) and a `u32`
/// triangle-list index buffer. Immutable after construction; the scene node
/// displaying it owns it exclusively, and dropping it releases the buffers.
#[derive(Clone, Debug, Default)]
pub struct TerrainMesh {
    vertices: Vec<TerrainVertex>,
    indices: Vec<u32>,
}

impl TerrainMesh {
    pub(crate) fn new(vertices: Vec<TerrainVertex>, indices: Vec<u32>) -> Self {
        debug_assert!(indices.len().is_multiple_of(3), "index buffer must be a triangle list");
        Self { vertices, indices }
    }

    /// Interleaved vertex data.
    pub fn vertices(&self) -> &[TerrainVertex] {
        &self.vertices
    }

    /// Triangle-list indices.
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of triangles.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// `true` when the mesh has no triangles (degenerate grid input).
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Minimum and maximum vertex height (Y), or `None` for a vertex-less mesh.
    pub fn height_bounds(&self) -> Option<(f32, f32)> {
        let mut iter = self.vertices.iter().map(|v| v.position[1]);
        let first = iter.next()?;
        let (min, max) = iter.fold((first, first), |(lo, hi), y| (lo.min(y), hi.max(y)));
        Some((min, max))
    }
}

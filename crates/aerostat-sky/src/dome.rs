//! Sky dome geometry: a UV sphere the camera sits inside.

use std::f32::consts::{PI, TAU};
use std::mem;

use bytemuck::{Pod, Zeroable};
use wgpu::{VertexAttribute, VertexBufferLayout, VertexFormat, VertexStepMode};

/// A sky dome vertex: position on the sphere and its outward unit normal.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct SkyVertex {
    /// Position on the sphere surface.
    pub position: [f32; 3],
    /// Outward unit normal; the shader reads its vertical component.
    pub normal: [f32; 3],
}

/// Vertex buffer layout for the sky dome pipeline.
pub const SKY_VERTEX_LAYOUT: VertexBufferLayout<'static> = VertexBufferLayout {
    array_stride: mem::size_of::<SkyVertex>() as u64,
    step_mode: VertexStepMode::Vertex,
    attributes: &[
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
    ],
};

/// CPU-side sky dome mesh.
#[derive(Clone, Debug)]
pub struct DomeMesh {
    pub vertices: Vec<SkyVertex>,
    pub indices: Vec<u32>,
}

impl DomeMesh {
    /// Number of triangles.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// Generate a UV sphere with triangles wound to face inward, so the inside
/// surface is front-facing for the camera at the center.
///
/// `longitudes` is the segment count around the equator (≥ 3), `latitudes`
/// the ring count from pole to pole (≥ 2).
pub fn generate_dome(radius: f32, longitudes: u32, latitudes: u32) -> DomeMesh {
    let longitudes = longitudes.max(3);
    let latitudes = latitudes.max(2);

    let mut vertices = Vec::with_capacity(((longitudes + 1) * (latitudes + 1)) as usize);
    for lat in 0..=latitudes {
        let phi = lat as f32 / latitudes as f32 * PI; // 0 at +Y pole
        for lon in 0..=longitudes {
            let theta = lon as f32 / longitudes as f32 * TAU;
            let normal = [
                phi.sin() * theta.cos(),
                phi.cos(),
                phi.sin() * theta.sin(),
            ];
            vertices.push(SkyVertex {
                position: [normal[0] * radius, normal[1] * radius, normal[2] * radius],
                normal,
            });
        }
    }

    let stride = longitudes + 1;
    let mut indices = Vec::with_capacity((longitudes * latitudes * 6) as usize);
    for lat in 0..latitudes {
        for lon in 0..longitudes {
            let a = lat * stride + lon;
            let b = a + stride;
            let c = a + 1;
            let d = b + 1;
            // Clockwise from outside = counter-clockwise from inside.
            indices.extend_from_slice(&[a, b, c, c, b, d]);
        }
    }

    DomeMesh { vertices, indices }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn test_dome_counts() {
        let dome = generate_dome(100.0, 32, 16);
        assert_eq!(dome.vertices.len(), 33 * 17);
        assert_eq!(dome.triangle_count(), (32 * 16 * 2) as usize);
    }

    #[test]
    fn test_vertices_lie_on_sphere_with_unit_normals() {
        let radius = 250.0;
        let dome = generate_dome(radius, 16, 8);
        for (i, v) in dome.vertices.iter().enumerate() {
            let p = Vec3::from_array(v.position);
            assert!(
                (p.length() - radius).abs() < 1e-2,
                "vertex {i} at radius {}",
                p.length()
            );
            let n = Vec3::from_array(v.normal);
            assert!((n.length() - 1.0).abs() < 1e-5, "vertex {i} normal not unit");
            assert!((p / radius - n).length() < 1e-4, "normal not radial at {i}");
        }
    }

    #[test]
    fn test_triangles_face_inward() {
        let dome = generate_dome(10.0, 12, 6);
        let mut inward = 0usize;
        let mut total = 0usize;
        for tri in dome.indices.chunks_exact(3) {
            let a = Vec3::from_array(dome.vertices[tri[0] as usize].position);
            let b = Vec3::from_array(dome.vertices[tri[1] as usize].position);
            let c = Vec3::from_array(dome.vertices[tri[2] as usize].position);
            let face = (b - a).cross(c - a);
            if face.length_squared() < 1e-8 {
                continue; // degenerate pole triangle
            }
            total += 1;
            let centroid = (a + b + c) / 3.0;
            if face.dot(centroid) < 0.0 {
                inward += 1;
            }
        }
        assert_eq!(inward, total, "{} of {} triangles face outward", total - inward, total);
    }

    #[test]
    fn test_degenerate_inputs_are_clamped() {
        let dome = generate_dome(10.0, 0, 0);
        assert!(dome.triangle_count() > 0);
    }

    #[test]
    fn test_layout_stride_matches_vertex() {
        assert_eq!(SKY_VERTEX_LAYOUT.array_stride, 24);
        assert_eq!(mem::size_of::<SkyVertex>(), 24);
    }
}

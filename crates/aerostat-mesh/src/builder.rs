//! Grid mesh builder: samples a height function over a regular grid, triangulates
//! it with consistent winding, derives smooth vertex normals, and centers the
//! result in X/Z so differently-sized patches compose around a shared origin.

use glam::Vec3;

use crate::terrain_mesh::TerrainMesh;
use crate::vertex::TerrainVertex;

/// Builds triangulated height-field meshes from a grid configuration.
///
/// `width` and `depth` are vertex counts per axis; `spacing_x`/`spacing_z` are
/// the world-space distances between adjacent grid vertices. Grids with fewer
/// than 2 vertices on either axis produce an empty index buffer rather than
/// failing.
#[derive(Clone, Copy, Debug)]
pub struct MeshBuilder {
    width: u32,
    depth: u32,
    spacing_x: f32,
    spacing_z: f32,
}

impl MeshBuilder {
    /// Create a builder for a `depth × width` vertex grid.
    pub fn new(width: u32, depth: u32, spacing_x: f32, spacing_z: f32) -> Self {
        Self {
            width,
            depth,
            spacing_x,
            spacing_z,
        }
    }

    /// Sample `height_fn` over the grid and build the mesh.
    ///
    /// `height_fn` receives grid coordinates `(x, z)` as floats and returns the
    /// vertex height in world units; `color_fn` receives that height and returns
    /// the vertex color. The finished mesh is translated so its X/Z bounding-box
    /// midpoint sits at the local origin.
    pub fn build(
        &self,
        height_fn: impl Fn(f32, f32) -> f32,
        color_fn: impl Fn(f32) -> [f32; 3],
    ) -> TerrainMesh {
        let w = self.width as usize;
        let d = self.depth as usize;

        let mut positions = Vec::with_capacity(w * d);
        let mut colors = Vec::with_capacity(w * d);
        for z in 0..d {
            for x in 0..w {
                let height = height_fn(x as f32, z as f32);
                positions.push(Vec3::new(
                    x as f32 * self.spacing_x,
                    height,
                    z as f32 * self.spacing_z,
                ));
                colors.push(color_fn(height));
            }
        }

        // Quad corners: a = (x, z), b = (x, z+1), c = (x+1, z), d = (x+1, z+1).
        // Winding (a, b, d) / (d, c, a) keeps normals facing +Y on a flat grid.
        let mut indices = Vec::new();
        if w >= 2 && d >= 2 {
            indices.reserve((w - 1) * (d - 1) * 6);
            for z in 0..d - 1 {
                for x in 0..w - 1 {
                    let a = (z * w + x) as u32;
                    let b = ((z + 1) * w + x) as u32;
                    let c = (z * w + x + 1) as u32;
                    let quad_d = ((z + 1) * w + x + 1) as u32;
                    indices.extend_from_slice(&[a, b, quad_d, quad_d, c, a]);
                }
            }
        }

        let normals = smooth_normals(&positions, &indices);
        center_xz(&mut positions);

        let vertices = positions
            .iter()
            .zip(&colors)
            .zip(&normals)
            .map(|((position, color), normal)| TerrainVertex {
                position: position.to_array(),
                color: *color,
                normal: normal.to_array(),
            })
            .collect();

        TerrainMesh::new(vertices, indices)
    }
}

/// Accumulate area-weighted face normals per vertex and normalize.
///
/// Vertices touched by no triangle (or only degenerate ones, e.g. with zero
/// spacing) fall back to +Y instead of a zero normal.
fn smooth_normals(positions: &[Vec3], indices: &[u32]) -> Vec<Vec3> {
    let mut normals = vec![Vec3::ZERO; positions.len()];

    for tri in indices.chunks_exact(3) {
        let (i0, i1, i2) = (tri[0] as usize, tri[1] as usize, tri[2] as usize);
        let face = (positions[i1] - positions[i0]).cross(positions[i2] - positions[i0]);
        normals[i0] += face;
        normals[i1] += face;
        normals[i2] += face;
    }

    for normal in &mut normals {
        *normal = if normal.length_squared() > f32::EPSILON {
            normal.normalize()
        } else {
            Vec3::Y
        };
    }
    normals
}

/// Translate positions so the X/Z bounding-box midpoint sits at the origin.
fn center_xz(positions: &mut [Vec3]) {
    let Some(first) = positions.first().copied() else {
        return;
    };

    let (mut min_x, mut max_x) = (first.x, first.x);
    let (mut min_z, mut max_z) = (first.z, first.z);
    for p in positions.iter() {
        min_x = min_x.min(p.x);
        max_x = max_x.max(p.x);
        min_z = min_z.min(p.z);
        max_z = max_z.max(p.z);
    }

    let mid_x = (min_x + max_x) * 0.5;
    let mid_z = (min_z + max_z) * 0.5;
    for p in positions.iter_mut() {
        p.x -= mid_x;
        p.z -= mid_z;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat(_x: f32, _z: f32) -> f32 {
        0.0
    }

    fn grey(_h: f32) -> [f32; 3] {
        [0.5, 0.5, 0.5]
    }

    #[test]
    fn test_vertex_and_triangle_counts() {
        for (width, depth) in [(2u32, 2u32), (3, 5), (16, 9), (64, 64)] {
            let mesh = MeshBuilder::new(width, depth, 1.0, 1.0).build(flat, grey);
            assert_eq!(
                mesh.vertex_count(),
                (width * depth) as usize,
                "vertex count for {width}x{depth}"
            );
            assert_eq!(
                mesh.triangle_count(),
                (2 * (width - 1) * (depth - 1)) as usize,
                "triangle count for {width}x{depth}"
            );
        }
    }

    #[test]
    fn test_degenerate_grids_yield_zero_triangles() {
        for (width, depth) in [(1u32, 1u32), (1, 8), (8, 1), (0, 0), (0, 4), (4, 0)] {
            let mesh = MeshBuilder::new(width, depth, 1.0, 1.0).build(flat, grey);
            assert_eq!(
                mesh.triangle_count(),
                0,
                "{width}x{depth} grid must produce no triangles"
            );
            assert_eq!(mesh.vertex_count(), (width * depth) as usize);
            assert!(mesh.is_empty());
        }
    }

    #[test]
    fn test_zero_spacing_does_not_panic() {
        let mesh = MeshBuilder::new(4, 4, 0.0, 0.0).build(flat, grey);
        assert_eq!(mesh.vertex_count(), 16);
        assert_eq!(mesh.triangle_count(), 18);
        // Degenerate triangles leave no usable face normal; the fallback applies.
        for v in mesh.vertices() {
            let n = Vec3::from_array(v.normal);
            assert!(
                (n.length() - 1.0).abs() < 1e-5,
                "normal must stay unit-length, got {n:?}"
            );
        }
    }

    #[test]
    fn test_flat_grid_normals_point_up() {
        let mesh = MeshBuilder::new(8, 8, 2.0, 2.0).build(flat, grey);
        for (i, v) in mesh.vertices().iter().enumerate() {
            assert!(
                v.normal[1] > 0.99,
                "vertex {i} normal {:?} should face +Y on a flat grid",
                v.normal
            );
        }
    }

    #[test]
    fn test_mesh_is_centered_in_xz() {
        let mesh = MeshBuilder::new(9, 5, 3.0, 7.0).build(flat, grey);
        let mut min = Vec3::splat(f32::INFINITY);
        let mut max = Vec3::splat(f32::NEG_INFINITY);
        for v in mesh.vertices() {
            let p = Vec3::from_array(v.position);
            min = min.min(p);
            max = max.max(p);
        }
        assert!(
            (min.x + max.x).abs() < 1e-4,
            "X bounds [{}, {}] not symmetric",
            min.x,
            max.x
        );
        assert!(
            (min.z + max.z).abs() < 1e-4,
            "Z bounds [{}, {}] not symmetric",
            min.z,
            max.z
        );
    }

    #[test]
    fn test_differently_sized_patches_share_origin() {
        let small = MeshBuilder::new(4, 4, 10.0, 10.0).build(flat, grey);
        let large = MeshBuilder::new(32, 32, 10.0, 10.0).build(flat, grey);
        for mesh in [&small, &large] {
            let centroid: Vec3 = mesh
                .vertices()
                .iter()
                .map(|v| Vec3::from_array(v.position))
                .sum::<Vec3>()
                / mesh.vertex_count() as f32;
            assert!(centroid.x.abs() < 1e-3 && centroid.z.abs() < 1e-3);
        }
    }

    #[test]
    fn test_height_fn_receives_grid_coordinates() {
        let mesh = MeshBuilder::new(3, 3, 1.0, 1.0).build(|x, z| x * 10.0 + z, grey);
        // Row-major layout: vertex (x=2, z=1) sits at index 1*3 + 2.
        let v = &mesh.vertices()[5];
        assert!((v.position[1] - 21.0).abs() < 1e-6);
    }

    #[test]
    fn test_color_fn_receives_vertex_height() {
        let mesh =
            MeshBuilder::new(2, 2, 1.0, 1.0).build(|x, _z| x, |h| [h, 0.0, 0.0]);
        let reds: Vec<f32> = mesh.vertices().iter().map(|v| v.color[0]).collect();
        assert_eq!(reds, vec![0.0, 1.0, 0.0, 1.0]);
    }

    #[test]
    fn test_winding_is_consistent_on_sloped_grid() {
        // A sloped but single-valued height field must still yield normals with
        // positive Y everywhere; mixed winding would flip some of them.
        let mesh = MeshBuilder::new(12, 12, 1.0, 1.0).build(|x, z| (x * 0.7 + z * 0.3).sin(), grey);
        for v in mesh.vertices() {
            assert!(
                v.normal[1] > 0.0,
                "normal {:?} flipped below the surface",
                v.normal
            );
        }
    }

    #[test]
    fn test_build_is_deterministic() {
        let builder = MeshBuilder::new(16, 16, 2.5, 2.5);
        let a = builder.build(|x, z| (x * z).sqrt(), grey);
        let b = builder.build(|x, z| (x * z).sqrt(), grey);
        assert_eq!(a.vertices(), b.vertices());
        assert_eq!(a.indices(), b.indices());
    }

    #[test]
    fn test_height_bounds() {
        let mesh = MeshBuilder::new(4, 4, 1.0, 1.0).build(|x, _z| x, grey);
        let (min, max) = mesh.height_bounds().expect("mesh has vertices");
        assert_eq!(min, 0.0);
        assert_eq!(max, 3.0);

        let empty = MeshBuilder::new(0, 0, 1.0, 1.0).build(flat, grey);
        assert!(empty.height_bounds().is_none());
    }

    #[test]
    fn test_all_indices_in_range() {
        let mesh = MeshBuilder::new(7, 11, 1.0, 1.0).build(flat, grey);
        let max = mesh.vertex_count() as u32;
        assert!(mesh.indices().iter().all(|&i| i < max));
    }
}

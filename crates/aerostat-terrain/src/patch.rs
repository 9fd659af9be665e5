//! Local procedural terrain patch.

use aerostat_mesh::{MeshBuilder, TerrainMesh};

use crate::noise_field::NoiseField;

/// Parameters for a procedural terrain patch.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PatchParams {
    /// Vertex count along X.
    pub width: u32,
    /// Vertex count along Z.
    pub depth: u32,
    /// World-space distance between adjacent vertices along X.
    pub spacing_x: f32,
    /// World-space distance between adjacent vertices along Z.
    pub spacing_z: f32,
    /// Peak height of the patch; noise output in `[0, 1]` is scaled by this.
    pub max_height: f32,
    /// Base frequency of the noise field.
    pub noise_scale: f32,
    /// Base surface tone before the elevation ramp is applied.
    pub base_color: [f32; 3],
}

impl Default for PatchParams {
    fn default() -> Self {
        Self {
            width: 64,
            depth: 64,
            spacing_x: 10.0,
            spacing_z: 10.0,
            max_height: 20.0,
            noise_scale: 0.15,
            base_color: [0.18, 0.34, 0.16],
        }
    }
}

/// Generate the local terrain patch.
///
/// Height at grid cell `(x, z)` is `NoiseField::sample(x, z, noise_scale) ·
/// max_height`; vertex color is the base tone ramped by normalized elevation.
pub fn generate_patch(params: &PatchParams) -> TerrainMesh {
    let scale = params.noise_scale;
    let max_height = params.max_height;
    let base = params.base_color;

    let mesh = MeshBuilder::new(params.width, params.depth, params.spacing_x, params.spacing_z)
        .build(
            |x, z| NoiseField::sample(x, z, scale) * max_height,
            |height| {
                let t = if max_height.abs() > f32::EPSILON {
                    (height / max_height).clamp(0.0, 1.0)
                } else {
                    0.0
                };
                elevation_ramp(base, t)
            },
        );

    log::debug!(
        "generated terrain patch: {}x{} grid, {} triangles",
        params.width,
        params.depth,
        mesh.triangle_count()
    );
    mesh
}

/// Ramp a base tone by normalized elevation `t` in `[0, 1]`.
///
/// Valleys sit 15% below the base brightness, peaks 15% above — an elevation
/// cue, not a lighting model.
pub fn elevation_ramp(base: [f32; 3], t: f32) -> [f32; 3] {
    let brightness = 0.85 + 0.3 * t.clamp(0.0, 1.0);
    [
        (base[0] * brightness).min(1.0),
        (base[1] * brightness).min(1.0),
        (base[2] * brightness).min(1.0),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patch_64x64_counts_and_height_bounds() {
        let params = PatchParams {
            width: 64,
            depth: 64,
            max_height: 20.0,
            noise_scale: 0.15,
            ..PatchParams::default()
        };
        let mesh = generate_patch(&params);
        assert_eq!(mesh.vertex_count(), 4096);
        assert_eq!(mesh.triangle_count(), 7938);

        let (min, max) = mesh.height_bounds().expect("patch has vertices");
        assert!(min >= 0.0, "minimum height {min} below 0");
        assert!(max <= 20.0, "maximum height {max} above max_height");
    }

    #[test]
    fn test_patch_regeneration_is_identical() {
        let params = PatchParams::default();
        let a = generate_patch(&params);
        let b = generate_patch(&params);
        assert_eq!(a.vertices(), b.vertices());
        assert_eq!(a.indices(), b.indices());
    }

    #[test]
    fn test_degenerate_patch_does_not_panic() {
        for (width, depth) in [(1u32, 64u32), (64, 1), (0, 0)] {
            let params = PatchParams {
                width,
                depth,
                ..PatchParams::default()
            };
            let mesh = generate_patch(&params);
            assert_eq!(mesh.triangle_count(), 0);
        }
    }

    #[test]
    fn test_elevation_ramp_spans_plus_minus_fifteen_percent() {
        let base = [0.4, 0.4, 0.4];
        let low = elevation_ramp(base, 0.0);
        let high = elevation_ramp(base, 1.0);
        assert!((low[0] - 0.4 * 0.85).abs() < 1e-6);
        assert!((high[0] - 0.4 * 1.15).abs() < 1e-6);
    }

    #[test]
    fn test_elevation_ramp_clamps_input_and_output() {
        let ramped = elevation_ramp([1.0, 1.0, 1.0], 5.0);
        assert!(ramped.iter().all(|&c| c <= 1.0));
        assert_eq!(elevation_ramp([0.5; 3], -1.0), elevation_ramp([0.5; 3], 0.0));
    }

    #[test]
    fn test_zero_max_height_yields_flat_patch() {
        let params = PatchParams {
            max_height: 0.0,
            ..PatchParams::default()
        };
        let mesh = generate_patch(&params);
        let (min, max) = mesh.height_bounds().unwrap();
        assert_eq!(min, 0.0);
        assert_eq!(max, 0.0);
    }
}

//! Distant mountain ring: angularly distributed height-field segments around a
//! center point, plus a single oversized ground plane beneath them.

use std::f32::consts::{FRAC_PI_2, TAU};

use aerostat_mesh::{MeshBuilder, TerrainMesh};
use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::noise_field::NoiseField;
use crate::patch::elevation_ramp;

/// Floor on the segment count. Fewer segments leave visible gaps in the ring
/// silhouette, so caller-requested counts below this are raised, never honored.
pub const MIN_SEGMENT_COUNT: u32 = 16;

/// Per-segment angular jitter in radians, on top of the nominal ring angle.
pub const ANGULAR_JITTER: f32 = 0.1;

/// Per-segment radial jitter in world units, on top of the ring distance.
pub const RADIAL_JITTER: f32 = 25.0;

/// Ground plane extent as a multiple of the ring distance, per axis.
pub const GROUND_EXTENT_FACTOR: f32 = 2.5;

/// Parameters for generating a mountain ring and its ground plane.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MountainRingParams {
    /// Requested segment count; raised to [`MIN_SEGMENT_COUNT`] when lower.
    pub count: u32,
    /// Nominal distance from the ring center to each segment.
    pub ring_distance: f32,
    /// Minimum randomized segment peak height.
    pub min_height: f32,
    /// Maximum randomized segment peak height.
    pub max_height: f32,
    /// Vertex count of each segment grid along X.
    pub segment_width: u32,
    /// Vertex count of each segment grid along Z.
    pub segment_depth: u32,
    /// Base world-space spacing between segment grid vertices; the per-segment
    /// scale factor multiplies this.
    pub segment_spacing: f32,
    /// Base frequency of the segment noise field.
    pub noise_scale: f32,
    /// Base tone of the mountain surfaces before the elevation ramp.
    pub mountain_color: [f32; 3],
    /// Flat color of the ground plane.
    pub ground_color: [f32; 3],
    /// Y position of every segment's base.
    pub mountain_y: f32,
    /// Y position of the ground plane, below the segment bases.
    pub ground_y: f32,
}

impl Default for MountainRingParams {
    fn default() -> Self {
        Self {
            count: 24,
            ring_distance: 1200.0,
            min_height: 80.0,
            max_height: 260.0,
            segment_width: 24,
            segment_depth: 12,
            segment_spacing: 18.0,
            noise_scale: 0.35,
            mountain_color: [0.28, 0.27, 0.33],
            ground_color: [0.16, 0.2, 0.14],
            mountain_y: -10.0,
            ground_y: -12.0,
        }
    }
}

/// One mountain segment: its mesh plus ring placement.
#[derive(Clone, Debug)]
pub struct MountainSegment {
    /// The segment's height-field mesh, centered at its own origin.
    pub mesh: TerrainMesh,
    /// World-space position of the segment origin.
    pub position: Vec3,
    /// Outward-facing yaw in radians (nominal angle + π/2 + jitter).
    pub yaw: f32,
    /// Nominal ring angle before jitter, `i · 2π / segment_count`.
    pub ring_angle: f32,
}

/// The flat plane grounding the ring visually.
#[derive(Clone, Debug)]
pub struct GroundPlane {
    /// A single centered quad spanning [`GROUND_EXTENT_FACTOR`] × ring distance.
    pub mesh: TerrainMesh,
    /// Y position of the plane.
    pub y: f32,
}

/// A generated ring of mountain segments plus its ground plane.
///
/// Owned collectively: callers discard and rebuild the whole set on parameter
/// change, disposing the prior meshes and materials before replacement.
#[derive(Clone, Debug)]
pub struct MountainRing {
    /// Ring segments, `max(requested, MIN_SEGMENT_COUNT)` of them.
    pub segments: Vec<MountainSegment>,
    /// The single ground plane beneath the ring.
    pub ground: GroundPlane,
}

impl MountainRing {
    /// Number of segments in the ring.
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }
}

/// Generate a mountain ring from `params`, reproducibly for a given `seed`.
///
/// Each segment draws its scale factor, peak height, noise offset, and
/// placement jitter from a seeded stream, so identical `(params, seed)` pairs
/// rebuild the identical ring.
pub fn generate_mountain_ring(params: &MountainRingParams, seed: u64) -> MountainRing {
    let segment_count = params.count.max(MIN_SEGMENT_COUNT);
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    let mut segments = Vec::with_capacity(segment_count as usize);
    for i in 0..segment_count {
        let ring_angle = i as f32 * TAU / segment_count as f32;

        let scale_factor = rng.random_range(0.6..=1.4);
        let peak_height = rng.random_range(params.min_height..=params.max_height);
        let noise_offset = rng.random_range(0.0..1000.0f32);
        let angle_jitter = rng.random_range(-ANGULAR_JITTER..=ANGULAR_JITTER);
        let radial_jitter = rng.random_range(-RADIAL_JITTER..=RADIAL_JITTER);

        let mesh = build_segment_mesh(params, scale_factor, peak_height, noise_offset);

        let radius = params.ring_distance + radial_jitter;
        let placed_angle = ring_angle + angle_jitter;
        segments.push(MountainSegment {
            mesh,
            position: Vec3::new(
                placed_angle.cos() * radius,
                params.mountain_y,
                placed_angle.sin() * radius,
            ),
            yaw: ring_angle + FRAC_PI_2 + angle_jitter,
            ring_angle,
        });
    }

    let ground = build_ground_plane(params);

    log::info!(
        "generated mountain ring: {} segments at distance {}, seed {}",
        segment_count,
        params.ring_distance,
        seed
    );

    MountainRing { segments, ground }
}

/// Build one segment mesh with its randomized variety applied.
///
/// The height function blends a base noise term (weight 0.7) with the product
/// of two higher-frequency detail terms (weight 0.3), which pushes ridges into
/// sharper peaks than the terrain patch gets.
fn build_segment_mesh(
    params: &MountainRingParams,
    scale_factor: f32,
    peak_height: f32,
    noise_offset: f32,
) -> TerrainMesh {
    let spacing = params.segment_spacing * scale_factor;
    let scale = params.noise_scale;
    let color = params.mountain_color;

    MeshBuilder::new(params.segment_width, params.segment_depth, spacing, spacing).build(
        |x, z| {
            let base = NoiseField::sample(x + noise_offset, z + noise_offset, scale);
            let detail_a = NoiseField::sample(x + noise_offset, z + noise_offset, scale * 2.3);
            let detail_b = NoiseField::sample(x - noise_offset, z + noise_offset, scale * 3.1);
            (0.7 * base + 0.3 * detail_a * detail_b) * peak_height
        },
        |height| {
            let t = if peak_height > f32::EPSILON {
                (height / peak_height).clamp(0.0, 1.0)
            } else {
                0.0
            };
            elevation_ramp(color, t)
        },
    )
}

/// Build the flat ground quad, [`GROUND_EXTENT_FACTOR`] × ring distance per axis.
fn build_ground_plane(params: &MountainRingParams) -> GroundPlane {
    let extent = params.ring_distance * GROUND_EXTENT_FACTOR;
    let color = params.ground_color;
    let mesh = MeshBuilder::new(2, 2, extent, extent).build(|_, _| 0.0, |_| color);
    GroundPlane {
        mesh,
        y: params.ground_y,
    }
}

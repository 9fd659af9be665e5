//! Procedural terrain generation: the sinusoidal noise field, the local terrain
//! patch, and the ring of distant mountain segments with its ground plane.

mod mountain;
mod noise_field;
mod patch;

pub use mountain::{
    ANGULAR_JITTER, GROUND_EXTENT_FACTOR, GroundPlane, MIN_SEGMENT_COUNT, MountainRing,
    MountainRingParams, MountainSegment, RADIAL_JITTER, generate_mountain_ring,
};
pub use noise_field::NoiseField;
pub use patch::{PatchParams, elevation_ramp, generate_patch};

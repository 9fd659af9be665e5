//! Deterministic pseudo-terrain height function.
//!
//! Not a gradient noise: three sinusoidal product terms at non-integer frequency
//! ratios, summed with decaying weights. Cheap, stateless, and infinitely
//! repeatable, which is what the regeneration path relies on — identical inputs
//! always reproduce the identical surface without any caching.

/// Stateless height field sampled as `sin(x·f)·cos(z·f)` products.
pub struct NoiseField;

/// Weight of the low-frequency base term.
const BASE_WEIGHT: f32 = 1.0;
/// Weight of the mid-frequency detail term.
const DETAIL_WEIGHT: f32 = 0.5;
/// Weight of the high-frequency peak term.
const PEAK_WEIGHT: f32 = 0.25;

impl NoiseField {
    /// Sample the field at grid coordinates `(x, z)`.
    ///
    /// Returns a value in `[0, 1]`. `scale` controls the base frequency; the
    /// detail and peak terms run at fixed non-integer multiples of it so the
    /// combined surface never looks perfectly periodic.
    pub fn sample(x: f32, z: f32, scale: f32) -> f32 {
        let base = (x * scale).sin() * (z * scale).cos();
        let detail = (x * scale * 2.7).sin() * (z * scale * 2.3).cos();
        let peak = (x * scale * 5.3).sin() * (z * scale * 4.7).cos();

        let sum = unit(base) * BASE_WEIGHT + unit(detail) * DETAIL_WEIGHT + unit(peak) * PEAK_WEIGHT;
        sum / (BASE_WEIGHT + DETAIL_WEIGHT + PEAK_WEIGHT)
    }
}

/// Remap a `[-1, 1]` sinusoid into `[0, 1]`.
fn unit(v: f32) -> f32 {
    (v + 1.0) * 0.5
}

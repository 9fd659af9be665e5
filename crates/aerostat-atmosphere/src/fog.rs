//! CPU reference implementation of the fog shading math.
//!
//! The fragment shader in [`crate::pipeline`] evaluates the same functions in
//! WGSL; the two must agree. Tests and any CPU-side evaluation (the sky's
//! horizon blend) go through these.

use crate::color::hsl_to_rgb;
use crate::params::FogParams;

/// Fraction of `start_distance` where the fog falloff gate begins.
pub const FALLOFF_START_FRACTION: f32 = 0.7;

/// Fixed HSL saturation of the fog color; hue and brightness are tunable.
pub const FOG_SATURATION: f32 = 0.5;

/// Hermite smoothstep of `x` between `edge0` and `edge1`.
///
/// A degenerate edge pair (`edge0 >= edge1`) degrades to a hard step instead
/// of dividing by zero.
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    if edge1 - edge0 <= f32::EPSILON {
        return if x >= edge1 { 1.0 } else { 0.0 };
    }
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Distance fog term.
///
/// Zero at or below `start`, a smoothstep ramp between `start` and `end`, and
/// zero again at or beyond `end`: geometry past the end distance deliberately
/// resurfaces so the sky sphere is never fully occluded at extreme range.
pub fn distance_fog_factor(view_distance: f32, start: f32, end: f32) -> f32 {
    if view_distance <= start || view_distance >= end {
        return 0.0;
    }
    smoothstep(start, end, view_distance)
}

/// Height fog term: smoothstep of the signed view-space distance to the fog
/// plane, ramping over `depth`. Positive distances lie below the plane.
pub fn height_fog_factor(plane_distance: f32, depth: f32) -> f32 {
    smoothstep(0.0, depth, plane_distance)
}

/// Falloff gate near the start distance, avoiding a hard fog edge.
///
/// Ramps from zero at [`FALLOFF_START_FRACTION`]` · start` to one at `start`.
pub fn distance_falloff(view_distance: f32, start: f32) -> f32 {
    smoothstep(start * FALLOFF_START_FRACTION, start, view_distance)
}

/// Combined fog intensity at a fragment: `max(distance, height)` gated by the
/// start-distance falloff.
pub fn combined_fog(params: &FogParams, view_distance: f32, plane_distance: f32) -> f32 {
    let distance = distance_fog_factor(view_distance, params.start_distance, params.end_distance);
    let height = height_fog_factor(plane_distance, params.depth);
    distance.max(height) * distance_falloff(view_distance, params.start_distance)
}

/// Fog color close to the camera.
pub fn close_color(params: &FogParams) -> [f32; 3] {
    hsl_to_rgb(params.close_hue, FOG_SATURATION, params.close_brightness)
}

/// Fog color at far range.
pub fn distant_color(params: &FogParams) -> [f32; 3] {
    hsl_to_rgb(params.distant_hue, FOG_SATURATION, params.distant_brightness)
}

/// Two-tone fog color at a given view distance: a smoothstep blend between the
/// close and distant hue/brightness pairs.
pub fn fog_color_at(params: &FogParams, view_distance: f32) -> [f32; 3] {
    let close = close_color(params);
    let distant = distant_color(params);
    let t = smoothstep(
        params.color_start_distance,
        params.color_end_distance,
        view_distance,
    );
    [
        close[0] + (distant[0] - close[0]) * t,
        close[1] + (distant[1] - close[1]) * t,
        close[2] + (distant[2] - close[2]) * t,
    ]
}

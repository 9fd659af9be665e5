//! Sky model: gradient dome, equatorial ring, procedural stars, fog horizon.
//!
//! The stars are shader-procedural — placement is hashed from the view
//! direction and size/density are uniforms, so slider changes apply live
//! without touching any per-instance state.

use aerostat_atmosphere::{FOG_SATURATION, FogModel, hsl_to_rgb, smoothstep};

/// Equatorial ring band configuration. `height` and `falloff` are fractions of
/// the vertical normal component in `[0, 1]`; hue is HSL degrees, brightness
/// HSL lightness.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SkyRingConfig {
    /// Vertical-normal fraction where the ring blend ends.
    pub height: f32,
    /// Width of the smoothstep band below `height`.
    pub falloff: f32,
    /// HSL hue of the ring color, in degrees.
    pub hue: f32,
    /// HSL lightness of the ring color.
    pub brightness: f32,
}

impl Default for SkyRingConfig {
    fn default() -> Self {
        Self {
            height: 0.35,
            falloff: 0.25,
            hue: 36.0,
            brightness: 0.62,
        }
    }
}

impl SkyRingConfig {
    /// The ring color in RGB.
    pub fn color(&self) -> [f32; 3] {
        hsl_to_rgb(self.hue, FOG_SATURATION, self.brightness)
    }
}

/// Star field configuration. All values are uniforms in the sky shader, so
/// updates apply to the next frame without regenerating anything.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StarConfig {
    /// Smallest star disc radius, in cell-local units.
    pub size_min: f32,
    /// Largest star disc radius, in cell-local units.
    pub size_max: f32,
    /// Star cell density over the dome; higher means more, smaller cells.
    pub density: f32,
    /// Vertical-normal offset above the horizon where stars start fading;
    /// opacity reaches zero the same distance below the horizon.
    pub fade_offset: f32,
}

impl Default for StarConfig {
    fn default() -> Self {
        Self {
            size_min: 0.04,
            size_max: 0.12,
            density: 48.0,
            fade_offset: 0.1,
        }
    }
}

/// Ring blend factor at a given vertical normal component.
///
/// One inside the equatorial band, smoothstepping to zero as `|normal_y|`
/// passes from `height − falloff` up through `height`. CPU mirror of the
/// shader math.
pub fn ring_blend(normal_y: f32, ring: &SkyRingConfig) -> f32 {
    1.0 - smoothstep(ring.height - ring.falloff, ring.height, normal_y.abs())
}

/// Star opacity at a vertical normal component.
///
/// Full at `fade_offset` above the horizon, declining linearly to zero at
/// `fade_offset` below it. CPU mirror of the shader math.
pub fn star_opacity(normal_y: f32, fade_offset: f32) -> f32 {
    let fade = fade_offset.max(1e-4);
    ((normal_y + fade) / (2.0 * fade)).clamp(0.0, 1.0)
}

/// The sky state the orchestrator owns and tunes.
///
/// Reads the fog model's colors every frame so the horizon stays consistent
/// with ground fog; the sky itself is never fogged (its shader applies no fog
/// term, so the dome cannot vanish into its own fog).
#[derive(Clone, Debug)]
pub struct SkyDome {
    /// Zenith color of the gradient.
    pub base_color: [f32; 3],
    /// Vertical-normal fraction over which the horizon blends into the zenith.
    pub horizon_band: f32,
    /// Equatorial ring band.
    pub ring: SkyRingConfig,
    /// Star field settings.
    pub stars: StarConfig,
    fog_close: [f32; 3],
    fog_distant: [f32; 3],
}

impl SkyDome {
    /// Create a sky dome seeded with the fog model's current colors.
    pub fn new(base_color: [f32; 3], ring: SkyRingConfig, stars: StarConfig) -> Self {
        Self {
            base_color,
            horizon_band: 0.45,
            ring,
            stars,
            fog_close: [0.5; 3],
            fog_distant: [0.5; 3],
        }
    }

    /// Per-frame hook: pull the fog model's current close/distant colors so
    /// the horizon blend tracks ground fog.
    pub fn update_fog_blend(&mut self, fog: &FogModel) {
        self.fog_close = fog.close_color();
        self.fog_distant = fog.distant_color();
    }

    /// The fog color currently blended at the horizon.
    pub fn horizon_color(&self) -> [f32; 3] {
        self.fog_distant
    }

    /// The close fog color as of the last [`Self::update_fog_blend`].
    pub fn close_fog_color(&self) -> [f32; 3] {
        self.fog_close
    }
}

impl Default for SkyDome {
    fn default() -> Self {
        Self::new(
            [0.05, 0.08, 0.2],
            SkyRingConfig::default(),
            StarConfig::default(),
        )
    }
}

//! Configuration structs with the scene's hand-tuned defaults and RON persistence.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Name of the config file inside the config directory.
pub const CONFIG_FILE: &str = "aerostat.ron";

/// Top-level scene configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Local terrain patch settings.
    pub terrain: TerrainSettings,
    /// Mountain ring settings.
    pub mountains: MountainSettings,
    /// Fog settings.
    pub fog: FogSettings,
    /// Sky gradient and ring settings.
    pub sky: SkySettings,
    /// Star field settings.
    pub stars: StarSettings,
    /// Debug/development settings.
    pub debug: DebugSettings,
}

/// Local terrain patch configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TerrainSettings {
    /// Vertex count along X.
    pub width: u32,
    /// Vertex count along Z.
    pub depth: u32,
    /// World-space spacing between adjacent vertices along X.
    pub spacing_x: f32,
    /// World-space spacing between adjacent vertices along Z.
    pub spacing_z: f32,
    /// Peak terrain height.
    pub max_height: f32,
    /// Base frequency of the terrain noise.
    pub noise_scale: f32,
    /// Base surface tone (linear RGB).
    pub base_color: [f32; 3],
}

/// Mountain ring configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MountainSettings {
    /// Requested segment count (raised to the ring's floor when lower).
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
    /// Base spacing between segment grid vertices.
    pub segment_spacing: f32,
    /// Base frequency of the segment noise.
    pub noise_scale: f32,
    /// Base tone of the mountain surfaces (linear RGB).
    pub mountain_color: [f32; 3],
    /// Flat color of the ground plane (linear RGB).
    pub ground_color: [f32; 3],
    /// Y position of every segment's base.
    pub mountain_y: f32,
    /// Y position of the ground plane.
    pub ground_y: f32,
    /// Seed for the ring's randomized variety.
    pub seed: u64,
}

/// Fog configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FogSettings {
    /// Vertical thickness of the height fog band.
    pub depth: f32,
    /// View distance where distance fog starts.
    pub start_distance: f32,
    /// View distance where distance fog ends (and far geometry resurfaces).
    pub end_distance: f32,
    /// HSL hue of the fog at close range, in degrees.
    pub close_hue: f32,
    /// HSL hue of the fog at far range, in degrees.
    pub distant_hue: f32,
    /// HSL lightness of the fog at close range.
    pub close_brightness: f32,
    /// HSL lightness of the fog at far range.
    pub distant_brightness: f32,
    /// View distance where the close-to-distant color blend begins.
    pub color_start_distance: f32,
    /// View distance where the color blend reaches the distant tone.
    pub color_end_distance: f32,
    /// World-space Y of the fog plane.
    pub height: f32,
}

/// Sky gradient and equatorial ring configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SkySettings {
    /// Zenith color of the gradient (linear RGB).
    pub base_color: [f32; 3],
    /// Vertical-normal fraction over which the horizon blends into the zenith.
    pub horizon_band: f32,
    /// Vertical-normal fraction where the ring blend ends.
    pub ring_height: f32,
    /// Width of the ring smoothstep band.
    pub ring_falloff: f32,
    /// HSL hue of the ring color, in degrees.
    pub ring_hue: f32,
    /// HSL lightness of the ring color.
    pub ring_brightness: f32,
}

/// Star field configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StarSettings {
    /// Smallest star disc radius.
    pub size_min: f32,
    /// Largest star disc radius.
    pub size_max: f32,
    /// Star cell density over the dome.
    pub density: f32,
    /// Vertical-normal offset where stars start fading toward the horizon.
    pub fade_offset: f32,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugSettings {
    /// Enable wireframe rendering for generated meshes.
    pub wireframe_mode: bool,
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
}

// --- Default implementations ---

impl Default for TerrainSettings {
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

impl Default for MountainSettings {
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
            seed: 1,
        }
    }
}

impl Default for FogSettings {
    fn default() -> Self {
        Self {
            depth: 60.0,
            start_distance: 300.0,
            end_distance: 2400.0,
            close_hue: 210.0,
            distant_hue: 232.0,
            close_brightness: 0.72,
            distant_brightness: 0.55,
            color_start_distance: 200.0,
            color_end_distance: 1600.0,
            height: 40.0,
        }
    }
}

impl Default for SkySettings {
    fn default() -> Self {
        Self {
            base_color: [0.05, 0.08, 0.2],
            horizon_band: 0.45,
            ring_height: 0.35,
            ring_falloff: 0.25,
            ring_hue: 36.0,
            ring_brightness: 0.62,
        }
    }
}

impl Default for StarSettings {
    fn default() -> Self {
        Self {
            size_min: 0.04,
            size_max: 0.12,
            density: 48.0,
            fade_offset: 0.1,
        }
    }
}

impl Default for DebugSettings {
    fn default() -> Self {
        Self {
            wireframe_mode: false,
            log_level: "info".to_string(),
        }
    }
}

// --- Load / Save / Reload ---

impl Config {
    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE);

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
            let config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as [`CONFIG_FILE`].
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(ConfigError::WriteError)?;

        let config_path = config_dir.join(CONFIG_FILE);
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .separate_tuple_members(true)
            .enumerate_arrays(false);

        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)?;

        std::fs::write(&config_path, serialized).map_err(ConfigError::WriteError)?;
        Ok(())
    }

    /// Hot-reload: returns `Some(new_config)` if the file changed, `None` otherwise.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE);
        let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
        let new_config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;

        if &new_config != self {
            log::info!("Config reloaded with changes");
            Ok(Some(new_config))
        } else {
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_serializes() {
        let config = Config::default();
        let ron_str =
            ron::ser::to_string_pretty(&config, ron::ser::PrettyConfig::new().depth_limit(3))
                .unwrap();
        assert!(!ron_str.is_empty());
        assert!(ron_str.contains("ring_distance: 1200.0"));
        assert!(ron_str.contains("start_distance: 300.0"));
    }

    #[test]
    fn test_config_roundtrip() {
        let config = Config::default();
        let ron_str = ron::to_string(&config).unwrap();
        let deserialized: Config = ron::from_str(&ron_str).unwrap();
        assert_eq!(config, deserialized);
    }

    #[test]
    fn test_missing_section_uses_default() {
        // Config missing the `stars` section entirely
        let ron_str = "(terrain: (), mountains: (), fog: (), sky: (), debug: ())";
        let config: Config = ron::from_str(ron_str).unwrap();
        assert_eq!(config.stars, StarSettings::default());
    }

    #[test]
    fn test_partial_section_keeps_other_fields() {
        let ron_str = "(fog: (height: 95.0))";
        let config: Config = ron::from_str(ron_str).unwrap();
        assert_eq!(config.fog.height, 95.0);
        assert_eq!(config.fog.depth, FogSettings::default().depth);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.mountains.count = 32;
        config.mountains.seed = 77;
        config.fog.height = 55.0;

        config.save(dir.path()).unwrap();
        let loaded = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(config, loaded);
    }

    #[test]
    fn test_load_or_create_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(config, Config::default());
        assert!(dir.path().join(CONFIG_FILE).exists());
    }

    #[test]
    fn test_reload_detects_changes() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default();
        config.save(dir.path()).unwrap();

        let mut modified = config.clone();
        modified.fog.distant_hue = 280.0;
        modified.save(dir.path()).unwrap();

        let result = config.reload(dir.path()).unwrap();
        assert!(result.is_some());
        assert_eq!(result.unwrap().fog.distant_hue, 280.0);
    }

    #[test]
    fn test_reload_no_changes() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default();
        config.save(dir.path()).unwrap();

        let result = config.reload(dir.path()).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_invalid_ron_produces_error() {
        let result: Result<Config, _> = ron::from_str("{{not valid}}");
        assert!(result.is_err());
    }
}

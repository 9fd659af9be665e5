//! Command-line argument parsing for the balloon scene.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;

/// Balloon scene command-line arguments.
///
/// CLI values override settings loaded from `aerostat.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "aerostat", about = "Balloon flight scene")]
pub struct CliArgs {
    /// Seed for the mountain ring's randomized variety.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Mountain ring distance from the scene center.
    #[arg(long)]
    pub ring_distance: Option<f32>,

    /// Requested mountain segment count.
    #[arg(long)]
    pub mountain_count: Option<u32>,

    /// World-space height of the fog plane.
    #[arg(long)]
    pub fog_height: Option<f32>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(seed) = args.seed {
            self.mountains.seed = seed;
        }
        if let Some(distance) = args.ring_distance {
            self.mountains.ring_distance = distance;
        }
        if let Some(count) = args.mountain_count {
            self.mountains.count = count;
        }
        if let Some(height) = args.fog_height {
            self.fog.height = height;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_override() {
        let mut config = Config::default();
        let args = CliArgs {
            seed: Some(99),
            fog_height: Some(75.0),
            ..CliArgs::default()
        };
        config.apply_cli_overrides(&args);
        assert_eq!(config.mountains.seed, 99);
        assert_eq!(config.fog.height, 75.0);
        // Non-overridden fields retain defaults
        assert_eq!(config.mountains.count, 24);
        assert_eq!(config.fog.depth, 60.0);
    }

    #[test]
    fn test_cli_no_override() {
        let original = Config::default();
        let mut config = Config::default();
        config.apply_cli_overrides(&CliArgs::default());
        assert_eq!(config, original);
    }

    #[test]
    fn test_cli_parses_long_flags() {
        let args = CliArgs::parse_from([
            "aerostat",
            "--seed",
            "7",
            "--ring-distance",
            "900",
            "--log-level",
            "debug",
        ]);
        assert_eq!(args.seed, Some(7));
        assert_eq!(args.ring_distance, Some(900.0));
        assert_eq!(args.log_level.as_deref(), Some("debug"));
    }
}

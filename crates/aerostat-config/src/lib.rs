//! Configuration system for the balloon scene.
//!
//! Provides runtime-configurable settings that persist to disk as RON files.
//! Supports CLI overrides via clap, hot-reload detection, and forward/backward
//! compatible serialization.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{
    CONFIG_FILE, Config, DebugSettings, FogSettings, MountainSettings, SkySettings, StarSettings,
    TerrainSettings,
};
pub use error::ConfigError;

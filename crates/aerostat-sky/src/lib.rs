//! Sky dome: gradient background, equatorial ring, procedural star field, and
//! the fog-consistent horizon blend.

mod dome;
mod renderer;
mod sky;

pub use dome::{DomeMesh, SKY_VERTEX_LAYOUT, SkyVertex, generate_dome};
pub use renderer::{SKY_SHADER_SOURCE, SkyDomeRenderer, SkyUniforms};
pub use sky::{SkyDome, SkyRingConfig, StarConfig, ring_blend, star_opacity};

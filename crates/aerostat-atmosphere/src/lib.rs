//! Height- and distance-based fog: the parameter model, the material registry,
//! the CPU fog math, and the fogged terrain render pipeline.

mod color;
mod fog;
mod model;
mod params;
mod pipeline;

pub use color::hsl_to_rgb;
pub use fog::{
    FALLOFF_START_FRACTION, FOG_SATURATION, close_color, combined_fog, distance_falloff,
    distance_fog_factor, distant_color, fog_color_at, height_fog_factor, smoothstep,
};
pub use model::{FaceSide, FogMaterialId, FogModel, FoggedMaterial, MaterialFlags};
pub use params::{FogParams, FogParamsPatch};
pub use pipeline::{FOG_SHADER_SOURCE, FogUniforms, FoggedPipeline, ModelUniform, draw_fogged};

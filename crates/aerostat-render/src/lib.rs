//! Camera and GPU buffer plumbing shared by the terrain and sky pipelines.

mod buffer;
mod camera;

pub use buffer::MeshBuffer;
pub use camera::{Camera, CameraUniform};

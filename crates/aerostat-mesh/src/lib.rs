//! Height-field mesh construction: grid triangulation, smooth normals, and the
//! canonical terrain vertex format shared by every render pipeline.

mod builder;
mod terrain_mesh;
mod vertex;

pub use builder::MeshBuilder;
pub use terrain_mesh::TerrainMesh;
pub use vertex::{TERRAIN_VERTEX_ATTRIBUTES, TERRAIN_VERTEX_LAYOUT, TerrainVertex};

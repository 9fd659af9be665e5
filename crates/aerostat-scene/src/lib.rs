//! Scene ownership: the flat node store, the disposal discipline, and the
//! mountain-ring spawn/regenerate cycle built on top of it.

mod graph;
mod ring_set;

pub use graph::{NodeId, NodeTransform, SceneGraph, SceneNode};
pub use ring_set::RingSet;

//! Spawning and regenerating the mountain ring inside a scene.

use glam::Vec3;

use aerostat_atmosphere::{FaceSide, FogModel};
use aerostat_terrain::{MountainRing, MountainRingParams, generate_mountain_ring};

use crate::graph::{NodeId, NodeTransform, SceneGraph};

/// The scene-side handle to a spawned mountain ring: its segment nodes plus
/// the ground plane node.
///
/// Regeneration is the central resource-management discipline: every prior
/// node is removed (dropping its mesh) and every prior material deregistered
/// before the replacement spawns.
#[derive(Default)]
pub struct RingSet {
    segment_nodes: Vec<NodeId>,
    ground_node: Option<NodeId>,
}

impl RingSet {
    /// Place a generated ring into the scene, creating one fogged material per
    /// segment plus one for the ground plane.
    pub fn spawn(
        scene: &mut SceneGraph,
        fog: &mut FogModel,
        ring: MountainRing,
        params: &MountainRingParams,
    ) -> Self {
        let mut segment_nodes = Vec::with_capacity(ring.segments.len());
        for segment in ring.segments {
            let material = fog.create_material(params.mountain_color, FaceSide::Front);
            let id = scene.insert(
                segment.mesh,
                Some(material),
                NodeTransform {
                    translation: segment.position,
                    yaw: segment.yaw,
                },
            );
            segment_nodes.push(id);
        }

        let ground_material = fog.create_material(params.ground_color, FaceSide::Front);
        let ground_node = scene.insert(
            ring.ground.mesh,
            Some(ground_material),
            NodeTransform::at(Vec3::new(0.0, ring.ground.y, 0.0)),
        );

        log::info!(
            "mountain ring spawned: {} segments + ground",
            segment_nodes.len()
        );

        Self {
            segment_nodes,
            ground_node: Some(ground_node),
        }
    }

    /// Remove every node of this set from the scene, deregistering materials.
    pub fn despawn(&mut self, scene: &mut SceneGraph, fog: &mut FogModel) {
        for id in self.segment_nodes.drain(..) {
            scene.remove(id, fog);
        }
        if let Some(id) = self.ground_node.take() {
            scene.remove(id, fog);
        }
    }

    /// Discard the current ring and build a replacement from `params` and
    /// `seed`. Returns the new segment count.
    pub fn regenerate(
        &mut self,
        scene: &mut SceneGraph,
        fog: &mut FogModel,
        params: &MountainRingParams,
        seed: u64,
    ) -> usize {
        self.despawn(scene, fog);
        let ring = generate_mountain_ring(params, seed);
        *self = Self::spawn(scene, fog, ring, params);
        self.segment_nodes.len()
    }

    /// Number of scene nodes this set owns (segments + ground).
    pub fn node_count(&self) -> usize {
        self.segment_nodes.len() + usize::from(self.ground_node.is_some())
    }

    /// The segment node ids, in ring order.
    pub fn segment_nodes(&self) -> &[NodeId] {
        &self.segment_nodes
    }
}

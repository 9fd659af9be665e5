//! Flat scene graph owning generated meshes and their material registrations.

use std::collections::BTreeMap;

use glam::{Mat4, Vec3};

use aerostat_atmosphere::{FogMaterialId, FogModel};
use aerostat_mesh::TerrainMesh;

/// Handle to a scene node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(u64);

/// Placement of a node: translation plus yaw about +Y, which is all the
/// generated meshes need (segments face outward, patches sit at the origin).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct NodeTransform {
    /// World-space translation.
    pub translation: Vec3,
    /// Rotation about +Y in radians.
    pub yaw: f32,
}

impl NodeTransform {
    /// Placement at a position with no rotation.
    pub fn at(translation: Vec3) -> Self {
        Self {
            translation,
            yaw: 0.0,
        }
    }

    /// The local-to-world matrix.
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_translation(self.translation) * Mat4::from_rotation_y(self.yaw)
    }
}

/// A node: one mesh, its optional fogged material, and its placement.
#[derive(Clone, Debug)]
pub struct SceneNode {
    /// The displayed mesh, exclusively owned by this node.
    pub mesh: TerrainMesh,
    /// The node's fogged material registration, if any.
    pub material: Option<FogMaterialId>,
    /// World placement.
    pub transform: NodeTransform,
}

/// Flat store of scene nodes keyed by [`NodeId`].
///
/// Nodes own their meshes exclusively; removal drops the mesh and deregisters
/// the material, which is the leak-freedom discipline the regeneration paths
/// rely on. `child_count` is the observable baseline for it.
#[derive(Default)]
pub struct SceneGraph {
    nodes: BTreeMap<NodeId, SceneNode>,
    next_id: u64,
}

impl SceneGraph {
    /// An empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a node, taking ownership of its mesh.
    pub fn insert(
        &mut self,
        mesh: TerrainMesh,
        material: Option<FogMaterialId>,
        transform: NodeTransform,
    ) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        self.nodes.insert(
            id,
            SceneNode {
                mesh,
                material,
                transform,
            },
        );
        id
    }

    /// Remove a node, dropping its mesh and deregistering its material.
    ///
    /// Returns whether the node existed; removing an unknown id is a no-op.
    pub fn remove(&mut self, id: NodeId, fog: &mut FogModel) -> bool {
        match self.nodes.remove(&id) {
            Some(node) => {
                if let Some(material) = node.material {
                    fog.remove_material(material);
                }
                true
            }
            None => false,
        }
    }

    /// Look up a node.
    pub fn get(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.get(&id)
    }

    /// Number of nodes in the scene.
    pub fn child_count(&self) -> usize {
        self.nodes.len()
    }

    /// Iterate nodes in id order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &SceneNode)> {
        self.nodes.iter().map(|(id, node)| (*id, node))
    }

    /// Tear down the scene, deregistering every node's material.
    pub fn clear(&mut self, fog: &mut FogModel) {
        let count = self.nodes.len();
        for (_, node) in std::mem::take(&mut self.nodes) {
            if let Some(material) = node.material {
                fog.remove_material(material);
            }
        }
        log::debug!("scene cleared: {count} nodes dropped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aerostat_atmosphere::FaceSide;
    use aerostat_mesh::MeshBuilder;

    fn quad() -> TerrainMesh {
        MeshBuilder::new(2, 2, 1.0, 1.0).build(|_, _| 0.0, |_| [0.5; 3])
    }

    #[test]
    fn test_insert_and_remove_tracks_counts() {
        let mut scene = SceneGraph::new();
        let mut fog = FogModel::default();

        let material = fog.create_material([0.5; 3], FaceSide::Front);
        let id = scene.insert(quad(), Some(material), NodeTransform::default());
        assert_eq!(scene.child_count(), 1);
        assert_eq!(fog.material_count(), 1);

        assert!(scene.remove(id, &mut fog));
        assert_eq!(scene.child_count(), 0);
        assert_eq!(fog.material_count(), 0, "removal must deregister the material");
        assert!(!scene.remove(id, &mut fog), "double remove is a no-op");
    }

    #[test]
    fn test_node_without_material_removes_cleanly() {
        let mut scene = SceneGraph::new();
        let mut fog = FogModel::default();
        let id = scene.insert(quad(), None, NodeTransform::at(Vec3::new(5.0, 0.0, 0.0)));
        assert!(scene.remove(id, &mut fog));
        assert_eq!(fog.material_count(), 0);
    }

    #[test]
    fn test_clear_deregisters_everything() {
        let mut scene = SceneGraph::new();
        let mut fog = FogModel::default();
        for i in 0..5 {
            let material = fog.create_material([i as f32 * 0.1; 3], FaceSide::Front);
            scene.insert(quad(), Some(material), NodeTransform::default());
        }
        scene.clear(&mut fog);
        assert_eq!(scene.child_count(), 0);
        assert_eq!(fog.material_count(), 0);
    }

    #[test]
    fn test_ids_are_never_reused() {
        let mut scene = SceneGraph::new();
        let mut fog = FogModel::default();
        let a = scene.insert(quad(), None, NodeTransform::default());
        scene.remove(a, &mut fog);
        let b = scene.insert(quad(), None, NodeTransform::default());
        assert_ne!(a, b);
    }

    #[test]
    fn test_transform_matrix_applies_translation_then_yaw() {
        let transform = NodeTransform {
            translation: Vec3::new(10.0, 0.0, 0.0),
            yaw: std::f32::consts::FRAC_PI_2,
        };
        // Local +X rotates onto -Z before translating.
        let p = transform.matrix() * glam::Vec4::new(1.0, 0.0, 0.0, 1.0);
        assert!((p.x - 10.0).abs() < 1e-5);
        assert!((p.z + 1.0).abs() < 1e-5);
    }
}

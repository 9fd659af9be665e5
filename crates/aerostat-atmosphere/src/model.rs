//! Single source of truth for fog state and its propagation to materials.
//!
//! Every fog-aware material registers itself here at creation and deregisters
//! when its mesh leaves the scene. Parameter updates then touch exactly the
//! registered materials — no scene traversal, no guessing which materials are
//! fog-aware.

use std::collections::BTreeMap;

use glam::Vec4;

use aerostat_render::Camera;

use crate::fog;
use crate::params::{FogParams, FogParamsPatch};
use crate::pipeline::FogUniforms;

/// Handle to a registered fogged material.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FogMaterialId(u32);

/// Which faces of the geometry the material renders.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FaceSide {
    /// Render front faces, cull back faces.
    #[default]
    Front,
    /// Render back faces, cull front faces (the inside of a dome).
    Back,
    /// Render both faces.
    Both,
}

impl FaceSide {
    /// The wgpu cull mode for this side.
    pub fn cull_mode(self) -> Option<wgpu::Face> {
        match self {
            FaceSide::Front => Some(wgpu::Face::Back),
            FaceSide::Back => Some(wgpu::Face::Front),
            FaceSide::Both => None,
        }
    }
}

/// Structural material properties, preserved across the recreate path.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MaterialFlags {
    /// Alpha-blend instead of opaque.
    pub transparent: bool,
    /// Opacity in `[0, 1]`, meaningful with `transparent`.
    pub opacity: f32,
    /// Draw as wireframe.
    pub wireframe: bool,
    /// Modulate the base color by per-vertex colors.
    pub vertex_colors: bool,
}

impl Default for MaterialFlags {
    fn default() -> Self {
        Self {
            transparent: false,
            opacity: 1.0,
            wireframe: false,
            vertex_colors: true,
        }
    }
}

/// A registered fog-aware material: its defining inputs plus the live uniform
/// bundle the renderer uploads.
#[derive(Clone, Debug)]
pub struct FoggedMaterial {
    /// Base surface color.
    pub base_color: [f32; 3],
    /// Face side the material renders.
    pub side: FaceSide,
    /// Structural flags.
    pub flags: MaterialFlags,
    /// The uniform bundle, refreshed in place on parameter updates.
    pub uniforms: FogUniforms,
    /// Set when the renderer must re-link the material's shader state; cleared
    /// by [`FogModel::take_relink`].
    needs_relink: bool,
    /// Bumped by [`FogModel::recreate_all_materials`]; a renderer holding GPU
    /// state for an older generation must rebuild its pipeline.
    generation: u32,
}

impl FoggedMaterial {
    /// Generation counter, bumped on structural recreation.
    pub fn generation(&self) -> u32 {
        self.generation
    }
}

/// Owns [`FogParams`], the fog plane, and the registry of fogged materials.
pub struct FogModel {
    params: FogParams,
    /// World-space fog plane: normal points down, constant is the fog height.
    world_plane: Vec4,
    /// The world plane transformed into view space, updated once per frame.
    view_plane: Vec4,
    materials: BTreeMap<FogMaterialId, FoggedMaterial>,
    next_id: u32,
}

impl FogModel {
    /// Create a model with the given initial parameters.
    pub fn new(params: FogParams) -> Self {
        let world_plane = Vec4::new(0.0, -1.0, 0.0, params.height);
        Self {
            params,
            world_plane,
            view_plane: world_plane,
            materials: BTreeMap::new(),
            next_id: 0,
        }
    }

    /// The live parameters.
    pub fn params(&self) -> &FogParams {
        &self.params
    }

    /// The world-space fog plane `(normal.xyz, constant)`.
    pub fn world_plane(&self) -> Vec4 {
        self.world_plane
    }

    /// The fog plane in view space, as of the last [`Self::update_plane`].
    pub fn view_plane(&self) -> Vec4 {
        self.view_plane
    }

    /// Per-frame hook: transform the world-space fog plane into view space and
    /// push it into every registered material's uniforms.
    ///
    /// The fog math runs in view space, so this must follow every camera move
    /// or rotation — in practice, once per frame, unconditionally.
    pub fn update_plane(&mut self, camera: &Camera) {
        // Plane coefficients transform by the inverse-transpose of the
        // point transform (world → view).
        let view = camera.view_matrix();
        self.view_plane = view.inverse().transpose() * self.world_plane;

        let plane = self.view_plane.to_array();
        for material in self.materials.values_mut() {
            material.uniforms.plane = plane;
        }
    }

    /// Register a fogged material with default flags.
    pub fn create_material(&mut self, base_color: [f32; 3], side: FaceSide) -> FogMaterialId {
        self.create_material_with_flags(base_color, side, MaterialFlags::default())
    }

    /// Register a fogged material with explicit structural flags.
    pub fn create_material_with_flags(
        &mut self,
        base_color: [f32; 3],
        side: FaceSide,
        flags: MaterialFlags,
    ) -> FogMaterialId {
        let id = FogMaterialId(self.next_id);
        self.next_id += 1;

        let uniforms = FogUniforms::new(&self.params, self.view_plane, base_color, &flags);
        self.materials.insert(
            id,
            FoggedMaterial {
                base_color,
                side,
                flags,
                uniforms,
                needs_relink: false,
                generation: 0,
            },
        );
        id
    }

    /// Look up a registered material.
    pub fn material(&self, id: FogMaterialId) -> Option<&FoggedMaterial> {
        self.materials.get(&id)
    }

    /// The uniform bundle for a material, if registered.
    pub fn uniforms(&self, id: FogMaterialId) -> Option<&FogUniforms> {
        self.materials.get(&id).map(|m| &m.uniforms)
    }

    /// Deregister a material. Returns `false` if it was never registered (or
    /// already removed) — a no-op, not an error.
    pub fn remove_material(&mut self, id: FogMaterialId) -> bool {
        self.materials.remove(&id).is_some()
    }

    /// Refresh one material's uniforms from the live parameters.
    ///
    /// Unregistered ids are silently skipped: the outcome is "will not fog",
    /// never a failure.
    pub fn refresh_material(&mut self, id: FogMaterialId) -> bool {
        let view_plane = self.view_plane;
        let Some(material) = self.materials.get_mut(&id) else {
            return false;
        };
        material.uniforms = FogUniforms::new(
            &self.params,
            view_plane,
            material.base_color,
            &material.flags,
        );
        true
    }

    /// Number of registered materials. The observable baseline for the
    /// disposal discipline: after a ring regeneration this must return to its
    /// pre-regeneration value plus the new segment count.
    pub fn material_count(&self) -> usize {
        self.materials.len()
    }

    /// Merge a parameter patch and propagate it.
    ///
    /// The cheap path: uniforms are rewritten in place for every registered
    /// material and each is marked for shader re-link, but no material is
    /// structurally rebuilt. Runs in O(registered materials).
    pub fn update_params(&mut self, patch: &FogParamsPatch) {
        let height_changed = patch.apply(&mut self.params);
        if height_changed {
            self.world_plane.w = self.params.height;
        }

        for material in self.materials.values_mut() {
            material.uniforms = FogUniforms::new(
                &self.params,
                self.view_plane,
                material.base_color,
                &material.flags,
            );
            material.needs_relink = true;
        }

        log::debug!(
            "fog params updated across {} materials (height_changed: {})",
            self.materials.len(),
            height_changed
        );
    }

    /// The expensive path: rebuild every registered material from scratch as
    /// [`Self::create_material_with_flags`] would, preserving base color, side,
    /// and structural flags. Call only when a material-defining input changed,
    /// not for plain parameter updates.
    pub fn recreate_all_materials(&mut self) {
        for material in self.materials.values_mut() {
            material.uniforms = FogUniforms::new(
                &self.params,
                self.view_plane,
                material.base_color,
                &material.flags,
            );
            material.needs_relink = true;
            material.generation += 1;
        }
        log::info!("recreated {} fogged materials", self.materials.len());
    }

    /// Consume a material's re-link flag. Returns `false` for unregistered ids.
    pub fn take_relink(&mut self, id: FogMaterialId) -> bool {
        match self.materials.get_mut(&id) {
            Some(material) => std::mem::take(&mut material.needs_relink),
            None => false,
        }
    }

    /// Fog color at a view distance, for consumers that blend against the fog
    /// without being fogged themselves (the sky horizon).
    pub fn color_at(&self, view_distance: f32) -> [f32; 3] {
        fog::fog_color_at(&self.params, view_distance)
    }

    /// The close fog color.
    pub fn close_color(&self) -> [f32; 3] {
        fog::close_color(&self.params)
    }

    /// The distant fog color.
    pub fn distant_color(&self) -> [f32; 3] {
        fog::distant_color(&self.params)
    }
}

impl Default for FogModel {
    fn default() -> Self {
        Self::new(FogParams::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Quat, Vec3};

    #[test]
    fn test_world_plane_points_down_at_fog_height() {
        let model = FogModel::new(FogParams {
            height: 55.0,
            ..FogParams::default()
        });
        assert_eq!(model.world_plane(), Vec4::new(0.0, -1.0, 0.0, 55.0));
    }

    #[test]
    fn test_height_update_rewrites_plane_constant_exactly() {
        let mut model = FogModel::default();
        model.update_params(&FogParamsPatch::height(90.0));
        assert_eq!(model.world_plane().w, 90.0);
        assert_eq!(model.params().height, 90.0);
    }

    #[test]
    fn test_update_plane_with_identity_camera_is_world_plane() {
        let mut model = FogModel::default();
        let camera = Camera::default(); // at origin, identity rotation
        model.update_plane(&camera);
        let plane = model.view_plane();
        assert!((plane - model.world_plane()).length() < 1e-5);
    }

    #[test]
    fn test_update_plane_reflects_camera_translation() {
        let mut model = FogModel::new(FogParams {
            height: 40.0,
            ..FogParams::default()
        });
        let camera = Camera {
            position: Vec3::new(0.0, 25.0, 0.0),
            ..Camera::default()
        };
        model.update_plane(&camera);

        // A world point at the fog height sits on the plane in any space.
        let world_point = Vec3::new(3.0, 40.0, -7.0);
        let view_point = camera.view_matrix() * world_point.extend(1.0);
        let plane = model.view_plane();
        let signed = plane.truncate().dot(view_point.truncate()) + plane.w;
        assert!(signed.abs() < 1e-4, "on-plane point at distance {signed}");

        // A point below the fog height has positive signed distance (fogged).
        let below = camera.view_matrix() * Vec3::new(0.0, 10.0, -5.0).extend(1.0);
        assert!(plane.truncate().dot(below.truncate()) + plane.w > 0.0);
    }

    #[test]
    fn test_update_plane_reflects_camera_rotation() {
        let mut model = FogModel::default();
        let camera = Camera {
            position: Vec3::new(12.0, 3.0, -8.0),
            rotation: Quat::from_euler(glam::EulerRot::YXZ, 1.1, -0.4, 0.0),
            ..Camera::default()
        };
        model.update_plane(&camera);

        let plane = model.view_plane();
        let world_point = Vec3::new(-20.0, model.params().height, 14.0);
        let view_point = camera.view_matrix() * world_point.extend(1.0);
        let signed = plane.truncate().dot(view_point.truncate()) + plane.w;
        assert!(signed.abs() < 1e-3);
    }

    #[test]
    fn test_height_change_then_plane_update_chains() {
        let mut model = FogModel::default();
        let camera = Camera {
            position: Vec3::new(0.0, 10.0, 0.0),
            ..Camera::default()
        };
        model.update_params(&FogParamsPatch::height(100.0));
        model.update_plane(&camera);

        let view_point = camera.view_matrix() * Vec3::new(0.0, 100.0, -1.0).extend(1.0);
        let plane = model.view_plane();
        assert!((plane.truncate().dot(view_point.truncate()) + plane.w).abs() < 1e-4);
    }

    #[test]
    fn test_create_and_remove_materials_tracks_count() {
        let mut model = FogModel::default();
        assert_eq!(model.material_count(), 0);
        let a = model.create_material([0.5; 3], FaceSide::Front);
        let b = model.create_material([0.1; 3], FaceSide::Both);
        assert_eq!(model.material_count(), 2);
        assert!(model.remove_material(a));
        assert!(!model.remove_material(a), "double remove must be a no-op");
        assert_eq!(model.material_count(), 1);
        assert!(model.material(b).is_some());
    }

    #[test]
    fn test_update_params_refreshes_all_registered_materials() {
        let mut model = FogModel::default();
        let a = model.create_material([0.5; 3], FaceSide::Front);
        let b = model.create_material([0.9, 0.2, 0.2], FaceSide::Back);

        model.update_params(&FogParamsPatch {
            depth: Some(150.0),
            start_distance: Some(500.0),
            ..FogParamsPatch::default()
        });

        for id in [a, b] {
            let uniforms = model.uniforms(id).expect("registered material");
            assert_eq!(uniforms.depth(), 150.0);
            assert_eq!(uniforms.start_distance(), 500.0);
            assert!(model.take_relink(id), "material must be marked for re-link");
            assert!(!model.take_relink(id), "take must consume the flag");
        }
    }

    #[test]
    fn test_unregistered_material_operations_are_noops() {
        let mut model = FogModel::default();
        let id = model.create_material([0.5; 3], FaceSide::Front);
        model.remove_material(id);

        assert!(!model.refresh_material(id));
        assert!(!model.take_relink(id));
        assert!(model.uniforms(id).is_none());
        // A parameter update with a stale id around must not panic.
        model.update_params(&FogParamsPatch::height(10.0));
    }

    #[test]
    fn test_recreate_preserves_inputs_and_bumps_generation() {
        let mut model = FogModel::default();
        let flags = MaterialFlags {
            transparent: true,
            opacity: 0.35,
            wireframe: true,
            vertex_colors: false,
        };
        let id = model.create_material_with_flags([0.7, 0.6, 0.5], FaceSide::Both, flags);

        model.recreate_all_materials();

        let material = model.material(id).expect("still registered");
        assert_eq!(material.base_color, [0.7, 0.6, 0.5]);
        assert_eq!(material.side, FaceSide::Both);
        assert_eq!(material.flags, flags);
        assert_eq!(material.generation(), 1);
        assert_eq!(material.uniforms.surface[3], 0.35);
    }

    #[test]
    fn test_materials_share_live_params() {
        // Many materials, one parameter source: a single update reaches all.
        let mut model = FogModel::default();
        let ids: Vec<_> = (0..17)
            .map(|i| model.create_material([i as f32 / 17.0; 3], FaceSide::Front))
            .collect();
        model.update_params(&FogParamsPatch {
            end_distance: Some(9999.0),
            ..FogParamsPatch::default()
        });
        for id in ids {
            assert_eq!(model.uniforms(id).unwrap().end_distance(), 9999.0);
        }
    }
}

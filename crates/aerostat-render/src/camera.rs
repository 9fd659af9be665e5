//! Camera producing view and projection matrices for the scene.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Quat, Vec3};

/// A first-person camera the orchestrator moves every frame.
///
/// Produces a right-handed view matrix and a reverse-Z perspective projection
/// (near plane maps to depth 1, far to 0).
#[derive(Debug, Clone)]
pub struct Camera {
    /// World-space position.
    pub position: Vec3,
    /// Rotation as a unit quaternion.
    pub rotation: Quat,
    /// Vertical field of view in radians.
    pub fov_y: f32,
    /// Width / height.
    pub aspect_ratio: f32,
    /// Near clip plane distance (always positive).
    pub near: f32,
    /// Far clip plane distance (always positive, > near).
    pub far: f32,
}

impl Camera {
    /// Compute the view matrix (inverse of the camera's world transform).
    pub fn view_matrix(&self) -> Mat4 {
        let rotation = Mat4::from_quat(self.rotation);
        let translation = Mat4::from_translation(self.position);
        (translation * rotation).inverse()
    }

    /// Compute the reverse-Z perspective projection matrix.
    pub fn projection_matrix(&self) -> Mat4 {
        // Reverse-Z: swap near/far so near maps to z=1 and far to z=0.
        Mat4::perspective_rh(self.fov_y, self.aspect_ratio, self.far, self.near)
    }

    /// Combined view-projection matrix.
    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// The forward direction vector (-Z in camera space).
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::NEG_Z
    }

    /// The up direction vector (+Y in camera space).
    pub fn up(&self) -> Vec3 {
        self.rotation * Vec3::Y
    }

    /// The right direction vector (+X in camera space).
    pub fn right(&self) -> Vec3 {
        self.rotation * Vec3::X
    }

    /// Update the aspect ratio after a viewport resize.
    pub fn set_aspect_ratio(&mut self, width: f32, height: f32) {
        self.aspect_ratio = width / height;
    }

    /// Convert the camera to a uniform suitable for GPU upload.
    pub fn to_uniform(&self) -> CameraUniform {
        CameraUniform {
            view_proj: self.view_projection_matrix().to_cols_array_2d(),
            view: self.view_matrix().to_cols_array_2d(),
            position: [self.position.x, self.position.y, self.position.z, 0.0],
        }
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            fov_y: std::f32::consts::FRAC_PI_4, // 45 degrees
            aspect_ratio: 16.0 / 9.0,
            near: 0.1,
            far: 10000.0,
        }
    }
}

/// Camera uniform: clip transform, view transform, and world position.
///
/// The view matrix rides along because fog shading is evaluated in view space.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct CameraUniform {
    /// Combined view-projection matrix.
    pub view_proj: [[f32; 4]; 4],
    /// View matrix alone, for view-space fog evaluation.
    pub view: [[f32; 4]; 4],
    /// Camera world position (w unused).
    pub position: [f32; 4],
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_identity_camera_looks_down_neg_z() {
        let camera = Camera::default();
        let forward = camera.forward();
        assert!(forward.x.abs() < 1e-6);
        assert!(forward.y.abs() < 1e-6);
        assert!((forward.z + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_view_matrix_inverse_is_camera_transform() {
        let camera = Camera {
            position: Vec3::new(10.0, 20.0, 30.0),
            rotation: Quat::from_rotation_y(FRAC_PI_2),
            ..Camera::default()
        };
        let reconstructed = camera.view_matrix().inverse().col(3).truncate();
        assert!((reconstructed - camera.position).length() < 1e-4);
    }

    #[test]
    fn test_view_matrix_moves_world_opposite_to_camera() {
        let camera = Camera {
            position: Vec3::new(0.0, 5.0, 0.0),
            ..Camera::default()
        };
        let p = camera.view_matrix() * glam::Vec4::new(0.0, 5.0, -10.0, 1.0);
        // A point level with the camera, 10 ahead, lands at view-space (0, 0, -10).
        assert!(p.x.abs() < 1e-5);
        assert!(p.y.abs() < 1e-5);
        assert!((p.z + 10.0).abs() < 1e-5);
    }

    #[test]
    fn test_up_right_forward_orthogonal() {
        let camera = Camera {
            rotation: Quat::from_euler(glam::EulerRot::YXZ, 0.7, -0.2, 0.0),
            ..Camera::default()
        };
        let (f, u, r) = (camera.forward(), camera.up(), camera.right());
        assert!((f.length() - 1.0).abs() < 1e-6);
        assert!(f.dot(u).abs() < 1e-6);
        assert!(f.dot(r).abs() < 1e-6);
        assert!(u.dot(r).abs() < 1e-6);
    }

    #[test]
    fn test_set_aspect_ratio() {
        let mut camera = Camera::default();
        camera.set_aspect_ratio(1920.0, 1080.0);
        assert!((camera.aspect_ratio - 16.0 / 9.0).abs() < 1e-6);
    }

    #[test]
    fn test_uniform_carries_view_and_position() {
        let camera = Camera {
            position: Vec3::new(1.0, 2.0, 3.0),
            ..Camera::default()
        };
        let uniform = camera.to_uniform();
        assert_eq!(uniform.position, [1.0, 2.0, 3.0, 0.0]);
        assert_eq!(uniform.view, camera.view_matrix().to_cols_array_2d());
    }

    #[test]
    fn test_uniform_size_is_144_bytes() {
        assert_eq!(std::mem::size_of::<CameraUniform>(), 144);
    }
}

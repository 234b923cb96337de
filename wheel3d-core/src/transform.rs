//! Scene-graph transforms and matrix helpers
use nalgebra::{Isometry3, Matrix4, Translation3, UnitQuaternion, Vector3};

/// Rigid local transform of a scene node: translation followed by rotation.
///
/// Rotations are applied about the node's own axes, so repeated `rotate_z`
/// calls accumulate without any explicit wrapping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub translation: Vector3<f32>,
    pub rotation: UnitQuaternion<f32>,
}

impl Transform {
    pub fn identity() -> Self {
        Self {
            translation: Vector3::zeros(),
            rotation: UnitQuaternion::identity(),
        }
    }

    pub fn from_translation(x: f32, y: f32, z: f32) -> Self {
        Self {
            translation: Vector3::new(x, y, z),
            rotation: UnitQuaternion::identity(),
        }
    }

    /// Rotate about the local Z axis (in radians)
    pub fn rotate_z(&mut self, angle: f32) {
        self.rotation *= UnitQuaternion::from_axis_angle(&Vector3::z_axis(), angle);
    }

    /// Move along the local Y axis
    pub fn translate_y(&mut self, distance: f32) {
        self.translation += self.rotation * Vector3::new(0.0, distance, 0.0);
    }

    /// Signed rotation about Z, wrapped to `(-pi, pi]`
    pub fn angle_z(&self) -> f32 {
        let (_, _, yaw) = self.rotation.euler_angles();
        yaw
    }

    pub fn isometry(&self) -> Isometry3<f32> {
        Isometry3::from_parts(Translation3::from(self.translation), self.rotation)
    }

    /// Transform of `child` expressed in this node's parent space
    pub fn compose(&self, child: &Transform) -> Transform {
        let iso = self.isometry() * child.isometry();
        Self {
            translation: iso.translation.vector,
            rotation: iso.rotation,
        }
    }

    pub fn matrix(&self) -> Matrix4<f32> {
        self.isometry().to_homogeneous()
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

/// Create a model-view-projection matrix
pub fn mvp_matrix(
    model: &Matrix4<f32>,
    view: &Matrix4<f32>,
    projection: &Matrix4<f32>,
) -> Matrix4<f32> {
    projection * view * model
}

use nalgebra::{Isometry3, Matrix4, Point3, Translation3, UnitQuaternion, Vector3};

use std::ops;

/// Rigid transform, used for camera poses.
#[derive(Clone, Debug, PartialEq)]
pub struct Transform(Isometry3<f32>);

impl Transform {
    pub fn eye() -> Self {
        Self(Isometry3::identity())
    }

    pub fn new(translation: &Vector3<f32>, rotation: UnitQuaternion<f32>) -> Self {
        Self(Isometry3::from_parts(
            Translation3::new(translation[0], translation[1], translation[2]),
            rotation,
        ))
    }

    pub fn from_translation(translation: &Vector3<f32>) -> Self {
        Self::new(translation, UnitQuaternion::identity())
    }

    /// Camera-to-world pose of a camera at `eye` whose +Z axis points at `target`.
    ///
    /// # Arguments
    ///
    /// * eye - Camera center in world coordinates.
    /// * target - Point the optical axis goes through.
    /// * up - Direction that the camera's +Y axis should roughly follow.
    pub fn look_at(eye: &Vector3<f32>, target: &Vector3<f32>, up: &Vector3<f32>) -> Self {
        Self(Isometry3::face_towards(
            &Point3::from(*eye),
            &Point3::from(*target),
            up,
        ))
    }

    pub fn inverse(&self) -> Self {
        Self(self.0.inverse())
    }

    pub fn translation(&self) -> Vector3<f32> {
        self.0.translation.vector
    }

    pub fn transform_vector(&self, point: &Vector3<f32>) -> Vector3<f32> {
        self.0.transform_point(&Point3::from(*point)).coords
    }

    pub fn to_matrix4(&self) -> Matrix4<f32> {
        self.0.to_homogeneous()
    }
}

impl ops::Mul<&Vector3<f32>> for &Transform {
    type Output = Vector3<f32>;

    fn mul(self, rhs: &Vector3<f32>) -> Self::Output {
        self.transform_vector(rhs)
    }
}

impl ops::Mul<&Transform> for &Transform {
    type Output = Transform;

    fn mul(self, rhs: &Transform) -> Self::Output {
        Transform(self.0 * rhs.0)
    }
}

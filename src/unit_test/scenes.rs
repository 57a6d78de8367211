use nalgebra::Vector3;
use ndarray::Array2;
use rstest::fixture;

use crate::{
    camera::{CameraIntrinsics, PinholeCamera},
    fusion::{FusionFrame, VisibilityParameters},
    projection::ClipProjection,
    transform::Transform,
};

pub const NEAR: f32 = 0.1;
pub const FAR: f32 = 10.0;

/// Camera at `(0, 0, -2)` looking down +z at the origin, with a 64x48 image.
pub struct WallScene {
    pub camera: PinholeCamera,
}

impl WallScene {
    /// Depth map of a fronto-parallel wall `distance` units in front of the camera.
    pub fn depth_at_distance(&self, distance: f32) -> Array2<f32> {
        Array2::from_elem((self.camera.height(), self.camera.width()), distance)
    }

    pub fn frame_at_distance(&self, distance: f32) -> FusionFrame {
        FusionFrame::from_camera(&self.camera, self.depth_at_distance(distance))
    }

    pub fn clip_projection(&self) -> ClipProjection {
        self.camera.clip_projection(NEAR, FAR).unwrap()
    }

    pub fn visibility_params(&self) -> VisibilityParameters {
        VisibilityParameters::new(self.camera.width(), self.camera.height())
    }
}

#[fixture]
pub fn wall_scene() -> WallScene {
    WallScene {
        camera: PinholeCamera::new(
            CameraIntrinsics::new(50.0, 50.0, 32.0, 24.0, 64, 48),
            Transform::from_translation(&Vector3::new(0.0, 0.0, -2.0)),
        ),
    }
}

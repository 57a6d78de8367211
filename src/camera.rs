use nalgebra::{Matrix3, Matrix3x4, Matrix4, Vector3};

use super::transform::Transform;
use crate::error::{Error, Result};
use crate::projection::{ClipProjection, PixelProjection};

/// Camera intrinsic parameters.
#[derive(Clone, Debug)]
pub struct CameraIntrinsics {
    /// Focal length and pixel scale in the X-axis.
    pub fx: f64,
    /// Focal length and pixel scale in the Y-axis.
    pub fy: f64,
    /// Camera X-center.
    pub cx: f64,
    /// Camera Y-center.
    pub cy: f64,
    pub width: usize,
    pub height: usize,
}

impl CameraIntrinsics {
    pub fn new(fx: f64, fy: f64, cx: f64, cy: f64, width: usize, height: usize) -> Self {
        Self {
            fx,
            fy,
            cx,
            cy,
            width,
            height,
        }
    }

    /// Project a point in camera space into image space.
    ///
    /// # Arguments
    ///
    /// * point: The 3D point.
    ///
    /// # Returns
    ///
    /// * (x and y) coordinates.
    pub fn project(&self, point: &Vector3<f32>) -> (f32, f32) {
        (
            point[0] * self.fx as f32 / point[2] + self.cx as f32,
            point[1] * self.fy as f32 / point[2] + self.cy as f32,
        )
    }

    pub fn backproject(&self, x: f32, y: f32, z: f32) -> Vector3<f32> {
        Vector3::new(
            (x - self.cx as f32) * z / self.fx as f32,
            (y - self.cy as f32) * z / self.fy as f32,
            z,
        )
    }

    /// The 3x3 K matrix.
    pub fn matrix(&self) -> Matrix3<f32> {
        Matrix3::new(
            self.fx as f32,
            0.0,
            self.cx as f32,
            0.0,
            self.fy as f32,
            self.cy as f32,
            0.0,
            0.0,
            1.0,
        )
    }
}

/// Pinhole camera with a pose. Camera space follows the +Z forward, +Y down convention.
#[derive(Clone, Debug)]
pub struct PinholeCamera {
    pub intrinsics: CameraIntrinsics,
    pub camera_to_world: Transform,
    world_to_camera: Transform,
}

impl PinholeCamera {
    pub fn new(intrinsics: CameraIntrinsics, camera_to_world: Transform) -> Self {
        Self {
            intrinsics,
            world_to_camera: camera_to_world.inverse(),
            camera_to_world,
        }
    }

    pub fn width(&self) -> usize {
        self.intrinsics.width
    }

    pub fn height(&self) -> usize {
        self.intrinsics.height
    }

    pub fn world_to_camera(&self) -> &Transform {
        &self.world_to_camera
    }

    /// Project a 3D world point into image space.
    pub fn project(&self, point: &Vector3<f32>) -> (f32, f32) {
        self.intrinsics
            .project(&self.world_to_camera.transform_vector(point))
    }

    /// The combined `K [R | t]` matrix used by the direct pixel projection.
    pub fn pixel_projection(&self) -> PixelProjection {
        let extrinsics: Matrix4<f32> = self.world_to_camera.to_matrix4();
        let rt: Matrix3x4<f32> = extrinsics.fixed_slice::<3, 4>(0, 0).into_owned();
        PixelProjection::new(self.intrinsics.matrix() * rt)
    }

    /// Clip-space matrix whose viewport mapping reproduces this camera's pixel grid.
    ///
    /// The clip `w` is the camera-space depth, `x_ndc = 2u/width - 1` and
    /// `y_ndc = 1 - 2v/height`, so the image row after the vertical flip is `v`.
    /// Depths in `[near, far]` map to `z_ndc` in `[-1, 1]`.
    pub fn clip_projection(&self, near: f32, far: f32) -> Result<ClipProjection> {
        if !(near > 0.0) || !(far > near) {
            return Err(Error::invalid_parameter(format!(
                "Invalid clip planes: near {near}, far {far}"
            )));
        }

        let CameraIntrinsics {
            fx,
            fy,
            cx,
            cy,
            width,
            height,
        } = self.intrinsics;
        let (w, h) = (width as f32, height as f32);
        let (fx, fy, cx, cy) = (fx as f32, fy as f32, cx as f32, cy as f32);

        #[rustfmt::skip]
        let projection = Matrix4::new(
            2.0 * fx / w, 0.0,           2.0 * cx / w - 1.0,          0.0,
            0.0,          -2.0 * fy / h, 1.0 - 2.0 * cy / h,          0.0,
            0.0,          0.0,           (far + near) / (far - near), -2.0 * far * near / (far - near),
            0.0,          0.0,           1.0,                         0.0,
        );

        Ok(ClipProjection::new(projection * self.world_to_camera.to_matrix4()))
    }
}

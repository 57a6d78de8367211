use nalgebra::Vector3;
use ndarray::Array2;
use volfusion::{
    camera::{CameraIntrinsics, PinholeCamera},
    transform::Transform,
};

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Cameras on a half ring in front of the `z = 0` wall, all looking at the origin.
pub fn wall_cameras(intrinsics: &CameraIntrinsics, count: usize) -> Vec<PinholeCamera> {
    (0..count)
        .map(|i| {
            let angle = -0.5 + i as f32 / (count.max(2) - 1) as f32;
            let eye = Vector3::new(2.0 * angle.sin(), 0.2 * angle, -2.0 * angle.cos());
            PinholeCamera::new(
                intrinsics.clone(),
                Transform::look_at(&eye, &Vector3::zeros(), &Vector3::new(0.0, -1.0, 0.0)),
            )
        })
        .collect()
}

/// Depth map of the plane `z = wall_z`, zero where the ray misses it.
pub fn render_wall_depth(camera: &PinholeCamera, wall_z: f32) -> Array2<f32> {
    let origin = camera.camera_to_world.translation();
    Array2::from_shape_fn((camera.height(), camera.width()), |(row, col)| {
        let ray = camera.intrinsics.backproject(col as f32, row as f32, 1.0);
        let direction = camera.camera_to_world.transform_vector(&ray) - origin;
        let depth = (wall_z - origin[2]) / direction[2];
        if depth.is_finite() && depth > 0.0 {
            depth
        } else {
            0.0
        }
    })
}

/// World point seen at a pixel of a depth map.
pub fn backproject_pixel(camera: &PinholeCamera, row: usize, col: usize, depth: f32) -> Vector3<f32> {
    camera
        .camera_to_world
        .transform_vector(&camera.intrinsics.backproject(col as f32, row as f32, depth))
}

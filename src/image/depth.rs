use image::{ImageBuffer, Luma};
use ndarray::Array2;
use nshare::ToNdarray2;

/// Whether a measured depth counts as an observation.
///
/// Zero is the sensor's invalid pixel marker and, like negative or non-finite
/// values, never counts. Depths past `max_depth` are also dropped when it is set.
#[inline]
pub fn is_valid_depth(depth: f32, max_depth: Option<f32>) -> bool {
    depth > 0.0 && depth.is_finite() && max_depth.map_or(true, |max| depth <= max)
}

/// Converts a raw integral depth image into metric depth.
///
/// # Arguments
///
/// * `depth_image` - Raw depth, 0 marks invalid pixels.
/// * `depth_scale` - Meters per raw unit, e.g. `1.0 / 1000.0` for millimeters.
///
/// # Returns
///
/// The depth map in meters. Invalid pixels stay 0.
pub fn depth_from_u16(depth_image: &Array2<u16>, depth_scale: f32) -> Array2<f32> {
    depth_image.map(|raw| *raw as f32 * depth_scale)
}

/// Same as [`depth_from_u16`], for 16 bit grayscale images as loaded by the `image` crate.
pub fn depth_from_luma16(
    depth_image: ImageBuffer<Luma<u16>, Vec<u16>>,
    depth_scale: f32,
) -> Array2<f32> {
    depth_from_u16(&depth_image.into_ndarray2(), depth_scale)
}

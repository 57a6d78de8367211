use image::RgbImage;
use ndarray::Array3;

/// Trait to convert into ndarray::Array3, this is different than nshare version
/// because it uses the shape [height, width, channels] instead of [channels, height, width].
pub trait IntoArray3 {
    fn into_array3(self) -> Array3<u8>;
}

impl IntoArray3 for RgbImage {
    fn into_array3(self) -> Array3<u8> {
        let (width, height) = self.dimensions();
        Array3::from_shape_fn((height as usize, width as usize, 3), |(y, x, c)| {
            self.get_pixel(x as u32, y as u32)[c]
        })
    }
}

/// Float color map, [height, width, 3], values in 0..255.
pub fn color_from_rgb8(color: &Array3<u8>) -> Array3<f32> {
    color.map(|c| *c as f32)
}

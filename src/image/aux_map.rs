use image::RgbImage;
use ndarray::{Array2, Array3};

use super::rgb::{color_from_rgb8, IntoArray3};

/// Per-pixel auxiliary observation that is fused alongside depth.
#[derive(Clone, Debug)]
pub enum AuxMap {
    /// RGB color, shape [height, width, 3].
    Color(Array3<f32>),
    /// Integer class ids, shape [height, width]. Negative ids mark unknown pixels.
    Labels(Array2<i32>),
    /// Per-class scores, shape [height, width, K], fused as they are.
    Probabilities(Array3<f32>),
}

impl AuxMap {
    pub fn from_rgb_image(image: RgbImage) -> Self {
        AuxMap::Color(color_from_rgb8(&image.into_array3()))
    }

    pub fn width(&self) -> usize {
        match self {
            AuxMap::Color(color) => color.shape()[1],
            AuxMap::Labels(labels) => labels.shape()[1],
            AuxMap::Probabilities(probs) => probs.shape()[1],
        }
    }

    pub fn height(&self) -> usize {
        match self {
            AuxMap::Color(color) => color.shape()[0],
            AuxMap::Labels(labels) => labels.shape()[0],
            AuxMap::Probabilities(probs) => probs.shape()[0],
        }
    }

    /// Number of values per pixel.
    pub fn channels(&self) -> Option<usize> {
        match self {
            AuxMap::Color(color) => Some(color.shape()[2]),
            AuxMap::Labels(_) => None,
            AuxMap::Probabilities(probs) => Some(probs.shape()[2]),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            AuxMap::Color(_) => "color map",
            AuxMap::Labels(_) => "label map",
            AuxMap::Probabilities(_) => "probability map",
        }
    }
}

use ndarray::Array2;

use crate::{camera::PinholeCamera, image::AuxMap, projection::PixelProjection};

/// Auxiliary observation of a frame, with the projection of the sensor that captured it.
#[derive(Clone, Debug)]
pub struct AuxFrame {
    pub projection: PixelProjection,
    pub map: AuxMap,
}

/// One depth observation, optionally with color or labels, ready to be fused.
#[derive(Clone, Debug)]
pub struct FusionFrame {
    /// World to depth-image projection.
    pub depth_projection: PixelProjection,
    /// Metric depth along the camera axis, shape [height, width]. Zero marks invalid pixels.
    pub depth: Array2<f32>,
    pub aux: Option<AuxFrame>,
}

impl FusionFrame {
    pub fn new(depth_projection: PixelProjection, depth: Array2<f32>) -> Self {
        Self {
            depth_projection,
            depth,
            aux: None,
        }
    }

    pub fn from_camera(camera: &PinholeCamera, depth: Array2<f32>) -> Self {
        Self::new(camera.pixel_projection(), depth)
    }

    /// Attaches an auxiliary map captured by a second sensor.
    pub fn with_aux(mut self, projection: PixelProjection, map: AuxMap) -> Self {
        self.aux = Some(AuxFrame { projection, map });
        self
    }

    /// Attaches an auxiliary map registered to the depth image.
    pub fn with_aligned_aux(self, map: AuxMap) -> Self {
        let projection = self.depth_projection.clone();
        self.with_aux(projection, map)
    }

    pub fn width(&self) -> usize {
        self.depth.shape()[1]
    }

    pub fn height(&self) -> usize {
        self.depth.shape()[0]
    }
}

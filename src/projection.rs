//! World-to-image projection used by the fusion kernels.
//!
//! Two paths are provided:
//!
//! * [`PixelProjection`]: a combined `K [R | t]` 3x4 matrix that maps a world point
//!   straight to `(u d, v d, d)`. Used by the dense volume.
//! * [`ClipProjection`]: a 4x4 clip-space matrix followed by frustum clipping,
//!   the NDC division and the viewport transform. Used by the point fusion.
//!
//! Both are plain values; projecting does not mutate anything.
use nalgebra::{Matrix3x4, Matrix4, Vector3, Vector4};
use ndarray::ArrayView2;

use crate::error::{Error, Result};

/// Pixel hit by a [`PixelProjection`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PixelPoint {
    pub row: usize,
    pub col: usize,
    /// Depth along the camera's principal axis.
    pub depth: f32,
}

/// Pixel hit by a [`ClipProjection`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewportPoint {
    pub row: usize,
    pub col: usize,
    /// Clip `w`, equal to the camera space depth for perspective matrices.
    pub w_clip: f32,
}

fn check_finite(values: &[f32], expected: &'static str, rows: usize, cols: usize) -> Result<()> {
    if values.iter().all(|v| v.is_finite()) {
        Ok(())
    } else {
        Err(Error::MalformedMatrix {
            expected,
            rows,
            cols,
        })
    }
}

/// Direct projection with a 3x4 intrinsic-extrinsic matrix.
#[derive(Clone, Debug, PartialEq)]
pub struct PixelProjection(Matrix3x4<f32>);

impl PixelProjection {
    pub fn new(matrix: Matrix3x4<f32>) -> Self {
        Self(matrix)
    }

    /// Accepts a 3x4 matrix, or a 4x4 one whose last row is dropped.
    pub fn from_array(matrix: ArrayView2<f32>) -> Result<Self> {
        let (rows, cols) = matrix.dim();
        if !(rows == 3 || rows == 4) || cols != 4 {
            return Err(Error::MalformedMatrix {
                expected: "3x4 or 4x4",
                rows,
                cols,
            });
        }
        let values: Vec<f32> = matrix.slice(ndarray::s![..3, ..]).iter().copied().collect();
        check_finite(&values, "3x4 or 4x4", rows, cols)?;
        Ok(Self(Matrix3x4::from_row_slice(&values)))
    }

    /// Folds the viewport transform of a `width x height` view into a clip matrix.
    ///
    /// The result maps a point to `(col w_c, row w_c, w_c)`, with the row already
    /// flipped, so its depth is the clip `w`. Frustum clipping along z is not kept.
    pub fn from_clip(clip: &ClipProjection, width: usize, height: usize) -> Self {
        let (half_w, half_h) = (width as f32 * 0.5, height as f32 * 0.5);
        #[rustfmt::skip]
        let viewport = Matrix3x4::new(
            half_w, 0.0,     0.0, half_w,
            0.0,    -half_h, 0.0, half_h,
            0.0,    0.0,     0.0, 1.0,
        );
        Self(viewport * clip.matrix())
    }

    pub fn matrix(&self) -> &Matrix3x4<f32> {
        &self.0
    }

    /// Projects `point` onto a `width x height` image with nearest pixel rounding.
    ///
    /// # Returns
    ///
    /// * None if the depth is not positive or the pixel lies outside the image.
    pub fn project(&self, point: &Vector3<f32>, width: usize, height: usize) -> Option<PixelPoint> {
        let projected = self.0 * point.push(1.0);
        let depth = projected[2];
        if !(depth > 0.0) {
            return None;
        }

        let col = (projected[0] / depth).round();
        let row = (projected[1] / depth).round();
        if col >= 0.0 && col < width as f32 && row >= 0.0 && row < height as f32 {
            Some(PixelPoint {
                row: row as usize,
                col: col as usize,
                depth,
            })
        } else {
            None
        }
    }
}

/// Clip-space projection with a 4x4 matrix.
#[derive(Clone, Debug, PartialEq)]
pub struct ClipProjection(Matrix4<f32>);

impl ClipProjection {
    pub fn new(matrix: Matrix4<f32>) -> Self {
        Self(matrix)
    }

    pub fn from_array(matrix: ArrayView2<f32>) -> Result<Self> {
        let (rows, cols) = matrix.dim();
        if rows != 4 || cols != 4 {
            return Err(Error::MalformedMatrix {
                expected: "4x4",
                rows,
                cols,
            });
        }
        let values: Vec<f32> = matrix.iter().copied().collect();
        check_finite(&values, "4x4", rows, cols)?;
        Ok(Self(Matrix4::from_row_slice(&values)))
    }

    pub fn matrix(&self) -> &Matrix4<f32> {
        &self.0
    }

    /// Homogeneous clip coordinates `(x_c, y_c, z_c, w_c)` of a world point.
    pub fn clip(&self, point: &Vector3<f32>) -> Vector4<f32> {
        self.0 * point.push(1.0)
    }

    /// Whether the point is in front of the camera and inside the canonical view volume.
    pub fn is_visible(clip: &Vector4<f32>) -> bool {
        let w = clip[3];
        w > 0.0 && clip[0].abs() <= w && clip[1].abs() <= w && clip[2].abs() <= w
    }

    /// Projects `point` onto a `width x height` viewport.
    ///
    /// The vertical screen axis points up, so the image row is `height - y_screen`.
    ///
    /// # Returns
    ///
    /// * None if the point is behind the camera, outside the frustum, or falls on
    ///   the one pixel past the image border that the rounding can produce.
    pub fn project(
        &self,
        point: &Vector3<f32>,
        width: usize,
        height: usize,
    ) -> Option<ViewportPoint> {
        let clip = self.clip(point);
        if !Self::is_visible(&clip) {
            return None;
        }

        let w_clip = clip[3];
        let (x_ndc, y_ndc) = (clip[0] / w_clip, clip[1] / w_clip);
        let (width_f, height_f) = (width as f32, height as f32);
        let x_screen = ((width_f * x_ndc + width_f) * 0.5).round() as usize;
        let y_screen = ((height_f * y_ndc + height_f) * 0.5).round() as usize;

        if x_screen >= width || y_screen == 0 || y_screen > height {
            return None;
        }

        Some(ViewportPoint {
            row: height - y_screen,
            col: x_screen,
            w_clip,
        })
    }
}

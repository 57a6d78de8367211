use nalgebra::{ClosedAdd, ClosedSub, Scalar, Vector3};
use num::{ToPrimitive, Zero};

use crate::error::{Error, Result};

/// Axis-aligned box in world coordinates.
#[derive(Clone, Debug, PartialEq)]
pub struct Box3D<T>
where
    T: Scalar + Zero + ClosedAdd,
{
    pub min: Vector3<T>,
    pub max: Vector3<T>,
}

impl<T> Box3D<T>
where
    T: Scalar + Zero + ClosedAdd + ClosedSub,
{
    pub fn new(min: Vector3<T>, max: Vector3<T>) -> Self {
        Self { min, max }
    }

    /// Builds the box from three `(min, max)` pairs, one per axis.
    pub fn from_axis_pairs(pairs: [[T; 2]; 3]) -> Self {
        let [[x0, x1], [y0, y1], [z0, z1]] = pairs;
        Self {
            min: Vector3::new(x0, y0, z0),
            max: Vector3::new(x1, y1, z1),
        }
    }

    pub fn empty() -> Self {
        Self {
            min: Vector3::<T>::zero(),
            max: Vector3::<T>::zero(),
        }
    }

    pub fn size(&self) -> Vector3<T> {
        self.max.clone() - self.min.clone()
    }
}

impl Box3D<f32> {
    /// Tight box around the given points. Returns an empty box if there are no points.
    pub fn from_points<'a, I>(points: I) -> Self
    where
        I: IntoIterator<Item = &'a Vector3<f32>>,
    {
        let mut iter = points.into_iter();
        let first = match iter.next() {
            Some(first) => *first,
            None => return Self::empty(),
        };

        iter.fold(Self::new(first, first), |bbox, point| Self {
            min: bbox.min.inf(point),
            max: bbox.max.sup(point),
        })
    }

    /// Grows the box by `factor` times its size on every side.
    pub fn stretched(&self, factor: f32) -> Self {
        let pad = self.size() * factor;
        Self {
            min: self.min - pad,
            max: self.max + pad,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.min
            .iter()
            .zip(self.max.iter())
            .any(|(min, max)| !(max > min))
    }

    pub fn contains(&self, point: &Vector3<f32>) -> bool {
        (0..3).all(|i| point[i] >= self.min[i] && point[i] <= self.max[i])
    }

    /// Fails if any coordinate is not finite or any axis has non-positive extent.
    pub fn validate(&self) -> Result<()> {
        if self.min.iter().chain(self.max.iter()).any(|v| !v.is_finite()) {
            return Err(Error::invalid_parameter(format!(
                "Bounding box has non-finite coordinates: {:?}",
                self
            )));
        }
        if self.is_empty() {
            return Err(Error::invalid_parameter(format!(
                "Bounding box is degenerate: min {:?}, max {:?}",
                self.min.as_slice(),
                self.max.as_slice()
            )));
        }
        Ok(())
    }

    /// Number of voxels per axis for the given voxel edge length, `ceil(size / resolution)`.
    pub fn grid_shape(&self, resolution: f32) -> Result<(usize, usize, usize)> {
        if !(resolution > 0.0) || !resolution.is_finite() {
            return Err(Error::invalid_parameter(format!(
                "Resolution must be positive, got {resolution}"
            )));
        }
        self.validate()?;

        let size = self.size();
        let mut shape = [0usize; 3];
        for (dim, extent) in shape.iter_mut().zip(size.iter()) {
            // Tolerates the rounding error of extents that are exact multiples.
            let cells = (extent / resolution - 1e-4).ceil().max(1.0);
            *dim = cells.to_usize().ok_or_else(|| {
                Error::invalid_parameter(format!("Grid too large for resolution {resolution}"))
            })?;
        }
        Ok((shape[0], shape[1], shape[2]))
    }
}

pub type Box3Df = Box3D<f32>;

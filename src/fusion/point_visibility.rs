use nalgebra::Vector3;
use ndarray::{Array1, ArrayView2};
use rayon::prelude::*;

use super::{
    observation::{FreespaceEvidence, PointObservation, Visibility},
    params::VisibilityParameters,
};
use crate::{
    error::{Error, Result},
    image::is_valid_depth,
    projection::ClipProjection,
};

/// Aggregate outcome of one fuse call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibilitySummary {
    /// Points that became observed with this frame.
    pub num_newly_observed: usize,
    /// Points observed so far, this frame included.
    pub num_observed: usize,
}

/// Tracks which sample points have been seen on the measured surface by at
/// least one depth frame.
///
/// The per-point state is given by `O`: [`Visibility`] only keeps the
/// observed flag, [`FreespaceEvidence`] also counts the frames that put the
/// point in front of or behind the surface.
pub struct PointVisibilityFusion<O: PointObservation = Visibility> {
    points: Vec<Vector3<f32>>,
    states: Vec<O>,
    params: VisibilityParameters,
}

pub type FreespaceFusion = PointVisibilityFusion<FreespaceEvidence>;

impl<O: PointObservation> PointVisibilityFusion<O> {
    pub fn new(points: Vec<Vector3<f32>>, params: VisibilityParameters) -> Result<Self> {
        params.validate()?;
        if points.iter().any(|p| !p.iter().all(|v| v.is_finite())) {
            return Err(Error::invalid_parameter("Sample points must be finite"));
        }

        log::debug!(
            "Point visibility fusion of {} points, viewport {}x{}",
            points.len(),
            params.viewport_width,
            params.viewport_height
        );

        Ok(Self {
            states: vec![O::default(); points.len()],
            points,
            params,
        })
    }

    /// Creates from an array of shape (N, 3).
    pub fn from_array(points: ArrayView2<f32>, params: VisibilityParameters) -> Result<Self> {
        let (num_points, dims) = points.dim();
        if dims != 3 {
            return Err(Error::shape_mismatch(
                "sample points",
                &[num_points, 3],
                &[num_points, dims],
            ));
        }
        let points = points
            .outer_iter()
            .map(|p| Vector3::new(p[0], p[1], p[2]))
            .collect();
        Self::new(points, params)
    }

    /// Compares every unsettled point against one depth frame.
    ///
    /// # Arguments
    ///
    /// * `projection` - World to clip space matrix of the frame's camera.
    /// * `depth` - Depth map, shape [viewport_height, viewport_width]. Zero marks invalid pixels.
    pub fn fuse(
        &mut self,
        projection: &ClipProjection,
        depth: ArrayView2<f32>,
    ) -> Result<VisibilitySummary> {
        let (width, height) = (self.params.viewport_width, self.params.viewport_height);
        if depth.dim() != (height, width) {
            let (rows, cols) = depth.dim();
            return Err(Error::shape_mismatch(
                "depth map",
                &[height, width],
                &[rows, cols],
            ));
        }

        let epsilon = self.params.epsilon;
        let num_newly_observed = self
            .points
            .par_iter()
            .zip(self.states.par_iter_mut())
            .filter(|(_, state)| !state.is_settled())
            .filter_map(|(point, state)| {
                let hit = projection.project(point, width, height)?;
                let measured = depth[[hit.row, hit.col]];
                if !is_valid_depth(measured, None) {
                    return None;
                }

                let was_observed = state.is_observed();
                state.observe(hit.w_clip, measured, epsilon);
                Some(!was_observed && state.is_observed())
            })
            .filter(|newly_observed| *newly_observed)
            .count();

        let summary = VisibilitySummary {
            num_newly_observed,
            num_observed: self.observed_count(),
        };
        log::debug!(
            "Fused frame: {} points newly observed, {} of {} observed",
            summary.num_newly_observed,
            summary.num_observed,
            self.points.len()
        );
        Ok(summary)
    }

    /// Observed flag of every point, in input order.
    pub fn get_flags(&self) -> Array1<bool> {
        self.states.iter().map(|state| state.is_observed()).collect()
    }

    pub fn observed_count(&self) -> usize {
        self.states.iter().filter(|state| state.is_observed()).count()
    }

    /// Fraction of the points observed so far. Zero if there are no points.
    pub fn coverage(&self) -> f32 {
        if self.points.is_empty() {
            0.0
        } else {
            self.observed_count() as f32 / self.points.len() as f32
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[Vector3<f32>] {
        &self.points
    }

    pub fn states(&self) -> &[O] {
        &self.states
    }

    pub fn params(&self) -> &VisibilityParameters {
        &self.params
    }
}

/// Per-point state accumulated by [`super::PointVisibilityFusion`].
///
/// `observe` is only called for frames in which the point falls inside the
/// view and lands on a pixel with a valid depth.
pub trait PointObservation: Clone + Default + Send + Sync {
    /// When true, later frames can not change the state and the point is skipped.
    fn is_settled(&self) -> bool;

    /// Whether some frame measured the point on the visible surface.
    fn is_observed(&self) -> bool;

    /// Updates the state with one measurement.
    ///
    /// # Arguments
    ///
    /// * `point_depth` - The point's camera space depth.
    /// * `measured_depth` - The depth map value at the point's pixel.
    /// * `epsilon` - Tolerance for the two depths to be considered the same surface.
    fn observe(&mut self, point_depth: f32, measured_depth: f32, epsilon: f32);
}

/// Write-once observed flag.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Visibility {
    observed: bool,
}

impl PointObservation for Visibility {
    fn is_settled(&self) -> bool {
        self.observed
    }

    fn is_observed(&self) -> bool {
        self.observed
    }

    fn observe(&mut self, point_depth: f32, measured_depth: f32, epsilon: f32) {
        if (point_depth - measured_depth).abs() <= epsilon {
            self.observed = true;
        }
    }
}

/// Observed flag plus counts of the frames that placed the point in front of
/// or behind the measured surface.
///
/// A point that is in front of the surface in every frame lies in free space;
/// turning these counts into a distance sign is left to the caller.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FreespaceEvidence {
    pub observed: bool,
    /// Frames where the point was closer to the camera than the surface by more than epsilon.
    pub in_front: u32,
    /// Frames where the point was farther than the surface by more than epsilon.
    pub behind: u32,
}

impl FreespaceEvidence {
    /// Number of frames that measured the point.
    pub fn num_measurements(&self) -> u32 {
        self.in_front
            .saturating_add(self.behind)
            .saturating_add(u32::from(self.observed))
    }
}

impl PointObservation for FreespaceEvidence {
    fn is_settled(&self) -> bool {
        false
    }

    fn is_observed(&self) -> bool {
        self.observed
    }

    fn observe(&mut self, point_depth: f32, measured_depth: f32, epsilon: f32) {
        let gap = measured_depth - point_depth;
        if gap.abs() <= epsilon {
            self.observed = true;
        } else if gap > epsilon {
            self.in_front = self.in_front.saturating_add(1);
        } else {
            self.behind = self.behind.saturating_add(1);
        }
    }
}

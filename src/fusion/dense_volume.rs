use nalgebra::Vector3;
use ndarray::{s, Array3, Array4, ArrayView3, ArrayView4, Axis};
use rayon::prelude::*;

use super::{
    aux_channel::{AuxChannel, AuxSample},
    frame::{AuxFrame, FusionFrame},
    params::VolumeParameters,
};
use crate::{
    bounds::Box3Df,
    error::{Error, Result},
    image::is_valid_depth,
};

/// Aggregate outcome of one fuse call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DenseFusionSummary {
    /// Voxels whose estimate was updated.
    pub num_updated: usize,
    /// Voxels left untouched: outside the view, invalid depth or behind the truncation band.
    pub num_rejected: usize,
}

/// Truncated signed distance grid over a bounding box, fused from depth frames.
///
/// Every voxel holds a running weighted average of the truncated projective
/// distance `measured_depth - voxel_depth`, and, depending on [`AuxChannel`],
/// of a color or a class histogram with the same weight. Voxel `(i, j, k)` is
/// centered at `bbox.min + (i + 0.5, j + 0.5, k + 0.5) * resolution`.
///
/// Results do not depend on the order the frames are fused in.
pub struct DenseFusionVolume {
    bbox: Box3Df,
    params: VolumeParameters,
    channel: AuxChannel,
    /// Shape [X, Y, Z].
    distance: Array3<f32>,
    /// Shape [X, Y, Z].
    weight: Array3<f32>,
    /// Shape [X, Y, Z, C].
    aux: Array4<f32>,
}

impl DenseFusionVolume {
    /// Creates an unobserved volume.
    ///
    /// # Arguments
    ///
    /// * `bbox` - World region covered by the grid. Must have positive extent.
    /// * `params` - Resolution and truncation.
    /// * `channel` - Auxiliary values fused with the distance.
    pub fn new(bbox: Box3Df, params: VolumeParameters, channel: AuxChannel) -> Result<Self> {
        params.validate()?;
        channel.validate()?;
        let shape = bbox.grid_shape(params.resolution)?;
        let truncation = params.truncation_margin();

        log::debug!(
            "Dense fusion volume {}x{}x{} voxels, {} auxiliary channels, truncation {}",
            shape.0,
            shape.1,
            shape.2,
            channel.len(),
            truncation
        );

        Ok(Self {
            distance: Array3::from_elem(shape, truncation),
            weight: Array3::zeros(shape),
            aux: Array4::zeros((shape.0, shape.1, shape.2, channel.len())),
            bbox,
            params,
            channel,
        })
    }

    pub fn shape(&self) -> (usize, usize, usize) {
        self.distance.dim()
    }

    pub fn bbox(&self) -> &Box3Df {
        &self.bbox
    }

    pub fn resolution(&self) -> f32 {
        self.params.resolution
    }

    pub fn truncation_margin(&self) -> f32 {
        self.params.truncation_margin()
    }

    pub fn channel(&self) -> AuxChannel {
        self.channel
    }

    /// World position of a voxel's center.
    pub fn voxel_center(&self, i: usize, j: usize, k: usize) -> Vector3<f32> {
        voxel_center(&self.bbox.min, self.params.resolution, i, j, k)
    }

    /// Index of the voxel containing `point`, if it is inside the grid.
    pub fn world_to_voxel(&self, point: &Vector3<f32>) -> Option<(usize, usize, usize)> {
        let (nx, ny, nz) = self.shape();
        let grid = (point - self.bbox.min) / self.params.resolution;
        if grid.iter().any(|v| !(*v >= 0.0)) {
            return None;
        }

        let (i, j, k) = (
            grid[0].floor() as usize,
            grid[1].floor() as usize,
            grid[2].floor() as usize,
        );
        if i < nx && j < ny && k < nz {
            Some((i, j, k))
        } else {
            None
        }
    }

    /// Fuses a frame with unit weight.
    pub fn fuse(&mut self, frame: &FusionFrame) -> Result<DenseFusionSummary> {
        self.fuse_weighted(frame, 1.0)
    }

    /// Fuses a frame, weighting its observations by `frame_weight`.
    ///
    /// The frame is checked as a whole before any voxel changes: on error the
    /// volume is left as it was.
    pub fn fuse_weighted(
        &mut self,
        frame: &FusionFrame,
        frame_weight: f32,
    ) -> Result<DenseFusionSummary> {
        self.check_frame(frame, frame_weight)?;

        let origin = self.bbox.min;
        let resolution = self.params.resolution;
        let max_depth = self.params.max_depth;
        let truncation = self.params.truncation_margin();
        let depth = frame.depth.view();
        let (height, width) = depth.dim();
        let depth_projection = &frame.depth_projection;
        let aux_frame = frame.aux.as_ref();
        let num_voxels = self.distance.len();

        let num_updated: usize = self
            .distance
            .axis_iter_mut(Axis(0))
            .into_par_iter()
            .zip(self.weight.axis_iter_mut(Axis(0)))
            .zip(self.aux.axis_iter_mut(Axis(0)))
            .enumerate()
            .map(|(i, ((mut distance_slab, mut weight_slab), mut aux_slab))| {
                let mut updated = 0;
                for ((j, k), distance) in distance_slab.indexed_iter_mut() {
                    let center = voxel_center(&origin, resolution, i, j, k);

                    let hit = match depth_projection.project(&center, width, height) {
                        Some(hit) => hit,
                        None => continue,
                    };

                    let measured = depth[[hit.row, hit.col]];
                    if !is_valid_depth(measured, max_depth) {
                        continue;
                    }

                    let sdf = measured - hit.depth;
                    if sdf < -truncation {
                        // Occluded by the observed surface.
                        continue;
                    }
                    let sdf = sdf.min(truncation);

                    let sample = match aux_frame {
                        Some(aux_frame) => match sample_aux(aux_frame, &center) {
                            Some(sample) => Some(sample),
                            None => continue,
                        },
                        None => None,
                    };

                    let weight = &mut weight_slab[[j, k]];
                    let new_weight = *weight + frame_weight;
                    *distance = ((*distance * *weight + sdf * frame_weight) / new_weight)
                        .clamp(-truncation, truncation);

                    if let Some(sample) = sample {
                        aux_slab
                            .slice_mut(s![j, k, ..])
                            .iter_mut()
                            .enumerate()
                            .for_each(|(c, value)| {
                                *value = (*value * *weight + sample.value(c) * frame_weight)
                                    / new_weight;
                            });
                    }

                    *weight = new_weight;
                    updated += 1;
                }
                updated
            })
            .sum();

        let summary = DenseFusionSummary {
            num_updated,
            num_rejected: num_voxels - num_updated,
        };
        log::debug!(
            "Fused frame: {} voxels updated, {} rejected",
            summary.num_updated,
            summary.num_rejected
        );
        Ok(summary)
    }

    fn check_frame(&self, frame: &FusionFrame, frame_weight: f32) -> Result<()> {
        if !(frame_weight > 0.0) || !frame_weight.is_finite() {
            return Err(Error::invalid_parameter(format!(
                "Frame weight must be positive, got {frame_weight}"
            )));
        }
        if frame.depth.is_empty() {
            return Err(Error::invalid_parameter("Empty depth map"));
        }

        match (&frame.aux, self.channel) {
            (None, AuxChannel::None) => Ok(()),
            (None, _) => Err(Error::MissingAuxiliary),
            (Some(aux), channel) => {
                if aux.map.width() == 0 || aux.map.height() == 0 {
                    return Err(Error::invalid_parameter(format!("Empty {}", aux.map.kind())));
                }
                channel.check_map(&aux.map)
            }
        }
    }

    /// The fused grid, shape [X, Y, Z, 1 + C]: the distance followed by the auxiliary channel.
    pub fn extract(&self) -> Array4<f32> {
        let (nx, ny, nz) = self.shape();
        let mut volume = Array4::zeros((nx, ny, nz, 1 + self.channel.len()));
        volume.slice_mut(s![.., .., .., 0]).assign(&self.distance);
        volume.slice_mut(s![.., .., .., 1..]).assign(&self.aux);
        volume
    }

    pub fn distance(&self) -> ArrayView3<f32> {
        self.distance.view()
    }

    /// Auxiliary values, shape [X, Y, Z, C]. Only meaningful where some frame was fused.
    pub fn aux(&self) -> ArrayView4<f32> {
        self.aux.view()
    }

    #[cfg(test)]
    pub(crate) fn weight(&self) -> ArrayView3<f32> {
        self.weight.view()
    }

    /// Number of voxels updated by at least one frame.
    pub fn observed_voxel_count(&self) -> usize {
        self.weight.iter().filter(|w| **w > 0.0).count()
    }
}

#[inline]
fn voxel_center(origin: &Vector3<f32>, resolution: f32, i: usize, j: usize, k: usize) -> Vector3<f32> {
    origin + Vector3::new(i as f32 + 0.5, j as f32 + 0.5, k as f32 + 0.5) * resolution
}

/// Auxiliary sample seen by the second sensor at a voxel, none if it does not see it.
fn sample_aux<'a>(aux_frame: &'a AuxFrame, center: &Vector3<f32>) -> Option<AuxSample<'a>> {
    let hit = aux_frame
        .projection
        .project(center, aux_frame.map.width(), aux_frame.map.height())?;
    AuxSample::at(&aux_frame.map, hit.row, hit.col)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        camera::{CameraIntrinsics, PinholeCamera},
        image::AuxMap,
        projection::PixelProjection,
        transform::Transform,
        unit_test::{wall_scene, WallScene},
    };
    use approx::assert_abs_diff_eq;
    use ndarray::{Array2, Array3};
    use rstest::rstest;

    fn unit_voxel_volume(channel: AuxChannel) -> DenseFusionVolume {
        DenseFusionVolume::new(
            Box3Df::from_axis_pairs([[-0.05, 0.05], [-0.05, 0.05], [-0.05, 0.05]]),
            VolumeParameters::new(0.1, 1.0),
            channel,
        )
        .unwrap()
    }

    #[rstest]
    fn should_fuse_a_voxel_on_the_surface(wall_scene: WallScene) {
        let mut volume = unit_voxel_volume(AuxChannel::None);
        assert_eq!(volume.shape(), (1, 1, 1));
        assert_abs_diff_eq!(volume.voxel_center(0, 0, 0), Vector3::zeros(), epsilon = 1e-7);

        let frame = wall_scene.frame_at_distance(2.0);
        let summary = volume.fuse(&frame).unwrap();

        assert_eq!(summary.num_updated, 1);
        assert_abs_diff_eq!(volume.distance()[[0, 0, 0]], 0.0, epsilon = 1e-5);
        assert_eq!(volume.weight()[[0, 0, 0]], 1.0);
    }

    #[rstest]
    fn should_skip_voxels_behind_the_truncation_band(wall_scene: WallScene) {
        let mut volume = unit_voxel_volume(AuxChannel::None);
        // Surface 0.5 in front of the voxel, margin is 0.1.
        let summary = volume.fuse(&wall_scene.frame_at_distance(1.5)).unwrap();
        assert_eq!(summary.num_updated, 0);
        assert_eq!(summary.num_rejected, 1);
        assert_eq!(volume.weight()[[0, 0, 0]], 0.0);
        assert_eq!(volume.observed_voxel_count(), 0);
    }

    #[rstest]
    fn should_clamp_free_space_to_the_margin(wall_scene: WallScene) {
        let mut volume = unit_voxel_volume(AuxChannel::None);
        volume.fuse(&wall_scene.frame_at_distance(3.0)).unwrap();
        assert_abs_diff_eq!(volume.distance()[[0, 0, 0]], 0.1, epsilon = 1e-6);
    }

    #[rstest]
    fn zero_depth_is_not_an_observation(wall_scene: WallScene) {
        let mut volume = unit_voxel_volume(AuxChannel::None);
        let frame = FusionFrame::new(
            wall_scene.camera.pixel_projection(),
            Array2::zeros((wall_scene.camera.height(), wall_scene.camera.width())),
        );
        let summary = volume.fuse(&frame).unwrap();
        assert_eq!(summary.num_updated, 0);
        assert_eq!(volume.distance()[[0, 0, 0]], 0.1);
    }

    #[rstest]
    fn should_ignore_depths_past_maximum(wall_scene: WallScene) {
        let mut volume = DenseFusionVolume::new(
            Box3Df::from_axis_pairs([[-0.05, 0.05], [-0.05, 0.05], [-0.05, 0.05]]),
            VolumeParameters::new(0.1, 1.0).with_max_depth(1.9),
            AuxChannel::None,
        )
        .unwrap();
        let summary = volume.fuse(&wall_scene.frame_at_distance(2.0)).unwrap();
        assert_eq!(summary.num_updated, 0);
    }

    #[rstest]
    fn should_average_weighted_observations(wall_scene: WallScene) {
        let mut volume = unit_voxel_volume(AuxChannel::None);
        volume
            .fuse_weighted(&wall_scene.frame_at_distance(2.04), 1.0)
            .unwrap();
        volume
            .fuse_weighted(&wall_scene.frame_at_distance(1.98), 3.0)
            .unwrap();
        let expected = (0.04 - 0.02 * 3.0) / 4.0;
        assert_abs_diff_eq!(volume.distance()[[0, 0, 0]], expected, epsilon = 1e-5);
        assert_eq!(volume.weight()[[0, 0, 0]], 4.0);

        assert!(volume
            .fuse_weighted(&wall_scene.frame_at_distance(2.0), 0.0)
            .is_err());
        assert!(volume
            .fuse_weighted(&wall_scene.frame_at_distance(2.0), f32::NAN)
            .is_err());
    }

    #[rstest]
    fn should_fuse_colors(wall_scene: WallScene) {
        let mut volume = unit_voxel_volume(AuxChannel::Color);
        let (height, width) = (wall_scene.camera.height(), wall_scene.camera.width());

        let red = Array3::from_shape_fn((height, width, 3), |(_, _, c)| if c == 0 { 255.0 } else { 0.0 });
        let blue = Array3::from_shape_fn((height, width, 3), |(_, _, c)| if c == 2 { 255.0 } else { 0.0 });
        volume
            .fuse(&wall_scene.frame_at_distance(2.0).with_aligned_aux(AuxMap::Color(red)))
            .unwrap();
        volume
            .fuse(&wall_scene.frame_at_distance(2.0).with_aligned_aux(AuxMap::Color(blue)))
            .unwrap();

        let extracted = volume.extract();
        assert_eq!(extracted.dim(), (1, 1, 1, 4));
        assert_abs_diff_eq!(extracted[[0, 0, 0, 1]], 127.5, epsilon = 1e-3);
        assert_abs_diff_eq!(extracted[[0, 0, 0, 2]], 0.0);
        assert_abs_diff_eq!(extracted[[0, 0, 0, 3]], 127.5, epsilon = 1e-3);
    }

    #[rstest]
    fn one_hot_labels_should_converge(wall_scene: WallScene) {
        let mut volume = unit_voxel_volume(AuxChannel::Histogram(4));
        let (height, width) = (wall_scene.camera.height(), wall_scene.camera.width());
        let labels = Array2::from_elem((height, width), 2);

        for _ in 0..5 {
            volume
                .fuse(
                    &wall_scene
                        .frame_at_distance(2.0)
                        .with_aligned_aux(AuxMap::Labels(labels.clone())),
                )
                .unwrap();
        }
        let histogram: Vec<f32> = volume.aux().slice(s![0, 0, 0, ..]).to_vec();
        assert_eq!(histogram, vec![0.0, 0.0, 1.0, 0.0]);
    }

    #[rstest]
    fn mixed_labels_should_give_class_frequencies(wall_scene: WallScene) {
        let mut volume = unit_voxel_volume(AuxChannel::Histogram(3));
        let (height, width) = (wall_scene.camera.height(), wall_scene.camera.width());
        for label in [0, 1, 1, 1] {
            let labels = AuxMap::Labels(Array2::from_elem((height, width), label));
            volume
                .fuse(&wall_scene.frame_at_distance(2.0).with_aligned_aux(labels))
                .unwrap();
        }
        let histogram: ndarray::Array1<f32> = volume.aux().slice(s![0, 0, 0, ..]).to_owned();
        assert_abs_diff_eq!(histogram[0], 0.25, epsilon = 1e-6);
        assert_abs_diff_eq!(histogram[1], 0.75, epsilon = 1e-6);
        assert_abs_diff_eq!(histogram.sum(), 1.0, epsilon = 1e-6);
    }

    #[rstest]
    fn unknown_labels_should_leave_the_voxel_untouched(wall_scene: WallScene) {
        let mut volume = unit_voxel_volume(AuxChannel::Histogram(3));
        let (height, width) = (wall_scene.camera.height(), wall_scene.camera.width());
        let labels = AuxMap::Labels(Array2::from_elem((height, width), -1));
        let summary = volume
            .fuse(&wall_scene.frame_at_distance(2.0).with_aligned_aux(labels))
            .unwrap();
        assert_eq!(summary.num_updated, 0);
        assert_eq!(volume.weight()[[0, 0, 0]], 0.0);
    }

    #[rstest]
    fn should_fail_fast_on_invalid_frames(wall_scene: WallScene) {
        let mut volume = unit_voxel_volume(AuxChannel::Histogram(3));
        let (height, width) = (wall_scene.camera.height(), wall_scene.camera.width());

        assert!(matches!(
            volume.fuse(&wall_scene.frame_at_distance(2.0)),
            Err(Error::MissingAuxiliary)
        ));

        let mut labels = Array2::from_elem((height, width), 0);
        labels[[0, 0]] = 3;
        assert!(matches!(
            volume.fuse(
                &wall_scene
                    .frame_at_distance(2.0)
                    .with_aligned_aux(AuxMap::Labels(labels))
            ),
            Err(Error::InvalidLabel { label: 3, .. })
        ));
        assert_eq!(volume.weight()[[0, 0, 0]], 0.0);

        let mut plain = unit_voxel_volume(AuxChannel::None);
        assert!(matches!(
            plain.fuse(
                &wall_scene
                    .frame_at_distance(2.0)
                    .with_aligned_aux(AuxMap::Labels(Array2::zeros((height, width))))
            ),
            Err(Error::UnexpectedAuxiliary)
        ));
    }

    fn uniform_color(height: usize, width: usize, rgb: [f32; 3]) -> AuxMap {
        AuxMap::Color(Array3::from_shape_fn((height, width, 3), |(_, _, c)| rgb[c]))
    }

    #[rstest]
    fn should_fuse_aux_maps_from_a_second_sensor(wall_scene: WallScene) {
        let mut volume = unit_voxel_volume(AuxChannel::Color);
        let color_camera = PinholeCamera::new(
            CameraIntrinsics::new(25.0, 25.0, 16.0, 12.0, 32, 24),
            Transform::from_translation(&Vector3::new(0.1, 0.0, -2.0)),
        );
        let frame = wall_scene.frame_at_distance(2.0).with_aux(
            color_camera.pixel_projection(),
            uniform_color(24, 32, [10.0, 200.0, 30.0]),
        );

        let summary = volume.fuse(&frame).unwrap();
        assert_eq!(summary.num_updated, 1);
        assert_eq!(
            volume.aux().slice(s![0, 0, 0, ..]).to_vec(),
            vec![10.0, 200.0, 30.0]
        );
    }

    #[rstest]
    fn voxels_unseen_by_the_aux_sensor_should_be_skipped(wall_scene: WallScene) {
        let mut volume = unit_voxel_volume(AuxChannel::Color);
        // Looks away from the voxel, which ends up behind it.
        let color_camera = PinholeCamera::new(
            CameraIntrinsics::new(25.0, 25.0, 16.0, 12.0, 32, 24),
            Transform::from_translation(&Vector3::new(0.0, 0.0, 1.0)),
        );
        let frame = wall_scene.frame_at_distance(2.0).with_aux(
            color_camera.pixel_projection(),
            uniform_color(24, 32, [255.0, 0.0, 0.0]),
        );

        let summary = volume.fuse(&frame).unwrap();
        assert_eq!(summary.num_updated, 0);
        assert_eq!(volume.weight()[[0, 0, 0]], 0.0);
        assert_eq!(volume.distance()[[0, 0, 0]], volume.truncation_margin());
    }

    #[rstest]
    fn should_average_soft_labels(wall_scene: WallScene) {
        let mut volume = unit_voxel_volume(AuxChannel::Histogram(3));
        let (height, width) = (wall_scene.camera.height(), wall_scene.camera.width());
        for probs in [[0.2, 0.5, 0.3], [0.6, 0.1, 0.3]] {
            let map = AuxMap::Probabilities(Array3::from_shape_fn((height, width, 3), |(_, _, c)| {
                probs[c]
            }));
            volume
                .fuse(&wall_scene.frame_at_distance(2.0).with_aligned_aux(map))
                .unwrap();
        }

        let histogram: ndarray::Array1<f32> = volume.aux().slice(s![0, 0, 0, ..]).to_owned();
        assert_abs_diff_eq!(histogram[0], 0.4, epsilon = 1e-6);
        assert_abs_diff_eq!(histogram[1], 0.3, epsilon = 1e-6);
        assert_abs_diff_eq!(histogram[2], 0.3, epsilon = 1e-6);
    }

    #[rstest]
    fn repeated_color_frames_should_converge(wall_scene: WallScene) {
        let mut volume = unit_voxel_volume(AuxChannel::Color);
        let (height, width) = (wall_scene.camera.height(), wall_scene.camera.width());
        volume
            .fuse(
                &wall_scene
                    .frame_at_distance(2.03)
                    .with_aligned_aux(uniform_color(height, width, [0.0, 0.0, 0.0])),
            )
            .unwrap();

        let frame = wall_scene
            .frame_at_distance(2.03)
            .with_aligned_aux(uniform_color(height, width, [90.0, 180.0, 45.0]));
        let mut last_gap = f32::INFINITY;
        for _ in 0..50 {
            volume.fuse(&frame).unwrap();
            let distance = volume.distance()[[0, 0, 0]];
            assert!(distance > 0.0);
            assert_abs_diff_eq!(distance, 0.03, epsilon = 1e-5);

            let gap = (volume.aux()[[0, 0, 0, 1]] - 180.0).abs();
            assert!(gap < last_gap);
            last_gap = gap;
        }
        let color: ndarray::Array1<f32> = volume.aux().slice(s![0, 0, 0, ..]).to_owned();
        assert_abs_diff_eq!(color[0], 90.0, epsilon = 2.0);
        assert_abs_diff_eq!(color[1], 180.0, epsilon = 4.0);
        assert_abs_diff_eq!(color[2], 45.0, epsilon = 1.0);
    }

    #[rstest]
    fn clip_matrices_should_drive_dense_fusion(wall_scene: WallScene) {
        let (height, width) = (wall_scene.camera.height(), wall_scene.camera.width());
        let clip_frame = FusionFrame::new(
            PixelProjection::from_clip(&wall_scene.clip_projection(), width, height),
            wall_scene.depth_at_distance(2.04),
        );
        let hit = clip_frame
            .depth_projection
            .project(&Vector3::zeros(), width, height)
            .unwrap();
        let expected = wall_scene
            .camera
            .pixel_projection()
            .project(&Vector3::zeros(), width, height)
            .unwrap();
        assert_eq!((hit.row, hit.col), (expected.row, expected.col));

        let mut from_clip = unit_voxel_volume(AuxChannel::None);
        let mut from_camera = unit_voxel_volume(AuxChannel::None);
        from_clip.fuse(&clip_frame).unwrap();
        from_camera
            .fuse(&wall_scene.frame_at_distance(2.04))
            .unwrap();
        assert_abs_diff_eq!(
            from_clip.distance()[[0, 0, 0]],
            from_camera.distance()[[0, 0, 0]],
            epsilon = 1e-5
        );
        assert_abs_diff_eq!(from_clip.distance()[[0, 0, 0]], 0.04, epsilon = 1e-5);
    }

    #[test]
    fn should_reject_invalid_construction() {
        let bbox = Box3Df::from_axis_pairs([[0.0, 1.0], [0.0, 1.0], [0.0, 1.0]]);
        assert!(DenseFusionVolume::new(
            bbox.clone(),
            VolumeParameters::new(-0.1, 2.0),
            AuxChannel::None
        )
        .is_err());
        assert!(DenseFusionVolume::new(
            bbox.clone(),
            VolumeParameters::default(),
            AuxChannel::Histogram(0)
        )
        .is_err());
        assert!(DenseFusionVolume::new(
            Box3Df::from_axis_pairs([[0.0, 1.0], [0.0, 1.0], [1.0, 1.0]]),
            VolumeParameters::default(),
            AuxChannel::None
        )
        .is_err());

        let volume =
            DenseFusionVolume::new(bbox, VolumeParameters::default(), AuxChannel::Color).unwrap();
        assert_eq!(volume.shape(), (20, 20, 20));
        assert!(volume.distance().iter().all(|d| *d == volume.truncation_margin()));
        assert_eq!(volume.extract().dim(), (20, 20, 20, 4));
    }

    #[test]
    fn should_map_world_to_voxels() {
        let volume = DenseFusionVolume::new(
            Box3Df::from_axis_pairs([[0.0, 1.0], [0.0, 1.0], [0.0, 0.5]]),
            VolumeParameters::new(0.25, 2.0),
            AuxChannel::None,
        )
        .unwrap();
        assert_eq!(volume.shape(), (4, 4, 2));
        let center = volume.voxel_center(1, 2, 1);
        assert_eq!(volume.world_to_voxel(&center), Some((1, 2, 1)));
        assert_eq!(volume.world_to_voxel(&Vector3::new(-0.1, 0.5, 0.2)), None);
        assert_eq!(volume.world_to_voxel(&Vector3::new(0.5, 0.5, 0.6)), None);
    }
}

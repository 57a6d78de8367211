use ndarray::{s, ArrayView1};

use crate::{
    error::{Error, Result},
    image::AuxMap,
};

/// Extra values fused per voxel next to the signed distance, with the same weight.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AuxChannel {
    /// Distance only.
    None,
    /// RGB color.
    Color,
    /// K-class histogram. Integer labels are fused as one-hot vectors, so the
    /// averaged histogram is the empirical class distribution.
    Histogram(usize),
}

impl AuxChannel {
    /// Number of values stored per voxel.
    pub fn len(&self) -> usize {
        match self {
            AuxChannel::None => 0,
            AuxChannel::Color => 3,
            AuxChannel::Histogram(num_classes) => *num_classes,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub(crate) fn validate(&self) -> Result<()> {
        match self {
            AuxChannel::Histogram(0) => Err(Error::invalid_parameter(
                "A histogram channel needs at least one class",
            )),
            _ => Ok(()),
        }
    }

    /// Checks that `map` can feed this channel, including every label id.
    pub(crate) fn check_map(&self, map: &AuxMap) -> Result<()> {
        match (self, map) {
            (AuxChannel::None, _) => Err(Error::UnexpectedAuxiliary),
            (AuxChannel::Color, AuxMap::Color(color)) => check_channels(3, color.shape()[2]),
            (AuxChannel::Histogram(num_classes), AuxMap::Probabilities(probs)) => {
                check_channels(*num_classes, probs.shape()[2])
            }
            (AuxChannel::Histogram(num_classes), AuxMap::Labels(labels)) => {
                match labels.iter().find(|label| **label as i64 >= *num_classes as i64) {
                    Some(label) => Err(Error::InvalidLabel {
                        label: *label,
                        num_classes: *num_classes,
                    }),
                    None => Ok(()),
                }
            }
            (channel, map) => Err(Error::invalid_parameter(format!(
                "A {} cannot be fused into a {:?} channel",
                map.kind(),
                channel
            ))),
        }
    }
}

fn check_channels(expected: usize, actual: usize) -> Result<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(Error::shape_mismatch(
            "auxiliary map channels",
            &[expected],
            &[actual],
        ))
    }
}

/// The auxiliary value observed at one pixel.
pub(crate) enum AuxSample<'a> {
    Values(ArrayView1<'a, f32>),
    OneHot(usize),
}

impl<'a> AuxSample<'a> {
    /// Reads the sample at a pixel. Unknown labels give None.
    pub fn at(map: &'a AuxMap, row: usize, col: usize) -> Option<Self> {
        match map {
            AuxMap::Color(color) => Some(AuxSample::Values(color.slice(s![row, col, ..]))),
            AuxMap::Probabilities(probs) => Some(AuxSample::Values(probs.slice(s![row, col, ..]))),
            AuxMap::Labels(labels) => {
                let label = labels[[row, col]];
                if label < 0 {
                    None
                } else {
                    Some(AuxSample::OneHot(label as usize))
                }
            }
        }
    }

    #[inline]
    pub fn value(&self, channel: usize) -> f32 {
        match self {
            AuxSample::Values(values) => values[channel],
            AuxSample::OneHot(label) => {
                if *label == channel {
                    1.0
                } else {
                    0.0
                }
            }
        }
    }
}

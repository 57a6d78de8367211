use std::path::Path;

use serde_derive::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Parameters of a [`super::DenseFusionVolume`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VolumeParameters {
    /// World-space edge length of one voxel.
    pub resolution: f32,
    /// Truncation margin in voxels, the margin in world units is `resolution * truncation_factor`.
    pub truncation_factor: f32,
    /// Measured depths above this are treated as invalid pixels.
    pub max_depth: Option<f32>,
}

impl Default for VolumeParameters {
    fn default() -> Self {
        Self {
            resolution: 0.05,
            truncation_factor: 2.0,
            max_depth: None,
        }
    }
}

impl VolumeParameters {
    pub fn new(resolution: f32, truncation_factor: f32) -> Self {
        Self {
            resolution,
            truncation_factor,
            max_depth: None,
        }
    }

    pub fn with_max_depth(mut self, max_depth: f32) -> Self {
        self.max_depth = Some(max_depth);
        self
    }

    pub fn truncation_margin(&self) -> f32 {
        self.resolution * self.truncation_factor
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.resolution > 0.0) || !self.resolution.is_finite() {
            return Err(Error::invalid_parameter(format!(
                "Resolution must be positive, got {}",
                self.resolution
            )));
        }
        if !(self.truncation_factor > 0.0) || !self.truncation_factor.is_finite() {
            return Err(Error::invalid_parameter(format!(
                "Truncation factor must be positive, got {}",
                self.truncation_factor
            )));
        }
        if let Some(max_depth) = self.max_depth {
            if !(max_depth > 0.0) {
                return Err(Error::invalid_parameter(format!(
                    "Maximum depth must be positive, got {max_depth}"
                )));
            }
        }
        Ok(())
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let params: Self = serde_json::from_str(json)?;
        params.validate()?;
        Ok(params)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let reader = std::io::BufReader::new(std::fs::File::open(path)?);
        let params: Self = serde_json::from_reader(reader)?;
        params.validate()?;
        Ok(params)
    }
}

/// Parameters of a [`super::PointVisibilityFusion`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisibilityParameters {
    pub viewport_width: usize,
    pub viewport_height: usize,
    /// Maximum difference between a point's depth and the measured one for it to count as seen.
    pub epsilon: f32,
}

impl Default for VisibilityParameters {
    fn default() -> Self {
        Self {
            viewport_width: 640,
            viewport_height: 480,
            epsilon: 1e-2,
        }
    }
}

impl VisibilityParameters {
    pub fn new(viewport_width: usize, viewport_height: usize) -> Self {
        Self {
            viewport_width,
            viewport_height,
            ..Default::default()
        }
    }

    pub fn with_epsilon(mut self, epsilon: f32) -> Self {
        self.epsilon = epsilon;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.viewport_width == 0 || self.viewport_height == 0 {
            return Err(Error::invalid_parameter(format!(
                "Viewport must not be empty, got {}x{}",
                self.viewport_width, self.viewport_height
            )));
        }
        if !(self.epsilon >= 0.0) || !self.epsilon.is_finite() {
            return Err(Error::invalid_parameter(format!(
                "Epsilon must be non-negative, got {}",
                self.epsilon
            )));
        }
        Ok(())
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let params: Self = serde_json::from_str(json)?;
        params.validate()?;
        Ok(params)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let reader = std::io::BufReader::new(std::fs::File::open(path)?);
        let params: Self = serde_json::from_reader(reader)?;
        params.validate()?;
        Ok(params)
    }
}

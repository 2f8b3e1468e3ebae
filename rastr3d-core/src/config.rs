/// Scene configuration, loadable from TOML
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::projection::{MAX_FOCAL_LENGTH, MIN_FOCAL_MARGIN};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Raster width in pixels
    pub width: u32,
    /// Raster height in pixels
    pub height: u32,
    /// Initial fx and fy
    pub focal_length: f32,
    /// Focal length change per zoom step
    pub zoom_factor: f32,
    /// Distance the camera retreats along its forward axis
    pub camera_distance: f32,
    /// Bounding radius every model is rescaled to after loading
    pub normalized_radius: f32,
    /// Color written for each projected vertex
    pub point_color: [u8; 3],
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            focal_length: 200.0,
            zoom_factor: 20.0,
            camera_distance: 15.0,
            normalized_radius: 10.0,
            point_color: [255, 255, 255],
        }
    }
}

impl SceneConfig {
    pub fn with_resolution(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    /// Read a config from a TOML file; missing keys keep their defaults
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::InvalidResolution {
                width: self.width,
                height: self.height,
            });
        }
        if !(self.zoom_factor.is_finite() && self.zoom_factor > 0.0) {
            return Err(ConfigError::InvalidZoomFactor(self.zoom_factor));
        }
        let min = MIN_FOCAL_MARGIN + self.zoom_factor;
        if !(self.focal_length > min && self.focal_length < MAX_FOCAL_LENGTH) {
            return Err(ConfigError::InvalidFocalLength {
                focal: self.focal_length,
                min,
                max: MAX_FOCAL_LENGTH,
            });
        }
        if !(self.camera_distance.is_finite() && self.camera_distance > 0.0) {
            return Err(ConfigError::InvalidCameraDistance(self.camera_distance));
        }
        if !(self.normalized_radius.is_finite() && self.normalized_radius > 0.0) {
            return Err(ConfigError::InvalidRadius(self.normalized_radius));
        }
        Ok(())
    }
}

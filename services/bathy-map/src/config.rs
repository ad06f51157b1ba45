//! Map job configuration.
//!
//! Every field has a default, so an empty YAML document (or no file at all)
//! reproduces the standard False Bay map from the files in the working
//! directory.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use bathy_common::{BoundingBox, GridShape};
use renderer::MapStyle;
use serde::{Deserialize, Serialize};

/// Top-level configuration for one map run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    /// Input file locations
    pub inputs: InputFiles,

    /// Where the PNG is written
    pub output: PathBuf,

    /// Layout of the bathymetry file
    pub dataset: DatasetConfig,

    /// Visible longitude/latitude window
    pub viewport: BoundingBox,

    /// Colors, sizes, contour levels and text
    pub style: MapStyle,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            inputs: InputFiles::default(),
            output: PathBuf::from("bathy.png"),
            dataset: DatasetConfig::default(),
            viewport: BoundingBox::new(18.2, -34.6, 19.0, -33.8),
            style: MapStyle::default(),
        }
    }
}

/// Paths of the three delimited input files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputFiles {
    pub bathymetry: PathBuf,
    pub coastline: PathBuf,
    pub landmarks: PathBuf,
}

impl Default for InputFiles {
    fn default() -> Self {
        Self {
            bathymetry: PathBuf::from("bathy_agulhas_2.dat"),
            coastline: PathBuf::from("coastline.dat"),
            landmarks: PathBuf::from("Falsebay_landmarks.txt"),
        }
    }
}

/// Extent and sampling rate of the bathymetry file.
///
/// The grid shape is derived from these, not from the file contents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    pub extent: BoundingBox,
    /// Samples per arcminute along each axis (2 = 30 arcsecond spacing)
    pub samples_per_minute: f64,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            extent: BoundingBox::new(15.0, -43.0, 30.0, -33.0),
            samples_per_minute: 2.0,
        }
    }
}

impl MapConfig {
    /// Load configuration from a YAML file.
    pub fn from_yaml<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read map config from {:?}", path.as_ref()))?;

        let config: MapConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse map config from {:?}", path.as_ref()))?;

        Ok(config)
    }

    /// Check the settings that would otherwise fail deep inside a run.
    pub fn validate(&self) -> Result<()> {
        if !(self.dataset.samples_per_minute > 0.0) {
            bail!(
                "dataset.samples_per_minute must be positive, got {}",
                self.dataset.samples_per_minute
            );
        }
        if self.grid_shape().is_empty() {
            bail!("dataset.extent {:?} gives an empty grid", self.dataset.extent);
        }
        if !self.viewport.is_valid() || self.viewport.width() <= 0.0 || self.viewport.height() <= 0.0 {
            bail!("viewport {:?} has no area", self.viewport);
        }
        self.style.validate().context("Invalid map style")?;
        Ok(())
    }

    /// Rows and columns the bathymetry file is expected to hold.
    pub fn grid_shape(&self) -> GridShape {
        GridShape::from_extent(&self.dataset.extent, self.dataset.samples_per_minute)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_false_bay_job() {
        let config = MapConfig::default();
        assert_eq!(config.output, PathBuf::from("bathy.png"));
        assert_eq!(config.inputs.bathymetry, PathBuf::from("bathy_agulhas_2.dat"));
        // 15 deg of longitude, 10 deg of latitude at 30 arcseconds
        assert_eq!(config.grid_shape(), GridShape::new(1200, 1800));
        assert_eq!(config.style.dpi, 600.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_yaml_overrides() {
        let yaml = r##"
output: out/map.png
inputs:
  landmarks: labels.txt
dataset:
  samples_per_minute: 1
viewport: { min_x: 18.3, min_y: -34.5, max_x: 18.9, max_y: -34.0 }
style:
  dpi: 300
"##;
        let config: MapConfig = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(config.output, PathBuf::from("out/map.png"));
        assert_eq!(config.inputs.landmarks, PathBuf::from("labels.txt"));
        assert_eq!(config.inputs.coastline, PathBuf::from("coastline.dat"));
        assert_eq!(config.grid_shape(), GridShape::new(600, 900));
        assert_eq!(config.viewport.min_x, 18.3);
        assert_eq!(config.style.dpi, 300.0);
        assert_eq!(config.style.contour.levels, vec![20.0, 50.0, 100.0, 200.0]);
    }

    #[test]
    fn test_validate_rejects_zero_sampling() {
        let mut config = MapConfig::default();
        config.dataset.samples_per_minute = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_flat_viewport() {
        let mut config = MapConfig::default();
        config.viewport = BoundingBox::new(18.2, -34.0, 18.2, -33.8);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_config_file() {
        let err = MapConfig::from_yaml("/nonexistent/bathy-map.yaml").unwrap_err();
        assert!(err.to_string().contains("Failed to read map config"));
    }
}

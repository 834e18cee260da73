use std::path::PathBuf;

use crate::error::{Result, TerrainError};

/// Settings that decide how the text grids become world-space geometry.
#[derive(Clone, Debug, PartialEq)]
pub struct TerrainConfig {
    /// World height of a normalized sample of 0.
    pub min_height: f32,
    /// World height of a normalized sample of 1.
    pub max_height: f32,
    /// Build-time spacing between neighbouring grid samples on the horizontal axes.
    pub scale_factor: f32,
    pub elevation_dir: PathBuf,
    pub rgb_dir: PathBuf,
    pub elevation_ext: String,
    pub rgb_ext: String,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        TerrainConfig {
            min_height: -10.0,
            max_height: 0.0,
            scale_factor: 1.0,
            elevation_dir: PathBuf::from("data/elevation"),
            rgb_dir: PathBuf::from("data/rgb"),
            elevation_ext: String::from("e"),
            rgb_ext: String::from("rgb"),
        }
    }
}

impl TerrainConfig {
    pub fn with_height_range(mut self, min_height: f32, max_height: f32) -> Self {
        self.min_height = min_height;
        self.max_height = max_height;
        self
    }

    pub fn with_scale_factor(mut self, scale_factor: f32) -> Self {
        self.scale_factor = scale_factor;
        self
    }

    /// Both data directories live below `root`, as `elevation/` and `rgb/`.
    pub fn with_data_dir<P: Into<PathBuf>>(mut self, root: P) -> Self {
        let root = root.into();
        self.elevation_dir = root.join("elevation");
        self.rgb_dir = root.join("rgb");
        self
    }

    pub fn validate(&self) -> Result<()> {
        validate_scale(self.scale_factor)
    }
}

pub(crate) fn validate_scale(scale: f32) -> Result<()> {
    if scale.is_finite() && scale > 0.0 {
        Ok(())
    } else {
        Err(TerrainError::InvalidScale(scale))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_data_layout() {
        let config = TerrainConfig::default();
        assert_eq!(config.min_height, -10.0);
        assert_eq!(config.max_height, 0.0);
        assert_eq!(config.elevation_dir, PathBuf::from("data/elevation"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn data_dir_sets_both_directories() {
        let config = TerrainConfig::default().with_data_dir("/tmp/maps");
        assert_eq!(config.elevation_dir, PathBuf::from("/tmp/maps/elevation"));
        assert_eq!(config.rgb_dir, PathBuf::from("/tmp/maps/rgb"));
    }

    #[test]
    fn rejects_bad_scale() {
        for scale in &[0.0, -1.0, f32::NAN, f32::INFINITY] {
            let config = TerrainConfig::default().with_scale_factor(*scale);
            match config.validate() {
                Err(TerrainError::InvalidScale(_)) => {}
                other => panic!("unexpected {:?}", other),
            }
        }
    }
}

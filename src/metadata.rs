//! The `meta.data` file that names a terrain and declares its grid size.
//!
//! ```text
//! <name>
//! <rows> <cols>
//! ```

use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use vecmath::Vector3;

use crate::config::TerrainConfig;
use crate::error::{Result, TerrainError};
use crate::mesh::Dimensions;

#[derive(Clone, Debug, PartialEq)]
pub struct Metadata {
    pub name: String,
    pub rows: usize,
    pub cols: usize,
}

impl Metadata {
    pub fn read<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| TerrainError::io(path, e))?;
        let meta = Self::parse(BufReader::new(file), path)?;
        log::debug!("{}: terrain '{}' is {}x{}", path.display(), meta.name, meta.rows, meta.cols);
        Ok(meta)
    }

    pub fn parse<B: BufRead>(reader: B, path: &Path) -> Result<Self> {
        let mut lines = reader.lines();
        let mut next_line = || -> Result<Option<String>> {
            lines.next().transpose().map_err(|e| TerrainError::io(path, e))
        };

        let name = next_line()?.map(|l| l.trim().to_string()).unwrap_or_default();
        let missing = || TerrainError::MissingDimensions { path: path.to_path_buf() };

        let line = next_line()?.ok_or_else(missing)?;
        let mut numbers = line.split_whitespace().map(str::parse::<usize>);
        match (numbers.next(), numbers.next()) {
            (Some(Ok(rows)), Some(Ok(cols))) => Ok(Metadata { name, rows, cols }),
            _ => Err(missing()),
        }
    }

    pub fn write<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let mut file = File::create(path).map_err(|e| TerrainError::io(path, e))?;
        writeln!(file, "{}\n{} {}", self.name, self.rows, self.cols)
            .map_err(|e| TerrainError::io(path, e))
    }

    pub fn dimensions(&self) -> Dimensions {
        Dimensions { rows: self.rows, cols: self.cols }
    }

    pub fn elevation_path(&self, config: &TerrainConfig) -> PathBuf {
        config.elevation_dir.join(format!("{}.{}", self.name, config.elevation_ext))
    }

    pub fn rgb_path(&self, config: &TerrainConfig) -> PathBuf {
        config.rgb_dir.join(format!("{}.{}", self.name, config.rgb_ext))
    }

    /// Above the middle of the grid, just over the highest possible peak.
    pub fn initial_light_position(&self, max_height: f32) -> Vector3<f32> {
        [(self.rows / 2) as f32, max_height + 5.0, (self.cols / 2) as f32]
    }

    pub fn initial_camera_position(&self, max_height: f32) -> Vector3<f32> {
        [(self.rows / 2) as f32, max_height + 50.0, (self.cols / 2) as f32]
    }
}

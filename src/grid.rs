//! Loading of the two text grids a terrain is made of.
//!
//! Both files hold one grid row per line with whitespace separated numbers:
//! one value per column for elevation, three for colors. Elevation samples
//! are expected in [0, 1] and are remapped into the configured height range
//! while loading.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use itertools::Itertools;

use crate::error::{Result, TerrainError};

pub type Rgb = [f32; 3];

/// Row-major world-space heights.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ElevationGrid {
    rows: Vec<Vec<f32>>,
}

/// Row-major color samples, one raw triple per cell.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ColorGrid {
    rows: Vec<Vec<Rgb>>,
}

macro_rules! grid_accessors {
    ($grid:ident, $sample:ty) => {
        impl $grid {
            pub fn from_rows(rows: Vec<Vec<$sample>>) -> Self {
                $grid { rows }
            }

            pub fn row_count(&self) -> usize {
                self.rows.len()
            }

            /// Length of the shortest of the first `rows` rows.
            pub fn min_row_len(&self, rows: usize) -> usize {
                self.rows.iter().take(rows).map(Vec::len).min().unwrap_or(0)
            }

            pub fn rows(&self) -> &[Vec<$sample>] {
                &self.rows
            }

            pub fn is_empty(&self) -> bool {
                self.rows.is_empty()
            }
        }

        impl std::ops::Index<(usize, usize)> for $grid {
            type Output = $sample;

            fn index(&self, (row, col): (usize, usize)) -> &$sample {
                &self.rows[row][col]
            }
        }
    };
}

grid_accessors!(ElevationGrid, f32);
grid_accessors!(ColorGrid, Rgb);

fn open(path: &Path) -> Result<BufReader<File>> {
    File::open(path)
        .map(BufReader::new)
        .map_err(|e| TerrainError::io(path, e))
}

/// Maps a normalized sample into `[min_height, max_height]`.
pub fn remap(value: f32, min_height: f32, max_height: f32) -> f32 {
    value * (max_height - min_height) + min_height
}

fn parse_line(line: &str, path: &Path, line_no: usize) -> Result<Vec<f32>> {
    line.split_whitespace()
        .map(|token| {
            token.parse::<f32>().map_err(|_| TerrainError::Parse {
                path: path.to_path_buf(),
                line: line_no,
                token: token.to_string(),
            })
        })
        .collect()
}

/// Reads lines from `reader` and hands each line's numbers to `row` together
/// with its 1-based line number. Blank lines at the end of the file are
/// ignored; any other blank line reaches `row` with no values.
fn parse_rows<B, T, F>(reader: B, path: &Path, mut row: F) -> Result<Vec<T>>
where
    B: BufRead,
    F: FnMut(Vec<f32>, usize) -> Result<T>,
{
    let mut rows = Vec::new();
    let mut first_blank = None;
    for (idx, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| TerrainError::io(path, e))?;
        if line.trim().is_empty() {
            first_blank.get_or_insert(idx + 1);
            continue;
        }
        if let Some(blank) = first_blank.take() {
            rows.push(row(Vec::new(), blank)?);
        }
        let values = parse_line(&line, path, idx + 1)?;
        rows.push(row(values, idx + 1)?);
    }
    Ok(rows)
}

pub fn parse_elevation<B: BufRead>(
    reader: B,
    path: &Path,
    min_height: f32,
    max_height: f32,
) -> Result<ElevationGrid> {
    let rows: Vec<Vec<f32>> = parse_rows(reader, path, |values, line| {
        if values.is_empty() {
            return Err(TerrainError::BlankRow { path: path.to_path_buf(), line });
        }
        Ok(values
            .into_iter()
            .map(|v| remap(v, min_height, max_height))
            .collect())
    })?;
    Ok(ElevationGrid { rows })
}

/// A row that does not split evenly into triples fails the whole grid;
/// dropping it would shift every following row against the elevation grid.
pub fn parse_colors<B: BufRead>(reader: B, path: &Path) -> Result<ColorGrid> {
    let rows: Vec<Vec<Rgb>> = parse_rows(reader, path, |values, line| {
        if values.is_empty() || values.len() % 3 != 0 {
            return Err(TerrainError::MalformedColorRow {
                path: path.to_path_buf(),
                line,
                values: values.len(),
            });
        }
        Ok(values.into_iter().tuples().map(|(r, g, b)| [r, g, b]).collect())
    })?;
    Ok(ColorGrid { rows })
}

pub fn load_elevation<P: AsRef<Path>>(path: P, min_height: f32, max_height: f32) -> Result<ElevationGrid> {
    let path = path.as_ref();
    let grid = parse_elevation(open(path)?, path, min_height, max_height)?;
    log::info!("Loaded {} elevation rows from {}", grid.row_count(), path.display());
    Ok(grid)
}

pub fn load_colors<P: AsRef<Path>>(path: P) -> Result<ColorGrid> {
    let path = path.as_ref();
    let grid = parse_colors(open(path)?, path)?;
    log::info!("Loaded {} color rows from {}", grid.row_count(), path.display());
    Ok(grid)
}

//! Turning an ordinary picture into the elevation, color and metadata files
//! the terrain loader reads. Brightness becomes height.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use image::{imageops::FilterType, DynamicImage, GenericImageView, Pixel};
use itertools::Itertools;

use crate::error::{Result, TerrainError};
use crate::grid::ColorGrid;
use crate::mesh::Dimensions;
use crate::metadata::Metadata;

pub const DEFAULT_MAX_TRIANGLES: usize = 9000;

/// Grids ready to be written out. Elevation is still normalized to [0, 1].
#[derive(Clone, Debug, PartialEq)]
pub struct PreparedGrids {
    pub dimensions: Dimensions,
    pub elevation: Vec<Vec<f32>>,
    pub colors: ColorGrid,
}

/// ITU-R 601-2 luma in 16.16 fixed point, rounded.
pub fn luma(rgb: [u8; 3]) -> u8 {
    ((rgb[0] as u32 * 19595 + rgb[1] as u32 * 38470 + rgb[2] as u32 * 7471 + 0x8000) >> 16) as u8
}

/// Largest `(width, height)` with the image's aspect ratio whose mesh stays
/// under `max_triangles`.
pub fn fit_dimensions(width: u32, height: u32, max_triangles: usize) -> Option<(u32, u32)> {
    let mut best = None;
    let mut best_count = 0i64;
    for w in 1..=width {
        let h = (w as f64 * (height as f64 / width as f64)) as u32;
        let count = 2 * (w as i64 - 1) * (h as i64 - 1);
        if count < max_triangles as i64 && count > best_count {
            best_count = count;
            best = Some((w, h));
        }
    }
    best
}

pub fn grids_from_image(img: &DynamicImage, max_triangles: usize) -> Result<PreparedGrids> {
    let (width, height) = img.dimensions();
    let (w, h) = fit_dimensions(width, height, max_triangles)
        .ok_or(TerrainError::DegenerateDimensions { rows: height as usize, cols: width as usize })?;

    // image has no box filter; the triangle filter widens its support to the
    // scale factor, so each output pixel still averages its source area
    let resized = if (w, h) == (width, height) {
        img.clone()
    } else {
        img.resize_exact(w, h, FilterType::Triangle)
    };
    let img = resized.fliph();

    let mut luma = Vec::<Vec<f32>>::with_capacity(h as usize);
    let mut colors = Vec::with_capacity(h as usize);
    for row in img.pixels().chunks(w as usize).into_iter() {
        let (l, c): (Vec<f32>, Vec<[f32; 3]>) = row
            .map(|(_x, _y, p)| {
                let rgb = p.to_rgb();
                (self::luma(rgb.0) as f32,
                 [rgb[0] as f32 / 255.0, rgb[1] as f32 / 255.0, rgb[2] as f32 / 255.0])
            })
            .unzip();
        luma.push(l);
        colors.push(c);
    }

    let max = luma.iter().flatten().cloned().fold(0.0f32, f32::max);
    let elevation = if max > 0.0 {
        luma.into_iter().map(|row| row.into_iter().map(|v| v / max).collect()).collect()
    } else {
        luma
    };

    Ok(PreparedGrids {
        dimensions: Dimensions { rows: h as usize, cols: w as usize },
        elevation,
        colors: ColorGrid::from_rows(colors),
    })
}

fn write_lines<P, I>(path: P, lines: I) -> Result<()>
where
    P: AsRef<Path>,
    I: IntoIterator<Item = String>,
{
    let path = path.as_ref();
    let io_err = |e: std::io::Error| TerrainError::io(path, e);
    let mut out = BufWriter::new(File::create(path).map_err(io_err)?);
    for line in lines {
        writeln!(out, "{}", line).map_err(io_err)?;
    }
    out.flush().map_err(io_err)
}

pub fn write_elevation<P: AsRef<Path>>(path: P, elevation: &[Vec<f32>]) -> Result<()> {
    write_lines(path, elevation.iter().map(|row| row.iter().join(" ")))
}

pub fn write_colors<P: AsRef<Path>>(path: P, colors: &ColorGrid) -> Result<()> {
    write_lines(path, colors.rows().iter().map(|row| {
        row.iter().map(|c| format!("{} {} {}", c[0], c[1], c[2])).join(" ")
    }))
}

/// Where `prepare_image` puts its output.
#[derive(Clone, Debug)]
pub struct OutputLayout {
    pub data_dir: PathBuf,
    pub metadata: PathBuf,
}

impl Default for OutputLayout {
    fn default() -> Self {
        OutputLayout {
            data_dir: PathBuf::from("data"),
            metadata: PathBuf::from("meta.data"),
        }
    }
}

/// Converts the image at `path` and writes `<data_dir>/elevation/<stem>.e`,
/// `<data_dir>/rgb/<stem>.rgb` and the metadata file.
pub fn prepare_image<P: AsRef<Path>>(path: P, layout: &OutputLayout, max_triangles: usize) -> Result<Metadata> {
    let path = path.as_ref();
    let name = path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let grids = grids_from_image(&image::open(path)?, max_triangles)?;

    let elevation_dir = layout.data_dir.join("elevation");
    let rgb_dir = layout.data_dir.join("rgb");
    for dir in &[&elevation_dir, &rgb_dir] {
        fs::create_dir_all(dir).map_err(|e| TerrainError::io(dir.as_path(), e))?;
    }

    let elevation_path = elevation_dir.join(format!("{}.e", name));
    let rgb_path = rgb_dir.join(format!("{}.rgb", name));
    write_elevation(&elevation_path, &grids.elevation)?;
    write_colors(&rgb_path, &grids.colors)?;

    let meta = Metadata { name, rows: grids.dimensions.rows, cols: grids.dimensions.cols };
    meta.write(&layout.metadata)?;

    log::info!("rows: {} cols: {}", meta.rows, meta.cols);
    log::info!("Normalized height map saved to {}", elevation_path.display());
    log::info!("Normalized colors saved to {}", rgb_path.display());
    Ok(meta)
}

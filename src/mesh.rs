//! Heightfield to triangle soup.
//!
//! Every 2x2 window of the elevation grid becomes two triangles split along
//! the `(i+1, j)`/`(i, j+1)` diagonal. Each triangle gets its own three
//! vertices, one face normal and one flat color; nothing is shared between
//! triangles, so no index buffer is needed.

use vecmath::{vec3_add, vec3_cross, vec3_neg, vec3_normalized, vec3_scale, vec3_sub, Vector3};

use crate::config::validate_scale;
use crate::error::{Result, TerrainError};
use crate::grid::{ColorGrid, ElevationGrid, Rgb};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Dimensions {
    pub rows: usize,
    pub cols: usize,
}

impl Dimensions {
    pub fn triangle_count(&self) -> usize {
        2 * self.rows.saturating_sub(1) * self.cols.saturating_sub(1)
    }
}

/// One flat shaded triangle, ready to be turned into a drawable.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TriangleRecord {
    pub positions: [Vector3<f32>; 3],
    pub normal: Vector3<f32>,
    pub color: Rgb,
}

/// Unit normal of the plane through `a`, `b` and `c`, flipped so a grid
/// walked in row/column order faces up.
pub fn face_normal(a: Vector3<f32>, b: Vector3<f32>, c: Vector3<f32>) -> Vector3<f32> {
    vec3_neg(vec3_normalized(vec3_cross(vec3_sub(b, a), vec3_sub(c, a))))
}

pub fn mean_color(a: Rgb, b: Rgb, c: Rgb) -> Rgb {
    vec3_scale(vec3_add(vec3_add(a, b), c), 1.0 / 3.0)
}

fn check_grid(grid: &'static str, found_rows: usize, found_cols: usize, dims: Dimensions) -> Result<()> {
    if found_rows < dims.rows || found_cols < dims.cols {
        return Err(TerrainError::DimensionMismatch {
            grid,
            expected_rows: dims.rows,
            expected_cols: dims.cols,
            found_rows,
            found_cols,
        });
    }
    Ok(())
}

/// Checks everything `build` indexes before it touches a single sample.
pub fn validate(elevation: &ElevationGrid, colors: &ColorGrid, dims: Dimensions, scale: f32) -> Result<()> {
    validate_scale(scale)?;
    if dims.rows < 2 || dims.cols < 2 {
        return Err(TerrainError::DegenerateDimensions { rows: dims.rows, cols: dims.cols });
    }
    check_grid("elevation", elevation.row_count(), elevation.min_row_len(dims.rows), dims)?;
    check_grid("color", colors.row_count(), colors.min_row_len(dims.rows), dims)
}

/// Builds `2 * (rows - 1) * (cols - 1)` triangles, cell by cell in row-major
/// order. `scale` spaces the samples on the two horizontal axes; heights are
/// taken as loaded.
pub fn build(elevation: ElevationGrid, colors: ColorGrid, dims: Dimensions, scale: f32) -> Result<Vec<TriangleRecord>> {
    validate(&elevation, &colors, dims, scale)?;

    let corner = |i: usize, j: usize| -> Vector3<f32> {
        [i as f32 * scale, elevation[(i, j)], j as f32 * scale]
    };
    let triangle = |cells: [(usize, usize); 3]| {
        let positions = [corner(cells[0].0, cells[0].1),
                         corner(cells[1].0, cells[1].1),
                         corner(cells[2].0, cells[2].1)];
        TriangleRecord {
            positions,
            normal: face_normal(positions[0], positions[1], positions[2]),
            color: mean_color(colors[cells[0]], colors[cells[1]], colors[cells[2]]),
        }
    };

    let mut records = Vec::with_capacity(dims.triangle_count());
    for i in 0..dims.rows - 1 {
        for j in 0..dims.cols - 1 {
            records.push(triangle([(i, j + 1), (i, j), (i + 1, j)]));
            records.push(triangle([(i + 1, j + 1), (i, j + 1), (i + 1, j)]));
        }
    }

    log::info!("Built {} triangles from a {}x{} grid", records.len(), dims.rows, dims.cols);
    Ok(records)
}

//! Height banded palette for coloring synthetic terrain.

use crate::grid::{ColorGrid, Rgb};

/// Upper bounds of each band and the color given to it. Anything at or
/// above the last bound is snow.
const BANDS: [(f32, Rgb); 10] = [
    (0.05, [0.0, 0.0, 1.0]),  // deep ocean
    (0.15, [0.0, 0.0, 0.5]),  // shallow ocean
    (0.25, [0.0, 1.0, 0.0]),  // coast
    (0.35, [0.0, 0.5, 0.0]),  // lowlands
    (0.45, [0.8, 0.8, 0.0]),  // desert
    (0.55, [0.5, 0.5, 0.0]),  // foothills
    (0.65, [0.3, 0.3, 0.0]),  // mountain base
    (0.75, [0.7, 0.7, 0.7]),  // hills
    (0.85, [0.5, 0.5, 0.5]),  // mountains
    (0.95, [0.8, 0.8, 0.8]),  // high mountains
];

const PEAK: Rgb = [1.0, 1.0, 1.0];

/// Color for a normalized elevation in [0, 1].
pub fn classify(elevation: f32) -> Rgb {
    BANDS.iter()
        .find(|(bound, _)| elevation < *bound)
        .map(|&(_, color)| color)
        .unwrap_or(PEAK)
}

pub fn classify_grid(normalized: &[Vec<f32>]) -> ColorGrid {
    ColorGrid::from_rows(normalized.iter()
        .map(|row| row.iter().map(|&e| classify(e)).collect())
        .collect())
}

use std::path::PathBuf;

/// Everything that can go wrong between reading the data files and having a
/// mesh ready to draw.
#[derive(thiserror::Error, Debug)]
pub enum TerrainError {
    #[error("Could not access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{}:{line}: '{token}' is not a number", .path.display())]
    Parse {
        path: PathBuf,
        line: usize,
        token: String,
    },

    #[error("{}:{line}: expected RGB triples, found {values} values", .path.display())]
    MalformedColorRow {
        path: PathBuf,
        line: usize,
        values: usize,
    },

    #[error("{}:{line}: blank line inside the grid", .path.display())]
    BlankRow { path: PathBuf, line: usize },

    #[error("{}: unable to read rows and columns from metadata", .path.display())]
    MissingDimensions { path: PathBuf },

    #[error("Grid of {rows}x{cols} is too small to triangulate")]
    DegenerateDimensions { rows: usize, cols: usize },

    #[error("{grid} grid does not match size, expected {expected_rows}x{expected_cols} found {found_rows}x{found_cols}")]
    DimensionMismatch {
        grid: &'static str,
        expected_rows: usize,
        expected_cols: usize,
        found_rows: usize,
        found_cols: usize,
    },

    #[error("Scale factor must be positive, got {0}")]
    InvalidScale(f32),

    #[error("Failed to load image: {0}")]
    Image(#[from] image::ImageError),
}

impl TerrainError {
    pub(crate) fn io<P: Into<PathBuf>>(path: P, source: std::io::Error) -> Self {
        TerrainError::Io { path: path.into(), source }
    }
}

pub type Result<T> = std::result::Result<T, TerrainError>;

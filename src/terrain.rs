use gfx::traits::FactoryExt;

use crate::config::TerrainConfig;
use crate::error::Result;
use crate::grid::{self, ColorGrid, ElevationGrid};
use crate::mesh::{self, Dimensions};
use crate::metadata::Metadata;
use crate::render::{GraphicsData, RenderContext};
use crate::triangle::Triangle;

/// The whole terrain mesh. Owns every triangle, so dropping the terrain
/// releases all of their GPU buffers.
pub struct Terrain<R: gfx::Resources> {
    dimensions: Dimensions,
    triangles: Vec<Triangle<R>>,
    uploaded: bool,
    warned: bool,
}

impl <R: gfx::Resources> Terrain <R> {
    pub fn from_grids(elevation: ElevationGrid,
                      colors: ColorGrid,
                      dimensions: Dimensions,
                      config: &TerrainConfig) -> Result<Self> {
        config.validate()?;
        let triangles = mesh::build(elevation, colors, dimensions, config.scale_factor)?
            .into_iter()
            .map(Triangle::new)
            .collect();
        Ok(Terrain { dimensions, triangles, uploaded: false, warned: false })
    }

    /// Reads both grids named by `metadata` and builds the mesh from them.
    pub fn load(metadata: &Metadata, config: &TerrainConfig) -> Result<Self> {
        let dimensions = metadata.dimensions();
        let elevation = grid::load_elevation(metadata.elevation_path(config),
                                             config.min_height, config.max_height)?;
        let colors = grid::load_colors(metadata.rgb_path(config))?;
        Self::from_grids(elevation, colors, dimensions, config)
    }

    pub fn dimensions(&self) -> Dimensions {
        self.dimensions
    }

    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    pub fn triangles(&self) -> &[Triangle<R>] {
        &self.triangles
    }

    pub fn setup<F: FactoryExt<R>>(&mut self, factory: &mut F) {
        for triangle in self.triangles.iter_mut() {
            triangle.setup(factory);
        }
        self.uploaded = true;
        log::debug!("Uploaded {} terrain triangles", self.triangles.len());
    }

    pub fn draw<C: gfx::CommandBuffer<R>>(&mut self,
                                         encoder: &mut gfx::Encoder<R, C>,
                                         gfx_data: &mut GraphicsData<R>,
                                         ctx: &RenderContext) {
        if !self.ready_to_draw() {
            return;
        }
        self.apply_scale(ctx.terrain_scale);
        for triangle in self.triangles.iter() {
            triangle.render(encoder, gfx_data, ctx);
        }
    }

    pub fn is_setup(&self) -> bool {
        self.uploaded
    }

    fn ready_to_draw(&mut self) -> bool {
        if !self.uploaded && !self.warned {
            log::warn!("Terrain drawn before setup, nothing will be rendered");
            self.warned = true;
        }
        self.uploaded
    }

    /// Render-time uniform scale for every triangle.
    pub fn apply_scale(&mut self, factor: f32) {
        for triangle in self.triangles.iter_mut() {
            triangle.set_scale(factor);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TerrainError;
    use std::fs;

    type Mesh = Terrain<gfx_device_gl::Resources>;

    fn write_dataset(root: &std::path::Path, name: &str, elevation: &str, rgb: &str) {
        fs::create_dir_all(root.join("elevation")).unwrap();
        fs::create_dir_all(root.join("rgb")).unwrap();
        fs::write(root.join("elevation").join(format!("{}.e", name)), elevation).unwrap();
        fs::write(root.join("rgb").join(format!("{}.rgb", name)), rgb).unwrap();
    }

    #[test]
    fn loads_dataset_from_metadata() {
        let root = std::env::temp_dir().join("gfx_heightmesh_terrain_load");
        write_dataset(&root, "hill",
                      "0 0 0\n0 1 0\n0 0 0\n",
                      "1 0 0 1 0 0 1 0 0\n0 1 0 0 1 0 0 1 0\n0 0 1 0 0 1 0 0 1\n");
        let config = TerrainConfig::default().with_data_dir(&root);
        let meta = Metadata { name: "hill".into(), rows: 3, cols: 3 };

        let terrain = Mesh::load(&meta, &config).unwrap();
        assert_eq!(terrain.len(), 8);
        assert_eq!(terrain.dimensions(), Dimensions { rows: 3, cols: 3 });
        // the peak sits at max_height, everything else at min_height
        let heights: Vec<f32> = terrain.triangles().iter()
            .flat_map(|t| t.positions().iter().map(|p| p[1]))
            .collect();
        assert!(heights.iter().all(|&h| h == -10.0 || h == 0.0));
        assert!(heights.contains(&0.0));
        fs::remove_dir_all(&root).unwrap();
    }

    #[test]
    fn metadata_larger_than_data_fails_before_building() {
        let root = std::env::temp_dir().join("gfx_heightmesh_terrain_short");
        write_dataset(&root, "flat", "0 0\n0 0\n", "0 0 0 0 0 0\n0 0 0 0 0 0\n");
        let config = TerrainConfig::default().with_data_dir(&root);
        let meta = Metadata { name: "flat".into(), rows: 3, cols: 2 };

        match Mesh::load(&meta, &config) {
            Err(TerrainError::DimensionMismatch { grid: "elevation", .. }) => {}
            Err(other) => panic!("unexpected {:?}", other),
            Ok(_) => panic!("built a mesh from a short grid"),
        }
        fs::remove_dir_all(&root).unwrap();
    }

    #[test]
    fn missing_data_file_is_reported() {
        let config = TerrainConfig::default().with_data_dir("/nonexistent/gfx_heightmesh");
        let meta = Metadata { name: "nothing".into(), rows: 2, cols: 2 };
        match Mesh::load(&meta, &config) {
            Err(TerrainError::Io { .. }) => {}
            Err(other) => panic!("unexpected {:?}", other),
            Ok(_) => panic!("loaded a missing file"),
        }
    }

    #[test]
    fn blank_color_line_fails_the_load() {
        let root = std::env::temp_dir().join("gfx_heightmesh_terrain_blank");
        write_dataset(&root, "gap", "0 0\n0 0\n0 0\n",
                      "1 0 0 1 0 0\n\n0 1 0 0 1 0\n0 0 1 0 0 1\n");
        let config = TerrainConfig::default().with_data_dir(&root);
        let meta = Metadata { name: "gap".into(), rows: 3, cols: 2 };

        match Mesh::load(&meta, &config) {
            Err(TerrainError::MalformedColorRow { line: 2, values: 0, .. }) => {}
            Err(other) => panic!("unexpected {:?}", other),
            Ok(_) => panic!("built a mesh from shifted color rows"),
        }
        fs::remove_dir_all(&root).unwrap();
    }

    #[test]
    fn invalid_scale_is_rejected_on_load() {
        let root = std::env::temp_dir().join("gfx_heightmesh_terrain_scale");
        write_dataset(&root, "flat", "0 0\n0 0\n", "0 0 0 0 0 0\n0 0 0 0 0 0\n");
        let config = TerrainConfig::default().with_scale_factor(0.0).with_data_dir(&root);
        let meta = Metadata { name: "flat".into(), rows: 2, cols: 2 };

        match Mesh::load(&meta, &config) {
            Err(TerrainError::InvalidScale(_)) => {}
            Err(other) => panic!("unexpected {:?}", other),
            Ok(_) => panic!("loaded with a zero scale"),
        }
        fs::remove_dir_all(&root).unwrap();
    }

    #[test]
    fn render_scale_reaches_every_triangle_without_moving_vertices() {
        let elevation = ElevationGrid::from_rows(vec![vec![-1.0; 3]; 3]);
        let colors = ColorGrid::from_rows(vec![vec![[0.0; 3]; 3]; 3]);
        let mut terrain = Mesh::from_grids(elevation, colors, Dimensions { rows: 3, cols: 3 },
                                           &TerrainConfig::default()).unwrap();
        let before: Vec<_> = terrain.triangles().iter().map(|t| *t.positions()).collect();

        terrain.apply_scale(2.5);
        assert!(terrain.triangles().iter().all(|t| t.scale() == 2.5));
        assert!(terrain.triangles().iter().all(|t| t.model_matrix()[0][0] == 2.5));
        let after: Vec<_> = terrain.triangles().iter().map(|t| *t.positions()).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn drawing_before_setup_warns_only_once() {
        let elevation = ElevationGrid::from_rows(vec![vec![0.0; 2]; 2]);
        let colors = ColorGrid::from_rows(vec![vec![[0.0; 3]; 2]; 2]);
        let mut terrain = Mesh::from_grids(elevation, colors, Dimensions { rows: 2, cols: 2 },
                                           &TerrainConfig::default()).unwrap();
        assert!(!terrain.is_setup());
        assert!(!terrain.warned);

        assert!(!terrain.ready_to_draw());
        assert!(terrain.warned);
        assert!(!terrain.ready_to_draw());

        terrain.uploaded = true;
        assert!(terrain.ready_to_draw());
    }

    #[test]
    fn build_scale_comes_from_config() {
        let elevation = ElevationGrid::from_rows(vec![vec![0.0; 2]; 2]);
        let colors = ColorGrid::from_rows(vec![vec![[0.0; 3]; 2]; 2]);
        let config = TerrainConfig::default().with_scale_factor(4.0);
        let terrain = Mesh::from_grids(elevation, colors, Dimensions { rows: 2, cols: 2 }, &config).unwrap();
        assert_eq!(terrain.triangles()[0].positions()[0], [0.0, 0.0, 4.0]);
        assert!(terrain.triangles().iter().all(|t| t.scale() == 1.0 && !t.is_setup()));
    }
}

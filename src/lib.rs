//! Flat shaded terrain meshes from elevation and color grids, drawn with gfx.
//!
//! A frame loop owns a [`Terrain`], a [`LightMarker`], the [`GraphicsData`]
//! pipelines and a [`RenderContext`]:
//!
//! ```ignore
//! let config = TerrainConfig::default();
//! let meta = Metadata::read("meta.data")?;
//! let mut terrain = Terrain::load(&meta, &config)?;
//! let mut marker = LightMarker::new(meta.initial_light_position(config.max_height));
//! terrain.setup(&mut factory);
//! marker.setup(&mut factory);
//! let mut gfx_data = GraphicsData::new(&mut factory, rt, ds);
//!
//! loop {
//!     ctx.scale_terrain(SCALE_STEP);
//!     marker.update_position(ctx.light_pos);
//!     encoder.clear(&rt, [0.1, 0.1, 0.1, 1.0]);
//!     terrain.draw(&mut encoder, &mut gfx_data, &ctx);
//!     marker.render(&mut encoder, &mut gfx_data, &ctx);
//!     encoder.flush(&mut device);
//! }
//! ```

#[macro_use]
extern crate gfx;
extern crate image;
extern crate itertools;
extern crate vecmath;

pub mod biome;
pub mod config;
pub mod error;
pub mod grid;
pub mod marker;
pub mod mesh;
pub mod metadata;
pub mod preprocess;
pub mod render;
pub mod terrain;
pub mod triangle;

pub use config::TerrainConfig;
pub use error::{Result, TerrainError};
pub use grid::{ColorGrid, ElevationGrid};
pub use marker::LightMarker;
pub use mesh::{Dimensions, TriangleRecord};
pub use metadata::Metadata;
pub use render::{GraphicsData, RenderContext, LIGHT_STEP, SCALE_STEP};
pub use terrain::Terrain;
pub use triangle::Triangle;

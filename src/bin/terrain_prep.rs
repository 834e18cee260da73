//! Prepares terrain datasets for the renderer.
//!
//! `terrain_prep image photo.jpg` writes `data/elevation/photo.e`,
//! `data/rgb/photo.rgb` and `meta.data`.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use gfx_heightmesh::biome;
use gfx_heightmesh::grid;
use gfx_heightmesh::preprocess::{self, OutputLayout, DEFAULT_MAX_TRIANGLES};

#[derive(Parser, Debug)]
#[command(about = "Build elevation and color grids for gfx_heightmesh", version, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Convert a picture: brightness becomes height, pixels become colors
    Image {
        path: PathBuf,
        /// Upper bound on the number of triangles of the resulting mesh
        #[arg(short = 'n', long, default_value_t = DEFAULT_MAX_TRIANGLES)]
        max_triangles: usize,
        #[arg(short, long, default_value = "data")]
        data_dir: PathBuf,
        #[arg(long, default_value = "meta.data")]
        meta: PathBuf,
    },
    /// Color a normalized elevation grid by height bands
    Classify {
        elevation: PathBuf,
        output: PathBuf,
    },
}

fn run(args: Args) -> gfx_heightmesh::Result<()> {
    match args.command {
        Command::Image { path, max_triangles, data_dir, meta } => {
            let layout = OutputLayout { data_dir, metadata: meta };
            preprocess::prepare_image(&path, &layout, max_triangles)?;
        }
        Command::Classify { elevation, output } => {
            let normalized = grid::load_elevation(&elevation, 0.0, 1.0)?;
            let colors = biome::classify_grid(normalized.rows());
            preprocess::write_colors(&output, &colors)?;
            log::info!("Biome colors saved to {}", output.display());
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
